use serde::{Deserialize, Serialize};

use super::{AnalysisError, AnalysisResult, Analyzer, build_prompt, parse_result, response_schema};
use crate::config::AnalysisConfig;
use crate::data::model::MetricSummary;

// ---------------------------------------------------------------------------
// Gemini generateContent wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    client: reqwest::blocking::Client,
    config: AnalysisConfig,
}

impl GeminiClient {
    pub fn new(config: AnalysisConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {e}");
                reqwest::blocking::Client::new()
            });
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model.trim()
        )
    }

    fn request_body(&self, summaries: &[MetricSummary]) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(summaries),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        }
    }
}

impl Analyzer for GeminiClient {
    fn analyze(&self, summaries: &[MetricSummary]) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AnalysisError::MissingApiKey)?;
        if summaries.is_empty() {
            return Err(AnalysisError::NoMetrics);
        }

        log::info!(
            "Requesting analysis of {} metrics from {}",
            summaries.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(summaries))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: GeminiResponse = response.json()?;
        parse_result(&json.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> MetricSummary {
        MetricSummary {
            metric: "cpu".into(),
            min: 1.0,
            max: 9.0,
            avg: 5.0,
            p50: 5.0,
            p90: 9.0,
            p95: 9.0,
            p99: 9.0,
        }
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(AnalysisConfig {
            base_url: "http://localhost:8080/v1beta/models/".into(),
            ..AnalysisConfig::default()
        });
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = GeminiClient::new(AnalysisConfig::default());
        let body = serde_json::to_value(client.request_body(&[summary()])).unwrap();

        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.contains("Metric: cpu, Avg: 5, Max: 9, P95: 9, P99: 9"));

        let cfg = &body["generationConfig"];
        assert_eq!(cfg["responseMimeType"], "application/json");
        assert_eq!(cfg["responseSchema"]["type"], "OBJECT");
        assert!((cfg["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"{\"summary\":"},{"text":"\"ok\",\"recommendations\":[],\"severity\":\"medium\"}"}]}}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let result = parse_result(&resp.text()).unwrap();
        assert_eq!(result.summary, "ok");

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let client = GeminiClient::new(AnalysisConfig::default());
        assert!(matches!(
            client.analyze(&[summary()]),
            Err(AnalysisError::MissingApiKey)
        ));
    }

    #[test]
    fn test_no_metrics() {
        let client = GeminiClient::new(AnalysisConfig {
            api_key: Some("k".into()),
            ..AnalysisConfig::default()
        });
        assert!(matches!(client.analyze(&[]), Err(AnalysisError::NoMetrics)));
    }
}
