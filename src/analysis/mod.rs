//! AI analysis of metric summaries.
//!
//! The summaries are rendered into a plain-text prompt, sent to the LLM on a
//! worker thread, and the structured JSON reply is decoded into
//! [`AnalysisResult`].

pub mod client;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::data::model::MetricSummary;

pub use client::GeminiClient;

// ---------------------------------------------------------------------------
// Result schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured reply requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key not found: set API_KEY or GEMINI_API_KEY")]
    MissingApiKey,
    #[error("no metrics to analyze")]
    NoMetrics,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("no response text from the model")]
    EmptyResponse,
    #[error("invalid analysis JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("analysis worker panicked")]
    WorkerPanicked,
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// One line per metric: `Metric: cpu, Avg: 20, Max: 30, P95: 30, P99: 30`.
pub fn summary_text(summaries: &[MetricSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            format!(
                "Metric: {}, Avg: {}, Max: {}, P95: {}, P99: {}",
                s.metric, s.avg, s.max, s.p95, s.p99
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(summaries: &[MetricSummary]) -> String {
    format!(
        "Analyze the following system resource utilization metrics summaries.\n\
         Identify potential bottlenecks, resource saturation, or underutilization.\n\
         Provide a professional summary, a list of actionable recommendations, \
         and an overall severity rating.\n\
         \n\
         Metrics Data:\n{}\n",
        summary_text(summaries)
    )
}

/// Response schema in the Gemini `responseSchema` dialect.
pub fn response_schema() -> serde_json::Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise executive summary of the system health based on metrics."
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of actionable recommendations to improve system stability or efficiency."
            },
            "severity": {
                "type": "STRING",
                "enum": severities,
                "description": "Overall severity assessment of the system state."
            }
        },
        "required": ["summary", "recommendations", "severity"]
    })
}

/// Decode the model's JSON text. Tolerates a ```json fence around it.
pub fn parse_result(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}

// ---------------------------------------------------------------------------
// Backend seam + background job
// ---------------------------------------------------------------------------

/// Anything that can turn summaries into an analysis.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, summaries: &[MetricSummary]) -> Result<AnalysisResult, AnalysisError>;
}

type Slot = Arc<Mutex<Option<Result<AnalysisResult, String>>>>;

/// An analysis running on a worker thread.
///
/// Dropping the job detaches it; the thread finishes and its result is lost.
pub struct AnalysisJob {
    result: Slot,
}

impl AnalysisJob {
    pub fn spawn(analyzer: Arc<dyn Analyzer>, summaries: Vec<MetricSummary>) -> Self {
        let result: Slot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&result);

        std::thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(&summaries)))
                .unwrap_or_else(|_| Err(AnalysisError::WorkerPanicked))
                .map_err(|e| {
                    log::error!("AI analysis failed: {e}");
                    e.to_string()
                });
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(outcome);
            }
        });

        Self { result }
    }

    /// Take the result if the worker has finished.
    pub fn poll(&self) -> Option<Result<AnalysisResult, String>> {
        self.result.lock().ok().and_then(|mut guard| guard.take())
    }
}

/// Build the default analyzer from the environment.
pub fn default_analyzer() -> Arc<dyn Analyzer> {
    Arc::new(GeminiClient::new(AnalysisConfig::from_env()))
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn summary(metric: &str, avg: f64, max: f64, p95: f64, p99: f64) -> MetricSummary {
        MetricSummary {
            metric: metric.into(),
            min: 0.0,
            max,
            avg,
            p50: avg,
            p90: p95,
            p95,
            p99,
        }
    }

    #[test]
    fn test_summary_text_format() {
        let text = summary_text(&[
            summary("cpu", 20.0, 30.0, 30.0, 30.0),
            summary("mem", 45.67, 99.5, 90.0, 98.25),
        ]);
        assert_eq!(
            text,
            "Metric: cpu, Avg: 20, Max: 30, P95: 30, P99: 30\n\
             Metric: mem, Avg: 45.67, Max: 99.5, P95: 90, P99: 98.25"
        );
    }

    #[test]
    fn test_prompt_embeds_metrics() {
        let prompt = build_prompt(&[summary("disk", 1.5, 2.0, 2.0, 2.0)]);
        assert!(prompt.contains("Metrics Data:\nMetric: disk, Avg: 1.5"));
        assert!(prompt.starts_with("Analyze the following"));
    }

    #[test]
    fn test_schema_lists_severities() {
        let schema = response_schema();
        assert_eq!(
            schema["properties"]["severity"]["enum"],
            json!(["low", "medium", "high", "critical"])
        );
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_parse_result() {
        let res = parse_result(
            r#"{"summary":"CPU saturated","recommendations":["scale out","profile"],"severity":"high"}"#,
        )
        .unwrap();
        assert_eq!(res.summary, "CPU saturated");
        assert_eq!(res.recommendations.len(), 2);
        assert_eq!(res.severity, Severity::High);
    }

    #[test]
    fn test_parse_result_fenced() {
        let text = "```json\n{\"summary\":\"ok\",\"recommendations\":[],\"severity\":\"low\"}\n```";
        assert_eq!(parse_result(text).unwrap().severity, Severity::Low);
    }

    #[test]
    fn test_parse_result_errors() {
        assert!(matches!(parse_result("  "), Err(AnalysisError::EmptyResponse)));
        assert!(matches!(
            parse_result(r#"{"summary":"x","recommendations":[],"severity":"severe"}"#),
            Err(AnalysisError::Decode(_))
        ));
    }

    struct Canned(Result<AnalysisResult, ()>);

    impl Analyzer for Canned {
        fn analyze(&self, _: &[MetricSummary]) -> Result<AnalysisResult, AnalysisError> {
            self.0.clone().map_err(|_| AnalysisError::EmptyResponse)
        }
    }

    fn wait(job: &AnalysisJob) -> Result<AnalysisResult, String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(res) = job.poll() {
                return res;
            }
            assert!(Instant::now() < deadline, "analysis job timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_job_delivers_result_once() {
        let expected = AnalysisResult {
            summary: "fine".into(),
            recommendations: vec!["nothing".into()],
            severity: Severity::Low,
        };
        let job = AnalysisJob::spawn(Arc::new(Canned(Ok(expected.clone()))), Vec::new());
        assert_eq!(wait(&job).unwrap(), expected);
        assert!(job.poll().is_none());
    }

    struct Panicking;

    impl Analyzer for Panicking {
        fn analyze(&self, _: &[MetricSummary]) -> Result<AnalysisResult, AnalysisError> {
            panic!("backend blew up");
        }
    }

    #[test]
    fn test_job_reports_worker_panic() {
        let job = AnalysisJob::spawn(Arc::new(Panicking), Vec::new());
        assert_eq!(wait(&job).unwrap_err(), "analysis worker panicked");
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_job_reports_error_text() {
        let job = AnalysisJob::spawn(Arc::new(Canned(Err(()))), Vec::new());
        assert_eq!(wait(&job).unwrap_err(), "no response text from the model");
    }
}
