use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// AI analysis configuration
// ---------------------------------------------------------------------------

/// Settings for the remote analysis request, read from the environment.
///
/// | Variable                    | Default                  |
/// |-----------------------------|--------------------------|
/// | `API_KEY` / `GEMINI_API_KEY`| none                     |
/// | `METRIC_PULSE_MODEL`        | `gemini-2.5-flash`       |
/// | `METRIC_PULSE_API_BASE`     | Gemini v1beta models URL |
/// | `METRIC_PULSE_TIMEOUT_SECS` | 60                       |
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Missing until a request actually needs it.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: 0.3,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let timeout = match get("METRIC_PULSE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!(
                        "Ignoring METRIC_PULSE_TIMEOUT_SECS={raw:?}, using {DEFAULT_TIMEOUT_SECS}s"
                    );
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            api_key: get("API_KEY").or_else(|| get("GEMINI_API_KEY")),
            model: get("METRIC_PULSE_MODEL").unwrap_or(defaults.model),
            base_url: get("METRIC_PULSE_API_BASE").unwrap_or(defaults.base_url),
            timeout,
            temperature: defaults.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = AnalysisConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg, AnalysisConfig::default());
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let cfg = AnalysisConfig::from_lookup(lookup_from(&[
            ("API_KEY", "secret"),
            ("METRIC_PULSE_MODEL", "gemini-2.0-pro"),
            ("METRIC_PULSE_API_BASE", "http://localhost:9000/models"),
            ("METRIC_PULSE_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.model, "gemini-2.0-pro");
        assert_eq!(cfg.base_url, "http://localhost:9000/models");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_api_key_fallback_and_blank_values() {
        let cfg = AnalysisConfig::from_lookup(lookup_from(&[
            ("API_KEY", "   "),
            ("GEMINI_API_KEY", "fallback"),
        ]));
        assert_eq!(cfg.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        for raw in ["abc", "0", "-3"] {
            let cfg =
                AnalysisConfig::from_lookup(lookup_from(&[("METRIC_PULSE_TIMEOUT_SECS", raw)]));
            assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        }
    }
}
