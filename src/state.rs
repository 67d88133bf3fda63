use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::analysis::{AnalysisJob, AnalysisResult, Analyzer, default_analyzer};
use crate::color::SeriesColors;
use crate::data::loader::{load_file, parse_csv};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Analysis status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Success(AnalysisResult),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Active dataset (None until the user loads a file or after reset).
    pub dataset: Option<Dataset>,

    /// Numeric columns currently drawn in the trend chart.
    pub visible_metrics: BTreeSet<String>,

    /// Colour per numeric column.
    pub series_colors: SeriesColors,

    pub analysis: AnalysisStatus,
    analysis_job: Option<AnalysisJob>,
    analyzer: Arc<dyn Analyzer>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_analyzer(default_analyzer())
    }
}

impl AppState {
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            dataset: None,
            visible_metrics: BTreeSet::new(),
            series_colors: SeriesColors::default(),
            analysis: AnalysisStatus::Idle,
            analysis_job: None,
            analyzer,
            status_message: None,
        }
    }

    /// Replace the active dataset and clear any previous analysis.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.visible_metrics = dataset.numeric_columns.iter().cloned().collect();
        self.series_colors = SeriesColors::new(&dataset.numeric_columns);
        self.dataset = Some(dataset);
        self.clear_analysis();
        self.status_message = None;
    }

    /// Load a file and make it the active dataset. On failure the current
    /// dataset and analysis are left as they were.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Same as [`AppState::load_path`] for content that is already in memory
    /// (files dropped without a path).
    pub fn load_text(&mut self, filename: &str, content: &str) {
        match parse_csv(content, filename) {
            Ok(dataset) => {
                log::info!("Loaded {} rows from {filename}", dataset.len());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to parse {filename}: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Dropped bytes: must be UTF-8, like a file read from disk.
    pub fn load_bytes(&mut self, filename: &str, bytes: &[u8]) {
        match std::str::from_utf8(bytes) {
            Ok(content) => self.load_text(filename, content),
            Err(e) => {
                log::error!("Failed to read {filename}: {e}");
                self.status_message = Some(format!("Error: reading CSV file {filename}: {e}"));
            }
        }
    }

    /// A dropped file that is not a CSV.
    pub fn reject_upload(&mut self) {
        log::warn!("Ignoring dropped file without .csv extension");
        self.status_message = Some("Please upload a CSV file.".to_string());
    }

    /// Discard the dataset and everything derived from it.
    pub fn reset(&mut self) {
        self.dataset = None;
        self.visible_metrics.clear();
        self.series_colors = SeriesColors::default();
        self.clear_analysis();
        self.status_message = None;
    }

    fn clear_analysis(&mut self) {
        self.analysis = AnalysisStatus::Idle;
        self.analysis_job = None;
    }

    // -- AI analysis --

    /// Start a background analysis of the current summaries.
    pub fn start_analysis(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        if self.analysis_job.is_some() {
            return;
        }
        self.analysis_job = Some(AnalysisJob::spawn(
            Arc::clone(&self.analyzer),
            ds.summaries.clone(),
        ));
        self.analysis = AnalysisStatus::Loading;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_job.is_some()
    }

    /// Collect a finished analysis. Returns true when the status changed.
    pub fn poll_analysis(&mut self) -> bool {
        let Some(outcome) = self.analysis_job.as_ref().and_then(|job| job.poll()) else {
            return false;
        };
        self.analysis_job = None;
        self.analysis = match outcome {
            Ok(result) => {
                log::info!("AI analysis finished, severity {}", result.severity);
                AnalysisStatus::Success(result)
            }
            Err(msg) => AnalysisStatus::Error(msg),
        };
        true
    }

    // -- trend chart visibility --

    pub fn is_metric_visible(&self, metric: &str) -> bool {
        self.visible_metrics.contains(metric)
    }

    pub fn toggle_metric(&mut self, metric: &str) {
        if !self.visible_metrics.remove(metric) {
            self.visible_metrics.insert(metric.to_string());
        }
    }

    /// Show every numeric column.
    pub fn show_all_metrics(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_metrics = ds.numeric_columns.iter().cloned().collect();
        }
    }

    /// Hide every numeric column.
    pub fn hide_all_metrics(&mut self) {
        self.visible_metrics.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::analysis::{AnalysisError, Severity};
    use crate::data::model::MetricSummary;

    struct Fixed;

    impl Analyzer for Fixed {
        fn analyze(&self, summaries: &[MetricSummary]) -> Result<AnalysisResult, AnalysisError> {
            Ok(AnalysisResult {
                summary: format!("{} metrics", summaries.len()),
                recommendations: Vec::new(),
                severity: Severity::Medium,
            })
        }
    }

    fn state() -> AppState {
        AppState::with_analyzer(Arc::new(Fixed))
    }

    fn dataset() -> Dataset {
        parse_csv("time,cpu,mem\nt0,1,2\nt1,3,4", "m.csv").unwrap()
    }

    fn wait_for_analysis(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !state.poll_analysis() {
            assert!(Instant::now() < deadline, "analysis did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_set_dataset_initialises_views() {
        let mut st = state();
        st.status_message = Some("old".into());
        st.set_dataset(dataset());

        assert!(st.is_metric_visible("cpu"));
        assert!(st.is_metric_visible("mem"));
        assert!(!st.is_metric_visible("time"));
        assert_eq!(st.analysis, AnalysisStatus::Idle);
        assert!(st.status_message.is_none());
    }

    #[test]
    fn test_analysis_roundtrip() {
        let mut st = state();
        st.start_analysis();
        assert_eq!(st.analysis, AnalysisStatus::Idle, "no dataset, no analysis");

        st.set_dataset(dataset());
        st.start_analysis();
        assert_eq!(st.analysis, AnalysisStatus::Loading);
        assert!(st.is_analyzing());

        wait_for_analysis(&mut st);
        match &st.analysis {
            AnalysisStatus::Success(res) => assert_eq!(res.summary, "2 metrics"),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(!st.is_analyzing());
    }

    #[test]
    fn test_new_dataset_clears_analysis() {
        let mut st = state();
        st.set_dataset(dataset());
        st.start_analysis();
        wait_for_analysis(&mut st);

        st.set_dataset(dataset());
        assert_eq!(st.analysis, AnalysisStatus::Idle);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut st = state();
        st.set_dataset(dataset());
        st.start_analysis();
        st.reset();

        assert!(st.dataset.is_none());
        assert!(st.visible_metrics.is_empty());
        assert_eq!(st.analysis, AnalysisStatus::Idle);
        assert!(!st.is_analyzing());
        assert!(!st.poll_analysis());
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let mut st = state();
        st.set_dataset(dataset());

        let mut bad = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        bad.write_all(b"header_only\n").unwrap();
        st.load_path(bad.path());

        assert_eq!(st.dataset.as_ref().unwrap().filename, "m.csv");
        assert!(st.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn test_load_path_replaces_dataset() {
        let mut st = state();
        let mut good = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        good.write_all(b"ts,disk\n1,5\n2,7\n").unwrap();
        st.load_path(good.path());

        let ds = st.dataset.as_ref().unwrap();
        assert_eq!(ds.numeric_columns, vec!["ts", "disk"]);
        assert!(st.is_metric_visible("disk"));
    }

    #[test]
    fn test_load_text_and_reject() {
        let mut st = state();
        st.load_text("dropped.csv", "onlyheader");
        assert!(st.dataset.is_none());
        assert!(st.status_message.is_some());

        st.load_text("dropped.csv", "cpu\n5\n6");
        assert_eq!(st.dataset.as_ref().unwrap().filename, "dropped.csv");
        assert!(st.status_message.is_none());

        st.reject_upload();
        assert_eq!(st.status_message.as_deref(), Some("Please upload a CSV file."));
        assert!(st.dataset.is_some());
    }

    #[test]
    fn test_load_bytes_rejects_invalid_utf8() {
        let mut st = state();
        st.load_bytes("first.csv", b"cpu\n5\n6");
        assert_eq!(st.dataset.as_ref().unwrap().filename, "first.csv");

        st.load_bytes("broken.csv", b"cpu\n\xff\xfe7\n8");
        assert_eq!(st.dataset.as_ref().unwrap().filename, "first.csv");
        let msg = st.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error: reading CSV file broken.csv"), "{msg}");
    }

    #[test]
    fn test_toggle_metrics() {
        let mut st = state();
        st.set_dataset(dataset());

        st.toggle_metric("cpu");
        assert!(!st.is_metric_visible("cpu"));
        st.toggle_metric("cpu");
        assert!(st.is_metric_visible("cpu"));

        st.hide_all_metrics();
        assert!(st.visible_metrics.is_empty());
        st.show_all_metrics();
        assert_eq!(st.visible_metrics.len(), 2);
    }
}
