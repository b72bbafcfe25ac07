use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::color::GroupColors;
use crate::data::export::export_file;
use crate::data::filter::{analyze_groups, AnalysisConfig};
use crate::data::group::group_rows;
use crate::data::loader::load_files;
use crate::data::model::{Dataset, ExportRow, Group};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Rows of the last successful load (None until user opens files).
    pub dataset: Option<Dataset>,

    /// Mode and threshold edited in the side panel.
    pub config: AnalysisConfig,

    /// Config the current `results` were computed with.
    pub analyzed_with: AnalysisConfig,

    /// Groups of the last analysis, each sorted by price.
    pub groups: Vec<Group>,

    /// Rows that passed the threshold in the last analysis.
    pub results: Vec<ExportRow>,

    /// Colour per EAN for the results table and plot.
    pub group_colors: GroupColors,

    /// EAN whose prices are shown in the plot.
    pub selected_group: Option<i64>,

    /// Status / error message shown in the top bar.
    pub status: Option<Status>,
}

impl AppState {
    /// Replace the dataset wholesale and drop stale results.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.groups.clear();
        self.results.clear();
        self.group_colors = GroupColors::default();
        self.selected_group = None;
    }

    /// Load the given files. On failure the previous dataset is kept.
    pub fn load_paths(&mut self, paths: &[PathBuf]) {
        match load_files(paths) {
            Ok(dataset) => {
                let skipped: usize = dataset.files.iter().map(|f| f.rows_skipped).sum();
                log::info!(
                    "Loaded {} rows from {} file(s), {skipped} skipped",
                    dataset.len(),
                    dataset.files.len()
                );
                let mut msg = format!("{} rows loaded", dataset.len());
                if skipped > 0 {
                    msg.push_str(&format!(", {skipped} malformed rows skipped"));
                }
                self.status = Some(Status::Info(msg));
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load files: {e:#}");
                self.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }

    /// Group and filter the current dataset with the current config.
    /// Returns `false` when there is nothing to analyze.
    pub fn run_analysis(&mut self) -> bool {
        let Some(dataset) = self.dataset.as_ref().filter(|ds| !ds.is_empty()) else {
            self.status = Some(Status::Info("Nothing to analyze".into()));
            return false;
        };

        let mut groups = group_rows(&dataset.rows);
        let results = analyze_groups(&mut groups, &self.config);
        log::info!(
            "Analyzed {} groups with {:?}: {} rows below threshold",
            groups.len(),
            self.config,
            results.len()
        );

        self.group_colors = GroupColors::new(results.iter().map(|r| r.ean.as_str()));
        self.selected_group = results
            .first()
            .and_then(|r| r.ean.parse().ok())
            .or_else(|| groups.first().map(|g| g.ean));
        self.status = Some(Status::Info(format!(
            "{} of {} groups have cheaper offers ({} rows)",
            results.iter().map(|r| &r.ean).collect::<HashSet<_>>().len(),
            groups.len(),
            results.len()
        )));
        self.analyzed_with = self.config;
        self.groups = groups;
        self.results = results;
        true
    }

    /// Write the current results to `path`.
    pub fn export_to(&mut self, path: &Path) {
        match export_file(&self.results, path) {
            Ok(()) => {
                self.status = Some(Status::Info(format!(
                    "Saved {} rows to {}",
                    self.results.len(),
                    path.display()
                )));
            }
            Err(e) => {
                log::error!("Failed to export: {e}");
                self.status = Some(Status::Error(format!("Error: {e}")));
            }
        }
    }

    pub fn selected_group(&self) -> Option<&Group> {
        let ean = self.selected_group?;
        self.groups.iter().find(|g| g.ean == ean)
    }
}

#[cfg(test)]
mod tests {
    use crate::data::filter::DiffType;

    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn analysis_without_data_is_a_no_op() {
        let mut state = AppState::default();
        assert!(!state.run_analysis());
        assert!(state.results.is_empty());
        assert_eq!(state.status, Some(Status::Info("Nothing to analyze".into())));
    }

    #[test]
    fn load_analyze_export() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.csv", "EAN,NAZWA,CENA,DYS\n1,Kawa,100,A\n2,Sok,5,X\n");
        let b = write(&dir, "b.csv", "EAN,NAZWA,CENA,DYS\n1,Kawa,80,B\n1,Kawa,70,C\n");

        let mut state = AppState::default();
        state.load_paths(&[a, b]);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(4));

        state.config = AnalysisConfig { diff_type: DiffType::Percent, diff: 0.15 };
        assert!(state.run_analysis());
        let prices: Vec<f64> = state.results.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![70.0, 80.0]);
        assert_eq!(state.selected_group, Some(1));
        assert_eq!(state.selected_group().map(|g| g.rows.len()), Some(3));

        let out = dir.path().join("out.csv");
        state.export_to(&out);
        assert!(matches!(state.status, Some(Status::Info(_))));
        assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 3);
    }

    #[test]
    fn editing_config_does_not_change_analyzed_config() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.csv", "EAN,CENA\n1,100\n1,80\n");

        let mut state = AppState::default();
        state.load_paths(&[a]);
        state.config = AnalysisConfig { diff_type: DiffType::Absolute, diff: 15.0 };
        assert!(state.run_analysis());

        state.config.diff = 50.0;
        assert_eq!(state.analyzed_with.diff, 15.0);
        assert_eq!(state.results.len(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "good.csv", "EAN,CENA\n1,10\n");

        let mut state = AppState::default();
        state.load_paths(&[good.clone()]);
        state.load_paths(&[good, dir.path().join("nope.xlsx")]);

        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(1));
        assert!(matches!(state.status, Some(Status::Error(_))));
    }

    #[test]
    fn new_dataset_clears_results() {
        let mut state = AppState::default();
        state.results.push(ExportRow {
            ean: "1".into(),
            name: String::new(),
            price: 1.0,
            tag: String::new(),
            difference: "0 zł".into(),
        });
        state.selected_group = Some(1);
        state.set_dataset(Dataset::default());
        assert!(state.results.is_empty());
        assert_eq!(state.selected_group, None);
    }
}
