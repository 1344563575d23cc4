use chrono::NaiveDateTime;

use crate::config::ViewerConfig;
use crate::data::loader::{InputSource, LoadOptions};
use crate::data::model::{Record, TimeSeriesTable};
use crate::data::query::{nearest_timestamp, parse_date, point_query, range_query};
use crate::data::raw::RawTable;
use crate::data::session::{load_with_preview, Session};

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Graph,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Source of the current (or last attempted) load.
    pub source: Option<InputSource>,

    /// Load options as edited in the side panel.
    pub options: LoadOptions,

    /// Options of the last load attempt, successful or not.
    attempted_options: Option<LoadOptions>,

    /// Cells of the last attempt; `None` when the input did not parse.
    pub preview: Option<RawTable>,

    /// Last successfully loaded dataset.
    pub session: Option<Session>,

    /// Time-series window bounds as typed, `MM/DD/YYYY`.
    pub start_text: String,
    pub end_text: String,

    /// Records strictly between the window bounds (cached).
    pub window: Option<TimeSeriesTable>,

    /// Instant shown on the depth-profile chart.
    pub selected: Option<NaiveDateTime>,

    pub view: ViewMode,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            start_text: config.start_date.clone(),
            end_text: config.end_date.clone(),
            options: config.upload_options.clone(),
            attempted_options: None,
            config,
            source: None,
            preview: None,
            session: None,
            window: None,
            selected: None,
            view: ViewMode::Graph,
            status_message: None,
        }
    }

    /// Switch to the bundled sample with its own load options.
    pub fn load_sample(&mut self) {
        self.options = self.config.sample_options.clone();
        self.load(InputSource::Bundled(self.config.sample_path.clone()));
    }

    /// Switch to an uploaded file, starting from the upload defaults.
    pub fn load_upload(&mut self, source: InputSource) {
        self.options = self.config.upload_options.clone();
        self.load(source);
    }

    fn load(&mut self, source: InputSource) {
        self.source = Some(source);
        self.reload();
    }

    /// Re-run the pipeline on the current source with the current options.
    ///
    /// On failure the previous session stays in place and the error goes
    /// to the status line. The preview always follows the attempt.
    pub fn reload(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        self.attempted_options = Some(self.options.clone());
        let (preview, result) = load_with_preview(source, &self.options);
        self.preview = preview;
        match result {
            Ok(session) => {
                self.selected = session.table.records().first().map(|r| r.timestamp);
                self.session = Some(session);
                self.window = None;
                self.status_message = None;
                self.refresh_window();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", source.label());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Reload when the side-panel options differ from the last attempt.
    pub fn reload_if_changed(&mut self) {
        if self.source.is_some() && self.attempted_options.as_ref() != Some(&self.options) {
            self.reload();
        }
    }

    /// Recompute the time-series window from the typed bounds.
    pub fn refresh_window(&mut self) {
        let Some(session) = &self.session else {
            self.window = None;
            return;
        };
        match (parse_date(&self.start_text), parse_date(&self.end_text)) {
            (Ok(start), Ok(end)) => {
                self.window = Some(range_query(&session.table, start, end));
                self.status_message = None;
            }
            (Err(e), _) | (_, Err(e)) => {
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Point the depth profile at the record closest to `at`.
    pub fn hover(&mut self, at: NaiveDateTime) {
        let table = match (&self.window, &self.session) {
            (Some(window), _) if !window.is_empty() => window,
            (_, Some(session)) => &session.table,
            _ => return,
        };
        if let Some(ts) = nearest_timestamp(table, at) {
            self.selected = Some(ts);
        }
    }

    /// Record at the selected instant.
    pub fn selected_record(&self) -> Option<&Record> {
        let session = self.session.as_ref()?;
        point_query(&session.table, self.selected?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(text: &str) -> InputSource {
        InputSource::Upload { name: "test.csv".into(), text: text.into() }
    }

    #[test]
    fn failed_reload_keeps_previous_session() {
        let mut state = AppState::new(ViewerConfig::default());
        state.load_upload(upload("01/02/2000,10:00:00,1.0\n01/03/2000,10:00:00,2.0\n"));
        assert_eq!(state.session.as_ref().unwrap().table.len(), 2);
        assert_eq!(state.window.as_ref().unwrap().len(), 2);

        state.options.parse.skip_rows = 5;
        state.reload_if_changed();
        assert_eq!(state.session.as_ref().unwrap().table.len(), 2);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn hover_snaps_to_a_record() {
        let mut state = AppState::new(ViewerConfig::default());
        state.load_upload(upload("01/02/2000,10:00:00,1.0\n01/05/2000,10:00:00,2.0\n"));
        state.hover(parse_date("01/04/2000").unwrap());
        assert_eq!(state.selected_record().unwrap().values, vec![2.0]);
    }

    #[test]
    fn malformed_bound_is_reported() {
        let mut state = AppState::new(ViewerConfig::default());
        state.load_upload(upload("01/02/2000,10:00:00,1.0\n"));
        state.end_text = "2000-12-31".into();
        state.refresh_window();
        assert!(state.status_message.is_some());
        assert_eq!(state.window.as_ref().unwrap().len(), 1);

        // A new dataset never shows the previous dataset's window.
        state.load_upload(upload("03/02/2001,10:00:00,1.0\n03/03/2001,10:00:00,2.0\n"));
        assert_eq!(state.session.as_ref().unwrap().table.len(), 2);
        assert!(state.window.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn preview_follows_the_latest_attempt() {
        let mut state = AppState::new(ViewerConfig::default());
        state.load_upload(upload("01/02/2000,10:00:00,1.0\n01/03/2000,10:00:00,2.0\n"));
        assert_eq!(state.preview.as_ref().unwrap().len(), 2);

        state.load_upload(InputSource::Upload {
            name: "headed.csv".into(),
            text: "Date,Time,T1,T2\n01/04/2000,10:00:00,3.0,4.0\n".into(),
        });
        let preview = state.preview.as_ref().unwrap();
        assert_eq!(preview.columns, vec!["col0", "col1", "col2", "col3"]);
        assert_eq!(preview.rows[0][0], "Date");
        assert_eq!(state.session.as_ref().unwrap().table.channels().len(), 1);
        assert!(state.status_message.is_some());

        state.options.parse.has_header = true;
        state.reload_if_changed();
        assert_eq!(state.preview.as_ref().unwrap().columns[2], "T1");
        assert_eq!(state.session.as_ref().unwrap().table.channels().len(), 2);
    }
}
