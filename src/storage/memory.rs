// In-memory spreadsheet service for tests
use crate::model::SyncError;
use crate::storage::SheetsService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Worksheet {
    size: (u32, u32),
    rows: Vec<Vec<String>>,
}

#[derive(Default)]
struct State {
    spreadsheets: HashMap<String, Vec<(String, Worksheet)>>,
    calls: usize,
    appends: usize,
    fail_appends_after: Option<usize>,
}

#[derive(Clone, Default)]
pub struct MemorySheets {
    state: Arc<Mutex<State>>,
}

impl MemorySheets {
    pub fn with_spreadsheet(sheet_id: &str) -> Self {
        let sheets = Self::default();
        sheets
            .state
            .lock()
            .unwrap()
            .spreadsheets
            .insert(sheet_id.to_string(), Vec::new());
        sheets
    }

    /// Appends beyond the first `n` fail with a 500.
    pub fn fail_appends_after(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_appends_after = Some(n);
        self
    }

    pub fn seed(&self, sheet_id: &str, title: &str, rows: Vec<Vec<String>>) {
        let mut state = self.state.lock().unwrap();
        let worksheets = state.spreadsheets.entry(sheet_id.to_string()).or_default();
        worksheets.push((
            title.to_string(),
            Worksheet {
                size: (1000, 10),
                rows,
            },
        ));
    }

    pub fn rows(&self, sheet_id: &str, title: &str) -> Vec<Vec<String>> {
        let state = self.state.lock().unwrap();
        state
            .spreadsheets
            .get(sheet_id)
            .and_then(|ws| ws.iter().find(|(t, _)| t == title))
            .map(|(_, w)| w.rows.clone())
            .unwrap_or_default()
    }

    pub fn worksheet_size(&self, sheet_id: &str, title: &str) -> Option<(u32, u32)> {
        let state = self.state.lock().unwrap();
        state
            .spreadsheets
            .get(sheet_id)?
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, w)| w.size)
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn with_worksheet<T>(
        &self,
        sheet_id: &str,
        title: &str,
        f: impl FnOnce(&mut Worksheet) -> T,
    ) -> Result<T, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let worksheets = state
            .spreadsheets
            .get_mut(sheet_id)
            .ok_or_else(|| SyncError::NotFound(sheet_id.to_string()))?;
        let (_, worksheet) = worksheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .ok_or_else(|| SyncError::Api {
                status: 400,
                body: format!("Unable to parse range: '{}'!1:1", title),
            })?;
        Ok(f(worksheet))
    }
}

#[async_trait::async_trait]
impl SheetsService for MemorySheets {
    async fn worksheet_titles(&self, sheet_id: &str) -> Result<Vec<String>, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        state
            .spreadsheets
            .get(sheet_id)
            .map(|ws| ws.iter().map(|(t, _)| t.clone()).collect())
            .ok_or_else(|| SyncError::NotFound(sheet_id.to_string()))
    }

    async fn add_worksheet(
        &self,
        sheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        let worksheets = state
            .spreadsheets
            .get_mut(sheet_id)
            .ok_or_else(|| SyncError::NotFound(sheet_id.to_string()))?;
        worksheets.push((
            title.to_string(),
            Worksheet {
                size: (rows, cols),
                rows: Vec::new(),
            },
        ));
        Ok(())
    }

    async fn first_row(&self, sheet_id: &str, title: &str) -> Result<Vec<String>, SyncError> {
        self.with_worksheet(sheet_id, title, |w| w.rows.first().cloned().unwrap_or_default())
    }

    async fn append_row(
        &self,
        sheet_id: &str,
        title: &str,
        row: &[String],
    ) -> Result<(), SyncError> {
        {
            let mut state = self.state.lock().unwrap();
            if state.fail_appends_after.is_some_and(|n| state.appends >= n) {
                state.calls += 1;
                return Err(SyncError::Api {
                    status: 500,
                    body: "backend error".into(),
                });
            }
            state.appends += 1;
        }
        self.with_worksheet(sheet_id, title, |w| w.rows.push(row.to_vec()))
    }
}
