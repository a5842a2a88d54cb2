// Scripted transport and renderer for tests
use crate::acquire::browser::{PageRenderer, PageSession};
use crate::acquire::traits::{HttpTransport, TransportResponse};
use crate::model::{ScrapeError, TransportError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(TransportResponse),
    Timeout(String),
}

impl Scripted {
    pub fn json(payload: serde_json::Value) -> Self {
        Self::body("application/json;charset=UTF-8", &payload.to_string())
    }

    pub fn body(content_type: &str, body: &str) -> Self {
        Self::status(200, content_type, body)
    }

    pub fn status(status: u16, content_type: &str, body: &str) -> Self {
        Self::Respond(TransportResponse {
            status,
            content_type: Some(content_type.to_string()),
            body: body.to_string(),
        })
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, url: &str, response: Scripted) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec()));

        match self.responses.get(url) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Timeout(message)) => Err(TransportError::Timeout(message.clone())),
            None => Err(TransportError::Http(format!("no scripted response for {}", url))),
        }
    }
}

#[derive(Clone, Default)]
struct Counters {
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    navigated: Arc<Mutex<Vec<String>>>,
}

/// Renderer whose sessions serve fixed HTML and count their own release.
#[derive(Clone)]
pub struct ScriptedRenderer {
    html: Result<String, String>,
    open_error: Option<String>,
    wait_times_out: bool,
    counters: Counters,
}

impl ScriptedRenderer {
    pub fn with_html(html: &str) -> Self {
        Self {
            html: Ok(html.to_string()),
            open_error: None,
            wait_times_out: false,
            counters: Counters::default(),
        }
    }

    pub fn failing_content(message: &str) -> Self {
        Self {
            html: Err(message.to_string()),
            ..Self::with_html("")
        }
    }

    pub fn failing_open(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Self::with_html("")
        }
    }

    pub fn wait_times_out(mut self) -> Self {
        self.wait_times_out = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    pub fn navigated(&self) -> Vec<String> {
        self.counters.navigated.lock().unwrap().clone()
    }
}

impl PageRenderer for ScriptedRenderer {
    fn open(&self, _viewport: (u32, u32)) -> Result<Box<dyn PageSession>, ScrapeError> {
        if let Some(message) = &self.open_error {
            return Err(ScrapeError::Browser(message.clone()));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            html: self.html.clone(),
            wait_times_out: self.wait_times_out,
            counters: self.counters.clone(),
        }))
    }
}

struct ScriptedSession {
    html: Result<String, String>,
    wait_times_out: bool,
    counters: Counters,
}

impl PageSession for ScriptedSession {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.counters.navigated.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn wait_for_element(&mut self, selector: &str, _timeout: Duration) -> Result<(), ScrapeError> {
        if self.wait_times_out {
            return Err(ScrapeError::Browser(format!("timed out waiting for {}", selector)));
        }
        Ok(())
    }

    fn content(&mut self) -> Result<String, ScrapeError> {
        self.html.clone().map_err(ScrapeError::Browser)
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
