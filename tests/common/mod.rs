//! In-memory browser backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use resume_pdf::{
    Error, LaunchOptions, Launcher, PageContext, PdfSettings, Result, Session, Viewport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake\n%%EOF\n";

/// Everything the mock browser was asked to do.
#[derive(Default)]
pub struct Recorder {
    pub launches: AtomicUsize,
    pub session_closes: AtomicUsize,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
    pub viewports: Mutex<Vec<Viewport>>,
    pub prints: Mutex<Vec<PdfSettings>>,
    pub evaluations: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::SeqCst)
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn prints(&self) -> Vec<PdfSettings> {
        self.prints.lock().unwrap().clone()
    }
}

/// Behaviour knobs for the mock browser.
#[derive(Clone)]
pub struct MockBehavior {
    pub fail_launch: bool,
    pub fail_session_close: bool,
    pub unreachable: Vec<String>,
    pub pdf: Vec<u8>,
    pub document_complete: bool,
    pub marker_present: bool,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            fail_launch: false,
            fail_session_close: false,
            unreachable: Vec::new(),
            pdf: FAKE_PDF.to_vec(),
            document_complete: true,
            marker_present: true,
        }
    }
}

pub struct MockLauncher {
    pub recorder: Arc<Recorder>,
    pub behavior: MockBehavior,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::default())
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            behavior,
        }
    }

    pub fn unreachable(urls: &[&str]) -> Self {
        Self::with_behavior(MockBehavior {
            unreachable: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        })
    }

    /// A standalone session, for exercising the worker directly.
    pub fn session(&self) -> MockSession {
        MockSession {
            recorder: self.recorder.clone(),
            behavior: self.behavior.clone(),
        }
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    async fn launch(&self, _options: &LaunchOptions) -> Result<Box<dyn Session>> {
        if self.behavior.fail_launch {
            return Err(Error::Launch("no browser executable".to_string()));
        }
        self.recorder.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.session()))
    }
}

pub struct MockSession {
    recorder: Arc<Recorder>,
    behavior: MockBehavior,
}

#[async_trait]
impl Session for MockSession {
    async fn open_page<'a>(&'a self) -> Result<Box<dyn PageContext + 'a>> {
        self.recorder.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            recorder: &self.recorder,
            behavior: &self.behavior,
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.recorder.session_closes.fetch_add(1, Ordering::SeqCst);
        if self.behavior.fail_session_close {
            return Err(Error::Page("browser already gone".to_string()));
        }
        Ok(())
    }
}

struct MockPage<'a> {
    recorder: &'a Recorder,
    behavior: &'a MockBehavior,
}

#[async_trait]
impl PageContext for MockPage<'_> {
    async fn set_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        self.recorder.viewports.lock().unwrap().push(*viewport);
        Ok(())
    }

    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.recorder.navigations.lock().unwrap().push(url.to_string());
        if self.behavior.unreachable.iter().any(|u| u == url) {
            return Err(Error::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        Ok(())
    }

    async fn evaluate_bool(&mut self, expression: &str) -> Result<bool> {
        self.recorder
            .evaluations
            .lock()
            .unwrap()
            .push(expression.to_string());
        if expression.contains("readyState") {
            Ok(self.behavior.document_complete)
        } else {
            Ok(self.behavior.marker_present)
        }
    }

    async fn print_pdf(&mut self, settings: &PdfSettings) -> Result<Vec<u8>> {
        self.recorder.prints.lock().unwrap().push(settings.clone());
        Ok(self.behavior.pdf.clone())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.recorder.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
