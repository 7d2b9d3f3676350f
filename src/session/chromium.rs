//! Chromium backend built on the DevTools protocol.

use super::{Launcher, PageContext, PdfSettings, Session};
use crate::error::{Error, Result};
use crate::options::{LaunchOptions, Viewport};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, LoaderId, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, PrintToPdfParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, warn};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Lifecycle event Chromium emits once no network connections remain.
const NETWORK_IDLE: &str = "networkIdle";

/// Launches headless Chromium through `chromiumoxide`.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    _private: (),
}

impl ChromiumLauncher {
    /// Create a new launcher.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

fn browser_config(options: &LaunchOptions) -> Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .launch_timeout(options.launch_timeout)
        .args(options.args.iter().cloned());

    if !options.headless {
        builder = builder.with_head();
    }
    if let Some(ref executable) = options.executable {
        builder = builder.chrome_executable(executable);
    }

    builder.build().map_err(Error::Launch)
}

#[async_trait]
impl Launcher for ChromiumLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Session>> {
        let config = browser_config(options)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        // The protocol connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser launched (headless: {})", options.headless);
        Ok(Box::new(ChromiumSession {
            browser,
            handler_task,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl Session for ChromiumSession {
    async fn open_page<'a>(&'a self) -> Result<Box<dyn PageContext + 'a>> {
        let context = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await?
            .result
            .browser_context_id;

        let target = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context.clone())
            .build()
            .map_err(Error::Page)?;

        match self.browser.new_page(target).await {
            Ok(page) => Ok(Box::new(ChromiumPage {
                browser: &self.browser,
                page,
                context,
            })),
            Err(e) => {
                dispose_context(&self.browser, context).await;
                Err(e.into())
            }
        }
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumSession {
            mut browser,
            handler_task,
        } = *self;

        let result = match browser.close().await {
            Ok(_) => browser.wait().await.map(|_| ()).map_err(Error::from),
            Err(e) => {
                warn!("Browser did not close cleanly, killing it: {}", e);
                if let Some(Err(kill_err)) = browser.kill().await {
                    warn!("Failed to kill browser process: {}", kill_err);
                }
                Err(Error::from(e))
            }
        };

        release_handler(handler_task, result)
    }
}

/// Stop the protocol handler whatever the outcome of closing the browser.
fn release_handler(handler_task: JoinHandle<()>, result: Result<()>) -> Result<()> {
    handler_task.abort();
    debug!("Browser session closed");
    result
}

async fn dispose_context(browser: &Browser, context: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams::new(context))
        .await
    {
        warn!("Failed to dispose browser context: {}", e);
    }
}

struct ChromiumPage<'a> {
    browser: &'a Browser,
    page: Page,
    context: BrowserContextId,
}

impl ChromiumPage<'_> {
    /// Wait for the main document response, then for network idle on the
    /// same loader.
    async fn load(&self, url: &str) -> Result<()> {
        let mut responses = self.page.event_listener::<EventResponseReceived>().await?;
        let mut lifecycle = self.page.event_listener::<EventLifecycleEvent>().await?;

        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let document = loop {
            match responses.next().await {
                Some(event) if event.r#type == ResourceType::Document => break event,
                Some(_) => continue,
                None => {
                    return Err(Error::Navigation {
                        url: url.to_string(),
                        reason: "no document response received".to_string(),
                    })
                }
            }
        };

        check_document_status(url, document.response.status)?;
        debug!("Document response {} for {}", document.response.status, url);

        while let Some(event) = lifecycle.next().await {
            if is_network_idle(&event.name, &event.loader_id, &document.loader_id) {
                debug!("Network idle for {}", url);
                break;
            }
        }

        Ok(())
    }
}

/// Statuses 200..400 count as a loaded document.
fn check_document_status(url: &str, status: i64) -> Result<()> {
    if (200..400).contains(&status) {
        Ok(())
    } else {
        Err(Error::Navigation {
            url: url.to_string(),
            reason: format!("HTTP status {}", status),
        })
    }
}

/// Only the idle event of the navigation that produced the document counts;
/// events left over from `about:blank` carry another loader.
fn is_network_idle(name: &str, loader: &LoaderId, document_loader: &LoaderId) -> bool {
    name == NETWORK_IDLE && loader == document_loader
}

#[async_trait]
impl PageContext for ChromiumPage<'_> {
    async fn set_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                i64::from(viewport.width),
                i64::from(viewport.height),
                viewport.device_scale_factor,
                false,
            ))
            .await?;
        Ok(())
    }

    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        self.page
            .execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;

        tokio::time::timeout(timeout, self.load(url))
            .await
            .map_err(|_| Error::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })?
    }

    async fn evaluate_bool(&mut self, expression: &str) -> Result<bool> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(Error::Page)?;

        self.page
            .evaluate_expression(params)
            .await?
            .into_value::<bool>()
            .map_err(|e| Error::Page(format!("unexpected result for `{}`: {}", expression, e)))
    }

    async fn print_pdf(&mut self, settings: &PdfSettings) -> Result<Vec<u8>> {
        let (width, height) = settings.format.size_inches();
        let params = PrintToPdfParams {
            print_background: Some(settings.print_background),
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(settings.margin.top.to_inches()),
            margin_right: Some(settings.margin.right.to_inches()),
            margin_bottom: Some(settings.margin.bottom.to_inches()),
            margin_left: Some(settings.margin.left.to_inches()),
            prefer_css_page_size: Some(settings.prefer_css_page_size),
            ..Default::default()
        };

        Ok(self.page.pdf(params).await?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumPage {
            browser,
            page,
            context,
        } = *self;

        let closed = page.close().await;
        dispose_context(browser, context).await;
        closed?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromiumoxide::cdp::browser_protocol::target::GetBrowserContextsParams;

    #[test]
    fn test_browser_config_with_explicit_executable() {
        let options = LaunchOptions::new().with_executable("/opt/chromium/chrome");
        assert!(browser_config(&options).is_ok());
    }

    #[test]
    fn test_document_status_success_range() {
        assert!(check_document_status("http://a.test/", 200).is_ok());
        assert!(check_document_status("http://a.test/", 304).is_ok());
    }

    #[test]
    fn test_document_status_errors() {
        for status in [404, 500] {
            let err = check_document_status("http://a.test/missing", status).unwrap_err();
            match err {
                Error::Navigation { url, reason } => {
                    assert_eq!(url, "http://a.test/missing");
                    assert_eq!(reason, format!("HTTP status {}", status));
                }
                other => panic!("unexpected error {:?}", other),
            }
        }
        assert!(check_document_status("http://a.test/", 199).is_err());
        assert!(check_document_status("http://a.test/", 400).is_err());
    }

    #[test]
    fn test_network_idle_requires_document_loader() {
        let document = LoaderId::new("loader-2");
        let blank = LoaderId::new("loader-1");

        assert!(is_network_idle("networkIdle", &document, &document));
        assert!(!is_network_idle("networkIdle", &blank, &document));
        assert!(!is_network_idle("load", &document, &document));
    }

    #[tokio::test]
    async fn test_handler_stopped_when_close_fails() {
        let task = tokio::spawn(futures::future::pending::<()>());
        let abort = task.abort_handle();

        let result = release_handler(task, Err(Error::Launch("wait failed".to_string())));
        assert!(matches!(result, Err(Error::Launch(_))));

        for _ in 0..10 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }

    async fn context_count(session: &ChromiumSession) -> usize {
        session
            .browser
            .execute(GetBrowserContextsParams::default())
            .await
            .unwrap()
            .result
            .browser_context_ids
            .len()
    }

    #[tokio::test]
    #[ignore = "needs a Chromium binary in CHROME_PATH"]
    async fn test_each_page_gets_a_disposed_context() {
        let chrome = std::env::var("CHROME_PATH").expect("CHROME_PATH not set");
        let config = browser_config(&LaunchOptions::new().with_executable(chrome)).unwrap();
        let (browser, mut handler) = Browser::launch(config).await.unwrap();
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });
        let session = ChromiumSession {
            browser,
            handler_task,
        };

        let before = context_count(&session).await;
        let first = session.open_page().await.unwrap();
        let second = session.open_page().await.unwrap();
        assert_eq!(context_count(&session).await, before + 2);

        first.close().await.unwrap();
        second.close().await.unwrap();
        assert_eq!(context_count(&session).await, before);

        Box::new(session).close().await.unwrap();
    }
}
