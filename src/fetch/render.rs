// src/fetch/render.rs
// =============================================================================
// Rendering fetcher: loads each page in headless Chromium and returns the
// DOM after client-side scripts have run.
//
// chromiumoxide talks to the browser over the DevTools protocol. The
// protocol handler is a stream that must be polled for the browser to make
// progress, so we drive it on its own tokio task.
//
// Every tab is owned by a TabGuard. The tab is closed explicitly on the
// normal path, and by the guard's Drop when the fetch is abandoned (for
// example when the per-page timeout fires mid-navigation). The browser
// itself is closed by shutdown(), which the caller runs even when the
// crawl was interrupted.
//
// Non-2xx responses are errors here too: the status of the main document
// response is read from the Network.responseReceived events of the tab.
// =============================================================================

use super::PageFetcher;
use crate::error::FetchError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EventResponseReceived, ResourceType};
use chromiumoxide::Page;
use futures::{FutureExt, Stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

pub struct RenderingFetcher {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
    timeout: Duration,
}

impl RenderingFetcher {
    pub async fn launch(timeout: Duration) -> Result<Self, FetchError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|message| FetchError::Browser {
                url: "about:blank".to_string(),
                message,
            })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| FetchError::Browser {
                    url: "about:blank".to_string(),
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("headless browser launched");

        Ok(Self {
            browser,
            handler: Some(handle),
            timeout,
        })
    }

    async fn render(&self, url: &Url) -> Result<String, FetchError> {
        let browser_error = |e: chromiumoxide::error::CdpError| FetchError::Browser {
            url: url.to_string(),
            message: e.to_string(),
        };

        // Open a blank tab first so the response listener is in place
        // before navigation starts.
        let page = self.browser.new_page("about:blank").await.map_err(browser_error)?;
        let tab = TabGuard::new(page.clone(), url);

        let result = async {
            let mut responses = page
                .event_listener::<EventResponseReceived>()
                .await
                .map_err(browser_error)?;
            page.goto(url.as_str()).await.map_err(browser_error)?;

            check_status(url, document_status(&mut responses))?;
            page.content().await.map_err(browser_error)
        }
        .await;

        tab.close().await;
        result
    }
}

#[async_trait]
impl PageFetcher for RenderingFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match tokio::time::timeout(self.timeout, self.render(url)).await {
            Ok(result) => result,
            // render() was dropped; its TabGuard closes the tab
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    async fn shutdown(&mut self) -> Result<(), FetchError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "browser process did not exit cleanly");
        }
        if let Some(handle) = self.handler.take() {
            let _ = handle.await;
        }
        debug!("headless browser closed");

        closed.map(|_| ()).map_err(|e| FetchError::Browser {
            url: "about:blank".to_string(),
            message: e.to_string(),
        })
    }
}

// Status of the first document response already delivered to the tab.
// Redirect hops are not reported as responseReceived, so this is the final
// response of the navigation.
fn document_status<S>(responses: &mut S) -> Option<i64>
where
    S: Stream<Item = Arc<EventResponseReceived>> + Unpin,
{
    while let Some(Some(event)) = responses.next().now_or_never() {
        if event.r#type == ResourceType::Document {
            return Some(event.response.status);
        }
    }
    None
}

// Same rule as the plain HTTP fetcher: anything outside 2xx is an error.
// A navigation with no recorded response (served from cache, about: URLs)
// is accepted.
fn check_status(url: &Url, status: Option<i64>) -> Result<(), FetchError> {
    match status {
        Some(code) if !(200..300).contains(&code) => Err(FetchError::Status {
            url: url.to_string(),
            status: u16::try_from(code).unwrap_or(0),
        }),
        _ => Ok(()),
    }
}

/// A browser tab that can be closed asynchronously.
#[async_trait]
trait Tab: Send + Sized + 'static {
    async fn close_tab(self) -> Result<(), String>;
}

#[async_trait]
impl Tab for Page {
    async fn close_tab(self) -> Result<(), String> {
        self.close().await.map_err(|e| e.to_string())
    }
}

// Owns a tab until it is closed. Dropping the guard without calling
// close() hands the tab to a background task that closes it.
struct TabGuard<T: Tab> {
    tab: Option<T>,
    url: String,
}

impl<T: Tab> TabGuard<T> {
    fn new(tab: T, url: &Url) -> Self {
        Self {
            tab: Some(tab),
            url: url.to_string(),
        }
    }

    async fn close(mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close_tab().await {
                warn!(url = %self.url, error = %e, "failed to close browser tab");
            }
        }
    }
}

impl<T: Tab> Drop for TabGuard<T> {
    fn drop(&mut self) {
        let Some(tab) = self.tab.take() else {
            return;
        };
        let url = std::mem::take(&mut self.url);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    match tab.close_tab().await {
                        Ok(()) => debug!(url = %url, "abandoned browser tab closed"),
                        Err(e) => warn!(url = %url, error = %e, "failed to close abandoned browser tab"),
                    }
                });
            }
            Err(_) => warn!(url = %url, "no runtime left to close browser tab"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // Reports every close through a channel.
    struct FakeTab {
        closed: mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl Tab for FakeTab {
        async fn close_tab(self) -> Result<(), String> {
            let _ = self.closed.send(());
            Ok(())
        }
    }

    fn page_url() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    #[tokio::test]
    async fn test_tab_is_closed_when_fetch_times_out() {
        let (closed, mut closes) = mpsc::unbounded_channel();

        let stuck = async {
            let _tab = TabGuard::new(FakeTab { closed }, &page_url());
            // Navigation that never finishes
            std::future::pending::<()>().await;
        };
        assert!(tokio::time::timeout(Duration::from_millis(20), stuck).await.is_err());

        let received = tokio::time::timeout(Duration::from_secs(1), closes.recv()).await;
        assert_eq!(received.unwrap(), Some(()));
    }

    #[tokio::test]
    async fn test_explicit_close_closes_exactly_once() {
        let (closed, mut closes) = mpsc::unbounded_channel();

        TabGuard::new(FakeTab { closed }, &page_url()).close().await;

        // All senders are gone once the guard is consumed
        let mut count = 0;
        while closes.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_non_2xx_document_is_an_error() {
        let url = page_url();
        assert!(matches!(
            check_status(&url, Some(404)),
            Err(FetchError::Status { status: 404, .. })
        ));
        assert!(matches!(
            check_status(&url, Some(500)),
            Err(FetchError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_2xx_or_unknown_status_is_accepted() {
        let url = page_url();
        assert!(check_status(&url, Some(200)).is_ok());
        assert!(check_status(&url, Some(204)).is_ok());
        assert!(check_status(&url, None).is_ok());
    }
}
