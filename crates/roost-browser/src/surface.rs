use crate::Result;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::{
    EnableParams as PageEnableParams, EventFrameNavigated, EventLoadEventFired, ReloadParams,
};
use chromiumoxide::cdp::js_protocol::runtime::{
    AddBindingParams, EnableParams as RuntimeEnableParams, EventBindingCalled,
};
use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};

/// Host function the injected script calls to send a message back to
/// us. Registered as a CDP binding on the portal page; survives
/// navigations.
pub const MESSAGE_BINDING: &str = "__roostPost";

/// Raw event observed on the portal page. Classification into session
/// events happens on the consumer side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The main frame committed a navigation to this URL.
    Navigated(String),
    /// The current document finished loading.
    Loaded,
    /// The page called the message binding with this payload.
    Message(String),
}

/// Attaches to a running Chrome over CDP and turns page activity into
/// a stream of [`SurfaceEvent`]s.
pub struct PortalSurface {
    debugging_port: u16,
}

impl PortalSurface {
    pub fn new(debugging_port: u16) -> Self {
        Self { debugging_port }
    }

    /// Connect to Chrome and start watching the portal page.
    ///
    /// Returns a handle for driving the page and a receiver for the
    /// event stream. The stream ends when the handle shuts down or the
    /// browser goes away.
    pub async fn attach(&self) -> Result<(SurfaceHandle, mpsc::Receiver<SurfaceEvent>)> {
        tracing::info!(
            "Portal surface: connecting to Chrome on port {}",
            self.debugging_port
        );

        // Connect to Chrome via CDP with retries (Chrome may not be fully ready)
        let ws_url = format!("http://localhost:{}", self.debugging_port);
        let (browser, mut handler) = {
            let mut retries = 5;
            loop {
                tracing::debug!("Attempting CDP connection to {}...", ws_url);
                match Browser::connect(&ws_url).await {
                    Ok(result) => {
                        tracing::info!("CDP connection established");
                        break result;
                    }
                    Err(e) => {
                        retries -= 1;
                        if retries == 0 {
                            return Err(crate::Error::Cdp(format!(
                                "Failed to connect to Chrome after 5 attempts: {}",
                                e
                            )));
                        }
                        tracing::info!(
                            "CDP connection attempt failed, retrying... ({} left)",
                            retries
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                    }
                }
            }
        };

        // Spawn handler task IMMEDIATELY to process CDP protocol messages
        // This must run for browser.pages() and other commands to work
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        // Wait a bit for Chrome to create its initial page
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        let page = if let Some(page) = browser.pages().await?.first() {
            tracing::debug!("Portal surface: using existing page");
            page.clone()
        } else {
            tracing::debug!("Portal surface: no existing pages, creating new page");
            browser.new_page("about:blank").await?
        };

        // Enable the Page and Runtime domains and register the message
        // binding before any events can be missed
        page.execute(PageEnableParams::default()).await?;
        page.execute(RuntimeEnableParams::default()).await?;
        page.execute(AddBindingParams::new(MESSAGE_BINDING)).await?;

        tracing::info!("Portal surface: watching page events");

        let mut nav_events = page.event_listener::<EventFrameNavigated>().await?;
        let mut load_events = page.event_listener::<EventLoadEventFired>().await?;
        let mut binding_events = page.event_listener::<EventBindingCalled>().await?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let (event_tx, event_rx) = mpsc::channel::<SurfaceEvent>(64);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Check for shutdown signal first
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Portal surface: shutdown signal received");
                        break;
                    }
                    Some(event) = nav_events.next() => {
                        // Sub-frame navigations (ads, widgets) say nothing
                        // about the session
                        if event.frame.parent_id.is_some() {
                            continue;
                        }
                        let url = event.frame.url.clone();
                        tracing::debug!("Main frame navigated: {}", url);
                        if event_tx.send(SurfaceEvent::Navigated(url)).await.is_err() {
                            break;
                        }
                    }
                    Some(_) = load_events.next() => {
                        tracing::debug!("Page load finished");
                        if event_tx.send(SurfaceEvent::Loaded).await.is_err() {
                            break;
                        }
                    }
                    Some(event) = binding_events.next() => {
                        if event.name != MESSAGE_BINDING {
                            continue;
                        }
                        tracing::debug!("Page message: {:?}", event.payload);
                        if event_tx.send(SurfaceEvent::Message(event.payload.clone())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            handler_task.abort();
        });

        let handle = SurfaceHandle {
            _browser: browser,
            page,
            shutdown: Some(shutdown_tx),
        };

        Ok((handle, event_rx))
    }
}

/// Drives the attached portal page.
pub struct SurfaceHandle {
    // Keeps the CDP connection alive for as long as the handle exists
    _browser: Browser,
    page: Page,
    shutdown: Option<oneshot::Sender<()>>,
}

impl SurfaceHandle {
    /// Evaluate a script in the current document.
    pub async fn inject(&self, script: &str) -> Result<()> {
        self.page.evaluate(script).await?;
        Ok(())
    }

    /// Reload the current document. Used right after attaching, so the
    /// first load is observed through our own listeners.
    pub async fn reload(&self) -> Result<()> {
        self.page.execute(ReloadParams::default()).await?;
        Ok(())
    }

    /// Navigate the page to a URL.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    /// Stop the event stream. The browser process itself is left
    /// untouched.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
