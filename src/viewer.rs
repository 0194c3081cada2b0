//! PDF preview navigator.
//!
//! Bounded page/zoom state machine layered over a displayed document, with
//! a soft load watchdog: if the render settles neither way inside the
//! deadline the preview is marked timed out, without any guarantee the
//! underlying transfer was aborted.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 2.0;
pub const SCALE_STEP: f32 = 0.2;

/// Why the preview failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("PDF preview timed out")]
    Timeout,
    #[error("{0}")]
    Render(String),
}

/// How the preview was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Backdrop,
    Escape,
}

/// Preview state for one displayed document
#[derive(Debug)]
pub struct PdfViewer {
    page: u32,
    num_pages: Option<u32>,
    scale: f32,
    loading: bool,
    error: Option<ViewerError>,
    /// Render payload; held only while the preview is open
    data: Option<Vec<u8>>,
    watchdog: Option<JoinHandle<()>>,
    closed: bool,
}

impl PdfViewer {
    /// Open a preview in its loading state
    pub fn open() -> Self {
        Self {
            page: 1,
            num_pages: None,
            scale: 1.0,
            loading: true,
            error: None,
            data: None,
            watchdog: None,
            closed: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn num_pages(&self) -> Option<u32> {
        self.num_pages
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ViewerError> {
        self.error.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The render reported success
    pub fn on_render_success(&mut self, num_pages: u32, data: Vec<u8>) {
        if self.closed {
            return;
        }
        self.loading = false;
        self.error = None;
        self.num_pages = Some(num_pages.max(1));
        self.page = 1;
        self.data = Some(data);
        self.disarm_watchdog();
    }

    /// The render reported failure
    pub fn on_render_failure(&mut self, detail: impl Into<String>) {
        if self.closed {
            return;
        }
        self.loading = false;
        self.error = Some(ViewerError::Render(detail.into()));
        self.disarm_watchdog();
    }

    /// The watchdog fired; only counts if the render never settled
    pub fn on_watchdog_fired(&mut self) {
        if self.loading && !self.closed {
            debug!("preview watchdog fired before render settled");
            self.loading = false;
            self.error = Some(ViewerError::Timeout);
        }
    }

    /// Go to the previous page; clamps at 1, no wraparound
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Go to the next page; clamps at the last page, no wraparound
    pub fn next_page(&mut self) {
        if let Some(total) = self.num_pages {
            self.page = (self.page + 1).min(total);
        }
    }

    /// Direct page entry: applied only when in range, otherwise silently
    /// ignored (no clamping, no error).
    pub fn set_page(&mut self, requested: u32) {
        if let Some(total) = self.num_pages {
            if requested >= 1 && requested <= total {
                self.page = requested;
            }
        }
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + SCALE_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - SCALE_STEP).max(MIN_SCALE);
    }

    /// Dismiss the preview. Every close path lands here and releases the
    /// render payload and the watchdog.
    pub fn close(&mut self, reason: CloseReason) {
        debug!(?reason, "closing preview");
        self.closed = true;
        self.loading = false;
        self.data = None;
        self.disarm_watchdog();
    }

    /// Whether the transient render payload is currently held
    pub fn holds_render_data(&self) -> bool {
        self.data.is_some()
    }

    fn set_watchdog(&mut self, handle: JoinHandle<()>) {
        self.disarm_watchdog();
        self.watchdog = Some(handle);
    }

    fn disarm_watchdog(&mut self) {
        if let Some(handle) = self.watchdog.take() {
            handle.abort();
        }
    }
}

impl Drop for PdfViewer {
    fn drop(&mut self) {
        self.disarm_watchdog();
    }
}

/// Open a shared preview with an armed watchdog.
///
/// The timer holds only a weak handle, so dropping the viewer cancels the
/// countdown implicitly as well.
pub async fn open_with_watchdog(timeout: Duration) -> Arc<Mutex<PdfViewer>> {
    let viewer = Arc::new(Mutex::new(PdfViewer::open()));
    let weak = Arc::downgrade(&viewer);

    let handle = tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        if let Some(viewer) = weak.upgrade() {
            viewer.lock().await.on_watchdog_fired();
        }
    });

    viewer.lock().await.set_watchdog(handle);
    viewer
}
