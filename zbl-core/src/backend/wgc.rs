//! Windows.Graphics.Capture backend.
//!
//! Session management (D3D11 device, frame pool, capture session, the
//! free-threaded frame callback) is delegated to the `windows-capture`
//! crate.  This module only resolves the [`CaptureTarget`] to a WGC
//! capture item and decides what to do with each arriving frame:
//!
//! - [`WgcBackend::capture_and_show`] counts frames and logs the capture
//!   rate about once a second until the target closes.
//! - [`WgcBackend::snapshot`] stops the session after the first frame and
//!   hands the pixels back over a bounded channel.
//!
//! `GraphicsCaptureApiHandler::start` pumps messages on the calling
//! thread and blocks until the session stops.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use windows_capture::{
    capture::{Context, GraphicsCaptureApiHandler},
    frame::Frame as WgcFrame,
    graphics_capture_api::InternalCaptureControl,
    monitor::Monitor,
    settings::{
        ColorFormat, CursorCaptureSettings, DirtyRegionSettings, DrawBorderSettings,
        MinimumUpdateIntervalSettings, SecondaryWindowSettings, Settings,
    },
    window::Window,
};

use super::{BackendError, CaptureBackend, TargetListing};
use crate::display::{resolve_display_index, DisplayInfo};
use crate::dpi::enable_dpi_awareness;
use crate::frame::Frame;
use crate::options::{CaptureOptions, CaptureTarget};
use crate::stats::FpsMeter;
use crate::window::{find_window, list_windows};

/// How long [`WgcBackend::snapshot`] waits for the first frame.
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(5);

type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A resolved WGC capture item.
enum Item {
    Window(Window),
    Monitor(Monitor),
}

fn cursor_settings(capture_cursor: bool) -> CursorCaptureSettings {
    if capture_cursor {
        CursorCaptureSettings::WithCursor
    } else {
        CursorCaptureSettings::WithoutCursor
    }
}

fn enumerate_monitors() -> Result<Vec<Monitor>, BackendError> {
    Monitor::enumerate().map_err(|e| format!("failed to enumerate displays: {e:?}").into())
}

fn resolve_item(options: &CaptureOptions) -> Result<Item, BackendError> {
    match options.target() {
        CaptureTarget::Window(name) => {
            let info = find_window(&name)?;
            log::info!(
                "capturing window '{}' (hwnd 0x{:X}, pid {})",
                info.title,
                info.hwnd,
                info.pid
            );
            let window = Window::from_raw_hwnd(info.hwnd as *mut std::ffi::c_void);
            if !window.is_valid() {
                return Err(format!("window '{}' is not capturable", info.title).into());
            }
            Ok(Item::Window(window))
        }
        CaptureTarget::Display(id) => {
            let mut monitors = enumerate_monitors()?;
            let index = resolve_display_index(id, monitors.len())?;
            log::info!("capturing display {index}");
            Ok(Item::Monitor(monitors.swap_remove(index)))
        }
        CaptureTarget::PrimaryDisplay => {
            let mut monitors = enumerate_monitors()?;
            let index = resolve_display_index(0, monitors.len())?;
            log::info!("no target given; capturing display {index}");
            Ok(Item::Monitor(monitors.swap_remove(index)))
        }
    }
}

/// Build settings for `item` and hand them to `run`.
///
/// `Settings` is generic over the capture item type, so the two item
/// kinds cannot share one binding.
fn with_settings<F, R>(
    item: Item,
    capture_cursor: bool,
    flags: F,
    run: impl FnOnce(SettingsFor<F>) -> R,
) -> R
where
    F: Send + 'static,
{
    let cursor = cursor_settings(capture_cursor);
    match item {
        Item::Window(window) => run(SettingsFor::Window(Settings::new(
            window,
            cursor,
            DrawBorderSettings::Default,
            SecondaryWindowSettings::Default,
            MinimumUpdateIntervalSettings::Default,
            DirtyRegionSettings::Default,
            ColorFormat::Bgra8,
            flags,
        ))),
        Item::Monitor(monitor) => run(SettingsFor::Monitor(Settings::new(
            monitor,
            cursor,
            DrawBorderSettings::Default,
            SecondaryWindowSettings::Default,
            MinimumUpdateIntervalSettings::Default,
            DirtyRegionSettings::Default,
            ColorFormat::Bgra8,
            flags,
        ))),
    }
}

enum SettingsFor<F> {
    Window(Settings<F, Window>),
    Monitor(Settings<F, Monitor>),
}

impl<F: Send + 'static> SettingsFor<F> {
    /// Run a capture session with handler `H` until it stops.
    fn start<H>(self) -> Result<(), BackendError>
    where
        H: GraphicsCaptureApiHandler<Flags = F, Error = HandlerError> + Send + 'static,
    {
        let result = match self {
            SettingsFor::Window(s) => H::start(s),
            SettingsFor::Monitor(s) => H::start(s),
        };
        result.map_err(|e| format!("capture session failed: {e:?}").into())
    }
}

// ---------------------------------------------------------------------------
// Streaming handler
// ---------------------------------------------------------------------------

/// Counts frames and reports the capture rate.
struct StreamHandler {
    meter: FpsMeter,
    total_frames: u64,
}

impl GraphicsCaptureApiHandler for StreamHandler {
    type Flags = ();
    type Error = HandlerError;

    fn new(_ctx: Context<Self::Flags>) -> Result<Self, Self::Error> {
        Ok(Self {
            meter: FpsMeter::new(Instant::now()),
            total_frames: 0,
        })
    }

    fn on_frame_arrived(
        &mut self,
        frame: &mut WgcFrame,
        _capture_control: InternalCaptureControl,
    ) -> Result<(), Self::Error> {
        self.total_frames += 1;
        if self.total_frames == 1 {
            log::debug!("first frame: {}x{}", frame.width(), frame.height());
        }
        if let Some(fps) = self.meter.record(Instant::now()) {
            log::info!("capture fps: {fps:.3}");
        }
        Ok(())
    }

    fn on_closed(&mut self) -> Result<(), Self::Error> {
        log::info!(
            "capture target closed after {} frame(s)",
            self.total_frames
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Single-frame handler
// ---------------------------------------------------------------------------

type SnapshotMessage = Result<Frame, String>;

/// Sends the first frame and stops the session.
struct SnapshotHandler {
    tx: mpsc::SyncSender<SnapshotMessage>,
}

impl GraphicsCaptureApiHandler for SnapshotHandler {
    type Flags = mpsc::SyncSender<SnapshotMessage>;
    type Error = HandlerError;

    fn new(ctx: Context<Self::Flags>) -> Result<Self, Self::Error> {
        Ok(Self { tx: ctx.flags })
    }

    fn on_frame_arrived(
        &mut self,
        frame: &mut WgcFrame,
        capture_control: InternalCaptureControl,
    ) -> Result<(), Self::Error> {
        let mut buffer = frame.buffer().map_err(|e| format!("{e:?}"))?;
        let width = buffer.width();
        let height = buffer.height();
        // Scratch space for rows that carry GPU alignment padding.
        let mut scratch = Vec::new();
        let data = buffer.as_nopadding_buffer(&mut scratch).to_vec();

        let message = Frame::from_bgra(width, height, data).map_err(|e| e.to_string());
        let _ = self.tx.send(message);
        capture_control.stop();
        Ok(())
    }

    fn on_closed(&mut self) -> Result<(), Self::Error> {
        let _ = self
            .tx
            .try_send(Err("capture target closed before a frame arrived".into()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// [`CaptureBackend`] backed by Windows.Graphics.Capture.
#[derive(Debug)]
pub struct WgcBackend;

impl WgcBackend {
    /// Makes the process DPI aware so frame sizes match physical pixels.
    pub fn new() -> Self {
        enable_dpi_awareness();
        Self
    }
}

impl Default for WgcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for WgcBackend {
    fn capture_and_show(&mut self, options: &CaptureOptions) -> Result<(), BackendError> {
        let item = resolve_item(options)?;
        with_settings(item, options.capture_cursor, (), |settings| {
            settings.start::<StreamHandler>()
        })
    }

    fn snapshot(&mut self, options: &CaptureOptions) -> Result<Frame, BackendError> {
        let item = resolve_item(options)?;
        let (tx, rx) = mpsc::sync_channel::<SnapshotMessage>(1);

        let handle = with_settings(item, options.capture_cursor, tx, |settings| {
            std::thread::spawn(move || settings.start::<SnapshotHandler>())
        });

        let frame = match rx.recv_timeout(SNAPSHOT_TIMEOUT) {
            Ok(frame) => frame,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return Err(format!("no frame within {}s", SNAPSHOT_TIMEOUT.as_secs()).into());
            }
            // Sender dropped without a frame: the session never started.
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return match handle.join() {
                    Ok(Err(e)) => Err(e),
                    _ => Err("capture session ended without a frame".into()),
                };
            }
        };

        match handle.join() {
            Ok(Err(e)) => log::warn!("snapshot session ended with error: {e}"),
            Err(_) => log::warn!("snapshot capture thread panicked"),
            Ok(Ok(())) => {}
        }

        Ok(frame?)
    }

    fn list_targets(&mut self) -> Result<TargetListing, BackendError> {
        let displays = enumerate_monitors()?
            .into_iter()
            .enumerate()
            .map(|(index, m)| DisplayInfo {
                index,
                name: m.name().unwrap_or_else(|e| {
                    log::debug!("display {index}: name unavailable: {e:?}");
                    String::new()
                }),
                width: m.width().unwrap_or_else(|e| {
                    log::debug!("display {index}: width unavailable: {e:?}");
                    0
                }),
                height: m.height().unwrap_or_else(|e| {
                    log::debug!("display {index}: height unavailable: {e:?}");
                    0
                }),
            })
            .collect();

        Ok(TargetListing {
            displays,
            windows: list_windows()?,
        })
    }
}
