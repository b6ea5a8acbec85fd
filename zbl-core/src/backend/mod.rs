//! The capture backend seam.
//!
//! Pixel capture itself is done by an external collaborator
//! (Windows.Graphics.Capture).  The rest of the crate only talks to it
//! through [`CaptureBackend`], so the dispatcher can be driven by a test
//! double and the crate builds on platforms without WGC.

#[cfg(windows)]
pub mod wgc;

use serde::Serialize;

use crate::display::DisplayInfo;
use crate::frame::Frame;
use crate::options::CaptureOptions;
use crate::window::WindowInfo;

/// Opaque backend failure; only its message is ever inspected.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Everything `--list` prints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TargetListing {
    pub displays: Vec<DisplayInfo>,
    pub windows: Vec<WindowInfo>,
}

/// A capture-and-present implementation.
pub trait CaptureBackend {
    /// Capture the target described by `options` and keep going until the
    /// target closes.  Blocks the caller for the whole session.
    fn capture_and_show(&mut self, options: &CaptureOptions) -> Result<(), BackendError>;

    /// Capture a single frame from the target.
    fn snapshot(&mut self, options: &CaptureOptions) -> Result<Frame, BackendError>;

    /// Enumerate capturable displays and windows.
    fn list_targets(&mut self) -> Result<TargetListing, BackendError>;
}

/// Stand-in used where Windows.Graphics.Capture does not exist.
#[derive(Debug, Default)]
pub struct UnsupportedBackend;

impl UnsupportedBackend {
    const MESSAGE: &'static str =
        "window/display capture requires Windows 10 1903 or later (Windows.Graphics.Capture)";
}

impl CaptureBackend for UnsupportedBackend {
    fn capture_and_show(&mut self, _options: &CaptureOptions) -> Result<(), BackendError> {
        Err(Self::MESSAGE.into())
    }

    fn snapshot(&mut self, _options: &CaptureOptions) -> Result<Frame, BackendError> {
        Err(Self::MESSAGE.into())
    }

    fn list_targets(&mut self) -> Result<TargetListing, BackendError> {
        Err(Self::MESSAGE.into())
    }
}

/// The backend for the current platform.
#[cfg(windows)]
pub fn default_backend() -> Box<dyn CaptureBackend> {
    Box::new(wgc::WgcBackend::new())
}

/// The backend for the current platform.
#[cfg(not(windows))]
pub fn default_backend() -> Box<dyn CaptureBackend> {
    Box::new(UnsupportedBackend)
}
