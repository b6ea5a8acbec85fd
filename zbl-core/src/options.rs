//! The validated capture request.

use serde::Serialize;

/// User-selected capture parameters.
///
/// Built once by [`crate::args`] and never mutated afterwards.  No
/// relationship between `window_name` and `display_id` is enforced here;
/// the backend decides what to do when both (or neither) are set, see
/// [`CaptureOptions::target`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureOptions {
    /// Window title (or a substring of it) to capture.
    pub window_name: Option<String>,
    /// Zero-based display index to capture.
    pub display_id: Option<i64>,
    /// Draw the mouse cursor into captured frames.
    pub capture_cursor: bool,
}

/// What the backend should actually capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    Window(String),
    Display(i64),
    PrimaryDisplay,
}

impl CaptureOptions {
    /// Resolve the capture target.
    ///
    /// A window name wins over a display id; with neither set the primary
    /// display (index 0) is captured.
    pub fn target(&self) -> CaptureTarget {
        match (&self.window_name, self.display_id) {
            (Some(name), Some(id)) => {
                log::warn!(
                    "both --window-name '{name}' and --display-id {id} given; \
                     capturing the window and ignoring the display id"
                );
                CaptureTarget::Window(name.clone())
            }
            (Some(name), None) => CaptureTarget::Window(name.clone()),
            (None, Some(id)) => CaptureTarget::Display(id),
            (None, None) => CaptureTarget::PrimaryDisplay,
        }
    }
}
