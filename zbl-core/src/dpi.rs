//! Process DPI awareness.
//!
//! Without per-monitor DPI awareness Windows reports scaled (virtualised)
//! window and monitor sizes, so captured frames would not line up with
//! the reported dimensions on high-DPI displays.

/// Mark the process per-monitor DPI aware.
///
/// Failure is logged, not returned: it only happens when awareness was
/// already set (for example by an application manifest).
#[cfg(windows)]
pub fn enable_dpi_awareness() {
    use windows::Win32::UI::HiDpi::{SetProcessDpiAwareness, PROCESS_PER_MONITOR_DPI_AWARE};

    if let Err(e) = unsafe { SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) } {
        log::debug!("SetProcessDpiAwareness failed (already set?): {e}");
    }
}

/// No-op off Windows.
#[cfg(not(windows))]
pub fn enable_dpi_awareness() {}
