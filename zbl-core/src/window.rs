//! Window enumeration and title matching.
//!
//! Enumeration goes through Win32 `EnumWindows` and is only available on
//! Windows; title matching is plain Rust and works everywhere.  All
//! functions return owned structs, never raw handles.

use serde::Serialize;

/// Owned snapshot of a capturable top-level window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowInfo {
    pub hwnd: isize,
    pub title: String,
    pub class_name: String,
    pub pid: u32,
}

/// Pick the window to capture for `name`.
///
/// An exact title match wins; otherwise the first window (in enumeration
/// order, i.e. Z-order) whose title contains `name`.  Matching is
/// case-sensitive.
pub fn select_window<'a>(windows: &'a [WindowInfo], name: &str) -> Option<&'a WindowInfo> {
    windows
        .iter()
        .find(|w| w.title == name)
        .or_else(|| windows.iter().find(|w| w.title.contains(name)))
}

#[cfg(windows)]
pub use platform::{find_window, list_windows};

#[cfg(windows)]
mod platform {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;

    use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetClassNameW, GetWindowLongW, GetWindowTextLengthW, GetWindowTextW,
        GetWindowThreadProcessId, IsWindowVisible, GWL_EXSTYLE, WS_EX_TOOLWINDOW,
    };

    use super::{select_window, WindowInfo};
    use crate::errors::ZblError;

    /// Read the window title.
    fn read_window_title(hwnd: HWND) -> String {
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; (len + 1) as usize];
        let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
        if copied <= 0 {
            return String::new();
        }
        OsString::from_wide(&buf[..copied as usize])
            .to_string_lossy()
            .into_owned()
    }

    /// Read the window class name (up to 256 chars).
    fn read_class_name(hwnd: HWND) -> String {
        let mut buf = [0u16; 256];
        let len = unsafe { GetClassNameW(hwnd, &mut buf) };
        if len <= 0 {
            return String::new();
        }
        OsString::from_wide(&buf[..len as usize])
            .to_string_lossy()
            .into_owned()
    }

    /// Get the process ID for a window handle.
    fn read_pid(hwnd: HWND) -> u32 {
        let mut pid: u32 = 0;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
        pid
    }

    /// Visible, titled, and not a tool window.
    fn is_capturable(hwnd: HWND) -> bool {
        if !unsafe { IsWindowVisible(hwnd) }.as_bool() {
            return false;
        }
        let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;
        if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
            return false;
        }
        let title_len = unsafe { GetWindowTextLengthW(hwnd) };
        title_len > 0
    }

    /// Callback for EnumWindows that collects capturable window handles.
    unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let handles = unsafe { &mut *(lparam.0 as *mut Vec<HWND>) };
        if is_capturable(hwnd) {
            handles.push(hwnd);
        }
        TRUE
    }

    /// Enumerate capturable top-level windows in Z-order.
    pub fn list_windows() -> Result<Vec<WindowInfo>, ZblError> {
        let mut handles: Vec<HWND> = Vec::with_capacity(64);
        let result = unsafe {
            EnumWindows(
                Some(enum_callback),
                LPARAM(&mut handles as *mut Vec<HWND> as isize),
            )
        };
        result.map_err(|e| ZblError::BackendFailure(format!("EnumWindows failed: {e}")))?;

        Ok(handles
            .into_iter()
            .map(|hwnd| WindowInfo {
                hwnd: hwnd.0 as isize,
                title: read_window_title(hwnd),
                class_name: read_class_name(hwnd),
                pid: read_pid(hwnd),
            })
            .collect())
    }

    /// Resolve `name` against the live window list.
    pub fn find_window(name: &str) -> Result<WindowInfo, ZblError> {
        let windows = list_windows()?;
        log::debug!("matching '{name}' against {} window(s)", windows.len());
        select_window(&windows, name)
            .cloned()
            .ok_or_else(|| ZblError::BackendFailure(format!("no window matching '{name}'")))
    }
}
