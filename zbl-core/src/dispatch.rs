//! Capture request dispatch.
//!
//! [`dispatch`] hands a validated [`CaptureOptions`] to the backend exactly
//! once and converts whatever the backend reports into a [`ZblError`].
//! There is no retry and no timeout at this layer; the call blocks for as
//! long as the backend keeps the session open.
//!
//! [`run`] is the entry point used by the binary: it routes an
//! [`Invocation`] to the right backend call for its [`Mode`].

use std::io::Write;

use crate::args::{Invocation, Mode};
use crate::backend::{BackendError, CaptureBackend};
use crate::errors::ZblError;
use crate::options::CaptureOptions;

fn backend_failure(err: BackendError) -> ZblError {
    ZblError::BackendFailure(err.to_string())
}

/// Invoke `backend.capture_and_show(options)` once.
pub fn dispatch(
    options: &CaptureOptions,
    backend: &mut dyn CaptureBackend,
) -> Result<(), ZblError> {
    log::debug!("dispatching capture request: {options:?}");
    backend.capture_and_show(options).map_err(backend_failure)
}

/// Execute `invocation` against `backend`.
///
/// `--list` output (pretty JSON) is written to `out`.
pub fn run(
    invocation: &Invocation,
    backend: &mut dyn CaptureBackend,
    out: &mut dyn Write,
) -> Result<(), ZblError> {
    match &invocation.mode {
        Mode::Show => dispatch(&invocation.options, backend),
        Mode::Snapshot(path) => {
            let frame = backend
                .snapshot(&invocation.options)
                .map_err(backend_failure)?;
            frame.save_png(path)?;
            log::info!(
                "wrote {}x{} frame to {}",
                frame.width,
                frame.height,
                path.display()
            );
            Ok(())
        }
        Mode::List => {
            let listing = backend.list_targets().map_err(backend_failure)?;
            let json = serde_json::to_string_pretty(&listing)
                .map_err(|e| ZblError::BackendFailure(format!("JSON encoding failed: {e}")))?;
            writeln!(out, "{json}")
                .map_err(|e| ZblError::BackendFailure(format!("failed to write listing: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{parse_args, ParseOutcome};
    use crate::backend::TargetListing;
    use crate::display::DisplayInfo;
    use crate::frame::Frame;
    use crate::window::WindowInfo;

    /// Records every call and answers with canned results.
    #[derive(Default)]
    struct MockBackend {
        shown: Vec<CaptureOptions>,
        snapshots: Vec<CaptureOptions>,
        listed: usize,
        fail_with: Option<String>,
    }

    impl MockBackend {
        fn failing(msg: &str) -> Self {
            Self {
                fail_with: Some(msg.into()),
                ..Default::default()
            }
        }

        fn outcome(&self) -> Result<(), BackendError> {
            match &self.fail_with {
                Some(msg) => Err(msg.clone().into()),
                None => Ok(()),
            }
        }
    }

    impl CaptureBackend for MockBackend {
        fn capture_and_show(&mut self, options: &CaptureOptions) -> Result<(), BackendError> {
            self.shown.push(options.clone());
            self.outcome()
        }

        fn snapshot(&mut self, options: &CaptureOptions) -> Result<Frame, BackendError> {
            self.snapshots.push(options.clone());
            self.outcome()?;
            Ok(Frame::from_bgra(1, 1, vec![10, 20, 30, 255])?)
        }

        fn list_targets(&mut self) -> Result<TargetListing, BackendError> {
            self.listed += 1;
            self.outcome()?;
            Ok(TargetListing {
                displays: vec![DisplayInfo {
                    index: 0,
                    name: "DISPLAY1".into(),
                    width: 1920,
                    height: 1080,
                }],
                windows: vec![WindowInfo {
                    hwnd: 0x1234,
                    title: "Terminal".into(),
                    class_name: "CASCADIA_HOSTING_WINDOW_CLASS".into(),
                    pid: 77,
                }],
            })
        }
    }

    fn invocation(tokens: &[&str]) -> Result<Invocation, ZblError> {
        let mut argv = vec!["zbl"];
        argv.extend_from_slice(tokens);
        match parse_args(argv)? {
            ParseOutcome::Run(inv) => Ok(inv),
            ParseOutcome::Exit(text) => panic!("unexpected early exit: {text}"),
        }
    }

    /// Parse then run, the way the binary does.
    fn parse_and_run(tokens: &[&str], backend: &mut MockBackend) -> Result<Vec<u8>, ZblError> {
        let inv = invocation(tokens)?;
        let mut out = Vec::new();
        run(&inv, backend, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_dispatch_calls_backend_once() {
        let mut backend = MockBackend::default();
        let opts = CaptureOptions {
            display_id: Some(0),
            ..Default::default()
        };
        dispatch(&opts, &mut backend).unwrap();
        assert_eq!(backend.shown, vec![opts]);
    }

    #[test]
    fn test_dispatch_propagates_failure_verbatim() {
        let mut backend = MockBackend::failing("display 5 not found; system has 2 display(s)");
        let err = dispatch(&CaptureOptions::default(), &mut backend).unwrap_err();
        assert_eq!(
            err,
            ZblError::BackendFailure("display 5 not found; system has 2 display(s)".into())
        );
        assert_eq!(err.exit_code(), 1);
        assert_eq!(backend.shown.len(), 1, "no retry");
    }

    #[test]
    fn test_scenario_display_zero_end_to_end() {
        let mut backend = MockBackend::default();
        parse_and_run(&["--display-id", "0"], &mut backend).unwrap();
        assert_eq!(
            backend.shown,
            vec![CaptureOptions {
                window_name: None,
                display_id: Some(0),
                capture_cursor: false,
            }]
        );
    }

    #[test]
    fn test_scenario_window_with_cursor_end_to_end() {
        let mut backend = MockBackend::default();
        parse_and_run(&["--window-name", "Terminal", "--capture-cursor"], &mut backend).unwrap();
        assert_eq!(
            backend.shown,
            vec![CaptureOptions {
                window_name: Some("Terminal".into()),
                display_id: None,
                capture_cursor: true,
            }]
        );
    }

    #[test]
    fn test_scenario_bad_display_id_never_dispatches() {
        let mut backend = MockBackend::default();
        let err = parse_and_run(&["--display-id", "abc"], &mut backend).unwrap_err();
        assert!(matches!(err, ZblError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(backend.shown.is_empty());
    }

    #[test]
    fn test_both_targets_passed_through_unchanged() {
        let mut backend = MockBackend::default();
        parse_and_run(&["--display-id", "1", "--window-name", "Paint"], &mut backend).unwrap();
        assert_eq!(backend.shown[0].window_name.as_deref(), Some("Paint"));
        assert_eq!(backend.shown[0].display_id, Some(1));
    }

    #[test]
    fn test_list_writes_json() {
        let mut backend = MockBackend::default();
        let out = parse_and_run(&["--list"], &mut backend).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["displays"][0]["width"], 1920);
        assert_eq!(value["windows"][0]["title"], "Terminal");
        assert_eq!(backend.listed, 1);
        assert!(backend.shown.is_empty());
    }

    #[test]
    fn test_list_failure() {
        let mut backend = MockBackend::failing("EnumWindows failed");
        let err = parse_and_run(&["--list"], &mut backend).unwrap_err();
        assert_eq!(err, ZblError::BackendFailure("EnumWindows failed".into()));
    }

    #[test]
    fn test_snapshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let path_str = path.to_str().unwrap();

        let mut backend = MockBackend::default();
        parse_and_run(&["--snapshot", path_str, "--capture-cursor"], &mut backend).unwrap();

        assert!(backend.snapshots[0].capture_cursor);
        assert!(backend.shown.is_empty());
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0, [30, 20, 10, 255]);
    }

    #[test]
    fn test_snapshot_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");

        let mut backend = MockBackend::failing("no window matching 'Nope'");
        let err = parse_and_run(
            &["--snapshot", path.to_str().unwrap(), "--window-name", "Nope"],
            &mut backend,
        )
        .unwrap_err();
        assert_eq!(err, ZblError::BackendFailure("no window matching 'Nope'".into()));
        assert!(!path.exists());
    }
}
