//! `zbl_core` -- core library for the `zbl` capture tool.
//!
//! The crate turns a command line into an immutable [`options::CaptureOptions`]
//! and hands it to a capture backend exactly once.  Pixel capture itself is
//! performed by Windows.Graphics.Capture (via `windows-capture`) behind the
//! [`backend::CaptureBackend`] trait; everything else builds and is tested on
//! any platform.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `ZblError` enum via `thiserror` |
//! | [`args`] | `clap` parsing and validation into an `Invocation` |
//! | [`options`] | `CaptureOptions` and target resolution |
//! | [`dispatch`] | Single backend invocation per request |
//! | [`backend`] | `CaptureBackend` trait, WGC implementation |
//! | [`frame`] | BGRA frames and PNG encoding via `image` |
//! | [`stats`] | Capture FPS accounting |
//! | [`window`] | Window enumeration (`EnumWindows`) and title matching |
//! | [`display`] | Display descriptions and index resolution |
//! | [`dpi`] | Per-monitor DPI awareness |

pub mod args;
pub mod backend;
pub mod dispatch;
pub mod display;
pub mod dpi;
pub mod errors;
pub mod frame;
pub mod options;
pub mod stats;
pub mod window;
