//! RustScan - barcode scan-session core
//!
//! Turns a noisy stream of raw barcode decodes into a clean, ordered list of
//! confirmed EAN-8/EAN-13 codes. A code is confirmed once the decoder has
//! reported the same text several times in a row.
//!
//! The camera, the decoder and the clipboard are external; they plug in
//! through [`capture::CaptureDevice`] and [`clipboard::Clipboard`].
//!
//! # Example
//! ```
//! use rust_scan::ScanSession;
//!
//! let mut session = ScanSession::default();
//! assert!(session.submit("1234567890123").is_none());
//! assert!(session.submit("1234567890123").is_none());
//! let code = session.submit("1234567890123").unwrap();
//! assert_eq!(code.code, "1234567890123");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Camera lifecycle (scoped acquisition, decode log replay)
pub mod capture;
/// Clipboard export of confirmed codes
pub mod clipboard;
/// Debounce and session configuration
pub mod config;
/// Consecutive-read confirmation
pub mod debounce;
/// Error types
pub mod error;
/// Core data structures (Candidate, ConfirmedCode, Symbology)
pub mod models;
/// Drives capture devices through sessions
pub mod pipeline;
/// Scan session state and UI actions
pub mod session;

pub use capture::{CaptureDevice, CaptureEvent, CaptureGuard, DecodeEvent, ReplayDevice};
pub use clipboard::{Clipboard, CopyNotice, FileClipboard, MemoryClipboard};
pub use config::{DEFAULT_CONFIRM_THRESHOLD, ScanConfig};
pub use debounce::{Debouncer, Observation};
pub use error::{Result, ScanError};
pub use models::{Candidate, CodeId, ConfirmedCode, ConfirmedCodes, Symbology};
pub use pipeline::{
    CaptureObserver, CaptureReport, ReplayOutcome, StopReason, replay_log, replay_logs,
    run_capture, run_capture_with,
};
pub use session::{ScanSession, SessionCommand, Submission};
