//! Camera capture lifecycle
//!
//! Frame acquisition and decoding belong to an external device; this module
//! only owns when the device runs. A [`CaptureGuard`] opens the device and
//! stops every track when dropped, so the camera is released on pause, on
//! teardown and when opening fails.
//!
//! Besides decodes, a device may hand over user actions (pause, clear, ...)
//! that arrived while it was running; the pipeline applies them between frames.

use crate::error::{Result, ScanError};
use crate::session::SessionCommand;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// One raw decode event from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    /// Decoded text
    pub text: String,
}

impl DecodeEvent {
    /// Wrap decoded text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Anything a running device can deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A decoded frame
    Decoded(DecodeEvent),
    /// A user action to apply to the session
    Control(SessionCommand),
}

impl From<DecodeEvent> for CaptureEvent {
    fn from(event: DecodeEvent) -> Self {
        CaptureEvent::Decoded(event)
    }
}

impl From<SessionCommand> for CaptureEvent {
    fn from(command: SessionCommand) -> Self {
        CaptureEvent::Control(command)
    }
}

/// A camera plus decoder producing decode events
pub trait CaptureDevice {
    /// Acquire the camera
    fn open(&mut self) -> Result<()>;

    /// Next event, or `None` once the stream has ended.
    ///
    /// Errors for which [`ScanError::is_fatal`] is false concern one frame only;
    /// the device must keep delivering after them.
    fn next_event(&mut self) -> Result<Option<CaptureEvent>>;

    /// Release every device track. Must be safe to call more than once.
    fn stop_tracks(&mut self);
}

/// Scoped camera acquisition; stops all tracks on drop
pub struct CaptureGuard<'a, D: CaptureDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: CaptureDevice + ?Sized> CaptureGuard<'a, D> {
    /// Open `device`. On failure its tracks are stopped before the error returns.
    pub fn acquire(device: &'a mut D) -> Result<Self> {
        if let Err(err) = device.open() {
            warn!(error = %err, "Failed to open capture device");
            device.stop_tracks();
            return Err(err);
        }
        info!("Capture device opened");
        Ok(Self { device })
    }

    /// Pull the next event from the device
    pub fn next_event(&mut self) -> Result<Option<CaptureEvent>> {
        self.device.next_event()
    }
}

impl<D: CaptureDevice + ?Sized> Drop for CaptureGuard<'_, D> {
    fn drop(&mut self) {
        self.device.stop_tracks();
        info!("Capture device released");
    }
}

/// Capture device replaying a decode log, one candidate per line.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with `#`
/// are skipped. Lines starting with `:` are session commands (`:pause`,
/// `:start`, `:toggle`, `:clear`, `:copy`, `:list`, `:quit`).
pub struct ReplayDevice<R> {
    reader: R,
    open: bool,
    line: String,
}

impl<R: BufRead> ReplayDevice<R> {
    /// Replay candidates from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            open: false,
            line: String::new(),
        }
    }

    /// Whether the device is currently open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Read the next line while the device is stopped.
    ///
    /// Stands in for the controls that stay live while the camera is off; a
    /// decoded line returned here was typed with no camera running.
    pub fn next_idle_event(&mut self) -> Result<Option<CaptureEvent>> {
        self.read_event()
    }

    fn read_event(&mut self) -> Result<Option<CaptureEvent>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            let text = self.line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text.starts_with(':') {
                return text.parse::<SessionCommand>().map(|cmd| Some(cmd.into()));
            }
            return Ok(Some(DecodeEvent::new(text).into()));
        }
    }
}

impl ReplayDevice<BufReader<File>> {
    /// Replay a decode log file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CaptureDevice for ReplayDevice<R> {
    fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Option<CaptureEvent>> {
        if !self.open {
            return Err(ScanError::DeviceUnavailable(
                "replay device is not open".to_string(),
            ));
        }
        self.read_event()
    }

    fn stop_tracks(&mut self) {
        if self.open {
            debug!("Replay device stopped");
        }
        self.open = false;
    }
}
