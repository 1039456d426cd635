//! Scan session state
//!
//! Everything the scanner screen keeps between decode events: the debounce
//! counters, the confirmed codes and whether the camera should be running.

use crate::clipboard::{Clipboard, CopyNotice, copy_codes};
use crate::config::ScanConfig;
use crate::debounce::{Debouncer, Observation};
use crate::error::ScanError;
use crate::models::{Candidate, ConfirmedCode, ConfirmedCodes};
use std::str::FromStr;
use tracing::{debug, info};

/// User action on a running session, written `:name` in a decode log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Resume scanning
    Start,
    /// Pause scanning (releases the camera)
    Pause,
    /// Flip scanning on/off
    Toggle,
    /// Drop confirmed codes
    Clear,
    /// Copy confirmed codes to the clipboard
    Copy,
    /// Print confirmed codes
    List,
    /// End the session
    Quit,
}

impl FromStr for SessionCommand {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(':') {
            "start" => Ok(SessionCommand::Start),
            "pause" => Ok(SessionCommand::Pause),
            "toggle" => Ok(SessionCommand::Toggle),
            "clear" => Ok(SessionCommand::Clear),
            "copy" => Ok(SessionCommand::Copy),
            "list" => Ok(SessionCommand::List),
            "quit" | "q" => Ok(SessionCommand::Quit),
            _ => Err(ScanError::UnknownCommand(s.trim().to_string())),
        }
    }
}

/// What happened to one submitted candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Scanning is paused; the candidate was dropped
    Ignored,
    /// Filtered out by length or checksum
    Rejected,
    /// Counted towards confirmation
    Pending {
        /// Consecutive identical reads so far
        repeat_count: u32,
    },
    /// Threshold reached for a code that is already confirmed
    Duplicate,
    /// A new code was accepted
    Confirmed(ConfirmedCode),
}

impl Submission {
    /// The new code, if this submission confirmed one
    pub fn into_confirmed(self) -> Option<ConfirmedCode> {
        match self {
            Submission::Confirmed(code) => Some(code),
            _ => None,
        }
    }
}

/// A single scanning session
#[derive(Debug, Clone)]
pub struct ScanSession {
    config: ScanConfig,
    debouncer: Debouncer,
    codes: ConfirmedCodes,
    scanning: bool,
}

impl ScanSession {
    /// New session with scanning switched on
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(),
            codes: ConfirmedCodes::new(),
            scanning: true,
        }
    }

    /// Submit a decoded candidate, returning the new code if it was confirmed
    pub fn submit(&mut self, candidate: &str) -> Option<ConfirmedCode> {
        self.process(candidate).into_confirmed()
    }

    /// Submit a decoded candidate and report exactly what happened to it
    pub fn process(&mut self, candidate: &str) -> Submission {
        if !self.scanning {
            return Submission::Ignored;
        }

        match self.debouncer.feed(Candidate::new(candidate), &self.config) {
            Observation::Rejected => Submission::Rejected,
            Observation::Pending { repeat_count } => Submission::Pending { repeat_count },
            Observation::ThresholdReached(symbology) => {
                let Some(confirmed) = self.codes.insert(candidate, symbology) else {
                    debug!(code = candidate, "Already confirmed");
                    return Submission::Duplicate;
                };
                info!(
                    id = %confirmed.id,
                    code = %confirmed.code,
                    symbology = %symbology,
                    "Confirmed code"
                );
                if self.config.suspend_on_confirm {
                    self.pause();
                }
                Submission::Confirmed(confirmed)
            }
        }
    }

    /// Apply the state-changing part of a command.
    ///
    /// `Copy`, `List` and `Quit` need a clipboard or an output and are left to
    /// the caller. Returns whether scanning is on afterwards.
    pub fn apply(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Toggle => {
                self.toggle();
            }
            SessionCommand::Clear => self.clear(),
            SessionCommand::Copy | SessionCommand::List | SessionCommand::Quit => {}
        }
        self.scanning
    }

    /// Resume scanning
    pub fn start(&mut self) {
        if !self.scanning {
            debug!("Scanning started");
        }
        self.scanning = true;
    }

    /// Stop accepting candidates
    pub fn pause(&mut self) {
        if self.scanning {
            debug!("Scanning paused");
        }
        self.scanning = false;
    }

    /// Flip scanning on/off, returning the new state
    pub fn toggle(&mut self) -> bool {
        if self.scanning {
            self.pause();
        } else {
            self.start();
        }
        self.scanning
    }

    /// Whether candidates are currently accepted
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Drop every confirmed code and the debounce history
    pub fn clear(&mut self) {
        self.codes.clear();
        self.debouncer.reset();
        debug!("Cleared confirmed codes");
    }

    /// Confirmed codes in confirmation order
    pub fn codes(&self) -> &ConfirmedCodes {
        &self.codes
    }

    /// Current debounce state
    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Active configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Confirmed codes joined by newlines
    pub fn export_text(&self) -> String {
        self.codes.to_text()
    }

    /// Copy the confirmed codes to `clipboard`
    pub fn copy_to(&self, clipboard: &mut dyn Clipboard) -> CopyNotice {
        copy_codes(&self.codes, clipboard)
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
