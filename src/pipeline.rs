use crate::capture::{CaptureDevice, CaptureEvent, CaptureGuard, ReplayDevice};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::models::ConfirmedCode;
use crate::session::{ScanSession, SessionCommand, Submission};
use rayon::prelude::*;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a capture run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The device reported the end of its stream
    StreamEnded,
    /// The session stopped scanning (explicit pause or single-shot)
    Suspended,
    /// The observer asked to end the session
    Stopped,
}

/// Counters for one capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Decode events pulled from the device
    pub events: usize,
    /// Events dropped by the length/checksum filter
    pub rejected: usize,
    /// Threshold hits for codes that were already confirmed
    pub duplicates: usize,
    /// Per-frame errors reported by the device and skipped
    pub faults: usize,
    /// Codes confirmed during this run, in order
    pub confirmed: Vec<ConfirmedCode>,
    /// How the run ended
    pub stop_reason: StopReason,
}

impl CaptureReport {
    fn new() -> Self {
        Self {
            events: 0,
            rejected: 0,
            duplicates: 0,
            faults: 0,
            confirmed: Vec::new(),
            stop_reason: StopReason::StreamEnded,
        }
    }
}

/// Hooks called while a capture runs
pub trait CaptureObserver {
    /// A decoded candidate went through the session
    fn on_submission(&mut self, _candidate: &str, _submission: &Submission) {}

    /// A user action arrived. The default applies it to the session and
    /// breaks on [`SessionCommand::Quit`].
    fn on_command(
        &mut self,
        session: &mut ScanSession,
        command: SessionCommand,
    ) -> ControlFlow<()> {
        if command == SessionCommand::Quit {
            return ControlFlow::Break(());
        }
        session.apply(command);
        ControlFlow::Continue(())
    }

    /// The device reported a per-frame error; capture continues
    fn on_fault(&mut self, _error: &ScanError) {}
}

impl CaptureObserver for () {}

/// Feed every event from `device` into `session`.
///
/// The device is only opened if the session is scanning, and it is released
/// when the stream ends, when the session stops scanning (a `:pause` from the
/// device or the single-shot policy), and on a fatal device error. Per-frame
/// errors are logged, counted and skipped.
pub fn run_capture<D: CaptureDevice + ?Sized>(
    device: &mut D,
    session: &mut ScanSession,
) -> Result<CaptureReport> {
    run_capture_with(device, session, &mut ())
}

/// [`run_capture`] with hooks for submissions, commands and faults
pub fn run_capture_with<D, O>(
    device: &mut D,
    session: &mut ScanSession,
    observer: &mut O,
) -> Result<CaptureReport>
where
    D: CaptureDevice + ?Sized,
    O: CaptureObserver + ?Sized,
{
    let mut report = CaptureReport::new();
    if !session.is_scanning() {
        report.stop_reason = StopReason::Suspended;
        return Ok(report);
    }

    let mut guard = CaptureGuard::acquire(device)?;
    loop {
        let event = match guard.next_event() {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) if !err.is_fatal() => {
                warn!(error = %err, "Scanner error, continuing");
                report.faults += 1;
                observer.on_fault(&err);
                continue;
            }
            Err(err) => return Err(err),
        };

        match event {
            CaptureEvent::Decoded(decode) => {
                report.events += 1;
                let submission = session.process(&decode.text);
                observer.on_submission(&decode.text, &submission);
                match submission {
                    Submission::Rejected => report.rejected += 1,
                    Submission::Duplicate => report.duplicates += 1,
                    Submission::Confirmed(code) => report.confirmed.push(code),
                    Submission::Pending { .. } | Submission::Ignored => {}
                }
            }
            CaptureEvent::Control(command) => {
                debug!(?command, "Session command during capture");
                if observer.on_command(session, command).is_break() {
                    report.stop_reason = StopReason::Stopped;
                    break;
                }
            }
        }

        if !session.is_scanning() {
            debug!(events = report.events, "Session suspended, stopping capture");
            report.stop_reason = StopReason::Suspended;
            break;
        }
    }

    info!(
        events = report.events,
        rejected = report.rejected,
        faults = report.faults,
        confirmed = report.confirmed.len(),
        "Capture finished"
    );
    Ok(report)
}

/// Result of replaying one decode log
#[derive(Debug)]
pub struct ReplayOutcome {
    /// Log that was replayed
    pub path: PathBuf,
    /// Run counters and the final session, or the error that stopped the replay
    pub result: Result<(CaptureReport, ScanSession)>,
}

/// Replay a single decode log through a fresh session
pub fn replay_log<P: AsRef<Path>>(
    path: P,
    config: &ScanConfig,
) -> Result<(CaptureReport, ScanSession)> {
    let mut device = ReplayDevice::from_path(path)?;
    let mut session = ScanSession::new(config.clone());
    let report = run_capture(&mut device, &mut session)?;
    Ok((report, session))
}

/// Replay several decode logs in parallel, one independent session per log.
///
/// Outcomes keep the order of `paths`.
pub fn replay_logs(paths: &[PathBuf], config: &ScanConfig) -> Vec<ReplayOutcome> {
    paths
        .par_iter()
        .map(|path| ReplayOutcome {
            path: path.clone(),
            result: replay_log(path, config),
        })
        .collect()
}
