//! End-to-end scan session scenarios
//!
//! These drive a `ScanSession` the way a camera decoder would: bursts of
//! identical reads mixed with misreads, plus the UI actions around them.

use rust_scan::{
    CaptureDevice, CaptureEvent, DecodeEvent, MemoryClipboard, ScanConfig, ScanError,
    ScanSession, SessionCommand, StopReason, Symbology, run_capture,
};
use std::collections::VecDeque;

fn submit_n(session: &mut ScanSession, code: &str, n: usize) -> usize {
    (0..n).filter(|_| session.submit(code).is_some()).count()
}

/// Eleven characters is neither EAN-8 nor EAN-13
#[test]
fn test_wrong_length_never_confirms() {
    let mut session = ScanSession::default();
    assert_eq!(submit_n(&mut session, "12345678901", 5), 0);
    assert!(session.codes().is_empty());
    assert_eq!(session.debouncer().repeat_count(), 0);
    assert_eq!(session.debouncer().last_candidate(), None);
}

/// A different candidate restarts the count
#[test]
fn test_changed_candidate_resets_count() {
    let mut session = ScanSession::default();
    assert_eq!(submit_n(&mut session, "1234567890123", 2), 0);
    assert!(session.submit("9999999999999").is_none());
    assert_eq!(session.debouncer().repeat_count(), 1);
    assert_eq!(session.debouncer().last_candidate(), Some("9999999999999"));
    assert!(session.codes().is_empty());
}

/// Three identical reads confirm exactly one code
#[test]
fn test_three_reads_confirm_once() {
    let mut session = ScanSession::default();
    let confirmed: Vec<_> = (0..3)
        .filter_map(|_| session.submit("1234567890123"))
        .collect();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].code, "1234567890123");
    assert_eq!(confirmed[0].symbology, Symbology::Ean13);
    assert_eq!(session.codes().len(), 1);
}

/// Re-scanning a confirmed EAN-8 never adds a second entry
#[test]
fn test_confirmed_code_is_not_readded() {
    let mut session = ScanSession::default();
    assert_eq!(submit_n(&mut session, "12345678", 3), 1);
    assert_eq!(submit_n(&mut session, "12345678", 3), 0);
    assert_eq!(submit_n(&mut session, "12345678", 30), 0);
    let codes: Vec<_> = session.codes().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["12345678"]);
}

/// Scan, copy, clear, scan again
#[test]
fn test_full_ui_round() {
    let mut session = ScanSession::default();
    let mut clipboard = MemoryClipboard::new();

    submit_n(&mut session, "4006381333931", 3);
    submit_n(&mut session, "96385074", 3);
    assert!(session.copy_to(&mut clipboard).is_success());
    assert_eq!(clipboard.contents(), Some("4006381333931\n96385074"));

    session.clear();
    assert_eq!(session.export_text(), "");

    let again = session.submit("96385074");
    assert!(again.is_none());
    submit_n(&mut session, "96385074", 2);
    assert_eq!(session.export_text(), "96385074");
    // Ids are not reused after clear
    assert_eq!(session.codes().iter().next().map(|c| c.id.get()), Some(3));
}

/// One scripted step of a camera
enum Frame {
    Read(&'static str),
    Control(SessionCommand),
    Fault(&'static str),
    Lost,
}

/// Capture device that records how often it was released
struct ScriptedCamera {
    frames: VecDeque<Frame>,
    deny: bool,
    opened: usize,
    stopped: usize,
}

impl ScriptedCamera {
    fn new(reads: Vec<&'static str>) -> Self {
        Self::with_frames(reads.into_iter().map(Frame::Read).collect())
    }

    fn with_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            deny: false,
            opened: 0,
            stopped: 0,
        }
    }
}

impl CaptureDevice for ScriptedCamera {
    fn open(&mut self) -> rust_scan::Result<()> {
        if self.deny {
            return Err(ScanError::PermissionDenied);
        }
        self.opened += 1;
        Ok(())
    }

    fn next_event(&mut self) -> rust_scan::Result<Option<CaptureEvent>> {
        match self.frames.pop_front() {
            None => Ok(None),
            Some(Frame::Read(text)) => Ok(Some(DecodeEvent::new(text).into())),
            Some(Frame::Control(command)) => Ok(Some(command.into())),
            Some(Frame::Fault(reason)) => Err(ScanError::Decode(reason.to_string())),
            Some(Frame::Lost) => Err(ScanError::DeviceUnavailable("unplugged".to_string())),
        }
    }

    fn stop_tracks(&mut self) {
        self.stopped += 1;
    }
}

#[test]
fn test_camera_released_when_stream_ends() {
    let mut camera = ScriptedCamera::new(vec!["12345678", "12345678", "12345678"]);
    let mut session = ScanSession::default();
    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.stop_reason, StopReason::StreamEnded);
    assert_eq!(report.confirmed.len(), 1);
    assert_eq!((camera.opened, camera.stopped), (1, 1));
}

#[test]
fn test_camera_released_on_single_shot_pause() {
    let mut camera = ScriptedCamera::new(vec![
        "12345678", "12345678", "12345678", "87654321", "87654321", "87654321",
    ]);
    let mut session = ScanSession::new(ScanConfig {
        suspend_on_confirm: true,
        ..ScanConfig::default()
    });

    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.stop_reason, StopReason::Suspended);
    assert_eq!(camera.stopped, 1);
    assert!(!session.is_scanning());

    // Resume: the camera is acquired again and released again
    session.start();
    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.confirmed.len(), 1);
    assert_eq!(report.confirmed[0].code, "87654321");
    assert_eq!((camera.opened, camera.stopped), (2, 2));
}

#[test]
fn test_camera_released_on_permission_denied() {
    let mut camera = ScriptedCamera::new(vec!["12345678"]);
    camera.deny = true;
    let mut session = ScanSession::default();
    let result = run_capture(&mut camera, &mut session);
    assert!(matches!(result, Err(ScanError::PermissionDenied)));
    assert_eq!((camera.opened, camera.stopped), (0, 1));
}

/// A user pause mid-stream stops the camera before the next frame is read
#[test]
fn test_camera_released_on_explicit_pause() {
    let mut camera = ScriptedCamera::with_frames(vec![
        Frame::Read("12345678"),
        Frame::Read("12345678"),
        Frame::Control(SessionCommand::Pause),
        Frame::Read("12345678"),
    ]);
    let mut session = ScanSession::default();

    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.stop_reason, StopReason::Suspended);
    assert_eq!(report.events, 2);
    assert!(!session.is_scanning());
    assert_eq!((camera.opened, camera.stopped), (1, 1));
    assert_eq!(camera.frames.len(), 1);

    // Toggle back on: the camera is reacquired and the run completes
    session.toggle();
    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.confirmed.len(), 1);
    assert_eq!((camera.opened, camera.stopped), (2, 2));
}

/// A frame that fails to decode is logged and skipped, like a misread
#[test]
fn test_decode_error_does_not_end_capture() {
    let mut camera = ScriptedCamera::with_frames(vec![
        Frame::Read("12345678"),
        Frame::Read("12345678"),
        Frame::Fault("transient decode error"),
        Frame::Read("12345678"),
    ]);
    let mut session = ScanSession::default();

    let report = run_capture(&mut camera, &mut session).unwrap();
    assert_eq!(report.faults, 1);
    assert_eq!(report.events, 3);
    assert_eq!(report.confirmed.len(), 1);
    assert_eq!(report.stop_reason, StopReason::StreamEnded);
    assert_eq!(session.export_text(), "12345678");
    assert_eq!(camera.stopped, 1);
}

/// Losing the device ends the run, and the camera is still released
#[test]
fn test_device_loss_ends_capture() {
    let mut camera = ScriptedCamera::with_frames(vec![
        Frame::Read("12345678"),
        Frame::Lost,
        Frame::Read("12345678"),
    ]);
    let mut session = ScanSession::default();

    let result = run_capture(&mut camera, &mut session);
    assert!(matches!(result, Err(ScanError::DeviceUnavailable(_))));
    assert_eq!((camera.opened, camera.stopped), (1, 1));
    assert_eq!(session.debouncer().repeat_count(), 1);
}
