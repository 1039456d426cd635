use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rust_scan::{
    Candidate, CaptureEvent, CaptureObserver, ConfirmedCodes, FileClipboard, MemoryClipboard,
    ReplayDevice, ScanConfig, ScanError, ScanSession, SessionCommand, StopReason, Submission,
    Symbology, clipboard, replay_logs, run_capture_with,
};
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scantool", version, about = "Barcode scan-session tools")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct SessionArgs {
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Consecutive identical reads needed to confirm a code
    #[arg(long)]
    threshold: Option<u32>,
    /// Pause scanning after each confirmed code
    #[arg(long)]
    single_shot: bool,
    /// Require a valid EAN check digit
    #[arg(long)]
    verify_checksum: bool,
    /// Write confirmed codes to this file (clipboard stand-in)
    #[arg(long)]
    copy_to: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay decode logs (one candidate per line) through fresh sessions
    Replay {
        /// Decode log files
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Classify a single candidate
    Check {
        /// Candidate text
        candidate: String,
    },
    /// Interactive session on stdin; commands are listed on start
    Listen {
        #[command(flatten)]
        session: SessionArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Replay { inputs, session } => replay_cmd(&inputs, &session),
        Command::Check { candidate } => {
            check_cmd(&candidate);
            Ok(())
        }
        Command::Listen { session } => listen_cmd(&session),
    }
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn load_config(args: &SessionArgs) -> Result<ScanConfig> {
    let config = match &args.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(threshold) = args.threshold {
        config.confirm_threshold = threshold;
    }
    if args.single_shot {
        config.suspend_on_confirm = true;
    }
    if args.verify_checksum {
        config.verify_checksum = true;
    }
    config.validate()?;
    info!(?config, "Effective scan config");
    Ok(config)
}

fn replay_cmd(inputs: &[PathBuf], args: &SessionArgs) -> Result<()> {
    let config = load_config(args)?;
    let mut merged = ConfirmedCodes::new();
    let mut failures = 0usize;

    for outcome in replay_logs(inputs, &config) {
        match outcome.result {
            Ok((report, session)) => {
                println!(
                    "{}: {} events, {} rejected, {} duplicate, {} confirmed ({:?})",
                    outcome.path.display(),
                    report.events,
                    report.rejected,
                    report.duplicates,
                    report.confirmed.len(),
                    report.stop_reason
                );
                for code in session.codes() {
                    println!("  {} {} {}", code.id, code.symbology, code.code);
                    merged.insert(&code.code, code.symbology);
                }
            }
            Err(err) => {
                eprintln!("Failed to replay {}: {}", outcome.path.display(), err);
                failures += 1;
            }
        }
    }

    if let Some(path) = &args.copy_to {
        let notice = clipboard::copy_codes(&merged, &mut FileClipboard::new(path));
        println!("{notice}");
    }

    if failures > 0 {
        bail!("{failures} of {} decode logs failed", inputs.len());
    }
    Ok(())
}

fn check_cmd(candidate: &str) {
    let candidate = Candidate::new(candidate);
    let Some(symbology) = candidate.symbology() else {
        println!(
            "{:?}: rejected, length {} is not an EAN-8/EAN-13 length",
            candidate.as_str(),
            candidate.len()
        );
        return;
    };

    let text = candidate.as_str();
    let last_len = text.chars().last().map_or(0, char::len_utf8);
    let (payload, last) = text.split_at(text.len() - last_len);
    match Symbology::check_digit(payload) {
        Some(expected) if Symbology::verify(text) => {
            println!("{text:?}: {symbology}, check digit {expected} ok");
        }
        Some(expected) => {
            println!(
                "{text:?}: {symbology}, check digit mismatch (found {last}, expected {expected})"
            );
        }
        None => println!("{text:?}: {symbology} length, but not all digits"),
    }
}

const LISTEN_HELP: &str = "\
Candidates are read one per line (the camera). Commands:
  :start   resume scanning
  :pause   pause scanning and release the camera
  :toggle  flip scanning on/off
  :clear   drop confirmed codes
  :copy    copy confirmed codes
  :list    print confirmed codes
  :quit    exit";

/// Prints what happens in an interactive session
struct ListenObserver<'a> {
    copy_to: Option<&'a Path>,
}

impl CaptureObserver for ListenObserver<'_> {
    fn on_submission(&mut self, candidate: &str, submission: &Submission) {
        match submission {
            Submission::Confirmed(code) => {
                println!("{} {} {}", code.id, code.symbology, code.code);
            }
            Submission::Duplicate => println!("Already scanned: {candidate}"),
            _ => {}
        }
    }

    fn on_command(
        &mut self,
        session: &mut ScanSession,
        command: SessionCommand,
    ) -> ControlFlow<()> {
        match command {
            SessionCommand::Quit => return ControlFlow::Break(()),
            SessionCommand::Copy => println!("{}", copy_session(session, self.copy_to)),
            SessionCommand::List => {
                for code in session.codes() {
                    println!("{} {} {}", code.id, code.symbology, code.code);
                }
            }
            SessionCommand::Clear => {
                session.apply(command);
                println!("Cleared");
            }
            SessionCommand::Start | SessionCommand::Pause | SessionCommand::Toggle => {
                let scanning = session.apply(command);
                println!("{}", if scanning { "Scanning" } else { "Paused" });
            }
        }
        let _ = io::stdout().flush();
        ControlFlow::Continue(())
    }

    fn on_fault(&mut self, error: &ScanError) {
        println!("{error}");
    }
}

fn listen_cmd(args: &SessionArgs) -> Result<()> {
    let config = load_config(args)?;
    let mut session = ScanSession::new(config);
    let mut device = ReplayDevice::new(io::stdin().lock());
    let mut observer = ListenObserver {
        copy_to: args.copy_to.as_deref(),
    };
    println!("{LISTEN_HELP}");

    loop {
        if session.is_scanning() {
            let report = run_capture_with(&mut device, &mut session, &mut observer)?;
            match report.stop_reason {
                StopReason::Suspended => println!("Camera released; :start to resume"),
                StopReason::StreamEnded | StopReason::Stopped => break,
            }
            continue;
        }

        // Camera is off; only the controls are live
        match device.next_idle_event() {
            Ok(None) => break,
            Ok(Some(CaptureEvent::Control(command))) => {
                if observer.on_command(&mut session, command).is_break() {
                    break;
                }
            }
            Ok(Some(CaptureEvent::Decoded(_))) => println!("Scanner paused; :start to resume"),
            Err(err) if !err.is_fatal() => observer.on_fault(&err),
            Err(err) => return Err(err).context("Failed to read stdin"),
        }
    }

    Ok(())
}

fn copy_session(session: &ScanSession, copy_to: Option<&Path>) -> String {
    match copy_to {
        Some(path) => session.copy_to(&mut FileClipboard::new(path)).to_string(),
        None => {
            // Without a target file the export goes to stdout
            let mut memory = MemoryClipboard::new();
            let notice = session.copy_to(&mut memory);
            match memory.contents() {
                Some(text) => format!("{text}\n{notice}"),
                None => notice.to_string(),
            }
        }
    }
}
