mod console;
mod settings;
mod status_worker;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use cloudcap_core::capture::domain::capture_gate::CaptureGate;
use cloudcap_core::capture::frame_capture_writer::FrameCaptureWriter;
use cloudcap_core::encoding::domain::point_encoding::PointEncoding;
use cloudcap_core::reporting::domain::report_observer::ReportObserver;
use cloudcap_core::reporting::domain::reporter::Reporter;
use cloudcap_core::reporting::infrastructure::channel_report_observer::ChannelReportObserver;
use cloudcap_core::reporting::infrastructure::fan_out_report_observer::FanOutReportObserver;
use cloudcap_core::reporting::infrastructure::log_report_observer::LogReportObserver;
use cloudcap_core::reporting::infrastructure::transcript_report_observer::TranscriptReportObserver;
use cloudcap_core::sensor::infrastructure::synthetic_depth_sensor::SyntheticDepthSensor;
use cloudcap_core::shared::point_stride::PointStride;
use cloudcap_core::storage::domain::output_directory::OutputDirectory;
use cloudcap_core::storage::infrastructure::app_data_output_directory::AppDataOutputDirectory;
use cloudcap_core::storage::infrastructure::fixed_output_directory::FixedOutputDirectory;
use cloudcap_core::storage::infrastructure::frame_file_writer::FrameFileWriter;

use console::{ConsoleCommand, HELP};
use settings::{CaptureSettings, EncodingSetting};

const BUDGET_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Capture depth-sensor point clouds into per-frame files.
#[derive(Parser)]
#[command(name = "cloudcap")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a capture session against the synthetic depth sensor.
    Capture(CaptureArgs),
    /// Decode a written frame file and print what it contains.
    Inspect(InspectArgs),
}

#[derive(Args)]
struct CaptureArgs {
    /// Output encoding: text or binary.
    #[arg(long)]
    encoding: Option<String>,

    /// Values per point: 3 (xyz) or 4 (xyz + confidence).
    #[arg(long)]
    stride: Option<usize>,

    /// Directory receiving points1, points2, ... (default: app data dir).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Capture exactly this many frames, then exit (non-interactive).
    #[arg(long)]
    frames: Option<u32>,

    /// Points per synthetic frame.
    #[arg(long)]
    points: Option<usize>,

    /// Milliseconds between synthetic frames.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop capture after this many failed writes in a row (0 = never).
    #[arg(long)]
    max_consecutive_failures: Option<u32>,

    /// Do not fsync each frame file.
    #[arg(long)]
    no_sync: bool,

    /// Persist the effective settings as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Frame file to decode.
    file: PathBuf,

    /// Encoding of the file: text or binary.
    #[arg(long, default_value = "text")]
    encoding: String,

    /// Values per point: 3 or 4.
    #[arg(long, default_value = "4")]
    stride: usize,

    /// Number of points to print.
    #[arg(long, default_value = "5")]
    show: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Capture(args) => run_capture(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_capture(args: &CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = effective_settings(CaptureSettings::load(), args)?;
    validate(&settings)?;
    if args.save_settings {
        settings.save();
    }

    let stride = settings.point_stride()?;
    let encoding = PointEncoding::from(settings.encoding);
    let directory: Box<dyn OutputDirectory> = match &settings.output_dir {
        Some(dir) => Box::new(FixedOutputDirectory::new(dir)),
        None => Box::new(AppDataOutputDirectory::new()),
    };
    let file_writer = if settings.sync_writes {
        FrameFileWriter::new(encoding)
    } else {
        FrameFileWriter::new(encoding).without_sync()
    };

    let log_observer = Arc::new(LogReportObserver::new());
    let transcript = Arc::new(TranscriptReportObserver::new());
    let (channel_observer, reports) = ChannelReportObserver::channel();
    let observers: Vec<Box<dyn ReportObserver>> = vec![
        Box::new(log_observer.clone()),
        Box::new(transcript.clone()),
        Box::new(channel_observer),
    ];

    let gate = Arc::new(CaptureGate::new());
    let writer = Arc::new(FrameCaptureWriter::new(
        gate.clone(),
        directory,
        Box::new(file_writer),
        stride,
        Reporter::new(Box::new(FanOutReportObserver::new(observers))),
    ));

    let status = status_worker::spawn(reports, gate, settings.max_consecutive_failures);
    let sensor = SyntheticDepthSensor::new(settings.points_per_frame, stride)
        .with_interval(Duration::from_millis(settings.frame_interval_ms))
        .spawn(writer.clone());

    log::info!(
        "Capturing {encoding} frames ({stride} values/point) into {}",
        describe_output(&settings)
    );

    let session_result = match args.frames {
        Some(frames) => run_budget_session(&writer, frames),
        None => run_interactive(&writer),
    };

    let delivered = sensor.join().map_err(|_| "Sensor thread panicked")?;
    writer.stop();
    // Last sender goes away with the writer, which ends the status thread.
    drop(writer);
    let summary = status.join().map_err(|_| "Status thread panicked")?;
    session_result?;

    let text = transcript.take();
    if !text.is_empty() {
        println!("{text}");
    }
    log_observer.summary();
    log::info!(
        "Sensor delivered {delivered} frames: {} written, {} failed",
        summary.written,
        summary.failed
    );
    if summary.stopped_on_failures {
        return Err("capture stopped after repeated write failures".into());
    }
    Ok(())
}

fn run_budget_session(
    writer: &FrameCaptureWriter,
    frames: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    writer.start(Some(frames))?;
    while writer.is_capturing() {
        thread::sleep(BUDGET_POLL_INTERVAL);
    }
    Ok(())
}

fn run_interactive(writer: &FrameCaptureWriter) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("{HELP}");
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        match command {
            ConsoleCommand::Start(budget) => match writer.start(budget) {
                Ok(session) => eprintln!("Session {session}: capturing"),
                Err(e) => eprintln!("Cannot start: {e}"),
            },
            ConsoleCommand::Stop => match writer.stop() {
                Some(frames) => eprintln!("Stopped after {frames} frames"),
                None => eprintln!("Not capturing"),
            },
            ConsoleCommand::Status => match writer.gate().session() {
                Some(session) => eprintln!(
                    "Session {}: capturing, {} frames accepted{}",
                    session.id(),
                    session.sequence_counter(),
                    session
                        .frame_budget()
                        .map(|b| format!(" of {b}"))
                        .unwrap_or_default()
                ),
                None => eprintln!("Idle"),
            },
            ConsoleCommand::Help => eprintln!("{HELP}"),
            ConsoleCommand::Quit => break,
        }
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let encoding: PointEncoding = args.encoding.parse()?;
    let stride = PointStride::from_values_per_point(args.stride)
        .ok_or_else(|| format!("Stride must be 3 or 4, got {}", args.stride))?;
    let bytes = std::fs::read(&args.file)
        .map_err(|e| format!("Cannot read {}: {e}", args.file.display()))?;
    let values = encoding.decode(&bytes)?;

    println!("{}", args.file.display());
    println!("  encoding: {encoding}");
    println!("  values:   {}", values.len());
    println!("  points:   {}", values.len() / stride.values_per_point());
    if values.len() % stride.values_per_point() != 0 {
        println!(
            "  warning:  {} trailing values do not form a whole point",
            values.len() % stride.values_per_point()
        );
    }
    for (i, point) in values
        .chunks_exact(stride.values_per_point())
        .take(args.show)
        .enumerate()
    {
        let coords: Vec<String> = point.iter().map(|v| format!("{v:?}")).collect();
        println!("  [{i}] {}", coords.join(", "));
    }
    Ok(())
}

/// Applies command-line overrides on top of the stored settings.
fn effective_settings(
    mut settings: CaptureSettings,
    args: &CaptureArgs,
) -> Result<CaptureSettings, Box<dyn std::error::Error>> {
    if let Some(encoding) = &args.encoding {
        settings.encoding = EncodingSetting::from(encoding.parse::<PointEncoding>()?);
    }
    if let Some(stride) = args.stride {
        settings.stride = stride;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = Some(dir.clone());
    }
    if let Some(points) = args.points {
        settings.points_per_frame = points;
    }
    if let Some(interval) = args.interval_ms {
        settings.frame_interval_ms = interval;
    }
    if let Some(max) = args.max_consecutive_failures {
        settings.max_consecutive_failures = max;
    }
    if args.no_sync {
        settings.sync_writes = false;
    }
    Ok(settings)
}

fn validate(settings: &CaptureSettings) -> Result<(), Box<dyn std::error::Error>> {
    settings.point_stride()?;
    if settings.points_per_frame == 0 {
        return Err("Points per frame must be at least 1".into());
    }
    if let Some(dir) = &settings.output_dir {
        if dir.is_file() {
            return Err(format!("Output directory is a file: {}", dir.display()).into());
        }
    }
    Ok(())
}

fn describe_output(settings: &CaptureSettings) -> String {
    settings
        .output_dir
        .clone()
        .or_else(AppDataOutputDirectory::path)
        .as_deref()
        .map(Path::display)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "<unresolved data directory>".to_string())
}
