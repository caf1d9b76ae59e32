mod cli;
mod report;
mod sink;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use monitor_core::{
    CaptureProvider, MonitorConfig, MonitorError, MonitoringSession, SessionControl,
    SimulatedCamera,
};

use cli::Args;
use report::SessionReport;
use sink::EventLogSink;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), MonitorError> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_json_file(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(ms) = args.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(seed) = args.seed {
        config.detection.seed = Some(seed);
    }

    let camera = SimulatedCamera::integrated();
    if args.deny_permission {
        camera.deny_permission();
    }
    camera.set_decision_delay(Duration::from_millis(args.permission_delay_ms));

    let sink = Arc::new(EventLogSink::stdout());
    let session = MonitoringSession::with_roster(camera.clone(), sink, config)?;

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("cannot listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };
    drive(&session, Duration::from_secs(args.duration_secs), ctrl_c).await;

    if let Some(path) = &args.report {
        let report = SessionReport::new(
            &camera.device_info().name,
            session.config(),
            session.status(),
            &session.diagnostics(),
            session.last_error().map(|e| e.to_string()),
        );
        report::write_report(&report, path)?;
        let written = report::read_report(path)?;
        log::info!(
            "report written to {}: {} ticks, {} detections, {} alerts shown, {} suppressed",
            path.display(),
            written.ticks,
            written.detections,
            written.alerts_shown,
            written.alerts_suppressed
        );
    }
    Ok(())
}

/// Start monitoring and stop it when `duration` elapses, `interrupt`
/// resolves, or the session falls back to idle on its own.
async fn drive<S, F>(session: &S, duration: Duration, interrupt: F)
where
    S: SessionControl,
    F: std::future::Future<Output = ()>,
{
    session.start();

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);
    tokio::pin!(interrupt);
    let mut check = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            _ = &mut deadline => {
                log::info!("monitoring window elapsed");
                break;
            }
            _ = &mut interrupt => {
                log::info!("interrupted");
                break;
            }
            _ = check.tick() => {
                if session.current_state().is_idle() {
                    log::warn!("session returned to idle");
                    break;
                }
            }
        }
    }

    session.stop();
}
