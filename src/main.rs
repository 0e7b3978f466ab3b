//! soilwatch daemon entry point.
//!
//! Wires the configured sensor and the Slack notifier into the monitor,
//! installs signal handling, and maps the monitor's outcome onto the
//! process exit code: 0 for a clean stop, 1 when startup fails
//! (configuration or sensor init), 2 when an unexpected error ends the
//! run.

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use soilwatch::{
    Error, IioAdcSensor, Monitor, MonitorConfig, SensorSelection, SimulatedSensor, SlackNotifier,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(1);
        }
    };

    if config.webhook_url.is_none() {
        warn!("SOILWATCH_WEBHOOK_URL is not set; alerts will appear in the log only");
    }

    let notifier = SlackNotifier::with_timeout(config.webhook_url.clone(), config.delivery_timeout);

    let cancel = CancellationToken::new();
    tokio::spawn(wait_for_stop_signal(cancel.clone()));

    let result = match config.sensor.clone() {
        SensorSelection::Simulated => {
            info!("using simulated sensor");
            let sensor = SimulatedSensor::new(config.calibration);
            Monitor::new(config, sensor, notifier).run(cancel).await
        }
        SensorSelection::Iio {
            device_dir,
            channel,
        } => {
            info!(device = %device_dir.display(), channel, "using IIO ADC sensor");
            let sensor = IioAdcSensor::new(device_dir, channel);
            Monitor::new(config, sensor, notifier).run(cancel).await
        }
    };

    match result {
        Ok(()) => {
            info!("monitor stopped cleanly");
            ExitCode::SUCCESS
        }
        Err(e @ (Error::Configuration { .. } | Error::Acquisition(_))) => {
            error!(error = %e, "monitor failed to start");
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "monitor terminated unexpectedly");
            ExitCode::from(2)
        }
    }
}

/// Wait for a termination signal, then trigger cancellation.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the monitor
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn wait_for_stop_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C"),
        _ = terminate => info!("received SIGTERM"),
    }

    cancel.cancel();
}
