//! The monitoring loop.
//!
//! [`Monitor`] owns the process lifecycle: open the sensor once, then
//! measure, decide, and notify on a fixed schedule until cancelled. One
//! cycle's failure never stops the loop: it is reported and the loop
//! waits out the same fixed interval before the next attempt. Only
//! startup errors and errors that escape per-cycle classification end
//! the run.

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::alert::{self, AlertEvent};
use crate::config::MonitorConfig;
use crate::error::{DeliveryError, Error, Result};
use crate::notify::Notifier;
use crate::sensor::SoilSensor;

/// Lifecycle state of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    /// Sensor handle not yet opened.
    #[default]
    Starting,
    /// Measuring on the fixed schedule.
    Running,
    /// Cancellation observed; shutdown notice pending.
    Stopping,
    /// Clean exit after a stop signal.
    Stopped,
    /// Startup or unexpected failure; the process should exit non-zero.
    Failed,
}

impl MonitorState {
    /// Check whether the monitor has finished, cleanly or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starting => write!(f, "Starting"),
            Self::Running => write!(f, "Running"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// The always-on measurement loop.
///
/// Generic over its two gateway boundaries so tests (and future
/// transports) can substitute either side. The sensor handle is owned
/// exclusively by the monitor for its entire lifetime; nothing else
/// touches it.
pub struct Monitor<S, N> {
    config: MonitorConfig,
    sensor: S,
    notifier: N,
    state: MonitorState,
}

impl<S: SoilSensor, N: Notifier> Monitor<S, N> {
    /// Create a monitor from a validated configuration and its gateways.
    pub fn new(config: MonitorConfig, sensor: S, notifier: N) -> Self {
        Self {
            config,
            sensor,
            notifier,
            state: MonitorState::Starting,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Run until `cancel` is triggered or a fatal error occurs.
    ///
    /// Startup opens the sensor exactly once; there is no init retry
    /// loop. Inside the measurement loop, cancellation is observed at
    /// loop-top and during the inter-cycle wait, so shutdown latency is
    /// bounded by the in-flight cycle, never by the poll interval.
    ///
    /// # Errors
    ///
    /// [`Error::Acquisition`] when the sensor cannot be opened at
    /// startup; [`Error::Internal`] when an error escapes per-cycle
    /// classification. Both are preceded by one best-effort notification.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            threshold = self.config.warning_threshold,
            dry_raw = self.config.calibration.dry_raw,
            wet_raw = self.config.calibration.wet_raw,
            "starting soil moisture monitor"
        );

        if let Err(e) = self.sensor.open().await {
            self.state = MonitorState::Failed;
            error!(error = %e, "sensor initialization failed");
            self.notify_best_effort(&AlertEvent::StartupFailure {
                cause: e.to_string(),
            })
            .await;
            return Err(Error::Acquisition(e));
        }

        self.state = MonitorState::Running;
        info!("sensor ready, entering measurement loop");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            if let Err(e) = self.run_cycle().await {
                self.state = MonitorState::Failed;
                error!(error = %e, "unexpected failure, monitor exiting");
                self.notify_best_effort(&AlertEvent::UnexpectedFailure {
                    cause: e.to_string(),
                })
                .await;
                return Err(e);
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        self.state = MonitorState::Stopping;
        info!("stop signal received, shutting down");
        self.notify_best_effort(&AlertEvent::ShutdownNotice).await;

        self.state = MonitorState::Stopped;
        Ok(())
    }

    /// One acquire → normalize → decide → deliver cycle.
    ///
    /// Acquisition and delivery failures are fully contained here; an
    /// `Err` from this function is the unexpected class and stops the
    /// monitor.
    async fn run_cycle(&mut self) -> Result<()> {
        let timestamp = Local::now();

        let raw = match self.sensor.acquire().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "sensor read failed");
                self.notify_best_effort(&AlertEvent::AcquisitionFailure {
                    timestamp,
                    cause: e.to_string(),
                })
                .await;
                return Ok(());
            }
        };

        // The profile is validated before the loop starts, so a normalize
        // failure here is an unexpected condition, not a per-cycle one.
        let reading = self
            .config
            .calibration
            .normalize(&raw)
            .map_err(|e| Error::Internal(format!("calibration rejected a validated profile: {e}")))?;

        info!(
            percent = reading.display_percent(),
            raw = raw.value,
            voltage = (raw.voltage * 1000.0).round() / 1000.0,
            "measurement complete"
        );

        for event in alert::decide(&reading, self.config.warning_threshold, timestamp) {
            self.notify_best_effort(&event).await;
        }

        Ok(())
    }

    /// Deliver one event, containing any failure locally.
    ///
    /// A failed delivery is reported on the log stream only; notifying
    /// about a notification failure would recurse.
    async fn notify_best_effort(&self, event: &AlertEvent) {
        let text = event.message();
        match self.notifier.deliver(&text).await {
            Ok(()) => debug!(message = %text, "notification delivered"),
            Err(DeliveryError::EndpointNotConfigured) => {
                debug!(message = %text, "no notification endpoint configured, logged only");
            }
            Err(e) => {
                let failure = AlertEvent::NotificationFailure {
                    cause: e.to_string(),
                };
                warn!("{}", failure.message());
            }
        }
    }
}
