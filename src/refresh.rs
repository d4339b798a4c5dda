//! Periodic refresh cycle and scale-to-fit
//!
//! A cycle fetches every location, re-renders the board, stamps the last
//! update and refits the layout. Cycles are single-flight: a trigger that
//! arrives while one is running is dropped, not queued.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval};

use crate::config::{Config, DisplayConfig, LayoutConfig};
use crate::error::{ChargeboardError, Result};
use crate::fetch::FetchAggregator;
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use crate::model::{Location, LocationGroup, all_locations};
use crate::render::{DisplaySurface, render};

pub mod guard;
pub mod layout;

pub use guard::{CycleState, FlightPermit, SingleFlight};
pub use layout::{compute_scale, fit_to_viewport};

/// How a triggered cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was running; nothing was done
    Skipped,
    Completed { had_any_error: bool },
    /// Unexpected error; the unexpected-error banner is shown
    Failed(String),
}

/// Running totals for health reporting
#[derive(Debug, Default)]
pub struct RefreshStats {
    completed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    partial: AtomicU64,
    last_duration_ms: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshStatsSnapshot {
    pub completed: u64,
    pub skipped: u64,
    pub failed: u64,
    pub partial: u64,
    pub last_duration_ms: u64,
}

impl RefreshStats {
    pub fn snapshot(&self) -> RefreshStatsSnapshot {
        RefreshStatsSnapshot {
            completed: self.completed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            partial: self.partial.load(Ordering::Relaxed),
            last_duration_ms: self.last_duration_ms.load(Ordering::Relaxed),
        }
    }

    fn record(&self, outcome: &CycleOutcome, elapsed: Duration) {
        let counter = match outcome {
            CycleOutcome::Skipped => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
            CycleOutcome::Completed { had_any_error } => {
                if *had_any_error {
                    self.partial.fetch_add(1, Ordering::Relaxed);
                }
                &self.completed
            }
            CycleOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.last_duration_ms
            .store(elapsed.as_millis() as u64, Ordering::Relaxed);
    }
}

/// Format `now` in `tz` with a strftime pattern.
///
/// An invalid pattern falls back to RFC 3339 rather than failing the cycle.
pub fn format_last_update(now: DateTime<Utc>, tz: Tz, pattern: &str) -> String {
    let local = now.with_timezone(&tz);
    let mut out = String::new();
    if write!(out, "{}", local.format(pattern)).is_err() {
        return local.to_rfc3339();
    }
    out
}

/// Drives refresh cycles against a shared display surface
pub struct RefreshLoop<S: DisplaySurface> {
    aggregator: FetchAggregator,
    groups: Arc<Vec<LocationGroup>>,
    locations: Vec<Location>,
    surface: Arc<Mutex<S>>,
    display: DisplayConfig,
    layout: LayoutConfig,
    payment_base: String,
    timezone: Tz,
    guard: SingleFlight,
    cycles: AtomicU64,
    stats: Arc<RefreshStats>,
    logger: StructuredLogger,
}

impl<S: DisplaySurface + 'static> RefreshLoop<S> {
    pub fn new(config: &Config, aggregator: FetchAggregator, surface: Arc<Mutex<S>>) -> Result<Self> {
        let timezone: Tz = config.display.timezone.parse().map_err(|_| {
            ChargeboardError::validation(
                "display.timezone".to_string(),
                format!("Unknown timezone: {}", config.display.timezone),
            )
        })?;
        Ok(Self {
            aggregator,
            locations: all_locations(&config.groups),
            groups: Arc::new(config.groups.clone()),
            surface,
            display: config.display.clone(),
            layout: config.layout.clone(),
            payment_base: config.endpoint.payment_base_url.clone(),
            timezone,
            guard: SingleFlight::new(),
            cycles: AtomicU64::new(0),
            stats: Arc::new(RefreshStats::default()),
            logger: get_logger("refresh"),
        })
    }

    pub fn state(&self) -> CycleState {
        self.guard.state()
    }

    pub fn stats(&self) -> Arc<RefreshStats> {
        Arc::clone(&self.stats)
    }

    pub fn surface(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.surface)
    }

    /// Run one cycle unless one is already in flight
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_permit) = self.guard.try_begin() else {
            self.logger.debug("Refresh already in progress, trigger dropped");
            self.stats.record(&CycleOutcome::Skipped, Duration::ZERO);
            return CycleOutcome::Skipped;
        };

        let started = Instant::now();
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let logger = get_logger_with_context(LogContext::new("refresh").with_cycle(cycle));

        let outcome = match self.aggregator.refresh(&self.locations).await {
            Ok(aggregate) => {
                let mut surface = self.surface.lock().await;
                let view = render(
                    &mut *surface,
                    &self.groups,
                    &aggregate.dataset,
                    aggregate.had_any_error,
                    &self.display,
                    &self.payment_base,
                );
                surface.set_last_update(&format_last_update(
                    Utc::now(),
                    self.timezone,
                    &self.display.last_update_format,
                ));
                let scale = fit_to_viewport(&mut *surface, &self.layout);
                surface.flush();

                if aggregate.had_any_error {
                    let keys: Vec<&str> =
                        aggregate.failures.iter().map(|f| f.key.as_str()).collect();
                    logger.warn(&format!(
                        "Refresh completed with failures for: {}",
                        keys.join(", ")
                    ));
                } else {
                    logger.debug(&format!(
                        "Refresh completed: {} charger(s), scale {:.3}",
                        view.tile_count(),
                        scale
                    ));
                }
                CycleOutcome::Completed {
                    had_any_error: aggregate.had_any_error,
                }
            }
            Err(e) => {
                logger.error(&format!("Refresh cycle failed: {}", e));
                let mut surface = self.surface.lock().await;
                surface.set_banner(Some(&self.display.messages.unexpected_error_banner));
                fit_to_viewport(&mut *surface, &self.layout);
                surface.flush();
                CycleOutcome::Failed(e.to_string())
            }
        };

        self.stats.record(&outcome, started.elapsed());
        outcome
    }

    /// Start periodic cycles: one immediately, then every `period`.
    ///
    /// Each tick runs its cycle on its own task so a slow cycle cannot delay
    /// the schedule; overlapping ticks are dropped by the single-flight guard.
    /// Stopping cancels the schedule and waits for cycles still in flight.
    pub fn spawn(self: Arc<Self>, period: Duration) -> RefreshTask {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let logger = self.logger.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut cycles = JoinSet::new();
            logger.info(&format!(
                "Refresh loop started ({} ms period)",
                period.as_millis()
            ));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let this = Arc::clone(&self);
                        cycles.spawn(async move {
                            this.run_cycle().await;
                        });
                    }
                    Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                        if let Err(e) = joined {
                            logger.error(&format!("Refresh cycle task failed: {}", e));
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            if !cycles.is_empty() {
                logger.info("Waiting for the running refresh cycle");
            }
            while let Some(joined) = cycles.join_next().await {
                if let Err(e) = joined {
                    logger.error(&format!("Refresh cycle task failed: {}", e));
                }
            }
            logger.info("Refresh loop stopped");
        });

        RefreshTask { stop_tx, handle }
    }
}

/// Handle to a running refresh schedule
#[derive(Debug)]
pub struct RefreshTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Cancel the schedule and wait for a cycle already in flight to finish
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
