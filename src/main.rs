use anyhow::Result;
use chargeboard::Config;
use chargeboard::fetch::{FetchAggregator, HttpStatusSource};
use chargeboard::logging::{get_logger, init_logging};
use chargeboard::refresh::RefreshLoop;
use chargeboard::render::{DisplaySurface, HtmlSurface, verify_mounts};
use chargeboard::web::{self, AppState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        get_logger("main").error(&format!("Failed to listen for shutdown signal: {}", e));
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_logging(&config.logging)?;
    let logger = get_logger("main");
    logger.info(&format!(
        "Chargeboard {} starting: {} location group(s), {} ms refresh",
        env!("APP_VERSION"),
        config.groups.len(),
        config.refresh_interval_ms
    ));

    let (surface, template_err) =
        HtmlSurface::from_config_or_builtin(&config.surface, &config.layout);
    let startup_err = template_err.or_else(|| verify_mounts(&surface).err());
    let mounts_ok = match startup_err {
        None => true,
        Some(e) => {
            logger.error(&format!("Cannot start refresh loop: {}", e));
            false
        }
    };
    let surface = Arc::new(Mutex::new(surface));

    let refresh_task = if mounts_ok {
        let source = HttpStatusSource::new(&config.endpoint)?;
        let aggregator = FetchAggregator::new(Arc::new(source));
        let refresh = Arc::new(RefreshLoop::new(
            &config,
            aggregator,
            Arc::clone(&surface),
        )?);
        let stats = refresh.stats();
        let task = refresh.spawn(Duration::from_millis(config.refresh_interval_ms));
        Some((task, stats))
    } else {
        let mut s = surface.lock().await;
        s.set_banner(Some(&config.display.messages.missing_mounts_banner));
        s.flush();
        None
    };

    let config = Arc::new(config);
    let state = AppState {
        surface,
        config: Arc::clone(&config),
        stats: refresh_task.as_ref().map(|(_, stats)| Arc::clone(stats)),
    };

    let served = web::serve(state, &config.web.host, config.web.port, shutdown_signal()).await;

    if let Some((task, _)) = refresh_task {
        task.stop().await;
    }
    logger.info("Chargeboard shutdown complete");
    served
}
