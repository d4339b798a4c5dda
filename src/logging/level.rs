use crate::error::{ChargeboardError, Result};
use tracing::Level;

/// Parse log level string to tracing Level
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(ChargeboardError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}

/// The more verbose of two levels
pub fn min_level(a: Level, b: Level) -> Level {
    // tracing orders more verbose levels as greater
    a.max(b)
}
