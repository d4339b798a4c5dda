use tracing::{debug, error, info, trace, warn};

/// Context information for log messages
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "fetch", "refresh", "web")
    pub component: String,
    /// Refresh cycle number, when logging from inside a cycle
    pub cycle: Option<u64>,
    /// Additional context fields
    pub extra_fields: std::collections::BTreeMap<String, String>,
}

impl LogContext {
    /// Create a new log context
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            cycle: None,
            extra_fields: std::collections::BTreeMap::new(),
        }
    }

    /// Set cycle number
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Add extra field
    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.extra_fields.insert(key.to_string(), value);
        self
    }
}

/// Structured logger with context
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

// Component and cycle are recorded as tracing fields; extras are folded into one
macro_rules! emit {
    ($level:ident, $logger:expr, $message:expr) => {{
        let logger: &StructuredLogger = $logger;
        $level!(
            component = %logger.context.component,
            cycle = logger.context.cycle,
            extra = %logger.extra_fields(),
            "{}",
            $message
        )
    }};
}

impl StructuredLogger {
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn info(&self, message: &str) {
        emit!(info, self, message);
    }

    pub fn warn(&self, message: &str) {
        emit!(warn, self, message);
    }

    pub fn error(&self, message: &str) {
        emit!(error, self, message);
    }

    pub fn debug(&self, message: &str) {
        emit!(debug, self, message);
    }

    pub fn trace(&self, message: &str) {
        emit!(trace, self, message);
    }

    /// `k=v` pairs of the extra fields, comma separated
    fn extra_fields(&self) -> String {
        self.context
            .extra_fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context() {
        let context = LogContext::new("test")
            .with_cycle(7)
            .with_field("key", "value".to_string());

        assert_eq!(context.component, "test");
        assert_eq!(context.cycle, Some(7));
        assert_eq!(context.extra_fields.get("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_extra_fields() {
        let logger = get_logger_with_context(
            LogContext::new("fetch")
                .with_cycle(3)
                .with_field("status", "503".to_string())
                .with_field("key", "inc298".to_string()),
        );
        assert_eq!(logger.extra_fields(), "key=inc298,status=503");
        assert_eq!(get_logger("web").extra_fields(), "");
        assert_eq!(get_logger("web").context().component, "web");
    }
}
