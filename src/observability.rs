//! This module provides the structured diagnostics hook for the conversion engine.
//!
//! The `log_metric!` macro emits one key/value record through the `log` facade
//! at debug level. It is compiled out of release builds.

/// Logs a structured key-value metric record, only in debug builds.
///
/// # Example
/// ```
/// use dsl2sr::log_metric;
/// let block = 4;
/// log_metric!("event"="bitmerge", "block"=block);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("DSL2SR_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
