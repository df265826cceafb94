pub mod auth;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod traits;

/// Logs a protocol step at `info` when the client is verbose, `debug` otherwise.
macro_rules! verbose {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            log::info!($($arg)+);
        } else {
            log::debug!($($arg)+);
        }
    };
}
pub(crate) use verbose;
