//! Optional logging shims
//!
//! Forward to the `log` facade when the `log` feature is enabled and compile
//! to nothing otherwise, so the engine never requires a logger.

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}
