//! Logging macros that route to `defmt` on target.
//!
//! Library code is also built on the host for tests, where `defmt` is not
//! linked. These macros expand to the matching `defmt` call when the
//! `defmt` feature is enabled and to nothing otherwise, so log arguments
//! must use `defmt` format syntax.

/// Log a message at Debug level.
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

/// Log a message at Info level.
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
    }};
}

/// Log a message at Warn level.
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}
