//! Logging facade
//!
//! The firmware logs through defmt on target and through tracing in the
//! emulator and host tests. Call sites use `platform::info!` and friends and
//! stay identical across both builds:
//!
//! ```
//! platform::info!("{} -> {}", "Idle", "CheckSavedCredentials");
//! ```
//!
//! Selection happens at the definition site:
//!
//! - `defmt` feature: forwards to `defmt::*!` (the calling crate must forward
//!   its own `defmt` feature to `platform/defmt`)
//! - `tracing` feature: forwards to `tracing::*!`
//! - neither: the arguments are borrowed and discarded
//!
//! Arguments must implement both `defmt::Format` and `core::fmt::Display`.
//! In practice that means `&str`, integers and `bool`; enums expose an
//! `as_str()` for logging. defmt does not support precision specifiers, so
//! floats are pre-formatted or logged as integers.

#[cfg(feature = "defmt")]
mod imp {
    /// Trace-level log.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => { ::defmt::trace!($($arg)*) };
    }

    /// Debug-level log.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => { ::defmt::debug!($($arg)*) };
    }

    /// Info-level log.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => { ::defmt::info!($($arg)*) };
    }

    /// Warning-level log.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => { ::defmt::warn!($($arg)*) };
    }

    /// Error-level log.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => { ::defmt::error!($($arg)*) };
    }
}

#[cfg(all(feature = "tracing", not(feature = "defmt")))]
mod imp {
    /// Trace-level log.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => { $crate::__tracing::trace!($($arg)*) };
    }

    /// Debug-level log.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => { $crate::__tracing::debug!($($arg)*) };
    }

    /// Info-level log.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => { $crate::__tracing::info!($($arg)*) };
    }

    /// Warning-level log.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => { $crate::__tracing::warn!($($arg)*) };
    }

    /// Error-level log.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => { $crate::__tracing::error!($($arg)*) };
    }
}

#[cfg(not(any(feature = "defmt", feature = "tracing")))]
mod imp {
    /// Trace-level log (disabled).
    #[macro_export]
    macro_rules! trace {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    /// Debug-level log (disabled).
    #[macro_export]
    macro_rules! debug {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    /// Info-level log (disabled).
    #[macro_export]
    macro_rules! info {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    /// Warning-level log (disabled).
    #[macro_export]
    macro_rules! warn {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
    }

    /// Error-level log (disabled).
    #[macro_export]
    macro_rules! error {
        ($fmt:literal $(, $arg:expr)* $(,)?) => {{ $( let _ = &$arg; )* }};
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    #[test]
    fn test_log_macros_accept_display_args() {
        let state = "Connecting";
        let retries: u8 = 2;
        crate::trace!("tick");
        crate::debug!("state {}", state);
        crate::info!("{} -> {}", state, "Connected");
        crate::warn!("retry {} of {}", retries, 2u8);
        crate::error!("fatal {}", true,);
    }
}
