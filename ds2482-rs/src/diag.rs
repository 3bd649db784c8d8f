//! Diagnostics that vanish without the `log` feature.

#[cfg(feature = "log")]
macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {
        log::$level!($($arg)+)
    };
}

#[cfg(not(feature = "log"))]
macro_rules! diag {
    ($level:ident, $($arg:tt)+) => {{
        let _ = core::format_args!($($arg)+);
    }};
}
