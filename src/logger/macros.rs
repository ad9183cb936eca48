//! Leveled logging macros.
//!
//! Each macro has two forms:
//!
//! ```ignore
//! info!(logger => &ctx, "served {} in {}ms", path, elapsed);
//! info!(&ctx, "served {} in {}ms", path, elapsed);
//! ```
//!
//! The first logs through an injected [`Logger`](crate::Logger), the second
//! through the process-wide one.

#[macro_export]
macro_rules! debug {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.debug($ctx, ::std::format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::global::logger().debug($ctx, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.info($ctx, ::std::format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::global::logger().info($ctx, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.warn($ctx, ::std::format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::global::logger().warn($ctx, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.error($ctx, ::std::format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::global::logger().error($ctx, ::std::format_args!($($arg)+))
    };
}

/// Logs at fatal level, flushes, and exits the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr => $ctx:expr, $($arg:tt)+) => {
        $logger.fatal($ctx, ::std::format_args!($($arg)+))
    };
    ($ctx:expr, $($arg:tt)+) => {
        $crate::global::logger().fatal($ctx, ::std::format_args!($($arg)+))
    };
}
