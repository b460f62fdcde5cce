//! ---
//! sicp_section: "03-persistence-logging"
//! sicp_subsection: "module"
//! sicp_type: "source"
//! sicp_scope: "code"
//! sicp_description: "Context-enriched logging macros."
//! sicp_version: "v0.0.0-prealpha"
//! sicp_owner: "tbd"
//! ---
#[doc(hidden)]
#[macro_export]
macro_rules! __sicp_event {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {{
        let ctx: &$crate::LogContext = &$ctx;
        $crate::tracing::event!(
            $level,
            display = ctx.display.unwrap_or(""),
            monitor_id = ctx.monitor_id.unwrap_or_default(),
            group_id = ctx.group_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an informational log enriched with display context.
#[macro_export]
macro_rules! sicp_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with display context.
#[macro_export]
macro_rules! sicp_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with display context.
#[macro_export]
macro_rules! sicp_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with display context.
#[macro_export]
macro_rules! sicp_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::__sicp_event!($crate::tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
