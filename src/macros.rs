// src/macros.rs

/// Logs a record tagged with a component name.
///
/// The component becomes the record's target, so the dispatcher installed by
/// the binary prints it next to the timestamp, level, pid and tid.
///
/// Usage:
/// ```rust
/// use log::Level;
/// fixture_check::check_log!(Level::Info, "loader", "Loaded {} rows", 42);
/// ```
/// Logs like:
/// [2025-04-25T16:32:10+02:00][INFO ][loader][pid=4568][tid=ThreadId(1)] Loaded 42 rows
#[macro_export]
macro_rules! check_log {
    ($level:expr, $component:literal, $fmt:literal $(, $($arg:tt)+)?) => {
        log::log!(target: $component, $level, $fmt $(, $($arg)+)?)
    };
}
