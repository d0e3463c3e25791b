//! Logging hooks that vanish without the `tracing` feature.
//!
//! `enter_span!` opens and enters an info span for the rest of the enclosing
//! scope; `trace_log!` emits one named event at an explicit level. Without
//! the feature both still evaluate their field expressions, so call sites
//! need no `cfg` of their own.

/// Enters an info span named `$name` until the end of the current scope.
///
/// Bind the result (`let _span = enter_span!(...)`) or the span closes at once.
#[cfg(feature = "tracing")]
macro_rules! enter_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info_span!($name $(, $key = $value)*).entered()
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! enter_span {
    ($name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        ($($value,)*)
    };
}

/// Emits an event named `$name` at `$level` (`info`, `warn`, `debug`, ...).
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($level:ident, $name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::event!(name: $name, $crate::trace::trace_level!($level), { $($key = $value),* })
    };
}

/// Maps a lowercase level ident to its `tracing::Level`.
#[cfg(feature = "tracing")]
macro_rules! trace_level {
    (trace) => { tracing::Level::TRACE };
    (debug) => { tracing::Level::DEBUG };
    (info) => { tracing::Level::INFO };
    (warn) => { tracing::Level::WARN };
    (error) => { tracing::Level::ERROR };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($level:ident, $name:literal $(, $key:ident = $value:expr)* $(,)?) => {
        let _ = ($($value,)*);
    };
}

pub(crate) use enter_span;
pub(crate) use trace_log;
#[cfg(feature = "tracing")]
pub(crate) use trace_level;
