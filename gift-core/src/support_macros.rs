//! Small control-flow helpers for the gift service workflows.

/// Return early with `Ok($expression)`.
///
/// The workflows report refusals as ordinary outcomes rather than errors, so this is
/// the mirror image of a `fail!` style macro.
///
/// Used as `settle!(expression)`.
#[macro_export]
macro_rules! settle {
    ( $y:expr ) => {{
        return Ok($y);
    }};
}

/// Evaluate `$x:expr` and if not true return `Ok($y:expr)`.
///
/// Used as `ensure_or!(expression_to_ensure, outcome_to_return_on_false)`.
#[macro_export]
macro_rules! ensure_or {
    ( $x:expr, $y:expr $(,)? ) => {{
        if !$x {
            $crate::settle!($y);
        }
    }};
}
