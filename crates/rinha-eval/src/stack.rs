//! Native stack growth for deep evaluation.
//!
//! Calls, operands and tuple fields all recurse on the host stack, so a
//! program like `count(100000)` nests that many `Evaluator::evaluate` frames.
//! Each of those goes through [`ensure_sufficient_stack`], which is the only
//! point where stack space is checked.
//!
//! The red zone has to cover everything that runs between two checks: one
//! `eval_term` frame plus the helper it dispatches to (`eval_call` binding
//! arguments, `eval_print` rendering a value, `operators::apply_binary`).
//! Those frames come to a few KiB in debug builds, so 128 KiB leaves ample
//! room, including for a sink that writes through `std::io`.
//!
//! A fresh segment is 2 MiB. A call costs a handful of frames, so one
//! segment holds several hundred nested calls and the allocation is paid
//! rarely even for recursion tens of thousands of calls deep.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, moving to a new stack segment first if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// No segmented stacks on wasm; the host limit applies.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
