//! Stack growth for deeply nested input
//!
//! Parsing and rendering both recurse once per nesting level, so input like
//! `((((...))))` or `----x` can be nested far deeper than the native stack
//! allows. Recursive paths run through [`ensure_sufficient_stack`], which
//! switches to a freshly allocated segment when the current one runs low.
//!
//! On `wasm32` the wrapper is a plain call.

/// Grow once less than this much stack is left.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a new stack segment if the current one is
/// close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
