//! Trampolined Continuation-Passing Evaluation
//!
//! A lower-level surface for the same problem the node walker solves. Each
//! step function receives the continuation it must eventually answer to and
//! returns a [`Call`]: either "bounce into this packaged call" or the final
//! value. The driver loop in [`run`] unwinds bounces one at a time and keeps
//! waiting continuations on its own stack, so neither recursion depth nor
//! continuation nesting grows the native stack.
//!
//! There is no memoization at this level.
//!
//! # Example
//!
//! ```
//! use stackless::trampoline::{call, resume, run_trampoline, Call, Next};
//!
//! // fib(n) = fib(n - 1) + fib(n - 2)
//! fn fib(next: Next<u64, u64>, n: u64) -> Call<u64> {
//!     if n < 2 {
//!         return resume(next, 1);
//!     }
//!     call(
//!         fib,
//!         Next::new(move |x: u64| {
//!             call(fib, Next::new(move |y: u64| resume(next, x + y)), (n - 1,))
//!         }),
//!         (n - 2,),
//!     )
//! }
//!
//! assert_eq!(run_trampoline(fib, (20,)), 10_946);
//! ```
//!
//! A continuation hands its value on with [`resume`] or passes `next` to a
//! tail [`call`]. Returning [`Call::Return`] from any step ends the whole run
//! with that value.

mod engine;
mod types;

pub use engine::{call, resume, run, run_trampoline};
pub use types::{Bounce, Call, Next, Trampolined};
