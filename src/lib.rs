//! Stackless - Deferred Evaluation of Recursive Computations
//!
//! This library runs recursive functions of arbitrary depth without growing
//! the native call stack. A function written against it returns, at each
//! level, either its value or a deferred node describing the recursive work
//! still to do; a single iterative walker drives those nodes to a result.
//!
//! # Architecture
//!
//! 1. **Deferred nodes** (`eval` module)
//!    - `Step<A>` / `Eval<A>`: the typed value-or-node surface
//!    - Descend/Ascend walker over an explicit frame stack
//!    - `after` continuations fired exactly once per node
//!    - Eager, lazy-memoized and lazy-unmemoized strategy wrappers
//!
//! 2. **Memoization** (`memo` module)
//!    - Caches keyed by function identity plus a canonical argument key
//!    - Unbounded, concurrent (`DashMap`) and LRU-bounded implementations
//!    - Injected per evaluator; there is no global cache
//!
//! 3. **Low-level trampoline** (`trampoline` module)
//!    - Continuation-passing step functions returning tagged `Call`s
//!    - Flat driver loop, no memoization
//!
//! # Example
//!
//! ```rust
//! use stackless::{Eval, Step};
//!
//! // adder(n) = 1 + adder(n - 1), far deeper than the native stack allows
//! fn adder(n: u64) -> Step<u64> {
//!     if n == 0 {
//!         Step::Done(0)
//!     } else {
//!         Eval::new(move || adder(n - 1)).map(|x| x + 1).into()
//!     }
//! }
//!
//! assert_eq!(Eval::new(|| adder(1 << 20)).value(), 1 << 20);
//! ```
//!
//! # Memoized Recursion
//!
//! ```rust
//! use stackless::{DefaultMemoCache, Evaluator, FnId, MemoCache, Step};
//!
//! const ACK: FnId = FnId::new("ack");
//!
//! fn ack(ev: &Evaluator<u64>, (m, n): (u64, u64)) -> Step<u64> {
//!     match (m, n) {
//!         (0, n) => Step::Done(n + 1),
//!         (m, 0) => ev.call(ACK, ack, (m - 1, 1)).into(),
//!         (m, n) => {
//!             let ev2 = ev.clone();
//!             ev.call(ACK, ack, (m, n - 1))
//!                 .after(move |x| ev2.call(ACK, ack, (m - 1, x)).into())
//!                 .into()
//!         }
//!     }
//! }
//!
//! let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
//! assert_eq!(ev.call(ACK, ack, (2, 1)).value(), 5);
//! assert!(ev.cache().is_some_and(|cache| cache.has(ACK, "2_1")));
//! ```

pub mod config;
pub mod error;
pub mod eval;
pub mod memo;
pub mod trampoline;

pub use config::EvalConfig;
pub use error::ConfigError;
pub use eval::{
    eager, lazy_memoized, lazy_unmemoized, Deferred, Eval, Evaluator, Step, Strategy, WalkStats,
};
pub use memo::{
    BoundedMemoCache, CacheStats, ConcurrentMemoCache, DefaultMemoCache, FnId, MemoArgs, MemoCache,
};
