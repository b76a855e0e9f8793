//! Stack-safe evaluation of recursive computations
//!
//! A recursive function written against this module returns a [`Step`] at
//! every level: either its final value, or a deferred [`Eval`] node meaning
//! "keep computing, then continue with this". The walker threads through those
//! nodes on an explicit heap stack, so recursion depth never grows the native
//! call stack.
//!
//! # Forms
//!
//! - **Standard form**: the recursive call is a node, the remaining work an
//!   [`Eval::after`] continuation
//! - **Tail-call form**: the recursive call is returned as the step itself
//! - **Multiple / mutual recursion**: continuations return further nodes
//!
//! # Example
//!
//! ```
//! use stackless::eval::{Eval, Step};
//!
//! // fact(n) = n * fact(n - 1)
//! fn fact(n: u64) -> Step<u64> {
//!     if n > 1 {
//!         Eval::new(move || fact(n - 1)).map(move |x| x * n).into()
//!     } else {
//!         Step::Done(1)
//!     }
//! }
//!
//! // fib(n) = fib(n - 1) + fib(n - 2)
//! fn fib(n: u64) -> Step<u64> {
//!     if n < 2 {
//!         return Step::Done(1);
//!     }
//!     Eval::new(move || fib(n - 1))
//!         .after(move |x| Eval::new(move || fib(n - 2)).map(move |y| x + y).into())
//!         .into()
//! }
//!
//! assert_eq!(Eval::new(|| fact(10)).value(), 3_628_800);
//! assert_eq!(Eval::new(|| fib(20)).value(), 10_946);
//! ```
//!
//! Wrappers in [`strategy`] decide when a walk runs and whether its result is
//! kept; [`Evaluator`] attaches a memoization cache to step functions.

mod engine;
mod evaluator;
mod node;
mod ops;
pub mod strategy;

use std::fmt;
use std::marker::PhantomData;

use crate::config::EvalConfig;

use node::{Node, RawStep, Resume};

pub(crate) use node::{unerase, Erased};

pub use engine::WalkStats;
pub use evaluator::Evaluator;
pub use strategy::{eager, lazy_memoized, lazy_unmemoized, Deferred, Strategy};

/// Result of a single step or continuation
pub enum Step<A> {
    /// Final value for this level
    Done(A),
    /// More work: walk this node, its value is this level's value
    Pending(Eval<A>),
}

impl<A> Step<A> {
    /// Whether this step is a final value
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }
}

impl<A> From<Eval<A>> for Step<A> {
    fn from(eval: Eval<A>) -> Self {
        Step::Pending(eval)
    }
}

impl<A> fmt::Debug for Step<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Done(value) => f.debug_tuple("Done").field(value).finish(),
            Step::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl<A: 'static> From<Step<A>> for RawStep {
    fn from(step: Step<A>) -> Self {
        match step {
            Step::Done(value) => RawStep::Value(Box::new(value)),
            Step::Pending(eval) => RawStep::Pending(eval.node),
        }
    }
}

/// Deferred Node producing a value of type `A` when walked.
///
/// A node is one-shot: walking consumes it. Use a
/// [`Deferred`] wrapper to read a value more than once.
#[must_use = "an Eval does nothing until it is walked"]
pub struct Eval<A> {
    node: Node,
    _value: PhantomData<fn() -> A>,
}

impl<A> fmt::Debug for Eval<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eval")
            .field("type", &std::any::type_name::<A>())
            .field("has_after", &self.node.after.is_some())
            .field("memoized", &self.node.memo.is_some())
            .finish()
    }
}

impl<A: 'static> Eval<A> {
    /// Create a node whose step is `thunk`
    pub fn new<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Step<A> + 'static,
    {
        Self::from_node(Node::new(Box::new(move || RawStep::from(thunk()))))
    }

    /// Create a node that is already a value
    pub fn done(value: A) -> Self {
        Self::new(move || Step::Done(value))
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Eval {
            node,
            _value: PhantomData,
        }
    }

    /// Apply `f` to this node's value before handing it to whatever waits
    /// above.
    ///
    /// `f` runs exactly once per walk. It may return a plain value (once
    /// recursive functions) or another node (multiply and mutually recursive
    /// functions).
    pub fn after<B, F>(self, f: F) -> Eval<B>
    where
        B: 'static,
        F: FnOnce(A) -> Step<B> + 'static,
    {
        let resume: Resume = Box::new(move |value| RawStep::from(f(unerase::<A>(value))));
        Eval::from_node(self.node.then(resume))
    }

    /// Walk the node with the default configuration
    pub fn value(self) -> A {
        self.value_with(&EvalConfig::default())
    }

    /// Walk the node with `config`
    pub fn value_with(self, config: &EvalConfig) -> A {
        self.run(config).0
    }

    /// Walk the node with `config`, returning the walk counters as well
    pub fn run(self, config: &EvalConfig) -> (A, WalkStats) {
        let (value, stats) = engine::walk(self.node, config);
        (unerase(value), stats)
    }
}
