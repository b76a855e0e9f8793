//! Evaluation strategies
//!
//! A [`Deferred`] wraps a re-callable step and decides when it is walked and
//! whether the result is kept:
//!
//! - `Eager` -- walks once when the wrapper is created and keeps the result
//! - `LazyMemoized` -- walks on the first read and keeps the result
//! - `LazyUnmemoized` -- walks on every read, keeps nothing
//!
//! Only the scalar result is ever kept, never the nodes of the walk.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EvalConfig;
use crate::error::ConfigError;

use super::node::{Node, RawStep};
use super::{unerase, Erased, Eval, Step};

/// When a wrapper walks its step and whether it keeps the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Walk at construction, keep the result
    #[serde(alias = "now")]
    Eager,
    /// Walk on first read, keep the result
    #[default]
    #[serde(alias = "later")]
    LazyMemoized,
    /// Walk on every read
    #[serde(alias = "always")]
    LazyUnmemoized,
}

impl Strategy {
    /// Canonical name, as accepted in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Eager => "eager",
            Strategy::LazyMemoized => "lazy-memoized",
            Strategy::LazyUnmemoized => "lazy-unmemoized",
        }
    }

    /// Whether wrappers with this strategy keep their result
    pub fn is_memoized(&self) -> bool {
        !matches!(self, Strategy::LazyUnmemoized)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" | "now" => Ok(Strategy::Eager),
            "lazy-memoized" | "lazy_memoized" | "later" => Ok(Strategy::LazyMemoized),
            "lazy-unmemoized" | "lazy_unmemoized" | "always" => Ok(Strategy::LazyUnmemoized),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Where a wrapper's root node comes from
enum Origin {
    /// The wrapped step; builds a fresh root node for each walk
    Step(Box<dyn Fn() -> Node>),
    /// Another wrapper's value, handed to a continuation
    After {
        upstream: Rc<dyn Upstream>,
        resume: Rc<dyn Fn(Erased) -> RawStep>,
    },
    /// Upstream link already taken apart by `Drop`
    Detached,
}

impl Origin {
    fn detach(&mut self) -> Option<Rc<dyn Upstream>> {
        match std::mem::replace(self, Origin::Detached) {
            Origin::After { upstream, .. } => Some(upstream),
            origin => {
                *self = origin;
                None
            }
        }
    }
}

/// A wrapper seen from a wrapper derived from it
trait Upstream {
    /// Root node of a walk producing the wrapper's value, starting from the
    /// stored result when there is one
    fn node(&self) -> Node;

    fn detach(&mut self) -> Option<Rc<dyn Upstream>>;
}

struct Inner<A> {
    origin: Origin,
    strategy: Strategy,
    config: EvalConfig,
    cached: OnceCell<A>,
}

impl<A> Inner<A> {
    /// Root node walking the wrapped step, ignoring any stored result
    fn source(&self) -> Node {
        match &self.origin {
            Origin::Step(source) => source(),
            Origin::After { upstream, resume } => {
                // The upstream node is built by a step of the walk, never here
                let upstream = Rc::clone(upstream);
                let resume = Rc::clone(resume);
                Node::new(Box::new(move || RawStep::Pending(upstream.node())))
                    .then(Box::new(move |value: Erased| resume(value)))
            }
            Origin::Detached => unreachable!("walked a wrapper that is being dropped"),
        }
    }
}

impl<A: Clone + 'static> Upstream for Inner<A> {
    fn node(&self) -> Node {
        match self.cached.get() {
            Some(value) => Eval::done(value.clone()).node,
            None => self.source(),
        }
    }

    fn detach(&mut self) -> Option<Rc<dyn Upstream>> {
        self.origin.detach()
    }
}

impl<A> Drop for Inner<A> {
    fn drop(&mut self) {
        // Unlink a chain of `after` wrappers one link at a time
        let mut next = self.origin.detach();
        while let Some(mut upstream) = next {
            next = Rc::get_mut(&mut upstream).and_then(|inner| inner.detach());
        }
    }
}

/// A recursive computation wrapped with an evaluation [`Strategy`].
///
/// Cloning shares the wrapper, including its cached result.
///
/// # Example
///
/// ```
/// use stackless::eval::{lazy_memoized, Eval, Step};
///
/// fn even(n: u64) -> Step<bool> {
///     if n == 0 { Step::Done(true) } else { Eval::new(move || odd(n - 1)).into() }
/// }
///
/// fn odd(n: u64) -> Step<bool> {
///     if n == 0 { Step::Done(false) } else { Eval::new(move || even(n - 1)).into() }
/// }
///
/// let deep = lazy_memoized(|| even(100_001));
/// assert!(!deep.is_cached());
/// assert!(!deep.value());
/// assert!(deep.is_cached());
/// ```
pub struct Deferred<A> {
    inner: Rc<Inner<A>>,
}

impl<A> Clone for Deferred<A> {
    fn clone(&self) -> Self {
        Deferred {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Deferred<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("strategy", &self.inner.strategy)
            .field("cached", &self.inner.cached.get())
            .finish()
    }
}

impl<A: Clone + 'static> Deferred<A> {
    /// Wrap `thunk` with `strategy` and the default configuration
    pub fn new<F>(strategy: Strategy, thunk: F) -> Self
    where
        F: Fn() -> Step<A> + 'static,
    {
        Self::with_options(strategy, EvalConfig::default(), thunk)
    }

    /// Wrap `thunk` with the strategy and walk settings of `config`
    pub fn with_config<F>(config: EvalConfig, thunk: F) -> Self
    where
        F: Fn() -> Step<A> + 'static,
    {
        Self::with_options(config.strategy, config, thunk)
    }

    fn with_options<F>(strategy: Strategy, config: EvalConfig, thunk: F) -> Self
    where
        F: Fn() -> Step<A> + 'static,
    {
        let thunk = Rc::new(thunk);
        let source = move || {
            let thunk = Rc::clone(&thunk);
            Eval::new(move || thunk()).node
        };
        Self::from_origin(strategy, config, Origin::Step(Box::new(source)))
    }

    fn from_origin(strategy: Strategy, config: EvalConfig, origin: Origin) -> Self {
        let deferred = Deferred {
            inner: Rc::new(Inner {
                origin,
                strategy,
                config,
                cached: OnceCell::new(),
            }),
        };
        if strategy == Strategy::Eager {
            deferred.force();
        }
        deferred
    }

    /// Acquire the value according to the strategy
    pub fn value(&self) -> A {
        if self.inner.strategy.is_memoized() {
            self.force().clone()
        } else {
            self.walk()
        }
    }

    /// Whether a result is stored (always true for `Eager`)
    pub fn is_cached(&self) -> bool {
        self.inner.cached.get().is_some()
    }

    /// The strategy of this wrapper
    pub fn strategy(&self) -> Strategy {
        self.inner.strategy
    }

    /// The configuration walks of this wrapper use
    pub fn config(&self) -> &EvalConfig {
        &self.inner.config
    }

    /// A node producing this wrapper's value, for use inside other steps.
    ///
    /// A stored result is reused; otherwise the node walks the wrapped step.
    pub fn to_eval(&self) -> Eval<A> {
        Eval::from_node(self.inner.node())
    }

    /// A new wrapper whose value is `f` applied to this wrapper's value.
    ///
    /// The new wrapper has the same strategy and configuration. Each of its
    /// walks starts from this wrapper's stored result when there is one, and
    /// walks the wrapped step otherwise. Chains of any length walk and drop
    /// without native recursion.
    pub fn after<B, F>(&self, f: F) -> Deferred<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> Step<B> + 'static,
    {
        let upstream = Rc::clone(&self.inner);
        let upstream: Rc<dyn Upstream> = upstream;
        let resume: Rc<dyn Fn(Erased) -> RawStep> =
            Rc::new(move |value: Erased| RawStep::from(f(unerase::<A>(value))));
        Deferred::from_origin(
            self.inner.strategy,
            self.inner.config,
            Origin::After { upstream, resume },
        )
    }

    /// Like [`after`](Self::after) with a plain function
    pub fn map<B, F>(&self, f: F) -> Deferred<B>
    where
        B: Clone + 'static,
        F: Fn(A) -> B + 'static,
    {
        self.after(move |a| Step::Done(f(a)))
    }

    fn force(&self) -> &A {
        self.inner.cached.get_or_init(|| {
            let value = self.walk();
            debug!(target: "stackless::eval", strategy = %self.inner.strategy, "result cached");
            value
        })
    }

    fn walk(&self) -> A {
        Eval::<A>::from_node(self.inner.source()).value_with(&self.inner.config)
    }
}

/// Immediate evaluation -- walks `thunk` now and keeps the result
pub fn eager<A, F>(thunk: F) -> Deferred<A>
where
    A: Clone + 'static,
    F: Fn() -> Step<A> + 'static,
{
    Deferred::new(Strategy::Eager, thunk)
}

/// Deferred evaluation with memoization -- walks `thunk` on first read and
/// keeps the result
pub fn lazy_memoized<A, F>(thunk: F) -> Deferred<A>
where
    A: Clone + 'static,
    F: Fn() -> Step<A> + 'static,
{
    Deferred::new(Strategy::LazyMemoized, thunk)
}

/// Deferred evaluation without memoization -- walks `thunk` on every read
pub fn lazy_unmemoized<A, F>(thunk: F) -> Deferred<A>
where
    A: Clone + 'static,
    F: Fn() -> Step<A> + 'static,
{
    Deferred::new(Strategy::LazyUnmemoized, thunk)
}
