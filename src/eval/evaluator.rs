//! Evaluator factory
//!
//! An [`Evaluator`] turns a step function plus its arguments into a node.
//! When the evaluator carries a cache, that node is bound to the cache entry
//! for `(function id, argument key)`: the walker answers it from the cache
//! when the entry exists, and records the function's value there the first
//! time it arrives otherwise.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::config::EvalConfig;
use crate::memo::{DefaultMemoCache, FnId, MemoArgs, MemoCache};

use super::node::{Erased, MemoHook, Node, RawStep};
use super::{Eval, Step};

/// Builds (optionally memoized) nodes for step functions.
///
/// Cloning is cheap; clones share the cache.
///
/// # Example
///
/// ```
/// use stackless::eval::{Eval, Evaluator, Step};
/// use stackless::memo::{DefaultMemoCache, FnId, MemoCache};
///
/// const FIB: FnId = FnId::new("fib");
///
/// fn fib(ev: &Evaluator<u64>, n: u64) -> Step<u64> {
///     if n < 2 {
///         return Step::Done(n);
///     }
///     let ev2 = ev.clone();
///     ev.call(FIB, fib, n - 1)
///         .after(move |x| ev2.call(FIB, fib, n - 2).map(move |y| x + y).into())
///         .into()
/// }
///
/// let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
/// assert_eq!(ev.call(FIB, fib, 90).value(), 2_880_067_194_370_816_120);
/// assert_eq!(ev.cache().map(|c| c.count(FIB)), Some(91));
/// ```
pub struct Evaluator<V, C = DefaultMemoCache<V>> {
    cache: Option<Rc<C>>,
    config: EvalConfig,
    _value: PhantomData<fn() -> V>,
}

impl<V, C> Clone for Evaluator<V, C> {
    fn clone(&self) -> Self {
        Evaluator {
            cache: self.cache.clone(),
            config: self.config,
            _value: PhantomData,
        }
    }
}

impl<V, C: fmt::Debug> fmt::Debug for Evaluator<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl<V, C> Default for Evaluator<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> Evaluator<V, C> {
    /// Create an evaluator without a cache; every call runs its step
    pub fn new() -> Self {
        Evaluator {
            cache: None,
            config: EvalConfig::default(),
            _value: PhantomData,
        }
    }

    /// Create an evaluator whose calls are memoized in `cache`
    pub fn with_cache(cache: C) -> Self {
        Self::with_shared_cache(Rc::new(cache))
    }

    /// Create an evaluator over a cache handle shared with other owners
    pub fn with_shared_cache(cache: Rc<C>) -> Self {
        Evaluator {
            cache: Some(cache),
            config: EvalConfig::default(),
            _value: PhantomData,
        }
    }

    /// Use `config` when walking through [`value`](Self::value)
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// The walk configuration of this evaluator
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// The injected cache, if any
    pub fn cache(&self) -> Option<&C> {
        self.cache.as_deref()
    }
}

impl<V, C> Evaluator<V, C>
where
    V: Clone + 'static,
    C: MemoCache<V> + 'static,
{
    /// A node applying `f` to `args`.
    ///
    /// `f` receives this evaluator so it can make further calls. With a
    /// cache, the node is bound to the entry for `(id, args.memo_key())`.
    pub fn call<Args, F>(&self, id: FnId, f: F, args: Args) -> Eval<V>
    where
        Args: MemoArgs + 'static,
        F: FnOnce(&Self, Args) -> Step<V> + 'static,
    {
        let slot = self.cache.as_ref().map(|cache| MemoSlot {
            cache: Rc::clone(cache),
            id,
            key: args.memo_key(),
            _value: PhantomData::<fn() -> V>,
        });

        let ev = self.clone();
        let mut node = Node::new(Box::new(move || RawStep::from(f(&ev, args))));
        node.memo = slot.map(|slot| Box::new(slot) as Box<dyn MemoHook>);
        Eval::from_node(node)
    }

    /// Walk `eval` with this evaluator's configuration
    pub fn value(&self, eval: Eval<V>) -> V {
        eval.value_with(&self.config)
    }
}

/// Binding of one node to one cache entry
struct MemoSlot<V, C> {
    cache: Rc<C>,
    id: FnId,
    key: String,
    _value: PhantomData<fn() -> V>,
}

impl<V, C> MemoHook for MemoSlot<V, C>
where
    V: Clone + 'static,
    C: MemoCache<V>,
{
    fn lookup(&self) -> Option<Erased> {
        self.cache
            .get(self.id, &self.key)
            .map(|value| Box::new(value) as Erased)
    }

    fn record(&self, value: &Erased) {
        if self.cache.has(self.id, &self.key) {
            return;
        }
        match value.downcast_ref::<V>() {
            Some(value) => {
                self.cache.set(self.id, self.key.clone(), value.clone());
            }
            None => unreachable!(
                "memoized step produced a value that is not a {}",
                type_name::<V>()
            ),
        }
    }
}
