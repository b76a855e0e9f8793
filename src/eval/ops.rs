//! Combinators on deferred nodes
//!
//! Everything here is expressed through [`Eval::after`], so the combinators
//! stay stack-safe however deeply they are nested.

use super::{Eval, Step};

impl<A: 'static> Eval<A> {
    /// Transform the value with a plain function
    pub fn map<B, F>(self, f: F) -> Eval<B>
    where
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        self.after(move |a| Step::Done(f(a)))
    }

    /// Continue with the node returned by `f`
    pub fn and_then<B, F>(self, f: F) -> Eval<B>
    where
        B: 'static,
        F: FnOnce(A) -> Eval<B> + 'static,
    {
        self.after(move |a| Step::Pending(f(a)))
    }

    /// Walk `self`, then `other`, and pair their values
    pub fn zip<B: 'static>(self, other: Eval<B>) -> Eval<(A, B)> {
        self.and_then(move |a| other.map(move |b| (a, b)))
    }
}

impl<A: 'static> Eval<Eval<A>> {
    /// Walk the outer node, then the node it produced
    pub fn flatten(self) -> Eval<A> {
        self.and_then(|inner| inner)
    }
}

impl<T: 'static, E: 'static> Eval<Result<T, E>> {
    /// Continue with `f` on `Ok`; an `Err` passes through untouched
    pub fn after_ok<U, F>(self, f: F) -> Eval<Result<U, E>>
    where
        U: 'static,
        F: FnOnce(T) -> Step<Result<U, E>> + 'static,
    {
        self.after(move |result| match result {
            Ok(value) => f(value),
            Err(err) => Step::Done(Err(err)),
        })
    }

    /// Transform an `Ok` value; an `Err` passes through untouched
    pub fn map_ok<U, F>(self, f: F) -> Eval<Result<U, E>>
    where
        U: 'static,
        F: FnOnce(T) -> U + 'static,
    {
        self.map(move |result| result.map(f))
    }
}
