//! Deferred Node Types
//!
//! These are the untyped building blocks the walker operates on. Values are
//! erased to `Box<dyn Any>` so that one walk can thread steps of different
//! result types; the typed surface in the parent module guarantees every
//! downcast matches what was boxed.

use std::any::{type_name, Any};

/// A value crossing the walker with its type erased
pub(crate) type Erased = Box<dyn Any>;

/// The step of a node: runs once, yields a value or another node
pub(crate) type Compute = Box<dyn FnOnce() -> RawStep>;

/// A one-shot continuation applied to a node's value on the way up
pub(crate) type Resume = Box<dyn FnOnce(Erased) -> RawStep>;

/// Untyped result of a step or continuation
pub(crate) enum RawStep {
    /// Plain value, ascend with it
    Value(Erased),
    /// More work, descend into it
    Pending(Node),
}

/// Cache binding of a node: where its value is looked up and recorded
pub(crate) trait MemoHook {
    /// Value recorded for this node's `(function, args)`, if any
    fn lookup(&self) -> Option<Erased>;

    /// Record `value` for this node's `(function, args)` unless already present
    fn record(&self, value: &Erased);
}

/// Deferred Node
pub(crate) struct Node {
    /// Step producing the node's value
    pub(crate) compute: Compute,
    /// Continuation fired on the node's value (at most once)
    pub(crate) after: Option<Resume>,
    /// Memoization binding, if the node belongs to a memoized function
    pub(crate) memo: Option<Box<dyn MemoHook>>,
}

impl Node {
    pub(crate) fn new(compute: Compute) -> Self {
        Node {
            compute,
            after: None,
            memo: None,
        }
    }

    /// Attach `resume` as this node's continuation.
    ///
    /// If the slot is already taken, the node becomes the step of a new node
    /// carrying `resume`, so the earlier continuation still fires first.
    pub(crate) fn then(self, resume: Resume) -> Node {
        if self.after.is_none() {
            Node {
                after: Some(resume),
                ..self
            }
        } else {
            Node {
                compute: Box::new(move || RawStep::Pending(self)),
                after: Some(resume),
                memo: None,
            }
        }
    }

    /// Split into the step to run and the frame that waits for its value
    pub(crate) fn into_parts(self) -> (Compute, Frame) {
        (
            self.compute,
            Frame {
                after: self.after,
                memo: self.memo,
            },
        )
    }
}

/// A node that has been descended into and waits for its value.
///
/// The walker keeps frames on an explicit stack in place of `up` links: the
/// frame below the top is the node waiting for the top frame's value.
pub(crate) struct Frame {
    after: Option<Resume>,
    memo: Option<Box<dyn MemoHook>>,
}

impl Frame {
    /// Cached value for the node, consulted before its step runs
    pub(crate) fn lookup(&self) -> Option<Erased> {
        self.memo.as_ref().and_then(|memo| memo.lookup())
    }

    /// Record the node's value on its first arrival; later arrivals carry
    /// continuation results and are not recorded
    pub(crate) fn record(&mut self, value: &Erased) {
        if let Some(memo) = self.memo.take() {
            memo.record(value);
        }
    }

    /// Take the continuation out of its slot; a second call yields `None`
    pub(crate) fn take_after(&mut self) -> Option<Resume> {
        self.after.take()
    }
}

/// Recover a typed value from the walker.
///
/// # Panics
/// Panics if `value` is not an `A`, which means a typed wrapper boxed a value
/// of a different type than it declared.
pub(crate) fn unerase<A: 'static>(value: Erased) -> A {
    match value.downcast::<A>() {
        Ok(value) => *value,
        Err(_) => unreachable!("walker produced a value that is not a {}", type_name::<A>()),
    }
}
