//! Walker - Iterative Evaluation
//!
//! This module contains the descend/ascend loop that evaluates a tree of
//! deferred nodes with an explicit frame stack instead of recursive calls,
//! so recursion depth is bounded by heap memory rather than the native stack.

use tracing::{debug, trace};

use crate::config::EvalConfig;

use super::node::{Erased, Node, RawStep};

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Steps that were actually run
    pub steps: u64,
    /// Steps answered from a memo cache instead of running
    pub cache_hits: u64,
    /// Continuations fired
    pub continuations: u64,
    /// Deepest frame stack reached
    pub max_depth: usize,
}

/// Walk `root` to its final value.
///
/// Descend: take the current node's value from its memo cache, or run its
/// step. A node result pushes a frame and descends into it.
///
/// Ascend: hand the value to the top frame. The frame records it in the cache
/// (first arrival only, before the continuation runs), then fires its
/// continuation once. A node from the continuation is descended into with the
/// same frame waiting above it; a plain value pops the frame and moves on to
/// the frame below. An empty stack means the value is the answer.
///
/// The step functions must converge; a walk whose steps keep yielding nodes
/// never returns.
pub(crate) fn walk(root: Node, config: &EvalConfig) -> (Erased, WalkStats) {
    let mut stats = WalkStats::default();
    let mut frames = Vec::with_capacity(config.stack_capacity);
    let mut node = root;

    'descend: loop {
        let (compute, frame) = node.into_parts();
        let step = match frame.lookup() {
            Some(hit) => {
                stats.cache_hits += 1;
                RawStep::Value(hit)
            }
            None => {
                stats.steps += 1;
                compute()
            }
        };
        frames.push(frame);
        stats.max_depth = stats.max_depth.max(frames.len());

        if config.trace_steps {
            trace!(target: "stackless::eval", depth = frames.len(), pending = matches!(step, RawStep::Pending(_)), "descend");
        }

        let mut value = match step {
            RawStep::Pending(next) => {
                node = next;
                continue 'descend;
            }
            RawStep::Value(value) => value,
        };

        // Ascend until a continuation yields more work or the stack empties
        loop {
            let Some(frame) = frames.last_mut() else {
                debug!(
                    target: "stackless::eval",
                    steps = stats.steps,
                    cache_hits = stats.cache_hits,
                    continuations = stats.continuations,
                    max_depth = stats.max_depth,
                    "walk complete"
                );
                return (value, stats);
            };

            frame.record(&value);

            if let Some(after) = frame.take_after() {
                stats.continuations += 1;
                if config.trace_steps {
                    trace!(target: "stackless::eval", depth = frames.len(), "continuation");
                }
                match after(value) {
                    RawStep::Pending(next) => {
                        // The frame stays; its value is whatever `next` yields
                        node = next;
                        continue 'descend;
                    }
                    RawStep::Value(next_value) => value = next_value,
                }
            }

            frames.pop();
            if config.trace_steps {
                trace!(target: "stackless::eval", depth = frames.len(), "ascend");
            }
        }
    }
}
