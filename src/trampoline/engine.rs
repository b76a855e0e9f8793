//! Trampoline Driver
//!
//! Unwinds bounces in a flat loop until a [`Call::Return`] comes out. Fresh
//! continuations are pushed on an explicit stack when a step is called and
//! popped when a value is resumed, so neither recursion depth nor
//! continuation nesting reaches the native stack.

use tracing::{debug, trace};

use super::types::{Action, Bounce, Call, Next, Trampolined};

/// Package "apply `f` to `next` and `args`" without applying it yet
pub fn call<F, R, Args, T>(f: F, next: Next<R, T>, args: Args) -> Call<T>
where
    F: Trampolined<R, Args, T> + 'static,
    R: 'static,
    Args: 'static,
    T: 'static,
{
    let step: Box<dyn FnOnce() -> Call<T>> = Box::new(move || f.invoke(Next::waiting(), args));
    match next.into_frame() {
        Some(frame) => Call::Bounce(Bounce(Action::Push(frame, step))),
        None => Call::Bounce(Bounce(Action::Run(step))),
    }
}

/// Package "hand `value` to `next`" without calling `next` yet
pub fn resume<A, T>(next: Next<A, T>, value: A) -> Call<T>
where
    A: 'static,
    T: 'static,
{
    next.apply(value)
}

/// Unwind `call` to its final value.
///
/// A `Return` ends the run at once, whatever continuations are still
/// waiting. The computation must converge; a chain of calls that never
/// returns keeps the loop spinning.
///
/// # Panics
/// Panics if a step resumes a `Next` handed out by a different run.
pub fn run<T: 'static>(mut call: Call<T>) -> T {
    let mut frames = Vec::new();
    let mut bounces: u64 = 0;
    let mut max_depth: usize = 0;

    loop {
        let action = match call {
            Call::Bounce(Bounce(action)) => action,
            Call::Return(value) => {
                debug!(
                    target: "stackless::trampoline",
                    bounces,
                    max_depth,
                    abandoned = frames.len(),
                    "trampoline complete"
                );
                return value;
            }
        };
        bounces += 1;
        trace!(target: "stackless::trampoline", bounces, depth = frames.len(), "bounce");

        call = match action {
            Action::Run(step) => step(),
            Action::Push(frame, step) => {
                frames.push(frame);
                max_depth = max_depth.max(frames.len());
                step()
            }
            Action::Resume(value) => match frames.pop() {
                Some(frame) => frame(value),
                None => panic!("resumed a continuation that is not waiting on this run"),
            },
        };
    }
}

/// Run the step function `f` on `args` with the identity continuation
pub fn run_trampoline<F, Args, T>(f: F, args: Args) -> T
where
    F: Trampolined<T, Args, T> + 'static,
    Args: 'static,
    T: 'static,
{
    run(call(f, Next::new(Call::Return), args))
}
