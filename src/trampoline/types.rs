//! Trampoline Types
//!
//! A [`Call`] is the tagged result of every trampolined step. Step functions
//! of up to four arguments become callable through [`Trampolined`], with the
//! arguments packed into a tuple.
//!
//! Continuations never own one another. A [`Next`] is either a fresh
//! continuation about to be handed to [`call`](super::call), or a handle to
//! the continuation already waiting on the driver's stack.

use std::fmt;

use crate::eval::{unerase, Erased};

/// A continuation waiting on the driver's stack
pub(crate) type Frame<T> = Box<dyn FnOnce(Erased) -> Call<T>>;

/// One-shot continuation receiving an `A` on the way to a final `T`.
///
/// Step functions receive a `Next` and answer to it exactly once, with
/// [`resume`](super::resume) or by passing it on to a tail
/// [`call`](super::call). A `Next` belongs to the run that handed it out.
pub struct Next<A, T> {
    resume: Option<Box<dyn FnOnce(A) -> Call<T>>>,
}

impl<A: 'static, T: 'static> Next<A, T> {
    /// Continue with `f` once the value arrives
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(A) -> Call<T> + 'static,
    {
        Next {
            resume: Some(Box::new(f)),
        }
    }

    /// Handle to the continuation on top of the driver's stack
    pub(crate) fn waiting() -> Self {
        Next { resume: None }
    }

    /// The fresh continuation as a stack frame; `None` for a waiting handle
    pub(crate) fn into_frame(self) -> Option<Frame<T>> {
        self.resume
            .map(|f| Box::new(move |value: Erased| f(unerase::<A>(value))) as Frame<T>)
    }

    /// Package "hand `value` to this continuation"
    pub(crate) fn apply(self, value: A) -> Call<T> {
        match self.resume {
            Some(f) => Call::bounce(move || f(value)),
            None => Call::Bounce(Bounce(Action::Resume(Box::new(value)))),
        }
    }
}

impl<A, T> fmt::Debug for Next<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resume {
            Some(_) => f.write_str("Next(fresh)"),
            None => f.write_str("Next(waiting)"),
        }
    }
}

/// Result of a trampolined step
pub enum Call<T> {
    /// More work for the driver loop
    Bounce(Bounce<T>),
    /// Final value of the whole computation
    Return(T),
}

/// Packaged work the driver runs next
pub struct Bounce<T>(pub(crate) Action<T>);

pub(crate) enum Action<T> {
    /// Run a packaged step
    Run(Box<dyn FnOnce() -> Call<T>>),
    /// Push a continuation, then run the step that answers to it
    Push(Frame<T>, Box<dyn FnOnce() -> Call<T>>),
    /// Pop the top continuation and hand it this value
    Resume(Erased),
}

impl<T> Call<T> {
    /// Package `thunk` to run on the next bounce
    pub fn bounce<F>(thunk: F) -> Self
    where
        F: FnOnce() -> Call<T> + 'static,
        T: 'static,
    {
        Call::Bounce(Bounce(Action::Run(Box::new(thunk))))
    }

    /// Whether this is the final value
    pub fn is_return(&self) -> bool {
        matches!(self, Call::Return(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Bounce(_) => f.write_str("Bounce(..)"),
            Call::Return(value) => f.debug_tuple("Return").field(value).finish(),
        }
    }
}

/// A step function `fn(next, a, b, ..) -> Call<T>` taking its arguments as
/// the tuple `Args` and answering `R` to `next`.
pub trait Trampolined<R, Args, T> {
    /// Apply the step function to `next` and the unpacked `args`
    fn invoke(self, next: Next<R, T>, args: Args) -> Call<T>;
}

macro_rules! impl_trampolined {
    ($($arg:ident),*) => {
        impl<R, T, F, $($arg),*> Trampolined<R, ($($arg,)*), T> for F
        where
            F: FnOnce(Next<R, T>, $($arg),*) -> Call<T>,
        {
            #[allow(non_snake_case)]
            fn invoke(self, next: Next<R, T>, ($($arg,)*): ($($arg,)*)) -> Call<T> {
                self(next, $($arg),*)
            }
        }
    };
}

impl_trampolined!();
impl_trampolined!(A);
impl_trampolined!(A, B);
impl_trampolined!(A, B, C);
impl_trampolined!(A, B, C, D);
