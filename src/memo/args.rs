//! Canonical cache keys for argument tuples

use std::fmt::{Display, Write};

/// Separator placed between argument elements in a cache key
pub const KEY_SEPARATOR: &str = "_";

/// Arguments of a memoized step function.
///
/// The key must be identical for equal arguments. Implemented for the unit
/// tuple, for single scalar and string arguments, and for tuples of up to six
/// `Display` elements; other argument types can implement it directly.
///
/// A direct implementation can give a structural key that never collides,
/// for instance by prefixing each element with its length:
///
/// ```
/// use stackless::memo::MemoArgs;
///
/// struct Pair(String, String);
///
/// impl MemoArgs for Pair {
///     fn memo_key(&self) -> String {
///         format!("{}:{}{}:{}", self.0.len(), self.0, self.1.len(), self.1)
///     }
/// }
///
/// let left = Pair("a_b".into(), "c".into());
/// let right = Pair("a".into(), "b_c".into());
/// assert_eq!(("a_b", "c").memo_key(), ("a", "b_c").memo_key());
/// assert_ne!(left.memo_key(), right.memo_key());
/// ```
pub trait MemoArgs {
    /// Canonical string form used as the cache key
    fn memo_key(&self) -> String;
}

impl MemoArgs for () {
    fn memo_key(&self) -> String {
        String::new()
    }
}

fn join_key(elements: &[&dyn Display]) -> String {
    let mut key = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_SEPARATOR);
        }
        // Writing into a String cannot fail
        let _ = write!(key, "{}", element);
    }
    key
}

macro_rules! impl_memo_args {
    ($($name:ident),+) => {
        impl<$($name: Display),+> MemoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn memo_key(&self) -> String {
                let ($($name,)+) = self;
                join_key(&[$($name as &dyn Display),+])
            }
        }
    };
}

macro_rules! impl_memo_args_scalar {
    ($($ty:ty),+) => {
        $(
            impl MemoArgs for $ty {
                fn memo_key(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_memo_args_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_memo_args_scalar!(f32, f64, bool, char, String, &str);

impl_memo_args!(A);
impl_memo_args!(A, B);
impl_memo_args!(A, B, C);
impl_memo_args!(A, B, C, D);
impl_memo_args!(A, B, C, D, E);
impl_memo_args!(A, B, C, D, E, F);
