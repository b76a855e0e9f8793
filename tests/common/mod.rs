//! Shared helpers for integration tests
//!
//! Plain recursive reference implementations (only safe for small inputs),
//! checkers comparing an engine-backed function against them, and log setup.

#![allow(dead_code)]

/// Depth at which the native recursive adder is expected to be unsafe
pub const DEEP: u64 = 1 << 16;

/// Install a test-friendly tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Reference implementations
// ============================================================================

/// Factorial in standard form
pub fn fact(n: u64) -> u64 {
    if n > 1 {
        n * fact(n - 1)
    } else {
        1
    }
}

/// Factorial in tail-call form
pub fn fact_tr(n: u64) -> u64 {
    fn go(n: u64, acc: u64) -> u64 {
        if n > 1 {
            go(n - 1, acc * n)
        } else {
            acc
        }
    }
    go(n, 1)
}

/// Counts `n - 1` steps down to one
pub fn adder(n: u64) -> u64 {
    fn go(n: u64, acc: u64) -> u64 {
        if n > 1 {
            go(n - 1, acc + 1)
        } else {
            acc
        }
    }
    go(n, 0)
}

/// Naive Fibonacci with `fib(0) = fib(1) = 1`
pub fn fib(n: u64) -> u64 {
    if n < 2 {
        1
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

/// Ackermann function
pub fn ack(m: u64, n: u64) -> u64 {
    match (m, n) {
        (0, n) => n + 1,
        (m, 0) => ack(m - 1, 1),
        (m, n) => ack(m - 1, ack(m, n - 1)),
    }
}

/// First of a mutually recursive pair with different signatures:
/// `f(n) = 1` at zero, otherwise derived from `g(n, n % 3 == 0)`
pub fn mut_f(n: u64) -> i64 {
    // Iterative so it can serve as the reference at any depth
    let mut value = 1;
    for i in 1..=n {
        value = match mut_g_step(i, i % 3 == 0, value) {
            None => i as i64 - 2,
            Some(x) => x - 1,
        };
    }
    value
}

/// Second of the pair: `None` when `b`, otherwise `Some(f(n - 1))`
pub fn mut_g(n: u64, b: bool) -> Option<i64> {
    if n == 0 {
        Some(0)
    } else {
        mut_g_step(n, b, mut_f(n - 1))
    }
}

fn mut_g_step(n: u64, b: bool, f_prev: i64) -> Option<i64> {
    if n == 0 {
        Some(0)
    } else if b {
        None
    } else {
        Some(f_prev)
    }
}

// ============================================================================
// Checkers
// ============================================================================

pub fn check_fact(fact_impl: impl Fn(u64) -> u64) {
    for i in 0..10 {
        assert_eq!(fact_impl(i), fact(i), "fact({})", i);
    }
}

/// The adder must survive a depth the native version cannot be trusted with
pub fn check_adder(adder_impl: impl Fn(u64) -> u64) {
    for i in 1..10 {
        assert_eq!(adder_impl(i), adder(i), "adder({})", i);
    }
    assert_eq!(adder_impl(DEEP), DEEP - 1);
}

pub fn check_fib(fib_impl: impl Fn(u64) -> u64) {
    for i in 0..30 {
        assert_eq!(fib_impl(i), fib(i), "fib({})", i);
    }
}

pub fn check_even_odd(even: impl Fn(u64) -> bool, odd: impl Fn(u64) -> bool) {
    for i in 0..20 {
        let is_even = i % 2 == 0;
        assert_eq!(even(i), is_even, "even({})", i);
        assert_eq!(odd(i), !is_even, "odd({})", i);
    }

    let n = DEEP + 1;
    assert!(!even(n));
    assert!(odd(n));
}

pub fn check_ack(ack_impl: impl Fn(u64, u64) -> u64) {
    for m in 0..4 {
        for n in 0..6 {
            assert_eq!(ack_impl(m, n), ack(m, n), "ack({}, {})", m, n);
        }
    }
}

pub fn check_mut_rec(f: impl Fn(u64) -> i64, g: impl Fn(u64, bool) -> Option<i64>) {
    for n in 0..30 {
        assert_eq!(f(n), mut_f(n), "f({})", n);
        assert_eq!(g(n, true), mut_g(n, true), "g({}, true)", n);
        assert_eq!(g(n, false), mut_g(n, false), "g({}, false)", n);
    }
}

// ============================================================================
// Cache entry helpers
// ============================================================================

fn key_numbers(key: &str) -> Vec<u64> {
    key.split('_')
        .map(|part| part.parse().expect("numeric key element"))
        .collect()
}

/// Sort `(key, value)` entries by the numeric elements of their keys
pub fn sorted_entries<V>(mut entries: Vec<(String, V)>) -> Vec<(String, V)> {
    entries.sort_by(|(a, _), (b, _)| key_numbers(a).cmp(&key_numbers(b)));
    entries
}

/// Keys of `entries` in numeric order
pub fn sorted_keys<V>(entries: Vec<(String, V)>) -> Vec<String> {
    sorted_entries(entries).into_iter().map(|(key, _)| key).collect()
}
