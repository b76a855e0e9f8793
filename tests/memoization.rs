//! Memoized evaluation
//!
//! Step functions count their invocations in per-test statics so the tests
//! can assert exactly which `(function, args)` pairs were computed and which
//! were answered from the cache.

mod common;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use common::{check_ack, check_fib, check_mut_rec, sorted_entries, sorted_keys};
use stackless::{
    BoundedMemoCache, ConcurrentMemoCache, DefaultMemoCache, Eval, EvalConfig, Evaluator, FnId,
    MemoArgs, MemoCache, Step,
};

const FIB: FnId = FnId::new("fib");
const ACK: FnId = FnId::new("ack");
const MUT_F: FnId = FnId::new("mut_f");
const MUT_G: FnId = FnId::new("mut_g");

static FIB_CALLS: AtomicUsize = AtomicUsize::new(0);
static ACK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn fib<C: MemoCache<u64> + 'static>(ev: &Evaluator<u64, C>, n: u64) -> Step<u64> {
    if n < 2 {
        return Step::Done(1);
    }
    let ev2 = ev.clone();
    ev.call(FIB, fib::<C>, n - 1)
        .after(move |x| ev2.call(FIB, fib::<C>, n - 2).map(move |y| x + y).into())
        .into()
}

fn counted_fib(ev: &Evaluator<u64>, n: u64) -> Step<u64> {
    FIB_CALLS.fetch_add(1, Ordering::SeqCst);
    if n < 2 {
        return Step::Done(1);
    }
    let ev2 = ev.clone();
    ev.call(FIB, counted_fib, n - 1)
        .after(move |x| ev2.call(FIB, counted_fib, n - 2).map(move |y| x + y).into())
        .into()
}

fn counted_ack(ev: &Evaluator<u64>, (m, n): (u64, u64)) -> Step<u64> {
    ACK_CALLS.fetch_add(1, Ordering::SeqCst);
    match (m, n) {
        (0, n) => Step::Done(n + 1),
        (m, 0) => ev.call(ACK, counted_ack, (m - 1, 1)).into(),
        (m, n) => {
            let ev2 = ev.clone();
            ev.call(ACK, counted_ack, (m, n - 1))
                .after(move |x| ev2.call(ACK, counted_ack, (m - 1, x)).into())
                .into()
        }
    }
}

fn fib_entries(range: std::ops::RangeInclusive<u64>) -> Vec<(String, u64)> {
    range.map(|x| (x.to_string(), common::fib(x))).collect()
}

fn ack_entries(pairs: &[(u64, u64)]) -> Vec<(String, u64)> {
    pairs
        .iter()
        .map(|&(m, n)| (format!("{}_{}", m, n), common::ack(m, n)))
        .collect()
}

#[test]
fn test_fib_memoized_reuses_entries() {
    let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
    let fib = |n: u64| ev.call(FIB, counted_fib, n).value();
    let cache = ev.cache().unwrap();

    assert_eq!(fib(3), common::fib(3));
    assert_eq!(FIB_CALLS.load(Ordering::SeqCst), 4);
    assert_eq!(sorted_entries(cache.entries(FIB)), fib_entries(0..=3));

    assert_eq!(fib(10), common::fib(10));
    assert_eq!(sorted_entries(cache.entries(FIB)), fib_entries(0..=10));
    assert_eq!(FIB_CALLS.load(Ordering::SeqCst), 4 + 7);

    check_fib(fib);
}

#[test]
fn test_ack_memoized_reuses_entries() {
    let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
    let ack = |m: u64, n: u64| ev.call(ACK, counted_ack, (m, n)).value();
    let cache = ev.cache().unwrap();

    assert_eq!(ack(2, 0), common::ack(2, 0));
    assert_eq!(ACK_CALLS.load(Ordering::SeqCst), 5);
    assert_eq!(
        sorted_entries(cache.entries(ACK)),
        ack_entries(&[(0, 1), (0, 2), (1, 0), (1, 1), (2, 0)])
    );
    let after_first = sorted_keys(cache.entries(ACK));

    assert_eq!(ack(2, 1), common::ack(2, 1));
    assert_eq!(
        sorted_entries(cache.entries(ACK)),
        ack_entries(&[
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (2, 0),
            (2, 1),
        ])
    );
    assert_eq!(ACK_CALLS.load(Ordering::SeqCst), 5 + 5);

    // The second cache is a strict superset of the first
    let after_second = sorted_keys(cache.entries(ACK));
    assert!(after_first.iter().all(|key| after_second.contains(key)));
    assert!(after_second.len() > after_first.len());

    check_ack(ack);
}

#[test]
fn test_repeat_walk_is_one_cache_hit() {
    let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
    let config = EvalConfig::default();

    let (first, cold) = ev.call(FIB, fib, 25).run(&config);
    let (second, warm) = ev.call(FIB, fib, 25).run(&config);

    assert_eq!(first, second);
    assert!(cold.steps >= 26);
    assert_eq!(warm.steps, 0);
    assert_eq!(warm.cache_hits, 1);
    assert_eq!(warm.max_depth, 1);
}

#[test]
fn test_memoized_fib_is_linear() {
    let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
    let (value, stats) = ev.call(FIB, fib, 90).run(&EvalConfig::default());
    assert_eq!(value, 4_660_046_610_375_530_309);
    assert_eq!(stats.steps, 91);
    assert_eq!(ev.cache().unwrap().count(FIB), 91);
}

#[test]
fn test_cache_stats_reflect_lookups() {
    let ev: Evaluator<u64> = Evaluator::with_cache(DefaultMemoCache::new());
    ev.call(FIB, fib, 10).value();
    ev.call(FIB, fib, 10).value();

    let stats = ev.cache().unwrap().stats();
    assert_eq!(stats.entries, 11);
    assert!(stats.hits > 0);
    assert!(stats.misses >= 11);
}

#[test]
fn test_bounded_cache_stays_correct() {
    let capacity = NonZeroUsize::new(4).unwrap();
    let ev: Evaluator<u64, BoundedMemoCache<u64>> =
        Evaluator::with_cache(BoundedMemoCache::new(capacity));

    for n in 0..30 {
        assert_eq!(ev.call(FIB, fib, n).value(), common::fib(n));
    }
    assert!(ev.cache().unwrap().len() <= 4);
}

#[test]
fn test_concurrent_cache_shared_across_threads() {
    let shared = Arc::new(ConcurrentMemoCache::<u64>::new());

    let handles: Vec<_> = (20..28)
        .map(|n| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let ev = Evaluator::with_cache(shared);
                ev.call(FIB, fib, n).value()
            })
        })
        .collect();

    for (n, handle) in (20..28).zip(handles) {
        assert_eq!(handle.join().unwrap(), common::fib(n));
    }

    assert_eq!(
        sorted_entries(shared.entries(FIB)),
        fib_entries(0..=27)
    );
}

/// Memoized pair of functions with different argument and result types
#[derive(Clone)]
struct MutRec {
    f_ev: Evaluator<i64>,
    g_ev: Evaluator<Option<i64>>,
}

impl MutRec {
    fn new() -> Self {
        MutRec {
            f_ev: Evaluator::with_cache(DefaultMemoCache::new()),
            g_ev: Evaluator::with_cache(DefaultMemoCache::new()),
        }
    }

    fn f(&self, n: u64) -> Eval<i64> {
        let this = self.clone();
        self.f_ev.call(MUT_F, move |_, n| this.f_step(n), n)
    }

    fn g(&self, n: u64, b: bool) -> Eval<Option<i64>> {
        let this = self.clone();
        self.g_ev.call(MUT_G, move |_, (n, b)| this.g_step(n, b), (n, b))
    }

    fn f_step(&self, n: u64) -> Step<i64> {
        if n == 0 {
            return Step::Done(1);
        }
        self.g(n, n % 3 == 0)
            .map(move |found| match found {
                None => n as i64 - 2,
                Some(x) => x - 1,
            })
            .into()
    }

    fn g_step(&self, n: u64, b: bool) -> Step<Option<i64>> {
        if n == 0 {
            Step::Done(Some(0))
        } else if b {
            Step::Done(None)
        } else {
            self.f(n - 1).map(Some).into()
        }
    }
}

#[test]
fn test_mutual_recursion_memoized_per_function() {
    let rec = MutRec::new();
    check_mut_rec(|n| rec.f(n).value(), |n, b| rec.g(n, b).value());

    let f_cache = rec.f_ev.cache().unwrap();
    let g_cache = rec.g_ev.cache().unwrap();
    assert_eq!(f_cache.count(MUT_F), 30);
    assert_eq!(f_cache.get(MUT_F, "3"), Some(common::mut_f(3)));
    assert_eq!(g_cache.get(MUT_G, "3_true"), Some(None));
    assert_eq!(g_cache.get(MUT_G, "4_false"), Some(common::mut_g(4, false)));
    assert_eq!(g_cache.count(MUT_F), 0);
}

/// Two words keyed by length prefix so `("a_b", "c")` and `("a", "b_c")` differ
struct Words(String, String);

impl MemoArgs for Words {
    fn memo_key(&self) -> String {
        format!("{}:{}{}:{}", self.0.len(), self.0, self.1.len(), self.1)
    }
}

#[test]
fn test_structural_key_keeps_entries_apart() {
    const CONCAT: FnId = FnId::new("concat");
    let ev: Evaluator<String> = Evaluator::with_cache(DefaultMemoCache::new());
    let concat = |_: &Evaluator<String>, Words(a, b): Words| Step::Done(format!("{a}|{b}"));

    let left = ev.call(CONCAT, concat, Words("a_b".into(), "c".into())).value();
    let right = ev.call(CONCAT, concat, Words("a".into(), "b_c".into())).value();

    assert_eq!(left, "a_b|c");
    assert_eq!(right, "a|b_c");
    assert_eq!(ev.cache().map(|cache| cache.count(CONCAT)), Some(2));
}
