use redis_mutex::{Expiry, LockStore, LockStrategy, MemoryStore, Mutex, Result, TimeoutConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// Store whose reads take a while, like a Redis server under load
struct SlowReads {
    inner: MemoryStore,
    delay: Duration,
}

impl LockStore for SlowReads {
    fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        self.inner.set_nx(key, value)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        self.inner.expire(key, ttl)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        thread::sleep(self.delay);
        self.inner.get(key)
    }

    fn del(&self, key: &str) -> Result<bool> {
        self.inner.del(key)
    }
}

#[test]
fn test_only_one_contender_wins() {
    let store = Arc::new(MemoryStore::new());
    let contenders = 8;
    let barrier = Arc::new(Barrier::new(contenders));
    let winners = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..contenders)
        .map(|_| {
            let store = store.clone();
            let barrier = barrier.clone();
            let winners = winners.clone();
            thread::spawn(move || {
                // Separate instances stand in for separate processes
                let mutex = Mutex::new(store);
                barrier.wait();
                if mutex.acquire("jobs", LockStrategy::NoWait, Expiry::Never).unwrap() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(winners.load(Ordering::SeqCst), 1);
}

#[test]
fn test_waiters_take_turns() {
    let store = Arc::new(MemoryStore::new());
    let inside = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let inside = inside.clone();
            let completed = completed.clone();
            thread::spawn(move || {
                let mutex = Mutex::new(store);
                let strategy = LockStrategy::Timeout(
                    TimeoutConfig::new(Duration::from_secs(10))
                        .with_poll_interval(Duration::from_millis(5)),
                );

                assert!(mutex.acquire("counter", strategy, Expiry::Never).unwrap());

                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0, "two holders at once");
                thread::sleep(Duration::from_millis(20));
                inside.fetch_sub(1, Ordering::SeqCst);

                assert!(mutex.release("counter").unwrap());
                completed.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(completed.load(Ordering::SeqCst), 4);
}

#[test]
fn test_shared_instance_across_threads() {
    let mutex = Arc::new(Mutex::new(MemoryStore::new()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let mutex = mutex.clone();
            thread::spawn(move || {
                let name = format!("resource-{}", i);
                assert!(mutex.acquire(&name, LockStrategy::NoWait, Expiry::Never).unwrap());
                assert!(mutex.release(&name).unwrap());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..4 {
        assert!(mutex.token(&format!("resource-{}", i)).is_none());
    }
}

#[test]
fn test_slow_release_does_not_block_other_names() {
    let mutex = Arc::new(Mutex::new(SlowReads {
        inner: MemoryStore::new(),
        delay: Duration::from_millis(500),
    }));

    assert!(mutex.acquire("slow", LockStrategy::NoWait, Expiry::Never).unwrap());

    let releasing = mutex.clone();
    let releaser = thread::spawn(move || releasing.release("slow").unwrap());

    // Let the release get stuck in its read
    thread::sleep(Duration::from_millis(100));

    let start = Instant::now();
    assert!(mutex.acquire("fast", LockStrategy::NoWait, Expiry::Never).unwrap());
    assert!(start.elapsed() < Duration::from_millis(300));

    assert!(releaser.join().unwrap());
    assert!(mutex.token("slow").is_none());
    assert!(mutex.token("fast").is_some());
}
