// Concurrent Access Tests for slotlru
// These tests verify thread-safety and concurrent access patterns

use slotlru::BoundedLruCache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Test concurrent writes of disjoint keys that fit in the cache
#[test]
fn test_concurrent_writes() {
    let num_threads = 8;
    let writes_per_thread = 100;
    let cache: Arc<BoundedLruCache<u64, u64>> =
        Arc::new(BoundedLruCache::new(num_threads * writes_per_thread, "writes"));

    let mut handles = vec![];

    for thread_id in 0..num_threads as u64 {
        let cache_clone = Arc::clone(&cache);
        let handle = thread::spawn(move || {
            for i in 0..writes_per_thread as u64 {
                let key = thread_id * 1_000 + i;
                assert!(cache_clone.set(key, key * 2));
            }
        });
        handles.push(handle);
    }

    // Wait for all threads to complete
    for handle in handles {
        handle.join().unwrap();
    }

    // Verify all writes succeeded
    assert_eq!(cache.count(), num_threads * writes_per_thread);
    for thread_id in 0..num_threads as u64 {
        for i in 0..writes_per_thread as u64 {
            let key = thread_id * 1_000 + i;
            assert_eq!(cache.get(&key), Some(key * 2));
        }
    }
    cache.verify().unwrap();
}

/// Test concurrent writes that overflow the cache keep the capacity bound
#[test]
fn test_concurrent_writes_with_eviction() {
    let capacity = 64;
    let num_threads = 8;
    let cache: Arc<BoundedLruCache<u64, u64>> = Arc::new(BoundedLruCache::new(capacity, "evict"));
    let barrier = Arc::new(Barrier::new(num_threads));

    let mut handles = vec![];

    for thread_id in 0..num_threads as u64 {
        let cache_clone = Arc::clone(&cache);
        let barrier_clone = Arc::clone(&barrier);
        let handle = thread::spawn(move || {
            barrier_clone.wait(); // Synchronize start

            for i in 0..500u64 {
                cache_clone.set(thread_id << 32 | i, i);
                assert!(cache_clone.count() <= capacity);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.count(), capacity);
    let stats = cache.stats();
    assert_eq!(stats.insertions, 8 * 500);
    assert_eq!(stats.evictions, 8 * 500 - capacity as u64);
    cache.verify().unwrap();
}

/// Test mixed concurrent reads, writes and deletes over a shared key space
#[test]
fn test_concurrent_mixed_operations() {
    let cache: Arc<BoundedLruCache<u32, u32>> = Arc::new(BoundedLruCache::new(32, "mixed"));

    let num_readers = 6;
    let num_writers = 4;
    let barrier = Arc::new(Barrier::new(num_readers + num_writers));
    let hits = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    // Spawn writer threads
    for writer_id in 0..num_writers as u32 {
        let cache_clone = Arc::clone(&cache);
        let barrier_clone = Arc::clone(&barrier);
        let handle = thread::spawn(move || {
            barrier_clone.wait();

            for i in 0..2_000u32 {
                let key = (i * 7 + writer_id) % 64;
                if i % 5 == 0 {
                    cache_clone.delete(&key);
                } else {
                    cache_clone.set(key, key + 1);
                }
            }
        });
        handles.push(handle);
    }

    // Spawn reader threads
    for _ in 0..num_readers {
        let cache_clone = Arc::clone(&cache);
        let barrier_clone = Arc::clone(&barrier);
        let hits_clone = Arc::clone(&hits);
        let handle = thread::spawn(move || {
            barrier_clone.wait();

            for i in 0..2_000u32 {
                let key = i % 64;
                if let Some(value) = cache_clone.get(&key) {
                    // Values are always written as key + 1
                    assert_eq!(value, key + 1);
                    hits_clone.fetch_add(1, Ordering::Relaxed);
                }
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.count() <= 32);
    let stats = cache.stats();
    assert_eq!(stats.lookups, (num_readers * 2_000) as u64);
    assert_eq!(stats.hits, hits.load(Ordering::Relaxed) as u64);
    cache.verify().unwrap();
}

/// Test clear racing with writers leaves a consistent cache
#[test]
fn test_concurrent_clear() {
    let cache: Arc<BoundedLruCache<u64, Arc<u64>>> = Arc::new(BoundedLruCache::new(16, "clear"));
    let barrier = Arc::new(Barrier::new(3));

    let mut handles = vec![];

    for writer_id in 0..2u64 {
        let cache_clone = Arc::clone(&cache);
        let barrier_clone = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier_clone.wait();
            for i in 0..1_000u64 {
                cache_clone.set(writer_id * 10_000 + i, Arc::new(i));
            }
        }));
    }

    let cache_clone = Arc::clone(&cache);
    let barrier_clone = Arc::clone(&barrier);
    handles.push(thread::spawn(move || {
        barrier_clone.wait();
        for _ in 0..100 {
            cache_clone.clear();
            thread::yield_now();
        }
    }));

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.count() <= 16);
    cache.verify().unwrap();
}
