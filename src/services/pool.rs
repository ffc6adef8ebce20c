//! Fixed-size worker pools.
//!
//! Both fan-out points use the same shape: N spawned tasks drain a shared
//! queue and report per-item results over a channel. Each unit of work runs
//! in its own task, so a panic is converted into that item's fallback result
//! while sibling workers keep draining the queue.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::warn;

/// Run `job` over every item with at most `workers` in flight.
///
/// Results arrive in completion order, which equals submission order only
/// when `workers` is 1. A crashed job yields `fallback(&item)` for that item
/// and nothing else is affected.
pub async fn run_pool<T, R, F, Fut, P>(items: Vec<T>, workers: usize, job: F, fallback: P) -> Vec<R>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    P: Fn(&T) -> R + Send + Sync + 'static,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, total);

    let queue: Arc<Mutex<VecDeque<T>>> = Arc::new(Mutex::new(items.into_iter().collect()));
    let job = Arc::new(job);
    let fallback = Arc::new(fallback);
    let (tx, mut rx) = mpsc::channel::<R>(total);

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let queue = queue.clone();
        let job = job.clone();
        let fallback = fallback.clone();
        let tx = tx.clone();

        handles.push(tokio::spawn(async move {
            loop {
                let item = { queue.lock().await.pop_front() };
                let item = match item {
                    Some(item) => item,
                    None => break,
                };

                // Each unit runs in its own task so a panic is contained to
                // the unit, not the worker.
                let result = match tokio::spawn((*job)(item.clone())).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("pool job crashed: {}", e);
                        (*fallback)(&item)
                    }
                };

                if tx.send(result).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let mut results = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    for handle in handles {
        let _ = handle.await;
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_every_item_gets_exactly_one_result() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let in_flight_job = in_flight.clone();
        let peak_job = peak.clone();
        let results = run_pool(
            vec![1u32, 2, 3, 4, 5],
            3,
            move |n| {
                let in_flight = in_flight_job.clone();
                let peak = peak_job.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    n * 2
                }
            },
            |_| 0,
        )
        .await;

        let mut sorted = results.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![2, 4, 6, 8, 10]);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_panicking_job_becomes_fallback_result() {
        let results = run_pool(
            vec![1u32, 2, 3],
            2,
            |n| async move {
                if n == 2 {
                    panic!("boom");
                }
                n
            },
            |n| n + 100,
        )
        .await;

        let mut sorted = results.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 3, 102]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<u32> = run_pool(Vec::<u32>::new(), 4, |n| async move { n }, |_| 0).await;
        assert!(results.is_empty());
    }
}
