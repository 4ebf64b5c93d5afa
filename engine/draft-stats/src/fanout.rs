// Bounded fan-out of per-item worker tasks

use crate::error::{Result, StatsError};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Spawns worker tasks behind a counting admission gate
///
/// A worker is spawned only after it holds one of `max_in_flight` permits.
/// The permit lives inside the task, so it is returned when the task ends on
/// any path, including a panic.
pub struct BoundedFanout<T> {
    gate: Arc<Semaphore>,
    handles: Vec<JoinHandle<T>>,
}

/// Outputs of every joined worker
#[derive(Debug)]
pub struct FanoutReport<T> {
    pub outputs: Vec<T>,
    pub panicked: usize,
}

impl<T: Send + 'static> BoundedFanout<T> {
    pub fn new(max_in_flight: usize) -> Result<Self> {
        if max_in_flight == 0 {
            return Err(StatsError::Config("fan-out needs at least one worker slot".to_string()));
        }

        Ok(Self { gate: Arc::new(Semaphore::new(max_in_flight)), handles: Vec::new() })
    }

    /// Wait for a free slot, then spawn `task` holding it
    pub async fn spawn<F>(&mut self, task: F) -> Result<()>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permit = self
            .gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| StatsError::Concurrency(format!("admission gate closed: {e}")))?;

        self.handles.push(tokio::spawn(async move {
            let _permit = permit;
            task.await
        }));

        Ok(())
    }

    /// Number of workers spawned so far
    pub fn launched(&self) -> usize {
        self.handles.len()
    }

    /// Join barrier: wait for every spawned worker to finish
    pub async fn join(self) -> FanoutReport<T> {
        let results = join_all(self.handles).await;

        let mut outputs = Vec::with_capacity(results.len());
        let mut panicked = 0;
        for result in results {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) => {
                    tracing::error!("Fan-out worker did not complete: {}", e);
                    panicked += 1;
                }
            }
        }

        FanoutReport { outputs, panicked }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_zero_slots_rejected() {
        assert!(matches!(BoundedFanout::<()>::new(0), Err(StatsError::Config(_))));
    }

    #[tokio::test]
    async fn test_in_flight_never_exceeds_gate() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut fanout = BoundedFanout::new(3).unwrap();
        for i in 0..20usize {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            fanout
                .spawn(async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    i
                })
                .await
                .unwrap();
        }

        assert_eq!(fanout.launched(), 20);
        let report = fanout.join().await;

        assert_eq!(report.panicked, 0);
        assert_eq!(report.outputs.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_worker_releases_slot() {
        let mut fanout = BoundedFanout::<u32>::new(1).unwrap();

        let fail = true;
        fanout
            .spawn(async move {
                if fail {
                    panic!("worker blew up");
                }
                0
            })
            .await
            .unwrap();
        // Only one slot exists, so this spawn proves the panicked worker gave it back
        fanout.spawn(async { 7u32 }).await.unwrap();

        let report = fanout.join().await;
        assert_eq!(report.panicked, 1);
        assert_eq!(report.outputs, vec![7]);
    }

    #[tokio::test]
    async fn test_slots_restored_after_join() {
        let mut fanout = BoundedFanout::new(4).unwrap();
        let gate = fanout.gate.clone();
        for _ in 0..8 {
            fanout.spawn(async {}).await.unwrap();
        }
        fanout.join().await;
        assert_eq!(gate.available_permits(), 4);
    }
}
