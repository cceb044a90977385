//! Launch scheduler: drives one spawn per selected device according to the
//! chosen strategy.
//!
//! A failed spawn becomes a `LaunchOutcome` failure and never aborts the
//! remaining devices. No strategy retries, and no strategy imposes its own
//! timeout; each spawn's settle ends that device's wait.

use std::fmt;
use std::time::Duration;

use crate::spawn::{SpawnError, TerminalSpawner};

/// Pause between launches under the delayed strategy. Applied after each
/// settle, never after the last device.
pub const LAUNCH_STAGGER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// Issue every spawn at once and wait for all of them to settle.
    Parallel,
    /// One at a time, in selection order, with `LAUNCH_STAGGER` in between.
    Delayed,
    /// One at a time, each spawn gated on an explicit user acknowledgment.
    Sequential,
}

impl LaunchStrategy {
    /// Menu order for the strategy prompts.
    pub const ALL: [LaunchStrategy; 3] = [
        LaunchStrategy::Parallel,
        LaunchStrategy::Delayed,
        LaunchStrategy::Sequential,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LaunchStrategy::Parallel => "parallel (all at once)",
            LaunchStrategy::Delayed => "delayed (3s between launches)",
            LaunchStrategy::Sequential => "sequential (confirm each launch)",
        }
    }
}

impl fmt::Display for LaunchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LaunchStrategy::Parallel => "parallel",
            LaunchStrategy::Delayed => "delayed",
            LaunchStrategy::Sequential => "sequential",
        })
    }
}

/// Per-device result, collected for console reporting only.
#[derive(Debug)]
pub struct LaunchOutcome {
    pub device: String,
    pub result: Result<(), SpawnError>,
}

impl LaunchOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Launch every device in `devices` according to `strategy` and return one
/// outcome per device, in selection order.
///
/// `ack` is only consulted by the sequential strategy: it must block until
/// the user acknowledges the next launch.
pub async fn execute<F>(
    spawner: &dyn TerminalSpawner,
    devices: &[String],
    strategy: LaunchStrategy,
    mut ack: F,
) -> Vec<LaunchOutcome>
where
    F: FnMut(&str),
{
    match strategy {
        LaunchStrategy::Parallel => {
            futures::future::join_all(devices.iter().map(|device| spawn_one(spawner, device)))
                .await
        }
        LaunchStrategy::Delayed => {
            let mut outcomes = Vec::with_capacity(devices.len());
            for (index, device) in devices.iter().enumerate() {
                outcomes.push(spawn_one(spawner, device).await);
                if index + 1 < devices.len() {
                    log::debug!("waiting {:?} before the next launch", LAUNCH_STAGGER);
                    tokio::time::sleep(LAUNCH_STAGGER).await;
                }
            }
            outcomes
        }
        LaunchStrategy::Sequential => {
            let mut outcomes = Vec::with_capacity(devices.len());
            for device in devices {
                ack(device);
                outcomes.push(spawn_one(spawner, device).await);
            }
            outcomes
        }
    }
}

async fn spawn_one(spawner: &dyn TerminalSpawner, device: &str) -> LaunchOutcome {
    let result = spawner.spawn_terminal(device).await;
    match &result {
        Ok(()) => println!("  [ok] {}", device),
        Err(e) => {
            log::warn!("[{}] launch failed: {}", device, e);
            println!("  [fail] {}: {}", device, e);
        }
    }
    LaunchOutcome {
        device: device.to_string(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    /// Records `start:`/`settle:` events and optionally sleeps and fails.
    struct MockSpawner {
        spawn_time: Duration,
        fail: HashSet<String>,
        events: Arc<Mutex<Vec<String>>>,
        starts: Mutex<Vec<(String, Instant)>>,
    }

    impl MockSpawner {
        fn new(spawn_time: Duration) -> Self {
            Self {
                spawn_time,
                fail: HashSet::new(),
                events: Arc::new(Mutex::new(Vec::new())),
                starts: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, device: &str) -> Self {
            self.fail.insert(device.to_string());
            self
        }

        fn start_offsets(&self, origin: Instant) -> Vec<(String, Duration)> {
            self.starts
                .lock()
                .unwrap()
                .iter()
                .map(|(name, at)| (name.clone(), *at - origin))
                .collect()
        }
    }

    #[async_trait]
    impl TerminalSpawner for MockSpawner {
        async fn spawn_terminal(&self, device: &str) -> Result<(), SpawnError> {
            self.events.lock().unwrap().push(format!("start:{}", device));
            self.starts
                .lock()
                .unwrap()
                .push((device.to_string(), Instant::now()));
            tokio::time::sleep(self.spawn_time).await;
            self.events.lock().unwrap().push(format!("settle:{}", device));
            if self.fail.contains(device) {
                Err(SpawnError::Spawn {
                    device: device.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
                })
            } else {
                Ok(())
            }
        }
    }

    fn devices(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn one_outcome_per_device_in_order() {
        let spawner = MockSpawner::new(Duration::ZERO);
        let selection = devices(&["a", "b", "c"]);
        let outcomes = execute(&spawner, &selection, LaunchStrategy::Parallel, |_| {}).await;

        let names: Vec<&str> = outcomes.iter().map(|o| o.device.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(outcomes.iter().all(LaunchOutcome::succeeded));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_names_get_one_outcome_each() {
        let spawner = MockSpawner::new(Duration::ZERO);
        let selection = devices(&["a", "a"]);
        let outcomes = execute(&spawner, &selection, LaunchStrategy::Delayed, |_| {}).await;
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn parallel_spawns_overlap() {
        let spawner = MockSpawner::new(Duration::from_secs(5));
        let selection = devices(&["a", "b", "c"]);

        let begin = Instant::now();
        execute(&spawner, &selection, LaunchStrategy::Parallel, |_| {}).await;
        let elapsed = begin.elapsed();

        // Wall clock is governed by the slowest spawn, not the sum.
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(6), "spawns did not overlap: {:?}", elapsed);

        for (_, offset) in spawner.start_offsets(begin) {
            assert_eq!(offset, Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_staggers_launches_in_order() {
        let spawner = MockSpawner::new(Duration::from_secs(1));
        let selection = devices(&["a", "b", "c"]);

        let begin = Instant::now();
        execute(&spawner, &selection, LaunchStrategy::Delayed, |_| {}).await;
        let elapsed = begin.elapsed();

        // Each spawn settles in 1s, with a 3s stagger after all but the last:
        // starts at 0s, 4s, 8s, total 9s. No trailing delay.
        let offsets = spawner.start_offsets(begin);
        assert_eq!(
            offsets,
            vec![
                ("a".to_string(), Duration::from_secs(0)),
                ("b".to_string(), Duration::from_secs(4)),
                ("c".to_string(), Duration::from_secs(8)),
            ],
        );
        assert_eq!(elapsed, Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_waits_for_ack_between_settles() {
        let spawner = MockSpawner::new(Duration::from_secs(1));
        let events = Arc::clone(&spawner.events);
        let selection = devices(&["a", "b"]);

        execute(&spawner, &selection, LaunchStrategy::Sequential, |device| {
            events.lock().unwrap().push(format!("ack:{}", device));
        })
        .await;

        assert_eq!(
            *spawner.events.lock().unwrap(),
            vec!["ack:a", "start:a", "settle:a", "ack:b", "start:b", "settle:b"],
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_abort_siblings_parallel() {
        let spawner = MockSpawner::new(Duration::ZERO).failing("b");
        let selection = devices(&["a", "b", "c"]);
        let outcomes = execute(&spawner, &selection, LaunchStrategy::Parallel, |_| {}).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].succeeded());
        assert!(!outcomes[1].succeeded());
        assert!(outcomes[2].succeeded());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_abort_siblings_delayed() {
        let spawner = MockSpawner::new(Duration::ZERO).failing("a");
        let selection = devices(&["a", "b", "c"]);
        let outcomes = execute(&spawner, &selection, LaunchStrategy::Delayed, |_| {}).await;

        assert!(!outcomes[0].succeeded());
        assert!(outcomes[1].succeeded());
        assert!(outcomes[2].succeeded());

        let attempted: Vec<String> = spawner
            .start_offsets(Instant::now())
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        assert_eq!(attempted, vec!["a", "b", "c"]);
    }

    #[test]
    fn strategy_menu_order_is_stable() {
        assert_eq!(LaunchStrategy::ALL[0], LaunchStrategy::Parallel);
        assert_eq!(LaunchStrategy::ALL[1], LaunchStrategy::Delayed);
        assert_eq!(LaunchStrategy::ALL[2], LaunchStrategy::Sequential);
    }
}
