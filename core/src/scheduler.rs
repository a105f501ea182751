//! Bounded-concurrency fan-out of per-target pipelines.
//!
//! Every target gets its own task. A semaphore admits at most `workers` of them
//! into their pipeline at once; the rest wait for a permit. Results are slotted
//! back by input position, so completion order never leaks into the output.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use strata_common::network::target::Target;
use strata_common::result::{CheckResult, TargetResult};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::error;

/// Anything that can turn one target into a [`TargetResult`].
#[async_trait]
pub trait TargetRunner: Send + Sync {
    async fn run_target(&self, target: &Target) -> TargetResult;
}

pub struct Scheduler {
    runner: Arc<dyn TargetRunner>,
    workers: usize,
}

impl Scheduler {
    pub fn new(runner: Arc<dyn TargetRunner>, workers: usize) -> Self {
        Self {
            runner,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every target and returns one result per target, in input order.
    ///
    /// Dropping the returned future aborts every spawned task.
    pub async fn run(&self, targets: &[Target]) -> Vec<TargetResult> {
        let gate = Arc::new(Semaphore::new(self.workers));
        let mut tasks: JoinSet<TargetResult> = JoinSet::new();
        let mut slots = HashMap::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            let gate = Arc::clone(&gate);
            let runner = Arc::clone(&self.runner);
            let target = target.clone();
            let handle = tasks.spawn(async move {
                let _permit = gate.acquire_owned().await.ok();
                runner.run_target(&target).await
            });
            slots.insert(handle.id(), index);
        }

        let mut results: Vec<Option<TargetResult>> = vec![None; targets.len()];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, result)) => {
                    if let Some(&index) = slots.get(&id) {
                        results[index] = Some(result);
                    }
                }
                Err(e) => {
                    if let Some(&index) = slots.get(&e.id()) {
                        let target = &targets[index];
                        error!("Error checking {target}: {e}");
                        results[index] = Some(fault_result(target, describe(&e)));
                    }
                }
            }
        }

        results
            .into_iter()
            .zip(targets)
            .map(|(result, target)| result.unwrap_or_else(|| fault_result(target, "task produced no result".into())))
            .collect()
    }
}

fn describe(e: &JoinError) -> String {
    if e.is_cancelled() {
        "task was cancelled".to_string()
    } else {
        e.to_string()
    }
}

/// Single synthetic `ERROR` check standing in for a target whose task died.
fn fault_result(target: &Target, message: String) -> TargetResult {
    TargetResult::new(
        target.clone(),
        vec![CheckResult::failure("ERROR", Duration::ZERO, "Unexpected error", message)],
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
