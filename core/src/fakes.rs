//! In-process stand-ins for the network checks.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::{CheckResult, Status};
use tokio::time::Instant;

use crate::checks::{Check, CheckKind};

/// A scriptable check that records how it was driven.
pub(crate) struct FakeCheck {
    kind: CheckKind,
    script: Mutex<VecDeque<Status>>,
    fallback: Status,
    failing_hosts: HashSet<String>,
    delay: Duration,
    panics: bool,
    calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeCheck {
    pub fn new(kind: CheckKind, fallback: Status) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            fallback,
            failing_hosts: HashSet::new(),
            delay: Duration::ZERO,
            panics: false,
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Statuses returned by successive calls before falling back.
    pub fn scripted(self, statuses: impl IntoIterator<Item = Status>) -> Self {
        *self.script.lock().unwrap() = statuses.into_iter().collect();
        self
    }

    /// Always fail for this host, whatever the script says.
    pub fn failing_for(mut self, host: &str) -> Self {
        self.failing_hosts.insert(host.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    /// Highest number of concurrent invocations observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Check for FakeCheck {
    fn kind(&self) -> CheckKind {
        self.kind
    }

    async fn run(&self, target: &Target, _config: &Config) -> CheckResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics {
            panic!("fake {} check exploded", self.kind);
        }

        let status = if self.failing_hosts.contains(target.host()) {
            Status::Failure
        } else {
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or(self.fallback)
        };

        let result = CheckResult::new(self.kind.label(), status, self.delay, format!("fake {status}"));
        match status {
            Status::Failure | Status::Warning => result.with_error(format!("scripted {status}")),
            _ => result,
        }
    }
}
