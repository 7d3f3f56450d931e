//! One-shot countdown used to bound waits on the printer.

use std::time::{Duration, Instant};

/// Where a [`Deadline`] is in its countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineState {
    Idle,
    Running,
    Elapsed,
}

/// Restartable one-shot countdown.
///
/// Created idle. [`start`](Deadline::start) begins a fresh countdown and
/// clears any earlier expiry; once the duration passes the deadline reports
/// elapsed until the next `start`.
///
/// ```
/// use std::time::Duration;
/// use labelbridge::session::Deadline;
///
/// let mut deadline = Deadline::new();
/// assert!(!deadline.elapsed());
///
/// deadline.start(Duration::ZERO);
/// assert!(deadline.elapsed());
///
/// deadline.start(Duration::from_secs(60));
/// assert!(!deadline.elapsed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    started: Option<(Instant, Duration)>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting down `timeout`, replacing any countdown in progress.
    pub fn start(&mut self, timeout: Duration) {
        self.started = Some((Instant::now(), timeout));
    }

    pub fn elapsed(&self) -> bool {
        self.state() == DeadlineState::Elapsed
    }

    pub fn state(&self) -> DeadlineState {
        match self.started {
            None => DeadlineState::Idle,
            Some((at, timeout)) if at.elapsed() >= timeout => DeadlineState::Elapsed,
            Some(_) => DeadlineState::Running,
        }
    }

    /// Time left on a running countdown. Zero once elapsed, `None` when idle.
    pub fn remaining(&self) -> Option<Duration> {
        self.started
            .map(|(at, timeout)| timeout.saturating_sub(at.elapsed()))
    }
}
