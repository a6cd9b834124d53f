//! Tick-driven polling for the job list and the open job detail.
//!
//! Time is whatever monotonic offset the driver passes in `Msg::Tick`; nothing
//! here reads a clock.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub list_interval: Duration,
    pub detail_interval: Duration,
    pub search_debounce: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            list_interval: Duration::from_secs(5),
            detail_interval: Duration::from_secs(2),
            search_debounce: Duration::from_millis(300),
        }
    }
}

/// Sequence number attached to an outgoing request so its completion can be
/// matched against newer requests of the same stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Per-stream request counter implementing last-response-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqCounter {
    issued: u64,
    applied: u64,
}

impl SeqCounter {
    pub fn issue(&mut self) -> RequestSeq {
        self.issued += 1;
        RequestSeq(self.issued)
    }

    /// Accepts a completion only if nothing issued later has been applied.
    pub fn accept(&mut self, seq: RequestSeq) -> bool {
        if seq.0 > self.applied && seq.0 <= self.issued {
            self.applied = seq.0;
            true
        } else {
            false
        }
    }

    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq.0 == self.issued
    }

    /// Rejects every completion for requests issued so far.
    pub fn close_window(&mut self) {
        self.applied = self.issued;
    }
}

/// Fixed-interval timer re-evaluated on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Duration>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Returns true when the interval has elapsed, and schedules the next one.
    /// The first tick after arming only schedules.
    pub fn due(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(next) if now >= next => {
                self.next_due = Some(now + self.interval);
                true
            }
            Some(_) => false,
            None => {
                self.next_due = Some(now + self.interval);
                false
            }
        }
    }

    /// Restarts the interval after an out-of-band fetch.
    pub fn restart(&mut self, now: Duration) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }
}

/// Which fetches a tick should issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollPlan {
    pub fetch_list: bool,
    pub fetch_detail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollController {
    list: PollTimer,
    detail: PollTimer,
}

impl PollController {
    pub fn new(settings: &PollSettings) -> Self {
        Self {
            list: PollTimer::new(settings.list_interval),
            detail: PollTimer::new(settings.detail_interval),
        }
    }

    /// Evaluates both scopes for one tick.
    ///
    /// `list_running` tells whether any cached job is running. `detail_running`
    /// is `None` while no detail view is open, otherwise whether the open job
    /// is (or may still be) running. A scope with nothing running never
    /// fetches, but its timer keeps ticking so the condition is re-checked.
    pub fn plan(&mut self, now: Duration, list_running: bool, detail_running: Option<bool>) -> PollPlan {
        let fetch_list = self.list.due(now) && list_running;
        let fetch_detail = match detail_running {
            Some(running) => self.detail.due(now) && running,
            None => false,
        };
        PollPlan {
            fetch_list,
            fetch_detail,
        }
    }

    pub fn list_fetched(&mut self, now: Duration) {
        self.list.restart(now);
    }

    pub fn detail_opened(&mut self, now: Duration) {
        self.detail.restart(now);
    }

    /// Stops scheduling detail ticks until the next `detail_opened`.
    pub fn detail_closed(&mut self) {
        self.detail.disarm();
    }

    pub fn detail_armed(&self) -> bool {
        self.detail.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut timer = PollTimer::new(secs(5));
        assert!(!timer.due(secs(0)));
        assert!(!timer.due(secs(4)));
        assert!(timer.due(secs(5)));
        assert!(!timer.due(secs(6)));
        assert!(timer.due(secs(11)));
    }

    #[test]
    fn restart_postpones_next_tick() {
        let mut timer = PollTimer::new(secs(2));
        timer.restart(secs(0));
        timer.restart(secs(1));
        assert!(!timer.due(secs(2)));
        assert!(timer.due(secs(3)));
    }

    #[test]
    fn seq_counter_discards_older_and_closed_requests() {
        let mut counter = SeqCounter::default();
        let first = counter.issue();
        let second = counter.issue();
        assert!(counter.accept(second));
        assert!(!counter.accept(first));

        let third = counter.issue();
        counter.close_window();
        assert!(!counter.accept(third));
        assert!(counter.is_latest(third));
        assert!(!counter.accept(RequestSeq::new(99)));
    }

    #[test]
    fn plan_skips_scopes_without_running_jobs() {
        let mut controller = PollController::new(&PollSettings::default());
        assert_eq!(controller.plan(secs(0), true, None), PollPlan::default());
        assert_eq!(controller.plan(secs(5), false, None), PollPlan::default());
        let plan = controller.plan(secs(10), true, None);
        assert!(plan.fetch_list);
        assert!(!plan.fetch_detail);
    }

    #[test]
    fn closed_detail_never_fetches() {
        let mut controller = PollController::new(&PollSettings::default());
        controller.detail_opened(secs(0));
        assert!(controller.plan(secs(2), false, Some(true)).fetch_detail);
        controller.detail_closed();
        assert!(!controller.detail_armed());
        assert!(!controller.plan(secs(4), false, None).fetch_detail);
    }
}
