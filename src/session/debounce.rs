use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by an external clock.
///
/// Every `schedule` pushes the deadline out again; `fire_if_due` reports
/// the deadline once and clears it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(800));
        debouncer.schedule(t0);

        assert!(!debouncer.fire_if_due(t0 + Duration::from_millis(799)));
        assert!(debouncer.fire_if_due(t0 + Duration::from_millis(800)));
        assert!(!debouncer.fire_if_due(t0 + Duration::from_secs(5)));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn rescheduling_pushes_deadline_out() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(800));
        debouncer.schedule(t0);
        debouncer.schedule(t0 + Duration::from_millis(500));

        assert!(!debouncer.fire_if_due(t0 + Duration::from_millis(900)));
        assert_eq!(
            debouncer.deadline(),
            Some(t0 + Duration::from_millis(1300))
        );
        assert!(debouncer.fire_if_due(t0 + Duration::from_millis(1300)));
    }

    #[test]
    fn cancel_drops_pending_fire() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(800));
        debouncer.schedule(t0);
        debouncer.cancel();
        assert!(!debouncer.fire_if_due(t0 + Duration::from_secs(1)));
    }
}
