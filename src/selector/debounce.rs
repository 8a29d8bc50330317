use std::time::{Duration, Instant};

/// Default quiet period before a typed query takes effect.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid query edits into a single emission after a quiet period.
///
/// Time is passed in explicitly so callers decide what "now" means; the event
/// loop passes [`Instant::now`], tests pass synthetic instants.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug, Clone)]
struct Pending {
    query: String,
    deadline: Instant,
}

impl QueryDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a raw edit, replacing any pending value and restarting the timer.
    pub fn push(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            query: query.into(),
            deadline: now + self.delay,
        });
    }

    /// Emit the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.pending.take().map(|pending| pending.query)
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// When the pending value will fire, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn rapid_edits_emit_only_the_last_value_once() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::new(DELAY);
        for (step, text) in ["c", "ca", "cat", "cats"].into_iter().enumerate() {
            let now = start + Duration::from_millis(step as u64 * 100);
            debouncer.push(text, now);
            assert_eq!(debouncer.poll(now), None);
        }

        let last_edit = start + Duration::from_millis(300);
        assert_eq!(debouncer.poll(last_edit + Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(last_edit + DELAY), Some("cats".to_string()));
        assert_eq!(debouncer.poll(last_edit + DELAY * 10), None);
    }

    #[test]
    fn each_edit_restarts_the_timer() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::new(DELAY);
        debouncer.push("a", start);
        debouncer.push("ab", start + Duration::from_millis(250));
        // The first deadline passes without firing because it was restarted.
        assert_eq!(debouncer.poll(start + DELAY), None);
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(250) + DELAY)
        );
    }

    #[test]
    fn cancel_discards_pending_value() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::new(DELAY);
        debouncer.push("dog", start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let start = Instant::now();
        let mut debouncer = QueryDebouncer::new(Duration::ZERO);
        debouncer.push("now", start);
        assert_eq!(debouncer.poll(start), Some("now".to_string()));
    }
}
