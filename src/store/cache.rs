//! Cache envelope, freshness policy and request sequencing shared by all stores.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Cache and UI-flag policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    /// Fetched data younger than this is served without a network call
    pub freshness_window: Duration,
    /// How long a "resent" confirmation stays visible
    pub resend_flash: Duration,
    /// Whether a focused fetch may switch the applications tab
    pub auto_focus: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            freshness_window: Duration::from_secs(5 * 60),
            resend_flash: Duration::from_millis(2000),
            auto_focus: true,
        }
    }
}

/// Result of a fetch call. Informational only; failures are already logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cache was fresh, no request made
    Cached,
    /// Collection replaced with this many records
    Refreshed(usize),
    /// A newer request was issued while this one was in flight; result dropped
    Superseded,
    /// Request failed; collection unchanged
    Failed,
}

/// A collection plus the time it was last filled.
#[derive(Debug, Clone)]
pub struct CacheEnvelope<T> {
    pub data: Vec<T>,
    pub last_fetched_at_ms: Option<i64>,
}

impl<T> Default for CacheEnvelope<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            last_fetched_at_ms: None,
        }
    }
}

impl<T> CacheEnvelope<T> {
    /// Fresh iff filled at least once and `now - last_fetched < window`.
    pub fn is_fresh(&self, now_ms: i64, window: Duration) -> bool {
        match self.last_fetched_at_ms {
            Some(at) => now_ms.saturating_sub(at) < window.as_millis() as i64,
            None => false,
        }
    }

    pub fn replace(&mut self, data: Vec<T>, now_ms: i64) {
        self.data = data;
        self.last_fetched_at_ms = Some(now_ms);
    }

    /// Keep the data but force the next fetch to go to the network.
    pub fn invalidate(&mut self) {
        self.last_fetched_at_ms = None;
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.last_fetched_at_ms = None;
    }
}

/// Monotonic request counter for one logical query.
///
/// Only the response holding the latest ticket may be applied.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Stable sort, newest first; records without a timestamp keep their order at the end.
pub fn sort_newest_first<T, F>(items: &mut [T], created_at_ms: F)
where
    F: Fn(&T) -> Option<i64>,
{
    items.sort_by(|a, b| created_at_ms(b).cmp(&created_at_ms(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn test_empty_envelope_is_never_fresh() {
        let cache: CacheEnvelope<u32> = CacheEnvelope::default();
        assert!(!cache.is_fresh(0, WINDOW));
    }

    #[test]
    fn test_freshness_window_boundary() {
        let mut cache = CacheEnvelope::default();
        cache.replace(vec![1, 2], 1_000);
        assert!(cache.is_fresh(1_000, WINDOW));
        assert!(cache.is_fresh(1_000 + 299_999, WINDOW));
        assert!(!cache.is_fresh(1_000 + 300_000, WINDOW));

        cache.invalidate();
        assert!(!cache.is_fresh(1_000, WINDOW));
        assert_eq!(cache.data, vec![1, 2]);
    }

    #[test]
    fn test_sequence_only_latest_is_current() {
        let seq = RequestSequence::default();
        let first = seq.issue();
        assert!(seq.is_current(first));
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut items = vec![(1, Some(10)), (2, None), (3, Some(30)), (4, None), (5, Some(20))];
        sort_newest_first(&mut items, |i| i.1);
        let order: Vec<_> = items.iter().map(|i| i.0).collect();
        assert_eq!(order, vec![3, 5, 1, 2, 4]);
    }
}
