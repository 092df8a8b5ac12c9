use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Payload handed from a leader to its followers; `None` when the leader failed
type Outcome = Option<Arc<Vec<u8>>>;

type Inflight = Arc<DashMap<String, broadcast::Sender<Outcome>>>;

/// Collapses concurrent misses for the same key into a single fetch
#[derive(Clone, Default)]
pub(crate) struct Coalescer {
    inflight: Inflight,
}

/// Role of a caller in a coalesced fetch
pub(crate) enum Flight {
    /// No fetch was running; this caller fetches and reports through the guard
    Leader(FlightGuard),
    /// A fetch is already running; wait for its outcome
    Follower(broadcast::Receiver<Outcome>),
}

impl Coalescer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Join the running fetch for `key` or become its leader
    pub(crate) fn join(&self, key: &str) -> Flight {
        // The entry lock is released at the end of this match
        match self.inflight.entry(key.to_string()) {
            Entry::Occupied(o) => Flight::Follower(o.get().subscribe()),
            Entry::Vacant(v) => {
                let (tx, _rx) = broadcast::channel(1);
                v.insert(tx.clone());
                Flight::Leader(FlightGuard {
                    key: key.to_string(),
                    inflight: self.inflight.clone(),
                    tx,
                    finished: false,
                })
            }
        }
    }

    /// Forget every running fetch so the next miss for any key leads a new one
    ///
    /// Callers already following a flight still receive its payload.
    pub(crate) fn abandon_all(&self) {
        self.inflight.clear();
    }

    /// Number of fetches currently in flight
    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

/// Wait for the leader's payload; `None` if it failed, was cancelled or panicked
pub(crate) async fn wait(mut rx: broadcast::Receiver<Outcome>) -> Outcome {
    rx.recv().await.ok().flatten()
}

/// Held by the leader of a coalesced fetch
///
/// Dropping the guard without completing it tells followers to fetch on their
/// own, so a failed or cancelled leader never strands them.
pub(crate) struct FlightGuard {
    key: String,
    inflight: Inflight,
    tx: broadcast::Sender<Outcome>,
    finished: bool,
}

impl FlightGuard {
    /// Hand the stored payload to every follower
    pub(crate) fn complete(mut self, payload: Vec<u8>) {
        self.finish(Some(Arc::new(payload)));
    }

    fn finish(&mut self, outcome: Outcome) {
        if self.finished {
            return;
        }
        self.finished = true;

        // Cleanup map entry first, so late callers start a fresh flight
        self.inflight
            .remove_if(&self.key, |_, tx| tx.same_channel(&self.tx));

        if self.tx.receiver_count() > 0 {
            let _ = self.tx.send(outcome);
        }
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.finish(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_caller_leads() {
        let coalescer = Coalescer::new();

        let leader = coalescer.join("k");
        assert!(matches!(leader, Flight::Leader(_)));
        assert!(matches!(coalescer.join("k"), Flight::Follower(_)));
        assert!(matches!(coalescer.join("other"), Flight::Leader(_)));
    }

    #[tokio::test]
    async fn test_followers_receive_payload() {
        let coalescer = Coalescer::new();

        let Flight::Leader(guard) = coalescer.join("k") else {
            panic!("expected leader");
        };
        let Flight::Follower(rx) = coalescer.join("k") else {
            panic!("expected follower");
        };

        guard.complete(b"page".to_vec());
        assert_eq!(wait(rx).await.as_deref(), Some(&b"page".to_vec()));
        assert_eq!(coalescer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_dropped_leader_releases_followers() {
        let coalescer = Coalescer::new();

        let Flight::Leader(guard) = coalescer.join("k") else {
            panic!("expected leader");
        };
        let Flight::Follower(rx) = coalescer.join("k") else {
            panic!("expected follower");
        };

        drop(guard);
        assert_eq!(wait(rx).await, None);
        assert!(matches!(coalescer.join("k"), Flight::Leader(_)));
    }

    #[tokio::test]
    async fn test_abandoned_flight_keeps_its_followers() {
        let coalescer = Coalescer::new();

        let Flight::Leader(old) = coalescer.join("k") else {
            panic!("expected leader");
        };
        let Flight::Follower(rx) = coalescer.join("k") else {
            panic!("expected follower");
        };

        coalescer.abandon_all();
        let Flight::Leader(new) = coalescer.join("k") else {
            panic!("expected a fresh leader after abandon_all");
        };

        // Completing the old flight must not unregister the new one
        old.complete(b"old".to_vec());
        assert_eq!(wait(rx).await.as_deref(), Some(&b"old".to_vec()));
        assert_eq!(coalescer.in_flight(), 1);
        assert!(matches!(coalescer.join("k"), Flight::Follower(_)));

        drop(new);
        assert_eq!(coalescer.in_flight(), 0);
    }
}
