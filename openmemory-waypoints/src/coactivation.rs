use std::sync::Mutex;

use uuid::Uuid;

/// A single coactivation observation: two memories returned together in a
/// search result, ordered `(lower_id, higher_id)` so the buffer and the
/// flush that follows never treat `(a, b)` and `(b, a)` as distinct pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coactivation {
    pub tenant: Uuid,
    pub from: Uuid,
    pub to: Uuid,
    pub activation: f64,
}

/// Buffers coactivation tuples between search and the periodic reinforcement
/// flush (spec.md §4.3). Reinforcement itself is eventual: a search
/// immediately after a write may not observe the strengthened edge yet.
#[derive(Default)]
pub struct CoactivationBuffer {
    events: Mutex<Vec<Coactivation>>,
}

impl CoactivationBuffer {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    /// Records that `a` and `b` were coactivated (returned together, or
    /// created together) with the given activation strength. Order of `a`
    /// and `b` doesn't matter; normalized on write.
    pub fn record(&self, tenant: Uuid, a: Uuid, b: Uuid, activation: f64) {
        if a == b {
            return;
        }
        let (from, to) = if a < b { (a, b) } else { (b, a) };
        let mut events = self.events.lock().expect("coactivation buffer poisoned");
        events.push(Coactivation { tenant, from, to, activation });
    }

    /// Drains the buffer, summing activation for repeated pairs within the
    /// same flush so a hot pair accumulates one larger reinforcement instead
    /// of many small upserts.
    pub fn drain(&self) -> Vec<Coactivation> {
        let mut events = self.events.lock().expect("coactivation buffer poisoned");
        let drained = std::mem::take(&mut *events);
        drop(events);

        let mut merged: Vec<Coactivation> = Vec::new();
        for ev in drained {
            if let Some(existing) = merged.iter_mut().find(|e| e.tenant == ev.tenant && e.from == ev.from && e.to == ev.to) {
                existing.activation += ev.activation;
            } else {
                merged.push(ev);
            }
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("coactivation buffer poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_normalizes_pair_order() {
        let buf = CoactivationBuffer::new();
        let tenant = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };

        buf.record(tenant, a, b, 0.5);
        buf.record(tenant, b, a, 0.5);

        let drained = buf.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].from, lo);
        assert_eq!(drained[0].to, hi);
        assert!((drained[0].activation - 1.0).abs() < 1e-9);
    }

    #[test]
    fn self_pairs_are_ignored() {
        let buf = CoactivationBuffer::new();
        let tenant = Uuid::new_v4();
        let id = Uuid::new_v4();
        buf.record(tenant, id, id, 1.0);
        assert!(buf.is_empty());
    }

    #[test]
    fn drain_empties_the_buffer() {
        let buf = CoactivationBuffer::new();
        buf.record(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 0.2);
        assert_eq!(buf.len(), 1);
        buf.drain();
        assert!(buf.is_empty());
    }
}
