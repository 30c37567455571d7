//! Floating decorative motes that drift up from the bottom of the viewport
//! while any scene is on screen.

use std::collections::VecDeque;

use crate::rng::Random;

pub const MOTE_COLORS: [&str; 4] = ["#ff00ff", "#ff69b4", "#ffb6c1", "#fff"];

#[derive(Clone, Debug, PartialEq)]
pub struct Mote {
    pub left_pct: f64,
    pub size_px: f64,
    pub color: &'static str,
    pub expires_ms: f64,
}

impl Mote {
    pub fn style(&self) -> String {
        format!(
            "left:{}%; top:100%; width:{s}px; height:{s}px; background:{c}; box-shadow:0 0 10px {c};",
            self.left_pct,
            s = self.size_px,
            c = self.color
        )
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct EmitterStep {
    pub spawned: Option<Mote>,
    /// Oldest-first count of motes whose lifetime ran out this step.
    pub expired: usize,
}

pub struct AmbientEmitter {
    interval_ms: f64,
    lifetime_ms: f64,
    next_emit_ms: Option<f64>,
    live: VecDeque<f64>,
}

impl AmbientEmitter {
    pub fn new(interval_ms: f64, lifetime_ms: f64) -> Self {
        Self {
            interval_ms,
            lifetime_ms,
            next_emit_ms: None,
            live: VecDeque::new(),
        }
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Emission ticks keep their own cadence whether or not a scene is up;
    /// a tick with nothing on screen simply emits nothing.
    pub fn update(&mut self, rng: &mut impl Random, now_ms: f64, scene_active: bool) -> EmitterStep {
        let mut step = EmitterStep::default();

        while self.live.front().is_some_and(|&exp| exp <= now_ms) {
            self.live.pop_front();
            step.expired += 1;
        }

        let due = *self.next_emit_ms.get_or_insert(now_ms + self.interval_ms);
        if now_ms >= due {
            // Skip missed ticks (e.g. a background tab) rather than bursting.
            let missed = ((now_ms - due) / self.interval_ms).floor();
            self.next_emit_ms = Some(due + (missed + 1.0) * self.interval_ms);
            if scene_active {
                let mote = Mote {
                    left_pct: rng.next_f64() * 100.0,
                    size_px: rng.next_f64() * 10.0 + 5.0,
                    color: MOTE_COLORS[rng.index(MOTE_COLORS.len())],
                    expires_ms: now_ms + self.lifetime_ms,
                };
                self.live.push_back(mote.expires_ms);
                step.spawned = Some(mote);
            }
        }
        step
    }
}

/// Host handles for live motes, kept in step with the emitter's expiry queue.
/// A mote whose node could not be created holds an empty slot so later
/// expiries still remove the right nodes.
pub struct MoteNodes<T> {
    slots: VecDeque<Option<T>>,
}

impl<T> Default for MoteNodes<T> {
    fn default() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }
}

impl<T> MoteNodes<T> {
    pub fn push(&mut self, node: Option<T>) {
        self.slots.push_back(node);
    }

    /// Drop the `count` oldest slots and return the nodes they held.
    pub fn expire(&mut self, count: usize) -> Vec<T> {
        let n = count.min(self.slots.len());
        self.slots.drain(..n).flatten().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift64;

    #[test]
    fn silent_without_active_scene() {
        let mut rng = XorShift64::seeded(1);
        let mut e = AmbientEmitter::new(500.0, 3000.0);
        let mut t = 0.0;
        while t < 5_000.0 {
            assert!(e.update(&mut rng, t, false).spawned.is_none());
            t += 16.0;
        }
        assert_eq!(e.live(), 0);
    }

    #[test]
    fn one_mote_per_interval_and_expiry_after_lifetime() {
        let mut rng = XorShift64::seeded(2);
        let mut e = AmbientEmitter::new(500.0, 3000.0);
        let mut spawned = 0;
        let mut expired = 0;
        for ms in (0..=10_000).step_by(10) {
            let step = e.update(&mut rng, ms as f64, true);
            if let Some(m) = step.spawned {
                spawned += 1;
                assert!((0.0..100.0).contains(&m.left_pct));
                assert!((5.0..15.0).contains(&m.size_px));
                assert!(MOTE_COLORS.contains(&m.color));
            }
            expired += step.expired;
        }
        // first tick at 500ms, then every 500ms up to 10s
        assert_eq!(spawned, 20);
        // everything spawned at or before 7s has expired by 10s
        assert_eq!(expired, 14);
        assert_eq!(e.live(), 6);
    }

    #[test]
    fn missed_ticks_do_not_burst() {
        let mut rng = XorShift64::seeded(3);
        let mut e = AmbientEmitter::new(500.0, 3000.0);
        e.update(&mut rng, 0.0, true);
        let step = e.update(&mut rng, 5_000.0, true);
        assert!(step.spawned.is_some());
        assert!(e.update(&mut rng, 5_010.0, true).spawned.is_none());
    }

    #[test]
    fn failed_node_keeps_expiry_order() {
        let mut rng = XorShift64::seeded(4);
        let mut e = AmbientEmitter::new(500.0, 3000.0);
        let mut nodes = MoteNodes::default();
        let mut removed = Vec::new();
        for ms in (0..=5_000).step_by(10) {
            let step = e.update(&mut rng, ms as f64, true);
            removed.extend(nodes.expire(step.expired).into_iter().map(|born| (ms, born)));
            if step.spawned.is_some() {
                // the 1000ms mote never made it into the page
                nodes.push((ms != 1_000).then_some(ms));
            }
            assert_eq!(nodes.len(), e.live());
        }
        // each node is removed exactly one lifetime after it appeared
        assert_eq!(removed, vec![(3_500, 500), (4_500, 1_500), (5_000, 2_000)]);
    }
}
