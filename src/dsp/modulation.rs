//! Modulation signals: bounded control values with a one-shot trigger edge.

/*
Modulation Signals
==================

A modulation signal is what flows between modulation nodes and into the
parameter ports of unit nodes. It carries two independent things:

  value       A continuous control in [0.0, 1.0]. Every producer clamps here,
              so consumers never have to.

  triggered   A discrete edge. True for exactly the tick in which an event
              fired (LFO wrapped, envelope started, note gated), false on every
              other tick.

Keeping the edge separate from the value avoids the classic ambiguity of
trigger-by-threshold: "the signal is exactly 1.0" and "something just
happened" are different facts.

Lifecycle of an edge
--------------------

    tick T    producer.go()   → trigger(out)          triggered = true
              consumer.go()   → is_triggered(in)      true  (read consumed)
              consumer.go()   → is_triggered(in)      false (already read)
    tick T+1  driver          → clear producer edges  triggered = false
              consumer.go()   → is_triggered(in)      false

Each consumer port keeps its own read state, so fan-out to several consumers
delivers the edge once to each of them. Forwarding is explicit: a consumer
that wants to pass an event on calls trigger() on its own output.
*/

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModSignal {
    pub value: f32,
    pub triggered: bool,
}

impl ModSignal {
    pub fn new(value: f32) -> Self {
        Self {
            value: clamp_unit(value),
            triggered: false,
        }
    }

    /// Store a new value, clamped to [0, 1]. Leaves the edge alone.
    #[inline]
    pub fn set(&mut self, value: f32) {
        self.value = clamp_unit(value);
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Map a 0..1 control exponentially onto `[min, max]`.
///
/// `min` is also the floor: NaN controls and degenerate ranges land there.
#[inline]
pub fn exponential_map(control: f32, min: f32, max: f32) -> f32 {
    if min <= 0.0 || max <= min {
        return min.max(0.0);
    }
    min * (max / min).powf(clamp_unit(control))
}
