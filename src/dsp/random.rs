//! Per-node choice between the voice's shared RNG and a private, seeded one.

use rand::{rngs::StdRng, SeedableRng};

/*
Shared vs Private Randomness
============================

Every voice owns one StdRng. Nodes that need randomness draw from it by
default, which ties their output to the voice seed AND to the order in which
other nodes draw: add a Noise node upstream and every later random node hears
a different sequence.

A node with a non-zero Seed input opts out. The seed value's bit pattern keys a
private StdRng, so the same seed always yields the same sequence no matter what
the rest of the graph does.

    seed == 0          → shared voice RNG (private state discarded)
    seed == S (new)    → private RNG seeded from S.to_bits()
    seed == S (again)  → keep drawing from the same private RNG
*/

#[derive(Debug, Clone, Default)]
pub struct SeededRng {
    private: Option<(u32, StdRng)>,
}

impl SeededRng {
    pub fn new() -> Self {
        Self { private: None }
    }

    /// Pick the generator for this tick.
    pub fn select<'a>(&'a mut self, seed: f32, shared: &'a mut StdRng) -> &'a mut StdRng {
        if seed == 0.0 || !seed.is_finite() {
            self.private = None;
            return shared;
        }

        let bits = seed.to_bits();
        let stale = !matches!(&self.private, Some((current, _)) if *current == bits);
        if stale {
            self.private = Some((bits, StdRng::seed_from_u64(u64::from(bits))));
        }

        match self.private.as_mut() {
            Some((_, rng)) => rng,
            None => shared,
        }
    }

    /// True while a private generator is in use.
    pub fn is_private(&self) -> bool {
        self.private.is_some()
    }

    /// Drop any private generator; the next non-zero seed starts fresh.
    pub fn reset(&mut self) {
        self.private = None;
    }
}
