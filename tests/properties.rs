use approx::assert_relative_eq;
use proptest::prelude::*;
use saavy_spectral::{
    dsp::{
        smooth::{blend, SUBNORMAL_GUARD},
        sort::{big_sort, settle, simple_sort, SortStrategy},
    },
    PartialBuffer, PARTIALS,
};

fn buffer_from(freqs: &[f32], amps: &[f32]) -> PartialBuffer {
    let mut buf = PartialBuffer::harmonic();
    buf.freq.copy_from_slice(freqs);
    buf.amp.copy_from_slice(amps);
    buf
}

/// (freq bits, amp bits, tag) triples in tag order.
fn triples(buf: &PartialBuffer) -> Vec<(u32, u32, usize)> {
    let mut out: Vec<_> = (0..PARTIALS)
        .map(|i| (buf.freq[i].to_bits(), buf.amp[i].to_bits(), buf.order[i]))
        .collect();
    out.sort_by_key(|t| t.2);
    out
}

fn any_freq() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => 0.0f32..64.0,
        1 => Just(f32::NAN),
        1 => Just(-3.0f32),
        1 => Just(f32::INFINITY),
    ]
}

fn spectrum() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (
        prop::collection::vec(any_freq(), PARTIALS),
        prop::collection::vec(0.0f32..1.0, PARTIALS),
    )
}

proptest! {
    #[test]
    fn big_sort_orders_and_keeps_partials_together((freqs, amps) in spectrum()) {
        let mut buf = buffer_from(&freqs, &amps);
        buf.constrain();
        let before = triples(&buf);

        big_sort(&mut buf);

        prop_assert!(buf.is_sorted());
        prop_assert!(buf.has_valid_order());
        prop_assert_eq!(triples(&buf), before);
    }

    #[test]
    fn simple_sort_orders_and_keeps_partials_together((freqs, amps) in spectrum()) {
        let mut buf = buffer_from(&freqs, &amps);
        buf.constrain();
        let before = triples(&buf);

        simple_sort(&mut buf);

        prop_assert!(buf.is_sorted());
        prop_assert!(buf.has_valid_order());
        prop_assert_eq!(triples(&buf), before);
    }

    #[test]
    fn constrain_is_idempotent((freqs, amps) in spectrum()) {
        let mut buf = buffer_from(&freqs, &amps);
        let first = buf.constrain();
        let snapshot = buf.clone();
        let second = buf.constrain();

        prop_assert_eq!(first, second);
        prop_assert!(buf.bits_eq(&snapshot));
        prop_assert!(buf.freq.iter().all(|f| f.is_finite() && *f >= 0.0));
    }

    #[test]
    fn settled_buffers_need_no_further_sort(
        (freqs, amps) in spectrum(),
        big in any::<bool>(),
    ) {
        let mut buf = buffer_from(&freqs, &amps);
        let strategy = if big { SortStrategy::Big } else { SortStrategy::Simple };
        settle(&mut buf, strategy);

        prop_assert!(!buf.constrain());
    }

    #[test]
    fn blend_stays_between_operands(
        old in -1.0f32..1.0,
        new in -1.0f32..1.0,
        alpha in 0.0f32..=1.0,
    ) {
        let out = blend(old, new, alpha);
        let (lo, hi) = if old < new { (old, new) } else { (new, old) };
        prop_assert!(out >= lo - 1e-6 && out <= hi + 1e-6);
    }

    #[test]
    fn blend_snaps_below_guard(
        old in -1.0e-16f32..1.0e-16,
        new in -1.0e-16f32..1.0e-16,
        alpha in 0.0f32..=1.0,
    ) {
        prop_assert_eq!(blend(old, new, alpha), 0.0);
    }
}

#[test]
fn blend_is_linear_when_one_side_is_audible() {
    let small = SUBNORMAL_GUARD / 10.0;
    assert_relative_eq!(blend(small, 1.0, 0.25), 0.75 * small + 0.25);
    assert_relative_eq!(blend(0.5, small, 0.5), 0.25 + 0.5 * small);
}
