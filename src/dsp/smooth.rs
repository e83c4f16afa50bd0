//! One-pole smoothing that refuses to wander into subnormal floats.

/*
Subnormal-Safe Blending
=======================

Exponential smoothing moves a value a fraction `alpha` of the way toward its
target every tick:

    value = (1 - alpha) × old + alpha × new

During a long decay both operands shrink geometrically. Below ~1.2e-38 an f32
becomes subnormal and most CPUs fall off a fast path, costing tens to hundreds
of cycles per operation. A voice with 256 partials decaying for seconds spends
its whole budget there.

The fix is a floor: when BOTH operands are smaller than SUBNORMAL_GUARD the
result snaps to exact zero. 1e-15 is about -300 dB, far below anything a
renderer can reproduce, and far above the subnormal range, so the snap happens
long before the slow path does. When only one side is small (a partial fading
in from silence, or one still audible and fading out) the ordinary blend runs.

Non-finite targets or coefficients never blend: the old value is kept.
*/

/// Magnitude below which two smoothing operands snap to zero.
pub const SUBNORMAL_GUARD: f32 = 1.0e-15;

/// Blend `old` toward `new` by `alpha` (0 = hold, 1 = jump).
#[inline]
pub fn blend(old: f32, new: f32, alpha: f32) -> f32 {
    if !new.is_finite() || !alpha.is_finite() {
        return if old.is_finite() { old } else { 0.0 };
    }
    if old.abs() < SUBNORMAL_GUARD && new.abs() < SUBNORMAL_GUARD {
        return 0.0;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    (1.0 - alpha) * old + alpha * new
}

/// Map a 0..1 smoothing amount to a per-tick coefficient.
///
/// 0 passes the target straight through; 1 is the slowest glide that still
/// converges.
#[inline]
pub fn amount_to_alpha(amount: f32) -> f32 {
    const MIN_ALPHA: f32 = 1.0e-3;
    if !amount.is_finite() {
        return 1.0;
    }
    let remaining = 1.0 - amount.clamp(0.0, 1.0);
    (remaining * remaining).max(MIN_ALPHA)
}
