/// Geometry shared by every scene's per-frame update.
///
/// All helpers are pure apart from the injected RNG, so scene rules stay
/// deterministic under a seeded generator.

use rand::Rng;

use crate::entities::{Spatial, Viewport};

/// Shorter direction vectors than this are not normalised; callers skip the
/// force for the frame instead of producing NaN.
pub const NEAR_ZERO: f32 = 1e-3;

/// Unit vector and length of `(dx, dy)`, or `None` when the length is
/// (nearly) zero.
pub fn direction(dx: f32, dy: f32) -> Option<(f32, f32, f32)> {
    let dist = dx.hypot(dy);
    if dist.is_finite() && dist > NEAR_ZERO {
        Some((dx / dist, dy / dist, dist))
    } else {
        None
    }
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// True when the two bodies' circles overlap.
pub fn overlaps(a: &impl Spatial, b: &impl Spatial) -> bool {
    distance(a.position(), b.position()) < a.radius() + b.radius()
}

/// Index and distance of the item closest to `(x, y)`.  Ties keep the
/// earliest item.
pub fn nearest<T: Spatial>(items: &[T], x: f32, y: f32) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, item) in items.iter().enumerate() {
        let d = distance(item.position(), (x, y));
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

// ── Walls ─────────────────────────────────────────────────────────────────────

/// Keep a body of `radius` inside `[0, extent]` on one axis, turning its
/// velocity back inward on contact.  A body wider than the extent is pinned
/// to the centre line.
pub fn bounce_axis(pos: &mut f32, vel: &mut f32, radius: f32, extent: f32) {
    let lo = radius.min(extent / 2.0);
    let hi = (extent - radius).max(extent / 2.0);
    if !pos.is_finite() {
        *pos = extent / 2.0;
        *vel = 0.0;
    } else if *pos < lo {
        *pos = lo;
        *vel = vel.abs();
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs();
    }
}

pub fn bounce(
    x: &mut f32,
    y: &mut f32,
    vx: &mut f32,
    vy: &mut f32,
    radius: f32,
    viewport: &Viewport,
) {
    bounce_axis(x, vx, radius, viewport.width);
    bounce_axis(y, vy, radius, viewport.height);
}

/// Wrap a coordinate into `[0, extent)`.
pub fn wrap(value: f32, extent: f32) -> f32 {
    if !value.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

// ── Randomness ────────────────────────────────────────────────────────────────

/// Uniform sample in `[-amplitude / 2, amplitude / 2)`.
pub fn jitter(rng: &mut impl Rng, amplitude: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * amplitude
}

/// Uniform sample in `[lo, lo + span)`.
pub fn spread(rng: &mut impl Rng, lo: f32, span: f32) -> f32 {
    lo + rng.gen::<f32>() * span
}

// ── Batched removal ───────────────────────────────────────────────────────────

/// Drop the items whose indices appear in `doomed`, keeping order.
pub fn without_indices<T>(items: Vec<T>, doomed: &[usize]) -> Vec<T> {
    if doomed.is_empty() {
        return items;
    }
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !doomed.contains(i))
        .map(|(_, item)| item)
        .collect()
}
