/// Rendering layer: every entity's look, expressed against [`Surface`].
///
/// Functions here only read simulation state.  Anything that animates purely
/// for looks (flame flicker, tentacle sway) is derived from the frame number
/// so drawing never consumes the simulation's random stream.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::bacteria::TINT_MAX;
use crate::entities::{
    Antibody, BlackHole, CelestialBody, Food, ImmuneCell, ImmuneKind, Microbe, MicrobeShape,
    RedBloodCell, Rocket, Scene, Star, Viewport, Virus,
};
use crate::surface::{Color, Paint, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_DISH_CENTER: Color = Color::hex(0x3a2a2a);
const C_DISH_EDGE: Color = Color::hex(0x1a0a0a);
const C_DISH_GREEN_CENTER: Color = Color::hex(0x2e4d2e);
const C_DISH_GREEN_EDGE: Color = Color::hex(0x152b15);
const C_BLOOD: Color = Color::hex(0x4a0e0e);
const C_FOOD_FILL: Color = Color::rgb(118, 186, 70);
const C_FOOD_RIM: Color = Color::rgb(62, 115, 23);
const C_HORIZON: Color = Color::rgb(200, 200, 255);
const C_HULL: Color = Color::hex(0xdbdbdb);
const C_WINDOW: Color = Color::hex(0x9bf6ff);
const C_FLAME: Color = Color::rgb(255, 180, 0);
const C_RBC_CORE: Color = Color::hex(0xe74c3c);
const C_RBC_RIM: Color = Color::hex(0xc0392b);
const C_VIRUS_SPIKE: Color = Color::hex(0x9e4242);
const C_VIRUS_BODY: Color = Color::hex(0x6b2d2d);
const C_ANTIBODY: Color = Color::rgb(255, 230, 150);

const GAME_OVER_TINT: f32 = 0.1;

// ── Frame-level fills ─────────────────────────────────────────────────────────

/// Background paint for the active scene, biased by its ambient scalar.
pub fn background(scene: &Scene, viewport: &Viewport) -> Paint {
    match scene {
        Scene::Bacteria(b) => {
            let (cx, cy) = viewport.center();
            // Tint is stored in [0, TINT_MAX]; the lerp factor is the tint itself.
            let t = b.green_tint.min(TINT_MAX);
            Paint::radial(cx, cy, 0.0, cx, cy, viewport.width.max(viewport.height))
                .stop(0.0, C_DISH_CENTER.lerp(C_DISH_GREEN_CENTER, t))
                .stop(1.0, C_DISH_EDGE.lerp(C_DISH_GREEN_EDGE, t))
        }
        Scene::Immune(i) => Paint::Solid(C_BLOOD.lerp(Color::BLACK, i.sickness)),
        Scene::Space(_) => Paint::Solid(Color::BLACK),
    }
}

/// Translucent black over the whole viewport.
pub fn overlay(s: &mut impl Surface, viewport: &Viewport, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    s.set_fill(Color::BLACK.with_alpha(alpha).into());
    s.fill_rect(0.0, 0.0, viewport.width, viewport.height);
}

pub fn game_over_tint(s: &mut impl Surface, viewport: &Viewport) {
    overlay(s, viewport, GAME_OVER_TINT);
}

// ── Bacteria ──────────────────────────────────────────────────────────────────

pub fn microbe(s: &mut impl Surface, m: &Microbe) {
    let r = m.radius;
    s.set_fill(m.color.into());
    s.save();
    s.translate(m.x, m.y);
    s.rotate(m.angle);
    s.begin_path();
    match &m.shape {
        MicrobeShape::Circle => s.arc(0.0, 0.0, r, 0.0, TAU),
        MicrobeShape::Blob => {
            s.move_to(r, 0.0);
            let mut theta = 0.0_f32;
            while theta < TAU {
                let rim = r + (theta * 3.0 + m.wiggle).sin() * r * 0.2;
                s.line_to(theta.cos() * rim, theta.sin() * rim);
                theta += 0.5;
            }
            s.close_path();
        }
        MicrobeShape::Rod { length } => {
            // Capsule between two semicircular caps.
            let half = (length / 2.0 - r).max(0.0);
            s.move_to(-half, -r);
            s.line_to(half, -r);
            s.arc(half, 0.0, r, -FRAC_PI_2, FRAC_PI_2);
            s.line_to(-half, r);
            s.arc(-half, 0.0, r, FRAC_PI_2, PI + FRAC_PI_2);
            s.close_path();
        }
        MicrobeShape::Worm { segments } => {
            let n = *segments as f32;
            for i in 0..*segments {
                let i = i as f32;
                let x = (i - n / 2.0) * r;
                let y = (i * 0.5 + m.wiggle).sin() * r * 1.2;
                s.arc(x, y, r, 0.0, TAU);
            }
        }
    }
    s.fill();
    s.restore();
}

/// A five-floret broccoli head that fades over its last 100 frames.
pub fn food(s: &mut impl Surface, f: &Food) {
    let alpha = (f.life as f32 / 100.0).min(1.0);
    s.set_fill(C_FOOD_FILL.with_alpha(alpha).into());
    s.set_stroke(C_FOOD_RIM.with_alpha(alpha).into());
    s.set_line_width(2.0);
    s.begin_path();
    for i in 0..5 {
        let angle = i as f32 / 5.0 * TAU + f.life as f32 * 0.01;
        let offset = f.radius * 0.6;
        s.arc(
            f.x + angle.cos() * offset,
            f.y + angle.sin() * offset,
            f.radius * 0.5,
            0.0,
            TAU,
        );
    }
    s.fill();
    s.stroke();
}

// ── Space ─────────────────────────────────────────────────────────────────────

pub fn star(s: &mut impl Surface, star: &Star) {
    s.set_fill(Color::WHITE.with_alpha(star.alpha).into());
    s.fill_circle(star.x, star.y, star.radius);
}

/// Sphere lit from the upper left.
pub fn celestial_body(s: &mut impl Surface, b: &CelestialBody) {
    let r = b.radius;
    s.set_fill(
        Paint::radial(b.x - r * 0.3, b.y - r * 0.3, r * 0.1, b.x, b.y, r)
            .stop(0.0, b.highlight)
            .stop(1.0, b.shade),
    );
    s.fill_circle(b.x, b.y, r);
}

pub fn black_hole(s: &mut impl Surface, h: &BlackHole) {
    let eh = h.event_horizon;
    s.save();
    s.translate(h.x, h.y);
    s.rotate(h.rotation);
    s.set_stroke(
        Paint::linear(-eh, 0.0, eh, 0.0)
            .stop(0.0, C_HORIZON.with_alpha(0.0))
            .stop(0.2, C_HORIZON.with_alpha(0.3))
            .stop(0.5, C_HORIZON.with_alpha(0.0))
            .stop(0.8, C_HORIZON.with_alpha(0.3))
            .stop(1.0, C_HORIZON.with_alpha(0.0)),
    );
    s.set_line_width(1.5);
    s.begin_path();
    s.arc(0.0, 0.0, eh, 0.0, TAU);
    s.stroke();
    s.restore();

    s.set_fill(
        Paint::radial(h.x, h.y, 0.0, h.x, h.y, h.radius)
            .stop(0.5, Color::BLACK)
            .stop(1.0, Color::BLACK.with_alpha(0.0)),
    );
    s.fill_circle(h.x, h.y, h.radius);
}

pub fn rocket(s: &mut impl Surface, r: &Rocket, frame: u64) {
    let size = r.size;
    let phase = frame as f32 * 1.7;

    if r.flame >= 1.0 && size >= 1.0 {
        let tail = -size * 0.8 - r.flame;
        s.save();
        s.translate(r.x, r.y);
        s.rotate(r.angle);
        s.set_fill(C_FLAME.with_alpha(0.75 + 0.25 * phase.sin()).into());
        s.begin_path();
        s.move_to(-size * 0.6, 0.0);
        s.line_to(tail, size * (0.5 + 0.25 * (phase * 1.3).sin()));
        s.line_to(tail, -size * (0.5 + 0.25 * (phase * 0.9).cos()));
        s.close_path();
        s.fill();
        s.restore();
    }

    if size < 0.5 {
        return;
    }
    s.save();
    s.translate(r.x, r.y);
    s.rotate(r.angle);
    s.set_fill(C_HULL.into());
    s.begin_path();
    s.move_to(size, 0.0);
    s.line_to(-size / 2.0, size / 1.5);
    s.line_to(-size * 0.8, size / 1.6);
    s.line_to(-size, 0.0);
    s.line_to(-size * 0.8, -size / 1.6);
    s.line_to(-size / 2.0, -size / 1.5);
    s.close_path();
    s.fill();
    s.set_fill(C_WINDOW.into());
    s.fill_circle(size * 0.4, 0.0, size * 0.2);
    s.restore();
}

// ── Immune ────────────────────────────────────────────────────────────────────

pub fn red_blood_cell(s: &mut impl Surface, c: &RedBloodCell) {
    s.save();
    s.translate(c.x, c.y);
    s.set_fill(
        Paint::radial(0.0, 0.0, c.radius * 0.4, 0.0, 0.0, c.radius)
            .stop(0.0, C_RBC_CORE)
            .stop(1.0, C_RBC_RIM),
    );
    s.fill_circle(0.0, 0.0, c.radius);
    s.restore();
}

pub fn immune_cell(s: &mut impl Surface, c: &ImmuneCell, frame: u64) {
    s.set_fill(c.color.into());
    s.save();
    s.translate(c.x, c.y);
    s.rotate(c.angle);
    s.begin_path();
    match &c.kind {
        ImmuneKind::Macrophage { tentacles } => {
            // ~300 ms per radian of sway at 60 FPS.
            let time = frame as f32 / 18.0;
            s.move_to(c.radius, 0.0);
            for t in tentacles {
                let sway = (t.angle * 3.0 + time).sin() * 5.0;
                let reach = ((t.angle * 2.5 + time * 2.0).sin() + 1.0) / 2.0 * 15.0;
                s.quadratic_curve_to(
                    t.angle.cos() * (c.radius + sway),
                    t.angle.sin() * (c.radius + sway),
                    (t.angle + 0.4).cos() * (t.length + reach),
                    (t.angle + 0.4).sin() * (t.length + reach),
                );
            }
        }
        ImmuneKind::TCell | ImmuneKind::BCell => s.arc(0.0, 0.0, c.radius, 0.0, TAU),
    }
    s.close_path();
    s.fill();
    s.restore();
}

pub fn virus(s: &mut impl Surface, v: &Virus) {
    s.save();
    s.translate(v.x, v.y);
    s.rotate(v.rotation);
    s.set_stroke(C_VIRUS_SPIKE.into());
    s.set_line_width(2.0);
    for spike in &v.spikes {
        let reach = v.radius + spike.length;
        s.begin_path();
        s.move_to(0.0, 0.0);
        s.line_to(spike.angle.cos() * reach, spike.angle.sin() * reach);
        s.stroke();
    }
    s.set_fill(C_VIRUS_BODY.into());
    s.fill_circle(0.0, 0.0, v.radius);
    s.restore();
}

pub fn antibody(s: &mut impl Surface, a: &Antibody) {
    s.set_fill(C_ANTIBODY.with_alpha(a.life as f32 / 100.0).into());
    s.fill_circle(a.x, a.y, a.radius);
}
