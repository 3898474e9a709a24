/// Bacteria scene: microbes flee the pointer, forage for food dropped by
/// clicks, and a new "fed" microbe appears wherever food is eaten.

use std::f32::consts::TAU;
use std::mem;

use log::debug;
use rand::Rng;

use crate::compute::{bounce, direction, jitter, nearest, overlaps, spread, without_indices};
use crate::draw;
use crate::entities::{
    BacteriaScene, Food, FrameContext, Microbe, MicrobeShape, Pointer, Viewport,
};
use crate::surface::{Color, Surface};

pub const MICROBE_COUNT: usize = 150;
pub const PALETTE: [Color; 5] = [
    Color::hex(0xf2d7d5),
    Color::hex(0xd4efdf),
    Color::hex(0xd6eaf8),
    Color::hex(0xfdebd0),
    Color::hex(0xe8daef),
];
pub const FED_COLOR: Color = Color::hex(0x76ba46);

pub const FOOD_RADIUS: f32 = 15.0;
/// Five seconds at 60 FPS.
pub const FOOD_MAX_LIFE: u32 = 300;
pub const TINT_STEP: f32 = 0.05;
pub const TINT_MAX: f32 = 0.4;

const FOOD_PULL: f32 = 0.08;
/// Closer than this to its food a microbe stops steering.
const FOOD_ARRIVED: f32 = 1.0;
const FLEE_STRENGTH: f32 = 2.5;
const JITTER: f32 = 0.05;
const DAMPING: f32 = 0.96;
const WIGGLE_RATE: f32 = 0.08;
const INITIAL_SPEED: f32 = 0.5;
const WORM_SEGMENTS: u32 = 10;

// ── Construction ──────────────────────────────────────────────────────────────

pub fn populate(viewport: &Viewport, rng: &mut impl Rng) -> BacteriaScene {
    let microbes = (0..MICROBE_COUNT)
        .map(|_| {
            let x = rng.gen::<f32>() * viewport.width;
            let y = rng.gen::<f32>() * viewport.height;
            let color = PALETTE[rng.gen_range(0..PALETTE.len())];
            spawn_microbe(x, y, color, false, rng)
        })
        .collect();
    BacteriaScene {
        microbes,
        food: Vec::new(),
        green_tint: 0.0,
    }
}

/// A microbe of random shape and size at `(x, y)`.
pub fn spawn_microbe(x: f32, y: f32, color: Color, fed: bool, rng: &mut impl Rng) -> Microbe {
    let (shape, radius) = match rng.gen_range(0..4) {
        0 => (MicrobeShape::Circle, spread(rng, 3.0, 6.0)),
        1 => {
            let radius = spread(rng, 2.0, 3.0);
            (MicrobeShape::Rod { length: spread(rng, 10.0, 20.0) }, radius)
        }
        2 => (MicrobeShape::Worm { segments: WORM_SEGMENTS }, spread(rng, 1.0, 2.0)),
        _ => (MicrobeShape::Blob, spread(rng, 3.0, 6.0)),
    };
    Microbe {
        x,
        y,
        vx: jitter(rng, INITIAL_SPEED),
        vy: jitter(rng, INITIAL_SPEED),
        radius,
        angle: rng.gen::<f32>() * TAU,
        wiggle: 0.0,
        shape,
        color,
        fed,
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Drop a food particle at `(x, y)` and nudge the background greener.
pub fn drop_food(scene: &mut BacteriaScene, x: f32, y: f32) {
    scene.food.push(Food {
        x,
        y,
        radius: FOOD_RADIUS,
        life: FOOD_MAX_LIFE,
        max_life: FOOD_MAX_LIFE,
    });
    scene.green_tint = (scene.green_tint + TINT_STEP).min(TINT_MAX);
    debug!("food dropped at ({x:.0}, {y:.0}); tint {:.2}", scene.green_tint);
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

impl Microbe {
    /// Steer toward the nearest food if there is any, otherwise away from a
    /// nearby pointer; then jitter, damp, move and bounce off the walls.
    pub fn update(
        &mut self,
        pointer: &Pointer,
        food: &[Food],
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) {
        if let Some((i, _)) = nearest(food, self.x, self.y) {
            let target = &food[i];
            if let Some((ux, uy, dist)) = direction(target.x - self.x, target.y - self.y) {
                if dist > FOOD_ARRIVED {
                    self.vx += ux * FOOD_PULL;
                    self.vy += uy * FOOD_PULL;
                }
            }
        } else if let Some((ux, uy, dist)) = direction(pointer.x - self.x, pointer.y - self.y) {
            if dist < pointer.radius {
                let force = (pointer.radius - dist) / pointer.radius;
                self.vx -= ux * force * FLEE_STRENGTH;
                self.vy -= uy * force * FLEE_STRENGTH;
            }
        }

        self.angle += jitter(rng, JITTER);
        self.vx += jitter(rng, JITTER);
        self.vy += jitter(rng, JITTER);
        self.vx *= DAMPING;
        self.vy *= DAMPING;
        self.x += self.vx;
        self.y += self.vy;
        self.wiggle += WIGGLE_RATE;

        bounce(&mut self.x, &mut self.y, &mut self.vx, &mut self.vy, self.radius, viewport);
    }
}

/// Let microbes eat: each food particle touched by at least one microbe is
/// removed and replaced by one fed microbe at its position.  The first
/// touching microbe in population order claims it.  Returns how many
/// particles were eaten.
pub fn resolve_feeding(scene: &mut BacteriaScene, rng: &mut impl Rng) -> usize {
    let mut eaten: Vec<usize> = Vec::new();
    let mut newborn: Vec<Microbe> = Vec::new();

    for (fi, food) in scene.food.iter().enumerate() {
        if scene.microbes.iter().any(|m| overlaps(m, food)) {
            eaten.push(fi);
            newborn.push(spawn_microbe(food.x, food.y, FED_COLOR, true, rng));
        }
    }

    if !eaten.is_empty() {
        debug!("{} food particle(s) eaten", eaten.len());
    }
    scene.microbes.extend(newborn);
    scene.food = without_indices(mem::take(&mut scene.food), &eaten);
    eaten.len()
}

/// Count every food particle down by one frame, dropping expired ones.
pub fn age_food(scene: &mut BacteriaScene) {
    for food in &mut scene.food {
        food.life = food.life.saturating_sub(1);
    }
    scene.food.retain(|f| f.life > 0);
}

// ── Frame pass ────────────────────────────────────────────────────────────────

pub fn step<S: Surface>(
    scene: &mut BacteriaScene,
    ctx: &FrameContext,
    rng: &mut impl Rng,
    surface: &mut S,
) {
    resolve_feeding(scene, rng);
    age_food(scene);
    for food in &scene.food {
        draw::food(surface, food);
    }

    let BacteriaScene { microbes, food, .. } = scene;
    for microbe in microbes.iter_mut() {
        microbe.update(&ctx.pointer, food, &ctx.viewport, rng);
        draw::microbe(surface, microbe);
    }
}
