/// Space scene: a moon orbiting the earth, a rocket chasing the pointer and,
/// once the user clicks, a black hole that swallows all of them.

use std::f32::consts::TAU;

use log::{debug, info};
use rand::Rng;

use crate::compute::{bounce, direction, distance, jitter, spread};
use crate::draw;
use crate::entities::{
    BlackHole, BodyKind, CelestialBody, FrameContext, Pointer, Rocket, SpaceScene, Star, Viewport,
};
use crate::surface::{Color, Surface};

pub const STAR_COUNT: usize = 250;

pub const EARTH_RADIUS: f32 = 50.0;
pub const MOON_RADIUS: f32 = 15.0;
/// Orbit radius as a multiple of the orbiting body's radius.
const ORBIT_FACTOR: f32 = 8.0;
pub const ORBIT_SPEED: f32 = 0.002;

pub const BLACK_HOLE_RADIUS: f32 = 15.0;
const EVENT_HORIZON_FACTOR: f32 = 2.5;
/// Bodies closer than this many event horizons start to shrink.
pub const SHRINK_ZONE: f32 = 2.0;
const BLACK_HOLE_SPIN: f32 = 0.005;

const BODY_PULL: f32 = 1500.0;
const ROCKET_PULL: f32 = 1000.0;
const BODY_SHRINK: f32 = 0.95;
const ROCKET_SHRINK: f32 = 0.97;
pub const MIN_BODY_RADIUS: f32 = 1.0;
pub const MIN_ROCKET_SIZE: f32 = 1.0;

pub const ROCKET_SIZE: f32 = 15.0;
const ROCKET_THRUST: f32 = 0.05;
const ROCKET_DAMPING: f32 = 0.98;
const FLAME_PER_SPEED: f32 = 4.0;
/// Below this speed the rocket keeps its last heading.
const HEADING_MIN_SPEED: f32 = 0.01;

const TWINKLE: f32 = 0.1;
const STAR_MIN_ALPHA: f32 = 0.3;

// ── Construction ──────────────────────────────────────────────────────────────

pub fn populate(viewport: &Viewport, rng: &mut impl Rng) -> SpaceScene {
    let stars = (0..STAR_COUNT)
        .map(|_| Star {
            x: rng.gen::<f32>() * viewport.width,
            y: rng.gen::<f32>() * viewport.height,
            radius: rng.gen::<f32>() * 1.5,
            alpha: spread(rng, 0.5, 0.5),
        })
        .collect();

    let (earth_x, earth_y) = (viewport.width * 0.15, viewport.height * 0.3);
    let earth = CelestialBody {
        x: earth_x,
        y: earth_y,
        radius: EARTH_RADIUS,
        kind: BodyKind::Earth,
        shade: Color::hex(0x3d4d9b),
        highlight: Color::hex(0x82a2f5),
        orbit_radius: EARTH_RADIUS * ORBIT_FACTOR,
        orbit_angle: rng.gen::<f32>() * TAU,
    };
    let mut moon = CelestialBody {
        x: earth_x,
        y: earth_y,
        radius: MOON_RADIUS,
        kind: BodyKind::Moon,
        shade: Color::hex(0xb0b0b0),
        highlight: Color::hex(0xe0e0e0),
        orbit_radius: MOON_RADIUS * ORBIT_FACTOR,
        orbit_angle: rng.gen::<f32>() * TAU,
    };
    moon.place_on_orbit((earth_x, earth_y), viewport);

    let (cx, cy) = viewport.center();
    SpaceScene {
        stars,
        bodies: vec![earth, moon],
        rocket: Some(Rocket {
            x: cx,
            y: cy,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            size: ROCKET_SIZE,
            flame: 0.0,
        }),
        black_hole: None,
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Open a black hole at `(x, y)`.  Only one may exist per scene lifetime;
/// later calls return `false` and change nothing.
pub fn open_black_hole(scene: &mut SpaceScene, x: f32, y: f32) -> bool {
    if scene.black_hole.is_some() {
        return false;
    }
    scene.black_hole = Some(BlackHole {
        x,
        y,
        radius: BLACK_HOLE_RADIUS,
        event_horizon: BLACK_HOLE_RADIUS * EVENT_HORIZON_FACTOR,
        rotation: 0.0,
    });
    info!("black hole opened at ({x:.0}, {y:.0})");
    true
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

impl Star {
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.alpha = (self.alpha + jitter(rng, TWINKLE)).clamp(STAR_MIN_ALPHA, 1.0);
    }
}

impl BlackHole {
    /// Distance under which bodies shrink.
    pub fn shrink_range(&self) -> f32 {
        self.event_horizon * SHRINK_ZONE
    }
}

impl CelestialBody {
    fn place_on_orbit(&mut self, (cx, cy): (f32, f32), viewport: &Viewport) {
        let (x, y) = viewport.clamp(
            cx + self.orbit_angle.cos() * self.orbit_radius,
            cy + self.orbit_angle.sin() * self.orbit_radius,
        );
        self.x = x;
        self.y = y;
    }

    /// Fall into the black hole if there is one (shrinking near it);
    /// otherwise a moon keeps orbiting `earth`.
    pub fn update(
        &mut self,
        earth: Option<(f32, f32)>,
        black_hole: Option<&BlackHole>,
        viewport: &Viewport,
    ) {
        if let Some(hole) = black_hole {
            if let Some((ux, uy, dist)) = direction(hole.x - self.x, hole.y - self.y) {
                // Never step past the centre.
                let step = (BODY_PULL / (dist * dist)).min(dist);
                self.x += ux * step;
                self.y += uy * step;
            }
            if distance((self.x, self.y), (hole.x, hole.y)) < hole.shrink_range() {
                self.radius *= BODY_SHRINK;
            }
            let (x, y) = viewport.clamp(self.x, self.y);
            self.x = x;
            self.y = y;
        } else if self.kind == BodyKind::Moon {
            if let Some(centre) = earth {
                self.orbit_angle += ORBIT_SPEED;
                self.place_on_orbit(centre, viewport);
            }
        }
    }
}

impl Rocket {
    /// Thrust toward the pointer, or get dragged into the black hole.
    pub fn update(&mut self, pointer: &Pointer, black_hole: Option<&BlackHole>, viewport: &Viewport) {
        if let Some(hole) = black_hole {
            if let Some((ux, uy, dist)) = direction(hole.x - self.x, hole.y - self.y) {
                let pull = (ROCKET_PULL / (dist * dist)).min(dist);
                self.vx += ux * pull;
                self.vy += uy * pull;
            }
            if distance((self.x, self.y), (hole.x, hole.y)) < hole.shrink_range() {
                self.size *= ROCKET_SHRINK;
            }
        } else if let Some((ux, uy, _)) = direction(pointer.x - self.x, pointer.y - self.y) {
            self.vx += ux * ROCKET_THRUST;
            self.vy += uy * ROCKET_THRUST;
        }

        self.vx *= ROCKET_DAMPING;
        self.vy *= ROCKET_DAMPING;
        self.x += self.vx;
        self.y += self.vy;

        let speed = self.vx.hypot(self.vy);
        self.flame = speed * FLAME_PER_SPEED;
        if speed > HEADING_MIN_SPEED {
            self.angle = self.vy.atan2(self.vx);
        }

        bounce(&mut self.x, &mut self.y, &mut self.vx, &mut self.vy, self.size, viewport);
    }
}

// ── Frame pass ────────────────────────────────────────────────────────────────

pub fn step<S: Surface>(
    scene: &mut SpaceScene,
    ctx: &FrameContext,
    rng: &mut impl Rng,
    surface: &mut S,
) {
    let SpaceScene {
        stars,
        bodies,
        rocket,
        black_hole,
    } = scene;

    for star in stars.iter_mut() {
        star.update(rng);
        draw::star(surface, star);
    }

    let earth = bodies
        .iter()
        .find(|b| b.kind == BodyKind::Earth)
        .map(|b| (b.x, b.y));
    for body in bodies.iter_mut() {
        body.update(earth, black_hole.as_ref(), &ctx.viewport);
        draw::celestial_body(surface, body);
    }
    bodies.retain(|b| {
        let alive = b.radius >= MIN_BODY_RADIUS;
        if !alive {
            debug!("{:?} swallowed", b.kind);
        }
        alive
    });

    if let Some(hole) = black_hole.as_mut() {
        hole.rotation += BLACK_HOLE_SPIN;
        draw::black_hole(surface, hole);
    }

    if let Some(ship) = rocket.as_mut() {
        ship.update(&ctx.pointer, black_hole.as_ref(), &ctx.viewport);
        draw::rocket(surface, ship, ctx.frame);
    }
    if rocket.as_ref().is_some_and(|r| r.size < MIN_ROCKET_SIZE) {
        *rocket = None;
        debug!("rocket swallowed");
    }
}
