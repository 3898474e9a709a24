/// All simulated entity types: pure data, no per-frame logic.
///
/// Behaviour lives in the scene modules (`bacteria`, `space`, `immune`);
/// drawing lives in `draw`.  Every positioned body implements [`Spatial`] so
/// nearest-neighbour lookups and bounds checks can be written once.

use std::fmt;

use crate::surface::Color;

// ── Scenes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Bacteria,
    Space,
    Immune,
}

impl SceneKind {
    /// Rotation order.
    pub const ALL: [SceneKind; 3] = [SceneKind::Bacteria, SceneKind::Space, SceneKind::Immune];

    pub fn index(self) -> usize {
        match self {
            SceneKind::Bacteria => 0,
            SceneKind::Space => 1,
            SceneKind::Immune => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// The scene that follows this one, wrapping after the last.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Bacteria => "bacteria",
            SceneKind::Space => "space",
            SceneKind::Immune => "immune",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Shared frame context ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Dimensions below one unit are raised to one.
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(1.0) } else { 1.0 };
        Viewport {
            width: sane(width),
            height: sane(height),
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

/// Cursor position plus the radius inside which it influences bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Read-only inputs every update pass sees for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub pointer: Pointer,
    pub viewport: Viewport,
    /// Frames simulated so far; drives purely visual animation.
    pub frame: u64,
}

/// Anything with a centre and a collision radius.
pub trait Spatial {
    fn position(&self) -> (f32, f32);
    fn radius(&self) -> f32;
}

macro_rules! spatial {
    ($($ty:ty => $radius:ident),* $(,)?) => {
        $(impl Spatial for $ty {
            fn position(&self) -> (f32, f32) {
                (self.x, self.y)
            }
            fn radius(&self) -> f32 {
                self.$radius
            }
        })*
    };
}

spatial! {
    Microbe => radius,
    Food => radius,
    Star => radius,
    CelestialBody => radius,
    Rocket => size,
    BlackHole => radius,
    RedBloodCell => radius,
    ImmuneCell => radius,
    Virus => radius,
    Antibody => radius,
}

// ── Bacteria scene ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum MicrobeShape {
    Circle,
    /// Capsule; `radius` is its half-thickness.
    Rod { length: f32 },
    /// Chain of `segments` circles riding a sine wave.
    Worm { segments: u32 },
    /// Circle with a wobbling rim.
    Blob,
}

#[derive(Clone, Debug)]
pub struct Microbe {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Heading used when drawing.
    pub angle: f32,
    /// Animation phase for worms and blobs.
    pub wiggle: f32,
    pub shape: MicrobeShape,
    pub color: Color,
    /// Spawned by eating food.
    pub fed: bool,
}

#[derive(Clone, Debug)]
pub struct Food {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Frames left before the particle expires.
    pub life: u32,
    pub max_life: u32,
}

#[derive(Clone, Debug, Default)]
pub struct BacteriaScene {
    pub microbes: Vec<Microbe>,
    pub food: Vec<Food>,
    /// Green background bias in `[0, TINT_MAX]`, raised by feeding clicks.
    pub green_tint: f32,
}

// ── Space scene ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Earth,
    Moon,
}

#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub kind: BodyKind,
    pub shade: Color,
    pub highlight: Color,
    pub orbit_radius: f32,
    pub orbit_angle: f32,
}

#[derive(Clone, Debug)]
pub struct Rocket {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Heading in radians.
    pub angle: f32,
    pub size: f32,
    /// Exhaust length, derived from speed every frame.
    pub flame: f32,
}

#[derive(Clone, Debug)]
pub struct BlackHole {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub event_horizon: f32,
    pub rotation: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SpaceScene {
    pub stars: Vec<Star>,
    pub bodies: Vec<CelestialBody>,
    pub rocket: Option<Rocket>,
    /// At most one per scene lifetime; never removed once created.
    pub black_hole: Option<BlackHole>,
}

// ── Immune scene ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct RedBloodCell {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tentacle {
    pub angle: f32,
    pub length: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImmuneKind {
    TCell,
    /// Ranged: fires antibodies, never latches.
    BCell,
    Macrophage { tentacles: Vec<Tentacle> },
}

#[derive(Clone, Debug)]
pub struct ImmuneCell {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub kind: ImmuneKind,
    pub color: Color,
    pub angle: f32,
    pub spin: f32,
    pub latched: bool,
    /// Frames until the next antibody may be fired.
    pub fire_cooldown: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spike {
    pub angle: f32,
    pub length: f32,
}

#[derive(Clone, Debug)]
pub struct Virus {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub rotation: f32,
    pub spikes: Vec<Spike>,
}

#[derive(Clone, Debug)]
pub struct Antibody {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub life: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ImmuneScene {
    pub red_cells: Vec<RedBloodCell>,
    pub cells: Vec<ImmuneCell>,
    pub viruses: Vec<Virus>,
    pub antibodies: Vec<Antibody>,
    /// Darkening bias in `[0, SICKNESS_MAX]`, raised by infection clicks.
    pub sickness: f32,
    /// Latched once every immune cell is gone while viruses remain.
    pub game_over: bool,
}

// ── Active scene ──────────────────────────────────────────────────────────────

/// The one live scene.  Switching replaces the whole value, so entities of
/// inactive scenes never exist.
#[derive(Clone, Debug)]
pub enum Scene {
    Bacteria(BacteriaScene),
    Space(SpaceScene),
    Immune(ImmuneScene),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Bacteria(_) => SceneKind::Bacteria,
            Scene::Space(_) => SceneKind::Space,
            Scene::Immune(_) => SceneKind::Immune,
        }
    }
}
