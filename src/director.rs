/// Scene Director: owns the one live scene, rebuilds it on demand and runs
/// the fade-out / swap / fade-in transition between scenes.

use log::{debug, info};
use rand::Rng;

use crate::entities::{FrameContext, Scene, SceneKind, Viewport};
use crate::surface::Surface;
use crate::{bacteria, immune, space};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    FadingOut,
    FadingIn,
}

/// Fade progress counted in whole frames so both ends are hit exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    phase: Phase,
    tick: u32,
    frames: u32,
}

impl Transition {
    fn new(frames: u32) -> Self {
        Transition {
            phase: Phase::FadingOut,
            tick: 0,
            frames: frames.max(1),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Overlay opacity in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.tick as f32 / self.frames as f32
    }
}

/// Freshly populated scene of the given kind.
pub fn populate(kind: SceneKind, viewport: &Viewport, rng: &mut impl Rng) -> Scene {
    match kind {
        SceneKind::Bacteria => Scene::Bacteria(bacteria::populate(viewport, rng)),
        SceneKind::Space => Scene::Space(space::populate(viewport, rng)),
        SceneKind::Immune => Scene::Immune(immune::populate(viewport, rng)),
    }
}

#[derive(Clone, Debug)]
pub struct Director {
    viewport: Viewport,
    scene: Scene,
    transition: Option<Transition>,
    transition_frames: u32,
}

impl Director {
    /// Start on the first scene of the rotation.
    pub fn new(viewport: Viewport, transition_frames: u32, rng: &mut impl Rng) -> Self {
        Self::starting_at(SceneKind::Bacteria, viewport, transition_frames, rng)
    }

    pub fn starting_at(
        kind: SceneKind,
        viewport: Viewport,
        transition_frames: u32,
        rng: &mut impl Rng,
    ) -> Self {
        Director {
            scene: populate(kind, &viewport, rng),
            viewport,
            transition: None,
            transition_frames: transition_frames.max(1),
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Begin fading toward the next scene.  Returns `false` (and does
    /// nothing) if a transition is already running.
    pub fn request_switch(&mut self) -> bool {
        if self.transition.is_some() {
            return false;
        }
        self.transition = Some(Transition::new(self.transition_frames));
        debug!("fading out of {}", self.kind());
        true
    }

    /// Advance the transition by one frame and return the overlay alpha to
    /// composite, or `None` when idle.  Reaching full opacity swaps in the
    /// next scene; reaching zero ends the transition.
    pub fn advance_transition(&mut self, rng: &mut impl Rng) -> Option<f32> {
        let mut t = self.transition?;
        let mut swap = false;
        match t.phase {
            Phase::FadingOut => {
                t.tick = (t.tick + 1).min(t.frames);
                if t.tick == t.frames {
                    t.phase = Phase::FadingIn;
                    swap = true;
                }
            }
            Phase::FadingIn => {
                t.tick = t.tick.saturating_sub(1);
            }
        }
        let alpha = t.alpha();
        self.transition = if t.phase == Phase::FadingIn && t.tick == 0 {
            debug!("transition into {} complete", self.kind());
            None
        } else {
            Some(t)
        };

        if swap {
            let next = self.kind().next();
            self.scene = populate(next, &self.viewport, rng);
            info!("switched to {next} scene");
        }
        Some(alpha)
    }

    /// Clear and repopulate the current scene from scratch.
    pub fn reinitialize(&mut self, rng: &mut impl Rng) {
        self.scene = populate(self.kind(), &self.viewport, rng);
    }

    /// Adopt a new viewport: any running transition is cancelled and the
    /// current scene is rebuilt immediately.
    pub fn resize(&mut self, viewport: Viewport, rng: &mut impl Rng) {
        self.viewport = viewport;
        self.transition = None;
        self.reinitialize(rng);
        info!(
            "viewport resized to {:.0}x{:.0}; {} scene rebuilt",
            viewport.width,
            viewport.height,
            self.kind()
        );
    }

    /// Scene-specific click action: food, a black hole or a virus.  Ignored
    /// while transitioning.  Returns whether anything was spawned.
    pub fn click(&mut self, x: f32, y: f32, rng: &mut impl Rng) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let (x, y) = self.viewport.clamp(x, y);
        match &mut self.scene {
            Scene::Bacteria(scene) => {
                bacteria::drop_food(scene, x, y);
                true
            }
            Scene::Space(scene) => space::open_black_hole(scene, x, y),
            Scene::Immune(scene) => immune::infect(scene, x, y, rng),
        }
    }

    /// Update and draw every live entity of the active scene.
    pub fn step<S: Surface>(&mut self, ctx: &FrameContext, rng: &mut impl Rng, surface: &mut S) {
        match &mut self.scene {
            Scene::Bacteria(scene) => bacteria::step(scene, ctx, rng, surface),
            Scene::Space(scene) => space::step(scene, ctx, rng, surface),
            Scene::Immune(scene) => immune::step(scene, ctx, rng, surface),
        }
    }
}

impl Scene {
    /// Live entity counts by label, for status displays.
    pub fn census(&self) -> Vec<(&'static str, usize)> {
        match self {
            Scene::Bacteria(b) => vec![("microbes", b.microbes.len()), ("food", b.food.len())],
            Scene::Space(s) => vec![
                ("stars", s.stars.len()),
                ("bodies", s.bodies.len()),
                ("rocket", usize::from(s.rocket.is_some())),
                ("black hole", usize::from(s.black_hole.is_some())),
            ],
            Scene::Immune(i) => vec![
                ("red cells", i.red_cells.len()),
                ("defenders", i.cells.len()),
                ("viruses", i.viruses.len()),
                ("antibodies", i.antibodies.len()),
            ],
        }
    }
}
