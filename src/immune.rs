/// Immune scene: red blood cells drift past while t-cells, b-cells and
/// macrophages hunt the viruses the user injects.  Contact between a cell
/// and a virus is a coin flip that either neutralises the virus or turns the
/// cell into a new virus.

use std::f32::consts::TAU;
use std::mem;

use log::{debug, info};
use rand::Rng;

use crate::compute::{
    bounce, direction, jitter, nearest, overlaps, spread, without_indices, wrap,
};
use crate::draw;
use crate::entities::{
    Antibody, FrameContext, ImmuneCell, ImmuneKind, ImmuneScene, Pointer, RedBloodCell, Spike,
    Tentacle, Viewport, Virus,
};
use crate::surface::{Color, Surface};

pub const RED_CELL_COUNT: usize = 40;
pub const T_CELL_COUNT: usize = 30;
pub const B_CELL_COUNT: usize = 15;
pub const MACROPHAGE_COUNT: usize = 5;

pub const VIRUS_RADIUS: f32 = 12.0;
pub const SICKNESS_STEP: f32 = 0.08;
pub const SICKNESS_MAX: f32 = 0.8;
/// Chance that the cell wins a contact.
pub const CELL_WIN_CHANCE: f64 = 0.5;

pub const FIRE_COOLDOWN: u32 = 30;
pub const ANTIBODY_LIFE: u32 = 100;
const ANTIBODY_SPEED: f32 = 5.0;
const ANTIBODY_RADIUS: f32 = 2.0;

/// Latch when this much closer than the cell's own radius to a virus.
const LATCH_MARGIN: f32 = 5.0;
const LATCH_DAMPING: f32 = 0.8;
/// Fraction of the gap a latched cell closes each frame.
const LATCH_PULL: f32 = 0.2;
const PURSUIT_FORCE: f32 = 0.3;
const JITTER: f32 = 0.05;
const DAMPING: f32 = 0.98;

const VIRUS_DAMPING: f32 = 0.99;
const VIRUS_SPIN: f32 = 0.01;
const VIRUS_SPIKES: usize = 12;
const MACROPHAGE_TENTACLES: usize = 8;

// ── Construction ──────────────────────────────────────────────────────────────

pub fn populate(viewport: &Viewport, rng: &mut impl Rng) -> ImmuneScene {
    let red_cells = (0..RED_CELL_COUNT)
        .map(|_| RedBloodCell {
            x: rng.gen::<f32>() * viewport.width,
            y: rng.gen::<f32>() * viewport.height,
            radius: spread(rng, 10.0, 8.0),
            // Mostly rightward flow.
            vx: (rng.gen::<f32>() - 0.2) * 0.5,
            vy: jitter(rng, 0.2),
        })
        .collect();

    let roster = [
        (T_CELL_COUNT, CellRole::T),
        (B_CELL_COUNT, CellRole::B),
        (MACROPHAGE_COUNT, CellRole::Macrophage),
    ];
    let mut cells = Vec::with_capacity(T_CELL_COUNT + B_CELL_COUNT + MACROPHAGE_COUNT);
    for (count, role) in roster {
        for _ in 0..count {
            let x = rng.gen::<f32>() * viewport.width;
            let y = rng.gen::<f32>() * viewport.height;
            cells.push(spawn_cell(role, x, y, rng));
        }
    }

    ImmuneScene {
        red_cells,
        cells,
        viruses: Vec::new(),
        antibodies: Vec::new(),
        sickness: 0.0,
        game_over: false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellRole {
    T,
    B,
    Macrophage,
}

pub fn spawn_cell(role: CellRole, x: f32, y: f32, rng: &mut impl Rng) -> ImmuneCell {
    let (kind, radius, color) = match role {
        CellRole::T => (ImmuneKind::TCell, spread(rng, 5.0, 8.0), Color::hex(0xffb3b3)),
        CellRole::B => (ImmuneKind::BCell, spread(rng, 10.0, 6.0), Color::hex(0xffcccc)),
        CellRole::Macrophage => {
            let radius = spread(rng, 15.0, 10.0);
            let tentacles = (0..MACROPHAGE_TENTACLES)
                .map(|i| Tentacle {
                    angle: TAU / MACROPHAGE_TENTACLES as f32 * i as f32,
                    length: radius * spread(rng, 1.5, 0.5),
                })
                .collect();
            (ImmuneKind::Macrophage { tentacles }, radius, Color::hex(0xffcedd))
        }
    };
    ImmuneCell {
        x,
        y,
        vx: jitter(rng, 2.0),
        vy: jitter(rng, 2.0),
        radius,
        kind,
        color,
        angle: 0.0,
        spin: jitter(rng, 0.01),
        latched: false,
        fire_cooldown: 0,
    }
}

pub fn spawn_virus(x: f32, y: f32, rng: &mut impl Rng) -> Virus {
    let spikes = (0..VIRUS_SPIKES)
        .map(|i| Spike {
            angle: i as f32 / VIRUS_SPIKES as f32 * TAU,
            length: spread(rng, 4.0, 4.0),
        })
        .collect();
    Virus {
        x,
        y,
        vx: jitter(rng, 0.5),
        vy: jitter(rng, 0.5),
        radius: VIRUS_RADIUS,
        rotation: 0.0,
        spikes,
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Inject a virus at `(x, y)` and darken the background.  Refused once the
/// scene is lost.
pub fn infect(scene: &mut ImmuneScene, x: f32, y: f32, rng: &mut impl Rng) -> bool {
    if scene.game_over {
        return false;
    }
    scene.viruses.push(spawn_virus(x, y, rng));
    scene.sickness = (scene.sickness + SICKNESS_STEP).min(SICKNESS_MAX);
    debug!("virus injected at ({x:.0}, {y:.0}); sickness {:.2}", scene.sickness);
    true
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

impl RedBloodCell {
    /// Drift with the flow, re-entering from the opposite edge.
    pub fn update(&mut self, viewport: &Viewport) {
        self.x = wrap(self.x + self.vx, viewport.width);
        self.y = wrap(self.y + self.vy, viewport.height);
    }
}

impl Virus {
    pub fn update(&mut self, viewport: &Viewport) {
        self.x += self.vx;
        self.y += self.vy;
        self.rotation += VIRUS_SPIN;
        self.vx *= VIRUS_DAMPING;
        self.vy *= VIRUS_DAMPING;
        bounce(&mut self.x, &mut self.y, &mut self.vx, &mut self.vy, self.radius, viewport);
    }
}

impl Antibody {
    /// A projectile leaving `from` toward `to`.  A zero-length aim fires
    /// along +x.
    pub fn aimed(from: (f32, f32), to: (f32, f32)) -> Self {
        let (ux, uy) = direction(to.0 - from.0, to.1 - from.1)
            .map_or((1.0, 0.0), |(ux, uy, _)| (ux, uy));
        Antibody {
            x: from.0,
            y: from.1,
            vx: ux * ANTIBODY_SPEED,
            vy: uy * ANTIBODY_SPEED,
            radius: ANTIBODY_RADIUS,
            life: ANTIBODY_LIFE,
        }
    }

    pub fn update(&mut self, viewport: &Viewport) {
        self.x += self.vx;
        self.y += self.vy;
        self.life = self.life.saturating_sub(1);
        bounce(&mut self.x, &mut self.y, &mut self.vx, &mut self.vy, self.radius, viewport);
    }
}

impl ImmuneCell {
    pub fn can_latch(&self) -> bool {
        !matches!(self.kind, ImmuneKind::BCell)
    }

    /// Hunt the nearest virus, or drift toward the pointer when there is
    /// none.  Returns the antibody a b-cell fired this frame, if any; only a
    /// virus draws fire.
    pub fn update(
        &mut self,
        pointer: &Pointer,
        viruses: &[Virus],
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) -> Option<Antibody> {
        let (tx, ty, is_virus) = match nearest(viruses, self.x, self.y) {
            Some((i, _)) => (viruses[i].x, viruses[i].y, true),
            None => (pointer.x, pointer.y, false),
        };
        let (dx, dy) = (tx - self.x, ty - self.y);
        let dist = dx.hypot(dy);

        if self.can_latch() && is_virus && dist < self.radius + LATCH_MARGIN {
            self.latched = true;
        }

        let mut fired = None;
        if self.latched {
            if !is_virus || dist > pointer.radius {
                self.latched = false;
            }
            self.vx *= LATCH_DAMPING;
            self.vy *= LATCH_DAMPING;
            self.x += dx * LATCH_PULL;
            self.y += dy * LATCH_PULL;
        } else {
            let reach = pointer.radius * 2.0;
            if let Some((ux, uy, d)) = direction(dx, dy) {
                if d < reach {
                    let force = (reach - d) / reach;
                    self.vx += ux * force * PURSUIT_FORCE;
                    self.vy += uy * force * PURSUIT_FORCE;
                }
            }
            let in_range = dist < pointer.radius * 3.0;
            if !self.can_latch() && is_virus && in_range && self.fire_cooldown == 0 {
                fired = Some(Antibody::aimed((self.x, self.y), (tx, ty)));
                self.fire_cooldown = FIRE_COOLDOWN;
            }
            self.vx += jitter(rng, JITTER);
            self.vy += jitter(rng, JITTER);
        }

        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.angle += self.spin;
        self.vx *= DAMPING;
        self.vy *= DAMPING;
        self.x += self.vx;
        self.y += self.vy;
        bounce(&mut self.x, &mut self.y, &mut self.vx, &mut self.vy, self.radius, viewport);

        fired
    }
}

// ── Combat ────────────────────────────────────────────────────────────────────

/// What one combat pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Skirmish {
    pub viruses_neutralized: usize,
    pub cells_lost: usize,
}

/// Resolve every cell/virus contact for this frame.
///
/// Each cell fights at most its first touching virus still standing.  A win
/// marks the virus; a loss marks the cell and records its position.  Nothing
/// is removed or spawned until the scan is complete, so results don't depend
/// on which pairs were visited first.
pub fn resolve_combat(scene: &mut ImmuneScene, rng: &mut impl Rng) -> Skirmish {
    if scene.viruses.is_empty() || scene.cells.is_empty() {
        return Skirmish::default();
    }

    let mut dead_viruses: Vec<usize> = Vec::new();
    let mut dead_cells: Vec<usize> = Vec::new();
    let mut breaches: Vec<(f32, f32)> = Vec::new();

    for (ci, cell) in scene.cells.iter().enumerate() {
        for (vi, virus) in scene.viruses.iter().enumerate() {
            if dead_viruses.contains(&vi) || !overlaps(cell, virus) {
                continue;
            }
            if rng.gen_bool(CELL_WIN_CHANCE) {
                dead_viruses.push(vi);
            } else {
                dead_cells.push(ci);
                breaches.push((cell.x, cell.y));
            }
            break;
        }
    }

    let outcome = Skirmish {
        viruses_neutralized: dead_viruses.len(),
        cells_lost: dead_cells.len(),
    };

    scene.viruses = without_indices(mem::take(&mut scene.viruses), &dead_viruses);
    scene.cells = without_indices(mem::take(&mut scene.cells), &dead_cells);
    for (x, y) in breaches {
        scene.viruses.push(spawn_virus(x, y, rng));
    }

    if outcome != Skirmish::default() {
        debug!(
            "combat: {} virus(es) neutralized, {} cell(s) infected",
            outcome.viruses_neutralized, outcome.cells_lost
        );
    }
    outcome
}

/// Latch the game-over state when no defenders remain against live viruses.
pub fn check_game_over(scene: &mut ImmuneScene) -> bool {
    if !scene.game_over && scene.cells.is_empty() && !scene.viruses.is_empty() {
        scene.game_over = true;
        info!("immune system overwhelmed by {} virus(es)", scene.viruses.len());
    }
    scene.game_over
}

// ── Frame pass ────────────────────────────────────────────────────────────────

pub fn step<S: Surface>(
    scene: &mut ImmuneScene,
    ctx: &FrameContext,
    rng: &mut impl Rng,
    surface: &mut S,
) {
    resolve_combat(scene, rng);
    check_game_over(scene);

    let ImmuneScene {
        red_cells,
        cells,
        viruses,
        antibodies,
        game_over,
        ..
    } = scene;

    for red in red_cells.iter_mut() {
        red.update(&ctx.viewport);
        draw::red_blood_cell(surface, red);
    }
    for virus in viruses.iter_mut() {
        virus.update(&ctx.viewport);
        draw::virus(surface, virus);
    }
    for cell in cells.iter_mut() {
        if let Some(antibody) = cell.update(&ctx.pointer, viruses, &ctx.viewport, rng) {
            antibodies.push(antibody);
        }
        draw::immune_cell(surface, cell, ctx.frame);
    }

    for antibody in antibodies.iter_mut() {
        antibody.update(&ctx.viewport);
    }
    antibodies.retain(|a| a.life > 0);
    for antibody in antibodies.iter() {
        draw::antibody(surface, antibody);
    }

    if *game_over {
        draw::game_over_tint(surface, &ctx.viewport);
    }
}
