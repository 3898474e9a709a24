use microcosm::entities::*;
use microcosm::immune::*;
use microcosm::surface::NullSurface;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn viewport() -> Viewport {
    Viewport::new(1200.0, 900.0)
}

fn pointer() -> Pointer {
    Pointer { x: 600.0, y: 450.0, radius: 80.0 }
}

fn ctx(frame: u64) -> FrameContext {
    FrameContext { pointer: pointer(), viewport: viewport(), frame }
}

/// A still cell of `role` at `(x, y)`.
fn cell_at(role: CellRole, x: f32, y: f32, rng: &mut StdRng) -> ImmuneCell {
    let mut c = spawn_cell(role, x, y, rng);
    c.vx = 0.0;
    c.vy = 0.0;
    c
}

fn virus_at(x: f32, y: f32, rng: &mut StdRng) -> Virus {
    let mut v = spawn_virus(x, y, rng);
    v.vx = 0.0;
    v.vy = 0.0;
    v
}

// ── populate ──────────────────────────────────────────────────────────────────

#[test]
fn populate_counts() {
    let mut rng = seeded_rng();
    let scene = populate(&viewport(), &mut rng);
    assert_eq!(scene.red_cells.len(), RED_CELL_COUNT);
    assert_eq!(scene.cells.len(), T_CELL_COUNT + B_CELL_COUNT + MACROPHAGE_COUNT);
    assert!(scene.viruses.is_empty());
    assert!(scene.antibodies.is_empty());
    assert_eq!(scene.sickness, 0.0);
    assert!(!scene.game_over);

    let count = |pred: fn(&ImmuneKind) -> bool| scene.cells.iter().filter(|c| pred(&c.kind)).count();
    assert_eq!(count(|k| matches!(k, ImmuneKind::TCell)), T_CELL_COUNT);
    assert_eq!(count(|k| matches!(k, ImmuneKind::BCell)), B_CELL_COUNT);
    assert_eq!(count(|k| matches!(k, ImmuneKind::Macrophage { .. })), MACROPHAGE_COUNT);
}

#[test]
fn macrophages_grow_tentacles() {
    let mut rng = seeded_rng();
    let cell = spawn_cell(CellRole::Macrophage, 0.0, 0.0, &mut rng);
    match cell.kind {
        ImmuneKind::Macrophage { tentacles } => {
            assert_eq!(tentacles.len(), 8);
            assert!(tentacles.iter().all(|t| t.length > cell.radius));
        }
        other => panic!("expected a macrophage, got {other:?}"),
    }
}

// ── infect ────────────────────────────────────────────────────────────────────

#[test]
fn infect_adds_virus_and_sickness() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    assert!(infect(&mut scene, 300.0, 200.0, &mut rng));
    assert_eq!(scene.viruses.len(), 1);
    assert_eq!((scene.viruses[0].x, scene.viruses[0].y), (300.0, 200.0));
    assert_eq!(scene.viruses[0].radius, VIRUS_RADIUS);
    assert_eq!(scene.viruses[0].spikes.len(), 12);
    assert_relative_eq!(scene.sickness, SICKNESS_STEP);
}

#[test]
fn sickness_is_capped() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    for _ in 0..30 {
        infect(&mut scene, 10.0, 10.0, &mut rng);
    }
    assert_eq!(scene.sickness, SICKNESS_MAX);
}

#[test]
fn infect_refused_after_game_over() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene { game_over: true, ..ImmuneScene::default() };
    assert!(!infect(&mut scene, 10.0, 10.0, &mut rng));
    assert!(scene.viruses.is_empty());
}

// ── resolve_combat ────────────────────────────────────────────────────────────

#[test]
fn contact_resolves_exactly_one_way() {
    let (mut wins, mut losses) = (0, 0);
    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = ImmuneScene::default();
        scene.cells.push(cell_at(CellRole::T, 200.0, 200.0, &mut rng));
        scene.viruses.push(virus_at(200.0, 200.0, &mut rng));

        let outcome = resolve_combat(&mut scene, &mut rng);
        match (scene.cells.len(), scene.viruses.len()) {
            (1, 0) => {
                wins += 1;
                assert_eq!(outcome, Skirmish { viruses_neutralized: 1, cells_lost: 0 });
            }
            (0, 2) => {
                // The survivor plus the converted cell.
                losses += 1;
                assert_eq!(outcome, Skirmish { viruses_neutralized: 0, cells_lost: 1 });
            }
            other => panic!("seed {seed}: impossible outcome {other:?}"),
        }
    }
    assert!(wins > 0 && losses > 0, "wins {wins}, losses {losses}");
}

#[test]
fn lost_cell_becomes_virus_at_its_position() {
    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = ImmuneScene::default();
        scene.cells.push(cell_at(CellRole::T, 200.0, 205.0, &mut rng));
        scene.viruses.push(virus_at(200.0, 200.0, &mut rng));
        let outcome = resolve_combat(&mut scene, &mut rng);
        if outcome.cells_lost == 1 {
            // The first virus survives; the newcomer sits where the cell was.
            assert_eq!(scene.viruses.len(), 2);
            assert_eq!((scene.viruses[1].x, scene.viruses[1].y), (200.0, 205.0));
            return;
        }
    }
    panic!("no seed produced a lost cell");
}

#[test]
fn cell_fights_at_most_one_virus() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    scene.cells.push(cell_at(CellRole::Macrophage, 200.0, 200.0, &mut rng));
    scene.viruses.push(virus_at(195.0, 200.0, &mut rng));
    scene.viruses.push(virus_at(205.0, 200.0, &mut rng));

    let outcome = resolve_combat(&mut scene, &mut rng);
    assert_eq!(outcome.viruses_neutralized + outcome.cells_lost, 1);
}

#[test]
fn no_contact_no_combat() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    scene.cells.push(cell_at(CellRole::T, 100.0, 100.0, &mut rng));
    scene.viruses.push(virus_at(500.0, 500.0, &mut rng));
    assert_eq!(resolve_combat(&mut scene, &mut rng), Skirmish::default());
    assert_eq!(scene.cells.len(), 1);
    assert_eq!(scene.viruses.len(), 1);
}

#[test]
fn virus_is_neutralized_only_once() {
    // Two cells on one virus: the second cannot fight a virus the first
    // already killed.
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scene = ImmuneScene::default();
        scene.cells.push(cell_at(CellRole::T, 200.0, 200.0, &mut rng));
        scene.cells.push(cell_at(CellRole::T, 201.0, 200.0, &mut rng));
        scene.viruses.push(virus_at(200.0, 200.0, &mut rng));
        let outcome = resolve_combat(&mut scene, &mut rng);
        assert!(outcome.viruses_neutralized <= 1);
    }
}

// ── check_game_over ───────────────────────────────────────────────────────────

#[test]
fn game_over_when_defenders_gone_and_viruses_remain() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    scene.viruses.push(virus_at(10.0, 10.0, &mut rng));
    assert!(check_game_over(&mut scene));
}

#[test]
fn no_game_over_without_viruses() {
    let mut scene = ImmuneScene::default();
    assert!(!check_game_over(&mut scene));
}

#[test]
fn no_game_over_while_defenders_live() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    scene.cells.push(cell_at(CellRole::B, 500.0, 500.0, &mut rng));
    scene.viruses.push(virus_at(10.0, 10.0, &mut rng));
    assert!(!check_game_over(&mut scene));
}

#[test]
fn game_over_is_permanent() {
    let mut rng = seeded_rng();
    let mut scene = ImmuneScene::default();
    scene.viruses.push(virus_at(10.0, 10.0, &mut rng));
    check_game_over(&mut scene);
    scene.viruses.clear();
    assert!(check_game_over(&mut scene));
}

// ── ImmuneCell::update ────────────────────────────────────────────────────────

#[test]
fn b_cell_fires_then_cools_down() {
    let mut rng = seeded_rng();
    let mut cell = cell_at(CellRole::B, 100.0, 100.0, &mut rng);
    let viruses = vec![virus_at(150.0, 100.0, &mut rng)];

    let shot = cell.update(&pointer(), &viruses, &viewport(), &mut rng).unwrap();
    assert_relative_eq!(shot.vx, 5.0, epsilon = 1e-4);
    assert_relative_eq!(shot.vy, 0.0, epsilon = 1e-4);
    assert_eq!(shot.life, ANTIBODY_LIFE);
    assert_eq!(cell.fire_cooldown, FIRE_COOLDOWN - 1);

    assert!(cell.update(&pointer(), &viruses, &viewport(), &mut rng).is_none());
}

#[test]
fn b_cell_holds_fire_without_viruses() {
    let mut rng = seeded_rng();
    let mut cell = cell_at(CellRole::B, 600.0, 450.0, &mut rng);
    for _ in 0..120 {
        assert!(cell.update(&pointer(), &[], &viewport(), &mut rng).is_none());
    }
}

#[test]
fn idle_scene_has_no_antibodies() {
    let mut rng = seeded_rng();
    let mut scene = populate(&viewport(), &mut rng);
    for frame in 0..120 {
        step(&mut scene, &ctx(frame), &mut rng, &mut NullSurface);
    }
    assert!(scene.antibodies.is_empty());
}

#[test]
fn b_cell_never_latches() {
    let mut rng = seeded_rng();
    let mut cell = cell_at(CellRole::B, 100.0, 100.0, &mut rng);
    let viruses = vec![virus_at(101.0, 100.0, &mut rng)];
    cell.update(&pointer(), &viruses, &viewport(), &mut rng);
    assert!(!cell.latched);
}

#[test]
fn t_cell_latches_and_never_fires() {
    let mut rng = seeded_rng();
    let mut cell = cell_at(CellRole::T, 100.0, 100.0, &mut rng);
    let viruses = vec![virus_at(100.0 + cell.radius, 100.0, &mut rng)];
    let fired = cell.update(&pointer(), &viruses, &viewport(), &mut rng);
    assert!(fired.is_none());
    assert!(cell.latched);
    assert!(cell.x > 100.0);
}

#[test]
fn cells_drift_toward_pointer_without_viruses() {
    let mut rng = seeded_rng();
    let mut cell = cell_at(CellRole::T, 560.0, 450.0, &mut rng);
    for _ in 0..5 {
        cell.update(&pointer(), &[], &viewport(), &mut rng);
    }
    assert!(cell.vx > 0.0);
    assert!(!cell.latched);
}

// ── Antibody ──────────────────────────────────────────────────────────────────

#[test]
fn antibody_with_zero_aim_fires_along_x() {
    let a = Antibody::aimed((50.0, 50.0), (50.0, 50.0));
    assert_eq!((a.vx, a.vy), (5.0, 0.0));
}

#[test]
fn antibody_expires() {
    let mut a = Antibody::aimed((600.0, 450.0), (700.0, 450.0));
    for _ in 0..ANTIBODY_LIFE {
        a.update(&viewport());
    }
    assert_eq!(a.life, 0);
    assert!(viewport().contains(a.x, a.y));
}

// ── RedBloodCell ──────────────────────────────────────────────────────────────

#[test]
fn red_cells_wrap_around() {
    let mut c = RedBloodCell { x: 1199.0, y: 1.0, vx: 2.0, vy: -2.0, radius: 12.0 };
    c.update(&viewport());
    assert_relative_eq!(c.x, 1.0, epsilon = 1e-3);
    assert_relative_eq!(c.y, 899.0, epsilon = 1e-3);
}

// ── step ──────────────────────────────────────────────────────────────────────

#[test]
fn step_latches_game_over_and_keeps_running() {
    let mut rng = seeded_rng();
    let mut scene = populate(&viewport(), &mut rng);
    scene.cells.clear();
    infect(&mut scene, 300.0, 300.0, &mut rng);

    let mut surface = NullSurface;
    step(&mut scene, &ctx(0), &mut rng, &mut surface);
    assert!(scene.game_over);
    let before = scene.red_cells[0].x;
    step(&mut scene, &ctx(1), &mut rng, &mut surface);
    assert_ne!(scene.red_cells[0].x, before);
}

#[test]
fn everything_stays_in_bounds() {
    let mut rng = seeded_rng();
    let vp = viewport();
    let mut scene = populate(&vp, &mut rng);
    for i in 0..6 {
        infect(&mut scene, 200.0 * i as f32, 150.0 * i as f32, &mut rng);
    }
    let mut surface = NullSurface;
    for frame in 0..400 {
        step(&mut scene, &ctx(frame), &mut rng, &mut surface);
    }
    assert!(scene.red_cells.iter().all(|c| vp.contains(c.x, c.y)));
    assert!(scene.cells.iter().all(|c| vp.contains(c.x, c.y)));
    assert!(scene.viruses.iter().all(|v| vp.contains(v.x, v.y)));
    assert!(scene.antibodies.iter().all(|a| a.life > 0 && vp.contains(a.x, a.y)));
}
