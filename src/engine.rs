/// Render/update loop driver.
///
/// The host queues [`Command`]s as input arrives and calls [`Engine::frame`]
/// once per display refresh.  Commands are drained in arrival order at the
/// top of each frame, so a test that pushes the same commands and seed sees
/// exactly the same simulation.

use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::director::Director;
use crate::draw;
use crate::entities::{FrameContext, Pointer, Viewport};
use crate::surface::Surface;

/// Scroll offset beyond which the simulation pauses.
pub const SCROLL_PAUSE_THRESHOLD: f32 = 50.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    PointerMoved { x: f32, y: f32 },
    /// Scene action at a point; ignored while paused or transitioning.
    Clicked { x: f32, y: f32 },
    Resized { width: f32, height: f32 },
    /// Page-style scroll; positive moves down.  Drives the pause flag.
    Scrolled(f32),
    SetPaused(bool),
    TogglePause,
    /// Explicit request to rotate to the next scene.
    SwitchScene,
}

pub struct Engine {
    director: Director,
    pointer: Pointer,
    rng: StdRng,
    queue: VecDeque<Command>,
    paused: bool,
    scroll: f32,
    /// Frames scheduled so far, paused or not.
    frame: u64,
    since_switch: u64,
    switch_interval: u64,
}

impl Engine {
    pub fn new(config: &Config, viewport: Viewport) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let director = Director::new(viewport, config.transition_frames, &mut rng);
        let (cx, cy) = viewport.center();
        Engine {
            director,
            pointer: Pointer {
                x: cx,
                y: cy,
                radius: config.pointer_radius,
            },
            rng,
            queue: VecDeque::new(),
            paused: false,
            scroll: 0.0,
            frame: 0,
            since_switch: 0,
            switch_interval: config.switch_interval_frames(),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut Director {
        &mut self.director
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Run one scheduled frame.  Returns `false` when paused, in which case
    /// nothing is updated or drawn; timers and input keep running.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) -> bool {
        // ── 1. Drain input ────────────────────────────────────────────────────
        while let Some(command) = self.queue.pop_front() {
            self.apply(command);
        }

        // ── 2. Periodic scene switch ──────────────────────────────────────────
        self.frame += 1;
        self.since_switch += 1;
        if self.since_switch >= self.switch_interval {
            self.since_switch = 0;
            if !self.paused && self.director.request_switch() {
                info!("scene timer fired on frame {}", self.frame);
            }
        }

        if self.paused {
            return false;
        }

        // ── 3. Background ─────────────────────────────────────────────────────
        let viewport = self.director.viewport();
        surface.set_fill(draw::background(self.director.scene(), &viewport));
        surface.fill_rect(0.0, 0.0, viewport.width, viewport.height);

        // ── 4. Entities ───────────────────────────────────────────────────────
        let ctx = FrameContext {
            pointer: self.pointer,
            viewport,
            frame: self.frame,
        };
        self.director.step(&ctx, &mut self.rng, surface);

        // ── 5. Transition overlay ─────────────────────────────────────────────
        if let Some(alpha) = self.director.advance_transition(&mut self.rng) {
            draw::overlay(surface, &viewport, alpha);
        }
        true
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            debug!("{}", if paused { "paused" } else { "resumed" });
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::PointerMoved { x, y } => {
                self.pointer.x = x;
                self.pointer.y = y;
            }
            Command::Clicked { x, y } => {
                if self.paused || self.director.is_transitioning() {
                    debug!("click at ({x:.0}, {y:.0}) ignored");
                    return;
                }
                self.director.click(x, y, &mut self.rng);
            }
            Command::Resized { width, height } => {
                self.director.resize(Viewport::new(width, height), &mut self.rng);
            }
            Command::Scrolled(delta) => {
                self.scroll = (self.scroll + delta).max(0.0);
                self.set_paused(self.scroll > SCROLL_PAUSE_THRESHOLD);
            }
            Command::SetPaused(paused) => self.set_paused(paused),
            Command::TogglePause => self.set_paused(!self.paused),
            Command::SwitchScene => {
                self.director.request_switch();
            }
        }
    }
}
