mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use log::info;

use microcosm::entities::{Scene, Viewport};
use microcosm::raster::Raster;
use microcosm::surface::Surface;
use microcosm::{logging, Command, Config, Engine};

use display::Status;

/// Scroll distance reported per mouse-wheel notch, in page pixels.
const SCROLL_STEP: f32 = 40.0;

/// Microbes, a rocket and an immune system, cycling in your terminal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seconds between automatic scene switches
    #[arg(long, default_value_t = 15.0)]
    interval: f32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation units per raster pixel
    #[arg(long, default_value_t = 6.0)]
    scale: f32,

    /// Write log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            fps: self.fps,
            scene_interval_secs: self.interval,
            seed: self.seed,
            pixel_scale: self.scale,
            ..Config::default()
        }
    }
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Raster size for a terminal of `cols` × `rows` cells.
fn raster_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows as usize * 2)
}

fn viewport_for(cols: u16, rows: u16, scale: f32) -> Viewport {
    let (w, h) = raster_size(cols, rows);
    Viewport::new(w as f32 * scale, h as f32 * scale)
}

/// Centre of a terminal cell in simulation units.
fn cell_to_sim(column: u16, row: u16, scale: f32) -> (f32, f32) {
    ((column as f32 + 0.5) * scale, (row as f32 * 2.0 + 1.0) * scale)
}

// ── Input translation ─────────────────────────────────────────────────────────

enum Input {
    Quit,
    Commands(Vec<Command>),
}

fn translate(event: Event, scale: f32) -> Input {
    match event {
        Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Input::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                Input::Commands(vec![Command::TogglePause])
            }
            KeyCode::Char('n') | KeyCode::Char('N') => Input::Commands(vec![Command::SwitchScene]),
            _ => Input::Commands(Vec::new()),
        },
        Event::Mouse(MouseEvent { kind, column, row, .. }) => {
            let (x, y) = cell_to_sim(column, row, scale);
            let commands = match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    vec![Command::PointerMoved { x, y }]
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    vec![Command::PointerMoved { x, y }, Command::Clicked { x, y }]
                }
                MouseEventKind::ScrollDown => vec![Command::Scrolled(SCROLL_STEP)],
                MouseEventKind::ScrollUp => vec![Command::Scrolled(-SCROLL_STEP)],
                _ => Vec::new(),
            };
            Input::Commands(commands)
        }
        Event::Resize(cols, rows) => {
            let vp = viewport_for(cols, rows, scale);
            Input::Commands(vec![Command::Resized { width: vp.width, height: vp.height }])
        }
        _ => Input::Commands(Vec::new()),
    }
}

fn status_of(engine: &Engine) -> Status {
    let director = engine.director();
    Status {
        scene: director.kind(),
        census: director.scene().census(),
        paused: engine.is_paused(),
        transitioning: director.is_transitioning(),
        game_over: matches!(director.scene(), Scene::Immune(s) if s.game_over),
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &Config) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let (w, h) = raster_size(cols, rows);
    let mut raster = Raster::new(w, h);
    let mut engine = Engine::new(config, viewport_for(cols, rows, config.pixel_scale));
    let budget = config.frame_duration();
    let inv_scale = 1.0 / config.pixel_scale;

    info!("starting on a {cols}x{rows} terminal");

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                let (w, h) = raster_size(cols, rows);
                raster.resize(w, h);
            }
            match translate(ev, config.pixel_scale) {
                Input::Quit => return Ok(()),
                Input::Commands(commands) => {
                    for command in commands {
                        engine.push(command);
                    }
                }
            }
        }

        raster.save();
        raster.scale(inv_scale, inv_scale);
        engine.frame(&mut raster);
        raster.restore();

        display::render(out, &raster, &status_of(&engine)).context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref()).context("failed to open log file")?;
    let config = args.config();
    config.validate().context("invalid configuration")?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
