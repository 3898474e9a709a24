/// Terminal presentation: all terminal I/O lives here.
///
/// The raster is shown two pixels per cell: the upper half-block glyph takes
/// the top pixel as foreground and the bottom pixel as background.  A status
/// line and a controls hint are printed over the first and last rows.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use microcosm::entities::SceneKind;
use microcosm::raster::Raster;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_BG: Color = Color::Black;
const C_HUD_SCENE: Color = Color::Cyan;
const C_HUD_COUNTS: Color = Color::Grey;
const C_HUD_PAUSED: Color = Color::Yellow;
const C_HUD_GAME_OVER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Brightness multiplier while paused, standing in for the page's blur.
const PAUSE_DIM: f32 = 0.45;

const HALF_BLOCK: char = '▀';

/// What the HUD shows besides the picture.
#[derive(Clone, Debug)]
pub struct Status {
    pub scene: SceneKind,
    pub census: Vec<(&'static str, usize)>,
    pub paused: bool,
    pub transitioning: bool,
    pub game_over: bool,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, raster: &Raster, status: &Status) -> std::io::Result<()> {
    let rows = raster.height() / 2;
    let dim = if status.paused { PAUSE_DIM } else { 1.0 };

    let mut last: Option<(Color, Color)> = None;
    for row in 0..rows {
        out.queue(cursor::MoveTo(0, row as u16))?;
        for col in 0..raster.width() {
            let top = terminal_color(raster, col, row * 2, dim);
            let bottom = terminal_color(raster, col, row * 2 + 1, dim);
            if last != Some((top, bottom)) {
                out.queue(style::SetForegroundColor(top))?;
                out.queue(style::SetBackgroundColor(bottom))?;
                last = Some((top, bottom));
            }
            out.queue(Print(HALF_BLOCK))?;
        }
    }

    draw_hud(out, status)?;
    if rows > 1 {
        draw_controls_hint(out, rows as u16 - 1)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

fn terminal_color(raster: &Raster, x: usize, y: usize, dim: f32) -> Color {
    match raster.pixel(x, y) {
        Some(px) => {
            let scale = |c: u8| (c as f32 * dim).round() as u8;
            Color::Rgb {
                r: scale(px.r),
                g: scale(px.g),
                b: scale(px.b),
            }
        }
        None => Color::Black,
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, status: &Status) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetBackgroundColor(C_HUD_BG))?;

    out.queue(style::SetForegroundColor(C_HUD_SCENE))?;
    out.queue(Print(format!(" ◉ {} ", status.scene)))?;

    let counts: Vec<String> = status
        .census
        .iter()
        .map(|(label, n)| format!("{label} {n}"))
        .collect();
    out.queue(style::SetForegroundColor(C_HUD_COUNTS))?;
    out.queue(Print(format!("│ {} ", counts.join(" · "))))?;

    if status.transitioning {
        out.queue(Print("│ … "))?;
    }
    if status.game_over {
        out.queue(style::SetForegroundColor(C_HUD_GAME_OVER))?;
        out.queue(Print("│ INFECTION WON "))?;
    }
    if status.paused {
        out.queue(style::SetForegroundColor(C_HUD_PAUSED))?;
        out.queue(Print("│ PAUSED "))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, row: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, row))?;
    out.queue(style::SetBackgroundColor(C_HUD_BG))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(" click: interact   wheel/P: pause   N: next scene   Q: quit "))?;
    Ok(())
}
