/// Software implementation of [`Surface`] over an RGB pixel buffer.
///
/// Paths are flattened to polylines in device space as they are built.
/// `fill` scans pixel centres with the non-zero winding rule; `stroke` stamps
/// the line width along each segment.  Both composite source-over, and each
/// pixel is touched at most once per call so translucent paints don't stack
/// within a single shape.

use std::f32::consts::TAU;

use crate::surface::{Color, Paint, Surface, Transform};

/// Device-space length of one flattened arc or curve segment.
const FLATTEN_STEP: f32 = 1.5;
const MIN_ARC_SEGMENTS: usize = 8;
const MAX_ARC_SEGMENTS: usize = 96;
const CURVE_SEGMENTS: usize = 8;

#[derive(Clone, Debug)]
struct DrawState {
    transform: Transform,
    fill: Paint,
    stroke: Paint,
    line_width: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: Transform::IDENTITY,
            fill: Paint::Solid(Color::BLACK),
            stroke: Paint::Solid(Color::BLACK),
            line_width: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Subpath {
    points: Vec<(f32, f32)>,
    closed: bool,
}

#[derive(Clone, Debug)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Vec<Subpath>,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
            state: DrawState::default(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffer (cleared to black) and drop all drawing state.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Raster::new(width, height);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[y * self.width + x];
        Some(Color::rgb(to_channel(r), to_channel(g), to_channel(b)))
    }

    // ── Path bookkeeping ──────────────────────────────────────────────────────

    fn current_point(&self) -> Option<(f32, f32)> {
        self.path.last().and_then(|s| s.points.last().copied())
    }

    fn push_device_point(&mut self, p: (f32, f32)) {
        match self.path.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => self.path.push(Subpath { points: vec![p], closed: false }),
        }
    }

    // ── Compositing ───────────────────────────────────────────────────────────

    fn composite(&mut self, mut covered: Vec<usize>, paint: &Paint) {
        if covered.is_empty() {
            return;
        }
        covered.sort_unstable();
        covered.dedup();

        let inverse = match paint {
            Paint::Solid(_) => None,
            Paint::Gradient { .. } => match self.state.transform.invert() {
                Some(inv) => Some(inv),
                None => return,
            },
        };

        for idx in covered {
            let color = match (paint, inverse) {
                (Paint::Solid(c), _) => *c,
                (_, Some(inv)) => {
                    let px = (idx % self.width) as f32 + 0.5;
                    let py = (idx / self.width) as f32 + 0.5;
                    let (ux, uy) = inv.apply(px, py);
                    paint.color_at(ux, uy)
                }
                (_, None) => continue,
            };
            blend(&mut self.pixels[idx], color);
        }
    }

    /// Pixel indices whose centres fall inside the polygons (non-zero rule).
    fn coverage(&self, subpaths: &[Subpath]) -> Vec<usize> {
        let mut edges: Vec<(f32, f32, f32, f32)> = Vec::new();
        for sub in subpaths {
            let n = sub.points.len();
            if n < 2 {
                continue;
            }
            for i in 0..n {
                let (x0, y0) = sub.points[i];
                let (x1, y1) = sub.points[(i + 1) % n];
                if (y1 - y0).abs() > f32::EPSILON && x0.is_finite() && x1.is_finite() {
                    edges.push((x0, y0, x1, y1));
                }
            }
        }
        if edges.is_empty() {
            return Vec::new();
        }

        let min_y = edges.iter().map(|e| e.1.min(e.3)).fold(f32::INFINITY, f32::min);
        let max_y = edges.iter().map(|e| e.1.max(e.3)).fold(f32::NEG_INFINITY, f32::max);
        let row_start = (min_y - 0.5).ceil().max(0.0) as usize;
        let row_end = ((max_y - 0.5).ceil().max(0.0) as usize).min(self.height);

        let mut covered = Vec::new();
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for row in row_start..row_end {
            let sy = row as f32 + 0.5;
            crossings.clear();
            for &(x0, y0, x1, y1) in &edges {
                let (lo, hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
                if sy < lo || sy >= hi {
                    continue;
                }
                let x = x0 + (sy - y0) * (x1 - x0) / (y1 - y0);
                crossings.push((x, if y1 > y0 { 1 } else { -1 }));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let col_start = (pair[0].0 - 0.5).ceil().max(0.0) as usize;
                let col_end = ((pair[1].0 - 0.5).ceil().max(0.0) as usize).min(self.width);
                covered.extend((col_start..col_end).map(|col| row * self.width + col));
            }
        }
        covered
    }

    /// Pixel indices within half the line width of any segment.
    fn stroke_coverage(&self, subpaths: &[Subpath]) -> Vec<usize> {
        let half = (self.state.line_width * self.state.transform.mean_scale() * 0.5).max(0.5);
        let mut covered = Vec::new();
        for sub in subpaths {
            let pts = &sub.points;
            let mut segments: Vec<((f32, f32), (f32, f32))> =
                pts.windows(2).map(|w| (w[0], w[1])).collect();
            if sub.closed && pts.len() > 2 {
                if let (Some(&last), Some(&first)) = (pts.last(), pts.first()) {
                    segments.push((last, first));
                }
            }
            for ((x0, y0), (x1, y1)) in segments {
                let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
                if !len.is_finite() {
                    continue;
                }
                let steps = (len / 0.5).ceil().max(1.0) as usize;
                for s in 0..=steps {
                    let t = s as f32 / steps as f32;
                    self.stamp(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, half, &mut covered);
                }
            }
        }
        covered
    }

    fn stamp(&self, x: f32, y: f32, radius: f32, covered: &mut Vec<usize>) {
        let col_lo = (x - radius).floor().max(0.0) as usize;
        let row_lo = (y - radius).floor().max(0.0) as usize;
        let col_hi = ((x + radius).floor() as isize).min(self.width as isize - 1);
        let row_hi = ((y + radius).floor() as isize).min(self.height as isize - 1);
        if col_hi < 0 || row_hi < 0 {
            return;
        }
        for row in row_lo..=row_hi as usize {
            for col in col_lo..=col_hi as usize {
                let (dx, dy) = (col as f32 + 0.5 - x, row as f32 + 0.5 - y);
                let home = x >= 0.0
                    && y >= 0.0
                    && col == x.floor() as usize
                    && row == y.floor() as usize;
                if home || dx * dx + dy * dy <= radius * radius {
                    covered.push(row * self.width + col);
                }
            }
        }
    }

    fn rect_subpath(&self, x: f32, y: f32, w: f32, h: f32) -> Subpath {
        let t = &self.state.transform;
        Subpath {
            points: vec![t.apply(x, y), t.apply(x + w, y), t.apply(x + w, y + h), t.apply(x, y + h)],
            closed: true,
        }
    }
}

fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn blend(dst: &mut [f32; 3], src: Color) {
    let a = src.a.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    for (d, s) in dst.iter_mut().zip([src.r, src.g, src.b]) {
        *d = s as f32 * a + *d * (1.0 - a);
    }
}

impl Surface for Raster {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.translated(x, y);
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.rotated(angle);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scaled(sx, sy);
    }

    fn set_fill(&mut self, paint: Paint) {
        self.state.fill = paint;
    }

    fn set_stroke(&mut self, paint: Paint) {
        self.state.stroke = paint;
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = [self.rect_subpath(x, y, w, h)];
        let covered = self.coverage(&rect);
        let paint = self.state.fill.clone();
        self.composite(covered, &paint);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = [self.rect_subpath(x, y, w, h)];
        let covered = self.stroke_coverage(&rect);
        let paint = self.state.stroke.clone();
        self.composite(covered, &paint);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.apply(x, y);
        self.path.push(Subpath { points: vec![p], closed: false });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.state.transform.apply(x, y);
        self.push_device_point(p);
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let ctrl = self.state.transform.apply(cx, cy);
        let end = self.state.transform.apply(x, y);
        let Some(start) = self.current_point() else {
            self.push_device_point(ctrl);
            self.push_device_point(end);
            return;
        };
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            let u = 1.0 - t;
            let px = u * u * start.0 + 2.0 * u * t * ctrl.0 + t * t * end.0;
            let py = u * u * start.1 + 2.0 * u * t * ctrl.1 + t * t * end.1;
            self.push_device_point((px, py));
        }
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let mut sweep = end - start;
        if sweep < 0.0 {
            sweep = sweep.rem_euclid(TAU);
        }
        let sweep = sweep.min(TAU);
        let device_len = radius * self.state.transform.mean_scale() * sweep;
        let segments = ((device_len / FLATTEN_STEP).ceil() as usize)
            .clamp(MIN_ARC_SEGMENTS, MAX_ARC_SEGMENTS);
        for i in 0..=segments {
            let angle = start + sweep * i as f32 / segments as f32;
            let p = self
                .state
                .transform
                .apply(x + radius * angle.cos(), y + radius * angle.sin());
            self.push_device_point(p);
        }
    }

    fn close_path(&mut self) {
        let first = match self.path.last_mut() {
            Some(sub) if !sub.closed => {
                sub.closed = true;
                sub.points.first().copied()
            }
            _ => None,
        };
        if let Some(p) = first {
            self.path.push(Subpath { points: vec![p], closed: false });
        }
    }

    fn fill(&mut self) {
        let covered = self.coverage(&self.path);
        let paint = self.state.fill.clone();
        self.composite(covered, &paint);
    }

    fn stroke(&mut self) {
        let covered = self.stroke_coverage(&self.path);
        let paint = self.state.stroke.clone();
        self.composite(covered, &paint);
    }
}
