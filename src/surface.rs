/// The 2D immediate-mode drawing contract the scenes render onto.
///
/// Shaped after the browser canvas: a current path built from move/line/
/// curve/arc commands, fill and stroke paints, and an affine transform stack
/// with save/restore.  Nothing in the simulation reads back from a surface.

// ── Colour ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// `0xRRGGBB`, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Color::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Color { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Channel-wise linear blend, rounding like a CSS colour mix.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + t * (b as f32 - a as f32)).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + t * (other.a - self.a),
        }
    }
}

// ── Paint ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Linear {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    /// Two-circle radial gradient, as `createRadialGradient`.
    Radial {
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient {
        shape: Gradient,
        /// Kept sorted by offset.
        stops: Vec<ColorStop>,
    },
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl Paint {
    pub fn linear(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Paint::Gradient {
            shape: Gradient::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub fn radial(x0: f32, y0: f32, r0: f32, x1: f32, y1: f32, r1: f32) -> Self {
        Paint::Gradient {
            shape: Gradient::Radial { x0, y0, r0, x1, y1, r1 },
            stops: Vec::new(),
        }
    }

    /// Add a colour stop.  A no-op on solid paints.
    pub fn stop(mut self, offset: f32, color: Color) -> Self {
        if let Paint::Gradient { stops, .. } = &mut self {
            let offset = offset.clamp(0.0, 1.0);
            let at = stops.partition_point(|s| s.offset <= offset);
            stops.insert(at, ColorStop { offset, color });
        }
        self
    }

    /// Resolve the paint at a point given in the paint's own (user) space.
    pub fn color_at(&self, x: f32, y: f32) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Gradient { shape, stops } => sample_stops(stops, shape.offset_at(x, y)),
        }
    }
}

impl Gradient {
    /// Gradient parameter `t` in `[0, 1]` for a point.
    fn offset_at(&self, x: f32, y: f32) -> f32 {
        match *self {
            Gradient::Linear { x0, y0, x1, y1 } => {
                let (dx, dy) = (x1 - x0, y1 - y0);
                let len_sq = dx * dx + dy * dy;
                if len_sq <= f32::EPSILON {
                    return 0.0;
                }
                (((x - x0) * dx + (y - y0) * dy) / len_sq).clamp(0.0, 1.0)
            }
            Gradient::Radial { x0, y0, r0, x1, y1, r1 } => {
                // Largest t with |p - c(t)| = r(t), c and r interpolated
                // between the two circles.
                let (cdx, cdy, dr) = (x1 - x0, y1 - y0, r1 - r0);
                let (px, py) = (x - x0, y - y0);
                let a = cdx * cdx + cdy * cdy - dr * dr;
                let b = -2.0 * (px * cdx + py * cdy + r0 * dr);
                let c = px * px + py * py - r0 * r0;
                let t = if a.abs() <= f32::EPSILON {
                    if b.abs() <= f32::EPSILON {
                        0.0
                    } else {
                        -c / b
                    }
                } else {
                    let disc = b * b - 4.0 * a * c;
                    if disc < 0.0 {
                        return 1.0;
                    }
                    let root = disc.sqrt();
                    let (t1, t2) = ((-b + root) / (2.0 * a), (-b - root) / (2.0 * a));
                    let hi = t1.max(t2);
                    if r0 + hi * dr >= 0.0 {
                        hi
                    } else {
                        t1.min(t2)
                    }
                };
                if t.is_finite() {
                    t.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::BLACK.with_alpha(0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = hi.offset - lo.offset;
            if span <= f32::EPSILON {
                return hi.color;
            }
            return lo.color.lerp(hi.color, (t - lo.offset) / span);
        }
    }
    last.color
}

// ── Transform ─────────────────────────────────────────────────────────────────

/// Affine map `(x, y) ↦ (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// The map applying `local` first, then `self` (canvas post-multiplication).
    pub fn then_local(&self, local: &Transform) -> Transform {
        Transform {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            e: self.a * local.e + self.c * local.f + self.e,
            f: self.b * local.e + self.d * local.f + self.f,
        }
    }

    pub fn translated(&self, x: f32, y: f32) -> Transform {
        self.then_local(&Transform { e: x, f: y, ..Transform::IDENTITY })
    }

    pub fn rotated(&self, angle: f32) -> Transform {
        let (sin, cos) = angle.sin_cos();
        self.then_local(&Transform { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 })
    }

    pub fn scaled(&self, sx: f32, sy: f32) -> Transform {
        self.then_local(&Transform { a: sx, d: sy, ..Transform::IDENTITY })
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// `None` for a degenerate (zero-area) transform.
    pub fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() <= f32::EPSILON * f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Geometric-mean scale factor, used to size curve flattening.
    pub fn mean_scale(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

// ── Surface contract ──────────────────────────────────────────────────────────

pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);
    /// Clockwise arc from `start` to `end` radians around `(x, y)`.
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);

    fn fill(&mut self);
    fn stroke(&mut self);

    /// Convenience: a filled full circle as a fresh path.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.begin_path();
        self.arc(x, y, radius, 0.0, std::f32::consts::TAU);
        self.fill();
    }
}

/// Discards every call.  Lets the engine step without rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _x: f32, _y: f32) {}
    fn rotate(&mut self, _angle: f32) {}
    fn scale(&mut self, _sx: f32, _sy: f32) {}
    fn set_fill(&mut self, _paint: Paint) {}
    fn set_stroke(&mut self, _paint: Paint) {}
    fn set_line_width(&mut self, _width: f32) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
    fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn line_to(&mut self, _x: f32, _y: f32) {}
    fn quadratic_curve_to(&mut self, _cx: f32, _cy: f32, _x: f32, _y: f32) {}
    fn arc(&mut self, _x: f32, _y: f32, _radius: f32, _start: f32, _end: f32) {}
    fn close_path(&mut self) {}
    fn fill(&mut self) {}
    fn stroke(&mut self) {}
}
