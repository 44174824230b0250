use serde::{Deserialize, Serialize};

/// Millimeters per typographic point (1pt = 1/72in).
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// Points per millimeter.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

pub fn pt_to_mm(value: f64) -> f64 {
    value * PT_TO_MM
}

pub fn mm_to_pt(value: f64) -> f64 {
    value * MM_TO_PT
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned box in document space (origin top-left, y grows downward).
///
/// Accepts both the long (`width`/`height`) and the short (`w`/`h`) field
/// names, since layout records use either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, alias = "w")]
    pub width: f64,
    #[serde(default, alias = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment: points on the edges count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// A 2D affine transform in PDF `cm` operand order: `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    /// Counter-clockwise rotation in a y-up coordinate system.
    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// Rotation about `pivot`: translate to pivot, rotate, translate back.
    pub fn rotate_about(degrees: f64, pivot: Point) -> Self {
        Self::translate(-pivot.x, -pivot.y)
            .then(&Self::rotate_degrees(degrees))
            .then(&Self::translate(pivot.x, pivot.y))
    }

    /// Returns the transform that applies `self` first and `next` second.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.approx_eq(&Self::IDENTITY, 1e-12)
    }

    pub fn approx_eq(&self, other: &Affine, epsilon: f64) -> bool {
        (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.c - other.c).abs() < epsilon
            && (self.d - other.d).abs() < epsilon
            && (self.e - other.e).abs() < epsilon
            && (self.f - other.f).abs() < epsilon
    }
}
