//! Page content builder with a scoped graphics-state stack.
//!
//! Every `q` is paired with its `Q` by [`CanvasGuard`]: the guard emits the
//! restore when dropped, so nested transforms unwind in LIFO order on every
//! exit path. The canvas mirrors the current transformation matrix so callers
//! (and tests) can check that drawing a component leaves it unchanged.

use labelpress_types::{Affine, MM_TO_PT, PathOp, Point, Rgb};
use lopdf::Object;
use lopdf::content::{Content, Operation};
use std::ops::{Deref, DerefMut};

#[derive(Debug)]
pub struct PageCanvas {
    operations: Vec<Operation>,
    ctm: Affine,
    saved: Vec<Affine>,
    /// Page height in points, used to flip document y.
    page_height: f64,
}

impl PageCanvas {
    pub fn new(page_height_pt: f64) -> Self {
        Self { operations: Vec::new(), ctm: Affine::IDENTITY, saved: Vec::new(), page_height: page_height_pt }
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Converts a document-space point (mm, y down) to page points (y up).
    pub fn to_page(&self, x_mm: f64, y_mm: f64) -> Point {
        Point::new(x_mm * MM_TO_PT, self.page_height - y_mm * MM_TO_PT)
    }

    pub fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    pub fn fill_color(&mut self, color: Rgb) {
        self.push("rg", vec![color.r.into(), color.g.into(), color.b.into()]);
    }

    pub fn stroke_color(&mut self, color: Rgb) {
        self.push("RG", vec![color.r.into(), color.g.into(), color.b.into()]);
    }

    /// Appends path construction operators for document-space `ops`.
    pub fn path(&mut self, ops: &[PathOp]) {
        for op in ops {
            match *op {
                PathOp::MoveTo(x, y) => {
                    let p = self.to_page(x, y);
                    self.push("m", vec![p.x.into(), p.y.into()]);
                }
                PathOp::LineTo(x, y) => {
                    let p = self.to_page(x, y);
                    self.push("l", vec![p.x.into(), p.y.into()]);
                }
                PathOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
                    let (p1, p2, p3) = (self.to_page(x1, y1), self.to_page(x2, y2), self.to_page(x3, y3));
                    self.push(
                        "c",
                        vec![p1.x.into(), p1.y.into(), p2.x.into(), p2.y.into(), p3.x.into(), p3.y.into()],
                    );
                }
                PathOp::ClosePath => self.push("h", vec![]),
            }
        }
    }

    /// Current transformation matrix relative to the page's default space.
    pub fn ctm(&self) -> Affine {
        self.ctm
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Saves the graphics state and concatenates `transform`. The state is
    /// restored when the returned guard goes out of scope.
    pub fn save(&mut self, transform: Affine) -> CanvasGuard<'_> {
        self.push("q", vec![]);
        self.saved.push(self.ctm);
        if !transform.is_identity() {
            self.push(
                "cm",
                vec![
                    transform.a.into(),
                    transform.b.into(),
                    transform.c.into(),
                    transform.d.into(),
                    transform.e.into(),
                    transform.f.into(),
                ],
            );
            self.ctm = transform.then(&self.ctm);
        }
        CanvasGuard { canvas: self }
    }

    fn restore(&mut self) {
        self.push("Q", vec![]);
        if let Some(previous) = self.saved.pop() {
            self.ctm = previous;
        }
    }

    /// Runs `draw` inside one nested save per transform, outermost first.
    pub fn with_transforms<R>(&mut self, transforms: &[Affine], draw: impl FnOnce(&mut PageCanvas) -> R) -> R {
        match transforms.split_first() {
            None => draw(self),
            Some((first, rest)) => {
                let mut guard = self.save(*first);
                guard.with_transforms(rest, draw)
            }
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_content(self) -> Content {
        debug_assert!(self.saved.is_empty(), "unbalanced graphics state");
        Content { operations: self.operations }
    }
}

pub struct CanvasGuard<'a> {
    canvas: &'a mut PageCanvas,
}

impl Deref for CanvasGuard<'_> {
    type Target = PageCanvas;

    fn deref(&self) -> &PageCanvas {
        self.canvas
    }
}

impl DerefMut for CanvasGuard<'_> {
    fn deref_mut(&mut self) -> &mut PageCanvas {
        self.canvas
    }
}

impl Drop for CanvasGuard<'_> {
    fn drop(&mut self) {
        self.canvas.restore();
    }
}
