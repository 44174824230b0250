//! Bounds rects: rotation anchors drawn as dashed guides, never as content.

use labelpress_types::{BoundsRect, BoundsRectMeta, Component, LabelDocument};

/// Builds the normalized bounds-rect list from layout metadata.
///
/// Rotation precedence: `_rotation`, then `rotation`, then the parallel
/// `boundsRectRotations` entry, then 0.
pub fn resolve(metas: &[BoundsRectMeta], rotations: &[Option<f64>]) -> Vec<BoundsRect> {
    metas
        .iter()
        .enumerate()
        .map(|(i, meta)| {
            let size = meta.size();
            BoundsRect {
                x: meta.x,
                y: meta.y,
                w: size.width,
                h: size.height,
                rotation: meta
                    .own_rotation
                    .or(meta.rotation)
                    .or_else(|| rotations.get(i).copied().flatten())
                    .unwrap_or(0.0),
            }
        })
        .collect()
}

pub fn resolve_document(doc: &LabelDocument) -> Vec<BoundsRect> {
    resolve(&doc.bounds_rects, &doc.bounds_rect_rotations)
}

/// Index of the first rect whose box contains the component's centroid
/// (inclusive edges), or `None`.
pub fn assign(component: &Component, rects: &[BoundsRect]) -> Option<usize> {
    let centroid = component.centroid();
    rects.iter().position(|rect| rect.rect().contains(centroid))
}

/// Assigns every component its bounds-rect index.
pub fn assign_all(components: &mut [Component], rects: &[BoundsRect]) {
    for component in components.iter_mut() {
        component.bounds_rect = assign(component, rects);
    }
}
