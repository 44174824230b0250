//! Overlay merging.
//!
//! Overlays are the source of truth for the regions they cover: any static
//! vector path whose centroid lies inside an overlay box is dropped, and the
//! overlays are appended after the remaining static components.

use crate::bounds;
use labelpress_types::{
    BarcodeComponent, BoundsRect, Component, ComponentId, ComponentKind, ImageComponent, Overlay, OverlayKind,
    QrComponent, TextComponent,
};

pub fn merge(components: Vec<Component>, overlays: &[Overlay], rects: &[BoundsRect]) -> Vec<Component> {
    let before = components.len();
    let mut merged: Vec<Component> = components
        .into_iter()
        .filter(|component| !covered_by_overlay(component, overlays))
        .collect();
    if merged.len() != before {
        log::debug!("Dropped {} static path(s) covered by overlays", before - merged.len());
    }

    merged.extend(overlays.iter().enumerate().map(|(index, overlay)| {
        let mut component = overlay_component(index, overlay);
        component.bounds_rect = overlay.stored_bounds_rect().or_else(|| bounds::assign(&component, rects));
        component
    }));
    merged
}

fn covered_by_overlay(component: &Component, overlays: &[Overlay]) -> bool {
    if !component.is_path() {
        return false;
    }
    let centroid = component.centroid();
    overlays.iter().any(|overlay| overlay.rect().contains(centroid))
}

/// Converts one overlay to a component. The bounds-rect index is left unset.
pub fn overlay_component(index: usize, overlay: &Overlay) -> Component {
    let kind = match overlay.kind {
        OverlayKind::Text => ComponentKind::Text(TextComponent {
            content: overlay.content.clone(),
            font_family: overlay.font_family.clone(),
            font_id: overlay.font_id.clone(),
            font_size: overlay.font_size,
            bold: overlay.bold,
            italic: overlay.italic,
            color: overlay.color.clone(),
            letter_spacing: overlay.letter_spacing,
            align_h: overlay.align_h,
            align_v: overlay.align_v,
        }),
        OverlayKind::Image => ComponentKind::Image(ImageComponent {
            image_url: overlay.image_url.clone(),
            image_fit: overlay.image_fit,
        }),
        OverlayKind::Qr => ComponentKind::Qr(QrComponent { qr_data: overlay.qr_data.clone() }),
        OverlayKind::Barcode => ComponentKind::Barcode(BarcodeComponent {
            barcode_data: overlay.barcode_data.clone(),
            barcode_format: overlay.barcode_format.clone(),
        }),
    };

    let id = overlay.id.clone().unwrap_or_else(|| ComponentId::for_overlay(index));
    let mut component = Component::new(overlay.rect(), kind).with_id(id);
    component.visible = overlay.visible;
    component.rotation = overlay.rotation();
    component
}
