use crate::ids::ComponentId;
use serde::Serialize;
use std::fmt;

/// A non-fatal condition encountered while composing or rendering a label.
///
/// Every warning corresponds to a degraded-but-visible result: a base font
/// stood in for a missing one, text stayed editable instead of outlined, or a
/// node contributed nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExportWarning {
    #[serde(rename_all = "camelCase")]
    MissingFontFile { family: String, font_id: Option<String>, fallback: String },
    #[serde(rename_all = "camelCase")]
    GlyphOutlineFailure { component: Option<ComponentId>, message: String },
    InvalidGeometry { node: ComponentId, reason: String },
    UnknownNodeKind { node: ComponentId, kind: String },
    UnsupportedComponent { component: Option<ComponentId>, kind: String },
    ImageUnavailable { component: Option<ComponentId>, message: String },
    InvalidColor { component: Option<ComponentId>, value: String },
    UnusedVariable { key: ComponentId },
}

fn describe(id: &Option<ComponentId>) -> String {
    id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "<unnamed>".to_string())
}

impl fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportWarning::MissingFontFile { family, font_id, fallback } => match font_id {
                Some(id) => write!(f, "font '{}' (id {}) not found, using {}", family, id, fallback),
                None => write!(f, "font '{}' not found, using {}", family, fallback),
            },
            ExportWarning::GlyphOutlineFailure { component, message } => {
                write!(f, "could not outline text of {}: {}; kept as editable text", describe(component), message)
            }
            ExportWarning::InvalidGeometry { node, reason } => write!(f, "skipped {}: {}", node, reason),
            ExportWarning::UnknownNodeKind { node, kind } => write!(f, "skipped {}: unknown node type '{}'", node, kind),
            ExportWarning::UnsupportedComponent { component, kind } => {
                write!(f, "{} component {} is not rendered", kind, describe(component))
            }
            ExportWarning::ImageUnavailable { component, message } => {
                write!(f, "image of {} unavailable: {}", describe(component), message)
            }
            ExportWarning::InvalidColor { component, value } => {
                write!(f, "color '{}' of {} is not a valid color, using black", value, describe(component))
            }
            ExportWarning::UnusedVariable { key } => write!(f, "variable '{}' matches no variable overlay", key),
        }
    }
}
