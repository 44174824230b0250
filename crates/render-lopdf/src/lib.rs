//! Label renderer producing PDF/AI byte streams with lopdf.
//!
//! A [`LabelRenderer`] turns composed labels into pages: paths with their
//! fill rules, editable or outlined text, images, bounds-rect guides and the
//! optional hidden/visible layer separation. Fonts resolved through the
//! shared font library are embedded in full or as subsets; anything that
//! cannot be resolved falls back to a standard-14 font.

mod canvas;
mod document;
mod error;
mod fonts;
mod images;
mod metrics;
mod options;
mod page;
mod subset;
mod text;

pub use canvas::{CanvasGuard, PageCanvas};
pub use document::{LabelRenderer, RenderedDocument, render_label, render_pages};
pub use error::RenderError;
pub use metrics::BaseFamily;
pub use options::{DEFAULT_FULL_EMBED_LIMIT, FontEmbedding, OutputFormat, RenderOptions};
