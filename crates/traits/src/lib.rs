//! Collaborator seams consumed by the label export core.

pub mod font;

pub use font::{FontCatalog, FontCatalogEntry, FontError, FontLocation, FontLookup};
