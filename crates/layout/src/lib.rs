use labelpress_traits::FontError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Glyph outline error: {0}")]
    Face(String),
    #[error("Font has no glyphs for '{0}'")]
    MissingGlyphs(String),
}

pub mod bounds;
pub mod color;
pub mod compose;
pub mod flatten;
pub mod fonts;
pub mod overlay;
pub mod text;
pub mod variables;

pub use self::compose::{ComposedLabel, compose};
pub use self::flatten::{Flattened, flatten, flatten_with_warnings};
pub use self::fonts::{LoadedFont, SharedFontLibrary};
pub use self::variables::VariableValues;
