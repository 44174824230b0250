pub mod lines;
pub mod outline;

pub use lines::{PlacedLine, line_height, place_lines, split_lines};
pub use outline::{char_advance, outline_text, outline_text_spaced, scale_for, text_width};
