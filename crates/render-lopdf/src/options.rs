use std::fmt;
use std::str::FromStr;

/// Largest font file embedded whole; larger files are subset.
pub const DEFAULT_FULL_EMBED_LIMIT: usize = 2 * 1024 * 1024;

/// Which flavor of vector file to produce. Both are PDF 1.7 byte streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Illustrator-oriented output. Honors hidden/visible layer separation.
    #[default]
    Ai,
    /// Plain print PDF. Components are always drawn in list order.
    Pdf,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Ai => "ai",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ai" => Ok(OutputFormat::Ai),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("unknown output format '{}' (expected ai or pdf)", other)),
        }
    }
}

/// Font program embedding strategy for editable text, chosen per font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontEmbedding {
    /// Embed the complete font file when it is at most `size_limit` bytes,
    /// otherwise fall back to a subset.
    Full { size_limit: usize },
    /// Always embed a subset containing only the glyphs used.
    Subset,
}

impl Default for FontEmbedding {
    fn default() -> Self {
        FontEmbedding::Full { size_limit: DEFAULT_FULL_EMBED_LIMIT }
    }
}

impl FontEmbedding {
    pub fn embeds_full(&self, file_size: usize) -> bool {
        match self {
            FontEmbedding::Full { size_limit } => file_size <= *size_limit,
            FontEmbedding::Subset => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Convert text to filled glyph outlines instead of editable text.
    pub outlined: bool,
    /// Draw hidden paths, a separator mark, visible paths, then everything
    /// else. Only meaningful for [`OutputFormat::Ai`].
    pub separate_invisible: bool,
    pub embedding: FontEmbedding,
}

impl RenderOptions {
    /// Whether the hidden/visible layering applies to this render.
    pub fn layered(&self) -> bool {
        self.separate_invisible && self.format == OutputFormat::Ai
    }
}
