use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// An authoring-time paint description as stored on document nodes.
///
/// Channel ranges follow the editor: RGB in 0-255, CMYK in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Paint {
    None,
    Rgb {
        #[serde(default)]
        r: f64,
        #[serde(default)]
        g: f64,
        #[serde(default)]
        b: f64,
    },
    Cmyk {
        #[serde(default)]
        c: f64,
        #[serde(default)]
        m: f64,
        #[serde(default)]
        y: f64,
        #[serde(default)]
        k: f64,
    },
    Spot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        fallback: Option<Box<Paint>>,
    },
    Gradient {
        #[serde(default)]
        stops: Vec<GradientStop>,
    },
    /// Any paint kind this engine does not know how to resolve.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub color: Option<Paint>,
}

/// A device RGB color with channels in 0.0..=1.0.
///
/// Serializes as a `[r, g, b]` array. Deserializes from that array, a
/// `#rgb`/`#rrggbb` hex string, or a CSS-style `rgb(r, g, b)` string with
/// 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const RED: Rgb = Rgb { r: 1.0, g: 0.0, b: 0.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parse a hex color string (#RGB or #RRGGBB format)
    pub fn parse_hex(s: &str) -> Result<Rgb, String> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with #, got: {}", s))?;

        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|e| format!("Invalid color component '{}': {}", digits, e))
        };

        match hex.len() {
            3 => Ok(Rgb::from_u8(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            6 => Ok(Rgb::from_u8(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(format!("Invalid hex color length: expected 3 or 6, got {}", hex.len())),
        }
    }

    /// Parse `rgb(r, g, b)` with 0-255 channels.
    pub fn parse_css(s: &str) -> Result<Rgb, String> {
        let inner = s
            .trim()
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("Expected rgb(r, g, b), got: {}", s))?;
        let channels: Vec<f64> = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>().map_err(|e| format!("Invalid channel '{}': {}", part, e)))
            .collect::<Result<_, _>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb::new(r / 255.0, g / 255.0, b / 255.0)),
            _ => Err(format!("Expected three channels, got {}", channels.len())),
        }
    }

    pub fn parse(s: &str) -> Result<Rgb, String> {
        if s.trim_start().starts_with('#') {
            Self::parse_hex(s)
        } else {
            Self::parse_css(s)
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RgbDef {
            Str(String),
            Array([f64; 3]),
        }

        match RgbDef::deserialize(deserializer)? {
            RgbDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            RgbDef::Array([r, g, b]) => Ok(Rgb::new(r, g, b)),
        }
    }
}

/// A color as written on a text, overlay or path.
///
/// Strings that neither [`Rgb::parse`] form accepts are kept verbatim instead
/// of rejecting the document; they paint black and are reported by
/// composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    Invalid(String),
}

impl Color {
    pub const BLACK: Color = Color::Rgb(Rgb::BLACK);

    /// The paint to use, black for an unparsable value.
    pub fn rgb(&self) -> Rgb {
        match self {
            Color::Rgb(rgb) => *rgb,
            Color::Invalid(_) => Rgb::BLACK,
        }
    }

    /// The raw text of an unparsable value.
    pub fn invalid(&self) -> Option<&str> {
        match self {
            Color::Rgb(_) => None,
            Color::Invalid(raw) => Some(raw),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Color::Rgb(rgb) => rgb.serialize(serializer),
            Color::Invalid(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Array([f64; 3]),
        }

        Ok(match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(s) => match Rgb::parse(&s) {
                Ok(rgb) => Color::Rgb(rgb),
                Err(e) => {
                    log::debug!("Keeping unparsable color '{}': {}", s, e);
                    Color::Invalid(s)
                }
            },
            ColorDef::Array([r, g, b]) => Color::Rgb(Rgb::new(r, g, b)),
        })
    }
}
