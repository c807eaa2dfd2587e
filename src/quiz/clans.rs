use std::fmt;

pub type ClanId = String;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Clan {
    pub id: ClanId,
    pub name: String,
    pub traits: Vec<String>,
    pub characteristics: Vec<String>,
    pub color: Color,
    // Shown next to the clan name in chat messages
    #[serde(default)]
    pub emoji: String,
    pub description: String,
}

/// An RGB color, written and parsed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Accepts `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Every channel scaled to 80%, used for badge borders.
    pub fn darker(self) -> Self {
        let scale = |c: u8| (f64::from(c) * 0.8).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Mixes this color into white. An intensity of 0 is white, 1 is the color itself.
    pub fn blend_with_white(self, intensity: f64) -> Self {
        let intensity = intensity.clamp(0.0, 1.0);
        let mix = |c: u8| (255.0 - (255.0 - f64::from(c)) * intensity).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("'{}' is not a #RRGGBB color", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}
