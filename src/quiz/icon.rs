//! Clan badge rendering.
//!
//! The quiz engine never renders anything itself. Presentation code hands a
//! clan id and color to an [`IconRenderer`] and treats the returned
//! [`IconRef`] as opaque.

use std::fmt;
use std::time::Duration;

use moka::sync::Cache;

use crate::quiz::{ClanId, Color, IconError};

pub const DEFAULT_ICON_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_CACHED_ICONS: u64 = 64;

/// A rendered icon. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait IconRenderer {
    fn render(&self, clan_id: &str, color: Color) -> Result<IconRef, IconError>;
}

/// Hand-drawn SVG badges: a clan-colored disc with a darker rim and the
/// clan's symbol on a white inner circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBadgeRenderer;

impl SvgBadgeRenderer {
    fn symbol(clan_id: &str, color: Color, darker: Color) -> String {
        match clan_id {
            "thunderclan" => format!(
                r#"<path d="M 128 60 L 108 100 L 125 100 L 115 140 L 135 140 L 120 180 L 150 110 L 133 110 L 143 70 Z" fill="{c}" stroke="{c}" stroke-width="2"/>
  <path d="M 100 75 Q 90 70, 85 75 Q 80 80, 85 85 Q 90 80, 100 75 Z" fill="{c}" opacity="0.7"/>
  <path d="M 156 75 Q 166 70, 171 75 Q 176 80, 171 85 Q 166 80, 156 75 Z" fill="{c}" opacity="0.7"/>"#,
                c = color
            ),
            "riverclan" => format!(
                r#"<ellipse cx="128" cy="95" rx="25" ry="12" fill="{c}"/>
  <path d="M 148 95 L 158 88 L 158 102 Z" fill="{c}"/>
  <circle cx="115" cy="93" r="2" fill="white"/>
  <path d="M 88 120 Q 108 115, 128 120 Q 148 115, 168 120" stroke="{c}" stroke-width="3" fill="none"/>
  <path d="M 88 135 Q 108 130, 128 135 Q 148 130, 168 135" stroke="{c}" stroke-width="3" fill="none"/>
  <path d="M 88 150 Q 108 145, 128 150 Q 148 145, 168 150" stroke="{c}" stroke-width="3" fill="none"/>"#,
                c = color
            ),
            "windclan" => format!(
                r#"<ellipse cx="128" cy="110" rx="18" ry="15" fill="{c}"/>
  <ellipse cx="145" cy="108" rx="8" ry="5" fill="{c}"/>
  <ellipse cx="118" cy="95" rx="4" ry="10" fill="{c}" transform="rotate(-15 118 95)"/>
  <ellipse cx="125" cy="95" rx="4" ry="10" fill="{c}" transform="rotate(5 125 95)"/>
  <path d="M 85 130 Q 105 128, 125 130" stroke="{c}" stroke-width="2" fill="none" opacity="0.6"/>
  <path d="M 90 140 Q 110 138, 130 140" stroke="{c}" stroke-width="2" fill="none" opacity="0.6"/>
  <path d="M 85 150 Q 105 148, 125 150" stroke="{c}" stroke-width="2" fill="none" opacity="0.6"/>"#,
                c = color
            ),
            "shadowclan" => format!(
                r#"<path d="M 128 70 L 108 100 L 118 100 L 103 125 L 113 125 L 98 150 L 158 150 L 143 125 L 153 125 L 138 100 L 148 100 Z" fill="{c}"/>
  <path d="M 155 80 Q 165 85, 165 95 Q 165 105, 155 110 Q 160 105, 160 95 Q 160 85, 155 80 Z" fill="{c}" opacity="0.8"/>"#,
                c = color
            ),
            "skyclan" => format!(
                r#"<rect x="123" y="110" width="10" height="50" fill="{c}"/>
  <path d="M 128 110 L 108 90 M 128 120 L 148 100 M 128 130 L 108 115 M 128 140 L 148 125" stroke="{c}" stroke-width="4" stroke-linecap="round"/>
  <circle cx="115" cy="125" r="4" fill="{c}"/>
  <circle cx="108" cy="120" r="2" fill="{c}"/>
  <circle cx="110" cy="115" r="2" fill="{c}"/>
  <circle cx="115" cy="117" r="2" fill="{c}"/>"#,
                c = color
            ),
            "tribe" => format!(
                r#"<path d="M 128 65 L 88 160 L 168 160 Z" fill="{c}"/>
  <path d="M 128 65 L 113 95 L 143 95 Z" fill="white" opacity="0.8"/>
  <rect x="125" y="90" width="6" height="40" fill="white" opacity="0.6"/>
  <rect x="125" y="135" width="6" height="25" fill="{d}" opacity="0.4"/>
  <ellipse cx="128" cy="145" rx="15" ry="10" fill="{d}"/>"#,
                c = color,
                d = darker
            ),
            // Plain cat face for clans without a drawn symbol
            _ => format!(
                r#"<circle cx="128" cy="135" r="40" fill="{c}"/>
  <path d="M 94 115 L 100 75 L 124 100 Z" fill="{c}"/>
  <path d="M 162 115 L 156 75 L 132 100 Z" fill="{c}"/>
  <circle cx="114" cy="130" r="5" fill="white"/>
  <circle cx="142" cy="130" r="5" fill="white"/>"#,
                c = color
            ),
        }
    }
}

impl IconRenderer for SvgBadgeRenderer {
    fn render(&self, clan_id: &str, color: Color) -> Result<IconRef, IconError> {
        let darker = color.darker();
        let svg = format!(
            r#"<svg viewBox="0 0 256 256" xmlns="http://www.w3.org/2000/svg">
  <circle cx="128" cy="128" r="120" fill="{color}"/>
  <circle cx="128" cy="128" r="120" fill="none" stroke="{darker}" stroke-width="4"/>
  <circle cx="128" cy="128" r="100" fill="white"/>
  {symbol}
</svg>"#,
            color = color,
            darker = darker,
            symbol = Self::symbol(clan_id, color, darker),
        );
        IconRef::new(svg).ok_or_else(|| IconError::Empty(clan_id.to_string()))
    }
}

/// Reuses rendered icons per clan for a fixed time. Failures are not cached.
pub struct CachedIconRenderer<R> {
    inner: R,
    cache: Cache<ClanId, IconRef>,
}

impl<R: IconRenderer> CachedIconRenderer<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(MAX_CACHED_ICONS)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drops one clan's icon so the next render goes to the inner renderer.
    pub fn invalidate(&self, clan_id: &str) {
        self.cache.invalidate(clan_id);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<R: IconRenderer> IconRenderer for CachedIconRenderer<R> {
    fn render(&self, clan_id: &str, color: Color) -> Result<IconRef, IconError> {
        if let Some(icon) = self.cache.get(clan_id) {
            log::debug!("Icon cache hit for {}", clan_id);
            return Ok(icon);
        }
        let icon = self.inner.render(clan_id, color)?;
        self.cache.insert(clan_id.to_string(), icon.clone());
        Ok(icon)
    }
}
