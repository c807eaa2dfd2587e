use crate::quiz::{ClanId, Color, ReferenceData, Scores};

pub const BASE_INTENSITY: f64 = 0.10;
pub const MAX_INTENSITY: f64 = 0.25;

/// Live background hint: which clan is ahead, and how clearly.
#[derive(Debug, Clone, PartialEq)]
pub struct Tint {
    pub clan_id: ClanId,
    pub intensity: f64,
}

impl Tint {
    /// The leading clan's color mixed into white. Unknown clans fall back to white.
    pub fn background(&self, data: &ReferenceData) -> Color {
        data.clan_by_id(&self.clan_id)
            .map_or(Color::WHITE, |clan| clan.color.blend_with_white(self.intensity))
    }
}

/// Recomputed from scratch on every call; nothing is carried between calls.
pub fn current_tint(scores: &Scores, total_answered: u32) -> Option<Tint> {
    if total_answered == 0 {
        return None;
    }
    let (leader, max) = scores.leader()?;
    if max == 0 {
        return None;
    }

    let lead = max.saturating_sub(scores.runner_up(leader));
    let confidence = f64::from(lead) / f64::from(total_answered);
    let intensity = BASE_INTENSITY + confidence * (MAX_INTENSITY - BASE_INTENSITY);

    Some(Tint {
        clan_id: leader.to_string(),
        intensity: intensity.clamp(BASE_INTENSITY, MAX_INTENSITY),
    })
}

pub fn background_color(tint: Option<&Tint>, data: &ReferenceData) -> Color {
    tint.map_or(Color::WHITE, |tint| tint.background(data))
}
