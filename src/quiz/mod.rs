pub mod clans;
pub mod data;
pub mod error;
pub mod icon;
pub mod result;
pub mod session;
pub mod shuffle;
pub mod tint;

pub use clans::{Clan, ClanId, Color};
pub use data::ReferenceData;
pub use error::{IconError, QuizError, ReferenceDataError};
pub use result::QuizResult;
pub use session::{QuizSession, Scores};
pub use tint::Tint;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub answers: Vec<Answer>,
}
impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answers,
        }
    }

    pub fn answer(&self, answer_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    pub clan_id: ClanId,
}
impl Answer {
    pub fn new(id: impl Into<String>, text: impl Into<String>, clan_id: impl Into<ClanId>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            clan_id: clan_id.into(),
        }
    }
}
