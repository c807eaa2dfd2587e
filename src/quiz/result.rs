use crate::quiz::{Clan, QuizSession, ReferenceData, Scores};

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub winning_clan: Clan,
    /// Snapshot taken when the result was assembled.
    pub scores: Scores,
    pub total_questions: usize,
}

/// One row of the final score breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ClanStanding<'a> {
    pub clan: &'a Clan,
    pub score: u32,
    pub percent: u32,
}

/// The clan with the highest score. Equal scores, including all zeros,
/// go to whichever clan comes first in the catalog.
pub fn winner<'a>(scores: &Scores, data: &'a ReferenceData) -> Option<&'a Clan> {
    let mut best: Option<(&Clan, u32)> = None;
    for clan in data.clans() {
        let score = scores.get(&clan.id).unwrap_or(0);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((clan, score));
        }
    }
    best.map(|(clan, _)| clan)
}

pub(crate) fn assemble(session: &QuizSession) -> Option<QuizResult> {
    if !session.is_complete() {
        return None;
    }
    let scores = session.scores().clone();
    let winning_clan = winner(&scores, session.data())?.clone();
    log::debug!("Winning clan: {}", winning_clan.id);

    Some(QuizResult {
        winning_clan,
        scores,
        total_questions: session.len(),
    })
}

fn percent_of(score: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(score) / total as f64).round() as u32
}

impl QuizResult {
    pub fn winning_score(&self) -> u32 {
        self.scores.get(&self.winning_clan.id).unwrap_or(0)
    }

    pub fn match_percent(&self) -> u32 {
        percent_of(self.winning_score(), self.total_questions)
    }

    /// Every clan with its score, highest first; equal scores keep catalog order.
    pub fn breakdown<'a>(&self, data: &'a ReferenceData) -> Vec<ClanStanding<'a>> {
        let mut standings: Vec<ClanStanding> = data
            .clans()
            .iter()
            .map(|clan| {
                let score = self.scores.get(&clan.id).unwrap_or(0);
                ClanStanding {
                    clan,
                    score,
                    percent: percent_of(score, self.total_questions),
                }
            })
            .collect();
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }

    pub fn share_text(&self) -> String {
        format!(
            "I just took the Warriors Clan Quiz and got {}! Take the quiz to find your clan.",
            self.winning_clan.name
        )
    }
}
