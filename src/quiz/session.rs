use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::quiz::result::{self, QuizResult};
use crate::quiz::shuffle::{draw_questions, shuffle_answers};
use crate::quiz::tint::{current_tint, Tint};
use crate::quiz::{Answer, Clan, ClanId, Question, QuizError, ReferenceData};

/// Points per clan, always kept in canonical catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scores {
    entries: Vec<(ClanId, u32)>,
}

impl Scores {
    pub fn zeroed(clans: &[Clan]) -> Self {
        Self::from_counts(clans.iter().map(|clan| (clan.id.clone(), 0)))
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (ClanId, u32)>) -> Self {
        Self {
            entries: counts.into_iter().collect(),
        }
    }

    pub fn get(&self, clan_id: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(id, _)| id == clan_id)
            .map(|(_, score)| *score)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, score)| score).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(id, score)| (id.as_str(), *score))
    }

    /// Highest score; among equal scores, the clan listed first wins.
    pub fn leader(&self) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (id, score) in self.iter() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((id, score));
            }
        }
        best
    }

    /// Highest score among every clan except `leader`, or 0 if there is none.
    pub fn runner_up(&self, leader: &str) -> u32 {
        self.iter()
            .filter(|(id, _)| *id != leader)
            .map(|(_, score)| score)
            .max()
            .unwrap_or(0)
    }

    fn increment(&mut self, clan_id: &str) {
        if let Some((_, score)) = self.entries.iter_mut().find(|(id, _)| id == clan_id) {
            *score += 1;
        }
    }

    fn decrement(&mut self, clan_id: &str) {
        if let Some((_, score)) = self.entries.iter_mut().find(|(id, _)| id == clan_id) {
            *score = score.saturating_sub(1);
        }
    }
}

/// One user's run through the quiz.
///
/// The question draw and every answer shuffle are fixed when the session is
/// (re)initialized. Between initializations `position` only moves forward,
/// and the scores always sum to the number of answered questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    data: Arc<ReferenceData>,
    rng: StdRng,
    requested_count: usize,
    question_order: Vec<Question>,
    display_order: HashMap<String, Vec<Answer>>,
    position: usize,
    selections: HashMap<String, String>,
    scores: Scores,
    complete: bool,
}

impl QuizSession {
    pub fn new(data: Arc<ReferenceData>, requested_count: usize) -> Result<Self, QuizError> {
        Self::with_rng(data, requested_count, StdRng::from_entropy())
    }

    pub fn with_rng(
        data: Arc<ReferenceData>,
        requested_count: usize,
        rng: StdRng,
    ) -> Result<Self, QuizError> {
        let mut session = Self {
            data,
            rng,
            requested_count,
            question_order: Vec::new(),
            display_order: HashMap::new(),
            position: 0,
            selections: HashMap::new(),
            scores: Scores::default(),
            complete: false,
        };
        session.initialize(requested_count)?;
        Ok(session)
    }

    /// Replaces the whole session with a fresh draw of `requested_count` questions.
    pub fn initialize(&mut self, requested_count: usize) -> Result<(), QuizError> {
        if requested_count == 0 {
            log::warn!("Refusing to start a quiz with 0 questions");
            return Err(QuizError::InvalidQuestionCount);
        }
        self.requested_count = requested_count;
        self.redraw();
        Ok(())
    }

    /// Starts over with the same requested size, new draw, new shuffles, zero scores.
    pub fn reset(&mut self) {
        log::debug!("Resetting quiz session");
        self.redraw();
    }

    fn redraw(&mut self) {
        let question_order: Vec<Question> =
            draw_questions(self.data.question_bank(), self.requested_count, &mut self.rng)
                .into_iter()
                .cloned()
                .collect();
        let display_order: HashMap<String, Vec<Answer>> = question_order
            .iter()
            .map(|q| (q.id.clone(), shuffle_answers(&q.answers, &mut self.rng)))
            .collect();

        self.question_order = question_order;
        self.display_order = display_order;
        self.position = 0;
        self.selections.clear();
        self.scores = Scores::zeroed(self.data.clans());
        self.complete = false;

        log::debug!(
            "Drew {} of {} requested questions: {:?}",
            self.question_order.len(),
            self.requested_count,
            self.question_order.iter().map(|q| q.id.as_str()).collect::<Vec<_>>()
        );
    }

    /// Records `answer_id` for `question_id`, taking back the point of any
    /// earlier answer to the same question first.
    pub fn select_answer(&mut self, question_id: &str, answer_id: &str) -> Result<(), QuizError> {
        if self.complete {
            log::warn!("Ignoring answer '{}' after the quiz has completed", answer_id);
            return Err(QuizError::SessionComplete);
        }
        let question = self
            .question_order
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| QuizError::UnknownQuestion(question_id.to_string()))?;
        // Checked against the canonical answers, the display order is cosmetic
        let answer = question.answer(answer_id).ok_or_else(|| QuizError::UnknownAnswer {
            question_id: question_id.to_string(),
            answer_id: answer_id.to_string(),
        })?;

        if let Some(previous) = self
            .selections
            .get(question_id)
            .and_then(|previous_id| question.answer(previous_id))
        {
            self.scores.decrement(&previous.clan_id);
        }
        self.scores.increment(&answer.clan_id);
        log::debug!(
            "Question '{}' answered with '{}' (+1 {})",
            question_id,
            answer_id,
            answer.clan_id
        );
        self.selections
            .insert(question_id.to_string(), answer_id.to_string());
        Ok(())
    }

    /// Moves to the next question, or completes the quiz after the last one.
    /// Does nothing once complete.
    pub fn advance(&mut self) {
        if self.complete {
            return;
        }
        if self.position + 1 < self.question_order.len() {
            self.position += 1;
            log::debug!("Advanced to question {}", self.position + 1);
        } else {
            self.position = self.question_order.len();
            self.complete = true;
            log::debug!(
                "Quiz complete: {} of {} answered, scores {:?}",
                self.selections.len(),
                self.question_order.len(),
                self.scores
            );
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.complete {
            return None;
        }
        self.question_order.get(self.position)
    }

    /// The current question's answers in their fixed display order.
    pub fn current_display_answers(&self) -> &[Answer] {
        self.current_question()
            .map(|q| self.display_answers(&q.id))
            .unwrap_or(&[])
    }

    pub fn display_answers(&self, question_id: &str) -> &[Answer] {
        self.display_order
            .get(question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn progress_percent(&self) -> u32 {
        if self.complete {
            return 100;
        }
        let len = self.question_order.len();
        if len == 0 {
            return 0;
        }
        (100.0 * (self.position + 1) as f64 / len as f64).round() as u32
    }

    pub fn tint(&self) -> Option<Tint> {
        current_tint(&self.scores, self.answered_count() as u32)
    }

    pub fn result(&self) -> Option<QuizResult> {
        result::assemble(self)
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn len(&self) -> usize {
        self.question_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.question_order.is_empty()
    }

    pub fn requested_count(&self) -> usize {
        self.requested_count
    }

    pub fn question_order(&self) -> &[Question] {
        &self.question_order
    }

    pub fn selection(&self, question_id: &str) -> Option<&str> {
        self.selections.get(question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }
}
