use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{Answer, Question};

/// A uniformly shuffled selection of `min(count, bank.len())` distinct questions.
pub fn draw_questions<'a, R: Rng + ?Sized>(
    bank: &'a [Question],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Question> {
    let mut drawn: Vec<&Question> = bank.iter().collect();
    drawn.shuffle(rng);
    drawn.truncate(count.min(bank.len()));
    drawn
}

/// Display order for one question's answers. Computed once per session.
pub fn shuffle_answers<R: Rng + ?Sized>(answers: &[Answer], rng: &mut R) -> Vec<Answer> {
    let mut shuffled = answers.to_vec();
    shuffled.shuffle(rng);
    shuffled
}
