use std::collections::HashSet;
use std::sync::Arc;

use clan_quiz_bot::quiz::icon::{IconRenderer, SvgBadgeRenderer};
use clan_quiz_bot::quiz::{Answer, Clan, Color, Question, QuizSession, ReferenceData};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn clan(id: &str, color: &str) -> Clan {
    Clan {
        id: id.to_string(),
        name: id.to_string(),
        traits: vec![],
        characteristics: vec![],
        color: Color::parse_hex(color).unwrap(),
        emoji: String::new(),
        description: String::new(),
    }
}

fn three_question_data() -> Arc<ReferenceData> {
    let data = ReferenceData::new(
        vec![
            clan("ClanA", "#059669"),
            clan("ClanB", "#0284C7"),
            clan("ClanC", "#EAB308"),
        ],
        vec![
            Question::new(
                "Q1",
                "Where do you sleep?",
                vec![
                    Answer::new("q1-a", "Den", "ClanA"),
                    Answer::new("q1-b", "Burrow", "ClanB"),
                ],
            ),
            Question::new(
                "Q2",
                "What do you hunt?",
                vec![
                    Answer::new("q2-a", "Squirrel", "ClanA"),
                    Answer::new("q2-c", "Frog", "ClanC"),
                ],
            ),
            Question::new(
                "Q3",
                "How do you travel?",
                vec![
                    Answer::new("q3-b", "Run", "ClanB"),
                    Answer::new("q3-b2", "Dash", "ClanB"),
                ],
            ),
        ],
    )
    .unwrap();
    Arc::new(data)
}

fn drawn_ids(session: &QuizSession) -> HashSet<String> {
    session.question_order().iter().map(|q| q.id.clone()).collect()
}

#[test]
fn full_quiz_picks_the_majority_clan() {
    let mut session =
        QuizSession::with_rng(three_question_data(), 3, StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(session.len(), 3);
    assert_eq!(
        drawn_ids(&session),
        ["Q1", "Q2", "Q3"].iter().map(|id| id.to_string()).collect::<HashSet<_>>()
    );

    session.select_answer("Q1", "q1-a").unwrap();
    session.select_answer("Q2", "q2-a").unwrap();
    session.select_answer("Q3", "q3-b").unwrap();
    for _ in 0..3 {
        session.advance();
    }

    assert!(session.is_complete());
    let scores = session.scores();
    assert_eq!(scores.get("ClanA"), Some(2));
    assert_eq!(scores.get("ClanB"), Some(1));
    assert_eq!(scores.get("ClanC"), Some(0));

    let result = session.result().unwrap();
    assert_eq!(result.winning_clan.id, "ClanA");
    assert_eq!(result.total_questions, 3);

    let badge = SvgBadgeRenderer
        .render(&result.winning_clan.id, result.winning_clan.color)
        .unwrap();
    assert!(badge.as_str().contains("#059669"));
}

#[test]
fn answering_while_walking_the_questions() {
    let mut session =
        QuizSession::with_rng(three_question_data(), 3, StdRng::seed_from_u64(99)).unwrap();

    while let Some(question) = session.current_question().cloned() {
        let shown = session.current_display_answers().to_vec();
        assert_eq!(shown.len(), question.answers.len());
        session.select_answer(&question.id, &shown[0].id).unwrap();
        assert!(session.tint().is_some());
        session.advance();
    }

    assert!(session.is_complete());
    assert_eq!(session.progress_percent(), 100);
    assert_eq!(session.scores().total(), 3);
    assert!(session.result().is_some());
}

#[test]
fn reset_after_completion_starts_over() {
    let mut session =
        QuizSession::with_rng(three_question_data(), 2, StdRng::seed_from_u64(7)).unwrap();
    let first = session.question_order()[0].clone();
    session.select_answer(&first.id, &first.answers[0].id).unwrap();
    session.advance();
    session.advance();
    assert!(session.is_complete());

    session.reset();
    assert!(!session.is_complete());
    assert_eq!(session.position(), 0);
    assert_eq!(session.answered_count(), 0);
    assert!(session.scores().iter().all(|(_, score)| score == 0));
    assert_eq!(session.len(), 2);
    assert_eq!(drawn_ids(&session).len(), 2);
    assert!(session.current_question().is_some());
}

#[test]
fn builtin_quiz_runs_to_a_result() {
    let data = Arc::new(ReferenceData::builtin().unwrap());
    let mut session = QuizSession::with_rng(data, 10, StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(session.len(), 10);

    while let Some(question) = session.current_question().cloned() {
        let pick = question
            .answers
            .iter()
            .find(|answer| answer.clan_id == "riverclan")
            .unwrap();
        session.select_answer(&question.id, &pick.id).unwrap();
        session.advance();
    }

    let result = session.result().unwrap();
    assert_eq!(result.winning_clan.id, "riverclan");
    assert_eq!(result.match_percent(), 100);
}
