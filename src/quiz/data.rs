use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::quiz::{Clan, Question, ReferenceDataError};

const BUILTIN_CLANS: &str = include_str!("../../data/clans.json");
const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.json");

/// The clan catalog and the question bank, checked once when loaded and
/// read-only afterwards. Sessions share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    clans: Vec<Clan>,
    questions: Vec<Question>,
}

impl ReferenceData {
    /// Builds the tables, refusing them as a whole if any integrity check fails.
    pub fn new(clans: Vec<Clan>, questions: Vec<Question>) -> Result<Self, ReferenceDataError> {
        if clans.is_empty() {
            return Err(ReferenceDataError::NoClans);
        }
        let mut clan_ids = HashSet::new();
        for clan in &clans {
            if !clan_ids.insert(clan.id.as_str()) {
                return Err(ReferenceDataError::DuplicateClan(clan.id.clone()));
            }
        }

        if questions.is_empty() {
            return Err(ReferenceDataError::NoQuestions);
        }
        let mut question_ids = HashSet::new();
        for question in &questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(ReferenceDataError::DuplicateQuestion(question.id.clone()));
            }
            if question.answers.is_empty() {
                return Err(ReferenceDataError::QuestionWithoutAnswers(question.id.clone()));
            }

            let mut answer_ids = HashSet::new();
            for answer in &question.answers {
                if !answer_ids.insert(answer.id.as_str()) {
                    return Err(ReferenceDataError::DuplicateAnswer {
                        question_id: question.id.clone(),
                        answer_id: answer.id.clone(),
                    });
                }
                if !clan_ids.contains(answer.clan_id.as_str()) {
                    return Err(ReferenceDataError::UnknownClan {
                        question_id: question.id.clone(),
                        answer_id: answer.id.clone(),
                        clan_id: answer.clan_id.clone(),
                    });
                }
            }
        }

        Ok(Self { clans, questions })
    }

    /// Parses both tables from JSON arrays and validates them.
    pub fn from_json<C: Read, Q: Read>(clans: C, questions: Q) -> Result<Self, ReferenceDataError> {
        let clans: Vec<Clan> = serde_json::from_reader(clans)?;
        let questions: Vec<Question> = serde_json::from_reader(questions)?;
        Self::new(clans, questions)
    }

    pub fn from_files(
        clans_path: impl AsRef<Path>,
        questions_path: impl AsRef<Path>,
    ) -> Result<Self, ReferenceDataError> {
        let clans = BufReader::new(File::open(clans_path)?);
        let questions = BufReader::new(File::open(questions_path)?);
        Self::from_json(clans, questions)
    }

    /// The Warriors clans and questions bundled with the bot.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Self::from_json(BUILTIN_CLANS.as_bytes(), BUILTIN_QUESTIONS.as_bytes())
    }

    /// Clans in canonical order. Ties are always broken by this order.
    pub fn clans(&self) -> &[Clan] {
        &self.clans
    }

    pub fn clan_by_id(&self, id: &str) -> Option<&Clan> {
        self.clans.iter().find(|clan| clan.id == id)
    }

    pub fn clan_index(&self, id: &str) -> Option<usize> {
        self.clans.iter().position(|clan| clan.id == id)
    }

    pub fn question_bank(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_by_id(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::quiz::{Answer, Color};

    pub(crate) fn clan(id: &str) -> Clan {
        Clan {
            id: id.to_string(),
            name: id.to_uppercase(),
            traits: vec!["Brave".to_string()],
            characteristics: vec!["Loyal".to_string()],
            color: Color::new(0x05, 0x96, 0x69),
            emoji: String::new(),
            description: format!("{} cats", id),
        }
    }

    /// Three clans and the three-question bank used across the session tests.
    pub(crate) fn small_data() -> ReferenceData {
        ReferenceData::new(
            vec![clan("a"), clan("b"), clan("c")],
            vec![
                Question::new(
                    "q1",
                    "First?",
                    vec![Answer::new("q1a", "Forest", "a"), Answer::new("q1b", "Moor", "b")],
                ),
                Question::new(
                    "q2",
                    "Second?",
                    vec![Answer::new("q2a", "Fight", "a"), Answer::new("q2c", "Hide", "c")],
                ),
                Question::new(
                    "q3",
                    "Third?",
                    vec![Answer::new("q3b", "Run", "b"), Answer::new("q3b2", "Sprint", "b")],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builtin_tables_are_valid() {
        let data = ReferenceData::builtin().unwrap();
        assert_eq!(data.clans().len(), 6);
        assert_eq!(data.question_bank().len(), 11);
        assert_eq!(data.clans()[0].id, "thunderclan");
        assert_eq!(data.clan_by_id("tribe").unwrap().name, "Tribe of Rushing Water");
        assert_eq!(data.clan_by_id("riverclan").unwrap().color, Color::new(0x02, 0x84, 0xC7));
    }

    #[test]
    fn lookups_report_missing_ids() {
        let data = small_data();
        assert!(data.clan_by_id("starclan").is_none());
        assert_eq!(data.clan_index("c"), Some(2));
        assert!(data.question_by_id("q9").is_none());
        assert_eq!(data.question_by_id("q2").unwrap().answers.len(), 2);
    }

    #[test]
    fn rejects_empty_tables() {
        let questions = vec![Question::new("q", "?", vec![Answer::new("x", "X", "a")])];
        assert!(matches!(
            ReferenceData::new(vec![], questions),
            Err(ReferenceDataError::NoClans)
        ));
        assert!(matches!(
            ReferenceData::new(vec![clan("a")], vec![]),
            Err(ReferenceDataError::NoQuestions)
        ));
    }

    #[test]
    fn rejects_answer_for_unknown_clan() {
        let questions = vec![Question::new("q", "?", vec![Answer::new("x", "X", "starclan")])];
        match ReferenceData::new(vec![clan("a")], questions) {
            Err(ReferenceDataError::UnknownClan { clan_id, .. }) => assert_eq!(clan_id, "starclan"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicates_and_empty_questions() {
        let dup_answers = vec![Question::new(
            "q",
            "?",
            vec![Answer::new("x", "X", "a"), Answer::new("x", "Y", "a")],
        )];
        assert!(matches!(
            ReferenceData::new(vec![clan("a")], dup_answers),
            Err(ReferenceDataError::DuplicateAnswer { .. })
        ));

        let no_answers = vec![Question::new("q", "?", vec![])];
        assert!(matches!(
            ReferenceData::new(vec![clan("a")], no_answers),
            Err(ReferenceDataError::QuestionWithoutAnswers(_))
        ));

        let questions = vec![Question::new("q", "?", vec![Answer::new("x", "X", "a")])];
        assert!(matches!(
            ReferenceData::new(vec![clan("a"), clan("a")], questions.clone()),
            Err(ReferenceDataError::DuplicateClan(_))
        ));
        assert!(matches!(
            ReferenceData::new(vec![clan("a")], vec![questions[0].clone(), questions[0].clone()]),
            Err(ReferenceDataError::DuplicateQuestion(_))
        ));
    }

    #[test]
    fn answer_ids_may_repeat_across_questions() {
        let questions = vec![
            Question::new("q1", "?", vec![Answer::new("yes", "Yes", "a")]),
            Question::new("q2", "?", vec![Answer::new("yes", "Yes", "a")]),
        ];
        assert!(ReferenceData::new(vec![clan("a")], questions).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = ReferenceData::from_json("[{\"id\": 1}]".as_bytes(), "[]".as_bytes());
        assert!(matches!(result, Err(ReferenceDataError::Parse(_))));
    }
}
