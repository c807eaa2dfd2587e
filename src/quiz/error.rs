/// Reference data failed its integrity checks. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("clan catalog is empty")]
    NoClans,

    #[error("clan '{0}' is listed more than once")]
    DuplicateClan(String),

    #[error("question bank is empty")]
    NoQuestions,

    #[error("question '{0}' is listed more than once")]
    DuplicateQuestion(String),

    #[error("question '{0}' has no answers")]
    QuestionWithoutAnswers(String),

    #[error("answer '{answer_id}' appears twice in question '{question_id}'")]
    DuplicateAnswer {
        question_id: String,
        answer_id: String,
    },

    #[error("answer '{answer_id}' of question '{question_id}' scores toward unknown clan '{clan_id}'")]
    UnknownClan {
        question_id: String,
        answer_id: String,
        clan_id: String,
    },

    #[error("malformed reference data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unable to read reference data: {0}")]
    Io(#[from] std::io::Error),
}

/// A call the session refused. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("the number of questions must be at least 1")]
    InvalidQuestionCount,

    #[error("question '{0}' is not part of this session")]
    UnknownQuestion(String),

    #[error("question '{question_id}' has no answer '{answer_id}'")]
    UnknownAnswer {
        question_id: String,
        answer_id: String,
    },

    #[error("the quiz is already complete")]
    SessionComplete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconError {
    #[error("renderer produced an empty icon for '{0}'")]
    Empty(String),

    #[error("icon rendering failed: {0}")]
    Backend(String),
}
