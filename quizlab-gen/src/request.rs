//! Quiz generation parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Largest question count accepted in one request.
pub const MAX_QUESTIONS: usize = 100;

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Display label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(GenError::ConfigError(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            ))),
        }
    }
}

/// The kind of question to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    /// Multiple choice with four options.
    #[default]
    #[serde(rename = "MCQ")]
    Mcq,
    /// A sentence with a blank to fill in.
    #[serde(rename = "Fill-in-the-blank")]
    FillInTheBlank,
}

impl QuestionType {
    /// Label used in prompts and in the `type` field of generated questions.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mcq => "MCQ",
            Self::FillInTheBlank => "Fill-in-the-blank",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuestionType {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcq" | "multiple-choice" => Ok(Self::Mcq),
            "fill-in-the-blank" | "fill-in-blank" | "blank" => Ok(Self::FillInTheBlank),
            other => Err(GenError::ConfigError(format!(
                "unknown question type '{other}' (expected mcq or fill-in-the-blank)"
            ))),
        }
    }
}

/// What to generate: how many questions, how hard, and of which type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub num_questions: usize,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self { num_questions: 5, difficulty: Difficulty::Medium, question_type: QuestionType::Mcq }
    }
}

impl QuizRequest {
    pub fn new(num_questions: usize, difficulty: Difficulty, question_type: QuestionType) -> Self {
        Self { num_questions, difficulty, question_type }
    }

    /// # Errors
    ///
    /// Returns [`GenError::ConfigError`] unless `1 <= num_questions <= 100`.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(GenError::ConfigError(format!(
                "num_questions must be between 1 and {MAX_QUESTIONS}, got {}",
                self.num_questions
            )));
        }
        Ok(())
    }

    /// The query used to pick passages from the document.
    pub fn retrieval_query(&self) -> String {
        format!(
            "Generate {} {} questions of {} difficulty",
            self.num_questions, self.question_type, self.difficulty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrieval_query_names_all_parameters() {
        let request = QuizRequest::new(4, Difficulty::Hard, QuestionType::FillInTheBlank);
        assert_eq!(
            request.retrieval_query(),
            "Generate 4 Fill-in-the-blank questions of Hard difficulty"
        );
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Mcq".parse::<QuestionType>().unwrap(), QuestionType::Mcq);
        assert_eq!(
            "Fill-in-the-blank".parse::<QuestionType>().unwrap(),
            QuestionType::FillInTheBlank
        );
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn question_count_is_bounded() {
        assert!(QuizRequest::default().validate().is_ok());
        assert!(QuizRequest::new(0, Difficulty::Easy, QuestionType::Mcq).validate().is_err());
        assert!(QuizRequest::new(100, Difficulty::Easy, QuestionType::Mcq).validate().is_ok());
        assert!(QuizRequest::new(101, Difficulty::Easy, QuestionType::Mcq).validate().is_err());
    }

    #[test]
    fn question_type_serialises_with_display_labels() {
        assert_eq!(serde_json::to_string(&QuestionType::Mcq).unwrap(), "\"MCQ\"");
        assert_eq!(
            serde_json::to_string(&QuestionType::FillInTheBlank).unwrap(),
            "\"Fill-in-the-blank\""
        );
    }
}
