//! Prompt construction for question generation.

use crate::model::ChatMessage;
use crate::request::{QuestionType, QuizRequest};

/// System message sent ahead of every request.
pub const BASE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates quiz questions in strict JSON.";

/// Type-specific system message.
pub fn system_prompt(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => {
            "You are a helpful assistant that generates ONLY multiple-choice questions (MCQs) \
             in strict JSON format. Each question must have 4 options and a correct answer. \
             Do NOT include fill-in-the-blank questions."
        }
        QuestionType::FillInTheBlank => {
            "You are a helpful assistant that generates ONLY fill-in-the-blank questions \
             in strict JSON format. Do NOT include multiple-choice questions."
        }
    }
}

/// The user prompt: count, difficulty, retrieved context, rules and output shape.
pub fn user_prompt(request: &QuizRequest, context: &str) -> String {
    let n = request.num_questions;
    let difficulty = request.difficulty.label().to_lowercase();
    let question_type = request.question_type.label();

    format!(
        r#"Generate exactly {n} {difficulty}-level {question_type} questions based on the following context:

{context}

Rules:
- You MUST return EXACTLY {n} questions. Do NOT return more or fewer.
- If type is "MCQ", DO NOT use any blanks or underscores. Write full sentences and include 4 options.
- If type is "Fill-in-the-blank", use underscores (______) to represent missing words in the question.
- Use only DOUBLE QUOTES for JSON formatting.
- For MCQ, include an "options" list with EXACTLY 4 items, and an "answer" key with the correct one.
- For Fill-in-the-blank, include the correct word/phrase in "answer".

Return ONLY in this exact JSON format:
[
  {{
    "question": "...",
    "type": "{question_type}",
    "options": ["...","...","...","..."], // Only for MCQ
    "answer": "..."
  }}
]
"#
    )
}

/// The full transcript for one generation attempt.
pub fn build_messages(request: &QuizRequest, context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(BASE_SYSTEM_PROMPT),
        ChatMessage::system(system_prompt(request.question_type)),
        ChatMessage::user(user_prompt(request, context)),
    ]
}
