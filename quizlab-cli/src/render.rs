//! Plain-text and JSON rendering of quizzes and passages.

use quizlab_gen::Question;
use quizlab_rag::RetrievedChunk;

/// Render questions as a numbered quiz with lettered MCQ options.
pub fn render_quiz_text(questions: &[Question]) -> String {
    let mut out = String::new();
    for (i, question) in questions.iter().enumerate() {
        out.push_str(&format!("Q{}: {}\n", i + 1, question.question));
        if question.is_multiple_choice() {
            for (letter, option) in ('a'..='z').zip(question.options.iter().flatten()) {
                out.push_str(&format!("   {letter}. {option}\n"));
            }
        }
        out.push_str(&format!("Answer: {}\n\n", question.answer));
    }
    out
}

pub fn render_quiz_json(questions: &[Question]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(questions)
}

/// Render retrieved passages nearest first, with their chunk position and distance.
pub fn render_passages(passages: &[RetrievedChunk]) -> String {
    let mut out = String::new();
    for (rank, passage) in passages.iter().enumerate() {
        out.push_str(&format!(
            "[{}] chunk {} (distance {:.4})\n{}\n\n",
            rank + 1,
            passage.index,
            passage.distance,
            passage.text
        ));
    }
    out
}
