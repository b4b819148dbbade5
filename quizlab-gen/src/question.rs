//! Generated questions and tolerant parsing of model output.
//!
//! Models asked for "strict JSON" still wrap it in code fences, add a sentence
//! of preamble, echo the `// Only for MCQ` comment from the prompt, or drop the
//! comma before `"answer"`. [`parse_questions`] undoes those before handing the
//! text to `serde_json`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GenError, Result};

/// Placeholder for a question the model returned without an answer.
pub const MISSING_ANSWER: &str = "No answer provided";

/// Placeholder for a question entry with no question text.
pub const MISSING_QUESTION: &str = "No question provided";

static MISSING_COMMA_AFTER_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("type":\s*"(?:MCQ|Fill-in-the-blank)")\s*("answer":)"#).expect("valid regex")
});

static MISSING_COMMA_AFTER_OPTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("options":\s*\[[^\]]+\])\s*("answer":)"#).expect("valid regex")
});

static TRAILING_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)([\]",])[ \t]*//[^"\n]*$"#).expect("valid regex"));

/// One generated quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default = "missing_question")]
    pub question: String,
    /// `"MCQ"` or `"Fill-in-the-blank"`, as labelled by the model.
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default = "missing_answer")]
    pub answer: String,
}

impl Question {
    /// Whether this question should be rendered with lettered options.
    pub fn is_multiple_choice(&self) -> bool {
        self.question_type.eq_ignore_ascii_case("mcq") && self.options.is_some()
    }
}

fn missing_answer() -> String {
    MISSING_ANSWER.to_string()
}

fn missing_question() -> String {
    MISSING_QUESTION.to_string()
}

/// Strip `//` comments, then insert commas models commonly drop before `"answer"`.
pub fn repair_json(text: &str) -> String {
    let fixed = TRAILING_LINE_COMMENT.replace_all(text, "$1");
    let fixed = MISSING_COMMA_AFTER_TYPE.replace_all(&fixed, "$1, $2");
    MISSING_COMMA_AFTER_OPTIONS.replace_all(&fixed, "$1, $2").into_owned()
}

/// Pull the JSON payload out of a model reply.
///
/// Accepts a fenced code block (```` ```json ```` or bare ```` ``` ````) or
/// prose surrounding a single top-level array.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(inner) = extract_fenced(trimmed) {
        return inner.trim();
    }
    match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn extract_fenced(text: &str) -> Option<&str> {
    let start_markers = ["```json\n", "```json\r\n", "```JSON\n", "```\n", "```\r\n"];
    for marker in start_markers {
        if let Some(start_idx) = text.find(marker) {
            let content_start = start_idx + marker.len();
            if let Some(end_offset) = text[content_start..].find("```") {
                return Some(&text[content_start..content_start + end_offset]);
            }
        }
    }
    None
}

/// Parse a model reply into a non-empty question list.
///
/// # Errors
///
/// Returns [`GenError::MalformedResponse`] if the reply is not a JSON array
/// of question objects, or if the array is empty.
pub fn parse_questions(text: &str) -> Result<Vec<Question>> {
    let payload = repair_json(extract_json(text));

    let value: Value = serde_json::from_str(&payload)
        .map_err(|e| GenError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(GenError::MalformedResponse("expected a JSON array of questions".into()));
    };
    if items.is_empty() {
        return Err(GenError::MalformedResponse("question list is empty".into()));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| GenError::MalformedResponse(format!("question {}: {e}", i + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_inserts_missing_commas() {
        let broken = r#"{"question": "Q", "type": "MCQ" "answer": "A"}"#;
        assert_eq!(repair_json(broken), r#"{"question": "Q", "type": "MCQ", "answer": "A"}"#);

        let broken = r#"{"options": ["a", "b"]
            "answer": "a"}"#;
        assert_eq!(repair_json(broken), r#"{"options": ["a", "b"], "answer": "a"}"#);
    }

    #[test]
    fn repair_strips_prompt_comment() {
        let text = "{\"options\": [\"a\",\"b\"], // Only for MCQ\n\"answer\": \"a\"}";
        assert_eq!(repair_json(text), "{\"options\": [\"a\",\"b\"],\n\"answer\": \"a\"}");
    }

    #[test]
    fn repair_handles_comment_and_missing_comma_together() {
        let text = "{\"type\": \"MCQ\", \"options\": [\"a\",\"b\"] // Only for MCQ\n    \"answer\": \"a\"}";
        assert_eq!(
            repair_json(text),
            "{\"type\": \"MCQ\", \"options\": [\"a\",\"b\"], \"answer\": \"a\"}"
        );

        let reply = "[{\"question\": \"Pick one\", \"type\": \"MCQ\",\n    \"options\": [\"a\",\"b\",\"c\",\"d\"] // Only for MCQ\n    \"answer\": \"a\"}]";
        let questions = parse_questions(reply).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "a");
        assert_eq!(questions[0].options.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn repair_keeps_urls_inside_strings() {
        let text = r#"[{"question": "See http://example.com", "answer": "x"}]"#;
        assert_eq!(repair_json(text), text);
    }

    #[test]
    fn extract_handles_fences_and_preamble() {
        assert_eq!(extract_json("```json\n[1]\n```"), "[1]");
        assert_eq!(extract_json("Here you go:\n[{\"a\": 1}]\nEnjoy!"), "[{\"a\": 1}]");
        assert_eq!(extract_json("  [] "), "[]");
    }

    #[test]
    fn missing_answer_gets_placeholder() {
        let questions = parse_questions(
            r#"[{"question": "Capital of France?", "type": "MCQ", "options": ["Paris","Rome","Oslo","Bern"]}]"#,
        )
        .unwrap();
        assert_eq!(questions[0].answer, MISSING_ANSWER);
        assert!(questions[0].is_multiple_choice());
    }

    #[test]
    fn fill_in_the_blank_has_no_options() {
        let questions = parse_questions(
            r#"[{"question": "Water boils at ___ C.", "type": "Fill-in-the-blank", "answer": "100"}]"#,
        )
        .unwrap();
        assert_eq!(questions[0].options, None);
        assert!(!questions[0].is_multiple_choice());
    }

    #[test]
    fn empty_or_non_list_is_malformed() {
        assert!(matches!(parse_questions("[]"), Err(GenError::MalformedResponse(_))));
        assert!(matches!(
            parse_questions(r#"{"question": "Q"}"#),
            Err(GenError::MalformedResponse(_))
        ));
        assert!(matches!(parse_questions("not json"), Err(GenError::MalformedResponse(_))));
    }

    #[test]
    fn serialised_question_uses_type_key() {
        let question = Question {
            question: "Q".into(),
            question_type: "Fill-in-the-blank".into(),
            options: None,
            answer: "A".into(),
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "Fill-in-the-blank");
        assert!(json.get("options").is_none());
    }
}
