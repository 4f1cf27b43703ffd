//! # Response Normalization
//!
//! The backend's answer payloads are loosely typed: an answer may be a bare
//! string, an object with `answer_text`, an object with `answer`, and
//! references come with whichever field names the retriever felt like. This
//! module turns any of those into display records.
//!
//! Every field is resolved with an explicit, ordered preference list. When
//! none of the fields is a string the value is shown as a compact JSON dump,
//! capped so one odd payload can't flood the screen.
//!
//! All functions here are total: they never fail and always return text
//! (empty text is a valid result for optional fields).

use serde_json::{Map, Value};

pub const ANSWER_FIELDS: &[&str] = &["answer_text", "text", "answer"];
pub const QUESTION_FIELDS: &[&str] = &["text", "question"];
pub const REFERENCE_TITLE_FIELDS: &[&str] = &["title", "name", "document_title"];
pub const REFERENCE_TEXT_FIELDS: &[&str] = &["text", "content", "snippet", "excerpt", "answer_text"];

pub const ANSWER_DUMP_LIMIT: usize = 1000;
pub const QUESTION_DUMP_LIMIT: usize = 500;
pub const LABEL_DUMP_LIMIT: usize = 120;
pub const ELLIPSIS: char = '…';

/// Shown when the backend answered with nothing displayable.
pub const NO_ANSWER: &str = "No answer.";

/// A labeled excerpt of source material returned with an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub title: String,
    pub text: Option<String>,
}

/// An answer payload reduced to what the Q&A panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer {
    pub answer: String,
    pub references: Vec<Reference>,
}

/// Normalize a full `/qa/` response.
///
/// The answer is looked up in `answer_text`, then `answer`, then the
/// response itself, and run through [`answer_text`]. References come from
/// the `references` array when there is one.
pub fn normalize_answer(response: &Value) -> NormalizedAnswer {
    let source = present(response.get("answer_text"))
        .or_else(|| present(response.get("answer")))
        .unwrap_or(response);

    let answer = answer_text(source).trim().to_string();
    let answer = if answer.is_empty() {
        NO_ANSWER.to_string()
    } else {
        answer
    };

    let references = response
        .get("references")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .enumerate()
                .map(|(i, r)| reference(r, i))
                .collect()
        })
        .unwrap_or_default();

    NormalizedAnswer { answer, references }
}

/// Displayable answer text: `answer_text`, `text`, `answer`, then a dump
/// capped at [`ANSWER_DUMP_LIMIT`] characters.
pub fn answer_text(value: &Value) -> String {
    display_text(value, ANSWER_FIELDS, ANSWER_DUMP_LIMIT)
}

/// Displayable question text: `text`, `question`, then a dump capped at
/// [`QUESTION_DUMP_LIMIT`] characters.
pub fn question_text(value: &Value) -> String {
    display_text(value, QUESTION_FIELDS, QUESTION_DUMP_LIMIT)
}

/// Short single-value label for list rows and record fields.
///
/// Scalars print as themselves and `null` is empty. An object carrying a
/// `question` shows that field. Anything else is a dump capped at
/// [`LABEL_DUMP_LIMIT`] characters.
pub fn label_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Object(map) => match map.get("question") {
            Some(Value::Null) => String::new(),
            Some(question) => truncate_chars(&scalar_text(question), LABEL_DUMP_LIMIT),
            None => truncate_chars(&value.to_string(), LABEL_DUMP_LIMIT),
        },
        Value::Array(_) => truncate_chars(&value.to_string(), LABEL_DUMP_LIMIT),
    }
}

/// Normalize one entry of a `references` array. `position` is zero-based.
///
/// Objects without a label get `Reference {n}`, where `n` is their
/// `chunk_index` when they carry one and their 1-based position otherwise.
pub fn reference(value: &Value, position: usize) -> Reference {
    match value {
        Value::Object(map) => {
            let title = first_string(map, REFERENCE_TITLE_FIELDS)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    let n = present(map.get("chunk_index"))
                        .map(scalar_text)
                        .unwrap_or_else(|| (position + 1).to_string());
                    format!("Reference {n}")
                });
            let text = first_string(map, REFERENCE_TEXT_FIELDS).map(str::to_string);
            Reference { title, text }
        }
        Value::Null => Reference {
            title: placeholder(position),
            text: None,
        },
        other => Reference {
            title: placeholder(position),
            text: Some(answer_text(other)),
        },
    }
}

/// The `message` of a health payload. A plain text body is shown as is;
/// `"OK"` when there is neither.
pub fn health_message(value: &Value) -> String {
    let text = match value {
        Value::String(body) => Some(body.as_str()),
        other => other.get("message").and_then(Value::as_str),
    };
    text.map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("OK")
        .to_string()
}

/// Cut `text` to at most `limit` characters, appending `…` when shortened.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => {
            let mut out = text[..idx].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}

fn display_text(value: &Value, fields: &[&str], limit: usize) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Object(map) => first_string(map, fields)
            .map(str::to_string)
            .unwrap_or_else(|| truncate_chars(&value.to_string(), limit)),
        Value::Array(_) => truncate_chars(&value.to_string(), limit),
    }
}

fn first_string<'a>(map: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_str))
}

/// `Some` only for values that are present and not null.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn placeholder(position: usize) -> String {
    format!("Reference {}", position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_text_field_order() {
        assert_eq!(
            answer_text(&json!({"answer_text": "a", "text": "b", "answer": "c"})),
            "a"
        );
        assert_eq!(answer_text(&json!({"text": "b", "answer": "c"})), "b");
        assert_eq!(answer_text(&json!({"answer": "c"})), "c");
    }

    #[test]
    fn test_answer_text_skips_non_string_fields() {
        assert_eq!(
            answer_text(&json!({"answer_text": {"nested": true}, "answer": "plain"})),
            "plain"
        );
    }

    #[test]
    fn test_answer_text_scalars() {
        assert_eq!(answer_text(&Value::Null), "");
        assert_eq!(answer_text(&json!("hello")), "hello");
        assert_eq!(answer_text(&json!(42)), "42");
        assert_eq!(answer_text(&json!(true)), "true");
    }

    #[test]
    fn test_answer_text_dumps_unknown_objects() {
        assert_eq!(answer_text(&json!({"score": 1})), "{\"score\":1}");
        assert_eq!(answer_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_answer_text_is_bounded() {
        let big: Vec<Value> = (0..2000).map(|i| json!({"k": i})).collect();
        let samples = vec![
            json!(big),
            json!({"payload": "x".repeat(5000)}),
            json!({"answer_text": null, "items": big}),
            Value::Null,
            json!("short"),
        ];
        for sample in &samples {
            let text = answer_text(sample);
            assert!(text.chars().count() <= ANSWER_DUMP_LIMIT + 1);
        }

        let dumped = answer_text(&json!({"payload": "x".repeat(5000)}));
        assert_eq!(dumped.chars().count(), ANSWER_DUMP_LIMIT + 1);
        assert!(dumped.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_answer_strings_are_never_cut() {
        let long = "y".repeat(ANSWER_DUMP_LIMIT * 3);
        assert_eq!(answer_text(&json!(long)), long);
        assert_eq!(answer_text(&json!({"answer_text": long})), long);
        assert_eq!(normalize_answer(&json!({"answer_text": long})).answer, long);
        assert_eq!(normalize_answer(&json!(long)).answer, long);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(label_text(&Value::Null), "");
        assert_eq!(label_text(&json!("Handbook")), "Handbook");
        assert_eq!(label_text(&json!(7)), "7");
        assert_eq!(label_text(&json!({"question": "Why?"})), "Why?");
        assert_eq!(label_text(&json!({"question": null})), "");
        assert_eq!(label_text(&json!(["a", "b"])), "[\"a\",\"b\"]");

        let dumped = label_text(&json!({"blob": "z".repeat(400)}));
        assert_eq!(dumped.chars().count(), LABEL_DUMP_LIMIT + 1);
        assert!(dumped.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_question_text() {
        assert_eq!(question_text(&json!("What?")), "What?");
        assert_eq!(question_text(&json!({"text": "t", "question": "q"})), "t");
        assert_eq!(question_text(&json!({"question": "q"})), "q");
        let dumped = question_text(&json!({"blob": "y".repeat(900)}));
        assert_eq!(dumped.chars().count(), QUESTION_DUMP_LIMIT + 1);
    }

    #[test]
    fn test_normalize_answer_pto_example() {
        let response = json!({
            "answer_text": "15 days",
            "references": [{"title": "HR Doc", "text": "..."}]
        });
        let normalized = normalize_answer(&response);
        assert_eq!(normalized.answer, "15 days");
        assert_eq!(
            normalized.references,
            vec![Reference {
                title: "HR Doc".to_string(),
                text: Some("...".to_string()),
            }]
        );
    }

    #[test]
    fn test_normalize_answer_prefers_answer_text_over_answer() {
        let normalized = normalize_answer(&json!({"answer": "second", "answer_text": "first"}));
        assert_eq!(normalized.answer, "first");
    }

    #[test]
    fn test_normalize_answer_nested_answer_object() {
        let normalized = normalize_answer(&json!({"answer": {"text": "  nested  "}}));
        assert_eq!(normalized.answer, "nested");
    }

    #[test]
    fn test_normalize_answer_null_answer_text_falls_through() {
        let normalized = normalize_answer(&json!({"answer_text": null, "answer": "fallback"}));
        assert_eq!(normalized.answer, "fallback");
    }

    #[test]
    fn test_normalize_answer_bare_string_and_empty() {
        assert_eq!(normalize_answer(&json!("Plain text body")).answer, "Plain text body");
        assert_eq!(normalize_answer(&json!("   ")).answer, NO_ANSWER);
        assert_eq!(normalize_answer(&Value::Null).answer, NO_ANSWER);
    }

    #[test]
    fn test_normalize_answer_ignores_non_array_references() {
        let normalized = normalize_answer(&json!({"answer": "x", "references": {"title": "t"}}));
        assert!(normalized.references.is_empty());
    }

    #[test]
    fn test_reference_fallback_fields() {
        let r = reference(&json!({"name": "Doc A", "content": "snippet"}), 0);
        assert_eq!(r.title, "Doc A");
        assert_eq!(r.text.as_deref(), Some("snippet"));

        let r = reference(&json!({"document_title": "Doc B", "excerpt": "e"}), 0);
        assert_eq!(r.title, "Doc B");
        assert_eq!(r.text.as_deref(), Some("e"));

        let r = reference(&json!({"title": "T", "answer_text": "from answer"}), 0);
        assert_eq!(r.text.as_deref(), Some("from answer"));
    }

    #[test]
    fn test_reference_placeholder_titles() {
        assert_eq!(reference(&json!({"text": "t"}), 2).title, "Reference 3");
        assert_eq!(reference(&json!({"chunk_index": 7}), 0).title, "Reference 7");
        assert_eq!(reference(&json!({"title": 5}), 1).title, "Reference 2");

        let r = reference(&json!("raw snippet"), 0);
        assert_eq!(r.title, "Reference 1");
        assert_eq!(r.text.as_deref(), Some("raw snippet"));

        let r = reference(&Value::Null, 4);
        assert_eq!(r.title, "Reference 5");
        assert_eq!(r.text, None);
    }

    #[test]
    fn test_reference_without_text_fields() {
        assert_eq!(reference(&json!({"title": "Only title", "score": 0.9}), 0).text, None);
    }

    #[test]
    fn test_health_message() {
        assert_eq!(health_message(&json!({"message": "Healthy"})), "Healthy");
        assert_eq!(health_message(&json!({"status": "ok"})), "OK");
        assert_eq!(health_message(&json!("pong")), "pong");
        assert_eq!(health_message(&json!("  up \n")), "up");
        assert_eq!(health_message(&json!("   ")), "OK");
        assert_eq!(health_message(&json!({"message": 3})), "OK");
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo", 2), "hé…");
        assert_eq!(truncate_chars("", 0), "");
    }
}
