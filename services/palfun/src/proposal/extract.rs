//! Tolerant extraction of the proposal record from completion text
//!
//! Model output is not guaranteed to be JSON. Extraction tries, in order:
//! 1. the text with code-fence markers removed
//! 2. the greedy first-`{` to last-`}` slice of the raw text
//!
//! Every step is total: failure yields `None`, never an error.

use regex::Regex;
use serde_json::{Map, Value};
use crate::proposal::types::{BetProposalResult, Confidence};

pub type JsonObject = Map<String, Value>;

/// Which step recovered the JSON object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    FenceStripped,
    BraceMatched,
}

/// Remove every "```json" and "```" marker, then trim.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Greedy slice from the first `{` to the last `}`.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Run the strategy chain and return the first JSON object recovered.
pub fn parse_lenient(content: &str) -> Option<(JsonObject, ExtractionStrategy)> {
    if let Some(map) = parse_object(&strip_code_fences(content)) {
        return Some((map, ExtractionStrategy::FenceStripped));
    }

    find_json_object(content)
        .and_then(parse_object)
        .map(|map| (map, ExtractionStrategy::BraceMatched))
}

/// First `http(s)://` run of non-whitespace in `text`, or "" when there is none.
///
/// Punctuation glued to the end of the URL is kept. A second scheme glued to
/// the first URL (`https://a,https://b`) ends the token so only one URL survives.
/// A bare scheme directly followed by another (`http://https://a`) is dropped
/// in favour of the inner URL.
pub fn extract_first_url(text: &str) -> String {
    lazy_static::lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"https?://\S+").unwrap();
        static ref SCHEME_RE: Regex = Regex::new(r"https?://").unwrap();
    }

    let Some(m) = URL_RE.find(text) else {
        return String::new();
    };
    let mut token = m.as_str();

    loop {
        let scheme_len = if token.starts_with("https") { 8 } else { 7 };
        let rest = &token[scheme_len..];

        match SCHEME_RE.find(rest) {
            Some(next) if next.start() == 0 => match URL_RE.find(rest) {
                Some(inner) => token = inner.as_str(),
                None => return String::new(),
            },
            Some(next) => return token[..scheme_len + next.start()].to_string(),
            None => return token.to_string(),
        }
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text_field(Some(item)))
            .collect::<Vec<_>>()
            .join(" "),
        Some(other) => other.to_string(),
    }
}

/// `false`, `0`, `""` and null count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn verification_url(map: &JsonObject) -> String {
    // "verification" is a key some models use instead of the requested one
    let candidate = ["verificationUrl", "verification"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|v| is_present(v));

    match candidate {
        Some(value) => extract_first_url(&text_field(Some(value))),
        None => String::new(),
    }
}

/// Map a recovered JSON object onto the result record, defaulting missing fields.
pub fn build_result(map: &JsonObject) -> BetProposalResult {
    BetProposalResult {
        statement: text_field(map.get("statement")),
        feasible: text_field(map.get("feasible")),
        confidence: map.get("confidence").map(Confidence::from_value).unwrap_or_default(),
        verification_url: verification_url(map),
    }
}

/// Full extraction from completion text; `None` means nothing parsable was found.
pub fn extract_proposal(content: &str) -> Option<BetProposalResult> {
    match parse_lenient(content) {
        Some((map, strategy)) => {
            tracing::debug!("Recovered proposal JSON via {:?}", strategy);
            Some(build_result(&map))
        }
        None => {
            tracing::warn!("No JSON object recovered from completion ({} chars)", content.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_first_url() {
        assert_eq!(extract_first_url("see https://a.example/b for details"), "https://a.example/b");
        assert_eq!(extract_first_url("http://x.test/one https://y.test/two"), "http://x.test/one");
        assert_eq!(extract_first_url("no link here"), "");
        assert_eq!(extract_first_url(""), "");
        assert_eq!(extract_first_url("ftp://files.example/x"), "");
        // trailing punctuation stays attached
        assert_eq!(extract_first_url("(source: https://a.example/b)."), "https://a.example/b).");
        assert_eq!(extract_first_url("https://a.example/b\nsecond line"), "https://a.example/b");
    }

    #[test]
    fn test_extract_first_url_never_keeps_two() {
        let url = extract_first_url("https://one.example/a,https://two.example/b and https://three.example");
        assert_eq!(url, "https://one.example/a,");

        let url = extract_first_url("http://one.example/ahttp://two.example");
        assert_eq!(url, "http://one.example/a");

        // a doubled scheme never leaves a host-less URL behind
        assert_eq!(extract_first_url("http://https://real.example/x"), "https://real.example/x");
        assert_eq!(extract_first_url("see https://http://a.example"), "http://a.example");
        assert_eq!(extract_first_url("https://http://"), "");

        for text in [
            "a https://x.example b https://y.example",
            "https://x.example|http://y.example|https://z.example",
            "```https://x.example```https://y.example",
            "http://https://http://z.example/p",
        ] {
            let url = extract_first_url(text);
            assert_eq!(url.matches("://").count(), 1, "{}", url);
            assert!(!url.chars().any(char::is_whitespace));
            assert!(!url.ends_with("://"), "{}", url);
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("plain"), "plain");
    }

    #[test]
    fn test_find_json_object() {
        assert_eq!(find_json_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(find_json_object("} before {"), None);
        assert_eq!(find_json_object("no braces"), None);
        assert_eq!(find_json_object("}{"), None);
        assert_eq!(find_json_object("{}"), Some("{}"));
    }

    #[test]
    fn test_reversed_braces_are_a_parse_failure() {
        assert!(parse_lenient("Use } as a closer, then { opens.").is_none());
        assert!(extract_proposal("} {").is_none());
    }

    #[test]
    fn test_clean_json_round_trip() {
        let content = r#"{"statement": "BTC closes above $100k on 2027-01-01", "feasible": "yes", "confidence": 85, "verificationUrl": "https://www.coingecko.com/en/coins/bitcoin"}"#;
        let (map, strategy) = parse_lenient(content).unwrap();
        assert_eq!(strategy, ExtractionStrategy::FenceStripped);

        let result = build_result(&map);
        assert_eq!(result.statement, "BTC closes above $100k on 2027-01-01");
        assert_eq!(result.feasible, "yes");
        assert_eq!(serde_json::to_value(&result.confidence).unwrap(), json!(85));
        assert_eq!(result.verification_url, "https://www.coingecko.com/en/coins/bitcoin");
    }

    #[test]
    fn test_fenced_matches_unwrapped() {
        let inner = r#"{"statement": "S", "feasible": "no", "confidence": 40, "verificationUrl": "https://data.example/x"}"#;
        let fenced = format!("```json\n{}\n```", inner);
        assert_eq!(extract_proposal(&fenced), extract_proposal(inner));
        assert!(extract_proposal(&fenced).is_some());
    }

    #[test]
    fn test_brace_recovery() {
        let content = r#"Here is the result: { "statement": "X", "feasible": "yes", "confidence": 80, "verificationUrl": "https://a.example/b" } Hope this helps!"#;
        let (_, strategy) = parse_lenient(content).unwrap();
        assert_eq!(strategy, ExtractionStrategy::BraceMatched);

        let result = extract_proposal(content).unwrap();
        assert_eq!(result.statement, "X");
        assert_eq!(result.feasible, "yes");
        assert_eq!(result.confidence.as_f64(), Some(80.0));
        assert_eq!(result.verification_url, "https://a.example/b");
    }

    #[test]
    fn test_total_parse_failure() {
        assert!(extract_proposal("I cannot help with that bet.").is_none());
        assert!(extract_proposal("").is_none());
        assert!(extract_proposal("{ not json at all }").is_none());
        // a JSON array is not a proposal
        assert!(extract_proposal("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_messy_verification_url() {
        let content = r#"{"statement": "S", "feasible": "yes", "confidence": 70, "verificationUrl": "Check [NOAA](https://www.noaa.gov/weather) or https://weather.gov for results"}"#;
        let result = extract_proposal(content).unwrap();
        assert_eq!(result.verification_url, "https://www.noaa.gov/weather)");

        let content = r#"{"statement": "S", "feasible": "yes", "verificationUrl": "official government site"}"#;
        let result = extract_proposal(content).unwrap();
        assert_eq!(result.verification_url, "");
        assert!(result.confidence.is_empty());
    }

    #[test]
    fn test_missing_fields_default() {
        let result = extract_proposal(r#"{"statement": "Only a statement"}"#).unwrap();
        assert_eq!(result.statement, "Only a statement");
        assert_eq!(result.feasible, "");
        assert!(result.confidence.is_empty());
        assert_eq!(result.verification_url, "");
    }

    #[test]
    fn test_verification_fallback_key() {
        let result = extract_proposal(r#"{"statement": "S", "verification": "see https://a.example/x now"}"#).unwrap();
        assert_eq!(result.verification_url, "https://a.example/x");

        let result = extract_proposal(r#"{"verificationUrl": "https://first.example", "verification": "https://second.example"}"#).unwrap();
        assert_eq!(result.verification_url, "https://first.example");

        for falsy in ["false", "0", "null", "\"\""] {
            let content = format!(r#"{{"verificationUrl": {}, "verification": "https://b.example/y"}}"#, falsy);
            let result = extract_proposal(&content).unwrap();
            assert_eq!(result.verification_url, "https://b.example/y", "{}", falsy);
        }

        let result = extract_proposal(r#"{"verificationUrl": true, "verification": "https://b.example/y"}"#).unwrap();
        assert_eq!(result.verification_url, "");
    }

    #[test]
    fn test_non_string_fields() {
        let result = extract_proposal(r#"{"statement": null, "feasible": true, "confidence": "90%", "verificationUrl": ["https://a.example/1", "https://b.example/2"]}"#).unwrap();
        assert_eq!(result.statement, "");
        assert_eq!(result.feasible, "true");
        assert_eq!(result.confidence, Confidence::Text("90%".to_string()));
        assert_eq!(result.verification_url, "https://a.example/1");
    }
}
