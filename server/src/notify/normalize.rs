//! Payload Normalization
//!
//! Turns an arbitrary inbound byte payload into display text that is safe
//! to embed in an outbound Markdown message. Senders are untrusted: bodies
//! may be non-UTF8, control-character-laden, structured data that deserves
//! pretty-printing, or free text carrying markup that must not reach the
//! renderer unescaped.
//!
//! The pipeline is an ordered list of strategies, each returning a tagged
//! result, tried in sequence:
//!
//! 1. declared JSON: decode, pull out the `message` field (or stringify
//!    the whole value)
//! 2. fallback: lossy UTF-8 decode of the raw bytes
//! 3. candidate re-sniffed as JSON: pretty-print inside a literal block
//! 4. free text: strip control characters, escape markup

use serde_json::Value;

/// Result of normalizing an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The payload contained no message; reported as a distinct condition
    /// so dispatch can refuse it before any backend call.
    Empty,
    /// Display text, safe inside the outbound template.
    Message(String),
}

/// Normalize an inbound payload.
///
/// Never fails: undecodable input degrades to replacement characters, and
/// malformed structured data silently falls back to free-text treatment.
/// `escape_chars` is the renderer's reserved-character set.
pub fn normalize(body: &[u8], content_type: Option<&str>, escape_chars: &[char]) -> Normalized {
    let candidate = match structured_candidate(body, content_type) {
        Some(text) => text,
        None => lossy_text_candidate(body),
    };

    if candidate.is_empty() {
        return Normalized::Empty;
    }

    // The candidate may itself be JSON text, even under a generic content
    // type; senders expect it displayed verbatim and pretty-printed.
    if let Some(block) = literal_block(&candidate) {
        return Normalized::Message(block);
    }

    Normalized::Message(escaped_free_text(&candidate, escape_chars))
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("application/json"))
}

/// Strategy 1: decode a declared-JSON body.
///
/// Bytes outside printable ASCII (plus tab/newline/CR) are blanked before
/// parsing; senders routinely leak control bytes into otherwise valid JSON.
/// Returns `None` when the content type is not JSON or the body does not
/// parse, handing over to the free-text fallback.
fn structured_candidate(body: &[u8], content_type: Option<&str>) -> Option<String> {
    if !is_json_content_type(content_type) {
        return None;
    }

    let cleaned: String = body
        .iter()
        .map(|&b| {
            if (32..=126).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r') {
                char::from(b)
            } else {
                ' '
            }
        })
        .collect();

    let value: Value = serde_json::from_str(&cleaned).ok()?;

    Some(match value.get("message") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => value.to_string(),
    })
}

/// Strategy 2: lossy text decode. Total; invalid sequences become U+FFFD.
fn lossy_text_candidate(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

/// Strategy 3: render JSON text verbatim.
///
/// Pretty-prints and fences the value so the renderer displays it without
/// interpreting any markup embedded in string fields. Pretty-printing an
/// already-pretty value is a no-op on its content.
fn literal_block(candidate: &str) -> Option<String> {
    let value: Value = serde_json::from_str(candidate).ok()?;
    let pretty = serde_json::to_string_pretty(&value).ok()?;
    Some(format!("```json\n{pretty}\n```"))
}

/// Strategy 4: free text. Strips raw control characters (code points below
/// 32 except tab/newline/CR), then escapes every renderer-reserved
/// character with a backslash.
fn escaped_free_text(candidate: &str, escape_chars: &[char]) -> String {
    let mut out = String::with_capacity(candidate.len());
    for ch in candidate.chars() {
        if (ch as u32) < 32 && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }
        if escape_chars.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
