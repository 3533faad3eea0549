//! Prompt Sanitizing
//!
//! Turns mention text into an image generation prompt.

use std::sync::LazyLock;

use regex::Regex;

/// Keyword that asks the bot for an image.
pub const TRIGGER_KEYWORD: &str = "imagine";

static TRIGGER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){TRIGGER_KEYWORD}")).expect("valid regex"));

/// Platform mention syntax such as `<@U123>` or `<#C123|general>`.
static MENTION_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.+?>").expect("valid regex"));

/// Whether the original mention text asks for an image.
///
/// Checked against the raw text, never the sanitized prompt, since the
/// sanitizer strips the keyword.
pub fn needs_image(text: &str) -> bool {
    text.to_lowercase().contains(TRIGGER_KEYWORD)
}

/// Strip the trigger keyword and mention tokens, then trim.
pub fn sanitize(text: &str) -> String {
    let mut prompt = TRIGGER_REGEX.replace_all(text, "").into_owned();
    while MENTION_TOKEN_REGEX.is_match(&prompt) {
        prompt = MENTION_TOKEN_REGEX.replace_all(&prompt, "").into_owned();
    }
    prompt.trim().to_string()
}
