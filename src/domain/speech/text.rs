use html2text::from_read;
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid url pattern"));
static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static SENTENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?]+\s+)").expect("valid sentence pattern"));

/// Strip HTML and URLs from pasted content and collapse whitespace
pub fn clean_text(text: &str) -> String {
    let plain_text = from_read(text.as_bytes(), usize::MAX);
    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}

/// Split text into batches of at most `max_len` bytes, preferring sentence boundaries.
/// Text with no usable boundary is cut on character boundaries.
pub fn split_into_batches(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    for mat in SENTENCE_PATTERN.find_iter(text) {
        push_piece(&mut batches, &mut current, &text[last_end..mat.end()], max_len);
        last_end = mat.end();
    }

    if last_end < text.len() {
        push_piece(&mut batches, &mut current, &text[last_end..], max_len);
    }

    if !current.trim().is_empty() {
        batches.push(current.trim().to_string());
    }

    batches
}

fn push_piece(batches: &mut Vec<String>, current: &mut String, piece: &str, max_len: usize) {
    if !current.is_empty() && current.len() + piece.len() > max_len {
        batches.push(current.trim().to_string());
        current.clear();
    }

    if piece.len() <= max_len {
        current.push_str(piece);
        return;
    }

    // A single oversized sentence: cut it without splitting a UTF-8 sequence
    let mut chunk = String::new();
    for ch in piece.chars() {
        if chunk.len() + ch.len_utf8() > max_len {
            batches.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        batches.push(chunk);
    }
}
