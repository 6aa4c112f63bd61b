const TRUNCATION_MARKER: &str = " ...[truncated]";

/// Bound `text` to at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
    }
}

/// Bound structured result lines: whole lines are kept while they fit, and a
/// single overlong first line is cut with `truncate_chars`.
pub fn truncate_lines(text: &str, max_chars: usize) -> String {
    let mut kept = String::new();
    let mut used = 0usize;
    for line in text.lines() {
        let len = line.chars().count() + usize::from(!kept.is_empty());
        if used + len > max_chars {
            if kept.is_empty() {
                return truncate_chars(line, max_chars);
            }
            kept.push_str(TRUNCATION_MARKER);
            return kept;
        }
        if !kept.is_empty() {
            kept.push('\n');
        }
        kept.push_str(line);
        used += len;
    }
    kept
}

/// Plain prefix without marker, for embedding documents into task descriptions.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        None => text,
        Some((byte_idx, _)) => &text[..byte_idx],
    }
}
