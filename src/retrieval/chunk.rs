use crate::constants::MIN_CHUNKABLE_CHARS;

/// Splits `text` into overlapping chunks of at most `size` characters.
///
/// Chunk ends prefer a whitespace boundary in the back half of the window.
/// Consecutive chunks share up to `overlap` characters. Trimmed text shorter
/// than [`MIN_CHUNKABLE_CHARS`] comes back as a single chunk; blank text
/// yields none.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() < MIN_CHUNKABLE_CHARS || chars.len() <= size || size == 0 {
        return vec![trimmed.to_string()];
    }

    let overlap = overlap.min(size.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + size).min(chars.len());

        if end < chars.len() {
            let floor = start + size / 2;
            if let Some(pos) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                end = pos;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end >= chars.len() {
            break;
        }

        let mut next = end.saturating_sub(overlap).max(start + 1);
        while next < end && !chars[next - 1].is_whitespace() {
            next += 1;
        }
        while next < end && chars[next].is_whitespace() {
            next += 1;
        }
        start = next;
    }

    chunks
}
