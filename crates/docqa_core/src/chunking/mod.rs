use sha2::{Digest, Sha256};

use crate::domain::{Chunk, TextUnit};

/// Joins consecutive units inside one chunk; counts toward the budget.
pub const UNIT_SEPARATOR: &str = "\n";

/// Normalize line endings and trim outer whitespace of a unit.
pub fn normalize_unit_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Greedily pack units into chunks of at most `max_chars` characters.
///
/// Rules:
/// - Blank units are skipped and never start a chunk.
/// - A unit is never split. A unit longer than `max_chars` becomes its own
///   oversized chunk.
/// - Lengths are counted in chars, including one separator between units.
/// - `max_chars == 0` behaves as 1.
pub fn chunk_units(units: &[TextUnit], max_chars: usize) -> Vec<Chunk> {
    let max_chars = max_chars.max(1);
    let sep_chars = UNIT_SEPARATOR.chars().count();

    let mut out: Vec<Chunk> = Vec::new();
    let mut buf = String::new();
    let mut buf_chars: usize = 0;
    let mut members: Vec<u32> = Vec::new();

    for unit in units {
        let content = normalize_unit_text(&unit.content);
        if content.is_empty() {
            continue;
        }
        let unit_chars = content.chars().count();
        let add = if buf.is_empty() {
            unit_chars
        } else {
            sep_chars + unit_chars
        };
        if !buf.is_empty() && buf_chars + add > max_chars {
            out.push(seal_chunk(out.len(), &buf, buf_chars, std::mem::take(&mut members)));
            buf.clear();
            buf_chars = 0;
        }
        if !buf.is_empty() {
            buf.push_str(UNIT_SEPARATOR);
            buf_chars += sep_chars;
        }
        buf.push_str(&content);
        buf_chars += unit_chars;
        members.push(unit.sequence_index);
    }
    if !buf.trim().is_empty() {
        out.push(seal_chunk(out.len(), &buf, buf_chars, members));
    }

    tracing::debug!(
        units = units.len(),
        chunks = out.len(),
        max_chars,
        "chunked document"
    );
    out
}

/// Wrap a free-form message as a single chunk (chat path).
pub fn single_chunk(text: &str) -> Option<Chunk> {
    let content = normalize_unit_text(text);
    if content.is_empty() {
        return None;
    }
    let chars = content.chars().count();
    Some(seal_chunk(0, &content, chars, vec![0]))
}

fn seal_chunk(index: usize, text: &str, chars: usize, source_units: Vec<u32>) -> Chunk {
    let digest = Sha256::digest(text.as_bytes());
    Chunk {
        index: index.min(u32::MAX as usize) as u32,
        text: text.to_string(),
        source_units,
        text_sha256: hex::encode(digest),
        char_count: chars.min(u32::MAX as usize) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(texts: &[&str]) -> Vec<TextUnit> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TextUnit::new(i as u32 + 1, *t))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_units(&[], 100).is_empty());
        assert!(chunk_units(&units(&["", "   ", "\n\t"]), 100).is_empty());
    }

    #[test]
    fn packs_until_budget_then_starts_new_chunk() {
        // "aaaa\nbbbb" = 9 chars fits in 10; adding "\ncccc" would make 14.
        let chunks = chunk_units(&units(&["aaaa", "bbbb", "cccc"]), 10);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "aaaa\nbbbb");
        assert_eq!(chunks[0].source_units, vec![1, 2]);
        assert_eq!(chunks[1].text, "cccc");
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn oversized_unit_is_emitted_alone_and_untruncated() {
        let long = "x".repeat(25);
        let chunks = chunk_units(&units(&["ab", &long, "cd"]), 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].text, long);
        assert_eq!(chunks[1].char_count, 25);
        assert_eq!(chunks[2].text, "cd");
    }

    #[test]
    fn blank_units_do_not_count_toward_budget() {
        let chunks = chunk_units(&units(&["abcd", "   ", "", "efgh"]), 9);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "abcd\nefgh");
        assert_eq!(chunks[0].source_units, vec![1, 4]);
    }

    #[test]
    fn budget_counts_chars_not_bytes() {
        // Four 2-byte chars per unit.
        let chunks = chunk_units(&units(&["éééé", "éééé"]), 9);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count, 9);
    }

    #[test]
    fn zero_budget_behaves_as_one() {
        let chunks = chunk_units(&units(&["a", "b"]), 0);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn chunk_hash_is_content_derived() {
        let a = chunk_units(&units(&["same text"]), 100);
        let b = chunk_units(&units(&["  same text  "]), 100);
        assert_eq!(a[0].text_sha256, b[0].text_sha256);
        assert_eq!(a[0].text_sha256.len(), 64);
        assert_eq!(a[0].short_hash().len(), 12);
    }

    #[test]
    fn single_chunk_rejects_blank_messages() {
        assert!(single_chunk("  ").is_none());
        let c = single_chunk(" hello there ").expect("chunk");
        assert_eq!(c.text, "hello there");
        assert_eq!(c.index, 0);
    }
}
