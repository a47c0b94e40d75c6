use docqa_core::chunking::{chunk_units, normalize_unit_text, UNIT_SEPARATOR};
use docqa_core::domain::{Chunk, TextUnit};
use pretty_assertions::assert_eq;

fn units_from(texts: &[String]) -> Vec<TextUnit> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| TextUnit::new(i as u32, t.clone()))
        .collect()
}

/// Small deterministic corpus: mixed lengths, blanks, unicode and CRLF.
fn corpus() -> Vec<String> {
    let mut out = Vec::new();
    let words = ["alpha", "β-decay", "CPU = Central Processing Unit", "", "  ", "naïve\r\ntext"];
    for i in 0..60usize {
        let w = words[i % words.len()];
        let repeat = (i * 7) % 5 + 1;
        out.push(std::iter::repeat(w).take(repeat).collect::<Vec<_>>().join(" "));
    }
    out.push("x".repeat(400));
    out
}

fn joined_input(units: &[TextUnit]) -> String {
    units
        .iter()
        .map(|u| normalize_unit_text(&u.content))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(UNIT_SEPARATOR)
}

fn joined_chunks(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(UNIT_SEPARATOR)
}

#[test]
fn concatenated_chunks_reproduce_input() {
    let units = units_from(&corpus());
    for max_chars in [1usize, 7, 40, 150, 1500, 3000] {
        let chunks = chunk_units(&units, max_chars);
        assert_eq!(joined_chunks(&chunks), joined_input(&units), "max_chars={max_chars}");
    }
}

#[test]
fn chunks_respect_budget_unless_single_oversized_unit() {
    let units = units_from(&corpus());
    for max_chars in [1usize, 7, 40, 150, 1500] {
        for chunk in chunk_units(&units, max_chars) {
            assert!(!chunk.text.trim().is_empty());
            assert_eq!(chunk.char_count as usize, chunk.text.chars().count());
            if chunk.char_count as usize > max_chars {
                assert_eq!(
                    chunk.source_units.len(),
                    1,
                    "oversized chunk {} holds several units (max_chars={max_chars})",
                    chunk.index
                );
            }
        }
    }
}

#[test]
fn chunk_indexes_are_dense_and_units_stay_in_order() {
    let units = units_from(&corpus());
    let chunks = chunk_units(&units, 120);
    let mut last_unit: Option<u32> = None;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index as usize, i);
        for &u in &chunk.source_units {
            if let Some(prev) = last_unit {
                assert!(u > prev);
            }
            last_unit = Some(u);
        }
    }
}

#[test]
fn rechunking_output_keeps_boundaries() {
    let units = units_from(&corpus());
    for max_chars in [7usize, 40, 150, 1500] {
        let first = chunk_units(&units, max_chars);
        let as_units: Vec<TextUnit> = first
            .iter()
            .map(|c| TextUnit::new(c.index, c.text.clone()))
            .collect();
        let second = chunk_units(&as_units, max_chars);
        let a: Vec<&str> = first.iter().map(|c| c.text.as_str()).collect();
        let b: Vec<&str> = second.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(a, b, "max_chars={max_chars}");
    }
}

#[test]
fn two_small_units_fit_one_chunk() {
    let units = vec![
        TextUnit::new(1, "AI = Artificial Intelligence"),
        TextUnit::new(2, "ML = Machine Learning"),
    ];
    let chunks = chunk_units(&units, 1000);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].source_units, vec![1, 2]);
    assert_eq!(
        chunks[0].text,
        "AI = Artificial Intelligence\nML = Machine Learning"
    );
}
