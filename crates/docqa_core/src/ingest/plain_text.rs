use crate::domain::TextUnit;

pub(crate) const FORM_FEED: char = '\u{000C}';

/// One unit per form-feed separated page, numbered from 1.
///
/// Blank pages keep their number so later pages stay aligned with the source.
pub fn extract_pages(text: &str) -> Vec<TextUnit> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(FORM_FEED)
        .enumerate()
        .map(|(i, page)| TextUnit::new(i as u32 + 1, page))
        .collect()
}

/// One unit per blank-line separated paragraph, numbered from 1.
///
/// Text with no blank lines comes back as a single unit.
pub fn extract_paragraphs(text: &str) -> Vec<TextUnit> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut paras: Vec<&str> = normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paras.is_empty() {
        let whole = normalized.trim();
        if whole.is_empty() {
            return Vec::new();
        }
        paras.push(whole);
    }
    paras
        .into_iter()
        .enumerate()
        .map(|(i, para)| TextUnit::new(i as u32 + 1, para))
        .collect()
}

/// Pages when the text carries form feeds, paragraphs otherwise.
pub fn extract_pages_or_paragraphs(text: &str) -> Vec<TextUnit> {
    if text.contains(FORM_FEED) {
        extract_pages(text)
    } else {
        extract_paragraphs(text)
    }
}

/// One unit per line, numbered from 1.
pub fn extract_lines(text: &str) -> Vec<TextUnit> {
    text.lines()
        .enumerate()
        .map(|(i, line)| TextUnit::new(i as u32 + 1, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pages_on_form_feed() {
        let units = extract_pages("page one\n\u{000C}page two\u{000C}\u{000C}page four");
        assert_eq!(units.len(), 4);
        assert_eq!(units[0].sequence_index, 1);
        assert_eq!(units[1].content, "page two");
        assert_eq!(units[2].content, "");
        assert_eq!(units[3].sequence_index, 4);
    }

    #[test]
    fn text_without_form_feed_is_one_page() {
        let units = extract_pages("a\nb\nc");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].content, "a\nb\nc");
        assert!(extract_pages("  \n ").is_empty());
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let units = extract_paragraphs("AI = Artificial Intelligence\r\n\r\nML = Machine Learning\n\n\n\nNLP = Natural Language Processing\n");
        let texts: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "AI = Artificial Intelligence",
                "ML = Machine Learning",
                "NLP = Natural Language Processing"
            ]
        );
        assert_eq!(units[2].sequence_index, 3);
        assert!(extract_paragraphs(" \n\n ").is_empty());
    }

    #[test]
    fn form_feeds_take_precedence_over_paragraphs() {
        let paged = extract_pages_or_paragraphs("one\n\ntwo\u{000C}three");
        assert_eq!(paged.len(), 2);
        assert_eq!(paged[0].content, "one\n\ntwo");

        let plain = extract_pages_or_paragraphs("one\n\ntwo");
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[1].content, "two");
    }

    #[test]
    fn lines_handle_crlf() {
        let units = extract_lines("AI = Artificial Intelligence\r\nML = Machine Learning");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].content, "AI = Artificial Intelligence");
        assert_eq!(units[1].sequence_index, 2);
    }
}
