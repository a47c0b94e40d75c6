use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::domain::TextUnit;

const BLOCK_TAGS: &[&str] = &[
    "title",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "p",
    "li",
    "dt",
    "dd",
    "blockquote",
    "pre",
    "td",
    "th",
    "caption",
    "figcaption",
];

const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that end any loose text run before and after their content.
const CONTAINER_TAGS: &[&str] = &[
    "html", "head", "body", "main", "div", "section", "article", "header", "footer", "nav",
    "aside", "ul", "ol", "dl", "table", "thead", "tbody", "tfoot", "tr", "form", "fieldset",
    "figure", "details", "address",
];

/// Elements that end the current loose text run.
const BREAK_TAGS: &[&str] = &["br", "hr"];

/// Extract visible text as one unit per outermost block element.
///
/// Text outside any block (directly in a `<div>`, or between `<br>`s) becomes
/// its own unit per run, so no visible text is dropped.
pub fn extract_html_blocks(input: &str) -> Vec<TextUnit> {
    let document = Html::parse_document(input);

    let mut collector = BlockCollector::default();
    collector.walk(document.root_element());
    collector.flush();

    collector
        .blocks
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextUnit::new(i as u32 + 1, text))
        .collect()
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<String>,
    loose: Vec<String>,
}

impl BlockCollector {
    fn walk(&mut self, el: ElementRef<'_>) {
        for child in el.children() {
            match child.value() {
                Node::Text(text) => self.loose.push(String::from(&**text)),
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    self.element(child_el);
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, el: ElementRef<'_>) {
        let name = el.value().name();
        if SKIP_TAGS.contains(&name) {
            return;
        }
        if BREAK_TAGS.contains(&name) {
            self.flush();
        } else if BLOCK_TAGS.contains(&name) {
            self.flush();
            self.push(visible_text(el));
        } else if CONTAINER_TAGS.contains(&name) {
            self.flush();
            self.walk(el);
            self.flush();
        } else {
            self.walk(el);
        }
    }

    fn flush(&mut self) {
        let text = collapse_whitespace(&self.loose.join(" "));
        self.loose.clear();
        self.push(text);
    }

    fn push(&mut self, text: String) {
        if !text.is_empty() {
            self.blocks.push(text);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text under `el`, skipping script-like elements.
fn visible_text(el: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in el.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| SKIP_TAGS.contains(&a.value().name()));
        if !hidden {
            parts.push(&**text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_outermost_blocks_in_order() {
        let html = r#"<html><head><title>Glossary</title><style>p { color: red }</style></head>
<body>
  <h1>Terms</h1>
  <p>AI = Artificial <b>Intelligence</b></p>
  <ul><li><p>ML = Machine Learning</p></li></ul>
  <script>var x = "NOT TEXT";</script>
</body></html>"#;
        let units = extract_html_blocks(html);
        let texts: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Glossary",
                "Terms",
                "AI = Artificial Intelligence",
                "ML = Machine Learning"
            ]
        );
        assert_eq!(units[3].sequence_index, 4);
    }

    #[test]
    fn keeps_loose_text_next_to_blocks() {
        let units = extract_html_blocks(
            "<body><h1>Glossary</h1><div>AI = Artificial Intelligence<br>ML = Machine Learning</div></body>",
        );
        let texts: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Glossary",
                "AI = Artificial Intelligence",
                "ML = Machine Learning"
            ]
        );
    }

    #[test]
    fn inline_runs_join_and_blocks_inside_inline_stay_separate() {
        let html = "<body>CPU = <span>Central</span> <b>Processing Unit</b><section><p>RAM = Random Access Memory</p>trailing note</section></body>";
        let units = extract_html_blocks(html);
        let texts: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "CPU = Central Processing Unit",
                "RAM = Random Access Memory",
                "trailing note"
            ]
        );
    }

    #[test]
    fn decodes_entities_and_falls_back_to_body_text() {
        let units = extract_html_blocks("<div>R&amp;D &lt;team&gt;</div>");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].content, "R&D <team>");
    }
}
