//! Story bodies arrive as HTML fragments; the terminal wants paragraphs.

use super::sanitize::clean_text;
use scraper::{ElementRef, Html, Node};

/// Elements whose boundaries start a new paragraph.
const BLOCKS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "blockquote", "tr",
    "table", "section", "article", "figure", "figcaption", "pre", "hr",
];

/// Elements whose text never belongs in the body.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "iframe", "head"];

/// Convert an HTML fragment to plain paragraphs, dropping empty ones.
/// Entities are decoded by the parser.
pub fn html_to_paragraphs(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut out = Paragraphs::default();
    walk(fragment.root_element(), &mut out);
    out.finish()
}

#[derive(Default)]
struct Paragraphs {
    current: String,
    done: Vec<String>,
}

impl Paragraphs {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_here(&mut self) {
        let para = clean_text(&self.current);
        if !para.is_empty() {
            self.done.push(para);
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.break_here();
        self.done
    }
}

fn walk(el: ElementRef<'_>, out: &mut Paragraphs) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_text(text),
            Node::Element(e) => {
                let name = e.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.break_here();
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCKS.contains(&name);
                if block {
                    out.break_here();
                }
                walk(child_el, out);
                if block {
                    out.break_here();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_paragraphs_and_strips_tags() {
        let html = "<p>First <strong>bold</strong> line.</p><p>Second&nbsp;line<br/>third</p><p> </p>";
        assert_eq!(
            html_to_paragraphs(html),
            vec!["First bold line.", "Second line", "third"]
        );
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(
            html_to_paragraphs("<p>Caf&eacute; &copy; AGC &euro;5</p>"),
            vec!["Café © AGC €5"]
        );
        assert_eq!(
            html_to_paragraphs("<p>Tom &amp; Jerry&#39;s &#x263A;</p>"),
            vec!["Tom & Jerry's ☺"]
        );
    }

    #[test]
    fn attributes_never_leak_into_text() {
        assert_eq!(
            html_to_paragraphs(r#"<a title="a>b" href="/x">Read</a> more"#),
            vec!["Read more"]
        );
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let html = "<script>var ad = 1;</script><style>.x{color:red}</style><p>Body</p>";
        assert_eq!(html_to_paragraphs(html), vec!["Body"]);
    }

    #[test]
    fn headings_and_list_items_are_separate_paragraphs() {
        let html = "<h2>Key points</h2><ul><li>One</li><li>Two</li></ul>tail";
        assert_eq!(
            html_to_paragraphs(html),
            vec!["Key points", "One", "Two", "tail"]
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_paragraphs("no markup here"), vec!["no markup here"]);
        assert!(html_to_paragraphs("").is_empty());
    }
}
