use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// UI chrome inside a message bubble that is not part of the message text.
pub const CHROME_SELECTORS: &[&str] = &[
    ".Reactions",
    ".custom-emoji",
    ".text-entity-link",
    ".message-views",
    ".peer-title",
    ".sender-name",
    ".message-time",
    ".MessageMeta",
    ".message-action-buttons",
    ".CommentButton",
    ".quick-reaction",
];

pub trait TextExtractor: Send + Sync {
    fn extract(&self, html: &str) -> String;
}

/// Extracts plain text from a message's text container.
///
/// Works on a parsed copy of the markup, so the live page is never touched:
/// - subtrees matching any chrome selector are dropped
/// - `<br>` becomes `\n`
/// - the result is trimmed; an empty string means nothing worth translating.
#[derive(Debug)]
pub struct ChatTextExtractor {
    chrome: Vec<Selector>,
}

impl Default for ChatTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTextExtractor {
    pub fn new() -> Self {
        Self::with_chrome_selectors(CHROME_SELECTORS)
    }

    pub fn with_chrome_selectors(selectors: &[&str]) -> Self {
        let chrome = selectors
            .iter()
            .filter_map(|css| Selector::parse(css).ok())
            .collect();
        Self { chrome }
    }

    fn is_chrome(&self, element: &ElementRef) -> bool {
        self.chrome.iter().any(|selector| selector.matches(element))
    }

    fn visit(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name().eq_ignore_ascii_case("br") => {
                out.push('\n');
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    if self.is_chrome(&element) {
                        return;
                    }
                }
                for child in node.children() {
                    self.visit(child, out);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child, out);
                }
            }
        }
    }
}

impl TextExtractor for ChatTextExtractor {
    fn extract(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut out = String::new();
        for child in fragment.root_element().children() {
            self.visit(child, &mut out);
        }
        out.trim().to_string()
    }
}
