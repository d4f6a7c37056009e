//! The page boundary: everything the translator reads from or writes to the
//! host chat page goes through [`ChatPage`].

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use translator_core::{
    Affordance, Annotation, ChatIdentity, JobId, NodeId, NodeMarkers, ProcessingState,
};
use translator_logging::tl_warn;

pub const ROOT_SELECTOR: &str = ".MessageList";
pub const MESSAGE_SELECTOR: &str = ".Message.message-list-item";
pub const CONTENT_SELECTOR: &str = ".message-content";
pub const TEXT_SELECTOR: &str = ".text-content";
pub const INSERTION_SELECTOR: &str = ".content-inner";
pub const TITLE_SELECTOR: &str = ".chat-title, .peer-title";

pub const PROCESSING_ATTRIBUTE: &str = "data-processing";
pub const TRANSLATED_ATTRIBUTE: &str = "data-translated";
pub const MESSAGE_ID_ATTRIBUTE: &str = "data-message-id";

pub trait ChatPage {
    fn has_chat_root(&self) -> bool;
    fn identity(&self) -> ChatIdentity;
    /// Message elements that carry a text container, in document order.
    fn message_nodes(&self) -> Vec<NodeId>;
    /// Markup of the message's text container.
    fn message_html(&self, node: NodeId) -> Option<String>;
    fn markers(&self, node: NodeId) -> Option<NodeMarkers>;
    fn is_attached(&self, node: NodeId) -> bool;

    fn set_processing(&mut self, node: NodeId, state: ProcessingState);
    fn set_message_id(&mut self, node: NodeId, job_id: Option<JobId>);
    fn mark_translated(&mut self, node: NodeId);
    /// Places the block right after the content container, replacing an
    /// earlier one. Returns false when there is nowhere to put it.
    fn insert_annotation(&mut self, node: NodeId, annotation: &Annotation) -> bool;
    fn show_affordance(&mut self, node: NodeId, affordance: &Affordance) -> bool;
    fn remove_affordance(&mut self, node: NodeId);
    /// Removes every affordance on the page and returns the nodes that had one.
    fn remove_all_affordances(&mut self) -> Vec<NodeId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageElement {
    pub text_html: String,
    pub has_insertion_point: bool,
    pub markers: NodeMarkers,
    pub annotation: Option<Annotation>,
    pub affordance: Option<Affordance>,
    attached: bool,
}

impl MessageElement {
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// A chat page loaded from saved HTML.
///
/// The markup is parsed once; afterwards the page is a model of the message
/// elements that the translator and tests can mutate. New messages arrive via
/// [`SnapshotPage::push_message`].
#[derive(Debug, Clone)]
pub struct SnapshotPage {
    location: String,
    title: Option<String>,
    root_present: bool,
    messages: BTreeMap<NodeId, MessageElement>,
    next_node: u64,
}

impl SnapshotPage {
    pub fn parse(location: impl Into<String>, html: &str) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut page = Self {
            location: location.into(),
            title: select_first(root, TITLE_SELECTOR).map(element_text),
            root_present: select_first(root, ROOT_SELECTOR).is_some(),
            messages: BTreeMap::new(),
            next_node: 1,
        };
        for element in select_all(root, MESSAGE_SELECTOR) {
            page.adopt(element);
        }
        page
    }

    /// Appends the message elements found in `html` and returns their ids.
    pub fn push_message(&mut self, html: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(html);
        let found: Vec<_> = select_all(fragment.root_element(), MESSAGE_SELECTOR)
            .into_iter()
            .filter_map(|element| self.adopt(element))
            .collect();
        if found.is_empty() {
            tl_warn!("pushed markup has no message element");
        }
        found
    }

    pub fn detach(&mut self, node: NodeId) {
        if let Some(message) = self.messages.get_mut(&node) {
            message.attached = false;
        }
    }

    /// Detaches every message, as when the client swaps conversations.
    pub fn clear_messages(&mut self) {
        for message in self.messages.values_mut() {
            message.attached = false;
        }
    }

    pub fn navigate(&mut self, location: impl Into<String>, title: Option<&str>) {
        self.location = location.into();
        self.title = title.map(str::to_string);
    }

    pub fn set_root_present(&mut self, present: bool) {
        self.root_present = present;
    }

    pub fn element(&self, node: NodeId) -> Option<&MessageElement> {
        self.messages.get(&node)
    }

    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &MessageElement)> {
        self.messages.iter().map(|(node, message)| (*node, message))
    }

    fn adopt(&mut self, element: ElementRef<'_>) -> Option<NodeId> {
        let content = select_first(element, CONTENT_SELECTOR)?;
        let text = select_first(content, TEXT_SELECTOR)?;
        let node = NodeId(self.next_node);
        self.next_node += 1;
        self.messages.insert(
            node,
            MessageElement {
                text_html: text.inner_html(),
                has_insertion_point: select_first(content, INSERTION_SELECTOR).is_some(),
                markers: read_markers(element),
                annotation: None,
                affordance: None,
                attached: true,
            },
        );
        Some(node)
    }

    fn attached_mut(&mut self, node: NodeId) -> Option<&mut MessageElement> {
        self.messages
            .get_mut(&node)
            .filter(|message| message.attached)
    }
}

impl ChatPage for SnapshotPage {
    fn has_chat_root(&self) -> bool {
        self.root_present
    }

    fn identity(&self) -> ChatIdentity {
        ChatIdentity::new(&self.location, self.title.as_deref())
    }

    fn message_nodes(&self) -> Vec<NodeId> {
        self.messages
            .iter()
            .filter(|(_, message)| message.attached)
            .map(|(node, _)| *node)
            .collect()
    }

    fn message_html(&self, node: NodeId) -> Option<String> {
        self.messages
            .get(&node)
            .filter(|message| message.attached)
            .map(|message| message.text_html.clone())
    }

    fn markers(&self, node: NodeId) -> Option<NodeMarkers> {
        self.messages.get(&node).map(|message| message.markers.clone())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.messages
            .get(&node)
            .is_some_and(|message| message.attached)
    }

    fn set_processing(&mut self, node: NodeId, state: ProcessingState) {
        if let Some(message) = self.attached_mut(node) {
            message.markers.processing = state;
        }
    }

    fn set_message_id(&mut self, node: NodeId, job_id: Option<JobId>) {
        if let Some(message) = self.attached_mut(node) {
            message.markers.message_id = job_id;
        }
    }

    fn mark_translated(&mut self, node: NodeId) {
        if let Some(message) = self.attached_mut(node) {
            message.markers.translated = true;
        }
    }

    fn insert_annotation(&mut self, node: NodeId, annotation: &Annotation) -> bool {
        match self.attached_mut(node) {
            Some(message) if message.has_insertion_point => {
                message.annotation = Some(annotation.clone());
                true
            }
            _ => false,
        }
    }

    fn show_affordance(&mut self, node: NodeId, affordance: &Affordance) -> bool {
        match self.attached_mut(node) {
            Some(message) if message.has_insertion_point => {
                message.affordance = Some(*affordance);
                true
            }
            _ => false,
        }
    }

    fn remove_affordance(&mut self, node: NodeId) {
        if let Some(message) = self.messages.get_mut(&node) {
            message.affordance = None;
        }
    }

    fn remove_all_affordances(&mut self) -> Vec<NodeId> {
        self.messages
            .iter_mut()
            .filter_map(|(node, message)| message.affordance.take().map(|_| *node))
            .collect()
    }
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn read_markers(element: ElementRef<'_>) -> NodeMarkers {
    let attrs = element.value();
    // Any value marks the node; only `button-shown` is told apart.
    let processing = match attrs.attr(PROCESSING_ATTRIBUTE) {
        Some("button-shown") => ProcessingState::ButtonShown,
        Some(_) => ProcessingState::Pending,
        None => ProcessingState::None,
    };
    NodeMarkers {
        processing,
        translated: attrs.attr(TRANSLATED_ATTRIBUTE).is_some(),
        message_id: attrs
            .attr(MESSAGE_ID_ATTRIBUTE)
            .and_then(|raw| raw.parse().ok()),
    }
}
