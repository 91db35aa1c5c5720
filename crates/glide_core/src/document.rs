//! Selector resolution
//!
//! Animation requests may name their target with a selector string instead of
//! an element handle. [`ElementQuery`] resolves those strings; [`Document`] is
//! a flat in-memory implementation supporting compound simple selectors such
//! as `div`, `#ball`, `.card` and `div.card#hero`.

use crate::element::{Element, ElementRef};
use smallvec::SmallVec;
use tracing::trace;

/// Resolves selector strings to animation targets
pub trait ElementQuery {
    /// First element matching `selector`, in document order
    fn query(&self, selector: &str) -> Option<ElementRef>;
}

/// Metadata used for matching, captured when an element is appended
struct Node {
    tag: String,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    element: ElementRef,
}

/// Flat list of elements in insertion (document) order
#[derive(Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a headless element and return its shared handle
    pub fn append(&mut self, element: Element) -> ElementRef {
        let tag = element.tag().to_string();
        let id = element.id().map(str::to_string);
        let classes = element.classes().map(str::to_string).collect();
        let element = element.into_ref();

        self.nodes.push(Node {
            tag,
            id,
            classes,
            element: element.clone(),
        });
        element
    }

    /// Register an arbitrary animatable under explicit selector metadata
    pub fn register(
        &mut self,
        tag: &str,
        id: Option<&str>,
        classes: &[&str],
        element: ElementRef,
    ) {
        self.nodes.push(Node {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            element,
        });
    }

    /// Number of elements in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ElementQuery for Document {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        let Some(parsed) = Selector::parse(selector) else {
            trace!(selector, "unsupported selector");
            return None;
        };

        self.nodes
            .iter()
            .find(|node| parsed.matches(node))
            .map(|node| node.element.clone())
    }
}

/// A compound simple selector: optional tag, optional id, any classes
#[derive(Debug, Default, PartialEq)]
struct Selector<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    classes: SmallVec<[&'a str; 2]>,
}

impl<'a> Selector<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }

        let mut selector = Selector::default();
        let mut rest = input;

        // Leading tag name, if any
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(&rest[..tag_end]);
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                '#' => selector.id = Some(name),
                '.' => selector.classes.push(name),
                _ => return None,
            }
            rest = &body[end..];
        }

        Some(selector)
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.map_or(true, |tag| tag.eq_ignore_ascii_case(&node.tag))
            && self.id.map_or(true, |id| node.id.as_deref() == Some(id))
            && self
                .classes
                .iter()
                .all(|class| node.classes.iter().any(|c| c == class))
    }
}
