use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::rc::Rc;

use crate::selector::{ElementLike, Selector};

/// A parsed lesson fragment. Not `Send`: build one per evaluation.
///
/// Parsing follows the HTML5 tree-building rules, so any input produces a
/// document: stray tags are dropped or re-parented instead of failing.
pub struct HtmlDocument {
    dom: RcDom,
}

/// An element handle that can be matched against selectors.
#[derive(Clone)]
pub struct ElementRef(Handle);

impl ElementLike for ElementRef {
    fn local_name(&self) -> &str {
        match self.0.data {
            NodeData::Element { ref name, .. } => &*name.local,
            _ => "",
        }
    }

    fn attribute(&self, wanted: &str) -> Option<String> {
        match self.0.data {
            NodeData::Element { ref attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| {
                    let local: &str = &a.name.local;
                    local.eq_ignore_ascii_case(wanted)
                })
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    fn parent_element(&self) -> Option<Self> {
        parent(&self.0).filter(is_element).map(ElementRef)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling_element(true)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling_element(false)
    }

    fn has_no_content(&self) -> bool {
        self.0.children.borrow().iter().all(|child| match child.data {
            NodeData::Element { .. } => false,
            NodeData::Text { ref contents } => contents.borrow().is_empty(),
            _ => true,
        })
    }
}

impl ElementRef {
    /// Concatenated text of every descendant text node, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.0, &mut out);
        out
    }

    pub fn handle(&self) -> &Handle {
        &self.0
    }

    fn sibling_element(&self, before: bool) -> Option<Self> {
        let parent = parent(&self.0)?;
        let children = parent.children.borrow();
        let index = children.iter().position(|c| Rc::ptr_eq(c, &self.0))?;
        let found = if before {
            children[..index].iter().rev().find(|c| is_element(c))
        } else {
            children[index + 1..].iter().find(|c| is_element(c))
        };
        found.cloned().map(ElementRef)
    }
}

fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    node.parent.set(weak.clone());
    weak.and_then(|w| w.upgrade())
}

fn collect_text(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        match child.data {
            NodeData::Text { ref contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

impl HtmlDocument {
    /// Parses `markup` as a full HTML document (fragments land in `<body>`).
    pub fn parse(markup: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
        Self { dom }
    }

    /// First element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<ElementRef> {
        let mut found = None;
        walk(&self.dom.document, &mut |element: ElementRef| {
            if selector.matches(&element) {
                found = Some(element);
                false
            } else {
                true
            }
        });
        found
    }

    /// Every element matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementRef> {
        let mut out = Vec::new();
        walk(&self.dom.document, &mut |element: ElementRef| {
            if selector.matches(&element) {
                out.push(element);
            }
            true
        });
        out
    }
}

/// Pre-order walk over element descendants; stops once `visit` returns false.
fn walk(node: &Handle, visit: &mut dyn FnMut(ElementRef) -> bool) -> bool {
    for child in node.children.borrow().iter() {
        if !is_element(child) {
            continue;
        }
        if !visit(ElementRef(child.clone())) || !walk(child, visit) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_fragment_lands_in_body() {
        let doc = HtmlDocument::parse("<h1>Hi</h1>");
        assert!(doc.query_selector(&sel("body > h1")).is_some());
        assert!(doc.query_selector(&sel("html")).is_some());
    }

    #[test]
    fn test_document_order() {
        let doc = HtmlDocument::parse("<div><p id=\"a\">1</p></div><p id=\"b\">2</p>");
        let first = doc.query_selector(&sel("p")).unwrap();
        assert_eq!(first.attribute("id").as_deref(), Some("a"));
        assert_eq!(doc.query_selector_all(&sel("p")).len(), 2);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let doc = HtmlDocument::parse("<h1>  Hello <em>big</em> world </h1>");
        let h1 = doc.query_selector(&sel("h1")).unwrap();
        assert_eq!(h1.text_content(), "  Hello big world ");
    }

    #[test]
    fn test_attribute_names_are_lowercased_by_parser() {
        let doc = HtmlDocument::parse(r#"<div className="grid">x</div>"#);
        let div = doc.query_selector(&sel("div")).unwrap();
        assert_eq!(div.attribute("classname").as_deref(), Some("grid"));
        assert!(doc.query_selector(&sel(".grid")).is_none());
    }

    #[test]
    fn test_garbage_still_parses() {
        let doc = HtmlDocument::parse("<<>>< /p></div>{unclosed");
        assert!(doc.query_selector(&sel("header")).is_none());
    }

    #[test]
    fn test_sibling_navigation_skips_text_and_comments() {
        let doc = HtmlDocument::parse("<ul>\n <li id=\"a\">1</li> <!-- c --> text <li id=\"b\">2</li>\n</ul>");
        let a = doc.query_selector(&sel("#a")).unwrap();
        let b = a.next_sibling_element().unwrap();
        assert_eq!(b.attribute("id").as_deref(), Some("b"));
        assert!(b.next_sibling_element().is_none());
        assert_eq!(b.prev_sibling_element().unwrap().attribute("id").as_deref(), Some("a"));
        assert!(a.prev_sibling_element().is_none());
        assert_eq!(a.parent_element().unwrap().local_name(), "ul");
    }

    #[test]
    fn test_html_has_no_parent_element() {
        let doc = HtmlDocument::parse("<p></p>");
        let html = doc.query_selector(&sel("html")).unwrap();
        assert!(html.parent_element().is_none());
        assert!(doc.query_selector(&sel("p")).unwrap().has_no_content());
        assert!(!html.has_no_content());
    }

    #[test]
    fn test_empty_input() {
        let doc = HtmlDocument::parse("");
        assert!(doc.query_selector(&sel("p")).is_none());
        assert!(doc.query_selector(&sel("body")).is_some());
    }
}
