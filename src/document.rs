//! The hosting document seam.
//!
//! Stickers never implement a document themselves; they call into a host
//! through the [`Document`] and [`Container`] traits. A browser binding would
//! implement these over real DOM nodes. [`MemoryDocument`] is the headless
//! host used for server-side rendering and tests.
//!
//! Nodes are shared between a sticker handle and the container it is
//! attached to, the same way a script host shares element references. The
//! host model is single-threaded, so sharing uses `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};

use crate::api::Namespace;
use crate::error::Result;
use crate::markup::SvgElement;
use crate::raster::{self, RasterImage};

/// A graphic node shared between its handle and its parent container.
pub type SharedNode = Rc<RefCell<SvgElement>>;

/// Wraps a detached element as a shared node.
pub fn share(node: SvgElement) -> SharedNode {
    Rc::new(RefCell::new(node))
}

// ============================================================================
// Host traits
// ============================================================================

/// An element that can hold sticker nodes as children.
///
/// Node identity is reference identity (`Rc::ptr_eq`), never a tag search.
pub trait Container {
    /// Appends `node` as the last child. A node that is already a child is
    /// moved to the end rather than added twice.
    fn append_child(&self, node: SharedNode);

    /// Replaces `old` with `new` in the same position. Returns false if `old`
    /// is not a child of this container.
    fn replace_child(&self, old: &SharedNode, new: SharedNode) -> bool;

    /// Removes `node`. Returns false if it is not a child of this container.
    fn remove_child(&self, node: &SharedNode) -> bool;
}

/// The hosting document.
pub trait Document {
    /// Resolves a selector to a container, if any.
    fn query_selector(&self, selector: &str) -> Option<Rc<dyn Container>>;

    /// Returns true if any element in the document carries `id`.
    fn contains_element_id(&self, id: &str) -> bool;

    /// Appends a `<style>` element with the given id to the document head.
    fn append_style(&self, id: &str, css: &str);

    /// Decodes an image data URL into a raster image.
    ///
    /// This is the host's one asynchronous operation. It has no cancellation
    /// and no timeout; callers that lose interest drop the future.
    fn decode_image(&self, data_url: &str) -> LocalBoxFuture<'static, Result<RasterImage>>;

    /// Returns true if a global named `name` is already defined.
    fn has_global(&self, name: &str) -> bool;

    /// Defines a global namespace object.
    fn define_global(&self, name: &str, namespace: Namespace);
}

// ============================================================================
// MemoryContainer
// ============================================================================

/// An in-memory container addressed by id.
#[derive(Debug, Default)]
pub struct MemoryContainer {
    id: String,
    children: RefCell<Vec<SharedNode>>,
}

impl MemoryContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: RefCell::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Snapshot of the current children.
    pub fn children(&self) -> Vec<SharedNode> {
        self.children.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Returns true if `node` is one of the children.
    pub fn contains(&self, node: &SharedNode) -> bool {
        self.children.borrow().iter().any(|c| Rc::ptr_eq(c, node))
    }

    /// Serializes the children in order.
    pub fn to_markup(&self) -> String {
        self.children
            .borrow()
            .iter()
            .map(|child| child.borrow().to_markup())
            .collect()
    }
}

impl Container for MemoryContainer {
    fn append_child(&self, node: SharedNode) {
        let mut children = self.children.borrow_mut();
        children.retain(|c| !Rc::ptr_eq(c, &node));
        children.push(node);
    }

    fn replace_child(&self, old: &SharedNode, new: SharedNode) -> bool {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| Rc::ptr_eq(c, old)) {
            Some(index) => {
                children[index] = new;
                true
            }
            None => false,
        }
    }

    fn remove_child(&self, node: &SharedNode) -> bool {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| Rc::ptr_eq(c, node)) {
            Some(index) => {
                children.remove(index);
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// MemoryDocument
// ============================================================================

/// A `<style>` element in the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub id: String,
    pub css: String,
}

/// Headless document: containers addressed by `#id`, a head of style
/// entries, a table of globals, and resvg-backed image decoding.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use sticker_kit::{Document, MemoryDocument, StickerHandle};
///
/// let doc = Rc::new(MemoryDocument::new());
/// let app = doc.add_container("app");
///
/// let document: Rc<dyn Document> = doc.clone();
/// let mut sticker = StickerHandle::new(&document, "star", None).unwrap();
/// sticker.attach("#app").unwrap();
///
/// assert_eq!(app.len(), 1);
/// ```
#[derive(Default)]
pub struct MemoryDocument {
    containers: RefCell<Vec<Rc<MemoryContainer>>>,
    head: RefCell<Vec<StyleEntry>>,
    globals: RefCell<HashMap<String, Rc<Namespace>>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty container reachable through the selector `#{id}`.
    pub fn add_container(&self, id: impl Into<String>) -> Rc<MemoryContainer> {
        let container = Rc::new(MemoryContainer::new(id));
        self.containers.borrow_mut().push(container.clone());
        container
    }

    /// Looks up a container by id.
    pub fn container(&self, id: &str) -> Option<Rc<MemoryContainer>> {
        self.containers.borrow().iter().find(|c| c.id() == id).cloned()
    }

    /// Snapshot of the head's style entries.
    pub fn styles(&self) -> Vec<StyleEntry> {
        self.head.borrow().clone()
    }

    /// Number of `<style>` entries in the head.
    pub fn style_count(&self) -> usize {
        self.head.borrow().len()
    }

    /// Returns the global namespace registered under `name`.
    pub fn global(&self, name: &str) -> Option<Rc<Namespace>> {
        self.globals.borrow().get(name).cloned()
    }
}

impl Document for MemoryDocument {
    fn query_selector(&self, selector: &str) -> Option<Rc<dyn Container>> {
        let id = selector.trim().strip_prefix('#')?;
        self.container(id).map(|c| c as Rc<dyn Container>)
    }

    fn contains_element_id(&self, id: &str) -> bool {
        self.head.borrow().iter().any(|s| s.id == id)
            || self.containers.borrow().iter().any(|c| c.id() == id)
    }

    fn append_style(&self, id: &str, css: &str) {
        self.head.borrow_mut().push(StyleEntry {
            id: id.to_string(),
            css: css.to_string(),
        });
    }

    fn decode_image(&self, data_url: &str) -> LocalBoxFuture<'static, Result<RasterImage>> {
        Box::pin(future::ready(raster::decode_data_url(data_url)))
    }

    fn has_global(&self, name: &str) -> bool {
        self.globals.borrow().contains_key(name)
    }

    fn define_global(&self, name: &str, namespace: Namespace) {
        self.globals
            .borrow_mut()
            .insert(name.to_string(), Rc::new(namespace));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_resolve_by_id() {
        let doc = MemoryDocument::new();
        doc.add_container("app");
        assert!(doc.query_selector("#app").is_some());
        assert!(doc.query_selector("#missing").is_none());
        assert!(doc.query_selector("app").is_none());
    }

    #[test]
    fn replace_uses_reference_identity() {
        let container = MemoryContainer::new("c");
        let a = share(SvgElement::new("svg"));
        let b = share(SvgElement::new("svg"));
        container.append_child(a.clone());
        container.append_child(b.clone());

        let replacement = share(SvgElement::new("svg").with_attr("id", "new"));
        assert!(container.replace_child(&b, replacement.clone()));

        let children = container.children();
        assert!(Rc::ptr_eq(&children[0], &a));
        assert!(Rc::ptr_eq(&children[1], &replacement));

        // `b` is structurally equal to `a` but no longer a child.
        assert!(!container.replace_child(&b, share(SvgElement::new("svg"))));
    }

    #[test]
    fn append_moves_an_existing_child() {
        let container = MemoryContainer::new("c");
        let a = share(SvgElement::new("svg"));
        let b = share(SvgElement::new("svg"));
        container.append_child(a.clone());
        container.append_child(b.clone());
        container.append_child(a.clone());

        let children = container.children();
        assert_eq!(children.len(), 2);
        assert!(Rc::ptr_eq(&children[0], &b));
        assert!(Rc::ptr_eq(&children[1], &a));
    }

    #[test]
    fn remove_child_detaches() {
        let container = MemoryContainer::new("c");
        let node = share(SvgElement::new("svg"));
        container.append_child(node.clone());
        assert!(container.remove_child(&node));
        assert!(container.is_empty());
        assert!(!container.remove_child(&node));
    }

    #[test]
    fn element_ids_cover_styles_and_containers() {
        let doc = MemoryDocument::new();
        doc.add_container("app");
        doc.append_style("sheet", "svg {}");
        assert!(doc.contains_element_id("app"));
        assert!(doc.contains_element_id("sheet"));
        assert!(!doc.contains_element_id("other"));
    }
}
