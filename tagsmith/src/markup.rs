//! Arena-backed markup tree.
//!
//! A [`Markup`] owns every node of one tree in an `indextree` arena:
//! - **Ownership is top-down**: the arena's child lists own the nodes
//! - **Parent links are lookups**: the arena tracks them, nothing holds them strongly
//! - **Top is recorded once**: each node stores its root id when attached
//!
//! Nodes are reached through two handle types: [`NodeRef`] for reading and
//! navigating, [`NodeMut`] for chainable mutation.

use compact_str::CompactString;
use indextree::{Arena, NodeId};

use crate::attrs::{AttrValue, Attributes};
use crate::escape::escape;
use crate::options::RenderOptions;
use crate::tags::Tag;
use crate::tracing_macros::{debug, trace};

/// Tags that render as `<tag/>` and never render children.
pub const AUTOCLOSE_TAGS: &[&str] = &[
    "img", "br", "hr", "input", "area", "link", "meta", "param", "base", "col", "command",
    "keygen", "source",
];

/// Whether a tag name is in [`AUTOCLOSE_TAGS`].
pub fn is_autoclose_tag(tag: &str) -> bool {
    AUTOCLOSE_TAGS.contains(&tag)
}

/// What lives in each arena slot.
///
/// An empty tag makes the node a text fragment: it renders its `text`
/// followed by its children, with no surrounding tag.
#[derive(Debug, Clone)]
pub struct NodeData {
    tag: CompactString,
    attrs: Attributes,
    text: String,
    autoclosed: bool,
    top: Option<NodeId>,
}

impl NodeData {
    fn element(tag: &str, top: Option<NodeId>) -> Self {
        Self {
            tag: CompactString::new(tag),
            attrs: Attributes::new(),
            text: String::new(),
            autoclosed: is_autoclose_tag(tag),
            top,
        }
    }

    fn fragment(text: String, top: Option<NodeId>) -> Self {
        Self {
            text,
            ..Self::element("", top)
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// Raw text payload (meaningful for fragments only).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fixed when the node is created; renaming does not change it.
    pub fn is_autoclosed(&self) -> bool {
        self.autoclosed
    }

    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }
}

/// A markup tree: its nodes, its root and its render options.
#[derive(Debug, Clone)]
pub struct Markup {
    arena: Arena<NodeData>,
    root: NodeId,
    options: RenderOptions,
}

impl Markup {
    /// Create a tree whose root has the given tag, with default options.
    ///
    /// An empty tag makes the root a plain container.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self::with_options(tag, RenderOptions::default())
    }

    /// Create a tree with explicit render options.
    pub fn with_options(tag: impl AsRef<str>, options: RenderOptions) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::element(tag.as_ref(), None));
        Self {
            arena,
            root,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            markup: self,
            id: self.root,
        }
    }

    pub fn root_mut(&mut self) -> NodeMut<'_> {
        let id = self.root;
        NodeMut { markup: self, id }
    }

    /// Read handle for a node; `None` if the id was removed or is out of range.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.is_live(id).then_some(NodeRef { markup: self, id })
    }

    /// Mutable handle for a node; `None` if the id was removed or is out of range.
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.is_live(id) {
            Some(NodeMut { markup: self, id })
        } else {
            None
        }
    }

    /// Render the whole tree.
    pub fn to_html(&self) -> String {
        self.root().to_html()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    pub(crate) fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|node| !node.is_removed())
    }

    fn top_of(&self, id: NodeId) -> NodeId {
        self.data(id).top.unwrap_or(id)
    }
}

/// Where a new child comes from in [`NodeMut::add_element`].
#[derive(Debug, Clone, Copy)]
pub enum ElementSource<'s> {
    /// A new element with this tag (empty for a fragment)
    Tag(&'s str),
    /// A copy of a subtree, possibly from another tree
    Subtree(NodeRef<'s>),
    /// A copy of a subtree of the tree being built
    Local(NodeId),
}

impl<'s> From<&'s str> for ElementSource<'s> {
    fn from(tag: &'s str) -> Self {
        ElementSource::Tag(tag)
    }
}

impl<'s> From<&'s String> for ElementSource<'s> {
    fn from(tag: &'s String) -> Self {
        ElementSource::Tag(tag.as_str())
    }
}

impl From<Tag> for ElementSource<'static> {
    fn from(tag: Tag) -> Self {
        ElementSource::Tag(tag.as_str())
    }
}

impl<'s> From<&'s Markup> for ElementSource<'s> {
    fn from(markup: &'s Markup) -> Self {
        ElementSource::Subtree(markup.root())
    }
}

impl<'s> From<NodeRef<'s>> for ElementSource<'s> {
    fn from(node: NodeRef<'s>) -> Self {
        ElementSource::Subtree(node)
    }
}

impl From<NodeId> for ElementSource<'static> {
    fn from(id: NodeId) -> Self {
        ElementSource::Local(id)
    }
}

/// Detached copy of a subtree, used to move node data between arenas.
struct Snapshot {
    data: NodeData,
    children: Vec<Snapshot>,
}

impl Snapshot {
    fn take(markup: &Markup, id: NodeId) -> Self {
        Snapshot {
            data: markup.data(id).clone(),
            children: markup
                .children_of(id)
                .map(|child| Snapshot::take(markup, child))
                .collect(),
        }
    }

    fn plant(self, arena: &mut Arena<NodeData>, top: NodeId) -> NodeId {
        let mut data = self.data;
        data.top = Some(top);
        let id = arena.new_node(data);
        for child in self.children {
            let child_id = child.plant(arena, top);
            id.append(child_id, arena);
        }
        id
    }
}

/// Shared handle to one node of a [`Markup`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    markup: &'a Markup,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn markup(&self) -> &'a Markup {
        self.markup
    }

    pub fn data(&self) -> &'a NodeData {
        self.markup.data(self.id)
    }

    pub fn tag(&self) -> &'a str {
        self.data().tag()
    }

    pub fn text(&self) -> &'a str {
        self.data().text()
    }

    pub fn attrs(&self) -> &'a Attributes {
        self.data().attrs()
    }

    /// Attribute value, `None` when missing or null.
    pub fn get(&self, name: &str) -> Option<&'a AttrValue> {
        self.attrs().get(name)
    }

    /// Whether the attribute is set and not null.
    pub fn contains(&self, name: &str) -> bool {
        self.attrs().contains(name)
    }

    pub fn is_autoclosed(&self) -> bool {
        self.data().is_autoclosed()
    }

    pub fn is_fragment(&self) -> bool {
        self.data().is_fragment()
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            markup: self.markup,
            id,
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.markup.arena[self.id].parent().map(|id| self.at(id))
    }

    /// The root this node was attached under; a root is its own top.
    pub fn top(&self) -> NodeRef<'a> {
        self.at(self.markup.top_of(self.id))
    }

    /// First child of this node's parent; `None` for a root.
    pub fn first(&self) -> Option<NodeRef<'a>> {
        let parent = self.parent()?;
        self.markup.arena[parent.id].first_child().map(|id| self.at(id))
    }

    /// Last child of this node's parent; `None` for a root.
    pub fn last(&self) -> Option<NodeRef<'a>> {
        let parent = self.parent()?;
        self.markup.arena[parent.id].last_child().map(|id| self.at(id))
    }

    /// Preceding sibling, or this node itself when there is none.
    pub fn previous(&self) -> NodeRef<'a> {
        self.markup.arena[self.id]
            .previous_sibling()
            .map_or(*self, |id| self.at(id))
    }

    /// Following sibling; `None` when this is the last child or a root.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<NodeRef<'a>> {
        self.markup.arena[self.id]
            .next_sibling()
            .map(|id| self.at(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let markup = self.markup;
        self.id
            .children(&markup.arena)
            .map(move |id| NodeRef { markup, id })
    }

    /// Render this node and its descendants.
    pub fn to_html(&self) -> String {
        crate::serialize::render_node(self.markup, self.id)
    }

    /// The whole tree as a string when `return_string` is set, else empty.
    pub fn s(&self, return_string: bool) -> String {
        if return_string {
            self.to_string()
        } else {
            String::new()
        }
    }
}

/// Exclusive handle to one node of a [`Markup`].
///
/// Setters consume the handle and hand it back so calls chain;
/// [`add_element`](NodeMut::add_element) hands back the new child instead.
pub struct NodeMut<'a> {
    markup: &'a mut Markup,
    id: NodeId,
}

impl std::fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeMut")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}

impl<'a> NodeMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view of this node.
    pub fn as_node(&self) -> NodeRef<'_> {
        NodeRef {
            markup: &*self.markup,
            id: self.id,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.markup.options
    }

    pub fn tag(&self) -> &str {
        self.markup.data(self.id).tag()
    }

    /// Rename the node. Autoclose stays as decided at creation.
    pub fn set_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.data_mut().tag = CompactString::new(tag.as_ref());
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.markup.data(self.id).attrs().get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.markup.data(self.id).attrs().contains(name)
    }

    fn data_mut(&mut self) -> &mut NodeData {
        self.markup.data_mut(self.id)
    }

    pub(crate) fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.data_mut().attrs
    }

    fn at(self, id: NodeId) -> NodeMut<'a> {
        NodeMut {
            markup: self.markup,
            id,
        }
    }

    /// Set one attribute. Setting [`AttrValue::Null`] keeps the slot but hides it.
    pub fn set(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs_mut().set(name, value.into());
        self
    }

    /// Alias of [`set`](NodeMut::set).
    pub fn attr(self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set(name, value)
    }

    /// Set several attributes at once, in iteration order.
    pub fn set_all<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        for (name, value) in attrs {
            self.attrs_mut().set(name.as_ref(), value.into());
        }
        self
    }

    /// Remove an attribute if present.
    pub fn unset(mut self, name: &str) -> Self {
        self.attrs_mut().unset(name);
        self
    }

    /// Append a child and return its handle.
    ///
    /// Subtrees are copied deeply: the copy and its source never share state.
    pub fn add_element<'s>(self, source: impl Into<ElementSource<'s>>) -> NodeMut<'a> {
        let top = self.markup.top_of(self.id);
        let child = match source.into() {
            ElementSource::Tag(tag) => self.markup.arena.new_node(NodeData::element(tag, Some(top))),
            ElementSource::Subtree(node) => {
                let snapshot = Snapshot::take(node.markup, node.id);
                snapshot.plant(&mut self.markup.arena, top)
            }
            ElementSource::Local(id) if self.markup.is_live(id) => {
                let snapshot = Snapshot::take(self.markup, id);
                snapshot.plant(&mut self.markup.arena, top)
            }
            ElementSource::Local(id) => {
                debug!(?id, "copy source is not in this tree, adding empty fragment");
                self.markup.arena.new_node(NodeData::element("", Some(top)))
            }
        };
        trace!(parent = ?self.id, ?child, "append child");
        self.id.append(child, &mut self.markup.arena);
        self.at(child)
    }

    /// Append a child, shape it with `build`, and return this node.
    pub fn with_child<'s>(
        self,
        source: impl Into<ElementSource<'s>>,
        build: impl FnOnce(NodeMut<'_>) -> NodeMut<'_>,
    ) -> Self {
        let id = self.id;
        let markup = self.markup;
        build(NodeMut { markup: &mut *markup, id }.add_element(source));
        NodeMut { markup, id }
    }

    /// Append a text fragment and return this node (not the fragment).
    ///
    /// With `avoid_xss` on, the text is escaped here, once.
    pub fn text(self, value: impl AsRef<str>) -> Self {
        let value = value.as_ref();
        let options = &self.markup.options;
        let text = if options.avoid_xss {
            escape(value, options.convention).into_owned()
        } else {
            value.to_string()
        };
        let top = self.markup.top_of(self.id);
        let fragment = self.markup.arena.new_node(NodeData::fragment(text, Some(top)));
        self.id.append(fragment, &mut self.markup.arena);
        self
    }

    pub fn parent(self) -> Option<NodeMut<'a>> {
        let parent = self.markup.arena[self.id].parent()?;
        Some(self.at(parent))
    }

    pub fn top(self) -> NodeMut<'a> {
        let top = self.markup.top_of(self.id);
        self.at(top)
    }

    pub fn first(self) -> Option<NodeMut<'a>> {
        let id = self.as_node().first()?.id;
        Some(self.at(id))
    }

    pub fn last(self) -> Option<NodeMut<'a>> {
        let id = self.as_node().last()?.id;
        Some(self.at(id))
    }

    /// Preceding sibling, or this node itself when there is none.
    pub fn previous(self) -> NodeMut<'a> {
        let id = self.as_node().previous().id;
        self.at(id)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(self) -> Option<NodeMut<'a>> {
        let id = self.as_node().next()?.id;
        Some(self.at(id))
    }

    /// Unlink this node (and its subtree) from its parent.
    ///
    /// Returns the parent, or `None` for a root, which is left in place.
    pub fn remove(self) -> Option<NodeMut<'a>> {
        let parent = self.markup.arena[self.id].parent()?;
        debug!(node = ?self.id, ?parent, "remove subtree");
        self.id.remove_subtree(&mut self.markup.arena);
        Some(self.at(parent))
    }

    /// Render this node and its descendants.
    pub fn to_html(&self) -> String {
        self.as_node().to_html()
    }

    /// The whole tree as a string when `return_string` is set, else empty.
    pub fn s(&self, return_string: bool) -> String {
        self.as_node().s(return_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn root_is_its_own_top() {
        let markup = Markup::new("div");
        let root = markup.root();
        assert_eq!(root.top().id(), root.id());
        assert!(root.parent().is_none());
        assert!(root.first().is_none());
        assert!(root.last().is_none());
        assert!(root.next().is_none());
        assert_eq!(root.previous().id(), root.id());
    }

    #[test]
    fn children_share_the_root_as_top() {
        let mut markup = Markup::new("ul");
        let li = markup.root_mut().add_element("li").add_element("span").id();
        let root = markup.root_id();
        assert_eq!(markup.node(li).unwrap().top().id(), root);
    }

    #[test]
    fn autoclose_is_decided_at_creation() {
        let mut markup = Markup::new("img");
        assert!(markup.root().is_autoclosed());
        markup.root_mut().set_tag("div");
        assert!(markup.root().is_autoclosed());
        assert_eq!(markup.root().tag(), "div");
    }

    #[test]
    fn sibling_navigation_uses_identity() {
        let mut markup = Markup::new("ul");
        // Identical siblings must still be told apart.
        let a = markup.root_mut().add_element("li").text("same").id();
        let b = markup.root_mut().add_element("li").text("same").id();
        let c = markup.root_mut().add_element("li").text("same").id();

        let node_b = markup.node(b).unwrap();
        assert_eq!(node_b.next().unwrap().id(), c);
        assert_eq!(node_b.previous().id(), a);
        assert_eq!(node_b.first().unwrap().id(), a);
        assert_eq!(node_b.last().unwrap().id(), c);

        let node_a = markup.node(a).unwrap();
        assert_eq!(node_a.previous().id(), a);
        assert!(markup.node(c).unwrap().next().is_none());
    }

    #[test]
    fn remove_unlinks_only_that_node() {
        let mut markup = Markup::new("ul");
        markup.root_mut().add_element("li").text("x");
        let second = markup.root_mut().add_element("li").text("x").id();
        markup.root_mut().add_element("li").text("x");

        let parent = markup.node_mut(second).unwrap().remove().unwrap().id();
        assert_eq!(parent, markup.root_id());
        assert_eq!(markup.root().children().count(), 2);
        assert!(markup.node(second).is_none());
    }

    #[test]
    fn removing_a_root_is_a_no_op() {
        let mut markup = Markup::new("div");
        assert!(markup.root_mut().remove().is_none());
        assert!(markup.node(markup.root_id()).is_some());
    }

    #[test]
    fn text_returns_the_element() {
        let mut markup = Markup::new("p");
        let id = markup.root_mut().text("a").text("b").id();
        assert_eq!(id, markup.root_id());
        let texts: Vec<_> = markup.root().children().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);
        assert!(markup.root().children().all(|c| c.is_fragment()));
    }

    #[test]
    fn copy_from_another_tree_is_independent() {
        let mut original = Markup::new("span");
        original.root_mut().set("class", "a").text("inner");

        let mut host = Markup::new("div");
        let copy = host.root_mut().add_element(&original).set("class", "b").id();

        assert_eq!(original.to_html(), r#"<span class="a">inner</span>"#);
        assert_eq!(host.to_html(), r#"<div><span class="b">inner</span></div>"#);
        assert_eq!(host.node(copy).unwrap().top().id(), host.root_id());
        assert_eq!(host.node(copy).unwrap().parent().unwrap().id(), host.root_id());
    }

    #[test]
    fn local_copy_duplicates_subtree() {
        let mut markup = Markup::new("div");
        let item = markup.root_mut().add_element("p").set("id", "x").text("t").id();
        markup.root_mut().add_element(item).set("id", "y");
        assert_eq!(markup.to_html(), r#"<div><p id="x">t</p><p id="y">t</p></div>"#);
    }

    #[test]
    fn stale_local_copy_adds_empty_fragment() {
        let mut markup = Markup::new("div");
        let gone = markup.root_mut().add_element("p").id();
        markup.node_mut(gone).unwrap().remove();
        markup.root_mut().add_element(gone);
        assert_eq!(markup.to_html(), "<div></div>");
        assert_eq!(markup.root().children().count(), 1);
    }

    #[test]
    fn parent_navigation_allows_continuing_the_chain() {
        let mut markup = Markup::new("div");
        markup
            .root_mut()
            .add_element("h1")
            .text("Title")
            .parent()
            .unwrap()
            .add_element("p")
            .text("Body");
        assert_eq!(markup.to_html(), "<div><h1>Title</h1><p>Body</p></div>");
    }

    #[test]
    fn unset_and_contains() {
        let mut markup = Markup::new("div");
        let node = markup.root_mut().set("id", "x").set("title", None::<&str>);
        assert!(node.contains("id"));
        assert!(!node.contains("title"));
        assert_eq!(node.get("title"), None);
        let node = node.unset("id");
        assert!(!node.contains("id"));
    }
}
