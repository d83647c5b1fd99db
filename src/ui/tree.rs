//! Named views and groups kept in an index arena.
//!
//! Nodes live in a slot vector and refer to each other by [`NodeId`]. A
//! group's children are drawn in order, so the last child is on top; focus
//! cycling is a rotation of that child list.

use ratatui::layout::Rect;
use tracing::debug;

use crate::error::TreeError;
use crate::ui::view::View;

/// Name of the group every other node descends from.
pub const ROOT: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub enum NodeKind {
    Leaf(Box<View>),
    Group,
}

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    area: Rect,
    kind: NodeKind,
}

/// Arena of views and the groups that order them.
#[derive(Debug)]
pub struct ViewTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl ViewTree {
    /// Create a tree whose root group covers `area`.
    pub fn new(area: Rect) -> Self {
        Self {
            nodes: vec![Some(Node {
                name: ROOT.to_string(),
                parent: None,
                children: Vec::new(),
                area,
                kind: NodeKind::Group,
            })],
            free: Vec::new(),
        }
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create or move/resize view `name` under group `parent`.
    ///
    /// The view's inner size follows `area`, minus the border when framed.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownGroup`] if `parent` is not a group,
    /// [`TreeError::InvalidName`] if `name` is empty or names a group,
    /// [`TreeError::InvalidArea`] if `area` is empty.
    pub fn set_view(
        &mut self,
        parent: &str,
        name: &str,
        area: Rect,
    ) -> Result<&mut View, TreeError> {
        let id = match self.find(name) {
            Some(id) => {
                if !self.is_leaf(id) {
                    return Err(TreeError::InvalidName);
                }
                self.place(id, parent, area)?;
                id
            }
            None => {
                let kind = NodeKind::Leaf(Box::new(View::new(name, 0, 0)));
                self.insert(parent, name, area, kind)?
            }
        };
        let Some(Node {
            area,
            kind: NodeKind::Leaf(view),
            ..
        }) = self.node_mut(id)
        else {
            return Err(TreeError::UnknownView(name.to_string()));
        };
        let inner = inner_area(view, *area);
        view.resize(usize::from(inner.width), usize::from(inner.height));
        Ok(view.as_mut())
    }

    /// Create or move/resize group `name` under group `parent`.
    ///
    /// # Errors
    ///
    /// As [`ViewTree::set_view`], with `name` required not to be a view.
    pub fn set_group(&mut self, parent: &str, name: &str, area: Rect) -> Result<NodeId, TreeError> {
        match self.find(name) {
            Some(id) => {
                if self.is_leaf(id) || id == self.root() {
                    return Err(TreeError::InvalidName);
                }
                self.place(id, parent, area)?;
                Ok(id)
            }
            None => self.insert(parent, name, area, NodeKind::Group),
        }
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        match &self.node(self.find(name)?)?.kind {
            NodeKind::Leaf(view) => Some(view.as_ref()),
            NodeKind::Group => None,
        }
    }

    pub fn view_mut(&mut self, name: &str) -> Option<&mut View> {
        let id = self.find(name)?;
        match &mut self.node_mut(id)?.kind {
            NodeKind::Leaf(view) => Some(view.as_mut()),
            NodeKind::Group => None,
        }
    }

    /// Outer area of node `name`.
    pub fn area(&self, name: &str) -> Option<Rect> {
        self.find(name).and_then(|id| self.node(id)).map(|node| node.area)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Topmost visible view whose area contains the screen cell (x, y).
    pub fn view_at(&self, x: u16, y: u16) -> Option<&str> {
        let point = ratatui::layout::Position::new(x, y);
        self.leaves()
            .into_iter()
            .rev()
            .filter_map(|id| self.node(id))
            .find(|node| {
                matches!(&node.kind, NodeKind::Leaf(view) if !view.hidden)
                    && node.area.contains(point)
            })
            .map(|node| node.name.as_str())
    }

    /// Remove node `name` and everything below it.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownView`] if no such node exists,
    /// [`TreeError::InvalidName`] for the root.
    pub fn remove(&mut self, name: &str) -> Result<(), TreeError> {
        let id = self
            .find(name)
            .ok_or_else(|| TreeError::UnknownView(name.to_string()))?;
        if id == self.root() {
            return Err(TreeError::InvalidName);
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(next.0);
            }
        }
        debug!(node = name, "removed");
        Ok(())
    }

    /// Move node `name` to the end of its parent's children so it draws last.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownView`] if no such node exists.
    pub fn set_on_top(&mut self, name: &str) -> Result<(), TreeError> {
        let id = self
            .find(name)
            .ok_or_else(|| TreeError::UnknownView(name.to_string()))?;
        if let Some(parent) = self.detach(id)
            && let Some(node) = self.node_mut(parent)
        {
            node.children.push(id);
        }
        Ok(())
    }

    /// Rotate group `name` so its first child moves to the end.
    ///
    /// Returns the view now on top, if the last child is a view.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownGroup`] if `name` is not a group.
    pub fn round_robin_forward(&mut self, name: &str) -> Result<Option<&str>, TreeError> {
        self.rotate(name, <[NodeId]>::rotate_left)
    }

    /// Rotate group `name` so its last child moves to the front.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownGroup`] if `name` is not a group.
    pub fn round_robin_backward(&mut self, name: &str) -> Result<Option<&str>, TreeError> {
        self.rotate(name, <[NodeId]>::rotate_right)
    }

    /// Child names of group `name` in draw order.
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.find(name)
            .and_then(|id| self.node(id))
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.node(c))
                    .map(|child| child.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of all views in draw order.
    pub fn view_names(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter_map(|id| self.node(id))
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Resize the root group, e.g. after a terminal resize.
    pub fn set_root_area(&mut self, area: Rect) {
        if let Some(root) = self.node_mut(self.root()) {
            root.area = area;
        }
    }

    /// Visit every visible view with its outer area, bottom first.
    pub fn for_each_view_mut(&mut self, mut f: impl FnMut(&mut View, Rect)) {
        for id in self.leaves() {
            if let Some(Node {
                area,
                kind: NodeKind::Leaf(view),
                ..
            }) = self.node_mut(id)
                && !view.hidden
            {
                f(view.as_mut(), *area);
            }
        }
    }

    // --- Private helpers ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|node| node.name == name))
            .map(NodeId)
    }

    fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|node| matches!(node.kind, NodeKind::Leaf(_)))
    }

    fn group(&self, name: &str) -> Result<NodeId, TreeError> {
        self.find(name)
            .filter(|&id| self.node(id).is_some_and(|n| matches!(n.kind, NodeKind::Group)))
            .ok_or_else(|| TreeError::UnknownGroup(name.to_string()))
    }

    /// Unlink `id` from its parent's children; returns the parent.
    fn detach(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        Some(parent)
    }

    fn rotate(
        &mut self,
        name: &str,
        rotate: fn(&mut [NodeId], usize),
    ) -> Result<Option<&str>, TreeError> {
        let id = self.group(name)?;
        let Some(node) = self.node_mut(id) else {
            return Err(TreeError::UnknownGroup(name.to_string()));
        };
        if node.children.len() <= 1 {
            return Ok(None);
        }
        rotate(&mut node.children, 1);
        Ok(self.last_view(id))
    }

    fn insert(
        &mut self,
        parent: &str,
        name: &str,
        area: Rect,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        if name.is_empty() {
            return Err(TreeError::InvalidName);
        }
        if area.is_empty() {
            return Err(TreeError::InvalidArea(name.to_string()));
        }
        let parent_id = self.group(parent)?;
        let node = Node {
            name: name.to_string(),
            parent: Some(parent_id),
            children: Vec::new(),
            area,
            kind,
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(parent_node) = self.node_mut(parent_id) {
            parent_node.children.push(id);
        }
        debug!(node = name, parent, "created");
        Ok(id)
    }

    fn place(&mut self, id: NodeId, parent: &str, area: Rect) -> Result<(), TreeError> {
        if area.is_empty() {
            let name = self.node(id).map(|n| n.name.clone()).unwrap_or_default();
            return Err(TreeError::InvalidArea(name));
        }
        let parent_id = self.group(parent)?;
        if self.is_ancestor(id, parent_id) {
            return Err(TreeError::InvalidName);
        }
        let old_parent = self.node(id).and_then(|n| n.parent);
        if old_parent != Some(parent_id) {
            self.detach(id);
            if let Some(node) = self.node_mut(parent_id) {
                node.children.push(id);
            }
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(parent_id);
            node.area = area;
        }
        Ok(())
    }

    /// Whether `id` is `other` or one of its ancestors.
    fn is_ancestor(&self, id: NodeId, other: NodeId) -> bool {
        let mut cursor = Some(other);
        while let Some(current) = cursor {
            if current == id {
                return true;
            }
            cursor = self.node(current).and_then(|n| n.parent);
        }
        false
    }

    fn last_view(&self, group: NodeId) -> Option<&str> {
        self.node(group)?
            .children
            .iter()
            .rev()
            .filter_map(|&c| self.node(c))
            .find(|node| matches!(node.kind, NodeKind::Leaf(_)))
            .map(|node| node.name.as_str())
    }

    /// Leaf ids in draw order (depth first, children in order).
    fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            match node.kind {
                NodeKind::Leaf(_) => out.push(id),
                NodeKind::Group => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }
}

/// Content area of `view` inside its outer `area`.
pub fn inner_area(view: &View, area: Rect) -> Rect {
    if view.frame {
        area.inner(ratatui::layout::Margin::new(1, 1))
    } else {
        area
    }
}
