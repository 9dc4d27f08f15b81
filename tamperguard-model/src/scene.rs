//! Scene graph contract and an in-memory implementation.
//!
//! The change-detection core never walks a host's object model directly. It
//! asks a [`SceneGraph`] for display names, parents, owning nodes and identity
//! markers, and treats every failed lookup as an unassigned reference.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use tamperguard_types::{Handle, StableId};
use thiserror::Error;

/// Failure to resolve a reference through the scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The handle does not (or no longer does) point at a live object.
    #[error("reference {0} is not assigned")]
    Unassigned(Handle),

    /// Walking the parent chain did not reach a root.
    #[error("hierarchy above {handle} is cyclic or deeper than {max_depth} levels")]
    TooDeep { handle: Handle, max_depth: usize },
}

/// Side component holding a durable identifier for its node.
///
/// The identifier is generated when the marker is first attached and only
/// changes on an explicit [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityMarker {
    id: StableId,
}

impl IdentityMarker {
    /// Creates a marker with a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            id: StableId::generate(),
        }
    }

    /// Creates a marker carrying a previously persisted identifier.
    #[must_use]
    pub const fn with_id(id: StableId) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn id(&self) -> StableId {
        self.id
    }

    /// Replaces the identifier with a fresh one.
    pub fn reset(&mut self) {
        self.id = StableId::generate();
    }
}

/// Lookups the core needs from the hosting document.
pub trait SceneGraph {
    /// Display name of a node or component. Components report their node's name.
    fn display_name(&self, handle: Handle) -> Result<String, ResolveError>;

    /// Hierarchical parent of a node, `None` at the root.
    fn parent(&self, node: Handle) -> Result<Option<Handle>, ResolveError>;

    /// The node a component is attached to. A node owns itself.
    fn owning_node(&self, handle: Handle) -> Result<Handle, ResolveError>;

    /// Identity marker attached to a node, if any.
    fn identity_marker(&self, node: Handle) -> Option<IdentityMarker>;
}

#[derive(Debug, Clone)]
struct SceneNode {
    name: String,
    parent: Option<Handle>,
    marker: Option<IdentityMarker>,
}

#[derive(Debug, Clone)]
struct SceneComponent {
    node: Handle,
    type_name: String,
}

#[derive(Debug, Default)]
struct SceneState {
    next_handle: u64,
    nodes: BTreeMap<Handle, SceneNode>,
    components: BTreeMap<Handle, SceneComponent>,
}

impl SceneState {
    fn allocate(&mut self) -> Handle {
        self.next_handle += 1;
        Handle::new(self.next_handle)
    }

    fn reserve(&mut self, handle: Handle) {
        self.next_handle = self.next_handle.max(handle.raw());
    }

    fn node_mut(&mut self, node: Handle) -> Result<&mut SceneNode, ResolveError> {
        self.nodes.get_mut(&node).ok_or(ResolveError::Unassigned(node))
    }
}

/// In-memory scene hierarchy of named nodes and their components.
///
/// All mutators take `&self` so a tree can be shared with watchers while a
/// test or tool keeps editing it.
#[derive(Debug, Default)]
pub struct SceneTree {
    state: RefCell<SceneState>,
}

impl SceneTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under `parent` and returns its new handle.
    pub fn add_node(&self, name: &str, parent: Option<Handle>) -> Handle {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.nodes.insert(
            handle,
            SceneNode {
                name: name.into(),
                parent,
                marker: None,
            },
        );
        handle
    }

    /// Adds a node with a handle chosen by the caller, replacing any node
    /// already stored under it.
    pub fn insert_node(&self, handle: Handle, name: &str, parent: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        state.reserve(handle);
        state.nodes.insert(
            handle,
            SceneNode {
                name: name.into(),
                parent,
                marker: None,
            },
        );
    }

    /// Attaches a component of `type_name` to `node` and returns its handle.
    pub fn add_component(&self, node: Handle, type_name: &str) -> Handle {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate();
        state.components.insert(
            handle,
            SceneComponent {
                node,
                type_name: type_name.into(),
            },
        );
        handle
    }

    /// Attaches a component with a handle chosen by the caller.
    pub fn insert_component(&self, handle: Handle, node: Handle, type_name: &str) {
        let mut state = self.state.borrow_mut();
        state.reserve(handle);
        state.components.insert(
            handle,
            SceneComponent {
                node,
                type_name: type_name.into(),
            },
        );
    }

    /// Renames a node.
    pub fn rename(&self, node: Handle, name: &str) -> Result<(), ResolveError> {
        self.state.borrow_mut().node_mut(node)?.name = name.into();
        Ok(())
    }

    /// Moves a node under a new parent (or to the root).
    pub fn reparent(&self, node: Handle, parent: Option<Handle>) -> Result<(), ResolveError> {
        self.state.borrow_mut().node_mut(node)?.parent = parent;
        Ok(())
    }

    /// Destroys a node or component. References to it become unassigned.
    pub fn remove(&self, handle: Handle) -> bool {
        let mut state = self.state.borrow_mut();
        state.nodes.remove(&handle).is_some() || state.components.remove(&handle).is_some()
    }

    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        let state = self.state.borrow();
        state.nodes.contains_key(&handle) || state.components.contains_key(&handle)
    }

    /// Type name of a component.
    #[must_use]
    pub fn component_type(&self, component: Handle) -> Option<String> {
        self.state
            .borrow()
            .components
            .get(&component)
            .map(|c| c.type_name.clone())
    }

    /// Returns the node's identity marker, attaching a new one if it has none.
    pub fn attach_marker(&self, node: Handle) -> Result<IdentityMarker, ResolveError> {
        let mut state = self.state.borrow_mut();
        let node = state.node_mut(node)?;
        Ok(*node.marker.get_or_insert_with(IdentityMarker::generate))
    }

    /// Attaches a marker carrying a persisted identifier.
    pub fn set_marker(&self, node: Handle, marker: IdentityMarker) -> Result<(), ResolveError> {
        self.state.borrow_mut().node_mut(node)?.marker = Some(marker);
        Ok(())
    }

    /// Regenerates the identifier of the node's marker, attaching one if needed.
    pub fn reset_marker(&self, node: Handle) -> Result<IdentityMarker, ResolveError> {
        let mut state = self.state.borrow_mut();
        let node = state.node_mut(node)?;
        let marker = node.marker.get_or_insert_with(IdentityMarker::generate);
        marker.reset();
        Ok(*marker)
    }

    /// Removes the node's marker and returns it.
    pub fn detach_marker(&self, node: Handle) -> Option<IdentityMarker> {
        self.state
            .borrow_mut()
            .nodes
            .get_mut(&node)
            .and_then(|n| n.marker.take())
    }
}

impl SceneGraph for SceneTree {
    fn display_name(&self, handle: Handle) -> Result<String, ResolveError> {
        let state = self.state.borrow();
        if let Some(node) = state.nodes.get(&handle) {
            return Ok(node.name.clone());
        }
        let component = state
            .components
            .get(&handle)
            .ok_or(ResolveError::Unassigned(handle))?;
        state
            .nodes
            .get(&component.node)
            .map(|n| n.name.clone())
            .ok_or(ResolveError::Unassigned(component.node))
    }

    fn parent(&self, node: Handle) -> Result<Option<Handle>, ResolveError> {
        self.state
            .borrow()
            .nodes
            .get(&node)
            .map(|n| n.parent)
            .ok_or(ResolveError::Unassigned(node))
    }

    fn owning_node(&self, handle: Handle) -> Result<Handle, ResolveError> {
        let state = self.state.borrow();
        if state.nodes.contains_key(&handle) {
            return Ok(handle);
        }
        state
            .components
            .get(&handle)
            .map(|c| c.node)
            .ok_or(ResolveError::Unassigned(handle))
    }

    fn identity_marker(&self, node: Handle) -> Option<IdentityMarker> {
        self.state.borrow().nodes.get(&node).and_then(|n| n.marker)
    }
}
