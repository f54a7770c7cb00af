//! Host video-mixer scene-graph interface
//!
//! The host application owns native scenes, a global registry of sources
//! and the scene-graph nodes that place a source inside a scene. Everything
//! in `composition` talks to the host exclusively through [`SceneGraph`].
//!
//! Source references follow acquire/release semantics: `find_source` and
//! `create_source` hand out a reference, `release_source` gives it back and
//! the host destroys the source once nobody references it.

pub mod memory;

use glam::Vec2;

pub use memory::{MemoryHost, MemoryNode, MemorySource};

/// Identifier of a native scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeSceneId(pub u64);

/// Identifier of a source in the host's global registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u64);

/// Identifier of a scene-graph node (a placed source) within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NativeSceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Node transform as the host applies it (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Position in canvas pixels
    pub position: Vec2,
    /// Scale factors (1.0 = 100%)
    pub scale: Vec2,
    /// Rotation in degrees (clockwise)
    pub rotation: f32,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

/// Per-edge crop in source pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Crop {
    pub fn is_empty(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }
}

/// A source found in the host registry
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    /// Host source kind (e.g. "monitor_capture")
    pub kind: String,
}

/// Errors reported by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host has no source implementation for this kind
    UnsupportedKind(String),
    /// Source settings were rejected
    InvalidSettings(String),
    /// A source with this name is already registered
    DuplicateSource(String),
    UnknownScene(NativeSceneId),
    UnknownSource(SourceId),
    UnknownNode(NodeId),
    /// The host could not allocate the object
    Exhausted,
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::UnsupportedKind(kind) => write!(f, "Unsupported source kind: {}", kind),
            HostError::InvalidSettings(msg) => write!(f, "Invalid source settings: {}", msg),
            HostError::DuplicateSource(name) => write!(f, "Source already exists: {}", name),
            HostError::UnknownScene(id) => write!(f, "Unknown scene: {}", id),
            HostError::UnknownSource(id) => write!(f, "Unknown source: {}", id),
            HostError::UnknownNode(id) => write!(f, "Unknown node: {}", id),
            HostError::Exhausted => write!(f, "Host resources exhausted"),
        }
    }
}

impl std::error::Error for HostError {}

/// Scene-graph primitives provided by the host video mixer.
///
/// All calls are synchronous and made from the host's UI thread.
pub trait SceneGraph {
    /// Create an empty native scene
    fn create_scene(&mut self, name: &str) -> Result<NativeSceneId, HostError>;

    /// Destroy a native scene and every node still in it
    fn destroy_scene(&mut self, scene: NativeSceneId);

    /// Look up a registered source by name, acquiring a reference to it
    fn find_source(&mut self, name: &str) -> Option<SourceInfo>;

    /// Create and register a source, returning the first reference to it
    fn create_source(
        &mut self,
        kind: &str,
        name: &str,
        settings: &crate::properties::PropertyBag,
    ) -> Result<SourceId, HostError>;

    /// Replace the settings of a source
    fn update_source(
        &mut self,
        source: SourceId,
        settings: &crate::properties::PropertyBag,
    ) -> Result<(), HostError>;

    /// Give back a reference obtained from `find_source` or `create_source`
    fn release_source(&mut self, source: SourceId);

    /// Place a source in a scene, creating a node at the identity transform
    fn add_node(&mut self, scene: NativeSceneId, source: SourceId) -> Result<NodeId, HostError>;

    /// Remove a node from a scene
    fn remove_node(&mut self, scene: NativeSceneId, node: NodeId);

    /// Check whether a node exists in the given scene
    fn has_node(&self, scene: NativeSceneId, node: NodeId) -> bool;

    fn node_transform(&self, scene: NativeSceneId, node: NodeId) -> Option<NodeTransform>;

    fn set_node_transform(
        &mut self,
        scene: NativeSceneId,
        node: NodeId,
        transform: &NodeTransform,
    ) -> Result<(), HostError>;

    fn set_node_crop(&mut self, scene: NativeSceneId, node: NodeId, crop: &Crop) -> Result<(), HostError>;

    fn set_node_visible(&mut self, scene: NativeSceneId, node: NodeId, visible: bool) -> Result<(), HostError>;

    fn set_node_locked(&mut self, scene: NativeSceneId, node: NodeId, locked: bool) -> Result<(), HostError>;
}
