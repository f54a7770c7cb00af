//! In-process scene graph
//!
//! `MemoryHost` keeps scenes, nodes and a reference-counted source registry
//! in plain collections. It backs the command-line tool and the tests, and
//! counts every mutating node/source call so callers can verify that
//! redundant pushes were skipped.

use std::collections::HashMap;

use super::{Crop, HostError, NativeSceneId, NodeId, NodeTransform, SceneGraph, SourceId, SourceInfo};
use crate::properties::PropertyBag;

/// A registered source
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub name: String,
    pub kind: String,
    pub settings: PropertyBag,
    /// Outstanding references
    pub refs: u32,
}

/// A node placed in a scene
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub id: NodeId,
    pub source: SourceId,
    pub transform: NodeTransform,
    pub crop: Crop,
    pub visible: bool,
    pub locked: bool,
}

#[derive(Debug, Default)]
struct MemoryScene {
    name: String,
    nodes: Vec<MemoryNode>,
}

/// In-memory implementation of [`SceneGraph`]
#[derive(Debug)]
pub struct MemoryHost {
    next_id: u64,
    scenes: HashMap<NativeSceneId, MemoryScene>,
    sources: HashMap<SourceId, MemorySource>,
    /// Source kinds this host can instantiate (`None` = any non-empty kind)
    supported_kinds: Option<Vec<String>>,
    /// Number of mutating node/source calls after creation
    push_count: usize,
    fail_next_source: bool,
    fail_next_node: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            scenes: HashMap::new(),
            sources: HashMap::new(),
            supported_kinds: None,
            push_count: 0,
            fail_next_source: false,
            fail_next_node: false,
        }
    }

    /// Restrict the source kinds the host accepts
    pub fn with_supported_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_kinds = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    /// Make the next `create_source` call fail
    pub fn fail_next_source_creation(&mut self) {
        self.fail_next_source = true;
    }

    /// Make the next `add_node` call fail
    pub fn fail_next_node_creation(&mut self) {
        self.fail_next_node = true;
    }

    /// Number of transform/visibility/lock/settings pushes received
    pub fn push_count(&self) -> usize {
        self.push_count
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene_name(&self, scene: NativeSceneId) -> Option<&str> {
        self.scenes.get(&scene).map(|s| s.name.as_str())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source(&self, id: SourceId) -> Option<&MemorySource> {
        self.sources.get(&id)
    }

    pub fn source_by_name(&self, name: &str) -> Option<(SourceId, &MemorySource)> {
        self.sources
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(id, s)| (*id, s))
    }

    /// Nodes of a scene in z-order (bottom first)
    pub fn nodes(&self, scene: NativeSceneId) -> &[MemoryNode] {
        self.scenes.get(&scene).map(|s| s.nodes.as_slice()).unwrap_or(&[])
    }

    pub fn node(&self, scene: NativeSceneId, node: NodeId) -> Option<&MemoryNode> {
        self.nodes(scene).iter().find(|n| n.id == node)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node_mut(&mut self, scene: NativeSceneId, node: NodeId) -> Result<&mut MemoryNode, HostError> {
        let scene_entry = self.scenes.get_mut(&scene).ok_or(HostError::UnknownScene(scene))?;
        scene_entry
            .nodes
            .iter_mut()
            .find(|n| n.id == node)
            .ok_or(HostError::UnknownNode(node))
    }

    fn is_supported(&self, kind: &str) -> bool {
        match &self.supported_kinds {
            Some(kinds) => kinds.iter().any(|k| k == kind),
            None => !kind.is_empty(),
        }
    }
}

impl SceneGraph for MemoryHost {
    fn create_scene(&mut self, name: &str) -> Result<NativeSceneId, HostError> {
        let id = NativeSceneId(self.allocate_id());
        self.scenes.insert(
            id,
            MemoryScene {
                name: name.to_string(),
                nodes: Vec::new(),
            },
        );
        log::debug!("Created native scene '{}' ({})", name, id);
        Ok(id)
    }

    fn destroy_scene(&mut self, scene: NativeSceneId) {
        if let Some(removed) = self.scenes.remove(&scene) {
            log::debug!("Destroyed native scene '{}' ({} nodes)", removed.name, removed.nodes.len());
        }
    }

    fn find_source(&mut self, name: &str) -> Option<SourceInfo> {
        let (id, source) = self.sources.iter_mut().find(|(_, s)| s.name == name)?;
        source.refs += 1;
        Some(SourceInfo {
            id: *id,
            name: source.name.clone(),
            kind: source.kind.clone(),
        })
    }

    fn create_source(&mut self, kind: &str, name: &str, settings: &PropertyBag) -> Result<SourceId, HostError> {
        if std::mem::take(&mut self.fail_next_source) {
            return Err(HostError::Exhausted);
        }
        if !self.is_supported(kind) {
            return Err(HostError::UnsupportedKind(kind.to_string()));
        }
        if name.is_empty() {
            return Err(HostError::InvalidSettings("source name is empty".to_string()));
        }
        if self.sources.values().any(|s| s.name == name) {
            return Err(HostError::DuplicateSource(name.to_string()));
        }

        let id = SourceId(self.allocate_id());
        self.sources.insert(
            id,
            MemorySource {
                name: name.to_string(),
                kind: kind.to_string(),
                settings: settings.clone(),
                refs: 1,
            },
        );
        log::debug!("Created source '{}' of kind {} ({})", name, kind, id);
        Ok(id)
    }

    fn update_source(&mut self, source: SourceId, settings: &PropertyBag) -> Result<(), HostError> {
        let entry = self.sources.get_mut(&source).ok_or(HostError::UnknownSource(source))?;
        entry.settings = settings.clone();
        self.push_count += 1;
        Ok(())
    }

    fn release_source(&mut self, source: SourceId) {
        let Some(entry) = self.sources.get_mut(&source) else {
            log::warn!("Release of unknown source {}", source);
            return;
        };
        entry.refs = entry.refs.saturating_sub(1);
        if entry.refs == 0 {
            if let Some(removed) = self.sources.remove(&source) {
                log::debug!("Destroyed source '{}' ({})", removed.name, source);
            }
        }
    }

    fn add_node(&mut self, scene: NativeSceneId, source: SourceId) -> Result<NodeId, HostError> {
        if std::mem::take(&mut self.fail_next_node) {
            return Err(HostError::Exhausted);
        }
        if !self.sources.contains_key(&source) {
            return Err(HostError::UnknownSource(source));
        }
        if !self.scenes.contains_key(&scene) {
            return Err(HostError::UnknownScene(scene));
        }

        let id = NodeId(self.allocate_id());
        if let Some(scene_entry) = self.scenes.get_mut(&scene) {
            scene_entry.nodes.push(MemoryNode {
                id,
                source,
                transform: NodeTransform::default(),
                crop: Crop::default(),
                visible: true,
                locked: false,
            });
        }
        Ok(id)
    }

    fn remove_node(&mut self, scene: NativeSceneId, node: NodeId) {
        if let Some(scene_entry) = self.scenes.get_mut(&scene) {
            scene_entry.nodes.retain(|n| n.id != node);
        }
    }

    fn has_node(&self, scene: NativeSceneId, node: NodeId) -> bool {
        self.node(scene, node).is_some()
    }

    fn node_transform(&self, scene: NativeSceneId, node: NodeId) -> Option<NodeTransform> {
        self.node(scene, node).map(|n| n.transform)
    }

    fn set_node_transform(
        &mut self,
        scene: NativeSceneId,
        node: NodeId,
        transform: &NodeTransform,
    ) -> Result<(), HostError> {
        self.node_mut(scene, node)?.transform = *transform;
        self.push_count += 1;
        Ok(())
    }

    fn set_node_crop(&mut self, scene: NativeSceneId, node: NodeId, crop: &Crop) -> Result<(), HostError> {
        self.node_mut(scene, node)?.crop = *crop;
        self.push_count += 1;
        Ok(())
    }

    fn set_node_visible(&mut self, scene: NativeSceneId, node: NodeId, visible: bool) -> Result<(), HostError> {
        self.node_mut(scene, node)?.visible = visible;
        self.push_count += 1;
        Ok(())
    }

    fn set_node_locked(&mut self, scene: NativeSceneId, node: NodeId, locked: bool) -> Result<(), HostError> {
        self.node_mut(scene, node)?.locked = locked;
        self.push_count += 1;
        Ok(())
    }
}
