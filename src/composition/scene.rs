//! Scene: an ordered collection of attached items over one native scene
//!
//! Insertion order is z-order (first item at the bottom). Every item in a
//! scene is attached: it has a host node in this scene's native scene and
//! holds one reference to its host source. Dropping the scene removes the
//! nodes, gives the source references back and destroys the native scene.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{Crop, HostError, NativeSceneId, NodeId, NodeTransform, SceneGraph, SourceId};
use crate::properties::PropertyBag;

use super::item::{SceneHandle, SceneItem};

/// Errors from scene operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// An item with this name already exists in the scene
    NameCollision(String),
    /// The item is already attached to a scene
    AlreadyAttached(String),
    /// The host refused to create the native scene
    SceneCreation(HostError),
    /// The host source for an item could not be found or created
    SourceCreation { name: String, source: HostError },
    /// The host refused to place the source in the scene
    NodeCreation { name: String, source: HostError },
    /// The id does not name an item of this scene
    UnresolvedItem(NodeId),
    /// A host call failed while pushing updates
    Host(HostError),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::NameCollision(name) => write!(f, "Scene already contains an item named '{}'", name),
            SceneError::AlreadyAttached(name) => write!(f, "Item '{}' is already attached to a scene", name),
            SceneError::SceneCreation(e) => write!(f, "Failed to create native scene: {}", e),
            SceneError::SourceCreation { name, source } => {
                write!(f, "Failed to create source for '{}': {}", name, source)
            }
            SceneError::NodeCreation { name, source } => {
                write!(f, "Failed to place '{}' in scene: {}", name, source)
            }
            SceneError::UnresolvedItem(id) => write!(f, "No item with id {} in this scene", id),
            SceneError::Host(e) => write!(f, "Host error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::SceneCreation(e) | SceneError::Host(e) => Some(e),
            SceneError::SourceCreation { source, .. } | SceneError::NodeCreation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<HostError> for SceneError {
    fn from(err: HostError) -> Self {
        SceneError::Host(err)
    }
}

/// A named scene backed by a native host scene
pub struct Scene<H: SceneGraph> {
    name: String,
    host: Rc<RefCell<H>>,
    native: NativeSceneId,
    items: Vec<SceneItem>,
}

impl<H: SceneGraph> Scene<H> {
    /// Create an empty scene and its native counterpart
    pub fn new(name: impl Into<String>, host: Rc<RefCell<H>>) -> Result<Self, SceneError> {
        let name = name.into();
        let native = host
            .borrow_mut()
            .create_scene(&name)
            .map_err(SceneError::SceneCreation)?;
        tracing::debug!(scene = %name, native = %native, "Scene created");
        Ok(Self {
            name,
            host,
            native,
            items: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle items use to refer back to this scene
    pub fn handle(&self) -> SceneHandle {
        SceneHandle(self.native)
    }

    pub fn native(&self) -> NativeSceneId {
        self.native
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in z-order (bottom first)
    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn item(&self, id: NodeId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.scene_id() == Some(id))
    }

    /// Mutable access for editing settings and properties.
    ///
    /// Edits reach the host on the next `apply_scene_item_settings_update`.
    pub fn item_mut(&mut self, id: NodeId) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|item| item.scene_id() == Some(id))
    }

    pub fn item_by_name(&self, name: &str) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn item_by_name_mut(&mut self, name: &str) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|item| item.name() == name)
    }

    /// Z-order position of an item
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.items.iter().position(|item| item.scene_id() == Some(id))
    }

    /// Attach an item: acquire its host source, place it in the native
    /// scene at its current settings and append it on top.
    ///
    /// On failure nothing changes, neither here nor in the host.
    pub fn attach(&mut self, item: impl Into<SceneItem>) -> Result<NodeId, SceneError> {
        let mut item = item.into();
        let name = item.name().to_string();

        if self.item_by_name(&name).is_some() {
            tracing::warn!(scene = %self.name, item = %name, "Attach rejected: name already in use");
            return Err(SceneError::NameCollision(name));
        }
        if item.scene().is_some() {
            return Err(SceneError::AlreadyAttached(name));
        }

        let properties = item.properties();
        let settings = item.settings();

        let mut host = self.host.borrow_mut();
        let (source, reused) = Self::acquire_source(&mut *host, &name, item.kind(), &properties)?;

        let transform = settings.to_transform(0.0);
        let node = match Self::create_scene_item(
            &mut *host,
            self.native,
            source,
            !settings.hidden,
            &transform,
            &Crop::default(),
        ) {
            Ok(node) => node,
            Err(e) => {
                host.release_source(source);
                tracing::warn!(scene = %self.name, item = %name, "Node creation failed: {}", e);
                return Err(SceneError::NodeCreation { name, source: e });
            }
        };

        if let Err(e) = host.set_node_locked(self.native, node, settings.lock) {
            host.remove_node(self.native, node);
            host.release_source(source);
            return Err(SceneError::NodeCreation { name, source: e });
        }

        // A shared source only takes this item's properties once the node exists
        if reused {
            if let Err(e) = host.update_source(source, &properties) {
                host.remove_node(self.native, node);
                host.release_source(source);
                return Err(SceneError::SourceCreation { name, source: e });
            }
        }
        drop(host);

        item.bind(node, source, self.handle());
        item.mark_pushed();
        tracing::debug!(
            scene = %self.name,
            item = %name,
            kind = item.kind(),
            node = %node,
            "Item attached"
        );
        self.items.push(item);
        Ok(node)
    }

    /// Push pending changes of one item to the host.
    ///
    /// Returns `Ok(false)` without touching the host when the item has
    /// nothing pending. The pending state is cleared only on success.
    pub fn apply_scene_item_settings_update(&mut self, id: NodeId) -> Result<bool, SceneError> {
        let native = self.native;
        let index = self.position_of(id).ok_or(SceneError::UnresolvedItem(id))?;

        let mut host = self.host.borrow_mut();
        if !host.has_node(native, id) {
            return Err(SceneError::UnresolvedItem(id));
        }

        let item = &mut self.items[index];
        if !item.should_apply_any_updates() {
            return Ok(false);
        }

        if item.settings_changed() {
            let settings = item.settings();
            // Rotation is edited in the host UI only
            let rotation = host.node_transform(native, id).map(|t| t.rotation).unwrap_or(0.0);
            host.set_node_transform(native, id, &settings.to_transform(rotation))?;
            host.set_node_visible(native, id, !settings.hidden)?;
            host.set_node_locked(native, id, settings.lock)?;
        }

        if item.properties_changed() {
            if let Some(source) = item.host_source() {
                host.update_source(source, &item.properties())?;
            }
        }

        item.mark_pushed();
        tracing::debug!(scene = %self.name, item = %item.name(), node = %id, "Item updates applied");
        Ok(true)
    }

    /// Push pending changes of every item, returning how many were pushed
    pub fn apply_all_updates(&mut self) -> Result<usize, SceneError> {
        let ids: Vec<NodeId> = self.items.iter().filter_map(|item| item.scene_id()).collect();
        let mut applied = 0;
        for id in ids {
            if self.apply_scene_item_settings_update(id)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Rename an item, keeping names unique and the z-order unchanged
    pub fn rename_item(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), SceneError> {
        let name = name.into();
        let index = self.position_of(id).ok_or(SceneError::UnresolvedItem(id))?;
        if self.items.iter().enumerate().any(|(i, item)| i != index && item.name() == name) {
            return Err(SceneError::NameCollision(name));
        }
        self.items[index].rename(name);
        Ok(())
    }

    /// Remove an item from the scene and hand it back detached
    pub fn detach(&mut self, id: NodeId) -> Result<SceneItem, SceneError> {
        let index = self.position_of(id).ok_or(SceneError::UnresolvedItem(id))?;
        let mut item = self.items.remove(index);

        let mut host = self.host.borrow_mut();
        host.remove_node(self.native, id);
        if let Some(source) = item.host_source() {
            host.release_source(source);
        }
        drop(host);

        item.unbind();
        tracing::debug!(scene = %self.name, item = %item.name(), "Item detached");
        Ok(item)
    }

    /// Find the host source named like the item, or create one.
    ///
    /// Returns the source and whether it already existed. An existing
    /// source is returned untouched; an existing source of a different kind
    /// is not reused.
    fn acquire_source(
        host: &mut H,
        name: &str,
        kind: &str,
        properties: &PropertyBag,
    ) -> Result<(SourceId, bool), SceneError> {
        if let Some(existing) = host.find_source(name) {
            if existing.kind != kind {
                host.release_source(existing.id);
                return Err(SceneError::SourceCreation {
                    name: name.to_string(),
                    source: HostError::InvalidSettings(format!(
                        "existing source has kind {}, expected {}",
                        existing.kind, kind
                    )),
                });
            }
            return Ok((existing.id, true));
        }

        host.create_source(kind, name, properties)
            .map(|id| (id, false))
            .map_err(|e| SceneError::SourceCreation {
                name: name.to_string(),
                source: e,
            })
    }

    /// Create a host node for `source` with its initial state.
    ///
    /// Every node this crate places goes through here. A partially
    /// configured node is removed again before the error is returned.
    fn create_scene_item(
        host: &mut H,
        scene: NativeSceneId,
        source: SourceId,
        enabled: bool,
        transform: &NodeTransform,
        crop: &Crop,
    ) -> Result<NodeId, HostError> {
        let node = host.add_node(scene, source)?;
        let configured = host
            .set_node_transform(scene, node, transform)
            .and_then(|_| host.set_node_crop(scene, node, crop))
            .and_then(|_| host.set_node_visible(scene, node, enabled));
        match configured {
            Ok(()) => Ok(node),
            Err(e) => {
                host.remove_node(scene, node);
                Err(e)
            }
        }
    }
}

impl<H: SceneGraph> Drop for Scene<H> {
    fn drop(&mut self) {
        let Ok(mut host) = self.host.try_borrow_mut() else {
            tracing::warn!(scene = %self.name, "Host busy during scene teardown; native scene leaked");
            return;
        };
        for item in &mut self.items {
            if let Some(node) = item.scene_id() {
                host.remove_node(self.native, node);
            }
            if let Some(source) = item.host_source() {
                host.release_source(source);
            }
            item.unbind();
        }
        host.destroy_scene(self.native);
        tracing::debug!(scene = %self.name, items = self.items.len(), "Scene torn down");
    }
}

impl<H: SceneGraph> std::fmt::Debug for Scene<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("native", &self.native)
            .field("items", &self.items)
            .finish()
    }
}
