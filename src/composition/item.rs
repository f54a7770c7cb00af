//! Scene item model
//!
//! A `SceneItem` is one capture source placed in a scene. The variants form
//! a closed set; the type-specific part of each lives in `sources` behind
//! the [`CaptureSource`] trait, while the shared identity/geometry state is
//! the same [`ItemState`] for every variant.
//!
//! Whether an item needs a host update is not tracked with flags. Each item
//! remembers the settings and properties it last pushed to the host and
//! compares them with its current state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::host::{NativeSceneId, NodeId, NodeTransform, SourceId};
use crate::properties::{InvalidProperty, PropertyBag};

use super::scene::SceneError;
use super::sources::{
    AudioSceneItem, CameraSceneItem, CaptureSource, IpCameraSceneItem, ScreenSceneItem, WindowSceneItem,
};

/// Placement and state of an item within its scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Position in canvas pixels
    pub pos: Vec2,
    /// Scale factors (1.0 = 100%)
    pub scale: Vec2,
    /// Whether the item is hidden
    pub hidden: bool,
    /// Whether the item is locked against editing in the host UI
    pub lock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            hidden: false,
            lock: false,
        }
    }
}

impl Settings {
    /// Settings at a specific position
    pub fn at_position(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            ..Default::default()
        }
    }

    /// Host transform for these settings, keeping the given rotation
    pub fn to_transform(&self, rotation: f32) -> NodeTransform {
        NodeTransform {
            position: self.pos,
            scale: self.scale,
            rotation,
        }
    }
}

/// Stable item type exposed to callers and persisted by name.
///
/// The set is closed: adding a type changes every saved collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    AudioInput,
    AudioOutput,
    Camera,
    IpCamera,
    Screen,
    Window,
}

impl ItemType {
    /// Get all item types for iteration
    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::AudioInput,
            ItemType::AudioOutput,
            ItemType::Camera,
            ItemType::IpCamera,
            ItemType::Screen,
            ItemType::Window,
        ]
    }

    /// Host source kind backing items of this type
    pub fn kind(&self) -> &'static str {
        match self {
            ItemType::AudioInput => "wasapi_input_capture",
            ItemType::AudioOutput => "wasapi_output_capture",
            ItemType::Camera => "dshow_input",
            ItemType::IpCamera => "ffmpeg_source",
            ItemType::Screen => "monitor_capture",
            ItemType::Window => "window_capture",
        }
    }

    /// Persisted name
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::AudioInput => "AudioInput",
            ItemType::AudioOutput => "AudioOutput",
            ItemType::Camera => "Camera",
            ItemType::IpCamera => "IPCamera",
            ItemType::Screen => "Screen",
            ItemType::Window => "Window",
        }
    }

    /// Parse a persisted name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    /// Map a host source kind back to its item type
    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.kind() == kind)
    }

    /// Check if items of this type have a visual representation
    pub fn is_video(&self) -> bool {
        !matches!(self, ItemType::AudioInput | ItemType::AudioOutput)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lookup handle for the scene that owns an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub NativeSceneId);

/// Identity and geometry shared by every item variant
#[derive(Debug, Clone)]
pub struct ItemState {
    pub(crate) name: String,
    pub(crate) scene_id: Option<NodeId>,
    pub(crate) source: Option<SourceId>,
    pub(crate) owner: Option<SceneHandle>,
    pub(crate) settings: Settings,
    pushed_settings: Option<Settings>,
    pushed_properties: Option<PropertyBag>,
}

impl ItemState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scene_id: None,
            source: None,
            owner: None,
            settings: Settings::default(),
            pushed_settings: None,
            pushed_properties: None,
        }
    }
}

/// One capture source placed in a scene
#[derive(Debug, Clone)]
pub enum SceneItem {
    Screen(ScreenSceneItem),
    IpCamera(IpCameraSceneItem),
    Camera(CameraSceneItem),
    Window(WindowSceneItem),
    /// Audio input or output capture
    Audio(AudioSceneItem),
}

impl SceneItem {
    /// Create an item of the given type with default type-specific fields
    pub fn new(item_type: ItemType, name: impl Into<String>) -> Self {
        match item_type {
            ItemType::Screen => ScreenSceneItem::new(name, 0).into(),
            ItemType::IpCamera => IpCameraSceneItem::new(name, "", false).into(),
            ItemType::Camera => CameraSceneItem::new(name, "").into(),
            ItemType::Window => WindowSceneItem::new(name, "").into(),
            ItemType::AudioInput => AudioSceneItem::input(name, AudioSceneItem::DEFAULT_DEVICE).into(),
            ItemType::AudioOutput => AudioSceneItem::output(name, AudioSceneItem::DEFAULT_DEVICE).into(),
        }
    }

    fn capture(&self) -> &dyn CaptureSource {
        match self {
            SceneItem::Screen(item) => item,
            SceneItem::IpCamera(item) => item,
            SceneItem::Camera(item) => item,
            SceneItem::Window(item) => item,
            SceneItem::Audio(item) => item,
        }
    }

    fn capture_mut(&mut self) -> &mut dyn CaptureSource {
        match self {
            SceneItem::Screen(item) => item,
            SceneItem::IpCamera(item) => item,
            SceneItem::Camera(item) => item,
            SceneItem::Window(item) => item,
            SceneItem::Audio(item) => item,
        }
    }

    fn state(&self) -> &ItemState {
        self.capture().state()
    }

    fn state_mut(&mut self) -> &mut ItemState {
        self.capture_mut().state_mut()
    }

    /// Host node id; `None` until the item is attached
    pub fn scene_id(&self) -> Option<NodeId> {
        self.state().scene_id
    }

    /// Assigned by the owning scene when the item is attached
    pub(crate) fn set_scene_id(&mut self, id: NodeId) {
        self.state_mut().scene_id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.state().name
    }

    /// Rename a detached item.
    ///
    /// Attached items must be renamed through `Scene::rename_item`, which
    /// keeps names unique within the scene.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SceneError> {
        if self.scene().is_some() {
            return Err(SceneError::AlreadyAttached(self.name().to_string()));
        }
        self.rename(name);
        Ok(())
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.state_mut().name = name.into();
    }

    pub fn item_type(&self) -> ItemType {
        self.capture().item_type()
    }

    /// Host source kind, derived from the item type
    pub fn kind(&self) -> &'static str {
        self.item_type().kind()
    }

    pub fn settings(&self) -> Settings {
        self.state().settings
    }

    /// Replace all settings at once. Applying the value already held is a no-op.
    pub fn update_settings(&mut self, settings: Settings) {
        self.state_mut().settings = settings;
    }

    pub fn hide(&mut self, hidden: bool) {
        self.state_mut().settings.hidden = hidden;
    }

    pub fn lock(&mut self, lock: bool) {
        self.state_mut().settings.lock = lock;
    }

    pub fn update_scale(&mut self, scale: Vec2) {
        self.state_mut().settings.scale = scale;
    }

    pub fn update_position(&mut self, pos: Vec2) {
        self.state_mut().settings.pos = pos;
    }

    pub fn is_hidden(&self) -> bool {
        self.state().settings.hidden
    }

    pub fn is_locked(&self) -> bool {
        self.state().settings.lock
    }

    /// Type-specific properties as a bag for the host and the UI
    pub fn properties(&self) -> PropertyBag {
        let mut bag = PropertyBag::new();
        self.capture().write_properties(&mut bag);
        bag
    }

    /// Take edited values back from a property bag; unknown keys are ignored.
    ///
    /// An out-of-range value is rejected and leaves the item unchanged.
    pub fn apply_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        self.capture_mut().read_properties(bag)
    }

    /// Whether anything differs from what was last pushed to the host.
    ///
    /// Always true for an item that was never pushed.
    pub fn should_apply_any_updates(&self) -> bool {
        self.settings_changed() || self.properties_changed()
    }

    pub(crate) fn settings_changed(&self) -> bool {
        let state = self.state();
        state.pushed_settings != Some(state.settings)
    }

    pub(crate) fn properties_changed(&self) -> bool {
        self.state().pushed_properties.as_ref() != Some(&self.properties())
    }

    /// Record the current state as pushed to the host
    pub(crate) fn mark_pushed(&mut self) {
        let properties = self.properties();
        let state = self.state_mut();
        state.pushed_settings = Some(state.settings);
        state.pushed_properties = Some(properties);
    }

    /// Owning scene, if attached
    pub(crate) fn scene(&self) -> Option<SceneHandle> {
        self.state().owner
    }

    pub(crate) fn host_source(&self) -> Option<SourceId> {
        self.state().source
    }

    pub(crate) fn bind(&mut self, node: NodeId, source: SourceId, owner: SceneHandle) {
        self.set_scene_id(node);
        let state = self.state_mut();
        state.source = Some(source);
        state.owner = Some(owner);
    }

    /// Forget the host binding; the item will need a full push when re-attached
    pub(crate) fn unbind(&mut self) {
        let state = self.state_mut();
        state.scene_id = None;
        state.source = None;
        state.owner = None;
        state.pushed_settings = None;
        state.pushed_properties = None;
    }

    pub fn as_screen(&self) -> Option<&ScreenSceneItem> {
        match self {
            SceneItem::Screen(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_screen_mut(&mut self) -> Option<&mut ScreenSceneItem> {
        match self {
            SceneItem::Screen(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_ip_camera(&self) -> Option<&IpCameraSceneItem> {
        match self {
            SceneItem::IpCamera(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_ip_camera_mut(&mut self) -> Option<&mut IpCameraSceneItem> {
        match self {
            SceneItem::IpCamera(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut CameraSceneItem> {
        match self {
            SceneItem::Camera(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_window_mut(&mut self) -> Option<&mut WindowSceneItem> {
        match self {
            SceneItem::Window(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_audio_mut(&mut self) -> Option<&mut AudioSceneItem> {
        match self {
            SceneItem::Audio(item) => Some(item),
            _ => None,
        }
    }
}

impl From<ScreenSceneItem> for SceneItem {
    fn from(item: ScreenSceneItem) -> Self {
        SceneItem::Screen(item)
    }
}

impl From<IpCameraSceneItem> for SceneItem {
    fn from(item: IpCameraSceneItem) -> Self {
        SceneItem::IpCamera(item)
    }
}

impl From<CameraSceneItem> for SceneItem {
    fn from(item: CameraSceneItem) -> Self {
        SceneItem::Camera(item)
    }
}

impl From<WindowSceneItem> for SceneItem {
    fn from(item: WindowSceneItem) -> Self {
        SceneItem::Window(item)
    }
}

impl From<AudioSceneItem> for SceneItem {
    fn from(item: AudioSceneItem) -> Self {
        SceneItem::Audio(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let s = Settings::default();
        assert_eq!(s.pos, Vec2::ZERO);
        assert_eq!(s.scale, Vec2::ONE);
        assert!(!s.hidden);
        assert!(!s.lock);
    }

    #[test]
    fn test_item_type_names_roundtrip() {
        for t in ItemType::all() {
            assert_eq!(ItemType::from_name(t.name()), Some(*t));
            assert_eq!(ItemType::from_kind(t.kind()), Some(*t));
        }
        assert_eq!(ItemType::from_name("Hologram"), None);
    }

    #[test]
    fn test_kind_follows_type() {
        let item = SceneItem::from(ScreenSceneItem::new("Display1", 0));
        assert_eq!(item.item_type(), ItemType::Screen);
        assert_eq!(item.kind(), "monitor_capture");

        let audio = SceneItem::from(AudioSceneItem::output("Desktop Audio", "default"));
        assert_eq!(audio.item_type(), ItemType::AudioOutput);
        assert_eq!(audio.kind(), "wasapi_output_capture");
    }

    #[test]
    fn test_unattached_item_needs_push() {
        let item = SceneItem::from(ScreenSceneItem::new("Display1", 0));
        assert!(item.scene_id().is_none());
        assert!(item.scene().is_none());
        assert!(item.should_apply_any_updates());
    }

    #[test]
    fn test_dirty_tracks_actual_changes() {
        let mut item = SceneItem::from(ScreenSceneItem::new("Display1", 0));
        item.mark_pushed();
        assert!(!item.should_apply_any_updates());

        // Same values: nothing to push
        item.hide(false);
        item.lock(false);
        item.update_position(Vec2::ZERO);
        item.update_settings(item.settings());
        assert!(!item.should_apply_any_updates());

        item.hide(true);
        assert!(item.should_apply_any_updates());
        assert!(item.settings_changed());
        assert!(!item.properties_changed());

        // Reverting to the pushed value clears the pending update
        item.hide(false);
        assert!(!item.should_apply_any_updates());
    }

    #[test]
    fn test_property_change_marks_dirty() {
        let mut item = SceneItem::from(ScreenSceneItem::new("Display1", 0));
        item.mark_pushed();
        item.as_screen_mut().unwrap().show_cursor = false;
        assert!(item.should_apply_any_updates());
        assert!(item.properties_changed());
        assert!(!item.settings_changed());
    }

    #[test]
    fn test_unbind_resets_push_state() {
        let mut item = SceneItem::from(ScreenSceneItem::new("Display1", 0));
        item.bind(NodeId(3), SourceId(2), SceneHandle(NativeSceneId(1)));
        item.mark_pushed();
        assert_eq!(item.scene_id(), Some(NodeId(3)));
        assert_eq!(item.host_source(), Some(SourceId(2)));

        item.unbind();
        assert!(item.scene_id().is_none());
        assert!(item.host_source().is_none());
        assert!(item.should_apply_any_updates());
    }

    #[test]
    fn test_new_by_type() {
        for t in ItemType::all() {
            let item = SceneItem::new(*t, "x");
            assert_eq!(item.item_type(), *t);
            assert_eq!(item.name(), "x");
        }
    }

    #[test]
    fn test_set_name() {
        let mut item = SceneItem::from(CameraSceneItem::new("Cam", "usb-1"));
        item.set_name("Webcam").unwrap();
        assert_eq!(item.name(), "Webcam");
    }

    #[test]
    fn test_set_name_refused_while_attached() {
        let mut item = SceneItem::from(CameraSceneItem::new("Cam", "usb-1"));
        item.bind(NodeId(3), SourceId(2), SceneHandle(NativeSceneId(1)));
        assert_eq!(
            item.set_name("Webcam"),
            Err(SceneError::AlreadyAttached("Cam".to_string()))
        );
        assert_eq!(item.name(), "Cam");

        item.unbind();
        assert!(item.set_name("Webcam").is_ok());
    }

    #[test]
    fn test_apply_properties_rejects_out_of_range() {
        let mut item = SceneItem::from(ScreenSceneItem::new("Display1", 1));
        let bag = PropertyBag::new().with("monitor", -1i64);
        assert!(item.apply_properties(&bag).is_err());
        assert_eq!(item.as_screen().map(|s| s.index), Some(1));
    }
}
