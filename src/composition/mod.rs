//! Scene composition
//!
//! Scenes hold ordered, uniquely named capture items and mirror them into
//! the host's scene graph. Item edits are made in memory and pushed to the
//! host explicitly with `Scene::apply_scene_item_settings_update`.

pub mod item;
pub mod scene;
pub mod sources;

pub use item::{ItemType, SceneHandle, SceneItem, Settings};
pub use scene::{Scene, SceneError};
pub use sources::{
    AudioDirection, AudioSceneItem, CameraSceneItem, CaptureMethod, CaptureSource, IpCameraSceneItem,
    ScreenSceneItem, WindowSceneItem,
};

/// Name of the scene every new collection starts with
pub const MAIN_SCENE: &str = "MainScene";
