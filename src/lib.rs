//! Scene Composer Library
//!
//! Scene/source composition on top of a host video mixer's scene graph,
//! plus SDI payload identifier (VPID) decoding for capture inputs.

pub mod composition;
pub mod config;
pub mod host;
pub mod properties;
pub mod telemetry;
pub mod vpid;

pub use composition::{
    AudioSceneItem, CameraSceneItem, CaptureMethod, IpCameraSceneItem, ItemType, Scene, SceneError, SceneItem,
    ScreenSceneItem, Settings, WindowSceneItem, MAIN_SCENE,
};
pub use config::{ConfigError, Preferences, SceneCollection};
pub use host::{HostError, MemoryHost, NodeId, SceneGraph};
pub use properties::{PropertyBag, PropertyValue};
pub use vpid::{VpidData, VpidSampling, VpidStandard};
