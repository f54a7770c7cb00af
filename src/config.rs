//! Scene collections and user preferences
//!
//! Collections are XML documents listing scenes and their items. Items are
//! stored by type name with their settings and a flat property list, so a
//! collection can be restored into any host that supports the item kinds.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Vec2;

use crate::composition::{ItemType, Scene, SceneError, SceneItem, Settings, MAIN_SCENE};
use crate::host::SceneGraph;
use crate::properties::{InvalidProperty, PropertyBag, PropertyValue};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// A saved set of scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "SceneCollection")]
pub struct SceneCollection {
    #[serde(rename = "name", default)]
    pub name: String,

    #[serde(rename = "scene", default)]
    pub scenes: Vec<SceneRecord>,
}

impl Default for SceneCollection {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            scenes: vec![SceneRecord {
                name: MAIN_SCENE.to_string(),
                items: Vec::new(),
            }],
        }
    }
}

/// One scene in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    #[serde(rename = "name")]
    pub name: String,

    /// Items in z-order (bottom first)
    #[serde(rename = "item", default)]
    pub items: Vec<ItemRecord>,
}

/// One item in a saved scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "name")]
    pub name: String,

    /// Persisted `ItemType` name
    #[serde(rename = "type")]
    pub item_type: String,

    #[serde(rename = "posX", default)]
    pub pos_x: f32,

    #[serde(rename = "posY", default)]
    pub pos_y: f32,

    #[serde(rename = "scaleX", default = "default_scale")]
    pub scale_x: f32,

    #[serde(rename = "scaleY", default = "default_scale")]
    pub scale_y: f32,

    #[serde(rename = "hidden", default)]
    pub hidden: bool,

    #[serde(rename = "locked", default)]
    pub locked: bool,

    #[serde(rename = "property", default)]
    pub properties: Vec<PropertyRecord>,
}

fn default_scale() -> f32 {
    1.0
}

/// A typed property stored as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "key")]
    pub key: String,

    /// One of "bool", "int", "float", "string", "list"
    #[serde(rename = "type")]
    pub value_type: String,

    #[serde(rename = "value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// List entries (only for "list")
    #[serde(rename = "entry", default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
}

impl PropertyRecord {
    fn from_value(key: &str, value: &PropertyValue) -> Self {
        let (text, entries) = match value {
            PropertyValue::Bool(v) => (Some(v.to_string()), Vec::new()),
            PropertyValue::Int(v) => (Some(v.to_string()), Vec::new()),
            PropertyValue::Float(v) => (Some(v.to_string()), Vec::new()),
            PropertyValue::String(v) => (Some(v.clone()), Vec::new()),
            PropertyValue::List(v) => (None, v.clone()),
        };
        Self {
            key: key.to_string(),
            value_type: value.type_name().to_string(),
            value: text,
            entries,
        }
    }

    fn to_value(&self) -> Result<PropertyValue, ConfigError> {
        let text = self.value.clone().unwrap_or_default();
        let invalid = || ConfigError::InvalidProperty {
            key: self.key.clone(),
            value: text.clone(),
        };
        match self.value_type.as_str() {
            "bool" => text.parse().map(PropertyValue::Bool).map_err(|_| invalid()),
            "int" => text.parse().map(PropertyValue::Int).map_err(|_| invalid()),
            "float" => text.parse().map(PropertyValue::Float).map_err(|_| invalid()),
            "string" => Ok(PropertyValue::String(text.clone())),
            "list" => Ok(PropertyValue::List(self.entries.clone())),
            _ => Err(invalid()),
        }
    }
}

impl ItemRecord {
    /// Snapshot a live item
    pub fn capture(item: &SceneItem) -> Self {
        let settings = item.settings();
        Self {
            name: item.name().to_string(),
            item_type: item.item_type().name().to_string(),
            pos_x: settings.pos.x,
            pos_y: settings.pos.y,
            scale_x: settings.scale.x,
            scale_y: settings.scale.y,
            hidden: settings.hidden,
            locked: settings.lock,
            properties: item
                .properties()
                .iter()
                .map(|(key, value)| PropertyRecord::from_value(key, value))
                .collect(),
        }
    }

    /// Build a detached item from this record
    pub fn to_item(&self) -> Result<SceneItem, ConfigError> {
        let item_type =
            ItemType::from_name(&self.item_type).ok_or_else(|| ConfigError::UnknownItemType(self.item_type.clone()))?;

        let mut bag = PropertyBag::new();
        for property in &self.properties {
            bag.set(property.key.clone(), property.to_value()?);
        }

        let mut item = SceneItem::new(item_type, self.name.clone());
        item.apply_properties(&bag)?;
        item.update_settings(Settings {
            pos: Vec2::new(self.pos_x, self.pos_y),
            scale: Vec2::new(self.scale_x, self.scale_y),
            hidden: self.hidden,
            lock: self.locked,
        });
        Ok(item)
    }
}

impl SceneCollection {
    /// Snapshot live scenes
    pub fn capture<H: SceneGraph>(name: impl Into<String>, scenes: &[Scene<H>]) -> Self {
        Self {
            name: name.into(),
            scenes: scenes
                .iter()
                .map(|scene| SceneRecord {
                    name: scene.name().to_string(),
                    items: scene.items().iter().map(ItemRecord::capture).collect(),
                })
                .collect(),
        }
    }

    /// Recreate the scenes in `host`.
    ///
    /// Stops at the first failure; scenes built so far are dropped, which
    /// removes them from the host again.
    pub fn restore<H: SceneGraph>(&self, host: &Rc<RefCell<H>>) -> Result<Vec<Scene<H>>, ConfigError> {
        let mut scenes = Vec::with_capacity(self.scenes.len());
        for record in &self.scenes {
            let mut scene = Scene::new(record.name.clone(), Rc::clone(host))?;
            for item_record in &record.items {
                scene.attach(item_record.to_item()?)?;
            }
            tracing::debug!(scene = %record.name, items = scene.len(), "Scene restored");
            scenes.push(scene);
        }
        Ok(scenes)
    }

    /// Total item count across all scenes
    pub fn item_count(&self) -> usize {
        self.scenes.iter().map(|s| s.items.len()).sum()
    }

    /// Parse a collection from XML text
    pub fn from_xml(xml: &str) -> Result<Self, ConfigError> {
        from_str(xml).map_err(ConfigError::XmlParse)
    }

    /// XML text with declaration
    pub fn to_xml(&self) -> Result<String, ConfigError> {
        let xml = to_string(self).map_err(ConfigError::XmlWrite)?;
        Ok(format!("{}{}", XML_DECLARATION, xml))
    }

    /// Load a collection from an XML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_xml(&contents)
    }

    /// Save the collection to an XML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let xml = self.to_xml()?;
        fs::write(path, xml).map_err(ConfigError::Io)?;
        Ok(())
    }
}

/// User preferences (stored in config directory)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename = "SceneComposerPreferences")]
pub struct Preferences {
    /// Path to the last opened collection
    #[serde(rename = "lastOpenedFile", default, skip_serializing_if = "Option::is_none")]
    pub last_opened_file: Option<String>,

    /// Default log filter (e.g. "info", "scene_composer=debug")
    #[serde(rename = "logLevel", default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Preferences {
    fn prefs_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("SceneComposer");
            p.push("preferences.xml");
            p
        })
    }

    /// Load preferences, falling back to defaults when missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::prefs_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = Self::prefs_path() else {
            return Err(ConfigError::NoConfigDir);
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        let xml = to_string(self).map_err(ConfigError::XmlWrite)?;
        fs::write(&path, format!("{}{}", XML_DECLARATION, xml)).map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Remember the last opened collection and save
    pub fn set_last_opened(&mut self, path: &Path) {
        self.last_opened_file = Some(path.to_string_lossy().to_string());
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Last opened collection, if it still exists
    pub fn last_opened(&self) -> Option<PathBuf> {
        self.last_opened_file.as_ref().map(PathBuf::from).filter(|p| p.exists())
    }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    XmlParse(quick_xml::DeError),
    XmlWrite(quick_xml::SeError),
    NoConfigDir,
    /// Saved item type is not a known `ItemType` name
    UnknownItemType(String),
    /// Property text does not parse as its declared type
    InvalidProperty { key: String, value: String },
    Scene(SceneError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::XmlParse(e) => write!(f, "XML parse error: {}", e),
            ConfigError::XmlWrite(e) => write!(f, "XML write error: {}", e),
            ConfigError::NoConfigDir => write!(f, "Could not find config directory"),
            ConfigError::UnknownItemType(t) => write!(f, "Unknown item type: {}", t),
            ConfigError::InvalidProperty { key, value } => {
                write!(f, "Invalid value '{}' for property '{}'", value, key)
            }
            ConfigError::Scene(e) => write!(f, "Scene error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<InvalidProperty> for ConfigError {
    fn from(err: InvalidProperty) -> Self {
        ConfigError::InvalidProperty {
            key: err.key,
            value: err.value,
        }
    }
}

impl From<SceneError> for ConfigError {
    fn from(err: SceneError) -> Self {
        ConfigError::Scene(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{IpCameraSceneItem, ScreenSceneItem, WindowSceneItem};
    use crate::host::MemoryHost;

    fn sample_scene(host: &Rc<RefCell<MemoryHost>>) -> Scene<MemoryHost> {
        let mut scene = Scene::new(MAIN_SCENE, Rc::clone(host)).unwrap();
        let mut screen = SceneItem::from(ScreenSceneItem::new("Display1", 1));
        screen.update_position(Vec2::new(64.0, 32.0));
        screen.lock(true);
        scene.attach(screen).unwrap();
        scene
            .attach(IpCameraSceneItem::new("Cam1", "rtsp://cam1/stream", true))
            .unwrap();
        scene
    }

    #[test]
    fn test_default_collection() {
        let collection = SceneCollection::default();
        assert_eq!(collection.scenes.len(), 1);
        assert_eq!(collection.scenes[0].name, "MainScene");
        assert_eq!(collection.item_count(), 0);
    }

    #[test]
    fn test_capture_records_items() {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let scene = sample_scene(&host);
        let collection = SceneCollection::capture("Show", std::slice::from_ref(&scene));

        assert_eq!(collection.item_count(), 2);
        let screen = &collection.scenes[0].items[0];
        assert_eq!(screen.item_type, "Screen");
        assert_eq!(screen.pos_x, 64.0);
        assert!(screen.locked);
        let cam = &collection.scenes[0].items[1];
        assert_eq!(cam.item_type, "IPCamera");
        assert!(cam
            .properties
            .iter()
            .any(|p| p.key == "input" && p.value.as_deref() == Some("rtsp://cam1/stream")));
    }

    #[test]
    fn test_xml_roundtrip_and_restore() {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let scene = sample_scene(&host);
        let collection = SceneCollection::capture("Show", std::slice::from_ref(&scene));

        let xml = collection.to_xml().unwrap();
        assert!(xml.starts_with("<?xml"));
        let parsed = SceneCollection::from_xml(&xml).unwrap();
        assert_eq!(parsed, collection);

        let other_host = Rc::new(RefCell::new(MemoryHost::new()));
        let scenes = parsed.restore(&other_host).unwrap();
        assert_eq!(scenes.len(), 1);
        let restored = &scenes[0];
        assert_eq!(restored.len(), 2);

        let screen = restored.item_by_name("Display1").unwrap();
        assert_eq!(screen.as_screen().map(|s| s.index), Some(1));
        assert_eq!(screen.settings().pos, Vec2::new(64.0, 32.0));
        assert!(screen.is_locked());
        assert!(!screen.should_apply_any_updates());

        let cam = restored.item_by_name("Cam1").unwrap();
        let cam = cam.as_ip_camera().unwrap();
        assert_eq!(cam.url(), "rtsp://cam1/stream");
        assert!(cam.stop_on_hide());
    }

    #[test]
    fn test_file_roundtrip() {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let mut scene = sample_scene(&host);
        scene.attach(WindowSceneItem::new("Editor", "notes.txt - Notepad")).unwrap();
        let collection = SceneCollection::capture("Show", std::slice::from_ref(&scene));

        let path = std::env::temp_dir().join(format!("scene_composer_test_{}.xml", std::process::id()));
        collection.save_to_file(&path).unwrap();
        let loaded = SceneCollection::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, collection);
    }

    #[test]
    fn test_parse_handwritten_collection() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<SceneCollection>
  <name>Studio</name>
  <scene>
    <name>MainScene</name>
    <item>
      <name>Display1</name>
      <type>Screen</type>
      <property><key>monitor</key><type>int</type><value>2</value></property>
    </item>
  </scene>
</SceneCollection>"#;
        let collection = SceneCollection::from_xml(xml).unwrap();
        let item = collection.scenes[0].items[0].to_item().unwrap();
        assert_eq!(item.settings(), Settings::default());
        assert_eq!(item.as_screen().map(|s| s.index), Some(2));
    }

    #[test]
    fn test_negative_monitor_is_rejected() {
        let xml = r#"<SceneCollection>
  <name>Studio</name>
  <scene>
    <name>MainScene</name>
    <item>
      <name>Display1</name>
      <type>Screen</type>
      <property><key>monitor</key><type>int</type><value>-4</value></property>
    </item>
  </scene>
</SceneCollection>"#;
        let collection = SceneCollection::from_xml(xml).unwrap();
        match collection.scenes[0].items[0].to_item() {
            Err(ConfigError::InvalidProperty { key, value }) => {
                assert_eq!(key, "monitor");
                assert_eq!(value, "-4");
            }
            other => panic!("expected InvalidProperty, got {:?}", other.map(|i| i.name().to_string())),
        }

        let host = Rc::new(RefCell::new(MemoryHost::new()));
        assert!(matches!(collection.restore(&host), Err(ConfigError::InvalidProperty { .. })));
        assert_eq!(host.borrow().source_count(), 0);
    }

    #[test]
    fn test_unknown_item_type() {
        let record = ItemRecord {
            name: "Holo".to_string(),
            item_type: "Hologram".to_string(),
            pos_x: 0.0,
            pos_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            hidden: false,
            locked: false,
            properties: Vec::new(),
        };
        assert!(matches!(record.to_item(), Err(ConfigError::UnknownItemType(t)) if t == "Hologram"));
    }

    #[test]
    fn test_invalid_property_value() {
        let record = PropertyRecord {
            key: "monitor".to_string(),
            value_type: "int".to_string(),
            value: Some("two".to_string()),
            entries: Vec::new(),
        };
        assert!(matches!(record.to_value(), Err(ConfigError::InvalidProperty { .. })));
    }

    #[test]
    fn test_restore_failure_cleans_up() {
        let collection = SceneCollection {
            name: "Broken".to_string(),
            scenes: vec![SceneRecord {
                name: MAIN_SCENE.to_string(),
                items: vec![
                    ItemRecord::capture(&SceneItem::from(ScreenSceneItem::new("Display1", 0))),
                    ItemRecord::capture(&SceneItem::from(ScreenSceneItem::new("Display1", 1))),
                ],
            }],
        };
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        assert!(matches!(
            collection.restore(&host),
            Err(ConfigError::Scene(SceneError::NameCollision(_)))
        ));
        assert_eq!(host.borrow().scene_count(), 0);
        assert_eq!(host.borrow().source_count(), 0);
    }
}
