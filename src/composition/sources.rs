//! Type-specific scene item variants
//!
//! Each variant owns an [`ItemState`] plus the fields of its host source.
//! Property keys match the settings keys of the host source kinds.

use super::item::{ItemState, ItemType};
use crate::properties::{InvalidProperty, PropertyBag};

/// Capability interface of a scene item variant
pub trait CaptureSource {
    fn item_type(&self) -> ItemType;

    fn state(&self) -> &ItemState;

    fn state_mut(&mut self) -> &mut ItemState;

    /// Write the type-specific fields into `bag`
    fn write_properties(&self, bag: &mut PropertyBag);

    /// Read the type-specific fields present in `bag`.
    ///
    /// Nothing is changed when a value is out of range.
    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty>;
}

/// Screen capture backend selection.
///
/// DXGI duplication is fast but limited to the GPU driving the display;
/// Windows Graphics Capture works across adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureMethod {
    /// Let the host pick per display
    #[default]
    Auto,
    Dxgi,
    Wgc,
}

impl CaptureMethod {
    /// Get all methods for iteration
    pub fn all() -> &'static [CaptureMethod] {
        &[CaptureMethod::Auto, CaptureMethod::Dxgi, CaptureMethod::Wgc]
    }

    /// Host setting value
    pub fn value(&self) -> i64 {
        match self {
            CaptureMethod::Auto => 0,
            CaptureMethod::Dxgi => 1,
            CaptureMethod::Wgc => 2,
        }
    }

    /// Parse a host setting value; unknown values fall back to `Auto`
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => CaptureMethod::Dxgi,
            2 => CaptureMethod::Wgc,
            _ => CaptureMethod::Auto,
        }
    }

    /// Get display name for UI
    pub fn name(&self) -> &'static str {
        match self {
            CaptureMethod::Auto => "Automatic",
            CaptureMethod::Dxgi => "DXGI Desktop Duplication",
            CaptureMethod::Wgc => "Windows 10 (1903 and up)",
        }
    }
}

// ============================================================================
// Screen
// ============================================================================

/// Captures one physical display
#[derive(Debug, Clone)]
pub struct ScreenSceneItem {
    state: ItemState,
    /// Display index among the enumerated monitors
    pub index: u32,
    pub capture_method: CaptureMethod,
    pub show_cursor: bool,
}

impl ScreenSceneItem {
    pub const KEY_MONITOR: &'static str = "monitor";
    pub const KEY_METHOD: &'static str = "method";
    pub const KEY_CURSOR: &'static str = "capture_cursor";

    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            state: ItemState::new(name),
            index,
            capture_method: CaptureMethod::Auto,
            show_cursor: true,
        }
    }
}

impl CaptureSource for ScreenSceneItem {
    fn item_type(&self) -> ItemType {
        ItemType::Screen
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn write_properties(&self, bag: &mut PropertyBag) {
        bag.set(Self::KEY_MONITOR, self.index as i64);
        bag.set(Self::KEY_METHOD, self.capture_method.value());
        bag.set(Self::KEY_CURSOR, self.show_cursor);
    }

    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        let index = bag
            .get_int(Self::KEY_MONITOR)
            .map(|index| u32::try_from(index).map_err(|_| InvalidProperty::new(Self::KEY_MONITOR, index)))
            .transpose()?;

        if let Some(index) = index {
            self.index = index;
        }
        if let Some(method) = bag.get_int(Self::KEY_METHOD) {
            self.capture_method = CaptureMethod::from_value(method);
        }
        if let Some(cursor) = bag.get_bool(Self::KEY_CURSOR) {
            self.show_cursor = cursor;
        }
        Ok(())
    }
}

// ============================================================================
// IP camera
// ============================================================================

/// Network camera stream, pulled by the host's media source
#[derive(Debug, Clone)]
pub struct IpCameraSceneItem {
    state: ItemState,
    url: String,
    stop_on_hide: bool,
}

impl IpCameraSceneItem {
    pub const KEY_INPUT: &'static str = "input";
    pub const KEY_LOCAL_FILE: &'static str = "is_local_file";
    pub const KEY_STOP_ON_HIDE: &'static str = "close_when_inactive";

    pub fn new(name: impl Into<String>, url: impl Into<String>, stop_on_hide: bool) -> Self {
        Self {
            state: ItemState::new(name),
            url: url.into(),
            stop_on_hide,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn update_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Whether the stream connection is closed while the item is hidden
    pub fn stop_on_hide(&self) -> bool {
        self.stop_on_hide
    }

    pub fn update_stop_on_hide(&mut self, state: bool) {
        self.stop_on_hide = state;
    }

    /// Stream should currently be connected
    pub fn wants_stream(&self) -> bool {
        !(self.stop_on_hide && self.state.settings.hidden)
    }
}

impl CaptureSource for IpCameraSceneItem {
    fn item_type(&self) -> ItemType {
        ItemType::IpCamera
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn write_properties(&self, bag: &mut PropertyBag) {
        bag.set(Self::KEY_INPUT, self.url.as_str());
        bag.set(Self::KEY_LOCAL_FILE, false);
        bag.set(Self::KEY_STOP_ON_HIDE, self.stop_on_hide);
    }

    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        if let Some(url) = bag.get_str(Self::KEY_INPUT) {
            self.url = url.to_string();
        }
        if let Some(stop) = bag.get_bool(Self::KEY_STOP_ON_HIDE) {
            self.stop_on_hide = stop;
        }
        Ok(())
    }
}

// ============================================================================
// Camera
// ============================================================================

/// Local video capture device
#[derive(Debug, Clone)]
pub struct CameraSceneItem {
    state: ItemState,
    pub device_id: String,
}

impl CameraSceneItem {
    pub const KEY_DEVICE: &'static str = "video_device_id";

    pub fn new(name: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            state: ItemState::new(name),
            device_id: device_id.into(),
        }
    }
}

impl CaptureSource for CameraSceneItem {
    fn item_type(&self) -> ItemType {
        ItemType::Camera
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn write_properties(&self, bag: &mut PropertyBag) {
        bag.set(Self::KEY_DEVICE, self.device_id.as_str());
    }

    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        if let Some(device) = bag.get_str(Self::KEY_DEVICE) {
            self.device_id = device.to_string();
        }
        Ok(())
    }
}

// ============================================================================
// Window
// ============================================================================

/// Captures a single application window
#[derive(Debug, Clone)]
pub struct WindowSceneItem {
    state: ItemState,
    /// Window match string ("title:class:executable")
    pub window: String,
    pub capture_method: CaptureMethod,
    pub show_cursor: bool,
}

impl WindowSceneItem {
    pub const KEY_WINDOW: &'static str = "window";
    pub const KEY_METHOD: &'static str = "method";
    pub const KEY_CURSOR: &'static str = "cursor";

    pub fn new(name: impl Into<String>, window: impl Into<String>) -> Self {
        Self {
            state: ItemState::new(name),
            window: window.into(),
            capture_method: CaptureMethod::Auto,
            show_cursor: true,
        }
    }
}

impl CaptureSource for WindowSceneItem {
    fn item_type(&self) -> ItemType {
        ItemType::Window
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn write_properties(&self, bag: &mut PropertyBag) {
        bag.set(Self::KEY_WINDOW, self.window.as_str());
        bag.set(Self::KEY_METHOD, self.capture_method.value());
        bag.set(Self::KEY_CURSOR, self.show_cursor);
    }

    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        if let Some(window) = bag.get_str(Self::KEY_WINDOW) {
            self.window = window.to_string();
        }
        if let Some(method) = bag.get_int(Self::KEY_METHOD) {
            self.capture_method = CaptureMethod::from_value(method);
        }
        if let Some(cursor) = bag.get_bool(Self::KEY_CURSOR) {
            self.show_cursor = cursor;
        }
        Ok(())
    }
}

// ============================================================================
// Audio
// ============================================================================

/// Direction of an audio capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioDirection {
    /// Microphone / line-in
    Input,
    /// Loopback of a playback device
    Output,
}

/// Audio device capture (input or output loopback)
#[derive(Debug, Clone)]
pub struct AudioSceneItem {
    state: ItemState,
    direction: AudioDirection,
    /// Device id, "default" for the system default device
    pub device_id: String,
}

impl AudioSceneItem {
    pub const KEY_DEVICE: &'static str = "device_id";
    pub const DEFAULT_DEVICE: &'static str = "default";

    pub fn new(name: impl Into<String>, direction: AudioDirection, device_id: impl Into<String>) -> Self {
        Self {
            state: ItemState::new(name),
            direction,
            device_id: device_id.into(),
        }
    }

    pub fn input(name: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self::new(name, AudioDirection::Input, device_id)
    }

    pub fn output(name: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self::new(name, AudioDirection::Output, device_id)
    }

    pub fn direction(&self) -> AudioDirection {
        self.direction
    }
}

impl CaptureSource for AudioSceneItem {
    fn item_type(&self) -> ItemType {
        match self.direction {
            AudioDirection::Input => ItemType::AudioInput,
            AudioDirection::Output => ItemType::AudioOutput,
        }
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn write_properties(&self, bag: &mut PropertyBag) {
        bag.set(Self::KEY_DEVICE, self.device_id.as_str());
    }

    fn read_properties(&mut self, bag: &PropertyBag) -> Result<(), InvalidProperty> {
        if let Some(device) = bag.get_str(Self::KEY_DEVICE) {
            self.device_id = device.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_defaults() {
        let screen = ScreenSceneItem::new("Display1", 0);
        assert_eq!(screen.index, 0);
        assert_eq!(screen.capture_method, CaptureMethod::Auto);
        assert!(screen.show_cursor);
    }

    #[test]
    fn test_screen_properties() {
        let mut screen = ScreenSceneItem::new("Display2", 1);
        screen.capture_method = CaptureMethod::Wgc;
        let mut bag = PropertyBag::new();
        screen.write_properties(&mut bag);
        assert_eq!(bag.get_int("monitor"), Some(1));
        assert_eq!(bag.get_int("method"), Some(2));
        assert_eq!(bag.get_bool("capture_cursor"), Some(true));
    }

    #[test]
    fn test_screen_read_properties_partial() {
        let mut screen = ScreenSceneItem::new("Display1", 0);
        screen.read_properties(&PropertyBag::new().with("method", 1i64)).unwrap();
        assert_eq!(screen.capture_method, CaptureMethod::Dxgi);
        assert_eq!(screen.index, 0);
        assert!(screen.show_cursor);

        screen.read_properties(&PropertyBag::new().with("monitor", 3i64)).unwrap();
        assert_eq!(screen.index, 3);
    }

    #[test]
    fn test_screen_rejects_negative_monitor() {
        let mut screen = ScreenSceneItem::new("Display1", 2);
        let bag = PropertyBag::new().with("monitor", -4i64).with("capture_cursor", false);
        assert_eq!(
            screen.read_properties(&bag),
            Err(InvalidProperty::new("monitor", -4))
        );
        assert_eq!(screen.index, 2);
        assert!(screen.show_cursor);
    }

    #[test]
    fn test_capture_method_values() {
        for method in CaptureMethod::all() {
            assert_eq!(CaptureMethod::from_value(method.value()), *method);
        }
        assert_eq!(CaptureMethod::from_value(42), CaptureMethod::Auto);
    }

    #[test]
    fn test_ip_camera_properties() {
        let mut cam = IpCameraSceneItem::new("Cam1", "rtsp://cam1/stream", true);
        let mut bag = PropertyBag::new();
        cam.write_properties(&mut bag);
        assert_eq!(bag.get_str("input"), Some("rtsp://cam1/stream"));
        assert_eq!(bag.get_bool("is_local_file"), Some(false));
        assert_eq!(bag.get_bool("close_when_inactive"), Some(true));

        cam.update_url("rtsp://cam2/stream");
        cam.update_stop_on_hide(false);
        assert_eq!(cam.url(), "rtsp://cam2/stream");
        assert!(!cam.stop_on_hide());
    }

    #[test]
    fn test_ip_camera_wants_stream() {
        let mut cam = IpCameraSceneItem::new("Cam1", "rtsp://cam1/stream", true);
        assert!(cam.wants_stream());
        cam.state_mut().settings.hidden = true;
        assert!(!cam.wants_stream());
        cam.update_stop_on_hide(false);
        assert!(cam.wants_stream());
    }

    #[test]
    fn test_window_and_audio_properties() {
        let window = WindowSceneItem::new("Editor", "main.rs - Code:Chrome_WidgetWin_1:Code.exe");
        let mut bag = PropertyBag::new();
        window.write_properties(&mut bag);
        assert_eq!(bag.get_str("window"), Some("main.rs - Code:Chrome_WidgetWin_1:Code.exe"));
        assert_eq!(bag.get_bool("cursor"), Some(true));

        let mic = AudioSceneItem::input("Mic", AudioSceneItem::DEFAULT_DEVICE);
        assert_eq!(mic.item_type(), ItemType::AudioInput);
        assert_eq!(mic.direction(), AudioDirection::Input);
        let mut bag = PropertyBag::new();
        mic.write_properties(&mut bag);
        assert_eq!(bag.get_str("device_id"), Some("default"));
    }
}
