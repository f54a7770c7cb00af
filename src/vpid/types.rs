//! Enumerations decoded from SMPTE ST 352 payload identifiers
//!
//! Every enum here is total over its bit field: values the table does not
//! name map to an explicit unknown/reserved variant instead of failing.

/// Video transport standard carried in byte 1 of the payload identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidStandard {
    /// Byte 1 did not match any known payload code
    #[default]
    Unknown,
    /// 483/576-line standard definition
    Sd483_576,
    Sd483_576DualLink,
    Sd483_576_540Mbs,
    /// 720-line single link
    Hd720,
    /// 1080-line single link
    Hd1080,
    Sd483_576_1485Mbs,
    /// 1080-line dual link
    Hd1080DualLink,
    /// 720-line 3G level A
    Hd720_3Ga,
    /// 1080-line 3G level A
    Hd1080_3Ga,
    /// 1080-line dual link carried over 3G level B
    Hd1080DualLink3Gb,
    /// Two 720-line streams over 3G level B
    Hd720_3Gb,
    /// Two 1080-line streams over 3G level B
    Hd1080_3Gb,
    Sd483_576_3Gb,
    Hd720Stereo3Gb,
    Hd1080Stereo3Gb,
    Hd1080QuadLink,
    Hd720Stereo3Ga,
    Hd1080Stereo3Ga,
    Hd1080StereoDualLink3Gb,
    Hd1080Dual3Ga,
    Hd1080Dual3Gb,
    /// 2160-line dual link 6G (ST 2081)
    Uhd2160DualLink,
    /// 2160-line quad link 3G level A
    Uhd2160QuadLink3Ga,
    /// 2160-line quad dual link 3G level B
    Uhd2160QuadDualLink3Gb,
    Hd1080StereoQuad3Ga,
    Hd1080StereoQuad3Gb,
    Uhd2160StereoQuad3Gb,
    Hd1080OctLink,
    Uhdtv1SingleDualLink10Gb,
    Uhdtv2QuadOctaLink10Gb,
    Uhdtv1MultiLink10Gb,
    Uhdtv2MultiLink10Gb,
    Vc2,
    Stereo720_1080,
    Vc2Level65_270Mbs,
    Dcp4kFsw729,
    Film2048x1556Dual,
    Film2048x1556_3Gb,
    /// 2160-line single link 6G (ST 2081)
    Uhd2160Single6Gb,
    Hd1080Single6Gb,
    Hd1080AfrSingle6Gb,
    /// 2160-line single link 12G (ST 2082)
    Uhd2160Single12Gb,
    Hd1080AfrSingle12Gb,
    Uhd4320DualQuad12Gb,
    Uhd2160DualQuad12Gb,
    Uhd4320QuadQuad12Gb,
}

impl VpidStandard {
    /// Decode the payload code found in byte 1.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x81 => Self::Sd483_576,
            0x82 => Self::Sd483_576DualLink,
            0x83 => Self::Sd483_576_540Mbs,
            0x84 => Self::Hd720,
            0x85 => Self::Hd1080,
            0x86 => Self::Sd483_576_1485Mbs,
            0x87 => Self::Hd1080DualLink,
            0x88 => Self::Hd720_3Ga,
            0x89 => Self::Hd1080_3Ga,
            0x8A => Self::Hd1080DualLink3Gb,
            0x8B => Self::Hd720_3Gb,
            0x8C => Self::Hd1080_3Gb,
            0x8D => Self::Sd483_576_3Gb,
            0x8E => Self::Hd720Stereo3Gb,
            0x8F => Self::Hd1080Stereo3Gb,
            0x90 => Self::Hd1080QuadLink,
            0x91 => Self::Hd720Stereo3Ga,
            0x92 => Self::Hd1080Stereo3Ga,
            0x93 => Self::Hd1080StereoDualLink3Gb,
            0x94 => Self::Hd1080Dual3Ga,
            0x95 => Self::Hd1080Dual3Gb,
            0x96 => Self::Uhd2160DualLink,
            0x97 => Self::Uhd2160QuadLink3Ga,
            0x98 => Self::Uhd2160QuadDualLink3Gb,
            0x99 => Self::Hd1080StereoQuad3Ga,
            0x9A => Self::Hd1080StereoQuad3Gb,
            0x9B => Self::Uhd2160StereoQuad3Gb,
            0x9C => Self::Hd1080OctLink,
            0x9D => Self::Uhdtv1SingleDualLink10Gb,
            0x9E => Self::Uhdtv2QuadOctaLink10Gb,
            0xA0 => Self::Uhdtv1MultiLink10Gb,
            0xA1 => Self::Uhdtv2MultiLink10Gb,
            0xA2 => Self::Vc2,
            0xB1 => Self::Stereo720_1080,
            0xB2 => Self::Vc2Level65_270Mbs,
            0xB3 => Self::Dcp4kFsw729,
            0xB4 => Self::Film2048x1556Dual,
            0xB5 => Self::Film2048x1556_3Gb,
            0xC0 => Self::Uhd2160Single6Gb,
            0xC1 => Self::Hd1080Single6Gb,
            0xC2 => Self::Hd1080AfrSingle6Gb,
            0xCE => Self::Uhd2160Single12Gb,
            0xCF => Self::Hd1080AfrSingle12Gb,
            0xD0 => Self::Uhd4320DualQuad12Gb,
            0xD1 => Self::Uhd2160DualQuad12Gb,
            0xD2 => Self::Uhd4320QuadQuad12Gb,
            _ => Self::Unknown,
        }
    }

    /// Payload code for byte 1 (0 for `Unknown`)
    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0x00,
            Self::Sd483_576 => 0x81,
            Self::Sd483_576DualLink => 0x82,
            Self::Sd483_576_540Mbs => 0x83,
            Self::Hd720 => 0x84,
            Self::Hd1080 => 0x85,
            Self::Sd483_576_1485Mbs => 0x86,
            Self::Hd1080DualLink => 0x87,
            Self::Hd720_3Ga => 0x88,
            Self::Hd1080_3Ga => 0x89,
            Self::Hd1080DualLink3Gb => 0x8A,
            Self::Hd720_3Gb => 0x8B,
            Self::Hd1080_3Gb => 0x8C,
            Self::Sd483_576_3Gb => 0x8D,
            Self::Hd720Stereo3Gb => 0x8E,
            Self::Hd1080Stereo3Gb => 0x8F,
            Self::Hd1080QuadLink => 0x90,
            Self::Hd720Stereo3Ga => 0x91,
            Self::Hd1080Stereo3Ga => 0x92,
            Self::Hd1080StereoDualLink3Gb => 0x93,
            Self::Hd1080Dual3Ga => 0x94,
            Self::Hd1080Dual3Gb => 0x95,
            Self::Uhd2160DualLink => 0x96,
            Self::Uhd2160QuadLink3Ga => 0x97,
            Self::Uhd2160QuadDualLink3Gb => 0x98,
            Self::Hd1080StereoQuad3Ga => 0x99,
            Self::Hd1080StereoQuad3Gb => 0x9A,
            Self::Uhd2160StereoQuad3Gb => 0x9B,
            Self::Hd1080OctLink => 0x9C,
            Self::Uhdtv1SingleDualLink10Gb => 0x9D,
            Self::Uhdtv2QuadOctaLink10Gb => 0x9E,
            Self::Uhdtv1MultiLink10Gb => 0xA0,
            Self::Uhdtv2MultiLink10Gb => 0xA1,
            Self::Vc2 => 0xA2,
            Self::Stereo720_1080 => 0xB1,
            Self::Vc2Level65_270Mbs => 0xB2,
            Self::Dcp4kFsw729 => 0xB3,
            Self::Film2048x1556Dual => 0xB4,
            Self::Film2048x1556_3Gb => 0xB5,
            Self::Uhd2160Single6Gb => 0xC0,
            Self::Hd1080Single6Gb => 0xC1,
            Self::Hd1080AfrSingle6Gb => 0xC2,
            Self::Uhd2160Single12Gb => 0xCE,
            Self::Hd1080AfrSingle12Gb => 0xCF,
            Self::Uhd4320DualQuad12Gb => 0xD0,
            Self::Uhd2160DualQuad12Gb => 0xD1,
            Self::Uhd4320QuadQuad12Gb => 0xD2,
        }
    }

    /// Check if the standard was recognized
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Number of physical SDI links the standard occupies
    pub fn link_count(&self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Sd483_576DualLink
            | Self::Hd1080DualLink
            | Self::Hd1080DualLink3Gb
            | Self::Hd1080StereoDualLink3Gb
            | Self::Hd1080Dual3Ga
            | Self::Hd1080Dual3Gb
            | Self::Uhd2160DualLink
            | Self::Film2048x1556Dual
            | Self::Uhdtv1SingleDualLink10Gb => 2,
            Self::Hd1080QuadLink
            | Self::Uhd2160QuadLink3Ga
            | Self::Hd1080StereoQuad3Ga
            | Self::Hd1080StereoQuad3Gb
            | Self::Uhd2160StereoQuad3Gb => 4,
            Self::Hd1080OctLink
            | Self::Uhd2160QuadDualLink3Gb
            | Self::Uhdtv2QuadOctaLink10Gb
            | Self::Uhd4320DualQuad12Gb
            | Self::Uhd2160DualQuad12Gb => 8,
            Self::Uhd4320QuadQuad12Gb => 16,
            _ => 1,
        }
    }

    /// 3G level B standards multiplex two streams into one link
    pub fn is_3g_level_b(&self) -> bool {
        matches!(
            self,
            Self::Hd1080DualLink3Gb
                | Self::Hd720_3Gb
                | Self::Hd1080_3Gb
                | Self::Sd483_576_3Gb
                | Self::Hd720Stereo3Gb
                | Self::Hd1080Stereo3Gb
                | Self::Hd1080StereoDualLink3Gb
                | Self::Hd1080Dual3Gb
                | Self::Uhd2160QuadDualLink3Gb
                | Self::Hd1080StereoQuad3Gb
                | Self::Uhd2160StereoQuad3Gb
                | Self::Film2048x1556_3Gb
        )
    }

    /// Check if this is a UHD (2160 line or larger) raster
    pub fn is_uhd(&self) -> bool {
        matches!(
            self,
            Self::Uhd2160DualLink
                | Self::Uhd2160QuadLink3Ga
                | Self::Uhd2160QuadDualLink3Gb
                | Self::Uhd2160StereoQuad3Gb
                | Self::Uhdtv1SingleDualLink10Gb
                | Self::Uhdtv2QuadOctaLink10Gb
                | Self::Uhdtv1MultiLink10Gb
                | Self::Uhdtv2MultiLink10Gb
                | Self::Uhd2160Single6Gb
                | Self::Uhd2160Single12Gb
                | Self::Uhd4320DualQuad12Gb
                | Self::Uhd2160DualQuad12Gb
                | Self::Uhd4320QuadQuad12Gb
        )
    }
}

impl std::fmt::Display for VpidStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            other => write!(f, "{:?} (0x{:02X})", other, other.code()),
        }
    }
}

/// Chroma/color sampling structure from the low nibble of byte 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidSampling {
    Yuv422,
    Yuv444,
    /// RGB 4:4:4
    Gbr444,
    Yuv420,
    Yuva4224,
    Yuva4444,
    /// RGB 4:4:4 with alpha
    Gbra4444,
    Yuvd4224,
    Yuvd4444,
    /// RGB 4:4:4 with depth
    Gbrd4444,
    /// CIE XYZ 4:4:4, also the fallback for undecodable words
    #[default]
    Xyz444,
    /// Reserved code (7, 11-13, 15)
    Reserved(u8),
}

impl VpidSampling {
    /// Decode the 4-bit sampling field
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0 => Self::Yuv422,
            1 => Self::Yuv444,
            2 => Self::Gbr444,
            3 => Self::Yuv420,
            4 => Self::Yuva4224,
            5 => Self::Yuva4444,
            6 => Self::Gbra4444,
            8 => Self::Yuvd4224,
            9 => Self::Yuvd4444,
            10 => Self::Gbrd4444,
            14 => Self::Xyz444,
            other => Self::Reserved(other),
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Yuv422 => 0,
            Self::Yuv444 => 1,
            Self::Gbr444 => 2,
            Self::Yuv420 => 3,
            Self::Yuva4224 => 4,
            Self::Yuva4444 => 5,
            Self::Gbra4444 => 6,
            Self::Yuvd4224 => 8,
            Self::Yuvd4444 => 9,
            Self::Gbrd4444 => 10,
            Self::Xyz444 => 14,
            Self::Reserved(bits) => bits & 0x0F,
        }
    }

    /// RGB-family samplings (GBR with or without alpha/depth)
    pub fn is_rgb(&self) -> bool {
        matches!(self, Self::Gbr444 | Self::Gbra4444 | Self::Gbrd4444)
    }

    /// Samplings carrying a fourth (alpha or depth) component
    pub fn has_fourth_component(&self) -> bool {
        matches!(
            self,
            Self::Yuva4224
                | Self::Yuva4444
                | Self::Gbra4444
                | Self::Yuvd4224
                | Self::Yuvd4444
                | Self::Gbrd4444
        )
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Yuv422 => "YCbCr 4:2:2",
            Self::Yuv444 => "YCbCr 4:4:4",
            Self::Gbr444 => "GBR 4:4:4",
            Self::Yuv420 => "YCbCr 4:2:0",
            Self::Yuva4224 => "YCbCrA 4:2:2:4",
            Self::Yuva4444 => "YCbCrA 4:4:4:4",
            Self::Gbra4444 => "GBRA 4:4:4:4",
            Self::Yuvd4224 => "YCbCrD 4:2:2:4",
            Self::Yuvd4444 => "YCbCrD 4:4:4:4",
            Self::Gbrd4444 => "GBRD 4:4:4:4",
            Self::Xyz444 => "XYZ 4:4:4",
            Self::Reserved(_) => "Reserved",
        }
    }
}

impl std::fmt::Display for VpidSampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved(bits) => write!(f, "Reserved ({})", bits),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Colorimetry from bits 5-4 of byte 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidColorimetry {
    /// ITU-R BT.709
    #[default]
    Rec709,
    /// Signalled in VANC
    Vanc,
    /// ITU-R BT.2020
    Uhdtv,
    Unknown,
}

impl VpidColorimetry {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Rec709,
            1 => Self::Vanc,
            2 => Self::Uhdtv,
            _ => Self::Unknown,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Rec709 => 0,
            Self::Vanc => 1,
            Self::Uhdtv => 2,
            Self::Unknown => 3,
        }
    }
}

/// Transfer characteristics from bits 5-4 of byte 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidTransfer {
    /// SDR-TV gamma
    #[default]
    Sdr,
    /// Hybrid log-gamma
    Hlg,
    /// Perceptual quantizer (ST 2084)
    Pq,
    Unspecified,
}

impl VpidTransfer {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Sdr,
            1 => Self::Hlg,
            2 => Self::Pq,
            _ => Self::Unspecified,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Sdr => 0,
            Self::Hlg => 1,
            Self::Pq => 2,
            Self::Unspecified => 3,
        }
    }

    /// HLG and PQ are high dynamic range transfers
    pub fn is_hdr(&self) -> bool {
        matches!(self, Self::Hlg | Self::Pq)
    }
}

/// Picture rate from the low nibble of byte 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidPictureRate {
    #[default]
    None,
    Reserved,
    Fps23_98,
    Fps24,
    Fps47_95,
    Fps25,
    Fps29_97,
    Fps30,
    Fps48,
    Fps50,
    Fps59_94,
    Fps60,
    Fps96,
    Fps100,
    Fps119_88,
    Fps120,
}

impl VpidPictureRate {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0 => Self::None,
            1 => Self::Reserved,
            2 => Self::Fps23_98,
            3 => Self::Fps24,
            4 => Self::Fps47_95,
            5 => Self::Fps25,
            6 => Self::Fps29_97,
            7 => Self::Fps30,
            8 => Self::Fps48,
            9 => Self::Fps50,
            10 => Self::Fps59_94,
            11 => Self::Fps60,
            12 => Self::Fps96,
            13 => Self::Fps100,
            14 => Self::Fps119_88,
            _ => Self::Fps120,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Reserved => 1,
            Self::Fps23_98 => 2,
            Self::Fps24 => 3,
            Self::Fps47_95 => 4,
            Self::Fps25 => 5,
            Self::Fps29_97 => 6,
            Self::Fps30 => 7,
            Self::Fps48 => 8,
            Self::Fps50 => 9,
            Self::Fps59_94 => 10,
            Self::Fps60 => 11,
            Self::Fps96 => 12,
            Self::Fps100 => 13,
            Self::Fps119_88 => 14,
            Self::Fps120 => 15,
        }
    }

    /// Frame rate in frames per second, `None` when not signalled
    pub fn frames_per_second(&self) -> Option<f64> {
        let fps = match self {
            Self::None | Self::Reserved => return None,
            Self::Fps23_98 => 24000.0 / 1001.0,
            Self::Fps24 => 24.0,
            Self::Fps47_95 => 48000.0 / 1001.0,
            Self::Fps25 => 25.0,
            Self::Fps29_97 => 30000.0 / 1001.0,
            Self::Fps30 => 30.0,
            Self::Fps48 => 48.0,
            Self::Fps50 => 50.0,
            Self::Fps59_94 => 60000.0 / 1001.0,
            Self::Fps60 => 60.0,
            Self::Fps96 => 96.0,
            Self::Fps100 => 100.0,
            Self::Fps119_88 => 120000.0 / 1001.0,
            Self::Fps120 => 120.0,
        };
        Some(fps)
    }
}

/// Sample bit depth from bits 1-0 of byte 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidBitDepth {
    #[default]
    Bits10Full,
    Bits10,
    Bits12,
    Bits12Full,
}

impl VpidBitDepth {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Bits10Full,
            1 => Self::Bits10,
            2 => Self::Bits12,
            _ => Self::Bits12Full,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Bits10Full => 0,
            Self::Bits10 => 1,
            Self::Bits12 => 2,
            Self::Bits12Full => 3,
        }
    }

    /// Bits per component
    pub fn depth(&self) -> u32 {
        match self {
            Self::Bits10Full | Self::Bits10 => 10,
            Self::Bits12 | Self::Bits12Full => 12,
        }
    }

    pub fn is_full_range(&self) -> bool {
        matches!(self, Self::Bits10Full | Self::Bits12Full)
    }
}

/// Dynamic range from bits 4-3 of byte 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VpidDynamicRange {
    #[default]
    Percent100,
    Percent200,
    Percent400,
    Reserved,
}

impl VpidDynamicRange {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Percent100,
            1 => Self::Percent200,
            2 => Self::Percent400,
            _ => Self::Reserved,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Percent100 => 0,
            Self::Percent200 => 1,
            Self::Percent400 => 2,
            Self::Reserved => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_code_roundtrip() {
        for code in 0u8..=0xFF {
            let standard = VpidStandard::from_code(code);
            if standard.is_known() {
                assert_eq!(standard.code(), code);
            }
        }
    }

    #[test]
    fn test_unassigned_codes_are_unknown() {
        assert_eq!(VpidStandard::from_code(0x00), VpidStandard::Unknown);
        assert_eq!(VpidStandard::from_code(0x12), VpidStandard::Unknown);
        assert_eq!(VpidStandard::from_code(0x9F), VpidStandard::Unknown);
        assert_eq!(VpidStandard::from_code(0xFF), VpidStandard::Unknown);
    }

    #[test]
    fn test_standard_link_count() {
        assert_eq!(VpidStandard::Hd1080.link_count(), 1);
        assert_eq!(VpidStandard::Hd1080DualLink.link_count(), 2);
        assert_eq!(VpidStandard::Uhd2160QuadLink3Ga.link_count(), 4);
        assert_eq!(VpidStandard::Unknown.link_count(), 0);
        assert!(VpidStandard::Hd1080_3Gb.is_3g_level_b());
        assert!(!VpidStandard::Hd1080_3Ga.is_3g_level_b());
    }

    #[test]
    fn test_sampling_rgb_family() {
        let rgb: Vec<u8> = (0u8..16)
            .filter(|bits| VpidSampling::from_bits(*bits).is_rgb())
            .collect();
        assert_eq!(rgb, vec![2, 6, 10]);
        assert!(!VpidSampling::default().is_rgb());
        assert!(!VpidSampling::Reserved(7).is_rgb());
    }

    #[test]
    fn test_sampling_reserved_codes() {
        assert_eq!(VpidSampling::from_bits(7), VpidSampling::Reserved(7));
        assert_eq!(VpidSampling::from_bits(13).bits(), 13);
        assert_eq!(VpidSampling::from_bits(15), VpidSampling::Reserved(15));
        assert_eq!(VpidSampling::from_bits(14), VpidSampling::Xyz444);
        assert_eq!(VpidSampling::Xyz444.bits(), 14);
    }

    #[test]
    fn test_picture_rate_fps() {
        assert_eq!(VpidPictureRate::from_bits(11).frames_per_second(), Some(60.0));
        assert_eq!(VpidPictureRate::None.frames_per_second(), None);
        let ntsc = VpidPictureRate::Fps29_97.frames_per_second().unwrap();
        assert!((ntsc - 29.97).abs() < 0.001);
    }

    #[test]
    fn test_bit_depth() {
        assert_eq!(VpidBitDepth::from_bits(1).depth(), 10);
        assert!(VpidBitDepth::from_bits(3).is_full_range());
        assert!(!VpidBitDepth::Bits12.is_full_range());
    }
}
