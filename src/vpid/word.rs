//! Bit layout of a single 32-bit payload identifier word
//!
//! Capture cards deliver the four ST 352 bytes packed as
//! `byte1 << 24 | byte3 << 16 | byte2 << 8 | byte4`:
//!
//! | bits  | field                                 |
//! |-------|---------------------------------------|
//! | 31-24 | standard (payload code)               |
//! | 23    | 16:9 image aspect                     |
//! | 21-20 | colorimetry                           |
//! | 19-16 | sampling structure                    |
//! | 15    | progressive transport                 |
//! | 14    | progressive picture                   |
//! | 13-12 | transfer characteristics              |
//! | 11-8  | picture rate                          |
//! | 7-6   | channel / link assignment             |
//! | 4-3   | dynamic range                         |
//! | 1-0   | bit depth                             |

use super::types::{
    VpidBitDepth, VpidColorimetry, VpidDynamicRange, VpidPictureRate, VpidSampling, VpidStandard,
    VpidTransfer,
};

const SHIFT_STANDARD: u32 = 24;
const MASK_STANDARD: u32 = 0xFF00_0000;
const BIT_ASPECT_16X9: u32 = 1 << 23;
const SHIFT_COLORIMETRY: u32 = 20;
const MASK_COLORIMETRY: u32 = 0x0030_0000;
const SHIFT_SAMPLING: u32 = 16;
const MASK_SAMPLING: u32 = 0x000F_0000;
const BIT_PROGRESSIVE_TRANSPORT: u32 = 1 << 15;
const BIT_PROGRESSIVE_PICTURE: u32 = 1 << 14;
const SHIFT_TRANSFER: u32 = 12;
const MASK_TRANSFER: u32 = 0x0000_3000;
const SHIFT_PICTURE_RATE: u32 = 8;
const MASK_PICTURE_RATE: u32 = 0x0000_0F00;
const SHIFT_CHANNEL: u32 = 6;
const MASK_CHANNEL: u32 = 0x0000_00C0;
const SHIFT_DYNAMIC_RANGE: u32 = 3;
const MASK_DYNAMIC_RANGE: u32 = 0x0000_0018;
const MASK_BIT_DEPTH: u32 = 0x0000_0003;

fn field(raw: u32, mask: u32, shift: u32) -> u8 {
    ((raw & mask) >> shift) as u8
}

/// One raw payload identifier word as read from (or written to) hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VpidWord(pub u32);

impl VpidWord {
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Start composing a word for transmission
    pub fn builder(standard: VpidStandard) -> VpidBuilder {
        VpidBuilder::new(standard)
    }

    pub fn standard(&self) -> VpidStandard {
        VpidStandard::from_code(field(self.0, MASK_STANDARD, SHIFT_STANDARD))
    }

    /// Sampling structure; undecodable words fall back to the default sampling
    pub fn sampling(&self) -> VpidSampling {
        if self.standard().is_known() {
            VpidSampling::from_bits(field(self.0, MASK_SAMPLING, SHIFT_SAMPLING))
        } else {
            VpidSampling::default()
        }
    }

    /// Decode every field of the word.
    ///
    /// A word whose standard is not recognized yields `VpidInfo::default()`:
    /// the remaining bits of such a word carry no defined meaning.
    pub fn decode(&self) -> VpidInfo {
        let standard = self.standard();
        if !standard.is_known() {
            return VpidInfo::default();
        }

        let raw = self.0;
        VpidInfo {
            standard,
            sampling: VpidSampling::from_bits(field(raw, MASK_SAMPLING, SHIFT_SAMPLING)),
            colorimetry: VpidColorimetry::from_bits(field(raw, MASK_COLORIMETRY, SHIFT_COLORIMETRY)),
            aspect_16x9: raw & BIT_ASPECT_16X9 != 0,
            progressive_transport: raw & BIT_PROGRESSIVE_TRANSPORT != 0,
            progressive_picture: raw & BIT_PROGRESSIVE_PICTURE != 0,
            transfer: VpidTransfer::from_bits(field(raw, MASK_TRANSFER, SHIFT_TRANSFER)),
            picture_rate: VpidPictureRate::from_bits(field(raw, MASK_PICTURE_RATE, SHIFT_PICTURE_RATE)),
            channel: field(raw, MASK_CHANNEL, SHIFT_CHANNEL) + 1,
            dynamic_range: VpidDynamicRange::from_bits(field(raw, MASK_DYNAMIC_RANGE, SHIFT_DYNAMIC_RANGE)),
            bit_depth: VpidBitDepth::from_bits((raw & MASK_BIT_DEPTH) as u8),
        }
    }
}

impl From<u32> for VpidWord {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for VpidWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Fully decoded payload identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VpidInfo {
    pub standard: VpidStandard,
    pub sampling: VpidSampling,
    pub colorimetry: VpidColorimetry,
    pub aspect_16x9: bool,
    pub progressive_transport: bool,
    pub progressive_picture: bool,
    pub transfer: VpidTransfer,
    pub picture_rate: VpidPictureRate,
    /// Link/channel assignment, 1-4
    pub channel: u8,
    pub dynamic_range: VpidDynamicRange,
    pub bit_depth: VpidBitDepth,
}

impl Default for VpidInfo {
    fn default() -> Self {
        Self {
            standard: VpidStandard::Unknown,
            sampling: VpidSampling::default(),
            colorimetry: VpidColorimetry::Unknown,
            aspect_16x9: false,
            progressive_transport: false,
            progressive_picture: false,
            transfer: VpidTransfer::Unspecified,
            picture_rate: VpidPictureRate::None,
            channel: 1,
            dynamic_range: VpidDynamicRange::Percent100,
            bit_depth: VpidBitDepth::default(),
        }
    }
}

impl VpidInfo {
    /// Interlaced content carried on an interlaced transport
    pub fn is_interlaced(&self) -> bool {
        !self.progressive_transport && !self.progressive_picture
    }

    /// Progressive segmented frame (progressive picture, interlaced transport)
    pub fn is_psf(&self) -> bool {
        !self.progressive_transport && self.progressive_picture
    }
}

/// Composes a payload identifier word field by field.
#[derive(Debug, Clone, Copy)]
pub struct VpidBuilder {
    info: VpidInfo,
}

impl VpidBuilder {
    pub fn new(standard: VpidStandard) -> Self {
        Self {
            info: VpidInfo {
                standard,
                sampling: VpidSampling::Yuv422,
                colorimetry: VpidColorimetry::Rec709,
                transfer: VpidTransfer::Sdr,
                ..VpidInfo::default()
            },
        }
    }

    pub fn sampling(mut self, sampling: VpidSampling) -> Self {
        self.info.sampling = sampling;
        self
    }

    pub fn colorimetry(mut self, colorimetry: VpidColorimetry) -> Self {
        self.info.colorimetry = colorimetry;
        self
    }

    pub fn aspect_16x9(mut self, wide: bool) -> Self {
        self.info.aspect_16x9 = wide;
        self
    }

    /// Set progressive flags for transport and picture
    pub fn progressive(mut self, transport: bool, picture: bool) -> Self {
        self.info.progressive_transport = transport;
        self.info.progressive_picture = picture;
        self
    }

    pub fn transfer(mut self, transfer: VpidTransfer) -> Self {
        self.info.transfer = transfer;
        self
    }

    pub fn picture_rate(mut self, rate: VpidPictureRate) -> Self {
        self.info.picture_rate = rate;
        self
    }

    /// Link/channel assignment (clamped to 1-4)
    pub fn channel(mut self, channel: u8) -> Self {
        self.info.channel = channel.clamp(1, 4);
        self
    }

    pub fn dynamic_range(mut self, range: VpidDynamicRange) -> Self {
        self.info.dynamic_range = range;
        self
    }

    pub fn bit_depth(mut self, depth: VpidBitDepth) -> Self {
        self.info.bit_depth = depth;
        self
    }

    pub fn build(self) -> VpidWord {
        let info = self.info;
        let mut raw = (info.standard.code() as u32) << SHIFT_STANDARD;
        if info.aspect_16x9 {
            raw |= BIT_ASPECT_16X9;
        }
        raw |= ((info.colorimetry.bits() as u32) << SHIFT_COLORIMETRY) & MASK_COLORIMETRY;
        raw |= ((info.sampling.bits() as u32) << SHIFT_SAMPLING) & MASK_SAMPLING;
        if info.progressive_transport {
            raw |= BIT_PROGRESSIVE_TRANSPORT;
        }
        if info.progressive_picture {
            raw |= BIT_PROGRESSIVE_PICTURE;
        }
        raw |= ((info.transfer.bits() as u32) << SHIFT_TRANSFER) & MASK_TRANSFER;
        raw |= ((info.picture_rate.bits() as u32) << SHIFT_PICTURE_RATE) & MASK_PICTURE_RATE;
        raw |= (((info.channel - 1) as u32) << SHIFT_CHANNEL) & MASK_CHANNEL;
        raw |= ((info.dynamic_range.bits() as u32) << SHIFT_DYNAMIC_RANGE) & MASK_DYNAMIC_RANGE;
        raw |= info.bit_depth.bits() as u32 & MASK_BIT_DEPTH;
        VpidWord(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1080p60 3G-A, YCbCr 4:2:2, Rec.709, 16:9, 10-bit
    const WORD_1080P60: u32 = 0x8980_CB01;

    #[test]
    fn test_decode_1080p60() {
        let info = VpidWord(WORD_1080P60).decode();
        assert_eq!(info.standard, VpidStandard::Hd1080_3Ga);
        assert_eq!(info.sampling, VpidSampling::Yuv422);
        assert_eq!(info.colorimetry, VpidColorimetry::Rec709);
        assert!(info.aspect_16x9);
        assert!(info.progressive_transport);
        assert!(info.progressive_picture);
        assert!(!info.is_interlaced());
        assert_eq!(info.picture_rate, VpidPictureRate::Fps60);
        assert_eq!(info.transfer, VpidTransfer::Sdr);
        assert_eq!(info.bit_depth, VpidBitDepth::Bits10);
        assert_eq!(info.channel, 1);
    }

    #[test]
    fn test_decode_rgb_hlg() {
        // 2160p50 12G, GBR 4:4:4, BT.2020, HLG, 12-bit, channel 2
        let raw = 0xCE22_D94A;
        let info = VpidWord(raw).decode();
        assert_eq!(info.standard, VpidStandard::Uhd2160Single12Gb);
        assert_eq!(info.sampling, VpidSampling::Gbr444);
        assert_eq!(info.colorimetry, VpidColorimetry::Uhdtv);
        assert_eq!(info.transfer, VpidTransfer::Hlg);
        assert!(info.transfer.is_hdr());
        assert_eq!(info.picture_rate, VpidPictureRate::Fps50);
        assert_eq!(info.channel, 2);
        assert_eq!(info.dynamic_range, VpidDynamicRange::Percent200);
        assert_eq!(info.bit_depth, VpidBitDepth::Bits12);
    }

    #[test]
    fn test_unknown_standard_degrades() {
        // Unassigned payload code with RGB sampling bits set
        let word = VpidWord(0x1202_CB01);
        assert_eq!(word.standard(), VpidStandard::Unknown);
        assert_eq!(word.sampling(), VpidSampling::Xyz444);
        assert_eq!(word.decode(), VpidInfo::default());
    }

    #[test]
    fn test_builder_matches_hardware_word() {
        let word = VpidWord::builder(VpidStandard::Hd1080_3Ga)
            .aspect_16x9(true)
            .progressive(true, true)
            .picture_rate(VpidPictureRate::Fps60)
            .bit_depth(VpidBitDepth::Bits10)
            .build();
        assert_eq!(word, VpidWord(WORD_1080P60));
    }

    #[test]
    fn test_xyz_sampling_code() {
        let word = VpidWord(0x898E_CB01);
        assert_eq!(word.sampling(), VpidSampling::Xyz444);

        let built = VpidWord::builder(VpidStandard::Hd1080_3Ga)
            .aspect_16x9(true)
            .progressive(true, true)
            .picture_rate(VpidPictureRate::Fps60)
            .sampling(VpidSampling::Xyz444)
            .bit_depth(VpidBitDepth::Bits10)
            .build();
        assert_eq!(built, word);
    }

    #[test]
    fn test_builder_psf() {
        let word = VpidWord::builder(VpidStandard::Hd1080)
            .progressive(false, true)
            .picture_rate(VpidPictureRate::Fps23_98)
            .channel(9)
            .build();
        let info = word.decode();
        assert!(info.is_psf());
        assert_eq!(info.channel, 4);
        assert_eq!(info.picture_rate, VpidPictureRate::Fps23_98);
    }
}
