//! Dual-link payload identifier descriptor
//!
//! `VpidData` pairs the two words a capture card reports per input (link A
//! and link B) with their decoded standard and sampling. The derived fields
//! are recomputed on every write so they can never lag the raw words.

use std::hash::{Hash, Hasher};

use super::types::{VpidSampling, VpidStandard};
use super::word::{VpidInfo, VpidWord};

/// Decode both link words into `(standard_a, sampling_a, standard_b, sampling_b)`.
pub fn parse(raw_a: u32, raw_b: u32) -> (VpidStandard, VpidSampling, VpidStandard, VpidSampling) {
    let a = VpidWord(raw_a);
    let b = VpidWord(raw_b);
    (a.standard(), a.sampling(), b.standard(), b.sampling())
}

/// Payload identifier words for links A and B plus their decoded fields.
///
/// Equality and hashing only consider the raw words.
#[derive(Debug)]
pub struct VpidData {
    vpid_a: u32,
    vpid_b: u32,
    standard_a: VpidStandard,
    sampling_a: VpidSampling,
    standard_b: VpidStandard,
    sampling_b: VpidSampling,
}

impl VpidData {
    /// Create a descriptor from raw words, decoding them immediately
    pub fn new(vpid_a: u32, vpid_b: u32) -> Self {
        let mut data = Self {
            vpid_a,
            vpid_b,
            standard_a: VpidStandard::Unknown,
            sampling_a: VpidSampling::default(),
            standard_b: VpidStandard::Unknown,
            sampling_b: VpidSampling::default(),
        };
        data.parse();
        data
    }

    pub fn a(&self) -> u32 {
        self.vpid_a
    }

    pub fn b(&self) -> u32 {
        self.vpid_b
    }

    /// Replace the link A word
    pub fn set_a(&mut self, vpid_a: u32) {
        self.vpid_a = vpid_a;
        self.parse();
    }

    /// Replace the link B word
    pub fn set_b(&mut self, vpid_b: u32) {
        self.vpid_b = vpid_b;
        self.parse();
    }

    /// Replace both words at once (one decode instead of two)
    pub fn set(&mut self, vpid_a: u32, vpid_b: u32) {
        self.vpid_a = vpid_a;
        self.vpid_b = vpid_b;
        self.parse();
    }

    fn parse(&mut self) {
        let (standard_a, sampling_a, standard_b, sampling_b) = parse(self.vpid_a, self.vpid_b);
        self.standard_a = standard_a;
        self.sampling_a = sampling_a;
        self.standard_b = standard_b;
        self.sampling_b = sampling_b;
    }

    /// Standard of link A
    pub fn standard(&self) -> VpidStandard {
        self.standard_a
    }

    /// Sampling of link A
    pub fn sampling(&self) -> VpidSampling {
        self.sampling_a
    }

    pub fn standard_b(&self) -> VpidStandard {
        self.standard_b
    }

    pub fn sampling_b(&self) -> VpidSampling {
        self.sampling_b
    }

    /// Whether link A carries RGB-family samples
    pub fn is_rgb(&self) -> bool {
        self.sampling_a.is_rgb()
    }

    /// Full decode of link A
    pub fn info_a(&self) -> VpidInfo {
        VpidWord(self.vpid_a).decode()
    }

    /// Full decode of link B
    pub fn info_b(&self) -> VpidInfo {
        VpidWord(self.vpid_b).decode()
    }
}

impl Default for VpidData {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

// Copies the raw words only; the derived fields are decoded afresh.
impl Clone for VpidData {
    fn clone(&self) -> Self {
        Self::new(self.vpid_a, self.vpid_b)
    }
}

impl PartialEq for VpidData {
    fn eq(&self, other: &Self) -> bool {
        self.vpid_a == other.vpid_a && self.vpid_b == other.vpid_b
    }
}

impl Eq for VpidData {}

impl Hash for VpidData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vpid_a.hash(state);
        self.vpid_b.hash(state);
    }
}

impl std::fmt::Display for VpidData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A {} [{} / {}], B {} [{} / {}]",
            VpidWord(self.vpid_a),
            self.standard_a,
            self.sampling_a,
            VpidWord(self.vpid_b),
            self.standard_b,
            self.sampling_b
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_1080P_422: u32 = 0x8980_CB01;
    const WORD_1080P_GBR: u32 = 0x8982_CB01;
    const WORD_1080P_GBRA: u32 = 0x8986_CB01;
    const WORD_1080P_GBRD: u32 = 0x898A_CB01;

    #[test]
    fn test_default_is_unknown() {
        let data = VpidData::default();
        assert_eq!(data.a(), 0);
        assert_eq!(data.b(), 0);
        assert_eq!(data.standard(), VpidStandard::Unknown);
        assert_eq!(data.sampling(), VpidSampling::Xyz444);
        assert!(!data.is_rgb());
    }

    #[test]
    fn test_zero_words_match_default() {
        let data = VpidData::new(0, 0);
        assert_eq!(data.standard(), VpidStandard::Unknown);
        assert_eq!(data.standard_b(), VpidStandard::Unknown);
        assert_eq!(data.sampling(), VpidSampling::Xyz444);
        assert_eq!(data.sampling_b(), VpidSampling::Xyz444);
        assert!(!data.is_rgb());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let words = [0u32, WORD_1080P_422, WORD_1080P_GBR, 0xDEAD_BEEF, u32::MAX];
        for &a in &words {
            for &b in &words {
                assert_eq!(parse(a, b), parse(a, b));
                let data = VpidData::new(a, b);
                let (sa, pa, sb, pb) = parse(a, b);
                assert_eq!(data.standard(), sa);
                assert_eq!(data.sampling(), pa);
                assert_eq!(data.standard_b(), sb);
                assert_eq!(data.sampling_b(), pb);
            }
        }
    }

    #[test]
    fn test_set_reparses() {
        let mut data = VpidData::default();
        data.set_a(WORD_1080P_GBR);
        assert_eq!(data.standard(), VpidStandard::Hd1080_3Ga);
        assert!(data.is_rgb());

        data.set_b(WORD_1080P_422);
        assert_eq!(data.sampling_b(), VpidSampling::Yuv422);

        data.set_a(0);
        assert_eq!(data.standard(), VpidStandard::Unknown);
        assert!(!data.is_rgb());
    }

    #[test]
    fn test_is_rgb() {
        assert!(VpidData::new(WORD_1080P_GBR, 0).is_rgb());
        assert!(VpidData::new(WORD_1080P_GBRA, 0).is_rgb());
        assert!(VpidData::new(WORD_1080P_GBRD, 0).is_rgb());
        assert!(!VpidData::new(WORD_1080P_422, 0).is_rgb());
        // Only link A decides
        assert!(!VpidData::new(WORD_1080P_422, WORD_1080P_GBR).is_rgb());
    }

    #[test]
    fn test_equality_uses_raw_words() {
        let a = VpidData::new(WORD_1080P_422, 0);
        let b = VpidData::new(WORD_1080P_422, 0);
        let c = VpidData::new(WORD_1080P_422, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);

        // Two undecodable words share derived fields but differ in raw value
        let x = VpidData::new(0x1200_0000, 0);
        let y = VpidData::new(0x1300_0000, 0);
        assert_eq!(x.standard(), y.standard());
        assert_eq!(x.sampling(), y.sampling());
        assert_ne!(x, y);
    }

    #[test]
    fn test_clone_matches_direct_construction() {
        let original = VpidData::new(WORD_1080P_GBR, WORD_1080P_422);
        let cloned = original.clone();
        let direct = VpidData::new(WORD_1080P_GBR, WORD_1080P_422);
        assert_eq!(cloned, original);
        assert_eq!(cloned.standard(), direct.standard());
        assert_eq!(cloned.sampling(), direct.sampling());
        assert_eq!(cloned.standard_b(), direct.standard_b());
        assert_eq!(cloned.sampling_b(), direct.sampling_b());
    }

    #[test]
    fn test_info_a() {
        let data = VpidData::new(WORD_1080P_422, 0);
        assert_eq!(data.info_a().picture_rate.frames_per_second(), Some(60.0));
        assert_eq!(data.info_b(), VpidInfo::default());
    }
}
