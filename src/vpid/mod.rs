//! SDI payload identifier (VPID, SMPTE ST 352) decoding
//!
//! Capture hardware reports one 32-bit identifier word per link. This module
//! turns those words into typed descriptors and composes words for output.
//!
//! # Architecture
//!
//! - `VpidStandard`, `VpidSampling`, ...: typed views of each bit field
//! - `VpidWord`: one raw word, its bit layout and the `VpidBuilder`
//! - `VpidData`: the link A / link B pair polled from an input
//!
//! Decoding never fails. Unassigned payload codes decode to
//! `VpidStandard::Unknown` with the default (XYZ 4:4:4) sampling.

pub mod data;
pub mod types;
pub mod word;

pub use data::{parse, VpidData};
pub use types::{
    VpidBitDepth, VpidColorimetry, VpidDynamicRange, VpidPictureRate, VpidSampling, VpidStandard,
    VpidTransfer,
};
pub use word::{VpidBuilder, VpidInfo, VpidWord};
