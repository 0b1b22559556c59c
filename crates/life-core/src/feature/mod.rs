//! Feature extraction: spectral estimation and derived cognitive scalars.
//!
//! One [`RawSample`](crate::types::RawSample) window enters, one
//! [`FeatureVector`](crate::types::FeatureVector) leaves:
//!
//! ```text
//! RawSample ──► Welch PSD ──► band powers ─┐
//!          └──► pairwise correlation ──────┼──► FeatureVector
//!                     band-power ratios ───┘
//! ```

mod extractor;
pub mod spectral;

pub use extractor::{FeatureConfig, FeatureExtractor, DEFAULT_SEGMENT_LEN};
