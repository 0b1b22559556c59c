//! Adaptive Learning Core - the stateful heart of the engine.
//!
//! # Module Structure
//!
//! - `params` - Tunable [`LearningParameters`] with documented safe bounds
//! - `projection` - Quantum-style trait projection (normalized superposition)
//! - `core` - The per-cycle [`advance`](AdaptiveCore::advance) equations

mod core;
mod params;
mod projection;

pub use self::core::{
    AdaptiveCore, EXPERIENCE_HALF_LIFE, FOCUSED_FOCUS, LEARNING_GROWTH, MAX_GROWTH_STEP,
    NEUTRAL_ENV_FACTOR, PROCESSING_STRESS, RESTING_ENGAGEMENT, STAGE_BOUNDS,
};
pub use params::{
    LearningParameters, DEFAULT_ADAPTATION_RATE, DEFAULT_BASE_GROWTH_RATE,
    DEFAULT_ENVIRONMENT_WEIGHT, DEFAULT_QUANTUM_COHERENCE, DEFAULT_SATURATION_LEVEL,
};
pub use projection::{TraitProjection, NORM_TOLERANCE, TRAIT_BASIS_DIM};
