//! Quantum-style trait projection.
//!
//! A weighted superposition `projection = Σ αᵢ · basisᵢ` over a fixed small
//! set of trait axes. "Quantum" is cosmetic naming from the source domain:
//! this is ordinary paired-real linear algebra, with the one invariant that
//! matters for testability — the weights are normalized so Σ|αᵢ|² = 1.

use serde::{Deserialize, Serialize};

/// Number of trait basis axes.
pub const TRAIT_BASIS_DIM: usize = 4;

/// Phase offsets (radians) placing each trait axis on the unit circle.
/// Fixed constants: the projection must be deterministic.
const AXIS_PHASES: [f32; TRAIT_BASIS_DIM] = [0.0, 0.7854, 1.5708, 2.3562];

/// Normalization tolerance used by [`TraitProjection::is_normalized`].
pub const NORM_TOLERANCE: f32 = 1e-6;

/// Projected trait vector: complex weights as paired (re, im) components.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitProjection {
    /// Real parts of the basis weights
    pub re: [f32; TRAIT_BASIS_DIM],
    /// Imaginary parts of the basis weights
    pub im: [f32; TRAIT_BASIS_DIM],
}

impl TraitProjection {
    /// Uniform superposition: every axis weighted equally, Σ|αᵢ|² = 1.
    pub fn uniform() -> Self {
        let w = (1.0 / TRAIT_BASIS_DIM as f32).sqrt();
        Self {
            re: [w; TRAIT_BASIS_DIM],
            im: [0.0; TRAIT_BASIS_DIM],
        }
    }

    /// Compute the projection for the given trait level and cycle delta.
    ///
    /// Axes unlock in order as the trait level rises: axis `i` ramps from 0
    /// to full weight over the level-ratio interval `[i/DIM, (i+1)/DIM]`, so
    /// later axes need higher levels to light up. The cycle's trait delta
    /// rotates energy into the imaginary parts, scaled by the coherence
    /// factor. The result is always renormalized; a degenerate all-zero
    /// weight vector falls back to the uniform superposition.
    pub fn project(level_ratio: f32, trait_delta: f32, coherence: f32) -> Self {
        let mut re = [0.0f32; TRAIT_BASIS_DIM];
        let mut im = [0.0f32; TRAIT_BASIS_DIM];
        for i in 0..TRAIT_BASIS_DIM {
            let activation =
                (level_ratio * TRAIT_BASIS_DIM as f32 - i as f32).clamp(0.0, 1.0);
            let phase = AXIS_PHASES[i] * coherence + trait_delta;
            re[i] = activation * phase.cos();
            im[i] = activation * phase.sin() * coherence;
        }
        Self { re, im }.normalized()
    }

    /// Σ|αᵢ|² over all axes.
    pub fn norm_sq(&self) -> f32 {
        (0..TRAIT_BASIS_DIM)
            .map(|i| self.re[i] * self.re[i] + self.im[i] * self.im[i])
            .sum()
    }

    /// Whether Σ|αᵢ|² is within [`NORM_TOLERANCE`] of 1.
    pub fn is_normalized(&self) -> bool {
        (self.norm_sq() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Scale so Σ|αᵢ|² = 1; uniform fallback for the zero vector.
    ///
    /// The norm is accumulated in f64 so the f32 result stays within
    /// [`NORM_TOLERANCE`] of unity.
    pub fn normalized(mut self) -> Self {
        let norm_sq: f64 = (0..TRAIT_BASIS_DIM)
            .map(|i| {
                let re = self.re[i] as f64;
                let im = self.im[i] as f64;
                re * re + im * im
            })
            .sum();
        let norm = norm_sq.sqrt();
        if norm <= f64::from(f32::EPSILON) {
            return Self::uniform();
        }
        for i in 0..TRAIT_BASIS_DIM {
            self.re[i] = (self.re[i] as f64 / norm) as f32;
            self.im[i] = (self.im[i] as f64 / norm) as f32;
        }
        self
    }

    /// |αᵢ|² per axis — the axis occupation probabilities.
    pub fn occupations(&self) -> [f32; TRAIT_BASIS_DIM] {
        let mut out = [0.0f32; TRAIT_BASIS_DIM];
        for i in 0..TRAIT_BASIS_DIM {
            out[i] = self.re[i] * self.re[i] + self.im[i] * self.im[i];
        }
        out
    }
}
