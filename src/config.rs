//! Simulation parameters.
//!
//! All tuning knobs for the lattice live in [`GridConfig`]. Every parameter
//! has a fixed default that produces a calm, slowly drifting field; use the
//! builder-style setters to adjust, then hand the config to
//! [`Backdrop`](crate::Backdrop) or directly to the grid/physics functions.
//!
//! ```ignore
//! use driftgrid::{GridConfig, Theme};
//!
//! let config = GridConfig::new()
//!     .with_gap(30.0)
//!     .with_speed(0.8)
//!     .with_theme(Theme::Light);
//! ```

use crate::visuals::Theme;

/// Tuning parameters for the point lattice.
///
/// The physics step reads these every frame; they are never mutated by the
/// simulation itself. Setters clamp to sane ranges rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Base spacing between resting points, in pixels. Drives grid density.
    pub gap: f32,
    /// Per-frame drift of every point's origin along both axes, in pixels.
    pub speed: f32,
    /// Pointer interaction radius, in pixels.
    pub max_dist: f32,
    /// Repulsion impulse magnitude at zero pointer distance.
    pub push_strength: f32,
    /// Pull-back-to-origin stiffness.
    pub spring_constant: f32,
    /// Per-frame velocity multiplier, strictly between 0 and 1.
    pub friction: f32,
    /// Extra rows/columns of off-screen points so wrapping never exposes an
    /// edge. At least 4.
    pub margin: usize,
    /// Color scheme for the renderer. Does not affect physics.
    pub theme: Theme,
}

impl GridConfig {
    /// Create a config with the default parameter set.
    pub fn new() -> Self {
        Self {
            gap: 50.0,
            speed: 0.5,
            max_dist: 200.0,
            push_strength: 2.0,
            spring_constant: 0.08,
            friction: 0.90,
            margin: 4,
            theme: Theme::Dark,
        }
    }

    /// Set the resting spacing between points. Clamped to >= 1 pixel.
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap.max(1.0);
        self
    }

    /// Set the per-frame origin drift. Clamped to >= 0.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    /// Set the pointer interaction radius. Clamped to >= 1 pixel.
    pub fn with_max_dist(mut self, max_dist: f32) -> Self {
        self.max_dist = max_dist.max(1.0);
        self
    }

    /// Set the repulsion impulse magnitude. Clamped to >= 0.
    pub fn with_push_strength(mut self, push_strength: f32) -> Self {
        self.push_strength = push_strength.max(0.0);
        self
    }

    /// Set the spring stiffness. Clamped to >= 0.
    pub fn with_spring_constant(mut self, spring_constant: f32) -> Self {
        self.spring_constant = spring_constant.max(0.0);
        self
    }

    /// Set the per-frame velocity decay. Clamped to (0, 1).
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.clamp(0.01, 0.99);
        self
    }

    /// Set the off-screen wrap margin in whole points. Clamped to >= 4.
    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin.max(4);
        self
    }

    /// Set the renderer color scheme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}
