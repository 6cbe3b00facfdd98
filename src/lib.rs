//! # driftgrid
//!
//! A pointer-reactive, infinitely drifting point lattice, rendered as an
//! ambient window backdrop.
//!
//! The simulation is a stylized 2D spring-mass field: a rectangular grid of
//! point-masses, each spring-attached to a resting origin that drifts
//! diagonally every frame. The grid wraps toroidally so the drift never
//! exposes an edge, and the cursor repels nearby points with a linear
//! falloff. Nearest-neighbor connections are drawn between index-adjacent
//! points whenever their drawn positions are close enough.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftgrid::{Backdrop, GridConfig, Theme};
//!
//! fn main() -> Result<(), driftgrid::BackdropError> {
//!     env_logger::init();
//!     Backdrop::with_config(
//!         GridConfig::new()
//!             .with_gap(40.0)
//!             .with_speed(0.6)
//!             .with_theme(Theme::Dark),
//!     )
//!     .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The lattice
//!
//! [`PointGrid`] holds `cols * rows` points sized from the viewport plus an
//! off-screen margin. Each [`GridPoint`] tracks `position`, `velocity`, and
//! the `origin` it is pulled back toward.
//!
//! ### Drift and toroidal wrap
//!
//! Every origin advances by `speed` pixels per frame on both axes. Once an
//! origin passes the viewport bound plus one `gap`, origin and position
//! teleport back together by the full lattice extent, so the spring offset
//! (and therefore the drawn motion) is seamless.
//!
//! ### Pointer repulsion
//!
//! The scheduler keeps the last-known cursor sample in a [`Pointer`] and
//! passes it into [`physics::step`] each frame. Points inside `max_dist`
//! receive an impulse directed away from the cursor with linear falloff.
//!
//! ### Settling
//!
//! After impulses, each point is pulled toward its origin by
//! `spring_constant` and the combined velocity is damped by `friction`,
//! giving critically-damped settling instead of perpetual oscillation.
//!
//! ## Host integration
//!
//! [`Backdrop::run`] owns the window and frame loop. Hosts that bring their
//! own surface can instead drive [`physics::step`] and the geometry builders
//! in [`render`] directly; nothing in the physics or geometry path touches
//! the GPU or the wall clock.

pub mod app;
pub mod config;
pub mod error;
pub mod grid;
mod gpu;
pub mod physics;
pub mod pointer;
pub mod render;
pub mod time;
pub mod visuals;

pub use app::Backdrop;
pub use config::GridConfig;
pub use error::{BackdropError, GpuError};
pub use glam::Vec2;
pub use grid::{GridPoint, PointGrid, MAX_POINTS};
pub use pointer::Pointer;
pub use render::{LineVertex, MarkerInstance};
pub use time::FrameClock;
pub use visuals::Theme;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftgrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Backdrop;
    pub use crate::config::GridConfig;
    pub use crate::error::BackdropError;
    pub use crate::grid::{GridPoint, PointGrid};
    pub use crate::physics;
    pub use crate::pointer::Pointer;
    pub use crate::render::{LineVertex, MarkerInstance};
    pub use crate::time::FrameClock;
    pub use crate::visuals::Theme;
    pub use crate::Vec2;
}
