//! Pointer sample tracking.
//!
//! The host delivers cursor events at arbitrary times relative to frame
//! callbacks. [`Pointer`] keeps only the last-known sample (last writer
//! wins, no queueing); the physics step reads it once per frame. A few stale
//! samples are imperceptible in a visually continuous simulation.
//!
//! The scheduler owns the `Pointer` and passes the sample into
//! [`physics::step`](crate::physics::step) explicitly, which keeps the
//! dependency visible and the physics testable without a window.

use glam::Vec2;
use winit::event::WindowEvent;

/// Last-known pointer position in surface pixel coordinates.
///
/// `None` until the first `CursorMoved` arrives, and again after the cursor
/// leaves the surface; the force field exerts nothing in either case.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pointer {
    sample: Option<Vec2>,
}

impl Pointer {
    /// Create a tracker with no observed sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent sample, if any.
    #[inline]
    pub fn sample(&self) -> Option<Vec2> {
        self.sample
    }

    /// Overwrite the sample.
    pub fn set(&mut self, position: Vec2) {
        self.sample = Some(position);
    }

    /// Forget the sample; the pointer is out of range until the next move.
    pub fn clear(&mut self) {
        self.sample = None;
    }

    /// Process a winit window event.
    ///
    /// `CursorMoved` overwrites the sample with the physical-pixel position;
    /// `CursorLeft` clears it. Everything else is ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.sample = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.sample = None;
            }
            _ => {}
        }
    }
}
