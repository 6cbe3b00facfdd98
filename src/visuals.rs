//! Color schemes for the renderer.
//!
//! A [`Theme`] only selects the clear, marker, and line colors. Physics never
//! reads it, so switching themes mid-session is always safe.

/// Two-valued color scheme for the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Pale markers and lines on a near-black background.
    #[default]
    Dark,
    /// Slate markers and lines on a near-white background.
    Light,
}

impl Theme {
    /// Background clear color.
    pub fn clear_color(&self) -> wgpu::Color {
        match self {
            Theme::Dark => wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.05,
                a: 1.0,
            },
            Theme::Light => wgpu::Color {
                r: 0.97,
                g: 0.97,
                b: 0.98,
                a: 1.0,
            },
        }
    }

    /// RGBA fill color for point markers.
    pub fn marker_color(&self) -> [f32; 4] {
        match self {
            Theme::Dark => [0.75, 0.78, 0.85, 1.0],
            Theme::Light => [0.22, 0.25, 0.32, 1.0],
        }
    }

    /// RGBA stroke color for neighbor connection lines.
    pub fn line_color(&self) -> [f32; 4] {
        match self {
            Theme::Dark => [0.35, 0.38, 0.48, 0.45],
            Theme::Light => [0.55, 0.58, 0.65, 0.45],
        }
    }
}
