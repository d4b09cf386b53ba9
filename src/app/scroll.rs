//! Scroll position reported by the render layer

/// Vertical scroll geometry of the photo grid
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f64,
    /// Height of the visible area
    pub viewport: f64,
    /// Total height of the content
    pub content: f64,
}

impl ScrollMetrics {
    /// Create scroll metrics
    pub const fn new(offset: f64, viewport: f64, content: f64) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Whether the bottom of the viewport has passed `ratio` of the content.
    ///
    /// This is a level, not an edge: it stays true while the user lingers
    /// past the threshold.
    pub fn past_threshold(&self, ratio: f64) -> bool {
        self.offset + self.viewport > self.content * ratio
    }
}
