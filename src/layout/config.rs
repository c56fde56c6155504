//! Configuration for scene layout

/// Configuration options for laying out a scene
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Size of the root view (width, height) when the scene does not set one
    pub root_size: (f64, f64),

    /// Decimal places used when printing frames
    pub precision: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root_size: (375.0, 667.0),
            precision: 1,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default root size
    pub fn with_root_size(mut self, width: f64, height: f64) -> Self {
        self.root_size = (width, height);
        self
    }

    /// Set the number of decimal places for printed frames
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}
