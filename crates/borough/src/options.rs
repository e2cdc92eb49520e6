//! Layout options.

use serde::{Deserialize, Serialize};

/// Padding added to every rectangle on each axis before packing.
pub const DEFAULT_SPACING: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub spacing: f64,
    /// Run the leveling pass. When disabled every node keeps level 0.
    pub leveling: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            leveling: true,
        }
    }
}
