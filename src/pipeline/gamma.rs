use super::Filter;
use crate::color::{Rgb, gamma};

/// Gamma correction through the shared lookup table
#[derive(Debug, Clone, Copy)]
pub(crate) struct GammaFilter {
    enabled: bool,
}

impl GammaFilter {
    pub(crate) const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Filter for GammaFilter {
    fn apply(&self, color: Rgb) -> Rgb {
        if !self.enabled {
            return color;
        }
        gamma::correct_rgb(color)
    }
}
