//! Read-time configuration.

/// Options controlling how headers are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Accept DXGI ids above the official range (the ASTC block family).
    pub allow_non_official: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            allow_non_official: true,
        }
    }
}

impl ReadOptions {
    /// Only formats from the official DXGI range.
    pub fn strict() -> Self {
        Self {
            allow_non_official: false,
        }
    }
}
