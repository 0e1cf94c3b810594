//! Conversion policy

/// Configuration for datum conversion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Allow writable array views at all
    pub allow_writable_arrays: bool,
    /// Treat unmapped types as errors instead of absent results
    pub strict_unmapped: bool,
    /// Compare the catalog element type with the array's element tag
    pub check_element_type: bool,
    /// Largest array (in elements) that will be viewed
    pub max_array_len: usize,
}

impl BridgeConfig {
    /// Read-only views only
    pub fn read_only() -> Self {
        Self::default().with_writable_arrays(false)
    }

    /// Set whether writable views may be handed out
    pub fn with_writable_arrays(mut self, allow: bool) -> Self {
        self.allow_writable_arrays = allow;
        self
    }

    /// Set whether unmapped types fail the conversion
    pub fn with_strict_unmapped(mut self, strict: bool) -> Self {
        self.strict_unmapped = strict;
        self
    }

    /// Set whether element tags are cross-checked against the catalog
    pub fn with_element_type_check(mut self, check: bool) -> Self {
        self.check_element_type = check;
        self
    }

    /// Set the array length limit
    pub fn with_max_array_len(mut self, max_len: usize) -> Self {
        self.max_array_len = max_len;
        self
    }

    /// Load a configuration from JSON; missing fields keep their defaults
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            allow_writable_arrays: true,
            strict_unmapped: false,
            check_element_type: true,
            max_array_len: usize::MAX / 8,
        }
    }
}
