//! Conversion options

use pep740_bundle::ValidationOptions;

/// Options controlling decoding and conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Reject non-object transparency entries instead of skipping them
    pub strict_transparency_entries: bool,
    /// Rules applied whenever a bundle is decoded or produced
    pub validation: ValidationOptions,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict handling of transparency entries
    pub fn with_strict_transparency_entries(mut self, strict: bool) -> Self {
        self.strict_transparency_entries = strict;
        self
    }

    /// Set whether bundles must carry an inclusion proof
    pub fn with_require_inclusion_proof(mut self, require: bool) -> Self {
        self.validation.require_inclusion_proof = require;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::new();
        assert!(!opts.strict_transparency_entries);
        assert_eq!(opts.validation, ValidationOptions::default());
    }

    #[test]
    fn test_builder_methods() {
        let opts = ConvertOptions::new()
            .with_strict_transparency_entries(true)
            .with_require_inclusion_proof(false);
        assert!(opts.strict_transparency_entries);
        assert!(!opts.validation.require_inclusion_proof);
        assert!(opts.validation.require_tlog_entry);
    }
}
