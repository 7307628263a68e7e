//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn blocks() -> PathBuf {
        "blocks".into()
    }

    pub fn sites() -> PathBuf {
        "sites".into()
    }

    pub fn backbone() -> PathBuf {
        "json_backbone".into()
    }

    pub fn schemas() -> PathBuf {
        "generator".into()
    }

    pub fn bundles() -> PathBuf {
        ".bundle".into()
    }
}

// ============================================================================
// [layout] Section Defaults
// ============================================================================

pub mod layout {
    pub fn variants() -> String {
        "realization".into()
    }

    pub fn template() -> String {
        "base.j2".into()
    }

    pub fn style() -> String {
        "base.css".into()
    }

    pub fn script() -> String {
        "base.js".into()
    }

    pub fn schema() -> String {
        "schema.json".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn not_found() -> PathBuf {
        "404.html".into()
    }

    pub fn keep_prefixes() -> Vec<String> {
        vec!["default_".into(), "test_".into()]
    }
}

// ============================================================================
// [[realizations]] Defaults
// ============================================================================

pub mod realizations {
    use crate::realization::{RealizationRule, RealizationTable};

    /// Root container shared by the consular realization families.
    const CONSULAR_CONTAINER: &str = "template_consular_container";

    pub fn table() -> RealizationTable {
        RealizationTable::new(vec![
            RealizationRule::new("consular_", CONSULAR_CONTAINER),
            RealizationRule::new("auto_registration_", CONSULAR_CONTAINER),
        ])
    }
}
