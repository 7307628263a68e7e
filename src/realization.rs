//! Realization names and the prefix table.
//!
//! A realization name such as `consular_ua` is split by the first matching
//! rule of the configured table into a prefix (`consular_`, which selects the
//! root block) and a language suffix (`ua`, which selects the
//! `default_<lang>` fallback variant).
//!
//! ```text
//! "auto_registration_en"
//!  └──── prefix ─────┘└┘ lang
//!          │
//!          └── root block: template_consular_container
//! ```

use crate::error::{BlockError, Result};
use serde::{Deserialize, Serialize};

/// One `[[realizations]]` entry: a name prefix and the block it roots at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RealizationRule {
    pub prefix: String,
    pub root_block: String,
}

impl RealizationRule {
    pub fn new(prefix: impl Into<String>, root_block: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            root_block: root_block.into(),
        }
    }
}

/// Ordered prefix table. The first rule whose prefix matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealizationTable(Vec<RealizationRule>);

impl RealizationTable {
    pub const fn new(rules: Vec<RealizationRule>) -> Self {
        Self(rules)
    }

    pub fn rules(&self) -> &[RealizationRule] {
        &self.0
    }

    /// Split a realization name against the table.
    ///
    /// Pure lookup: never touches the filesystem, so an unknown prefix is
    /// reported before any variant is searched for.
    pub fn parse(&self, name: &str) -> Result<Realization> {
        self.0
            .iter()
            .find(|rule| name.starts_with(rule.prefix.as_str()))
            .map(|rule| Realization {
                name: name.to_owned(),
                prefix: rule.prefix.clone(),
                root_block: rule.root_block.clone(),
            })
            .ok_or_else(|| BlockError::UnknownRealizationPrefix {
                name: name.to_owned(),
                known: self.known_prefixes(),
            })
    }

    fn known_prefixes(&self) -> String {
        self.0
            .iter()
            .map(|rule| format!("`{}`", rule.prefix))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A realization name matched against the prefix table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realization {
    name: String,
    prefix: String,
    root_block: String,
}

impl Realization {
    /// Full realization name, also the exact variant file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language suffix: whatever follows the matched prefix.
    pub fn lang(&self) -> &str {
        &self.name[self.prefix.len()..]
    }

    /// Block the composition and asset traversal start from.
    pub fn root_block(&self) -> &str {
        &self.root_block
    }

    /// Stem of the locale fallback variant, `default_<lang>`.
    pub fn default_variant(&self) -> String {
        format!("default_{}", self.lang())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;

    #[test]
    fn test_parse_consular() {
        let table = defaults::realizations::table();
        let realization = table.parse("consular_ua").unwrap();

        assert_eq!(realization.name(), "consular_ua");
        assert_eq!(realization.lang(), "ua");
        assert_eq!(realization.root_block(), "template_consular_container");
        assert_eq!(realization.default_variant(), "default_ua");
    }

    #[test]
    fn test_parse_auto_registration() {
        let table = defaults::realizations::table();
        let realization = table.parse("auto_registration_en").unwrap();

        assert_eq!(realization.lang(), "en");
        assert_eq!(realization.root_block(), "template_consular_container");
    }

    #[test]
    fn test_unknown_prefix() {
        let table = defaults::realizations::table();
        let err = table.parse("embassy_ua").unwrap_err();

        assert!(matches!(err, BlockError::UnknownRealizationPrefix { .. }));
        let display = format!("{err}");
        assert!(display.contains("embassy_ua"));
        assert!(display.contains("`consular_`"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = RealizationTable::new(vec![
            RealizationRule::new("consular_", "generic"),
            RealizationRule::new("consular_vip_", "vip"),
        ]);
        let realization = table.parse("consular_vip_ua").unwrap();

        assert_eq!(realization.root_block(), "generic");
        assert_eq!(realization.lang(), "vip_ua");
    }

    #[test]
    fn test_empty_lang_suffix() {
        let table = defaults::realizations::table();
        let realization = table.parse("consular_").unwrap();

        assert_eq!(realization.lang(), "");
        assert_eq!(realization.default_variant(), "default_");
    }
}
