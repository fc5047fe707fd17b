// catalog.rs - Named table of well-known rules

use std::collections::BTreeMap;

use crate::error::{CatalogError, UnknownRuleName};
use crate::rule::RuleSpec;

/// Rule that every engine starts with: nothing is born, nothing survives.
pub const DEFAULT_RULE: &str = "lamer";

pub const BUILTIN_RULES: &[(&str, &str)] = &[
    ("lamer", "B/S"),
    ("gnarl", "B1/S1"),
    ("replicator", "B1357/S1357"),
    ("fredkin", "B1357/S02648"),
    ("seeds", "B2/S"),
    ("lfod", "B2/S0"),
    ("serviettes", "B234/S"),
    ("dotlife", "B3/S023"),
    ("lwod", "B3/S012345678"),
    ("mazectric", "B3/S1234"),
    ("maze", "B3/S12345"),
    ("life", "B3/S23"),
    ("coral", "B3/S45678"),
    ("34life", "B34/S34"),
    ("assimilation", "B345/S4567"),
    ("longlife", "B345/S5"),
    ("diamoeba", "B35678/S5678"),
    ("amoeba", "B357/S1358"),
    ("pseudolife", "B357/S238"),
    ("2x2", "B36/S125"),
    ("highlife", "B36/S23"),
    ("move", "B368/S245"),
    ("stains", "B3678/S235678"),
    ("daynight", "B3678/S34678"),
    ("drylife", "B37/S23"),
    ("coagulations", "B378/S235678"),
    ("walledcities", "B45678/S2345"),
    ("vote45", "B4678/S35678"),
    ("vote", "B5678/S45678"),
    ("inverselife", "B0123478/S34678"),
];

/// Fixed mapping from rule name to [`RuleSpec`].
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: BTreeMap<String, RuleSpec>,
}

impl RuleCatalog {
    /// Builds the catalog of well-known rules.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_strings(BUILTIN_RULES.iter().copied())
    }

    /// Builds a catalog from `(name, rule string)` pairs.
    pub fn from_strings<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for (name, text) in entries {
            let rule = RuleSpec::parse(text).map_err(|source| CatalogError::Malformed {
                name: name.to_string(),
                source,
            })?;
            catalog.insert(name, rule)?;
        }
        Ok(catalog)
    }

    /// Adds already-parsed rules, e.g. from a config file.
    pub fn with_custom<I, S>(mut self, rules: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, RuleSpec)>,
        S: Into<String>,
    {
        for (name, rule) in rules {
            self.insert(name, rule)?;
        }
        Ok(self)
    }

    fn insert(&mut self, name: impl Into<String>, rule: RuleSpec) -> Result<(), CatalogError> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            return Err(CatalogError::Duplicate(name));
        }
        self.rules.insert(name, rule);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&RuleSpec, UnknownRuleName> {
        self.rules
            .get(name)
            .ok_or_else(|| UnknownRuleName(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in sorted order, for populating a rule picker.
    pub fn names(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses() {
        let catalog = RuleCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), BUILTIN_RULES.len());
        assert_eq!(catalog.get("life").unwrap().to_string(), "B3/S23");
        assert_eq!(catalog.get(DEFAULT_RULE).unwrap().to_string(), "B/S");
    }

    #[test]
    fn names_are_sorted() {
        let names = RuleCatalog::builtin().unwrap().names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.first().map(String::as_str), Some("2x2"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let catalog = RuleCatalog::builtin().unwrap();
        assert!(catalog.contains("life"));
        assert_eq!(
            catalog.get("Life"),
            Err(UnknownRuleName("Life".to_string()))
        );
    }

    #[test]
    fn malformed_literal_names_the_rule() {
        let err = RuleCatalog::from_strings([("broken", "B3-S23")]).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { ref name, .. } if name == "broken"));
    }

    #[test]
    fn custom_rules_cannot_shadow_builtins() {
        let life = RuleSpec::parse("B3/S23").unwrap();
        let err = RuleCatalog::builtin()
            .unwrap()
            .with_custom([("life", life)])
            .unwrap_err();
        assert_eq!(err, CatalogError::Duplicate("life".to_string()));

        let catalog = RuleCatalog::builtin()
            .unwrap()
            .with_custom([("mine", life)])
            .unwrap();
        assert!(catalog.contains("mine"));
    }
}
