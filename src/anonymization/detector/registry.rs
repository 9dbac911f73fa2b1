//! Recognizer registry
//!
//! Owns the compiled built-in and custom recognizers. The registry is
//! populated during startup and then shared read-only behind an `Arc`.
//!
//! Ordering and override rules:
//! - built-ins come first in table order, then custom recognizers in
//!   registration order
//! - a custom definition replaces every earlier custom one with the same
//!   label whose languages it covers; it takes the slot of the first one
//!   and the rest are dropped
//! - when scopes only partly overlap (`*` registered before `en`), both are
//!   kept and the later registration wins for the shared languages
//! - every override is logged at `warn`
//! - a custom recognizer hides the built-in with the same label for every
//!   language it applies to

use super::definition::RecognizerDefinition;
use super::pattern::PatternRecognizer;
use super::predefined::{predefined_definitions, PREDEFINED_VERSION};
use crate::domain::Result;
use std::collections::HashSet;

/// Set of active recognizers
#[derive(Debug, Clone, Default)]
pub struct RecognizerRegistry {
    predefined: Vec<PatternRecognizer>,
    custom: Vec<PatternRecognizer>,
}

impl RecognizerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a custom definition
    ///
    /// Fails with a configuration error if the definition is invalid; the
    /// registry is left unchanged in that case.
    pub fn register(&mut self, definition: RecognizerDefinition) -> Result<()> {
        let recognizer = PatternRecognizer::compile(&definition)?;

        let same_label = |r: &PatternRecognizer| r.entity_label() == recognizer.entity_label();

        let replaced: Vec<usize> = self
            .custom
            .iter()
            .enumerate()
            .filter(|(_, r)| same_label(*r) && recognizer.language().covers(r.language()))
            .map(|(idx, _)| idx)
            .collect();
        let narrowed = self
            .custom
            .iter()
            .any(|r| same_label(r) && r.language().overlaps(recognizer.language()))
            && replaced.is_empty();

        if let Some((&slot, rest)) = replaced.split_first() {
            tracing::warn!(
                entity_label = %recognizer.entity_label(),
                language = %recognizer.language(),
                replaced = replaced.len(),
                "Replacing previously registered recognizer"
            );
            for &idx in rest.iter().rev() {
                self.custom.remove(idx);
            }
            self.custom[slot] = recognizer;
        } else {
            if narrowed {
                tracing::warn!(
                    entity_label = %recognizer.entity_label(),
                    language = %recognizer.language(),
                    "Recognizer overrides an earlier one for its language"
                );
            } else {
                tracing::debug!(
                    entity_label = %recognizer.entity_label(),
                    language = %recognizer.language(),
                    rules = recognizer.rules().len(),
                    "Registered recognizer"
                );
            }
            self.custom.push(recognizer);
        }

        Ok(())
    }

    /// Register several definitions in order, stopping at the first failure
    pub fn register_all<I>(&mut self, definitions: I) -> Result<usize>
    where
        I: IntoIterator<Item = RecognizerDefinition>,
    {
        let mut count = 0;
        for definition in definitions {
            self.register(definition)?;
            count += 1;
        }
        Ok(count)
    }

    /// Populate the built-in recognizers; calling it again has no effect
    pub fn load_predefined(&mut self) -> Result<()> {
        if !self.predefined.is_empty() {
            return Ok(());
        }

        self.predefined = predefined_definitions()
            .iter()
            .map(PatternRecognizer::compile)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            version = PREDEFINED_VERSION,
            count = self.predefined.len(),
            "Loaded predefined recognizers"
        );
        Ok(())
    }

    /// Recognizers that apply to a language, built-ins first
    pub fn recognizers_for(&self, language: &str) -> Vec<&PatternRecognizer> {
        let applicable: Vec<&PatternRecognizer> = self
            .custom
            .iter()
            .filter(|r| r.language().applies_to(language))
            .collect();

        // one recognizer per label: the latest registration
        let custom: Vec<&PatternRecognizer> = applicable
            .iter()
            .enumerate()
            .filter(|(idx, r)| {
                !applicable[idx + 1..]
                    .iter()
                    .any(|later| later.entity_label() == r.entity_label())
            })
            .map(|(_, r)| *r)
            .collect();

        let shadowed: HashSet<&str> = custom.iter().map(|r| r.entity_label()).collect();

        self.predefined
            .iter()
            .filter(|r| r.language().applies_to(language))
            .filter(|r| !shadowed.contains(r.entity_label()))
            .chain(custom)
            .collect()
    }

    /// Entity labels detectable for a language, in recognizer order
    pub fn supported_entities(&self, language: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.recognizers_for(language)
            .into_iter()
            .map(PatternRecognizer::entity_label)
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// Number of registered recognizers, built-in and custom
    pub fn len(&self) -> usize {
        self.predefined.len() + self.custom.len()
    }

    /// Check whether the registry holds no recognizers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of custom recognizers
    pub fn custom_count(&self) -> usize {
        self.custom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::definition::{LanguageScope, Rule};
    use crate::domain::ScrubError;

    fn account(regex: &str) -> RecognizerDefinition {
        RecognizerDefinition::new("ACCOUNT_NUMBER", vec![Rule::new("account", regex, 0.4)])
            .with_context(["account"])
    }

    #[test]
    fn test_empty_registry() {
        let registry = RecognizerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.recognizers_for("en").is_empty());
    }

    #[test]
    fn test_register_rejects_invalid_definition() {
        let mut registry = RecognizerRegistry::new();
        let invalid = RecognizerDefinition::new("", vec![Rule::new("x", r"\d", 0.5)]);

        let result = registry.register(invalid);

        assert!(matches!(result, Err(ScrubError::Configuration(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_builtins_come_before_custom() {
        let mut registry = RecognizerRegistry::new();
        registry.load_predefined().unwrap();
        registry.register(account(r"\b\d{6}\b")).unwrap();

        let recognizers = registry.recognizers_for("en");
        let last = recognizers.last().unwrap();
        assert_eq!(last.entity_label(), "ACCOUNT_NUMBER");
        assert_eq!(recognizers[0].entity_label(), "EMAIL_ADDRESS");
    }

    #[test]
    fn test_load_predefined_is_idempotent() {
        let mut registry = RecognizerRegistry::new();
        registry.load_predefined().unwrap();
        let count = registry.len();
        registry.load_predefined().unwrap();
        assert_eq!(registry.len(), count);
    }

    #[test]
    fn test_language_filtering() {
        let mut registry = RecognizerRegistry::new();
        registry.load_predefined().unwrap();
        registry.register(account(r"\b\d{6}\b")).unwrap();

        let german = registry.supported_entities("de");
        assert!(german.contains(&"EMAIL_ADDRESS"));
        assert!(!german.contains(&"PHONE_NUMBER"));
        assert!(!german.contains(&"ACCOUNT_NUMBER"));

        let english = registry.supported_entities("en");
        assert!(english.contains(&"PHONE_NUMBER"));
        assert!(english.contains(&"ACCOUNT_NUMBER"));
    }

    #[test]
    fn test_same_label_and_language_replaces() {
        let mut registry = RecognizerRegistry::new();
        registry.register(account(r"\b\d{6}\b")).unwrap();
        registry
            .register(RecognizerDefinition::new(
                "OTHER",
                vec![Rule::new("other", r"X\d", 0.5)],
            ))
            .unwrap();
        registry.register(account(r"\b\d{8}\b")).unwrap();

        assert_eq!(registry.custom_count(), 2);
        let recognizers = registry.recognizers_for("en");
        // Replacement keeps the original registration slot
        assert_eq!(recognizers[0].entity_label(), "ACCOUNT_NUMBER");
        assert_eq!(recognizers[0].rules()[0].regex.as_str(), r"\b\d{8}\b");
    }

    #[test]
    fn test_same_label_different_language_coexists() {
        let mut registry = RecognizerRegistry::new();
        registry.register(account(r"\b\d{6}\b")).unwrap();
        registry
            .register(
                account(r"\b\d{10}\b").with_language(LanguageScope::Only("de".to_string())),
            )
            .unwrap();

        assert_eq!(registry.custom_count(), 2);
        assert_eq!(registry.recognizers_for("en").len(), 1);
        assert_eq!(registry.recognizers_for("de").len(), 1);
    }

    #[test]
    fn test_custom_shadows_builtin() {
        let mut registry = RecognizerRegistry::new();
        registry.load_predefined().unwrap();
        registry
            .register(RecognizerDefinition::new(
                "EMAIL_ADDRESS",
                vec![Rule::new("corporate", r"\b\w+@corp\.example\b", 0.9)],
            ))
            .unwrap();

        let english: Vec<_> = registry
            .recognizers_for("en")
            .into_iter()
            .filter(|r| r.entity_label() == "EMAIL_ADDRESS")
            .collect();
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].rules()[0].name, "corporate");

        // The custom definition is English only; other languages keep the built-in
        let german: Vec<_> = registry
            .recognizers_for("de")
            .into_iter()
            .filter(|r| r.entity_label() == "EMAIL_ADDRESS")
            .collect();
        assert_eq!(german.len(), 1);
        assert_eq!(german[0].rules()[0].name, "email");
    }

    #[test]
    fn test_register_all_counts() {
        let mut registry = RecognizerRegistry::new();
        let count = registry
            .register_all(vec![
                account(r"\b\d{6}\b"),
                RecognizerDefinition::new("POSTCODE", vec![Rule::new("pc", r"[A-Z]\d", 0.5)]),
            ])
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_narrower_scope_overrides_for_its_language() {
        let mut registry = RecognizerRegistry::new();
        registry
            .register(account(r"\b\d{6}\b").with_language(LanguageScope::Any))
            .unwrap();
        registry.register(account(r"\b\d{8}\b")).unwrap();

        assert_eq!(registry.custom_count(), 2);

        let english = registry.recognizers_for("en");
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].rules()[0].regex.as_str(), r"\b\d{8}\b");

        let german = registry.recognizers_for("de");
        assert_eq!(german.len(), 1);
        assert_eq!(german[0].rules()[0].regex.as_str(), r"\b\d{6}\b");
    }

    #[test]
    fn test_wider_scope_replaces_covered_recognizers() {
        let mut registry = RecognizerRegistry::new();
        registry.register(account(r"\b\d{6}\b")).unwrap();
        registry
            .register(account(r"\b\d{7}\b").with_language(LanguageScope::Only("de".to_string())))
            .unwrap();
        registry
            .register(account(r"\b\d{8}\b").with_language(LanguageScope::Any))
            .unwrap();

        assert_eq!(registry.custom_count(), 1);
        for language in ["en", "de", "fr"] {
            let recognizers = registry.recognizers_for(language);
            assert_eq!(recognizers.len(), 1);
            assert_eq!(recognizers[0].rules()[0].regex.as_str(), r"\b\d{8}\b");
        }
    }

    #[test]
    fn test_at_most_one_recognizer_per_label_and_language() {
        let mut registry = RecognizerRegistry::new();
        let scopes = [
            LanguageScope::Any,
            LanguageScope::Only("en".to_string()),
            LanguageScope::Only("de".to_string()),
            LanguageScope::Only("en".to_string()),
            LanguageScope::Any,
            LanguageScope::Only("de".to_string()),
        ];
        for (idx, scope) in scopes.into_iter().enumerate() {
            registry
                .register(account(&format!(r"\b\d{{{}}}\b", idx + 4)).with_language(scope))
                .unwrap();

            for language in ["en", "de", "fr"] {
                let count = registry
                    .recognizers_for(language)
                    .iter()
                    .filter(|r| r.entity_label() == "ACCOUNT_NUMBER")
                    .count();
                assert_eq!(count, 1, "{language} after registration {idx}");
            }
        }

        // the last registration (de) wins for de, the Any before it for the rest
        let german = registry.recognizers_for("de");
        assert_eq!(german[0].rules()[0].regex.as_str(), r"\b\d{9}\b");
        let english = registry.recognizers_for("en");
        assert_eq!(english[0].rules()[0].regex.as_str(), r"\b\d{8}\b");
    }
}
