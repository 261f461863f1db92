// ============================================================
// TEXT NORMALIZER
// ============================================================
// Free French text -> space-joined canonical tokens

use std::sync::Arc;

use crate::domain::work_order::CellValue;
use crate::infrastructure::nlp::LinguisticResources;
use crate::shared::fold_to_ascii;

/// Cleans free-text fields with the loaded linguistic resources
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    resources: Arc<LinguisticResources>,
}

impl TextNormalizer {
    pub fn new(resources: Arc<LinguisticResources>) -> Self {
        Self { resources }
    }

    /// Clean one text value. `None` yields an empty string.
    ///
    /// Pipeline: lower-case + ASCII transliteration, punctuation removal,
    /// tokenization, then drop stop words, one-character tokens and
    /// digit-only tokens.
    pub fn clean(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };

        let folded = fold_to_ascii(text);
        let without_punctuation: String = folded
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        self.resources
            .tokenize(&without_punctuation)
            .into_iter()
            .filter(|token| self.keep_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Clean a decoded cell. Numbers and booleans are cleaned as their text
    /// form rather than rejected.
    pub fn clean_cell(&self, value: &CellValue) -> String {
        self.clean(value.render().as_deref())
    }

    fn keep_token(&self, token: &str) -> bool {
        token.chars().count() > 1
            && !token.chars().all(|c| c.is_ascii_digit())
            && !self.resources.is_stopword(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::infrastructure::nlp::{NlpConfig, StopwordSource, WordTokenizer};

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(LinguisticResources::default()))
    }

    fn degraded_normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(LinguisticResources::fallback()))
    }

    #[test]
    fn test_missing_yields_empty_string() {
        assert_eq!(normalizer().clean(None), "");
        assert_eq!(normalizer().clean_cell(&CellValue::Missing), "");
        assert_eq!(degraded_normalizer().clean(None), "");
    }

    #[test]
    fn test_apostrophe_is_deleted_not_split() {
        assert_eq!(normalizer().clean(Some("Fuite d'huile")), "fuite dhuile");
    }

    #[test]
    fn test_stopwords_digits_and_short_tokens_removed() {
        let cleaned = normalizer().clean(Some("Remplacement de la pompe 12 sur le circuit B"));
        assert_eq!(cleaned, "remplacement pompe circuit");
    }

    #[test]
    fn test_accents_stripped() {
        assert_eq!(
            normalizer().clean(Some("Défaut détecté à l'échangeur")),
            "defaut detecte lechangeur"
        );
    }

    #[test]
    fn test_only_noise_yields_empty_string() {
        assert_eq!(normalizer().clean(Some("... 42 - a / le !")), "");
        assert_eq!(normalizer().clean(Some("")), "");
    }

    #[test]
    fn test_numeric_cell_cleans_to_empty() {
        assert_eq!(normalizer().clean_cell(&CellValue::Integer(12)), "");
        assert_eq!(normalizer().clean_cell(&CellValue::Float(3.5)), "");
    }

    #[test]
    fn test_degraded_resources_keep_stopwords() {
        let cleaned = degraded_normalizer().clean(Some("Fuite de la pompe"));
        assert_eq!(cleaned, "fuite de la pompe");
    }

    #[test]
    fn test_unreadable_stopword_file_never_fails() {
        let resources = LinguisticResources::load(&NlpConfig {
            tokenizer: WordTokenizer::French,
            stopwords: StopwordSource::File("/nonexistent/list.txt".into()),
        });
        let cleaned = TextNormalizer::new(Arc::new(resources)).clean(Some("Les vannes du circuit"));
        assert_eq!(cleaned, "les vannes du circuit");
    }

    #[test]
    fn test_output_tokens_respect_invariants() {
        let inputs = [
            "Vibration anormale (niveau 3) sur moteur M-204; arrêt d'urgence!",
            "Contrôle & vérification: 100% OK @ 14h30",
            "« Fuite » détectée - joint n°7 à remplacer…",
            "x y z 1 2 3",
        ];
        for normalizer in [normalizer(), degraded_normalizer()] {
            for input in inputs {
                let cleaned = normalizer.clean(Some(input));
                for token in cleaned.split(' ').filter(|t| !t.is_empty()) {
                    assert!(token.len() > 1, "short token {:?} in {:?}", token, cleaned);
                    assert!(!token.chars().all(|c| c.is_ascii_digit()), "digit token {:?}", token);
                    assert!(!token.chars().any(|c| c.is_ascii_punctuation()), "punctuation in {:?}", token);
                    assert!(token.is_ascii());
                }
            }
        }
    }

    fn assert_token_invariants(cleaned: &str) -> std::result::Result<(), TestCaseError> {
        for token in cleaned.split(' ').filter(|t| !t.is_empty()) {
            prop_assert!(token.len() > 1, "short token {:?}", token);
            prop_assert!(!token.chars().all(|c| c.is_ascii_digit()), "digit token {:?}", token);
            prop_assert!(
                !token.chars().any(|c| c.is_ascii_punctuation()),
                "punctuation in {:?}",
                token
            );
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_cleaned_tokens_respect_invariants(text in "\\PC{0,80}") {
            assert_token_invariants(&normalizer().clean(Some(&text)))?;
        }

        #[test]
        fn prop_degraded_tokens_respect_invariants(text in "\\PC{0,80}") {
            assert_token_invariants(&degraded_normalizer().clean(Some(&text)))?;
        }
    }
}
