// ============================================================
// LINGUISTIC RESOURCES
// ============================================================
// French stop words and word tokenizer, loaded once at startup.
// A resource that cannot be loaded degrades to its permissive
// fallback (empty stop-word set, whitespace tokenizer).

mod stopwords;
mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

pub use stopwords::{embedded_stopwords, read_stopword_file, StopwordSource, FRENCH_STOP_WORDS};
pub use tokenizer::WordTokenizer;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NlpConfig {
    #[serde(default)]
    pub tokenizer: WordTokenizer,
    #[serde(default)]
    pub stopwords: StopwordSource,
}

/// Stop words + tokenizer actually in use, with the reasons for any fallback
#[derive(Debug, Clone)]
pub struct LinguisticResources {
    stopwords: HashSet<String>,
    tokenizer: WordTokenizer,
    degraded: Vec<String>,
}

impl LinguisticResources {
    /// Resolve the configured resources. Never fails.
    pub fn load(config: &NlpConfig) -> Self {
        let mut degraded = Vec::new();

        let stopwords = match &config.stopwords {
            StopwordSource::Embedded => embedded_stopwords(),
            StopwordSource::Disabled => {
                degraded.push("stop-word filtering disabled".to_string());
                HashSet::new()
            }
            StopwordSource::File(path) => match read_stopword_file(path) {
                Ok(words) => words,
                Err(err) => {
                    warn!(error = %err, "Stop-word list unavailable, filtering disabled");
                    degraded.push(format!("stop-word list unavailable: {}", err));
                    HashSet::new()
                }
            },
        };

        let tokenizer = match config.tokenizer {
            WordTokenizer::French if !WordTokenizer::probe_french() => {
                warn!("French segmenter unavailable, falling back to whitespace tokenizer");
                degraded.push("french tokenizer unavailable".to_string());
                WordTokenizer::Whitespace
            }
            WordTokenizer::Whitespace => {
                degraded.push("whitespace tokenizer selected".to_string());
                WordTokenizer::Whitespace
            }
            kind => kind,
        };

        Self {
            stopwords,
            tokenizer,
            degraded,
        }
    }

    /// Fully degraded resources: no stop words, whitespace tokenizer
    pub fn fallback() -> Self {
        Self {
            stopwords: HashSet::new(),
            tokenizer: WordTokenizer::Whitespace,
            degraded: vec!["fallback resources".to_string()],
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    pub fn tokenizer(&self) -> WordTokenizer {
        self.tokenizer
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn degraded_reasons(&self) -> &[String] {
        &self.degraded
    }
}

impl Default for LinguisticResources {
    fn default() -> Self {
        Self::load(&NlpConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_resources_are_complete() {
        let resources = LinguisticResources::default();
        assert!(!resources.is_degraded());
        assert_eq!(resources.tokenizer(), WordTokenizer::French);
        assert!(resources.is_stopword("les"));
    }

    #[test]
    fn test_missing_stopword_file_degrades_to_empty_set() {
        let config = NlpConfig {
            tokenizer: WordTokenizer::French,
            stopwords: StopwordSource::File(PathBuf::from("/nonexistent/french.txt")),
        };
        let resources = LinguisticResources::load(&config);
        assert!(resources.is_degraded());
        assert_eq!(resources.stopword_count(), 0);
        assert!(!resources.is_stopword("les"));
    }

    #[test]
    fn test_whitespace_tokenizer_is_reported() {
        let config = NlpConfig {
            tokenizer: WordTokenizer::Whitespace,
            stopwords: StopwordSource::Embedded,
        };
        let resources = LinguisticResources::load(&config);
        assert!(resources.is_degraded());
        assert_eq!(resources.tokenizer(), WordTokenizer::Whitespace);
        assert!(resources.is_stopword("les"));
    }

    #[test]
    fn test_config_deserializes_from_toml_shapes() {
        let config: NlpConfig =
            serde_json::from_str(r#"{"tokenizer":"whitespace","stopwords":{"file":"sw.txt"}}"#)
                .unwrap();
        assert_eq!(config.tokenizer, WordTokenizer::Whitespace);
        assert_eq!(config.stopwords, StopwordSource::File(PathBuf::from("sw.txt")));
    }
}
