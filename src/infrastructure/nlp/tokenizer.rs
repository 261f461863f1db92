use charabia::Tokenize;
use serde::{Deserialize, Serialize};

/// Word tokenizer used by the text normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordTokenizer {
    /// Language-aware segmentation (charabia)
    #[default]
    French,
    /// Plain whitespace split, the fallback
    Whitespace,
}

impl WordTokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            WordTokenizer::French => text
                .tokenize()
                .filter(|token| token.is_word())
                .map(|token| token.lemma().to_string())
                .collect(),
            WordTokenizer::Whitespace => text.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Whether the language-aware segmenter actually produces words here
    pub fn probe_french() -> bool {
        let tokens = WordTokenizer::French.tokenize("fuite pompe");
        tokens == ["fuite", "pompe"]
    }
}
