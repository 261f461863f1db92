// ============================================================
// COLUMN NAME NORMALIZER
// ============================================================
// Raw spreadsheet headers -> canonical snake_case identifiers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::fold_to_ascii;

static NON_WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a column header: `"Description de l'équipement"` ->
/// `"description_de_lequipement"`.
///
/// Idempotent. Underscores already present are kept.
pub fn normalize_column_name(name: &str) -> String {
    let folded = fold_to_ascii(name);
    let stripped = NON_WORD_PATTERN.replace_all(&folded, "");
    WHITESPACE_RUN_PATTERN
        .replace_all(stripped.trim(), "_")
        .to_string()
}
