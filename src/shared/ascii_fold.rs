//! Lower-casing + transliteration to plain ASCII, shared by the column-name
//! and free-text normalizers.

/// Lower-case `text` and transliterate it to ASCII (`é` -> `e`, `œ` -> `oe`).
///
/// Glyphs without a transliteration vanish. The result is lower-cased a
/// second time because some transliterations start with a capital letter.
pub fn fold_to_ascii(text: &str) -> String {
    let lowered = text.to_lowercase();
    deunicode::deunicode_with_tofu(&lowered, "").to_ascii_lowercase()
}
