//! Turning raw user text into decomposable tokens.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Keep letters and whitespace, lowercase, split into words
///
/// The index stores lowercased text, so tokens produced here line up with
/// what the index can source. Punctuation and digits are dropped.
pub fn prepare_target(raw: &str) -> Vec<String> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| is_letter(c) || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Letter general category (Lu, Ll, Lt, Lm, Lo)
///
/// Narrower than `char::is_alphabetic`, which also admits letter numbers,
/// circled letters and combining vowel signs.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}
