//! Contiguous-phrase generation for command matching.
//!
//! Multi-word triggers ("talk to", "gold coin purse") are matched by
//! generating every contiguous subsequence of the input tokens and testing
//! registered synonym sets against that list. Callers scan for the *first*
//! match, so generation order is part of the contract: all phrases starting
//! at token 0 (growing rightward), then all phrases starting at token 1,
//! and so on.

/// Generate every contiguous-subsequence phrase of `tokens`, space-joined,
/// in start-index-major order. The empty phrase is never produced.
///
/// `["take", "the", "sword"]` yields
/// `["take", "take the", "take the sword", "the", "the sword", "sword"]`.
pub fn generate_combinations(tokens: &[impl AsRef<str>]) -> Vec<String> {
    let mut result = Vec::with_capacity(tokens.len() * (tokens.len() + 1) / 2);
    for start in 0..tokens.len() {
        let mut phrase = String::new();
        for token in &tokens[start..] {
            if !phrase.is_empty() {
                phrase.push(' ');
            }
            phrase.push_str(token.as_ref());
            result.push(phrase.clone());
        }
    }
    result
}

/// Case-insensitive membership test against a generated combination list.
pub fn combinations_contain(combinations: &[String], phrase: &str) -> bool {
    combinations
        .iter()
        .any(|c| c.eq_ignore_ascii_case(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_token_ordering() {
        assert_eq!(
            generate_combinations(&["take", "sword"]),
            vec!["take", "take sword", "sword"]
        );
    }

    #[test]
    fn three_token_ordering() {
        assert_eq!(
            generate_combinations(&["take", "the", "sword"]),
            vec![
                "take",
                "take the",
                "take the sword",
                "the",
                "the sword",
                "sword"
            ]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        let empty: [&str; 0] = [];
        assert!(generate_combinations(&empty).is_empty());
    }

    #[test]
    fn membership_is_case_insensitive() {
        let combos = generate_combinations(&["Talk", "To", "Guard"]);
        assert!(combinations_contain(&combos, "talk to"));
        assert!(combinations_contain(&combos, "GUARD"));
        assert!(!combinations_contain(&combos, "to talk"));
    }
}
