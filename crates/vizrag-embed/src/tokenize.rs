/// Lowercased alphanumeric word tokens, in order.
///
/// Everything that is not alphanumeric separates tokens, so punctuation and
/// JSON syntax in rendered annotations never reach the hasher.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Adjacent token pairs joined with a single space.
pub fn bigrams(tokens: &[String]) -> impl Iterator<Item = String> + '_ {
    tokens.windows(2).map(|w| format!("{} {}", w[0], w[1]))
}
