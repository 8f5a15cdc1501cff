/// Folds a raw category label into its lookup key. Zero-width characters
/// are dropped, inner whitespace collapses to single spaces, and the result
/// is case folded so resolution ignores capitalization.
pub(crate) fn normalize_name(value: &str) -> String {
    let stripped: String = value
        .chars()
        .filter(|ch| !matches!(ch, '\u{feff}' | '\u{200b}'))
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
