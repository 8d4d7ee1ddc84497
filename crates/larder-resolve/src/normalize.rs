//! Name normalization.

/// Plural suffixes and their replacements, tried in order.
const PLURAL_SUFFIXES: &[(&str, &str)] = &[("ies", "y"), ("ves", "f"), ("es", ""), ("s", "")];

/// Last words this short are never de-pluralized (`gas`, `pea`).
const MIN_STRIP_LEN: usize = 4;

/// Normalize a name for comparison.
///
/// Lowercases, trims, collapses internal whitespace, then strips one plural
/// suffix from the last word. A suffix is only stripped when the word has at
/// least four characters and the result does not itself end in `s`, so the
/// output never carries a strippable suffix and `normalize` is idempotent.
///
/// ```
/// use larder_resolve::normalize;
///
/// assert_eq!(normalize("  Cherry   Tomatoes "), "cherry tomato");
/// assert_eq!(normalize("Berries"), "berry");
/// assert_eq!(normalize(&normalize("Glasses")), normalize("Glasses"));
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut words: Vec<&str> = lower.split_whitespace().collect();
    let Some(last) = words.pop() else {
        return String::new();
    };

    let singular = singularize(last);
    words.push(&singular);
    words.join(" ")
}

fn singularize(word: &str) -> String {
    if word.chars().count() < MIN_STRIP_LEN {
        return word.to_string();
    }
    for (suffix, replacement) in PLURAL_SUFFIXES {
        if let Some(stem) = word.strip_suffix(suffix) {
            let candidate = format!("{stem}{replacement}");
            if !candidate.is_empty() && !candidate.ends_with('s') {
                return candidate;
            }
        }
    }
    word.to_string()
}
