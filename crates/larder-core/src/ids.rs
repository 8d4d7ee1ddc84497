//! ID prefixes and generation.
//!
//! Every local record ID has the shape `{prefix}-{8 hex chars}`, e.g. `alg-a3f8b2c1`.

use crate::errors::CoreError;

pub const PREFIX_ALLERGEN: &str = "alg";
pub const PREFIX_INGREDIENT: &str = "ing";
pub const PREFIX_MENU_ITEM: &str = "mnu";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_ALLERGEN, PREFIX_INGREDIENT, PREFIX_MENU_ITEM];

/// Generate a prefixed ID from 4 random bytes.
///
/// # Errors
///
/// Returns [`CoreError::Other`] if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    Ok(format!("{prefix}-{}", hex::encode(bytes)))
}

/// Whether `id` carries the given prefix and a well-formed hex suffix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.split_once('-').is_some_and(|(p, rest)| {
        p == prefix && rest.len() == 8 && rest.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_id_correct_format() {
        let id = generate_id(PREFIX_ALLERGEN).unwrap();
        assert!(id.starts_with("alg-"), "ID should start with 'alg-': {id}");
        assert_eq!(id.len(), 12);
        assert!(has_prefix(&id, PREFIX_ALLERGEN));
    }

    #[test]
    fn generate_id_all_prefixes() {
        for prefix in ALL_PREFIXES {
            let id = generate_id(prefix).unwrap();
            assert!(has_prefix(&id, prefix), "bad id for {prefix}: {id}");
        }
    }

    #[test]
    fn generate_id_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = generate_id("tst").unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[test]
    fn has_prefix_rejects_malformed() {
        assert!(!has_prefix("alg", PREFIX_ALLERGEN));
        assert!(!has_prefix("ing-a3f8b2c1", PREFIX_ALLERGEN));
        assert!(!has_prefix("alg-zzzzzzzz", PREFIX_ALLERGEN));
    }
}
