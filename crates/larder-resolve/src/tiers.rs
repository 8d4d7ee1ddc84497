//! Tiered matching of a candidate name against existing records.

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Words this short never count as a shared significant word.
const MAX_INSIGNIFICANT_WORD_LEN: usize = 2;

/// Maximum length difference for the bounded containment tier.
const CLOSE_CONTAINMENT_SLACK: usize = 2;

/// Which matching tier produced a resolution, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Normalized names are equal.
    Exact,
    /// One contains the other and their lengths differ by at most two characters.
    CloseContainment,
    /// Both names share a word longer than two characters.
    SharedWord,
    /// One contains the other, any length.
    LooseContainment,
}

impl MatchTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CloseContainment => "close_containment",
            Self::SharedWord => "shared_word",
            Self::LooseContainment => "loose_containment",
        }
    }

    /// Anything but an exact match is worth surfacing to a reviewer.
    #[must_use]
    pub const fn is_fuzzy(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve `candidate` against `existing`, returning the first record that
/// matches in the strictest tier.
///
/// Returns `None` when nothing matches; creating a record is the caller's job.
pub fn resolve<'a, T, F>(candidate: &str, existing: &'a [T], name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    resolve_with_tier(candidate, existing, name_of).map(|(record, _)| record)
}

/// Like [`resolve`], but also reports which tier matched.
pub fn resolve_with_tier<'a, T, F>(
    candidate: &str,
    existing: &'a [T],
    name_of: F,
) -> Option<(&'a T, MatchTier)>
where
    F: Fn(&T) -> &str,
{
    let wanted = normalize(candidate);
    if wanted.is_empty() {
        return None;
    }

    let normalized: Vec<(usize, String)> = existing
        .iter()
        .enumerate()
        .map(|(i, record)| (i, normalize(name_of(record))))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    let tiers: [(MatchTier, fn(&str, &str) -> bool); 4] = [
        (MatchTier::Exact, exact),
        (MatchTier::CloseContainment, close_containment),
        (MatchTier::SharedWord, shared_word),
        (MatchTier::LooseContainment, loose_containment),
    ];

    tiers.into_iter().find_map(|(tier, matches)| {
        normalized
            .iter()
            .find(|(_, name)| matches(&wanted, name))
            .map(|(i, _)| (&existing[*i], tier))
    })
}

fn exact(a: &str, b: &str) -> bool {
    a == b
}

fn close_containment(a: &str, b: &str) -> bool {
    loose_containment(a, b)
        && a.chars().count().abs_diff(b.chars().count()) <= CLOSE_CONTAINMENT_SLACK
}

fn shared_word(a: &str, b: &str) -> bool {
    let significant = |s: &str| s.chars().count() > MAX_INSIGNIFICANT_WORD_LEN;
    a.split_whitespace()
        .filter(|w| significant(w))
        .any(|w| b.split_whitespace().any(|other| other == w))
}

fn loose_containment(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Debug, PartialEq)]
    struct Named {
        id: &'static str,
        name: &'static str,
    }

    const fn named(id: &'static str, name: &'static str) -> Named {
        Named { id, name }
    }

    fn existing() -> Vec<Named> {
        vec![
            named("ing-1", "Tomato"),
            named("ing-2", "Red Onion"),
            named("ing-3", "Extra Virgin Olive Oil"),
            named("ing-4", "Cheddar"),
        ]
    }

    fn tier_of(candidate: &str) -> Option<(&'static str, MatchTier)> {
        let records = existing();
        resolve_with_tier(candidate, &records, |r| r.name).map(|(r, tier)| (r.id, tier))
    }

    #[rstest]
    #[case("tomatoes", Some(("ing-1", MatchTier::Exact)))]
    #[case("  TOMATO ", Some(("ing-1", MatchTier::Exact)))]
    #[case("red onions", Some(("ing-2", MatchTier::Exact)))]
    #[case("Cheddars", Some(("ing-4", MatchTier::Exact)))]
    #[case("onion", Some(("ing-2", MatchTier::SharedWord)))]
    #[case("olive oil", Some(("ing-3", MatchTier::SharedWord)))]
    #[case("aged cheddar", Some(("ing-4", MatchTier::SharedWord)))]
    #[case("chedda", Some(("ing-4", MatchTier::CloseContainment)))]
    #[case("virgin olive", Some(("ing-3", MatchTier::SharedWord)))]
    #[case("mato", Some(("ing-1", MatchTier::CloseContainment)))]
    #[case("nion", Some(("ing-2", MatchTier::LooseContainment)))]
    #[case("basil", None)]
    #[case("", None)]
    #[case("   ", None)]
    fn tiers(#[case] candidate: &str, #[case] expected: Option<(&'static str, MatchTier)>) {
        assert_eq!(tier_of(candidate), expected);
    }

    #[test]
    fn stricter_tier_wins_over_earlier_record() {
        let records = vec![named("a", "Cheddar Cheese"), named("b", "Cheese")];
        let (hit, tier) = resolve_with_tier("cheese", &records, |r| r.name).expect("match");
        assert_eq!(hit.id, "b");
        assert_eq!(tier, MatchTier::Exact);
    }

    #[test]
    fn short_words_are_not_significant() {
        let records = vec![named("a", "Mac n Cheese")];
        assert!(resolve("fish n chips", &records, |r| r.name).is_none());
    }

    #[test]
    fn empty_existing_names_never_match() {
        let records = vec![named("a", "  ")];
        assert!(resolve("anything", &records, |r| r.name).is_none());
    }

    #[test]
    fn tier_ordering() {
        assert!(MatchTier::Exact < MatchTier::LooseContainment);
        assert!(!MatchTier::Exact.is_fuzzy());
        assert!(MatchTier::SharedWord.is_fuzzy());
        assert_eq!(MatchTier::CloseContainment.to_string(), "close_containment");
    }
}
