//! Properties that must hold for every name, checked over a varied corpus.

use larder_resolve::{MatchTier, NameIndex, normalize, resolve, resolve_with_tier};

const CORPUS: &[&str] = &[
    "Tomatoes",
    "cherry tomatoes",
    "Berries",
    "loaves",
    "Olives",
    "glasses",
    "asparagus",
    "Brussels sprouts",
    "Swiss Cheese",
    "  spaced   out   names  ",
    "CRÈME FRAÎCHE",
    "hummus",
    "peas",
    "fish",
    "ies",
    "s",
    "",
    "jalapeños",
    "sesame seeds",
    "mayonnaise",
];

#[test]
fn normalize_is_idempotent() {
    for name in CORPUS {
        let once = normalize(name);
        assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
    }
}

#[test]
fn same_normalized_name_resolves_to_existing_record() {
    let existing: Vec<(String, usize)> = CORPUS
        .iter()
        .enumerate()
        .filter(|(_, name)| !normalize(name).is_empty())
        .map(|(i, name)| ((*name).to_string(), i))
        .collect();

    for (name, id) in &existing {
        let variant = format!("  {}  ", name.to_uppercase());
        if normalize(&variant) != normalize(name) {
            continue;
        }
        let (hit, tier) =
            resolve_with_tier(&variant, &existing, |(n, _)| n.as_str()).expect("resolves");
        assert_eq!(tier, MatchTier::Exact, "{variant:?}");
        assert_eq!(
            normalize(&hit.0),
            normalize(name),
            "{variant:?} resolved to {:?} instead of record {id}",
            hit.0
        );
    }
}

#[test]
fn index_agrees_with_exact_tier() {
    let index = NameIndex::from_records([("Sesame Seeds", "ing-1"), ("Olive Oil", "ing-2")]);
    let records = [("Sesame Seeds", "ing-1"), ("Olive Oil", "ing-2")];

    for candidate in ["sesame seed", "SESAME SEEDS", "olive oils"] {
        let from_index = index.get(candidate);
        let from_resolver = resolve(candidate, &records, |(n, _)| *n).map(|(_, id)| *id);
        assert_eq!(from_index, from_resolver, "{candidate}");
    }
}
