use atys_chem::{combine_pattern, data, AtomType, Hierarchy};
use atys_core::AtysError;

fn base_hierarchy() -> Hierarchy {
    Hierarchy::load_base_types("[#6] carbon\n[#8] oxygen\n").unwrap()
}

#[test]
fn bundled_base_types_load() {
    let hierarchy = Hierarchy::load_base_types(data::BASE_TYPES).unwrap();
    assert_eq!(hierarchy.len(), 8);
    assert_eq!(hierarchy.base_len(), 8);
    assert!(hierarchy.match_order().iter().all(|atom_type| atom_type.is_base));
    assert_eq!(hierarchy.get("carbon").unwrap().pattern, "[#6]");
}

#[test]
fn malformed_type_line_is_fatal() {
    let err = Hierarchy::load_base_types("[#6]\n").unwrap_err();
    match err {
        AtysError::MalformedType(info) => assert_eq!(info.code, "field-count"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_base_pattern_is_fatal() {
    let err = Hierarchy::load_base_types("[#6] carbon\n[#6] graphite\n").unwrap_err();
    match err {
        AtysError::DuplicatePattern(info) => {
            assert_eq!(info.context.get("pattern").map(String::as_str), Some("[#6]"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn append_is_functional_and_ordered() {
    let hierarchy = base_hierarchy();
    let parent = hierarchy.get("carbon").unwrap().clone();
    let child = AtomType::derived(
        &parent,
        combine_pattern(&parent.pattern, &["[D1]"]),
        "carbon degree-1",
        vec!["degree-1".into()],
    );
    let appended = hierarchy.append(child).unwrap();

    assert_eq!(hierarchy.len(), 2);
    assert_eq!(appended.len(), 3);
    assert_eq!(appended.match_order()[2].name, "carbon degree-1");
    assert_eq!(appended.match_order()[2].pattern, "[#6&D1]");
    assert_eq!(appended.match_order()[2].depth(), 1);
    assert_eq!(appended.base_len(), hierarchy.base_len());
}

#[test]
fn duplicate_pattern_append_is_rejected() {
    let hierarchy = base_hierarchy();
    let duplicate = AtomType::base("[#8]", "other oxygen");
    let err = hierarchy.append(duplicate).unwrap_err();
    assert!(matches!(err, AtysError::DuplicatePattern(_)));
}

#[test]
fn duplicate_base_name_is_fatal() {
    let err = Hierarchy::load_base_types("[#6] carbon\n[#7] carbon\n").unwrap_err();
    match err {
        AtysError::DuplicateName(info) => {
            assert_eq!(info.code, "duplicate-name");
            assert_eq!(info.context.get("line").map(String::as_str), Some("2"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_name_append_is_rejected() {
    // Names key removal and per-type counts, so a fresh pattern must not
    // smuggle an existing name in next to its base namesake.
    let hierarchy = base_hierarchy();
    let parent = hierarchy.get("oxygen").unwrap().clone();
    let twin = AtomType::derived(
        &parent,
        combine_pattern(&parent.pattern, &["[D1]"]),
        "carbon",
        vec!["degree-1".into()],
    );
    let err = hierarchy.append(twin).unwrap_err();
    match err {
        AtysError::DuplicateName(info) => {
            assert_eq!(info.context.get("name").map(String::as_str), Some("carbon"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The original base type is still the only "carbon" and stays immutable.
    assert_eq!(hierarchy.get("carbon").unwrap().pattern, "[#6]");
    assert!(matches!(
        hierarchy.remove("carbon").unwrap_err(),
        AtysError::BaseTypeImmutable(_)
    ));
}

#[test]
fn base_types_are_immutable() {
    let hierarchy = base_hierarchy();
    let err = hierarchy.remove("carbon").unwrap_err();
    assert!(matches!(err, AtysError::BaseTypeImmutable(_)));
}

#[test]
fn removing_a_missing_type_is_not_found() {
    let hierarchy = base_hierarchy();
    let err = hierarchy.remove("unobtainium").unwrap_err();
    assert!(matches!(err, AtysError::NotFound(_)));
}

#[test]
fn append_then_remove_restores_match_order() {
    let hierarchy = base_hierarchy();
    let parent = hierarchy.get("carbon").unwrap().clone();
    let child = AtomType::derived(
        &parent,
        combine_pattern(&parent.pattern, &["[X4]"]),
        "carbon connections-4",
        vec!["connections-4".into()],
    );
    let appended = hierarchy.append(child).unwrap();
    let restored = appended.remove("carbon connections-4").unwrap();

    assert_eq!(restored, hierarchy);
    assert_eq!(restored.canonical_hash(), hierarchy.canonical_hash());
}

#[test]
fn serialization_round_trips_multi_word_names() {
    let hierarchy = base_hierarchy();
    let parent = hierarchy.get("carbon").unwrap().clone();
    let child = AtomType::derived(
        &parent,
        combine_pattern(&parent.pattern, &["[H3]"]),
        "carbon hydrogens-3",
        vec!["hydrogens-3".into()],
    );
    let appended = hierarchy.append(child).unwrap();

    let text = appended.serialize();
    assert!(text.contains("[#6&H3] 'carbon hydrogens-3'"));

    let reloaded = Hierarchy::load_base_types(&text).unwrap();
    let names: Vec<&str> = reloaded
        .match_order()
        .iter()
        .map(|atom_type| atom_type.name.as_str())
        .collect();
    assert_eq!(names, ["carbon", "oxygen", "carbon hydrogens-3"]);
}

#[test]
fn canonical_hash_tracks_order_and_content() {
    let hierarchy = base_hierarchy();
    let reversed = Hierarchy::load_base_types("[#8] oxygen\n[#6] carbon\n").unwrap();
    assert_ne!(hierarchy.canonical_hash(), reversed.canonical_hash());
    assert_eq!(hierarchy.canonical_hash(), base_hierarchy().canonical_hash());
}

#[test]
fn combine_pattern_uses_low_precedence_with_or_groups() {
    assert_eq!(combine_pattern("[#6]", &["[D1]"]), "[#6&D1]");
    assert_eq!(combine_pattern("[#6]", &["D1", "H3"]), "[#6&D1&H3]");
    assert_eq!(combine_pattern("[#6]", &["[X1,X2]"]), "[#6;X1,X2]");
    assert_eq!(combine_pattern("[#6;X1,X2]", &["[H1]"]), "[#6;X1,X2;H1]");
}
