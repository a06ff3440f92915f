#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{test_registries, NS_A, NS_B};
use xmpcore::options::raw::{ARRAY_IS_ALT_TEXT, ARRAY_IS_ORDERED, VALUE_IS_STRUCT};
use xmpcore::xmpcore_types::ns;
use xmpcore::{ErrorKind, ExError, Registries, Step};

fn target(registries: &Registries, alias: &str) -> String {
    registries
        .aliases
        .resolve(alias)
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn kind(err: xmpcore::XmpError) -> ErrorKind {
    ExError::from(err).kind()
}

// ===== REGISTRATION TESTS =====

#[test]
fn test_register_plain_alias() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "Writer", NS_B, "author", 0).unwrap();
    assert_eq!(target(&reg, "a:Writer"), "b:author");
    assert!(reg.aliases.is_alias("a:Writer"));
    assert!(!reg.aliases.is_alias("b:author"));
}

#[test]
fn test_register_array_forms_add_item_step() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "First", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap();
    reg.register_alias(NS_A, "Title", NS_B, "title", ARRAY_IS_ALT_TEXT)
        .unwrap();

    let first = reg.aliases.resolve("a:First").unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first.item_step(), Some(&Step::ArrayIndex(1)));

    assert_eq!(target(&reg, "a:Title"), "b:title[?xml:lang=\"x-default\"]");
}

#[test]
fn test_resolve_property_by_namespace() {
    let reg = Registries::with_standard().unwrap();
    let actual = reg
        .aliases
        .resolve_property(&reg.namespaces, ns::XMP, "Author")
        .unwrap()
        .unwrap();
    assert_eq!(actual.to_string(), "dc:creator[1]");
    assert!(reg
        .aliases
        .resolve_property(&reg.namespaces, ns::DC, "creator")
        .unwrap()
        .is_none());
}

#[test]
fn test_bad_arguments() {
    let mut reg = test_registries();

    let err = reg
        .register_alias(NS_A, "x/y", NS_B, "author", 0)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadXPath);

    let err = reg
        .register_alias(NS_A, "Writer", NS_B, "author", VALUE_IS_STRUCT)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadOptions);

    let err = reg
        .register_alias("http://unknown/", "Writer", NS_B, "author", 0)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadSchema);

    assert!(!reg.aliases.is_alias("a:Writer"));
}

// ===== IDEMPOTENCE TESTS =====

#[test]
fn test_identical_reregistration_is_noop() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "First", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap();
    let before = reg.aliases.clone();
    reg.register_alias(NS_A, "First", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap();
    assert_eq!(reg.aliases, before);
}

#[test]
fn test_conflicting_reregistration_fails_without_change() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "First", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap();
    let before = reg.aliases.clone();

    let conflicts = [
        (NS_B, "list", 0),
        (NS_B, "list", ARRAY_IS_ALT_TEXT),
        (NS_B, "other", ARRAY_IS_ORDERED),
    ];
    for (actual_ns, actual_prop, form) in conflicts {
        let err = reg
            .register_alias(NS_A, "First", actual_ns, actual_prop, form)
            .unwrap_err();
        assert_eq!(kind(err), ErrorKind::BadParam);
        assert_eq!(reg.aliases, before);
    }
}

// ===== CHAIN TESTS =====

#[test]
fn test_chain_collapses_when_target_registered_first() {
    let mut reg = test_registries();
    reg.register_alias(NS_B, "mid", NS_B, "end", 0).unwrap();
    reg.register_alias(NS_A, "start", NS_B, "mid", 0).unwrap();
    assert_eq!(target(&reg, "a:start"), "b:end");
}

#[test]
fn test_chain_collapses_when_target_registered_last() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "start", NS_B, "mid", 0).unwrap();
    reg.register_alias(NS_B, "mid", NS_B, "end", 0).unwrap();
    assert_eq!(target(&reg, "a:start"), "b:end");
    assert_eq!(target(&reg, "b:mid"), "b:end");
}

#[test]
fn test_both_orders_reach_the_same_state() {
    let mut forward = test_registries();
    forward.register_alias(NS_A, "start", NS_B, "mid", 0).unwrap();
    forward.register_alias(NS_B, "mid", NS_B, "end", 0).unwrap();

    let mut reverse = test_registries();
    reverse.register_alias(NS_B, "mid", NS_B, "end", 0).unwrap();
    reverse.register_alias(NS_A, "start", NS_B, "mid", 0).unwrap();

    assert_eq!(forward.aliases, reverse.aliases);
}

#[test]
fn test_item_alias_through_plain_alias() {
    let mut reg = test_registries();
    reg.register_alias(NS_B, "mid", NS_B, "list", 0).unwrap();
    reg.register_alias(NS_A, "first", NS_B, "mid", ARRAY_IS_ORDERED)
        .unwrap();
    assert_eq!(target(&reg, "a:first"), "b:list[1]");
}

#[test]
fn test_array_item_to_array_item_rejected() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "first", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap();
    let before = reg.aliases.clone();

    let err = reg
        .register_alias(NS_B, "other", NS_A, "first", ARRAY_IS_ORDERED)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadParam);
    assert_eq!(reg.aliases, before);
}

#[test]
fn test_dependent_item_alias_blocks_item_target() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "first", NS_B, "mid", ARRAY_IS_ORDERED)
        .unwrap();
    let before = reg.aliases.clone();

    let err = reg
        .register_alias(NS_B, "mid", NS_B, "list", ARRAY_IS_ORDERED)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadParam);
    assert_eq!(reg.aliases, before);
}

#[test]
fn test_dependent_item_alias_rebased_onto_plain_target() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "first", NS_B, "mid", ARRAY_IS_ORDERED)
        .unwrap();
    reg.register_alias(NS_B, "mid", NS_B, "list", 0).unwrap();
    assert_eq!(target(&reg, "a:first"), "b:list[1]");
}

#[test]
fn test_self_alias_rejected() {
    let mut reg = test_registries();
    reg.register_alias(NS_A, "start", NS_B, "mid", 0).unwrap();
    let err = reg
        .register_alias(NS_B, "mid", NS_A, "start", 0)
        .unwrap_err();
    assert_eq!(kind(err), ErrorKind::BadParam);
}

// ===== STANDARD TABLE TESTS =====

#[test]
fn test_standard_aliases() {
    let reg = Registries::with_standard().unwrap();
    assert_eq!(target(&reg, "xmp:Author"), "dc:creator[1]");
    assert_eq!(target(&reg, "xmp:Authors"), "dc:creator");
    assert_eq!(
        target(&reg, "pdf:Title"),
        "dc:title[?xml:lang=\"x-default\"]"
    );
    for (alias, actual) in reg.aliases.entries() {
        assert!(
            !reg.aliases.is_alias(actual.root_name().unwrap()),
            "{} targets another alias",
            alias
        );
    }
}
