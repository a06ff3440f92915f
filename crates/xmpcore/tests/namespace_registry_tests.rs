#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{NS_A, NS_B};
use xmpcore::registry::NamespaceRegistry;
use xmpcore::xmpcore_types::ns;
use xmpcore::{ErrorKind, ExError, Registries};

// ===== DEFINE TESTS =====

#[test]
fn test_define_is_idempotent_per_uri() {
    let mut namespaces = NamespaceRegistry::new();
    let first = namespaces.define(NS_A, "a").unwrap();
    let second = namespaces.define(NS_A, "other").unwrap();
    assert_eq!(first, "a:");
    assert_eq!(second, "a:");
    assert_eq!(namespaces.len(), 1);
    assert_eq!(namespaces.lookup_uri("other"), None);
}

#[test]
fn test_define_accepts_prefix_with_separator() {
    let mut namespaces = NamespaceRegistry::new();
    assert_eq!(namespaces.define(NS_A, "a:").unwrap(), "a:");
    assert_eq!(namespaces.lookup_uri("a"), Some(NS_A));
    assert_eq!(namespaces.lookup_uri("a:"), Some(NS_A));
}

#[test]
fn test_colliding_prefix_gets_numbered_variant() {
    let mut namespaces = NamespaceRegistry::new();
    namespaces.define(NS_A, "p").unwrap();
    assert_eq!(namespaces.define(NS_B, "p").unwrap(), "p_1_:");
    assert_eq!(
        namespaces.define("http://ns.example.com/c/", "p").unwrap(),
        "p_2_:"
    );
    assert_eq!(namespaces.lookup_prefix(NS_B), Some("p_1_:"));
    assert_eq!(namespaces.lookup_uri("p_2_"), Some("http://ns.example.com/c/"));
}

#[test]
fn test_define_rejects_bad_arguments() {
    let mut namespaces = NamespaceRegistry::new();

    let err = ExError::from(namespaces.define("", "a").unwrap_err());
    assert_eq!(err.kind(), ErrorKind::BadParam);

    let err = ExError::from(namespaces.define(NS_A, "").unwrap_err());
    assert_eq!(err.kind(), ErrorKind::BadParam);

    let err = ExError::from(namespaces.define(NS_A, "1abc").unwrap_err());
    assert_eq!(err.kind(), ErrorKind::BadXml);

    assert!(namespaces.is_empty());
}

// ===== LOOKUP AND DELETE TESTS =====

#[test]
fn test_lookups_report_absence() {
    let namespaces = NamespaceRegistry::new();
    assert_eq!(namespaces.lookup_prefix(NS_A), None);
    assert_eq!(namespaces.lookup_uri("a"), None);
}

#[test]
fn test_delete_always_fails() {
    let mut registries = Registries::with_standard().unwrap();
    let before = registries.namespaces.clone();
    let err = ExError::from(registries.namespaces.delete(ns::DC).unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
    assert_eq!(registries.namespaces, before);
}

// ===== STANDARD TABLE TESTS =====

#[test]
fn test_standard_namespaces_registered() {
    let registries = Registries::with_standard().unwrap();
    let namespaces = &registries.namespaces;
    assert_eq!(namespaces.lookup_prefix(ns::XML), Some("xml:"));
    assert_eq!(namespaces.lookup_prefix(ns::RDF), Some("rdf:"));
    assert_eq!(namespaces.lookup_prefix(ns::XMP), Some("xmp:"));
    assert_eq!(namespaces.lookup_uri("dc"), Some(ns::DC));
    assert_eq!(namespaces.lookup_uri("xmpRights"), Some(ns::XMP_RIGHTS));
}

#[test]
fn test_iteration_is_ordered_by_prefix() {
    let registries = Registries::with_standard().unwrap();
    let prefixes: Vec<&str> = registries.namespaces.iter().map(|(p, _)| p).collect();
    let mut sorted = prefixes.clone();
    sorted.sort();
    assert_eq!(prefixes, sorted);
}
