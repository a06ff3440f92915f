#![allow(clippy::unwrap_used, clippy::expect_used)]

use xmpcore::library;
use xmpcore::xmpcore_types::ns;
use xmpcore::{ErrorKind, XmpError, XmpMeta};

const NS_LIFE: &str = "http://ns.example.com/life/";

// Library state is process-wide, so the whole lifecycle runs as one test.
#[test]
fn test_nested_initialize_and_terminate() {
    assert!(!library::is_initialized());
    assert!(matches!(library::registries(), Err(XmpError::NotInitialized)));
    let err = XmpMeta::new().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InternalFailure);
    assert!(library::dump_namespaces(&mut |_| {}).is_err());

    // ===== FIRST INITIALIZATION =====
    library::initialize().unwrap();
    library::initialize().unwrap();
    assert_eq!(library::init_count(), 2);

    let first = library::registries().unwrap();
    let second = library::registries().unwrap();
    assert!(first.same_instance(&second));
    assert_eq!(first.namespace_prefix(ns::DC).unwrap().as_deref(), Some("dc:"));
    assert_eq!(first.register_namespace(NS_LIFE, "life").unwrap(), "life:");

    let meta = XmpMeta::new().unwrap();
    assert!(meta.registries().same_instance(&first));
    drop(meta);

    let mut text = String::new();
    library::dump_namespaces(&mut |s| text.push_str(s)).unwrap();
    assert!(text.starts_with("Dumping namespace prefix to URI map\n"));
    assert!(text.contains(" => http://ns.example.com/life/\n"));

    // ===== INNER TERMINATE KEEPS TABLES =====
    library::terminate();
    assert_eq!(library::init_count(), 1);
    assert!(library::registries().unwrap().same_instance(&first));

    // ===== FINAL TERMINATE DROPS TABLES =====
    library::terminate();
    assert_eq!(library::init_count(), 0);
    assert!(matches!(library::registries(), Err(XmpError::NotInitialized)));

    library::terminate();
    assert_eq!(library::init_count(), 0);

    // ===== REINITIALIZATION STARTS FRESH =====
    library::initialize().unwrap();
    let fresh = library::registries().unwrap();
    assert!(!fresh.same_instance(&first));
    assert_eq!(fresh.namespace_prefix(NS_LIFE).unwrap(), None);
    assert!(fresh.read().unwrap().aliases.is_alias("xmp:Author"));
    library::terminate();
    assert!(!library::is_initialized());
}
