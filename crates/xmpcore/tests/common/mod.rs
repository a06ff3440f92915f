use xmpcore::ops::resolver;
use xmpcore::rules;
use xmpcore::xmpcore_types::{ARRAY_ITEM_NAME, XML_LANG};
use xmpcore::{ArrayForm, NodeId, NodeOptions, PropertyTree, Registries};

pub const NS_A: &str = "http://ns.example.com/a/";
pub const NS_B: &str = "http://ns.example.com/b/";

/// Standard tables plus the two example namespaces `a:` and `b:`
#[allow(dead_code)]
pub fn test_registries() -> Registries {
    let mut registries = Registries::with_standard().unwrap();
    registries.register_namespace(NS_A, "a").unwrap();
    registries.register_namespace(NS_B, "b").unwrap();
    registries
}

/// Find or create the schema node for `uri`
#[allow(dead_code)]
pub fn schema(tree: &mut PropertyTree, registries: &Registries, uri: &str) -> NodeId {
    match resolver::find_schema(tree, uri).unwrap() {
        Some(id) => id,
        None => resolver::create_schema(tree, &registries.namespaces, uri).unwrap(),
    }
}

/// Simple property or field with a value
#[allow(dead_code)]
pub fn leaf(tree: &mut PropertyTree, parent: NodeId, name: &str, value: &str) -> NodeId {
    let id = resolver::create_child(tree, parent, name, NodeOptions::simple()).unwrap();
    resolver::set_value(tree, id, value).unwrap();
    id
}

#[allow(dead_code)]
pub fn structure(tree: &mut PropertyTree, parent: NodeId, name: &str) -> NodeId {
    resolver::create_child(tree, parent, name, NodeOptions::structure()).unwrap()
}

#[allow(dead_code)]
pub fn array(tree: &mut PropertyTree, parent: NodeId, name: &str, form: ArrayForm) -> NodeId {
    resolver::create_child(tree, parent, name, NodeOptions::array(form)).unwrap()
}

/// Append a simple item to `array`
#[allow(dead_code)]
pub fn item(tree: &mut PropertyTree, array: NodeId, value: &str) -> NodeId {
    leaf(tree, array, ARRAY_ITEM_NAME, value)
}

/// Append a simple item tagged with `xml:lang`
#[allow(dead_code)]
pub fn lang_item(tree: &mut PropertyTree, array: NodeId, lang: &str, value: &str) -> NodeId {
    let id = item(tree, array, value);
    resolver::create_qualifier(tree, id, XML_LANG, lang).unwrap();
    id
}

/// A small tree touching every node shape
#[allow(dead_code)]
pub fn sample_tree(registries: &Registries) -> PropertyTree {
    let mut tree = PropertyTree::new();

    let b = schema(&mut tree, registries, NS_B);
    leaf(&mut tree, b, "b:zeta", "last");
    let point = structure(&mut tree, b, "b:point");
    leaf(&mut tree, point, "b:y", "2");
    leaf(&mut tree, point, "b:x", "1");

    let a = schema(&mut tree, registries, NS_A);
    let tags = array(&mut tree, a, "a:tags", ArrayForm::Unordered);
    item(&mut tree, tags, "pear");
    item(&mut tree, tags, "apple");
    let title = array(&mut tree, a, "a:title", ArrayForm::AltText);
    lang_item(&mut tree, title, "fr", "Bonjour");
    lang_item(&mut tree, title, "x-default", "Hello");
    lang_item(&mut tree, title, "en", "Hello");
    let steps = array(&mut tree, a, "a:steps", ArrayForm::Ordered);
    item(&mut tree, steps, "second");
    item(&mut tree, steps, "first");
    let note = leaf(&mut tree, a, "a:note", "text");
    resolver::create_qualifier(&mut tree, note, "a:source", "scan").unwrap();
    resolver::create_qualifier(&mut tree, note, XML_LANG, "en").unwrap();

    tree
}

/// Run the validator and return its text output
#[allow(dead_code)]
pub fn validation_report(tree: &PropertyTree) -> String {
    let mut text = String::new();
    rules::validate_tree(tree, &mut |s| text.push_str(s));
    text
}

/// Collect everything written to a text sink
#[allow(dead_code)]
pub fn collect(f: impl FnOnce(&mut dyn FnMut(&str))) -> String {
    let mut text = String::new();
    f(&mut |s| text.push_str(s));
    text
}
