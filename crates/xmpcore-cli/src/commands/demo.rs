//! Demo command
//!
//! Usage: xmpcore demo [--json] [--unsorted]

use clap::Args;
use xmpcore::ops::resolver;
use xmpcore::{ArrayForm, ExpandedPath, Step, XmpMeta};
use xmpcore_types::{ns, XML_LANG};

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Print the tree snapshot as JSON instead of the text dump
    #[arg(long)]
    pub json: bool,

    /// Skip the canonical sort
    #[arg(long)]
    pub unsorted: bool,
}

/// Append an item with `value` to the array `name`, creating the array
/// with `form` if needed. Returns the new item.
fn append_item(
    meta: &mut XmpMeta,
    schema: &str,
    name: &str,
    form: ArrayForm,
    value: &str,
) -> anyhow::Result<xmpcore::NodeId> {
    let count = meta.count_array_items(schema, name)?;
    let base = {
        let guard = meta.registries().read()?;
        ExpandedPath::root_property(&guard.namespaces, &guard.aliases, schema, name)?
    };
    let [schema_step, root_step] = base.steps() else {
        anyhow::bail!("unexpected path shape for {}", name);
    };
    let path = ExpandedPath::new()
        .with(schema_step.clone())
        .with(root_step.clone().with_array_form(form))
        .with(Step::ArrayIndex(count + 1));
    let item = meta
        .find_node(&path, true, None)?
        .ok_or_else(|| anyhow::anyhow!("could not create item of {}", name))?;
    resolver::set_value(meta.tree_mut(), item, value)?;
    Ok(item)
}

/// Build the sample object
pub fn build_demo() -> anyhow::Result<XmpMeta> {
    let mut meta = XmpMeta::new()?;
    meta.set_object_name(b"demo")?;

    for (lang, title) in [("fr", "Bonjour"), ("x-default", "Hello"), ("en", "Hello")] {
        let item = append_item(&mut meta, ns::DC, "title", ArrayForm::AltText, title)?;
        resolver::create_qualifier(meta.tree_mut(), item, XML_LANG, lang)?;
    }
    for subject in ["xmp", "rust", "metadata"] {
        append_item(&mut meta, ns::DC, "subject", ArrayForm::Unordered, subject)?;
    }
    for creator in ["Second Author", "First Author"] {
        append_item(&mut meta, ns::DC, "creator", ArrayForm::Ordered, creator)?;
    }

    let tool = {
        let guard = meta.registries().read()?;
        ExpandedPath::root_property(&guard.namespaces, &guard.aliases, ns::XMP, "CreatorTool")?
    };
    let tool = meta
        .find_node(&tool, true, None)?
        .ok_or_else(|| anyhow::anyhow!("could not create xmp:CreatorTool"))?;
    resolver::set_value(meta.tree_mut(), tool, "xmpcore demo")?;

    Ok(meta)
}

/// Execute demo command
pub fn execute(args: DemoArgs) -> anyhow::Result<()> {
    let mut meta = build_demo()?;
    if !args.unsorted {
        meta.sort()?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&meta.snapshot()?)?);
        return Ok(());
    }

    meta.dump_object(&mut |text| print!("{}", text));
    let anomalies = meta.validate(&mut |text| eprint!("{}", text));
    if anomalies > 0 {
        anyhow::bail!("{} structural anomalies", anomalies);
    }
    Ok(())
}
