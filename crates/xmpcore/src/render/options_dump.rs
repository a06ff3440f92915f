/// Flag names for bits 31 down to 0
const OPTION_NAMES: [&str; 32] = [
    " schema", // 0x8000_0000
    " ?30",
    " ?29",
    " -COMMAS-",
    " ?27", // 0x0800_0000
    " ?26",
    " ?25",
    " ?24",
    " ?23", // 0x0080_0000
    " isStale",
    " isDerived",
    " isStable",
    " ?19", // 0x0008_0000
    " isInternal",
    " hasAliases",
    " isAlias",
    " -AFTER-", // 0x0000_8000
    " -BEFORE-",
    " isCompact",
    " isLangAlt",
    " isAlt", // 0x0000_0800
    " isOrdered",
    " isArray",
    " isStruct",
    " hasType", // 0x0000_0080
    " hasLang",
    " isQual",
    " hasQual",
    " ?3", // 0x0000_0008
    " ?2",
    " URI",
    " ?0",
];

/// Write an option word as `(0x<HEX> : name name ...)`, or `(0x0)` for zero
pub fn dump_options(bits: u32, out: &mut dyn FnMut(&str)) {
    if bits == 0 {
        out("(0x0)");
        return;
    }
    out(&format!("(0x{:X} :", bits));
    for (position, name) in OPTION_NAMES.iter().enumerate() {
        let mask = 0x8000_0000u32 >> position;
        if bits & mask != 0 {
            out(name);
        }
    }
    out(")");
}

/// [`dump_options`] into a `String`
pub fn format_options(bits: u32) -> String {
    let mut text = String::new();
    dump_options(bits, &mut |s| text.push_str(s));
    text
}
