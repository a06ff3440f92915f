//! Flags command
//!
//! Usage: xmpcore flags <WORD>
//!
//! WORD is decimal or `0x` hexadecimal.

use anyhow::{anyhow, Context};
use clap::Args;
use xmpcore::render::format_options;
use xmpcore::NodeOptions;

#[derive(Debug, Args)]
pub struct FlagsArgs {
    /// Option word to decode
    pub word: String,
}

/// Parse a decimal or `0x`-prefixed hexadecimal word
pub fn parse_word(text: &str) -> anyhow::Result<u32> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|e| anyhow!("invalid option word {:?}: {}", text, e))
}

/// Execute flags command
pub fn execute(args: FlagsArgs) -> anyhow::Result<()> {
    let bits = parse_word(&args.word)?;
    println!("{}", format_options(bits));

    let options = NodeOptions::from_bits(bits).context("decoding option word")?;
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}
