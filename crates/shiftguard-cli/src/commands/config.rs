//! Config command - print the effective rule set.

use std::path::Path;

pub fn run(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
