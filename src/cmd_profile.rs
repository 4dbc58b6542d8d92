//! Profile inspection subcommands: match, dictionary and mappings.

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use autofill_config::{Config, ConfigLoader};
use autofill_engine::{field_mappings, FormAutoFiller, JsonProfileProvider, Profile};

/// Load the profile given on the command line, else the configured one.
pub(crate) fn load_profile(config: &Config, path: Option<PathBuf>) -> anyhow::Result<Profile> {
    let path = path
        .or_else(|| config.profile.path.as_deref().map(ConfigLoader::expand_path))
        .context("no profile given: pass --profile or set profile.path in the config")?;
    debug!("Loading profile from {}", path.display());
    Ok(JsonProfileProvider::new(path).load()?)
}

pub(crate) fn handle_match(config: &Config, question: &str, profile: Option<PathBuf>) -> anyhow::Result<()> {
    let profile = load_profile(config, profile)?;
    let filler = FormAutoFiller::new(config, &profile);
    match filler.find_match(question) {
        Some(found) => println!("{}", serde_json::to_string_pretty(&found)?),
        None => println!("null"),
    }
    Ok(())
}

pub(crate) fn handle_dictionary(config: &Config, profile: Option<PathBuf>) -> anyhow::Result<()> {
    let profile = load_profile(config, profile)?;
    let filler = FormAutoFiller::new(config, &profile);
    let context = filler.context();
    println!("{}", serde_json::to_string_pretty(context.dictionary())?);
    Ok(())
}

pub(crate) fn handle_mappings() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&field_mappings())?);
    Ok(())
}
