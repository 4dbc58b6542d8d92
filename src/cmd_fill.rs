//! Fill subcommand handler.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use autofill_config::Config;
use autofill_dom::Document;
use autofill_engine::FormAutoFiller;

use crate::cmd_profile::load_profile;

/// Fill the page fixture at `form` and print the result as JSON.
pub(crate) async fn handle_fill(
    config: &Config,
    profile: Option<PathBuf>,
    form: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let profile = load_profile(config, profile)?;
    let page = std::fs::read_to_string(form)
        .with_context(|| format!("cannot read form fixture {}", form.display()))?;
    let mut doc = Document::from_json(&page)
        .with_context(|| format!("invalid form fixture {}", form.display()))?;

    let filler = FormAutoFiller::new(config, &profile);
    let result = filler.fill_form(&mut doc).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(output) = output {
        std::fs::write(output, doc.to_json_pretty()?)
            .with_context(|| format!("cannot write {}", output.display()))?;
        info!("Filled page written to {}", output.display());
    }
    Ok(())
}
