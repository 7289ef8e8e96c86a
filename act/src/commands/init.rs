use std::fs;

use anyhow::{anyhow, Result};
use clap::Args;
use tracing::debug;

use crate::{cli::GlobalArgs, config::Config, error::Error, output, prompt, utils};

/// Input arguments for `init` command
#[derive(Args, Debug, Default)]
pub struct Init {}

impl Init {
  /// Generate a starter configuration file
  pub async fn initialize(&self, global: &GlobalArgs) -> Result<()> {
    let path = global.config_path()?;
    if path.exists() {
      return Err(Error::config(format!("you already had configuration file: {}", path.display())).into());
    }

    if let Some(dir) = path.parent() {
      if !dir.exists() {
        debug!("Creating {}", dir.display());
        fs::create_dir_all(dir)?;
      }
    }

    let name = prompt::input("Your base account (company email)")?;
    if name.is_empty() {
      return Err(anyhow!("input base account has been canceled"));
    }

    let rendered = serde_yaml::to_string(&vec![Config::initial(&name)])?;
    println!("{rendered}");

    if !prompt::confirm("Are you sure to generate configuration file?")? {
      return Err(anyhow!("initialization has been canceled"));
    }

    utils::write_new_file(rendered.as_bytes(), &path, Some(0o644))?;
    println!(
      "{}",
      output::blue(&format!(
        "New configuration file is successfully generated in {}",
        path.display()
      ))
    );

    Ok(())
  }
}
