use anyhow::Result;
use clap::Args;

use super::{choose, ConfigMode, Context};
use crate::{cli::GlobalArgs, output, utils};

/// Input arguments for `setup` command
#[derive(Args, Debug, Default)]
pub struct Setup {
  /// Account or alias to assume; chosen interactively when omitted
  pub target: Option<String>,

  /// Session duration in seconds, overriding the configured duration
  #[arg(short, long)]
  pub duration: Option<i32>,

  /// Print the export statements instead of copying them to the clipboard
  #[arg(long)]
  pub raw_output: bool,
}

impl Setup {
  pub async fn assume(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: true }).await?;
    let config = ctx.config()?;

    let target = match &self.target {
      Some(target) => target.to_owned(),
      None => choose(
        "Choose the environment",
        &config.role_names(),
        "get assume target has been canceled",
      )?,
    };

    let role_arn = config.resolve_role(&target)?;
    let duration = config.session_duration(self.duration);
    let creds = ctx.client.assume_role(&role_arn, &config.name, duration, None).await?;

    if self.raw_output {
      print!("{}", creds.exports());
      return Ok(());
    }

    utils::copy_to_clipboard(&creds.exports())?;
    println!("{}", output::red(&format!("Current token expired at: {}", creds.expires_at())));
    println!(
      "{}",
      output::blue("Assume Credentials copied to clipboard, please paste it.")
    );

    Ok(())
  }
}
