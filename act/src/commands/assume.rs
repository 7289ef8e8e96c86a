use anyhow::Result;
use clap::{Args, Subcommand};

use super::{ConfigMode, Context};
use crate::{cli::GlobalArgs, config::Config, output};

/// Input arguments for `assume` command
#[derive(Args, Debug)]
pub struct Assume {
  #[command(subcommand)]
  pub command: AssumeCommands,
}

#[derive(Debug, Subcommand)]
pub enum AssumeCommands {
  /// List the accounts registered for assuming
  List,
}

fn header(config: &Config) -> String {
  format!("[ name: {}, profile: {} ] Account List", config.name, config.profile)
}

impl Assume {
  pub async fn run(&self, global: &GlobalArgs) -> Result<()> {
    match self.command {
      AssumeCommands::List => self.list(global).await,
    }
  }

  async fn list(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: true }).await?;
    let config = ctx.config()?;

    println!("{}", output::blue(&header(config)));
    for name in config.role_names() {
      println!("{name}");
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_renders_header() {
    let config = Config {
      profile: "default".to_string(),
      name: "dev@example.com".to_string(),
      ..Default::default()
    };

    assert_eq!(header(&config), "[ name: dev@example.com, profile: default ] Account List");
  }
}
