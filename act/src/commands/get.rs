use anyhow::{anyhow, Result};
use aws_config::BehaviorVersion;
use clap::{Args, Subcommand};

use super::{choose, ConfigMode, Context};
use crate::{aws::rds, cli::GlobalArgs, config::Config, error::Error, output, utils};

/// Session duration of the role assumed to sign the database token
const TOKEN_SESSION_DURATION: i32 = 900;

/// Input arguments for `get` command
#[derive(Args, Debug)]
pub struct Get {
  #[command(subcommand)]
  pub command: GetCommands,
}

#[derive(Debug, Subcommand)]
pub enum GetCommands {
  /// Copy an IAM authentication token for an RDS endpoint to the clipboard
  #[command(visible_alias = "rt")]
  RdsToken(RdsToken),
}

#[derive(Args, Debug, Default)]
pub struct RdsToken {
  /// Environment listed under `databases`; chosen interactively when omitted
  pub env: Option<String>,
}

impl Get {
  pub async fn run(&self, global: &GlobalArgs) -> Result<()> {
    match &self.command {
      GetCommands::RdsToken(token) => token.copy(global).await,
    }
  }
}

/// Role configured for the environment
fn env_role(config: &Config, env: &str) -> Result<String> {
  match config.assume_roles.get(env) {
    Some(arn) if !arn.is_empty() => Ok(arn.to_owned()),
    _ => Err(Error::config("no assume role exists in config file").into()),
  }
}

/// Endpoint to use without prompting, if the environment leaves no choice
fn only_endpoint(endpoints: &[String], env: &str) -> Result<Option<String>> {
  match endpoints {
    [] => Err(Error::config(format!("no endpoints exist in configuration file for {env}")).into()),
    [endpoint] if endpoint.is_empty() => Err(Error::config("endpoint is empty").into()),
    [endpoint] => Ok(Some(endpoint.to_owned())),
    _ => Ok(None),
  }
}

impl RdsToken {
  pub async fn copy(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: true }).await?;
    let config = ctx.config()?;

    let env = match &self.env {
      Some(env) => env.to_owned(),
      None => {
        let envs: Vec<String> = config.databases.keys().cloned().collect();
        choose("Choose the environment", &envs, "choosing an environment has been canceled")?
      }
    };

    let role_arn = env_role(config, &env)?;
    let endpoints = config.databases.get(&env).cloned().unwrap_or_default();
    let endpoint = match only_endpoint(&endpoints, &env)? {
      Some(endpoint) => {
        println!("{}", output::blue(&format!("you have only one choice : {endpoint}")));
        endpoint
      }
      None => choose("Choose an instance", &endpoints, "choosing an instance has been canceled")?,
    };

    let mfa = ctx.mfa().await?;
    let creds = ctx
      .client
      .assume_role(&role_arn, &config.name, TOKEN_SESSION_DURATION, Some(&mfa))
      .await?;

    let region = ctx
      .sdk_config
      .region()
      .cloned()
      .ok_or_else(|| anyhow!("no region is configured"))?;
    let assumed = aws_config::defaults(BehaviorVersion::latest())
      .region(region)
      .credentials_provider(creds.into_provider())
      .load()
      .await;

    let token = rds::generate_db_auth_token(&assumed, &endpoint, config.db_port(), config.db_user()).await?;
    utils::copy_to_clipboard(&token)?;
    println!("{}", output::blue("RDS token copied to clipboard, please paste it."));

    Ok(())
  }
}
