use anstyle::{AnsiColor, Color, Style};
use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_s3::{
  config::{self, retry::RetryConfig},
  Client,
};
use clap::{builder::Styles, Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use tracing::debug;

/// Construct and return the S3 client
pub async fn get_client(config: &SdkConfig, retries: u32) -> Result<Client> {
  let client = Client::from_conf(
    config::Builder::from(config)
      .retry_config(RetryConfig::standard().with_max_attempts(retries))
      .build(),
  );

  Ok(client)
}

/// Succeeds when the caller is allowed to access the release bucket
pub async fn check_bucket(client: &Client, bucket: &str) -> Result<()> {
  debug!("Checking access to s3://{bucket}");

  client
    .head_bucket()
    .bucket(bucket)
    .send()
    .await
    .with_context(|| format!("you are not allowed to access the release bucket {bucket}"))?;

  Ok(())
}

/// Styles for CLI
fn get_styles() -> Styles {
  Styles::styled()
    .header(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Green))),
    )
    .literal(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
    .usage(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Green))),
    )
    .placeholder(
      Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
    )
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Verify the current credentials may publish a release
  CheckPermission(CheckPermission),
}

#[derive(Args, Debug)]
pub struct CheckPermission {
  /// Bucket the release artifacts are uploaded to
  #[arg(long, env = "ACT_RELEASE_BUCKET")]
  pub bucket: String,

  /// Region of the release bucket
  #[arg(long, default_value = act::DEFAULT_REGION)]
  pub region: String,
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn it_verifies_cli() {
    Cli::command().debug_assert();
  }

  #[test]
  fn it_defaults_region() {
    let cli = Cli::try_parse_from(["act-release", "check-permission", "--bucket", "releases"]).unwrap();
    let Commands::CheckPermission(check) = cli.command;

    assert_eq!(check.bucket, "releases");
    assert_eq!(check.region, act::DEFAULT_REGION);
  }
}
