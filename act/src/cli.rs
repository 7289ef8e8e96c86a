use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

use crate::{commands, config, DEFAULT_PROFILE};

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[command(flatten)]
  pub global: GlobalArgs,

  #[clap(flatten)]
  pub verbose: Verbosity,
}

/// Flags shared by every subcommand
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
  /// Profile entry of the configuration file to use
  #[arg(short, long, global = true, default_value = DEFAULT_PROFILE)]
  pub profile: String,

  /// AWS region, defaults to `AWS_DEFAULT_REGION` or ap-northeast-2
  #[arg(short, long, global = true)]
  pub region: Option<String>,

  /// Path of the configuration file, defaults to ~/.aws/config.yaml
  #[arg(long, global = true, env = "ACT_CONFIG")]
  pub config: Option<PathBuf>,

  /// Disable colored output
  #[arg(long, global = true)]
  pub no_color: bool,
}

impl GlobalArgs {
  pub fn config_path(&self) -> Result<PathBuf> {
    match &self.config {
      Some(path) => Ok(path.to_owned()),
      None => config::default_path(),
    }
  }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Generate a starter configuration file
  Init(commands::init::Init),

  /// Assume a role and copy its credentials to the clipboard
  Setup(commands::setup::Setup),

  /// Show the identity of the current credentials
  Who(commands::who::Who),

  /// Inspect the accounts registered for assuming
  Assume(commands::assume::Assume),

  /// Get temporary tokens
  Get(commands::get::Get),

  /// Rotate the access key of the current profile
  RenewCredential(commands::renew::RenewCredential),

  /// Show the rules and IP sets of a WAF web ACL
  #[command(visible_alias = "dwa")]
  DescribeWebAcl(commands::waf::DescribeWebAcl),

  /// Check whether addresses are registered in a WAF web ACL
  HasIp(commands::waf::HasIp),

  /// Copy a `docker login` command for the account's ECR registry to the clipboard
  EcrLogin(commands::ecr_login::EcrLogin),

  /// Toggle the maintenance response of the configured load balancers
  Maintenance(commands::maintenance::Maintenance),

  /// Start, stop or inspect the load test resources
  Loadtest(commands::loadtest::Loadtest),

  /// Print the version
  #[command(visible_alias = "v")]
  Version,
}

#[cfg(test)]
mod tests {
  use std::fs;

  use assert_cmd::prelude::*;
  use clap::CommandFactory;
  use rstest::*;

  use super::*;

  fn act() -> std::process::Command {
    let bin_under_test = escargot::CargoBuild::new()
      .bin("act")
      .current_release()
      .current_target()
      .run()
      .unwrap();

    let mut cmd = bin_under_test.command();
    cmd.env_remove("ACT_CONFIG").arg("--no-color");
    cmd
  }

  #[test]
  fn it_verifies_cli() {
    Cli::command().debug_assert();
  }

  #[test]
  fn it_parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["act", "setup", "prod", "-p", "ops", "--raw-output", "--duration", "900"]).unwrap();

    assert_eq!(cli.global.profile, "ops");
    match cli.command {
      Commands::Setup(setup) => {
        assert_eq!(setup.target.as_deref(), Some("prod"));
        assert_eq!(setup.duration, Some(900));
        assert!(setup.raw_output);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[rstest]
  #[case(&["act", "dwa", "acl-1"])]
  #[case(&["act", "v"])]
  #[case(&["act", "get", "rt", "prod"])]
  #[case(&["act", "has-ip", "10.0.0.1", "10.0.0.2/32", "--acl", "acl-1"])]
  fn it_parses_aliases_and_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_ok());
  }

  #[test]
  fn it_requires_an_address_for_has_ip() {
    assert!(Cli::try_parse_from(["act", "has-ip"]).is_err());
  }

  #[rstest]
  #[case("10.10.10", "wrong IP address: 10.10.10")]
  #[case("10.10.10.10/40", "cidr base should be between 0 and 32: 10.10.10.10/40")]
  fn it_rejects_invalid_address_before_aws_access(#[case] ip: &str, #[case] expected: &str) {
    let mut cmd = act();
    cmd.arg("has-ip").arg(ip);

    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains(expected), "unexpected stderr: {stderr}");
  }

  #[test]
  fn it_prints_version() {
    let mut cmd = act();
    cmd.arg("version");

    cmd
      .assert()
      .success()
      .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
  }

  #[test]
  fn it_refuses_to_overwrite_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "- profile: default\n  name: dev\n").unwrap();

    let mut cmd = act();
    cmd.arg("init").arg("--config").arg(&path);

    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("you already had configuration file"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "- profile: default\n  name: dev\n");
  }
}
