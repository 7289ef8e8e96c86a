//! YAML configuration holding one entry per base profile
//!
//! The file is a list of entries; the entry whose `profile` matches `--profile` is used.
use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// Assume role session duration in seconds used when the entry sets none
pub const DEFAULT_DURATION: i32 = 7200;

/// Port the RDS proxies listen on when the entry sets none
pub const DEFAULT_DATABASE_PORT: u16 = 3310;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// `~/.aws`, the directory holding the configuration and shared credentials
pub fn aws_dir() -> Result<PathBuf> {
  let home = dirs::home_dir().ok_or_else(|| Error::config("unable to determine the home directory"))?;
  Ok(home.join(".aws"))
}

pub fn default_path() -> Result<PathBuf> {
  Ok(aws_dir()?.join(CONFIG_FILE_NAME))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub profile: String,

  /// IAM user of the base account, usually an email address
  #[serde(default)]
  pub name: String,

  #[serde(default)]
  pub duration: i32,

  #[serde(default)]
  pub alias: BTreeMap<String, String>,

  #[serde(default)]
  pub assume_roles: BTreeMap<String, String>,

  #[serde(default)]
  pub databases: BTreeMap<String, Vec<String>>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mfa_serial_base: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database_port: Option<u16>,

  #[serde(default, skip_serializing_if = "Maintenance::is_empty")]
  pub maintenance: Maintenance,

  #[serde(default, skip_serializing_if = "Loadtest::is_empty")]
  pub loadtest: Loadtest,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
  #[serde(default)]
  pub message: String,

  #[serde(default)]
  pub arns: Vec<LoadBalancerTarget>,
}

impl Maintenance {
  fn is_empty(&self) -> bool {
    self.message.is_empty() && self.arns.is_empty()
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerTarget {
  pub loadbalancer_arn: String,
}

/// Resources toggled together for load testing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadtest {
  /// Aurora cluster identifiers
  #[serde(default)]
  pub rds: Vec<String>,

  /// Fragments of Auto Scaling group names
  #[serde(default)]
  pub asg: Vec<String>,
}

impl Loadtest {
  fn is_empty(&self) -> bool {
    self.rds.is_empty() && self.asg.is_empty()
  }
}

/// Parse every entry of the configuration file
pub fn read_all(path: &Path) -> Result<Vec<Config>> {
  if !path.exists() {
    return Err(Error::config(format!("no configuration file exists in {}", path.display())).into());
  }

  let contents = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let configs: Vec<Config> =
    serde_yaml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;

  Ok(configs)
}

/// Pick the entry for `profile`, applying defaults
pub fn select(configs: Vec<Config>, profile: &str) -> Result<Config> {
  let mut config = configs
    .into_iter()
    .find(|c| c.profile == profile)
    .ok_or_else(|| Error::config(format!("profile does not exist: {profile}")))?;

  if config.duration == 0 {
    config.duration = DEFAULT_DURATION;
  }

  Ok(config)
}

/// Read the configuration file and select the entry for `profile`
pub fn load(path: &Path, profile: &str) -> Result<Config> {
  debug!("Loading profile {profile} from {}", path.display());
  select(read_all(path)?, profile)
}

impl Config {
  /// Starter configuration written by `act init`
  pub fn initial(name: &str) -> Self {
    let placeholders = ["preprod", "prod"];

    Config {
      profile: crate::DEFAULT_PROFILE.to_string(),
      name: name.to_string(),
      duration: 3600,
      assume_roles: placeholders.iter().map(|k| (k.to_string(), String::new())).collect(),
      databases: placeholders.iter().map(|k| (k.to_string(), vec![String::new()])).collect(),
      ..Default::default()
    }
  }

  /// Resolve a target name to a role ARN, checking aliases before role names
  ///
  /// An alias pointing at a missing or empty role falls back to the role named `target`.
  pub fn resolve_role(&self, target: &str) -> Result<String> {
    let registered = |key: &str| self.assume_roles.get(key).filter(|arn| !arn.is_empty());

    self
      .alias
      .get(target)
      .and_then(|key| registered(key))
      .or_else(|| registered(target))
      .map(String::to_owned)
      .ok_or_else(|| Error::config(format!("{target} is not registered in the assume list")).into())
  }

  /// Role names, sorted
  pub fn role_names(&self) -> Vec<String> {
    self.assume_roles.keys().cloned().collect()
  }

  /// Duration flag wins over the configured duration
  pub fn session_duration(&self, overridden: Option<i32>) -> i32 {
    match overridden {
      Some(duration) if duration > 0 => duration,
      _ if self.duration > 0 => self.duration,
      _ => DEFAULT_DURATION,
    }
  }

  /// Database user derived from the account name (the part before `@`)
  pub fn db_user(&self) -> &str {
    self.name.split('@').next().unwrap_or(&self.name)
  }

  pub fn db_port(&self) -> u16 {
    self.database_port.unwrap_or(DEFAULT_DATABASE_PORT)
  }
}
