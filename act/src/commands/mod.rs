pub mod assume;
pub mod ecr_login;
pub mod get;
pub mod init;
pub mod loadtest;
pub mod maintenance;
pub mod renew;
pub mod setup;
pub mod waf;
pub mod who;

use anyhow::{anyhow, Result};
use aws_config::SdkConfig;
use tracing::debug;

use crate::{
  aws::{
    self,
    iam::AccessKeyInfo,
    sts::{self, Mfa},
  },
  cli::GlobalArgs,
  config::{self, Config},
  credentials::{self, CredentialsFile},
  error::Error,
  prompt, utils,
};

/// Access keys older than this must be rotated
pub const ACCESS_KEY_MAX_AGE_SECS: i64 = 180 * 24 * 60 * 60;

const KEY_EXPIRED_MSG: &str = r#"your access key is expired. please renew by running "act renew-credential""#;
const KEY_NOT_FOUND_MSG: &str = "your access key configuration is wrong";

/// How much of the local configuration a command needs before it runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigMode {
  /// No configuration; credentials come from the default provider chain
  Skip,
  /// Read the selected entry, keeping the process environment as is
  ReadOnly,
  /// Act as the base profile: read the entry, take credentials from the
  /// profile's shared credentials file and optionally verify the key's age
  Base { check_key_age: bool },
}

/// Everything a command needs to talk to AWS on behalf of the selected profile
pub struct Context {
  config: Option<Config>,
  pub sdk_config: SdkConfig,
  pub client: aws::Client,
}

impl Context {
  pub async fn new(global: &GlobalArgs, mode: ConfigMode) -> Result<Self> {
    let config = match mode {
      ConfigMode::Skip => None,
      ConfigMode::ReadOnly => Some(config::load(&global.config_path()?, &global.profile)?),
      ConfigMode::Base { .. } => Some(config::load(&global.config_path()?, &global.profile)?),
    };

    let profile = match mode {
      ConfigMode::Base { .. } => config.as_ref().map(|c| c.profile.as_str()),
      _ => None,
    };
    let sdk_config = crate::get_sdk_config(global.region.clone(), profile).await?;
    let client = aws::Client::new(&sdk_config);

    let ctx = Context {
      config,
      sdk_config,
      client,
    };

    if let ConfigMode::Base { check_key_age: true } = mode {
      ctx.check_access_key_age().await?;
    }

    Ok(ctx)
  }

  pub fn config(&self) -> Result<&Config> {
    self
      .config
      .as_ref()
      .ok_or_else(|| Error::config("you have no configuration setting").into())
  }

  /// Fail when the access key of the current profile is missing or too old
  async fn check_access_key_age(&self) -> Result<()> {
    let config = self.config()?;
    let creds = CredentialsFile::load(&credentials::default_path()?)?;
    let current = creds.access_key_id(&config.profile)?;
    let keys = self.client.list_access_keys(&config.name).await?;

    check_key_age(&keys, &current, utils::now_secs())
  }

  /// Serial number of the MFA device registered for the configured user
  pub async fn mfa_serial(&self) -> Result<String> {
    let config = self.config()?;
    let base = match &config.mfa_serial_base {
      Some(base) => base.to_owned(),
      None => {
        let identity = self.client.get_caller_identity().await?;
        format!("arn:aws:iam::{}:mfa", identity.account)
      }
    };

    Ok(sts::mfa_serial_number(&base, &config.name))
  }

  /// Prompt for the current MFA token code
  pub async fn mfa(&self) -> Result<Mfa> {
    let serial_number = self.mfa_serial().await?;
    debug!("Using MFA device {serial_number}");

    Ok(Mfa {
      serial_number,
      token_code: prompt::mfa_token()?,
    })
  }
}

/// Verify that `current` belongs to the user and is younger than the max age
pub fn check_key_age(keys: &[AccessKeyInfo], current: &str, now: i64) -> Result<()> {
  let key = keys
    .iter()
    .find(|k| k.access_key_id == current)
    .ok_or_else(|| Error::config(KEY_NOT_FOUND_MSG))?;

  match key.create_date {
    Some(created) if utils::is_expired(created, now, ACCESS_KEY_MAX_AGE_SECS) => {
      Err(Error::config(KEY_EXPIRED_MSG).into())
    }
    _ => {
      debug!("Access key {current} is not expired");
      Ok(())
    }
  }
}

/// Ask the user to pick one of `items`, failing with `canceled` when dismissed
pub(crate) fn choose(message: &str, items: &[String], canceled: &str) -> Result<String> {
  if items.is_empty() {
    return Err(anyhow!("there is nothing to choose from"));
  }

  match prompt::select(message, items)? {
    Some(index) => Ok(items[index].to_owned()),
    None => Err(anyhow!("{canceled}")),
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;

  const NOW: i64 = 1_700_000_000;
  const DAY: i64 = 24 * 60 * 60;

  fn keys() -> Vec<AccessKeyInfo> {
    vec![
      AccessKeyInfo {
        access_key_id: "AKIAFRESH".to_string(),
        create_date: Some(NOW - 10 * DAY),
      },
      AccessKeyInfo {
        access_key_id: "AKIASTALE".to_string(),
        create_date: Some(NOW - 181 * DAY),
      },
      AccessKeyInfo {
        access_key_id: "AKIAUNDATED".to_string(),
        create_date: None,
      },
    ]
  }

  #[rstest]
  #[case("AKIAFRESH", None)]
  #[case("AKIAUNDATED", None)]
  #[case("AKIASTALE", Some(KEY_EXPIRED_MSG))]
  #[case("AKIAMISSING", Some(KEY_NOT_FOUND_MSG))]
  fn it_checks_access_key_age(#[case] current: &str, #[case] expected: Option<&str>) {
    let result = check_key_age(&keys(), current, NOW);
    match expected {
      None => assert!(result.is_ok()),
      Some(msg) => assert_eq!(result.unwrap_err().downcast_ref::<Error>(), Some(&Error::config(msg))),
    }
  }

  #[test]
  fn it_accepts_key_at_max_age() {
    let keys = vec![AccessKeyInfo {
      access_key_id: "AKIAEDGE".to_string(),
      create_date: Some(NOW - 180 * DAY),
    }];
    assert!(check_key_age(&keys, "AKIAEDGE", NOW).is_ok());
  }
}
