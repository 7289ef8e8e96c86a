use std::{
  env,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ini::Ini;

use crate::{config, error::Error};

const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";

/// Location of the shared credentials file, honoring `AWS_SHARED_CREDENTIALS_FILE`
pub fn default_path() -> Result<PathBuf> {
  match env::var("AWS_SHARED_CREDENTIALS_FILE") {
    Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
    _ => Ok(config::aws_dir()?.join("credentials")),
  }
}

/// AWS shared credentials file (INI)
#[derive(Debug)]
pub struct CredentialsFile {
  path: PathBuf,
  ini: Ini,
}

impl CredentialsFile {
  pub fn load(path: &Path) -> Result<Self> {
    let ini = Ini::load_from_file(path).with_context(|| format!("failed to read credentials {}", path.display()))?;

    Ok(CredentialsFile {
      path: path.to_path_buf(),
      ini,
    })
  }

  /// Access key id configured for `profile`
  pub fn access_key_id(&self, profile: &str) -> Result<String> {
    let section = self
      .ini
      .section(Some(profile))
      .ok_or_else(|| Error::config(format!("profile does not exist in credentials: {profile}")))?;

    section
      .get(ACCESS_KEY_ID)
      .map(str::to_owned)
      .ok_or_else(|| Error::config(format!("{ACCESS_KEY_ID} is not set for profile {profile}")).into())
  }

  /// Replace the key pair of `profile`, leaving every other entry untouched
  pub fn set_access_key(&mut self, profile: &str, access_key_id: &str, secret_access_key: &str) {
    self.ini.set_to(Some(profile), ACCESS_KEY_ID.to_string(), access_key_id.to_string());
    self
      .ini
      .set_to(Some(profile), SECRET_ACCESS_KEY.to_string(), secret_access_key.to_string());
  }

  pub fn save(&self) -> Result<()> {
    self
      .ini
      .write_to_file(&self.path)
      .with_context(|| format!("failed to write credentials {}", self.path.display()))
  }
}
