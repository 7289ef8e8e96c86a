use anyhow::{anyhow, Result};
use aws_sdk_iam::{primitives::DateTime, types::AccessKey};

use super::{owned, Client};

/// Metadata of an access key that belongs to an IAM user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessKeyInfo {
  pub access_key_id: String,
  /// Creation time in seconds since the Unix epoch
  pub create_date: Option<i64>,
}

/// Newly issued access key pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAccessKey {
  pub access_key_id: String,
  pub secret_access_key: String,
}

impl Client {
  /// List all access keys of the user
  pub async fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyInfo>> {
    let response = self.iam.list_access_keys().user_name(user).send().await?;

    let keys = response
      .access_key_metadata()
      .iter()
      .map(|meta| {
        let created: Option<&DateTime> = meta.create_date().into();
        AccessKeyInfo {
          access_key_id: owned(meta.access_key_id()),
          create_date: created.map(|c| c.secs()),
        }
      })
      .collect();

    Ok(keys)
  }

  /// Create a new access key pair for the user
  pub async fn create_access_key(&self, user: &str) -> Result<NewAccessKey> {
    let response = self.iam.create_access_key().user_name(user).send().await?;
    let key: Option<&AccessKey> = response.access_key().into();
    let key = key.ok_or_else(|| anyhow!("CreateAccessKey returned no access key for {user}"))?;

    Ok(NewAccessKey {
      access_key_id: owned(key.access_key_id()),
      secret_access_key: owned(key.secret_access_key()),
    })
  }

  pub async fn delete_access_key(&self, user: &str, access_key_id: &str) -> Result<()> {
    self
      .iam
      .delete_access_key()
      .user_name(user)
      .access_key_id(access_key_id)
      .send()
      .await?;

    Ok(())
  }
}
