use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use tracing::{info, warn};

use super::{ConfigMode, Context};
use crate::{
  aws::{
    self,
    iam::{AccessKeyInfo, NewAccessKey},
  },
  cli::GlobalArgs,
  credentials::{self, CredentialsFile},
  output,
};

/// IAM allows at most this many access keys per user
const MAX_ACCESS_KEYS: usize = 2;

/// Access key operations needed to rotate a user's credentials
///
/// Trait wrapper to support testing
#[async_trait]
pub trait AccessKeyManager {
  async fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyInfo>>;
  async fn create_access_key(&self, user: &str) -> Result<NewAccessKey>;
  async fn delete_access_key(&self, user: &str, access_key_id: &str) -> Result<()>;
}

#[async_trait]
impl AccessKeyManager for aws::Client {
  async fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyInfo>> {
    aws::Client::list_access_keys(self, user).await
  }

  async fn create_access_key(&self, user: &str) -> Result<NewAccessKey> {
    aws::Client::create_access_key(self, user).await
  }

  async fn delete_access_key(&self, user: &str, access_key_id: &str) -> Result<()> {
    aws::Client::delete_access_key(self, user, access_key_id).await
  }
}

/// Replace `current` with a newly issued access key
///
/// When the user already holds the maximum number of keys the current key is deleted first;
/// otherwise the old key is deleted only after `persist` stored the new one.
/// Any failure aborts the rotation as is.
pub async fn rotate_access_key<M, F>(manager: &M, user: &str, current: &str, persist: F) -> Result<NewAccessKey>
where
  M: AccessKeyManager + Sync,
  F: FnOnce(&NewAccessKey) -> Result<()>,
{
  let keys = manager.list_access_keys(user).await?;
  info!("you have {} access key(s)", keys.len());

  let deleted_first = keys.len() >= MAX_ACCESS_KEYS;
  if deleted_first {
    warn!("delete current access key {current} because you already have two credentials");
    manager.delete_access_key(user, current).await?;
  }

  info!("creating new credential for {user}");
  let created = manager.create_access_key(user).await?;
  info!("new credential {} is successfully created", created.access_key_id);

  persist(&created)?;

  if !deleted_first {
    info!("deleting old credential: {current}");
    manager.delete_access_key(user, current).await?;
    info!("old credential is successfully deleted");
  }

  Ok(created)
}

/// Input arguments for `renew-credential` command
#[derive(Args, Debug, Default)]
pub struct RenewCredential {}

impl RenewCredential {
  pub async fn renew(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: false }).await?;
    let config = ctx.config()?;

    let mfa = ctx.mfa().await?;
    ctx.client.get_session_token(&mfa).await?;

    let path = credentials::default_path()?;
    info!("reading current credentials in {}", path.display());
    let mut creds = CredentialsFile::load(&path)?;

    info!("checking current profile: {}", config.profile);
    let current = creds.access_key_id(&config.profile)?;
    info!("your current access key is: {current}");

    rotate_access_key(&ctx.client, &config.name, &current, |created| {
      info!("saving new credential for {}", config.profile);
      creds.set_access_key(&config.profile, &created.access_key_id, &created.secret_access_key);
      creds.save()?;
      info!("new credential for {} is successfully changed", config.profile);
      Ok(())
    })
    .await?;

    println!("{}", output::green("renew credentials are successfully done"));

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use anyhow::anyhow;

  use super::*;

  struct MockIam {
    keys: Vec<String>,
    calls: Mutex<Vec<String>>,
  }

  impl MockIam {
    fn new(keys: &[&str]) -> Self {
      MockIam {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        calls: Mutex::new(Vec::new()),
      }
    }

    fn record(&self, call: String) {
      self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl AccessKeyManager for MockIam {
    async fn list_access_keys(&self, _user: &str) -> Result<Vec<AccessKeyInfo>> {
      self.record("list".to_string());
      Ok(
        self
          .keys
          .iter()
          .map(|k| AccessKeyInfo {
            access_key_id: k.to_owned(),
            create_date: None,
          })
          .collect(),
      )
    }

    async fn create_access_key(&self, _user: &str) -> Result<NewAccessKey> {
      self.record("create".to_string());
      Ok(NewAccessKey {
        access_key_id: "AKIANEW".to_string(),
        secret_access_key: "new-secret".to_string(),
      })
    }

    async fn delete_access_key(&self, _user: &str, access_key_id: &str) -> Result<()> {
      self.record(format!("delete {access_key_id}"));
      Ok(())
    }
  }

  #[tokio::test]
  async fn it_deletes_before_create_with_two_keys() {
    let iam = MockIam::new(&["AKIAOLD", "AKIAOTHER"]);
    let persisted = Mutex::new(Vec::new());

    let created = rotate_access_key(&iam, "dev", "AKIAOLD", |key| {
      iam.record("persist".to_string());
      persisted.lock().unwrap().push(key.access_key_id.clone());
      Ok(())
    })
    .await
    .unwrap();

    assert_eq!(created.access_key_id, "AKIANEW");
    assert_eq!(iam.calls(), vec!["list", "delete AKIAOLD", "create", "persist"]);
    assert_eq!(persisted.lock().unwrap().as_slice(), ["AKIANEW"]);
  }

  #[tokio::test]
  async fn it_creates_and_persists_before_delete_with_one_key() {
    let iam = MockIam::new(&["AKIAOLD"]);

    rotate_access_key(&iam, "dev", "AKIAOLD", |_| {
      iam.record("persist".to_string());
      Ok(())
    })
    .await
    .unwrap();

    assert_eq!(iam.calls(), vec!["list", "create", "persist", "delete AKIAOLD"]);
  }

  #[tokio::test]
  async fn it_keeps_old_key_when_persist_fails() {
    let iam = MockIam::new(&["AKIAOLD"]);

    let result = rotate_access_key(&iam, "dev", "AKIAOLD", |_| Err(anyhow!("disk full"))).await;

    assert_eq!(result.unwrap_err().to_string(), "disk full");
    assert_eq!(iam.calls(), vec!["list", "create"]);
  }
}
