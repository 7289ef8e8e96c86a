use anyhow::{anyhow, Result};
use aws_config::SdkConfig;
use aws_sdk_rds::auth_token::{AuthTokenGenerator, Config as AuthTokenConfig};
use tracing::debug;

use super::{owned, Client};

/// Generate an IAM database authentication token
///
/// The token is signed with the credentials of `config`, which is typically built from the
/// credentials of an assumed role.
pub async fn generate_db_auth_token(config: &SdkConfig, hostname: &str, port: u16, user: &str) -> Result<String> {
  debug!("Generating auth token for {user}@{hostname}:{port}");

  let generator = AuthTokenGenerator::new(
    AuthTokenConfig::builder()
      .hostname(hostname)
      .port(u64::from(port))
      .username(user)
      .build()
      .map_err(|e| anyhow!("invalid auth token configuration: {e}"))?,
  );

  let token = generator
    .auth_token(config)
    .await
    .map_err(|e| anyhow!("failed to generate auth token for {hostname}: {e}"))?;

  Ok(token.as_str().to_owned())
}

impl Client {
  /// Start an Aurora cluster, returning its status
  pub async fn start_db_cluster(&self, cluster_id: &str) -> Result<String> {
    let response = self
      .rds
      .start_db_cluster()
      .db_cluster_identifier(cluster_id)
      .send()
      .await?;

    Ok(response.db_cluster().map(|c| owned(c.status())).unwrap_or_default())
  }

  /// Stop an Aurora cluster, returning its status
  pub async fn stop_db_cluster(&self, cluster_id: &str) -> Result<String> {
    let response = self
      .rds
      .stop_db_cluster()
      .db_cluster_identifier(cluster_id)
      .send()
      .await?;

    Ok(response.db_cluster().map(|c| owned(c.status())).unwrap_or_default())
  }

  pub async fn db_cluster_status(&self, cluster_id: &str) -> Result<String> {
    let response = self
      .rds
      .describe_db_clusters()
      .db_cluster_identifier(cluster_id)
      .send()
      .await?;

    let cluster = response
      .db_clusters()
      .first()
      .ok_or_else(|| anyhow!("DB cluster not found: {cluster_id}"))?;

    Ok(owned(cluster.status()))
  }
}
