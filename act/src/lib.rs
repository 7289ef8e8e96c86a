pub mod aws;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod output;
pub mod prompt;
pub mod utils;

use std::env;

use anyhow::Result;
use aws_config::{
  meta::region::RegionProviderChain,
  profile::{profile_file::ProfileFiles, ProfileFileCredentialsProvider},
  BehaviorVersion, SdkConfig,
};
use aws_types::region::Region;
pub use cli::{Cli, Commands};

/// Region used when neither `--region` nor the environment provides one
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Shared credentials profile used when `--profile` is not provided
pub const DEFAULT_PROFILE: &str = "default";

/// Get the configuration to authn/authz with AWS that will be used across AWS clients
///
/// When `profile` is provided, credentials are read from that shared credentials profile only;
/// exported `AWS_*` credential variables are ignored.
pub async fn get_sdk_config(region: Option<String>, profile: Option<&str>) -> Result<SdkConfig> {
  let aws_region = match region {
    Some(region) => Some(Region::new(region)),
    None => env::var("AWS_DEFAULT_REGION").ok().map(Region::new),
  };

  let region_provider = RegionProviderChain::first_try(aws_region).or_else(Region::new(DEFAULT_REGION));

  let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
  if let Some(profile) = profile {
    loader = loader
      .profile_name(profile)
      .credentials_provider(profile_credentials(profile, None));
  }

  Ok(loader.load().await)
}

/// Credentials of a shared credentials profile, read from `files` or the default locations
fn profile_credentials(profile: &str, files: Option<ProfileFiles>) -> ProfileFileCredentialsProvider {
  let mut builder = ProfileFileCredentialsProvider::builder().profile_name(profile);
  if let Some(files) = files {
    builder = builder.profile_files(files);
  }

  builder.build()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use aws_config::profile::profile_file::ProfileFileKind;
  use aws_credential_types::provider::ProvideCredentials;

  use super::*;

  #[tokio::test]
  async fn it_reads_credentials_of_the_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials");
    fs::write(
      &path,
      "[default]\naws_access_key_id = AKIADEFAULT\naws_secret_access_key = default-secret\n\n\
       [base]\naws_access_key_id = AKIABASE\naws_secret_access_key = base-secret\n",
    )
    .unwrap();

    let files = ProfileFiles::builder()
      .with_file(ProfileFileKind::Credentials, path.clone())
      .build();
    let creds = profile_credentials("base", Some(files))
      .provide_credentials()
      .await
      .unwrap();

    assert_eq!(creds.access_key_id(), "AKIABASE");
    assert_eq!(creds.secret_access_key(), "base-secret");
    assert_eq!(creds.session_token(), None);
  }
}
