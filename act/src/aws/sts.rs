use anyhow::{anyhow, Result};
use aws_sdk_sts::{
  primitives::{DateTime, DateTimeFormat},
  types::Credentials,
};
use tracing::debug;

use super::{owned, Client};

/// Result of `sts:GetCallerIdentity`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerIdentity {
  pub account: String,
  pub arn: String,
  pub user_id: String,
}

/// MFA device serial number and the current token code from that device
#[derive(Clone, Debug)]
pub struct Mfa {
  pub serial_number: String,
  pub token_code: String,
}

/// Temporary credentials returned from assuming a role
#[derive(Clone, Debug)]
pub struct AssumedCredentials {
  pub access_key_id: String,
  pub secret_access_key: String,
  pub session_token: String,
  pub expiration: Option<DateTime>,
}

impl AssumedCredentials {
  /// Shell `export` statements for the credentials
  pub fn exports(&self) -> String {
    format!(
      "export AWS_ACCESS_KEY_ID={}\nexport AWS_SECRET_ACCESS_KEY={}\nexport AWS_SESSION_TOKEN={}\n",
      self.access_key_id, self.secret_access_key, self.session_token
    )
  }

  /// Expiration rendered as an RFC 3339 timestamp
  pub fn expires_at(&self) -> String {
    self
      .expiration
      .as_ref()
      .and_then(|exp| exp.fmt(DateTimeFormat::DateTime).ok())
      .unwrap_or_else(|| "unknown".to_string())
  }

  /// Convert into a static credentials provider usable by other SDK clients
  pub fn into_provider(self) -> aws_sdk_sts::config::Credentials {
    aws_sdk_sts::config::Credentials::new(
      self.access_key_id,
      self.secret_access_key,
      Some(self.session_token),
      None,
      "act-assume-role",
    )
  }
}

impl From<&Credentials> for AssumedCredentials {
  fn from(creds: &Credentials) -> Self {
    let expiration: Option<&DateTime> = creds.expiration().into();

    AssumedCredentials {
      access_key_id: owned(creds.access_key_id()),
      secret_access_key: owned(creds.secret_access_key()),
      session_token: owned(creds.session_token()),
      expiration: expiration.cloned(),
    }
  }
}

/// MFA device serial number for the given IAM user
pub fn mfa_serial_number(base: &str, user: &str) -> String {
  format!("{}/{user}", base.trim_end_matches('/'))
}

impl Client {
  pub async fn get_caller_identity(&self) -> Result<CallerIdentity> {
    let response = self.sts.get_caller_identity().send().await?;

    Ok(CallerIdentity {
      account: owned(response.account()),
      arn: owned(response.arn()),
      user_id: owned(response.user_id()),
    })
  }

  /// Assume the role, optionally authenticating the request with MFA
  pub async fn assume_role(
    &self,
    role_arn: &str,
    session_name: &str,
    duration_seconds: i32,
    mfa: Option<&Mfa>,
  ) -> Result<AssumedCredentials> {
    debug!("Assuming role {role_arn} as {session_name} for {duration_seconds}s");

    let mut request = self
      .sts
      .assume_role()
      .role_arn(role_arn)
      .role_session_name(session_name)
      .duration_seconds(duration_seconds);

    if let Some(mfa) = mfa {
      request = request.serial_number(&mfa.serial_number).token_code(&mfa.token_code);
    }

    let response = request.send().await?;
    let creds = response
      .credentials()
      .ok_or_else(|| anyhow!("AssumeRole returned no credentials for {role_arn}"))?;

    Ok(AssumedCredentials::from(creds))
  }

  /// Validate an MFA token code by requesting a session token with it
  pub async fn get_session_token(&self, mfa: &Mfa) -> Result<()> {
    self
      .sts
      .get_session_token()
      .serial_number(&mfa.serial_number)
      .token_code(&mfa.token_code)
      .send()
      .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_renders_exports() {
    let creds = AssumedCredentials {
      access_key_id: "AKIA".to_string(),
      secret_access_key: "secret".to_string(),
      session_token: "token".to_string(),
      expiration: Some(DateTime::from_secs(0)),
    };

    assert_eq!(
      creds.exports(),
      "export AWS_ACCESS_KEY_ID=AKIA\nexport AWS_SECRET_ACCESS_KEY=secret\nexport AWS_SESSION_TOKEN=token\n"
    );
    assert_eq!(creds.expires_at(), "1970-01-01T00:00:00Z");
  }

  #[test]
  fn it_builds_mfa_serial_number() {
    assert_eq!(
      mfa_serial_number("arn:aws:iam::123456789012:mfa", "dev@example.com"),
      "arn:aws:iam::123456789012:mfa/dev@example.com"
    );
    assert_eq!(
      mfa_serial_number("arn:aws:iam::123456789012:mfa/", "dev"),
      "arn:aws:iam::123456789012:mfa/dev"
    );
  }
}
