use anyhow::Result;

use super::{owned, Client};
use crate::error::Error;

/// Base64 encoded `user:password` token and the registry it is valid for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcrAuthorization {
  pub token: String,
  pub proxy_endpoint: String,
}

impl Client {
  /// Retrieve the registry authorization token
  pub async fn get_authorization_token(&self) -> Result<EcrAuthorization> {
    let response = self.ecr.get_authorization_token().send().await?;

    let data = response
      .authorization_data()
      .first()
      .ok_or_else(|| Error::config("there is no authorization data"))?;

    Ok(EcrAuthorization {
      token: owned(data.authorization_token()),
      proxy_endpoint: owned(data.proxy_endpoint()),
    })
  }
}
