use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use clap::Args;

use super::{ConfigMode, Context};
use crate::{cli::GlobalArgs, output, utils};

/// Input arguments for `ecr-login` command
#[derive(Args, Debug, Default)]
pub struct EcrLogin {}

/// Split a decoded `user:password` registry token
fn login_from_token(token: &str) -> Result<(&str, &str)> {
  let parts: Vec<&str> = token.split(':').collect();
  match parts.as_slice() {
    [user, password] => Ok((user, password)),
    _ => Err(anyhow!("token is wrong")),
  }
}

/// Build the `docker login` command for a base64 encoded authorization token
pub fn docker_login_command(token: &str, endpoint: &str) -> Result<String> {
  let decoded = general_purpose::STANDARD.decode(token)?;
  let decoded = String::from_utf8(decoded)?;
  let (user, password) = login_from_token(&decoded)?;

  Ok(format!("docker login -u {user} -p {password} {endpoint}"))
}

impl EcrLogin {
  pub async fn login(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::ReadOnly).await?;
    let auth = ctx.client.get_authorization_token().await?;

    let cmd = docker_login_command(&auth.token, &auth.proxy_endpoint)?;
    utils::copy_to_clipboard(&cmd)?;
    println!(
      "{}",
      output::blue("Token is copied to clipboard. Please paste it to terminal.")
    );

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ENDPOINT: &str = "https://123456789012.dkr.ecr.ap-northeast-2.amazonaws.com";

  #[test]
  fn it_builds_docker_login_command() {
    let token = general_purpose::STANDARD.encode("AWS:secret-password");

    assert_eq!(
      docker_login_command(&token, ENDPOINT).unwrap(),
      format!("docker login -u AWS -p secret-password {ENDPOINT}")
    );
  }

  #[test]
  fn it_rejects_malformed_tokens() {
    let no_separator = general_purpose::STANDARD.encode("AWS");
    let extra_separator = general_purpose::STANDARD.encode("AWS:pass:word");

    assert_eq!(
      docker_login_command(&no_separator, ENDPOINT).unwrap_err().to_string(),
      "token is wrong"
    );
    assert_eq!(
      docker_login_command(&extra_separator, ENDPOINT).unwrap_err().to_string(),
      "token is wrong"
    );
    assert!(docker_login_command("not base64!", ENDPOINT).is_err());
  }
}
