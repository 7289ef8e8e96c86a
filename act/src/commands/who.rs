use anyhow::Result;
use clap::Args;

use super::{ConfigMode, Context};
use crate::{aws::sts::CallerIdentity, cli::GlobalArgs, output};

/// Input arguments for `who` command
#[derive(Args, Debug, Default)]
pub struct Who {}

fn render(identity: &CallerIdentity) -> String {
  format!(
    "Account: {}\nUserId:  {}\nArn:     {}",
    identity.account, identity.user_id, identity.arn
  )
}

impl Who {
  /// Print the identity the current credentials resolve to
  pub async fn whoami(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Skip).await?;
    let identity = ctx.client.get_caller_identity().await?;

    println!("{}", output::green(&render(&identity)));

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_renders_identity() {
    let identity = CallerIdentity {
      account: "123456789012".to_string(),
      arn: "arn:aws:iam::123456789012:user/dev@example.com".to_string(),
      user_id: "AIDAEXAMPLE".to_string(),
    };

    insta::assert_snapshot!(render(&identity), @r###"
    Account: 123456789012
    UserId:  AIDAEXAMPLE
    Arn:     arn:aws:iam::123456789012:user/dev@example.com
    "###);
  }
}
