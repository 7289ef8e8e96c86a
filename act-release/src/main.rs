//! Script-like crate for checks performed before publishing an `act` release
use std::process;

use act_release::{check_bucket, get_client, Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

/// Checks the caller is an administrator allowed to publish releases
///
/// ```bash
/// cargo run --bin act-release -- check-permission --bucket <bucket>
/// ```
#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let subscriber = FmtSubscriber::builder()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .without_time()
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  match &cli.command {
    Commands::CheckPermission(check) => {
      let config = act::get_sdk_config(Some(check.region.to_owned()), None).await?;
      let client = get_client(&config, 3).await?;

      match check_bucket(&client, &check.bucket).await {
        Ok(_) => {
          println!("You are an authorized administrator for release");
          Ok(())
        }
        Err(err) => {
          eprintln!("{err:#}");
          process::exit(1);
        }
      }
    }
  }
}
