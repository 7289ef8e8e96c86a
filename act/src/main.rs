use std::process::ExitCode;

use act::{output, Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing::{debug, level_filters::LevelFilter};
use tracing_log::AsTrace;
use tracing_subscriber::FmtSubscriber;

async fn run(cli: &Cli) -> Result<()> {
  let global = &cli.global;

  match &cli.command {
    Commands::Init(init) => init.initialize(global).await,
    Commands::Setup(setup) => setup.assume(global).await,
    Commands::Who(who) => who.whoami(global).await,
    Commands::Assume(assume) => assume.run(global).await,
    Commands::Get(get) => get.run(global).await,
    Commands::RenewCredential(renew) => renew.renew(global).await,
    Commands::DescribeWebAcl(describe) => describe.describe(global).await,
    Commands::HasIp(has_ip) => has_ip.check(global).await,
    Commands::EcrLogin(ecr) => ecr.login(global).await,
    Commands::Maintenance(maintenance) => maintenance.run(global).await,
    Commands::Loadtest(loadtest) => loadtest.run(global).await,
    Commands::Version => {
      println!("{}", env!("CARGO_PKG_VERSION"));
      Ok(())
    }
  }
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  let mut level = cli.verbose.log_level_filter().as_trace();
  // Rotation progress is always reported
  if matches!(cli.command, Commands::RenewCredential(_)) {
    level = level.max(LevelFilter::INFO);
  }

  let subscriber = FmtSubscriber::builder()
    .with_max_level(level)
    .without_time()
    .with_ansi(!cli.global.no_color)
    .finish();
  if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
    eprintln!("Setting default subscriber failed: {e}");
  }
  output::set_color(!cli.global.no_color);

  let result = tokio::select! {
    result = run(&cli) => result,
    Ok(()) = tokio::signal::ctrl_c() => {
      debug!("Command cancelled");
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{}", output::red(&format!("{e:#}")));
      ExitCode::FAILURE
    }
  }
}
