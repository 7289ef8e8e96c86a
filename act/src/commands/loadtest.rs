use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use super::{ConfigMode, Context};
use crate::{cli::GlobalArgs, config::Loadtest as Targets, output};

/// Input arguments for `loadtest` command
#[derive(Args, Debug)]
pub struct Loadtest {
  #[command(subcommand)]
  pub command: LoadtestCommands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
pub enum LoadtestCommands {
  /// Start the load test clusters and scale the load test groups to one instance
  Start,

  /// Stop the load test clusters and scale the load test groups to zero
  Stop,

  /// Show the state of the load test resources
  Status,
}

/// Groups whose name contains any of the configured fragments, in listing order
pub fn matching_group_names(groups: &[String], fragments: &[String]) -> Vec<String> {
  groups
    .iter()
    .filter(|group| fragments.iter().any(|fragment| group.contains(fragment.as_str())))
    .cloned()
    .collect()
}

impl Loadtest {
  pub async fn run(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: false }).await?;
    let targets: &Targets = &ctx.config()?.loadtest;

    for cluster in &targets.rds {
      let status = match self.command {
        LoadtestCommands::Start => ctx.client.start_db_cluster(cluster).await?,
        LoadtestCommands::Stop => ctx.client.stop_db_cluster(cluster).await?,
        LoadtestCommands::Status => ctx.client.db_cluster_status(cluster).await?,
      };
      println!("{} {cluster}: {status}", output::bold("[rds]"));
    }

    if targets.asg.is_empty() {
      return Ok(());
    }

    let groups = ctx.client.list_auto_scaling_group_names().await?;
    for group in matching_group_names(&groups, &targets.asg) {
      let capacity = match self.command {
        LoadtestCommands::Start => Some(1),
        LoadtestCommands::Stop => Some(0),
        LoadtestCommands::Status => None,
      };

      match capacity {
        Some(capacity) => {
          ctx.client.set_capacity(&group, capacity).await?;
          info!("capacity of {group} is set to {capacity}");
          println!("{} {group}: {capacity}", output::bold("[asg]"));
        }
        None => {
          let desired = ctx.client.desired_capacity(&group).await?;
          println!("{} {group}: desired capacity {desired}", output::bold("[asg]"));
        }
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
  }

  #[test]
  fn it_matches_group_names_by_fragment() {
    let groups = names(&["web-prod", "loadtest-api", "worker-loadtest", "batch"]);

    assert_eq!(
      matching_group_names(&groups, &names(&["loadtest"])),
      vec!["loadtest-api", "worker-loadtest"]
    );
    assert_eq!(
      matching_group_names(&groups, &names(&["batch", "web"])),
      vec!["web-prod", "batch"]
    );
    assert!(matching_group_names(&groups, &[]).is_empty());
  }
}
