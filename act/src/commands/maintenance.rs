use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use super::{ConfigMode, Context};
use crate::{
  aws::elb::{ListenerRule, MAINTENANCE_PRIORITY},
  cli::GlobalArgs,
  error::Error,
  output, utils,
};

/// Code returned in the maintenance response body
const MAINTENANCE_CODE: i64 = -99999;

/// Input arguments for `maintenance` command
#[derive(Args, Debug)]
pub struct Maintenance {
  #[command(subcommand)]
  pub command: MaintenanceCommands,
}

#[derive(Debug, Subcommand)]
pub enum MaintenanceCommands {
  /// Answer every request on the configured load balancers with a 503 maintenance response
  On,

  /// Remove the maintenance response from the configured load balancers
  Off,
}

#[derive(Debug, Serialize)]
struct MaintenanceMessage<'a> {
  timestamp: i64,
  code: i64,
  message: &'a str,
}

/// JSON body of the fixed maintenance response
pub fn maintenance_body(timestamp: i64, message: &str) -> Result<String> {
  let body = serde_json::to_string(&MaintenanceMessage {
    timestamp,
    code: MAINTENANCE_CODE,
    message,
  })?;

  Ok(body)
}

/// Rules created by `maintenance on`
fn maintenance_rules(rules: &[ListenerRule]) -> impl Iterator<Item = &ListenerRule> {
  let priority = MAINTENANCE_PRIORITY.to_string();
  rules.iter().filter(move |rule| rule.priority == priority)
}

impl Maintenance {
  pub async fn run(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::Base { check_key_age: false }).await?;
    let config = ctx.config()?;

    if config.maintenance.arns.is_empty() {
      return Err(Error::config("no load balancer is configured for maintenance").into());
    }

    for target in &config.maintenance.arns {
      let listeners = ctx.client.describe_listeners(&target.loadbalancer_arn).await?;
      debug!("Found {} listener(s) on {}", listeners.len(), target.loadbalancer_arn);

      for listener in listeners {
        match self.command {
          MaintenanceCommands::On => {
            let body = maintenance_body(utils::now_millis(), &config.maintenance.message)?;
            ctx.client.create_maintenance_rule(&listener, &body).await?;
            info!("maintenance rule is created on {listener}");
          }
          MaintenanceCommands::Off => {
            let rules = ctx.client.describe_rules(&listener).await?;
            for rule in maintenance_rules(&rules) {
              ctx.client.delete_rule(&rule.arn).await?;
              info!("maintenance rule {} is deleted", rule.arn);
            }
          }
        }
      }
    }

    let status = match self.command {
      MaintenanceCommands::On => "on",
      MaintenanceCommands::Off => "off",
    };
    println!("{}", output::green(&format!("maintenance mode is {status}")));

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn it_renders_maintenance_body() {
    assert_eq!(
      maintenance_body(1565934483777, "under maintenance").unwrap(),
      r#"{"timestamp":1565934483777,"code":-99999,"message":"under maintenance"}"#
    );
  }

  #[test]
  fn it_selects_maintenance_rules() {
    let rules = vec![
      ListenerRule {
        arn: "rule/default".to_string(),
        priority: "default".to_string(),
      },
      ListenerRule {
        arn: "rule/maintenance".to_string(),
        priority: "10".to_string(),
      },
      ListenerRule {
        arn: "rule/app".to_string(),
        priority: "100".to_string(),
      },
    ];

    let selected: Vec<&str> = maintenance_rules(&rules).map(|r| r.arn.as_str()).collect();
    assert_eq!(selected, vec!["rule/maintenance"]);
  }
}
