use anyhow::Result;
use aws_sdk_elasticloadbalancingv2::types::{Action, ActionTypeEnum, FixedResponseActionConfig, RuleCondition};

use super::{owned, Client};

/// Listener rule priority reserved for the maintenance response
pub const MAINTENANCE_PRIORITY: i32 = 10;

/// Listener rule identifier and its priority (`default` for the default rule)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerRule {
  pub arn: String,
  pub priority: String,
}

impl Client {
  /// ARNs of all listeners attached to the load balancer
  pub async fn describe_listeners(&self, load_balancer_arn: &str) -> Result<Vec<String>> {
    let response = self
      .elb
      .describe_listeners()
      .load_balancer_arn(load_balancer_arn)
      .send()
      .await?;

    Ok(response.listeners().iter().map(|l| owned(l.listener_arn())).collect())
  }

  pub async fn describe_rules(&self, listener_arn: &str) -> Result<Vec<ListenerRule>> {
    let response = self.elb.describe_rules().listener_arn(listener_arn).send().await?;

    Ok(
      response
        .rules()
        .iter()
        .map(|r| ListenerRule {
          arn: owned(r.rule_arn()),
          priority: owned(r.priority()),
        })
        .collect(),
    )
  }

  /// Answer every path on the listener with a fixed 503 response carrying `body`
  pub async fn create_maintenance_rule(&self, listener_arn: &str, body: &str) -> Result<()> {
    let response_config = FixedResponseActionConfig::builder()
      .content_type("application/json")
      .message_body(body)
      .status_code("503")
      .build();

    let action = Action::builder()
      .r#type(ActionTypeEnum::FixedResponse)
      .fixed_response_config(response_config)
      .build();

    let condition = RuleCondition::builder().field("path-pattern").values("/*").build();

    self
      .elb
      .create_rule()
      .listener_arn(listener_arn)
      .priority(MAINTENANCE_PRIORITY)
      .actions(action)
      .conditions(condition)
      .send()
      .await?;

    Ok(())
  }

  pub async fn delete_rule(&self, rule_arn: &str) -> Result<()> {
    self.elb.delete_rule().rule_arn(rule_arn).send().await?;

    Ok(())
  }
}
