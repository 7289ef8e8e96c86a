use anyhow::{anyhow, Result};
use aws_sdk_waf::types::{PredicateType, WafAction, WafActionType, WafRuleType};
use tracing::debug;

use super::{owned, Client};

/// Max number of web ACLs returned when listing
const LIST_LIMIT: i32 = 100;

/// Name and identifier of a web ACL, as returned when listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebAclSummary {
  pub id: String,
  pub name: String,
}

/// Snapshot of a web ACL along with the IP sets referenced by its rules
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebAcl {
  pub id: String,
  pub name: String,
  /// Rules in the order returned by WAF
  pub rules: Vec<AclRule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AclRule {
  pub rule_id: String,
  pub rule_type: String,
  pub action_type: String,
  pub priority: i32,
  pub ip_data_sets: Vec<IpDataSet>,
}

/// IP set with its descriptors kept as the literal strings stored in WAF
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IpDataSet {
  pub id: String,
  pub ip_list: Vec<String>,
}

impl Client {
  /// List the web ACLs in the account
  pub async fn list_web_acls(&self) -> Result<Vec<WebAclSummary>> {
    let response = self.waf.list_web_acls().limit(LIST_LIMIT).send().await?;

    Ok(
      response
        .web_acls()
        .iter()
        .map(|acl| WebAclSummary {
          id: owned(acl.web_acl_id()),
          name: owned(acl.name()),
        })
        .collect(),
    )
  }

  /// Fetch the web ACL, each of its rules, and the IP sets those rules reference
  pub async fn describe_web_acl(&self, web_acl_id: &str) -> Result<WebAcl> {
    let response = self.waf.get_web_acl().web_acl_id(web_acl_id).send().await?;
    let info = response
      .web_acl()
      .ok_or_else(|| anyhow!("web ACL not found: {web_acl_id}"))?;

    let mut acl = WebAcl {
      id: owned(info.web_acl_id()),
      name: owned(info.name()),
      rules: Vec::with_capacity(info.rules().len()),
    };

    for activated in info.rules() {
      let rule_type: Option<&WafRuleType> = activated.r#type().into();
      let action: Option<&WafAction> = activated.action().into();
      let action_type: Option<&WafActionType> = action.and_then(|a| a.r#type().into());
      let priority: Option<i32> = activated.priority().into();

      let rule_id = owned(activated.rule_id());
      let ip_data_sets = self.get_rule_ip_sets(&rule_id).await?;

      acl.rules.push(AclRule {
        rule_type: rule_type.map(|t| t.as_str().to_owned()).unwrap_or_default(),
        action_type: action_type.map(|t| t.as_str().to_owned()).unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        rule_id,
        ip_data_sets,
      });
    }

    Ok(acl)
  }

  /// Resolve the IP match predicates of a rule into their IP sets
  async fn get_rule_ip_sets(&self, rule_id: &str) -> Result<Vec<IpDataSet>> {
    let response = self.waf.get_rule().rule_id(rule_id).send().await?;
    let rule = match response.rule() {
      Some(rule) => rule,
      None => return Ok(Vec::new()),
    };

    let mut data_sets = Vec::new();
    for predicate in rule.predicates() {
      let kind: Option<&PredicateType> = predicate.r#type().into();
      let data_id = owned(predicate.data_id());
      if kind != Some(&PredicateType::IpMatch) {
        debug!("Skipping non IP match predicate {data_id} in rule {rule_id}");
        continue;
      }

      let ip_set = self.waf.get_ip_set().ip_set_id(&data_id).send().await?;
      let ip_list = ip_set
        .ip_set()
        .map(|set| {
          set
            .ip_set_descriptors()
            .iter()
            .map(|descriptor| owned(descriptor.value()))
            .collect()
        })
        .unwrap_or_default();

      data_sets.push(IpDataSet { id: data_id, ip_list });
    }

    Ok(data_sets)
  }
}
