//! WAF classic inspection: describing a web ACL and checking whether addresses are listed in it
//!
//! Membership is decided by exact string comparison of the normalized address against the
//! descriptors stored in the IP sets; CIDR ranges are not expanded.
use anyhow::Result;
use clap::Args;
use tabled::{Table, Tabled};

use super::{choose, ConfigMode, Context};
use crate::{
  aws::waf::WebAcl,
  cli::GlobalArgs,
  error::Error,
  output,
};

/// Outcome of looking up one address in a web ACL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpCheckResult {
  pub ip: String,
  /// IP set the address was found in
  pub ip_set_id: Option<String>,
  pub result: bool,
}

#[derive(Tabled)]
struct IpCheckRow {
  #[tabled(rename = "IP")]
  ip: String,
  #[tabled(rename = "IPSetID")]
  ip_set_id: String,
  #[tabled(rename = "Result")]
  result: bool,
}

#[derive(Tabled)]
struct RuleRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "TYPE")]
  rule_type: String,
  #[tabled(rename = "ACTION")]
  action: String,
  #[tabled(rename = "PRIORITY")]
  priority: i32,
  #[tabled(rename = "DATASET COUNT")]
  data_sets: usize,
}

#[derive(Tabled)]
struct IpSetRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Count")]
  count: usize,
}

/// Validate a dotted IPv4 address with an optional `/<bits>` suffix
pub fn is_valid_address(ip: &str) -> Result<(), Error> {
  if ip.matches('.').count() != 3 {
    return Err(Error::validation(format!("wrong IP address: {ip}")));
  }

  let parts: Vec<&str> = ip.split('/').collect();
  if parts.len() > 2 {
    return Err(Error::validation(format!("address cannot have / more than once: {ip}")));
  }

  if let Some(base) = parts.get(1) {
    let base: i64 = base
      .trim()
      .parse()
      .map_err(|_| Error::validation(format!("invalid cidr base: {ip}")))?;
    if !(0..=32).contains(&base) {
      return Err(Error::validation(format!("cidr base should be between 0 and 32: {ip}")));
    }
  }

  for class in parts[0].split('.') {
    let n: i64 = class
      .parse()
      .map_err(|_| Error::validation(format!("invalid class number: {ip}")))?;
    if !(0..=255).contains(&n) {
      return Err(Error::validation(format!(
        "each class number should be between 0 and 255: {ip}"
      )));
    }
  }

  Ok(())
}

/// Validate every address and suffix bare ones with `/32`
///
/// The first invalid address fails the whole list.
pub fn parse_target_list(args: &[String]) -> Result<Vec<String>, Error> {
  args
    .iter()
    .map(|ip| {
      is_valid_address(ip)?;
      Ok(match ip.contains('/') {
        true => ip.to_owned(),
        false => format!("{ip}/32"),
      })
    })
    .collect()
}

/// Look up each target in the IP sets of the ACL's rules, first match wins
pub fn check_if_target_exists_in_acl(targets: &[String], acl: &WebAcl) -> Vec<IpCheckResult> {
  targets
    .iter()
    .map(|target| {
      let found = acl
        .rules
        .iter()
        .flat_map(|rule| rule.ip_data_sets.iter())
        .find(|set| set.ip_list.iter().any(|ip| ip == target));

      IpCheckResult {
        ip: target.to_owned(),
        ip_set_id: found.map(|set| set.id.to_owned()),
        result: found.is_some(),
      }
    })
    .collect()
}

/// Extract the ACL id from a `name / id` selection; a bare id is returned as is
pub fn parse_web_acl_id(selection: &str) -> String {
  match selection.rsplit_once('/') {
    Some((_, id)) => id.trim().to_string(),
    None => selection.trim().to_string(),
  }
}

fn render_results(results: &[IpCheckResult]) -> String {
  let mut out = output::bold("Result");
  out.push('\n');

  if results.is_empty() {
    out.push_str(" No result exists");
    return out;
  }

  let rows: Vec<IpCheckRow> = results
    .iter()
    .map(|r| IpCheckRow {
      ip: r.ip.to_owned(),
      ip_set_id: r.ip_set_id.to_owned().unwrap_or_default(),
      result: r.result,
    })
    .collect();
  out.push_str(&Table::new(rows).to_string());

  out
}

fn render_web_acl(acl: &WebAcl) -> String {
  let mut out = format!(
    "{}: {}\n{}: {}\n\n{}\n",
    output::bold("Name"),
    acl.name,
    output::bold("ID"),
    acl.id,
    output::bold("Rules")
  );

  if acl.rules.is_empty() {
    out.push_str(" No rule exists");
  } else {
    let rows: Vec<RuleRow> = acl
      .rules
      .iter()
      .map(|rule| RuleRow {
        id: rule.rule_id.to_owned(),
        rule_type: rule.rule_type.to_owned(),
        action: rule.action_type.to_owned(),
        priority: rule.priority,
        data_sets: rule.ip_data_sets.len(),
      })
      .collect();
    out.push_str(&Table::new(rows).to_string());
  }

  out.push_str(&format!("\n\n{}\n", output::bold("IP Set Details")));

  let sets: Vec<IpSetRow> = acl
    .rules
    .iter()
    .flat_map(|rule| rule.ip_data_sets.iter())
    .map(|set| IpSetRow {
      id: set.id.to_owned(),
      count: set.ip_list.len(),
    })
    .collect();

  if sets.is_empty() {
    out.push_str(" No IP is registered");
  } else {
    out.push_str(&Table::new(sets).to_string());
  }

  out
}

/// ACL id from the argument, or picked from the ACLs in the account
async fn select_acl(ctx: &Context, acl: Option<&str>) -> Result<String> {
  if let Some(acl) = acl {
    return Ok(parse_web_acl_id(acl));
  }

  let options: Vec<String> = ctx
    .client
    .list_web_acls()
    .await?
    .iter()
    .map(|acl| format!("{} / {}", acl.name, acl.id))
    .collect();

  let selection = choose("Choose the ACL", &options, "you canceled ACL selection")?;
  Ok(parse_web_acl_id(&selection))
}

/// Input arguments for `describe-web-acl` command
#[derive(Args, Debug, Default)]
pub struct DescribeWebAcl {
  /// Web ACL id; chosen interactively when omitted
  pub acl: Option<String>,
}

impl DescribeWebAcl {
  pub async fn describe(&self, global: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(global, ConfigMode::ReadOnly).await?;
    let acl_id = select_acl(&ctx, self.acl.as_deref()).await?;
    let acl = ctx.client.describe_web_acl(&acl_id).await?;

    println!("{}", render_web_acl(&acl));

    Ok(())
  }
}

/// Input arguments for `has-ip` command
#[derive(Args, Debug, Default)]
pub struct HasIp {
  /// IPv4 addresses or CIDR blocks to look up
  #[arg(required = true)]
  pub ips: Vec<String>,

  /// Web ACL id; chosen interactively when omitted
  #[arg(long)]
  pub acl: Option<String>,
}

impl HasIp {
  pub async fn check(&self, global: &GlobalArgs) -> Result<()> {
    let targets = parse_target_list(&self.ips)?;

    let ctx = Context::new(global, ConfigMode::ReadOnly).await?;
    let acl_id = select_acl(&ctx, self.acl.as_deref()).await?;
    let acl = ctx.client.describe_web_acl(&acl_id).await?;

    let results = check_if_target_exists_in_acl(&targets, &acl);
    println!("{}", render_results(&results));

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use rstest::*;

  use super::*;
  use crate::aws::waf::{AclRule, IpDataSet};

  fn acl() -> WebAcl {
    WebAcl {
      id: "acl-1".to_string(),
      name: "office".to_string(),
      rules: vec![
        AclRule {
          rule_id: "rule-1".to_string(),
          rule_type: "REGULAR".to_string(),
          action_type: "ALLOW".to_string(),
          priority: 1,
          ip_data_sets: vec![IpDataSet {
            id: "set-1".to_string(),
            ip_list: vec!["10.0.0.1/32".to_string(), "10.1.0.0/16".to_string()],
          }],
        },
        AclRule {
          rule_id: "rule-2".to_string(),
          rule_type: "REGULAR".to_string(),
          action_type: "BLOCK".to_string(),
          priority: 2,
          ip_data_sets: vec![
            IpDataSet {
              id: "set-2".to_string(),
              ip_list: vec!["10.0.0.1/32".to_string(), "192.168.0.1/32".to_string()],
            },
            IpDataSet {
              id: "set-3".to_string(),
              ip_list: vec![],
            },
          ],
        },
      ],
    }
  }

  #[rstest]
  #[case("10.10.10.10")]
  #[case("10.10.10.10/30")]
  #[case("0.0.0.0/0")]
  #[case("255.255.255.255/32")]
  #[case("10.10.10.10/ 8")]
  fn it_accepts_valid_addresses(#[case] ip: &str) {
    assert_eq!(is_valid_address(ip), Ok(()));
  }

  #[rstest]
  #[case("10.10.10", "wrong IP address: 10.10.10")]
  #[case("10.10.10.10.10", "wrong IP address: 10.10.10.10.10")]
  #[case("10.10.10.10/8/8", "address cannot have / more than once: 10.10.10.10/8/8")]
  #[case("10.10.10.10/abc", "invalid cidr base: 10.10.10.10/abc")]
  #[case("10.10.10.10/33", "cidr base should be between 0 and 32: 10.10.10.10/33")]
  #[case("10.10.10.10/-1", "cidr base should be between 0 and 32: 10.10.10.10/-1")]
  #[case("10.10.a.10", "invalid class number: 10.10.a.10")]
  #[case("10.10.256.10", "each class number should be between 0 and 255: 10.10.256.10")]
  fn it_rejects_invalid_addresses(#[case] ip: &str, #[case] expected: &str) {
    assert_eq!(is_valid_address(ip), Err(Error::validation(expected)));
  }

  #[test]
  fn it_normalizes_targets() {
    let args = vec!["10.0.0.1".to_string(), "10.1.0.0/16".to_string()];
    assert_eq!(parse_target_list(&args).unwrap(), vec!["10.0.0.1/32", "10.1.0.0/16"]);
  }

  #[test]
  fn it_fails_whole_list_on_invalid_target() {
    let args = vec!["10.0.0.1".to_string(), "10.0.0".to_string()];
    assert_eq!(
      parse_target_list(&args),
      Err(Error::validation("wrong IP address: 10.0.0"))
    );
  }

  #[test]
  fn it_checks_targets_in_acl() {
    let targets = vec![
      "10.0.0.1/32".to_string(),
      "192.168.0.1/32".to_string(),
      "10.1.2.3/32".to_string(),
    ];

    insta::assert_debug_snapshot!(check_if_target_exists_in_acl(&targets, &acl()), @r###"
    [
        IpCheckResult {
            ip: "10.0.0.1/32",
            ip_set_id: Some(
                "set-1",
            ),
            result: true,
        },
        IpCheckResult {
            ip: "192.168.0.1/32",
            ip_set_id: Some(
                "set-2",
            ),
            result: true,
        },
        IpCheckResult {
            ip: "10.1.2.3/32",
            ip_set_id: None,
            result: false,
        },
    ]
    "###);
  }

  #[test]
  fn it_finds_nothing_in_acl_without_rules() {
    let empty = WebAcl {
      id: "acl-2".to_string(),
      name: "empty".to_string(),
      rules: vec![],
    };
    let targets = vec!["10.0.0.1/32".to_string(), "10.0.0.2/32".to_string()];

    let results = check_if_target_exists_in_acl(&targets, &empty);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.result && r.ip_set_id.is_none()));
    assert_eq!(results[1].ip, "10.0.0.2/32");
  }

  #[rstest]
  #[case("office / 1a2b3c4d-5678", "1a2b3c4d-5678")]
  #[case("1a2b3c4d-5678", "1a2b3c4d-5678")]
  #[case(" 1a2b3c4d-5678 ", "1a2b3c4d-5678")]
  fn it_parses_web_acl_id(#[case] selection: &str, #[case] expected: &str) {
    assert_eq!(parse_web_acl_id(selection), expected);
  }

  #[test]
  fn it_renders_web_acl() {
    let rendered = render_web_acl(&acl());

    assert!(rendered.contains("office"));
    assert!(rendered.contains("DATASET COUNT"));
    assert!(rendered.contains("rule-2"));
    assert!(rendered.contains("set-3"));
  }

  #[test]
  fn it_renders_empty_results() {
    assert!(render_results(&[]).ends_with(" No result exists"));
  }
}
