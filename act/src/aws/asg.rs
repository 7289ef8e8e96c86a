use anyhow::{anyhow, Result};

use super::{owned, Client};

const MAX_RECORDS: i32 = 100;

impl Client {
  /// Names of the Auto Scaling groups in the region
  pub async fn list_auto_scaling_group_names(&self) -> Result<Vec<String>> {
    let response = self
      .asg
      .describe_auto_scaling_groups()
      .max_records(MAX_RECORDS)
      .send()
      .await?;

    Ok(
      response
        .auto_scaling_groups()
        .iter()
        .map(|g| owned(g.auto_scaling_group_name()))
        .collect(),
    )
  }

  pub async fn desired_capacity(&self, group_name: &str) -> Result<i32> {
    let response = self
      .asg
      .describe_auto_scaling_groups()
      .auto_scaling_group_names(group_name)
      .max_records(MAX_RECORDS)
      .send()
      .await?;

    let group = response
      .auto_scaling_groups()
      .first()
      .ok_or_else(|| anyhow!("Auto Scaling group not found: {group_name}"))?;
    let desired: Option<i32> = group.desired_capacity().into();

    Ok(desired.unwrap_or_default())
  }

  /// Pin min, max and desired capacity of the group to `capacity`
  pub async fn set_capacity(&self, group_name: &str, capacity: i32) -> Result<()> {
    self
      .asg
      .update_auto_scaling_group()
      .auto_scaling_group_name(group_name)
      .min_size(capacity)
      .max_size(capacity)
      .desired_capacity(capacity)
      .send()
      .await?;

    Ok(())
  }
}
