//! Thin facade over the AWS SDK clients used by `act`
//!
//! Each submodule adds the calls for one service to [`Client`] and converts the SDK output into
//! the small owned types the commands work with.
pub mod asg;
pub mod ecr;
pub mod elb;
pub mod iam;
pub mod rds;
pub mod sts;
pub mod waf;

use aws_config::SdkConfig;

/// Max attempts made by the SDK for a single API call
const MAX_ATTEMPTS: u32 = 3;

/// AWS clients for every service `act` talks to, built from one shared configuration
#[derive(Clone, Debug)]
pub struct Client {
  asg: aws_sdk_autoscaling::Client,
  ecr: aws_sdk_ecr::Client,
  elb: aws_sdk_elasticloadbalancingv2::Client,
  iam: aws_sdk_iam::Client,
  rds: aws_sdk_rds::Client,
  sts: aws_sdk_sts::Client,
  waf: aws_sdk_waf::Client,
}

impl Client {
  pub fn new(config: &SdkConfig) -> Self {
    Client {
      asg: aws_sdk_autoscaling::Client::from_conf(
        aws_sdk_autoscaling::config::Builder::from(config)
          .retry_config(aws_sdk_autoscaling::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
      ecr: aws_sdk_ecr::Client::from_conf(
        aws_sdk_ecr::config::Builder::from(config)
          .retry_config(aws_sdk_ecr::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
      elb: aws_sdk_elasticloadbalancingv2::Client::from_conf(
        aws_sdk_elasticloadbalancingv2::config::Builder::from(config)
          .retry_config(
            aws_sdk_elasticloadbalancingv2::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS),
          )
          .build(),
      ),
      iam: aws_sdk_iam::Client::from_conf(
        aws_sdk_iam::config::Builder::from(config)
          .retry_config(aws_sdk_iam::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
      rds: aws_sdk_rds::Client::from_conf(
        aws_sdk_rds::config::Builder::from(config)
          .retry_config(aws_sdk_rds::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
      sts: aws_sdk_sts::Client::from_conf(
        aws_sdk_sts::config::Builder::from(config)
          .retry_config(aws_sdk_sts::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
      waf: aws_sdk_waf::Client::from_conf(
        aws_sdk_waf::config::Builder::from(config)
          .retry_config(aws_sdk_waf::config::retry::RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
          .build(),
      ),
    }
  }
}

/// Convert an SDK string accessor into an owned string
///
/// Required members are exposed by the SDK as `&str` and optional ones as `Option<&str>`;
/// both convert here, with a missing value becoming an empty string.
pub(crate) fn owned<'a>(value: impl Into<Option<&'a str>>) -> String {
  value.into().unwrap_or_default().to_owned()
}
