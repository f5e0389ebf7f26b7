//! Format checks run before any call to the administration CLI

use crate::error::SetupError;
use crate::params::{CloudCredential, SetupParams};
use regex::Regex;
use std::sync::LazyLock;

static S3_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^s3://[a-z0-9-]{3,63}$").expect("valid s3 regex"));
static IAM_ROLE_ARN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^arn:aws:iam::\d{12}:role/.+").expect("valid iam regex"));
static ABFS_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^abfss://.+\.dfs\.core\.windows\.net/?$").expect("valid abfs regex")
});

pub fn validate_aws_bucket(bucket: &str) -> Result<(), SetupError> {
    if !S3_PATH.is_match(bucket) {
        return Err(SetupError::validation("bucket", "Not a valid s3 path"));
    }
    Ok(())
}

pub fn validate_iam_role(iam_role: &str) -> Result<(), SetupError> {
    if !IAM_ROLE_ARN.is_match(iam_role) {
        return Err(SetupError::validation("iam_role", "Not a valid IAM role arn"));
    }
    Ok(())
}

pub fn validate_azure_bucket(bucket: &str) -> Result<(), SetupError> {
    if !ABFS_PATH.is_match(bucket) {
        return Err(SetupError::validation("bucket", "Not a valid abfs path"));
    }
    Ok(())
}

/// Apply the checks that belong to the selected cloud
pub fn validate_params(params: &SetupParams) -> Result<(), SetupError> {
    match &params.credential {
        CloudCredential::Aws { iam_role } => {
            validate_aws_bucket(&params.bucket)?;
            validate_iam_role(iam_role)?;
        }
        // Azure credential fields are not format-checked
        CloudCredential::Azure { .. } => validate_azure_bucket(&params.bucket)?,
    }
    Ok(())
}
