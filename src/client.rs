//! Typed access to the Unity Catalog administration commands
//!
//! Request bodies are serialized with serde so names, paths and secrets are always
//! escaped correctly before they reach `--json`.

use crate::error::SetupError;
use crate::exec::UcExecutor;
use crate::params::CloudCredential;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Metastore as returned by `create-metastore` and `get-metastore`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetastoreInfo {
    pub metastore_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root_credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_sharing_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_sharing_recipient_token_lifetime_in_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCredentialInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `create-storage-credential`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCredentialRequest {
    pub name: String,
    #[serde(flatten)]
    pub auth: CredentialAuth,
}

impl StorageCredentialRequest {
    pub fn new(name: &str, credential: &CloudCredential) -> Self {
        let auth = match credential {
            CloudCredential::Aws { iam_role } => CredentialAuth::AwsIamRole {
                role_arn: iam_role.clone(),
            },
            CloudCredential::Azure {
                directory_id,
                application_id,
                client_secret,
            } => CredentialAuth::AzureServicePrincipal {
                directory_id: directory_id.clone(),
                application_id: application_id.clone(),
                client_secret: client_secret.clone(),
            },
        };
        Self {
            name: name.to_string(),
            auth,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialAuth {
    AwsIamRole {
        role_arn: String,
    },
    AzureServicePrincipal {
        directory_id: String,
        application_id: String,
        client_secret: String,
    },
}

/// Partial metastore update; only fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetastoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root_credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_sharing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_sharing_recipient_token_lifetime_in_seconds: Option<u64>,
}

/// Body of `update-permissions`; each change adds privileges, nothing is replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionsUpdate {
    pub changes: Vec<PermissionChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionChange {
    pub principal: String,
    pub add: Vec<String>,
}

impl PermissionsUpdate {
    pub fn grant(principal: &str, privileges: &[&str]) -> Self {
        Self {
            changes: vec![PermissionChange {
                principal: principal.to_string(),
                add: privileges.iter().map(|p| p.to_string()).collect(),
            }],
        }
    }
}

/// One method per `unity-catalog` subcommand used during setup
///
/// Methods returning `String` hand back the command's raw output for display.
pub trait CatalogAdminClient {
    fn create_metastore(&self, name: &str, storage_root: &str) -> Result<MetastoreInfo>;

    fn assign_metastore(
        &self,
        metastore_id: &str,
        workspace_id: &str,
        default_catalog_name: &str,
    ) -> Result<String>;

    fn create_storage_credential(
        &self,
        request: &StorageCredentialRequest,
    ) -> Result<StorageCredentialInfo>;

    fn update_metastore(&self, metastore_id: &str, update: &MetastoreUpdate) -> Result<String>;

    fn get_metastore(&self, metastore_id: &str) -> Result<String>;

    fn update_permissions(&self, catalog: &str, update: &PermissionsUpdate) -> Result<String>;

    fn metastore_summary(&self) -> Result<String>;
}

/// Parse a JSON response, keeping the raw text in the error
pub fn parse_response<T: DeserializeOwned>(
    subcommand: &'static str,
    output: &str,
) -> Result<T, SetupError> {
    serde_json::from_str(output).map_err(|e| SetupError::Response {
        subcommand,
        reason: e.to_string(),
        output: output.to_string(),
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

pub fn create_metastore_args(name: &str, storage_root: &str) -> Vec<String> {
    owned(&["create-metastore", "--name", name, "--storage-root", storage_root])
}

pub fn assign_metastore_args(
    metastore_id: &str,
    workspace_id: &str,
    default_catalog_name: &str,
) -> Vec<String> {
    owned(&[
        "assign-metastore",
        "--metastore-id",
        metastore_id,
        "--workspace-id",
        workspace_id,
        "--default-catalog-name",
        default_catalog_name,
    ])
}

pub fn create_storage_credential_args(request: &StorageCredentialRequest) -> Result<Vec<String>> {
    let payload = to_json(request)?;
    Ok(owned(&["create-storage-credential", "--json", payload.as_str()]))
}

pub fn update_metastore_args(metastore_id: &str, update: &MetastoreUpdate) -> Result<Vec<String>> {
    let payload = to_json(update)?;
    Ok(owned(&[
        "update-metastore",
        "--id",
        metastore_id,
        "--json",
        payload.as_str(),
    ]))
}

pub fn get_metastore_args(metastore_id: &str) -> Vec<String> {
    owned(&["get-metastore", "--id", metastore_id])
}

pub fn update_permissions_args(catalog: &str, update: &PermissionsUpdate) -> Result<Vec<String>> {
    let payload = to_json(update)?;
    Ok(owned(&[
        "update-permissions",
        "--catalog",
        catalog,
        "--json",
        payload.as_str(),
    ]))
}

pub fn metastore_summary_args() -> Vec<String> {
    owned(&["metastore-summary"])
}

/// `CatalogAdminClient` backed by the `unity-catalog` CLI commands
pub struct CliCatalogClient<E: UcExecutor> {
    executor: E,
}

impl<E: UcExecutor> CliCatalogClient<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: UcExecutor> CatalogAdminClient for CliCatalogClient<E> {
    fn create_metastore(&self, name: &str, storage_root: &str) -> Result<MetastoreInfo> {
        let output = self
            .executor
            .execute(&create_metastore_args(name, storage_root))?;
        Ok(parse_response("create-metastore", &output)?)
    }

    fn assign_metastore(
        &self,
        metastore_id: &str,
        workspace_id: &str,
        default_catalog_name: &str,
    ) -> Result<String> {
        self.executor.execute(&assign_metastore_args(
            metastore_id,
            workspace_id,
            default_catalog_name,
        ))
    }

    fn create_storage_credential(
        &self,
        request: &StorageCredentialRequest,
    ) -> Result<StorageCredentialInfo> {
        let output = self
            .executor
            .execute(&create_storage_credential_args(request)?)?;
        Ok(parse_response("create-storage-credential", &output)?)
    }

    fn update_metastore(&self, metastore_id: &str, update: &MetastoreUpdate) -> Result<String> {
        self.executor
            .execute(&update_metastore_args(metastore_id, update)?)
    }

    fn get_metastore(&self, metastore_id: &str) -> Result<String> {
        self.executor.execute(&get_metastore_args(metastore_id))
    }

    fn update_permissions(&self, catalog: &str, update: &PermissionsUpdate) -> Result<String> {
        self.executor
            .execute(&update_permissions_args(catalog, update)?)
    }

    fn metastore_summary(&self) -> Result<String> {
        self.executor.execute(&metastore_summary_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;

    struct CannedExecutor {
        output: String,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl UcExecutor for CannedExecutor {
        fn execute(&self, args: &[String]) -> Result<String> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(self.output.clone())
        }
    }

    fn client(output: &str) -> CliCatalogClient<CannedExecutor> {
        CliCatalogClient::new(CannedExecutor {
            output: output.to_string(),
            calls: RefCell::new(Vec::new()),
        })
    }

    fn json_arg(args: &[String]) -> Value {
        let pos = args.iter().position(|a| a == "--json").unwrap();
        serde_json::from_str(&args[pos + 1]).unwrap()
    }

    #[test]
    fn test_aws_credential_payload() {
        let request = StorageCredentialRequest::new(
            "default-credential",
            &CloudCredential::Aws {
                iam_role: "arn:aws:iam::123456789012:role/uc-role".to_string(),
            },
        );
        let args = create_storage_credential_args(&request).unwrap();
        assert_eq!(args[0], "create-storage-credential");
        assert_eq!(
            json_arg(&args),
            json!({
                "name": "default-credential",
                "aws_iam_role": {"role_arn": "arn:aws:iam::123456789012:role/uc-role"}
            })
        );
    }

    #[test]
    fn test_azure_credential_payload() {
        let request = StorageCredentialRequest::new(
            "default-credential",
            &CloudCredential::Azure {
                directory_id: "dir-id".to_string(),
                application_id: "app-id".to_string(),
                client_secret: "se\"cret".to_string(),
            },
        );
        let payload = json_arg(&create_storage_credential_args(&request).unwrap());
        assert_eq!(
            payload["azure_service_principal"],
            json!({
                "directory_id": "dir-id",
                "application_id": "app-id",
                "client_secret": "se\"cret"
            })
        );
        assert_eq!(payload.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = MetastoreUpdate {
            owner: Some("metastore-admin-users".to_string()),
            ..Default::default()
        };
        let args = update_metastore_args("ms-1", &update).unwrap();
        assert_eq!(&args[..3], ["update-metastore", "--id", "ms-1"]);
        assert_eq!(json_arg(&args), json!({"owner": "metastore-admin-users"}));
    }

    #[test]
    fn test_permissions_payload() {
        let update = PermissionsUpdate::grant("admins", &["CREATE", "USAGE"]);
        let args = update_permissions_args("main", &update).unwrap();
        assert_eq!(&args[..3], ["update-permissions", "--catalog", "main"]);
        assert_eq!(
            json_arg(&args),
            json!({"changes": [{"principal": "admins", "add": ["CREATE", "USAGE"]}]})
        );
    }

    #[test]
    fn test_create_metastore_parses_id() {
        let client = client(r#"{"metastore_id": "ms-1", "name": "unity-catalog"}"#);
        let info = client
            .create_metastore("unity-catalog", "s3://my-uc-bucket")
            .unwrap();
        assert_eq!(info.metastore_id, "ms-1");

        let calls = client.executor().calls.borrow();
        assert_eq!(
            calls[0],
            create_metastore_args("unity-catalog", "s3://my-uc-bucket")
        );
    }

    #[test]
    fn test_unparseable_response() {
        let client = client("not json");
        let err = client.create_storage_credential(&StorageCredentialRequest::new(
            "c",
            &CloudCredential::Aws {
                iam_role: "arn".to_string(),
            },
        ));
        let err = err.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::Response {
                subcommand: "create-storage-credential",
                ..
            })
        ));
    }
}
