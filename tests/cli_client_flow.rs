use anyhow::Result;
use metastore_setup::client::CliCatalogClient;
use metastore_setup::exec::{UcExecutor, check_output};
use metastore_setup::provision::show_status;
use metastore_setup::{CloudCredential, SessionContext, SetupError, SetupParams};
use metastore_setup::provision_metastore;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

/// Replies to each subcommand with canned (stdout, stderr), passed through the real error check
#[derive(Default)]
struct ScriptedCli {
    replies: HashMap<&'static str, (String, String)>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedCli {
    fn reply(mut self, subcommand: &'static str, stdout: &str, stderr: &str) -> Self {
        self.replies
            .insert(subcommand, (stdout.to_string(), stderr.to_string()));
        self
    }
}

impl UcExecutor for ScriptedCli {
    fn execute(&self, args: &[String]) -> Result<String> {
        self.calls.borrow_mut().push(args.to_vec());
        let (stdout, stderr) = self
            .replies
            .get(args[0].as_str())
            .cloned()
            .unwrap_or_default();
        Ok(check_output(&stdout, &stderr)?)
    }
}

fn session() -> SessionContext {
    SessionContext {
        host: "https://example.cloud.databricks.com".to_string(),
        token: "dapi123".to_string(),
        user: "admin@example.com".to_string(),
        workspace_id: "1234567890".to_string(),
    }
}

fn aws_params() -> SetupParams {
    SetupParams {
        credential: CloudCredential::Aws {
            iam_role: "arn:aws:iam::123456789012:role/uc-role".to_string(),
        },
        bucket: "s3://my-uc-bucket".to_string(),
        metastore: "unity-catalog".to_string(),
        storage_credential_name: "default-credential".to_string(),
        admin_group: "metastore-admin-users".to_string(),
    }
}

fn healthy_cli() -> ScriptedCli {
    ScriptedCli::default()
        .reply(
            "create-metastore",
            r#"{"metastore_id": "19a85dee-54bc-43a2-87ab-023d0ec16013", "name": "unity-catalog"}"#,
            "",
        )
        .reply(
            "create-storage-credential",
            r#"{"id": "5a3d1c1e-0f5c-4c0e-9d3e-0b8b2a8f8f11", "name": "default-credential"}"#,
            "",
        )
        .reply(
            "get-metastore",
            r#"{
                "metastore_id": "19a85dee-54bc-43a2-87ab-023d0ec16013",
                "name": "unity-catalog",
                "owner": "metastore-admin-users",
                "delta_sharing_enabled": true,
                "delta_sharing_recipient_token_lifetime_in_seconds": 31536000
            }"#,
            "",
        )
        .reply("metastore-summary", r#"{"metastore_id": "19a85dee"}"#, "")
}

fn json_arg(args: &[String]) -> Value {
    let pos = args.iter().position(|a| a == "--json").unwrap();
    serde_json::from_str(&args[pos + 1]).unwrap()
}

#[test]
fn test_aws_scenario_command_lines() {
    let client = CliCatalogClient::new(healthy_cli());

    let report = provision_metastore(&client, &aws_params(), &session()).unwrap();
    assert_eq!(report.metastore_id, "19a85dee-54bc-43a2-87ab-023d0ec16013");
    assert_eq!(report.credential_id, "5a3d1c1e-0f5c-4c0e-9d3e-0b8b2a8f8f11");
    assert!(report.delta_sharing_enabled);

    let calls = client.executor().calls.borrow();
    assert_eq!(calls.len(), 11);
    assert_eq!(
        calls[0],
        [
            "create-metastore",
            "--name",
            "unity-catalog",
            "--storage-root",
            "s3://my-uc-bucket"
        ]
    );
    assert_eq!(
        calls[1],
        [
            "assign-metastore",
            "--metastore-id",
            "19a85dee-54bc-43a2-87ab-023d0ec16013",
            "--workspace-id",
            "1234567890",
            "--default-catalog-name",
            "hive_metastore"
        ]
    );
    assert_eq!(
        json_arg(&calls[2]),
        json!({
            "name": "default-credential",
            "aws_iam_role": {"role_arn": "arn:aws:iam::123456789012:role/uc-role"}
        })
    );
    assert_eq!(
        json_arg(&calls[3]),
        json!({
            "name": "unity-catalog",
            "storage_root_credential_id": "5a3d1c1e-0f5c-4c0e-9d3e-0b8b2a8f8f11"
        })
    );
    assert_eq!(json_arg(&calls[5]), json!({"owner": "metastore-admin-users"}));
    assert_eq!(
        json_arg(&calls[7]),
        json!({"changes": [{"principal": "admin@example.com", "add": ["CREATE", "USAGE"]}]})
    );
    assert_eq!(calls[8], ["metastore-summary"]);
    assert_eq!(
        json_arg(&calls[9]),
        json!({
            "delta_sharing_enabled": true,
            "delta_sharing_recipient_token_lifetime_in_seconds": 31536000
        })
    );
    assert_eq!(
        calls[10],
        [
            "get-metastore",
            "--id",
            "19a85dee-54bc-43a2-87ab-023d0ec16013"
        ]
    );
}

#[test]
fn test_existing_metastore_error_is_surfaced_verbatim() {
    let already_exists =
        "Error: RESOURCE_ALREADY_EXISTS: Metastore 'unity-catalog' already exists.\n";
    let client = CliCatalogClient::new(healthy_cli().reply("create-metastore", already_exists, ""));

    let err = provision_metastore(&client, &aws_params(), &session()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::Command(text)) if text == already_exists
    ));
    assert_eq!(client.executor().calls.borrow().len(), 1);
}

#[test]
fn test_stderr_on_assign_aborts() {
    let client = CliCatalogClient::new(healthy_cli().reply(
        "assign-metastore",
        "",
        "Usage: databricks unity-catalog assign-metastore [OPTIONS]\n",
    ));

    let err = provision_metastore(&client, &aws_params(), &session()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Usage: databricks unity-catalog assign-metastore [OPTIONS]\n"
    );
    assert_eq!(client.executor().calls.borrow().len(), 2);
}

#[test]
fn test_status_reports_missing_sharing_flag_as_disabled() {
    let client = CliCatalogClient::new(ScriptedCli::default().reply(
        "get-metastore",
        r#"{"metastore_id": "ms-1", "name": "unity-catalog"}"#,
        "",
    ));

    let info = show_status(&client, "ms-1").unwrap();
    assert_eq!(info.metastore_id, "ms-1");
    assert_eq!(info.delta_sharing_enabled, None);
}
