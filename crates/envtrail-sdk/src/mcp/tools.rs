//! MCP tool handlers.

use serde::Serialize;
use serde_json::{Value, json};

use crate::query::{
    AddToEnvArgs, FinalizeEnvSessionArgs, GetEnvTrackingStatusArgs, ResolveEnvPointerArgs,
    RotateEnvBackupArgs, StartEnvTrackingArgs,
};
use crate::{Client, Error, Result};

fn to_value<T: Serialize>(view: &T) -> Result<Value> {
    serde_json::to_value(view).map_err(|e| Error::Internal(e.into()))
}

pub fn handle_start_env_tracking(client: &mut Client, args: StartEnvTrackingArgs) -> Result<Value> {
    let receipt = client.start_tracking(&args.project_path, &args.chat_topic)?;
    to_value(&receipt)
}

pub fn handle_add_to_env(client: &mut Client, args: AddToEnvArgs) -> Result<Value> {
    let receipt = client.add_exchange(&args.user_message, &args.assistant_message)?;
    to_value(&receipt)
}

pub fn handle_finalize_env_session(
    client: &mut Client,
    args: FinalizeEnvSessionArgs,
) -> Result<Value> {
    let receipt = client.finalize(&args.session_summary)?;
    to_value(&receipt)
}

pub fn handle_rotate_env_backup(client: &Client, args: RotateEnvBackupArgs) -> Result<Value> {
    let receipt = client.rotate(args.project_path.as_deref())?;
    let mut value = to_value(&receipt)?;
    value["rotated"] = json!(receipt.rotated());
    Ok(value)
}

pub fn handle_get_env_tracking_status(
    client: &Client,
    args: GetEnvTrackingStatusArgs,
) -> Result<Value> {
    let report = client.status(args.project_path.as_deref())?;
    to_value(&report)
}

pub fn handle_resolve_env_pointer(client: &Client, args: ResolveEnvPointerArgs) -> Result<Value> {
    let records = client.resolve(args.project_path.as_deref(), &args.reference)?;
    Ok(json!({
        "reference": args.reference,
        "matches": records.len(),
        "records": to_value(&records)?,
    }))
}
