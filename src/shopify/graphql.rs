//! GraphQL documents and payloads for theme assets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::RemoteError;

pub(super) const ASSET_CREATE: &str = "\
mutation assetCreate($input: AssetInput!) {
  assetCreate(input: $input) {
    asset { key }
    userErrors { field message }
  }
}";

pub(super) const ASSET_DELETE: &str = "\
mutation assetDelete($input: AssetDeleteInput!) {
  assetDelete(input: $input) {
    deletedAssetId
    userErrors { field message }
  }
}";

#[derive(Debug, Serialize)]
pub(super) struct Request<'a> {
    pub query: &'static str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct Variables<'a> {
    pub input: AssetInput<'a>,
}

/// `AssetInput` / `AssetDeleteInput`; deletes carry no `content`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssetInput<'a> {
    pub key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    pub theme_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    errors: Option<Vec<Value>>,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    #[serde(default)]
    field: Option<Vec<String>>,
    message: String,
}

/// Check a 200 response body for top-level `errors` and mutation
/// `userErrors`.
pub(super) fn check_response(operation: &'static str, body: &str) -> Result<(), RemoteError> {
    let response: Response = serde_json::from_str(body).map_err(|_| RemoteError::Decode {
        status: 200,
        body: body.to_string(),
    })?;

    if response.errors.is_some_and(|errors| !errors.is_empty()) {
        return Err(RemoteError::GraphQl {
            status: 200,
            body: body.to_string(),
        });
    }

    let user_errors: Vec<UserError> = response
        .data
        .as_ref()
        .and_then(|data| data.get(operation))
        .and_then(|payload| payload.get("userErrors"))
        .and_then(|errors| serde_json::from_value(errors.clone()).ok())
        .unwrap_or_default();

    if user_errors.is_empty() {
        return Ok(());
    }

    let messages = user_errors
        .iter()
        .map(|err| match err.field.as_deref() {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), err.message),
            _ => err.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(RemoteError::UserErrors {
        operation,
        messages,
    })
}
