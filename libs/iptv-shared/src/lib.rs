//! Request and response bodies of the panel HTTP API.
//!
//! Fields that end up in the store are kept as raw JSON values: a body only
//! has to contain them, their types are left to the database columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub user_id: Value,
    pub user_code: Value,
    #[serde(default)]
    pub expiry_date: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserResponse {
    pub user_id: Value,
}

/// Body of the ban and unban endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    pub user_id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewUserRequest {
    pub user_id: Value,
    pub new_expiry_date: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCreditRequest {
    pub reseller_id: Value,
    pub amount: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub user_id: Value,
    pub user_code: Value,
    pub role: Value,
    pub password: String,
}

/// Echo of a registration, without the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub user_id: Value,
    pub user_code: Value,
    pub role: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Renders a request value for messages and logs: strings without quotes,
/// anything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_use_camel_case_keys() {
        let req: RenewUserRequest =
            serde_json::from_str(r#"{"userId":"u1","newExpiryDate":"2031-01-01"}"#).unwrap();
        assert_eq!(req.user_id, "u1");
        assert_eq!(req.new_expiry_date, "2031-01-01");
    }

    #[test]
    fn add_user_expiry_may_be_omitted() {
        let req: AddUserRequest =
            serde_json::from_str(r#"{"userId":"u1","userCode":"C"}"#).unwrap();
        assert!(req.expiry_date.is_null());
    }

    #[test]
    fn field_types_are_not_checked_but_presence_is() {
        let req: AddCreditRequest =
            serde_json::from_str(r#"{"resellerId":7,"amount":"50"}"#).unwrap();
        assert_eq!(req.reseller_id, json!(7));
        assert_eq!(req.amount, json!("50"));

        assert!(serde_json::from_str::<AddCreditRequest>(r#"{"resellerId":"r1"}"#).is_err());
    }

    #[test]
    fn display_value_drops_string_quotes() {
        assert_eq!(display_value(&json!("u1")), "u1");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&Value::Null), "null");
    }
}
