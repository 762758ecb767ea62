//! Status and body checks of the HTTP contract

use awc::http::StatusCode;
use serde_json::Value;

use super::{AuthorizationResponse, LogoutResponse, Operation, Reply, Violation};

/// Fails unless the reply carries exactly `expected`
pub fn expect_status(reply: &Reply, expected: StatusCode) -> Result<(), Violation> {
    if reply.status != expected {
        return Err(Violation::UnexpectedStatus {
            operation: reply.operation,
            expected: expected.as_u16(),
            actual: reply.status.as_u16(),
            body: reply.excerpt(),
        });
    }
    Ok(())
}

/// 200 with a non-empty `access_token` and a string `token_type`
pub fn authorization(reply: &Reply) -> Result<AuthorizationResponse, Violation> {
    expect_status(reply, StatusCode::OK)?;

    let body = reply.json()?;
    let access_token = non_empty_str(&body, Operation::Authorize, "access_token")?;
    let token_type = body
        .get("token_type")
        .and_then(Value::as_str)
        .ok_or(Violation::MissingField {
            operation: Operation::Authorize,
            field: "token_type",
        })?;

    Ok(AuthorizationResponse {
        access_token: access_token.to_string(),
        token_type: token_type.to_string(),
    })
}

/// 200 with a non-empty `session_id` and `ok: true`
pub fn logout(reply: &Reply) -> Result<LogoutResponse, Violation> {
    expect_status(reply, StatusCode::OK)?;

    let body = reply.json()?;
    let session_id = non_empty_str(&body, Operation::Logout, "session_id")?;
    let ok = body
        .get("ok")
        .and_then(Value::as_bool)
        .ok_or(Violation::MissingField {
            operation: Operation::Logout,
            field: "ok",
        })?;

    if !ok {
        return Err(Violation::LogoutNotOk {
            session_id: session_id.to_string(),
        });
    }

    Ok(LogoutResponse {
        session_id: session_id.to_string(),
        ok,
    })
}

fn non_empty_str<'a>(
    body: &'a Value,
    operation: Operation,
    field: &'static str,
) -> Result<&'a str, Violation> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(Violation::MissingField { operation, field })
}
