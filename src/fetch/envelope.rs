//! Response envelope normalization.
//!
//! Every backend response has the shape
//! `{ "status": bool, "message"?: string, <rows-field>: [...], <total-field>?: int }`.
//! A response is successful only if `status` is literally `true`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ListResult, Record};
use crate::error::SyncError;
use crate::resource::ListingShape;

/// Fallback text when a failed response carries no message.
pub const GENERIC_FAILURE: &str = "Operation failed";

/// Server-supplied `message`, when it is a non-blank string.
///
/// Some endpoints put the row array under `message`; arrays are ignored.
#[must_use]
pub fn server_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Checks the `status` flag and returns the body on success.
///
/// # Errors
///
/// Returns [`SyncError::Logical`] with the server message (or a generic
/// text) when `status` is not `true`.
pub fn ensure_success(body: Value) -> Result<Value, SyncError> {
    if body.get("status").and_then(Value::as_bool) == Some(true) {
        Ok(body)
    } else {
        Err(SyncError::Logical(
            server_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ))
    }
}

/// Extracts rows and total from a list response.
///
/// # Errors
///
/// Returns [`SyncError::Logical`] on `status: false`, or
/// [`SyncError::MalformedResponse`] if the rows field is missing, is not an
/// array, or contains non-object entries.
pub fn parse_list(shape: &ListingShape, body: Value) -> Result<ListResult<Record>, SyncError> {
    let mut body = ensure_success(body)?;

    let total = match &shape.total_field {
        Some(field) => Some(read_total(&body, field)?),
        None => None,
    };

    let rows_value = body
        .get_mut(&shape.rows_field)
        .map(Value::take)
        .ok_or_else(|| {
            SyncError::MalformedResponse(format!("missing `{}` array", shape.rows_field))
        })?;
    let Value::Array(items) = rows_value else {
        return Err(SyncError::MalformedResponse(format!(
            "`{}` is not an array",
            shape.rows_field
        )));
    };

    let rows = items
        .into_iter()
        .map(|item| {
            Record::from_value(item).ok_or_else(|| {
                SyncError::MalformedResponse(format!(
                    "`{}` contains a non-object entry",
                    shape.rows_field
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match total {
        Some(total) => ListResult::new(rows, total),
        None => ListResult::complete(rows),
    })
}

/// Deserializes the object stored under `field` of a successful response.
///
/// # Errors
///
/// Returns [`SyncError::Logical`] on `status: false`, or
/// [`SyncError::MalformedResponse`] if the field is missing or does not
/// match `T`.
pub fn parse_document<T: DeserializeOwned>(body: Value, field: &str) -> Result<T, SyncError> {
    let mut body = ensure_success(body)?;
    let value = body
        .get_mut(field)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| SyncError::MalformedResponse(format!("missing `{field}`")))?;
    serde_json::from_value(value)
        .map_err(|e| SyncError::MalformedResponse(format!("`{field}`: {e}")))
}

fn read_total(body: &Value, field: &str) -> Result<u64, SyncError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| {
                SyncError::MalformedResponse(format!("`{field}` is not a non-negative integer"))
            }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paged_shape(rows: &str) -> ListingShape {
        ListingShape {
            rows_field: rows.to_string(),
            total_field: Some("total".to_string()),
        }
    }

    #[test]
    fn status_true_with_total() {
        let body = json!({
            "status": true,
            "data": [{"_id": "a"}, {"_id": "b"}],
            "total": 57
        });
        let Ok(result) = parse_list(&paged_shape("data"), body) else {
            panic!("expected success");
        };
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_count, 57);
    }

    #[test]
    fn rows_under_message_field() {
        let body = json!({
            "status": true,
            "message": [{"_id": "adv1", "name": "Acme"}],
            "total": 1
        });
        let Ok(result) = parse_list(&paged_shape("message"), body) else {
            panic!("expected success");
        };
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn unpaginated_total_is_row_count() {
        let shape = ListingShape {
            rows_field: "data".to_string(),
            total_field: None,
        };
        let body = json!({"status": true, "data": [{"_id": "p1"}, {"_id": "p2"}, {"_id": "p3"}]});
        let Ok(result) = parse_list(&shape, body) else {
            panic!("expected success");
        };
        assert_eq!(result.total_count, 3);
    }

    #[test]
    fn status_false_is_logical_failure_with_message() {
        let body = json!({"status": false, "message": "Campaign locked"});
        let Err(err) = ensure_success(body) else {
            panic!("expected failure");
        };
        assert_eq!(err, SyncError::Logical("Campaign locked".into()));
    }

    #[test]
    fn missing_status_is_failure() {
        let Err(err) = ensure_success(json!({"data": []})) else {
            panic!("expected failure");
        };
        assert_eq!(err, SyncError::Logical(GENERIC_FAILURE.into()));
    }

    #[test]
    fn array_message_is_not_a_server_message() {
        assert_eq!(server_message(&json!({"message": [1, 2]})), None);
        assert_eq!(server_message(&json!({"message": "  "})), None);
        assert_eq!(
            server_message(&json!({"message": "Plan not found"})),
            Some("Plan not found".to_string())
        );
    }

    #[test]
    fn non_array_rows_are_malformed() {
        let body = json!({"status": true, "campaigns": {"_id": "x"}, "total": 1});
        let result = parse_list(&paged_shape("campaigns"), body);
        assert!(matches!(result, Err(SyncError::MalformedResponse(_))));
    }

    #[test]
    fn missing_rows_are_malformed() {
        let body = json!({"status": true, "total": 1});
        let result = parse_list(&paged_shape("campaigns"), body);
        assert!(matches!(result, Err(SyncError::MalformedResponse(_))));
    }

    #[test]
    fn string_total_is_accepted() {
        let body = json!({"status": true, "data": [], "total": "12"});
        let Ok(result) = parse_list(&paged_shape("data"), body) else {
            panic!("expected success");
        };
        assert_eq!(result.total_count, 12);
    }

    #[test]
    fn parse_document_reads_field() {
        #[derive(serde::Deserialize)]
        struct User {
            name: String,
        }
        let body = json!({"status": true, "user": {"name": "Root"}});
        let Ok(user) = parse_document::<User>(body, "user") else {
            panic!("expected user");
        };
        assert_eq!(user.name, "Root");
    }
}
