//! Response validator — checks a decoded status payload against the shape the
//! API documents before anything downstream touches it.
//!
//! Only the top-level shape is checked. Elements of the item list are kept
//! raw: the interpreter reads the newest one and ignores the rest.
//!
//! Expected shape:
//!
//! ```json
//! { "homeworks": [ { "homework_name": "...", "status": "approved" } ], "current_date": 1700000000 }
//! ```

use serde_json::Value;

use herald_common::error::SchemaError;
use herald_common::types::ApiResponse;

/// Wire key holding the tracked items.
pub const ITEMS_KEY: &str = "homeworks";

/// Wire key holding the next poll cursor.
pub const CURSOR_KEY: &str = "current_date";

pub struct ResponseValidator;

impl ResponseValidator {
    /// Validate a raw payload and convert it into a typed [`ApiResponse`].
    pub fn validate(payload: &Value) -> Result<ApiResponse, SchemaError> {
        let map = payload.as_object().ok_or(SchemaError::NotAMapping)?;

        let items = map.get(ITEMS_KEY).ok_or(SchemaError::MissingItems)?;
        let cursor = map.get(CURSOR_KEY).ok_or(SchemaError::MissingCursor)?;

        let items = items.as_array().ok_or(SchemaError::ItemsNotAList)?.clone();
        let cursor = cursor.as_i64().ok_or(SchemaError::CursorNotInteger)?;

        tracing::debug!(items = items.len(), cursor, "Status response validated");

        Ok(ApiResponse { items, cursor })
    }
}
