use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Review statuses the service documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Approved,
        ReviewStatus::Reviewing,
        ReviewStatus::Rejected,
    ];

    /// Parse a wire status. Returns `None` for anything undocumented.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict phrase sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "Reviewed: the reviewer liked everything. Hooray!",
            ReviewStatus::Reviewing => "Work has been taken up for review.",
            ReviewStatus::Rejected => "Reviewed: the reviewer has remarks.",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Wire keys accepted for the item name, in lookup order.
pub const NAME_KEYS: [&str; 2] = ["homework_name", "name"];

/// Wire key holding the item status.
pub const STATUS_KEY: &str = "status";

/// One tracked item as reported by the status API.
///
/// Both fields are optional at this layer; the interpreter decides what a
/// missing name or status means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedItem {
    pub name: Option<String>,
    pub status: Option<String>,
}

impl TrackedItem {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
        }
    }

    /// Read an item from its raw JSON form. Never fails.
    ///
    /// A non-string name is treated as absent. A non-string status keeps its
    /// JSON text (`5`, `null`) so it is reported as undocumented rather than
    /// silently dropped. Anything that is not a mapping yields an empty item.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let name = NAME_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_str)
            .map(str::to_string);

        let status = map.get(STATUS_KEY).map(|status| match status {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self { name, status }
    }
}

/// A status response that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Most recent first, as ordered by the server. Elements are kept raw;
    /// only the records the interpreter reads are ever inspected.
    pub items: Vec<Value>,
    /// Lower bound of the next poll window (seconds since epoch).
    pub cursor: i64,
}
