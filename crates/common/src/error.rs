use thiserror::Error;

/// Fatal startup errors. These are the only errors allowed to stop the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Shape violations in a decoded status response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("not a mapping")]
    NotAMapping,

    #[error("missing items")]
    MissingItems,

    #[error("missing cursor")]
    MissingCursor,

    #[error("items not a list")]
    ItemsNotAList,

    #[error("cursor not an integer")]
    CursorNotInteger,
}

/// Every way a single poll cycle can fail.
///
/// All variants are recovered at the loop boundary: logged, then retried
/// after the fixed sleep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {status} from status endpoint")]
    HttpStatus { status: u16 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Tracked item has no name")]
    MissingName,

    #[error("Undocumented review status: {0:?}")]
    UndocumentedStatus(String),

    #[error("Review status {0:?} has an empty verdict")]
    EmptyStatus(String),

    #[error("Rendered message does not contain the verdict for {status:?}")]
    RenderMismatch { status: String },
}

impl PipelineError {
    /// Whether the failure happened before a response was obtained.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PipelineError::Transport(_) | PipelineError::HttpStatus { .. } | PipelineError::Decode(_)
        )
    }
}
