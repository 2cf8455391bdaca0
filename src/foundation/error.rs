/// Convenience result type used across inkframe.
pub type InkResult<T> = Result<T, InkError>;

/// Top-level error taxonomy used by the rendering, cache and rotation APIs.
#[derive(thiserror::Error, Debug)]
pub enum InkError {
    /// Unreadable source image, non-positive dimensions, bit lengths that do not pack.
    #[error("input error: {0}")]
    Input(String),

    /// Configuration that cannot be substituted by a default (e.g. an empty palette).
    #[error("config error: {0}")]
    Config(String),

    /// Rendering or persisting a derived artifact failed. Safe to retry from scratch.
    #[error("build failure: {0}")]
    BuildFailure(String),

    /// No source images are registered in the rotation.
    #[error("sequence empty: {0}")]
    SequenceEmpty(String),

    /// Waiting on an in-flight build exceeded the caller's patience. Transient.
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkError {
    /// Build an [`InkError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build an [`InkError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`InkError::BuildFailure`] value.
    pub fn build_failure(msg: impl Into<String>) -> Self {
        Self::BuildFailure(msg.into())
    }

    /// Build an [`InkError::SequenceEmpty`] value.
    pub fn sequence_empty(msg: impl Into<String>) -> Self {
        Self::SequenceEmpty(msg.into())
    }

    /// Build an [`InkError::Concurrency`] value.
    pub fn concurrency(msg: impl Into<String>) -> Self {
        Self::Concurrency(msg.into())
    }

    /// Copy of this error for a second receiver. `Other` keeps its rendered chain only.
    pub(crate) fn duplicate(&self) -> Self {
        match self {
            Self::Input(m) => Self::Input(m.clone()),
            Self::Config(m) => Self::Config(m.clone()),
            Self::BuildFailure(m) => Self::BuildFailure(m.clone()),
            Self::SequenceEmpty(m) => Self::SequenceEmpty(m.clone()),
            Self::Concurrency(m) => Self::Concurrency(m.clone()),
            Self::Other(e) => Self::Other(anyhow::anyhow!("{e:#}")),
        }
    }

    /// `true` for errors where retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Concurrency(_) | Self::BuildFailure(_))
    }
}

impl From<rusqlite::Error> for InkError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Other(anyhow::Error::new(e).context("catalog query"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
