use crate::language::Difficulty;
use std::path::PathBuf;

/// Errors raised by text generation, the result store and configuration.
#[derive(Debug, thiserror::Error)]
pub enum TypetestError {
    /// The language key is not one of the supported corpora.
    #[error("invalid language '{0}', allowed values: ru, en")]
    InvalidLanguage(String),

    /// The difficulty key is not a known tier.
    #[error("invalid difficulty '{0}', allowed values: easy, medium, hard, test")]
    InvalidDifficulty(String),

    /// The configuration has no profile for a known difficulty.
    #[error("no difficulty profile configured for '{0}'")]
    MissingProfile(Difficulty),

    #[error("word list not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("no permission to read word list: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TypetestError {
    /// Deployment or request-key problems; retrying will not help.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidLanguage(_)
                | Self::InvalidDifficulty(_)
                | Self::MissingProfile(_)
                | Self::Config(_)
        )
    }

    /// Corpus could not be read; the caller may retry or alert.
    pub fn is_resource(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound(_) | Self::PermissionDenied(_) | Self::Io { .. }
        )
    }

    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::ResourceNotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, TypetestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_resource_variants() {
        let missing = TypetestError::from_io(
            PathBuf::from("nope.txt"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(missing, TypetestError::ResourceNotFound(_)));
        assert!(missing.is_resource());
        assert!(!missing.is_configuration());

        let denied = TypetestError::from_io(
            PathBuf::from("locked.txt"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(denied, TypetestError::PermissionDenied(_)));

        let other = TypetestError::from_io(
            PathBuf::from("broken.txt"),
            std::io::Error::other("disk on fire"),
        );
        assert!(matches!(other, TypetestError::Io { .. }));
        assert!(other.to_string().contains("broken.txt"));
    }

    #[test]
    fn key_errors_are_configuration_errors() {
        assert!(TypetestError::InvalidLanguage("de".into()).is_configuration());
        assert!(TypetestError::InvalidDifficulty("insane".into()).is_configuration());
        assert!(TypetestError::MissingProfile(Difficulty::Hard).is_configuration());
    }
}
