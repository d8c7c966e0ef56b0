use std::path::PathBuf;
use thiserror::Error;

use crate::data::{AssignmentId, UserId};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration file not found in '{0}'")]
    NotFound(PathBuf),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to access snapshot file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Returned when an intent is refused. State is left untouched whenever one
/// of these is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no user is signed in")]
    NotSignedIn,
    #[error("user '{0}' doesn't exist")]
    UnknownUser(UserId),
    #[error("user '{0}' is not an admin")]
    NotAdmin(UserId),
    #[error("user '{actor}' did not create assignment '{assignment}'")]
    NotCreator {
        actor: UserId,
        assignment: AssignmentId,
    },
    #[error("group must have at least one member")]
    EmptyGroup,
    #[error("user '{0}' is not a member of any group")]
    NoGroup(UserId),
}
