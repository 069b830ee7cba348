// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types shared by every content layer.

use thiserror::Error;

/// A convenient result alias for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Coarse classification of a [`ContentError`], used by callers that branch on
/// the failure family rather than the exact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a malformed asset name.
    InvalidInput,
    /// No source could provide the requested asset.
    NotFound,
    /// The asset exists but has a different runtime type.
    TypeMismatch,
    /// The raw store failed for a reason other than a missing asset.
    Storage,
    /// A managed asset key named an owner with no registered manager.
    UnhandledPrefix,
    /// The manager or coordinator was used after disposal.
    Disposed,
    /// The configuration could not be read.
    Config,
}

/// Errors raised while resolving, loading or invalidating content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The asset name was empty or contained only whitespace.
    #[error("The asset key or local path is empty.")]
    EmptyName,

    /// The asset name contained characters that are never valid in a path.
    #[error("The asset key or local path '{0}' contains invalid characters.")]
    InvalidCharacters(String),

    /// An absolute path was passed where a relative asset key is required.
    #[error("The asset key must not be an absolute path: '{0}'.")]
    AbsolutePath(String),

    /// No loader, managed owner or raw source could provide the asset.
    #[error("Couldn't find asset '{0}'.")]
    NotFound(String),

    /// The asset was found with a runtime type other than the one requested.
    #[error("Asset '{name}' has type '{actual}', but type '{expected}' was requested.")]
    TypeMismatch {
        /// The asset name as requested.
        name: String,
        /// The type name requested by the caller.
        expected: &'static str,
        /// The type name of the stored value.
        actual: &'static str,
    },

    /// The raw store failed for a reason other than a missing asset.
    #[error("Failed to load asset '{name}' from the raw store")]
    RawLoad {
        /// The asset name being read.
        name: String,
        /// The underlying store failure.
        #[source]
        source: anyhow::Error,
    },

    /// A managed key referred to an owner that has no registered content manager.
    #[error("The '{prefix}' prefix matches no registered content manager (while loading '{key}').")]
    UnhandledManagedPrefix {
        /// The `<managed prefix>/<owner id>` part of the key.
        prefix: String,
        /// The full managed key.
        key: String,
    },

    /// The content manager was used after disposal.
    #[error("Cannot access content manager '{0}' after it was disposed.")]
    ManagerDisposed(String),

    /// The coordinator was used after disposal, or dropped while a manager still referenced it.
    #[error("The content coordinator is no longer available.")]
    CoordinatorDisposed,

    /// A relative path climbed out of its root with `..`.
    #[error("The asset path '{0}' must stay inside its folder.")]
    PathEscapesRoot(String),

    /// The content configuration could not be parsed.
    #[error("Invalid content configuration: {0}")]
    Config(String),
}

impl ContentError {
    /// Returns the failure family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::EmptyName
            | ContentError::InvalidCharacters(_)
            | ContentError::AbsolutePath(_)
            | ContentError::PathEscapesRoot(_) => ErrorKind::InvalidInput,
            ContentError::NotFound(_) => ErrorKind::NotFound,
            ContentError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ContentError::RawLoad { .. } => ErrorKind::Storage,
            ContentError::UnhandledManagedPrefix { .. } => ErrorKind::UnhandledPrefix,
            ContentError::ManagerDisposed(_) | ContentError::CoordinatorDisposed => {
                ErrorKind::Disposed
            }
            ContentError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether this error means the asset simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
