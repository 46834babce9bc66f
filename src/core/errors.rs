//! Core error types

use thiserror::Error;

use crate::core::handle::{SurfaceId, ViewId};

/// Errors raised by the notification area engine.
///
/// `AlreadyBound` and `SurfaceRole` are client protocol violations and are
/// relayed to the offending client as wire-level protocol errors; the other
/// variants are host/embedder contract violations, logged and ignored
/// upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AreaError {
    #[error("interface object already bound")]
    AlreadyBound,

    #[error("view {0:?} is already tracked")]
    DuplicateView(ViewId),

    #[error("view {0:?} is not tracked")]
    UnknownView(ViewId),

    #[error("surface {0:?} already has a role")]
    SurfaceRole(SurfaceId),

    #[error("view creation failed for surface {0:?}")]
    ViewCreation(SurfaceId),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, AreaError>;
