//! Opaque host handles and geometry types.
//!
//! Outputs, views and surfaces belong to the hosting compositor; this module
//! only names them. Handles are resolved through [`HostCompositor`] accessor
//! calls on every use and never cached across an event boundary.
//!
//! [`HostCompositor`]: crate::core::host::HostCompositor

/// Handle to a display output managed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u64);

/// Handle to a host-managed drawable surface instance (a view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Protocol identifier of a client surface, as reported by the wire layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Output visibility bitmask. An empty mask hides a view everywhere.
pub type VisibilityMask = u32;

/// The empty visibility mask.
pub const MASK_HIDDEN: VisibilityMask = 0;

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A size in surface-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Placement of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub origin: Point,
    pub size: Size,
}

/// Geometry published to the bound client on bind and on output changes.
///
/// A zero size means no output is currently available. The scale is a
/// placeholder until the host reports per-output scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryUpdate {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
}

impl GeometryUpdate {
    /// Update sent while no output is current.
    pub fn zero() -> Self {
        Self { width: 0, height: 0, scale: 1 }
    }
}
