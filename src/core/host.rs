//! Host compositor interface.
//!
//! The notification area never owns outputs or views; it observes and drives
//! them through this trait. Any compositor embedding the area supplies one
//! implementation and calls the event entry points on
//! [`AreaState`](crate::core::wayland::notification_area::AreaState) from its
//! own hook dispatch.

use crate::core::errors::Result;
use crate::core::handle::{Geometry, OutputId, Size, SurfaceId, ViewId, VisibilityMask};

/// Capabilities the hosting compositor must provide.
///
/// All operations are synchronous and run inside the host's event dispatch
/// loop; implementations must not block. Handles passed in are always taken
/// from the host's own enumeration or callbacks, never fabricated.
pub trait HostCompositor {
    /// Live outputs, in the host's stacking/registration order.
    ///
    /// The first entry is the fallback adopted when the current output goes
    /// away.
    fn outputs(&self) -> Vec<OutputId>;

    /// Current resolution of an output.
    fn output_resolution(&self, output: OutputId) -> Size;

    /// Visibility mask a view must carry to render on this output.
    fn output_mask(&self, output: OutputId) -> VisibilityMask;

    /// Create an unmanaged, override-redirect view backing a client surface.
    ///
    /// Fails with `AreaError::SurfaceRole` if the surface already has
    /// another role, or `AreaError::ViewCreation` if the host cannot back
    /// it with a view.
    fn view_from_surface(&mut self, surface: SurfaceId) -> Result<ViewId>;

    /// Move a view to an output.
    fn view_set_output(&mut self, view: ViewId, output: OutputId);

    /// Set the visibility mask of a view. An empty mask hides it.
    fn view_set_mask(&mut self, view: ViewId, mask: VisibilityMask);

    /// Current visibility mask of a view.
    fn view_mask(&self, view: ViewId) -> VisibilityMask;

    /// Raise a view to the front of the stacking order.
    fn view_bring_to_front(&mut self, view: ViewId);

    /// Current placement of a view.
    fn view_geometry(&self, view: ViewId) -> Geometry;

    /// Apply a placement to a view.
    fn view_set_geometry(&mut self, view: ViewId, geometry: Geometry);
}
