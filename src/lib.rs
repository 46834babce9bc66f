// Alcove
//
// Notification-area surface placement protocol for Wayland compositors.
// The core engine tracks client notification surfaces and keeps them bound
// to the single current output; an embedding compositor supplies the
// HostCompositor implementation and forwards its lifecycle hooks.

pub mod core;
pub mod protocol;
pub mod util;

pub use crate::core::area::NotificationArea;
pub use crate::core::errors::AreaError;
pub use crate::core::handle::{Geometry, GeometryUpdate, OutputId, Point, Size, SurfaceId, ViewId};
pub use crate::core::host::HostCompositor;
pub use crate::core::wayland::notification_area::AreaState;

#[cfg(test)]
mod tests;
