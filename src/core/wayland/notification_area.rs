//! notification-area protocol implementation.
//!
//! The gateway between a bound client and the area engine: it enforces the
//! single-binding rule, relays create/move/destroy requests into
//! [`NotificationArea`], and pushes `geometry` events whenever the binder
//! recomputes them.
//!
//! The embedding compositor owns one [`AreaState`], registers the global via
//! [`AreaState::register_global`] and forwards its output/view lifecycle
//! hooks to the `on_*` methods.

use wayland_server::{
    Client, DataInit, Dispatch, DisplayHandle, GlobalDispatch, New, Resource,
};

use crate::core::area::NotificationArea;
use crate::core::errors::AreaError;
use crate::core::handle::{GeometryUpdate, OutputId, SurfaceId, ViewId};
use crate::core::host::HostCompositor;
use crate::protocol::notification_area::server::{
    znotification_area_v1::{self, ZnotificationAreaV1},
    znotification_v1::{self, ZnotificationV1},
};

/// Data stored with each notification object.
///
/// `view` is `None` only for objects whose creation was rejected with a
/// protocol error; the error kills the client, but the new id must still be
/// entered into the protocol map.
#[derive(Debug, Clone, Copy)]
pub struct NotificationData {
    pub view: Option<ViewId>,
}

/// Protocol state for one notification area global.
pub struct AreaState {
    host: Box<dyn HostCompositor>,
    area: NotificationArea,
    binding: Option<ZnotificationAreaV1>,
}

impl AreaState {
    pub fn new(host: Box<dyn HostCompositor>) -> Self {
        Self { host, area: NotificationArea::new(), binding: None }
    }

    /// Register the znotification_area_v1 global.
    pub fn register_global(display: &DisplayHandle) -> wayland_server::backend::GlobalId {
        display.create_global::<AreaState, ZnotificationAreaV1, ()>(1, ())
    }

    pub fn area(&self) -> &NotificationArea {
        &self.area
    }

    pub fn host(&self) -> &dyn HostCompositor {
        &*self.host
    }

    fn publish_geometry(&self, update: GeometryUpdate) {
        if let Some(binding) = &self.binding {
            binding.geometry(update.width, update.height, update.scale);
        }
    }

    // ------------------------------------------------------------------
    // Host event adapter
    // ------------------------------------------------------------------

    /// output.created hook. The returned flag is the host's continuation
    /// signal; the area never blocks output creation.
    pub fn on_output_created(&mut self, output: OutputId) -> bool {
        let (cont, update) = self.area.handle_output_created(&mut *self.host, output);
        if let Some(update) = update {
            self.publish_geometry(update);
        }
        cont
    }

    /// output.destroyed hook.
    pub fn on_output_destroyed(&mut self, output: OutputId) {
        if let Some(update) = self.area.handle_output_destroyed(&mut *self.host, output) {
            self.publish_geometry(update);
        }
    }

    /// output.resolution_changed hook.
    pub fn on_output_resolution_changed(&mut self, output: OutputId) {
        if let Some(update) = self.area.handle_output_resolution_changed(&mut *self.host, output)
        {
            self.publish_geometry(update);
        }
    }

    /// output.focus_changed hook.
    pub fn on_output_focus(&mut self, output: OutputId, focused: bool) {
        if let Some(update) = self.area.handle_output_focus(&mut *self.host, output, focused) {
            self.publish_geometry(update);
        }
    }

    /// view.destroyed hook.
    pub fn on_view_destroyed(&mut self, view: ViewId) {
        self.area.handle_view_destroyed(view);
    }

    /// Module teardown. The embedder is expected to also remove the global
    /// it registered.
    pub fn shutdown(&mut self) {
        self.area.shutdown();
        self.binding = None;
    }
}

// ============================================================================
// znotification_area_v1 GlobalDispatch
// ============================================================================

impl GlobalDispatch<ZnotificationAreaV1, ()> for AreaState {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &Client,
        resource: New<ZnotificationAreaV1>,
        _global_data: &(),
        data_init: &mut DataInit<'_, Self>,
    ) {
        let resource = data_init.init(resource, ());

        match state.area.bind(&*state.host) {
            Ok(update) => {
                tracing::debug!(client = ?resource.client().map(|c| c.id()), "notification area bound");
                state.binding = Some(resource);
                state.publish_geometry(update);
            }
            Err(AreaError::AlreadyBound) => {
                resource.post_error(
                    znotification_area_v1::Error::Bound,
                    "interface object already bound",
                );
            }
            Err(err) => {
                tracing::error!(%err, "unexpected bind failure");
            }
        }
    }
}

// ============================================================================
// znotification_area_v1 Dispatch
// ============================================================================

impl Dispatch<ZnotificationAreaV1, ()> for AreaState {
    fn request(
        state: &mut Self,
        _client: &Client,
        resource: &ZnotificationAreaV1,
        request: znotification_area_v1::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut DataInit<'_, Self>,
    ) {
        match request {
            znotification_area_v1::Request::CreateNotification { id, surface } => {
                let surface_id = SurfaceId(surface.id().protocol_id());

                match state.host.view_from_surface(surface_id) {
                    Ok(view) => {
                        if let Err(err) = state.area.track_view(&mut *state.host, view) {
                            // Host handed out a handle it already reported.
                            tracing::warn!(%err, "dropping notification for reused view handle");
                            data_init.init(id, NotificationData { view: None });
                            return;
                        }
                        let notification = data_init.init(id, NotificationData { view: Some(view) });
                        tracing::debug!(?view, id = ?notification.id(), "notification created");
                    }
                    Err(AreaError::SurfaceRole(_)) => {
                        data_init.init(id, NotificationData { view: None });
                        resource.post_error(
                            znotification_area_v1::Error::Role,
                            "surface already has a role",
                        );
                    }
                    Err(err) => {
                        tracing::warn!(%err, ?surface_id, "notification view creation failed");
                        data_init.init(id, NotificationData { view: None });
                    }
                }
            }
            znotification_area_v1::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &ZnotificationAreaV1,
        _data: &(),
    ) {
        if state.binding.as_ref().map(|b| b.id()) == Some(resource.id()) {
            tracing::debug!("notification area binding released");
            state.binding = None;
            state.area.unbind();
        }
    }
}

// ============================================================================
// znotification_v1 Dispatch
// ============================================================================

impl Dispatch<ZnotificationV1, NotificationData> for AreaState {
    fn request(
        state: &mut Self,
        _client: &Client,
        _resource: &ZnotificationV1,
        request: znotification_v1::Request,
        data: &NotificationData,
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, Self>,
    ) {
        match request {
            znotification_v1::Request::Move { x, y } => {
                let Some(view) = data.view else { return };
                if let Err(err) = state.area.move_view(&mut *state.host, view, x, y) {
                    tracing::warn!(%err, "move request on untracked view");
                }
            }
            znotification_v1::Request::Destroy => {
                // The wire object goes away; the registry entry lives until
                // the host reports the backing view destroyed.
            }
            _ => {}
        }
    }
}
