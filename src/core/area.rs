//! Notification area engine.
//!
//! This module contains the output/view binding logic of the notification
//! area, separate from the Wayland protocol mechanics: a registry of live
//! notification views keyed by their host view handle, and the binder that
//! keeps every visible notification attached to the single current output.
//!
//! The engine holds no wire resources; the gateway in
//! `core::wayland::notification_area` forwards the [`GeometryUpdate`] values
//! returned here to the bound client.

use std::collections::HashMap;

use crate::core::errors::{AreaError, Result};
use crate::core::handle::{GeometryUpdate, OutputId, ViewId, MASK_HIDDEN};
use crate::core::host::HostCompositor;

/// A tracked notification surface.
///
/// Visibility is not stored here; it is derived from the view's visibility
/// mask, which the host owns.
#[derive(Debug, Clone, Copy)]
pub struct Notification {
    /// Backing view handle, unique among live notifications.
    pub view: ViewId,
}

/// The notification area: current output plus tracked notifications.
///
/// One instance exists per embedding compositor. All operations run to
/// completion inside the host's event dispatch loop; there is no interior
/// locking.
#[derive(Debug, Default)]
pub struct NotificationArea {
    current_output: Option<OutputId>,
    notifications: HashMap<ViewId, Notification>,
    bound: bool,
}

impl NotificationArea {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Track a newly created notification view, initially hidden.
    ///
    /// Fails with [`AreaError::DuplicateView`] if the view is already
    /// tracked; the host reporting the same view twice is a contract
    /// violation.
    pub fn track_view(&mut self, host: &mut dyn HostCompositor, view: ViewId) -> Result<()> {
        if self.notifications.contains_key(&view) {
            return Err(AreaError::DuplicateView(view));
        }
        self.notifications.insert(view, Notification { view });
        // Hidden until the binder assigns an output or the client moves it.
        host.view_set_mask(view, MASK_HIDDEN);
        tracing::debug!(?view, "tracking notification view");
        Ok(())
    }

    /// Forget a view. Removing an absent view is a no-op; hosts may report
    /// the same destruction from two paths.
    pub fn untrack_view(&mut self, view: ViewId) -> bool {
        let removed = self.notifications.remove(&view).is_some();
        if removed {
            tracing::debug!(?view, "notification view destroyed");
        }
        removed
    }

    pub fn find_by_view(&self, view: ViewId) -> Option<&Notification> {
        self.notifications.get(&view)
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    /// Visit every live view. The closure may untrack the view it is handed
    /// (or any other); entries removed mid-iteration are skipped.
    pub fn for_each_view<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, ViewId),
    {
        let views: Vec<ViewId> = self.notifications.keys().copied().collect();
        for view in views {
            if !self.notifications.contains_key(&view) {
                continue;
            }
            f(self, view);
        }
    }

    // ------------------------------------------------------------------
    // Output binder
    // ------------------------------------------------------------------

    pub fn output(&self) -> Option<OutputId> {
        self.current_output
    }

    /// Make `output` the current output and reattach visible notifications.
    ///
    /// Called with the already-current output this only recomputes geometry,
    /// which covers the resolution-changed case. With `None` every visible
    /// notification is hidden instead of reassigned.
    ///
    /// The returned update must be (re)published to the bound client even
    /// when the output is unchanged.
    pub fn set_output(
        &mut self,
        host: &mut dyn HostCompositor,
        output: Option<OutputId>,
    ) -> GeometryUpdate {
        let update = Self::geometry_of(host, output);

        if self.current_output != output {
            tracing::info!(from = ?self.current_output, to = ?output, "notification area output changed");
            self.current_output = output;

            self.for_each_view(|area, view| {
                if host.view_mask(view) == MASK_HIDDEN {
                    // Never shown; stays hidden until the client moves it.
                    return;
                }
                area.assign_view(&mut *host, view, output);
            });
        }

        update
    }

    /// Attach a view to an output (or hide it when `output` is `None`).
    fn assign_view(&mut self, host: &mut dyn HostCompositor, view: ViewId, output: Option<OutputId>) {
        match output {
            None => host.view_set_mask(view, MASK_HIDDEN),
            Some(output) => {
                host.view_set_output(view, output);
                host.view_set_mask(view, host.output_mask(output));
                host.view_bring_to_front(view);
            }
        }
    }

    fn geometry_of(host: &dyn HostCompositor, output: Option<OutputId>) -> GeometryUpdate {
        match output {
            None => GeometryUpdate::zero(),
            Some(output) => {
                let size = host.output_resolution(output);
                GeometryUpdate { width: size.width, height: size.height, scale: 1 }
            }
        }
    }

    /// Geometry of the current output, as published on bind.
    pub fn geometry(&self, host: &dyn HostCompositor) -> GeometryUpdate {
        Self::geometry_of(host, self.current_output)
    }

    // ------------------------------------------------------------------
    // Client requests
    // ------------------------------------------------------------------

    /// Apply a client move request to a notification view.
    ///
    /// A move on a hidden notification also attempts to attach it to the
    /// current output; the client positioning it is taken as intent to show
    /// it.
    pub fn move_view(
        &mut self,
        host: &mut dyn HostCompositor,
        view: ViewId,
        x: i32,
        y: i32,
    ) -> Result<()> {
        if !self.notifications.contains_key(&view) {
            return Err(AreaError::UnknownView(view));
        }

        let mut geometry = host.view_geometry(view);
        geometry.origin.x = x;
        geometry.origin.y = y;
        host.view_set_geometry(view, geometry);

        if host.view_mask(view) == MASK_HIDDEN {
            let output = self.current_output;
            self.assign_view(host, view, output);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Binding state machine
    // ------------------------------------------------------------------

    /// Record a client binding. At most one may be live; a second attempt
    /// fails without disturbing the first.
    pub fn bind(&mut self, host: &dyn HostCompositor) -> Result<GeometryUpdate> {
        if self.bound {
            return Err(AreaError::AlreadyBound);
        }
        self.bound = true;
        Ok(self.geometry(host))
    }

    /// Clear the client binding. Tracked notifications are untouched.
    pub fn unbind(&mut self) {
        self.bound = false;
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    // ------------------------------------------------------------------
    // Host event policy
    // ------------------------------------------------------------------
    //
    // Each handler returns the geometry update to republish when the binder
    // ran, or `None` when the event was ignored.

    /// A new output appeared. Adopted only while no output is current.
    /// The returned flag is the host's hook continuation signal.
    pub fn handle_output_created(
        &mut self,
        host: &mut dyn HostCompositor,
        output: OutputId,
    ) -> (bool, Option<GeometryUpdate>) {
        let update = if self.current_output.is_none() {
            Some(self.set_output(host, Some(output)))
        } else {
            None
        };
        (true, update)
    }

    /// An output went away. If it was current, fall back to the first output
    /// the host still enumerates, or none.
    pub fn handle_output_destroyed(
        &mut self,
        host: &mut dyn HostCompositor,
        output: OutputId,
    ) -> Option<GeometryUpdate> {
        if self.current_output != Some(output) {
            return None;
        }
        let fallback = host.outputs().into_iter().find(|o| *o != output);
        Some(self.set_output(host, fallback))
    }

    /// An output's resolution changed. Only the current output matters; the
    /// binder re-runs with the same handle to force a geometry republish.
    pub fn handle_output_resolution_changed(
        &mut self,
        host: &mut dyn HostCompositor,
        output: OutputId,
    ) -> Option<GeometryUpdate> {
        if self.current_output != Some(output) {
            return None;
        }
        Some(self.set_output(host, Some(output)))
    }

    /// An output gained or lost focus. Focus loss is ignored; a newly
    /// focused output is always adopted as current.
    pub fn handle_output_focus(
        &mut self,
        host: &mut dyn HostCompositor,
        output: OutputId,
        focused: bool,
    ) -> Option<GeometryUpdate> {
        if !focused {
            return None;
        }
        Some(self.set_output(host, Some(output)))
    }

    /// The host destroyed a view. Idempotent.
    pub fn handle_view_destroyed(&mut self, view: ViewId) {
        self.untrack_view(view);
    }

    /// Tear down at module shutdown: drop every tracked entry and the
    /// binding. Views are owned by the host and not touched.
    pub fn shutdown(&mut self) {
        let remaining = self.notifications.len();
        if remaining > 0 {
            tracing::info!(remaining, "tearing down notification area with live notifications");
        }
        self.notifications.clear();
        self.bound = false;
        self.current_output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fake_host::FakeHost;

    #[test]
    fn track_rejects_duplicate_view() {
        let mut host = FakeHost::new();
        let mut area = NotificationArea::new();
        let view = host.new_view();

        area.track_view(&mut host, view).unwrap();
        assert_eq!(
            area.track_view(&mut host, view),
            Err(AreaError::DuplicateView(view))
        );
        assert_eq!(area.notification_count(), 1);
    }

    #[test]
    fn untrack_is_idempotent() {
        let mut host = FakeHost::new();
        let mut area = NotificationArea::new();
        let view = host.new_view();

        area.track_view(&mut host, view).unwrap();
        assert!(area.untrack_view(view));
        assert!(!area.untrack_view(view));
        assert_eq!(area.notification_count(), 0);
    }

    #[test]
    fn for_each_tolerates_removal_of_current_entry() {
        let mut host = FakeHost::new();
        let mut area = NotificationArea::new();
        let views: Vec<_> = (0..4).map(|_| host.new_view()).collect();
        for view in &views {
            area.track_view(&mut host, *view).unwrap();
        }

        let mut visited = 0;
        area.for_each_view(|area, view| {
            visited += 1;
            area.untrack_view(view);
        });

        assert_eq!(visited, views.len());
        assert_eq!(area.notification_count(), 0);
    }

    #[test]
    fn move_on_unknown_view_is_an_error() {
        let mut host = FakeHost::new();
        let mut area = NotificationArea::new();
        let view = host.new_view();

        assert_eq!(
            area.move_view(&mut host, view, 10, 10),
            Err(AreaError::UnknownView(view))
        );
    }

    #[test]
    fn bind_twice_rejects_second_binding() {
        let host = FakeHost::new();
        let mut area = NotificationArea::new();

        area.bind(&host).unwrap();
        assert_eq!(area.bind(&host), Err(AreaError::AlreadyBound));
        assert!(area.is_bound());

        area.unbind();
        assert!(area.bind(&host).is_ok());
    }

    #[test]
    fn bind_with_no_output_reports_zero_geometry() {
        let host = FakeHost::new();
        let mut area = NotificationArea::new();

        let update = area.bind(&host).unwrap();
        assert_eq!(update, GeometryUpdate::zero());
    }
}
