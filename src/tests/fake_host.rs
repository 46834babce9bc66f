//! Recording host double for engine tests.

use std::collections::HashMap;

use crate::core::errors::{AreaError, Result};
use crate::core::handle::{
    Geometry, OutputId, Size, SurfaceId, ViewId, VisibilityMask, MASK_HIDDEN,
};
use crate::core::host::HostCompositor;

#[derive(Debug, Clone, Copy)]
pub struct FakeOutput {
    pub resolution: Size,
    pub mask: VisibilityMask,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FakeView {
    pub output: Option<OutputId>,
    pub mask: VisibilityMask,
    pub geometry: Geometry,
    pub raised: u32,
}

/// In-memory host: outputs and views are plain table entries, every view
/// operation is recorded for assertions.
#[derive(Debug, Default)]
pub struct FakeHost {
    outputs: Vec<(OutputId, FakeOutput)>,
    views: HashMap<ViewId, FakeView>,
    surface_roles: HashMap<SurfaceId, ViewId>,
    next_id: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Plug in a new output with the given resolution. The mask is a single
    /// distinct bit per output, like a host numbering its outputs.
    pub fn add_output(&mut self, width: u32, height: u32) -> OutputId {
        let id = OutputId(self.next_id());
        let mask = 1 << (self.outputs.len() % 32);
        let output = FakeOutput { resolution: Size { width, height }, mask };
        self.outputs.push((id, output));
        id
    }

    /// Unplug an output. Views left pointing at it keep their stale handle,
    /// as a real host would until they are reassigned.
    pub fn remove_output(&mut self, output: OutputId) {
        self.outputs.retain(|(id, _)| *id != output);
    }

    pub fn set_resolution(&mut self, output: OutputId, width: u32, height: u32) {
        let entry = self
            .outputs
            .iter_mut()
            .find(|(id, _)| *id == output)
            .expect("unknown fake output");
        entry.1.resolution = Size { width, height };
    }

    /// A bare view, as if the host had already backed a surface with it.
    pub fn new_view(&mut self) -> ViewId {
        let id = ViewId(self.next_id());
        self.views.insert(id, FakeView::default());
        id
    }

    pub fn view(&self, view: ViewId) -> &FakeView {
        self.views.get(&view).expect("unknown fake view")
    }
}

impl HostCompositor for FakeHost {
    fn outputs(&self) -> Vec<OutputId> {
        self.outputs.iter().map(|(id, _)| *id).collect()
    }

    fn output_resolution(&self, output: OutputId) -> Size {
        self.outputs
            .iter()
            .find(|(id, _)| *id == output)
            .map(|(_, o)| o.resolution)
            .unwrap_or_default()
    }

    fn output_mask(&self, output: OutputId) -> VisibilityMask {
        self.outputs
            .iter()
            .find(|(id, _)| *id == output)
            .map(|(_, o)| o.mask)
            .unwrap_or(MASK_HIDDEN)
    }

    fn view_from_surface(&mut self, surface: SurfaceId) -> Result<ViewId> {
        if self.surface_roles.contains_key(&surface) {
            return Err(AreaError::SurfaceRole(surface));
        }
        let view = self.new_view();
        self.surface_roles.insert(surface, view);
        Ok(view)
    }

    fn view_set_output(&mut self, view: ViewId, output: OutputId) {
        self.views.get_mut(&view).expect("unknown fake view").output = Some(output);
    }

    fn view_set_mask(&mut self, view: ViewId, mask: VisibilityMask) {
        self.views.get_mut(&view).expect("unknown fake view").mask = mask;
    }

    fn view_mask(&self, view: ViewId) -> VisibilityMask {
        self.view(view).mask
    }

    fn view_bring_to_front(&mut self, view: ViewId) {
        self.views.get_mut(&view).expect("unknown fake view").raised += 1;
    }

    fn view_geometry(&self, view: ViewId) -> Geometry {
        self.view(view).geometry
    }

    fn view_set_geometry(&mut self, view: ViewId, geometry: Geometry) {
        self.views.get_mut(&view).expect("unknown fake view").geometry = geometry;
    }
}
