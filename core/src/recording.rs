// Headless RenderBackend that records every call instead of touching a GPU.
// Used by tests and benchmarks.
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use glam::Mat4;

use crate::backend::{AttributeBinding, FrameScheduler, RenderBackend};
use crate::error::BackendError;
use crate::frame::Viewport;

pub type Handle = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileProgram(Handle),
    AllocateBuffer { handle: Handle, floats: usize },
    BindAttributes { handle: Handle, attributes: Vec<String> },
    BeginFrame(Viewport),
    ActivateProgram(Handle),
    SetUniform { name: String, matrix: Mat4 },
    Draw { vertex_array: Handle, vertex_count: u32 },
    EndFrame,
    ReleaseBuffer(Handle),
    ReleaseVertexArray(Handle),
    ReleaseProgram(Handle),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<Handle>,
    live: RefCell<BTreeSet<Handle>>,
    // number of successful allocations before the next one fails
    fail_allocation_after: Cell<Option<usize>>,
    compile_error: RefCell<Option<BackendError>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn draw_calls(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Draw { vertex_count, .. } => Some(*vertex_count),
                _ => None,
            })
            .collect()
    }

    // Handles allocated and not yet released
    pub fn live_handles(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn fail_allocation_after(&self, successes: usize) {
        self.fail_allocation_after.set(Some(successes));
    }

    pub fn fail_compile_with(&self, err: BackendError) {
        *self.compile_error.borrow_mut() = Some(err);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> Result<Handle, BackendError> {
        match self.fail_allocation_after.get() {
            Some(0) => {
                self.fail_allocation_after.set(None);
                return Err(BackendError::Allocation("out of memory".into()));
            }
            Some(n) => self.fail_allocation_after.set(Some(n - 1)),
            None => {}
        }
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.borrow_mut().insert(handle);
        Ok(handle)
    }

    fn release(&self, handle: Handle) {
        let was_live = self.live.borrow_mut().remove(&handle);
        debug_assert!(was_live, "handle {handle} released twice");
    }
}

impl RenderBackend for RecordingBackend {
    type Buffer = Handle;
    type VertexArray = Handle;
    type Program = Handle;
    type UniformLocation = String;

    fn compile_program(&self, _vertex_src: &str, _fragment_src: &str) -> Result<Handle, BackendError> {
        if let Some(err) = self.compile_error.borrow_mut().take() {
            return Err(err);
        }
        let handle = self.allocate()?;
        self.record(Call::CompileProgram(handle));
        Ok(handle)
    }

    fn uniform_location(&self, _program: &Handle, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn allocate_vertex_buffer(&self, data: &[f32]) -> Result<Handle, BackendError> {
        let handle = self.allocate()?;
        self.record(Call::AllocateBuffer {
            handle,
            floats: data.len(),
        });
        Ok(handle)
    }

    fn bind_attributes(
        &self,
        _program: &Handle,
        bindings: &[AttributeBinding<'_, Handle>],
    ) -> Result<Handle, BackendError> {
        let handle = self.allocate()?;
        self.record(Call::BindAttributes {
            handle,
            attributes: bindings.iter().map(|b| b.name.to_string()).collect(),
        });
        Ok(handle)
    }

    fn begin_frame(&self, viewport: Viewport, _clear_color: [f32; 4]) {
        self.record(Call::BeginFrame(viewport));
    }

    fn activate_program(&self, program: &Handle) {
        self.record(Call::ActivateProgram(*program));
    }

    fn set_uniform_mat4(&self, location: Option<&String>, matrix: &Mat4) {
        if let Some(name) = location {
            self.record(Call::SetUniform {
                name: name.clone(),
                matrix: *matrix,
            });
        }
    }

    fn draw_triangles(&self, vertex_array: &Handle, vertex_count: u32) {
        self.record(Call::Draw {
            vertex_array: *vertex_array,
            vertex_count,
        });
    }

    fn end_frame(&self) {
        self.record(Call::EndFrame);
    }

    fn release_buffer(&self, buffer: Handle) {
        self.release(buffer);
        self.record(Call::ReleaseBuffer(buffer));
    }

    fn release_vertex_array(&self, vertex_array: Handle) {
        self.release(vertex_array);
        self.record(Call::ReleaseVertexArray(vertex_array));
    }

    fn release_program(&self, program: Handle) {
        self.release(program);
        self.record(Call::ReleaseProgram(program));
    }
}

// Counts frame requests
#[derive(Debug, Default)]
pub struct CountingScheduler {
    requests: Cell<usize>,
}

impl CountingScheduler {
    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl FrameScheduler for CountingScheduler {
    fn schedule_next_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}
