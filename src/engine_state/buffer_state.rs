//! # Buffer State Module
//!
//! This module provides the allocation seam between mesh construction and GPU memory.
//! A [`MeshAllocator`] turns a finished vertex list into a buffer and later releases
//! it again; the scheduler owns every buffer it receives in a [`ChunkMeshHandle`].
//!
//! ## Implementations
//!
//! * [`WgpuMeshAllocator`] - One `VERTEX` buffer per chunk on a `wgpu::Device`
//! * [`HostMeshAllocator`] - Vertex lists kept in host memory, for headless runs and tests
//!
//! Both track how much memory is resident and can be given a budget. Running over the
//! budget, or the device reporting an allocation error, is a recoverable
//! [`ChunkError`]: the chunk stays pending and is retried on a later update.
//!
//! Empty meshes never reach an allocator. Their handle has no buffer and a vertex count of zero.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::{
    engine_state::{rendering::Vertex, voxels::chunk::ChunkCoordinate},
    error::ChunkError,
};

/// Size of one vertex in bytes.
pub const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

/// Creates and releases the GPU-side storage of chunk meshes.
pub trait MeshAllocator {
    /// The resource holding one chunk's vertices.
    type Buffer;

    /// Uploads `vertices` for the chunk at `coordinate`.
    ///
    /// `vertices` is never empty.
    fn allocate(
        &mut self,
        coordinate: ChunkCoordinate,
        vertices: &[Vertex],
    ) -> Result<Self::Buffer, ChunkError>;

    /// Frees a buffer previously returned by [`allocate`](Self::allocate).
    fn release(&mut self, buffer: Self::Buffer);
}

/// The mesh of one chunk as owned by the scheduler.
#[derive(Debug)]
pub struct ChunkMeshHandle<B> {
    /// `None` when the chunk has no geometry
    buffer: Option<B>,
    vertex_count: u32,
}

impl<B> ChunkMeshHandle<B> {
    /// A handle for a chunk with no geometry.
    pub fn empty() -> Self {
        ChunkMeshHandle {
            buffer: None,
            vertex_count: 0,
        }
    }

    pub(crate) fn new(buffer: B, vertex_count: u32) -> Self {
        ChunkMeshHandle {
            buffer: Some(buffer),
            vertex_count,
        }
    }

    pub fn buffer(&self) -> Option<&B> {
        self.buffer.as_ref()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Takes the buffer out so it can be handed back to its allocator.
    pub(crate) fn into_buffer(self) -> Option<B> {
        self.buffer
    }
}

/// Memory accounting shared by the allocators.
///
/// Tracks the bytes currently allocated against an optional upper bound.
#[derive(Debug, Clone, Copy, Default)]
struct BufferAnalytics {
    /// Bytes currently allocated
    allocated_memory: u64,
    /// Number of live buffers
    live_buffers: u64,
    /// Upper bound on `allocated_memory`, if any
    budget: Option<u64>,
}

impl BufferAnalytics {
    fn with_budget(budget: Option<u64>) -> Self {
        BufferAnalytics {
            budget,
            ..Default::default()
        }
    }

    fn available(&self) -> u64 {
        match self.budget {
            Some(budget) => budget.saturating_sub(self.allocated_memory),
            None => u64::MAX,
        }
    }

    /// Fails if `requested` bytes do not fit in the remaining budget.
    fn check(&self, coordinate: ChunkCoordinate, requested: u64) -> Result<(), ChunkError> {
        let available = self.available();
        if requested > available {
            return Err(ChunkError::ResourceExhausted {
                coordinate,
                requested_bytes: requested,
                available_bytes: available,
            });
        }
        Ok(())
    }

    fn record_allocation(&mut self, bytes: u64) {
        self.allocated_memory = self.allocated_memory.saturating_add(bytes);
        self.live_buffers += 1;
    }

    fn record_release(&mut self, bytes: u64) {
        self.allocated_memory = self.allocated_memory.saturating_sub(bytes);
        self.live_buffers = self.live_buffers.saturating_sub(1);
    }
}

/// A chunk mesh kept in host memory.
#[derive(Debug, Clone)]
pub struct HostMeshBuffer {
    coordinate: ChunkCoordinate,
    vertices: Arc<[Vertex]>,
}

impl HostMeshBuffer {
    pub fn coordinate(&self) -> ChunkCoordinate {
        self.coordinate
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

/// Keeps meshes in host memory.
///
/// # Examples
///
/// ```
/// use voxel_stream::{ChunkCoordinate, HostMeshAllocator, MeshAllocator, Vertex};
///
/// let mut allocator = HostMeshAllocator::with_vertex_budget(6);
/// let quad = [Vertex::new(cgmath::Point3::new(0, 0, 0), [1.0; 4], [0.0, 1.0, 0.0]); 6];
///
/// let buffer = allocator.allocate(ChunkCoordinate::new(0, 0), &quad).unwrap();
/// assert!(allocator.allocate(ChunkCoordinate::new(1, 0), &quad).is_err());
///
/// allocator.release(buffer);
/// assert_eq!(allocator.resident_vertices(), 0);
/// ```
#[derive(Debug, Default)]
pub struct HostMeshAllocator {
    analytics: BufferAnalytics,
}

impl HostMeshAllocator {
    /// An allocator without a budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator that holds at most `max_vertices` vertices at a time.
    ///
    /// Budgets past `u64::MAX` bytes saturate and behave as unlimited.
    pub fn with_vertex_budget(max_vertices: u64) -> Self {
        HostMeshAllocator {
            analytics: BufferAnalytics::with_budget(Some(max_vertices.saturating_mul(VERTEX_SIZE))),
        }
    }

    /// Replaces the budget. Buffers already allocated are kept even if they exceed it.
    pub fn set_vertex_budget(&mut self, max_vertices: Option<u64>) {
        self.analytics.budget = max_vertices.map(|v| v.saturating_mul(VERTEX_SIZE));
    }

    pub fn resident_vertices(&self) -> u64 {
        self.analytics.allocated_memory / VERTEX_SIZE
    }

    pub fn live_buffers(&self) -> u64 {
        self.analytics.live_buffers
    }
}

impl MeshAllocator for HostMeshAllocator {
    type Buffer = HostMeshBuffer;

    fn allocate(
        &mut self,
        coordinate: ChunkCoordinate,
        vertices: &[Vertex],
    ) -> Result<Self::Buffer, ChunkError> {
        let bytes = vertices.len() as u64 * VERTEX_SIZE;
        self.analytics.check(coordinate, bytes)?;
        self.analytics.record_allocation(bytes);

        Ok(HostMeshBuffer {
            coordinate,
            vertices: vertices.into(),
        })
    }

    fn release(&mut self, buffer: Self::Buffer) {
        self.analytics
            .record_release(buffer.vertices.len() as u64 * VERTEX_SIZE);
    }
}

/// Creates one vertex buffer per chunk on a `wgpu` device.
///
/// Buffer creation runs inside out-of-memory and validation error scopes. The scopes
/// are resolved synchronously with `pollster`, so an allocation failure is reported
/// from the same [`allocate`](MeshAllocator::allocate) call instead of surfacing later
/// as an uncaptured device error.
pub struct WgpuMeshAllocator {
    device: wgpu::Device,
    analytics: BufferAnalytics,
}

impl WgpuMeshAllocator {
    /// Creates an allocator on `device`.
    ///
    /// # Arguments
    ///
    /// * `device` - The device the vertex buffers are created on
    /// * `byte_budget` - Optional upper bound on the bytes of all live vertex buffers
    pub fn new(device: wgpu::Device, byte_budget: Option<u64>) -> Self {
        WgpuMeshAllocator {
            device,
            analytics: BufferAnalytics::with_budget(byte_budget),
        }
    }

    pub fn live_buffers(&self) -> u64 {
        self.analytics.live_buffers
    }
}

impl MeshAllocator for WgpuMeshAllocator {
    type Buffer = wgpu::Buffer;

    fn allocate(
        &mut self,
        coordinate: ChunkCoordinate,
        vertices: &[Vertex],
    ) -> Result<Self::Buffer, ChunkError> {
        let contents: &[u8] = bytemuck::cast_slice(vertices);
        self.analytics.check(coordinate, contents.len() as u64)?;

        let label = format!("Chunk Vertex Buffer {coordinate}");
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        let validation = pollster::block_on(self.device.pop_error_scope());

        if let Err(error) = scope_result(coordinate, out_of_memory, validation) {
            buffer.destroy();
            return Err(error);
        }

        self.analytics.record_allocation(buffer.size());
        Ok(buffer)
    }

    fn release(&mut self, buffer: Self::Buffer) {
        self.analytics.record_release(buffer.size());
        buffer.destroy();
    }
}

/// Maps the errors captured by the out-of-memory and validation scopes of one
/// allocation. Out-of-memory wins when both fired.
fn scope_result<E: std::fmt::Display>(
    coordinate: ChunkCoordinate,
    out_of_memory: Option<E>,
    validation: Option<E>,
) -> Result<(), ChunkError> {
    match out_of_memory.or(validation) {
        Some(error) => Err(ChunkError::GpuAllocation {
            coordinate,
            message: error.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn quad() -> Vec<Vertex> {
        vec![Vertex::new(Point3::new(1, 2, 3), [1.0; 4], [0.0, 0.0, 1.0]); 6]
    }

    #[test]
    fn host_allocator_tracks_resident_vertices() {
        let mut allocator = HostMeshAllocator::new();
        let a = allocator.allocate(ChunkCoordinate::new(0, 0), &quad()).unwrap();
        let b = allocator.allocate(ChunkCoordinate::new(0, 1), &quad()).unwrap();
        assert_eq!(allocator.resident_vertices(), 12);
        assert_eq!(allocator.live_buffers(), 2);
        assert_eq!(b.coordinate(), ChunkCoordinate::new(0, 1));
        assert_eq!(a.vertices(), quad().as_slice());

        allocator.release(a);
        allocator.release(b);
        assert_eq!(allocator.resident_vertices(), 0);
        assert_eq!(allocator.live_buffers(), 0);
    }

    #[test]
    fn budget_overflow_is_recoverable() {
        let mut allocator = HostMeshAllocator::with_vertex_budget(8);
        let first = allocator.allocate(ChunkCoordinate::new(0, 0), &quad()).unwrap();

        let error = allocator
            .allocate(ChunkCoordinate::new(5, 5), &quad())
            .unwrap_err();
        assert!(error.is_recoverable());
        match error {
            ChunkError::ResourceExhausted {
                coordinate,
                requested_bytes,
                available_bytes,
            } => {
                assert_eq!(coordinate, ChunkCoordinate::new(5, 5));
                assert_eq!(requested_bytes, 6 * VERTEX_SIZE);
                assert_eq!(available_bytes, 2 * VERTEX_SIZE);
            }
            other => panic!("unexpected error {other}"),
        }

        allocator.release(first);
        assert!(allocator.allocate(ChunkCoordinate::new(5, 5), &quad()).is_ok());
    }

    #[test]
    fn huge_vertex_budget_saturates() {
        let mut allocator = HostMeshAllocator::with_vertex_budget(u64::MAX);
        assert!(allocator.allocate(ChunkCoordinate::new(0, 0), &quad()).is_ok());

        allocator.set_vertex_budget(Some(u64::MAX / 2));
        assert!(allocator.allocate(ChunkCoordinate::new(0, 1), &quad()).is_ok());
        assert_eq!(allocator.resident_vertices(), 12);
    }

    #[test]
    fn byte_budget_is_checked_before_the_device() {
        let mut analytics = BufferAnalytics::with_budget(Some(100));
        let coordinate = ChunkCoordinate::new(-2, 7);
        assert!(analytics.check(coordinate, 100).is_ok());

        analytics.record_allocation(60);
        match analytics.check(coordinate, 41) {
            Err(ChunkError::ResourceExhausted {
                requested_bytes,
                available_bytes,
                ..
            }) => assert_eq!((requested_bytes, available_bytes), (41, 40)),
            other => panic!("unexpected result {other:?}"),
        }

        analytics.record_release(60);
        assert_eq!(analytics.live_buffers, 0);
        assert!(analytics.check(coordinate, 100).is_ok());
    }

    #[test]
    fn captured_scope_errors_become_gpu_allocation_errors() {
        let coordinate = ChunkCoordinate::new(3, 4);
        assert!(scope_result::<String>(coordinate, None, None).is_ok());

        let error = scope_result(coordinate, None, Some("buffer size exceeds limit".to_string()))
            .unwrap_err();
        assert!(error.is_recoverable());
        match error {
            ChunkError::GpuAllocation {
                coordinate: failed,
                message,
            } => {
                assert_eq!(failed, coordinate);
                assert_eq!(message, "buffer size exceeds limit");
            }
            other => panic!("unexpected error {other}"),
        }

        let error = scope_result(
            coordinate,
            Some("out of memory".to_string()),
            Some("validation".to_string()),
        )
        .unwrap_err();
        assert!(matches!(error, ChunkError::GpuAllocation { message, .. } if message == "out of memory"));
    }

    #[test]
    fn empty_handle_has_no_buffer() {
        let handle: ChunkMeshHandle<HostMeshBuffer> = ChunkMeshHandle::empty();
        assert!(handle.is_empty());
        assert_eq!(handle.vertex_count(), 0);
        assert!(handle.into_buffer().is_none());
    }
}
