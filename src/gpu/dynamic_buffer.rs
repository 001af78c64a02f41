//! Instance buffers that grow when the data outgrows them.
//!
//! Uses a 2x growth strategy and never shrinks, since GPU buffers cannot be
//! resized in place.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A typed GPU buffer that reallocates on overflow.
///
/// Tracks item count rather than byte length.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer initialized from existing data (at least one item's worth of
    /// storage is always allocated).
    #[must_use]
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let zeroed = [T::zeroed()];
        let contents: &[T] = if data.is_empty() { &zeroed } else { data };
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(contents),
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            buffer,
            capacity: contents.len(),
            count: data.len(),
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Write data to the buffer, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups need
    /// recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let needed = data.len();
        let reallocated = if needed > self.capacity {
            let new_capacity = needed * 2;
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: (new_capacity * size_of::<T>()) as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            log::debug!(
                "{}: grew to {} items ({} bytes)",
                self.label,
                new_capacity,
                new_capacity * size_of::<T>()
            );
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = needed;

        reallocated
    }

    /// The underlying `wgpu::Buffer`.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of items last written.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// `true` when no items have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
