//! Allocation accounting for growable bytecode buffers.
//!
//! Buffers grow geometrically and report every capacity change to an
//! [`AllocationCounter`] owned by whoever performs the growth. The counter is
//! informational; nothing in the VM reads it.

use std::mem::size_of;

/// Next capacity for a growable buffer.
pub const fn grow_capacity(capacity: usize) -> usize {
    if capacity < 8 {
        8
    } else {
        capacity * 2
    }
}

/// Running total of bytes held by the buffers that report to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationCounter {
    bytes_allocated: usize,
}

impl AllocationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resize from `old_size` to `new_size` bytes.
    pub fn record(&mut self, old_size: usize, new_size: usize) {
        if new_size >= old_size {
            self.bytes_allocated += new_size - old_size;
        } else {
            self.bytes_allocated = self.bytes_allocated.saturating_sub(old_size - new_size);
        }
    }

    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    pub fn reset(&mut self) {
        self.bytes_allocated = 0;
    }
}

/// Push onto `buf`, growing it with [`grow_capacity`] when full and reporting
/// the growth to `counter`.
pub fn push_tracked<T>(buf: &mut Vec<T>, value: T, counter: &mut AllocationCounter) {
    if buf.len() == buf.capacity() {
        let old_capacity = buf.capacity();
        let new_capacity = grow_capacity(old_capacity);
        buf.reserve_exact(new_capacity - buf.len());
        counter.record(
            old_capacity * size_of::<T>(),
            buf.capacity() * size_of::<T>(),
        );
    }
    buf.push(value);
}

/// Release `buf` and report the freed bytes to `counter`.
pub fn free_tracked<T>(buf: &mut Vec<T>, counter: &mut AllocationCounter) {
    counter.record(buf.capacity() * size_of::<T>(), 0);
    *buf = Vec::new();
}
