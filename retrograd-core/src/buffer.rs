use std::sync::Arc;

use crate::device::StorageDevice;
use crate::error::RetrogradError;

/// Enum representing different buffer types based on device and data type.
///
/// `TensorData` holds one of these; views share the same `Arc`ed storage.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Data resides on the CPU.
    Cpu(CpuBuffer),
}

/// Enum for CPU-specific buffer types.
#[derive(Debug, Clone)]
pub enum CpuBuffer {
    /// Buffer holding f32 data on the CPU.
    F32(Arc<Vec<f32>>),
    /// Buffer holding f64 data on the CPU.
    F64(Arc<Vec<f64>>),
}

impl Buffer {
    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>` if this is a CPU F32 buffer.
    pub fn try_get_cpu_f32(&self) -> Result<&Arc<Vec<f32>>, RetrogradError> {
        match self {
            Buffer::Cpu(CpuBuffer::F32(data_arc)) => Ok(data_arc),
            Buffer::Cpu(_) => Err(RetrogradError::UnsupportedOperation(
                "Buffer is CPU but not F32 type".to_string(),
            )),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f64>>` if this is a CPU F64 buffer.
    pub fn try_get_cpu_f64(&self) -> Result<&Arc<Vec<f64>>, RetrogradError> {
        match self {
            Buffer::Cpu(CpuBuffer::F64(data_arc)) => Ok(data_arc),
            Buffer::Cpu(_) => Err(RetrogradError::UnsupportedOperation(
                "Buffer is CPU but not F64 type".to_string(),
            )),
        }
    }

    /// The device this buffer lives on.
    pub fn device(&self) -> StorageDevice {
        match self {
            Buffer::Cpu(_) => StorageDevice::CPU,
        }
    }
}
