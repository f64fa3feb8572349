/// Represents the physical location where tensor data is stored.
///
/// The device is an explicit tag carried by every tensor; operations check it
/// and refuse mixed-device operands. There is no ambient "current device".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageDevice {
    /// Data is stored in main system memory (RAM).
    /// This is the default device.
    #[default]
    CPU,
    /// Data is stored on an accelerator.
    ///
    /// **Note:** accelerator support is reserved for a future backend crate;
    /// every operation in this crate currently targets the CPU.
    GPU,
}
