/// Defines the possible data types for Tensor elements.
///
/// The tensor API is non-generic; every operation inspects this tag and
/// dispatches to the matching typed kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}
