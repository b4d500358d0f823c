//! Interpreter-shaped fixtures.
//!
//! The fixtures model a small VM: an instance type holding the evaluation stack and the
//! return flag, an operand base type (`int32` code plus `System.Type`) with wrappers for
//! object, int32 and string values, and the helper methods handlers call into.

pub mod handlers;
pub mod tokens;
mod vm;

pub use vm::vm_metadata;
