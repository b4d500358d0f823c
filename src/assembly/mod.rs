//! CIL instruction model consumed by the pattern engine.
//!
//! This module provides the normalized, read-only view of handler method bodies:
//!
//! - [`OpCode`] - Every ECMA-335 opcode, used both as live opcode identity and as
//!   the original opcode a template recognizes
//! - [`Instruction`] / [`Operand`] / [`Immediate`] - One decoded instruction with typed operand probes
//! - [`InstructionSequence`] - The ordered body of one method
//!
//! Decoding method bodies from a PE image is the job of the metadata loader feeding this
//! crate; everything here is constructed from already-decoded data.

mod instruction;
mod opcodes;
mod sequence;

pub use instruction::{Immediate, Instruction, Operand};
pub use opcodes::{OpCode, FE_PREFIX};
pub use sequence::InstructionSequence;
