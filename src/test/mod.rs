//! Shared test support.
//!
//! Small builders for instruction sequences plus [`factories`] producing an interpreter-shaped
//! metadata store and one handler body per built-in template.

pub mod factories;

pub use factories::{handlers, tokens, vm_metadata};

use crate::{
    assembly::{Instruction, InstructionSequence, OpCode, Operand},
    metadata::token::Token,
};

/// Operand-less sequence; each instruction's offset is its index.
pub fn body(opcodes: &[OpCode]) -> InstructionSequence {
    opcodes
        .iter()
        .enumerate()
        .map(|(index, &opcode)| Instruction::new(index as u32, opcode, Operand::None))
        .collect()
}

/// Instruction carrying a metadata token operand.
pub fn call(offset: u32, opcode: OpCode, token: Token) -> Instruction {
    Instruction::with_token(offset, opcode, token)
}

/// Sequence from `(opcode, token)` pairs; offsets are indices.
pub fn body_of(instructions: Vec<(OpCode, Option<Token>)>) -> InstructionSequence {
    instructions
        .into_iter()
        .enumerate()
        .map(|(index, (opcode, token))| match token {
            Some(token) => call(index as u32, opcode, token),
            None => Instruction::new(index as u32, opcode, Operand::None),
        })
        .collect()
}
