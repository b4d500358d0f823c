//! Read-only ordered instruction list of one method body.

use std::ops::Index;

use crate::assembly::{Instruction, OpCode};

/// The decoded instructions of one method body, in IL order.
///
/// The sequence is immutable once built: it exposes indexed access and iteration only.
/// Out-of-range access through [`InstructionSequence::get`] returns `None`.
///
/// # Examples
///
/// ```rust
/// use handlerscope::assembly::{Instruction, InstructionSequence, OpCode, Operand};
///
/// let body: InstructionSequence = [OpCode::Ldarg0, OpCode::Ret]
///     .into_iter()
///     .enumerate()
///     .map(|(i, op)| Instruction::new(i as u32, op, Operand::None))
///     .collect();
///
/// assert_eq!(body.len(), 2);
/// assert_eq!(body[1].opcode, OpCode::Ret);
/// assert!(body.get(2).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionSequence {
    instructions: Vec<Instruction>,
}

impl InstructionSequence {
    /// Wraps decoded instructions.
    #[must_use]
    pub fn new(instructions: Vec<Instruction>) -> Self {
        InstructionSequence { instructions }
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the body holds no instruction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Iterates the instructions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Borrows the instructions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates the opcode identities in order.
    pub fn opcodes(&self) -> impl Iterator<Item = OpCode> + '_ {
        self.instructions.iter().map(|ins| ins.opcode)
    }
}

impl Index<usize> for InstructionSequence {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instructions[index]
    }
}

impl From<Vec<Instruction>> for InstructionSequence {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl FromIterator<Instruction> for InstructionSequence {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a InstructionSequence {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
