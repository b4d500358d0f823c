//! Normalized view of one decoded handler instruction.
//!
//! An [`Instruction`] is the opcode identity plus a typed [`Operand`]. The structural
//! matcher only ever reads [`Instruction::opcode`]; verifiers use the typed operand probes
//! ([`Instruction::method_token`], [`Instruction::member_token`], ...) which answer `None`
//! when the stored operand is of a different kind. A kind mismatch is a normal outcome of
//! probing, not an error.
//!
//! # Examples
//!
//! ```rust
//! use handlerscope::assembly::{Instruction, OpCode, Operand};
//! use handlerscope::metadata::token::Token;
//!
//! let call = Instruction::with_token(0x0001, OpCode::Callvirt, Token::new(0x0600_0004));
//! assert_eq!(call.method_token(), Some(Token::new(0x0600_0004)));
//! assert_eq!(call.member_token(), None);
//!
//! let load = Instruction::new(0x0000, OpCode::Ldarg0, Operand::None);
//! assert!(load.method_token().is_none());
//! ```

use std::fmt;

use crate::{assembly::OpCode, metadata::token::Token};

/// Immediate value embedded in an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// Signed 8-bit value (`ldc.i4.s`)
    Int8(i8),
    /// Unsigned 8-bit value (short-form local/argument indices)
    UInt8(u8),
    /// Unsigned 16-bit value (long-form local/argument indices)
    UInt16(u16),
    /// Signed 32-bit value
    Int32(i32),
    /// Signed 64-bit value
    Int64(i64),
    /// 32-bit float
    Float32(f32),
    /// 64-bit float
    Float64(f64),
}

impl Immediate {
    /// Widens integral immediates to `i64`; floats yield `None`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Immediate::Int8(v) => Some(i64::from(v)),
            Immediate::UInt8(v) => Some(i64::from(v)),
            Immediate::UInt16(v) => Some(i64::from(v)),
            Immediate::Int32(v) => Some(i64::from(v)),
            Immediate::Int64(v) => Some(v),
            Immediate::Float32(_) | Immediate::Float64(_) => None,
        }
    }
}

/// Operand of a decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand present
    None,
    /// Immediate value (constant embedded in instruction)
    Immediate(Immediate),
    /// Branch target offset
    Target(u32),
    /// Metadata token reference (method, member, field, type or string)
    Token(Token),
    /// Local variable index
    Local(u16),
    /// Method argument index
    Argument(u16),
    /// Switch table with multiple signed branch offsets
    Switch(Vec<i32>),
}

impl Operand {
    /// Returns the token if this operand references metadata.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        match self {
            Operand::Token(token) => Some(*token),
            _ => None,
        }
    }
}

/// A decoded instruction within a method body.
#[derive(Clone, PartialEq)]
pub struct Instruction {
    /// IL offset of the instruction inside its method body
    pub offset: u32,
    /// Opcode identity
    pub opcode: OpCode,
    /// Operand data
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction.
    #[must_use]
    pub fn new(offset: u32, opcode: OpCode, operand: Operand) -> Self {
        Instruction {
            offset,
            opcode,
            operand,
        }
    }

    /// Creates an instruction carrying a metadata token operand.
    #[must_use]
    pub fn with_token(offset: u32, opcode: OpCode, token: Token) -> Self {
        Self::new(offset, opcode, Operand::Token(token))
    }

    /// The operand as a `MethodDef` token.
    #[must_use]
    pub fn method_token(&self) -> Option<Token> {
        self.operand.token().filter(Token::is_method_def)
    }

    /// The operand as a `MemberRef` token.
    #[must_use]
    pub fn member_token(&self) -> Option<Token> {
        self.operand.token().filter(Token::is_member_ref)
    }

    /// The operand as a `Field` token.
    #[must_use]
    pub fn field_token(&self) -> Option<Token> {
        self.operand.token().filter(Token::is_field)
    }

    /// The operand as a type token (`TypeDef`, `TypeRef` or `TypeSpec`).
    #[must_use]
    pub fn type_token(&self) -> Option<Token> {
        self.operand.token().filter(Token::is_type)
    }

    /// The operand as an immediate constant.
    #[must_use]
    pub fn immediate(&self) -> Option<Immediate> {
        match self.operand {
            Operand::Immediate(imm) => Some(imm),
            _ => None,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IL_{:04X}: {}", self.offset, self.opcode)?;
        match &self.operand {
            Operand::None => Ok(()),
            Operand::Immediate(imm) => write!(f, " {imm:?}"),
            Operand::Target(t) => write!(f, " IL_{t:04X}"),
            Operand::Token(t) => write!(f, " {t}"),
            Operand::Local(l) => write!(f, " V_{l}"),
            Operand::Argument(a) => write!(f, " A_{a}"),
            Operand::Switch(targets) => write!(f, " switch({})", targets.len()),
        }
    }
}
