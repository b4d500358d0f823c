//! Tokens of the fixture VM.

use crate::metadata::token::Token;

// TypeDef
pub const VM: Token = Token(0x0200_0002);
pub const OPERAND: Token = Token(0x0200_0003);
pub const OBJECT_OPERAND: Token = Token(0x0200_0004);
pub const INT_OPERAND: Token = Token(0x0200_0005);
pub const STRING_OPERAND: Token = Token(0x0200_0006);

// TypeRef
pub const RUNTIME_FIELD_HANDLE: Token = Token(0x0100_0001);

// Field
pub const STACK: Token = Token(0x0400_0001);
pub const RETURN_FLAG: Token = Token(0x0400_0002);
pub const IP: Token = Token(0x0400_0003);
pub const OPERAND_CODE: Token = Token(0x0400_0004);
pub const OPERAND_TYPE: Token = Token(0x0400_0005);
pub const OBJECT_VALUE: Token = Token(0x0400_0006);
pub const INT_VALUE: Token = Token(0x0400_0007);
pub const STRING_VALUE: Token = Token(0x0400_0008);

// MethodDef
pub const OBJECT_CTOR: Token = Token(0x0600_0001);
pub const INT_CTOR: Token = Token(0x0600_0002);
pub const STRING_CTOR: Token = Token(0x0600_0003);
pub const PUSH_STACK: Token = Token(0x0600_0004);
pub const POP_STACK: Token = Token(0x0600_0005);
pub const PEEK_STACK: Token = Token(0x0600_0006);
pub const ENABLE_RETURN: Token = Token(0x0600_0007);
pub const RESOLVE_STRING: Token = Token(0x0600_0008);
pub const GET_INT_VALUE: Token = Token(0x0600_0009);
pub const SET_STRING_VALUE: Token = Token(0x0600_000A);
pub const CLONE: Token = Token(0x0600_000B);
pub const RESOLVE_FIELD: Token = Token(0x0600_000C);
pub const RESOLVE_TYPE: Token = Token(0x0600_000D);
pub const BOX_VALUE: Token = Token(0x0600_000E);
pub const TO_OBJECT: Token = Token(0x0600_000F);
pub const SET_TYPE: Token = Token(0x0600_0010);
pub const POP_TWICE: Token = Token(0x0600_0011);
pub const SET_OBJECT_VALUE: Token = Token(0x0600_0012);

// MemberRef
pub const STACK_PUSH: Token = Token(0x0A00_0001);
pub const STACK_POP: Token = Token(0x0A00_0002);
pub const STACK_PEEK: Token = Token(0x0A00_0003);
pub const GET_FIELD_HANDLE: Token = Token(0x0A00_0004);
