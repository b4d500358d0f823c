//! Metadata token representation.
//!
//! A token is a 32-bit value whose high byte names the metadata table and whose
//! low 24 bits are the 1-based row inside that table. Handler bodies reference
//! methods, fields and types exclusively through tokens; the table byte is what
//! the typed operand probes on [`crate::assembly::Instruction`] inspect.

use std::fmt;

/// Table byte of `TypeRef` tokens.
pub const TABLE_TYPEREF: u8 = 0x01;
/// Table byte of `TypeDef` tokens.
pub const TABLE_TYPEDEF: u8 = 0x02;
/// Table byte of `Field` tokens.
pub const TABLE_FIELD: u8 = 0x04;
/// Table byte of `MethodDef` tokens.
pub const TABLE_METHODDEF: u8 = 0x06;
/// Table byte of `MemberRef` tokens.
pub const TABLE_MEMBERREF: u8 = 0x0A;
/// Table byte of `TypeSpec` tokens.
pub const TABLE_TYPESPEC: u8 = 0x1B;
/// Table byte of `MethodSpec` tokens.
pub const TABLE_METHODSPEC: u8 = 0x2B;
/// Pseudo-table byte of user-string heap references (`ldstr`).
pub const TABLE_USERSTRING: u8 = 0x70;

/// A metadata token.
///
/// # Examples
///
/// ```rust
/// use handlerscope::metadata::token::Token;
///
/// let token = Token::new(0x0600_0012);
/// assert_eq!(token.table(), 0x06);
/// assert_eq!(token.row(), 0x12);
/// assert!(token.is_method_def());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a token from its raw value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table byte and a row.
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the table byte.
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the row inside the table.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` for the nil token.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the token references a `MethodDef` row.
    #[must_use]
    pub fn is_method_def(&self) -> bool {
        self.table() == TABLE_METHODDEF
    }

    /// Returns `true` if the token references a `MemberRef` row.
    #[must_use]
    pub fn is_member_ref(&self) -> bool {
        self.table() == TABLE_MEMBERREF
    }

    /// Returns `true` if the token references a `Field` row.
    #[must_use]
    pub fn is_field(&self) -> bool {
        self.table() == TABLE_FIELD
    }

    /// Returns `true` if the token references a type (`TypeDef`, `TypeRef` or `TypeSpec`).
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(
            self.table(),
            TABLE_TYPEDEF | TABLE_TYPEREF | TABLE_TYPESPEC
        )
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
