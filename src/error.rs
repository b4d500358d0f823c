use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors only surface at construction boundaries: building a [`crate::patterns::PatternCatalog`]
/// or a [`crate::metadata::MetadataStore`]. Matching, verification and resolution are total
/// operations; a handler that cannot be recognized is reported through
/// [`crate::resolver::Resolution`], never through this type.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::Malformed`] - Inconsistent input handed to a builder
/// - [`Error::DuplicateTemplate`] - Two templates registered under one name
/// - [`Error::EmptyTemplate`] - A template without any slot
/// - [`Error::DuplicateToken`] - Two metadata records registered under one token
/// - [`Error::InvalidToken`] - A token whose table does not fit the record kind
///
/// # Examples
///
/// ```rust
/// use handlerscope::{Error, patterns::{PatternCatalog, Template}};
/// use handlerscope::assembly::OpCode;
///
/// let result = PatternCatalog::builder()
///     .template(Template::entire_body("a", Some(OpCode::Nop), &[OpCode::Nop, OpCode::Ret]))
///     .template(Template::entire_body("a", Some(OpCode::Pop), &[OpCode::Pop, OpCode::Ret]))
///     .build();
///
/// assert!(matches!(result, Err(Error::DuplicateTemplate("a"))));
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The provided input is inconsistent and could not be accepted.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A template with this name is already registered in the catalog.
    ///
    /// Template names are the catalog identity; variants of one original opcode
    /// share the opcode but must carry distinct names.
    #[error("Template '{0}' is already registered")]
    DuplicateTemplate(&'static str),

    /// A template was declared without any slot.
    #[error("Template '{0}' has no slots")]
    EmptyTemplate(&'static str),

    /// A metadata record with this token is already registered.
    #[error("Token {0} is already registered")]
    DuplicateToken(Token),

    /// The token's table does not match the kind of record it was registered as.
    #[error("Token {0} does not belong to the expected table")]
    InvalidToken(Token),
}
