//! Built-in template definitions.
//!
//! The definition table is plain data: each submodule returns its templates, and
//! [`builtin_templates`] concatenates them in a fixed order. Registration order matters
//! only for diagnostics output; resolution never depends on it.

mod misc;

use crate::patterns::template::Template;

/// Names of the built-in templates.
///
/// Internal sub-patterns are referenced by these names from other templates' verifiers.
pub mod names {
    /// `ldstr` handler
    pub const LDSTR: &str = "Ldstr";
    /// `ret` handler delegating to the return-flag helper
    pub const RET: &str = "Ret";
    /// `ldnull` handler
    pub const LDNULL: &str = "Ldnull";
    /// `ldc.i4.0` handler
    pub const LDC_I4_0: &str = "LdcI4Zero";
    /// `dup` handler
    pub const DUP: &str = "Dup";
    /// `pop` handler
    pub const POP: &str = "Pop";
    /// `ldtoken` handler (field token path)
    pub const LDTOKEN: &str = "Ldtoken";
    /// `box` handler
    pub const BOX: &str = "Box";

    /// Helper body setting the interpreter's return flag
    pub const ENABLE_RETURN: &str = "EnableReturnFromVMMethod";
    /// `Stack::Peek` access inside the interpreter's peek helper
    pub const PEEK_STACK: &str = "PeekStack";
    /// `Stack::Pop` access inside the interpreter's pop helper
    pub const POP_STACK: &str = "PopStack";
}

/// The full built-in definition table.
#[must_use]
pub fn builtin_templates() -> Vec<Template> {
    misc::templates()
}
