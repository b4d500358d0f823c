//! Operand metadata consumed by handler verifiers.
//!
//! Handler bodies reference the interpreter's helper methods, operand wrapper types and
//! framework members through metadata tokens. Verification needs to look behind those
//! tokens: the return type of a called helper, the field layout of a constructed operand
//! wrapper and of its base type, or the body of a delegated-to helper method.
//!
//! # Key Components
//!
//! - [`token`] - Metadata table row references
//! - [`MethodInfo`], [`MemberRefInfo`], [`TypeInfo`], [`FieldInfo`], [`MethodSignature`] -
//!   Resolved record projections
//! - [`MetadataProbe`] - Lookup boundary implemented by the module loader
//! - [`MetadataStore`] - Immutable in-memory probe implementation

mod model;
mod probe;
/// Commonly used metadata token type
pub mod token;

pub use model::{
    FieldInfo, MemberRefInfo, MethodInfo, MethodSignature, TypeInfo, VOID_TYPE_NAME,
};
pub use probe::{MetadataProbe, MetadataStore, MetadataStoreBuilder};
