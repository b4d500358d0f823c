//! # handlerscope Prelude
//!
//! The types needed to build metadata, run the built-in catalog over handler bodies and
//! read the resulting bindings.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all handlerscope operations
pub use crate::Error;

/// The result type used throughout handlerscope
pub use crate::Result;

// ================================================================================================
// Instruction Model
// ================================================================================================

/// Decoded CIL instructions and handler bodies
pub use crate::assembly::{Immediate, Instruction, InstructionSequence, OpCode, Operand};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Resolved metadata records and the probe boundary
pub use crate::metadata::{
    FieldInfo, MemberRefInfo, MetadataProbe, MetadataStore, MetadataStoreBuilder, MethodInfo,
    MethodSignature, TypeInfo,
};

// ================================================================================================
// Patterns
// ================================================================================================

/// Template model and catalog
pub use crate::patterns::{
    Anchor, Interchange, MatchMode, OpCodeClass, PatternCatalog, PatternCatalogBuilder,
    SlotSpec, Template, Verifier, VerifyContext,
};

// ================================================================================================
// Resolution
// ================================================================================================

/// Batch resolution and its results
pub use crate::resolver::{
    Binding, Handler, HandlerId, Outcome, Resolution, Resolver, ResolverConfig,
    UnresolvedReason,
};
