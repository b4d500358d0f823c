//! Handler templates and the engine that matches them.
//!
//! A virtualizing obfuscator replaces method bodies with bytecode for its own interpreter,
//! and each interpreter opcode is implemented by a small *handler* method. The handlers of
//! one protector family keep a recognizable instruction shape across builds even though
//! names, tokens and opcode numbers are randomized. This module describes those shapes as
//! [`Template`]s, collects them in a [`PatternCatalog`] and matches them against handler
//! bodies.
//!
//! # Architecture
//!
//! Recognition happens in two stages:
//!
//! 1. **Structural matching** ([`matcher`]) compares opcode identities slot by slot.
//!    A slot is either an exact opcode or an [`OpCodeClass`] of interchangeable opcodes,
//!    and a template either has to cover the whole body ([`MatchMode::EntireBody`]) or only
//!    a contiguous window of it ([`MatchMode::PrefixWindow`]).
//! 2. **Verification** ([`Verifier`]) runs only after a structural match and inspects
//!    operand metadata through a [`VerifyContext`]: return and parameter types of called
//!    methods, field layouts of constructed types, or sub-patterns matched inside helper
//!    bodies.
//!
//! # Key Components
//!
//! - [`Template`] / [`SlotSpec`] / [`OpCodeClass`] / [`Interchange`] - Template model
//! - [`PatternCatalog`] / [`PatternCatalogBuilder`] - Frozen template registry
//! - [`matcher`] - Structural matching, verification and match location
//! - [`VerifyContext`] - Metadata probes available to verifiers
//! - [`names`] - Names of the built-in templates
//!
//! # Examples
//!
//! ```rust
//! use handlerscope::assembly::OpCode;
//! use handlerscope::patterns::{names, PatternCatalog};
//!
//! let catalog = PatternCatalog::global();
//! let pop = catalog.by_name(names::POP).unwrap();
//! assert_eq!(pop.id(), Some(OpCode::Pop));
//! assert_eq!(pop.len(), 4);
//! ```
//!
//! # Thread Safety
//!
//! Templates and catalogs are immutable once built and [`Send`] + [`Sync`]; verifiers are
//! plain function pointers. A single catalog is shared by all resolver workers.

mod catalog;
mod defs;
pub mod matcher;
mod template;
mod verify;

pub use catalog::{PatternCatalog, PatternCatalogBuilder};
pub use defs::names;
pub use matcher::MatchEnv;
pub use template::{
    Anchor, Interchange, MatchMode, OpCodeClass, SlotSpec, Template, Verifier,
};
pub use verify::VerifyContext;
