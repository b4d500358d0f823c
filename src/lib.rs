// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # handlerscope
//!
//! Recognition of virtualized-code interpreter handlers in .NET assemblies.
//!
//! Protectors that virtualize method bodies ship an interpreter whose opcode handlers are
//! ordinary CIL methods. Opcode numbers, names and tokens are randomized per build, but the
//! instruction shape of each handler is stable. `handlerscope` matches handler bodies against
//! a catalog of such shapes, confirms candidates by inspecting operand metadata, and produces
//! a table binding every handler to the original CIL opcode it implements.
//!
//! ## Quick Start
//!
//! ```rust
//! use handlerscope::prelude::*;
//!
//! // Metadata comes from the module loader; an empty store is enough for unverified shapes.
//! let store = MetadataStore::default();
//! let resolver = Resolver::new(PatternCatalog::global(), &store);
//!
//! let handlers = vec![Handler::missing(0x2A)];
//! let resolution = resolver.resolve(&handlers);
//! assert_eq!(resolution.summary(), "0 bound, 1 unresolved, 0 ambiguous");
//! ```
//!
//! ## Architecture
//!
//! - [`assembly`] - CIL opcodes, instructions and decoded handler bodies
//! - [`metadata`] - Tokens and the [`metadata::MetadataProbe`] boundary verifiers consult
//! - [`patterns`] - Templates, the pattern catalog, structural matching and verification
//! - [`resolver`] - Batch resolution into bindings, unresolved and ambiguous handlers
//! - [`Error`] and [`Result`] - Errors raised while building catalogs and metadata stores
//!
//! ## Logging
//!
//! The crate reports through the [`log`](https://docs.rs/log) facade: a summary per batch
//! at `info`, ambiguities and duplicate submissions at `warn`, per-handler decisions at
//! `debug` and per-template attempts at `trace`. Install any `log` backend to see them.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use handlerscope::prelude::*;
///
/// let catalog = PatternCatalog::global();
/// assert!(catalog.by_original_opcode(OpCode::Ldstr).count() > 0);
/// ```
pub mod prelude;

/// CIL instruction model.
///
/// Handler bodies arrive already decoded, as an [`assembly::InstructionSequence`] of
/// [`assembly::Instruction`]s. Matching only ever looks at [`assembly::OpCode`] identity;
/// operands are consulted by verifiers through their metadata tokens.
pub mod assembly;

/// Operand metadata needed for verification.
///
/// See [`metadata::MetadataProbe`] for the lookup boundary and [`metadata::MetadataStore`]
/// for the in-memory implementation.
pub mod metadata;

/// Handler templates, the pattern catalog and the matching engine.
pub mod patterns;

/// Handler resolution.
///
/// See [`resolver::Resolver`].
pub mod resolver;

/// `handlerscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use handlerscope::{patterns::PatternCatalog, Result};
///
/// fn catalog() -> Result<PatternCatalog> {
///     PatternCatalog::builtin()
/// }
/// assert!(catalog().is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `handlerscope` Error type
///
/// Raised while building a [`patterns::PatternCatalog`] or a [`metadata::MetadataStore`].
/// Resolution itself does not fail; see [`resolver::UnresolvedReason`].
pub use error::Error;
