//! Structural matching of templates against instruction sequences.
//!
//! Matching compares the opcode identity of each aligned instruction with the template's
//! [`SlotSpec`](crate::patterns::SlotSpec); operands are never looked at here. When the
//! shape fits, the template's verifier (if any) decides. Every function in this module is a
//! pure function of its arguments and safe to call from many threads at once.
//!
//! # Examples
//!
//! ```rust
//! use handlerscope::assembly::{Instruction, InstructionSequence, OpCode, Operand};
//! use handlerscope::metadata::MetadataStore;
//! use handlerscope::patterns::{matcher, MatchEnv, PatternCatalog, Template};
//!
//! let template = Template::window("prefix", None, &[OpCode::Ldarg0, OpCode::Dup]);
//! let body: InstructionSequence = [OpCode::Ldarg0, OpCode::Dup, OpCode::Pop, OpCode::Ret]
//!     .into_iter()
//!     .map(|op| Instruction::new(0, op, Operand::None))
//!     .collect();
//!
//! let catalog = PatternCatalog::builder().build()?;
//! let store = MetadataStore::default();
//! let env = MatchEnv::new(&catalog, &store);
//!
//! assert!(matcher::matches(&template, &body, 0, &env));
//! assert!(!matcher::matches(&template, &body, 1, &env));
//! # Ok::<(), handlerscope::Error>(())
//! ```

use crate::{
    assembly::InstructionSequence,
    metadata::MetadataProbe,
    patterns::{
        catalog::PatternCatalog,
        template::{Anchor, MatchMode, Template},
        verify::VerifyContext,
    },
};

/// Default bound on verifier delegation into helper method bodies.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Shared, read-only inputs of a match: the catalog that sub-patterns are looked up in,
/// the metadata probe verifiers consult, and the current delegation depth.
#[derive(Clone, Copy)]
pub struct MatchEnv<'a> {
    catalog: &'a PatternCatalog,
    probe: &'a dyn MetadataProbe,
    depth: usize,
    max_depth: usize,
}

impl<'a> MatchEnv<'a> {
    /// Creates a top-level environment.
    #[must_use]
    pub fn new(catalog: &'a PatternCatalog, probe: &'a dyn MetadataProbe) -> Self {
        MatchEnv {
            catalog,
            probe,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the delegation depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Catalog sub-patterns are resolved from.
    #[must_use]
    pub fn catalog(&self) -> &'a PatternCatalog {
        self.catalog
    }

    /// Metadata probe.
    #[must_use]
    pub fn probe(&self) -> &'a dyn MetadataProbe {
        self.probe
    }

    /// Current delegation depth, `0` at the handler level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Environment one delegation level deeper, `None` once the bound is reached.
    #[must_use]
    pub fn descend(&self) -> Option<Self> {
        if self.depth >= self.max_depth {
            log::trace!("delegation depth limit {} reached", self.max_depth);
            return None;
        }
        Some(MatchEnv {
            depth: self.depth + 1,
            ..*self
        })
    }
}

/// Compares opcode identities only, honoring the template's [`MatchMode`].
///
/// Returns `false` (never panics) when `start` lies outside the sequence.
#[must_use]
pub fn matches_structurally(
    template: &Template,
    sequence: &InstructionSequence,
    start: usize,
) -> bool {
    let Some(remaining) = sequence.len().checked_sub(start) else {
        return false;
    };

    let fits = match template.mode() {
        MatchMode::EntireBody => remaining == template.len(),
        MatchMode::PrefixWindow => remaining >= template.len(),
    };
    if !fits {
        return false;
    }

    template
        .slots()
        .iter()
        .zip(&sequence.as_slice()[start..])
        .all(|(slot, instruction)| slot.accepts(instruction.opcode))
}

/// Runs the template's verifier at `start`; templates without verifier pass.
///
/// Callers are expected to have established the structural match first.
#[must_use]
pub fn verifies(
    template: &Template,
    sequence: &InstructionSequence,
    start: usize,
    env: &MatchEnv<'_>,
) -> bool {
    match template.verifier() {
        Some(verifier) => verifier(&VerifyContext::new(*env, sequence, start)),
        None => true,
    }
}

/// Structural match followed by verification.
#[must_use]
pub fn matches(
    template: &Template,
    sequence: &InstructionSequence,
    start: usize,
    env: &MatchEnv<'_>,
) -> bool {
    matches_structurally(template, sequence, start) && verifies(template, sequence, start, env)
}

/// Every start index at which [`matches`] succeeds, ascending.
#[must_use]
pub fn match_positions(
    template: &Template,
    sequence: &InstructionSequence,
    env: &MatchEnv<'_>,
) -> Vec<usize> {
    (0..sequence.len())
        .filter(|&start| matches(template, sequence, start, env))
        .collect()
}

/// Number of start indices at which [`matches`] succeeds.
#[must_use]
pub fn count_matches(
    template: &Template,
    sequence: &InstructionSequence,
    env: &MatchEnv<'_>,
) -> usize {
    match_positions(template, sequence, env).len()
}

/// Start indices the template's [`Anchor`] allows, ascending.
pub fn anchor_positions(anchor: Anchor, len: usize) -> impl Iterator<Item = usize> {
    let (from, to) = match anchor {
        Anchor::Start => (0, 1),
        Anchor::Fixed(index) => (index, index.saturating_add(1)),
        Anchor::Scan => (0, len),
    };
    from..to
}

/// First start index allowed by the template's anchor at which [`matches`] succeeds.
#[must_use]
pub fn locate(
    template: &Template,
    sequence: &InstructionSequence,
    env: &MatchEnv<'_>,
) -> Option<usize> {
    anchor_positions(template.anchor(), sequence.len())
        .find(|&start| matches(template, sequence, start, env))
}
