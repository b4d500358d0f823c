//! Handler inputs and per-handler resolution results.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::assembly::{InstructionSequence, OpCode};

/// Caller-chosen identity of a handler, typically the interpreter's opcode number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(pub u32);

impl From<u32> for HandlerId {
    fn from(value: u32) -> Self {
        HandlerId(value)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler {}", self.0)
    }
}

/// A candidate handler submitted for resolution.
#[derive(Debug, Clone)]
pub struct Handler {
    /// Handler identity, unique within one batch
    pub id: HandlerId,
    /// Decoded body; `None` if the loader could not produce one
    pub body: Option<InstructionSequence>,
}

impl Handler {
    /// Creates a handler with a decoded body.
    #[must_use]
    pub fn new(id: u32, body: InstructionSequence) -> Self {
        Handler {
            id: HandlerId(id),
            body: Some(body),
        }
    }

    /// Creates a handler whose body could not be decoded.
    #[must_use]
    pub fn missing(id: u32) -> Self {
        Handler {
            id: HandlerId(id),
            body: None,
        }
    }
}

/// A committed handler-to-opcode binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The bound handler
    pub handler: HandlerId,
    /// Original opcode the handler implements
    pub opcode: OpCode,
    /// Name of the template that matched
    pub template: &'static str,
    /// Start index of the match inside the handler body
    pub matched_at: usize,
    /// `true` if a verifier confirmed the structural match
    pub verified: bool,
}

/// Why a handler could not be bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No template matched structurally.
    NoMatch,
    /// Templates matched structurally but their verifiers refused.
    Rejected {
        /// Names of the refusing templates, in catalog order
        templates: Vec<&'static str>,
    },
    /// The handler was submitted without a body.
    MissingBody,
    /// The handler body holds no instruction.
    EmptyBody,
    /// Several handlers with different bodies were submitted under this id.
    DuplicateId,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NoMatch => write!(f, "no template matched"),
            UnresolvedReason::Rejected { templates } => {
                write!(f, "rejected by verifier of {}", templates.join(", "))
            }
            UnresolvedReason::MissingBody => write!(f, "no method body"),
            UnresolvedReason::EmptyBody => write!(f, "empty method body"),
            UnresolvedReason::DuplicateId => write!(f, "conflicting handlers share this id"),
        }
    }
}

/// Result of resolving one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exactly one original opcode matched.
    Bound(Binding),
    /// Nothing usable matched.
    Unresolved(UnresolvedReason),
    /// Templates of several original opcodes matched; nothing is committed.
    Ambiguous(BTreeSet<OpCode>),
}

impl Outcome {
    /// The binding, if the handler was bound.
    #[must_use]
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            Outcome::Bound(binding) => Some(binding),
            _ => None,
        }
    }
}

/// Results of one resolution batch, keyed and ordered by handler id.
///
/// Every submitted handler appears in exactly one of the three tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    bindings: BTreeMap<HandlerId, Binding>,
    unresolved: BTreeMap<HandlerId, UnresolvedReason>,
    ambiguous: BTreeMap<HandlerId, BTreeSet<OpCode>>,
}

impl Resolution {
    pub(crate) fn insert(&mut self, id: HandlerId, outcome: Outcome) {
        match outcome {
            Outcome::Bound(binding) => {
                self.bindings.insert(id, binding);
            }
            Outcome::Unresolved(reason) => {
                self.unresolved.insert(id, reason);
            }
            Outcome::Ambiguous(opcodes) => {
                self.ambiguous.insert(id, opcodes);
            }
        }
    }

    /// Committed bindings.
    #[must_use]
    pub fn bindings(&self) -> &BTreeMap<HandlerId, Binding> {
        &self.bindings
    }

    /// Unresolved handlers with their reason.
    #[must_use]
    pub fn unresolved(&self) -> &BTreeMap<HandlerId, UnresolvedReason> {
        &self.unresolved
    }

    /// Ambiguous handlers with the conflicting original opcodes.
    #[must_use]
    pub fn ambiguous(&self) -> &BTreeMap<HandlerId, BTreeSet<OpCode>> {
        &self.ambiguous
    }

    /// Binding of `id`, if it was bound.
    #[must_use]
    pub fn binding(&self, id: HandlerId) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    /// Returns `true` if `id` was bound.
    #[must_use]
    pub fn is_bound(&self, id: HandlerId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Outcome recorded for `id`, `None` if it was not part of the batch.
    #[must_use]
    pub fn outcome(&self, id: HandlerId) -> Option<Outcome> {
        if let Some(binding) = self.bindings.get(&id) {
            return Some(Outcome::Bound(binding.clone()));
        }
        if let Some(reason) = self.unresolved.get(&id) {
            return Some(Outcome::Unresolved(reason.clone()));
        }
        self.ambiguous
            .get(&id)
            .map(|opcodes| Outcome::Ambiguous(opcodes.clone()))
    }

    /// Number of handlers in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len() + self.unresolved.len() + self.ambiguous.len()
    }

    /// Returns `true` if the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line count of bound, unresolved and ambiguous handlers.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} bound, {} unresolved, {} ambiguous",
            self.bindings.len(),
            self.unresolved.len(),
            self.ambiguous.len()
        )
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for (id, binding) in &self.bindings {
            writeln!(
                f,
                "  {id}: {} ({} @{})",
                binding.opcode, binding.template, binding.matched_at
            )?;
        }
        for (id, reason) in &self.unresolved {
            writeln!(f, "  {id}: unresolved, {reason}")?;
        }
        for (id, opcodes) in &self.ambiguous {
            let names: Vec<_> = opcodes.iter().map(|op| op.mnemonic()).collect();
            writeln!(f, "  {id}: ambiguous between {}", names.join(", "))?;
        }
        Ok(())
    }
}
