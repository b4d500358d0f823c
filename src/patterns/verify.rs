//! Narrow metadata probes for template verifiers.
//!
//! A [`VerifyContext`] is handed to a verifier after its template matched structurally.
//! Positions are relative to the match start, so a verifier written against slot `n` of
//! its template reads `ctx.method_at(n)` regardless of where a window template was found.
//!
//! Every probe returns `Option` or `bool`. An operand of the wrong kind, an unresolvable
//! token or a missing helper body simply yields `None`/`false`, which the verifier turns
//! into a rejection.

use crate::{
    assembly::{Instruction, InstructionSequence},
    metadata::{FieldInfo, MemberRefInfo, MetadataProbe, MethodInfo, TypeInfo},
    patterns::{
        catalog::PatternCatalog,
        matcher::{self, MatchEnv},
        template::Template,
    },
};

/// View of one structural match handed to a [`Verifier`](crate::patterns::Verifier).
pub struct VerifyContext<'a> {
    env: MatchEnv<'a>,
    sequence: &'a InstructionSequence,
    start: usize,
}

impl<'a> VerifyContext<'a> {
    /// Creates a context for a match of `sequence` at `start`.
    #[must_use]
    pub fn new(env: MatchEnv<'a>, sequence: &'a InstructionSequence, start: usize) -> Self {
        VerifyContext {
            env,
            sequence,
            start,
        }
    }

    /// The matched sequence.
    #[must_use]
    pub fn sequence(&self) -> &'a InstructionSequence {
        self.sequence
    }

    /// Absolute index of the match start.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The metadata probe.
    #[must_use]
    pub fn probe(&self) -> &'a dyn MetadataProbe {
        self.env.probe()
    }

    /// The catalog sub-patterns are looked up in.
    #[must_use]
    pub fn catalog(&self) -> &'a PatternCatalog {
        self.env.catalog()
    }

    /// Instruction at `offset` slots after the match start.
    #[must_use]
    pub fn instruction(&self, offset: usize) -> Option<&'a Instruction> {
        self.sequence.get(self.start.checked_add(offset)?)
    }

    /// The `MethodDef` referenced at `offset`.
    #[must_use]
    pub fn method_at(&self, offset: usize) -> Option<&'a MethodInfo> {
        let token = self.instruction(offset)?.method_token()?;
        self.probe().method(token)
    }

    /// The `MemberRef` referenced at `offset`.
    #[must_use]
    pub fn member_at(&self, offset: usize) -> Option<&'a MemberRefInfo> {
        let token = self.instruction(offset)?.member_token()?;
        self.probe().member(token)
    }

    /// The field referenced at `offset`.
    #[must_use]
    pub fn field_at(&self, offset: usize) -> Option<&'a FieldInfo> {
        let token = self.instruction(offset)?.field_token()?;
        self.probe().field(token)
    }

    /// Declaring type of the constructor referenced at `offset`.
    ///
    /// `None` unless the operand is a `MethodDef` named `.ctor` whose declaring type resolves.
    #[must_use]
    pub fn constructed_type_at(&self, offset: usize) -> Option<&'a TypeInfo> {
        let ctor = self.method_at(offset).filter(|m| m.is_ctor())?;
        self.probe().type_info(ctor.declaring_type?)
    }

    /// Returns `true` if the method referenced at `offset` returns a value of `type_name`.
    #[must_use]
    pub fn returns_type(&self, offset: usize, type_name: &str) -> bool {
        self.method_at(offset)
            .is_some_and(|m| m.signature.returns(type_name))
    }

    /// Returns `true` if the method referenced at `offset` takes exactly `params`.
    #[must_use]
    pub fn param_types_are(&self, offset: usize, params: &[&str]) -> bool {
        self.method_at(offset)
            .is_some_and(|m| m.signature.params_are(params))
    }

    /// Matches the named catalog template against the body of the method referenced at
    /// `offset`, starting at the body's first instruction.
    #[must_use]
    pub fn delegates_to(&self, offset: usize, template: &str) -> bool {
        self.with_callee_body(offset, template, |template, body, env| {
            matcher::matches(template, body, 0, env)
        })
        .unwrap_or(false)
    }

    /// Number of positions at which the named catalog template matches inside the body
    /// of the method referenced at `offset`.
    #[must_use]
    pub fn occurrences_in(&self, offset: usize, template: &str) -> Option<usize> {
        self.with_callee_body(offset, template, matcher::count_matches)
    }

    fn with_callee_body<T>(
        &self,
        offset: usize,
        template: &str,
        f: impl FnOnce(&Template, &InstructionSequence, &MatchEnv<'a>) -> T,
    ) -> Option<T> {
        let sub = self.catalog().by_name(template)?;
        let token = self.instruction(offset)?.method_token()?;
        let body = self.probe().method_body(token)?;
        let nested = self.env.descend()?;
        Some(f(sub, body, &nested))
    }
}
