//! Binding interpreter handlers to the original opcodes they implement.
//!
//! The [`Resolver`] runs every bound template of a [`PatternCatalog`] against each
//! submitted [`Handler`] and classifies the handler as bound, unresolved or ambiguous.
//! A handler is bound only when the templates that both match structurally and pass
//! verification all name the same original opcode; when they disagree the handler is
//! reported ambiguous and no binding is committed, since a wrong binding poisons every
//! method reconstructed from it.
//!
//! # Failure Isolation
//!
//! Resolution never fails as a whole. A missing or empty body, an unresolvable operand or
//! a helper nested too deep only affects the handler concerned, which is then reported
//! through [`UnresolvedReason`].
//!
//! # Examples
//!
//! ```rust
//! use handlerscope::assembly::{Instruction, InstructionSequence, OpCode, Operand};
//! use handlerscope::metadata::MetadataStore;
//! use handlerscope::patterns::PatternCatalog;
//! use handlerscope::resolver::{Handler, HandlerId, Resolver, UnresolvedReason};
//!
//! let store = MetadataStore::default();
//! let resolver = Resolver::new(PatternCatalog::global(), &store);
//!
//! let nop: InstructionSequence = vec![Instruction::new(0, OpCode::Nop, Operand::None)].into();
//! let resolution = resolver.resolve(&[Handler::new(1, nop), Handler::missing(2)]);
//!
//! assert_eq!(resolution.len(), 2);
//! assert_eq!(resolution.unresolved()[&HandlerId(1)], UnresolvedReason::NoMatch);
//! assert_eq!(resolution.unresolved()[&HandlerId(2)], UnresolvedReason::MissingBody);
//! ```
//!
//! # Thread Safety
//!
//! Handlers are independent: the catalog and the metadata probe are read-only and each
//! handler only reads its own body. With [`ResolverConfig::parallel`] set, handlers are
//! spread over the rayon thread pool and the outcomes are merged into ordered maps, so
//! sequential and parallel runs produce identical [`Resolution`]s.

mod config;
mod result;

pub use config::ResolverConfig;
pub use result::{Binding, Handler, HandlerId, Outcome, Resolution, UnresolvedReason};

use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use rayon::prelude::*;

use crate::{
    assembly::{InstructionSequence, OpCode},
    metadata::MetadataProbe,
    patterns::{matcher, MatchEnv, PatternCatalog, Template},
};

/// Resolves handler bodies against a pattern catalog.
pub struct Resolver<'a> {
    catalog: &'a PatternCatalog,
    probe: &'a dyn MetadataProbe,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn new(catalog: &'a PatternCatalog, probe: &'a dyn MetadataProbe) -> Self {
        Resolver {
            catalog,
            probe,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a batch of handlers.
    ///
    /// Every handler id appears in the result exactly once. Handlers sharing an id are
    /// resolved once when their bodies are identical; otherwise the id is reported as
    /// [`UnresolvedReason::DuplicateId`] whatever the submission order.
    pub fn resolve<'h, I>(&self, handlers: I) -> Resolution
    where
        I: IntoIterator<Item = &'h Handler>,
    {
        let mut unique: BTreeMap<HandlerId, (&Handler, bool)> = BTreeMap::new();
        for handler in handlers {
            match unique.entry(handler.id) {
                Entry::Vacant(slot) => {
                    slot.insert((handler, false));
                }
                Entry::Occupied(mut slot) => {
                    let (kept, conflicting) = slot.get_mut();
                    if kept.body != handler.body {
                        *conflicting = true;
                    }
                }
            }
        }

        let mut resolution = Resolution::default();
        let mut batch: Vec<&Handler> = Vec::with_capacity(unique.len());
        for (id, (handler, conflicting)) in unique {
            if conflicting {
                log::warn!("{id} submitted more than once with different bodies");
                resolution.insert(id, Outcome::Unresolved(UnresolvedReason::DuplicateId));
            } else {
                batch.push(handler);
            }
        }

        log::debug!(
            "resolving {} handlers against {} templates ({})",
            batch.len(),
            self.catalog.len(),
            if self.config.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );

        let outcomes: Vec<(HandlerId, Outcome)> = if self.config.parallel {
            batch
                .par_iter()
                .map(|handler| (handler.id, self.resolve_one(handler)))
                .collect()
        } else {
            batch
                .iter()
                .map(|handler| (handler.id, self.resolve_one(handler)))
                .collect()
        };

        for (id, outcome) in outcomes {
            resolution.insert(id, outcome);
        }

        log::info!("handler resolution: {}", resolution.summary());
        resolution
    }

    /// Resolves a single handler.
    #[must_use]
    pub fn resolve_one(&self, handler: &Handler) -> Outcome {
        let Some(body) = handler.body.as_ref() else {
            log::debug!("{}: no body", handler.id);
            return Outcome::Unresolved(UnresolvedReason::MissingBody);
        };
        if body.is_empty() {
            log::debug!("{}: empty body", handler.id);
            return Outcome::Unresolved(UnresolvedReason::EmptyBody);
        }

        let env = MatchEnv::new(self.catalog, self.probe)
            .with_max_depth(self.config.max_delegation_depth);

        let mut candidates = Vec::new();
        let mut rejected = Vec::new();
        for template in self.catalog.bound() {
            let Some(opcode) = template.id() else {
                continue;
            };
            match self.try_template(template, body, &env) {
                Attempt::Matched(matched_at) => {
                    log::trace!("{}: {} matched at {}", handler.id, template.name(), matched_at);
                    candidates.push((opcode, template, matched_at));
                }
                Attempt::Rejected => {
                    log::trace!("{}: {} rejected by verifier", handler.id, template.name());
                    rejected.push(template.name());
                }
                Attempt::NoShape => {}
            }
        }

        let opcodes: BTreeSet<OpCode> = candidates.iter().map(|&(opcode, _, _)| opcode).collect();
        if opcodes.len() > 1 {
            log::warn!(
                "{} is ambiguous between {}",
                handler.id,
                candidates
                    .iter()
                    .map(|(_, template, _)| template.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Outcome::Ambiguous(opcodes);
        }

        match candidates.first() {
            Some(&(opcode, template, matched_at)) => {
                log::debug!("{} bound to {} via {}", handler.id, opcode, template.name());
                Outcome::Bound(Binding {
                    handler: handler.id,
                    opcode,
                    template: template.name(),
                    matched_at,
                    verified: template.verifier().is_some(),
                })
            }
            None if rejected.is_empty() => Outcome::Unresolved(UnresolvedReason::NoMatch),
            None => Outcome::Unresolved(UnresolvedReason::Rejected {
                templates: rejected,
            }),
        }
    }

    fn try_template(
        &self,
        template: &Template,
        body: &InstructionSequence,
        env: &MatchEnv<'_>,
    ) -> Attempt {
        let mut shaped = false;
        for start in matcher::anchor_positions(template.anchor(), body.len()) {
            if !matcher::matches_structurally(template, body, start) {
                continue;
            }
            shaped = true;
            if matcher::verifies(template, body, start, env) {
                return Attempt::Matched(start);
            }
        }

        if shaped {
            Attempt::Rejected
        } else {
            Attempt::NoShape
        }
    }
}

enum Attempt {
    Matched(usize),
    Rejected,
    NoShape,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{Instruction, Operand},
        metadata::MetadataStore,
        patterns::{names, Template},
        test::{body, handlers, tokens, vm_metadata},
    };

    fn store() -> MetadataStore {
        vm_metadata().build().unwrap()
    }

    #[test]
    fn test_fixture_handlers_bind() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);

        for (expected, body) in handlers::all() {
            let outcome = resolver.resolve_one(&Handler::new(0, body));
            let binding = outcome.binding().unwrap_or_else(|| panic!("{expected}: {outcome:?}"));
            assert_eq!(binding.opcode, expected);
            assert!(binding.verified);
        }
    }

    #[test]
    fn test_window_match_reports_offset() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);

        let outcome = resolver.resolve_one(&Handler::new(0, handlers::ldtoken()));
        let binding = outcome.binding().unwrap();
        assert_eq!(binding.template, names::LDTOKEN);
        assert_eq!(binding.matched_at, 4);
    }

    #[test]
    fn test_verifier_refusal_is_reported() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);

        let handler = Handler::new(0, handlers::pop_via(tokens::POP_TWICE));
        let outcome = resolver.resolve_one(&handler);
        assert_eq!(
            outcome,
            Outcome::Unresolved(UnresolvedReason::Rejected {
                templates: vec![names::POP],
            })
        );
    }

    #[test]
    fn test_missing_and_empty_bodies() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);

        assert_eq!(
            resolver.resolve_one(&Handler::missing(1)),
            Outcome::Unresolved(UnresolvedReason::MissingBody)
        );
        assert_eq!(
            resolver.resolve_one(&Handler::new(2, InstructionSequence::default())),
            Outcome::Unresolved(UnresolvedReason::EmptyBody)
        );
    }

    #[test]
    fn test_conflicting_templates_are_ambiguous() {
        let catalog = PatternCatalog::builder()
            .template(Template::entire_body(
                "a",
                Some(OpCode::Nop),
                &[OpCode::Ldarg0, OpCode::Ret],
            ))
            .template(Template::entire_body(
                "b",
                Some(OpCode::Pop),
                &[OpCode::Ldarg0, OpCode::Ret],
            ))
            .build()
            .unwrap();
        let store = MetadataStore::default();
        let resolver = Resolver::new(&catalog, &store);

        let outcome = resolver.resolve_one(&Handler::new(0, body(&[OpCode::Ldarg0, OpCode::Ret])));
        assert_eq!(
            outcome,
            Outcome::Ambiguous([OpCode::Nop, OpCode::Pop].into_iter().collect())
        );
    }

    #[test]
    fn test_variants_of_one_opcode_bind_first() {
        let catalog = PatternCatalog::builder()
            .template(Template::window("a", Some(OpCode::Dup), &[OpCode::Ldarg0]))
            .template(Template::window("b", Some(OpCode::Dup), &[OpCode::Ldarg0, OpCode::Ret]))
            .build()
            .unwrap();
        let store = MetadataStore::default();
        let resolver = Resolver::new(&catalog, &store);

        let outcome = resolver.resolve_one(&Handler::new(0, body(&[OpCode::Ldarg0, OpCode::Ret])));
        let binding = outcome.binding().unwrap();
        assert_eq!(binding.opcode, OpCode::Dup);
        assert_eq!(binding.template, "a");
        assert!(!binding.verified);
    }

    #[test]
    fn test_delegation_depth_is_configurable() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store)
            .with_config(ResolverConfig::sequential().with_max_delegation_depth(0));

        // ret delegates into the return-flag helper
        let outcome = resolver.resolve_one(&Handler::new(0, handlers::ret()));
        assert!(matches!(outcome, Outcome::Unresolved(UnresolvedReason::Rejected { .. })));
        assert!(resolver
            .resolve_one(&Handler::new(1, handlers::ldnull()))
            .binding()
            .is_some());
    }

    #[test]
    fn test_conflicting_duplicate_ids_are_unresolved() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);
        let nop = InstructionSequence::new(vec![Instruction::new(0, OpCode::Nop, Operand::None)]);
        let pop = Handler::new(5, handlers::pop());
        let other = Handler::new(5, nop);

        let forward = resolver.resolve([&pop, &other]);
        let reversed = resolver.resolve([&other, &pop]);

        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 1);
        assert_eq!(
            forward.outcome(HandlerId(5)),
            Some(Outcome::Unresolved(UnresolvedReason::DuplicateId))
        );
    }

    #[test]
    fn test_identical_duplicate_ids_resolve_once() {
        let store = store();
        let resolver = Resolver::new(PatternCatalog::global(), &store);

        let first = Handler::new(5, handlers::pop());
        let second = Handler::new(5, handlers::pop());

        let resolution = resolver.resolve([&first, &second]);
        assert_eq!(resolution.len(), 1);
        assert_eq!(resolution.binding(HandlerId(5)).map(|b| b.opcode), Some(OpCode::Pop));
    }

    #[test]
    fn test_sequential_equals_parallel() {
        let store = store();
        let batch: Vec<Handler> = handlers::all()
            .into_iter()
            .enumerate()
            .map(|(id, (_, body))| Handler::new(id as u32, body))
            .chain([Handler::missing(100)])
            .collect();

        let parallel = Resolver::new(PatternCatalog::global(), &store).resolve(&batch);
        let sequential = Resolver::new(PatternCatalog::global(), &store)
            .with_config(ResolverConfig::sequential())
            .resolve(&batch);

        assert_eq!(parallel, sequential);
        assert_eq!(parallel.bindings().len(), 8);
        assert_eq!(parallel.unresolved().len(), 1);
    }
}
