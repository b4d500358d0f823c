//! The frozen set of known handler templates.
//!
//! [`PatternCatalog`] is an arena of [`Template`]s indexed by unique name and by original
//! opcode. Variants of one original opcode are stored side by side under the same opcode;
//! internal sub-patterns are reachable by name only. A catalog is assembled once through
//! [`PatternCatalogBuilder`] and never changes afterwards, so it can be shared by any number
//! of resolver threads without locking.
//!
//! # Examples
//!
//! ```rust
//! use handlerscope::assembly::OpCode;
//! use handlerscope::patterns::PatternCatalog;
//!
//! let catalog = PatternCatalog::global();
//! assert!(catalog.by_original_opcode(OpCode::Ret).count() >= 1);
//! assert!(catalog.by_name("PopStack").is_some_and(|t| t.is_internal()));
//! ```

use std::{
    collections::{BTreeSet, HashMap},
    sync::OnceLock,
};

use crate::{
    assembly::OpCode,
    patterns::{defs, template::Template},
    Error, Result,
};

static GLOBAL_CATALOG: OnceLock<PatternCatalog> = OnceLock::new();

/// Immutable, indexed collection of templates.
#[derive(Debug)]
pub struct PatternCatalog {
    templates: Vec<Template>,
    by_name: HashMap<&'static str, usize>,
    by_opcode: HashMap<OpCode, Vec<usize>>,
}

impl PatternCatalog {
    /// Starts assembling a catalog.
    #[must_use]
    pub fn builder() -> PatternCatalogBuilder {
        PatternCatalogBuilder::default()
    }

    /// Builds a catalog holding exactly the built-in definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in definitions are inconsistent.
    pub fn builtin() -> Result<Self> {
        Self::builder().with_builtin().build()
    }

    /// The process-wide built-in catalog, constructed on first use.
    ///
    /// # Panics
    ///
    /// Panics if the built-in definition table is inconsistent, which is a defect of this
    /// crate rather than of its input.
    pub fn global() -> &'static PatternCatalog {
        GLOBAL_CATALOG.get_or_init(|| {
            Self::builtin().expect("built-in pattern definitions must be consistent")
        })
    }

    /// All templates in registration order; restartable by calling again.
    pub fn all(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    /// Templates bound to an original opcode, in registration order.
    pub fn bound(&self) -> impl Iterator<Item = &Template> + Clone {
        self.templates.iter().filter(|t| !t.is_internal())
    }

    /// Every template variant registered for `opcode`.
    pub fn by_original_opcode(&self, opcode: OpCode) -> impl Iterator<Item = &Template> + Clone {
        self.by_opcode
            .get(&opcode)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&index| &self.templates[index])
    }

    /// Looks a template up by its unique name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Template> {
        self.by_name.get(name).map(|&index| &self.templates[index])
    }

    /// Original opcodes covered by at least one template.
    #[must_use]
    pub fn original_opcodes(&self) -> BTreeSet<OpCode> {
        self.by_opcode.keys().copied().collect()
    }

    /// Number of templates, internal ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if the catalog holds no template.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Collects templates and freezes them into a [`PatternCatalog`].
#[derive(Debug, Default)]
pub struct PatternCatalogBuilder {
    templates: Vec<Template>,
}

impl PatternCatalogBuilder {
    /// Adds the built-in definition table.
    #[must_use]
    pub fn with_builtin(mut self) -> Self {
        self.templates.extend(defs::builtin_templates());
        self
    }

    /// Adds one template.
    #[must_use]
    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    /// Adds several templates.
    #[must_use]
    pub fn templates(mut self, templates: impl IntoIterator<Item = Template>) -> Self {
        self.templates.extend(templates);
        self
    }

    /// Validates and indexes the collected templates.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyTemplate`] if a template has no slot
    /// - [`Error::DuplicateTemplate`] if two templates share a name
    pub fn build(self) -> Result<PatternCatalog> {
        let mut by_name = HashMap::with_capacity(self.templates.len());
        let mut by_opcode: HashMap<OpCode, Vec<usize>> = HashMap::new();

        for (index, template) in self.templates.iter().enumerate() {
            if template.is_empty() {
                return Err(Error::EmptyTemplate(template.name()));
            }
            if by_name.insert(template.name(), index).is_some() {
                return Err(Error::DuplicateTemplate(template.name()));
            }
            if let Some(opcode) = template.id() {
                by_opcode.entry(opcode).or_default().push(index);
            }
        }

        log::debug!(
            "pattern catalog: {} templates covering {} opcodes",
            self.templates.len(),
            by_opcode.len()
        );

        Ok(PatternCatalog {
            templates: self.templates,
            by_name,
            by_opcode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::defs::names;

    #[test]
    fn test_builtin_is_consistent() {
        let catalog = PatternCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.all().count(), catalog.len());

        for opcode in [
            OpCode::Ldstr,
            OpCode::Ret,
            OpCode::Ldnull,
            OpCode::LdcI40,
            OpCode::Dup,
            OpCode::Pop,
            OpCode::Ldtoken,
            OpCode::Box,
        ] {
            assert!(catalog.original_opcodes().contains(&opcode), "{opcode}");
        }
    }

    #[test]
    fn test_variants_share_opcode() {
        let catalog = PatternCatalog::builder()
            .with_builtin()
            .template(Template::entire_body(
                "RetShort",
                Some(OpCode::Ret),
                &[OpCode::Ldarg0, OpCode::Ret],
            ))
            .build()
            .unwrap();
        let names: Vec<_> = catalog
            .by_original_opcode(OpCode::Ret)
            .map(Template::name)
            .collect();
        assert_eq!(names, vec![names::RET, "RetShort"]);
        assert_eq!(catalog.by_original_opcode(OpCode::Nop).count(), 0);
    }

    #[test]
    fn test_internal_templates_not_bound() {
        let catalog = PatternCatalog::global();
        for name in [names::ENABLE_RETURN, names::PEEK_STACK, names::POP_STACK] {
            let template = catalog.by_name(name).unwrap();
            assert!(template.is_internal());
            assert!(catalog.bound().all(|t| t.name() != name));
        }
    }

    #[test]
    fn test_all_is_restartable() {
        let catalog = PatternCatalog::global();
        let first: Vec<_> = catalog.all().map(Template::name).collect();
        let second: Vec<_> = catalog.all().map(Template::name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let dup = PatternCatalog::builder()
            .template(Template::window("x", None, &[OpCode::Nop]))
            .template(Template::window("x", Some(OpCode::Nop), &[OpCode::Ret]))
            .build();
        assert!(matches!(dup, Err(Error::DuplicateTemplate("x"))));

        let empty = PatternCatalog::builder()
            .template(Template::window("e", None, &[]))
            .build();
        assert!(matches!(empty, Err(Error::EmptyTemplate("e"))));
    }
}
