//! Template data model.
//!
//! A [`Template`] is an ordered list of [`SlotSpec`]s describing the opcode shape of one
//! known handler, the original opcode it stands for, how much of the candidate body it must
//! cover ([`MatchMode`]), where the resolver should try it ([`Anchor`]) and an optional
//! [`Verifier`] that inspects operand metadata after the shape matched.
//!
//! Templates with `id == None` are internal sub-patterns. They are never bound to a handler
//! and exist only to be matched by other templates' verifiers against helper method bodies.

use std::fmt;

use bitflags::bitflags;

use crate::{assembly::OpCode, patterns::verify::VerifyContext};

/// Predicate run after a successful structural match.
///
/// Verifiers are pure and total: they return `false` for anything they cannot resolve.
pub type Verifier = fn(&VerifyContext<'_>) -> bool;

/// A named family of opcodes treated as interchangeable at one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCodeClass {
    /// Any local-variable load (`ldloc.0`-`ldloc.3`, `ldloc.s`, `ldloc`)
    LoadLocal,
    /// Any local-variable store (`stloc.0`-`stloc.3`, `stloc.s`, `stloc`)
    StoreLocal,
}

const LOAD_LOCAL_MEMBERS: &[OpCode] = &[
    OpCode::Ldloc0,
    OpCode::Ldloc1,
    OpCode::Ldloc2,
    OpCode::Ldloc3,
    OpCode::LdlocS,
    OpCode::Ldloc,
];

const STORE_LOCAL_MEMBERS: &[OpCode] = &[
    OpCode::Stloc0,
    OpCode::Stloc1,
    OpCode::Stloc2,
    OpCode::Stloc3,
    OpCode::StlocS,
    OpCode::Stloc,
];

impl OpCodeClass {
    /// Opcodes belonging to the class.
    #[must_use]
    pub fn members(self) -> &'static [OpCode] {
        match self {
            OpCodeClass::LoadLocal => LOAD_LOCAL_MEMBERS,
            OpCodeClass::StoreLocal => STORE_LOCAL_MEMBERS,
        }
    }

    /// Returns `true` if `opcode` belongs to the class.
    #[must_use]
    pub fn contains(self, opcode: OpCode) -> bool {
        self.members().contains(&opcode)
    }

    /// The class an opcode belongs to, if any.
    #[must_use]
    pub fn of(opcode: OpCode) -> Option<Self> {
        [OpCodeClass::LoadLocal, OpCodeClass::StoreLocal]
            .into_iter()
            .find(|class| class.contains(opcode))
    }

    fn interchange_flag(self) -> Interchange {
        match self {
            OpCodeClass::LoadLocal => Interchange::LOAD_LOCAL,
            OpCodeClass::StoreLocal => Interchange::STORE_LOCAL,
        }
    }
}

impl fmt::Display for OpCodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCodeClass::LoadLocal => f.write_str("<ldloc*>"),
            OpCodeClass::StoreLocal => f.write_str("<stloc*>"),
        }
    }
}

bitflags! {
    /// Opcode families a template treats as interchangeable.
    ///
    /// Setting a flag on a template rewrites every concrete slot of that family into the
    /// corresponding [`OpCodeClass`] slot, absorbing local-slot renumbering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interchange: u8 {
        /// Local loads match any other local load
        const LOAD_LOCAL = 0x01;
        /// Local stores match any other local store
        const STORE_LOCAL = 0x02;
        /// Both local loads and local stores
        const LOCALS = Self::LOAD_LOCAL.bits() | Self::STORE_LOCAL.bits();
    }
}

/// Expected opcode at one template position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotSpec {
    /// Exactly this opcode
    Exact(OpCode),
    /// Any member of the class
    Class(OpCodeClass),
}

impl SlotSpec {
    /// Returns `true` if `opcode` satisfies the slot.
    #[must_use]
    pub fn accepts(self, opcode: OpCode) -> bool {
        match self {
            SlotSpec::Exact(expected) => expected == opcode,
            SlotSpec::Class(class) => class.contains(opcode),
        }
    }
}

impl From<OpCode> for SlotSpec {
    fn from(opcode: OpCode) -> Self {
        SlotSpec::Exact(opcode)
    }
}

impl From<OpCodeClass> for SlotSpec {
    fn from(class: OpCodeClass) -> Self {
        SlotSpec::Class(class)
    }
}

impl fmt::Display for SlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSpec::Exact(op) => write!(f, "{op}"),
            SlotSpec::Class(class) => write!(f, "{class}"),
        }
    }
}

/// How much of the candidate body a template must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The remaining body must have exactly the template's length
    EntireBody,
    /// The template must fit; trailing instructions are ignored
    PrefixWindow,
}

/// Where the resolver tries a template inside a handler body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Index 0 only
    Start,
    /// A known fixed index
    Fixed(usize),
    /// Every index, first verified match wins
    Scan,
}

/// Structural description of one handler shape.
///
/// # Examples
///
/// ```rust
/// use handlerscope::assembly::OpCode;
/// use handlerscope::patterns::{Interchange, OpCodeClass, SlotSpec, Template};
///
/// let template = Template::entire_body(
///     "example",
///     Some(OpCode::Pop),
///     &[OpCode::Ldloc0, OpCode::Stloc1, OpCode::Ret],
/// )
/// .interchange(Interchange::LOAD_LOCAL);
///
/// assert_eq!(template.slots()[0], SlotSpec::Class(OpCodeClass::LoadLocal));
/// assert_eq!(template.slots()[1], SlotSpec::Exact(OpCode::Stloc1));
/// ```
#[derive(Clone)]
pub struct Template {
    name: &'static str,
    id: Option<OpCode>,
    slots: Vec<SlotSpec>,
    mode: MatchMode,
    anchor: Anchor,
    verifier: Option<Verifier>,
}

impl Template {
    /// Creates a template from explicit slots.
    #[must_use]
    pub fn new(
        name: &'static str,
        id: Option<OpCode>,
        mode: MatchMode,
        slots: Vec<SlotSpec>,
    ) -> Self {
        Template {
            name,
            id,
            slots,
            mode,
            anchor: Anchor::Start,
            verifier: None,
        }
    }

    /// Creates an [`MatchMode::EntireBody`] template from concrete opcodes.
    #[must_use]
    pub fn entire_body(name: &'static str, id: Option<OpCode>, opcodes: &[OpCode]) -> Self {
        Self::new(
            name,
            id,
            MatchMode::EntireBody,
            opcodes.iter().copied().map(SlotSpec::from).collect(),
        )
    }

    /// Creates a [`MatchMode::PrefixWindow`] template from concrete opcodes.
    #[must_use]
    pub fn window(name: &'static str, id: Option<OpCode>, opcodes: &[OpCode]) -> Self {
        Self::new(
            name,
            id,
            MatchMode::PrefixWindow,
            opcodes.iter().copied().map(SlotSpec::from).collect(),
        )
    }

    /// Rewrites concrete slots of the flagged families into class slots.
    #[must_use]
    pub fn interchange(mut self, families: Interchange) -> Self {
        for slot in &mut self.slots {
            if let SlotSpec::Exact(op) = *slot {
                if let Some(class) = OpCodeClass::of(op) {
                    if families.contains(class.interchange_flag()) {
                        *slot = SlotSpec::Class(class);
                    }
                }
            }
        }
        self
    }

    /// Sets where the resolver tries this template.
    #[must_use]
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Attaches the verifier.
    #[must_use]
    pub fn verified_by(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Unique catalog name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Original opcode this template recognizes, `None` for internal sub-patterns.
    #[must_use]
    pub fn id(&self) -> Option<OpCode> {
        self.id
    }

    /// Returns `true` for internal sub-patterns.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.id.is_none()
    }

    /// Slot specifications, in order.
    #[must_use]
    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the template has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Resolver anchor.
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Attached verifier, if any.
    #[must_use]
    pub fn verifier(&self) -> Option<Verifier> {
        self.verifier
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("slots", &self.slots.len())
            .field("mode", &self.mode)
            .field("anchor", &self.anchor)
            .field("verified", &self.verifier.is_some())
            .finish()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str("]")
    }
}
