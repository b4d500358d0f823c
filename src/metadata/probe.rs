//! Typed metadata resolution used by verifiers.
//!
//! [`MetadataProbe`] is the boundary between the pattern engine and whatever loaded the
//! analysed module. It answers four lookups by token (method, member reference, type,
//! field) plus a few derived helpers. Every lookup returns `Option`: a token that cannot be
//! resolved makes the asking verifier fail, it never aborts resolution.
//!
//! [`MetadataStore`] is an immutable in-memory implementation, built once through
//! [`MetadataStoreBuilder`] and then shared read-only across worker threads.

use std::collections::HashMap;

use crate::{
    assembly::InstructionSequence,
    metadata::{
        model::{FieldInfo, MemberRefInfo, MethodInfo, TypeInfo},
        token::Token,
    },
    Error, Result,
};

/// Read-only access to resolved operand metadata.
pub trait MetadataProbe: Send + Sync {
    /// Resolves a `MethodDef` token.
    fn method(&self, token: Token) -> Option<&MethodInfo>;

    /// Resolves a `MemberRef` token.
    fn member(&self, token: Token) -> Option<&MemberRefInfo>;

    /// Resolves a type token.
    fn type_info(&self, token: Token) -> Option<&TypeInfo>;

    /// Resolves a `Field` token.
    fn field(&self, token: Token) -> Option<&FieldInfo>;

    /// Decoded body of a method.
    fn method_body(&self, token: Token) -> Option<&InstructionSequence> {
        self.method(token)?.body.as_ref()
    }

    /// Fields declared directly on a type.
    fn fields_of(&self, token: Token) -> Option<&[FieldInfo]> {
        self.type_info(token).map(|ty| ty.fields.as_slice())
    }

    /// Resolved base type of a type.
    fn base_type_of(&self, token: Token) -> Option<&TypeInfo> {
        let base = self.type_info(token)?.base_type?;
        self.type_info(base)
    }
}

/// Immutable in-memory [`MetadataProbe`].
#[derive(Debug, Default)]
pub struct MetadataStore {
    methods: HashMap<Token, MethodInfo>,
    members: HashMap<Token, MemberRefInfo>,
    types: HashMap<Token, TypeInfo>,
    fields: HashMap<Token, FieldInfo>,
}

impl MetadataStore {
    /// Starts building a store.
    #[must_use]
    pub fn builder() -> MetadataStoreBuilder {
        MetadataStoreBuilder::default()
    }

    /// Number of method records.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Number of type records.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl MetadataProbe for MetadataStore {
    fn method(&self, token: Token) -> Option<&MethodInfo> {
        self.methods.get(&token)
    }

    fn member(&self, token: Token) -> Option<&MemberRefInfo> {
        self.members.get(&token)
    }

    fn type_info(&self, token: Token) -> Option<&TypeInfo> {
        self.types.get(&token)
    }

    fn field(&self, token: Token) -> Option<&FieldInfo> {
        self.fields.get(&token)
    }
}

/// Collects metadata records and validates them into a [`MetadataStore`].
///
/// # Examples
///
/// ```rust
/// use handlerscope::metadata::{
///     FieldInfo, MetadataProbe, MetadataStore, MethodInfo, MethodSignature, TypeInfo,
///     token::Token,
/// };
///
/// let operand = Token::new(0x0200_0002);
/// let store = MetadataStore::builder()
///     .add_type(
///         TypeInfo::new(operand, "", "VMObjectOperand")
///             .with_field(FieldInfo::new(Token::new(0x0400_0001), "value", "System.Object")),
///     )
///     .add_method(
///         MethodInfo::new(Token::new(0x0600_0001), ".ctor", MethodSignature::default())
///             .declared_by(operand),
///     )
///     .build()?;
///
/// assert!(store.method(Token::new(0x0600_0001)).is_some_and(|m| m.is_ctor()));
/// assert_eq!(store.field(Token::new(0x0400_0001)).map(|f| f.declaring_type), Some(Some(operand)));
/// # Ok::<(), handlerscope::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MetadataStoreBuilder {
    methods: Vec<MethodInfo>,
    members: Vec<MemberRefInfo>,
    types: Vec<TypeInfo>,
    fields: Vec<FieldInfo>,
}

impl MetadataStoreBuilder {
    /// Adds a `MethodDef` record.
    #[must_use]
    pub fn add_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a `MemberRef` record.
    #[must_use]
    pub fn add_member(mut self, member: MemberRefInfo) -> Self {
        self.members.push(member);
        self
    }

    /// Adds a type record; its fields become resolvable by token as well.
    #[must_use]
    pub fn add_type(mut self, ty: TypeInfo) -> Self {
        self.types.push(ty);
        self
    }

    /// Adds a field whose declaring type is not registered.
    #[must_use]
    pub fn add_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates and freezes the collected records.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidToken`] if a record's token belongs to the wrong table
    /// - [`Error::DuplicateToken`] if two records share a token
    /// - [`Error::Malformed`] if a method's declaring type is not a type token
    pub fn build(self) -> Result<MetadataStore> {
        let mut store = MetadataStore::default();

        for method in self.methods {
            if !method.token.is_method_def() {
                return Err(Error::InvalidToken(method.token));
            }
            if let Some(owner) = method.declaring_type {
                if !owner.is_type() {
                    return Err(malformed_error!(
                        "Method {} declared by non-type token {}",
                        method.token,
                        owner
                    ));
                }
            }
            insert_unique(&mut store.methods, method.token, method)?;
        }

        for member in self.members {
            if !member.token.is_member_ref() {
                return Err(Error::InvalidToken(member.token));
            }
            insert_unique(&mut store.members, member.token, member)?;
        }

        for ty in self.types {
            if !ty.token.is_type() {
                return Err(Error::InvalidToken(ty.token));
            }
            for field in &ty.fields {
                if !field.token.is_field() {
                    return Err(Error::InvalidToken(field.token));
                }
                insert_unique(&mut store.fields, field.token, field.clone())?;
            }
            insert_unique(&mut store.types, ty.token, ty)?;
        }

        for field in self.fields {
            if !field.token.is_field() {
                return Err(Error::InvalidToken(field.token));
            }
            insert_unique(&mut store.fields, field.token, field)?;
        }

        Ok(store)
    }
}

fn insert_unique<T>(map: &mut HashMap<Token, T>, token: Token, value: T) -> Result<()> {
    if map.insert(token, value).is_some() {
        return Err(Error::DuplicateToken(token));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::model::MethodSignature;

    #[test]
    fn test_base_type_resolution() {
        let base = Token::new(0x0200_0001);
        let derived = Token::new(0x0200_0002);
        let store = MetadataStore::builder()
            .add_type(
                TypeInfo::new(base, "", "Operand")
                    .with_field(FieldInfo::new(Token::new(0x0400_0001), "a", "System.Int32")),
            )
            .add_type(TypeInfo::new(derived, "", "IntOperand").extends(base))
            .build()
            .unwrap();

        assert_eq!(store.base_type_of(derived).map(|t| t.token), Some(base));
        assert!(store.base_type_of(base).is_none());
        assert_eq!(store.fields_of(base).map(<[FieldInfo]>::len), Some(1));
        assert_eq!(store.type_count(), 2);
    }

    #[test]
    fn test_rejects_wrong_table() {
        let result = MetadataStore::builder()
            .add_method(MethodInfo::new(
                Token::new(0x0A00_0001),
                "Invoke",
                MethodSignature::default(),
            ))
            .build();
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }

    #[test]
    fn test_rejects_duplicates() {
        let field = FieldInfo::new(Token::new(0x0400_0001), "a", "System.Int32");
        let result = MetadataStore::builder()
            .add_type(TypeInfo::new(Token::new(0x0200_0001), "", "T").with_field(field.clone()))
            .add_field(field)
            .build();
        assert!(matches!(result, Err(Error::DuplicateToken(t)) if t == Token::new(0x0400_0001)));
    }

    #[test]
    fn test_rejects_non_type_owner() {
        let result = MetadataStore::builder()
            .add_method(
                MethodInfo::new(Token::new(0x0600_0001), "m", MethodSignature::default())
                    .declared_by(Token::new(0x0600_0002)),
            )
            .build();
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }
}
