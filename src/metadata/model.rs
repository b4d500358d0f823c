//! Resolved metadata records handed to verifiers.
//!
//! These are the narrow projections of method, member, type and field metadata that
//! handler verification needs: signature shapes, declaring types, field type identities
//! and base types. Type identities are carried as fully-qualified names
//! (e.g. `System.Int32`), which is how verifiers compare them.

use crate::{assembly::InstructionSequence, metadata::token::Token};

/// Full name of the `void` return type.
pub const VOID_TYPE_NAME: &str = "System.Void";

/// Return and parameter types of a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodSignature {
    /// Full name of the return type, `None` for `void`
    pub return_type: Option<String>,
    /// Full names of the parameter types, in declaration order
    pub params: Vec<String>,
}

impl MethodSignature {
    /// Builds a signature from type names.
    #[must_use]
    pub fn new(return_type: Option<&str>, params: &[&str]) -> Self {
        MethodSignature {
            return_type: return_type.map(str::to_string),
            params: params.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Returns `true` if the method returns a value.
    #[must_use]
    pub fn returns_value(&self) -> bool {
        self.return_type.is_some()
    }

    /// Returns `true` if the method returns a value of the named type.
    #[must_use]
    pub fn returns(&self, type_name: &str) -> bool {
        self.return_type.as_deref() == Some(type_name)
    }

    /// Returns `true` if the parameter types equal `expected`, in order.
    #[must_use]
    pub fn params_are(&self, expected: &[&str]) -> bool {
        self.params.len() == expected.len()
            && self.params.iter().zip(expected).all(|(p, e)| p == e)
    }

    /// Return type name, using [`VOID_TYPE_NAME`] for `void`.
    #[must_use]
    pub fn return_type_name(&self) -> &str {
        self.return_type.as_deref().unwrap_or(VOID_TYPE_NAME)
    }
}

/// A method defined in the analysed module (`MethodDef`).
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// `MethodDef` token
    pub token: Token,
    /// Simple name (`.ctor` for constructors)
    pub name: String,
    /// Declaring type, if known
    pub declaring_type: Option<Token>,
    /// Signature shape
    pub signature: MethodSignature,
    /// Decoded body, absent for abstract or native methods
    pub body: Option<InstructionSequence>,
}

impl MethodInfo {
    /// Creates a method record without body.
    #[must_use]
    pub fn new(token: Token, name: &str, signature: MethodSignature) -> Self {
        MethodInfo {
            token,
            name: name.to_string(),
            declaring_type: None,
            signature,
            body: None,
        }
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn declared_by(mut self, declaring_type: Token) -> Self {
        self.declaring_type = Some(declaring_type);
        self
    }

    /// Attaches the decoded body.
    #[must_use]
    pub fn with_body(mut self, body: InstructionSequence) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns `true` for instance constructors.
    #[must_use]
    pub fn is_ctor(&self) -> bool {
        self.name == ".ctor"
    }
}

/// A reference to a member of another module (`MemberRef`).
#[derive(Debug, Clone)]
pub struct MemberRefInfo {
    /// `MemberRef` token
    pub token: Token,
    /// Full name of the declaring type
    pub parent: String,
    /// Member name
    pub name: String,
    /// Signature shape
    pub signature: MethodSignature,
}

impl MemberRefInfo {
    /// Creates a member reference record.
    #[must_use]
    pub fn new(token: Token, parent: &str, name: &str, signature: MethodSignature) -> Self {
        MemberRefInfo {
            token,
            parent: parent.to_string(),
            name: name.to_string(),
            signature,
        }
    }

    /// Renders `"<return> <Parent>::<name>(<params>)"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use handlerscope::metadata::{MemberRefInfo, MethodSignature, token::Token};
    ///
    /// let member = MemberRefInfo::new(
    ///     Token::new(0x0A00_0001),
    ///     "System.Reflection.FieldInfo",
    ///     "get_FieldHandle",
    ///     MethodSignature::new(Some("System.RuntimeFieldHandle"), &[]),
    /// );
    /// assert_eq!(
    ///     member.full_name(),
    ///     "System.RuntimeFieldHandle System.Reflection.FieldInfo::get_FieldHandle()"
    /// );
    /// ```
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}::{}({})",
            self.signature.return_type_name(),
            self.parent,
            self.name,
            self.signature.params.join(", ")
        )
    }
}

/// A field declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// `Field` token
    pub token: Token,
    /// Field name
    pub name: String,
    /// Full name of the field's type
    pub field_type: String,
    /// Declaring type, if known
    pub declaring_type: Option<Token>,
}

impl FieldInfo {
    /// Creates a field record.
    #[must_use]
    pub fn new(token: Token, name: &str, field_type: &str) -> Self {
        FieldInfo {
            token,
            name: name.to_string(),
            field_type: field_type.to_string(),
            declaring_type: None,
        }
    }

    /// Returns `true` if the field is of the named type.
    #[must_use]
    pub fn is_of_type(&self, type_name: &str) -> bool {
        self.field_type == type_name
    }
}

/// A type with its direct fields and base type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Type token
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Base type, `None` for `System.Object` and interfaces
    pub base_type: Option<Token>,
    /// Directly declared fields, in declaration order
    pub fields: Vec<FieldInfo>,
}

impl TypeInfo {
    /// Creates a type record without fields.
    #[must_use]
    pub fn new(token: Token, namespace: &str, name: &str) -> Self {
        TypeInfo {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            base_type: None,
            fields: Vec::new(),
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn extends(mut self, base_type: Token) -> Self {
        self.base_type = Some(base_type);
        self
    }

    /// Appends a field; its declaring type is set to this type.
    #[must_use]
    pub fn with_field(mut self, mut field: FieldInfo) -> Self {
        field.declaring_type = Some(self.token);
        self.fields.push(field);
        self
    }

    /// `Namespace.Name`, or just `Name` in the global namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Number of fields of the named type.
    #[must_use]
    pub fn count_fields_of_type(&self, type_name: &str) -> usize {
        self.fields.iter().filter(|f| f.is_of_type(type_name)).count()
    }
}
