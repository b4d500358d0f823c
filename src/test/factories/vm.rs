use crate::{
    assembly::OpCode,
    metadata::{
        FieldInfo, MemberRefInfo, MetadataStoreBuilder, MethodInfo, MethodSignature, TypeInfo,
    },
    test::{body_of, tokens::*},
};

const STACK_TYPE: &str = "System.Collections.Generic.Stack`1<VMOperand>";
const OPERAND_NAME: &str = "VMOperand";

/// Metadata of the fixture VM; callers may add more records before building.
pub fn vm_metadata() -> MetadataStoreBuilder {
    let mut builder = MetadataStoreBuilder::default()
        .add_type(
            TypeInfo::new(VM, "", "VM")
                .with_field(FieldInfo::new(STACK, "stack", STACK_TYPE))
                .with_field(FieldInfo::new(RETURN_FLAG, "returning", "System.Boolean"))
                .with_field(FieldInfo::new(IP, "ip", "System.Int32")),
        )
        .add_type(
            TypeInfo::new(OPERAND, "", OPERAND_NAME)
                .with_field(FieldInfo::new(OPERAND_CODE, "code", "System.Int32"))
                .with_field(FieldInfo::new(OPERAND_TYPE, "type", "System.Type")),
        )
        .add_type(
            TypeInfo::new(OBJECT_OPERAND, "", "VMObjectOperand")
                .extends(OPERAND)
                .with_field(FieldInfo::new(OBJECT_VALUE, "value", "System.Object")),
        )
        .add_type(
            TypeInfo::new(INT_OPERAND, "", "VMIntOperand")
                .extends(OPERAND)
                .with_field(FieldInfo::new(INT_VALUE, "value", "System.Int32")),
        )
        .add_type(
            TypeInfo::new(STRING_OPERAND, "", "VMStringOperand")
                .extends(OPERAND)
                .with_field(FieldInfo::new(STRING_VALUE, "value", "System.String")),
        );

    for (token, owner) in [
        (OBJECT_CTOR, OBJECT_OPERAND),
        (INT_CTOR, INT_OPERAND),
        (STRING_CTOR, STRING_OPERAND),
    ] {
        builder = builder.add_method(
            MethodInfo::new(token, ".ctor", MethodSignature::default()).declared_by(owner),
        );
    }

    let stack_read = |accessor| {
        body_of(vec![
            (OpCode::Ldarg0, None),
            (OpCode::Ldfld, Some(STACK)),
            (OpCode::Callvirt, Some(accessor)),
            (OpCode::Ret, None),
        ])
    };

    builder
        .add_method(
            MethodInfo::new(PUSH_STACK, "PushStack", MethodSignature::new(None, &[OPERAND_NAME]))
                .declared_by(VM)
                .with_body(body_of(vec![
                    (OpCode::Ldarg0, None),
                    (OpCode::Ldfld, Some(STACK)),
                    (OpCode::Ldarg1, None),
                    (OpCode::Callvirt, Some(STACK_PUSH)),
                    (OpCode::Ret, None),
                ])),
        )
        .add_method(
            MethodInfo::new(POP_STACK, "PopStack", MethodSignature::new(Some(OPERAND_NAME), &[]))
                .declared_by(VM)
                .with_body(stack_read(STACK_POP)),
        )
        .add_method(
            MethodInfo::new(PEEK_STACK, "PeekStack", MethodSignature::new(Some(OPERAND_NAME), &[]))
                .declared_by(VM)
                .with_body(stack_read(STACK_PEEK)),
        )
        .add_method(
            MethodInfo::new(POP_TWICE, "PopTwice", MethodSignature::new(Some(OPERAND_NAME), &[]))
                .declared_by(VM)
                .with_body(body_of(vec![
                    (OpCode::Ldarg0, None),
                    (OpCode::Ldfld, Some(STACK)),
                    (OpCode::Callvirt, Some(STACK_POP)),
                    (OpCode::Pop, None),
                    (OpCode::Ldarg0, None),
                    (OpCode::Ldfld, Some(STACK)),
                    (OpCode::Callvirt, Some(STACK_POP)),
                    (OpCode::Ret, None),
                ])),
        )
        .add_method(
            MethodInfo::new(ENABLE_RETURN, "EnableReturn", MethodSignature::default())
                .declared_by(VM)
                .with_body(body_of(vec![
                    (OpCode::Ldarg0, None),
                    (OpCode::LdcI41, None),
                    (OpCode::Stfld, Some(RETURN_FLAG)),
                    (OpCode::Ret, None),
                ])),
        )
        .add_method(
            MethodInfo::new(
                RESOLVE_STRING,
                "ResolveString",
                MethodSignature::new(Some("System.String"), &["System.Int32"]),
            )
            .declared_by(VM),
        )
        .add_method(
            MethodInfo::new(
                RESOLVE_FIELD,
                "ResolveField",
                MethodSignature::new(Some("System.Reflection.FieldInfo"), &["System.Int32"]),
            )
            .declared_by(VM),
        )
        .add_method(
            MethodInfo::new(
                RESOLVE_TYPE,
                "ResolveType",
                MethodSignature::new(Some("System.Type"), &["System.Int32", "System.Boolean"]),
            )
            .declared_by(VM),
        )
        .add_method(
            MethodInfo::new(
                GET_INT_VALUE,
                "get_Value",
                MethodSignature::new(Some("System.Int32"), &[]),
            )
            .declared_by(INT_OPERAND),
        )
        .add_method(
            MethodInfo::new(
                SET_STRING_VALUE,
                "set_Value",
                MethodSignature::new(None, &["System.String"]),
            )
            .declared_by(STRING_OPERAND),
        )
        .add_method(
            MethodInfo::new(
                SET_OBJECT_VALUE,
                "set_Value",
                MethodSignature::new(None, &["System.Object"]),
            )
            .declared_by(OBJECT_OPERAND),
        )
        .add_method(
            MethodInfo::new(CLONE, "Clone", MethodSignature::new(Some(OPERAND_NAME), &[]))
                .declared_by(OPERAND),
        )
        .add_method(
            MethodInfo::new(
                TO_OBJECT,
                "ToObject",
                MethodSignature::new(Some("System.Object"), &[]),
            )
            .declared_by(OPERAND),
        )
        .add_method(
            MethodInfo::new(SET_TYPE, "set_Type", MethodSignature::new(None, &["System.Type"]))
                .declared_by(OPERAND),
        )
        .add_method(
            MethodInfo::new(
                BOX_VALUE,
                "Box",
                MethodSignature::new(Some(OPERAND_NAME), &["System.Object", "System.Type"]),
            )
            .declared_by(OPERAND),
        )
        .add_member(MemberRefInfo::new(
            STACK_PUSH,
            STACK_TYPE,
            "Push",
            MethodSignature::new(None, &[OPERAND_NAME]),
        ))
        .add_member(MemberRefInfo::new(
            STACK_POP,
            STACK_TYPE,
            "Pop",
            MethodSignature::new(Some(OPERAND_NAME), &[]),
        ))
        .add_member(MemberRefInfo::new(
            STACK_PEEK,
            STACK_TYPE,
            "Peek",
            MethodSignature::new(Some(OPERAND_NAME), &[]),
        ))
        .add_member(MemberRefInfo::new(
            GET_FIELD_HANDLE,
            "System.Reflection.FieldInfo",
            "get_FieldHandle",
            MethodSignature::new(Some("System.RuntimeFieldHandle"), &[]),
        ))
}
