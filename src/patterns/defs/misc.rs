//! Stack, constant, return and boxing handlers.
//!
//! The interpreter keeps its evaluation stack behind `PushStack`/`PopStack`/`PeekStack`
//! helpers on the VM instance (`ldarg.0`), and wraps every value in an operand object
//! deriving from a common base with two fields: an `int32` type code and a `System.Type`.
//! Most handlers below are recognized by their call shape into those helpers; the
//! verifiers then pin down which helper or wrapper is involved.

use crate::{
    assembly::OpCode,
    patterns::{
        defs::names,
        template::{Anchor, Interchange, Template},
        verify::VerifyContext,
    },
};

const SYSTEM_INT32: &str = "System.Int32";
const SYSTEM_OBJECT: &str = "System.Object";
const SYSTEM_STRING: &str = "System.String";
const SYSTEM_TYPE: &str = "System.Type";
const SYSTEM_BOOLEAN: &str = "System.Boolean";
const FIELD_INFO: &str = "System.Reflection.FieldInfo";
const STACK_PEEK: &str = "Peek";
const STACK_POP: &str = "Pop";
const GET_FIELD_HANDLE: &str =
    "System.RuntimeFieldHandle System.Reflection.FieldInfo::get_FieldHandle()";

pub(super) fn templates() -> Vec<Template> {
    vec![
        // ldarg.1; castclass IntOperand; callvirt get_Value; stloc.0
        // ldarg.0; ldloc.0; callvirt VM::ResolveString(int32); stloc.1
        // ldarg.0; newobj StringOperand::.ctor; dup; ldloc.1; callvirt set_Value
        // callvirt VM::PushStack; ret
        Template::entire_body(
            names::LDSTR,
            Some(OpCode::Ldstr),
            &[
                OpCode::Ldarg1,
                OpCode::Castclass,
                OpCode::Callvirt,
                OpCode::Stloc0,
                OpCode::Ldarg0,
                OpCode::Ldloc0,
                OpCode::Callvirt,
                OpCode::Stloc1,
                OpCode::Ldarg0,
                OpCode::Newobj,
                OpCode::Dup,
                OpCode::Ldloc1,
                OpCode::Callvirt,
                OpCode::Callvirt,
                OpCode::Ret,
            ],
        )
        .verified_by(resolves_string),
        Template::entire_body(
            names::ENABLE_RETURN,
            None,
            &[OpCode::Ldarg0, OpCode::LdcI41, OpCode::Stfld, OpCode::Ret],
        )
        .verified_by(sets_boolean_flag),
        Template::entire_body(
            names::RET,
            Some(OpCode::Ret),
            &[OpCode::Ldarg0, OpCode::Callvirt, OpCode::Ret],
        )
        .verified_by(calls_enable_return),
        // ldarg.0; newobj <Wrapper>::.ctor; callvirt VM::PushStack; ret
        Template::entire_body(
            names::LDNULL,
            Some(OpCode::Ldnull),
            &[OpCode::Ldarg0, OpCode::Newobj, OpCode::Callvirt, OpCode::Ret],
        )
        .verified_by(pushes_default_object),
        Template::entire_body(
            names::LDC_I4_0,
            Some(OpCode::LdcI40),
            &[OpCode::Ldarg0, OpCode::Newobj, OpCode::Callvirt, OpCode::Ret],
        )
        .verified_by(pushes_default_int32),
        // ldarg.0; ldfld <stack>; callvirt Stack::Peek / Stack::Pop
        Template::window(
            names::PEEK_STACK,
            None,
            &[OpCode::Ldarg0, OpCode::Ldfld, OpCode::Callvirt],
        )
        .verified_by(peeks_stack),
        Template::window(
            names::POP_STACK,
            None,
            &[OpCode::Ldarg0, OpCode::Ldfld, OpCode::Callvirt],
        )
        .verified_by(pops_stack),
        // ldarg.0; callvirt VM::PeekStack; stloc.0
        // ldarg.0; ldloc.0; callvirt Operand::Clone; callvirt VM::PushStack; ret
        Template::entire_body(
            names::DUP,
            Some(OpCode::Dup),
            &[
                OpCode::Ldarg0,
                OpCode::Callvirt,
                OpCode::Stloc0,
                OpCode::Ldarg0,
                OpCode::Ldloc0,
                OpCode::Callvirt,
                OpCode::Callvirt,
                OpCode::Ret,
            ],
        )
        .verified_by(peeks_once),
        Template::entire_body(
            names::POP,
            Some(OpCode::Pop),
            &[OpCode::Ldarg0, OpCode::Callvirt, OpCode::Pop, OpCode::Ret],
        )
        .verified_by(pops_once),
        // ldarg.0; ldloc <token>; callvirt VM::ResolveField(int32)
        // callvirt FieldInfo::get_FieldHandle; box RuntimeFieldHandle; stloc <result>
        Template::window(
            names::LDTOKEN,
            Some(OpCode::Ldtoken),
            &[
                OpCode::Ldarg0,
                OpCode::Ldloc0,
                OpCode::Callvirt,
                OpCode::Callvirt,
                OpCode::Box,
                OpCode::Stloc2,
            ],
        )
        .interchange(Interchange::LOCALS)
        .anchored(Anchor::Scan)
        .verified_by(loads_field_handle),
        // resolve the target type (slot 7), pop and unwrap the value,
        // re-wrap through Operand::Box(object, Type) (slot 13), tag it and push it back
        Template::entire_body(
            names::BOX,
            Some(OpCode::Box),
            &[
                OpCode::Ldarg1,
                OpCode::Castclass,
                OpCode::Callvirt,
                OpCode::Stloc0,
                OpCode::Ldarg0,
                OpCode::Ldloc0,
                OpCode::LdcI41,
                OpCode::Callvirt,
                OpCode::Stloc1,
                OpCode::Ldarg0,
                OpCode::Callvirt,
                OpCode::Callvirt,
                OpCode::Ldloc1,
                OpCode::Call,
                OpCode::Stloc2,
                OpCode::Ldloc2,
                OpCode::Ldloc1,
                OpCode::Callvirt,
                OpCode::Ldarg0,
                OpCode::Ldloc2,
                OpCode::Callvirt,
                OpCode::Ret,
            ],
        )
        .interchange(Interchange::LOCALS)
        .verified_by(boxes_with_type),
    ]
}

fn resolves_string(ctx: &VerifyContext<'_>) -> bool {
    ctx.returns_type(6, SYSTEM_STRING)
}

fn sets_boolean_flag(ctx: &VerifyContext<'_>) -> bool {
    ctx.field_at(2)
        .is_some_and(|field| field.is_of_type(SYSTEM_BOOLEAN))
}

fn calls_enable_return(ctx: &VerifyContext<'_>) -> bool {
    ctx.delegates_to(1, names::ENABLE_RETURN)
}

fn pushes_default_object(ctx: &VerifyContext<'_>) -> bool {
    constructs_wrapper_of(ctx, SYSTEM_OBJECT)
}

fn pushes_default_int32(ctx: &VerifyContext<'_>) -> bool {
    constructs_wrapper_of(ctx, SYSTEM_INT32)
}

/// The constructor at slot 1 builds a wrapper holding exactly one field of `value_type`,
/// deriving from the operand base (exactly two fields: one `int32`, one `System.Type`).
fn constructs_wrapper_of(ctx: &VerifyContext<'_>, value_type: &str) -> bool {
    let Some(wrapper) = ctx.constructed_type_at(1) else {
        return false;
    };
    if !matches!(wrapper.fields.as_slice(), [field] if field.is_of_type(value_type)) {
        return false;
    }

    ctx.probe()
        .base_type_of(wrapper.token)
        .is_some_and(|base| {
            base.fields.len() == 2
                && base.count_fields_of_type(SYSTEM_INT32) == 1
                && base.count_fields_of_type(SYSTEM_TYPE) == 1
        })
}

fn peeks_stack(ctx: &VerifyContext<'_>) -> bool {
    reads_stack_through(ctx, STACK_PEEK)
}

fn pops_stack(ctx: &VerifyContext<'_>) -> bool {
    reads_stack_through(ctx, STACK_POP)
}

/// The call at slot 2 is the stack collection's `accessor` and yields the operand.
fn reads_stack_through(ctx: &VerifyContext<'_>, accessor: &str) -> bool {
    let called = ctx
        .member_at(2)
        .map(|m| (m.name.as_str(), &m.signature))
        .or_else(|| ctx.method_at(2).map(|m| (m.name.as_str(), &m.signature)));

    called.is_some_and(|(name, signature)| name == accessor && signature.returns_value())
}

fn peeks_once(ctx: &VerifyContext<'_>) -> bool {
    ctx.occurrences_in(1, names::PEEK_STACK) == Some(1)
}

fn pops_once(ctx: &VerifyContext<'_>) -> bool {
    ctx.occurrences_in(1, names::POP_STACK) == Some(1)
}

fn loads_field_handle(ctx: &VerifyContext<'_>) -> bool {
    ctx.returns_type(2, FIELD_INFO)
        && ctx
            .member_at(3)
            .is_some_and(|member| member.full_name() == GET_FIELD_HANDLE)
}

fn boxes_with_type(ctx: &VerifyContext<'_>) -> bool {
    ctx.returns_type(7, SYSTEM_TYPE) && ctx.param_types_are(13, &[SYSTEM_OBJECT, SYSTEM_TYPE])
}
