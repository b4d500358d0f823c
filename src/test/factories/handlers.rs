//! One handler body per built-in template, wired to [`vm_metadata`](super::vm_metadata).

use crate::{
    assembly::{InstructionSequence, OpCode},
    metadata::token::Token,
    test::{body_of, tokens::*},
};

pub fn ldstr() -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg1, None),
        (OpCode::Castclass, Some(INT_OPERAND)),
        (OpCode::Callvirt, Some(GET_INT_VALUE)),
        (OpCode::Stloc0, None),
        (OpCode::Ldarg0, None),
        (OpCode::Ldloc0, None),
        (OpCode::Callvirt, Some(RESOLVE_STRING)),
        (OpCode::Stloc1, None),
        (OpCode::Ldarg0, None),
        (OpCode::Newobj, Some(STRING_CTOR)),
        (OpCode::Dup, None),
        (OpCode::Ldloc1, None),
        (OpCode::Callvirt, Some(SET_STRING_VALUE)),
        (OpCode::Callvirt, Some(PUSH_STACK)),
        (OpCode::Ret, None),
    ])
}

pub fn ret() -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg0, None),
        (OpCode::Callvirt, Some(ENABLE_RETURN)),
        (OpCode::Ret, None),
    ])
}

/// Body of the return helper itself: stores `true` into `flag`.
pub fn set_flag(flag: Token) -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg0, None),
        (OpCode::LdcI41, None),
        (OpCode::Stfld, Some(flag)),
        (OpCode::Ret, None),
    ])
}

fn push_new(ctor: Token) -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg0, None),
        (OpCode::Newobj, Some(ctor)),
        (OpCode::Callvirt, Some(PUSH_STACK)),
        (OpCode::Ret, None),
    ])
}

pub fn ldnull() -> InstructionSequence {
    push_new(OBJECT_CTOR)
}

pub fn ldc_i4_0() -> InstructionSequence {
    push_new(INT_CTOR)
}

pub fn dup() -> InstructionSequence {
    dup_via(PEEK_STACK)
}

/// `dup` shape reading the top of stack through `accessor`.
pub fn dup_via(accessor: Token) -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg0, None),
        (OpCode::Callvirt, Some(accessor)),
        (OpCode::Stloc0, None),
        (OpCode::Ldarg0, None),
        (OpCode::Ldloc0, None),
        (OpCode::Callvirt, Some(CLONE)),
        (OpCode::Callvirt, Some(PUSH_STACK)),
        (OpCode::Ret, None),
    ])
}

pub fn pop() -> InstructionSequence {
    pop_via(POP_STACK)
}

/// `pop` shape discarding the result of `accessor`.
pub fn pop_via(accessor: Token) -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg0, None),
        (OpCode::Callvirt, Some(accessor)),
        (OpCode::Pop, None),
        (OpCode::Ret, None),
    ])
}

/// Operand fetch first; the field-handle window starts at index 4.
pub fn ldtoken() -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg1, None),
        (OpCode::Castclass, Some(INT_OPERAND)),
        (OpCode::Callvirt, Some(GET_INT_VALUE)),
        (OpCode::Stloc1, None),
        (OpCode::Ldarg0, None),
        (OpCode::Ldloc1, None),
        (OpCode::Callvirt, Some(RESOLVE_FIELD)),
        (OpCode::Callvirt, Some(GET_FIELD_HANDLE)),
        (OpCode::Box, Some(RUNTIME_FIELD_HANDLE)),
        (OpCode::Stloc3, None),
        (OpCode::Ldarg0, None),
        (OpCode::Newobj, Some(OBJECT_CTOR)),
        (OpCode::Dup, None),
        (OpCode::Ldloc3, None),
        (OpCode::Callvirt, Some(SET_OBJECT_VALUE)),
        (OpCode::Callvirt, Some(PUSH_STACK)),
        (OpCode::Ret, None),
    ])
}

pub fn boxing() -> InstructionSequence {
    body_of(vec![
        (OpCode::Ldarg1, None),
        (OpCode::Castclass, Some(INT_OPERAND)),
        (OpCode::Callvirt, Some(GET_INT_VALUE)),
        (OpCode::Stloc0, None),
        (OpCode::Ldarg0, None),
        (OpCode::Ldloc0, None),
        (OpCode::LdcI41, None),
        (OpCode::Callvirt, Some(RESOLVE_TYPE)),
        (OpCode::Stloc1, None),
        (OpCode::Ldarg0, None),
        (OpCode::Callvirt, Some(POP_STACK)),
        (OpCode::Callvirt, Some(TO_OBJECT)),
        (OpCode::Ldloc1, None),
        (OpCode::Call, Some(BOX_VALUE)),
        (OpCode::Stloc2, None),
        (OpCode::Ldloc2, None),
        (OpCode::Ldloc1, None),
        (OpCode::Callvirt, Some(SET_TYPE)),
        (OpCode::Ldarg0, None),
        (OpCode::Ldloc2, None),
        (OpCode::Callvirt, Some(PUSH_STACK)),
        (OpCode::Ret, None),
    ])
}

/// Every fixture handler paired with the opcode it implements.
pub fn all() -> Vec<(OpCode, InstructionSequence)> {
    vec![
        (OpCode::Ldstr, ldstr()),
        (OpCode::Ret, ret()),
        (OpCode::Ldnull, ldnull()),
        (OpCode::LdcI40, ldc_i4_0()),
        (OpCode::Dup, dup()),
        (OpCode::Pop, pop()),
        (OpCode::Ldtoken, ldtoken()),
        (OpCode::Box, boxing()),
    ]
}
