//! Instruction sequences for setter variants.
//!
//! Both call shapes assume the target instance is already on the stack and
//! leave it consumed by the runtime call.
//!
//! Inline shape, operands already pushed after the instance in parameter
//! order:
//!
//! ```text
//! Unset               [inst, unset]            pop; field; UnsetValue; 0; SetValue
//! Binding             [inst, binding]          spill b; field; b; null; Bind
//! BindingWithPriority [inst, prio, binding]    spill b; pop; field; b; null; Bind
//! PlainWithPriority   [inst, prio, value]      spill v, p; field; v; p; SetStyledValue<T>
//! Plain               [inst, value]            spill v; field; v; 0; SetStyledValue<T>
//! ```
//!
//! Argument shape: the descriptor field is pushed first and each argument
//! expression is compiled straight into its slot, so nothing is spilled.

use markup_core::{CompilationError, MethodEntry, Span, TypeHash};
use tracing::trace;

use super::resolver::find_descriptor_field;
use super::setters::{SetterKind, SetterVariant};
use crate::bytecode::Constant;
use crate::context::{EmitContext, ValueNode};

impl SetterVariant {
    /// Emit this variant with its operands already on the stack.
    ///
    /// Spilled operands live in pooled locals released before returning,
    /// including when a slot falls outside the operand range.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit_inline(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError> {
        let known = ctx.known();
        let field = self.property.field.field_hash;
        let value_type = self.property.value_type;
        trace!(property = %self.property.name, kind = %self.kind, "emit inline setter");

        match self.kind {
            SetterKind::Unset => {
                ctx.emitter().emit_pop();
                emit_unset_tail(ctx, field)
            }
            SetterKind::Binding | SetterKind::BindingWithPriority => {
                let binding = ctx.acquire_local(known.binding);
                let emitter = ctx.emitter();
                emitter.emit_set_local(binding.slot())?;
                if self.kind.has_priority() {
                    // Bindings carry no priority
                    emitter.emit_pop();
                }
                emitter.emit_get_static(field)?;
                emitter.emit_get_local(binding.slot())?;
                emitter.emit_null();
                emit_runtime_call(ctx, &known.bind, None)
            }
            SetterKind::PlainWithPriority => {
                let value = ctx.acquire_local(value_type);
                let priority = ctx.acquire_local(known.binding_priority);
                let emitter = ctx.emitter();
                emitter.emit_set_local(value.slot())?;
                emitter.emit_set_local(priority.slot())?;
                emitter.emit_get_static(field)?;
                emitter.emit_get_local(value.slot())?;
                emitter.emit_get_local(priority.slot())?;
                emit_runtime_call(ctx, &known.set_styled_value, Some(value_type))
            }
            SetterKind::Plain => {
                let value = ctx.acquire_local(value_type);
                let emitter = ctx.emitter();
                emitter.emit_set_local(value.slot())?;
                emitter.emit_get_static(field)?;
                emitter.emit_get_local(value.slot())?;
                emitter.emit_int(0)?;
                emit_runtime_call(ctx, &known.set_styled_value, Some(value_type))
            }
        }
    }

    /// Emit this variant from explicit argument expressions, one per
    /// parameter in parameter order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn emit_args(
        &self,
        ctx: &mut EmitContext<'_, '_>,
        args: &[&dyn ValueNode],
    ) -> Result<(), CompilationError> {
        if args.len() != self.arity() {
            return Err(CompilationError::ArgumentCountMismatch {
                name: format!("{} setter of '{}'", self.kind, self.property.name),
                expected: self.arity(),
                got: args.len(),
                span: args.first().map_or_else(Span::default, |a| a.span()),
            });
        }

        let known = ctx.known();
        let field = self.property.field.field_hash;
        let value_type = self.property.value_type;
        trace!(property = %self.property.name, kind = %self.kind, "emit setter from arguments");

        match self.kind {
            SetterKind::Unset => {
                // The sentinel is implied by the runtime call and never pushed
                ctx.check_value(args[0], known.unset_value_type)?;
                emit_unset_tail(ctx, field)
            }
            SetterKind::Binding | SetterKind::BindingWithPriority => {
                let binding = if self.kind.has_priority() { args[1] } else { args[0] };
                ctx.emitter().emit_get_static(field)?;
                ctx.emit_value(binding, known.binding)?;
                ctx.emitter().emit_null();
                emit_runtime_call(ctx, &known.bind, None)
            }
            SetterKind::PlainWithPriority => {
                ctx.emitter().emit_get_static(field)?;
                ctx.emit_value(args[1], value_type)?;
                ctx.emit_value(args[0], known.binding_priority)?;
                emit_runtime_call(ctx, &known.set_styled_value, Some(value_type))
            }
            SetterKind::Plain => {
                ctx.emitter().emit_get_static(field)?;
                ctx.emit_value(args[0], value_type)?;
                ctx.emitter().emit_int(0)?;
                emit_runtime_call(ctx, &known.set_styled_value, Some(value_type))
            }
        }
    }
}

fn emit_unset_tail(ctx: &mut EmitContext<'_, '_>, field: TypeHash) -> Result<(), CompilationError> {
    let known = ctx.known();
    let emitter = ctx.emitter();
    emitter.emit_get_static(field)?;
    emitter.emit_get_static(known.unset_value.field_hash)?;
    emitter.emit_int(0)?;
    emit_runtime_call(ctx, &known.set_value, None)
}

/// Call a runtime entry point, discarding its result.
fn emit_runtime_call(
    ctx: &mut EmitContext<'_, '_>,
    method: &MethodEntry,
    type_arg: Option<TypeHash>,
) -> Result<(), CompilationError> {
    let argc = arg_count(method)?;
    let emitter = ctx.emitter();
    match (method.is_static, type_arg.filter(|_| method.is_generic())) {
        (true, None) => emitter.emit_call(method.method_hash, argc)?,
        (false, None) => emitter.emit_call_method(method.method_hash, argc)?,
        (true, Some(ty)) => emitter.emit_call_generic(method.method_hash, vec![ty], argc)?,
        (false, Some(ty)) => emitter.emit_call_method_generic(method.method_hash, vec![ty], argc)?,
    }
    if method.returns_value() {
        emitter.emit_pop();
    }
    Ok(())
}

/// The call-site argument count of `method`, excluding any receiver.
pub(crate) fn arg_count(method: &MethodEntry) -> Result<u8, CompilationError> {
    u8::try_from(method.params.len()).map_err(|_| {
        CompilationError::internal(format!(
            "'{}' takes {} parameters, more than a call can pass",
            method.name,
            method.params.len()
        ))
    })
}

/// Load the `<name>Property` descriptor field visible from `declaring_type`.
///
/// Returns `Ok(false)` and emits nothing when there is none.
pub fn emit_property_field(
    ctx: &mut EmitContext<'_, '_>,
    declaring_type: TypeHash,
    name: &str,
) -> Result<bool, CompilationError> {
    match find_descriptor_field(ctx.types(), ctx.known(), declaring_type, name) {
        Some(field) => {
            ctx.emitter().emit_get_static(field.field_hash)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Push the target of a markup extension's provide-value call.
///
/// Prefers the descriptor field; falls back to a reflection handle for the
/// instance property. `Ok(false)` when neither exists.
pub fn emit_provide_value_target(
    ctx: &mut EmitContext<'_, '_>,
    declaring_type: TypeHash,
    name: &str,
) -> Result<bool, CompilationError> {
    if emit_property_field(ctx, declaring_type, name)? {
        return Ok(true);
    }
    match ctx.types().find_property(declaring_type, name) {
        Some(property) => {
            trace!(name, "provide-value target through reflection");
            ctx.emitter()
                .emit_constant(Constant::PropertyInfo(property.property_hash))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::bytecode::{ConstantPool, OpCode};
    use crate::context::{LocalValue, NullLiteral};
    use crate::emit::BytecodeEmitter;
    use crate::known_types::{WellKnownNames, WellKnownTypes};
    use crate::property::descriptor::FieldBackedProperty;
    use crate::property::setters::build_setters;
    use crate::runtime::register_runtime;
    use markup_core::{FieldEntry, PropertyEntry, TypeEntry, TypeSystem};
    use markup_registry::TypeRegistry;

    struct Fixture {
        registry: TypeRegistry,
        known: WellKnownTypes,
        button: TypeHash,
        styled: Rc<FieldBackedProperty>,
        direct: Rc<FieldBackedProperty>,
    }

    fn fixture() -> Fixture {
        let names = WellKnownNames::default();
        let mut registry = TypeRegistry::with_builtins();
        register_runtime(&mut registry, &names).unwrap();
        let bool_type = registry.resolve_type(&names.bool).unwrap();
        let int = registry.resolve_type(&names.int).unwrap();
        let styled_t = registry.resolve_type(&names.styled_property_t).unwrap();
        let styled_bool = registry.instantiate(styled_t, &[bool_type]).unwrap();

        let button = registry.register_type(TypeEntry::class("Button")).unwrap();
        let direct_t = registry
            .resolve_type(&markup_core::QualifiedName::global("DirectProperty`2"))
            .unwrap();
        let direct_int = registry.instantiate(direct_t, &[button, int]).unwrap();

        let is_default = FieldEntry::public_static("IsDefaultProperty", button, styled_bool);
        let click_count = FieldEntry::public_static("ClickCountProperty", button, direct_int);
        registry.add_field(button, is_default.clone()).unwrap();
        registry.add_field(button, click_count.clone()).unwrap();
        registry
            .add_property(button, PropertyEntry::read_write("Content", button, int))
            .unwrap();

        let known = WellKnownTypes::resolve(&registry, &names).unwrap();
        Fixture {
            styled: Rc::new(FieldBackedProperty {
                name: "IsDefault".into(),
                declaring_type: button,
                field: is_default,
                value_type: bool_type,
                is_styled: true,
                is_attached: false,
                allows_binding_override: true,
            }),
            direct: Rc::new(FieldBackedProperty {
                name: "ClickCount".into(),
                declaring_type: button,
                field: click_count,
                value_type: int,
                is_styled: false,
                is_attached: false,
                allows_binding_override: true,
            }),
            registry,
            known,
            button,
        }
    }

    fn variant(f: &Fixture, property: &Rc<FieldBackedProperty>, kind: SetterKind) -> SetterVariant {
        build_setters(property, &f.known, &f.registry)
            .into_iter()
            .find(|v| v.kind == kind)
            .unwrap()
    }

    #[test]
    fn inline_unset_discards_value_without_locals() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        variant(&f, &f.styled, SetterKind::Unset)
            .emit_inline(&mut ctx)
            .unwrap();

        assert_eq!(emitter.locals().outstanding(), 0);
        assert_eq!(emitter.locals().high_water(), 0);
        emitter.finish().assert_opcodes(&[
            OpCode::Pop,
            OpCode::GetStatic,
            OpCode::GetStatic,
            OpCode::PushZero,
            OpCode::CallMethod,
            OpCode::Pop,
        ]);
    }

    #[test]
    fn inline_binding_with_priority_drops_priority() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        variant(&f, &f.styled, SetterKind::BindingWithPriority)
            .emit_inline(&mut ctx)
            .unwrap();

        assert_eq!(emitter.locals().outstanding(), 0);
        emitter.finish().assert_opcodes(&[
            OpCode::SetLocal,
            OpCode::Pop,
            OpCode::GetStatic,
            OpCode::GetLocal,
            OpCode::PushNull,
            OpCode::CallMethod,
            OpCode::Pop,
        ]);
    }

    #[test]
    fn inline_plain_with_priority_reorders_through_locals() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::with_locals_base(&mut constants, 3);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        variant(&f, &f.styled, SetterKind::PlainWithPriority)
            .emit_inline(&mut ctx)
            .unwrap();

        assert_eq!(emitter.locals().outstanding(), 0);
        assert_eq!(emitter.locals().high_water(), 2);
        let chunk = emitter.finish();
        chunk.assert_opcodes(&[
            OpCode::SetLocal,
            OpCode::SetLocal,
            OpCode::GetStatic,
            OpCode::GetLocal,
            OpCode::GetLocal,
            OpCode::CallMethodGeneric,
            OpCode::Pop,
        ]);
        // value spilled first into the lower slot, re-pushed first
        assert_eq!(chunk.read_byte(1), Some(3));
        assert_eq!(chunk.read_byte(3), Some(4));
        assert_eq!(chunk.read_byte(8), Some(3));
        assert_eq!(chunk.read_byte(10), Some(4));

        let generic = constants
            .constants()
            .iter()
            .find_map(|c| match c {
                Constant::GenericMethod { method, type_args } => Some((*method, type_args.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(generic, (f.known.set_styled_value.method_hash, vec![f.known.bool]));
    }

    #[test]
    fn repeated_emission_reuses_slots() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);
        let setter = variant(&f, &f.styled, SetterKind::PlainWithPriority);
        for _ in 0..10 {
            setter.emit_inline(&mut ctx).unwrap();
        }
        assert_eq!(emitter.locals().high_water(), 2);
    }

    #[test]
    fn spilled_slots_past_operand_range_fail_cleanly() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::with_locals_base(&mut constants, 65_539);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let err = variant(&f, &f.styled, SetterKind::PlainWithPriority)
            .emit_inline(&mut ctx)
            .unwrap_err();

        assert!(matches!(err, CompilationError::Internal { .. }));
        assert_eq!(emitter.locals().outstanding(), 0);
        // no SetLocalWide with a wrapped slot
        assert_eq!(emitter.code_size(), 0);
    }

    #[test]
    fn highest_wide_slot_still_spills() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let base = u32::from(u16::MAX);
        let mut emitter = BytecodeEmitter::with_locals_base(&mut constants, base);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        variant(&f, &f.styled, SetterKind::Binding)
            .emit_inline(&mut ctx)
            .unwrap();

        let chunk = emitter.finish();
        chunk.assert_opcodes(&[
            OpCode::SetLocalWide,
            OpCode::GetStatic,
            OpCode::GetLocalWide,
            OpCode::PushNull,
            OpCode::CallMethod,
            OpCode::Pop,
        ]);
        assert_eq!(chunk.read_u16(1), Some(u16::MAX));
        assert_eq!(chunk.read_u16(7), Some(u16::MAX));
    }

    #[test]
    fn inline_plain_sets_styled_value_at_default_priority() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        variant(&f, &f.direct, SetterKind::Plain)
            .emit_inline(&mut ctx)
            .unwrap();

        assert_eq!(emitter.locals().outstanding(), 0);
        emitter.finish().assert_opcodes(&[
            OpCode::SetLocal,
            OpCode::GetStatic,
            OpCode::GetLocal,
            OpCode::PushZero,
            OpCode::CallMethodGeneric,
            OpCode::Pop,
        ]);
        assert!(constants.constants().contains(&Constant::GenericMethod {
            method: f.known.set_styled_value.method_hash,
            type_args: vec![f.known.int],
        }));
    }

    #[test]
    fn args_plain_passes_value_at_default_priority() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let value = LocalValue {
            slot: 5,
            ty: f.known.int,
            span: Span::default(),
        };
        variant(&f, &f.direct, SetterKind::Plain)
            .emit_args(&mut ctx, &[&value])
            .unwrap();

        let chunk = emitter.finish();
        chunk.assert_opcodes(&[
            OpCode::GetStatic,
            OpCode::GetLocal,
            OpCode::PushZero,
            OpCode::CallMethodGeneric,
            OpCode::Pop,
        ]);
        assert_eq!(chunk.read_byte(4), Some(5));
    }

    #[test]
    fn args_plain_with_priority_emits_value_then_priority() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let priority = LocalValue {
            slot: 7,
            ty: f.known.binding_priority,
            span: Span::point(1, 1),
        };
        let value = LocalValue {
            slot: 8,
            ty: f.known.bool,
            span: Span::point(1, 5),
        };
        variant(&f, &f.styled, SetterKind::PlainWithPriority)
            .emit_args(&mut ctx, &[&priority, &value])
            .unwrap();

        assert_eq!(emitter.locals().high_water(), 0);
        let chunk = emitter.finish();
        chunk.assert_opcodes(&[
            OpCode::GetStatic,
            OpCode::GetLocal,
            OpCode::GetLocal,
            OpCode::CallMethodGeneric,
            OpCode::Pop,
        ]);
        assert_eq!(chunk.read_byte(4), Some(8));
        assert_eq!(chunk.read_byte(6), Some(7));
    }

    #[test]
    fn args_binding_pushes_null_anchor() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let priority = LocalValue {
            slot: 0,
            ty: f.known.binding_priority,
            span: Span::default(),
        };
        variant(&f, &f.styled, SetterKind::BindingWithPriority)
            .emit_args(&mut ctx, &[&priority, &NullLiteral::default()])
            .unwrap();

        emitter.finish().assert_opcodes(&[
            OpCode::GetStatic,
            OpCode::PushNull,
            OpCode::PushNull,
            OpCode::CallMethod,
            OpCode::Pop,
        ]);
    }

    #[test]
    fn args_unset_ignores_argument() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let sentinel = LocalValue {
            slot: 0,
            ty: f.known.unset_value_type,
            span: Span::default(),
        };
        variant(&f, &f.direct, SetterKind::Unset)
            .emit_args(&mut ctx, &[&sentinel])
            .unwrap();

        emitter.finish().assert_opcodes(&[
            OpCode::GetStatic,
            OpCode::GetStatic,
            OpCode::PushZero,
            OpCode::CallMethod,
            OpCode::Pop,
        ]);
    }

    #[test]
    fn args_unset_rejects_non_sentinel() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        let flag = LocalValue {
            slot: 0,
            ty: f.known.bool,
            span: Span::point(4, 9),
        };
        let err = variant(&f, &f.styled, SetterKind::Unset)
            .emit_args(&mut ctx, &[&flag])
            .unwrap_err();

        assert!(matches!(err, CompilationError::TypeMismatch { span, .. } if span == Span::point(4, 9)));
        assert_eq!(emitter.code_size(), 0);
    }

    #[test]
    fn args_count_and_type_are_checked() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);
        let setter = variant(&f, &f.styled, SetterKind::PlainWithPriority);

        let err = setter.emit_args(&mut ctx, &[]).unwrap_err();
        assert!(matches!(
            err,
            CompilationError::ArgumentCountMismatch { expected: 2, got: 0, .. }
        ));

        let wrong = LocalValue {
            slot: 0,
            ty: f.known.string,
            span: Span::point(2, 2),
        };
        let err = setter.emit_args(&mut ctx, &[&wrong, &wrong]).unwrap_err();
        assert!(matches!(err, CompilationError::TypeMismatch { span, .. } if span == Span::point(2, 2)));
    }

    #[test]
    fn property_field_lookup() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        assert_eq!(emit_property_field(&mut ctx, f.button, "IsDefault"), Ok(true));
        assert_eq!(emit_property_field(&mut ctx, f.button, "Content"), Ok(false));
        emitter.finish().assert_opcodes(&[OpCode::GetStatic]);
    }

    #[test]
    fn provide_value_target_falls_back_to_reflection() {
        let f = fixture();
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let mut ctx = EmitContext::new(&f.registry, &f.known, &mut emitter);

        assert_eq!(emit_provide_value_target(&mut ctx, f.button, "IsDefault"), Ok(true));
        assert_eq!(emit_provide_value_target(&mut ctx, f.button, "Content"), Ok(true));
        assert_eq!(emit_provide_value_target(&mut ctx, f.button, "Missing"), Ok(false));
        emitter
            .finish()
            .assert_opcodes(&[OpCode::GetStatic, OpCode::Constant]);

        let content = f.registry.find_property(f.button, "Content").unwrap();
        assert!(constants
            .constants()
            .contains(&Constant::PropertyInfo(content.property_hash)));
    }
}
