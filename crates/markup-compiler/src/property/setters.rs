//! Setter variants of field-backed properties.
//!
//! A field-backed property replaces its declared setters with a list of
//! calling conventions into the runtime property store. The list is ordered:
//! selection takes the first variant whose parameters accept the arguments.
//!
//! | property                       | variants                                                  |
//! |--------------------------------|-----------------------------------------------------------|
//! | styled/attached                | Binding, BindingWithPriority, PlainWithPriority, Unset    |
//! | styled/attached, assign-binding| PlainWithPriority, Unset                                  |
//! | direct                         | Binding, Unset, Plain                                     |
//! | direct, assign-binding         | Unset, Plain                                              |

use std::fmt;
use std::rc::Rc;

use markup_core::{TypeHash, TypeSystem};
use tracing::trace;

use super::descriptor::FieldBackedProperty;
use crate::known_types::WellKnownTypes;

/// Calling convention of a setter variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetterKind {
    /// `(value)` on a direct property.
    Plain,
    /// `(priority, value)`.
    PlainWithPriority,
    /// `(binding)`.
    Binding,
    /// `(priority, binding)`; the priority is dropped.
    BindingWithPriority,
    /// `(unset)`.
    Unset,
}

impl SetterKind {
    /// Whether the first parameter is a priority.
    pub fn has_priority(&self) -> bool {
        matches!(self, SetterKind::PlainWithPriority | SetterKind::BindingWithPriority)
    }

    /// Debug name.
    pub fn name(&self) -> &'static str {
        match self {
            SetterKind::Plain => "plain",
            SetterKind::PlainWithPriority => "plain-with-priority",
            SetterKind::Binding => "binding",
            SetterKind::BindingWithPriority => "binding-with-priority",
            SetterKind::Unset => "unset",
        }
    }
}

impl fmt::Display for SetterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Null handling of a variant's value parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinderParameters {
    /// A null literal may be passed in markup.
    pub allow_x_null: bool,
    /// A null value may reach the runtime call.
    pub allow_runtime_null: bool,
}

/// Static type of an argument at an assignment site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    /// The `null` literal.
    Null,
    /// A value of the given type.
    Value(TypeHash),
}

/// One way of assigning to a field-backed property.
///
/// Two variants are equal when they have the same kind and the same backing
/// field.
#[derive(Debug, Clone)]
pub struct SetterVariant {
    pub kind: SetterKind,
    /// Position in the variant list; 0 is tried first.
    pub priority_rank: usize,
    pub parameters: Vec<TypeHash>,
    /// Type declaring the property.
    pub target_type: TypeHash,
    pub binder: BinderParameters,
    pub property: Rc<FieldBackedProperty>,
}

impl SetterVariant {
    fn new(
        kind: SetterKind,
        property: &Rc<FieldBackedProperty>,
        known: &WellKnownTypes,
        types: &dyn TypeSystem,
    ) -> Self {
        let value = property.value_type;
        let parameters = match kind {
            SetterKind::Plain => vec![value],
            SetterKind::PlainWithPriority => vec![known.binding_priority, value],
            SetterKind::Binding => vec![known.binding],
            SetterKind::BindingWithPriority => vec![known.binding_priority, known.binding],
            SetterKind::Unset => vec![known.unset_value_type],
        };
        let nullable = matches!(kind, SetterKind::Plain | SetterKind::PlainWithPriority)
            && types.accepts_null(value);

        Self {
            kind,
            priority_rank: 0,
            parameters,
            target_type: property.declaring_type,
            binder: BinderParameters {
                allow_x_null: nullable,
                allow_runtime_null: nullable,
            },
            property: Rc::clone(property),
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Whether every parameter accepts the corresponding argument.
    pub fn accepts(&self, args: &[ArgumentType], types: &dyn TypeSystem) -> bool {
        self.arity() == args.len()
            && self.parameters.iter().zip(args).all(|(&param, arg)| match arg {
                ArgumentType::Null => self.binder.allow_x_null,
                ArgumentType::Value(ty) => types.is_assignable(*ty, param),
            })
    }
}

impl PartialEq for SetterVariant {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.property.field.field_hash == other.property.field.field_hash
    }
}

impl Eq for SetterVariant {}

/// Build the ordered variant list of a field-backed property.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn build_setters(
    property: &Rc<FieldBackedProperty>,
    known: &WellKnownTypes,
    types: &dyn TypeSystem,
) -> Vec<SetterVariant> {
    let variant = |kind| SetterVariant::new(kind, property, known, types);
    let prioritized = property.supports_priority();

    let mut variants = vec![variant(SetterKind::Unset)];
    if prioritized {
        variants.insert(0, variant(SetterKind::PlainWithPriority));
    }
    if property.allows_binding_override {
        variants.insert(0, variant(SetterKind::Binding));
        if prioritized {
            variants.insert(1, variant(SetterKind::BindingWithPriority));
        }
    }
    if !prioritized {
        variants.push(variant(SetterKind::Plain));
    }

    for (rank, v) in variants.iter_mut().enumerate() {
        v.priority_rank = rank;
        trace!(property = %property.name, rank, kind = %v.kind, "setter variant");
    }
    variants
}

/// First variant accepting `args`.
pub fn select_setter<'v>(
    variants: &'v [SetterVariant],
    args: &[ArgumentType],
    types: &dyn TypeSystem,
) -> Option<&'v SetterVariant> {
    variants.iter().find(|v| v.accepts(args, types))
}
