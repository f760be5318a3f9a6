//! Value-type recovery for typed property containers.

use markup_core::{CompilationError, Span, TypeHash, TypeSystem, base_chain};

/// Walk `storage_type` and its bases up to the first instance of `family` and
/// return that instance's first generic argument.
///
/// `field` names the descriptor field in the error raised when the chain ends
/// without reaching the family.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn extract_value_type(
    types: &dyn TypeSystem,
    storage_type: TypeHash,
    family: TypeHash,
    field: &str,
    span: Span,
) -> Result<TypeHash, CompilationError> {
    base_chain(types, storage_type)
        .find(|&ty| types.generic_definition(ty) == Some(family))
        .and_then(|ty| types.generic_arguments(ty).first().copied())
        .ok_or_else(|| CompilationError::NotATypedProperty {
            field: field.to_string(),
            field_type: types.type_name(storage_type),
            family: types.type_name(family),
            span,
        })
}
