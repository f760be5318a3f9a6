//! Class-selector pseudo-properties (`Classes.active`).

use markup_core::CompilationError;
use tracing::trace;

use super::descriptor::ClassSelector;
use super::emit::arg_count;
use crate::context::EmitContext;

impl ClassSelector {
    /// Push the `Property<bool>` tracking membership in the class.
    pub fn emit(&self, ctx: &mut EmitContext<'_, '_>) -> Result<(), CompilationError> {
        let has_class = &ctx.known().has_class;
        trace!(class = %self.class_name, "emit class selector");
        let emitter = ctx.emitter();
        emitter.emit_string(&self.class_name)?;
        emitter.emit_call(has_class.method_hash, arg_count(has_class)?)
    }
}
