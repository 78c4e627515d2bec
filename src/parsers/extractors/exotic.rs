use super::{argument_string, callee_name, ExtractOptions};
use crate::models::dependency::{ModuleSystem, RawDependency};
use oxc_ast::ast::{CallExpression, Program};
use oxc_ast_visit::{walk, Visit};

/// Calls to configured require look-alikes such as `want("x")` or
/// `window.require("x")`
pub(super) fn extract(program: &Program<'_>, options: &ExtractOptions, out: &mut Vec<RawDependency>) {
    if options.exotic_require_strings.is_empty() {
        return;
    }
    let mut collector = ExoticRequireCollector {
        names: &options.exotic_require_strings,
        out,
    };
    collector.visit_program(program);
}

struct ExoticRequireCollector<'o> {
    names: &'o [String],
    out: &'o mut Vec<RawDependency>,
}

impl<'a> Visit<'a> for ExoticRequireCollector<'_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Some(name) = callee_name(&call.callee) {
            if self.names.iter().any(|exotic| *exotic == name) {
                let module_name = call.arguments.first().and_then(argument_string);
                if let Some(module_name) = module_name.filter(|m| !m.is_empty()) {
                    self.out.push(
                        RawDependency::new(module_name, ModuleSystem::ExoticRequire).with_exotic_require(name),
                    );
                }
            }
        }
        walk::walk_call_expression(self, call);
    }
}
