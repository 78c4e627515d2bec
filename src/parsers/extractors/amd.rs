use super::{single_string_argument, ExtractOptions};
use crate::models::dependency::{ModuleSystem, RawDependency};
use oxc_ast::ast::{Argument, ArrayExpressionElement, CallExpression, Expression, Program};
use oxc_ast_visit::{walk, Visit};

/// AMD pseudo-dependencies that never point at a file
const MAGIC_DEPENDENCIES: [&str; 3] = ["require", "exports", "module"];

/// `define([...], factory)`, `require([...], callback)` and the simplified
/// CommonJS wrapper (`require("x")` inside a `define` factory)
pub(super) fn extract(program: &Program<'_>, _options: &ExtractOptions, out: &mut Vec<RawDependency>) {
    let mut collector = AmdCollector { out, define_depth: 0 };
    collector.visit_program(program);
}

struct AmdCollector<'o> {
    out: &'o mut Vec<RawDependency>,
    define_depth: usize,
}

impl AmdCollector<'_> {
    fn push_array_dependencies(&mut self, arguments: &[Argument<'_>]) {
        for argument in arguments {
            let Argument::ArrayExpression(array) = argument else {
                continue;
            };
            for element in &array.elements {
                if let ArrayExpressionElement::StringLiteral(literal) = element {
                    let module_name = literal.value.as_str();
                    if !module_name.is_empty() && !MAGIC_DEPENDENCIES.contains(&module_name) {
                        self.out.push(RawDependency::new(module_name, ModuleSystem::Amd));
                    }
                }
            }
        }
    }
}

impl<'a> Visit<'a> for AmdCollector<'_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        let callee = match &call.callee {
            Expression::Identifier(ident) => Some(ident.name.as_str()),
            _ => None,
        };

        match callee {
            Some("define") => {
                self.push_array_dependencies(&call.arguments);
                self.define_depth += 1;
                walk::walk_call_expression(self, call);
                self.define_depth -= 1;
            }
            Some("require") => {
                self.push_array_dependencies(&call.arguments);
                if self.define_depth > 0 {
                    if let Some(module_name) = single_string_argument(&call.arguments) {
                        self.out.push(RawDependency::new(module_name, ModuleSystem::Amd));
                    }
                }
                walk::walk_call_expression(self, call);
            }
            _ => walk::walk_call_expression(self, call),
        }
    }
}
