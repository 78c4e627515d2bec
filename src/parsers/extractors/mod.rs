//! Per-dialect dependency extractors
//!
//! Each extractor is a single pre-order pass over a parsed program that
//! appends the dependency declarations of one module system, in source order,
//! to a shared output list. Extractors only ever append; they never look at or
//! touch entries another extractor produced.

mod amd;
mod cjs;
mod es6;
mod exotic;
mod ts_type;

use crate::error::{CruiseError, Result};
use crate::models::dependency::{ModuleSystem, RawDependency};
use oxc_ast::ast::{Argument, Expression, Program, TemplateLiteral};

/// Knobs the extractors read
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Dotted callee names to treat like `require`
    pub exotic_require_strings: Vec<String>,
}

impl ExtractOptions {
    pub fn with_exotic_require_strings(strings: Vec<String>) -> Self {
        Self {
            exotic_require_strings: strings,
        }
    }
}

/// Signature every extractor implements
pub type ExtractorFn = for<'a> fn(&Program<'a>, &ExtractOptions, &mut Vec<RawDependency>);

static EXTRACTORS: [(ModuleSystem, ExtractorFn); 5] = [
    (ModuleSystem::Es6, es6::extract),
    (ModuleSystem::Cjs, cjs::extract),
    (ModuleSystem::Amd, amd::extract),
    (ModuleSystem::TsType, ts_type::extract),
    (ModuleSystem::ExoticRequire, exotic::extract),
];

/// Look up the extractor registered for a module system
pub fn extractor_for(system: ModuleSystem) -> Result<ExtractorFn> {
    EXTRACTORS
        .iter()
        .find(|(registered, _)| *registered == system)
        .map(|(_, extractor)| *extractor)
        .ok_or_else(|| CruiseError::unknown_module_system(system.as_str()))
}

/// Run one extractor over `program`, appending to `out`
pub fn extract(
    system: ModuleSystem,
    program: &Program<'_>,
    options: &ExtractOptions,
    out: &mut Vec<RawDependency>,
) -> Result<()> {
    let extractor = extractor_for(system)?;
    extractor(program, options, out);
    Ok(())
}

/// Run several extractors in order, collecting everything they find
pub fn extract_all(
    systems: &[ModuleSystem],
    program: &Program<'_>,
    options: &ExtractOptions,
) -> Result<Vec<RawDependency>> {
    let mut out = Vec::new();
    for &system in systems {
        extract(system, program, options, &mut out)?;
    }
    Ok(out)
}

/// The string value of a call argument, if it is a literal without substitutions
pub(crate) fn argument_string<'s>(argument: &'s Argument<'_>) -> Option<&'s str> {
    match argument {
        Argument::StringLiteral(literal) => Some(literal.value.as_str()),
        Argument::TemplateLiteral(template) => template_string(template),
        _ => None,
    }
}

/// The string value of an expression, if it is a literal without substitutions
pub(crate) fn expression_string<'s>(expression: &'s Expression<'_>) -> Option<&'s str> {
    match expression {
        Expression::StringLiteral(literal) => Some(literal.value.as_str()),
        Expression::TemplateLiteral(template) => template_string(template),
        _ => None,
    }
}

fn template_string<'s>(template: &'s TemplateLiteral<'_>) -> Option<&'s str> {
    if !template.expressions.is_empty() || template.quasis.len() != 1 {
        return None;
    }
    template.quasis[0].value.cooked.as_ref().map(|cooked| cooked.as_str())
}

/// `require`, `window.require`, `a.b.c` for identifier/static-member chains
pub(crate) fn callee_name(callee: &Expression<'_>) -> Option<String> {
    match callee {
        Expression::Identifier(ident) => Some(ident.name.to_string()),
        Expression::StaticMemberExpression(member) => {
            callee_name(&member.object).map(|object| format!("{}.{}", object, member.property.name))
        }
        _ => None,
    }
}

/// `name("x")`: exactly one string argument
pub(crate) fn single_string_argument<'s>(arguments: &'s [Argument<'_>]) -> Option<&'s str> {
    match arguments {
        [only] => argument_string(only).filter(|name| !name.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
