use crate::{ast::ast::Program, errors::diagnostics::SemanticError};

use super::{
    definitions::{collect_global_definitions, GlobalDefinitions, OBJECT},
    hierarchy::{build_hierarchy, check_tree, Hierarchy},
    propagation::propagate_parameters,
    visitor::check_references,
};

pub const SUCCESS_MESSAGE: &str = "SUCCESS PERFORMING SEMANTIC CHECKING!!!";
pub const FAILURE_HEADER: &str = "SEMANTIC CHECK FOUND THE FOLLOWING ERRORS:";

/// Outcome of a semantic check: the tables it built and every diagnostic found.
#[derive(Debug)]
pub struct SemanticReport {
    pub definitions: GlobalDefinitions,
    pub hierarchy: Hierarchy,
    pub diagnostics: Vec<SemanticError>,
}

impl SemanticReport {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Kind names of the diagnostics, in report order.
    pub fn diagnostic_names(&self) -> Vec<&str> {
        self.diagnostics.iter().map(SemanticError::get_error_name).collect()
    }

    pub fn render(&self) -> String {
        if self.is_success() {
            return SUCCESS_MESSAGE.to_string();
        }

        let mut output = String::from(FAILURE_HEADER);
        for diagnostic in &self.diagnostics {
            output.push('\n');
            output.push_str(&diagnostic.to_string());
        }
        output
    }
}

/// Runs every semantic stage over `program`, accumulating diagnostics.
///
/// Type parameters in `program` are rewritten in place to include the
/// inherited ones.
#[tracing::instrument(level = "debug", skip_all)]
pub fn semantic_check(program: &mut Program) -> SemanticReport {
    let (definitions, mut diagnostics) = collect_global_definitions(program);

    let (hierarchy, errors) = build_hierarchy(program, &definitions);
    diagnostics.extend(errors);

    let (errors, visited) = check_tree(&hierarchy, OBJECT);
    diagnostics.extend(errors);
    tracing::debug!(visited, "validated type hierarchy");

    propagate_parameters(&hierarchy, &definitions, program);

    diagnostics.extend(check_references(program, &definitions, &hierarchy));

    if diagnostics.is_empty() {
        tracing::info!("semantic check succeeded");
    } else {
        tracing::info!(count = diagnostics.len(), "semantic check found errors");
    }

    SemanticReport {
        definitions,
        hierarchy,
        diagnostics,
    }
}
