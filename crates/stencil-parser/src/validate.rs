//! Whole-document validation.
//!
//! Runs after deserialization and reports every problem in one pass:
//! - duplicate object ids are errors (`E200`)
//! - instances naming a master the document does not define are warnings
//!   (`E201`)

use std::collections::HashSet;

use indexmap::IndexMap;

use stencil_core::model::{DesignModel, Object, SymbolInstance, SymbolMaster, Visitor};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Find the spans of every `"<key>": "<value>"` occurrence in `source`.
///
/// Spans cover the quoted value. Returned in source order.
fn find_field_spans(source: &str, key: &str, value: &str) -> Vec<Span> {
    let Ok(quoted) = serde_json::to_string(value) else {
        return Vec::new();
    };
    let key = format!("\"{key}\"");

    source
        .match_indices(&quoted)
        .filter(|(offset, _)| {
            let before = source[..*offset].trim_end();
            before
                .strip_suffix(':')
                .is_some_and(|rest| rest.trim_end().ends_with(&key))
        })
        .map(|(offset, text)| Span::new(offset..offset + text.len()))
        .collect()
}

#[derive(Default)]
struct Validator {
    /// Occurrence count per id, in first-seen order.
    ids: IndexMap<String, usize>,
    masters: HashSet<String>,
    /// `(instance id, master id)` in document order.
    instances: Vec<(String, String)>,
}

impl Visitor for Validator {
    fn visit_object(&mut self, object: &Object) {
        *self.ids.entry(object.id.clone()).or_default() += 1;
    }

    fn visit_instance(&mut self, instance: &SymbolInstance) {
        self.instances
            .push((instance.object.id.clone(), instance.master_id.clone()));
    }

    fn visit_master(&mut self, master: &SymbolMaster) {
        self.masters.insert(master.object.id.clone());
    }
}

impl Validator {
    fn report(self, source: &str, collector: &mut DiagnosticCollector) {
        for (id, count) in self.ids.iter().filter(|(_, count)| **count > 1) {
            let spans = find_field_spans(source, "id", id);
            for nth in 1..*count {
                let mut diag = Diagnostic::error(format!("object id `{id}` is used more than once"))
                    .with_code(ErrorCode::E200)
                    .with_help("object ids must be unique before symbol expansion");
                if let (Some(first), Some(dup)) = (spans.first(), spans.get(nth)) {
                    diag = diag
                        .with_label(*dup, "duplicate id")
                        .with_secondary_label(*first, "first used here");
                }
                collector.emit(diag);
            }
        }

        for (instance_id, master_id) in &self.instances {
            if self.masters.contains(master_id) {
                continue;
            }
            let mut diag = Diagnostic::warning(format!(
                "symbol instance `{instance_id}` names unknown master `{master_id}`"
            ))
            .with_code(ErrorCode::E201)
            .with_help("the instance is left unexpanded");
            if let Some(span) = find_field_spans(source, "masterId", master_id).first() {
                diag = diag.with_label(*span, "no master with this id");
            }
            collector.emit(diag);
        }
    }
}

/// Validate a deserialized document against its source text.
pub(crate) fn validate_document(model: &DesignModel, source: &str) -> Result<(), ParseError> {
    let mut validator = Validator::default();
    model.walk(&mut validator);

    let mut collector = DiagnosticCollector::new();
    validator.report(source, &mut collector);
    collector.finish()
}
