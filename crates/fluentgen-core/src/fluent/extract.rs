// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Field selection.

use tracing::{debug, instrument, warn};

use super::UnsupportedTypePolicy;
use super::error::{GenerateError, Result};
use super::model::{CandidateType, EligibleField, ExtractedType, SkippedField, TypeSignature};

/// Reduces a candidate to the fields that get setters.
///
/// Embedded and unexported fields are dropped. Fields with an unsupported
/// type are dropped under [`UnsupportedTypePolicy::Skip`] (and listed in
/// [`ExtractedType::skipped`]) or fail the candidate under
/// [`UnsupportedTypePolicy::Reject`].
///
/// # Errors
///
/// Returns [`GenerateError::UnsupportedFieldType`] for the first
/// unsupported field under `Reject`.
#[instrument(level = "debug", skip_all, fields(type_name = %candidate.name.name))]
pub fn extract(candidate: &CandidateType, policy: UnsupportedTypePolicy) -> Result<ExtractedType> {
    let type_name = &candidate.name.name;
    let mut fields = Vec::new();
    let mut skipped = Vec::new();

    for field in &candidate.fields {
        if field.is_embedded {
            debug!(field = %field.identifier, "skipping embedded field");
            continue;
        }
        if !field.is_exported {
            debug!(field = %field.identifier, "skipping unexported field");
            continue;
        }
        let signature = match &field.type_signature {
            TypeSignature::Rendered(text) => text.clone(),
            TypeSignature::Unsupported { shape, text } => {
                let unsupported = SkippedField {
                    path: candidate.path.clone(),
                    type_name: type_name.clone(),
                    field: field.identifier.clone(),
                    shape: *shape,
                    text: text.clone(),
                    span: field.span,
                };
                match policy {
                    UnsupportedTypePolicy::Reject => {
                        return Err(GenerateError::UnsupportedFieldType {
                            path: unsupported.path,
                            type_name: unsupported.type_name,
                            field: unsupported.field,
                            shape: unsupported.shape,
                            text: unsupported.text,
                            span: unsupported.span,
                        });
                    }
                    UnsupportedTypePolicy::Skip => {
                        warn!(
                            field = %field.identifier,
                            ty = %text,
                            %shape,
                            "skipping field with unsupported type"
                        );
                        skipped.push(unsupported);
                        continue;
                    }
                }
            }
        };
        let doc = field
            .doc_comment
            .as_deref()
            .map(str::trim)
            .filter(|doc| !doc.is_empty())
            .map(str::to_string);
        fields.push(EligibleField {
            name: field.identifier.clone(),
            signature,
            doc,
        });
    }

    Ok(ExtractedType {
        name: type_name.clone(),
        fields,
        skipped,
    })
}
