//! Deep merge of settings documents with array-replace semantics

use crate::contract::Document;

/// Merge `incoming` into `target` in place.
///
/// Objects are merged key by key, recursing where both sides hold an object.
/// Every other value (scalars, `null`, arrays, or a kind mismatch) from
/// `incoming` overwrites the target value wholesale. Arrays are never
/// concatenated or merged element-wise.
pub fn merge_documents(target: &mut Document, incoming: Document) {
    match (target, incoming) {
        (Document::Object(existing), Document::Object(patch)) => {
            for (key, value) in patch {
                match existing.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => {
                        merge_documents(slot, value);
                    }
                    _ => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
