//! Attribute candidates derived from the chosen devices or templates

use std::collections::HashMap;
use widget_wizard_shared::{
    AttributeCandidate, AttributeId, AttributeOwner, Device, Template, ValueType,
};

/// Flatten the attributes of the chosen owners into selectable rows.
///
/// Templates take precedence over devices when any are chosen. Rows are
/// ordered by device label, then attribute label; see [`sort_candidates`].
pub fn derive_candidates(devices: &[Device], templates: &[Template]) -> Vec<AttributeCandidate> {
    let mut candidates = if templates.is_empty() {
        flatten(devices)
    } else {
        flatten(templates)
    };
    sort_candidates(&mut candidates);
    candidates
}

fn flatten<O: AttributeOwner>(owners: &[O]) -> Vec<AttributeCandidate> {
    owners
        .iter()
        .flat_map(|owner| {
            owner.attrs().iter().map(move |attr| AttributeCandidate {
                device_id: owner.id().to_string(),
                device_label: owner.label().to_string(),
                attribute_id: AttributeId::compose(owner.id(), &attr.label),
                attribute_label: attr.label.clone(),
                value_type: attr.value_type,
                is_dynamic: attr.is_dynamic,
            })
        })
        .collect()
}

/// Stable sort by device label, then attribute label within each device.
///
/// Devices sharing a label keep their input order and their rows stay
/// together.
pub fn sort_candidates(candidates: &mut [AttributeCandidate]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (index, candidate) in candidates.iter().enumerate() {
        first_seen.entry(candidate.device_id.clone()).or_insert(index);
    }

    candidates.sort_by(|a, b| {
        a.device_label
            .cmp(&b.device_label)
            .then_with(|| first_seen[&a.device_id].cmp(&first_seen[&b.device_id]))
            .then_with(|| a.attribute_label.cmp(&b.attribute_label))
    });
}

/// Whether `candidate` matches an already lowercased search term
pub fn matches_term(candidate: &AttributeCandidate, term: &str) -> bool {
    term.is_empty()
        || candidate.device_label.to_lowercase().contains(term)
        || candidate.attribute_label.to_lowercase().contains(term)
}

/// Case-insensitive substring search over device and attribute labels
pub fn filter_candidates(candidates: &[AttributeCandidate], term: &str) -> Vec<AttributeCandidate> {
    let term = term.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| matches_term(candidate, &term))
        .cloned()
        .collect()
}

/// A row is selectable when the chart accepts its value type and it is
/// either dynamic or the chart supports static attributes.
pub fn is_selectable(
    candidate: &AttributeCandidate,
    accepted_types: &[ValueType],
    static_supported: bool,
) -> bool {
    accepted_types.contains(&candidate.value_type) && (candidate.is_dynamic || static_supported)
}
