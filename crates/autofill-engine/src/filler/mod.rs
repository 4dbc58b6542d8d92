//! Value injection.
//!
//! [`FieldFiller::set_field_value`] applies one profile value to one
//! classified control and synthesizes the events a page framework listens
//! to. It never fails: every problem degrades to `false` for that control.
//!
//! Per control kind:
//! - text: four write strategies tried in order, then focus/input/change
//! - date: direct value write plus focus/input/change/blur
//! - native select and `role=listbox`: option matching on normalized text
//! - radios: label resolution and semantic equivalence
//! - checkboxes: truthy tokens, or the multi-value exam matcher for lists

mod checkbox;
mod date;
mod listbox;
mod radio;
mod select;
mod text;

use autofill_config::FillerConfig;
use autofill_dom::{Document, EventKind, NodeId};
use tracing::debug;

use crate::control::{Control, ControlKind};
use crate::dictionary::canonical_gender;
use crate::normalize::normalize_option;
use crate::profile::{Profile, ProfileValue};

pub use text::TextStrategy;

/// Equivalent answer spellings, compared after [`normalize_option`].
const SEMANTIC_GROUPS: &[&[&str]] = &[
    &["femme", "feminin", "female", "madame", "mme"],
    &["homme", "masculin", "male", "monsieur", "mr"],
    &[
        "cni",
        "carte nationale d'identite",
        "carte d'identite",
        "carte nationale d'identite (cni)",
        "identity card",
    ],
    &["passeport", "passport"],
    &["francais", "french", "langue francaise"],
    &["anglais", "english", "langue anglaise"],
    &["aucun handicap", "pas de handicap", "aucun", "non", "no"],
    &["en situation de handicap", "handicap", "oui, en situation de handicap"],
];

/// Data-value / label pairs used by dropdowns that store a short token.
const CROSS_EQUIVALENTS: &[(&str, &str)] = &[
    ("femme", "feminin"),
    ("homme", "masculin"),
    ("f", "femme"),
    ("m", "homme"),
    ("f", "feminin"),
    ("m", "masculin"),
];

/// Applies values to controls.
#[derive(Debug, Clone)]
pub struct FieldFiller {
    truthy_tokens: Vec<String>,
    placeholder_options: Vec<String>,
}

impl Default for FieldFiller {
    fn default() -> Self {
        Self::new(&FillerConfig::default())
    }
}

impl FieldFiller {
    pub fn new(config: &FillerConfig) -> Self {
        Self {
            truthy_tokens: config
                .truthy_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            placeholder_options: config
                .placeholder_options
                .iter()
                .map(|p| normalize_option(p))
                .collect(),
        }
    }

    /// Apply `value` to `control`; `true` when a value was plausibly applied.
    ///
    /// `profile` is the enriched profile, consulted by the multi-value
    /// checkbox matcher for the representation the page expects.
    pub fn set_field_value(
        &self,
        doc: &mut Document,
        control: &Control,
        value: &ProfileValue,
        profile: &Profile,
    ) -> bool {
        let text = value.to_string();
        let filled = match control.kind {
            ControlKind::Text => self.fill_text(doc, control.node, &text),
            ControlKind::Date => self.fill_date(doc, control.node, &text),
            ControlKind::Select => self.fill_native_select(doc, control.node, &text),
            ControlKind::CustomSelect => self.fill_listbox(doc, control.node, &text),
            ControlKind::Radio | ControlKind::CustomRadio => self.fill_radio(doc, control, &text),
            ControlKind::Checkbox | ControlKind::CustomCheckbox => match value {
                ProfileValue::List(values) => self.fill_checkbox_list(doc, control, values, profile),
                _ => self.fill_checkbox(doc, control, &text),
            },
            ControlKind::FileUpload => false,
        };
        debug!(node = %control.node, kind = ?control.kind, filled, "set field value");
        filled
    }

    pub(crate) fn is_placeholder(&self, text: &str) -> bool {
        let normalized = normalize_option(text);
        let bare = normalized.trim_end_matches(|c: char| !c.is_alphanumeric());
        bare.is_empty() || self.placeholder_options.iter().any(|p| p == bare)
    }
}

/// Dispatch `kinds` in order; failures are logged and skipped.
pub(crate) fn fire(doc: &mut Document, node: NodeId, kinds: &[EventKind]) -> bool {
    let mut clean = true;
    for kind in kinds {
        if let Err(e) = doc.dispatch_event(node, *kind) {
            debug!(%node, %kind, error = %e, "event dispatch failed");
            clean = false;
        }
    }
    clean
}

/// Equality, or containment either way when the contained side has at
/// least two characters.
pub(crate) fn related(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    short.chars().count() >= 2 && long.contains(short)
}

/// Whether two normalized answers belong to the same semantic group.
pub(crate) fn semantically_equal(a: &str, b: &str) -> bool {
    if let (Some(x), Some(y)) = (canonical_gender(a), canonical_gender(b)) {
        return x == y;
    }
    SEMANTIC_GROUPS
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b))
}

pub(crate) fn cross_equivalent(data_value: &str, target: &str) -> bool {
    CROSS_EQUIVALENTS
        .iter()
        .any(|(d, t)| (*d == data_value && *t == target) || (*t == data_value && *d == target))
}

/// Compare an option label with a wanted answer.
///
/// Tries raw lowercase comparison, then diacritic-free comparison, then the
/// semantic groups.
pub(crate) fn answer_matches(label: &str, target: &str) -> bool {
    let label_lower = label.trim().to_lowercase();
    let target_lower = target.trim().to_lowercase();
    if related(&label_lower, &target_lower) {
        return true;
    }
    let label_norm = normalize_option(label);
    let target_norm = normalize_option(target);
    related(&label_norm, &target_norm) || semantically_equal(&label_norm, &target_norm)
}

/// Nearest ancestor of `node` holding at least two nodes accepted by
/// `member`, or the parent when there is none.
pub(crate) fn enclosing_group<F>(doc: &Document, node: NodeId, member: F) -> Option<NodeId>
where
    F: Fn(&Document, NodeId) -> bool,
{
    let ancestors = doc.ancestors(node);
    ancestors
        .iter()
        .copied()
        .find(|a| {
            doc.descendants(*a)
                .into_iter()
                .filter(|n| member(doc, *n))
                .take(2)
                .count()
                >= 2
        })
        .or_else(|| ancestors.first().copied())
}

fn is_choice_control(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag_name(node), "input" | "select" | "textarea")
        || matches!(
            doc.attribute(node, "role"),
            Some("radio" | "checkbox" | "option")
        )
}

/// Visible label of a choice control.
///
/// Resolution order: the text inside a custom control, adjacent visible
/// text up to the next control, `aria-label`, `data-value`, the parent's
/// text without the control's own text, then `<label for>`.
pub(crate) fn choice_label(doc: &Document, node: NodeId) -> String {
    if doc.tag_name(node) != "input" {
        let own = doc.text_content(node);
        if !own.trim().is_empty() {
            return own.trim().to_string();
        }
    }

    for sibling in doc.next_siblings(node) {
        if is_choice_control(doc, sibling) {
            break;
        }
        if doc.is_element(sibling) && !doc.is_visible(sibling) {
            continue;
        }
        let text = doc.text_content(sibling);
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }

    for attribute in ["aria-label", "data-value"] {
        if let Some(text) = doc.attribute(node, attribute) {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
    }

    if let Some(parent) = doc.parent(node) {
        let own = doc.text_content(node);
        let parent_text = doc.text_content(parent);
        let remaining = if own.is_empty() {
            parent_text
        } else {
            parent_text.replacen(&own, "", 1)
        };
        if !remaining.trim().is_empty() {
            return remaining.trim().to_string();
        }
    }

    if let Some(id) = doc.attribute(node, "id") {
        let root = doc.root();
        if let Some(label) = doc
            .descendants(root)
            .into_iter()
            .find(|n| doc.tag_name(*n) == "label" && doc.attribute(*n, "for") == Some(id))
        {
            return doc.text_content(label).trim().to_string();
        }
    }

    String::new()
}

#[cfg(test)]
#[path = "filler_tests.rs"]
mod tests;
