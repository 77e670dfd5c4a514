use super::HeadingRecord;

/// Whether a freshly collected list differs structurally from the stored one.
///
/// Only the count and the identifier sequence are compared: a text edit on a
/// heading that keeps its identifier is not a change, and neither is a level
/// change under a stable identifier.
pub fn changed(old: &[HeadingRecord], new: &[HeadingRecord], force: bool) -> bool {
    force
        || old.len() != new.len()
        || old
            .iter()
            .zip(new)
            .any(|(a, b)| a.identifier != b.identifier)
}
