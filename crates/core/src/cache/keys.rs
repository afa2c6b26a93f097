use crate::draft::DraftId;

/// Returns the cache key for a single draft.
///
/// ```
/// use draftroom_core::cache::draft_key;
/// use draftroom_core::draft::DraftId;
///
/// assert_eq!(draft_key(DraftId(7)), "draft:7");
/// ```
pub fn draft_key(draft_id: DraftId) -> String {
    format!("draft:{}", draft_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key_format() {
        assert_eq!(draft_key(DraftId(42)), "draft:42");
    }

    #[test]
    fn test_draft_keys_are_distinct_per_id() {
        assert_ne!(draft_key(DraftId(1)), draft_key(DraftId(11)));
    }
}
