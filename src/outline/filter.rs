use super::HeadingRecord;

/// Headings whose text contains `query` literally, ignoring case, in
/// document order. Only an empty query keeps everything.
pub fn filter_headings(headings: &[HeadingRecord], query: &str) -> Vec<HeadingRecord> {
    if query.is_empty() {
        return headings.to_vec();
    }
    let needle = query.to_lowercase();
    headings
        .iter()
        .filter(|h| h.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;

    fn list(texts: &[&str]) -> Vec<HeadingRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| HeadingRecord {
                identifier: format!("h{i}"),
                text: t.to_string(),
                level: 1,
                number: (i + 1).to_string(),
                node: NodeId(i as u64 + 1),
            })
            .collect()
    }

    #[test]
    fn substring_match_preserves_order() {
        let headings = list(&["Introduction", "Background", "Introspection Tools"]);
        let hits = filter_headings(&headings, "intro");
        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Introduction", "Introspection Tools"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let headings = list(&["A", "B"]);
        assert_eq!(filter_headings(&headings, ""), headings);
    }

    #[test]
    fn whitespace_in_query_is_matched_literally() {
        let headings = list(&["Introspection Tools", "Tools"]);
        assert!(filter_headings(&headings, "   ").is_empty());
        assert!(filter_headings(&headings, "tools ").is_empty());
        let hits = filter_headings(&headings, " tools");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Introspection Tools");
    }

    #[test]
    fn query_case_is_ignored() {
        let headings = list(&["API Reference"]);
        assert_eq!(filter_headings(&headings, "REFER").len(), 1);
        assert!(filter_headings(&headings, "missing").is_empty());
    }
}
