use crate::model::{Hyperlink, LinkDirection, Relation, RelationKind};

/// Index of the first relation of the direction's type whose URL ends in
/// `target_id`. Positions are only valid for the fetch they came from.
pub fn find_hierarchy_link(
    relations: &[Relation],
    target_id: i64,
    direction: LinkDirection,
) -> Option<usize> {
    let rel_type = direction.rel_type();
    relations
        .iter()
        .position(|r| r.rel == rel_type && r.target_id() == Some(target_id))
}

/// Parent ID (if any) and child IDs in relation order.
pub fn hierarchy_ids(relations: &[Relation]) -> (Option<i64>, Vec<i64>) {
    let mut parent = None;
    let mut children = Vec::new();
    for relation in relations {
        match relation.kind() {
            RelationKind::Parent if parent.is_none() => parent = relation.target_id(),
            RelationKind::Child => children.extend(relation.target_id()),
            _ => {}
        }
    }
    (parent, children)
}

fn is_external(relation: &Relation) -> bool {
    matches!(relation.kind(), RelationKind::Hyperlink | RelationKind::Artifact)
}

/// External links carried by hyperlink and artifact relations.
pub fn hyperlinks(relations: &[Relation]) -> Vec<Hyperlink> {
    relations
        .iter()
        .filter(|r| is_external(r))
        .map(|r| Hyperlink {
            url: r.url.clone(),
            name: r.attribute("name").to_string(),
            comment: r.attribute("comment").to_string(),
        })
        .collect()
}

/// Index of the external link (any kind `hyperlinks` lists) with exactly this URL.
pub fn find_hyperlink(relations: &[Relation], url: &str) -> Option<usize> {
    relations
        .iter()
        .position(|r| is_external(r) && r.url == url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{REL_ARTIFACT, REL_CHILD, REL_HYPERLINK, REL_PARENT};

    fn rel(kind: &str, url: &str) -> Relation {
        Relation {
            rel: kind.into(),
            url: url.into(),
            attributes: Default::default(),
        }
    }

    fn item_url(id: i64) -> String {
        format!("https://dev.azure.com/o/p/_apis/wit/workItems/{id}")
    }

    #[test]
    fn matches_whole_trailing_segment_only() {
        let relations = vec![
            rel(REL_CHILD, &item_url(123)),
            rel(REL_CHILD, &item_url(12)),
        ];
        assert_eq!(
            find_hierarchy_link(&relations, 12, LinkDirection::Child),
            Some(1)
        );
        assert_eq!(
            find_hierarchy_link(&relations, 12, LinkDirection::Parent),
            None
        );
    }

    #[test]
    fn splits_parent_and_children() {
        let relations = vec![
            rel(REL_HYPERLINK, "https://example.com"),
            rel(REL_CHILD, &item_url(3)),
            rel(REL_PARENT, &item_url(1)),
            rel(REL_CHILD, &item_url(4)),
            rel(REL_CHILD, "https://x/workItems/not-a-number"),
        ];
        assert_eq!(hierarchy_ids(&relations), (Some(1), vec![3, 4]));
    }

    #[test]
    fn hyperlinks_read_attributes() {
        let mut link = rel(REL_HYPERLINK, "https://example.com/spec");
        link.attributes
            .insert("comment".into(), serde_json::json!("design doc"));
        let relations = vec![rel(REL_PARENT, &item_url(1)), link];

        let links = hyperlinks(&relations);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].comment, "design doc");
        assert_eq!(links[0].name, "");
        assert_eq!(find_hyperlink(&relations, "https://example.com/spec"), Some(1));
        assert_eq!(find_hyperlink(&relations, "https://example.com/spec/"), None);
    }

    #[test]
    fn artifact_links_are_listed_and_found() {
        let relations = vec![
            rel(REL_CHILD, &item_url(3)),
            rel(REL_ARTIFACT, "vstfs:///Git/Commit/abc"),
        ];
        assert_eq!(hyperlinks(&relations)[0].url, "vstfs:///Git/Commit/abc");
        assert_eq!(find_hyperlink(&relations, "vstfs:///Git/Commit/abc"), Some(1));
        assert_eq!(find_hyperlink(&relations, &item_url(3)), None);
    }
}
