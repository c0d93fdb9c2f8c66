//! Category buckets for the team page.
//!
//! Members reference categories by name, not by id, so grouping is an
//! equality match computed at read time. A member whose label matches no
//! known category (including one whose category was deleted) lands in the
//! trailing "Uncategorized" bucket instead of disappearing.

use serde::Serialize;

use crate::ordering::{Stored, sort_ordered};
use crate::records::{Category, TeamMember};
use crate::types::RecordId;

/// Label of the fallback bucket.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A record that can be filed under a named category.
pub trait Categorized {
    /// The category label, if any.
    fn category(&self) -> Option<&str>;
}

impl Categorized for TeamMember {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// One category and the records filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket<R> {
    /// Display label.
    pub label: String,
    /// Source category, `None` for the fallback bucket.
    pub category_id: Option<RecordId>,
    pub members: Vec<Stored<R>>,
}

/// Partition `members` by `categories`.
///
/// One bucket per category, in category display order, with members in
/// member display order. Empty categories are kept. The fallback bucket is
/// appended only when some member is unmatched.
#[must_use]
pub fn group_by_category<R>(members: &[Stored<R>], categories: &[Stored<Category>]) -> Vec<Bucket<R>>
where
    R: Categorized + Clone,
{
    let mut categories = categories.to_vec();
    sort_ordered(&mut categories);
    let mut members = members.to_vec();
    sort_ordered(&mut members);

    let mut buckets: Vec<Bucket<R>> = categories
        .iter()
        .map(|c| Bucket {
            label: c.record.name.clone(),
            category_id: Some(c.id),
            members: Vec::new(),
        })
        .collect();
    let mut uncategorized = Vec::new();

    for member in members {
        // First match wins if two categories share a name.
        let slot = match member.record.category() {
            Some(label) => buckets.iter_mut().find(|b| b.label == label),
            None => None,
        };
        match slot {
            Some(bucket) => bucket.members.push(member),
            None => uncategorized.push(member),
        }
    }

    if !uncategorized.is_empty() {
        buckets.push(Bucket {
            label: UNCATEGORIZED_LABEL.to_string(),
            category_id: None,
            members: uncategorized,
        });
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, order_index: i32, name: &str) -> Stored<Category> {
        Stored {
            id: RecordId::new(id),
            order_index,
            record: Category {
                name: name.to_string(),
            },
        }
    }

    fn member(id: i32, order_index: i32, name: &str, category: Option<&str>) -> Stored<TeamMember> {
        Stored {
            id: RecordId::new(id),
            order_index,
            record: TeamMember {
                name: name.to_string(),
                role: "Strategist".to_string(),
                bio: "Bio".to_string(),
                category: category.map(String::from),
                image_url: None,
                linkedin_url: None,
                twitter_url: None,
            },
        }
    }

    fn summary(buckets: &[Bucket<TeamMember>]) -> Vec<(String, Vec<String>)> {
        buckets
            .iter()
            .map(|b| {
                (
                    b.label.clone(),
                    b.members.iter().map(|m| m.record.name.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_buckets_follow_category_order() {
        let categories = vec![category(1, 1, "Design"), category(2, 0, "Leadership")];
        let members = vec![
            member(10, 1, "Bea", Some("Design")),
            member(11, 0, "Ana", Some("Leadership")),
            member(12, 0, "Cy", Some("Design")),
        ];

        let buckets = group_by_category(&members, &categories);
        assert_eq!(
            summary(&buckets),
            vec![
                ("Leadership".to_string(), vec!["Ana".to_string()]),
                ("Design".to_string(), vec!["Cy".to_string(), "Bea".to_string()]),
            ]
        );
        assert_eq!(buckets.first().and_then(|b| b.category_id), Some(RecordId::new(2)));
    }

    #[test]
    fn test_unmatched_members_are_uncategorized() {
        let categories = vec![category(1, 0, "Design")];
        let members = vec![
            member(10, 0, "Ana", Some("Engineering")),
            member(11, 1, "Bea", None),
            member(12, 2, "Cy", Some("design")),
        ];

        let buckets = group_by_category(&members, &categories);
        assert_eq!(
            summary(&buckets),
            vec![
                ("Design".to_string(), vec![]),
                (
                    UNCATEGORIZED_LABEL.to_string(),
                    vec!["Ana".to_string(), "Bea".to_string(), "Cy".to_string()]
                ),
            ]
        );
        assert_eq!(buckets.last().and_then(|b| b.category_id), None);
    }

    #[test]
    fn test_deleted_category_members_still_render() {
        let mut categories = vec![category(1, 0, "Design"), category(2, 1, "Ops")];
        let members = vec![member(10, 0, "Ana", Some("Ops"))];

        categories.retain(|c| c.record.name != "Ops");
        let buckets = group_by_category(&members, &categories);

        // The member keeps its label and moves to the fallback bucket.
        assert_eq!(members.first().and_then(|m| m.record.category.as_deref()), Some("Ops"));
        assert_eq!(
            summary(&buckets),
            vec![
                ("Design".to_string(), vec![]),
                (UNCATEGORIZED_LABEL.to_string(), vec!["Ana".to_string()]),
            ]
        );
    }

    #[test]
    fn test_no_fallback_bucket_when_all_matched() {
        let categories = vec![category(1, 0, "Design")];
        let members = vec![member(10, 0, "Ana", Some("Design"))];
        let buckets = group_by_category(&members, &categories);
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let categories = vec![category(1, 0, "Design")];
        let members = vec![
            member(11, 0, "Bea", Some("Design")),
            member(10, 0, "Ana", Some("Design")),
        ];
        let mut reversed = members.clone();
        reversed.reverse();

        assert_eq!(
            group_by_category(&members, &categories),
            group_by_category(&reversed, &categories)
        );
    }
}
