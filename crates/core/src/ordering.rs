//! `order_index` rules shared by every ordered collection.
//!
//! A collection is totally ordered by `(order_index, id)`. `order_index`
//! values are not unique: concurrent appends may tie, and ties fall back to
//! the store-assigned id, i.e. insertion order. Gaps left by deletes are
//! never compacted.

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// A record as persisted: store-assigned id, display position, domain fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<R> {
    pub id: RecordId,
    pub order_index: i32,
    #[serde(flatten)]
    pub record: R,
}

impl<R> Stored<R> {
    /// Total-order key: `(order_index, id)`.
    #[must_use]
    pub const fn sort_key(&self) -> (i32, RecordId) {
        (self.order_index, self.id)
    }
}

#[cfg(feature = "postgres")]
impl<'r, R> sqlx::FromRow<'r, sqlx::postgres::PgRow> for Stored<R>
where
    R: sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        Ok(Self {
            id: row.try_get("id")?,
            order_index: row.try_get("order_index")?,
            record: R::from_row(row)?,
        })
    }
}

/// Sort records into display order.
pub fn sort_ordered<R>(items: &mut [Stored<R>]) {
    items.sort_by_key(Stored::sort_key);
}

/// `order_index` for a record appended to a collection of `count` records.
#[must_use]
pub fn next_order_index(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Reorder direction, as seen in the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the head of the list (smaller `order_index`).
    Up,
    /// Towards the tail of the list (larger `order_index`).
    Down,
}

/// A record's `order_index` before and after a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: RecordId,
    pub from: i32,
    pub to: i32,
}

/// What a reorder request has to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPlan {
    /// First item moved up, or last item moved down.
    Unchanged,
    /// Rewrite these `order_index` values.
    ///
    /// Every write is conditional on `from` still being current.
    Move { placements: Vec<Placement> },
}

/// Work out how to move `id` one step in `direction`.
///
/// `items` may be in any order; the plan is computed against display order.
/// Distinct neighbour values are swapped. When the neighbour shares the same
/// `order_index`, the two trade places in display order and the records from
/// the first of them onwards are renumbered until values strictly increase
/// again, so nothing else changes position.
///
/// Returns `None` if `id` is not in `items`.
#[must_use]
pub fn plan_reorder<R>(items: &[Stored<R>], id: RecordId, direction: Direction) -> Option<ReorderPlan> {
    let mut keys: Vec<(i32, RecordId)> = items.iter().map(Stored::sort_key).collect();
    keys.sort_unstable();

    let position = keys.iter().position(|&(_, key_id)| key_id == id)?;
    let neighbour_position = match direction {
        Direction::Up => position.checked_sub(1),
        Direction::Down => position.checked_add(1).filter(|&p| p < keys.len()),
    };
    let Some(neighbour_position) = neighbour_position else {
        return Some(ReorderPlan::Unchanged);
    };

    let (moving_index, moving_id) = *keys.get(position)?;
    let (neighbour_index, neighbour_id) = *keys.get(neighbour_position)?;

    if moving_index != neighbour_index {
        return Some(ReorderPlan::Move {
            placements: vec![
                Placement {
                    id: moving_id,
                    from: moving_index,
                    to: neighbour_index,
                },
                Placement {
                    id: neighbour_id,
                    from: neighbour_index,
                    to: moving_index,
                },
            ],
        });
    }

    keys.swap(position, neighbour_position);
    let first = position.min(neighbour_position);
    let last = position.max(neighbour_position);

    let mut previous = first
        .checked_sub(1)
        .and_then(|p| keys.get(p))
        .map(|&(index, _)| index);
    let mut placements = Vec::new();
    for (offset, &(from, key_id)) in keys.iter().enumerate().skip(first) {
        let to = previous.map_or(from, |p| from.max(p.saturating_add(1)));
        if offset > last && to == from {
            break;
        }
        if to != from {
            placements.push(Placement {
                id: key_id,
                from,
                to,
            });
        }
        previous = Some(to);
    }

    Some(ReorderPlan::Move { placements })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i32, order_index: i32, name: &str) -> Stored<String> {
        Stored {
            id: RecordId::new(id),
            order_index,
            record: name.to_string(),
        }
    }

    fn apply(items: &mut [Stored<String>], plan: ReorderPlan) {
        if let ReorderPlan::Move { placements } = plan {
            for placement in placements {
                for item in items.iter_mut().filter(|item| item.id == placement.id) {
                    assert_eq!(item.order_index, placement.from);
                    item.order_index = placement.to;
                }
            }
        }
        sort_ordered(items);
    }

    fn order(items: &[Stored<String>]) -> Vec<&str> {
        items.iter().map(|s| s.record.as_str()).collect()
    }

    fn names(items: &[Stored<String>]) -> Vec<(&str, i32)> {
        items
            .iter()
            .map(|s| (s.record.as_str(), s.order_index))
            .collect()
    }

    #[test]
    fn test_sort_breaks_ties_by_id() {
        let mut items = vec![stored(3, 1, "C"), stored(2, 1, "B"), stored(1, 2, "A")];
        sort_ordered(&mut items);
        assert_eq!(names(&items), vec![("B", 1), ("C", 1), ("A", 2)]);
    }

    #[test]
    fn test_next_order_index_is_count() {
        assert_eq!(next_order_index(0), 0);
        assert_eq!(next_order_index(3), 3);
        assert_eq!(next_order_index(usize::MAX), i32::MAX);
    }

    #[test]
    fn test_move_up_swaps_values() {
        let mut items = vec![stored(1, 0, "A"), stored(2, 1, "B"), stored(3, 2, "C")];
        let plan = plan_reorder(&items, RecordId::new(2), Direction::Up);
        assert_eq!(
            plan,
            Some(ReorderPlan::Move {
                placements: vec![
                    Placement {
                        id: RecordId::new(2),
                        from: 1,
                        to: 0
                    },
                    Placement {
                        id: RecordId::new(1),
                        from: 0,
                        to: 1
                    },
                ],
            })
        );

        if let Some(plan) = plan {
            apply(&mut items, plan);
        }
        assert_eq!(names(&items), vec![("B", 0), ("A", 1), ("C", 2)]);
    }

    #[test]
    fn test_swap_keeps_gaps() {
        let mut items = vec![stored(1, 0, "A"), stored(2, 5, "B"), stored(3, 9, "C")];
        if let Some(plan) = plan_reorder(&items, RecordId::new(2), Direction::Down) {
            apply(&mut items, plan);
        }
        assert_eq!(names(&items), vec![("A", 0), ("C", 5), ("B", 9)]);
    }

    #[test]
    fn test_edges_are_unchanged() {
        let items = vec![stored(1, 0, "A"), stored(2, 1, "B")];
        assert_eq!(
            plan_reorder(&items, RecordId::new(1), Direction::Up),
            Some(ReorderPlan::Unchanged)
        );
        assert_eq!(
            plan_reorder(&items, RecordId::new(2), Direction::Down),
            Some(ReorderPlan::Unchanged)
        );
    }

    #[test]
    fn test_unknown_id_has_no_plan() {
        let items = vec![stored(1, 0, "A")];
        assert_eq!(plan_reorder(&items, RecordId::new(99), Direction::Up), None);
    }

    #[test]
    fn test_tied_neighbours_still_move() {
        let mut items = vec![stored(1, 0, "A"), stored(2, 3, "B"), stored(3, 3, "C")];
        if let Some(plan) = plan_reorder(&items, RecordId::new(3), Direction::Up) {
            apply(&mut items, plan);
        }
        assert_eq!(names(&items), vec![("A", 0), ("C", 3), ("B", 4)]);

        let mut items = vec![stored(1, 3, "A"), stored(2, 3, "B")];
        if let Some(plan) = plan_reorder(&items, RecordId::new(1), Direction::Down) {
            apply(&mut items, plan);
        }
        assert_eq!(names(&items), vec![("B", 3), ("A", 4)]);
    }

    #[test]
    fn test_tie_down_does_not_pass_the_next_record() {
        // Y sorts last on value but holds the lowest id.
        let mut items = vec![stored(2, 5, "M"), stored(3, 5, "N"), stored(1, 6, "Y")];
        if let Some(plan) = plan_reorder(&items, RecordId::new(2), Direction::Down) {
            apply(&mut items, plan);
        }
        assert_eq!(order(&items), vec!["N", "M", "Y"]);
        assert_eq!(names(&items), vec![("N", 5), ("M", 6), ("Y", 7)]);
    }

    #[test]
    fn test_tie_up_does_not_pass_the_previous_record() {
        // X sorts first on value but holds the highest id.
        let mut items = vec![stored(3, 4, "X"), stored(1, 5, "A"), stored(2, 5, "B")];
        if let Some(plan) = plan_reorder(&items, RecordId::new(2), Direction::Up) {
            apply(&mut items, plan);
        }
        assert_eq!(order(&items), vec!["X", "B", "A"]);
    }

    #[test]
    fn test_tie_inside_larger_tie_moves_one_step() {
        let mut items = vec![
            stored(1, 2, "A"),
            stored(2, 2, "B"),
            stored(3, 2, "C"),
            stored(4, 2, "D"),
            stored(5, 9, "E"),
        ];
        if let Some(plan) = plan_reorder(&items, RecordId::new(3), Direction::Up) {
            apply(&mut items, plan);
        }
        assert_eq!(order(&items), vec!["A", "C", "B", "D", "E"]);
        // E already sits above the renumbered run and keeps its value.
        assert_eq!(items.last().map(|s| s.order_index), Some(9));

        let mut items = vec![
            stored(1, 2, "A"),
            stored(2, 2, "B"),
            stored(3, 2, "C"),
            stored(4, 3, "D"),
        ];
        if let Some(plan) = plan_reorder(&items, RecordId::new(2), Direction::Down) {
            apply(&mut items, plan);
        }
        assert_eq!(order(&items), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn test_stored_flattens_record_fields() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Named {
            name: String,
        }

        let item = Stored {
            id: RecordId::new(4),
            order_index: 2,
            record: Named {
                name: "Acme".to_string(),
            },
        };
        let json = serde_json::to_value(&item).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({"id": 4, "order_index": 2, "name": "Acme"})
        );
    }
}
