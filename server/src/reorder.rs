//! Reorder coordinator.
//!
//! Turns a drag-and-drop reposition of one row into a durable contiguous
//! ordering for the whole scope. The in-memory move uses splice semantics
//! (remove at the old position, insert at the new one, shifting everything
//! in between), then every row is renumbered to its 1-based position and
//! only the rows whose index actually changed go into the commit plan.
//!
//! The remote store applies each row update atomically but offers no
//! multi-row transaction, so the plan is applied as sequential single-row
//! writes. A failure at update k leaves 1..k-1 applied and the rest
//! untouched; [`apply_plan`] reports exactly that so the handler can
//! re-fetch the scope and answer with the remote truth instead of the
//! optimistic order. Handlers hold the scope lock for the whole commit,
//! which keeps two in-process committers from interleaving.

use lacteos_store::{models::OrderChange, DataClient, Query, StoreError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedRow {
    pub id: Uuid,
    pub order_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: Uuid,
    pub order_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging { from: usize },
    Committing,
}

/// One drag interaction over one scope's rows.
///
/// `Idle → Dragging → Committing → Idle`; a cancelled or no-op drop falls
/// straight back to `Idle` without producing any update.
#[derive(Debug)]
pub struct Coordinator {
    rows: Vec<OrderedRow>,
    phase: Phase,
}

impl Coordinator {
    pub fn new(rows: Vec<OrderedRow>) -> Self {
        Self {
            rows,
            phase: Phase::Idle,
        }
    }

    /// Starts dragging the given row. Returns false (staying `Idle`) when
    /// the row is not part of this scope.
    pub fn begin_drag(&mut self, id: Uuid) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        match self.rows.iter().position(|row| row.id == id) {
            Some(from) => {
                self.phase = Phase::Dragging { from };
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.phase, Phase::Dragging { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Drops the dragged row onto the target. Dropping onto itself or onto
    /// an unknown target is a no-op yielding an empty plan. A non-empty plan
    /// moves the coordinator to `Committing`.
    pub fn drop_on(&mut self, target: Uuid) -> Vec<OrderUpdate> {
        let Phase::Dragging { from } = self.phase else {
            return Vec::new();
        };
        self.phase = Phase::Idle;

        let Some(to) = self.rows.iter().position(|row| row.id == target) else {
            return Vec::new();
        };
        if to == from {
            return Vec::new();
        }

        splice_move(&mut self.rows, from, to);
        let plan = renumber(&mut self.rows);
        if !plan.is_empty() {
            self.phase = Phase::Committing;
        }
        plan
    }

    /// Returns to `Idle` once the commit finished, fully or partially.
    pub fn finish(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn rows(&self) -> &[OrderedRow] {
        &self.rows
    }
}

/// Removes the element at `from` and reinserts it at `to`, shifting the
/// elements in between.
pub fn splice_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Assigns each row its contiguous 1-based position and returns updates for
/// the rows whose index changed.
pub fn renumber(rows: &mut [OrderedRow]) -> Vec<OrderUpdate> {
    let mut plan = Vec::new();
    for (position, row) in rows.iter_mut().enumerate() {
        let fresh = position as i32 + 1;
        if row.order_index != fresh {
            row.order_index = fresh;
            plan.push(OrderUpdate {
                id: row.id,
                order_index: fresh,
            });
        }
    }
    plan
}

/// Applies the plan as sequential single-row updates. `scope` adds an extra
/// equality filter to every update (products are pinned to their category so
/// a stale plan cannot leak across scopes).
///
/// On failure returns how many updates had already been applied together
/// with the remote error.
pub async fn apply_plan(
    data: &DataClient,
    table: &str,
    scope: Option<(&str, Uuid)>,
    plan: &[OrderUpdate],
) -> Result<usize, (usize, StoreError)> {
    for (applied, update) in plan.iter().enumerate() {
        let mut query = Query::table(table).eq("id", update.id);
        if let Some((column, value)) = scope {
            query = query.eq(column, value);
        }
        let change = OrderChange {
            order_index: update.order_index,
        };
        if let Err(e) = data.update(query, &change).await {
            return Err((applied, e));
        }
    }
    Ok(plan.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(orders: &[i32]) -> Vec<OrderedRow> {
        orders
            .iter()
            .map(|&order_index| OrderedRow {
                id: Uuid::new_v4(),
                order_index,
            })
            .collect()
    }

    #[test]
    fn splice_moves_forward_and_back() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        splice_move(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        splice_move(&mut items, 2, 0);
        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn renumber_yields_contiguous_orders() {
        let mut list = rows(&[2, 7, 4]);
        let plan = renumber(&mut list);
        let mut orders: Vec<i32> = list.iter().map(|r| r.order_index).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![1, 2, 3]);
        // 2 was already at position 2, so two rows change.
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn renumber_of_contiguous_list_is_empty() {
        let mut list = rows(&[1, 2, 3]);
        assert!(renumber(&mut list).is_empty());
    }

    #[test]
    fn drop_produces_plan_and_commits() {
        let list = rows(&[1, 2, 3, 4]);
        let first = list[0].id;
        let third = list[2].id;

        let mut coordinator = Coordinator::new(list);
        assert!(coordinator.begin_drag(first));
        let plan = coordinator.drop_on(third);
        assert_eq!(plan.len(), 3);

        let orders: Vec<i32> = coordinator.rows().iter().map(|r| r.order_index).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
        coordinator.finish();

        // After finishing, a new drag may start.
        assert!(coordinator.begin_drag(first));
    }

    #[test]
    fn drop_on_self_is_noop() {
        let list = rows(&[1, 2, 3]);
        let target = list[1].id;
        let mut coordinator = Coordinator::new(list);
        assert!(coordinator.begin_drag(target));
        assert!(coordinator.drop_on(target).is_empty());
        // Back to idle: dragging again works without finish().
        assert!(coordinator.begin_drag(target));
    }

    #[test]
    fn drop_on_unknown_target_is_noop() {
        let list = rows(&[1, 2]);
        let dragged = list[0].id;
        let mut coordinator = Coordinator::new(list);
        assert!(coordinator.begin_drag(dragged));
        assert!(coordinator.drop_on(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn unknown_row_cannot_start_a_drag() {
        let mut coordinator = Coordinator::new(rows(&[1, 2]));
        assert!(!coordinator.begin_drag(Uuid::new_v4()));
        assert!(coordinator.drop_on(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn cancel_returns_to_idle() {
        let list = rows(&[1, 2]);
        let dragged = list[0].id;
        let mut coordinator = Coordinator::new(list);
        assert!(coordinator.begin_drag(dragged));
        coordinator.cancel();
        assert!(coordinator.drop_on(dragged).is_empty());
        assert!(coordinator.begin_drag(dragged));
    }
}
