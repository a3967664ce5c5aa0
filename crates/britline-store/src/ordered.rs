//! Dense-ordering helpers shared by the vehicles, works, and car-projects
//! stores.
//!
//! Invariant maintained by every mutation: `order` values across the array
//! are exactly `0..N-1`, matching array position, with no gaps or
//! duplicates.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Reassign every entity's `order` to its current array position.
pub fn reindex<T: Ordered>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_order(u32::try_from(index).unwrap_or(u32::MAX));
    }
}

/// Stable sort by the `order` field. Entities sharing an `order` value
/// (possible in legacy blobs) keep their stored relative position.
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(Ordered::order);
}

/// Swap the entity at `index` with its neighbour in `direction`, updating
/// both entities' `order` to their new positions.
///
/// Returns `false` without touching the array when the entity is already at
/// the boundary in that direction.
pub fn swap_adjacent<T: Ordered>(items: &mut [T], index: usize, direction: MoveDirection) -> bool {
    let neighbour = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < items.len() => index + 1,
        _ => return false,
    };

    items.swap(index, neighbour);
    items[index].set_order(u32::try_from(index).unwrap_or(u32::MAX));
    items[neighbour].set_order(u32::try_from(neighbour).unwrap_or(u32::MAX));
    true
}

/// Remove the entity at `from` and reinsert it at `to`, then reassign every
/// `order` to match the new positions. Callers validate bounds.
pub fn move_to<T: Ordered>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
    reindex(items);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        name: &'static str,
        order: u32,
    }

    impl Ordered for Item {
        fn order(&self) -> u32 {
            self.order
        }
        fn set_order(&mut self, order: u32) {
            self.order = order;
        }
    }

    fn items(names: &[&'static str]) -> Vec<Item> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Item {
                name,
                order: u32::try_from(i).unwrap(),
            })
            .collect()
    }

    fn orders(items: &[Item]) -> Vec<u32> {
        items.iter().map(|i| i.order).collect()
    }

    #[test]
    fn reindex_produces_dense_sequence() {
        let mut list = vec![
            Item { name: "a", order: 4 },
            Item { name: "b", order: 9 },
            Item { name: "c", order: 2 },
        ];
        reindex(&mut list);
        assert_eq!(orders(&list), vec![0, 1, 2]);
    }

    #[test]
    fn swap_up_moves_entity_and_keeps_density() {
        let mut list = items(&["a", "b", "c"]);
        assert!(swap_adjacent(&mut list, 2, MoveDirection::Up));
        assert_eq!(
            list.iter().map(|i| i.name).collect::<Vec<_>>(),
            vec!["a", "c", "b"]
        );
        assert_eq!(orders(&list), vec![0, 1, 2]);
        assert_eq!(list[1].name, "c");
        assert_eq!(list[1].order, 1);
    }

    #[test]
    fn swap_at_boundary_is_a_noop() {
        let mut list = items(&["a", "b"]);
        assert!(!swap_adjacent(&mut list, 0, MoveDirection::Up));
        assert!(!swap_adjacent(&mut list, 1, MoveDirection::Down));
        assert_eq!(orders(&list), vec![0, 1]);
    }

    #[test]
    fn move_to_reindexes_whole_array() {
        let mut list = items(&["a", "b", "c", "d"]);
        move_to(&mut list, 3, 0);
        assert_eq!(
            list.iter().map(|i| i.name).collect::<Vec<_>>(),
            vec!["d", "a", "b", "c"]
        );
        assert_eq!(orders(&list), vec![0, 1, 2, 3]);
    }

    #[test]
    fn order_density_survives_arbitrary_mutations() {
        let mut list = items(&["a", "b", "c", "d", "e"]);
        list.remove(1);
        reindex(&mut list);
        swap_adjacent(&mut list, 2, MoveDirection::Down);
        move_to(&mut list, 0, 3);
        let mut seen = orders(&list);
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}
