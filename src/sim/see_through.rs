//! Tracks objects the host should draw translucent
//!
//! An object that slides over the hole while too big to be swallowed would
//! hide the opening. It is marked when its footprint first touches the hole
//! and unmarked when it leaves. The host keeps whatever original/translucent
//! material pair it needs per id and restores everything on `clear`.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collection::footprint_touches;
use super::state::Collectible;

#[derive(Debug, Clone, Default)]
pub struct SeeThrough {
    /// Objects currently touching the hole
    touching: BTreeSet<u32>,
    /// Subset drawn translucent
    marked: BTreeSet<u32>,
}

/// What changed during one update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeeThroughChanges {
    pub made_translucent: Vec<u32>,
    pub restored: Vec<u32>,
}

impl SeeThrough {
    pub fn is_marked(&self, id: u32) -> bool {
        self.marked.contains(&id)
    }

    pub fn marked(&self) -> impl Iterator<Item = u32> + '_ {
        self.marked.iter().copied()
    }

    pub fn update(&mut self, hole_pos: Vec2, hole_size: f32, collectibles: &[Collectible]) -> SeeThroughChanges {
        let mut changes = SeeThroughChanges::default();

        for item in collectibles {
            let touching = !item.collected && footprint_touches(hole_pos, hole_size, item.pos, item.size);
            let was_touching = self.touching.contains(&item.id);

            if touching && !was_touching {
                self.touching.insert(item.id);
                if item.size > hole_size {
                    self.marked.insert(item.id);
                    changes.made_translucent.push(item.id);
                    log::debug!("{} #{} is larger than the hole, made translucent", item.kind, item.id);
                }
            } else if !touching && was_touching {
                self.touching.remove(&item.id);
                if self.marked.remove(&item.id) {
                    changes.restored.push(item.id);
                }
            }
        }

        changes
    }

    /// Forget everything; returns the ids that still need restoring
    pub fn clear(&mut self) -> Vec<u32> {
        self.touching.clear();
        std::mem::take(&mut self.marked).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, x: f32, size: f32) -> Collectible {
        Collectible {
            id,
            kind: "box".to_string(),
            pos: Vec2::new(x, 0.0),
            yaw: 0.0,
            size,
            score: 10,
            collected: false,
            wanderer: None,
        }
    }

    #[test]
    fn test_marks_only_oversized_objects_on_entry() {
        let mut st = SeeThrough::default();
        let items = vec![item(1, 1.0, 3.0), item(2, 0.5, 0.5)];
        let changes = st.update(Vec2::ZERO, 1.0, &items);
        assert_eq!(changes.made_translucent, vec![1]);
        assert!(st.is_marked(1));
        assert!(!st.is_marked(2));
    }

    #[test]
    fn test_restores_on_exit_and_collect() {
        let mut st = SeeThrough::default();
        let mut items = vec![item(1, 1.0, 3.0), item(2, -1.0, 3.0)];
        st.update(Vec2::ZERO, 1.0, &items);

        items[0].pos.x = 10.0;
        items[1].collected = true;
        let changes = st.update(Vec2::ZERO, 1.0, &items);
        assert_eq!(changes.restored, vec![1, 2]);
        assert_eq!(st.marked().count(), 0);
    }

    #[test]
    fn test_clear_returns_marked() {
        let mut st = SeeThrough::default();
        st.update(Vec2::ZERO, 1.0, &[item(4, 0.0, 2.0)]);
        assert_eq!(st.clear(), vec![4]);
        assert_eq!(st.marked().count(), 0);
    }
}
