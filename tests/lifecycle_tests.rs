// Host-side tests for mount generations.

#![allow(dead_code)]
#[path = "../src/lifecycle.rs"]
mod lifecycle;

use lifecycle::*;
use std::cell::Cell;
use std::rc::Rc;

/// Counts its own drops.
struct Component(Rc<Cell<u32>>);

impl Drop for Component {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn mount_finishing_in_the_same_generation_is_kept() {
    let generation = MountGeneration::default();
    let ticket = generation.ticket();
    let drops = Rc::new(Cell::new(0));
    let kept = generation.admit(ticket, Component(drops.clone()));
    assert!(kept.is_some());
    assert_eq!(drops.get(), 0);
}

#[test]
fn mount_finishing_after_unmount_is_dropped() {
    let generation = MountGeneration::default();
    let ticket = generation.ticket();
    generation.advance();
    let drops = Rc::new(Cell::new(0));
    assert!(generation.admit(ticket, Component(drops.clone())).is_none());
    assert_eq!(drops.get(), 1);
    assert!(!generation.is_current(ticket));
    assert!(generation.is_current(generation.ticket()));
}
