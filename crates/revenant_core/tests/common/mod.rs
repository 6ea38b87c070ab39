//! Shared fixtures: a tiny scene stage whose objects log lifecycle hooks.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use revenant_core::{Composite, ParentId, Placement, Poolable, PrototypeId, Quat, Stage, Vec3};

/// `(object id, part name, "spawn" | "despawn")`
pub type HookLog = Rc<RefCell<Vec<(u32, &'static str, &'static str)>>>;

pub struct Hooked {
    object: u32,
    name: &'static str,
    log: HookLog,
}

impl Poolable for Hooked {
    fn on_spawned(&mut self) {
        self.log.borrow_mut().push((self.object, self.name, "spawn"));
    }

    fn on_despawned(&mut self) {
        self.log.borrow_mut().push((self.object, self.name, "despawn"));
    }
}

/// Parts: A, mesh (plain), B, C.
pub struct Actor {
    pub id: u32,
    pub prototype: PrototypeId,
    pub position: Vec3,
    pub parent: Option<ParentId>,
    pub active: bool,
    a: Hooked,
    mesh: u8,
    b: Hooked,
    c: Hooked,
}

impl Composite for Actor {
    fn part_count(&self) -> usize {
        4
    }

    fn poolable_part_mut(&mut self, index: usize) -> Option<&mut dyn Poolable> {
        match index {
            0 => Some(&mut self.a),
            2 => Some(&mut self.b),
            3 => Some(&mut self.c),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct TestStage {
    pub log: HookLog,
    pub created: Vec<u32>,
    pub destroyed: Vec<u32>,
    pub reparents: usize,
    next_id: u32,
}

impl TestStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hooks(&self) -> Vec<(u32, &'static str, &'static str)> {
        self.log.borrow().clone()
    }

    pub fn hooks_for(&self, object: u32) -> Vec<(&'static str, &'static str)> {
        self.log
            .borrow()
            .iter()
            .filter(|(id, _, _)| *id == object)
            .map(|&(_, part, hook)| (part, hook))
            .collect()
    }

    pub fn clear_hooks(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Stage for TestStage {
    type Object = Actor;

    fn create(&mut self, prototype: &PrototypeId, placement: &Placement) -> Actor {
        let id = self.next_id;
        self.next_id += 1;
        self.created.push(id);
        let hooked = |name| Hooked {
            object: id,
            name,
            log: Rc::clone(&self.log),
        };
        Actor {
            id,
            prototype: prototype.clone(),
            position: placement.position,
            parent: placement.parent,
            active: true,
            a: hooked("A"),
            mesh: 0,
            b: hooked("B"),
            c: hooked("C"),
        }
    }

    fn destroy(&mut self, object: Actor) {
        self.destroyed.push(object.id);
    }

    fn set_pose(&mut self, object: &mut Actor, position: Vec3, _rotation: Quat) {
        object.position = position;
    }

    fn parent_of(&self, object: &Actor) -> Option<ParentId> {
        object.parent
    }

    fn set_parent(&mut self, object: &mut Actor, parent: Option<ParentId>) {
        self.reparents += 1;
        object.parent = parent;
    }

    fn set_active(&mut self, object: &mut Actor, active: bool) {
        object.active = active;
    }
}
