//! Recording stage shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::PrototypeId;
use crate::math::{ParentId, Placement, Quat, Vec3};
use crate::pool::{Composite, Poolable};
use crate::stage::Stage;

/// Which lifecycle hook fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hook {
    Spawned,
    Despawned,
}

/// Everything the stage and the probes saw, in order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    Created(u32),
    Destroyed(u32),
    Pose(u32, Vec3),
    Parent(u32, Option<ParentId>),
    Active(u32, bool),
    Hook(u32, &'static str, Hook),
}

pub(crate) type Journal = Rc<RefCell<Vec<Event>>>;

pub(crate) struct Probe {
    object: u32,
    name: &'static str,
    journal: Journal,
}

impl Poolable for Probe {
    fn on_spawned(&mut self) {
        self.journal
            .borrow_mut()
            .push(Event::Hook(self.object, self.name, Hook::Spawned));
    }

    fn on_despawned(&mut self) {
        self.journal
            .borrow_mut()
            .push(Event::Hook(self.object, self.name, Hook::Despawned));
    }
}

pub(crate) struct Dummy {
    pub id: u32,
    pub prototype: PrototypeId,
    pub position: Vec3,
    pub parent: Option<ParentId>,
    pub active: bool,
    parts: Vec<Option<Probe>>,
}

impl Composite for Dummy {
    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn poolable_part_mut(&mut self, index: usize) -> Option<&mut dyn Poolable> {
        self.parts
            .get_mut(index)?
            .as_mut()
            .map(|probe| probe as &mut dyn Poolable)
    }
}

/// Stage that journals every call. `layout` names the poolable parts of
/// each created object; `None` entries are plain parts.
pub(crate) struct RecordingStage {
    pub journal: Journal,
    pub layout: Vec<Option<&'static str>>,
    next_id: u32,
}

impl RecordingStage {
    pub fn new(layout: Vec<Option<&'static str>>) -> Self {
        Self {
            journal: Rc::default(),
            layout,
            next_id: 0,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.journal.borrow().clone()
    }

    pub fn clear(&self) {
        self.journal.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.journal.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl Stage for RecordingStage {
    type Object = Dummy;

    fn create(&mut self, prototype: &PrototypeId, placement: &Placement) -> Dummy {
        let id = self.next_id;
        self.next_id += 1;
        self.journal.borrow_mut().push(Event::Created(id));
        let parts = self
            .layout
            .iter()
            .map(|name| {
                name.map(|name| Probe {
                    object: id,
                    name,
                    journal: Rc::clone(&self.journal),
                })
            })
            .collect();
        Dummy {
            id,
            prototype: prototype.clone(),
            position: placement.position,
            parent: placement.parent,
            active: true,
            parts,
        }
    }

    fn destroy(&mut self, object: Dummy) {
        self.journal.borrow_mut().push(Event::Destroyed(object.id));
    }

    fn set_pose(&mut self, object: &mut Dummy, position: Vec3, _rotation: Quat) {
        object.position = position;
        self.journal.borrow_mut().push(Event::Pose(object.id, position));
    }

    fn parent_of(&self, object: &Dummy) -> Option<ParentId> {
        object.parent
    }

    fn set_parent(&mut self, object: &mut Dummy, parent: Option<ParentId>) {
        object.parent = parent;
        self.journal.borrow_mut().push(Event::Parent(object.id, parent));
    }

    fn set_active(&mut self, object: &mut Dummy, active: bool) {
        object.active = active;
        self.journal.borrow_mut().push(Event::Active(object.id, active));
    }
}
