//! The physics system: item arena, simulated clock and listener fan-out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use orrery_types::{ItemId, SystemId};

use crate::item::{Contact, PhysicalItem};
use crate::listener::StepListener;

/// Shared, single-threaded handle to a physics system.
///
/// Visualization and export components keep `Weak` copies and check
/// liveness before every use.
pub type SharedSystem = Rc<RefCell<PhysicsSystem>>;

#[derive(Debug, Clone, Copy)]
enum Phase {
    Setup,
    Update,
    Clear,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    item: Option<PhysicalItem>,
}

/// Owns physical items and drives the step lifecycle.
///
/// Items live in a generational arena: removing an item bumps its slot
/// generation, so stale [`ItemId`]s resolve to `None` instead of aliasing
/// whatever reuses the slot.
pub struct PhysicsSystem {
    id: SystemId,
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    /// Simulated time (seconds).
    time: f64,
    /// Wall-clock seconds spent per simulated second in the last step.
    rtf: f64,
    step_count: u64,
    contacts: Vec<Contact>,
    listeners: Vec<Weak<RefCell<dyn StepListener>>>,
}

impl PhysicsSystem {
    /// Creates an empty system with a fresh id.
    pub fn new() -> Self {
        Self {
            id: SystemId::next(),
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            time: 0.0,
            rtf: 0.0,
            step_count: 0,
            contacts: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Wraps the system in a shared handle.
    pub fn into_shared(self) -> SharedSystem {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn id(&self) -> SystemId {
        self.id
    }

    // ─── Items ────────────────────────────────────────────────

    /// Inserts an item and returns its handle.
    pub fn add(&mut self, item: PhysicalItem) -> ItemId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            return ItemId {
                system: self.id,
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        ItemId {
            system: self.id,
            index,
            generation: 0,
        }
    }

    /// Removes an item. Returns `None` for stale or foreign ids.
    pub fn remove(&mut self, id: ItemId) -> Option<PhysicalItem> {
        if !self.owns(id) {
            return None;
        }
        let slot = &mut self.slots[id.slot()];
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(item)
    }

    /// Resolves a handle, `None` if stale or foreign.
    pub fn get(&self, id: ItemId) -> Option<&PhysicalItem> {
        if !self.owns(id) {
            return None;
        }
        self.slots[id.slot()].item.as_ref()
    }

    /// Resolves a handle mutably, `None` if stale or foreign.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PhysicalItem> {
        if !self.owns(id) {
            return None;
        }
        self.slots[id.slot()].item.as_mut()
    }

    /// True if `id` refers to a live item of this system.
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Live items in slot order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &PhysicalItem)> + '_ {
        let system = self.id;
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.item.as_ref().map(|item| {
                (
                    ItemId {
                        system,
                        index: index as u32,
                        generation: slot.generation,
                    },
                    item,
                )
            })
        })
    }

    /// Handles of live items in slot order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items().map(|(id, _)| id).collect()
    }

    /// Number of live items.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn owns(&self, id: ItemId) -> bool {
        id.system == self.id
            && self
                .slots
                .get(id.slot())
                .is_some_and(|slot| slot.generation == id.generation)
    }

    // ─── Clock ────────────────────────────────────────────────

    /// Simulated time (seconds).
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Real-time factor of the last step (wall time / simulated time).
    #[inline]
    pub fn rtf(&self) -> f64 {
        self.rtf
    }

    /// Number of completed steps.
    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    // ─── Contacts ─────────────────────────────────────────────

    /// Contacts reported for the current step.
    #[inline]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Replaces the contact list (supplied by an external collision pipeline).
    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    // ─── Listeners ────────────────────────────────────────────

    /// Registers a step listener. The system holds it weakly.
    pub fn add_listener<L: StepListener + 'static>(&mut self, listener: &Rc<RefCell<L>>) {
        let listener: Rc<RefCell<dyn StepListener>> = listener.clone();
        let weak = Rc::downgrade(&listener);
        if self.listeners.iter().any(|l| Weak::ptr_eq(l, &weak)) {
            return;
        }
        self.listeners.push(weak);
    }

    /// Number of listeners still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.strong_count() > 0).count()
    }

    // ─── Lifecycle ────────────────────────────────────────────

    /// Advances the simulation by `dt` seconds.
    ///
    /// Notifies `on_setup`, moves every item by its prescribed velocity,
    /// advances the clock, then notifies `on_update`.
    pub fn do_step(&mut self, dt: f32) {
        let start = Instant::now();
        self.notify(Phase::Setup);

        for slot in &mut self.slots {
            if let Some(item) = slot.item.as_mut() {
                item.advance(dt);
            }
        }
        self.time += dt as f64;
        self.step_count += 1;

        let wall = start.elapsed().as_secs_f64();
        self.rtf = if dt > 0.0 { wall / dt as f64 } else { 0.0 };

        self.notify(Phase::Update);
    }

    /// Removes every item and contact after notifying `on_clear`.
    ///
    /// Outstanding item handles become stale.
    pub fn clear(&mut self) {
        self.notify(Phase::Clear);
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.item.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
        self.contacts.clear();
    }

    fn notify(&mut self, phase: Phase) {
        self.listeners.retain(|l| l.strong_count() > 0);
        let listeners = self.listeners.clone();
        for weak in &listeners {
            let Some(listener) = weak.upgrade() else {
                continue;
            };
            let Ok(mut listener) = listener.try_borrow_mut() else {
                tracing::warn!(system = self.id.0, ?phase, "listener busy, notification skipped");
                continue;
            };
            match phase {
                Phase::Setup => listener.on_setup(self),
                Phase::Update => listener.on_update(self),
                Phase::Clear => listener.on_clear(self),
            }
        }
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new()
    }
}
