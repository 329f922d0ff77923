//! Listener registry — per-category callback lists plus one primary slot.
//!
//! Lists are copy-on-write: `add`/`remove` (application context) build a
//! new `Arc<[Entry]>` outside any lock and swap it in; `dispatch` (edge or
//! tick context) clones the current `Arc` inside a critical section and
//! invokes callbacks after releasing it.  A listener may therefore add or
//! remove listeners from inside its own callback; the change applies from
//! the next dispatch on.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use embassy_sync::blocking_mutex::CriticalSectionMutex;
use log::warn;

use crate::error::{Error, Result};
use crate::events::{ButtonEvent, EventCategory};

/// A registered callback.  Returning `Err` reports a listener failure;
/// the remaining listeners still run.
pub type Listener = Arc<dyn Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`ListenerRegistry::add`]; unique per registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

#[derive(Clone)]
struct Entry {
    id: ListenerId,
    listener: Listener,
}

struct Slot {
    list: Arc<[Entry]>,
    primary: Option<Listener>,
}

impl Slot {
    fn new() -> Self {
        Self {
            list: Arc::from(Vec::new()),
            primary: None,
        }
    }
}

struct Slots {
    press_release: Slot,
    repeat_count: Slot,
    double_click: Slot,
}

impl Slots {
    fn get(&self, category: EventCategory) -> &Slot {
        match category {
            EventCategory::PressRelease => &self.press_release,
            EventCategory::RepeatCount => &self.repeat_count,
            EventCategory::DoubleClick => &self.double_click,
        }
    }

    fn get_mut(&mut self, category: EventCategory) -> &mut Slot {
        match category {
            EventCategory::PressRelease => &mut self.press_release,
            EventCategory::RepeatCount => &mut self.repeat_count,
            EventCategory::DoubleClick => &mut self.double_click,
        }
    }
}

/// Run one listener.  A panic is caught and turned into an error so it
/// never unwinds into the edge or tick context.
fn invoke(listener: &Listener, event: &ButtonEvent) -> anyhow::Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string payload");
            Err(anyhow!("panicked: {}", msg))
        }
    }
}

pub struct ListenerRegistry {
    slots: CriticalSectionMutex<RefCell<Slots>>,
    next_id: AtomicU32,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            slots: CriticalSectionMutex::new(RefCell::new(Slots {
                press_release: Slot::new(),
                repeat_count: Slot::new(),
                double_click: Slot::new(),
            })),
            next_id: AtomicU32::new(1),
        }
    }

    /// Append a listener.  Never fails; registering the same closure
    /// twice yields two independent handles.
    pub fn add<F>(&self, category: EventCategory, f: F) -> ListenerId
    where
        F: Fn(&ButtonEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = Entry {
            id,
            listener: Arc::new(f),
        };
        self.replace_list(category, |current| {
            let mut next = current.to_vec();
            next.push(entry.clone());
            Some(next)
        });
        id
    }

    /// Remove the listener registered under `id`.
    ///
    /// Fails with [`Error::NotFound`] (registry unchanged) if `id` was
    /// never added to `category` or has already been removed.
    pub fn remove(&self, category: EventCategory, id: ListenerId) -> Result<()> {
        let removed = self.replace_list(category, |current| {
            let pos = current.iter().position(|e| e.id == id)?;
            let mut next = current.to_vec();
            next.remove(pos);
            Some(next)
        });
        if removed {
            Ok(())
        } else {
            Err(Error::NotFound(category))
        }
    }

    /// Install (or with `None`, clear) the primary callback for
    /// `category`, returning the one it replaced.
    pub fn set_primary(&self, category: EventCategory, listener: Option<Listener>) -> Option<Listener> {
        self.slots.lock(|slots| {
            let mut slots = slots.borrow_mut();
            core::mem::replace(&mut slots.get_mut(category).primary, listener)
        })
    }

    pub fn has_primary(&self, category: EventCategory) -> bool {
        self.slots.lock(|slots| slots.borrow().get(category).primary.is_some())
    }

    /// Number of list listeners (the primary slot is not counted).
    pub fn len(&self, category: EventCategory) -> usize {
        self.slots.lock(|slots| slots.borrow().get(category).list.len())
    }

    /// Deliver `event` to every listener of its category in registration
    /// order, then to the primary callback.  Returns the number of
    /// listeners that returned an error or panicked.
    pub fn dispatch(&self, event: &ButtonEvent) -> u32 {
        let category = event.category();
        let (list, primary) = self.slots.lock(|slots| {
            let slots = slots.borrow();
            let slot = slots.get(category);
            (Arc::clone(&slot.list), slot.primary.clone())
        });

        let mut failures = 0;
        for entry in list.iter() {
            if let Err(e) = invoke(&entry.listener, event) {
                failures += 1;
                warn!("{} listener {:?} failed: {:#}", category.name(), entry.id, e);
            }
        }
        if let Some(primary) = primary {
            if let Err(e) = invoke(&primary, event) {
                failures += 1;
                warn!("{} primary callback failed: {:#}", category.name(), e);
            }
        }
        failures
    }

    /// Rebuild `category`'s list with `build` and publish it.  `build`
    /// returns `None` to leave the list alone.  Retries if another
    /// writer published in between; returns whether a list was published.
    fn replace_list(
        &self,
        category: EventCategory,
        mut build: impl FnMut(&[Entry]) -> Option<Vec<Entry>>,
    ) -> bool {
        loop {
            let current = self
                .slots
                .lock(|slots| Arc::clone(&slots.borrow().get(category).list));
            let Some(next) = build(&current) else {
                return false;
            };
            let next: Arc<[Entry]> = Arc::from(next);

            let swapped = self.slots.lock(|slots| {
                let mut slots = slots.borrow_mut();
                let slot = slots.get_mut(category);
                if Arc::ptr_eq(&slot.list, &current) {
                    Some(core::mem::replace(&mut slot.list, next.clone()))
                } else {
                    None
                }
            });
            // The superseded list is dropped here, outside the critical section.
            if swapped.is_some() {
                return true;
            }
        }
    }
}
