use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// A rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let col = col as u32;
        let row = row as u32;
        col >= self.col as u32
            && col < self.col as u32 + self.width as u32
            && row >= self.row as u32
            && row < self.row as u32 + self.height as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Drag,
    Scroll,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub col: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn press(col: u16, row: u16) -> Self {
        Self {
            kind: PointerKind::Press,
            col,
            row,
        }
    }
}

/// Shared slot holding where a piece of the widget was last drawn.
/// `None` until the first render that shows it.
#[derive(Debug, Clone, Default)]
pub struct RegionRef(Rc<Cell<Option<Rect>>>);

impl RegionRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, rect: Option<Rect>) {
        self.0.set(rect);
    }

    pub fn get(&self) -> Option<Rect> {
        self.0.get()
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.get().is_some_and(|rect| rect.contains(col, row))
    }
}

// ── PointerHub ────────────────────────────────────────────────────────────────

type Callback = Rc<RefCell<dyn FnMut(&PointerEvent)>>;

struct Listener {
    id: u64,
    callback: Callback,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Screen-wide pointer listener registry.
#[derive(Clone, Default)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&PointerEvent) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push(Listener {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });
        debug!("pointer listener {id} installed");
        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Delivers `event` to every listener registered when dispatch starts.
    /// Listeners removed mid-dispatch are skipped.
    pub fn dispatch(&self, event: &PointerEvent) {
        let snapshot: Vec<(u64, Callback)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|listener| (listener.id, Rc::clone(&listener.callback)))
            .collect();

        for (id, callback) in snapshot {
            if !self.is_registered(id) {
                continue;
            }
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (callback)(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn is_registered(&self, id: u64) -> bool {
        self.inner.borrow().listeners.iter().any(|l| l.id == id)
    }
}

/// Removes its listener from the hub when dropped.
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        if let Ok(mut inner) = hub.try_borrow_mut() {
            inner.listeners.retain(|l| l.id != self.id);
            debug!("pointer listener {} removed", self.id);
        }
    }
}

// ── ClickOutside ──────────────────────────────────────────────────────────────

/// Fires `on_outside` once for every press that lands outside all `regions`.
pub struct ClickOutside {
    _subscription: Subscription,
}

impl ClickOutside {
    pub fn install(
        hub: &PointerHub,
        regions: Vec<RegionRef>,
        mut on_outside: impl FnMut() + 'static,
    ) -> Self {
        let subscription = hub.subscribe(move |event| {
            if event.kind != PointerKind::Press {
                return;
            }
            if regions.iter().any(|r| r.contains(event.col, event.row)) {
                return;
            }
            on_outside();
        });
        Self {
            _subscription: subscription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let inner = Rc::clone(&hits);
        (hits, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(2, 3, 4, 2);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 4));
        assert!(!rect.contains(6, 4));
        assert!(!rect.contains(2, 5));
        assert!(!rect.contains(1, 3));
    }

    #[test]
    fn subscription_drop_removes_listener() {
        let hub = PointerHub::new();
        let sub = hub.subscribe(|_| {});
        assert_eq!(hub.listener_count(), 1);
        drop(sub);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn click_outside_fires_once_per_outside_press() {
        let hub = PointerHub::new();
        let region = RegionRef::new();
        region.set(Some(Rect::new(0, 0, 10, 1)));
        let (hits, on_outside) = counter();
        let _guard = ClickOutside::install(&hub, vec![region.clone()], on_outside);

        hub.dispatch(&PointerEvent::press(3, 0));
        assert_eq!(hits.get(), 0);

        hub.dispatch(&PointerEvent::press(3, 5));
        assert_eq!(hits.get(), 1);

        hub.dispatch(&PointerEvent {
            kind: PointerKind::Release,
            col: 3,
            row: 5,
        });
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unrendered_regions_count_as_outside() {
        let hub = PointerHub::new();
        let (hits, on_outside) = counter();
        let _guard = ClickOutside::install(&hub, vec![RegionRef::new()], on_outside);
        hub.dispatch(&PointerEvent::press(0, 0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn any_region_counts_as_inside() {
        let hub = PointerHub::new();
        let input = RegionRef::new();
        let months = RegionRef::new();
        input.set(Some(Rect::new(0, 0, 10, 1)));
        months.set(Some(Rect::new(0, 2, 30, 8)));
        let (hits, on_outside) = counter();
        let _guard = ClickOutside::install(&hub, vec![input, months], on_outside);

        hub.dispatch(&PointerEvent::press(20, 4));
        hub.dispatch(&PointerEvent::press(1, 0));
        assert_eq!(hits.get(), 0);
        hub.dispatch(&PointerEvent::press(20, 1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropped_guard_stops_callbacks() {
        let hub = PointerHub::new();
        let (hits, on_outside) = counter();
        let guard = ClickOutside::install(&hub, Vec::new(), on_outside);
        drop(guard);
        hub.dispatch(&PointerEvent::press(0, 0));
        assert_eq!(hits.get(), 0);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn listener_may_unsubscribe_during_dispatch() {
        let hub = PointerHub::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let sub = hub.subscribe(move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        hub.dispatch(&PointerEvent::press(0, 0));
        assert_eq!(hub.listener_count(), 0);
    }
}
