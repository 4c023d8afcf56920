use crate::core::event::Action;
use crate::core::pointer::{ClickOutside, PointerHub, RegionRef};
use crate::core::reducer::Reducer;
use crate::core::state::{PickerConfig, PickerState};
use crate::widgets::shared::calendar::{self, Clock, Date, DayCell, WeekStart};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

struct PickerStore {
    state: PickerState,
    clock: Box<dyn Clock>,
    week_start: WeekStart,
}

/// Owner of one picker's state. Clones share the same state.
#[derive(Clone)]
pub struct PickerHandle(Rc<RefCell<PickerStore>>);

impl PickerHandle {
    pub fn new(config: &PickerConfig, clock: impl Clock + 'static) -> Self {
        let state = PickerState::from_config(config, clock.today());
        Self(Rc::new(RefCell::new(PickerStore {
            state,
            clock: Box::new(clock),
            week_start: config.week_start,
        })))
    }

    pub fn dispatch(&self, action: Action) {
        let mut store = self.0.borrow_mut();
        let today = store.clock.today();
        debug!("picker action: {}", action.name());
        store.state = Reducer::reduce(&store.state, action, today);
    }

    pub fn state(&self) -> PickerState {
        self.0.borrow().state.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.0.borrow().state.is_visible
    }

    pub fn today(&self) -> Date {
        self.0.borrow().clock.today()
    }

    pub fn week_start(&self) -> WeekStart {
        self.0.borrow().week_start
    }
}

/// Named operations and derived values for the presentation layer.
pub struct PickerController {
    handle: PickerHandle,
    input_region: RegionRef,
    months_region: RegionRef,
    click_outside: Option<ClickOutside>,
}

impl PickerController {
    pub fn new(config: &PickerConfig, clock: impl Clock + 'static) -> Self {
        Self::from_handle(PickerHandle::new(config, clock))
    }

    pub fn from_handle(handle: PickerHandle) -> Self {
        Self {
            handle,
            input_region: RegionRef::new(),
            months_region: RegionRef::new(),
            click_outside: None,
        }
    }

    pub fn handle(&self) -> &PickerHandle {
        &self.handle
    }

    pub fn state(&self) -> PickerState {
        self.handle.state()
    }

    // ── Dispatchers ───────────────────────────────────────────────────────────

    pub fn reset(&self) {
        self.handle.dispatch(Action::Reset);
    }

    pub fn focus(&self) {
        self.handle.dispatch(Action::Focus);
    }

    pub fn blur(&self) {
        self.handle.dispatch(Action::Blur);
    }

    pub fn change_input(&self, text: impl Into<String>) {
        self.handle.dispatch(Action::ChangeInput(text.into()));
    }

    pub fn select_start(&self, date: Date) {
        self.handle.dispatch(Action::SelectDate(date));
    }

    pub fn prev_month(&self) {
        self.handle.dispatch(Action::GoPrevMonth);
    }

    pub fn next_month(&self) {
        self.handle.dispatch(Action::GoNextMonth);
    }

    // ── Derived values ────────────────────────────────────────────────────────

    pub fn month_grid(&self, month_anchor: Date) -> Vec<DayCell> {
        calendar::month_grid(month_anchor, self.handle.week_start())
    }

    pub fn first_visible_anchor(&self) -> Date {
        let today = self.handle.today();
        self.handle.0.borrow().state.first_visible_anchor(today)
    }

    pub fn week_start(&self) -> WeekStart {
        self.handle.week_start()
    }

    // ── Outside-click lifetime ────────────────────────────────────────────────

    pub fn input_region(&self) -> &RegionRef {
        &self.input_region
    }

    pub fn months_region(&self) -> &RegionRef {
        &self.months_region
    }

    /// Installs the outside-click listener. Mounting again is a no-op.
    pub fn mount(&mut self, hub: &PointerHub) {
        if self.click_outside.is_some() {
            return;
        }
        let handle = self.handle.clone();
        self.click_outside = Some(ClickOutside::install(
            hub,
            vec![self.input_region.clone(), self.months_region.clone()],
            move || handle.dispatch(Action::Blur),
        ));
        debug!("date picker mounted");
    }

    pub fn unmount(&mut self) {
        if self.click_outside.take().is_some() {
            debug!("date picker unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.click_outside.is_some()
    }
}
