pub mod core;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use core::app;
pub use core::controller;
pub use core::error;
pub use core::event;
pub use core::form_state;
pub use core::pointer;
pub use core::reducer;
pub use core::state;

pub use widgets::components::date_picker;
pub use widgets::shared::calendar;
