pub mod app;
pub mod controller;
pub mod error;
pub mod event;
pub mod form_state;
pub mod pointer;
pub mod reducer;
pub mod state;
pub mod value;
