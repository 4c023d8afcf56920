pub mod button;
pub mod text_edit;
