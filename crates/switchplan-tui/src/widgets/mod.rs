//! Shared widgets used across screens.

pub mod form;
pub mod script_view;
pub mod sub_tabs;
