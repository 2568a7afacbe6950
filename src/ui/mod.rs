//! UI module - layout, list windowing and painted components

pub mod components;
pub mod layout;
pub mod memo;
pub mod virtual_list;
