//! Wayland protocol implementations.

pub mod notification_area;
