pub mod area;
pub mod errors;
pub mod handle;
pub mod host;
pub mod wayland;
