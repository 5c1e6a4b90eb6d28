pub mod keyboard;
pub mod orientation;
pub mod pointer;

pub use keyboard::wire_global_keydown;
pub use orientation::{request_sensor_permission, wire_device_orientation};
pub use pointer::{wire_pointer_handlers, PointerWiring};
