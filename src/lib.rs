pub mod anchor;
pub mod components;
pub mod constants;
pub mod debug_log;
pub mod drag;
pub mod drivers;
pub mod event_loop;
pub mod keybindings;
pub mod menu;
pub mod persist;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
