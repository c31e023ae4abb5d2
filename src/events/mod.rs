pub mod keyboard;
pub mod panel;

pub use keyboard::wire_global_keydown;
pub use panel::wire_settings_panel;
