pub mod launcher_button;
pub mod play_box;
pub mod settings_box;
pub mod status_bar;
