pub mod countdown;
pub mod energy_bar;
pub mod hud;
pub mod menu;
pub mod play_area;
pub mod summary_screen;
