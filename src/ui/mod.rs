// Presentation Layer

pub mod app;
pub mod state;

use egui::Color32;

pub use app::{AuthentiApp, WINDOW_TITLE};
pub use state::{ResultView, StatusKind, StatusLine, ViewState};

pub const BACKGROUND: Color32 = Color32::from_rgb(0xf0, 0xf0, 0xf0);
pub const FOREGROUND: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);
pub const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 128, 0);
pub const ERROR_RED: Color32 = Color32::from_rgb(255, 0, 0);
pub const MUTED_GRAY: Color32 = Color32::from_rgb(128, 128, 128);
