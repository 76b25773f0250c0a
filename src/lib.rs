pub mod config;
pub mod error;
pub mod highlight;
pub mod input;
pub mod layout;
pub mod logger;
pub mod notes;
pub mod renderer;
pub mod screen;
pub mod session;
pub mod store;
pub mod terminal;
pub mod viewport;

// 画面レイアウト定数
pub const HEADER_HEIGHT: u16 = 2;
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const INPUT_LINE_HEIGHT: u16 = 1;
pub const UI_HEIGHT: u16 = HEADER_HEIGHT + STATUS_BAR_HEIGHT + INPUT_LINE_HEIGHT;
