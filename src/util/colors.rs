use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00a78bfa);
pub const SECONDARY: Color = Color::from_u32(0x006d28d9);
pub const NEUTRAL: Color = Color::from_u32(0x00525252);
pub const TEXT: Color = Color::from_u32(0x00e5e5e5);
pub const BACKGROUND: Color = Color::from_u32(0x000a0a0a);
pub const ERROR: Color = Color::from_u32(0x00ef4444);
