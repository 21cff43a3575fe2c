use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 129, g: 199, b: 245 };
pub const SECONDARY: Color = Color::TrueColor { r: 160, g: 130, b: 230 };
pub const ACCENT: Color = Color::TrueColor { r: 250, g: 200, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 210 };

pub const IPV4_ADDR: Color = Color::TrueColor { r: 120, g: 220, b: 140 };
pub const PORT_OPEN: Color = Color::TrueColor { r: 120, g: 220, b: 140 };
