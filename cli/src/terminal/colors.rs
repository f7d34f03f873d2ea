use colored::Color;

pub const TEXT_DEFAULT: Color = Color::White;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const MATCHED: Color = Color::BrightYellow;
pub const INVALID: Color = Color::BrightRed;
