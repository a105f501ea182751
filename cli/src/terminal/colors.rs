use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 138, g: 180, b: 248 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 203, b: 107 };
pub const SEPARATOR: Color = Color::TrueColor { r: 98, g: 104, b: 128 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 208, g: 212, b: 224 };
pub const MUTED: Color = Color::TrueColor { r: 130, g: 137, b: 160 };

pub const SUCCESS: Color = Color::TrueColor { r: 129, g: 199, b: 132 };
pub const WARNING: Color = Color::TrueColor { r: 255, g: 183, b: 77 };
pub const FAILURE: Color = Color::TrueColor { r: 239, g: 83, b: 80 };
pub const SKIPPED: Color = Color::TrueColor { r: 120, g: 124, b: 140 };
