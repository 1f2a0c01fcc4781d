// src/ui.rs
use iced::Color;
use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub banner_bg: Color,
    pub banner_fg: Color,
    pub card_bg: Color,
    pub accent_fg: Color,
    pub footer_bg: Color,
    pub footer_fg: Color,
    pub button_hover_bg: Color,
}

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.08, 0.07, 0.11),
    fg: Color::from_rgb(0.95, 0.94, 0.98),
    muted_fg: Color::from_rgb(0.62, 0.60, 0.70),
    banner_bg: Color::from_rgb(0.18, 0.13, 0.30),
    banner_fg: Color::from_rgb(0.91, 0.85, 1.0),
    card_bg: Color::from_rgb(0.14, 0.12, 0.20),
    accent_fg: Color::from_rgb(0.85, 0.72, 0.35),
    footer_bg: Color::from_rgb(0.26, 0.19, 0.42), // #432f6b
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    button_hover_bg: Color::from_rgb(0.35, 0.26, 0.55),
});

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(1.0, 1.0, 1.0),
    fg: Color::from_rgb(0.17, 0.24, 0.31), // #2c3e50
    muted_fg: Color::from_rgb(0.45, 0.50, 0.55),
    banner_bg: Color::from_rgb(0.93, 0.90, 0.98),
    banner_fg: Color::from_rgb(0.29, 0.20, 0.48),
    card_bg: Color::from_rgb(0.94, 0.95, 0.96), // #f0f2f6
    accent_fg: Color::from_rgb(0.72, 0.53, 0.04),
    footer_bg: Color::from_rgb(0.42, 0.31, 0.64), // #6a4fa3
    footer_fg: Color::from_rgb(1.0, 1.0, 1.0),
    button_hover_bg: Color::from_rgb(0.33, 0.23, 0.52),
});
