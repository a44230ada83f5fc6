// colour palettes for the tui

use crate::core::Category;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Meadow,
    Dusk,
}

impl ThemeKind {
    pub const ALL: &'static [ThemeKind] = &[Self::Dark, Self::Light, Self::Meadow, Self::Dusk];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Meadow => "meadow",
            Self::Dusk => "dusk",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

// light terminals get the light palette
pub fn detect_theme() -> ThemeKind {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeKind::Light,
        _ => ThemeKind::Dark,
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self {
                bg: Color::Rgb(22, 24, 28),
                fg: Color::Rgb(222, 224, 226),
                accent: Color::Rgb(126, 200, 140),
                border: Color::Rgb(62, 66, 74),
                selection: Color::Rgb(46, 52, 58),
                error: Color::Rgb(240, 110, 110),
                success: Color::Rgb(126, 200, 140),
                warning: Color::Rgb(240, 196, 110),
                muted: Color::Rgb(128, 134, 142),
            },
            ThemeKind::Light => Self {
                bg: Color::Rgb(250, 249, 246),
                fg: Color::Rgb(48, 52, 56),
                accent: Color::Rgb(46, 125, 70),
                border: Color::Rgb(204, 204, 198),
                selection: Color::Rgb(228, 236, 226),
                error: Color::Rgb(190, 50, 50),
                success: Color::Rgb(46, 125, 70),
                warning: Color::Rgb(176, 120, 20),
                muted: Color::Rgb(136, 138, 134),
            },
            ThemeKind::Meadow => Self {
                bg: Color::Rgb(28, 36, 30),
                fg: Color::Rgb(226, 232, 214),
                accent: Color::Rgb(168, 212, 108),
                border: Color::Rgb(70, 88, 66),
                selection: Color::Rgb(50, 64, 48),
                error: Color::Rgb(232, 120, 98),
                success: Color::Rgb(168, 212, 108),
                warning: Color::Rgb(236, 200, 96),
                muted: Color::Rgb(138, 150, 128),
            },
            ThemeKind::Dusk => Self {
                bg: Color::Rgb(32, 28, 44),
                fg: Color::Rgb(228, 220, 240),
                accent: Color::Rgb(204, 160, 232),
                border: Color::Rgb(76, 66, 98),
                selection: Color::Rgb(56, 48, 74),
                error: Color::Rgb(240, 120, 140),
                success: Color::Rgb(150, 214, 184),
                warning: Color::Rgb(244, 196, 136),
                muted: Color::Rgb(146, 136, 164),
            },
        }
    }

    // style helpers
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn category(&self, category: Category) -> Style {
        match category {
            Category::Safety => self.error().add_modifier(Modifier::BOLD),
            Category::Instruction => self.warning(),
            Category::Unclear => self.muted(),
            Category::Quiet | Category::Positive => self.success(),
        }
    }
}
