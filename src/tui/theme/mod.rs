//! Theme configuration - Monochrome grayscale

pub mod borders;
pub mod icons;
pub mod palette;

pub use borders::BorderStyle;
pub use icons::Icons;
pub use palette::Palette;

#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    pub fn border_set(&self) -> ratatui::symbols::border::Set<'static> {
        BorderStyle::to_border_set()
    }

    /// Bordered card with a title, the frame every panel uses.
    pub fn card(&self, title: String) -> ratatui::widgets::Block<'static> {
        use ratatui::style::Style;
        use ratatui::widgets::{Block, Borders};

        Block::default()
            .borders(Borders::ALL)
            .border_set(self.border_set())
            .border_style(Style::default().fg(self.palette.border))
            .title(title)
            .title_style(Style::default().fg(self.palette.accent))
    }
}

pub fn get_theme() -> Theme {
    Theme::default()
}
