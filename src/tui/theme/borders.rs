use ratatui::symbols::border;

/// Rounded corners everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderStyle;

impl BorderStyle {
    pub fn to_border_set() -> border::Set<'static> {
        border::ROUNDED
    }
}
