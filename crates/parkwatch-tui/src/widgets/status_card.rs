//! One dashboard value in a bordered card: a title and the value text,
//! centered.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

use crate::theme;

pub struct StatusCard<'a> {
    title: &'a str,
    value: &'a str,
    accent: Color,
    highlighted: bool,
}

impl<'a> StatusCard<'a> {
    pub fn new(title: &'a str, value: &'a str, accent: Color) -> Self {
        Self {
            title,
            value,
            accent,
            highlighted: false,
        }
    }

    /// Draw the border in the focus color (used right after a change).
    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }
}

impl Widget for StatusCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.highlighted {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let inner = block.inner(area);
        block.render(area, buf);

        // Vertically center a single line.
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        Paragraph::new(Line::from(self.value))
            .style(theme::card_value(self.accent))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }
}
