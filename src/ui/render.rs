//! UI renderer.
//!
//! Draws the input line, the message line and the visible rows of a
//! [Session]. Icons are shown as a one-cell colour swatch.

use crate::app::Session;
use crate::ui::prompt::Prompt;

use image::RgbaImage;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

const PROMPT_LABEL: &str = "fbrowse> ";
const SWATCH: &str = "\u{2588} ";
/// Pixels at or above this alpha count towards the swatch colour.
const OPAQUE_ALPHA: u8 = 128;

/// Render the whole UI for one frame.
pub fn render(frame: &mut Frame, session: &mut Session, prompt: &Prompt, icon_size: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    render_input(frame, prompt, chunks[0]);

    if let Some(message) = session.message() {
        let line = Paragraph::new(message).style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(line, chunks[1]);
    }

    render_rows(frame, session, prompt, icon_size, chunks[2]);
}

fn render_input(frame: &mut Frame, prompt: &Prompt, area: Rect) {
    let line = Line::from(vec![
        Span::styled(PROMPT_LABEL, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(prompt.input()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let width = unicode_width::UnicodeWidthStr::width(PROMPT_LABEL)
        + unicode_width::UnicodeWidthStr::width(prompt.input());
    let x = area.x + (width as u16).min(area.width.saturating_sub(1));
    frame.set_cursor_position((x, area.y));
}

/// Rows in view: a window of the visible rows that keeps the selection on screen.
fn window(total: usize, selected: usize, height: usize) -> std::ops::Range<usize> {
    if height == 0 || total == 0 {
        return 0..0;
    }
    let start = selected.saturating_sub(height - 1).min(total.saturating_sub(height));
    start..(start + height).min(total)
}

fn render_rows(frame: &mut Frame, session: &mut Session, prompt: &Prompt, icon_size: u32, area: Rect) {
    let rows = window(prompt.visible().len(), prompt.selected(), area.height as usize);
    let start = rows.start;

    let mut items = Vec::with_capacity(rows.len());
    for &row in &prompt.visible()[rows] {
        let label = session.display_value(row).unwrap_or_default();
        let swatch = session
            .icon(row, icon_size)
            .and_then(|icon| average_colour(&icon))
            .map_or_else(|| Span::raw("  "), |c| Span::styled(SWATCH, Style::default().fg(c)));
        items.push(ListItem::new(Line::from(vec![swatch, Span::raw(label)])));
    }

    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if !prompt.visible().is_empty() {
        state.select(Some(prompt.selected() - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Average colour of the opaque pixels of an icon, `None` if it has none.
pub fn average_colour(icon: &RgbaImage) -> Option<Color> {
    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for px in icon.pixels() {
        let [pr, pg, pb, pa] = px.0;
        if pa >= OPAQUE_ALPHA {
            r += u64::from(pr);
            g += u64::from(pg);
            b += u64::from(pb);
            n += 1;
        }
    }
    (n > 0).then(|| Color::Rgb((r / n) as u8, (g / n) as u8, (b / n) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn swatch_ignores_transparent_pixels() {
        let mut icon = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        icon.put_pixel(0, 0, Rgba([200, 100, 0, 255]));
        icon.put_pixel(1, 1, Rgba([100, 0, 50, 255]));
        assert_eq!(average_colour(&icon), Some(Color::Rgb(150, 50, 25)));

        let clear = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 10]));
        assert_eq!(average_colour(&clear), None);
    }

    #[test]
    fn window_follows_selection() {
        assert_eq!(window(10, 0, 4), 0..4);
        assert_eq!(window(10, 5, 4), 2..6);
        assert_eq!(window(10, 9, 4), 6..10);
        assert_eq!(window(3, 2, 10), 0..3);
        assert_eq!(window(0, 0, 5), 0..0);
        assert_eq!(window(5, 1, 0), 0..0);
    }
}
