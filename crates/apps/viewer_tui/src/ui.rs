//! Presentation shell: borders, colors and layout around a [`FrameView`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use runtime::FrameView;

const TITLE_FG: Color = Color::Rgb(0xF8, 0xF8, 0xF2);
const TITLE_BG: Color = Color::Rgb(0x3A, 0x86, 0xFF);
const MAP_BORDER: Color = Color::Rgb(0x94, 0xE4, 0x58);
const INFO_BORDER: Color = Color::Rgb(0x5B, 0xE3, 0xFF);
const ERROR_FG: Color = Color::Rgb(0xFF, 0x5F, 0x5F);
const HELP_FG: Color = Color::Indexed(240);

pub fn draw(f: &mut Frame<'_>, view: &FrameView) {
    let area = f.area();
    if !view.ready && !view.editing {
        f.render_widget(Paragraph::new(view.canvas.as_str()), area);
        return;
    }

    let (cols, rows) = text_size(&view.canvas);
    let info_rows: u16 = if view.detail.is_some() { 2 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(rows.saturating_add(2)),
            Constraint::Length(info_rows + 2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", view.title),
        Style::default()
            .fg(TITLE_FG)
            .bg(TITLE_BG)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    let map_area = Rect {
        width: cols.saturating_add(2).min(chunks[1].width),
        ..chunks[1]
    };
    let map = Paragraph::new(view.canvas.as_str()).block(rounded(MAP_BORDER));
    f.render_widget(map, map_area);

    let status_style = if view.failed && !view.editing {
        Style::default().fg(ERROR_FG)
    } else {
        Style::default()
    };
    let mut info = vec![Line::from(Span::styled(view.status.as_str(), status_style))];
    if let Some(detail) = &view.detail {
        info.push(Line::from(Span::styled(
            detail.as_str(),
            Style::default().fg(ERROR_FG),
        )));
    }
    f.render_widget(Paragraph::new(info).block(rounded(INFO_BORDER)), chunks[2]);

    let footer = Paragraph::new(Span::styled(
        view.footer.as_str(),
        Style::default().fg(HELP_FG),
    ));
    f.render_widget(footer, chunks[3]);
}

fn rounded(color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn text_size(text: &str) -> (u16, u16) {
    let rows = text.lines().count();
    let cols = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    (saturate(cols), saturate(rows))
}

fn saturate(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use runtime::{CALCULATING, FrameView, TITLE};

    use super::{draw, text_size};

    fn screen(buffer: &Buffer) -> Vec<String> {
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn render(view: &FrameView, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|f| draw(f, view)).expect("draw");
        screen(terminal.backend().buffer())
    }

    fn view(canvas: &str) -> FrameView {
        FrameView {
            ready: true,
            title: TITLE,
            canvas: canvas.to_string(),
            status: "File: demo.geojson".to_string(),
            detail: None,
            footer: "q: quit | Loaded".to_string(),
            editing: false,
            failed: false,
        }
    }

    #[test]
    fn frames_canvas_between_title_and_footer() {
        let lines = render(&view("*  \n * \n  *"), 30, 12);
        assert!(lines[0].contains(TITLE));
        assert!(lines[1].starts_with('╭'));
        assert!(lines[2].starts_with("│*  │"));
        assert!(lines[4].starts_with("│  *│"));
        assert!(lines[5].starts_with('╰'));
        assert!(lines[7].contains("File: demo.geojson"));
        assert!(lines[9].starts_with("q: quit | Loaded"));
    }

    #[test]
    fn waiting_for_size_shows_only_message() {
        let mut v = view(CALCULATING);
        v.ready = false;
        let lines = render(&v, 30, 4);
        assert!(lines[0].starts_with(CALCULATING));
        assert!(lines[1].trim().is_empty());
    }

    #[test]
    fn edit_error_gets_its_own_line() {
        let mut v = view("No geometry yet");
        v.editing = true;
        v.status = "Path: _".to_string();
        v.detail = Some("path must not be empty".to_string());
        let lines = render(&v, 40, 10);
        assert!(lines[5].contains("Path: _"));
        assert!(lines[6].contains("path must not be empty"));
    }

    #[test]
    fn measures_text_in_chars() {
        assert_eq!(text_size("ab\nабв\n"), (3, 2));
        assert_eq!(text_size(""), (0, 0));
    }
}
