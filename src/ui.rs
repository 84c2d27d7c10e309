use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::app_state::AppState;
use crate::transcript::{EntryBody, Role};
use crate::ui_components::wrapped_height;

const HELP_TEXT: &[&str] = &[
    "Enter / Ctrl+S   send the message",
    "Tab              switch between input and options",
    "Up / Down        choose an option",
    "Enter (options)  pick the highlighted option",
    "PageUp/PageDown  scroll the conversation",
    "Esc              back to input",
    "Ctrl+C           quit",
    "F1               toggle this help",
];

pub fn draw_ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Transcript
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    render_transcript(f, app, chunks[0]);
    f.render_widget(&app.textarea, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.show_help {
        render_help(f);
    }
}

fn role_style(role: Role) -> (Style, &'static str) {
    match role {
        Role::User => (Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD), "You"),
        Role::Robot => (Style::default().fg(Color::Green).add_modifier(Modifier::BOLD), "Naavi"),
    }
}

/// One block per entry: a role header, the body, a blank separator.
pub fn transcript_lines(app: &AppState) -> Vec<Line<'static>> {
    let selected = app.selected_control();
    let mut lines = Vec::new();

    for (index, entry) in app.transcript().entries().iter().enumerate() {
        let (style, label) = role_style(entry.role);
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", entry.timestamp), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}:", label), style),
        ]));

        match &entry.body {
            EntryBody::Text(text) => {
                for line in text.lines() {
                    lines.push(Line::from(format!("  {}", line)));
                }
            }
            EntryBody::Options(options) => {
                for (i, option) in options.iter().enumerate() {
                    let is_selected = selected == Some((index, i));
                    let (marker, style) = if is_selected {
                        ("▶", Style::default().fg(Color::Black).bg(Color::Yellow))
                    } else {
                        (" ", Style::default().fg(Color::Yellow))
                    };
                    lines.push(Line::from(vec![
                        Span::raw(format!(" {} ", marker)),
                        Span::styled(format!("[{}] {}", i + 1, option), style),
                    ]));
                }
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

fn render_transcript(f: &mut Frame, app: &mut AppState, area: Rect) {
    let title = if app.widget.is_busy() {
        "Naavi ⏳"
    } else {
        "Naavi"
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let lines = transcript_lines(app);
    let content_height = wrapped_height(&lines, inner.width);
    app.transcript_view.update(content_height, inner.height);
    if app.widget.follows_bottom() {
        app.transcript_view.scroll_to_bottom();
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.transcript_view.scroll_position, 0));
    f.render_widget(paragraph, area);

    if app.transcript_view.max_scroll > 0 {
        let mut state = ScrollbarState::new(app.transcript_view.max_scroll as usize)
            .position(app.transcript_view.scroll_position as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut state,
        );
    }
}

fn render_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let status = if app.widget.is_busy() {
        "waiting for reply"
    } else {
        "ready"
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.server_url), Style::default().fg(Color::DarkGray)),
        Span::raw("| "),
        Span::styled(status, Style::default().fg(Color::Yellow)),
        Span::raw(" | F1 help"),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(60, 50, f.area());
    let lines: Vec<Line> = HELP_TEXT.iter().map(|l| Line::from(*l)).collect();
    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .alignment(Alignment::Left);
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
