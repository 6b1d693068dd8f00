//! Terminal rendering: form above the post list, behind a loading boundary

use ratatui::{prelude::*, widgets::*};

use crate::messages::ui_events::InputMode;
use crate::messages::{PushStatus, RenderState};
use crate::models::Post;

/// Draw the whole screen
pub fn draw(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    if state.loaded {
        draw_board(f, state, chunks[0]);
    } else {
        draw_loading(f, state, chunks[0]);
    }

    draw_status_bar(f, state, chunks[1]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_board(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Error line
            Constraint::Length(3), // Input + submit
            Constraint::Min(0),    // Posts
        ])
        .split(area);

    draw_error(f, state, chunks[0]);
    draw_form(f, state, chunks[1]);
    draw_post_list(f, state, chunks[2]);
}

fn draw_loading(f: &mut Frame, state: &RenderState, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Loading posts...", Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            state.server_url.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let loading = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" postboard "));
    f.render_widget(loading, area);
}

fn draw_error(f: &mut Frame, state: &RenderState, area: Rect) {
    let error = Paragraph::new(state.error.as_str()).style(Style::default().fg(Color::Red));
    f.render_widget(error, area);
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let input_area = chunks[0];
    let (scroll, column) = input_view(
        &state.input,
        state.cursor_position,
        input_area.width.saturating_sub(2),
    );

    let input = if state.input.is_empty() && !editing {
        Paragraph::new(Span::styled("Message", Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(state.input.as_str()).scroll((0, scroll))
    };
    let input = input.block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(input, chunks[0]);

    let button_style = if state.sending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White).bg(Color::Cyan).bold()
    };
    let button = Paragraph::new(Span::styled(" Submit ", button_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, chunks[1]);

    // Cursor
    if editing {
        let max_x = input_area.x.saturating_add(input_area.width.saturating_sub(2));
        let cursor_x = input_area.x.saturating_add(1).saturating_add(column).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, input_area.y.saturating_add(1)));
    }
}

/// Horizontal scroll and cursor column of the input box, both in cells.
///
/// The text scrolls just far enough to keep the cursor inside `width`.
fn input_view(input: &str, cursor: usize, width: u16) -> (u16, u16) {
    let before = input.get(..cursor).unwrap_or(input);
    let column = u16::try_from(Span::raw(before).width()).unwrap_or(u16::MAX);
    let scroll = column.saturating_sub(width.saturating_sub(1));
    (scroll, column - scroll)
}

/// One list entry: the message, then when it was posted
pub fn post_item(post: &Post) -> ListItem<'static> {
    ListItem::new(vec![
        Line::from(Span::styled(
            post.message.clone(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("Posted at {}", post.posted_at_iso()),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn draw_post_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .posts
        .iter()
        .skip(state.list_scroll as usize)
        .map(post_item)
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Posts ({}) ", state.posts.len())),
    );
    f.render_widget(list, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if !state.loaded {
        " q:quit "
    } else if state.sending {
        " Sending... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | Enter:submit | ←/→:move | ↑/↓:scroll "
    } else {
        " e:edit | s:submit | ↑/↓:scroll | ?:help | q:quit "
    };

    let (push, push_color) = match state.push_status {
        PushStatus::Connecting => ("[..] live", Color::Yellow),
        PushStatus::Open => ("[+] live", Color::Green),
        PushStatus::Closed => ("[-] live", Color::Red),
    };

    let bar = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(push, Style::default().fg(push_color)),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 POSTBOARD - Keyboard Shortcuts

 FORM
   e / i              Edit message
   Enter / s          Submit
   Esc                Stop editing

 POSTS
   ↑ / ↓              Scroll

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
