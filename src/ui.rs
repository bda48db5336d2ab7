use tuirealm::Frame;
use tuirealm::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph},
};

use crate::app::{App, Focus, Message};
use crate::board::Slot;
use crate::types::{Task, TaskStatus};

const SPINNER_FRAMES: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];
const KEY_HINTS: &str =
    " i: input  Enter/Space: move  J/K: reorder  x: delete  s: sort  t: theme  D: purge  q: quit ";

pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    app.interaction_map.clear();

    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.canvas)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_input(frame, chunks[1], app);
    render_columns(frame, chunks[2], app);
    render_footer(frame, chunks[3], app);
    render_drag_ghost(frame, app);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(theme.border))
        .title(" CYBER TASKER ")
        .title_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(inner);

    let status = Line::from(vec![
        Span::styled(" sort: ", Style::default().fg(theme.text_muted)),
        Span::styled(
            app.board.sort_mode().label(),
            Style::default().fg(theme.text),
        ),
        Span::styled("  |  ", Style::default().fg(theme.text_muted)),
        Span::styled(
            app.clock.format("%H:%M:%S").to_string(),
            Style::default().fg(theme.text),
        ),
    ]);
    frame.render_widget(Paragraph::new(status), halves[0]);

    let percent = app.board.completion_percent();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.gauge_fill).bg(theme.surface))
        .label(format!("{percent}% complete"))
        .percent(u16::from(percent));
    frame.render_widget(gauge, halves[1]);
}

fn render_input(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let theme = app.theme;
    let focused = app.focus == Focus::Input;
    let border = if focused {
        theme.border_focus
    } else {
        theme.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(border))
        .title(" NEW DIRECTIVE ")
        .title_style(Style::default().fg(theme.text_muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if app.plan_in_flight {
        let spinner = SPINNER_FRAMES[usize::from(app.pulse_phase) % SPINNER_FRAMES.len()];
        Line::from(vec![
            Span::styled(
                format!(" {spinner} decomposing goal"),
                Style::default().fg(theme.accent),
            ),
            Span::styled(": ", Style::default().fg(theme.text_muted)),
            Span::styled(app.input.clone(), Style::default().fg(theme.text_muted)),
        ])
    } else {
        let mut spans = vec![Span::styled(
            app.input.clone(),
            Style::default().fg(theme.text),
        )];
        if focused {
            spans.push(Span::styled(
                "█",
                Style::default().fg(theme.border_focus),
            ));
        } else if app.input.is_empty() {
            spans = vec![Span::styled(
                "type a task, Enter to add, Ctrl+P for an AI plan",
                Style::default().fg(theme.text_muted),
            )];
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), inner);

    app.interaction_map.register_click(area, Message::FocusInput);
}

fn render_columns(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    render_column(frame, halves[0], app, TaskStatus::Pending);
    render_column(frame, halves[1], app, TaskStatus::Completed);
}

fn render_column(frame: &mut Frame<'_>, area: Rect, app: &mut App, bucket: TaskStatus) {
    let theme = app.theme;
    let column = bucket.column_index();
    let tasks: Vec<Task> = app.board.view(bucket).into_iter().cloned().collect();
    let focused = app.focus == Focus::Board && app.focused_column == column;
    let accent = theme.column_accent(column);

    let title = match bucket {
        TaskStatus::Pending => format!(" PENDING ({}) ", tasks.len()),
        TaskStatus::Completed => format!(" COMPLETED ({}) ", tasks.len()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(if focused { accent } else { theme.border }))
        .title(title)
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The column body is the fallback drop target: releasing below the last
    // card appends to this bucket.
    app.interaction_map.register_drop_area(
        area,
        Message::FocusColumn(column),
        Slot::new(bucket, tasks.len()),
    );

    if tasks.is_empty() {
        let idle = match bucket {
            TaskStatus::Pending => "SYSTEM IDLE",
            TaskStatus::Completed => "AWAITING COMPLETION",
        };
        let vertical_pad = inner.height / 2;
        let target = Rect {
            x: inner.x,
            y: inner.y + vertical_pad,
            width: inner.width,
            height: 1.min(inner.height),
        };
        frame.render_widget(
            Paragraph::new(idle)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_muted)),
            target,
        );
        return;
    }

    let selected = app.selected_index(column);
    let hovered = app.hovered_message.clone();

    for (index, task) in tasks.iter().enumerate() {
        let row = index as u16;
        if row >= inner.height {
            break;
        }
        let card_area = Rect {
            x: inner.x,
            y: inner.y + row,
            width: inner.width,
            height: 1,
        };

        let is_selected = focused && index == selected;
        let is_hovered = hovered == Some(Message::SelectTask(column, index));
        let being_dragged = app.drag.is_some_and(|d| d.task_id == task.id);

        let mut style = Style::default().fg(match bucket {
            TaskStatus::Pending => theme.text,
            TaskStatus::Completed => theme.text_muted,
        });
        if is_selected {
            style = style.bg(theme.selected_bg).add_modifier(Modifier::BOLD);
        }
        if is_hovered {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if being_dragged {
            style = style.add_modifier(Modifier::DIM);
        }

        let marker = if is_selected { "▸ " } else { "  " };
        let check = match bucket {
            TaskStatus::Pending => "□ ",
            TaskStatus::Completed => "■ ",
        };
        let line = Line::from(vec![
            Span::styled(marker, Style::default().fg(accent)),
            Span::styled(check, Style::default().fg(accent)),
            Span::styled(task.content.clone(), style),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), card_area);

        app.interaction_map.register_card(
            card_area,
            Message::SelectTask(column, index),
            Slot::new(bucket, index),
        );
    }
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = app.theme;
    let (text, color) = match &app.footer_notice {
        Some(notice) => (notice.as_str(), theme.accent),
        None => (KEY_HINTS, theme.text_muted),
    };
    frame.render_widget(
        Paragraph::new(format!(" {text}"))
            .style(Style::default().fg(color).bg(theme.surface)),
        area,
    );
}

/// A small floating label following the pointer while a card is dragged.
fn render_drag_ghost(frame: &mut Frame<'_>, app: &App) {
    let Some(drag) = app.drag else {
        return;
    };
    let Some(task) = app.board.find(drag.task_id) else {
        return;
    };

    let frame_area = frame.area();
    let width = (task.content.chars().count() as u16 + 4)
        .min(frame_area.width.saturating_sub(1))
        .max(4);
    let (px, py) = drag.position;
    let x = (px + 1).min(frame_area.width.saturating_sub(width));
    let y = (py + 1).min(frame_area.height.saturating_sub(1));
    let ghost_area = Rect {
        x,
        y,
        width,
        height: 1,
    };

    frame.render_widget(Clear, ghost_area);
    frame.render_widget(
        Paragraph::new(format!(" {} ", task.content)).style(
            Style::default()
                .fg(app.theme.canvas)
                .bg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        ghost_area,
    );
}
