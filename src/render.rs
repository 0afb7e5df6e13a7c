//! Terminal-style rendering of the engine state.
//!
//! Nothing here mutates the engine. The frame callback passes in a borrowed
//! `Engine` plus the shell's own view state.

use idle_sourdough::economy::logic::{format_number, stand_multiplier};
use idle_sourdough::economy::snapshot::Snapshot;
use idle_sourdough::economy::state::Counter;
use idle_sourdough::economy::GainSource;
use idle_sourdough::{Engine, Notification, ProducerKind, PurchaseKind, ResourceKind};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::input::{help_entries, View};

/// Lines of the notification log shown at once.
const LOG_LINES: usize = 20;

/// Shell-side state the renderer needs besides the engine.
pub struct Screen<'a> {
    pub view: View,
    pub leaderboard: &'a [Snapshot],
    pub status: Option<&'a str>,
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

pub fn render(f: &mut Frame, engine: &Engine, screen: &Screen) {
    let size = f.area();
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(size);

    render_title(f, engine, main_chunks[0]);

    let direction = if is_narrow_layout(size.width) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let content = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(9)])
        .split(content[0]);

    render_counters(f, engine, left[0]);
    render_shop(f, engine, left[1]);
    match screen.view {
        View::Log => render_log(f, engine, content[1]),
        View::Leaderboard => render_leaderboard(f, engine, screen.leaderboard, content[1]),
    }
    render_help(f, screen, main_chunks[2]);
}

fn render_title(f: &mut Frame, engine: &Engine, area: Rect) {
    let state = engine.state();
    let title = Line::from(vec![
        Span::styled(
            "Idle Sourdough  ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} points", format_number(state.points)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("  (all-time {})", format_number(state.all_time_points)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let widget = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_counters(f: &mut Frame, engine: &Engine, area: Rect) {
    let state = engine.state();
    let mut lines = vec![Line::from(format!("Starter level  {}", state.starter_level))];
    for kind in ProducerKind::all() {
        lines.push(Line::from(format!(
            "{:<14} {}",
            kind.name(),
            format_number(state.producer(*kind))
        )));
    }
    for kind in ResourceKind::all() {
        lines.push(Line::from(format!(
            "{:<14} {}",
            kind.name(),
            format_number(state.resource(*kind))
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("Stand bonus    x{}", stand_multiplier(state)),
        Style::default().fg(Color::DarkGray),
    )));
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Bakery "),
    );
    f.render_widget(widget, area);
}

fn render_shop(f: &mut Frame, engine: &Engine, area: Rect) {
    let items: Vec<ListItem> = PurchaseKind::all()
        .iter()
        .map(|kind| {
            let style = if engine.can_afford(*kind) {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(
                shop_line(*kind, &engine.quote(*kind)),
                style,
            )))
        })
        .collect();
    let widget = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Shop "),
    );
    f.render_widget(widget, area);
}

fn render_log(f: &mut Frame, engine: &Engine, area: Rect) {
    let entries: Vec<&Notification> = engine.notifications().collect();
    let skip = entries.len().saturating_sub(LOG_LINES);
    let lines: Vec<Line> = entries
        .into_iter()
        .skip(skip)
        .map(|n| Line::from(describe(n)))
        .collect();
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_leaderboard(f: &mut Frame, engine: &Engine, board: &[Snapshot], area: Rect) {
    let me = engine.state().identity.as_ref().map(|i| i.player_id);
    let items: Vec<ListItem> = if board.is_empty() {
        vec![ListItem::new("No saved bakeries yet. Press S to save.")]
    } else {
        board
            .iter()
            .enumerate()
            .map(|(rank, snap)| {
                let style = if snap.player_id.is_some() && snap.player_id == me {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(leaderboard_line(rank, snap), style))
            })
            .collect()
    };
    let widget = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Leaderboard "),
    );
    f.render_widget(widget, area);
}

fn render_help(f: &mut Frame, screen: &Screen, area: Rect) {
    let mut spans = Vec::new();
    for (key, label) in help_entries(screen.view) {
        spans.push(Span::styled(
            format!("[{key}]"),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    if let Some(status) = screen.status {
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}

/// One shop row, e.g. `[6] Braid Twists: 2 Loaves + 100 Points`.
pub fn shop_line(kind: PurchaseKind, quote: &[(Counter, u64)]) -> String {
    let price: Vec<String> = quote
        .iter()
        .map(|(counter, amount)| format!("{} {}", format_number(*amount), counter.name()))
        .collect();
    format!("[{}] {}: {}", kind.key(), kind.name(), price.join(" + "))
}

pub fn leaderboard_line(rank: usize, snap: &Snapshot) -> String {
    let name = snap.username.as_deref().unwrap_or("anonymous");
    format!(
        "{:>2}. {:<12} {}",
        rank + 1,
        name,
        format_number(snap.all_time_points)
    )
}

/// Log text for a notification.
pub fn describe(notification: &Notification) -> String {
    match notification {
        Notification::Gain {
            source: GainSource::Feed,
            amount,
            ..
        } => format!("Fed the starter: +{amount}"),
        Notification::Gain {
            source: GainSource::Producer(producer),
            counter,
            amount,
        } => format!(
            "{}s made +{} {}",
            producer.name(),
            format_number(*amount),
            counter.name()
        ),
        Notification::Purchased { kind } => format!("{} done", kind.name()),
        Notification::Declined { kind } => format!("Can't afford: {}", kind.name()),
        Notification::Saved { player_id } => format!("Saved as player #{player_id}"),
        Notification::SaveFailed { message } => format!("Save failed: {message}"),
        Notification::Restored {
            player_id: Some(id),
        } => format!("Restored player #{id}"),
        Notification::Restored { player_id: None } => "Restored a saved game".to_string(),
    }
}
