use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::session::Phase;
use crate::tier::TierId;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

fn tier_color(id: TierId) -> Color {
    match id {
        TierId::Ember => Color::Yellow,
        TierId::Inferno => Color::LightRed,
        TierId::Doom => Color::Red,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        render_hud(self, chunks[0], buf);
        render_arena(self, chunks[1], buf);
        render_footer(self, chunks[2], buf);
    }
}

fn render_hud(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let tier = session.tier();

    let hud = Line::from(vec![
        Span::styled("time ", dim),
        Span::styled(format!("{:>2}s", session.time_left()), bold),
        Span::raw("   "),
        Span::styled("score ", dim),
        Span::styled(session.score().to_string(), bold),
        Span::raw("   "),
        Span::styled("combo ", dim),
        Span::styled(format!("x{}", session.combo()), bold.fg(Color::Cyan)),
        Span::raw("   "),
        Span::styled("acc ", dim),
        Span::styled(format!("{}%", session.accuracy()), bold),
        Span::raw("   "),
        Span::styled("tier ", dim),
        Span::styled(tier.id.to_string(), bold.fg(tier_color(tier.id))),
    ]);

    Paragraph::new(hud).render(area, buf);
}

fn render_arena(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let tier = session.tier();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(tier_color(tier.id)))
        .title(" arena ");
    let inner = block.inner(area);
    block.render(area, buf);

    if inner.width < 4 || inner.height < 2 {
        return;
    }

    match session.target() {
        Some(target) => {
            // Percentage coordinates mapped onto the inner cell grid;
            // the glyph cell is 3 columns wide
            let span_x = f64::from(inner.width.saturating_sub(3));
            let span_y = f64::from(inner.height.saturating_sub(1));
            let cx = inner.x + (target.x / 100.0 * span_x).round() as u16;
            let cy = inner.y + (target.y / 100.0 * span_y).round() as u16;
            buf.set_string(
                cx,
                cy,
                format!("[{}]", target.glyph),
                Style::default()
                    .fg(tier_color(tier.id))
                    .add_modifier(Modifier::BOLD),
            );
        }
        None => render_overlay(app, inner, buf),
    }
}

fn render_overlay(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("SHADOW RUSH", bold))];

    match session.phase() {
        Phase::Ended => {
            if let Some(result) = session.last_result() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "score {}  misses {}  streak {}  acc {}%",
                        result.score,
                        result.misses,
                        result.streak,
                        session.accuracy()
                    ),
                    Style::default(),
                )));
                lines.push(Line::from(Span::styled(
                    format!("tier: {}", session.tier().id),
                    Style::default().fg(tier_color(session.tier().id)),
                )));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "strike the ember node before it jumps away",
                dim,
            )));
        }
    }

    if !session.high_scores().is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("high scores", dim)));
        for (idx, entry) in session.high_scores().iter().enumerate() {
            lines.push(Line::from(Span::raw(format!(
                "{}. {:>4}  {}",
                idx + 1,
                entry.score,
                entry.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ))));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("enter to start · esc to quit", dim)));

    // Vertically center the overlay inside the arena
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height - height) / 2;
    let centered = Rect::new(area.x, top, area.width, height);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered, buf);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let hint = if app.session.is_active() {
        "press the bracketed key to strike · any other letter misses"
    } else {
        ""
    };
    Paragraph::new(Span::styled(hint, dim))
        .alignment(Alignment::Center)
        .render(area, buf);
}
