use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use hilo::{
    feedback::FeedbackHook,
    game::Feedback,
    storage::KeyValueStore,
    util::{format_best_score, last_played_text},
};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const INPUT_WIDTH: u16 = 30;

fn feedback_color(feedback: Option<Feedback>) -> Color {
    match feedback {
        None => Color::Gray,
        Some(Feedback::Higher) => Color::Red,
        Some(Feedback::Lower) => Color::Blue,
        Some(Feedback::Correct) => Color::Green,
    }
}

fn feedback_symbol(feedback: Option<Feedback>) -> &'static str {
    match feedback {
        None => "",
        Some(Feedback::Higher) => "↑ ",
        Some(Feedback::Lower) => "↓ ",
        Some(Feedback::Correct) => "✓ ",
    }
}

/// Horizontally centre a box of `width` inside `area`
fn centered_columns(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let columns = centered_columns(width, area);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..columns
    }
}

impl<S: KeyValueStore, H: FeedbackHook> Widget for &App<S, H> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let game = &session.state;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(" hilo ")
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        outer.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),    // padding
                Constraint::Length(1), // range prompt
                Constraint::Length(1), // attempts
                Constraint::Length(1), // padding
                Constraint::Length(1), // feedback
                Constraint::Length(1), // padding
                Constraint::Length(3), // input box
                Constraint::Length(1), // input error
                Constraint::Min(0),    // padding
                Constraint::Length(1), // stats
                Constraint::Length(1), // instructions
            ])
            .split(inner);

        Paragraph::new(format!(
            "Guess a number between {} and {}",
            game.min_range, game.max_range
        ))
        .style(bold_style)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        let last_guess = game
            .last_guess
            .map(|g| format!("   last guess: {}", g))
            .unwrap_or_default();
        Paragraph::new(format!("attempts: {}{}", game.attempts, last_guess))
            .style(dim_style)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let mut feedback_style = Style::default()
            .patch(bold_style)
            .fg(feedback_color(game.feedback));
        if session.is_pulsing() {
            feedback_style = feedback_style.add_modifier(Modifier::REVERSED);
        }
        Paragraph::new(Span::styled(
            format!(
                "{}{}",
                feedback_symbol(game.feedback),
                Feedback::message(game.feedback)
            ),
            feedback_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        let input_enabled = self.state == AppState::Guessing && game.is_playing();
        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(" your guess ")
            .border_style(if input_enabled {
                Style::default().fg(Color::Cyan)
            } else {
                dim_style
            });
        let cursor = if input_enabled { "_" } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled(session.input.clone(), bold_style),
            Span::styled(cursor, Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(input_block)
        .alignment(Alignment::Center)
        .render(centered_columns(INPUT_WIDTH, chunks[6]), buf);

        if let Some(error) = &session.input_error {
            Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).patch(italic_style),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[7], buf);
        }

        let stats = &session.stats;
        Paragraph::new(format!(
            "games played: {}   best: {}   last win: {}",
            stats.games_played,
            format_best_score(stats.best_score),
            last_played_text(stats.last_played_date, Utc::now())
        ))
        .style(Style::default().fg(Color::Magenta))
        .alignment(Alignment::Center)
        .render(chunks[9], buf);

        Paragraph::new("(enter) guess   (ctrl+n) new game   (esc) quit")
            .style(italic_style.patch(dim_style))
            .alignment(Alignment::Center)
            .render(chunks[10], buf);
    }
}

pub fn render_win_dialog<S: KeyValueStore, H: FeedbackHook>(app: &App<S, H>, f: &mut Frame) {
    let game = &app.session.state;
    let stats = &app.session.stats;
    let area = centered_rect(40, 9, f.area());

    let attempts_word = if game.attempts == 1 { "attempt" } else { "attempts" };
    let new_best = stats.best_score == Some(game.attempts);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("The number was {}", game.target_number),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Found in {} {}", game.attempts, attempts_word)),
        Line::from(format!("Best score: {}", format_best_score(stats.best_score))),
    ];
    if new_best {
        lines.push(Line::from(Span::styled(
            "New best!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(n)ew game   (q)uit",
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    )));

    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Correct! ")
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}
