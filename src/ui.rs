pub mod orbs;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    round::Verdict,
    session::{Mode, SessionState, TimedPhase},
};

const HORIZONTAL_PADDING: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Show the expected combo after a wrong answer
    pub reveal_answers: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            reveal_answers: true,
        }
    }
}

/// Read-only projection of the session for drawing
pub struct TrainerView<'a> {
    pub state: &'a SessionState,
    pub options: ViewOptions,
}

impl<'a> TrainerView<'a> {
    pub fn new(state: &'a SessionState, options: ViewOptions) -> Self {
        Self { state, options }
    }
}

/// Plain-text rendering of the session, one line per row
pub fn render_text(state: &SessionState, options: &ViewOptions) -> String {
    lines(state, options)
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .join("\n")
}

fn title(mode: Mode) -> &'static str {
    match mode {
        Mode::Menu => "INVOKER ABILITY TRAINER",
        Mode::Timed(TimedPhase::Running) => "TIMER MODE",
        Mode::Timed(TimedPhase::Over) => "TIMER MODE - GAME OVER!",
        Mode::Freeform => "FREEFORM MODE",
    }
}

/// Styled body lines for the current mode
pub fn lines(state: &SessionState, options: &ViewOptions) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let title_style = Style::default()
        .patch(bold_style)
        .fg(Color::Rgb(255, 107, 53));
    let hint_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC);

    let mut out = vec![
        Line::from(Span::styled(title(state.mode), title_style)),
        Line::default(),
    ];

    match state.mode {
        Mode::Menu => {
            out.push(Line::from("Choose your training mode:"));
            out.push(Line::default());
            out.push(Line::from("1. Timer Mode - 15 seconds"));
            out.push(Line::from("2. Timer Mode - 30 seconds"));
            out.push(Line::from("3. Freeform Mode"));
            out.push(Line::default());
            out.push(Line::from(Span::styled(
                "Press 'q' or Ctrl+C to quit",
                hint_style,
            )));
        }
        Mode::Timed(TimedPhase::Over) => {
            let stats = &state.stats;
            if let Some(timer) = state.timer {
                out.push(Line::from(format!("Time: {timer}")));
            }
            out.push(Line::from(Span::styled(
                format!("Final Score: {}", stats.score),
                bold_style,
            )));
            out.push(Line::from(format!("Total Attempts: {}", stats.total_attempts)));
            if stats.total_attempts > 0 {
                out.push(Line::from(format!("Accuracy: {:.1}%", stats.accuracy())));
            }
            out.push(Line::default());
            out.push(Line::from(Span::styled(
                "Press R to return to menu",
                hint_style,
            )));
        }
        Mode::Timed(TimedPhase::Running) => {
            let secs = state
                .time_remaining
                .map(|d| d.as_secs_f64())
                .unwrap_or_default();
            out.push(Line::from(format!("Time Left: {secs:.1}s")));
            out.push(Line::from(format!("Score: {}", state.stats.score)));
            out.push(Line::default());
            round_body(state, options, &mut out);
            out.push(Line::from(Span::styled(
                "Press R to invoke spell, ESC to return to menu",
                hint_style,
            )));
        }
        Mode::Freeform => {
            let stats = &state.stats;
            let mut score = format!("Score: {}/{}", stats.correct_answers, stats.total_attempts);
            if stats.total_attempts > 0 {
                score.push_str(&format!(" ({:.1}%)", stats.accuracy()));
            }
            out.push(Line::from(score));
            out.push(Line::default());
            round_body(state, options, &mut out);
            out.push(Line::from(Span::styled(
                "Press R to invoke spell, ESC to return to menu",
                hint_style,
            )));
        }
    }

    out
}

fn round_body(state: &SessionState, options: &ViewOptions, out: &mut Vec<Line<'static>>) {
    let ability_style = Style::default()
        .fg(Color::Rgb(78, 205, 196))
        .add_modifier(Modifier::BOLD);

    out.push(Line::from("Current Ability:"));
    out.push(Line::from(Span::styled(
        state.challenge.clone().unwrap_or_default(),
        ability_style,
    )));
    out.push(Line::default());

    let mut orb_line = vec![Span::raw("Orbs: ")];
    orb_line.extend(orbs::orb_slots(state.buffer.orbs()));
    out.push(Line::from(orb_line));
    out.push(Line::default());

    out.push(Line::from(vec![
        Span::raw("Enter combination (Q/W/E): "),
        Span::styled(
            state.buffer.to_string().to_uppercase(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
    ]));
    out.push(Line::default());

    if let Some(verdict) = &state.last_result {
        out.push(verdict_line(verdict, options));
        out.push(Line::default());
    }
}

fn verdict_line(verdict: &Verdict, options: &ViewOptions) -> Line<'static> {
    let expected = verdict.expected.to_string().to_uppercase();
    let entered = verdict.entered.to_uppercase();

    if verdict.is_correct() {
        Line::from(Span::styled(
            format!("✓ Correct! {} = {expected}", verdict.challenge),
            Style::default().fg(Color::Rgb(144, 238, 144)),
        ))
    } else {
        let message = if options.reveal_answers {
            format!(
                "✗ Wrong! {} = {expected} (you entered: {entered})",
                verdict.challenge
            )
        } else {
            format!("✗ Wrong! (you entered: {entered})")
        };
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Rgb(255, 107, 107)),
        ))
    }
}

impl Widget for &TrainerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let body = lines(self.state, &self.options);

        let content_width = body
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref().width())
                    .sum::<usize>()
            })
            .max()
            .unwrap_or_default() as u16;
        let panel_width = (content_width + HORIZONTAL_PADDING * 2 + 2).min(area.width);
        let panel_height = (body.len() as u16 + 4).min(area.height);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(panel_height),
                Constraint::Fill(1),
            ])
            .split(area);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(panel_width),
                Constraint::Fill(1),
            ])
            .split(rows[1]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .padding(ratatui::widgets::Padding::new(
                HORIZONTAL_PADDING,
                HORIZONTAL_PADDING,
                1,
                1,
            ));

        Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .render(cols[1], buf);
    }
}
