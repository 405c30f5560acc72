use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};

use crate::catalog::{Orb, COMBO_LEN};

const FILLED: &str = "●";
const EMPTY: &str = "○";

pub fn orb_color(orb: Orb) -> Color {
    match orb {
        Orb::Quas => Color::Rgb(74, 144, 226),
        Orb::Wex => Color::Rgb(155, 89, 182),
        Orb::Exort => Color::Rgb(241, 196, 15),
    }
}

/// One span per slot, separated by spaces; unfilled slots are dimmed
pub fn orb_slots(orbs: &[Orb]) -> Vec<Span<'static>> {
    let empty_style = Style::default().fg(Color::Rgb(44, 44, 44));

    let mut spans = Vec::with_capacity(COMBO_LEN * 2);
    for slot in 0..COMBO_LEN {
        if slot > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(match orbs.get(slot) {
            Some(&orb) => Span::styled(
                FILLED,
                Style::default()
                    .fg(orb_color(orb))
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(EMPTY, empty_style),
        });
    }
    spans
}
