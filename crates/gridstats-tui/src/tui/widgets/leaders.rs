// Leaders strip: one bordered card per leader.

use gridstats_core::leaders::LeaderCard;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::layout::card_areas;
use crate::tui::DashboardState;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    if state.leaders.is_empty() {
        let text = if state.leaders_loaded {
            "No leaders available"
        } else {
            "Loading leaders..."
        };
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Leaders"));
        frame.render_widget(placeholder, area);
        return;
    }

    for (card, card_area) in state
        .leaders
        .iter()
        .zip(card_areas(area, state.leaders.len()))
    {
        frame.render_widget(card_widget(card), card_area);
    }
}

fn card_widget(card: &LeaderCard) -> Paragraph<'static> {
    let lines = vec![
        Line::from(Span::styled(
            format!("{} ({})", card.player, card.team),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            card.value.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(card.title.clone()),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
