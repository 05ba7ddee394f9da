use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use std::{thread, time::Duration};

// Show a message in a popup; a zero duration waits for a key press
pub fn show_message<B: Backend>(
    terminal: &mut Terminal<B>,
    message: &str,
    color: Color,
    duration_ms: u64,
) -> Result<()> {
    terminal.draw(|f| {
        let area = centered_rect(60, 20, f.size());
        f.render_widget(Clear, area);

        let message_text = if duration_ms == 0 {
            format!("{}\n\nPress any key to continue...", message)
        } else {
            message.to_string()
        };

        let message_box = Paragraph::new(message_text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).title(" vidplate "))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        f.render_widget(message_box, area);
    })?;

    if duration_ms > 0 {
        // Sleep but still be interruptible by key press
        for _ in 0..duration_ms / 100 {
            thread::sleep(Duration::from_millis(100));
            if event::poll(Duration::from_millis(0))? {
                let _ = event::read()?;
                break;
            }
        }
    } else {
        wait_for_key()?;
    }

    Ok(())
}

fn wait_for_key() -> Result<KeyCode> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key.code);
            }
        }
    }
}

/// Ask a yes/no question in a popup; only `y` confirms
pub fn confirm<B: Backend>(terminal: &mut Terminal<B>, question: &str) -> Result<bool> {
    terminal.draw(|f| {
        let area = centered_rect(50, 20, f.size());
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(question.to_string()),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Green)),
                Span::raw(": yes   "),
                Span::styled("n/Esc", Style::default().fg(Color::Red)),
                Span::raw(": no"),
            ]),
        ];
        let popup = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(" Confirm "))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });
        f.render_widget(popup, area);
    })?;

    Ok(matches!(wait_for_key()?, KeyCode::Char('y') | KeyCode::Char('Y')))
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
