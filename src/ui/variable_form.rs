use crate::error::Result;
use crate::prompt::VariablePrompt;
use crate::ui::common::centered_rect;
use crate::ui::text_field::TextField;
use crate::variables::{placeholder, Assignment};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

/// One labeled input per variable name
pub struct VariableForm {
    names: Vec<String>,
    inputs: Vec<TextField>,
    focused: usize,
}

impl VariableForm {
    pub fn new(names: &[String]) -> Self {
        Self {
            names: names.to_vec(),
            inputs: names.iter().map(|_| TextField::single_line()).collect(),
            focused: 0,
        }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let last = self.inputs.len().saturating_sub(1);
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FormAction::Submit
            }
            KeyCode::Enter if self.focused >= last => FormAction::Submit,
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.focused = if self.focused >= last { 0 } else { self.focused + 1 };
                FormAction::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 { last } else { self.focused - 1 };
                FormAction::Continue
            }
            code => {
                if let Some(input) = self.inputs.get_mut(self.focused) {
                    input.handle_key(code, key.modifiers);
                }
                FormAction::Continue
            }
        }
    }

    /// Values as typed; untouched inputs give empty strings
    pub fn assignment(&self) -> Assignment {
        self.names
            .iter()
            .zip(&self.inputs)
            .map(|(name, input)| (name.clone(), input.text().to_string()))
            .collect()
    }

    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let height = (self.names.len() as u16 * 3 + 4).min(area.height);
        let popup = centered_rect(70, 100, area);
        let popup = Rect {
            y: popup.y + (popup.height.saturating_sub(height)) / 2,
            height,
            ..popup
        };
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Fill in variables ")
            .style(Style::default().fg(Color::White));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let mut constraints: Vec<Constraint> =
            self.names.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, (name, input)) in self.names.iter().zip(&self.inputs).enumerate() {
            let active = i == self.focused;
            let border = if active { Color::Cyan } else { Color::Blue };
            let label = format!(" {}: ", placeholder(name));
            let field = Paragraph::new(input.text()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(Style::default().fg(border)),
            );
            f.render_widget(field, rows[i]);

            if active {
                let (_, column) = input.cursor_position();
                let max_x = rows[i].width.saturating_sub(2);
                f.set_cursor(rows[i].x + 1 + (column as u16).min(max_x), rows[i].y + 1);
            }
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": next  "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" on last / Ctrl+S: apply  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": cancel"),
        ]))
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, rows[self.names.len()]);
    }
}

/// Runs the variable form modally on the dashboard's terminal
pub struct FormPrompt<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
}

impl<'t, B: Backend> FormPrompt<'t, B> {
    pub fn new(terminal: &'t mut Terminal<B>) -> Self {
        Self { terminal }
    }
}

impl<B: Backend> VariablePrompt for FormPrompt<'_, B> {
    fn collect(&mut self, names: &[String]) -> Result<Option<Assignment>> {
        let mut form = VariableForm::new(names);
        if names.is_empty() {
            return Ok(Some(form.assignment()));
        }

        loop {
            self.terminal.draw(|f| {
                let area = f.size();
                form.draw(f, area);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match form.handle_key(key) {
                    FormAction::Continue => {}
                    FormAction::Submit => return Ok(Some(form.assignment())),
                    FormAction::Cancel => return Ok(None),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut VariableForm, s: &str) {
        for c in s.chars() {
            assert_eq!(form.handle_key(key(KeyCode::Char(c))), FormAction::Continue);
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn enter_advances_then_submits() {
        let mut form = VariableForm::new(&names(&["game", "part"]));
        type_str(&mut form, "Celeste");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Continue);
        assert_eq!(form.focused(), 1);
        type_str(&mut form, "2");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);

        let a = form.assignment();
        assert_eq!(a["game"], "Celeste");
        assert_eq!(a["part"], "2");
    }

    #[test]
    fn blank_inputs_become_empty_values() {
        let mut form = VariableForm::new(&names(&["a", "b"]));
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            FormAction::Submit
        );
        let a = form.assignment();
        assert_eq!(a.len(), 2);
        assert!(a.values().all(|v| v.is_empty()));
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = VariableForm::new(&names(&["a", "b", "c"]));
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focused(), 2);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focused(), 0);
    }

    #[test]
    fn escape_cancels() {
        let mut form = VariableForm::new(&names(&["a"]));
        type_str(&mut form, "typed");
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }
}
