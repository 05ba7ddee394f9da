use crate::clipboard::{lasting_clipboard, ClipboardSink};
use crate::error::{Result, VidplateError};
use crate::models::{CopyTarget, TemplateFields, TemplateSummary};
use crate::session::{CopyOutcome, EditorSession, VariableOutcome};
use crate::storage::TemplateStore;
use crate::ui::common::{confirm, show_message};
use crate::ui::text_field::TextField;
use crate::ui::variable_form::FormPrompt;
use crate::variables::Assignment;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Name,
    Title,
    Description,
    Tags,
}

const FOCUS_ORDER: [Focus; 5] = [
    Focus::List,
    Focus::Name,
    Focus::Title,
    Focus::Description,
    Focus::Tags,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    FocusList,
    NextFocus,
    PrevFocus,
    SelectPrev,
    SelectNext,
    Load,
    SaveNew,
    Update,
    Delete,
    Clear,
    Variables,
    Copy(CopyTarget),
}

/// A message to pop up after an action
struct Notice {
    text: String,
    color: Color,
}

impl Notice {
    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Green,
        }
    }

    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::Cyan,
        }
    }
}

struct DashboardState {
    templates: Vec<TemplateSummary>,
    list_state: ListState,
    focus: Focus,
    name: TextField,
    title: TextField,
    description: TextField,
    tags: TextField,
    session: EditorSession,
    clipboard: Box<dyn ClipboardSink>,
    exiting: bool,
}

impl DashboardState {
    fn new(templates: Vec<TemplateSummary>) -> Self {
        let mut list_state = ListState::default();
        if !templates.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            templates,
            list_state,
            focus: Focus::List,
            name: TextField::single_line(),
            title: TextField::multi_line(),
            description: TextField::multi_line(),
            tags: TextField::multi_line(),
            session: EditorSession::new(),
            clipboard: lasting_clipboard(),
            exiting: false,
        }
    }

    fn refresh(&mut self, store: &TemplateStore) -> Result<()> {
        self.templates = store.list()?;
        let selected = match self.list_state.selected() {
            _ if self.templates.is_empty() => None,
            Some(i) => Some(i.min(self.templates.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
        Ok(())
    }

    /// Push the edit buffers into the session before acting on it
    fn editor_to_session(&mut self) {
        self.session.name = self.name.text().to_string();
        self.session.fields = TemplateFields::new(
            self.title.text(),
            self.description.text(),
            self.tags.text(),
        );
    }

    /// Show the session contents in the edit buffers
    fn session_to_editor(&mut self) {
        self.name.set_text(&self.session.name);
        self.title.set_text(&self.session.fields.title);
        self.description.set_text(&self.session.fields.description);
        self.tags.set_text(&self.session.fields.tags);
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::List => None,
            Focus::Name => Some(&mut self.name),
            Focus::Title => Some(&mut self.title),
            Focus::Description => Some(&mut self.description),
            Focus::Tags => Some(&mut self.tags),
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let current = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % FOCUS_ORDER.len()
        } else {
            (current + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()
        };
        self.focus = FOCUS_ORDER[next];
    }

    fn move_selection(&mut self, down: bool) {
        if self.templates.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(self.templates.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.list_state.select(Some(next));
    }
}

/// Map a key press to a dashboard action; `None` means it is text input
fn action_for(key: &KeyEvent, focus: Focus) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => Some(Action::Quit),
        KeyCode::Char('s') if ctrl => Some(Action::SaveNew),
        KeyCode::Char('u') if ctrl => Some(Action::Update),
        KeyCode::Char('d') if ctrl => Some(Action::Delete),
        KeyCode::Char('n') if ctrl => Some(Action::Clear),
        KeyCode::Char('e') if ctrl => Some(Action::Variables),
        KeyCode::F(2) => Some(Action::Copy(CopyTarget::Title)),
        KeyCode::F(3) => Some(Action::Copy(CopyTarget::Description)),
        KeyCode::F(4) => Some(Action::Copy(CopyTarget::Tags)),
        KeyCode::F(5) => Some(Action::Copy(CopyTarget::All)),
        KeyCode::Tab => Some(Action::NextFocus),
        KeyCode::BackTab => Some(Action::PrevFocus),
        KeyCode::Esc if focus == Focus::List => Some(Action::Quit),
        KeyCode::Esc => Some(Action::FocusList),
        _ if focus != Focus::List => None,
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Enter => Some(Action::Load),
        _ => None,
    }
}

/// Display the template dashboard
pub fn display_dashboard(store: &TemplateStore) -> Result<()> {
    let templates = store.list()?;

    enable_raw_mode()?;
    restoring_terminal(
        || {
            execute!(stdout(), EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout());
            let mut terminal = Terminal::new(backend)?;
            let mut state = DashboardState::new(templates);

            let result = run_dashboard(&mut terminal, &mut state, store);
            terminal.show_cursor()?;
            result
        },
        || {
            disable_raw_mode()?;
            execute!(stdout(), LeaveAlternateScreen)?;
            Ok(())
        },
    )
}

/// Run `body`, then `restore` whether or not `body` failed
fn restoring_terminal<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn run_dashboard<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut DashboardState,
    store: &TemplateStore,
) -> Result<()> {
    while !state.exiting {
        terminal.draw(|f| draw_dashboard(f, state))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match action_for(&key, state.focus) {
            Some(action) => match perform(terminal, state, store, action) {
                Ok(Some(notice)) => show_message(terminal, &notice.text, notice.color, 1200)?,
                Ok(None) => {}
                Err(e) => {
                    warn!("Dashboard action failed: {}", e);
                    let color = match e {
                        VidplateError::Validation(_) => Color::Yellow,
                        _ => Color::Red,
                    };
                    show_message(terminal, &e.to_string(), color, 0)?;
                }
            },
            None => {
                if let Some(field) = state.focused_field() {
                    field.handle_key(key.code, key.modifiers);
                }
            }
        }
    }

    Ok(())
}

fn perform<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut DashboardState,
    store: &TemplateStore,
    action: Action,
) -> Result<Option<Notice>> {
    match action {
        Action::Quit => state.exiting = true,
        Action::FocusList => state.focus = Focus::List,
        Action::NextFocus => state.cycle_focus(true),
        Action::PrevFocus => state.cycle_focus(false),
        Action::SelectPrev => state.move_selection(false),
        Action::SelectNext => state.move_selection(true),
        Action::Load => {
            let selected = state
                .list_state
                .selected()
                .and_then(|i| state.templates.get(i))
                .map(|t| t.id);
            if let Some(id) = selected {
                state.session.load(store, id)?;
                state.session_to_editor();
                state.focus = Focus::Title;
            }
        }
        Action::SaveNew => {
            state.editor_to_session();
            let id = state.session.save_as_new(store)?;
            state.session_to_editor();
            state.list_state.select(Some(0));
            state.refresh(store)?;
            return Ok(Some(Notice::success(format!("Template #{} saved", id))));
        }
        Action::Update => {
            state.editor_to_session();
            let id = state.session.update_selected(store)?;
            state.session_to_editor();
            state.refresh(store)?;
            return Ok(Some(Notice::success(format!("Template #{} updated", id))));
        }
        Action::Delete => {
            state.editor_to_session();
            if state.session.selected.is_some() {
                let question = format!("Really delete template '{}'?", state.session.name);
                if !confirm(terminal, &question)? {
                    return Ok(None);
                }
            }
            let id = state.session.delete_selected(store)?;
            state.session_to_editor();
            state.refresh(store)?;
            return Ok(Some(Notice::success(format!("Template #{} deleted", id))));
        }
        Action::Clear => {
            state.session.clear();
            state.session_to_editor();
            state.focus = Focus::Name;
        }
        Action::Variables => {
            state.editor_to_session();
            let mut prompt = FormPrompt::new(terminal);
            let outcome = state
                .session
                .fill_variables(&mut prompt, &Assignment::new())?;
            state.session_to_editor();
            return Ok(match outcome {
                VariableOutcome::NoVariables => Some(Notice::info(
                    "This template has no {{variables}} to fill in",
                )),
                VariableOutcome::Cancelled => None,
                VariableOutcome::Applied(count) => {
                    Some(Notice::success(format!("Filled in {} variables", count)))
                }
            });
        }
        Action::Copy(target) => {
            state.editor_to_session();
            return Ok(Some(
                match state.session.copy_to(target, state.clipboard.as_mut())? {
                    CopyOutcome::Copied(target) => {
                        Notice::success(format!("Copied {} to the clipboard", target))
                    }
                    CopyOutcome::Empty => Notice::info(format!("Nothing to copy: {} is empty", target)),
                },
            ));
        }
    }
    Ok(None)
}

fn draw_dashboard<B: Backend>(f: &mut Frame<B>, state: &mut DashboardState) {
    let size = f.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(2)])
        .split(size);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    draw_template_list(f, state, columns[0]);
    draw_editor(f, state, columns[1]);

    let help = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" switch pane  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" load  "),
            Span::styled("^S", Style::default().fg(Color::Yellow)),
            Span::raw(" save new  "),
            Span::styled("^U", Style::default().fg(Color::Yellow)),
            Span::raw(" update  "),
            Span::styled("^D", Style::default().fg(Color::Yellow)),
            Span::raw(" delete  "),
            Span::styled("^N", Style::default().fg(Color::Yellow)),
            Span::raw(" new  "),
            Span::styled("^E", Style::default().fg(Color::Yellow)),
            Span::raw(" fill variables  "),
            Span::styled("^Q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]),
        Line::from(vec![
            Span::raw("Copy: "),
            Span::styled("F2", Style::default().fg(Color::Yellow)),
            Span::raw(" title  "),
            Span::styled("F3", Style::default().fg(Color::Yellow)),
            Span::raw(" description  "),
            Span::styled("F4", Style::default().fg(Color::Yellow)),
            Span::raw(" tags  "),
            Span::styled("F5", Style::default().fg(Color::Yellow)),
            Span::raw(" all    Use {{name}} in the text for variables"),
        ]),
    ])
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, rows[1]);
}

fn draw_template_list<B: Backend>(f: &mut Frame<B>, state: &mut DashboardState, area: Rect) {
    let border = if state.focus == Focus::List {
        Color::Cyan
    } else {
        Color::Blue
    };

    let items: Vec<ListItem> = state
        .templates
        .iter()
        .map(|t| {
            let marker = if state.session.selected == Some(t.id) {
                Span::styled("● ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            };
            ListItem::new(Line::from(vec![marker, Span::raw(t.name.clone())]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Templates ({}) ", state.templates.len()))
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_editor<B: Backend>(f: &mut Frame<B>, state: &DashboardState, area: Rect) {
    let title = match state.session.selected {
        Some(id) => format!(" Editing template #{} ", id),
        None => " New template ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(inner);

    let fields = [
        (Focus::Name, "Name", &state.name),
        (Focus::Title, "Title", &state.title),
        (Focus::Description, "Description", &state.description),
        (Focus::Tags, "Tags (comma separated)", &state.tags),
    ];

    for ((focus, label, field), chunk) in fields.into_iter().zip(chunks.iter()) {
        draw_field(f, *chunk, label, field, state.focus == focus);
    }
}

fn draw_field<B: Backend>(f: &mut Frame<B>, area: Rect, label: &str, field: &TextField, active: bool) {
    let (line, column) = field.cursor_position();
    let visible_lines = area.height.saturating_sub(2) as usize;
    let scroll = if visible_lines == 0 {
        0
    } else {
        line.saturating_sub(visible_lines - 1)
    };

    let border = if active { Color::Cyan } else { Color::Blue };
    let paragraph = Paragraph::new(field.text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label))
                .border_style(Style::default().fg(border)),
        )
        .scroll((scroll as u16, 0));
    f.render_widget(paragraph, area);

    if active {
        let max_x = area.width.saturating_sub(3) as usize;
        f.set_cursor(
            area.x + 1 + column.min(max_x) as u16,
            area.y + 1 + (line - scroll) as u16,
        );
    }
}
