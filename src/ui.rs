use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use money_manager::{Change, KeyValueStore, LedgerStore, Person};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    PersonName,
    MoneyIn,
    MoneyOut,
}

impl InputMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputMode::Normal => "",
            InputMode::PersonName => " Enter Person Name ",
            InputMode::MoneyIn => " Amount (Money In) ",
            InputMode::MoneyOut => " Amount (Money Out) ",
        }
    }
}

pub struct App<S: KeyValueStore> {
    pub store: LedgerStore<S>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input: String,
    pub currency: String,
    /// Outcome of the last request, shown in the status bar
    pub status: Option<(String, bool)>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: LedgerStore<S>, currency: impl Into<String>) -> Self {
        let mut state = TableState::default();
        if !store.persons().is_empty() {
            state.select(Some(0));
        }

        Self {
            store,
            state,
            input_mode: InputMode::Normal,
            input: String::new(),
            currency: currency.into(),
            status: None,
        }
    }

    pub fn selected_person(&self) -> Option<&Person> {
        self.state.selected().and_then(|i| self.store.persons().get(i))
    }

    pub fn next(&mut self) {
        let len = self.store.persons().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.store.persons().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn start_input(&mut self, mode: InputMode) {
        if mode != InputMode::PersonName && self.selected_person().is_none() {
            return;
        }
        self.input_mode = mode;
        self.input.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Send the typed text to the store. Input is kept when the request is ignored.
    pub fn submit_input(&mut self) -> Result<()> {
        let selected = self.selected_person().map(|p| p.name.clone());
        let change = match (self.input_mode, selected) {
            (InputMode::PersonName, _) => self.store.add_person(&self.input)?,
            (InputMode::MoneyIn, Some(name)) => self.store.money_in(&name, &self.input)?,
            (InputMode::MoneyOut, Some(name)) => self.store.money_out(&name, &self.input)?,
            _ => return Ok(()),
        };

        if change.is_applied() && self.input_mode == InputMode::PersonName {
            self.state.select(Some(self.store.persons().len() - 1));
        }
        self.report(change);
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<()> {
        let Some(name) = self.selected_person().map(|p| p.name.clone()) else {
            return Ok(());
        };
        let change = self.store.delete_person(&name)?;

        let len = self.store.persons().len();
        self.state.select(match self.state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            other => other,
        });
        self.report(change);
        Ok(())
    }

    fn report(&mut self, change: Change) {
        match change {
            Change::Applied => {
                self.status = Some(("Saved".to_string(), true));
                self.cancel_input();
            }
            Change::Ignored(reason) => {
                self.status = Some((reason.to_string(), false));
            }
        }
    }

    pub fn money(&self, amount: impl Into<i128>) -> String {
        format!("{} {}", self.currency, amount.into())
    }
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('a') => app.start_input(InputMode::PersonName),
                KeyCode::Char('i') => app.start_input(InputMode::MoneyIn),
                KeyCode::Char('o') => app.start_input(InputMode::MoneyOut),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected()?,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            },
            _ => match key.code {
                KeyCode::Enter => app.submit_input()?,
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            },
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Persons + history
            Constraint::Length(3), // Total balance
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    let title = Paragraph::new(Line::from(Span::styled(
        "Money Manager",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_input(f, chunks[1], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    render_persons(f, content[0], app);
    render_history(f, content[1], app);

    let total = Paragraph::new(Line::from(Span::styled(
        format!("Total Balance: {}", app.money(app.store.total_balance())),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(total, chunks[3]);

    render_status_bar(f, chunks[4], app);
}

fn render_input<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let (title, style) = match app.input_mode {
        InputMode::Normal => (" Input ", Style::default().fg(Color::DarkGray)),
        mode => (mode.prompt(), Style::default().fg(Color::Yellow)),
    };

    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title),
    );
    f.render_widget(input, area);

    if app.input_mode != InputMode::Normal {
        f.set_cursor(area.x + app.input.chars().count() as u16 + 1, area.y + 1);
    }
}

fn render_persons<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let header_cells = ["Name", "Balance"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .store
        .persons()
        .iter()
        .map(|p| {
            let color = if p.balance < 0 { Color::Red } else { Color::Green };
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(app.money(p.balance)).style(Style::default().fg(color)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(16), Constraint::Length(16)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Persons "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_history<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Transaction History ");

    let Some(person) = app.selected_person() else {
        f.render_widget(Paragraph::new("  No person selected").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}: {}", person.name, app.money(person.balance)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let history = app.store.transactions_for(&person.name);
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No transactions yet",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    for tx in history {
        let color = if tx.amount < 0 { Color::Red } else { Color::Green };
        lines.push(Line::from(Span::styled(
            format!("  {}", tx.history_line()),
            Style::default().fg(color),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let mut spans = Vec::new();

    if let Some((message, ok)) = &app.status {
        let color = if *ok { Color::Green } else { Color::Red };
        spans.push(Span::styled(format!(" {} ", message), Style::default().fg(color)));
        spans.push(Span::raw("| "));
    }

    let keys: &[(&str, &str)] = match app.input_mode {
        InputMode::Normal => &[
            ("a", " Add Person | "),
            ("i", " Money In | "),
            ("o", " Money Out | "),
            ("d", " Delete | "),
            ("↑/↓", " Nav | "),
        ],
        _ => &[("Enter", " Confirm | "), ("Esc", " Cancel")],
    };
    for (key, label) in keys {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }
    if app.input_mode == InputMode::Normal {
        spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, area);
}
