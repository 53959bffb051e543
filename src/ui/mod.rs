use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, InputMode};
use crate::domain::task::{self, Status, Task};
use crate::form::{Field, TaskForm};

pub fn run(mut app: App, tick_rate: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let res = loop {
        terminal.draw(|f| draw(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(&mut app, key.code)?
        {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    cleanup_terminal(&mut terminal)?;
    res
}

fn handle_key(app: &mut App, code: KeyCode) -> Result<bool> {
    match app.mode {
        InputMode::Normal => match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Char('a') | KeyCode::Char('n') => app.open_add(),
            KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('1') => app.toggle_status_filter(Status::Pending),
            KeyCode::Char('2') => app.toggle_status_filter(Status::InProgress),
            KeyCode::Char('3') => app.toggle_status_filter(Status::Completed),
            _ => {}
        },
        InputMode::Search => match code {
            KeyCode::Esc | KeyCode::Enter => app.end_search(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        },
        InputMode::Form => match code {
            KeyCode::Esc => app.cancel_form(),
            KeyCode::Enter => app.submit_form(),
            other => {
                if let Some(form) = app.form.as_mut() {
                    handle_form_key(form, other);
                }
            }
        },
    }

    Ok(false)
}

fn handle_form_key(form: &mut TaskForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left if form.focus == Field::Status => form.status = form.status.prev(),
        KeyCode::Right | KeyCode::Char(' ') if form.focus == Field::Status => {
            form.status = form.status.next();
        }
        KeyCode::Backspace => {
            if let Some(buf) = form.focused_buffer() {
                buf.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(buf) = form.focused_buffer() {
                buf.push(c);
            }
        }
        _ => {}
    }
}

fn draw(f: &mut ratatui::Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(size);

    let visible = app.visible_tasks();

    f.render_widget(render_header(app, &visible), chunks[0]);
    f.render_widget(render_filter_bar(app), chunks[1]);

    let mut table_state = TableState::default();
    if !visible.is_empty() {
        table_state.select(Some(app.selected.min(visible.len() - 1)));
    }
    f.render_stateful_widget(render_table(&visible), chunks[2], &mut table_state);

    f.render_widget(render_footer(app), chunks[3]);

    if let Some(form) = &app.form {
        draw_form(f, form, size);
    }
}

fn render_header(app: &App, visible: &[Task]) -> Paragraph<'static> {
    let total = app.store.tasks().len();
    let summary = format!("Showing: {} / All: {}", visible.len(), total);
    let line = Line::from(vec![
        Span::styled("tasuku - tasks", Style::default().fg(Color::Cyan)),
        Span::raw("  |  "),
        Span::styled(summary, Style::default().fg(Color::Yellow)),
    ]);
    Paragraph::new(line)
        .block(Block::default().title("Overview").borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

fn render_filter_bar(app: &App) -> Paragraph<'_> {
    let mut spans = vec![
        Span::raw("Search: "),
        Span::styled(
            app.filter.search.as_str(),
            Style::default().fg(Color::Yellow),
        ),
    ];
    if app.mode == InputMode::Search {
        spans.push(Span::raw("█"));
    }
    spans.push(Span::raw("   "));
    for status in Status::ALL {
        let style = if app.filter.statuses.contains(&status) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", status.label()), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Filters (/ search ; 1/2/3 toggle status)")
            .borders(Borders::ALL),
    )
}

fn render_table(tasks: &[Task]) -> Table<'static> {
    let header = Row::new(["Title", "Description", "Due Date", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = tasks
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(t.description.clone().unwrap_or_else(|| "N/A".to_string())),
                Cell::from(task::format_date(t.due_date)),
                Cell::from(t.status.label()),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title("Tasks (j/k move ; a add ; e edit ; d delete)")
            .borders(Borders::ALL),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )
    .highlight_symbol("➤ ")
}

fn render_footer(app: &App) -> Paragraph<'_> {
    match app.mode {
        InputMode::Normal => {
            let msg = app
                .status
                .as_deref()
                .unwrap_or("q quit ; a add ; e edit ; d delete ; / search ; 1/2/3 filter");
            Paragraph::new(msg).block(Block::default().title("Normal").borders(Borders::ALL))
        }
        InputMode::Search => Paragraph::new("Type to narrow ; Enter/Esc to finish").block(
            Block::default()
                .title("Search (live)")
                .borders(Borders::ALL),
        ),
        InputMode::Form => Paragraph::new("Tab next field ; Enter save ; Esc cancel").block(
            Block::default().title("Form").borders(Borders::ALL),
        ),
    }
}

fn draw_form(f: &mut ratatui::Frame, form: &TaskForm, size: Rect) {
    let area = centered_rect(60, 50, size);
    f.render_widget(Clear, area);

    let title = if form.is_edit() { "Edit Task" } else { "Add Task" };

    let mut lines = vec![
        field_line(Field::Title, &form.title, form.focus == Field::Title),
        field_line(
            Field::Description,
            &form.description,
            form.focus == Field::Description,
        ),
        field_line(Field::DueDate, &form.due_date, form.focus == Field::DueDate),
        status_line(form.status, form.focus == Field::Status),
        Line::raw(""),
    ];
    match &form.error {
        Some(err) => lines.push(Line::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => lines.push(Line::styled(
            "Due date format: YYYY-MM-DD",
            Style::default().fg(Color::DarkGray),
        )),
    }

    let popup = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn field_line(field: Field, value: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<12}", format!("{}:", field.label())),
        Style::default().fg(Color::Gray),
    )];
    if focused {
        spans.push(Span::styled(
            value.to_string(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw("█"));
    } else {
        spans.push(Span::raw(value.to_string()));
    }
    Line::from(spans)
}

fn status_line(status: Status, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<12}", "Status:"),
        Style::default().fg(Color::Gray),
    )];
    if focused {
        spans.push(Span::styled(
            format!("◂ {} ▸", status.label()),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::raw(status.label()));
    }
    Line::from(spans)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
