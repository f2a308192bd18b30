use crate::clock::Clock;
use crate::store::KvStore;
use crate::tracker::Tracker;
use crate::utils::format_clock;
use anyhow::Result;
use chrono::{DateTime, Duration, Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration as StdDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVerdict {
    Complete,
    GiveUp,
    Abort,
}

enum InputMode {
    Normal,
    Capture(String),
}

struct SessionView<'a> {
    task: &'a str,
    started_at: DateTime<Utc>,
    countdown: Option<Duration>,
    today_count: u32,
    daily_limit: u32,
    distraction_count: usize,
}

pub fn run_session<S: KvStore, C: Clock>(
    tracker: &mut Tracker<S, C>,
    task: &str,
    started_at: DateTime<Utc>,
    countdown: Option<Duration>,
    daily_limit: u32,
) -> Result<SessionVerdict> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, tracker, task, started_at, countdown, daily_limit);

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop<S: KvStore, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tracker: &mut Tracker<S, C>,
    task: &str,
    started_at: DateTime<Utc>,
    countdown: Option<Duration>,
    daily_limit: u32,
) -> Result<SessionVerdict> {
    let today_count = tracker.today_count()?;
    let mut distraction_count = tracker.distractions()?.len();
    let mut mode = InputMode::Normal;

    loop {
        let view = SessionView {
            task,
            started_at,
            countdown,
            today_count,
            daily_limit,
            distraction_count,
        };
        terminal.draw(|f| draw(f, &view, &mode))?;

        if event::poll(StdDuration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match &mut mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('c') => return Ok(SessionVerdict::Complete),
                        KeyCode::Char('g') => return Ok(SessionVerdict::GiveUp),
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(SessionVerdict::Abort),
                        KeyCode::Char('d') => mode = InputMode::Capture(String::new()),
                        _ => {}
                    },
                    InputMode::Capture(buf) => match key.code {
                        KeyCode::Enter => {
                            let text = buf.trim().to_string();
                            if !text.is_empty() {
                                tracker.add_distraction(&text)?;
                                distraction_count += 1;
                            }
                            mode = InputMode::Normal;
                        }
                        KeyCode::Esc => mode = InputMode::Normal,
                        KeyCode::Backspace => {
                            buf.pop();
                        }
                        KeyCode::Char(ch) => buf.push(ch),
                        _ => {}
                    },
                }
            }
        }
    }
}

fn draw(frame: &mut Frame, view: &SessionView, mode: &InputMode) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Session
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], view);
    draw_session(frame, chunks[1], view);
    draw_footer(frame, chunks[2], mode);
}

fn timer_span(view: &SessionView) -> Span<'static> {
    let elapsed = Utc::now() - view.started_at;

    match view.countdown {
        Some(total) => {
            let remaining = total - elapsed;
            if remaining <= Duration::zero() {
                // Floor at zero and wait: completion is always an explicit act.
                Span::styled(
                    "00:00",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else {
                let color = if remaining <= Duration::seconds(10) {
                    Color::Red
                } else {
                    Color::Magenta
                };
                Span::styled(
                    format_clock(remaining.num_seconds()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            }
        }
        None => Span::styled(
            format_clock(elapsed.num_seconds()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

fn draw_header(frame: &mut Frame, area: Rect, view: &SessionView) {
    let header_spans = vec![
        Span::styled(
            " Uno ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(format!(
            "{}/{} unos today",
            view.today_count, view.daily_limit
        )),
        Span::raw(" | "),
        Span::raw(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
    ];

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_session(frame: &mut Frame, area: Rect, view: &SessionView) {
    let block = Block::default()
        .title(Span::styled(
            " FOCUS ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            view.task.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(timer_span(view)),
        Line::raw(""),
        Line::from(Span::styled(
            format!("{} distraction(s) deferred", view.distraction_count),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    // Center the small block of text vertically within the frame.
    let text_height = lines.len() as u16;
    let pad = inner_area.height.saturating_sub(text_height) / 2;
    let centered = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(pad),
            Constraint::Length(text_height),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, centered[1]);
}

fn draw_footer(frame: &mut Frame, area: Rect, mode: &InputMode) {
    let content = match mode {
        InputMode::Normal => Line::raw(
            "'c' complete | 'g' give up | 'd' note a distraction | 'q' abandon",
        ),
        InputMode::Capture(buf) => Line::from(vec![
            Span::styled("Distraction: ", Style::default().fg(Color::Yellow)),
            Span::raw(buf.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    };

    let help = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}
