use anyhow::{Context, Result};
use clap::Parser;
use grid_adventure_core::{
    Movement,
    config::GameConfig,
    game::{Drawable, Game, Input, SceneView},
    level::{self, LevelLayout},
    occupant::{Rotation, Sprite},
};
use ratatui::{
    crossterm::{
        self,
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Extra level file, selectable with key 3
    #[arg(short, long, value_name = "LEVEL_FILE")]
    level: Option<PathBuf>,

    /// TOML file overriding grid size and text timing
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 33)]
    frame_ms: u64,
}

struct App {
    /// The game session.
    game: Game,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(config: &GameConfig, levels: Vec<LevelLayout>) -> Self {
        App {
            game: Game::new(config, levels),
            should_quit: false,
        }
    }

    /// Translates a key press into game input.
    fn on_key(&mut self, code: KeyCode) {
        let input = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
                return;
            }
            KeyCode::Left => Input::Move(Movement::Left),
            KeyCode::Right => Input::Move(Movement::Right),
            // Row 0 is drawn at the bottom, so screen-up is +y.
            KeyCode::Up => Input::Move(Movement::Up),
            KeyCode::Down => Input::Move(Movement::Down),
            KeyCode::Char(digit @ '1'..='9') => Input::SelectLevel((digit as u32 - '1' as u32) as usize),
            _ => Input::Idle,
        };
        self.game.handle_input(input);
    }

    /// Advances animations by the real time elapsed since the last frame.
    fn tick(&mut self, delta: Duration) {
        self.game.tick(delta.as_secs_f32());
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut levels = level::builtin();
    if let Some(path) = &args.level {
        levels.push(
            LevelLayout::from_file(path)
                .with_context(|| format!("loading level {}", path.display()))?,
        );
    }
    log::info!("starting with {} levels", levels.len());

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(&config, levels);

    // Run the main application loop, restoring the terminal either way
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.frame_ms));
    restore_terminal(&mut terminal)?;
    result
}

/// Sends log output to a file so it does not scribble over the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    frame_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        let view = app.game.view();
        terminal.draw(|f| ui(f, &view))?;

        // Calculate timeout for event polling
        let timeout = frame_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Each key press is resolved completely before the next is read
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        // Advance animations once per frame
        let elapsed = last_tick.elapsed();
        if elapsed >= frame_rate {
            app.tick(elapsed);
            last_tick = Instant::now();
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Terminal rows needed for a map of `height` cells plus its border.
fn map_rows(height: usize) -> u16 {
    u16::try_from(height)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// Renders the user interface.
fn ui(frame: &mut Frame, view: &SceneView) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(map_rows(view.height)), // Area for the map
            Constraint::Length(6),                  // Area for messages
            Constraint::Length(2),                  // Area for status/help
        ])
        .split(frame.area());

    render_map(frame, main_layout[0], view);
    render_texts(frame, main_layout[1], view);

    let status = Paragraph::new(format!(
        "Level: {}  Keys: {}  |  arrows move, 1-3 switch level, q quits",
        view.level, view.keys
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, main_layout[2]);
}

/// Character and style for a drawable.
fn glyph(drawable: &Drawable) -> Span<'static> {
    let flipped = drawable.rotation == Rotation::HalfTurn;
    match drawable.sprite {
        Sprite::Player => Span::styled("@", Style::default().fg(Color::Red).bold()),
        Sprite::WoodenBox => Span::styled("o", Style::default().fg(Color::Rgb(181, 120, 60))),
        Sprite::BrickWall => Span::styled("#", Style::default().fg(Color::DarkGray)),
        Sprite::GoldenKey => Span::styled("k", Style::default().fg(Color::Yellow)),
        Sprite::LockedDoor => Span::styled("D", Style::default().fg(Color::LightRed)),
        Sprite::PowerBlock => Span::styled("P", Style::default().fg(Color::Cyan).bold()),
        Sprite::PowerlineRight => {
            Span::styled(if flipped { "<" } else { ">" }, Style::default().fg(Color::Cyan))
        }
        Sprite::PowerlineLeft => {
            Span::styled(if flipped { ">" } else { "<" }, Style::default().fg(Color::Cyan))
        }
        Sprite::RockyGrass => Span::styled("^", Style::default().fg(Color::Green)),
    }
}

/// Renders the grid onto the frame, row `height - 1` at the top.
fn render_map(frame: &mut Frame, area: Rect, view: &SceneView) {
    let grass = Span::styled(".", Style::default().fg(Color::Rgb(40, 90, 40)));
    let mut cells: Vec<Vec<Span>> = vec![vec![grass; view.width]; view.height];

    // Later drawables cover earlier ones; the player comes last.
    for drawable in &view.drawables {
        let (x, y) = (drawable.position.x as usize, drawable.position.y as usize);
        if let Some(cell) = cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = glyph(drawable);
        }
    }

    let lines: Vec<Line> = cells.into_iter().rev().map(Line::from).collect();
    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Grid Adventure").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(map_paragraph, area);
}

/// Renders live messages, dimmed by their opacity.
fn render_texts(frame: &mut Frame, area: Rect, view: &SceneView) {
    let items: Vec<ListItem> = view
        .texts
        .iter()
        .map(|text| {
            let level = (text.opacity.clamp(0.0, 1.0) * 255.0) as u8;
            ListItem::new(Span::styled(
                text.text.clone(),
                Style::default().fg(Color::Rgb(level, level, level)),
            ))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Messages"));
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_rows_adds_the_border() {
        assert_eq!(map_rows(15), 17);
        assert_eq!(map_rows(0), 2);
    }

    #[test]
    fn map_rows_saturates_for_tall_maps() {
        assert_eq!(map_rows(usize::from(u16::MAX) - 1), u16::MAX);
        assert_eq!(map_rows(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(map_rows(usize::MAX), u16::MAX);
    }
}
