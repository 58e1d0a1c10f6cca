mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use display::Surface;
use touch_shooter::compute::{init_state, tick};
use touch_shooter::config::{GameConfig, DEFAULT_CONFIG_PATH};
use touch_shooter::entities::{Level, SimulationState};
use touch_shooter::input::{Control, InputState, TouchId, Zone};
use touch_shooter::render::draw_list;

/// Top-down shooter in the terminal.
#[derive(Parser)]
#[command(version, about = "Top-down touch shooter, played with the mouse and keyboard")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Start straight away at this difficulty (easy, medium, hard).
    #[arg(long, value_name = "LEVEL")]
    difficulty: Option<String>,

    /// Write log output to this file (RUST_LOG picks the filter).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

/// Pixels of virtual aim drag per frame while an arrow key is held.
const AIM_KEY_STEP: f32 = 6.0;

/// The mouse acts as a single finger.
const MOUSE_TOUCH: TouchId = 0;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Level),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    default_level: Level,
) -> std::io::Result<MenuResult> {
    let lines = [
        (Color::Cyan, "TOUCH SHOOTER".to_string()),
        (Color::White, String::new()),
        (Color::Green, format!("[1] {}", Level::Easy.name())),
        (Color::Yellow, format!("[2] {}", Level::Medium.name())),
        (Color::Red, format!("[3] {}", Level::Hard.name())),
        (Color::White, String::new()),
        (Color::DarkGrey, format!("Enter: {}   Q: quit", default_level.name())),
        (Color::DarkGrey, "left half drags move, right half drags aim".to_string()),
    ];

    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let top = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (row, (color, text)) in lines.iter().enumerate() {
        let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, top + row as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            })) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Level::Easy)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Level::Medium)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Level::Hard)),
                KeyCode::Enter => return Ok(MenuResult::Start(default_level)),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Keys use a `key_frame` map recording the frame of the last press/repeat
/// event per key; every key still fresh within `HOLD_WINDOW` frames counts as
/// held, so fire, sprint, steering and aiming combine freely.  The mouse is
/// forwarded to the input state as a single touch.
///
/// Each frame runs exactly one simulation tick followed by one render.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    state: &mut SimulationState,
    surface: &mut Surface,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let mut input = InputState::new();
    let frame_budget = config.frame_duration();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Esc => return Ok(false),
                            KeyCode::Char('j') | KeyCode::Char('J') => input.press(Control::Jump),
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                input.press(Control::Reload)
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(mouse) => forward_mouse(&mut input, surface, state.width, mouse),
                Event::Resize(cols, rows) => {
                    let (w, h) = config.world_size(cols, rows);
                    state.resize(w, h);
                    surface.resize(cols, rows);
                    info!("resized to {}x{} cells ({}x{} world)", cols, rows, w, h);
                }
                _ => {}
            }
        }

        // ── Apply held-key controls ───────────────────────────────────────────
        let held = |keys: &[KeyCode]| any_held(&key_frame, keys, frame);

        if held(&[KeyCode::Char(' ')]) {
            input.press(Control::Fire);
        } else {
            input.release(Control::Fire);
        }
        if held(&[KeyCode::Char('e'), KeyCode::Char('E')]) {
            input.press(Control::Sprint);
        } else {
            input.release(Control::Sprint);
        }

        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let steer_x = axis(
            held(&[KeyCode::Char('a'), KeyCode::Char('A')]),
            held(&[KeyCode::Char('d'), KeyCode::Char('D')]),
        );
        let steer_y = axis(
            held(&[KeyCode::Char('w'), KeyCode::Char('W')]),
            held(&[KeyCode::Char('s'), KeyCode::Char('S')]),
        );
        input.steer(steer_x, steer_y);

        let aim = axis(held(&[KeyCode::Left]), held(&[KeyCode::Right]));
        if aim != 0.0 {
            input.aim_by(aim * AIM_KEY_STEP);
        }

        // ── Simulate, then draw ───────────────────────────────────────────────
        tick(state, &mut input, Instant::now(), &mut rng);
        display::render(out, surface, &draw_list(state, &input))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

/// Left button press / drag / release become touch start / move / end in the
/// zone under the pointer.
fn forward_mouse(input: &mut InputState, surface: &Surface, world_width: f32, mouse: MouseEvent) {
    let (x, y) = surface.cell_center(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            input.touch_start(Zone::at(x, world_width), MOUSE_TOUCH, x, y);
        }
        MouseEventKind::Drag(MouseButton::Left) => input.touch_move(MOUSE_TOUCH, x, y),
        MouseEventKind::Up(MouseButton::Left) => input.touch_end(MOUSE_TOUCH),
        _ => {}
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // Nothing may write over the full-screen game unless asked to.
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
                .init();
        }
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}, using defaults", e);
    }

    let start_level = match cli.difficulty.as_deref() {
        Some(name) => match Level::from_name(name) {
            Some(level) => Some(level),
            None => {
                eprintln!("Unknown difficulty '{}' (expected easy, medium or hard)", name);
                std::process::exit(2);
            }
        },
        None => None,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the loops only poll `rx`.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &config, start_level, &rx);

    restore_terminal(&mut out, keyboard_enhanced);

    if let Err(e) = &result {
        warn!("terminal error: {}", e);
    }
    result
}

/// Best effort: every step runs even if an earlier one failed.
fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    mut start_level: Option<Level>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    loop {
        let level = match start_level.take() {
            Some(level) => level,
            None => match show_menu(out, rx, config.level)? {
                MenuResult::Quit => break,
                MenuResult::Start(level) => level,
            },
        };

        let (cols, rows) = terminal::size()?;
        let (width, height) = config.world_size(cols, rows);
        let mut state = init_state(level, width, height, Instant::now());
        let mut surface = Surface::new(cols, rows, config.cell_width, config.cell_height);
        info!(
            "starting {} game on a {}x{} world",
            level.name(),
            width,
            height
        );

        let started = Instant::now();
        let quit = game_loop(out, config, &mut state, &mut surface, rx)?;
        info!("session ended after {} frames ({:.1?})", state.frame, started.elapsed());

        if quit {
            break;
        }
        // Otherwise loop back to the menu
    }
    Ok(())
}
