mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use display::{TerminalRenderer, View};
use survivor_shooter::compute::{BossDifficulty, GameEvent, Simulation};
use survivor_shooter::config::{GameConfig, DEFAULT_CONFIG_PATH};
use survivor_shooter::ports::{FileStore, Key, SaveStore, VirtualInput};
use survivor_shooter::shop::PurchaseOutcome;
use survivor_shooter::upgrades::AutoBuildMode;

type Game = Simulation<VirtualInput, TerminalRenderer, FileStore>;

const SLOTS: [&str; 3] = ["1", "2", "3"];

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Frames a notice stays on screen.
const NOTICE_FRAMES: u32 = 60;

#[derive(Parser)]
#[command(name = "survivor_shooter")]
#[command(about = "Terminal survivor shooter")]
struct Args {
    /// Path to the TOML config file
    config: Option<PathBuf>,
    /// Fixed RNG seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Current UTC date as `YYYY-MM-DD`, used for the daily challenge.
///
/// Day count to proleptic Gregorian date via Howard Hinnant's
/// `civil_from_days` (<https://howardhinnant.github.io/date_algorithms.html#civil_from_days>).
fn today_utc() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let z = (secs / 86_400) as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play { slot: &'static str, new_game: bool },
    Quit,
}

fn slot_summary(store: &FileStore, slot: &str) -> Option<String> {
    let snapshot = store.load(slot).ok().flatten()?;
    Some(format!(
        "Stage {}  Lv {}",
        snapshot.stage.unwrap_or(1),
        snapshot.level.unwrap_or(1)
    ))
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &FileStore,
) -> std::io::Result<MenuResult> {
    let summaries: Vec<Option<String>> = SLOTS.iter().map(|slot| slot_summary(store, slot)).collect();
    let mut selected: Option<usize> = None;

    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let cy = height / 2;

        let title = "★  SURVIVOR  SHOOTER  ★";
        out.queue(cursor::MoveTo(
            cx.saturating_sub(title.chars().count() as u16 / 2),
            cy.saturating_sub(6),
        ))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(title))?;

        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print("Select a save slot:"))?;

        for (i, summary) in summaries.iter().enumerate() {
            let row = cy.saturating_sub(1) + i as u16;
            out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("[{}] ", i + 1)))?;
            let (label, color) = match summary {
                Some(text) => (text.as_str(), Color::Yellow),
                None => ("empty", Color::DarkGrey),
            };
            let color = if selected == Some(i) { Color::Green } else { color };
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(label))?;
        }

        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 3))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        match selected {
            Some(i) => out.queue(Print(format!(
                "Slot {}: C - Continue   N - New game   ESC - Back",
                i + 1
            )))?,
            None => out.queue(Print("1-3 : Select slot   ESC : Quit"))?,
        };
        out.queue(style::ResetColor)?;
        out.flush()?;

        let code = match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => code,
            Ok(_) => continue,
            Err(_) => return Ok(MenuResult::Quit),
        };
        match (selected, code) {
            (None, KeyCode::Char(c @ '1'..='3')) => {
                let i = (c as u8 - b'1') as usize;
                if summaries[i].is_none() {
                    return Ok(MenuResult::Play { slot: SLOTS[i], new_game: true });
                }
                selected = Some(i);
            }
            (None, KeyCode::Esc) => return Ok(MenuResult::Quit),
            (Some(i), KeyCode::Char('c') | KeyCode::Char('C')) => {
                return Ok(MenuResult::Play { slot: SLOTS[i], new_game: false });
            }
            (Some(i), KeyCode::Char('n') | KeyCode::Char('N')) => {
                return Ok(MenuResult::Play { slot: SLOTS[i], new_game: true });
            }
            (Some(_), KeyCode::Esc) => selected = None,
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn notice_for(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::LevelUp { level } => Some(format!("Level {level}!")),
        GameEvent::SynergyTriggered { tag } => Some(format!("Synergy: {}", tag.synergy_label())),
        GameEvent::ItemPickup { kind } => Some(format!("{}: {}", kind.label(), kind.description())),
        GameEvent::StageCleared { stage } => Some(format!("Stage {stage} cleared - find the portal")),
        GameEvent::StageAdvanced { stage } => Some(format!("Entering stage {stage}")),
        GameEvent::BossSpawned { phase } => Some(format!("Boss phase {phase}")),
        GameEvent::BossDefeated { daily: true } => Some("Daily challenge complete!".to_string()),
        GameEvent::BossDefeated { daily: false } => Some("Boss defeated!".to_string()),
        _ => None,
    }
}

fn next_auto_build(game: &mut Game) {
    let (enabled, mode) = match (game.auto_build, game.auto_build_mode) {
        (false, _) => (true, AutoBuildMode::Attack),
        (true, AutoBuildMode::Attack) => (true, AutoBuildMode::Survival),
        (true, AutoBuildMode::Survival) => (true, AutoBuildMode::Balance),
        (true, AutoBuildMode::Balance) => (false, AutoBuildMode::Balance),
    };
    game.set_auto_build(enabled, mode);
}

/// Digit keys pick an upgrade while one is offered, otherwise buy from the
/// open shop.
fn handle_digit(game: &mut Game, view: &mut View, index: usize) {
    if let Some(option) = game.pending_upgrades.get(index).copied() {
        game.choose_upgrade(option.id);
        return;
    }
    if !view.shop_open {
        return;
    }
    let Some(id) = game.shop.offers.get(index).map(|offer| offer.item.id) else {
        return;
    };
    let message = match game.purchase(id) {
        PurchaseOutcome::Purchased(_) => "Purchased!",
        PurchaseOutcome::SoldOut => "Sold out",
        PurchaseOutcome::InsufficientFunds => "Not enough currency",
        PurchaseOutcome::NotOffered => "Not on offer",
    };
    view.notice = Some(message.to_string());
}

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the arrow keys still "fresh" (within
/// `HOLD_WINDOW` frames) form the movement direction, so diagonals work.
/// Skill and menu keys are one-shot and act on the press itself.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut view = View::default();
    let mut notice_frames: u32 = 0;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => (code, kind, modifiers),
                Event::Resize(cols, rows) => {
                    game.renderer.resize(cols, rows);
                    continue;
                }
                _ => continue,
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Esc => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Enter if game.is_game_over => return Ok(false),
                        KeyCode::Char(' ') => game.input.press(Key::Space),
                        KeyCode::Char('q') | KeyCode::Char('Q') => game.input.press(Key::Q),
                        KeyCode::Char('w') | KeyCode::Char('W') => game.input.press(Key::W),
                        KeyCode::Char('e') | KeyCode::Char('E') => game.input.press(Key::E),
                        KeyCode::Char('r') | KeyCode::Char('R') => game.input.press(Key::R),
                        KeyCode::Char(c @ '1'..='4') => {
                            handle_digit(game, &mut view, (c as u8 - b'1') as usize);
                            notice_frames = NOTICE_FRAMES;
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            view.shop_open = !view.shop_open;
                            game.shop.mark_seen();
                            game.set_paused(view.shop_open);
                        }
                        KeyCode::Char('a') | KeyCode::Char('A') => next_auto_build(game),
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            let paused = !game.is_paused;
                            game.set_paused(paused);
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            game.start_boss_challenge(BossDifficulty::Normal);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            game.start_boss_challenge(BossDifficulty::Hard);
                        }
                        KeyCode::Char('d') | KeyCode::Char('D') => {
                            if !game.start_daily_challenge(&today_utc()) {
                                view.notice = Some("Daily challenge already cleared today".to_string());
                                notice_frames = NOTICE_FRAMES;
                            }
                        }
                        KeyCode::Char('x') | KeyCode::Char('X') => game.cancel_boss_challenge(),
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Held arrows → movement direction ──────────────────────────────────
        let axis = |negative: KeyCode, positive: KeyCode| -> f32 {
            let neg = is_held(&key_frame, &negative, frame) as i8;
            let pos = is_held(&key_frame, &positive, frame) as i8;
            f32::from(pos - neg)
        };
        let x = axis(KeyCode::Left, KeyCode::Right);
        let y = axis(KeyCode::Up, KeyCode::Down);
        game.input.set_direction(x, y);

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;
        game.tick(delta);

        for event in game.take_events() {
            if let Some(text) = notice_for(&event) {
                view.notice = Some(text);
                notice_frames = NOTICE_FRAMES;
            }
        }
        notice_frames = notice_frames.saturating_sub(1);
        if notice_frames == 0 {
            view.notice = None;
        }

        game.render();
        display::render(out, game, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = GameConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    // stdout belongs to the renderer, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    info!(config = %config_path.display(), "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    info!("exiting");
    Ok(())
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: GameConfig) -> std::io::Result<()> {
    let frame_time = Duration::from_millis(config.frame_millis.max(1));

    loop {
        let store = FileStore::new(&config.save_dir);
        let (slot, new_game) = match show_menu(out, rx, &store)? {
            MenuResult::Quit => break,
            MenuResult::Play { slot, new_game } => (slot, new_game),
        };

        let (cols, rows) = terminal::size()?;
        let renderer =
            TerminalRenderer::new(cols, rows, config.viewport_width, config.viewport_height);
        let mut game = Simulation::new(config.clone(), VirtualInput::new(), renderer, store);
        if new_game || !game.load_slot(slot) {
            game.reset_for_new_game(slot);
        }
        game.save_game();

        let quit = game_loop(out, &mut game, rx, frame_time)?;
        game.save_game();
        if quit {
            break;
        }
    }
    Ok(())
}
