/// Rendering layer.  All terminal I/O lives here.
///
/// [`TerminalRenderer`] receives the simulation's draw calls and rasterises
/// them into a character grid centred on the camera.  [`render`] then writes
/// that grid plus the HUD and any overlay to the terminal.  No game logic is
/// performed here.

use std::f32::consts::TAU;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use survivor_shooter::compute::Simulation;
use survivor_shooter::drone::Drone;
use survivor_shooter::entities::{
    Boss, BossProjectile, Enemy, ExperienceOrb, ItemDrop, ItemKind, Player, Portal, Projectile,
};
use survivor_shooter::ports::{InputSource, Renderer, SaveStore};
use survivor_shooter::stage::StageTheme;
use survivor_shooter::upgrades::AutoBuildMode;
use survivor_shooter::vector2::Vector2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::Red;
const C_PROJECTILE: Color = Color::Cyan;
const C_BOSS_PROJECTILE: Color = Color::Magenta;
const C_BOSS: Color = Color::Red;
const C_ORB: Color = Color::Green;
const C_ITEM: Color = Color::Yellow;
const C_PORTAL: Color = Color::Magenta;
const C_DRONE: Color = Color::Cyan;
const C_RING: Color = Color::DarkGrey;
const C_BARRIER: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// Samples taken along a drawn circle.
const RING_SAMPLES: usize = 32;

// ── Rasteriser ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    color: Color,
}

/// Character-grid sink for the simulation's draw calls.
///
/// The play field spans `cols - 2` by `rows - 4` cells (border, HUD and hint
/// rows excluded) and shows `world_width` by `world_height` world units.
pub struct TerminalRenderer {
    cols: u16,
    rows: u16,
    world_width: f32,
    world_height: f32,
    camera: Vector2,
    theme: Option<StageTheme>,
    cells: Vec<Option<Cell>>,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        let mut renderer = Self {
            cols: 0,
            rows: 0,
            world_width,
            world_height,
            camera: Vector2::ZERO,
            theme: None,
            cells: Vec::new(),
        };
        renderer.resize(cols, rows);
        renderer
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![None; self.field_cols() * self.field_rows()];
    }

    fn field_cols(&self) -> usize {
        self.cols.saturating_sub(2) as usize
    }

    fn field_rows(&self) -> usize {
        self.rows.saturating_sub(4) as usize
    }

    /// World units covered by one cell, horizontally and vertically.
    fn cell_size(&self) -> (f32, f32) {
        (
            self.world_width / self.field_cols().max(1) as f32,
            self.world_height / self.field_rows().max(1) as f32,
        )
    }

    /// Field cell under a world position, if it is on screen.
    fn project(&self, position: Vector2) -> Option<(usize, usize)> {
        let (sx, sy) = self.cell_size();
        let col = (position.x - self.camera.x) / sx + self.field_cols() as f32 / 2.0;
        let row = (position.y - self.camera.y) / sy + self.field_rows() as f32 / 2.0;
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.field_cols() && row < self.field_rows()).then_some((col, row))
    }

    /// World position at the centre of a field cell.
    fn unproject(&self, col: usize, row: usize) -> Vector2 {
        let (sx, sy) = self.cell_size();
        Vector2::new(
            (col as f32 + 0.5 - self.field_cols() as f32 / 2.0) * sx + self.camera.x,
            (row as f32 + 0.5 - self.field_rows() as f32 / 2.0) * sy + self.camera.y,
        )
    }

    fn plot(&mut self, position: Vector2, glyph: char, color: Color) {
        if let Some((col, row)) = self.project(position) {
            let width = self.field_cols();
            self.cells[row * width + col] = Some(Cell { glyph, color });
        }
    }

    fn ring(&mut self, centre: Vector2, radius: f32, glyph: char, color: Color) {
        for i in 0..RING_SAMPLES {
            let point = centre.add(Vector2::from_angle(TAU * i as f32 / RING_SAMPLES as f32).scale(radius));
            self.plot(point, glyph, color);
        }
    }
}

impl Renderer for TerminalRenderer {
    fn begin_frame(&mut self, camera: Vector2, theme: &StageTheme) {
        self.camera = camera;
        self.theme = Some(*theme);
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    fn draw_pickup_radius(&mut self, player: &Player) {
        self.ring(player.position, player.pickup_radius, '.', C_RING);
        if player.barrier_radius > 0.0 {
            self.ring(player.position, player.barrier_radius, '~', C_BARRIER);
        }
    }

    fn draw_experience(&mut self, orbs: &[ExperienceOrb]) {
        for orb in orbs {
            self.plot(orb.position, '∙', C_ORB);
        }
    }

    fn draw_item_drops(&mut self, drops: &[ItemDrop]) {
        for drop in drops {
            let glyph = match drop.kind {
                ItemKind::Core => 'C',
                ItemKind::Reactor => 'R',
                ItemKind::Armor => 'A',
                ItemKind::DroneChip => 'D',
            };
            self.plot(drop.position, glyph, C_ITEM);
        }
    }

    fn draw_portal(&mut self, portal: Option<&Portal>) {
        if let Some(portal) = portal {
            let glyph = if portal.pulse.fract() < 0.5 { '◎' } else { '○' };
            self.plot(portal.position, glyph, C_PORTAL);
        }
    }

    fn draw_player(&mut self, player: &Player) {
        let color = if player.invulnerable_timer > 0.0 { C_PLAYER_HURT } else { C_PLAYER };
        self.plot(player.position, '@', color);
    }

    fn draw_drone(&mut self, drone: Option<&Drone>) {
        if let Some(drone) = drone {
            self.plot(drone.position, '¤', C_DRONE);
        }
    }

    fn draw_projectiles(&mut self, projectiles: &[Projectile]) {
        for projectile in projectiles {
            self.plot(projectile.position, '·', C_PROJECTILE);
        }
    }

    fn draw_boss_projectiles(&mut self, projectiles: &[BossProjectile]) {
        for projectile in projectiles {
            self.plot(projectile.position, '•', C_BOSS_PROJECTILE);
        }
    }

    fn draw_boss(&mut self, boss: Option<&Boss>) {
        let Some(boss) = boss else {
            return;
        };
        let color = if boss.hit_timer > 0.0 { Color::White } else { C_BOSS };
        self.ring(boss.position, boss.radius, '#', color);
        self.plot(boss.position, 'W', color);
    }

    fn draw_enemies(&mut self, enemies: &[Enemy]) {
        for enemy in enemies {
            let color = if enemy.hit_timer > 0.0 { Color::White } else { hex_color(enemy.kind.color()) };
            let glyph = enemy.kind.sprite_id().chars().next().unwrap_or('?');
            self.plot(enemy.position, glyph, color);
        }
    }

    fn draw_visibility_mask(&mut self, player: &Player, radius: f32) {
        let width = self.field_cols();
        for row in 0..self.field_rows() {
            for col in 0..width {
                if self.unproject(col, row).distance_to(player.position) > radius {
                    self.cells[row * width + col] = None;
                }
            }
        }
    }
}

/// `#rrggbb` to a terminal colour; anything else falls back to white.
fn hex_color(hex: &str) -> Color {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    match (hex.starts_with('#'), channel(1..3), channel(3..5), channel(5..7)) {
        (true, Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::White,
    }
}

// ── Host-side view state ──────────────────────────────────────────────────────

/// What the host shows on top of the field.
#[derive(Clone, Debug, Default)]
pub struct View {
    pub shop_open: bool,
    /// One-line notice shown under the HUD (last event, purchase result).
    pub notice: Option<String>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Write one complete frame: field, HUD, hint row and overlays.
pub fn render<W: Write, I: InputSource, S: SaveStore>(
    out: &mut W,
    game: &Simulation<I, TerminalRenderer, S>,
    view: &View,
) -> std::io::Result<()> {
    let screen = &game.renderer;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_field(out, screen)?;
    draw_hud(out, game)?;
    draw_controls_hint(out, screen)?;

    if let Some(notice) = &view.notice {
        out.queue(cursor::MoveTo(2, 2))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(notice))?;
    }

    if game.is_game_over {
        draw_game_over(out, game)?;
    } else if !game.pending_upgrades.is_empty() {
        draw_upgrade_choices(out, game)?;
    } else if view.shop_open {
        draw_shop(out, game)?;
    } else if game.is_paused {
        draw_box(out, screen, &[("PAUSED".to_string(), Color::White), ("P - Resume".to_string(), C_HINT)])?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & field ────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: &TerminalRenderer) -> std::io::Result<()> {
    let w = screen.cols as usize;
    let h = screen.rows;
    let color = match screen.theme.and_then(|theme| theme.tint) {
        Some((r, g, b, _)) => Color::Rgb { r, g, b },
        None => C_BORDER,
    };
    out.queue(style::SetForegroundColor(color))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_field<W: Write>(out: &mut W, screen: &TerminalRenderer) -> std::io::Result<()> {
    let width = screen.field_cols();
    for (i, cell) in screen.cells.iter().enumerate() {
        let Some(cell) = cell else {
            continue;
        };
        let (col, row) = (i % width, i / width);
        out.queue(cursor::MoveTo(col as u16 + 1, row as u16 + 2))?;
        out.queue(style::SetForegroundColor(cell.color))?;
        out.queue(Print(cell.glyph))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write, I: InputSource, S: SaveStore>(
    out: &mut W,
    game: &Simulation<I, TerminalRenderer, S>,
) -> std::io::Result<()> {
    let screen = &game.renderer;
    let stage = &game.stage;
    let theme = screen.theme.map_or("", |theme| theme.name);

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    let progress = if stage.is_boss_stage() {
        "BOSS".to_string()
    } else {
        format!("{}/{}", stage.kills, stage.kills_needed)
    };
    out.queue(Print(format!(
        "Stage {} [{}] {}  Lv {} ({}/{})  ¢{}",
        stage.stage,
        theme,
        progress,
        game.upgrades.level,
        game.upgrades.exp,
        game.upgrades.next_exp,
        game.currency,
    )))?;

    if let Some(boss) = &game.boss {
        let filled = (boss.health_ratio() * 10.0).ceil() as usize;
        let bar = format!(
            " Boss P{} [{}{}]",
            game.encounter.phase,
            "█".repeat(filled),
            "░".repeat(10usize.saturating_sub(filled))
        );
        out.queue(style::SetForegroundColor(C_BOSS))?;
        out.queue(Print(bar))?;
    }

    let player = &game.player;
    let auto = if game.auto_build {
        match game.auto_build_mode {
            AutoBuildMode::Attack => "AUTO:ATK ",
            AutoBuildMode::Survival => "AUTO:SRV ",
            AutoBuildMode::Balance => "AUTO:BAL ",
        }
    } else {
        ""
    };
    let shop_flag = if game.shop.has_update { "$! " } else { "" };
    let health = format!(
        "{}{}HP {:.0}/{:.0}",
        auto, shop_flag, player.health.max(0.0), player.max_health
    );
    let x = screen.cols.saturating_sub(health.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(health))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, screen: &TerminalRenderer) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ Move  SPACE Nova  Q/W/E Skills  B Shop  A Auto  C/H/D Boss  X Cancel  P Pause  ESC Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_upgrade_choices<W: Write, I: InputSource, S: SaveStore>(
    out: &mut W,
    game: &Simulation<I, TerminalRenderer, S>,
) -> std::io::Result<()> {
    let mut lines = vec![(format!("LEVEL {} - choose an upgrade", game.upgrades.level), Color::Yellow)];
    for (i, option) in game.pending_upgrades.iter().enumerate() {
        let tags: Vec<&str> = option.tags.iter().map(|tag| tag.as_str()).collect();
        lines.push((
            format!("[{}] {} - {} ({})", i + 1, option.name, option.description, tags.join(", ")),
            Color::White,
        ));
    }
    draw_box(out, &game.renderer, &lines)
}

fn draw_shop<W: Write, I: InputSource, S: SaveStore>(
    out: &mut W,
    game: &Simulation<I, TerminalRenderer, S>,
) -> std::io::Result<()> {
    let mut lines = vec![(format!("SHOP - ¢{}", game.currency), Color::Yellow)];
    for (i, offer) in game.shop.offers.iter().enumerate() {
        let color = if offer.sold {
            C_HINT
        } else if u64::from(offer.item.cost) > game.currency {
            Color::DarkRed
        } else {
            Color::White
        };
        let status = if offer.sold { " SOLD".to_string() } else { format!(" ¢{}", offer.item.cost) };
        lines.push((
            format!("[{}] {} - {}{}", i + 1, offer.item.name, offer.item.description, status),
            color,
        ));
    }
    lines.push(("B - Close".to_string(), C_HINT));
    draw_box(out, &game.renderer, &lines)
}

fn draw_game_over<W: Write, I: InputSource, S: SaveStore>(
    out: &mut W,
    game: &Simulation<I, TerminalRenderer, S>,
) -> std::io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (
            format!("Stage {}  Level {}", game.stage.stage, game.upgrades.level),
            Color::Yellow,
        ),
        ("ENTER - Menu  ESC - Quit".to_string(), Color::White),
    ];
    draw_box(out, &game.renderer, &lines)
}

/// Centred block of lines.
fn draw_box<W: Write>(
    out: &mut W,
    screen: &TerminalRenderer,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = screen.cols / 2;
    let start_row = (screen.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}
