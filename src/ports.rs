//! Boundaries to the outside world: input, drawing and save storage.
//!
//! The simulation only talks to these traits.  Stock adapters live here too:
//! [`VirtualInput`] (a host feeds it key state), [`NullRenderer`],
//! [`MemoryStore`] and [`FileStore`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::drone::Drone;
use crate::entities::{
    Boss, BossProjectile, Enemy, ExperienceOrb, ItemDrop, Player, Portal, Projectile,
};
use crate::error::{GameError, GameResult};
use crate::save::SaveSnapshot;
use crate::stage::StageTheme;
use crate::vector2::Vector2;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Edge-triggered keys the simulation reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Nova skill.
    Space,
    Q,
    W,
    E,
    R,
}

pub trait InputSource {
    /// Unit movement direction, or the zero vector when nothing is held.
    fn direction(&self) -> Vector2;
    /// True once per press; the press is forgotten after it is read.
    fn consume_pressed(&mut self, key: Key) -> bool;
}

/// Input state pushed in by a host (terminal, test, replay script).
#[derive(Clone, Debug, Default)]
pub struct VirtualInput {
    direction: Vector2,
    just_pressed: HashSet<Key>,
}

impl VirtualInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the held direction from raw axis values; non-zero input is
    /// normalized so diagonals are not faster.
    pub fn set_direction(&mut self, x: f32, y: f32) {
        let raw = Vector2::new(x, y);
        self.direction = if raw.length() > 0.0 { raw.normalize() } else { raw };
    }

    pub fn press(&mut self, key: Key) {
        self.just_pressed.insert(key);
    }
}

impl InputSource for VirtualInput {
    fn direction(&self) -> Vector2 {
        self.direction
    }

    fn consume_pressed(&mut self, key: Key) -> bool {
        self.just_pressed.remove(&key)
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Per-frame draw requests.  Every method defaults to a no-op so a sink can
/// implement only what it shows.  Entities are lent read-only.
#[allow(unused_variables)]
pub trait Renderer {
    fn begin_frame(&mut self, camera: Vector2, theme: &StageTheme) {}
    fn draw_pickup_radius(&mut self, player: &Player) {}
    fn draw_experience(&mut self, orbs: &[ExperienceOrb]) {}
    fn draw_item_drops(&mut self, drops: &[ItemDrop]) {}
    fn draw_portal(&mut self, portal: Option<&Portal>) {}
    fn draw_player(&mut self, player: &Player) {}
    fn draw_drone(&mut self, drone: Option<&Drone>) {}
    fn draw_projectiles(&mut self, projectiles: &[Projectile]) {}
    fn draw_boss_projectiles(&mut self, projectiles: &[BossProjectile]) {}
    fn draw_boss(&mut self, boss: Option<&Boss>) {}
    fn draw_enemies(&mut self, enemies: &[Enemy]) {}
    fn draw_visibility_mask(&mut self, player: &Player, radius: f32) {}
    fn end_frame(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}

// ── Persistence ───────────────────────────────────────────────────────────────

pub trait SaveStore {
    fn load(&self, slot: &str) -> GameResult<Option<SaveSnapshot>>;
    fn save(&mut self, slot: &str, snapshot: &SaveSnapshot) -> GameResult<()>;
    /// Small out-of-slot values, e.g. the last daily challenge date.
    fn load_value(&self, key: &str) -> GameResult<Option<String>>;
    fn save_value(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// Keeps serialized snapshots in memory.  Snapshots still go through JSON so
/// the loose-merge load path is exercised exactly as with files.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored for `slot`, if any.
    pub fn raw(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    pub fn insert_raw(&mut self, slot: &str, json: impl Into<String>) {
        self.slots.insert(slot.to_string(), json.into());
    }
}

impl SaveStore for MemoryStore {
    fn load(&self, slot: &str) -> GameResult<Option<SaveSnapshot>> {
        match self.slots.get(slot) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, slot: &str, snapshot: &SaveSnapshot) -> GameResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.slots.insert(slot.to_string(), json);
        Ok(())
    }

    fn load_value(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save_value(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One pretty-printed JSON file per slot under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn checked_name(name: &str) -> GameResult<&str> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(name)
        } else {
            Err(GameError::InvalidSlot(name.to_string()))
        }
    }

    fn slot_path(&self, slot: &str) -> GameResult<PathBuf> {
        Ok(self.dir.join(format!("slot_{}.json", Self::checked_name(slot)?)))
    }

    fn value_path(&self, key: &str) -> GameResult<PathBuf> {
        Ok(self.dir.join(format!("{}.txt", Self::checked_name(key)?)))
    }
}

impl SaveStore for FileStore {
    fn load(&self, slot: &str) -> GameResult<Option<SaveSnapshot>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&mut self, slot: &str, snapshot: &SaveSnapshot) -> GameResult<()> {
        let path = self.slot_path(slot)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }

    fn load_value(&self, key: &str) -> GameResult<Option<String>> {
        let path = self.value_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?.trim().to_string()))
    }

    fn save_value(&mut self, key: &str, value: &str) -> GameResult<()> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }
}
