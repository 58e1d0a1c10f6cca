/// Game entity types. Pure data, no logic.

use std::time::Instant;

use crate::pool::Pool;

// ── Fixed entity parameters ───────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 3.0;
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const MAX_AMMO: i32 = 30;

pub const BULLET_RADIUS: f32 = 5.0;
/// Distance travelled per tick along a unit direction.
pub const BULLET_SPEED: f32 = 12.0;

pub const ENEMY_RADIUS: f32 = 18.0;
pub const ENEMY_BASE_SPEED: f32 = 1.2;
pub const ENEMY_BASE_HEALTH: f32 = 50.0;

/// Ticks a death particle stays alive.
pub const PARTICLE_LIFE: i32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    /// Multiplier applied to enemy speed, health, spawn cap and fire chance.
    pub fn difficulty(self) -> f32 {
        match self {
            Level::Easy => 1.0,
            Level::Medium => 1.5,
            Level::Hard => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Level> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "medium" => Some(Level::Medium),
            "hard" => Some(Level::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    Patrol,
    Chase,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    /// Facing in radians; never normalized, trig takes care of wrapping.
    pub rotation: f32,
    /// Shown on the HUD only; nothing damages the player.
    pub health: i32,
    pub ammo: i32,
    pub max_ammo: i32,
    pub is_jumping: bool,
    pub jump_height: f32,
    pub is_sprinting: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            rotation: 0.0,
            health: PLAYER_MAX_HEALTH,
            ammo: MAX_AMMO,
            max_ammo: MAX_AMMO,
            is_jumping: false,
            jump_height: 0.0,
            is_sprinting: false,
        }
    }
}

// ── Projectiles & effects ─────────────────────────────────────────────────────

/// A projectile.  Player and enemy bullets share this type; the owner is
/// not recorded.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

impl Bullet {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            radius: BULLET_RADIUS,
        }
    }
}

impl Default for Bullet {
    fn default() -> Self {
        Self::new()
    }
}

/// Death debris.  Short-lived and allocated directly, never pooled.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining ticks.
    pub life: i32,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub health: i32,
    /// Heading used while patrolling, in radians.
    pub patrol_dir: f32,
    pub state: EnemyState,
}

impl Enemy {
    pub fn new(difficulty: f32, patrol_dir: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: ENEMY_RADIUS,
            speed: ENEMY_BASE_SPEED * difficulty,
            health: ENEMY_BASE_HEALTH as i32,
            patrol_dir,
            state: EnemyState::Patrol,
        }
    }
}

// ── Master simulation state ───────────────────────────────────────────────────

/// Everything the simulation owns.  Passed by `&mut` to the tick and by `&`
/// to the renderer.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub bullet_pool: Pool<Bullet>,
    pub enemy_pool: Pool<Enemy>,
    /// When set, the pending reload completes at this instant.
    pub reload_ready_at: Option<Instant>,
    /// Next wall-clock instant the spawn timer fires.
    pub next_spawn_at: Instant,
    pub level: Level,
    pub difficulty: f32,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}

impl SimulationState {
    pub fn is_reloading(&self) -> bool {
        self.reload_ready_at.is_some()
    }

    /// Adopt new world bounds.  The player is pulled back inside on the next
    /// tick; other entities are culled or wander back on their own.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}
