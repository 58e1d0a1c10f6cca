/// Simulation step.
///
/// [`tick`] advances the whole `SimulationState` by one frame in place.  The
/// wall clock (`now`) and all randomness (`rng`) are injected so callers
/// control determinism (seeded RNG and synthetic instants in tests).

use std::f32::consts::PI;
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;

use crate::entities::{Level, Particle, Player, SimulationState, EnemyState, PARTICLE_LIFE};
use crate::factory::{create_bullet, spawn_enemy};
use crate::input::InputState;
use crate::pool::Pool;

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const SPAWN_INTERVAL: Duration = Duration::from_millis(5000);
pub const RELOAD_DELAY: Duration = Duration::from_millis(1500);

const SPRINT_FACTOR: f32 = 1.8;

const JUMP_RISE: f32 = 0.3;
const JUMP_FALL: f32 = 0.5;
const JUMP_APEX: f32 = 30.0;

/// Player bullets appear this far ahead of the player centre.
const MUZZLE_OFFSET: f32 = 30.0;
/// Enemy bullets appear this far ahead of the enemy centre.
const ENEMY_MUZZLE_OFFSET: f32 = 20.0;

pub const DETECTION_RADIUS: f32 = 400.0;
pub const FIRE_RADIUS: f32 = 300.0;
const ENEMY_FIRE_CHANCE: f32 = 0.02;
const PATROL_SPEED: f32 = 0.8;
const PATROL_TURN_CHANCE: f32 = 0.01;

pub const HIT_DAMAGE: i32 = 20;
pub const DEATH_PARTICLES: usize = 10;
const PARTICLE_SPREAD: f32 = 10.0;

/// Enemies alive at once before the spawn timer holds off.
fn spawn_cap(difficulty: f32) -> f32 {
    5.0 * difficulty
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state for a given level and world size.  The first
/// enemy is due one spawn interval after `now`.
pub fn init_state(level: Level, width: f32, height: f32, now: Instant) -> SimulationState {
    SimulationState {
        player: Player::new(width / 2.0, height / 2.0),
        bullets: Vec::new(),
        enemies: Vec::new(),
        particles: Vec::new(),
        bullet_pool: Pool::new(),
        enemy_pool: Pool::new(),
        reload_ready_at: None,
        next_spawn_at: now + SPAWN_INTERVAL,
        level,
        difficulty: level.difficulty(),
        frame: 0,
        width,
        height,
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// Sub-steps run in a fixed order and later ones see the results of earlier
/// ones (a bullet fired this tick is advanced in step 5 and may hit an enemy
/// in step 6).
pub fn tick(state: &mut SimulationState, input: &mut InputState, now: Instant, rng: &mut impl Rng) {
    state.frame += 1;

    // ── 0. Timers & edge-triggered controls ─────────────────────────────────
    spawn_due_enemies(state, now, rng);
    apply_controls(state, input);

    // ── 1. Player movement ──────────────────────────────────────────────────
    move_player(state, input.move_x, input.move_y);

    // ── 2. Jump arc ─────────────────────────────────────────────────────────
    advance_jump(&mut state.player);

    // ── 3. Reload ───────────────────────────────────────────────────────────
    update_reload(state, input.take_reload(), now);

    // ── 4. Firing ───────────────────────────────────────────────────────────
    if input.firing {
        player_fire(state);
    }

    // ── 5. Bullets ──────────────────────────────────────────────────────────
    advance_bullets(state);

    // ── 6. Enemy AI & collisions ────────────────────────────────────────────
    update_enemies(state, rng);

    // ── 7. Particles ────────────────────────────────────────────────────────
    advance_particles(&mut state.particles);
}

/// Run the spawn timer: one spawn attempt per elapsed interval.
pub fn spawn_due_enemies(state: &mut SimulationState, now: Instant, rng: &mut impl Rng) {
    while now >= state.next_spawn_at {
        state.next_spawn_at += SPAWN_INTERVAL;
        if (state.enemies.len() as f32) < spawn_cap(state.difficulty) {
            let enemy = spawn_enemy(
                &mut state.enemy_pool,
                rng,
                state.width,
                state.height,
                state.difficulty,
            );
            debug!("enemy spawned at ({:.0}, {:.0})", enemy.x, enemy.y);
            state.enemies.push(enemy);
        }
    }
}

fn apply_controls(state: &mut SimulationState, input: &mut InputState) {
    let player = &mut state.player;
    player.rotation += input.take_rotation();
    if input.take_jump() && !player.is_jumping {
        player.is_jumping = true;
        player.jump_height = 0.0;
    }
    player.is_sprinting = input.sprinting;
}

/// Move the player by one step of `(dir_x, dir_y)` and keep it inside the
/// walls.
pub fn move_player(state: &mut SimulationState, dir_x: f32, dir_y: f32) {
    let player = &mut state.player;
    let mut speed = player.speed;
    if player.is_sprinting {
        speed *= SPRINT_FACTOR;
    }
    player.x += dir_x * speed;
    player.y += dir_y * speed;

    // min-then-max so a world narrower than the player pins it to `radius`
    player.x = (state.width - player.radius).min(player.x).max(player.radius);
    player.y = (state.height - player.radius).min(player.y).max(player.radius);
}

fn advance_jump(player: &mut Player) {
    if player.is_jumping {
        player.jump_height += JUMP_RISE;
        if player.jump_height > JUMP_APEX {
            player.is_jumping = false;
        }
    } else if player.jump_height > 0.0 {
        player.jump_height = (player.jump_height - JUMP_FALL).max(0.0);
    }
}

/// Finish a reload whose deadline has passed, then start one if requested.
pub fn update_reload(state: &mut SimulationState, requested: bool, now: Instant) {
    if state.reload_ready_at.is_some_and(|at| now >= at) {
        state.reload_ready_at = None;
        state.player.ammo = state.player.max_ammo;
        debug!("reload complete");
    }
    if requested && !state.is_reloading() && state.player.ammo < state.player.max_ammo {
        state.reload_ready_at = Some(now + RELOAD_DELAY);
        debug!("reload started with {} rounds left", state.player.ammo);
    }
}

/// Fire one round along the player's facing.  Does nothing while reloading
/// or with an empty magazine.
pub fn player_fire(state: &mut SimulationState) {
    if state.player.ammo <= 0 || state.is_reloading() {
        return;
    }
    state.player.ammo -= 1;
    let (dir_y, dir_x) = state.player.rotation.sin_cos();
    let bullet = create_bullet(
        &mut state.bullet_pool,
        state.player.x + dir_x * MUZZLE_OFFSET,
        state.player.y + dir_y * MUZZLE_OFFSET,
        dir_x,
        dir_y,
    );
    state.bullets.push(bullet);
}

/// Move every bullet and recycle the ones that left the world.
pub fn advance_bullets(state: &mut SimulationState) {
    let (width, height) = (state.width, state.height);
    for i in (0..state.bullets.len()).rev() {
        let b = &mut state.bullets[i];
        b.x += b.vx;
        b.y += b.vy;
        let inside = b.x >= 0.0 && b.x <= width && b.y >= 0.0 && b.y <= height;
        if !inside {
            if !(b.x.is_finite() && b.y.is_finite()) {
                warn!("dropping bullet with non-finite position");
            }
            let bullet = state.bullets.remove(i);
            state.bullet_pool.release(bullet);
        }
    }
}

/// Enemy AI, enemy fire and bullet collisions.
///
/// Enemies are visited front to back; a dead enemy is removed in place and
/// the index is not advanced, so nobody is skipped or visited twice.
pub fn update_enemies(state: &mut SimulationState, rng: &mut impl Rng) {
    let difficulty = state.difficulty;
    let (px, py) = (state.player.x, state.player.y);

    let mut i = 0;
    while i < state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if !(enemy.x.is_finite() && enemy.y.is_finite()) {
            warn!("recycling enemy with non-finite position");
            let enemy = state.enemies.remove(i);
            state.enemy_pool.release(enemy);
            continue;
        }

        let dx = px - enemy.x;
        let dy = py - enemy.y;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < DETECTION_RADIUS {
            enemy.state = EnemyState::Chase;
            let (sin, cos) = dy.atan2(dx).sin_cos();
            enemy.x += cos * enemy.speed;
            enemy.y += sin * enemy.speed;

            if dist < FIRE_RADIUS && rng.gen::<f32>() < ENEMY_FIRE_CHANCE * difficulty {
                let (dir_x, dir_y) = (dx / dist, dy / dist);
                let bullet = create_bullet(
                    &mut state.bullet_pool,
                    enemy.x + dir_x * ENEMY_MUZZLE_OFFSET,
                    enemy.y + dir_y * ENEMY_MUZZLE_OFFSET,
                    dir_x,
                    dir_y,
                );
                state.bullets.push(bullet);
            }
        } else {
            enemy.state = EnemyState::Patrol;
            let (sin, cos) = enemy.patrol_dir.sin_cos();
            enemy.x += cos * PATROL_SPEED;
            enemy.y += sin * PATROL_SPEED;
            if rng.gen::<f32>() < PATROL_TURN_CHANCE {
                enemy.patrol_dir += (rng.gen::<f32>() - 0.5) * PI;
            }
        }

        if resolve_hits(state, i, rng) {
            let enemy = state.enemies.remove(i);
            debug!("enemy destroyed at ({:.0}, {:.0})", enemy.x, enemy.y);
            state.enemy_pool.release(enemy);
        } else {
            i += 1;
        }
    }
}

/// Test every live bullet against enemy `index`.  Each hit consumes the
/// bullet.  Returns `true` once the enemy has died, after emitting its death
/// particles; remaining bullets are left for the next enemy.
fn resolve_hits(state: &mut SimulationState, index: usize, rng: &mut impl Rng) -> bool {
    for j in (0..state.bullets.len()).rev() {
        let enemy = &mut state.enemies[index];
        let b = &state.bullets[j];
        let bdx = b.x - enemy.x;
        let bdy = b.y - enemy.y;
        if (bdx * bdx + bdy * bdy).sqrt() >= enemy.radius + b.radius {
            continue;
        }

        enemy.health -= HIT_DAMAGE;
        let (ex, ey, dead) = (enemy.x, enemy.y, enemy.health <= 0);
        let bullet = state.bullets.remove(j);
        state.bullet_pool.release(bullet);

        if dead {
            emit_death_particles(&mut state.particles, ex, ey, rng);
            return true;
        }
    }
    false
}

fn emit_death_particles(particles: &mut Vec<Particle>, x: f32, y: f32, rng: &mut impl Rng) {
    for _ in 0..DEATH_PARTICLES {
        particles.push(Particle {
            x,
            y,
            vx: (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            vy: (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            life: PARTICLE_LIFE,
        });
    }
}

/// Drift particles and drop the expired ones.
pub fn advance_particles(particles: &mut Vec<Particle>) {
    particles.retain_mut(|p| {
        p.x += p.vx;
        p.y += p.vy;
        p.life -= 1;
        if !(p.x.is_finite() && p.y.is_finite()) {
            warn!("dropping particle with non-finite position");
            return false;
        }
        p.life > 0
    });
}
