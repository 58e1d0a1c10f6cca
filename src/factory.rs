/// Bullet and enemy construction on top of the object pools.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::{Bullet, Enemy, BULLET_SPEED, ENEMY_BASE_HEALTH};
use crate::pool::Pool;

/// Fire a bullet from `(x, y)` along the unit direction `(dir_x, dir_y)`.
///
/// Position and velocity are always overwritten, so a recycled bullet never
/// carries anything over from its previous flight.
pub fn create_bullet(pool: &mut Pool<Bullet>, x: f32, y: f32, dir_x: f32, dir_y: f32) -> Bullet {
    let mut bullet = pool.acquire_with(Bullet::new);
    bullet.x = x;
    bullet.y = y;
    bullet.vx = dir_x * BULLET_SPEED;
    bullet.vy = dir_y * BULLET_SPEED;
    bullet
}

/// Bring an enemy into play at a random spot inside `width` x `height`.
///
/// Position and health are rolled on every spawn.  The patrol heading is
/// only rolled when a new enemy is constructed: a recycled one resumes the
/// heading it last patrolled with.
pub fn spawn_enemy(
    pool: &mut Pool<Enemy>,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
    difficulty: f32,
) -> Enemy {
    let mut enemy = pool.acquire_with(|| Enemy::new(difficulty, rng.gen::<f32>() * TAU));
    enemy.x = rng.gen::<f32>() * width;
    enemy.y = rng.gen::<f32>() * height;
    enemy.health = (ENEMY_BASE_HEALTH * difficulty) as i32;
    enemy
}
