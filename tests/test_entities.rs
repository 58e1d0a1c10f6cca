use touch_shooter::entities::*;
use touch_shooter::factory::{create_bullet, spawn_enemy};
use touch_shooter::pool::Pool;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[test]
fn level_difficulty_scalars() {
    assert_eq!(Level::Easy.difficulty(), 1.0);
    assert_eq!(Level::Medium.difficulty(), 1.5);
    assert_eq!(Level::Hard.difficulty(), 2.0);
}

#[test]
fn level_names_round_trip_case_insensitively() {
    assert_eq!(Level::from_name("HARD"), Some(Level::Hard));
    assert_eq!(Level::from_name(" easy "), Some(Level::Easy));
    assert_eq!(Level::from_name(Level::Medium.name()), Some(Level::Medium));
    assert_eq!(Level::from_name("nightmare"), None);
}

// ── Pool ──────────────────────────────────────────────────────────────────────

#[test]
fn pool_constructs_only_when_empty() {
    let mut pool: Pool<u32> = Pool::new();
    assert!(pool.is_empty());
    let a = pool.acquire_with(|| 1);
    let b = pool.acquire_with(|| 2);
    assert_eq!((a, b), (1, 2));
    assert_eq!(pool.constructed(), 2);

    pool.release(a);
    let c = pool.acquire_with(|| 99);
    assert_eq!(c, 1);
    assert_eq!(pool.constructed(), 2);
}

#[test]
fn pool_is_lifo() {
    let mut pool: Pool<&str> = Pool::new();
    pool.release("first");
    pool.release("second");
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.acquire_with(|| "fresh"), "second");
    assert_eq!(pool.acquire_with(|| "fresh"), "first");
    assert_eq!(pool.acquire_with(|| "fresh"), "fresh");
}

#[test]
fn bullet_cycles_never_grow_the_pool() {
    let mut pool = Pool::new();
    let mut live = Vec::new();
    for cycle in 0..100 {
        for _ in 0..(cycle % 4 + 1) {
            live.push(create_bullet(&mut pool, 0.0, 0.0, 1.0, 0.0));
        }
        for b in live.drain(..) {
            pool.release(b);
        }
    }
    assert_eq!(pool.constructed(), 4);
    assert_eq!(pool.len(), 4);
}

// ── Factories ─────────────────────────────────────────────────────────────────

#[test]
fn create_bullet_scales_direction() {
    let mut pool = Pool::new();
    let b = create_bullet(&mut pool, 10.0, 20.0, 0.6, -0.8);
    assert_eq!((b.x, b.y), (10.0, 20.0));
    assert!((b.vx - 7.2).abs() < 1e-5);
    assert!((b.vy + 9.6).abs() < 1e-5);
    assert_eq!(b.radius, BULLET_RADIUS);
}

#[test]
fn recycled_bullet_is_fully_overwritten() {
    let mut pool = Pool::new();
    let mut old = create_bullet(&mut pool, 500.0, 500.0, 1.0, 0.0);
    old.x = -3.0;
    pool.release(old);

    let b = create_bullet(&mut pool, 1.0, 2.0, 0.0, 1.0);
    assert_eq!((b.x, b.y, b.vx, b.vy), (1.0, 2.0, 0.0, 12.0));
    assert_eq!(pool.constructed(), 1);
}

#[test]
fn spawn_enemy_rolls_position_and_health() {
    let mut pool = Pool::new();
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let e = spawn_enemy(&mut pool, &mut rng, 640.0, 480.0, 2.0);
        assert!(e.x >= 0.0 && e.x <= 640.0);
        assert!(e.y >= 0.0 && e.y <= 480.0);
        assert_eq!(e.health, 100);
        assert_eq!(e.radius, ENEMY_RADIUS);
        assert!((e.speed - 2.4).abs() < 1e-6);
        assert!(e.patrol_dir >= 0.0 && e.patrol_dir < std::f32::consts::TAU);
        assert_eq!(e.state, EnemyState::Patrol);
    }
}

#[test]
fn recycled_enemy_keeps_patrol_heading() {
    let mut pool = Pool::new();
    let mut rng = seeded_rng();
    let mut e = spawn_enemy(&mut pool, &mut rng, 640.0, 480.0, 1.0);
    e.patrol_dir = 1.25;
    e.health = -20;
    e.state = EnemyState::Chase;
    pool.release(e);

    let again = spawn_enemy(&mut pool, &mut rng, 640.0, 480.0, 1.0);
    assert_eq!(again.patrol_dir, 1.25);
    assert_eq!(again.health, 50);
    assert_eq!(again.state, EnemyState::Chase);
    assert_eq!(pool.constructed(), 1);
}

// ── State ─────────────────────────────────────────────────────────────────────

#[test]
fn new_player_defaults() {
    let p = Player::new(5.0, 6.0);
    assert_eq!((p.x, p.y), (5.0, 6.0));
    assert_eq!(p.radius, PLAYER_RADIUS);
    assert_eq!(p.speed, PLAYER_SPEED);
    assert_eq!(p.rotation, 0.0);
    assert!(!p.is_jumping);
    assert_eq!(p.jump_height, 0.0);
}

#[test]
fn state_clone_is_independent() {
    let original = touch_shooter::compute::init_state(
        Level::Easy,
        400.0,
        300.0,
        std::time::Instant::now(),
    );
    let mut cloned = original.clone();

    cloned.player.x = 99.0;
    cloned.enemies.push(Enemy::new(1.0, 0.0));
    cloned.bullet_pool.release(Bullet::new());

    assert_eq!(original.player.x, 200.0);
    assert!(original.enemies.is_empty());
    assert!(original.bullet_pool.is_empty());
}
