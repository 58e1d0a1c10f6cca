/// Scene description layer.
///
/// [`draw_list`] turns an immutable view of the simulation (plus the input
/// state, for the joystick overlay) into flat-shape draw commands in world
/// coordinates.  Nothing here touches the terminal; the binary's display
/// module rasterizes the list.

use crossterm::style::Color;

use crate::entities::{SimulationState, PARTICLE_LIFE};
use crate::input::InputState;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Rgb { r: 0x22, g: 0x22, b: 0x22 };
pub const C_PLAYER: Color = Color::Blue;
pub const C_BARREL: Color = Color::Cyan;
pub const C_JUMP_GLOW: Color = Color::Green;
pub const C_BULLET_PLAYER: Color = Color::Yellow;
pub const C_BULLET_ENEMY: Color = Color::Red;
pub const C_ENEMY: Color = Color::Red;
pub const C_PARTICLE: Color = Color::Rgb { r: 0xff, g: 0xa5, b: 0x00 };
pub const C_HUD: Color = Color::White;
pub const C_JOYSTICK: Color = Color::White;

const BARREL_LENGTH: f32 = 40.0;
const BARREL_HALF_WIDTH: f32 = 5.0;
const PARTICLE_SIZE: f32 = 6.0;
const JOYSTICK_RADIUS: f32 = 50.0;
const HUD_X: f32 = 20.0;
const HUD_Y: f32 = 40.0;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Paint the whole surface.
    Fill { color: Color },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
        filled: bool,
        alpha: f32,
    },
    /// Convex quadrilateral, corners in drawing order.
    Quad { corners: [(f32, f32); 4], color: Color },
    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        alpha: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
    },
    /// Text whose baseline starts at `(x, y)`.
    Text { x: f32, y: f32, text: String, color: Color },
}

/// Describe one complete frame.
pub fn draw_list(state: &SimulationState, input: &InputState) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(
        4 + state.bullets.len() + state.enemies.len() + state.particles.len(),
    );

    cmds.push(DrawCmd::Fill { color: C_BACKGROUND });
    draw_player(&mut cmds, state);

    for b in &state.bullets {
        cmds.push(DrawCmd::Circle {
            x: b.x,
            y: b.y,
            radius: b.radius,
            color: bullet_color(b.vx),
            filled: true,
            alpha: 1.0,
        });
    }

    for e in &state.enemies {
        cmds.push(DrawCmd::Circle {
            x: e.x,
            y: e.y,
            radius: e.radius,
            color: C_ENEMY,
            filled: true,
            alpha: 1.0,
        });
    }

    for p in &state.particles {
        cmds.push(DrawCmd::Rect {
            x: p.x,
            y: p.y,
            w: PARTICLE_SIZE,
            h: PARTICLE_SIZE,
            color: C_PARTICLE,
            alpha: particle_alpha(p.life),
        });
    }

    cmds.push(DrawCmd::Text {
        x: HUD_X,
        y: HUD_Y,
        text: hud_text(state),
        color: C_HUD,
    });

    draw_joystick(&mut cmds, input);
    cmds
}

/// Bullets carry no owner, so rightward-moving ones are drawn as the
/// player's and everything else as the enemy's.  Vertical shots from the
/// player therefore show up red.
pub fn bullet_color(vx: f32) -> Color {
    if vx > 0.0 {
        C_BULLET_PLAYER
    } else {
        C_BULLET_ENEMY
    }
}

pub fn particle_alpha(life: i32) -> f32 {
    (life as f32 / PARTICLE_LIFE as f32).clamp(0.0, 1.0)
}

pub fn hud_text(state: &SimulationState) -> String {
    let p = &state.player;
    format!("Health: {}  Ammo: {}/{}", p.health, p.ammo, p.max_ammo)
}

fn draw_player(cmds: &mut Vec<DrawCmd>, state: &SimulationState) {
    let p = &state.player;
    cmds.push(DrawCmd::Circle {
        x: p.x,
        y: p.y,
        radius: p.radius,
        color: C_PLAYER,
        filled: true,
        alpha: 1.0,
    });

    // Barrel: local rectangle (0, -5)..(40, 5), rotated about the centre.
    let (sin, cos) = p.rotation.sin_cos();
    let to_world = |lx: f32, ly: f32| (p.x + lx * cos - ly * sin, p.y + lx * sin + ly * cos);
    cmds.push(DrawCmd::Quad {
        corners: [
            to_world(0.0, -BARREL_HALF_WIDTH),
            to_world(BARREL_LENGTH, -BARREL_HALF_WIDTH),
            to_world(BARREL_LENGTH, BARREL_HALF_WIDTH),
            to_world(0.0, BARREL_HALF_WIDTH),
        ],
        color: C_BARREL,
    });

    if p.jump_height > 0.0 {
        cmds.push(DrawCmd::Circle {
            x: p.x,
            y: p.y,
            radius: p.radius + p.jump_height / 2.0,
            color: C_JUMP_GLOW,
            filled: false,
            alpha: 0.5,
        });
    }
}

fn draw_joystick(cmds: &mut Vec<DrawCmd>, input: &InputState) {
    if !input.is_moving() {
        return;
    }
    let Some((ox, oy)) = input.move_anchor() else {
        return;
    };
    cmds.push(DrawCmd::Circle {
        x: ox,
        y: oy,
        radius: JOYSTICK_RADIUS,
        color: C_JOYSTICK,
        filled: false,
        alpha: 1.0,
    });
    cmds.push(DrawCmd::Line {
        from: (ox, oy),
        to: (ox + input.move_x * JOYSTICK_RADIUS, oy + input.move_y * JOYSTICK_RADIUS),
        color: C_JOYSTICK,
    });
}
