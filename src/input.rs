/// Control state shared between the input collaborator and the simulation.
///
/// The collaborator feeds pointer ("touch") and button events in; the tick
/// reads the continuous state and consumes the latched edges.

/// Virtual stick radius: a drag this long (or longer) is full deflection.
pub const STICK_RADIUS: f32 = 100.0;

/// Radians of player rotation per pixel of horizontal aim drag.
pub const AIM_SENSITIVITY: f32 = 0.005;

pub type TouchId = u64;

/// Region of the surface a touch started in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    /// Left half: virtual joystick.
    Movement,
    /// Right half: horizontal swipe turns the player.
    Aim,
}

impl Zone {
    pub fn at(x: f32, surface_width: f32) -> Zone {
        if x < surface_width / 2.0 {
            Zone::Movement
        } else {
            Zone::Aim
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Fire,
    Jump,
    Reload,
    Sprint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MoveTouch {
    id: TouchId,
    origin_x: f32,
    origin_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AimTouch {
    id: TouchId,
    prev_x: f32,
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    /// Movement vector, inside the unit disc.
    pub move_x: f32,
    pub move_y: f32,
    pub firing: bool,
    pub sprinting: bool,
    move_touch: Option<MoveTouch>,
    aim_touch: Option<AimTouch>,
    pending_rotation: f32,
    jump_pressed: bool,
    reload_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Touches ──────────────────────────────────────────────────────────────

    /// A new touch in `zone`.  Ignored if that zone is already tracking one,
    /// or if `id` is already tracked by either zone.
    pub fn touch_start(&mut self, zone: Zone, id: TouchId, x: f32, y: f32) {
        if self.tracks(id) {
            return;
        }
        match zone {
            Zone::Movement if self.move_touch.is_none() => {
                self.move_touch = Some(MoveTouch { id, origin_x: x, origin_y: y });
            }
            Zone::Aim if self.aim_touch.is_none() => {
                self.aim_touch = Some(AimTouch { id, prev_x: x });
            }
            _ => {}
        }
    }

    fn tracks(&self, id: TouchId) -> bool {
        self.move_touch.map_or(false, |t| t.id == id)
            || self.aim_touch.map_or(false, |t| t.id == id)
    }

    pub fn touch_move(&mut self, id: TouchId, x: f32, y: f32) {
        if let Some(touch) = self.move_touch.filter(|t| t.id == id) {
            let dx = x - touch.origin_x;
            let dy = y - touch.origin_y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > STICK_RADIUS {
                self.move_x = dx / dist;
                self.move_y = dy / dist;
            } else {
                self.move_x = dx / STICK_RADIUS;
                self.move_y = dy / STICK_RADIUS;
            }
        }
        if let Some(touch) = self.aim_touch.as_mut().filter(|t| t.id == id) {
            let dx = x - touch.prev_x;
            touch.prev_x = x;
            self.pending_rotation += dx * AIM_SENSITIVITY;
        }
    }

    pub fn touch_end(&mut self, id: TouchId) {
        if self.move_touch.is_some_and(|t| t.id == id) {
            self.move_touch = None;
            self.move_x = 0.0;
            self.move_y = 0.0;
        }
        if self.aim_touch.is_some_and(|t| t.id == id) {
            self.aim_touch = None;
        }
    }

    /// Where the active movement touch went down, if any.
    pub fn move_anchor(&self) -> Option<(f32, f32)> {
        self.move_touch.map(|t| (t.origin_x, t.origin_y))
    }

    // ── Keyboard fallbacks ───────────────────────────────────────────────────

    /// Steer without a touch.  The vector is clamped to the unit disc; a live
    /// movement touch takes precedence.
    pub fn steer(&mut self, x: f32, y: f32) {
        if self.move_touch.is_some() {
            return;
        }
        let len = (x * x + y * y).sqrt();
        if len > 1.0 {
            self.move_x = x / len;
            self.move_y = y / len;
        } else {
            self.move_x = x;
            self.move_y = y;
        }
    }

    /// Turn as if the aim touch had been dragged `dx` pixels.
    pub fn aim_by(&mut self, dx: f32) {
        self.pending_rotation += dx * AIM_SENSITIVITY;
    }

    // ── Buttons ──────────────────────────────────────────────────────────────

    pub fn press(&mut self, control: Control) {
        match control {
            Control::Fire => self.firing = true,
            Control::Sprint => self.sprinting = true,
            Control::Jump => self.jump_pressed = true,
            Control::Reload => self.reload_pressed = true,
        }
    }

    /// Jump and reload are press-only; releasing them does nothing.
    pub fn release(&mut self, control: Control) {
        match control {
            Control::Fire => self.firing = false,
            Control::Sprint => self.sprinting = false,
            Control::Jump | Control::Reload => {}
        }
    }

    pub fn is_moving(&self) -> bool {
        self.move_x != 0.0 || self.move_y != 0.0
    }

    // ── Consumed by the tick ─────────────────────────────────────────────────

    pub fn take_rotation(&mut self) -> f32 {
        std::mem::take(&mut self.pending_rotation)
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_pressed)
    }
}
