use log::{debug, info, trace};

use super::mode::AnimationMode;
use super::params::{nominal, AnimationParams};

/// Idle arm swing half-range in degrees
pub const IDLE_SWING: f32 = 30.0;
/// Idle body bob height
pub const IDLE_BOB: f32 = 0.25;

pub const WAVE_HEAD_TILT: f32 = 20.0;
pub const WAVE_SWING: f32 = 40.0;
/// Angle at which the left arm is parked while waving
pub const WAVE_PARK: f32 = 45.0;

pub const SWIM_HEAD: f32 = 30.0;
pub const SWIM_STROKE: f32 = 55.0;
/// Speed multiplier applied when the stroke reaches its upper bound,
/// and divisor when it reaches the lower bound
pub const SWIM_STROKE_ACCEL: f32 = 3.0;
pub const SWIM_KICK: f32 = 50.0;

pub const SOMERSAULT_HEAD: f32 = 30.0;
pub const SOMERSAULT_SINK: f32 = -1.0;
pub const SOMERSAULT_TURN: f32 = 360.0;
pub const SOMERSAULT_LEG_TUCK: f32 = 55.0;
pub const SOMERSAULT_HAND: f32 = 50.0;
/// Recovery rates once the roll has finished
pub const SOMERSAULT_HEAD_DECAY: f32 = 20.0;
pub const SOMERSAULT_LEG_DECAY: f32 = 40.0;
pub const SOMERSAULT_HAND_DECAY: f32 = 60.0;

pub const COMBO_YAW: f32 = 20.0;
pub const COMBO_GUARD: f32 = 40.0;
pub const COMBO_PUNCH_REACH: f32 = 20.0;
/// Punches thrown before the kick
pub const COMBO_PUNCHES: u32 = 2;
pub const COMBO_KICK_RAISE: f32 = 30.0;
pub const COMBO_KICK_SPEED_FACTOR: f32 = 2.0;
pub const COMBO_LUNGE: f32 = 10.0;
pub const COMBO_LUNGE_SPEED_FACTOR: f32 = 3.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

/// Integrate `amount` and flip the sign of `speed` when a bound is reached
/// while still moving outward.
///
/// The amount is not clamped, so it can pass a bound by at most one step.
fn bounce(amount: &mut f32, speed: &mut f32, lower: f32, upper: f32, dt: f32) -> Option<Bound> {
    *amount += dt * *speed;
    if *amount >= upper && *speed > 0.0 {
        *speed = -*speed;
        Some(Bound::Upper)
    } else if *amount <= lower && *speed < 0.0 {
        *speed = -*speed;
        Some(Bound::Lower)
    } else {
        None
    }
}

/// Integrate `amount` up to `target`, then clamp it and zero `speed`.
/// Returns true once the target has been reached.
fn ramp_up(amount: &mut f32, speed: &mut f32, target: f32, dt: f32) -> bool {
    *amount += dt * *speed;
    if *amount >= target {
        *amount = target;
        *speed = 0.0;
        true
    } else {
        false
    }
}

fn ramp_down(amount: &mut f32, speed: &mut f32, target: f32, dt: f32) -> bool {
    *amount += dt * *speed;
    if *amount <= target {
        *amount = target;
        *speed = 0.0;
        true
    } else {
        false
    }
}

/// Drive `amount` back to zero at `rate`, never past it.
fn decay(amount: &mut f32, speed: &mut f32, rate: f32, dt: f32) {
    if *amount > 0.0 {
        *speed = -rate;
    }
    ramp_down(amount, speed, 0.0, dt);
}

/// Owns the active mode and integrates its parameters once per frame
#[derive(Debug, Clone)]
pub struct AnimationController {
    mode: AnimationMode,
    params: AnimationParams,
    max_dt: Option<f32>,
}

impl AnimationController {
    pub fn new(mode: AnimationMode) -> Self {
        Self {
            mode,
            params: AnimationParams::default(),
            max_dt: None,
        }
    }

    /// Clamp frame times to `max_dt` before integrating
    pub fn with_max_dt(mut self, max_dt: Option<f32>) -> Self {
        self.max_dt = max_dt;
        self
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    /// Switch to `mode` and restore every parameter to its default.
    ///
    /// Re-selecting the active mode restarts it.
    pub fn select_mode(&mut self, mode: AnimationMode) {
        info!("Animation mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.params.reset();
    }

    /// Advance the active mode by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = match self.max_dt {
            Some(max_dt) => dt.min(max_dt),
            None => dt,
        };

        let p = &mut self.params;
        match self.mode {
            AnimationMode::Default => p.reset(),
            AnimationMode::Idle => update_idle(p, dt),
            AnimationMode::Waving => update_waving(p, dt),
            AnimationMode::Swimming => update_swimming(p, dt),
            AnimationMode::Somersault => update_somersault(p, dt),
            AnimationMode::ComboAttack => update_combo_attack(p, dt),
        }
        trace!("{} dt={:.4} {:?}", self.mode, dt, self.params);
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(AnimationMode::Default)
    }
}

fn update_idle(p: &mut AnimationParams, dt: f32) {
    bounce(
        &mut p.left_hand_translate_amt,
        &mut p.left_hand_translate_speed,
        -IDLE_SWING,
        IDLE_SWING,
        dt,
    );
    bounce(&mut p.body_bob_amt, &mut p.body_bob_speed, 0.0, IDLE_BOB, dt);
}

fn update_waving(p: &mut AnimationParams, dt: f32) {
    p.head_rotate_amt += dt * p.head_rotate_speed;
    if p.head_rotate_amt >= WAVE_HEAD_TILT {
        p.head_rotate_amt = WAVE_HEAD_TILT;
        p.head_rotate_speed = 0.0;
    } else {
        p.head_rotate_speed = nominal::HEAD_ROTATE_SPEED;
    }

    // The forearm shares the hand's bound test
    p.right_forearm_rot_amt += dt * p.right_forearm_rot_speed;
    let swung = bounce(
        &mut p.right_hand_translate_amt,
        &mut p.right_hand_translate_speed,
        0.0,
        WAVE_SWING,
        dt,
    );
    if swung.is_some() {
        p.right_forearm_rot_speed = -p.right_forearm_rot_speed;
    }

    ramp_up(
        &mut p.left_hand_translate_amt,
        &mut p.left_hand_rot_speed,
        WAVE_PARK,
        dt,
    );
}

fn update_swimming(p: &mut AnimationParams, dt: f32) {
    bounce(&mut p.head_rotate_amt, &mut p.head_rotate_speed, -SWIM_HEAD, SWIM_HEAD, dt);

    match bounce(
        &mut p.hand_rotate_amt,
        &mut p.hand_rotate_speed,
        -SWIM_STROKE,
        SWIM_STROKE,
        dt,
    ) {
        Some(Bound::Upper) => p.hand_rotate_speed *= SWIM_STROKE_ACCEL,
        Some(Bound::Lower) => p.hand_rotate_speed /= SWIM_STROKE_ACCEL,
        None => {}
    }

    bounce(&mut p.leg_rotate_amt, &mut p.leg_rotate_speed, -SWIM_KICK, SWIM_KICK, dt);
}

fn update_somersault(p: &mut AnimationParams, dt: f32) {
    if p.somersault_finished {
        decay(&mut p.head_rotate_amt, &mut p.head_rotate_speed, SOMERSAULT_HEAD_DECAY, dt);
        decay(&mut p.leg_tuck_amt, &mut p.leg_tuck_speed, SOMERSAULT_LEG_DECAY, dt);
        decay(&mut p.hand_rotate_amt, &mut p.hand_rotate_speed, SOMERSAULT_HAND_DECAY, dt);
        return;
    }

    ramp_up(&mut p.head_rotate_amt, &mut p.head_rotate_speed, SOMERSAULT_HEAD, dt);

    // Crouch first; the roll starts once the body has sunk
    if ramp_down(&mut p.body_sink_amt, &mut p.body_sink_speed, SOMERSAULT_SINK, dt) {
        p.body_rot_amt += dt * p.body_rot_speed;
        p.body_trans_amt += dt * p.body_trans_speed;
        if p.body_rot_amt >= SOMERSAULT_TURN {
            p.body_rot_amt = SOMERSAULT_TURN;
            p.body_rot_speed = 0.0;
            p.body_trans_speed = 0.0;
            p.somersault_finished = true;
            debug!("Somersault finished at travel {:.2}", p.body_trans_amt);
        }
    }

    ramp_up(&mut p.leg_tuck_amt, &mut p.leg_tuck_speed, SOMERSAULT_LEG_TUCK, dt);
    ramp_up(&mut p.hand_rotate_amt, &mut p.hand_rotate_speed, SOMERSAULT_HAND, dt);
}

/// One punch out and back. Returns true when the fist is home again.
fn punch(amount: &mut f32, speed: &mut f32, dt: f32) -> bool {
    match bounce(amount, speed, 0.0, COMBO_PUNCH_REACH, dt) {
        Some(Bound::Lower) => {
            *amount = 0.0;
            true
        }
        Some(Bound::Upper) | None => false,
    }
}

/// Out to `upper` and back, stopping for good at zero.
fn kick_ramp(amount: &mut f32, speed: &mut f32, upper: f32, dt: f32) {
    if bounce(amount, speed, 0.0, upper, dt) == Some(Bound::Lower) {
        *amount = 0.0;
        *speed = 0.0;
    }
}

fn update_combo_attack(p: &mut AnimationParams, dt: f32) {
    // The kick flag only lives for the frame that raised it
    p.kick_anim = false;

    ramp_up(&mut p.body_rot_amt, &mut p.body_yaw_speed, COMBO_YAW, dt);

    if ramp_up(&mut p.hand_rotate_amt, &mut p.hand_rotate_speed, COMBO_GUARD, dt) {
        if p.left_hand_anim {
            if punch(&mut p.left_hand_translate_amt, &mut p.left_hand_translate_speed, dt) {
                p.punch_counter += 1;
                p.left_hand_anim = false;
                p.right_hand_anim = true;
                debug!("Left punch landed ({})", p.punch_counter);
            }
        } else if p.right_hand_anim
            && punch(&mut p.right_hand_translate_amt, &mut p.right_hand_translate_speed, dt)
        {
            p.punch_counter += 1;
            p.right_hand_anim = false;
            p.left_hand_anim = true;
            debug!("Right punch landed ({})", p.punch_counter);
        }

        if p.punch_counter >= COMBO_PUNCHES && (p.left_hand_anim || p.right_hand_anim) {
            p.left_hand_anim = false;
            p.right_hand_anim = false;
            p.kick_anim = true;
            p.leg_rotate_speed = COMBO_KICK_SPEED_FACTOR * nominal::LEG_ROTATE_SPEED;
            p.body_trans_speed = COMBO_LUNGE_SPEED_FACTOR * nominal::BODY_TRANS_SPEED;
            debug!("Kick started");
        }
    }

    if p.punch_counter >= COMBO_PUNCHES {
        kick_ramp(&mut p.leg_rotate_amt, &mut p.leg_rotate_speed, COMBO_KICK_RAISE, dt);
        kick_ramp(&mut p.body_trans_amt, &mut p.body_trans_speed, COMBO_LUNGE, dt);
    }
}
