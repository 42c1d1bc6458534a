/// Nominal speeds restored on every reset.
///
/// Angles are in degrees, distances in scene units, rates per second.
pub mod nominal {
    pub const JOINT_SIZE: f32 = 0.22;
    pub const EYE_SIZE: f32 = 0.12;
    pub const UPPER_BODY_SIZE: f32 = 1.0;

    pub const HEAD_ROTATE_SPEED: f32 = 50.0;
    pub const LEFT_HAND_TRANSLATE_SPEED: f32 = 30.0;
    pub const LEFT_HAND_ROT_SPEED: f32 = 30.0;
    pub const RIGHT_HAND_TRANSLATE_SPEED: f32 = 30.0;
    pub const RIGHT_FOREARM_ROT_SPEED: f32 = 30.0;
    pub const LEG_ROTATE_SPEED: f32 = 30.0;
    pub const BODY_BOB_SPEED: f32 = 0.5;
    /// Negative: the body sinks
    pub const BODY_SINK_SPEED: f32 = -2.0;
    pub const LEG_TUCK_SPEED: f32 = 50.0;
    pub const HAND_ROTATE_SPEED: f32 = 50.0;
    pub const BODY_ROT_SPEED: f32 = 180.0;
    pub const BODY_YAW_SPEED: f32 = 20.0;
    pub const BODY_TRANS_SPEED: f32 = 2.0;
}

/// Every scalar the animation modes integrate, with its rate.
///
/// Several modes share a parameter (for example `hand_rotate_amt` is the swim
/// stroke, the somersault tuck and the combo guard). That is safe because every
/// mode switch restores the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationParams {
    pub joint_size: f32,
    pub eye_size: f32,
    pub upper_body_size: f32,

    pub head_rotate_amt: f32,
    pub head_rotate_speed: f32,

    /// Idle arm swing, waving left-arm park, combo left punch
    pub left_hand_translate_amt: f32,
    pub left_hand_translate_speed: f32,
    /// Rate used while parking the left arm during the wave
    pub left_hand_rot_speed: f32,

    /// Wave swing, combo right punch
    pub right_hand_translate_amt: f32,
    pub right_hand_translate_speed: f32,
    pub right_forearm_rot_amt: f32,
    pub right_forearm_rot_speed: f32,

    /// Swim flutter, combo kick
    pub leg_rotate_amt: f32,
    pub leg_rotate_speed: f32,

    pub body_bob_amt: f32,
    pub body_bob_speed: f32,

    pub body_sink_amt: f32,
    pub body_sink_speed: f32,

    pub leg_tuck_amt: f32,
    pub leg_tuck_speed: f32,

    pub hand_rotate_amt: f32,
    pub hand_rotate_speed: f32,

    /// Somersault roll, combo yaw
    pub body_rot_amt: f32,
    pub body_rot_speed: f32,
    pub body_yaw_speed: f32,

    /// Somersault travel, combo lunge
    pub body_trans_amt: f32,
    pub body_trans_speed: f32,

    pub somersault_finished: bool,
    pub left_hand_anim: bool,
    pub right_hand_anim: bool,
    pub kick_anim: bool,
    pub punch_counter: u32,
}

impl AnimationParams {
    /// Restore every parameter to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        use nominal::*;

        Self {
            joint_size: JOINT_SIZE,
            eye_size: EYE_SIZE,
            upper_body_size: UPPER_BODY_SIZE,
            head_rotate_amt: 0.0,
            head_rotate_speed: HEAD_ROTATE_SPEED,
            left_hand_translate_amt: 0.0,
            left_hand_translate_speed: LEFT_HAND_TRANSLATE_SPEED,
            left_hand_rot_speed: LEFT_HAND_ROT_SPEED,
            right_hand_translate_amt: 0.0,
            right_hand_translate_speed: RIGHT_HAND_TRANSLATE_SPEED,
            right_forearm_rot_amt: 0.0,
            right_forearm_rot_speed: RIGHT_FOREARM_ROT_SPEED,
            leg_rotate_amt: 0.0,
            leg_rotate_speed: LEG_ROTATE_SPEED,
            body_bob_amt: 0.0,
            body_bob_speed: BODY_BOB_SPEED,
            body_sink_amt: 0.0,
            body_sink_speed: BODY_SINK_SPEED,
            leg_tuck_amt: 0.0,
            leg_tuck_speed: LEG_TUCK_SPEED,
            hand_rotate_amt: 0.0,
            hand_rotate_speed: HAND_ROTATE_SPEED,
            body_rot_amt: 0.0,
            body_rot_speed: BODY_ROT_SPEED,
            body_yaw_speed: BODY_YAW_SPEED,
            body_trans_amt: 0.0,
            body_trans_speed: BODY_TRANS_SPEED,
            somersault_finished: false,
            left_hand_anim: true,
            right_hand_anim: false,
            kick_anim: false,
            punch_counter: 0,
        }
    }
}
