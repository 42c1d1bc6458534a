//! Skeleton traversal: composes joint frames on the model stack and emits one
//! drawable instance per joint.
use nalgebra::Matrix4;

use crate::animation::{AnimationMode, AnimationParams};
use crate::geometry::Primitive;
use crate::material::Material;
use crate::skeleton::{JointId, LocalOp, Skeleton};
use crate::transform::TransformStack;

/// Mode-specific transform injected at a joint, after its rest offset
#[derive(Clone, Copy)]
pub struct Contribution {
    pub joint: JointId,
    pub mode: AnimationMode,
    pub delta: fn(&AnimationParams) -> LocalOp,
}

impl std::fmt::Debug for Contribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contribution")
            .field("joint", &self.joint)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

const fn contribution(
    joint: JointId,
    mode: AnimationMode,
    delta: fn(&AnimationParams) -> LocalOp,
) -> Contribution {
    Contribution { joint, mode, delta }
}

/// Punch reach in scene units per unit of translate amount
const PUNCH_SCALE: f32 = 0.05;
/// Lunge distance in scene units per unit of body travel
const LUNGE_SCALE: f32 = 0.1;

use AnimationMode::{ComboAttack, Idle, Somersault, Swimming, Waving};
use JointId::*;

/// Entries for the same joint and mode apply in table order.
pub static CONTRIBUTIONS: &[Contribution] = &[
    // Idle: arms swing in opposition, body bobs
    contribution(Pelvis, Idle, |p| LocalOp::translate(0.0, p.body_bob_amt, 0.0)),
    contribution(LeftShoulder, Idle, |p| LocalOp::rotate_x(p.left_hand_translate_amt)),
    contribution(RightShoulder, Idle, |p| LocalOp::rotate_x(-p.left_hand_translate_amt)),
    // Waving
    contribution(Neck, Waving, |p| LocalOp::rotate_z(p.head_rotate_amt)),
    contribution(LeftShoulder, Waving, |p| LocalOp::rotate_z(p.left_hand_translate_amt)),
    contribution(RightShoulder, Waving, |_| LocalOp::rotate_z(-150.0)),
    contribution(RightElbow, Waving, |p| LocalOp::rotate_z(p.right_hand_translate_amt - 20.0)),
    contribution(RightForearm, Waving, |p| LocalOp::rotate_y(-p.right_forearm_rot_amt)),
    // Swimming: face down, alternate strokes and flutter kick
    contribution(Pelvis, Swimming, |_| LocalOp::rotate_x(80.0)),
    contribution(Neck, Swimming, |p| LocalOp::rotate_y(p.head_rotate_amt)),
    contribution(LeftShoulder, Swimming, |p| LocalOp::rotate_x(p.hand_rotate_amt + 90.0)),
    contribution(RightShoulder, Swimming, |p| LocalOp::rotate_x(-p.hand_rotate_amt + 90.0)),
    contribution(LeftHip, Swimming, |p| LocalOp::rotate_x(p.leg_rotate_amt)),
    contribution(RightHip, Swimming, |p| LocalOp::rotate_x(-p.leg_rotate_amt)),
    // Somersault: crouch, travel and roll forward around the pelvis
    contribution(Pelvis, Somersault, |p| LocalOp::translate(0.0, p.body_sink_amt, p.body_trans_amt)),
    contribution(Pelvis, Somersault, |p| LocalOp::rotate_x(p.body_rot_amt)),
    contribution(Neck, Somersault, |p| LocalOp::rotate_x(p.head_rotate_amt)),
    contribution(LeftShoulder, Somersault, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(RightShoulder, Somersault, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(LeftHip, Somersault, |p| LocalOp::rotate_x(-p.leg_tuck_amt)),
    contribution(RightHip, Somersault, |p| LocalOp::rotate_x(-p.leg_tuck_amt)),
    contribution(LeftKnee, Somersault, |p| LocalOp::rotate_x(p.leg_tuck_amt)),
    contribution(RightKnee, Somersault, |p| LocalOp::rotate_x(p.leg_tuck_amt)),
    // Combo attack: turn, guard up, two punches, then a lunging kick
    contribution(Pelvis, ComboAttack, |p| LocalOp::rotate_y(p.body_rot_amt)),
    contribution(Pelvis, ComboAttack, |p| LocalOp::translate(0.0, 0.0, p.body_trans_amt * LUNGE_SCALE)),
    contribution(LeftShoulder, ComboAttack, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(RightShoulder, ComboAttack, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(LeftElbow, ComboAttack, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(RightElbow, ComboAttack, |p| LocalOp::rotate_x(p.hand_rotate_amt)),
    contribution(LeftForearm, ComboAttack, |p| {
        LocalOp::translate(0.0, p.left_hand_translate_amt * PUNCH_SCALE, 0.0)
    }),
    contribution(RightForearm, ComboAttack, |p| {
        LocalOp::translate(0.0, p.right_hand_translate_amt * PUNCH_SCALE, 0.0)
    }),
    contribution(RightHip, ComboAttack, |p| LocalOp::rotate_x(-p.leg_rotate_amt)),
];

/// One joint ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct JointInstance {
    pub joint: JointId,
    pub primitive: Primitive,
    /// Model matrix of the fitted primitive
    pub model: Matrix4<f32>,
    pub material: Material,
}

/// Walks a [`Skeleton`] on a model stack.
///
/// Every joint opens a stack frame, applies its rest offset and the
/// contributions for the active mode, visits its children, then emits its own
/// primitive inside a nested frame so the shape scale never reaches children.
pub struct PoseEvaluator<'a> {
    skeleton: &'a Skeleton,
    contributions: &'a [Contribution],
}

impl<'a> PoseEvaluator<'a> {
    pub fn new(skeleton: &'a Skeleton) -> Self {
        Self::with_contributions(skeleton, CONTRIBUTIONS)
    }

    pub fn with_contributions(skeleton: &'a Skeleton, contributions: &'a [Contribution]) -> Self {
        Self {
            skeleton,
            contributions,
        }
    }

    /// Walk the whole skeleton starting from the current top of `stack`.
    ///
    /// The stack depth is the same on return as on entry.
    pub fn evaluate<F>(
        &self,
        stack: &mut TransformStack,
        mode: AnimationMode,
        params: &AnimationParams,
        mut emit: F,
    ) where
        F: FnMut(JointInstance),
    {
        self.visit(stack, self.skeleton.root(), mode, params, &mut emit);
    }

    /// Collect the instances for a pose drawn from the identity
    pub fn pose(&self, mode: AnimationMode, params: &AnimationParams) -> Vec<JointInstance> {
        let mut stack = TransformStack::new();
        let mut instances = Vec::with_capacity(self.skeleton.len());
        self.evaluate(&mut stack, mode, params, |instance| instances.push(instance));
        instances
    }

    fn visit(
        &self,
        stack: &mut TransformStack,
        id: JointId,
        mode: AnimationMode,
        params: &AnimationParams,
        emit: &mut dyn FnMut(JointInstance),
    ) {
        let def = self.skeleton.joint(id);
        let mut frame = stack.push();

        for op in def.offset {
            op.apply(&mut frame);
        }
        for contribution in self
            .contributions
            .iter()
            .filter(|c| c.joint == id && c.mode == mode)
        {
            (contribution.delta)(params).apply(&mut frame);
        }

        for &child in self.skeleton.children(id) {
            self.visit(&mut frame, child, mode, params, emit);
        }

        let mut shape = frame.push();
        def.shape.apply(&mut shape, params);
        emit(JointInstance {
            joint: id,
            primitive: def.shape.primitive(),
            model: *shape.top(),
            material: def.material,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationController;
    use nalgebra::Point3;

    fn origin_of(instances: &[JointInstance], joint: JointId) -> Point3<f32> {
        let instance = instances.iter().find(|i| i.joint == joint).unwrap();
        instance.model.transform_point(&Point3::origin())
    }

    fn close(a: Point3<f32>, b: Point3<f32>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_walk_is_balanced_in_every_mode() {
        let skeleton = Skeleton::puppet();
        let evaluator = PoseEvaluator::new(&skeleton);
        for mode in AnimationMode::ALL {
            let mut controller = AnimationController::new(mode);
            for _ in 0..50 {
                controller.update(0.05);
            }

            let mut stack = TransformStack::new();
            stack.push_matrix();
            stack.translate(1.0, 2.0, 3.0);
            let depth = stack.depth();
            let top = *stack.top();
            let pushes = stack.push_count();
            let pops = stack.pop_count();

            let mut count = 0;
            evaluator.evaluate(&mut stack, mode, controller.params(), |_| count += 1);

            assert_eq!(count, skeleton.len(), "{mode}");
            assert_eq!(stack.depth(), depth, "{mode}");
            assert_eq!(*stack.top(), top, "{mode}");
            assert_eq!(stack.push_count() - pushes, stack.pop_count() - pops, "{mode}");
            // One frame per joint plus one per fitted shape
            assert_eq!(stack.push_count() - pushes, 2 * skeleton.len() as u64);
        }
    }

    #[test]
    fn test_children_are_emitted_before_parents() {
        let skeleton = Skeleton::puppet();
        let instances = PoseEvaluator::new(&skeleton).pose(AnimationMode::Default, &AnimationParams::default());
        let position = |joint| instances.iter().position(|i| i.joint == joint).unwrap();
        assert_eq!(instances.last().unwrap().joint, JointId::Pelvis);
        assert!(position(JointId::LeftHand) < position(JointId::LeftForearm));
        assert!(position(JointId::LeftPupil) < position(JointId::LeftEye));
        assert!(position(JointId::Head) < position(JointId::Spine));
    }

    #[test]
    fn test_rest_pose_hand_position() {
        let skeleton = Skeleton::puppet();
        let instances = PoseEvaluator::new(&skeleton).pose(AnimationMode::Default, &AnimationParams::default());
        // pelvis 2.6 + spine 0.2 + clavicle 1.25, then 1.0 + 0.9 down the arm
        assert!(close(origin_of(&instances, JointId::LeftHand), Point3::new(0.6, 2.15, 0.0)));
        assert!(close(origin_of(&instances, JointId::RightHand), Point3::new(-0.6, 2.15, 0.0)));
    }

    #[test]
    fn test_materials_travel_with_instances() {
        let skeleton = Skeleton::puppet();
        let instances = PoseEvaluator::new(&skeleton).pose(AnimationMode::Default, &AnimationParams::default());
        for instance in &instances {
            assert_eq!(instance.material, skeleton.joint(instance.joint).material);
            assert_eq!(instance.primitive, skeleton.joint(instance.joint).shape.primitive());
        }
    }

    #[test]
    fn test_contributions_only_apply_in_their_mode() {
        let skeleton = Skeleton::puppet();
        let evaluator = PoseEvaluator::new(&skeleton);
        let mut params = AnimationParams::default();
        params.body_bob_amt = 0.2;

        let idle = evaluator.pose(AnimationMode::Idle, &params);
        let rest = evaluator.pose(AnimationMode::Default, &params);
        let pelvis_idle = origin_of(&idle, JointId::Pelvis);
        let pelvis_rest = origin_of(&rest, JointId::Pelvis);
        assert!((pelvis_idle.y - pelvis_rest.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_no_contributions_for_default_mode() {
        assert!(CONTRIBUTIONS.iter().all(|c| c.mode != AnimationMode::Default));
    }

    #[test]
    fn test_half_somersault_puts_head_below_pelvis() {
        let skeleton = Skeleton::puppet();
        let mut params = AnimationParams::default();
        params.body_rot_amt = 180.0;
        let instances = PoseEvaluator::new(&skeleton).pose(AnimationMode::Somersault, &params);
        assert!(origin_of(&instances, JointId::Head).y < origin_of(&instances, JointId::Pelvis).y);
    }

    #[test]
    fn test_punch_extends_forearm() {
        let skeleton = Skeleton::puppet();
        let evaluator = PoseEvaluator::new(&skeleton);
        let mut params = AnimationParams::default();
        let before = origin_of(&evaluator.pose(AnimationMode::ComboAttack, &params), JointId::LeftHand);
        params.left_hand_translate_amt = 20.0;
        let after = origin_of(&evaluator.pose(AnimationMode::ComboAttack, &params), JointId::LeftHand);
        assert!(((after - before).norm() - 20.0 * PUNCH_SCALE).abs() < 1e-4);
        // The other hand stays put
        let right = origin_of(&evaluator.pose(AnimationMode::ComboAttack, &params), JointId::RightHand);
        let right_rest = origin_of(&evaluator.pose(AnimationMode::ComboAttack, &AnimationParams::default()), JointId::RightHand);
        assert!(close(right, right_rest));
    }

    #[test]
    fn test_custom_contribution_table() {
        static LIFT: &[Contribution] = &[contribution(JointId::Spine, AnimationMode::Idle, |_| {
            LocalOp::translate(0.0, 1.0, 0.0)
        })];
        let skeleton = Skeleton::puppet();
        let params = AnimationParams::default();
        let lifted = PoseEvaluator::with_contributions(&skeleton, LIFT).pose(AnimationMode::Idle, &params);
        let rest = PoseEvaluator::with_contributions(&skeleton, LIFT).pose(AnimationMode::Default, &params);
        let dy = origin_of(&lifted, JointId::Head).y - origin_of(&rest, JointId::Head).y;
        assert!((dy - 1.0).abs() < 1e-5);
        assert!(close(origin_of(&lifted, JointId::Pelvis), origin_of(&rest, JointId::Pelvis)));
    }
}
