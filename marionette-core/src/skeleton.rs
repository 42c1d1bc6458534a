//! The fixed puppet hierarchy: joints, their rest offsets and what they draw
use crate::animation::AnimationParams;
use crate::geometry::Primitive;
use crate::material::Material;
use crate::transform::TransformStack;

/// A local transform applied to the top of the model stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalOp {
    Translate([f32; 3]),
    /// Angle in degrees around an axis
    Rotate { angle: f32, axis: [f32; 3] },
    Scale([f32; 3]),
}

impl LocalOp {
    pub const fn translate(x: f32, y: f32, z: f32) -> Self {
        LocalOp::Translate([x, y, z])
    }

    pub const fn rotate_x(angle: f32) -> Self {
        LocalOp::Rotate { angle, axis: [1.0, 0.0, 0.0] }
    }

    pub const fn rotate_y(angle: f32) -> Self {
        LocalOp::Rotate { angle, axis: [0.0, 1.0, 0.0] }
    }

    pub const fn rotate_z(angle: f32) -> Self {
        LocalOp::Rotate { angle, axis: [0.0, 0.0, 1.0] }
    }

    pub const fn scale(x: f32, y: f32, z: f32) -> Self {
        LocalOp::Scale([x, y, z])
    }

    pub fn apply(&self, stack: &mut TransformStack) {
        match *self {
            LocalOp::Translate([x, y, z]) => stack.translate(x, y, z),
            LocalOp::Rotate { angle, axis: [x, y, z] } => stack.rotate(angle, x, y, z),
            LocalOp::Scale([x, y, z]) => stack.scale(x, y, z),
        }
    }
}

/// How a joint is drawn. Sizes that animate come from the parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Sphere of radius `joint_size`
    Ball,
    /// Torus ring of radius `eye_size`, facing forward
    EyeRing,
    /// Small sphere inside the eye ring
    Pupil,
    /// Cylinder from the joint origin along local y; negative length runs down
    Segment { radius: f32, length: f32 },
    /// Box standing on the joint origin, scaled by `upper_body_size`
    Torso,
    Sphere { radius: f32 },
    /// Box centred on the joint origin
    Block { half: [f32; 3] },
}

/// Upper body proportions before `upper_body_size` is applied
const TORSO_EXTENT: [f32; 3] = [1.0, 1.4, 0.6];
const PUPIL_FACTOR: f32 = 0.45;

impl Shape {
    pub fn primitive(&self) -> Primitive {
        match self {
            Shape::Ball | Shape::Pupil | Shape::Sphere { .. } => Primitive::Sphere,
            Shape::EyeRing => Primitive::Torus,
            Shape::Segment { .. } => Primitive::Cylinder,
            Shape::Torso | Shape::Block { .. } => Primitive::Cube,
        }
    }

    /// Fit the unit primitive to this shape
    pub fn apply(&self, stack: &mut TransformStack, params: &AnimationParams) {
        match *self {
            Shape::Ball => {
                let s = params.joint_size;
                stack.scale(s, s, s);
            }
            Shape::EyeRing => {
                let s = params.eye_size;
                stack.rotate(90.0, 1.0, 0.0, 0.0);
                stack.scale(s, s, s);
            }
            Shape::Pupil => {
                let s = params.eye_size * PUPIL_FACTOR;
                stack.scale(s, s, s);
            }
            Shape::Segment { radius, length } => {
                stack.translate(0.0, length / 2.0, 0.0);
                stack.scale(radius, length.abs(), radius);
            }
            Shape::Torso => {
                let s = params.upper_body_size;
                let [w, h, d] = TORSO_EXTENT;
                stack.translate(0.0, h * s / 2.0, 0.0);
                stack.scale(w * s, h * s, d * s);
            }
            Shape::Sphere { radius } => stack.scale(radius, radius, radius),
            Shape::Block { half: [x, y, z] } => stack.scale(2.0 * x, 2.0 * y, 2.0 * z),
        }
    }
}

/// Every joint of the puppet, in pre-order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointId {
    Pelvis,
    Spine,
    Neck,
    Head,
    LeftEye,
    LeftPupil,
    RightEye,
    RightPupil,
    LeftClavicle,
    LeftShoulder,
    LeftUpperArm,
    LeftElbow,
    LeftForearm,
    LeftHand,
    RightClavicle,
    RightShoulder,
    RightUpperArm,
    RightElbow,
    RightForearm,
    RightHand,
    LeftHip,
    LeftThigh,
    LeftKnee,
    LeftShin,
    LeftFoot,
    RightHip,
    RightThigh,
    RightKnee,
    RightShin,
    RightFoot,
}

impl JointId {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        JOINTS[self.index()].name
    }
}

/// Static description of a joint
#[derive(Debug, Clone, Copy)]
pub struct JointDef {
    pub id: JointId,
    pub name: &'static str,
    pub parent: Option<JointId>,
    /// Rest offset from the parent frame
    pub offset: &'static [LocalOp],
    pub shape: Shape,
    pub material: Material,
}

const fn joint(
    id: JointId,
    name: &'static str,
    parent: Option<JointId>,
    offset: &'static [LocalOp],
    shape: Shape,
    material: Material,
) -> JointDef {
    JointDef {
        id,
        name,
        parent,
        offset,
        shape,
        material,
    }
}

use JointId::*;

const ARM_UPPER: Shape = Shape::Segment { radius: 0.09, length: 0.9 };
const ARM_LOWER: Shape = Shape::Segment { radius: 0.08, length: 0.8 };
const CLAVICLE: Shape = Shape::Segment { radius: 0.08, length: 0.6 };
const LEG_UPPER: Shape = Shape::Segment { radius: 0.11, length: -1.0 };
const LEG_LOWER: Shape = Shape::Segment { radius: 0.09, length: -1.0 };
const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];
const FOOT: Shape = Shape::Block { half: [0.15, 0.08, 0.3] };

// The puppet faces +z, so its left side is +x. Both arm chains turn local y to
// point down the arm; positive segment lengths then run towards the hand.
static JOINTS: [JointDef; 30] = [
    joint(Pelvis, "pelvis", None, &[LocalOp::Translate([0.0, 2.6, 0.0])],
        Shape::Block { half: [0.5, 0.2, 0.3] }, Material::TORSO),
    joint(Spine, "spine", Some(Pelvis), &[LocalOp::Translate([0.0, 0.2, 0.0])],
        Shape::Torso, Material::TORSO),
    joint(Neck, "neck", Some(Spine), &[LocalOp::Translate([0.0, 1.4, 0.0])],
        Shape::Segment { radius: 0.1, length: 0.3 }, Material::LIMB),
    joint(Head, "head", Some(Neck), &[LocalOp::Translate([0.0, 0.75, 0.0])],
        Shape::Sphere { radius: 0.45 }, Material::LIMB),
    joint(LeftEye, "left_eye", Some(Head), &[LocalOp::Translate([0.17, 0.1, 0.4])],
        Shape::EyeRing, Material::EYE),
    joint(LeftPupil, "left_pupil", Some(LeftEye), &[LocalOp::Translate([0.0, 0.0, 0.03])],
        Shape::Pupil, Material::PUPIL),
    joint(RightEye, "right_eye", Some(Head), &[LocalOp::Translate([-0.17, 0.1, 0.4])],
        Shape::EyeRing, Material::EYE),
    joint(RightPupil, "right_pupil", Some(RightEye), &[LocalOp::Translate([0.0, 0.0, 0.03])],
        Shape::Pupil, Material::PUPIL),
    joint(LeftClavicle, "left_clavicle", Some(Spine),
        &[LocalOp::Translate([0.0, 1.25, 0.0]), LocalOp::Rotate { angle: -90.0, axis: Z_AXIS }],
        CLAVICLE, Material::LIMB),
    joint(LeftShoulder, "left_shoulder", Some(LeftClavicle),
        &[LocalOp::Translate([0.0, 0.6, 0.0]), LocalOp::Rotate { angle: -90.0, axis: Z_AXIS }],
        Shape::Ball, Material::JOINT),
    joint(LeftUpperArm, "left_upper_arm", Some(LeftShoulder), &[], ARM_UPPER, Material::LIMB),
    joint(LeftElbow, "left_elbow", Some(LeftUpperArm), &[LocalOp::Translate([0.0, 1.0, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(LeftForearm, "left_forearm", Some(LeftElbow), &[], ARM_LOWER, Material::LIMB),
    joint(LeftHand, "left_hand", Some(LeftForearm), &[LocalOp::Translate([0.0, 0.9, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(RightClavicle, "right_clavicle", Some(Spine),
        &[LocalOp::Translate([0.0, 1.25, 0.0]), LocalOp::Rotate { angle: 90.0, axis: Z_AXIS }],
        CLAVICLE, Material::LIMB),
    joint(RightShoulder, "right_shoulder", Some(RightClavicle),
        &[LocalOp::Translate([0.0, 0.6, 0.0]), LocalOp::Rotate { angle: 90.0, axis: Z_AXIS }],
        Shape::Ball, Material::JOINT),
    joint(RightUpperArm, "right_upper_arm", Some(RightShoulder), &[], ARM_UPPER, Material::LIMB),
    joint(RightElbow, "right_elbow", Some(RightUpperArm), &[LocalOp::Translate([0.0, 1.0, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(RightForearm, "right_forearm", Some(RightElbow), &[], ARM_LOWER, Material::LIMB),
    joint(RightHand, "right_hand", Some(RightForearm), &[LocalOp::Translate([0.0, 0.9, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(LeftHip, "left_hip", Some(Spine), &[LocalOp::Translate([0.3, -0.3, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(LeftThigh, "left_thigh", Some(LeftHip), &[], LEG_UPPER, Material::LIMB),
    joint(LeftKnee, "left_knee", Some(LeftThigh), &[LocalOp::Translate([0.0, -1.1, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(LeftShin, "left_shin", Some(LeftKnee), &[], LEG_LOWER, Material::LIMB),
    joint(LeftFoot, "left_foot", Some(LeftShin), &[LocalOp::Translate([0.0, -1.05, 0.15])],
        FOOT, Material::LIMB),
    joint(RightHip, "right_hip", Some(Spine), &[LocalOp::Translate([-0.3, -0.3, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(RightThigh, "right_thigh", Some(RightHip), &[], LEG_UPPER, Material::LIMB),
    joint(RightKnee, "right_knee", Some(RightThigh), &[LocalOp::Translate([0.0, -1.1, 0.0])],
        Shape::Ball, Material::JOINT),
    joint(RightShin, "right_shin", Some(RightKnee), &[], LEG_LOWER, Material::LIMB),
    joint(RightFoot, "right_foot", Some(RightShin), &[LocalOp::Translate([0.0, -1.05, 0.15])],
        FOOT, Material::LIMB),
];

/// The joint tree with child lists resolved from the parent links
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: &'static [JointDef],
    children: Vec<Vec<JointId>>,
}

impl Skeleton {
    /// The puppet rooted at the pelvis
    pub fn puppet() -> Self {
        let mut children = vec![Vec::new(); JOINTS.len()];
        for def in JOINTS.iter() {
            if let Some(parent) = def.parent {
                children[parent.index()].push(def.id);
            }
        }
        Self {
            joints: &JOINTS,
            children,
        }
    }

    pub fn root(&self) -> JointId {
        JointId::Pelvis
    }

    pub fn joint(&self, id: JointId) -> &JointDef {
        &self.joints[id.index()]
    }

    /// Children in draw order
    pub fn children(&self, id: JointId) -> &[JointId] {
        &self.children[id.index()]
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JointDef> {
        self.joints.iter()
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::puppet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Point3};

    #[test]
    fn test_table_is_indexed_by_id() {
        for (i, def) in JOINTS.iter().enumerate() {
            assert_eq!(def.id.index(), i, "{} is out of place", def.name);
        }
    }

    #[test]
    fn test_single_root_and_parents_precede_children() {
        let skeleton = Skeleton::puppet();
        let roots: Vec<_> = skeleton.iter().filter(|def| def.parent.is_none()).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, skeleton.root());
        for def in skeleton.iter() {
            if let Some(parent) = def.parent {
                assert!(parent.index() < def.id.index());
            }
        }
    }

    #[test]
    fn test_spine_branches() {
        let skeleton = Skeleton::puppet();
        assert_eq!(skeleton.children(Pelvis), &[Spine]);
        assert_eq!(
            skeleton.children(Spine),
            &[Neck, LeftClavicle, RightClavicle, LeftHip, RightHip]
        );
        assert_eq!(skeleton.children(Head), &[LeftEye, RightEye]);
        assert!(skeleton.children(LeftHand).is_empty());
        assert!(skeleton.children(RightFoot).is_empty());
    }

    #[test]
    fn test_arm_chain_order() {
        let skeleton = Skeleton::puppet();
        let mut chain = vec![LeftClavicle];
        while let [child] = skeleton.children(*chain.last().unwrap()) {
            chain.push(*child);
        }
        assert_eq!(
            chain,
            vec![LeftClavicle, LeftShoulder, LeftUpperArm, LeftElbow, LeftForearm, LeftHand]
        );
    }

    #[test]
    fn test_shapes_bind_expected_primitives() {
        let skeleton = Skeleton::puppet();
        assert_eq!(skeleton.joint(LeftEye).shape.primitive(), Primitive::Torus);
        assert_eq!(skeleton.joint(LeftElbow).shape.primitive(), Primitive::Sphere);
        assert_eq!(skeleton.joint(RightThigh).shape.primitive(), Primitive::Cylinder);
        assert_eq!(skeleton.joint(LeftFoot).shape.primitive(), Primitive::Cube);
        assert_eq!(skeleton.joint(LeftEye).material, Material::EYE);
        assert_eq!(skeleton.joint(LeftShoulder).material, Material::JOINT);
        assert_eq!(JointId::RightKnee.name(), "right_knee");
    }

    #[test]
    fn test_only_ball_joints_are_grey() {
        let skeleton = Skeleton::puppet();
        for def in skeleton.iter() {
            let is_ball = matches!(def.shape, Shape::Ball);
            assert_eq!(def.material == Material::JOINT, is_ball, "{}", def.name);
        }
        assert_eq!(skeleton.joint(LeftFoot).material, Material::LIMB);
        assert_eq!(skeleton.joint(RightFoot).material, Material::LIMB);
    }

    #[test]
    fn test_arm_offsets_hang_down() {
        let mut stack = TransformStack::new();
        for op in JOINTS[LeftClavicle.index()].offset {
            op.apply(&mut stack);
        }
        for op in JOINTS[LeftShoulder.index()].offset {
            op.apply(&mut stack);
        }
        let shoulder = stack.top().transform_point(&Point3::origin());
        assert!((shoulder.x - 0.6).abs() < 1e-5, "left is +x: {shoulder}");
        let below = stack.top().transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!((below.y - shoulder.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_spans_length() {
        let mut stack = TransformStack::new();
        Shape::Segment { radius: 0.1, length: -1.0 }.apply(&mut stack, &AnimationParams::default());
        let m: Matrix4<f32> = *stack.top();
        // Unit cylinder spans y in [-0.5, 0.5]
        let top = m.transform_point(&Point3::new(0.0, 0.5, 0.0));
        let bottom = m.transform_point(&Point3::new(0.0, -0.5, 0.0));
        assert!(top.y.abs() < 1e-5);
        assert!((bottom.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ball_uses_joint_size() {
        let mut params = AnimationParams::default();
        params.joint_size = 0.5;
        let mut stack = TransformStack::new();
        Shape::Ball.apply(&mut stack, &params);
        let p = stack.top().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - 0.5).abs() < 1e-6);
    }
}
