//! Transformation matrices and the matrix stack used to compose them
use std::ops::{Deref, DerefMut};

use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix of `angle` degrees around `axis`.
    ///
    /// A zero-length axis yields the identity.
    pub fn rotation_matrix(angle: f32, axis: Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(axis, f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, angle.to_radians()),
            None => Matrix4::identity(),
        }
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a right-handed view matrix looking from `eye` towards `target`
    pub fn look_at_matrix(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(&eye, &target, &up)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

/// A stack of 4x4 matrices.
///
/// The stack always holds at least one matrix. Local operations right-multiply
/// the top (`top = top * T`), so transforms issued later act in the frame set up
/// by the earlier ones, which is the parent-to-child order of a skeleton walk.
#[derive(Debug, Clone)]
pub struct TransformStack {
    matrices: Vec<Matrix4<f32>>,
    pushes: u64,
    pops: u64,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            matrices: vec![Matrix4::identity()],
            pushes: 0,
            pops: 0,
        }
    }

    /// Replace the whole stack with a single identity matrix.
    pub fn load_identity(&mut self) {
        self.load_matrix(Matrix4::identity());
    }

    /// Replace the whole stack with a single matrix.
    pub fn load_matrix(&mut self, matrix: Matrix4<f32>) {
        self.matrices.clear();
        self.matrices.push(matrix);
    }

    /// Duplicate the current top.
    ///
    /// Prefer [`TransformStack::push`], which pops again when the guard drops.
    pub fn push_matrix(&mut self) {
        let top = *self.top();
        self.matrices.push(top);
        self.pushes += 1;
    }

    /// Remove the current top.
    ///
    /// # Panics
    ///
    /// Panics if this would leave the stack empty. An unbalanced pop corrupts
    /// every sibling drawn after it, so it is treated as a programming error.
    pub fn pop_matrix(&mut self) {
        assert!(
            self.matrices.len() > 1,
            "transform stack underflow: pop_matrix with depth {}",
            self.matrices.len()
        );
        self.matrices.pop();
        self.pops += 1;
    }

    /// Push a new frame and return a guard that pops it when dropped.
    pub fn push(&mut self) -> StackFrame<'_> {
        self.push_matrix();
        StackFrame { stack: self }
    }

    pub fn top(&self) -> &Matrix4<f32> {
        // The constructor and every mutator keep at least one matrix.
        &self.matrices[self.matrices.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    /// Total number of pushes since creation
    pub fn push_count(&self) -> u64 {
        self.pushes
    }

    /// Total number of pops since creation
    pub fn pop_count(&self) -> u64 {
        self.pops
    }

    /// Right-multiply the top by an arbitrary matrix.
    pub fn mult_matrix(&mut self, matrix: &Matrix4<f32>) {
        let last = self.matrices.len() - 1;
        self.matrices[last] = self.matrices[last] * matrix;
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.mult_matrix(&Transform::translation_matrix(x, y, z));
    }

    /// Rotate by `angle` degrees around the axis `(x, y, z)`.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        self.mult_matrix(&Transform::rotation_matrix(angle, Vector3::new(x, y, z)));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.mult_matrix(&Transform::scale_matrix(x, y, z));
    }

    /// Replace the top with a view matrix.
    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        &mut self,
        eye_x: f32,
        eye_y: f32,
        eye_z: f32,
        target_x: f32,
        target_y: f32,
        target_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
    ) {
        let view = Transform::look_at_matrix(
            Point3::new(eye_x, eye_y, eye_z),
            Point3::new(target_x, target_y, target_z),
            Vector3::new(up_x, up_y, up_z),
        );
        let last = self.matrices.len() - 1;
        self.matrices[last] = view;
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

/// A pushed stack frame. Dropping it pops the frame.
///
/// Dereferences to the stack, so nested frames are opened with `frame.push()`.
pub struct StackFrame<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for StackFrame<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for StackFrame<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for StackFrame<'_> {
    fn drop(&mut self) {
        self.stack.pop_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector4;

    fn approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(0.0, Vector3::new(0.0, 1.0, 0.0));
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_zero_axis_rotation_is_identity() {
        let matrix = Transform::rotation_matrix(45.0, Vector3::zeros());
        assert_eq!(matrix, Matrix4::identity());
    }

    #[test]
    fn test_new_stack_has_identity() {
        let stack = TransformStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_load_identity_resets_depth() {
        let mut stack = TransformStack::new();
        stack.push_matrix();
        stack.push_matrix();
        stack.translate(1.0, 2.0, 3.0);
        stack.load_identity();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_load_matrix() {
        let mut stack = TransformStack::new();
        stack.push_matrix();
        let m = Transform::scale_matrix(2.0, 2.0, 2.0);
        stack.load_matrix(m);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), m);
    }

    #[test]
    fn test_push_duplicates_top() {
        let mut stack = TransformStack::new();
        stack.translate(1.0, 0.0, 0.0);
        let before = *stack.top();
        stack.push_matrix();
        assert_eq!(stack.depth(), 2);
        assert_eq!(*stack.top(), before);
        stack.translate(0.0, 5.0, 0.0);
        stack.pop_matrix();
        assert_eq!(*stack.top(), before);
    }

    #[test]
    #[should_panic(expected = "transform stack underflow")]
    fn test_pop_last_matrix_panics() {
        let mut stack = TransformStack::new();
        stack.pop_matrix();
    }

    #[test]
    fn test_composition_is_parent_to_child() {
        // Translate then rotate: the rotation happens in the translated frame,
        // so the local x axis maps onto world y, offset by the translation.
        let mut stack = TransformStack::new();
        stack.translate(1.0, 0.0, 0.0);
        stack.rotate(90.0, 0.0, 0.0, 1.0);
        let p = stack.top() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
    }

    #[test]
    fn test_scale_applies_after_translate() {
        let mut stack = TransformStack::new();
        stack.translate(0.0, 2.0, 0.0);
        stack.scale(3.0, 3.0, 3.0);
        let p = stack.top() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert!((p.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_guard_pops_on_drop() {
        let mut stack = TransformStack::new();
        {
            let mut frame = stack.push();
            frame.translate(1.0, 1.0, 1.0);
            {
                let mut inner = frame.push();
                inner.scale(2.0, 2.0, 2.0);
                assert_eq!(inner.depth(), 3);
            }
            assert_eq!(frame.depth(), 2);
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Matrix4::identity());
        assert_eq!(stack.push_count(), stack.pop_count());
    }

    #[test]
    fn test_guard_pops_on_early_return() {
        fn draw_until(stack: &mut TransformStack, limit: usize) -> usize {
            let mut frame = stack.push();
            frame.translate(0.0, 1.0, 0.0);
            if frame.depth() >= limit {
                return frame.depth();
            }
            draw_until(&mut frame, limit)
        }

        let mut stack = TransformStack::new();
        assert_eq!(draw_until(&mut stack, 5), 5);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.push_count(), 4);
        assert_eq!(stack.pop_count(), 4);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let mut stack = TransformStack::new();
        stack.look_at(0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let eye = stack.top() * Vector4::new(0.0, 0.0, 5.0, 1.0);
        assert!(eye.xyz().norm() < 1e-5);
        // The target ends up straight ahead on -z.
        let target = stack.top() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((target.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation_matrix(1.0, 0.0, 0.0);
        let view = Transform::scale_matrix(2.0, 2.0, 2.0);
        let projection = Transform::translation_matrix(0.0, 3.0, 0.0);
        let mvp = Transform::mvp_matrix(&model, &view, &projection);
        assert!(approx_eq(&mvp, &(projection * view * model)));
    }
}
