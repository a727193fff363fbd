use viz_proto::Vec3;

use crate::error::SyncError;

/// Interpolated pose for one entity.
///
/// `facing` is the direction the entity should look at, or `None` when it
/// did not move this cycle; consumers leave the previous orientation in
/// place in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub facing: Option<Vec3>,
}

/// Previous/target position pair for one animated entity class.
///
/// Both sides always have equal length outside of a reconciliation step, so
/// the interpolator can index them blindly.
#[derive(Debug, Clone, Default)]
pub struct InterpolationBuffer {
    previous: Vec<Vec3>,
    target: Vec<Vec3>,
}

impl InterpolationBuffer {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// First snapshot: previous and target coincide, so entities appear in
    /// place instead of animating in from the origin.
    pub fn seed(&mut self, positions: Vec<Vec3>) {
        self.previous = positions.clone();
        self.target = positions;
    }

    /// Swap in a new target; the old target becomes the interpolation
    /// start. Length changes are only legal through [`Self::seed`] during a
    /// reconciliation step, never mid-swap.
    pub fn retarget(&mut self, positions: Vec<Vec3>) -> Result<(), SyncError> {
        if positions.len() != self.target.len() {
            return Err(SyncError::Invariant(format!(
                "retarget length {} does not match buffer length {}",
                positions.len(),
                self.target.len()
            )));
        }
        std::mem::swap(&mut self.previous, &mut self.target);
        self.target = positions;
        Ok(())
    }

    pub fn previous(&self) -> &[Vec3] {
        &self.previous
    }

    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    /// Pose for entity `index` at eased progress `eased`.
    pub fn sample(&self, index: usize, eased: f32) -> Pose {
        let prev = self.previous[index];
        let target = self.target[index];
        Pose {
            position: prev.lerp(target, eased),
            facing: (prev - target).normalized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(zs: &[f32]) -> Vec<Vec3> {
        zs.iter().map(|z| Vec3::new(0.0, 0.0, *z)).collect()
    }

    #[test]
    fn seed_equalizes_previous_and_target() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[1.0, 2.0]));
        assert_eq!(buffer.previous(), buffer.target());
        // No interpolation distance: the pose is already at the target.
        assert_eq!(buffer.sample(1, 0.0).position, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn retarget_shifts_old_target_to_previous() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[0.0]));
        buffer.retarget(positions(&[4.0])).expect("same length");
        assert_eq!(buffer.previous(), positions(&[0.0]).as_slice());
        assert_eq!(buffer.target(), positions(&[4.0]).as_slice());
    }

    #[test]
    fn retarget_rejects_length_change() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[0.0, 1.0]));
        let err = buffer.retarget(positions(&[0.0])).unwrap_err();
        assert!(matches!(err, SyncError::Invariant(_)));
        // The buffer is untouched after a rejected swap.
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.target(), positions(&[0.0, 1.0]).as_slice());
    }

    #[test]
    fn sample_endpoints_are_exact() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[0.0]));
        buffer.retarget(positions(&[8.0])).expect("same length");
        assert_eq!(buffer.sample(0, 0.0).position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(buffer.sample(0, 1.0).position, Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn stationary_entity_has_no_facing() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[3.0]));
        buffer.retarget(positions(&[3.0])).expect("same length");
        assert!(buffer.sample(0, 0.5).facing.is_none());
    }

    #[test]
    fn facing_points_from_target_back_to_previous() {
        let mut buffer = InterpolationBuffer::default();
        buffer.seed(positions(&[0.0]));
        buffer.retarget(positions(&[2.0])).expect("same length");
        let facing = buffer.sample(0, 0.5).facing.expect("moving entity");
        assert_eq!(facing, Vec3::new(0.0, 0.0, -1.0));
    }
}
