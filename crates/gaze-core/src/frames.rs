//! Frame-tagged geometric values.
//!
//! Points and directions carry their reference frame as a zero-sized marker,
//! so that mixing camera/world (WCS) and screen (SCS) quantities is a type
//! error. [`FrameKind`] is the runtime tag used when results are serialized.

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::{build_extrinsic_rotation, EulerAnglesDeg, Mat3, Pt3, Real, Vec3};

/// Runtime tag of a reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Camera/world coordinate system: nodal point at (or near) the origin,
    /// x left, y up, z towards the subject.
    Wcs,
    /// Screen coordinate system, aligned with the physical display.
    Scs,
}

/// Compile-time reference frame marker.
pub trait Frame: Debug + Clone + Copy + PartialEq + Default + 'static {
    const KIND: FrameKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wcs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scs;

impl Frame for Wcs {
    const KIND: FrameKind = FrameKind::Wcs;
}

impl Frame for Scs {
    const KIND: FrameKind = FrameKind::Scs;
}

/// A value expressed in frame `F`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framed<T, F: Frame> {
    value: T,
    _frame: PhantomData<F>,
}

impl<T, F: Frame> Framed<T, F> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            _frame: PhantomData,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn kind(&self) -> FrameKind {
        F::KIND
    }
}

pub type FramedPoint<F> = Framed<Pt3, F>;
pub type FramedVector<F> = Framed<Vec3, F>;

/// Rigid mapping `p_dst = R * p_src + shift` between two frames.
///
/// Directions are mapped by the rotation only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform<Src: Frame, Dst: Frame> {
    rotation: Mat3,
    shift: Vec3,
    _frames: PhantomData<(Src, Dst)>,
}

impl<Src: Frame, Dst: Frame> RigidTransform<Src, Dst> {
    pub fn new(rotation: Mat3, shift: Vec3) -> Self {
        Self {
            rotation,
            shift,
            _frames: PhantomData,
        }
    }

    /// Rotation from extrinsic Euler angles (degrees) followed by `shift`.
    pub fn from_euler_deg(angles: &EulerAnglesDeg, shift: Vec3) -> Self {
        Self::new(angles.rotation(), shift)
    }

    pub fn rotation(&self) -> &Mat3 {
        &self.rotation
    }

    pub fn shift(&self) -> &Vec3 {
        &self.shift
    }

    pub fn transform_point(&self, p: &FramedPoint<Src>) -> FramedPoint<Dst> {
        Framed::new(Pt3::from(self.rotation * p.value().coords + self.shift))
    }

    pub fn transform_vector(&self, v: &FramedVector<Src>) -> FramedVector<Dst> {
        Framed::new(self.rotation * v.value())
    }
}

/// Apply `R(alpha, beta, gamma) * point + shift` with angles in degrees.
///
/// Frame-agnostic form of [`RigidTransform::transform_point`]; pixel lifting
/// uses it with zero angles to shift by the camera nodal point.
pub fn transform_rigid(
    point: &Pt3,
    alpha_deg: Real,
    beta_deg: Real,
    gamma_deg: Real,
    shift: &Vec3,
) -> Pt3 {
    let r = build_extrinsic_rotation(alpha_deg, beta_deg, gamma_deg);
    Pt3::from(r * point.coords + shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_translation_maps_points_exactly() {
        let shift = Vec3::new(0.0, 0.0, -12.0);
        let a = transform_rigid(&Pt3::origin(), 0.0, 0.0, 0.0, &shift);
        let b = transform_rigid(&Pt3::new(12.0, 6.0, 12.0), 0.0, 0.0, 0.0, &shift);
        assert_eq!(a, Pt3::new(0.0, 0.0, -12.0));
        assert_eq!(b, Pt3::new(12.0, 6.0, 0.0));
    }

    #[test]
    fn rotation_then_shift() {
        let p = transform_rigid(
            &Pt3::new(1.0, 0.0, 0.0),
            0.0,
            0.0,
            90.0,
            &Vec3::new(0.0, 0.0, 5.0),
        );
        assert!((p - Pt3::new(0.0, 1.0, 5.0)).norm() < 1e-12, "got {p}");
    }

    #[test]
    fn vectors_ignore_the_shift() {
        let t: RigidTransform<Wcs, Scs> = RigidTransform::from_euler_deg(
            &EulerAnglesDeg::new(0.0, 0.0, 90.0),
            Vec3::new(10.0, 20.0, 30.0),
        );
        let v = t.transform_vector(&Framed::new(Vec3::x()));
        assert!((v.value() - Vec3::y()).norm() < 1e-12);
        assert_eq!(v.kind(), FrameKind::Scs);

        let p = t.transform_point(&Framed::new(Pt3::new(1.0, 0.0, 0.0)));
        assert!((p.value() - Pt3::new(10.0, 21.0, 30.0)).norm() < 1e-12);
    }

    #[test]
    fn framed_reports_kind() {
        let p: FramedPoint<Wcs> = Framed::new(Pt3::new(1.0, 2.0, 3.0));
        assert_eq!(p.kind(), FrameKind::Wcs);
        assert_eq!(p.into_inner(), Pt3::new(1.0, 2.0, 3.0));
    }
}
