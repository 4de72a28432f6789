//! Rigid-body transform math
//!
//! Provides the transform value type used throughout the buffer, with
//! composition, inversion and interpolation. Rotations are unit quaternions
//! stored as `[x, y, z, w]`.

/// A rigid-body transform: translation plus rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation as [x, y, z]
    pub translation: [f64; 3],
    /// Rotation quaternion as [x, y, z, w]
    pub rotation: [f64; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Create a pure translation.
    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self {
            translation,
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Create a transform from translation and rotation parts.
    pub fn from_parts(translation: [f64; 3], rotation: [f64; 4]) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Whether every numeric component is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.iter().all(|v| v.is_finite())
            && self.rotation.iter().all(|v| v.is_finite())
    }

    /// Check if this is the identity transform within a tolerance.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.translation.iter().all(|v| v.abs() < epsilon)
            && self.rotation[0].abs() < epsilon
            && self.rotation[1].abs() < epsilon
            && self.rotation[2].abs() < epsilon
            && (self.rotation[3].abs() - 1.0).abs() < epsilon
    }

    /// Apply the rotation part to a point.
    fn rotate(&self, p: [f64; 3]) -> [f64; 3] {
        let [qx, qy, qz, qw] = self.rotation;

        // v' = v + 2w(q x v) + 2(q x (q x v))
        let t = [
            2.0 * (qy * p[2] - qz * p[1]),
            2.0 * (qz * p[0] - qx * p[2]),
            2.0 * (qx * p[1] - qy * p[0]),
        ];

        [
            p[0] + qw * t[0] + qy * t[2] - qz * t[1],
            p[1] + qw * t[1] + qz * t[0] - qx * t[2],
            p[2] + qw * t[2] + qx * t[1] - qy * t[0],
        ]
    }

    /// Transform a point from the child frame into the parent frame.
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let r = self.rotate(p);
        [
            r[0] + self.translation[0],
            r[1] + self.translation[1],
            r[2] + self.translation[2],
        ]
    }

    /// Compose two transforms.
    ///
    /// `a.compose(&b)` applies `b` first, then `a`:
    /// `a.compose(&b).transform_point(p) == a.transform_point(b.transform_point(p))`.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(other.translation),
            rotation: quat_mul(self.rotation, other.rotation),
        }
    }

    /// Invert the transform.
    ///
    /// Assumes a unit rotation quaternion, so the conjugate is the inverse
    /// rotation.
    pub fn inverse(&self) -> Transform {
        let conj = [
            -self.rotation[0],
            -self.rotation[1],
            -self.rotation[2],
            self.rotation[3],
        ];
        let inv = Transform {
            translation: [0.0, 0.0, 0.0],
            rotation: conj,
        };
        let t = inv.rotate(self.translation);
        Transform {
            translation: [-t[0], -t[1], -t[2]],
            rotation: conj,
        }
    }

    /// Interpolate between two transforms.
    ///
    /// Linear interpolation on the translation, spherical linear
    /// interpolation on the rotation. `t` in [0, 1] maps from `self` to
    /// `other`.
    pub fn interpolate(&self, other: &Transform, t: f64) -> Transform {
        let translation = [
            self.translation[0] + (other.translation[0] - self.translation[0]) * t,
            self.translation[1] + (other.translation[1] - self.translation[1]) * t,
            self.translation[2] + (other.translation[2] - self.translation[2]) * t,
        ];
        Transform {
            translation,
            rotation: quat_slerp(self.rotation, other.rotation, t),
        }
    }
}

/// Hamilton product of two quaternions.
fn quat_mul(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Spherical linear interpolation between two unit quaternions.
fn quat_slerp(a: [f64; 4], mut b: [f64; 4], t: f64) -> [f64; 4] {
    let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

    // Take the short arc
    if dot < 0.0 {
        dot = -dot;
        for v in &mut b {
            *v = -*v;
        }
    }

    // Nearly parallel quaternions: fall back to normalized lerp
    if dot > 0.9995 {
        let mut out = [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ];
        let norm =
            (out[0] * out[0] + out[1] * out[1] + out[2] * out[2] + out[3] * out[3]).sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        return out;
    }

    let theta = dot.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    [
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
        a[3] * wa + b[3] * wb,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quat_z(angle: f64) -> [f64; 4] {
        [0.0, 0.0, (angle / 2.0).sin(), (angle / 2.0).cos()]
    }

    #[test]
    fn test_identity() {
        let tf = Transform::identity();
        assert!(tf.is_identity(1e-12));
        assert_eq!(tf.transform_point([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_compose_translations() {
        let a = Transform::from_translation([1.0, 0.0, 0.0]);
        let b = Transform::from_translation([0.5, 0.0, 0.2]);
        let c = a.compose(&b);
        assert_relative_eq!(c.translation[0], 1.5);
        assert_relative_eq!(c.translation[2], 0.2);
    }

    #[test]
    fn test_compose_applies_right_first() {
        // 90 degrees about Z, then translate
        let rot = Transform::from_parts([0.0, 0.0, 0.0], quat_z(std::f64::consts::FRAC_PI_2));
        let trans = Transform::from_translation([1.0, 0.0, 0.0]);

        let p = trans.compose(&rot).transform_point([1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 1.0, epsilon = 1e-12);

        let p = rot.compose(&trans).transform_point([1.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse() {
        let tf = Transform::from_parts([1.0, 2.0, 3.0], quat_z(0.7));
        let round = tf.compose(&tf.inverse());
        assert!(round.is_identity(1e-12));

        let p = [0.3, -0.4, 0.5];
        let back = tf.inverse().transform_point(tf.transform_point(p));
        for i in 0..3 {
            assert_relative_eq!(back[i], p[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_interpolate_translation() {
        let a = Transform::from_translation([0.0, 0.0, 0.0]);
        let b = Transform::from_translation([10.0, 0.0, 0.0]);
        let mid = a.interpolate(&b, 0.5);
        assert_relative_eq!(mid.translation[0], 5.0);
    }

    #[test]
    fn test_interpolate_rotation() {
        let a = Transform::from_parts([0.0; 3], quat_z(0.0));
        let b = Transform::from_parts([0.0; 3], quat_z(std::f64::consts::FRAC_PI_2));
        let mid = a.interpolate(&b, 0.5);
        let expected = quat_z(std::f64::consts::FRAC_PI_4);
        for i in 0..4 {
            assert_relative_eq!(mid.rotation[i], expected[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Transform::from_parts([1.0, 0.0, 0.0], quat_z(0.3));
        let b = Transform::from_parts([2.0, 1.0, 0.0], quat_z(1.1));
        let start = a.interpolate(&b, 0.0);
        let end = a.interpolate(&b, 1.0);
        for i in 0..3 {
            assert_relative_eq!(start.translation[i], a.translation[i], epsilon = 1e-12);
            assert_relative_eq!(end.translation[i], b.translation[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_is_finite() {
        assert!(Transform::identity().is_finite());
        let mut tf = Transform::identity();
        tf.translation[1] = f64::NAN;
        assert!(!tf.is_finite());
        tf.translation[1] = f64::INFINITY;
        assert!(!tf.is_finite());
    }
}
