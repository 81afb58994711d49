use glam::{Mat3, Quat, Vec3};

pub const DEFAULT_PARALLEL_THRESHOLD: f32 = 0.95;

/// Rotation carrying decal-local space onto the surface frame: local +Z maps
/// to `normal`, local X/Y span the decal plane.
///
/// The in-plane axes are derived from a reference "up" axis of +Y. When the
/// normal is nearly parallel to +Y the reference switches to +Z, keeping the
/// cross products well away from zero. Equal normals always produce equal
/// rotations.
pub fn orientation_from_normal(normal: Vec3) -> Quat {
    orientation_from_normal_with(normal, DEFAULT_PARALLEL_THRESHOLD)
}

pub fn orientation_from_normal_with(normal: Vec3, parallel_threshold: f32) -> Quat {
    let n = normal.normalize_or_zero();
    if n == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let reference = if n.dot(Vec3::Y).abs() > parallel_threshold {
        Vec3::Z
    } else {
        Vec3::Y
    };

    // X is perpendicular to both candidate reference axes, so the arc
    // rotation carries it into the decal plane.
    let arc = Quat::from_rotation_arc(reference, n);
    let u = (arc * Vec3::X).normalize_or_zero();
    if u == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let v = n.cross(u).normalize_or_zero();

    let rotation = Quat::from_mat3(&Mat3::from_cols(u, v, n));
    if rotation.is_finite() && rotation.length_squared() > 1e-6 {
        rotation.normalize()
    } else {
        Quat::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_maps_z_to(normal: Vec3) {
        let q = orientation_from_normal(normal);
        let mapped = q * Vec3::Z;
        assert!(
            (mapped - normal.normalize()).length() < 1e-4,
            "normal {:?} mapped to {:?}",
            normal,
            mapped
        );
    }

    #[test]
    fn maps_local_z_onto_normal() {
        check_maps_z_to(Vec3::Z);
        check_maps_z_to(Vec3::X);
        check_maps_z_to(Vec3::new(1.0, 2.0, -0.5));
        check_maps_z_to(Vec3::new(-0.3, 0.1, 0.9));
    }

    #[test]
    fn deterministic_for_equal_normals() {
        let n = Vec3::new(0.2, -0.7, 0.4);
        let a = orientation_from_normal(n);
        let b = orientation_from_normal(n);
        assert_eq!(a, b);
    }

    #[test]
    fn near_parallel_normals_stay_finite() {
        for n in [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::new(0.01, 0.999, 0.0).normalize(),
            Vec3::new(0.0, -0.999, 0.02).normalize(),
        ] {
            let q = orientation_from_normal(n);
            assert!(q.is_finite());
            assert!(q.length_squared() > 0.5);
            assert!(((q * Vec3::Z) - n).length() < 1e-3);
        }
    }

    #[test]
    fn zero_normal_degrades_to_identity() {
        assert_eq!(orientation_from_normal(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn rotation_is_orthonormal() {
        let q = orientation_from_normal(Vec3::new(0.3, 0.4, 0.5));
        let u = q * Vec3::X;
        let v = q * Vec3::Y;
        let w = q * Vec3::Z;
        assert!(u.dot(v).abs() < 1e-5);
        assert!(u.dot(w).abs() < 1e-5);
        assert!(v.dot(w).abs() < 1e-5);
    }
}
