//! Contact tests on the ground plane
//!
//! Hover height and bobbing are cosmetic, so contact only looks at x/z.

use glam::Vec2;

use crate::ground_distance;

/// True when `target` is strictly closer than `radius` to `player`
#[inline]
pub fn in_contact(player: Vec2, target: Vec2, radius: f32) -> bool {
    ground_distance(player, target) < radius
}

/// Clamp a ground position into the square [-bound, bound]²
#[inline]
pub fn clamp_to_bounds(pos: Vec2, bound: f32) -> Vec2 {
    pos.clamp(Vec2::splat(-bound), Vec2::splat(bound))
}

/// Index of the first target in contact with the player, in slice order
pub fn first_contact<'a, I>(player: Vec2, targets: I, radius: f32) -> Option<usize>
where
    I: IntoIterator<Item = &'a Vec2>,
{
    targets
        .into_iter()
        .position(|&t| in_contact(player, t, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_inside_radius() {
        assert!(in_contact(Vec2::ZERO, Vec2::new(0.3, 0.0), 0.5));
        assert!(in_contact(Vec2::ZERO, Vec2::new(0.2, 0.2), 0.5));
    }

    #[test]
    fn test_contact_boundary_is_exclusive() {
        assert!(!in_contact(Vec2::ZERO, Vec2::new(0.5, 0.0), 0.5));
        assert!(!in_contact(Vec2::ZERO, Vec2::new(0.0, -0.6), 0.5));
    }

    #[test]
    fn test_clamp_to_bounds() {
        let p = clamp_to_bounds(Vec2::new(20.0, -16.0), 15.0);
        assert_eq!(p, Vec2::new(15.0, -15.0));
        let q = clamp_to_bounds(Vec2::new(3.0, 4.0), 15.0);
        assert_eq!(q, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_first_contact_order() {
        let targets = [Vec2::new(5.0, 5.0), Vec2::new(0.1, 0.0), Vec2::new(0.0, 0.1)];
        assert_eq!(first_contact(Vec2::ZERO, &targets, 0.5), Some(1));
        assert_eq!(first_contact(Vec2::new(-9.0, 0.0), &targets, 0.5), None);
    }
}
