//! Static scenery layout
//!
//! Trees, houses, dirt paths and the moon. Generated once per session and
//! purely decorative: nothing here takes part in collision.

use std::f32::consts::FRAC_PI_4;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

/// Tree placement attempts per session
pub const TREE_ATTEMPTS: usize = 15;
/// Trees land in [-TREE_HALF_EXTENT, TREE_HALF_EXTENT)
pub const TREE_HALF_EXTENT: f32 = 20.0;
/// Attempts inside this central square are discarded
pub const TREE_CLEAR_ZONE: f32 = 8.0;
pub const HOUSE_OFFSET: f32 = 12.0;
pub const PATH_WIDTH: f32 = 1.0;
pub const GROUND_SIZE: f32 = 100.0;

pub const MOON_POS: Vec3 = Vec3::new(15.0, 10.0, -10.0);
pub const MOON_RADIUS: f32 = 1.0;
/// Blue moonlight range
pub const MOONLIGHT_RANGE: f32 = 30.0;
pub const MOONLIGHT_INTENSITY: f32 = 0.5;
/// Points toward the key light, which sits at (0, 10, 10)
pub const KEY_LIGHT_POS: Vec3 = Vec3::new(0.0, 10.0, 10.0);

/// Scene colours (sRGB hex, scaled to 0..1)
pub mod colors {
    pub const fn hex(rgb: u32) -> [f32; 3] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        ]
    }

    pub const BACKGROUND: [f32; 3] = hex(0x000033);
    pub const AMBIENT: [f32; 3] = hex(0x404040);
    pub const MOONLIGHT: [f32; 3] = hex(0x6666ff);
    pub const GROUND: [f32; 3] = hex(0x227722);
    pub const PATH: [f32; 3] = hex(0x8b4513);
    pub const TRUNK: [f32; 3] = hex(0x8b4513);
    pub const FOLIAGE: [f32; 3] = hex(0x228b22);
    pub const HOUSE_WALL: [f32; 3] = hex(0xdeb887);
    pub const HOUSE_ROOF: [f32; 3] = hex(0x8b0000);
    pub const HOUSE_DOOR: [f32; 3] = hex(0x4b3621);
    pub const HOUSE_WINDOW: [f32; 3] = hex(0x87ceeb);
    pub const WINDOW_GLOW: [f32; 3] = hex(0xffffaa);
    pub const MOON: [f32; 3] = hex(0xeeeeee);
    pub const MOON_GLOW: [f32; 3] = hex(0x888888);
    pub const THIEF: [f32; 3] = hex(0x222222);
    pub const THIEF_CAUGHT: [f32; 3] = hex(0x888888);
    pub const JEWEL: [f32; 3] = hex(0x00ff88);
    pub const JEWEL_BASE: [f32; 3] = hex(0xcccccc);
    pub const ALARM_BODY: [f32; 3] = hex(0x333333);
    pub const ALARM_LIGHT: [f32; 3] = hex(0xff0000);
}

/// A house at one corner of the estate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct House {
    pub pos: Vec2,
    /// Rotation about +Y
    pub yaw: f32,
}

/// A straight dirt path between two ground points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Path {
    pub from: Vec2,
    pub to: Vec2,
}

impl Path {
    pub fn center(&self) -> Vec2 {
        (self.from + self.to) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Rotation about +Y that lays a strip along +X onto the path
    pub fn yaw(&self) -> f32 {
        let d = self.to - self.from;
        -d.y.atan2(d.x)
    }
}

/// Everything that never moves during a session
#[derive(Debug, Clone)]
pub struct Scenery {
    pub trees: Vec<Vec2>,
    pub houses: Vec<House>,
    pub paths: Vec<Path>,
}

impl Scenery {
    pub fn generate(seed: u64) -> Self {
        // Separate stream so scenery never perturbs jewel/alarm spawns
        let mut rng = Pcg32::new(seed, 0xa02b_dbf7_bb3c_0a7);

        let trees: Vec<Vec2> = (0..TREE_ATTEMPTS)
            .map(|_| {
                Vec2::new(
                    rng.random_range(-TREE_HALF_EXTENT..TREE_HALF_EXTENT),
                    rng.random_range(-TREE_HALF_EXTENT..TREE_HALF_EXTENT),
                )
            })
            .filter(|p| p.x.abs() > TREE_CLEAR_ZONE || p.y.abs() > TREE_CLEAR_ZONE)
            .collect();

        let o = HOUSE_OFFSET;
        let houses = vec![
            House { pos: Vec2::new(-o, -o), yaw: FRAC_PI_4 },
            House { pos: Vec2::new(o, -o), yaw: -FRAC_PI_4 },
            House { pos: Vec2::new(-o, o), yaw: -FRAC_PI_4 * 3.0 },
            House { pos: Vec2::new(o, o), yaw: FRAC_PI_4 * 3.0 },
        ];

        let corner = |x: f32, z: f32| Vec2::new(x * o, z * o);
        let paths = vec![
            Path { from: corner(-1.0, -1.0), to: corner(1.0, -1.0) },
            Path { from: corner(1.0, -1.0), to: corner(1.0, 1.0) },
            Path { from: corner(1.0, 1.0), to: corner(-1.0, 1.0) },
            Path { from: corner(-1.0, 1.0), to: corner(-1.0, -1.0) },
            Path { from: corner(-1.0, -1.0), to: corner(1.0, 1.0) },
            Path { from: corner(-1.0, 1.0), to: corner(1.0, -1.0) },
        ];

        log::debug!("Scenery: {} trees, {} houses", trees.len(), houses.len());

        Self {
            trees,
            houses,
            paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trees_avoid_center() {
        for seed in 0..50 {
            let scenery = Scenery::generate(seed);
            assert!(scenery.trees.len() <= TREE_ATTEMPTS);
            for t in &scenery.trees {
                assert!(t.x.abs() > 8.0 || t.y.abs() > 8.0);
                assert!(t.x.abs() <= 20.0 && t.y.abs() <= 20.0);
            }
        }
    }

    #[test]
    fn test_fixed_houses_and_paths() {
        let scenery = Scenery::generate(1);
        assert_eq!(scenery.houses.len(), 4);
        assert_eq!(scenery.paths.len(), 6);
        assert!(scenery.houses.iter().all(|h| h.pos.x.abs() == 12.0 && h.pos.y.abs() == 12.0));
    }

    #[test]
    fn test_path_geometry() {
        let p = Path {
            from: Vec2::new(-12.0, -12.0),
            to: Vec2::new(12.0, -12.0),
        };
        assert_eq!(p.center(), Vec2::new(0.0, -12.0));
        assert_eq!(p.length(), 24.0);
        assert_eq!(p.yaw(), 0.0);

        let diag = Path {
            from: Vec2::new(-12.0, -12.0),
            to: Vec2::new(12.0, 12.0),
        };
        assert!((diag.length() - 24.0 * 2f32.sqrt()).abs() < 1e-4);
        assert!((diag.yaw() + FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_scenery() {
        assert_eq!(Scenery::generate(8).trees, Scenery::generate(8).trees);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(colors::hex(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(colors::BACKGROUND, [0.0, 0.0, 0.2]);
    }
}
