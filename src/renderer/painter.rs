//! Game state to vertex translation
//!
//! The only place that knows what the thief, jewels and alarms look like.
//! Reads `GameState` and `Scenery`, never writes to them.

use std::f32::consts::FRAC_PI_2;
use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Vec2, Vec3};

use super::mesh::{Material, MeshBuilder, MeshData};
use super::vertex::SceneVertex;
use crate::consts::{ALARM_HEIGHT, JEWEL_REST_HEIGHT};
use crate::scene::{self, Scenery, colors};
use crate::settings::QualityPreset;
use crate::sim::GameState;

const JEWEL_OPACITY: f32 = 0.8;
const WINDOW_OPACITY: f32 = 0.7;
const WINDOW_GLOW: f32 = 0.5;
const ALARM_REST_BLINK: f32 = 0.5;

fn ground_at(pos: Vec2, y: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(pos.x, y, pos.y))
}

fn mesh(f: impl FnOnce(&mut MeshBuilder)) -> MeshData {
    let mut builder = MeshBuilder::new();
    f(&mut builder);
    builder.finish()
}

fn lift(y: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, y, 0.0))
}

/// Template meshes for every visible object
pub struct ScenePainter {
    thief_body: MeshData,
    thief_head: MeshData,
    jewel_gem: MeshData,
    jewel_base: MeshData,
    alarm_body: MeshData,
    alarm_light: MeshData,
    trunk: MeshData,
    foliage: MeshData,
    house_base: MeshData,
    house_roof: MeshData,
    door: MeshData,
    window: MeshData,
    ground: MeshData,
    /// 1x1 strip, scaled per path
    path: MeshData,
    moon: MeshData,
}

impl ScenePainter {
    pub fn new(quality: QualityPreset) -> Self {
        let seg = quality.mesh_segments();

        Self {
            thief_body: mesh(|b| {
                b.add_box(0.4, 0.6, 0.3);
            }),
            thief_head: mesh(|b| {
                b.add_sphere(0.2, seg * 2);
            }),
            jewel_gem: mesh(|b| {
                b.add_octahedron(0.2);
            }),
            jewel_base: mesh(|b| {
                b.add_cylinder(0.1, 0.1, 0.05, 8);
            }),
            alarm_body: mesh(|b| {
                b.add_box(0.3, 0.1, 0.3);
            }),
            alarm_light: mesh(|b| {
                b.add_cylinder(0.1, 0.1, 0.1, seg * 2);
            }),
            trunk: mesh(|b| {
                b.add_cylinder(0.2, 0.2, 1.0, seg);
            }),
            foliage: mesh(|b| {
                b.add_cone(0.8, 1.2, seg);
            }),
            house_base: mesh(|b| {
                b.add_box(2.0, 1.5, 2.0);
            }),
            house_roof: mesh(|b| {
                b.add_cone(1.5, 1.0, 4);
            }),
            door: mesh(|b| {
                b.add_panel(0.4, 0.8);
            }),
            window: mesh(|b| {
                b.add_panel(0.4, 0.4);
            }),
            ground: mesh(|b| {
                b.add_ground_plane(scene::GROUND_SIZE, scene::GROUND_SIZE);
            }),
            path: mesh(|b| {
                b.add_ground_plane(1.0, 1.0);
            }),
            moon: mesh(|b| {
                b.add_sphere(scene::MOON_RADIUS, seg * 2);
            }),
        }
    }

    /// Vertices for everything that stays put for a whole session
    pub fn scenery_vertices(&self, scenery: &Scenery) -> Vec<SceneVertex> {
        let mut out = Vec::new();

        self.ground
            .emit(&mut out, Mat4::IDENTITY, &Material::solid(colors::GROUND));

        let dirt = Material::solid(colors::PATH);
        for path in &scenery.paths {
            let model = ground_at(path.center(), 0.01)
                * Mat4::from_rotation_y(path.yaw())
                * Mat4::from_scale(Vec3::new(path.length(), 1.0, scene::PATH_WIDTH));
            self.path.emit(&mut out, model, &dirt);
        }

        let trunk = Material::solid(colors::TRUNK);
        let leaves = Material::solid(colors::FOLIAGE);
        for &tree in &scenery.trees {
            let base = ground_at(tree, 0.0);
            self.trunk.emit(&mut out, base * lift(0.5), &trunk);
            for (y, scale) in [(1.3, 1.0), (1.8, 0.8), (2.3, 0.6)] {
                let model = base * lift(y) * Mat4::from_scale(Vec3::splat(scale));
                self.foliage.emit(&mut out, model, &leaves);
            }
        }

        let wall = Material::solid(colors::HOUSE_WALL);
        let roof = Material::solid(colors::HOUSE_ROOF);
        let door = Material::solid(colors::HOUSE_DOOR);
        let glass = Material::translucent(colors::HOUSE_WINDOW, WINDOW_OPACITY)
            .with_emissive(colors::WINDOW_GLOW, WINDOW_GLOW);
        for house in &scenery.houses {
            let base = ground_at(house.pos, 0.0) * Mat4::from_rotation_y(house.yaw);
            self.house_base.emit(&mut out, base * lift(0.75), &wall);
            self.house_roof
                .emit(&mut out, base * lift(2.0) * Mat4::from_rotation_y(FRAC_PI_4), &roof);
            self.door.emit(
                &mut out,
                base * Mat4::from_translation(Vec3::new(0.0, 0.4, 1.01)),
                &door,
            );
            for x in [-0.5, 0.5] {
                let model = base * Mat4::from_translation(Vec3::new(x, 0.8, 1.01));
                self.window.emit(&mut out, model, &glass);
            }
            for x in [-1.01, 1.01] {
                let model = base
                    * Mat4::from_translation(Vec3::new(x, 0.8, 0.0))
                    * Mat4::from_rotation_y(FRAC_PI_2);
                self.window.emit(&mut out, model, &glass);
            }
        }

        let moon = Material::solid(colors::MOON).with_emissive(colors::MOON_GLOW, 1.0);
        self.moon
            .emit(&mut out, Mat4::from_translation(scene::MOON_POS), &moon);

        out
    }

    /// Vertices for the thief, jewels and alarms this frame
    pub fn frame_vertices(&self, state: &GameState, reduced_motion: bool, out: &mut Vec<SceneVertex>) {
        out.clear();
        let jewel_verts = self.jewel_gem.vertex_count() + self.jewel_base.vertex_count();
        let alarm_verts = self.alarm_body.vertex_count() + self.alarm_light.vertex_count();
        out.reserve(
            self.thief_body.vertex_count()
                + self.thief_head.vertex_count()
                + jewel_verts * state.jewels.len()
                + alarm_verts * state.alarms.len(),
        );

        let player = &state.player;
        let thief = Material::solid(if player.caught {
            colors::THIEF_CAUGHT
        } else {
            colors::THIEF
        });
        let base = ground_at(player.pos, 0.0) * Mat4::from_rotation_y(player.heading.yaw());
        self.thief_body.emit(out, base * lift(0.3), &thief);
        self.thief_head.emit(out, base * lift(0.7), &thief);

        let gem = Material::translucent(colors::JEWEL, JEWEL_OPACITY);
        let stand = Material::solid(colors::JEWEL_BASE);
        for jewel in &state.jewels {
            let (height, spin) = if reduced_motion {
                (JEWEL_REST_HEIGHT, 0.0)
            } else {
                (jewel.height, jewel.spin)
            };
            let model = ground_at(jewel.pos, height) * Mat4::from_rotation_y(spin);
            self.jewel_gem.emit(out, model, &gem);
            self.jewel_base.emit(out, model * lift(-0.15), &stand);
        }

        let casing = Material::solid(colors::ALARM_BODY);
        for alarm in &state.alarms {
            let blink = if reduced_motion {
                ALARM_REST_BLINK
            } else {
                alarm.blink
            };
            let light = Material::solid(colors::ALARM_LIGHT).with_emissive(colors::ALARM_LIGHT, blink);
            let model = ground_at(alarm.pos, ALARM_HEIGHT);
            self.alarm_body.emit(out, model, &casing);
            self.alarm_light.emit(out, model * lift(0.1), &light);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn bare_state() -> GameState {
        GameState::with_tuning(
            1,
            Tuning {
                initial_jewels: 0,
                initial_alarms: 0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_frame_grows_with_entities() {
        let painter = ScenePainter::new(QualityPreset::Low);
        let mut state = bare_state();
        let mut out = Vec::new();

        painter.frame_vertices(&state, false, &mut out);
        let thief_only = out.len();
        assert!(thief_only > 0);

        state.place_jewel(Vec2::new(2.0, 2.0));
        painter.frame_vertices(&state, false, &mut out);
        let with_jewel = out.len();
        assert!(with_jewel > thief_only);

        state.place_alarm(Vec2::new(-2.0, 2.0));
        painter.frame_vertices(&state, false, &mut out);
        assert!(out.len() > with_jewel);
    }

    #[test]
    fn test_caught_thief_turns_grey() {
        let painter = ScenePainter::new(QualityPreset::Low);
        let mut state = bare_state();
        let mut out = Vec::new();

        painter.frame_vertices(&state, false, &mut out);
        assert_eq!(&out[0].color[..3], &colors::THIEF[..]);

        state.enter_game_over();
        painter.frame_vertices(&state, false, &mut out);
        assert_eq!(&out[0].color[..3], &colors::THIEF_CAUGHT[..]);
    }

    #[test]
    fn test_alarm_glow_follows_blink() {
        let painter = ScenePainter::new(QualityPreset::Low);
        let mut state = bare_state();
        state.place_alarm(Vec2::new(3.0, 0.0));
        state.alarms[0].blink = 1.0;
        let mut out = Vec::new();

        painter.frame_vertices(&state, false, &mut out);
        let glow = out.last().unwrap().emissive[0];
        assert!((glow - 1.0).abs() < 1e-6);

        painter.frame_vertices(&state, true, &mut out);
        let glow = out.last().unwrap().emissive[0];
        assert!((glow - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_jewel_drawn_at_hover_height() {
        let painter = ScenePainter::new(QualityPreset::Low);
        let mut state = bare_state();
        state.place_jewel(Vec2::new(1.0, 1.0));
        state.jewels[0].height = 0.2;
        let mut out = Vec::new();
        let mut thief = Vec::new();
        painter.frame_vertices(&bare_state(), false, &mut thief);

        painter.frame_vertices(&state, false, &mut out);
        let gem = &out[thief.len()..thief.len() + 24];
        let top = gem.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((top - 0.4).abs() < 1e-5);

        painter.frame_vertices(&state, true, &mut out);
        let gem = &out[thief.len()..thief.len() + 24];
        let top = gem.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((top - 0.35).abs() < 1e-5);
    }

    #[test]
    fn test_scenery_vertices() {
        let painter = ScenePainter::new(QualityPreset::Medium);
        let scenery = Scenery::generate(3);
        let verts = painter.scenery_vertices(&scenery);
        // ground + at least the paths and houses
        assert!(verts.len() > 6 + 6 * 6 + 4 * 36);
        assert!(verts.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }
}
