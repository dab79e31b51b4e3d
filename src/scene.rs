use crate::assets::{DRIFTER_TEXTURE_KEY, SPINNER_TEXTURE_KEY};
use crate::config;
use crate::core::space::{self, world_half_height, world_half_width};
use cgmath::{Deg, Matrix4, Vector2, Vector3};
use log::debug;
use rand::Rng;

/// How an object's scale evolves over time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleMode {
    Fixed(f32),
    /// 0.5 + 0.5 * sin(t), sampled from the absolute run clock rather than
    /// accumulated frame deltas; a stall between frames never desynchronizes
    /// the pulse from the clock.
    Pulse,
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub texture_key: &'static str,
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub rotation_deg: f32,
    pub spin_deg_per_sec: f32,
    pub scale: f32,
    pub scale_mode: ScaleMode,
}

impl SceneObject {
    fn advance(&mut self, delta_seconds: f32, clock_seconds: f32) {
        self.position.x = space::wrap_axis(
            self.position.x + self.velocity.x * delta_seconds,
            world_half_width(),
        );
        self.position.y = space::wrap_axis(
            self.position.y + self.velocity.y * delta_seconds,
            world_half_height(),
        );
        // Accumulates without normalization; callers treat it as a raw angle.
        self.rotation_deg += self.spin_deg_per_sec * delta_seconds;
        self.scale = match self.scale_mode {
            ScaleMode::Fixed(s) => s,
            ScaleMode::Pulse => 0.5 + 0.5 * clock_seconds.sin(),
        };
    }

    /// Model matrix: translate, then rotate about Z, then scale.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(self.position.x, self.position.y, 0.0))
            * Matrix4::from_angle_z(Deg(self.rotation_deg))
            * Matrix4::from_nonuniform_scale(self.scale, self.scale, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct Background {
    pub color: [f32; 3],
    pub opacity: f32,
    cycle_elapsed: f32,
}

impl Background {
    fn new() -> Self {
        Self {
            color: config::INITIAL_BACKGROUND,
            opacity: config::BACKGROUND_OPACITY,
            cycle_elapsed: 0.0,
        }
    }

    /// Accumulates delta time and redraws the color once per cycle, resetting
    /// the accumulator. Returns whether a resample happened this tick.
    fn tick(&mut self, delta_seconds: f32, rng: &mut impl Rng) -> bool {
        self.cycle_elapsed += delta_seconds;
        if self.cycle_elapsed < config::BACKGROUND_CYCLE_SECONDS {
            return false;
        }
        self.color = [rng.random(), rng.random(), rng.random()];
        self.cycle_elapsed = 0.0;
        true
    }

    pub fn clear_color(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], self.opacity]
    }
}

/// The whole animated state of the program: two textured triangles over a
/// color-cycling background.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub background: Background,
}

impl Scene {
    pub fn new() -> Self {
        let drifter = SceneObject {
            texture_key: DRIFTER_TEXTURE_KEY,
            position: Vector2::new(0.0, 0.0),
            velocity: Vector2::from(config::DRIFTER_VELOCITY),
            rotation_deg: 0.0,
            spin_deg_per_sec: 0.0,
            scale: 1.0,
            scale_mode: ScaleMode::Fixed(1.0),
        };
        let spinner = SceneObject {
            texture_key: SPINNER_TEXTURE_KEY,
            position: Vector2::new(0.0, 0.0),
            velocity: Vector2::from(config::SPINNER_VELOCITY),
            rotation_deg: 0.0,
            spin_deg_per_sec: config::SPINNER_SPIN_DEG_PER_SEC,
            scale: 1.0,
            scale_mode: ScaleMode::Pulse,
        };
        Self {
            objects: vec![drifter, spinner],
            background: Background::new(),
        }
    }

    /// Advances every object by `delta_seconds` and ticks the background.
    /// `clock_seconds` is the absolute run clock used by pulse scaling.
    pub fn update(&mut self, delta_seconds: f32, clock_seconds: f32, rng: &mut impl Rng) {
        for object in &mut self.objects {
            object.advance(delta_seconds, clock_seconds);
        }
        if self.background.tick(delta_seconds, rng) {
            debug!("Background resampled to {:?}", self.background.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn drifter_position_tracks_total_elapsed_time() {
        let mut scene = Scene::new();
        let mut rng = rng();
        let deltas = [0.3_f32, 1.0, 0.25, 0.45, 2.0];
        let total: f32 = deltas.iter().sum();
        for dt in deltas {
            scene.update(dt, 0.0, &mut rng);
        }
        let drifter = &scene.objects[0];
        assert!((drifter.position.x - 0.01 * total).abs() < 1e-5);
        assert!((drifter.position.y - 0.01 * total).abs() < 1e-5);
    }

    #[test]
    fn axes_wrap_independently() {
        let mut object = Scene::new().objects[1].clone();
        object.position = Vector2::new(0.0, 3.7);
        object.velocity = Vector2::new(0.0, 1.0);
        object.advance(0.1, 0.0);
        assert!((object.position.y + world_half_height()).abs() < 1e-6);
        assert_eq!(object.position.x, 0.0);
    }

    #[test]
    fn spinner_rotation_accumulates_unbounded() {
        let mut scene = Scene::new();
        let mut rng = rng();
        for _ in 0..10 {
            scene.update(1.0, 0.0, &mut rng);
        }
        assert!((scene.objects[1].rotation_deg - 450.0).abs() < 1e-3);
    }

    #[test]
    fn pulse_scale_follows_the_absolute_clock() {
        let mut scene = Scene::new();
        let mut rng = rng();
        scene.update(0.016, 1.25, &mut rng);
        let expected = 0.5 + 0.5 * 1.25_f32.sin();
        assert!((scene.objects[1].scale - expected).abs() < 1e-6);

        // A long stall with no accumulated delta still lands on the clock.
        scene.update(0.0, 40.0, &mut rng);
        let expected = 0.5 + 0.5 * 40.0_f32.sin();
        assert!((scene.objects[1].scale - expected).abs() < 1e-6);
    }

    #[test]
    fn drifter_neither_spins_nor_pulses() {
        let mut scene = Scene::new();
        let mut rng = rng();
        scene.update(0.5, 3.0, &mut rng);
        assert_eq!(scene.objects[0].rotation_deg, 0.0);
        assert_eq!(scene.objects[0].scale, 1.0);
    }

    #[test]
    fn background_resamples_once_per_cycle() {
        let mut background = Background::new();
        let mut rng = rng();
        let mut resamples = 0;
        for _ in 0..20 {
            if background.tick(0.1, &mut rng) {
                resamples += 1;
            }
        }
        assert_eq!(resamples, 1);
    }

    #[test]
    fn background_cycle_boundary_fires_exactly_once() {
        let mut background = Background::new();
        let mut rng = rng();
        assert!(background.tick(2.0, &mut rng));
        assert!(!background.tick(1.9, &mut rng));
        assert!(background.tick(0.1, &mut rng));
    }

    #[test]
    fn background_channels_land_in_unit_range() {
        let mut background = Background::new();
        let mut rng = rng();
        assert_eq!(background.color, config::INITIAL_BACKGROUND);
        background.tick(2.5, &mut rng);
        assert_ne!(background.color, config::INITIAL_BACKGROUND);
        for channel in background.color {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn model_matrix_translates_by_position() {
        let mut object = Scene::new().objects[0].clone();
        object.position = Vector2::new(1.5, -2.0);
        let m = object.model_matrix();
        assert!((m.w.x - 1.5).abs() < 1e-6);
        assert!((m.w.y + 2.0).abs() < 1e-6);
    }
}
