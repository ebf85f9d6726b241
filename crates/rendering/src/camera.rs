//! Fly camera for the streamed terrain.
//!
//! The camera circles a focus point on the ground plane. The focus is what
//! the terrain streams around, so moving it (keys) is how the observer
//! travels; right-drag and the wheel only change how it is viewed.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;

use terrain::ObserverPosition;

/// Ground units per second at the default distance.
const TRAVEL_SPEED: f32 = 220.0;
const SPRINT_FACTOR: f32 = 4.0;
const TURN_RATE: f32 = 0.005;
const ZOOM_STEP: f32 = 0.12;
const DISTANCE_RANGE: (f32, f32) = (40.0, 2500.0);
const PITCH_RANGE: (f32, f32) = (0.1, 1.45);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Ground point the camera looks at.
    pub focus: Vec3,
    pub yaw: f32,
    /// Elevation above the ground plane, radians.
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.7,
            distance: 450.0,
        }
    }
}

impl OrbitCamera {
    /// Camera transform looking at the focus from the current angles.
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let eye = self.focus + rotation * (Vec3::Z * self.distance);
        Transform::from_translation(eye).looking_at(self.focus, Vec3::Y)
    }

    /// Move the focus along the ground. `input.y > 0` travels away from the
    /// camera, `input.x > 0` to its right.
    pub fn travel(&mut self, input: Vec2, step: f32) {
        let Some(direction) = input.try_normalize() else {
            return;
        };
        let ground = Vec2::from_angle(-self.yaw).rotate(Vec2::new(direction.x, -direction.y));
        self.focus.x += ground.x * step;
        self.focus.z += ground.y * step;
    }

    /// Multiply the distance by `1 - lines * ZOOM_STEP`, kept in range.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - lines * ZOOM_STEP).max(0.1);
        self.distance = (self.distance * factor).clamp(DISTANCE_RANGE.0, DISTANCE_RANGE.1);
    }

    pub fn turn(&mut self, delta: Vec2) {
        self.yaw -= delta.x * TURN_RATE;
        self.pitch = (self.pitch + delta.y * TURN_RATE).clamp(PITCH_RANGE.0, PITCH_RANGE.1);
    }

    /// Ground-plane observer for the focus: world X and Z.
    pub fn observer(&self) -> Vec2 {
        Vec2::new(self.focus.x, self.focus.z)
    }
}

pub fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((Camera3d::default(), orbit.transform()));
    commands.insert_resource(orbit);
}

pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    for mut transform in &mut cameras {
        *transform = orbit.transform();
    }
}

/// Snapshot the camera focus into [`ObserverPosition`] for this tick.
pub fn update_observer_from_camera(
    orbit: Option<Res<OrbitCamera>>,
    mut observer: ResMut<ObserverPosition>,
) {
    let Some(orbit) = orbit else {
        return;
    };
    let position = orbit.observer();
    if observer.0 != position {
        observer.0 = position;
    }
}

/// WASD / arrows travel, Shift sprints. Speed grows with zoom-out.
pub fn camera_travel_keys(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let held = |a: KeyCode, b: KeyCode| keys.any_pressed([a, b]) as i32 as f32;
    let input = Vec2::new(
        held(KeyCode::KeyD, KeyCode::ArrowRight) - held(KeyCode::KeyA, KeyCode::ArrowLeft),
        held(KeyCode::KeyW, KeyCode::ArrowUp) - held(KeyCode::KeyS, KeyCode::ArrowDown),
    );
    if input == Vec2::ZERO {
        return;
    }
    let sprint = if keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        SPRINT_FACTOR
    } else {
        1.0
    };
    let step = TRAVEL_SPEED * sprint * (orbit.distance / 450.0) * time.delta_secs();
    orbit.travel(input, step);
}

/// Right-drag turns the camera around the focus.
pub fn camera_turn_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if buttons.pressed(MouseButton::Right) && motion.delta != Vec2::ZERO {
        orbit.turn(motion.delta);
    }
}

pub fn camera_zoom(scroll: Res<AccumulatedMouseScroll>, mut orbit: ResMut<OrbitCamera>) {
    let lines = match scroll.unit {
        MouseScrollUnit::Line => scroll.delta.y,
        MouseScrollUnit::Pixel => scroll.delta.y / 100.0,
    };
    if lines != 0.0 {
        orbit.zoom(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_looks_at_focus_from_above() {
        let orbit = OrbitCamera {
            focus: Vec3::new(100.0, 0.0, -50.0),
            ..OrbitCamera::default()
        };
        let transform = orbit.transform();
        assert!(transform.translation.y > 0.0);
        assert!((transform.translation.distance(orbit.focus) - orbit.distance).abs() < 1e-2);
        let towards_focus = (orbit.focus - transform.translation).normalize();
        assert!(transform.forward().dot(towards_focus) > 0.999);
    }

    #[test]
    fn test_forward_travel_moves_away_from_camera() {
        let mut orbit = OrbitCamera::default();
        let eye = orbit.transform().translation;
        orbit.travel(Vec2::Y, 10.0);
        let before = Vec2::new(eye.x, eye.z).distance(Vec2::ZERO);
        let after = Vec2::new(eye.x, eye.z).distance(orbit.observer());
        assert!((after - before - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_input_does_not_move() {
        let mut orbit = OrbitCamera::default();
        orbit.travel(Vec2::ZERO, 10.0);
        assert_eq!(orbit.focus, Vec3::ZERO);
    }

    #[test]
    fn test_zoom_and_pitch_stay_in_range() {
        let mut orbit = OrbitCamera::default();
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, DISTANCE_RANGE.0);
        orbit.zoom(-1000.0);
        assert_eq!(orbit.distance, DISTANCE_RANGE.1);
        orbit.turn(Vec2::new(0.0, 10_000.0));
        assert_eq!(orbit.pitch, PITCH_RANGE.1);
    }

    #[test]
    fn test_observer_drops_height() {
        let orbit = OrbitCamera {
            focus: Vec3::new(12.0, 99.0, -7.0),
            ..OrbitCamera::default()
        };
        assert_eq!(orbit.observer(), Vec2::new(12.0, -7.0));
    }
}
