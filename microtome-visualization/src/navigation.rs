//! Orbit-style camera navigation driven by pointer drags and scrolling

use microtome_core::BoundingBox;
use nalgebra::Vector3;

use crate::camera::Camera;
use crate::input::PointerAction;
use crate::picking::PRIMARY_BUTTON;
use crate::renderer::CameraNavigator;

/// Orbits the camera around a target box with the primary button and zooms
/// on scroll
#[derive(Debug, Clone)]
pub struct OrbitNavigator {
    target: Option<BoundingBox>,
    enabled: bool,
    /// Radians of orbit per pixel dragged
    pub rotate_speed: f32,
    /// Fraction of the distance zoomed per scroll line
    pub zoom_speed: f32,
    last_position: Option<(f32, f32)>,
}

impl OrbitNavigator {
    pub fn new() -> Self {
        Self {
            target: None,
            enabled: false,
            rotate_speed: 0.01,
            zoom_speed: 0.1,
            last_position: None,
        }
    }

    pub fn target(&self) -> Option<BoundingBox> {
        self.target
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Feed a pointer action; dragging with the primary button orbits
    pub fn handle_pointer(&mut self, action: &PointerAction, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        match action {
            PointerAction::Down(event) => self.last_position = Some((event.x, event.y)),
            PointerAction::Move(event) => {
                if event.buttons & PRIMARY_BUTTON == 0 {
                    self.last_position = None;
                    return;
                }
                if let Some((x, y)) = self.last_position {
                    camera.orbit(
                        -(event.x - x) * self.rotate_speed,
                        (event.y - y) * self.rotate_speed,
                    );
                }
                self.last_position = Some((event.x, event.y));
            }
            PointerAction::Up(_) => self.last_position = None,
        }
    }

    /// Zoom by scroll lines, positive towards the target
    pub fn scroll(&mut self, lines: f32, camera: &mut Camera) {
        if self.enabled {
            camera.zoom(lines * self.zoom_speed);
        }
    }
}

impl Default for OrbitNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraNavigator for OrbitNavigator {
    fn attach(&mut self, camera: &mut Camera) {
        self.last_position = None;
        tracing::debug!(position = ?camera.position, "navigator attached");
    }

    fn set_target(&mut self, target: BoundingBox) {
        self.target = Some(target);
    }

    fn frame_target(&mut self, camera: &mut Camera) {
        let Some(target) = self.target else {
            return;
        };
        let center = target.center();
        let radius = target.size().norm() / 2.0;
        let direction = (camera.position - center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y);

        camera.look_at(center);
        camera.set_position(center + direction * camera.framing_distance(radius));
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.last_position = None;
        }
    }
}
