//! The print scene: one build volume and an ordered set of print objects

use std::f32::consts::TAU;

use crate::config::PrintVolume;
use crate::printable::{MeshId, PrintableMesh};
use crate::ray::{Intersection, Ray};
use crate::volume::BuildVolume;
use crate::Result;

/// Container for the build volume and the objects placed in it.
///
/// The scene owns every print object. Objects keep insertion order and are
/// unique by [`MeshId`].
#[derive(Debug, Clone)]
pub struct PrintScene {
    print_volume: BuildVolume,
    print_objects: Vec<PrintableMesh>,
    objects_visible: bool,
    overhang_angle: f32,
}

impl PrintScene {
    /// Create a scene with the default build volume
    pub fn new() -> Self {
        Self {
            print_volume: BuildVolume::default(),
            print_objects: Vec::new(),
            objects_visible: true,
            overhang_angle: 0.0,
        }
    }

    /// Create a scene with a build volume of the given size
    pub fn with_volume(volume: &PrintVolume) -> Result<Self> {
        Ok(Self {
            print_volume: BuildVolume::from_volume(volume)?,
            ..Self::new()
        })
    }

    pub fn print_volume(&self) -> &BuildVolume {
        &self.print_volume
    }

    pub fn print_volume_mut(&mut self) -> &mut BuildVolume {
        &mut self.print_volume
    }

    /// Print objects in insertion order
    pub fn print_objects(&self) -> &[PrintableMesh] {
        &self.print_objects
    }

    pub fn len(&self) -> usize {
        self.print_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.print_objects.is_empty()
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.print_objects.iter().any(|o| o.id() == id)
    }

    pub fn object(&self, id: MeshId) -> Option<&PrintableMesh> {
        self.print_objects.iter().find(|o| o.id() == id)
    }

    pub fn object_mut(&mut self, id: MeshId) -> Option<&mut PrintableMesh> {
        self.print_objects.iter_mut().find(|o| o.id() == id)
    }

    /// Append one object, applying the current overhang angle to it.
    ///
    /// Returns None if an object with the same id is already in the scene.
    pub fn add_object(&mut self, mut object: PrintableMesh) -> Option<MeshId> {
        let id = object.id();
        if self.contains(id) {
            tracing::warn!(%id, "object already in scene, ignoring");
            return None;
        }
        object.apply_overhang_angle(self.overhang_angle);
        self.print_objects.push(object);
        tracing::debug!(%id, count = self.print_objects.len(), "added print object");
        Some(id)
    }

    /// Append objects in iteration order; returns the ids that were inserted
    pub fn add_objects<I>(&mut self, objects: I) -> Vec<MeshId>
    where
        I: IntoIterator<Item = PrintableMesh>,
    {
        objects
            .into_iter()
            .filter_map(|o| self.add_object(o))
            .collect()
    }

    /// Remove an object by identity. A missing id is a no-op.
    ///
    /// The returned object carries its unselected materials.
    pub fn remove_object(&mut self, id: MeshId) -> Option<PrintableMesh> {
        let index = self.print_objects.iter().position(|o| o.id() == id)?;
        let mut removed = self.print_objects.remove(index);
        removed.set_selected(false);
        tracing::debug!(%id, count = self.print_objects.len(), "removed print object");
        Some(removed)
    }

    /// Remove every object, returning them unselected in insertion order
    pub fn clear_objects(&mut self) -> Vec<PrintableMesh> {
        let mut removed = std::mem::take(&mut self.print_objects);
        for object in &mut removed {
            object.set_selected(false);
        }
        removed
    }

    pub fn objects_visible(&self) -> bool {
        self.objects_visible
    }

    /// Hide the whole object collection
    pub fn hide_objects(&mut self) {
        self.objects_visible = false;
    }

    /// Show the whole object collection
    pub fn show_objects(&mut self) {
        self.objects_visible = true;
    }

    /// Overhang threshold angle in radians, within [0, 2π)
    pub fn overhang_angle(&self) -> f32 {
        self.overhang_angle
    }

    /// Set the overhang threshold angle in radians and push its cosine into
    /// every object's overhang uniform.
    ///
    /// Non-finite angles are ignored and the current angle is kept.
    pub fn set_overhang_angle(&mut self, angle_rad: f32) {
        if !angle_rad.is_finite() {
            tracing::warn!(angle_rad, "ignoring non-finite overhang angle");
            return;
        }
        self.overhang_angle = normalize(angle_rad, TAU);
        self.apply_overhang_to_all();
    }

    /// Overhang threshold angle in degrees, within [0, 360)
    pub fn overhang_angle_degrees(&self) -> f32 {
        self.overhang_angle.to_degrees()
    }

    pub fn set_overhang_angle_degrees(&mut self, angle_deg: f32) {
        if !angle_deg.is_finite() {
            tracing::warn!(angle_deg, "ignoring non-finite overhang angle");
            return;
        }
        self.set_overhang_angle(normalize(angle_deg, 360.0).to_radians());
    }

    fn apply_overhang_to_all(&mut self) {
        let angle = self.overhang_angle;
        for object in &mut self.print_objects {
            object.apply_overhang_angle(angle);
        }
        tracing::debug!(
            angle_deg = angle.to_degrees(),
            cos = angle.cos(),
            objects = self.print_objects.len(),
            "updated overhang uniform"
        );
    }

    /// Total volume of all objects, in mm³
    pub fn total_volume(&self) -> f64 {
        self.print_objects.iter().map(|o| o.volume()).sum()
    }

    /// Intersect a world-space ray with the print objects.
    ///
    /// Hits are ordered nearest first; equal distances keep insertion order.
    /// Nothing is hit while the collection is hidden.
    pub fn raycast(&self, ray: &Ray) -> Vec<Intersection> {
        if !self.objects_visible {
            return Vec::new();
        }
        let mut hits: Vec<Intersection> = self
            .print_objects
            .iter()
            .filter_map(|o| {
                o.intersect_ray(ray).map(|distance| Intersection {
                    object: o.id(),
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl Default for PrintScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a value into [0, period)
fn normalize(value: f32, period: f32) -> f32 {
    let r = value.rem_euclid(period);
    if r >= period {
        0.0
    } else {
        r
    }
}
