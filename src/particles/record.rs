//! Persisted emitter configuration.
//!
//! Emitters externalise their template as an [`EmitterRecord`], a flat JSON
//! object keyed the way the scene file expects:
//!
//! ```json
//! {
//!   "Type": 5, "UUID": 1234,
//!   "Position": { "X": 0.0, "Y": 1.0, "Z": 0.0 },
//!   "Speed":    { "X": 0.0, "Y": 2.0, "Z": 0.0 },
//!   "Rotation": { "X": 0.0, "Y": 45.0 },
//!   "Size":     { "Value": 1.0 },
//!   "Path": "smoke.png",
//!   "Color":    { "X": 1.0, "Y": 1.0, "Z": 1.0, "W": 1.0 },
//!   "Life":     { "Value": 1.5 },
//!   "Ratio":    { "Value": 0.1 },
//!   "SubEmitter": 987, "ParticlesBurst": 8
//! }
//! ```
//!
//! `Speed` is the initial velocity (`direction * speed`), `Rotation` the roll
//! range in degrees. `Life`, `Ratio`, `SubEmitter` and `ParticlesBurst` are
//! optional on load. Particle runtime state is never persisted.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::particles::emitter::Emitter;
use crate::particles::error::ParticleError;

/// Type tag of scene components, as stored in the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ComponentKind {
    Transform = 0,
    Mesh = 1,
    Texture = 2,
    Camera = 3,
    Billboard = 4,
    Emitter = 5,
}

impl ComponentKind {
    pub fn tag(self) -> i32 {
        self as i32
    }
}

/// Capability a scene component exposes to the persistence layer.
pub trait SceneComponent {
    type Record: Serialize + for<'de> Deserialize<'de>;

    fn kind(&self) -> ComponentKind;

    fn save(&self) -> Self::Record;

    fn load(&mut self, record: &Self::Record) -> Result<(), ParticleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec2Record {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec4Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalarRecord {
    pub value: f32,
}

impl From<Vec3> for Vec3Record {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Vec3Record> for Vec3 {
    fn from(r: Vec3Record) -> Self {
        Vec3::new(r.x, r.y, r.z)
    }
}

impl From<Vec4> for Vec4Record {
    fn from(v: Vec4) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: v.w }
    }
}

impl From<Vec4Record> for Vec4 {
    fn from(r: Vec4Record) -> Self {
        Vec4::new(r.x, r.y, r.z, r.w)
    }
}

/// Serialized emitter template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmitterRecord {
    #[serde(rename = "Type")]
    pub kind: i32,
    #[serde(rename = "UUID")]
    pub uuid: u32,
    pub position: Vec3Record,
    pub speed: Vec3Record,
    pub rotation: Vec2Record,
    pub size: ScalarRecord,
    pub path: String,
    pub color: Vec4Record,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<ScalarRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<ScalarRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_emitter: Option<u32>,
    #[serde(default)]
    pub particles_burst: u32,
}

impl EmitterRecord {
    pub fn to_value(&self) -> Result<serde_json::Value, ParticleError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ParticleError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl SceneComponent for Emitter {
    type Record = EmitterRecord;

    fn kind(&self) -> ComponentKind {
        ComponentKind::Emitter
    }

    /// Capture the template. The sub-emitter is stored by UUID; the manager
    /// fills it in through [`ParticleManager::save_emitters`](crate::particles::manager::ParticleManager::save_emitters).
    fn save(&self) -> EmitterRecord {
        EmitterRecord {
            kind: ComponentKind::Emitter.tag(),
            uuid: self.uuid,
            position: self.position.into(),
            speed: (self.direction * self.speed).into(),
            rotation: Vec2Record {
                x: self.rotation.0,
                y: self.rotation.1,
            },
            size: ScalarRecord { value: self.size },
            path: self.texture_path.clone(),
            color: self.color.into(),
            life: Some(ScalarRecord { value: self.life }),
            ratio: Some(ScalarRecord {
                value: self.spawn_interval,
            }),
            sub_emitter: self.pending_sub_emitter,
            particles_burst: self.particles_burst,
        }
    }

    /// Restore the template. Runtime state (timer, tracked particles) is
    /// reset; the texture handle and sub-emitter link must be resolved again.
    fn load(&mut self, record: &EmitterRecord) -> Result<(), ParticleError> {
        if record.kind != ComponentKind::Emitter.tag() {
            return Err(ParticleError::WrongComponentType { found: record.kind });
        }
        let velocity = Vec3::from(record.speed);
        self.uuid = record.uuid;
        self.position = record.position.into();
        self.speed = velocity.length();
        self.direction = velocity.normalize_or(Vec3::Y);
        self.rotation = (
            record.rotation.x.min(record.rotation.y),
            record.rotation.x.max(record.rotation.y),
        );
        self.size = record.size.value;
        self.color = record.color.into();
        if let Some(life) = record.life {
            self.life = life.value;
        }
        if let Some(ratio) = record.ratio {
            self.spawn_interval = ratio.value;
        }
        self.particles_burst = record.particles_burst;
        self.pending_sub_emitter = record.sub_emitter;
        self.sub_emitter = None;
        self.timer = 0.0;
        self.set_texture_path(record.path.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_save_uses_scene_keys() {
        let e = Emitter::default()
            .with_speed(2.0)
            .with_offset(Vec3::new(1.0, 2.0, 3.0))
            .with_texture_path("smoke.png");
        let value = e.save().to_value().unwrap();
        assert_eq!(value["Type"], 5);
        assert_eq!(value["Position"]["Z"], 3.0);
        assert_eq!(value["Speed"]["Y"], 2.0);
        assert_eq!(value["Size"]["Value"], 1.0);
        assert_eq!(value["Path"], "smoke.png");
        assert_eq!(value["Color"]["W"], 1.0);
        assert!(value.get("SubEmitter").is_none());
    }

    #[test]
    fn test_load_restores_saved_template() {
        let original = Emitter::default()
            .with_spawn_interval(0.25)
            .with_life(3.0)
            .with_speed(4.0)
            .with_direction(Vec3::X)
            .with_rotation_range(10.0, 20.0)
            .with_size(0.5)
            .with_color(Vec4::new(1.0, 0.0, 0.0, 0.5))
            .with_texture_path("fire.png");
        let json = serde_json::to_string(&original.save()).unwrap();

        let record: EmitterRecord = serde_json::from_str(&json).unwrap();
        let mut restored = Emitter::default();
        restored.load(&record).unwrap();

        assert!(approx_eq(restored.speed, 4.0));
        assert_eq!(restored.direction, Vec3::X);
        assert_eq!(restored.rotation, (10.0, 20.0));
        assert!(approx_eq(restored.spawn_interval, 0.25));
        assert!(approx_eq(restored.life, 3.0));
        assert!(approx_eq(restored.size, 0.5));
        assert_eq!(restored.color, Vec4::new(1.0, 0.0, 0.0, 0.5));
        assert_eq!(restored.texture_path, "fire.png");
        assert_eq!(restored.uuid, original.uuid);
    }

    #[test]
    fn test_load_minimal_record_keeps_defaults() {
        let value = serde_json::json!({
            "Type": 5,
            "UUID": 42,
            "Position": { "X": 0.0, "Y": 0.0, "Z": 0.0 },
            "Speed": { "X": 0.0, "Y": 0.0, "Z": 0.0 },
            "Rotation": { "X": 0.0, "Y": 0.0 },
            "Size": { "Value": 2.0 },
            "Path": "",
            "Color": { "X": 1.0, "Y": 1.0, "Z": 1.0, "W": 1.0 }
        });
        let record = EmitterRecord::from_value(value).unwrap();
        let mut e = Emitter::default();
        e.load(&record).unwrap();
        assert_eq!(e.uuid, 42);
        assert_eq!(e.direction, Vec3::Y);
        assert!(approx_eq(e.speed, 0.0));
        assert!(approx_eq(e.life, 1.0));
        assert!(approx_eq(e.spawn_interval, 0.0));
        assert_eq!(e.particles_burst, 0);
    }

    #[test]
    fn test_load_rejects_other_component_types() {
        let mut record = Emitter::default().save();
        record.kind = ComponentKind::Mesh.tag();
        let mut e = Emitter::default();
        assert!(matches!(
            e.load(&record),
            Err(ParticleError::WrongComponentType { found: 1 })
        ));
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let value = serde_json::json!({ "Type": 5 });
        assert!(matches!(
            EmitterRecord::from_value(value),
            Err(ParticleError::Record(_))
        ));
    }
}
