//! Core types shared across the lens blank calculations.
//!
//! Lengths are in millimetres, powers in dioptres and angles in degrees
//! throughout; no other units are supported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference refractive index for converting a base curve to a radius.
///
/// Front surfaces are always figured against crown glass, whatever the
/// material of the blank itself.
pub const CROWN_GLASS_INDEX: f64 = 1.523;

/// Accepted refractive index range `[min, max]`.
pub const INDEX_RANGE: (f64, f64) = (1.49, 2.0);

/// Accepted blank diameter range (mm).
pub const BLANK_SIZE_RANGE: (f64, f64) = (40.0, 85.0);

/// Accepted spherical power range (D).
pub const SPHERE_RANGE: (f64, f64) = (-20.0, 20.0);

/// Accepted cylinder axis range (degrees).
pub const AXIS_RANGE: (f64, f64) = (0.0, 180.0);

/// Shallowest accepted base curve (D). A zero base curve is a flat front.
pub const MIN_BASE_CURVE: f64 = 0.0;

/// Materials above this index get the thinner default minimum thickness.
const THIN_MATERIAL_INDEX: f64 = 1.498;

/// Default minimum thickness (mm) for a material of the given index.
///
/// Materials with an index above 1.498 can be surfaced down to 1.5 mm;
/// everything else is held at 2 mm.
pub fn default_min_thickness(index: f64) -> f64 {
    if index > THIN_MATERIAL_INDEX {
        1.5
    } else {
        2.0
    }
}

/// The independently settable fields of a lens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Index,
    BlankSize,
    BaseCurve,
    Sphere,
    Cylinder,
    Axis,
    MinThickness,
}

impl Field {
    /// All fields, in construction order.
    pub const ALL: [Field; 7] = [
        Field::Index,
        Field::BlankSize,
        Field::BaseCurve,
        Field::Sphere,
        Field::Cylinder,
        Field::Axis,
        Field::MinThickness,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Index => "index",
            Field::BlankSize => "blank size",
            Field::BaseCurve => "base curve",
            Field::Sphere => "sphere power",
            Field::Cylinder => "cylinder power",
            Field::Axis => "axis",
            Field::MinThickness => "minimum thickness",
        };
        f.write_str(name)
    }
}

/// Parameters for constructing a [`Lens`](crate::lens::Lens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensParams {
    /// Refractive index of the lens material.
    pub index: f64,
    /// Blank diameter (mm).
    pub blank_size: f64,
    /// Front surface base curve (D).
    pub base_curve: f64,
    /// Prescribed spherical power (D).
    pub sphere: f64,
    /// Prescribed cylindrical power (D). Stored only.
    #[serde(default, alias = "cyl")]
    pub cylinder: f64,
    /// Cylinder axis (degrees). Stored only.
    #[serde(default)]
    pub axis: f64,
    /// Minimum edge or centre thickness (mm).
    /// `None` selects [`default_min_thickness`] for the index.
    #[serde(default)]
    pub min_thickness: Option<f64>,
}

impl LensParams {
    /// Parameters for a lens with no cylinder and a defaulted minimum thickness.
    pub fn new(index: f64, blank_size: f64, base_curve: f64, sphere: f64) -> Self {
        Self {
            index,
            blank_size,
            base_curve,
            sphere,
            cylinder: 0.0,
            axis: 0.0,
            min_thickness: None,
        }
    }

    /// The minimum thickness these parameters resolve to.
    pub fn resolved_min_thickness(&self) -> f64 {
        self.min_thickness
            .unwrap_or_else(|| default_min_thickness(self.index))
    }
}

/// Derived geometry of a lens at one instant.
///
/// This is a snapshot: it does not follow later field changes on the lens
/// it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensGeometry {
    /// Front surface power (D).
    pub front_power: f64,
    /// Back surface power (D). `front_power + back_power == sphere`.
    pub back_power: f64,
    /// Front surface sagitta across the blank (mm).
    pub front_sag: f64,
    /// Back surface sagitta across the blank (mm).
    pub back_sag: f64,
    /// Thickest point of the lens (mm): centre for plus, edge otherwise.
    pub max_thickness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_min_thickness_threshold() {
        assert_eq!(default_min_thickness(1.74), 1.5);
        assert_eq!(default_min_thickness(1.499), 1.5);
        assert_eq!(default_min_thickness(1.498), 2.0);
        assert_eq!(default_min_thickness(1.49), 2.0);
    }

    #[test]
    fn test_params_resolve_min_thickness() {
        let params = LensParams::new(1.74, 75.0, 4.5, -5.0);
        assert_eq!(params.resolved_min_thickness(), 1.5);

        let explicit = LensParams {
            min_thickness: Some(1.1),
            ..params
        };
        assert_eq!(explicit.resolved_min_thickness(), 1.1);
    }

    #[test]
    fn test_field_display_names() {
        assert_eq!(Field::Index.to_string(), "index");
        assert_eq!(Field::BlankSize.to_string(), "blank size");
        assert_eq!(Field::Sphere.to_string(), "sphere power");
        assert_eq!(Field::ALL.len(), 7);
    }

    #[test]
    fn test_params_deserialise_with_defaults() {
        let json = r#"{"index": 1.6, "blank_size": 70, "base_curve": 4, "sphere": -2, "cyl": -0.75}"#;
        let params: LensParams = serde_json::from_str(json).expect("valid params");
        assert_eq!(params.cylinder, -0.75);
        assert_eq!(params.axis, 0.0);
        assert_eq!(params.min_thickness, None);
    }
}
