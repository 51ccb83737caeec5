//! The lens blank entity.
//!
//! A [`Lens`] holds seven validated fields. Each assignment is checked on its
//! own, and a rejected assignment leaves the previous value in place, so the
//! fields are always within range. Derived geometry is never stored; every
//! read recomputes it from the current fields.

use thiserror::Error;

use crate::surface::{curvature_calc, sag_calc, surface_power_calc, SurfaceError};
use crate::types::{
    Field, LensGeometry, LensParams, AXIS_RANGE, BLANK_SIZE_RANGE, CROWN_GLASS_INDEX,
    INDEX_RANGE, MIN_BASE_CURVE, SPHERE_RANGE,
};

/// Errors from constructing, modifying or measuring a lens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LensError {
    /// Raised for NaN and for infinities: stored fields must be finite.
    #[error("{field} assignment requires numerical input")]
    NotNumeric { field: Field },

    #[error("setIndex parameter cannot be < {min} or > {max}")]
    IndexOutOfRange { min: f64, max: f64 },

    #[error("axis assignment requires input values of {min} - {max} degrees")]
    AxisOutOfRange { min: f64, max: f64 },

    #[error("{field} cannot be < {min} or > {max}")]
    OutOfRange { field: Field, min: f64, max: f64 },

    #[error("{field} assignment requires values >= {min}")]
    BelowMinimum { field: Field, min: f64 },

    #[error("{field} assignment requires values <= {max}")]
    AboveMaximum { field: Field, max: f64 },

    #[error("Spherical power ({sphere} D) cannot exceed front surface power ({front_power:.2} D)")]
    SphereExceedsFrontPower { sphere: f64, front_power: f64 },

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Check a candidate value for `field`, returning it unchanged if accepted.
pub fn validate(field: Field, value: f64) -> Result<f64, LensError> {
    if !value.is_finite() {
        return Err(LensError::NotNumeric { field });
    }
    let within = |(min, max): (f64, f64), error: LensError| {
        if value < min || value > max {
            Err(error)
        } else {
            Ok(value)
        }
    };
    match field {
        Field::Index => within(
            INDEX_RANGE,
            LensError::IndexOutOfRange {
                min: INDEX_RANGE.0,
                max: INDEX_RANGE.1,
            },
        ),
        Field::BlankSize => within(
            BLANK_SIZE_RANGE,
            LensError::OutOfRange {
                field,
                min: BLANK_SIZE_RANGE.0,
                max: BLANK_SIZE_RANGE.1,
            },
        ),
        Field::Axis => within(
            AXIS_RANGE,
            LensError::AxisOutOfRange {
                min: AXIS_RANGE.0,
                max: AXIS_RANGE.1,
            },
        ),
        Field::BaseCurve if value < MIN_BASE_CURVE => Err(LensError::BelowMinimum {
            field,
            min: MIN_BASE_CURVE,
        }),
        Field::Sphere if value < SPHERE_RANGE.0 => Err(LensError::BelowMinimum {
            field,
            min: SPHERE_RANGE.0,
        }),
        Field::Sphere if value > SPHERE_RANGE.1 => Err(LensError::AboveMaximum {
            field,
            max: SPHERE_RANGE.1,
        }),
        // TODO: bound cylinder to the surfaceable range once one is agreed with the lab.
        Field::BaseCurve | Field::Sphere | Field::Cylinder | Field::MinThickness => Ok(value),
    }
}

/// A single spectacle lens blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Lens {
    index: f64,
    blank_size: f64,
    base_curve: f64,
    sphere: f64,
    cylinder: f64,
    axis: f64,
    min_thickness: f64,
}

impl Lens {
    /// Build a lens, validating every field and then checking that the
    /// front surface can carry the prescribed sphere power.
    pub fn new(params: LensParams) -> Result<Self, LensError> {
        let min_thickness = params.resolved_min_thickness();
        let lens = Self {
            index: validate(Field::Index, params.index)?,
            blank_size: validate(Field::BlankSize, params.blank_size)?,
            base_curve: validate(Field::BaseCurve, params.base_curve)?,
            sphere: validate(Field::Sphere, params.sphere)?,
            cylinder: validate(Field::Cylinder, params.cylinder)?,
            axis: validate(Field::Axis, params.axis)?,
            min_thickness: validate(Field::MinThickness, min_thickness)?,
        };
        lens.check_front_power()?;
        Ok(lens)
    }

    fn check_front_power(&self) -> Result<(), LensError> {
        let front_power = self.front_power()?;
        if front_power < self.sphere {
            log::debug!(
                "rejecting lens: sphere {} D exceeds front power {:.3} D (base curve {})",
                self.sphere,
                front_power,
                self.base_curve
            );
            return Err(LensError::SphereExceedsFrontPower {
                sphere: self.sphere,
                front_power,
            });
        }
        Ok(())
    }

    /// Current value of `field`.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Index => self.index,
            Field::BlankSize => self.blank_size,
            Field::BaseCurve => self.base_curve,
            Field::Sphere => self.sphere,
            Field::Cylinder => self.cylinder,
            Field::Axis => self.axis,
            Field::MinThickness => self.min_thickness,
        }
    }

    /// Assign `field`. On error the previous value is kept.
    ///
    /// Only the field's own bounds are checked; the front power check made
    /// at construction is not repeated. Use [`Lens::with`] for that.
    pub fn set(&mut self, field: Field, value: f64) -> Result<(), LensError> {
        let value = validate(field, value)?;
        let slot = match field {
            Field::Index => &mut self.index,
            Field::BlankSize => &mut self.blank_size,
            Field::BaseCurve => &mut self.base_curve,
            Field::Sphere => &mut self.sphere,
            Field::Cylinder => &mut self.cylinder,
            Field::Axis => &mut self.axis,
            Field::MinThickness => &mut self.min_thickness,
        };
        *slot = value;
        Ok(())
    }

    /// A copy of this lens with `field` changed, held to the same checks
    /// as [`Lens::new`].
    pub fn with(&self, field: Field, value: f64) -> Result<Self, LensError> {
        let mut changed = self.clone();
        changed.set(field, value)?;
        changed.check_front_power()?;
        Ok(changed)
    }

    pub fn index(&self) -> f64 {
        self.index
    }

    pub fn blank_size(&self) -> f64 {
        self.blank_size
    }

    pub fn base_curve(&self) -> f64 {
        self.base_curve
    }

    pub fn sphere(&self) -> f64 {
        self.sphere
    }

    pub fn cylinder(&self) -> f64 {
        self.cylinder
    }

    pub fn axis(&self) -> f64 {
        self.axis
    }

    pub fn min_thickness(&self) -> f64 {
        self.min_thickness
    }

    pub fn set_index(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::Index, value)
    }

    pub fn set_blank_size(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::BlankSize, value)
    }

    pub fn set_base_curve(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::BaseCurve, value)
    }

    pub fn set_sphere(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::Sphere, value)
    }

    /// Cylinder is stored but does not enter the geometry.
    pub fn set_cylinder(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::Cylinder, value)
    }

    pub fn set_axis(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::Axis, value)
    }

    pub fn set_min_thickness(&mut self, value: f64) -> Result<(), LensError> {
        self.set(Field::MinThickness, value)
    }

    /// True for a plus lens, which is thickest at the centre.
    pub fn is_plus(&self) -> bool {
        self.sphere > 0.0
    }

    /// Front radius of curvature (mm), figured against crown glass.
    fn front_radius(&self) -> Result<f64, LensError> {
        Ok(curvature_calc(CROWN_GLASS_INDEX, self.base_curve)?)
    }

    /// Front surface power (D) in the lens's own material.
    ///
    /// The base curve is converted to a radius with [`CROWN_GLASS_INDEX`],
    /// then back to a power with the lens index.
    pub fn front_power(&self) -> Result<f64, LensError> {
        Ok(surface_power_calc(self.index, self.front_radius()?)?)
    }

    /// Back surface power (D): whatever the front does not supply.
    pub fn back_power(&self) -> Result<f64, LensError> {
        Ok(self.sphere - self.front_power()?)
    }

    /// Front surface sagitta (mm); zero for a flat base curve.
    pub fn front_sag(&self) -> Result<f64, LensError> {
        let radius = self.front_radius()?;
        if radius.is_infinite() {
            return Ok(0.0);
        }
        Ok(sag_calc(radius, self.blank_size)?)
    }

    /// Back surface sagitta (mm).
    pub fn back_sag(&self) -> Result<f64, LensError> {
        let radius = curvature_calc(self.index, self.back_power()?)?;
        Ok(sag_calc(radius, self.blank_size)?)
    }

    /// Maximum thickness (mm).
    ///
    /// A plus lens is thickest at the centre, with the edge held at the
    /// minimum thickness. Plano and minus lenses are thickest at the edge,
    /// with the centre held at the minimum.
    pub fn max_thickness(&self) -> Result<f64, LensError> {
        let front = self.front_sag()?;
        let back = self.back_sag()?;
        let thickness = if self.is_plus() {
            front - back + self.min_thickness
        } else {
            back - front + self.min_thickness
        };
        log::trace!(
            "front_sag={:.3} back_sag={:.3} max_thickness={:.3}",
            front,
            back,
            thickness
        );
        Ok(thickness)
    }

    /// All derived quantities at once.
    pub fn geometry(&self) -> Result<LensGeometry, LensError> {
        let front_power = self.front_power()?;
        Ok(LensGeometry {
            front_power,
            back_power: self.sphere - front_power,
            front_sag: self.front_sag()?,
            back_sag: self.back_sag()?,
            max_thickness: self.max_thickness()?,
        })
    }

    /// The parameters that reproduce this lens.
    pub fn params(&self) -> LensParams {
        LensParams {
            index: self.index,
            blank_size: self.blank_size,
            base_curve: self.base_curve,
            sphere: self.sphere,
            cylinder: self.cylinder,
            axis: self.axis,
            min_thickness: Some(self.min_thickness),
        }
    }
}

impl TryFrom<LensParams> for Lens {
    type Error = LensError;

    fn try_from(params: LensParams) -> Result<Self, Self::Error> {
        Lens::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reference_lens() -> Lens {
        Lens::new(LensParams {
            cylinder: -2.5,
            axis: 90.0,
            min_thickness: Some(1.5),
            ..LensParams::new(1.74, 75.0, 4.5, -5.0)
        })
        .expect("reference lens is valid")
    }

    #[test]
    fn test_min_thickness_defaults_from_index() {
        let lens = Lens::new(LensParams::new(1.74, 75.0, 4.5, -5.0)).unwrap();
        assert_eq!(lens.min_thickness(), 1.5);

        let lens = Lens::new(LensParams::new(1.498, 75.0, 4.5, -5.0)).unwrap();
        assert_eq!(lens.min_thickness(), 2.0);
    }

    #[test]
    fn test_index_assignment() {
        let mut lens = reference_lens();
        lens.set_index(1.6).unwrap();

        let err = lens.set_index(f64::NAN).unwrap_err();
        assert_eq!(err.to_string(), "index assignment requires numerical input");

        let err = lens.set_index(0.5).unwrap_err();
        assert_eq!(err.to_string(), "setIndex parameter cannot be < 1.49 or > 2");
        let err = lens.set_index(3.0).unwrap_err();
        assert_eq!(err.to_string(), "setIndex parameter cannot be < 1.49 or > 2");
        assert_eq!(lens.index(), 1.6, "rejected assignments keep the old value");

        lens.set_index(1.74).unwrap();
        assert_eq!(lens.index(), 1.74);
    }

    #[test]
    fn test_blank_size_assignment() {
        let mut lens = reference_lens();
        assert_eq!(
            lens.set_blank_size(39.0),
            Err(LensError::OutOfRange {
                field: Field::BlankSize,
                min: 40.0,
                max: 85.0
            })
        );
        assert!(lens.set_blank_size(86.0).is_err());
        lens.set_blank_size(70.0).unwrap();
        assert_eq!(lens.blank_size(), 70.0);
        lens.set_blank_size(80.0).unwrap();
        assert_eq!(lens.blank_size(), 80.0);
    }

    #[test]
    fn test_base_curve_assignment() {
        let mut lens = reference_lens();
        let err = lens.set_base_curve(-1.0).unwrap_err();
        assert_eq!(err.to_string(), "base curve assignment requires values >= 0");
        assert_eq!(lens.base_curve(), 4.5);
        lens.set_base_curve(2.0).unwrap();
        assert_eq!(lens.base_curve(), 2.0);
    }

    #[test]
    fn test_sphere_assignment() {
        let mut lens = reference_lens();
        let err = lens.set_sphere(-21.0).unwrap_err();
        assert_eq!(err.to_string(), "sphere power assignment requires values >= -20");
        let err = lens.set_sphere(21.0).unwrap_err();
        assert_eq!(err.to_string(), "sphere power assignment requires values <= 20");
        lens.set_sphere(5.0).unwrap();
        assert_eq!(lens.sphere(), 5.0);
    }

    #[test]
    fn test_cylinder_accepts_any_finite_value() {
        let mut lens = reference_lens();
        lens.set_cylinder(-2.0).unwrap();
        assert_eq!(lens.cylinder(), -2.0);
        lens.set_cylinder(-50.0).unwrap();
        assert_eq!(lens.cylinder(), -50.0);
        assert_eq!(
            lens.set_cylinder(f64::NAN),
            Err(LensError::NotNumeric {
                field: Field::Cylinder
            })
        );
        assert_eq!(lens.cylinder(), -50.0);
    }

    #[test]
    fn test_axis_assignment() {
        let mut lens = reference_lens();
        for bad in [-1.0, 181.0] {
            let err = lens.set_axis(bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                "axis assignment requires input values of 0 - 180 degrees"
            );
        }
        lens.set_axis(180.0).unwrap();
        assert_eq!(lens.axis(), 180.0);
    }

    #[test]
    fn test_infinite_values_are_not_numeric() {
        let mut lens = reference_lens();
        let err = lens.set_base_curve(f64::INFINITY).unwrap_err();
        assert_eq!(
            err,
            LensError::NotNumeric {
                field: Field::BaseCurve
            }
        );
        assert_eq!(err.to_string(), "base curve assignment requires numerical input");
        assert!(lens.set_min_thickness(f64::NEG_INFINITY).is_err());
        assert_eq!(lens.base_curve(), 4.5);
        assert_eq!(lens.min_thickness(), 1.5);
    }

    #[test]
    fn test_construction_propagates_field_errors() {
        let err = Lens::new(LensParams::new(1.6, 30.0, 4.0, -2.0)).unwrap_err();
        assert!(matches!(
            err,
            LensError::OutOfRange {
                field: Field::BlankSize,
                ..
            }
        ));
    }

    #[test]
    fn test_front_power_uses_lens_index() {
        let mut lens = reference_lens();
        lens.set_index(1.498).unwrap();
        assert_abs_diff_eq!(lens.front_power().unwrap(), 4.28, epsilon = 5e-3);

        lens.set_index(1.74).unwrap();
        assert!(lens.front_power().unwrap() > 4.28);
    }

    #[test]
    fn test_power_split_reconstitutes_sphere() {
        let lens = reference_lens();
        let sum = lens.front_power().unwrap() + lens.back_power().unwrap();
        assert_abs_diff_eq!(sum, lens.sphere(), epsilon = 1e-12);
    }

    #[test]
    fn test_flat_base_curve_has_no_front_sag() {
        let lens = Lens::new(LensParams::new(1.6, 60.0, 0.0, -4.0)).unwrap();
        assert_eq!(lens.front_power().unwrap(), 0.0);
        assert_eq!(lens.front_sag().unwrap(), 0.0);
        assert!(lens.back_sag().unwrap() > 0.0);
    }

    #[test]
    fn test_derived_values_follow_field_changes() {
        let mut lens = reference_lens();
        let before = lens.max_thickness().unwrap();
        lens.set_sphere(-8.0).unwrap();
        assert!(lens.max_thickness().unwrap() > before);
    }

    #[test]
    fn test_with_rechecks_front_power() {
        let lens = reference_lens();
        let err = lens.with(Field::Sphere, 10.0).unwrap_err();
        assert!(matches!(err, LensError::SphereExceedsFrontPower { .. }));
        assert_eq!(lens.sphere(), -5.0);

        let changed = lens.with(Field::Sphere, -6.0).unwrap();
        assert_eq!(changed.sphere(), -6.0);
        assert_eq!(changed.index(), lens.index());
    }

    #[test]
    fn test_params_round_trip() {
        let lens = reference_lens();
        assert_eq!(Lens::try_from(lens.params()).unwrap(), lens);
    }

    #[test]
    fn test_geometry_matches_individual_reads() {
        let lens = reference_lens();
        let g = lens.geometry().unwrap();
        assert_eq!(g.front_power, lens.front_power().unwrap());
        assert_eq!(g.back_power, lens.back_power().unwrap());
        assert_eq!(g.front_sag, lens.front_sag().unwrap());
        assert_eq!(g.back_sag, lens.back_sag().unwrap());
        assert_eq!(g.max_thickness, lens.max_thickness().unwrap());
    }
}
