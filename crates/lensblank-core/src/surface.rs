//! Single refracting surface formulas.
//!
//! Converts between surface power (D) and radius of curvature (mm) with the
//! lensmaker relation for one surface, and gives the sagitta of a spherical
//! cap cut to the blank diameter.

use thiserror::Error;

/// Errors from the surface formulas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("{function} requires numerical parameters, not {args}")]
    NotNumeric {
        function: &'static str,
        args: String,
    },

    #[error("index must be greater than 0")]
    NonPositiveIndex,

    #[error("surface_power_calc requires curvature > 0")]
    NonPositiveCurvature,

    #[error("sag_calc requires non-zero blank size")]
    ZeroBlankSize,

    #[error(
        "Sagitta not calculable: blank radius ({blank_radius} mm) exceeds curvature radius ({curvature} mm)"
    )]
    BlankExceedsCurvature { blank_radius: f64, curvature: f64 },
}

fn reject_nan(function: &'static str, a: f64, b: f64) -> Result<(), SurfaceError> {
    if a.is_nan() || b.is_nan() {
        return Err(SurfaceError::NotNumeric {
            function,
            args: format!("{}, {}", a, b),
        });
    }
    Ok(())
}

/// Radius of curvature (mm) of a surface with the given power.
///
/// $r = \left|\frac{n - 1}{F}\right| \cdot 1000$
///
/// A zero power is a flat surface and yields `f64::INFINITY`. The sign of
/// the power is discarded: only the magnitude of the radius is returned.
///
/// # Arguments
/// * `surface_index` - Refractive index the surface is figured against.
/// * `power` - Surface power in dioptres.
pub fn curvature_calc(surface_index: f64, power: f64) -> Result<f64, SurfaceError> {
    reject_nan("curvature_calc", surface_index, power)?;
    if surface_index <= 0.0 {
        return Err(SurfaceError::NonPositiveIndex);
    }
    if power == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(((surface_index - 1.0) / power * 1000.0).abs())
}

/// Power (D) of a surface with the given radius of curvature.
///
/// $F = \frac{n - 1}{r} \cdot 1000$
///
/// Unlike [`curvature_calc`] there is no flat-surface shortcut for zero: a
/// radius must be strictly positive. An infinite radius gives zero power.
/// The result is signed.
pub fn surface_power_calc(surface_index: f64, radius: f64) -> Result<f64, SurfaceError> {
    reject_nan("surface_power_calc", surface_index, radius)?;
    if radius <= 0.0 {
        return Err(SurfaceError::NonPositiveCurvature);
    }
    if surface_index <= 0.0 {
        return Err(SurfaceError::NonPositiveIndex);
    }
    Ok((surface_index - 1.0) / radius * 1000.0)
}

/// Sagitta (mm) of a spherical cap of diameter `blank_diameter` cut from a
/// sphere of radius `radius`.
///
/// $s = r - \sqrt{r^2 - (d/2)^2}$
///
/// A radius of zero or infinity denotes a flat surface and returns 0.
pub fn sag_calc(radius: f64, blank_diameter: f64) -> Result<f64, SurfaceError> {
    reject_nan("sag_calc", radius, blank_diameter)?;
    if blank_diameter == 0.0 {
        return Err(SurfaceError::ZeroBlankSize);
    }
    if radius == 0.0 || radius.is_infinite() {
        return Ok(0.0);
    }
    let blank_radius = blank_diameter / 2.0;
    if radius < blank_radius {
        return Err(SurfaceError::BlankExceedsCurvature {
            blank_radius,
            curvature: radius,
        });
    }
    Ok(radius - (radius * radius - blank_radius * blank_radius).sqrt())
}
