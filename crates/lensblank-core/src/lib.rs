//! # Lensblank Core
//!
//! Geometry of a single spectacle lens blank. Given a prescription (sphere,
//! cylinder, axis) and a blank (material index, diameter, base curve,
//! minimum thickness) this crate derives the quantities a lab needs to
//! surface the lens: front and back surface powers, the sagitta of each
//! surface and the resulting maximum thickness.
//!
//! ## Architecture
//!
//! The [`lens::Lens`] entity owns the validated parameters. Every derived
//! quantity is recomputed from the current field values on each read, using
//! the single-surface formulas in [`surface`].
//!
//! ## Modules
//!
//! - [`types`] - Constants, construction parameters and result containers.
//! - [`surface`] - Lensmaker surface power/curvature relation and sagitta.
//! - [`lens`] - The lens entity, field validation and derived geometry.
//!
//! ## Example
//!
//! ```
//! use lensblank_core::lens::Lens;
//! use lensblank_core::types::LensParams;
//!
//! let lens = Lens::new(LensParams {
//!     min_thickness: Some(1.5),
//!     ..LensParams::new(1.56, 70.0, 4.5, -6.0)
//! })?;
//! assert!((lens.max_thickness()? - 9.73).abs() < 0.01);
//! # Ok::<(), lensblank_core::lens::LensError>(())
//! ```

pub mod lens;
pub mod surface;
pub mod types;
