//! Job runner: builds each lens and renders its derived geometry.

use std::fmt::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use lensblank_core::lens::{Lens, LensError};
use lensblank_core::types::{LensGeometry, LensParams};

use crate::config::JobConfig;

/// Outcome for one lens of a job.
#[derive(Debug, Serialize)]
pub struct LensReport {
    pub name: String,
    pub params: LensParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<LensGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LensReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Construct a lens and compute its geometry.
pub fn compute(params: &LensParams) -> Result<LensGeometry, LensError> {
    Lens::new(params.clone())?.geometry()
}

/// Compute one named lens, capturing any failure in the report.
pub fn run_lens(name: &str, params: &LensParams) -> LensReport {
    let outcome = compute(params);
    match &outcome {
        Ok(g) => log::info!(
            "lens '{}': max thickness {:.3} mm (front {:.3} D, back {:.3} D)",
            name,
            g.max_thickness,
            g.front_power,
            g.back_power
        ),
        Err(e) => log::warn!("lens '{}' failed: {}", name, e),
    }
    LensReport {
        name: name.to_string(),
        params: params.clone(),
        geometry: outcome.as_ref().ok().copied(),
        error: outcome.err().map(|e| e.to_string()),
    }
}

/// Run every lens in a job. Failures do not stop the remaining lenses.
pub fn run_job(job: &JobConfig) -> Vec<LensReport> {
    log::debug!("running {} lens(es)", job.lenses.len());
    job.lenses
        .iter()
        .map(|entry| run_lens(&entry.name, &entry.params))
        .collect()
}

/// Construct every lens in a job without computing geometry.
pub fn validate_job(job: &JobConfig) -> Vec<(String, Result<(), LensError>)> {
    job.lenses
        .iter()
        .map(|entry| {
            let result = Lens::new(entry.params.clone()).map(|_| ());
            (entry.name.clone(), result)
        })
        .collect()
}

/// Render reports as an aligned plain-text table.
pub fn render_text(
    reports: &[LensReport],
    precision: usize,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<16} {:>6} {:>6} {:>7} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "lens", "index", "blank", "base", "sphere", "front_D", "back_D", "f_sag_mm", "b_sag_mm", "max_t_mm"
    )?;
    for report in reports {
        let params = &report.params;
        write!(
            out,
            "{:<16} {:>6.3} {:>6.1} {:>7.2} {:>7.2} ",
            report.name, params.index, params.blank_size, params.base_curve, params.sphere
        )?;
        match (&report.geometry, &report.error) {
            (Some(g), _) => {
                writeln!(
                    out,
                    "{:>9.prec$} {:>9.prec$} {:>9.prec$} {:>9.prec$} {:>9.prec$}",
                    g.front_power,
                    g.back_power,
                    g.front_sag,
                    g.back_sag,
                    g.max_thickness,
                    prec = precision
                )?;
            }
            (None, Some(e)) => writeln!(out, "error: {}", e)?,
            (None, None) => writeln!(out)?,
        }
    }
    Ok(out)
}

/// Render reports as pretty-printed JSON.
pub fn render_json(reports: &[LensReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("JSON serialisation error")
}
