//! Breit-Wigner resonance plot rendered to an inline SVG image.

use crate::answer::Fragment;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use physrag_core::{AppError, AppResult};
use plotters::prelude::*;

/// Higgs mass in GeV
pub const RESONANCE_MASS: f64 = 125.0;

/// Higgs width in GeV
pub const RESONANCE_WIDTH: f64 = 4.1;

/// Half-width of the energy window around the mass, in GeV.
const WINDOW: f64 = 20.0;
const SAMPLES: usize = 500;

const TITLE: &str = "Higgs Resonance (Breit-Wigner)";
const ALT_TEXT: &str = "Higgs Resonance";
const SIZE: (u32, u32) = (640, 400);

/// Relativistic Breit-Wigner `1 / ((E^2 - M^2)^2 + M^2 G^2)`.
pub fn breit_wigner(energy: f64, mass: f64, width: f64) -> f64 {
    let e2 = energy * energy;
    let m2 = mass * mass;
    1.0 / ((e2 - m2).powi(2) + m2 * width * width)
}

/// Evenly spaced samples over `[mass - 20, mass + 20]`, endpoints included.
pub fn breit_wigner_curve(mass: f64, width: f64) -> Vec<(f64, f64)> {
    let start = mass - WINDOW;
    let step = 2.0 * WINDOW / (SAMPLES - 1) as f64;

    (0..SAMPLES)
        .map(|i| {
            let energy = start + step * i as f64;
            (energy, breit_wigner(energy, mass, width))
        })
        .collect()
}

/// Render the curve as an SVG document.
pub fn render_svg(mass: f64, width: f64) -> AppResult<String> {
    let points = breit_wigner_curve(mass, width);
    let peak = points.iter().map(|(_, p)| *p).fold(0.0, f64::max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d((mass - WINDOW)..(mass + WINDOW), 0.0..peak * 1.05)
            .map_err(plot_error)?;

        chart
            .configure_mesh()
            .x_desc("Energy [GeV]")
            .y_desc("P(E)")
            .y_label_formatter(&|v| format!("{:.1e}", v))
            .draw()
            .map_err(plot_error)?;

        chart
            .draw_series(LineSeries::new(points, &BLUE))
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
    }

    Ok(svg)
}

/// The resonance plot as an inline image fragment.
///
/// Depends only on the fixed mass and width.
pub fn resonance_plot() -> AppResult<Fragment> {
    let svg = render_svg(RESONANCE_MASS, RESONANCE_WIDTH)?;

    Ok(Fragment::Image {
        alt: ALT_TEXT.to_string(),
        data_uri: format!("data:image/svg+xml;base64,{}", BASE64.encode(svg)),
    })
}

fn plot_error(e: impl std::fmt::Display) -> AppError {
    AppError::Other(format!("Failed to render resonance plot: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_window_and_peak() {
        let curve = breit_wigner_curve(RESONANCE_MASS, RESONANCE_WIDTH);

        assert_eq!(curve.len(), SAMPLES);
        assert!((curve[0].0 - 105.0).abs() < 1e-9);
        assert!((curve[SAMPLES - 1].0 - 145.0).abs() < 1e-9);

        let (peak_energy, _) = curve
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap();
        assert!((peak_energy - RESONANCE_MASS).abs() < 0.1);
    }

    #[test]
    fn test_value_at_pole() {
        let expected = 1.0 / (125.0f64.powi(2) * 4.1f64.powi(2));
        assert!((breit_wigner(125.0, 125.0, 4.1) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_svg_contains_title() {
        let svg = render_svg(RESONANCE_MASS, RESONANCE_WIDTH).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Breit-Wigner"));
    }

    #[test]
    fn test_fragment_is_deterministic_data_uri() {
        let a = resonance_plot().unwrap();
        let b = resonance_plot().unwrap();
        assert_eq!(a, b);

        match a {
            Fragment::Image { alt, data_uri } => {
                assert_eq!(alt, "Higgs Resonance");
                assert!(data_uri.starts_with("data:image/svg+xml;base64,"));
            }
            other => panic!("expected image, got {:?}", other),
        }
    }
}
