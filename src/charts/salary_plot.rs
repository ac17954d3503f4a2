//! Salary Trend Plot
//! Experience-vs-salary scatter with one OLS trend line per work location.

use plotters::prelude::*;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use crate::charts::{self, ChartError};
use crate::data::SalaryRecord;
use crate::stats::LocationFits;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

pub struct SalaryPlot;

impl SalaryPlot {
    /// Render the scatter plus per-location trend lines.
    pub fn render(
        path: &Path,
        records: &[SalaryRecord],
        fits: &LocationFits,
    ) -> Result<(), ChartError> {
        Self::draw(path, records, fits).map_err(|e| ChartError::Render(e.to_string()))
    }

    fn draw(
        path: &Path,
        records: &[SalaryRecord],
        fits: &LocationFits,
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut x_lo = f64::INFINITY;
        let mut x_hi = f64::NEG_INFINITY;
        let mut y_lo = f64::INFINITY;
        let mut y_hi = f64::NEG_INFINITY;
        for record in records {
            x_lo = x_lo.min(record.experience);
            x_hi = x_hi.max(record.experience);
            y_lo = y_lo.min(record.salary);
            y_hi = y_hi.max(record.salary);
        }
        if !x_lo.is_finite() {
            x_lo = 0.0;
            x_hi = 1.0;
            y_lo = 0.0;
            y_hi = 1.0;
        }
        let x_pad = ((x_hi - x_lo) * 0.05).max(0.5);
        let y_pad = ((y_hi - y_lo) * 0.1).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption("Experience vs Salary by Location", ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo - x_pad..x_hi + x_pad, y_lo - y_pad..y_hi + y_pad)?;

        chart
            .configure_mesh()
            .x_desc("Years of Experience")
            .y_desc("Salary")
            .draw()?;

        let locations: Vec<&String> = records
            .iter()
            .map(|r| &r.location)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for (li, location) in locations.iter().enumerate() {
            let color = charts::series_color(li);

            let points = records
                .iter()
                .filter(|r| &r.location == *location)
                .map(|r| Circle::new((r.experience, r.salary), 4, color.filled()));
            chart
                .draw_series(points)?
                .label(location.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));

            // Trend line across the observed experience range, when the
            // partition produced one.
            if let Some(line) = fits.lines.get(*location) {
                let ends = [x_lo, x_hi];
                chart
                    .draw_series(LineSeries::new(
                        ends.iter().map(|&x| (x, line.predict(x))),
                        color.stroke_width(2),
                    ))?
                    .label(format!("{location} fit"))
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 12, y)], color.stroke_width(2))
                    });
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;

        root.present()?;
        Ok(())
    }
}
