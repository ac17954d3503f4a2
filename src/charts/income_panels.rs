//! Income Analysis Panels
//! Renders the four-panel income analysis figure to a PNG file.
//!
//! Layout (2x2):
//! 1. Stacked bar chart: gender x income counts
//! 2. Line chart: mean weekly hours by age, one series per bracket
//! 3. Overlaid histograms: work-hours distribution per bracket
//! 4. Stacked bar chart: education counts per occupation

use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use crate::charts::{self, ChartError};
use crate::stats::IncomeReport;

const WIDTH: u32 = 1600;
const HEIGHT: u32 = 1200;
const HISTOGRAM_BINS: usize = 25;
const REFERENCE_WEEK_HOURS: f64 = 40.0;

pub struct IncomePanels;

impl IncomePanels {
    /// Render the 2x2 analysis grid.
    pub fn render(path: &Path, report: &IncomeReport) -> Result<(), ChartError> {
        Self::draw(path, report).map_err(|e| ChartError::Render(e.to_string()))
    }

    fn draw(path: &Path, report: &IncomeReport) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((2, 2));

        Self::draw_gender_income(&panels[0], report)?;
        Self::draw_hours_by_age(&panels[1], report)?;
        Self::draw_hours_histogram(&panels[2], report)?;
        Self::draw_education_occupation(&panels[3], report)?;

        root.present()?;
        Ok(())
    }

    /// Stacked bars: one bar per gender, segments per income bracket.
    fn draw_gender_income(
        area: &DrawingArea<BitMapBackend, Shift>,
        report: &IncomeReport,
    ) -> Result<(), Box<dyn Error>> {
        let counts = &report.gender_income_counts;
        let genders: Vec<&String> = counts.keys().collect();
        let brackets: Vec<&String> = counts
            .values()
            .flat_map(|m| m.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let max_total = counts
            .values()
            .map(|m| m.values().sum::<u64>())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut chart = ChartBuilder::on(area)
            .caption("Income Distribution by Gender", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(
                -0.5f64..genders.len() as f64 - 0.5,
                0f64..max_total as f64 * 1.1,
            )?;

        let labels: Vec<String> = genders.iter().map(|g| g.to_string()).collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .x_desc("Gender")
            .y_desc("Number of Individuals")
            .draw()?;

        for (bi, bracket) in brackets.iter().enumerate() {
            let color = charts::bracket_color(bi);
            let mut bars = Vec::new();
            for (gi, gender) in genders.iter().enumerate() {
                let count = counts[*gender].get(*bracket).copied().unwrap_or(0) as f64;
                if count == 0.0 {
                    continue;
                }
                let base: f64 = brackets[..bi]
                    .iter()
                    .map(|b| counts[*gender].get(*b).copied().unwrap_or(0) as f64)
                    .sum();
                bars.push(Rectangle::new(
                    [(gi as f64 - 0.3, base), (gi as f64 + 0.3, base + count)],
                    color.filled(),
                ));
            }
            chart
                .draw_series(bars)?
                .label(bracket.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        Ok(())
    }

    /// Line per income bracket: age on x, mean weekly hours on y.
    fn draw_hours_by_age(
        area: &DrawingArea<BitMapBackend, Shift>,
        report: &IncomeReport,
    ) -> Result<(), Box<dyn Error>> {
        let mut x_min = i64::MAX;
        let mut x_max = i64::MIN;
        let mut y_max = 0f64;
        for series in report.mean_hours_by_age.values() {
            for (&age, &mean) in series {
                x_min = x_min.min(age);
                x_max = x_max.max(age);
                y_max = y_max.max(mean);
            }
        }
        if x_min > x_max {
            x_min = 0;
            x_max = 1;
        }
        if y_max <= 0.0 {
            y_max = 1.0;
        }

        let mut chart = ChartBuilder::on(area)
            .caption("Mean Weekly Hours by Age and Income", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(
                x_min as f64 - 1.0..x_max as f64 + 1.0,
                0f64..y_max * 1.15,
            )?;

        chart
            .configure_mesh()
            .x_desc("Age (years)")
            .y_desc("Mean Hours Worked Per Week")
            .draw()?;

        for (bi, (bracket, series)) in report.mean_hours_by_age.iter().enumerate() {
            let color = charts::bracket_color(bi);
            let points: Vec<(f64, f64)> = series
                .iter()
                .map(|(&age, &mean)| (age as f64, mean))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(bracket.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 12, y)], color.stroke_width(2))
                });
            chart.draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))?;
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        Ok(())
    }

    /// Overlaid histograms of weekly hours per bracket, with a reference line
    /// at the typical 40-hour week.
    fn draw_hours_histogram(
        area: &DrawingArea<BitMapBackend, Shift>,
        report: &IncomeReport,
    ) -> Result<(), Box<dyn Error>> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for values in report.hours_by_bracket.values() {
            for &v in values {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if !lo.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if hi <= lo {
            hi = lo + 1.0;
        }

        let bin_width = (hi - lo) / HISTOGRAM_BINS as f64;
        let binned: Vec<(&String, Vec<u64>)> = report
            .hours_by_bracket
            .iter()
            .map(|(bracket, values)| (bracket, bin_counts(values, lo, hi, HISTOGRAM_BINS)))
            .collect();
        let y_max = binned
            .iter()
            .flat_map(|(_, counts)| counts.iter())
            .max()
            .copied()
            .unwrap_or(0)
            .max(1);

        let mut chart = ChartBuilder::on(area)
            .caption("Weekly Work Hours by Income Group", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0f64..y_max as f64 * 1.1)?;

        chart
            .configure_mesh()
            .x_desc("Hours Worked Per Week")
            .y_desc("Number of Individuals")
            .draw()?;

        for (bi, (bracket, bins)) in binned.iter().enumerate() {
            let color = charts::bracket_color(bi);
            let bars = bins.iter().enumerate().filter_map(|(i, &count)| {
                if count == 0 {
                    return None;
                }
                let x0 = lo + i as f64 * bin_width;
                Some(Rectangle::new(
                    [(x0, 0.0), (x0 + bin_width, count as f64)],
                    color.mix(0.55).filled(),
                ))
            });
            chart
                .draw_series(bars)?
                .label(bracket.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(0.55).filled())
                });
        }

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![
                    (REFERENCE_WEEK_HOURS, 0.0),
                    (REFERENCE_WEEK_HOURS, y_max as f64 * 1.1),
                ],
                RED.stroke_width(2),
            )))?
            .label("Typical 40h week")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        Ok(())
    }

    /// Stacked bars: one bar per occupation, segments per education level.
    fn draw_education_occupation(
        area: &DrawingArea<BitMapBackend, Shift>,
        report: &IncomeReport,
    ) -> Result<(), Box<dyn Error>> {
        let counts = &report.education_occupation_counts;
        let educations: Vec<&String> = counts.keys().collect();
        let occupations: Vec<&String> = counts
            .values()
            .flat_map(|m| m.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let max_total = occupations
            .iter()
            .map(|occ| {
                educations
                    .iter()
                    .map(|edu| counts[*edu].get(*occ).copied().unwrap_or(0))
                    .sum::<u64>()
            })
            .max()
            .unwrap_or(0)
            .max(1);

        let mut chart = ChartBuilder::on(area)
            .caption("Education Level by Occupation", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(
                -0.5f64..occupations.len() as f64 - 0.5,
                0f64..max_total as f64 * 1.1,
            )?;

        let labels: Vec<String> = occupations.iter().map(|o| o.to_string()).collect();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .x_desc("Occupation")
            .y_desc("Number of Individuals")
            .draw()?;

        for (ei, education) in educations.iter().enumerate() {
            let color = charts::series_color(ei);
            let mut bars = Vec::new();
            for (oi, occupation) in occupations.iter().enumerate() {
                let count = counts[*education].get(*occupation).copied().unwrap_or(0) as f64;
                if count == 0.0 {
                    continue;
                }
                let base: f64 = educations[..ei]
                    .iter()
                    .map(|e| counts[*e].get(*occupation).copied().unwrap_or(0) as f64)
                    .sum();
                bars.push(Rectangle::new(
                    [(oi as f64 - 0.3, base), (oi as f64 + 0.3, base + count)],
                    color.filled(),
                ));
            }
            chart
                .draw_series(bars)?
                .label(education.as_str())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        Ok(())
    }
}

/// Count values into equal-width bins over [lo, hi]; the last bin is closed.
fn bin_counts(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<u64> {
    let mut counts = vec![0u64; bins];
    let width = (hi - lo) / bins as f64;
    if width <= 0.0 {
        return counts;
    }
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_counts() {
        let values = [0.0, 0.5, 1.0, 2.5, 9.9, 10.0];
        let counts = bin_counts(&values, 0.0, 10.0, 10);

        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0], 2); // 0.0, 0.5
        assert_eq!(counts[1], 1); // 1.0
        assert_eq!(counts[2], 1); // 2.5
        assert_eq!(counts[9], 2); // 9.9 plus 10.0 in the closed last bin
        assert_eq!(counts.iter().sum::<u64>(), values.len() as u64);
    }

    #[test]
    fn test_bin_counts_degenerate_range() {
        let counts = bin_counts(&[1.0, 1.0], 1.0, 1.0, 5);
        assert_eq!(counts.iter().sum::<u64>(), 0);
    }
}
