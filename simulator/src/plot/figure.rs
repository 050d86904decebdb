//! Renders the four exploratory panels to a single raster figure:
//! analytic vs numerical overlay, growth-rate sweep, initial-size sweep,
//! and the treatment scenario.

use crate::workflow::config::SimulationConfig;
use crate::workflow::runner::AnalysisResult;
use anyhow::Context;
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const FIGURE_SIZE: (u32, u32) = (1400, 1000);
/// Every n-th numeric sample is drawn as a marker in the overlay panel.
const MARKER_STRIDE: usize = 5;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub fn render(
    config: &SimulationConfig,
    result: &AnalysisResult,
    path: &Path,
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    draw_comparison(&panels[0], config, result)?;
    draw_rate_sweep(&panels[1], config, result)?;
    draw_size_sweep(&panels[2], config, result)?;
    draw_treatment(&panels[3], config, result)?;

    root.present()
        .with_context(|| format!("writing figure {}", path.display()))?;
    Ok(())
}

fn chart_on<'a, 'b>(
    area: &'a Panel<'b>,
    caption: &str,
    y_top: f64,
    days: f64,
) -> anyhow::Result<ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>>
{
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..days, 0.0..y_top)?;
    chart
        .configure_mesh()
        .x_desc("Time (days)")
        .y_desc("Tumor size (mm^3)")
        .draw()?;
    Ok(chart)
}

fn draw_comparison(
    area: &Panel<'_>,
    config: &SimulationConfig,
    result: &AnalysisResult,
) -> anyhow::Result<()> {
    let y_top = result
        .analytic
        .iter()
        .cloned()
        .fold(config.capacity, f64::max)
        * 1.1;
    let mut chart = chart_on(area, "Analytic vs numerical (RK45)", y_top, config.days)?;

    chart
        .draw_series(LineSeries::new(
            result
                .times
                .iter()
                .zip(result.analytic.iter())
                .map(|(&t, &p)| (t, p)),
            BLUE.stroke_width(2),
        ))?
        .label("Analytic")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(
            result
                .numeric
                .pairs()
                .step_by(MARKER_STRIDE)
                .map(|(t, p)| Circle::new((t, p), 3, RED.filled())),
        )?
        .label("Numerical (RK45)")
        .legend(|(x, y)| Circle::new((x + 9, y), 3, RED.filled()));

    chart
        .draw_series(LineSeries::new(
            [(0.0, config.capacity), (config.days, config.capacity)],
            &GREEN,
        ))?
        .label("Capacity K")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], &GREEN));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_rate_sweep(
    area: &Panel<'_>,
    config: &SimulationConfig,
    result: &AnalysisResult,
) -> anyhow::Result<()> {
    let mut chart = chart_on(
        area,
        "Effect of the growth rate",
        config.capacity * 1.1,
        config.days,
    )?;
    for (index, curve) in result.rate_sweep.iter().enumerate() {
        let style = Palette99::pick(index).to_rgba().stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                result
                    .times
                    .iter()
                    .zip(curve.values.iter())
                    .map(|(&t, &p)| (t, p)),
                style,
            ))?
            .label(format!("r = {}", curve.swept_value))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_size_sweep(
    area: &Panel<'_>,
    config: &SimulationConfig,
    result: &AnalysisResult,
) -> anyhow::Result<()> {
    let mut chart = chart_on(
        area,
        "Effect of the initial size",
        config.capacity * 1.1,
        config.days,
    )?;
    for (index, curve) in result.size_sweep.iter().enumerate() {
        let style = Palette99::pick(index).to_rgba().stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                result
                    .times
                    .iter()
                    .zip(curve.values.iter())
                    .map(|(&t, &p)| (t, p)),
                style,
            ))?
            .label(format!("P0 = {}", curve.swept_value))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn draw_treatment(
    area: &Panel<'_>,
    config: &SimulationConfig,
    result: &AnalysisResult,
) -> anyhow::Result<()> {
    let y_top = config.capacity * 1.1;
    let mut chart = chart_on(area, "Treatment scenario", y_top, config.days)?;
    let switch = result.treatment.switch_day;

    chart
        .draw_series(LineSeries::new(
            result.treatment.series.pairs().filter(|&(t, _)| t <= switch),
            BLUE.stroke_width(3),
        ))?
        .label(format!("Before (r = {})", config.treatment.rate_before))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            result.treatment.series.pairs().filter(|&(t, _)| t >= switch),
            RED.stroke_width(3),
        ))?
        .label(format!("After (r = {})", config.treatment.rate_after))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            [(switch, 0.0), (switch, y_top)],
            BLACK.stroke_width(2),
        ))?
        .label("Treatment start")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}
