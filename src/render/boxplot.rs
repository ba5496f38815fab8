//! Plotters-backed grouped boxplot.

use std::error::Error;
use std::path::Path;

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};

use crate::pipeline::LongTable;

use super::stats::{box_position, value_range, BoxStats};
use super::{ImageFormat, PlotConfig, RenderError, Renderer};

/// Share of the per-hue width filled by a box
const BOX_FILL: f64 = 0.9;

/// Dashes across the threshold line
const DASHES: usize = 40;

/// Share of the figure width taken by the axes; the legend sits to the right
const AXES_SHARE: f64 = 0.78;

/// Renders the long-form table with `plotters`
#[derive(Debug, Clone, Default)]
pub struct BoxplotRenderer {
    config: PlotConfig,
}

impl BoxplotRenderer {
    /// Create a renderer with the given figure configuration
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    /// Figure configuration
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }
}

impl Renderer for BoxplotRenderer {
    fn format(&self) -> ImageFormat {
        self.config.format
    }

    fn render(&self, table: &LongTable, threshold: f64, path: &Path) -> Result<(), RenderError> {
        let size = self.config.pixel_size()?;
        debug!(
            "Drawing {} rows as {}x{} px {}",
            table.len(),
            size.0,
            size.1,
            self.config.format
        );

        match self.config.format {
            ImageFormat::Pdf => {
                let mut svg = String::new();
                {
                    let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
                    draw_on_area(&root, table, threshold, &self.config).map_err(drawing_error)?;
                }
                std::fs::write(path, svg_to_pdf(&svg, self.config.dpi)?)?;
            }
            ImageFormat::Svg => {
                let root = SVGBackend::new(path, size).into_drawing_area();
                draw_on_area(&root, table, threshold, &self.config).map_err(drawing_error)?;
            }
            ImageFormat::Png => {
                let root = BitMapBackend::new(path, size).into_drawing_area();
                draw_on_area(&root, table, threshold, &self.config).map_err(drawing_error)?;
            }
        }
        Ok(())
    }
}

fn drawing_error(e: Box<dyn Error>) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Convert an SVG document to a single PDF page, `dpi` pixels per inch
fn svg_to_pdf(svg: &str, dpi: u32) -> Result<Vec<u8>, RenderError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RenderError::Pdf(e.to_string()))?;

    let mut page = PageOptions::default();
    page.dpi = dpi as f32;
    svg2pdf::to_pdf(&tree, ConversionOptions::default(), page)
        .map_err(|e| RenderError::Pdf(format!("{:?}", e)))
}

/// Sample name for tick positions at (or very near) a sample slot
fn sample_label(samples: &[&str], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    samples
        .get(nearest as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// `count` dashes evenly spread over `start..end`, each half a period long
fn dash_segments(start: f64, end: f64, count: usize) -> Vec<(f64, f64)> {
    let period = (end - start) / count.max(1) as f64;
    (0..count)
        .map(|i| {
            let x0 = start + period * i as f64;
            (x0, x0 + period / 2.0)
        })
        .collect()
}

/// Marker drawn in front of a legend label
enum LegendKey {
    Fill(RGBColor),
    Dashed(ShapeStyle),
}

/// Draw the legend top-left in `area`, starting at pixel row `top`
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, LegendKey)],
    top: i32,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let pad = config.points(4.0).max(2.0) as i32;
    let row = config.points(16.0).max(8.0) as i32;
    let swatch = config.points(8.0).max(4.0) as i32;
    let (width, _) = area.dim_in_pixel();
    let bottom = top + pad * 2 + row * entries.len() as i32;

    area.draw(&Rectangle::new(
        [(pad, top), (width as i32 - pad, bottom)],
        WHITE.mix(0.8).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(pad, top), (width as i32 - pad, bottom)],
        BLACK.mix(0.3),
    ))?;

    let style = TextStyle::from(("sans-serif", config.points(12.0)).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, (label, key)) in entries.iter().enumerate() {
        let y = top + pad + row * i as i32 + row / 2;
        let x = pad * 3;
        match key {
            LegendKey::Fill(color) => area.draw(&Rectangle::new(
                [(x, y - swatch / 2), (x + swatch * 2, y + swatch / 2)],
                color.filled(),
            ))?,
            LegendKey::Dashed(line) => {
                for (x0, x1) in [(x, x + swatch * 3 / 4), (x + swatch * 5 / 4, x + swatch * 2)] {
                    area.draw(&PathElement::new(vec![(x0, y), (x1, y)], *line))?;
                }
            }
        }
        area.draw(&Text::new(label.as_str(), (x + swatch * 2 + pad * 2, y), style.clone()))?;
    }
    Ok(())
}

/// Draw the boxplot on any drawing area
fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &LongTable,
    threshold: f64,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let samples = table.samples();
    let hues = table.sample_types();
    let n_slots = samples.len().max(1);
    let x_max = n_slots as f64 - 0.5;
    let (y_min, y_max) = value_range(table.rows().iter().map(|r| r.value), threshold);

    root.fill(&config.background)?;
    let (width, _) = root.dim_in_pixel();
    let (axes_area, legend_area) = root.split_horizontally((width as f64 * AXES_SHARE) as i32);

    let mut chart = ChartBuilder::on(&axes_area)
        .caption(&config.title, ("sans-serif", config.points(15.0)).into_font())
        .margin(config.points(6.0) as u32)
        .x_label_area_size(config.points(30.0) as u32)
        .y_label_area_size(config.points(36.0) as u32)
        .build_cartesian_2d(-0.5..x_max, y_min..y_max)?;

    let tick_font = ("sans-serif", config.points(12.0)).into_font();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_slots * 2 + 2)
        .x_label_formatter(&|x| sample_label(&samples, *x))
        .x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .x_label_style(tick_font.clone())
        .y_label_style(tick_font)
        .axis_desc_style(("sans-serif", config.points(15.0)).into_font())
        .draw()?;

    let line_width = config.points(1.0).max(1.0) as u32;
    let flier_radius = config.points(2.0).max(1.0) as i32;
    let mut legend = Vec::with_capacity(hues.len() + 1);

    for (h, hue) in hues.iter().enumerate() {
        let color = config.hue_color(h);
        let mut boxes = Vec::new();
        let mut lines = Vec::new();
        let mut fliers = Vec::new();

        for (s, sample) in samples.iter().enumerate() {
            let Some(stats) = BoxStats::from_values(&table.values_for(sample, hue)) else {
                continue;
            };
            let (center, width) = box_position(s, h, hues.len(), config.group_width);
            let half = width * BOX_FILL / 2.0;
            let (left, right) = (center - half, center + half);
            let outline = BLACK.stroke_width(line_width);

            boxes.push(Rectangle::new([(left, stats.q3), (right, stats.q1)], color.filled()));
            boxes.push(Rectangle::new([(left, stats.q3), (right, stats.q1)], outline));

            lines.push(PathElement::new(
                vec![(left, stats.median), (right, stats.median)],
                BLACK.stroke_width(line_width * 2),
            ));
            lines.push(PathElement::new(
                vec![(center, stats.q3), (center, stats.whisker_high)],
                outline,
            ));
            lines.push(PathElement::new(
                vec![(center, stats.q1), (center, stats.whisker_low)],
                outline,
            ));
            for cap in [stats.whisker_low, stats.whisker_high] {
                lines.push(PathElement::new(
                    vec![(center - half / 2.0, cap), (center + half / 2.0, cap)],
                    outline,
                ));
            }

            fliers.extend(
                stats
                    .fliers
                    .iter()
                    .map(|v| Circle::new((center, *v), flier_radius, outline)),
            );
        }

        chart.draw_series(boxes)?;
        chart.draw_series(lines)?;
        chart.draw_series(fliers)?;
        legend.push((hue.to_string(), LegendKey::Fill(color)));
    }

    let dash_style = config.threshold_color.stroke_width(line_width * 2);
    chart.draw_series(
        dash_segments(-0.5, x_max, DASHES)
            .into_iter()
            .map(|(x0, x1)| PathElement::new(vec![(x0, threshold), (x1, threshold)], dash_style)),
    )?;
    legend.push((
        format!("Zscore Threshold-{:?}", threshold),
        LegendKey::Dashed(dash_style),
    ));

    let (_, plot_rows) = chart.plotting_area().get_pixel_range();
    draw_legend(&legend_area, &legend, plot_rows.start, config)?;

    root.present()?;
    Ok(())
}
