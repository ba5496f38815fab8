use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use enrichment::metadata::RunMetadata;
use enrichment::pipeline::{
    EmptyGroupPolicy, EnrichmentPipeline, Operator, PipelineConfig, DEFAULT_SAMPLE_TYPES,
    DEFAULT_THRESHOLD,
};
use enrichment::render::{
    output_file, parse_hex_color, stage_plot, BoxplotRenderer, ImageFormat, PlotConfig,
};
use enrichment::table::load_table;
use enrichment::writer::stage_export;

use super::{Cli, Config};

/// Run settings after merging flags, config file and defaults
#[derive(Debug)]
struct Settings {
    input: PathBuf,
    output_dir: PathBuf,
    output_name: String,
    export: Option<PathBuf>,
    log2: bool,
    /// Threshold is the untransformed user value
    pipeline: PipelineConfig,
    plot: PlotConfig,
}

fn parse_color(value: &str) -> Result<plotters::style::RGBColor> {
    parse_hex_color(value).with_context(|| format!("Invalid color '{}', expected #RRGGBB", value))
}

/// Merge settings; command-line flags win over the config file
fn resolve(cli: Cli, config: Config) -> Result<Settings> {
    let Config {
        pipeline: pipeline_section,
        plot: plot_section,
    } = config;

    let (width, height) = match cli.figsize.as_deref() {
        Some(&[width, height]) => (Some(width), Some(height)),
        _ => (None, None),
    };

    let mut plot = PlotConfig::default();
    plot.width_in = width.or(plot_section.width).unwrap_or(plot.width_in);
    plot.height_in = height.or(plot_section.height).unwrap_or(plot.height_in);
    plot.dpi = cli.dpi.or(plot_section.dpi).unwrap_or(plot.dpi);
    plot.format = cli
        .format
        .map(ImageFormat::from)
        .or(plot_section.format)
        .unwrap_or(plot.format);
    if let Some(title) = cli.title.or(plot_section.title) {
        plot.title = title;
    }
    if let Some(xlabel) = plot_section.xlabel {
        plot.xlabel = xlabel;
    }
    if let Some(ylabel) = plot_section.ylabel {
        plot.ylabel = ylabel;
    }
    if let Some(palette) = plot_section.palette {
        plot.palette = palette
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(color) = plot_section.threshold_color {
        plot.threshold_color = parse_color(&color)?;
    }

    let pipeline = PipelineConfig {
        sample_types: cli
            .sample_types
            .or(pipeline_section.sample_types)
            .unwrap_or_else(|| DEFAULT_SAMPLE_TYPES.iter().map(|s| s.to_string()).collect()),
        threshold: cli
            .threshold
            .or(pipeline_section.threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        operator: cli
            .operator
            .map(Operator::from)
            .or(pipeline_section.operator)
            .unwrap_or_default(),
        reverse: cli.reverse || pipeline_section.reverse.unwrap_or(false),
        empty_groups: if cli.skip_empty_groups {
            EmptyGroupPolicy::Skip
        } else {
            pipeline_section.empty_groups.unwrap_or_default()
        },
    };

    let output_dir = match cli.output_path {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    Ok(Settings {
        input: cli.file,
        output_dir,
        output_name: cli.output_name,
        export: cli.export.or(pipeline_section.export.map(PathBuf::from)),
        log2: cli.log2 || pipeline_section.log2.unwrap_or(false),
        pipeline,
        plot,
    })
}

/// Load, transform, optionally export, and render the boxplot
pub fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbosity() > 0;
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = resolve(cli, config)?;

    info!("Enrichment Boxplot");
    info!("==================");
    info!("Input:  {}", settings.input.display());
    info!(
        "Output: {}",
        output_file(&settings.output_dir, &settings.output_name, settings.plot.format).display()
    );
    info!("Sample types: {}", settings.pipeline.sample_types.join(", "));
    info!(
        "Operator: {}{}",
        settings.pipeline.operator,
        if settings.pipeline.reverse { " (reversed)" } else { "" }
    );

    let loaded = load_table(&settings.input, settings.pipeline.threshold, settings.log2)
        .context("Error reading or processing file")?;

    let config = PipelineConfig {
        threshold: loaded.threshold,
        ..settings.pipeline.clone()
    };
    let output = EnrichmentPipeline::new(config.clone())
        .run(&loaded.table)
        .context("Failed to process data")?;

    if verbose {
        println!("{}", output.stats.format_colored());
    }
    if output.long_table.is_empty() {
        warn!("No enriched peptides to plot; the figure shows only the threshold line");
    }

    // Both outputs are staged first so a failure leaves neither behind
    let export = match &settings.export {
        Some(path) => {
            let metadata = RunMetadata::new(
                Some(settings.input.display().to_string()),
                &config,
                settings.pipeline.threshold,
                settings.log2,
            );
            let staged = stage_export(&output.long_table, path, &metadata).with_context(|| {
                format!("Failed to export long-form table to {}", path.display())
            })?;
            Some(staged)
        }
        None => None,
    };

    let renderer = BoxplotRenderer::new(settings.plot);
    let figure = stage_plot(
        &renderer,
        &output.long_table,
        loaded.threshold,
        &settings.output_dir,
        &settings.output_name,
    )
    .context("Failed to render boxplot")?;

    let exported = match export {
        Some(export) => {
            let path = export.path().to_path_buf();
            let stats = export.persist().with_context(|| {
                format!("Failed to export long-form table to {}", path.display())
            })?;
            Some(stats)
        }
        None => None,
    };
    if let Err(e) = figure.persist() {
        if let Some(stats) = &exported {
            let _ = std::fs::remove_file(&stats.path);
        }
        return Err(e).context("Failed to save boxplot");
    }

    Ok(())
}
