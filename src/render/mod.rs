//! # Boxplot Rendering
//!
//! Draws the combined long-form table as a grouped boxplot: one slot per
//! sample on the x-axis, one box per sample type within each slot, values
//! on the y-axis, plus a horizontal reference line at the threshold.
//!
//! Drawing is abstracted behind [`Renderer`] so the pipeline can be driven
//! without touching fonts or image backends. [`save_plot`] owns the file
//! lifecycle: the renderer draws into a temporary file in the destination
//! directory, which is renamed to `<dir>/<name>.<ext>` only after drawing
//! succeeded.

mod boxplot;
mod config;
mod stats;

use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::pipeline::LongTable;

pub use boxplot::BoxplotRenderer;
pub use config::{
    parse_hex_color, ImageFormat, PlotConfig, DEFAULT_DPI, DEFAULT_HEIGHT_IN, DEFAULT_PALETTE,
    DEFAULT_WIDTH_IN,
};
pub use stats::{box_position, value_range, BoxStats, WHISKER_IQR};

/// Errors that can occur while rendering a figure
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Drawing backend error
    #[error("Drawing error: {0}")]
    Drawing(String),

    /// SVG to PDF conversion failed
    #[error("PDF conversion error: {0}")]
    Pdf(String),

    /// Temporary file could not be moved into place
    #[error("Failed to persist figure: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// Figure size is zero or overflows
    #[error("Invalid figure size {width}x{height} in at {dpi} dpi")]
    InvalidSize {
        /// Width in inches
        width: u32,
        /// Height in inches
        height: u32,
        /// Resolution
        dpi: u32,
    },
}

/// Draws a long-form table to an image file
pub trait Renderer {
    /// Image format this renderer produces
    fn format(&self) -> ImageFormat;

    /// Draw `table` with a reference line at `threshold` and write it to `path`
    fn render(&self, table: &LongTable, threshold: f64, path: &Path) -> Result<(), RenderError>;
}

/// Final location of a figure called `name` in `output_dir`
pub fn output_file(output_dir: &Path, name: &str, format: ImageFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", name, format.extension()))
}

/// A fully drawn figure waiting in a temporary file next to its destination
///
/// Dropping it removes the temporary file and leaves the destination alone.
#[derive(Debug)]
pub struct StagedPlot {
    file: NamedTempFile,
    path: PathBuf,
    format: ImageFormat,
}

impl StagedPlot {
    /// Final destination of the figure
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the figure to its destination
    pub fn persist(self) -> Result<PathBuf, RenderError> {
        self.file.persist(&self.path)?;
        info!("Saved {} figure to {}", self.format, self.path.display());
        Ok(self.path)
    }
}

/// Render `table` into a temporary file destined for `<output_dir>/<name>.<ext>`
pub fn stage_plot<R: Renderer + ?Sized>(
    renderer: &R,
    table: &LongTable,
    threshold: f64,
    output_dir: &Path,
    name: &str,
) -> Result<StagedPlot, RenderError> {
    let format = renderer.format();
    let file = tempfile::Builder::new()
        .prefix(".boxplot")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(output_dir)?;

    renderer.render(table, threshold, file.path())?;

    Ok(StagedPlot {
        file,
        path: output_file(output_dir, name, format),
        format,
    })
}

/// Render `table` to `<output_dir>/<name>.<ext>` and return the written path
///
/// Nothing is left at the destination when rendering fails.
pub fn save_plot<R: Renderer + ?Sized>(
    renderer: &R,
    table: &LongTable,
    threshold: f64,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf, RenderError> {
    stage_plot(renderer, table, threshold, output_dir, name)?.persist()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;

    struct StubRenderer {
        fail: bool,
        calls: Cell<usize>,
    }

    impl Renderer for StubRenderer {
        fn format(&self) -> ImageFormat {
            ImageFormat::Svg
        }

        fn render(&self, table: &LongTable, threshold: f64, path: &Path) -> Result<(), RenderError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                fs::write(path, "partial")?;
                return Err(RenderError::Drawing("backend failed".to_string()));
            }
            fs::write(path, format!("{} rows, threshold {}", table.len(), threshold))?;
            Ok(())
        }
    }

    #[test]
    fn test_output_file() {
        assert_eq!(
            output_file(Path::new("out"), "run1", ImageFormat::Png),
            Path::new("out").join("run1.png")
        );
    }

    #[test]
    fn test_save_plot_persists() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StubRenderer {
            fail: false,
            calls: Cell::new(0),
        };

        let path = save_plot(&renderer, &LongTable::default(), 2.5, dir.path(), "fig").unwrap();

        assert_eq!(path, dir.path().join("fig.svg"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 rows, threshold 2.5");
        assert_eq!(renderer.calls.get(), 1);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_render_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StubRenderer {
            fail: true,
            calls: Cell::new(0),
        };

        let result = save_plot(&renderer, &LongTable::default(), 1.0, dir.path(), "fig");

        assert!(matches!(result, Err(RenderError::Drawing(_))));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_plot_is_removed_when_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StubRenderer {
            fail: false,
            calls: Cell::new(0),
        };

        let staged = stage_plot(&renderer, &LongTable::default(), 1.0, dir.path(), "fig").unwrap();
        assert_eq!(staged.path(), dir.path().join("fig.svg"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(!staged.path().exists());

        drop(staged);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = StubRenderer {
            fail: false,
            calls: Cell::new(0),
        };

        let result = save_plot(
            &renderer,
            &LongTable::default(),
            1.0,
            &dir.path().join("missing"),
            "fig",
        );

        assert!(matches!(result, Err(RenderError::IoError(_))));
        assert_eq!(renderer.calls.get(), 0);
    }
}
