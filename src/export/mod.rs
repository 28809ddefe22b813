//! # Export
//!
//! Turns a [`SceneStore`] into a 2D document. The [`ExportEngine`] walks the
//! scene, clips and projects every primitive, and sends the resulting marks to
//! a [`Sink`]. Each output format is a [`Document`] sink that serializes itself
//! once drawing is done.
//!
//! ```no_run
//! use digiscene::prelude::*;
//!
//! let mut scene = SceneStore::default();
//! scene.open_list(PrimitiveKind::Voxel, true);
//! scene.add_voxel(Point3::new(0.0, 0.0, 0.0))?;
//! scene.export("voxel.svg", ExportFormat::Svg, 400, 300)?;
//! # Ok::<(), ExportError>(())
//! ```

pub mod engine;
pub mod pdf;
pub mod postscript;
pub mod raster;
pub mod sink;
pub mod svg;

use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

pub use engine::{ExportEngine, RenderSummary, MODE_SQUARE, MODE_WIREFRAME};
pub use sink::{Document, DrawCall, RecordingSink, Sink};

use crate::error::ExportError;
use crate::gfx::scene::scene::SceneStore;

/// Output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Png,
    Ps,
    Eps,
    Svg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Png,
        ExportFormat::Ps,
        ExportFormat::Eps,
        ExportFormat::Svg,
    ];

    /// Guesses the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .ok_or_else(|| ExportError::UnsupportedFormat(path.display().to_string()))?;
        extension.parse()
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
            ExportFormat::Ps => "ps",
            ExportFormat::Eps => "eps",
            ExportFormat::Svg => "svg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            "ps" => Ok(ExportFormat::Ps),
            "eps" => Ok(ExportFormat::Eps),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Png => "PNG",
            ExportFormat::Ps => "PostScript",
            ExportFormat::Eps => "EPS",
            ExportFormat::Svg => "SVG",
        })
    }
}

fn render_document<D: Document>(
    scene: &SceneStore,
    width: u32,
    height: u32,
) -> Result<(Vec<u8>, RenderSummary), ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidSize { width, height });
    }
    let mut document = D::create(width, height, scene.background());
    let summary = ExportEngine::new(scene).render(&mut document, width, height)?;
    Ok((document.finish()?, summary))
}

/// Sibling temporary path used while `path` is being written.
fn temporary_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let temporary = temporary_path(path);
    let written = fs::write(&temporary, bytes).and_then(|()| fs::rename(&temporary, path));
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&temporary) {
            log::warn!(
                "Failed to remove temporary file {}: {}",
                temporary.display(),
                cleanup
            );
        }
        return Err(err.into());
    }
    Ok(())
}

impl SceneStore {
    /// Renders the scene into an in-memory document.
    pub fn render_to_bytes(
        &self,
        format: ExportFormat,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let (bytes, summary) = match format {
            ExportFormat::Pdf => render_document::<pdf::PdfDocument>(self, width, height)?,
            ExportFormat::Png => render_document::<raster::PngDocument>(self, width, height)?,
            ExportFormat::Ps => {
                render_document::<postscript::PostScriptDocument>(self, width, height)?
            }
            ExportFormat::Eps => render_document::<postscript::EpsDocument>(self, width, height)?,
            ExportFormat::Svg => render_document::<svg::SvgDocument>(self, width, height)?,
        };
        log::debug!(
            "{} document: {} bytes, {} drawn, {} culled",
            format,
            bytes.len(),
            summary.drawn,
            summary.culled
        );
        Ok(bytes)
    }

    /// Renders the scene and writes the document to `writer`.
    pub fn export_to_writer<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        format: ExportFormat,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let bytes = self.render_to_bytes(format, width, height)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the scene and writes it to `path`.
    ///
    /// The file is replaced only once the whole document has been written, so
    /// a failed export never leaves a truncated file behind.
    pub fn export(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let path = path.as_ref();
        let bytes = self.render_to_bytes(format, width, height)?;
        write_atomically(path, &bytes)?;
        log::info!("Exported {} to {}", format, path.display());
        Ok(())
    }
}
