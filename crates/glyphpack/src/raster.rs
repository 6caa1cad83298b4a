//! Running the external rasterizer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{RasterError, RasterResult};

/// Something that turns a font file into a glyph stream.
pub trait Rasterizer {
    /// Rasterize `font` at `size` points and return the complete glyph stream.
    fn rasterize(&self, font: &Path, size: u32) -> RasterResult<Vec<u8>>;
}

/// Runs `<program> rasterize -font=<path> -size=<n>` and collects its stdout.
///
/// The child's stderr is passed through to ours so its diagnostics reach the
/// operator. The stream is only returned once the process has exited
/// successfully.
#[derive(Debug, Clone)]
pub struct SubprocessRasterizer {
    program: PathBuf,
}

impl SubprocessRasterizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, font: &Path, size: u32) -> Command {
        let mut font_arg = OsString::from("-font=");
        font_arg.push(font);

        let mut cmd = Command::new(&self.program);
        cmd.arg("rasterize")
            .arg(font_arg)
            .arg(format!("-size={}", size))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl Rasterizer for SubprocessRasterizer {
    fn rasterize(&self, font: &Path, size: u32) -> RasterResult<Vec<u8>> {
        tracing::debug!(
            "Running {} on {} at size {}",
            self.program.display(),
            font.display(),
            size
        );
        let output = self
            .command(font, size)
            .output()
            .map_err(|source| RasterError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(RasterError::Status {
                program: self.program.clone(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }
}
