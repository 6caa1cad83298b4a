//! The conversion pipeline.
//!
//! Phases run in order over one [`Font`]: rasterize, parse, subset, mono,
//! quantize, grid, fallback, then pack and serialize. Every output is
//! optional; nothing is packed unless a texture or data file was requested.

use std::path::{Path, PathBuf};

use glyphpack_atlas::PackingOracle;
use glyphpack_font::{
    Font, make_monochrome, pack_font, parse_stream, quantize_font, render_grid, subset,
    write_asset, write_fallback,
};
use image::RgbaImage;

use crate::config::Options;
use crate::error::{ConfigError, Phase, PipelineError, PipelineResult};
use crate::raster::Rasterizer;

/// Run one conversion.
pub fn run(
    options: &Options,
    rasterizer: &dyn Rasterizer,
    oracle: &dyn PackingOracle,
) -> PipelineResult<()> {
    let stream = rasterizer.rasterize(&options.font, options.size)?;
    tracing::info!(
        "Rasterized {} at size {} ({} bytes)",
        options.font.display(),
        options.size,
        stream.len()
    );

    let mut font = parse_stream(&stream)?;
    tracing::info!(
        "Parsed {} glyphs, {} characters",
        font.glyphs.len(),
        font.charmap.len()
    );

    if let Some(charset) = &options.charset {
        font = subset(&font, charset, options.fallback);
        tracing::info!(
            "Subset to {} glyphs, {} characters",
            font.glyphs.len(),
            font.charmap.len()
        );
    }

    if options.mono {
        make_monochrome(&mut font);
    }

    if let Some(format) = options.format {
        quantize_font(&mut font, format, options.dither).map_err(PipelineError::Quantize)?;
        tracing::info!("Quantized glyphs to {}", format);
    }

    if let Some(path) = &options.grid {
        let im = render_grid(&font);
        save_image(&im, path, Phase::Grid)?;
        tracing::info!("Wrote grid preview to {}", path.display());
    }

    if let Some(path) = &options.fallback_font {
        let data = write_fallback(&font).map_err(PipelineError::Fallback)?;
        write_file(&data, path, Phase::Fallback)?;
        tracing::info!("Wrote fallback font to {}", path.display());
    }

    if options.wants_atlas() {
        pack(&mut font, options, oracle)?;
    }

    Ok(())
}

fn pack(font: &mut Font, options: &Options, oracle: &dyn PackingOracle) -> PipelineResult<()> {
    let im = pack_font(font, options.page_size, oracle)?;
    tracing::info!(
        "Packed {} glyphs into {} page(s) of {}x{}",
        font.visible_glyph_count(),
        font.textures.len(),
        font.textures.first().map_or(0, |t| t.width()),
        font.textures.first().map_or(0, |t| t.height())
    );

    if let Some(path) = &options.texture {
        save_image(&im, path, Phase::Pack)?;
        if font.textures.len() > 1 {
            for (index, page) in font.textures.iter().enumerate() {
                save_image(page, &page_path(path, index), Phase::Pack)?;
            }
        }
        tracing::info!("Wrote texture to {}", path.display());
    }

    if let Some(path) = &options.data {
        let format = options.format.ok_or(ConfigError::DataWithoutFormat)?;
        let data = write_asset(font, format).map_err(PipelineError::Serialize)?;
        write_file(&data, path, Phase::Serialize)?;
        tracing::info!("Wrote font data to {} ({} bytes)", path.display(), data.len());
    }

    Ok(())
}

/// Path for page `index` of a multi-page texture: `atlas.png` becomes `atlas.<index>.png`.
pub fn page_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!(".{}", index));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

fn save_image(im: &RgbaImage, path: &Path, phase: Phase) -> PipelineResult<()> {
    im.save(path).map_err(|source| PipelineError::Image {
        phase,
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(data: &[u8], path: &Path, phase: Phase) -> PipelineResult<()> {
    std::fs::write(path, data).map_err(|source| PipelineError::Io {
        phase,
        path: path.to_path_buf(),
        source,
    })
}
