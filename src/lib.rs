pub mod document;
mod error;
pub mod fit;
pub mod fonts;
pub mod layout;
pub mod model;
mod pdf;
pub mod sections;

pub use document::{FontChoice, Page, RenderOptions, layout_resume};
pub use error::Error;
pub use model::ContentRecord;

use std::path::Path;
use std::time::Instant;

/// Lay out `record` and serialize it to PDF bytes.
pub fn render_resume(record: &ContentRecord, options: &RenderOptions) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let fonts = options.fonts.load();
    let t_fonts = t0.elapsed();

    let page = layout_resume(record, &fonts, options)?;
    let t_layout = t0.elapsed();

    let bytes = pdf::render(&page, &fonts);
    let t_render = t0.elapsed();

    log::info!(
        "Timing: fonts={:.1}ms, layout={:.1}ms, pdf={:.1}ms ({} draw ops)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_render - t_layout).as_secs_f64() * 1000.0,
        page.ops.len(),
    );

    Ok(bytes)
}

pub fn convert_json_to_pdf(input: &Path, output: &Path, options: &RenderOptions) -> Result<(), Error> {
    let t0 = Instant::now();
    let record = ContentRecord::from_path(input)?;
    write_pdf(&record, output, options, t0)
}

pub fn convert_json_bytes_to_pdf(input: &[u8], output: &Path, options: &RenderOptions) -> Result<(), Error> {
    let t0 = Instant::now();
    let record = ContentRecord::from_json(input)?;
    write_pdf(&record, output, options, t0)
}

/// Render `record` and write it to `output`; `t0` marks the start of parsing.
fn write_pdf(record: &ContentRecord, output: &Path, options: &RenderOptions, t0: Instant) -> Result<(), Error> {
    let t_parse = t0.elapsed();

    let bytes = render_resume(record, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
