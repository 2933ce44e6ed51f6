use std::collections::{HashMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::document::Page;
use crate::fonts::{FontSet, Weight, encode_as_gids, register_font, to_winansi_bytes};
use crate::layout::{CELL_PADDING, DrawOp, Rgb, TextBlock};

const WEIGHTS: [(Weight, &str); 2] = [(Weight::Regular, "F1"), (Weight::Bold, "F2")];

struct PdfFont {
    name: &'static str,
    font_ref: Ref,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl PdfFont {
    fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Baseline of line `i` of `block`, measured from the top edge: vertically
/// centred in its line box the way fpdf places cell text.
fn baseline(block: &TextBlock, i: usize) -> f32 {
    block.y + i as f32 * block.line_height + block.line_height / 2.0 + 0.3 * block.size
}

fn draw_text(content: &mut Content, block: &TextBlock, font: &PdfFont, page_height: f32) {
    set_fill(content, block.color);
    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        content.begin_text();
        content.set_font(Name(font.name.as_bytes()), block.size);
        content.next_line(block.x + CELL_PADDING, page_height - baseline(block, i));
        content.show(Str(&font.encode(line)));
        content.end_text();
    }
}

/// Serialize a laid-out page into a single-page PDF.
pub fn render(page: &Page, fonts: &FontSet) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let page_id = alloc();
    let content_id = alloc();
    let info_id = alloc();

    // Phase 1: collect used characters per weight for subsetting
    let mut used_chars: HashMap<Weight, HashSet<char>> = HashMap::new();
    for op in &page.ops {
        if let DrawOp::Text(block) = op {
            let chars = used_chars.entry(block.weight).or_default();
            chars.insert(' ');
            for line in &block.lines {
                chars.extend(line.chars());
            }
        }
    }

    let mut pdf_fonts: HashMap<Weight, PdfFont> = HashMap::new();
    for (weight, name) in WEIGHTS {
        let Some(chars) = used_chars.get(&weight) else {
            continue;
        };
        let font_ref = alloc();
        let char_to_gid = register_font(&mut pdf, font_ref, fonts.face(weight), chars, &mut alloc);
        pdf_fonts.insert(
            weight,
            PdfFont {
                name,
                font_ref,
                char_to_gid,
            },
        );
    }
    let t_fonts = t0.elapsed();

    // Phase 2: content stream, y flipped to PDF's bottom-up space
    let page_height = page.geometry.page_height;
    let mut content = Content::new();
    for op in &page.ops {
        match op {
            DrawOp::Band {
                x,
                y,
                width,
                height,
                color,
            } => {
                content.save_state();
                set_fill(&mut content, *color);
                content.rect(*x, page_height - y - height, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Text(block) => {
                if let Some(font) = pdf_fonts.get(&block.weight) {
                    draw_text(&mut content, block, font, page_height);
                }
            }
        }
    }
    let raw = content.finish();
    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
    pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
    let t_content = t0.elapsed();

    // Phase 3: document structure
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    pdf.document_info(info_id)
        .title(TextStr(&page.title))
        .producer(TextStr(concat!("resume-pdf ", env!("CARGO_PKG_VERSION"))));

    {
        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(
                0.0,
                0.0,
                page.geometry.page_width,
                page.geometry.page_height,
            ))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = pdf_page.resources();
        let mut font_dict = resources.fonts();
        for (weight, name) in WEIGHTS {
            if let Some(font) = pdf_fonts.get(&weight) {
                font_dict.pair(Name(name.as_bytes()), font.font_ref);
            }
        }
    }

    let bytes = pdf.finish();
    log::info!(
        "PDF phases: fonts={:.1}ms, content={:.1}ms, total={:.1}ms ({} ops, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_content - t_fonts).as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
        page.ops.len(),
        bytes.len(),
    );
    bytes
}
