use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

pub const DEFAULT_FAMILIES: &str = "Arial;Liberation Sans;DejaVu Sans";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    fn is_bold(self) -> bool {
        self == Weight::Bold
    }
}

/// Raw TrueType/OpenType program kept around for embedding after layout.
pub(crate) struct FontProgram {
    pub(crate) family: String,
    pub(crate) data: Vec<u8>,
    pub(crate) face_index: u32,
}

/// Metrics for one face. Layout only ever needs advance widths; the program
/// is consumed by the PDF backend once the used characters are known.
pub struct FontFace {
    pub(crate) base_font: String,
    pub(crate) program: Option<FontProgram>,
    widths_1000: Vec<f32>,
    char_widths_1000: HashMap<char, f32>,
}

impl FontFace {
    /// Standard-14 Helvetica with approximate WinAnsi widths. Needs no font files.
    fn helvetica(weight: Weight) -> Self {
        let base_font = match weight {
            Weight::Regular => "Helvetica",
            Weight::Bold => "Helvetica-Bold",
        };
        let scale = if weight.is_bold() { 1.04 } else { 1.0 };
        Self {
            base_font: base_font.to_string(),
            program: None,
            widths_1000: helvetica_widths().into_iter().map(|w| w * scale).collect(),
            char_widths_1000: HashMap::new(),
        }
    }

    fn from_program(program: FontProgram) -> Option<Self> {
        let face = Face::parse(&program.data, program.face_index).ok()?;
        let units = face.units_per_em() as f32;
        let advance = |ch: char| {
            face.glyph_index(ch)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| adv as f32 / units * 1000.0)
        };

        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| advance(winansi_to_char(byte)).unwrap_or(0.0))
            .collect();

        // Latin, general punctuation, currency, letterlike symbols and arrows.
        let char_widths_1000: HashMap<char, f32> = ('\u{20}'..='\u{24F}')
            .chain('\u{2000}'..='\u{21FF}')
            .filter_map(|ch| advance(ch).map(|w| (ch, w)))
            .collect();

        Some(Self {
            base_font: program.family.replace(' ', ""),
            program: Some(program),
            widths_1000,
            char_widths_1000,
        })
    }

    pub fn is_builtin(&self) -> bool {
        self.program.is_none()
    }

    /// Width of a single character in 1000-units. Uses the per-char table for
    /// embedded faces, falls back to the WinAnsi table.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(&w) = self.char_widths_1000.get(&ch) {
            return w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Text as it will actually be drawn with this face. The standard fonts
    /// only cover WinAnsi, so a few common glyphs outside it are spelled out.
    pub fn display_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !self.is_builtin() || text.chars().all(|c| char_to_winansi(c) != 0) {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\u{2192}' => out.push_str("->"),
                '\u{2190}' => out.push_str("<-"),
                '\u{2212}' | '\u{2010}' | '\u{2011}' => out.push('-'),
                '\u{202F}' | '\u{2009}' => out.push(' '),
                c if char_to_winansi(c) != 0 => out.push(c),
                _ => out.push('?'),
            }
        }
        Cow::Owned(out)
    }
}

/// The regular and bold faces used by every render.
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
}

impl FontSet {
    /// Helvetica / Helvetica-Bold. Deterministic across machines.
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::helvetica(Weight::Regular),
            bold: FontFace::helvetica(Weight::Bold),
        }
    }

    /// Resolve the first available family out of a `;`-separated candidate
    /// list, per weight. Falls back to Helvetica when nothing matches.
    pub fn discover(families: &str) -> Self {
        Self {
            regular: load_face(families, Weight::Regular),
            bold: load_face(families, Weight::Bold),
        }
    }

    pub fn face(&self, weight: Weight) -> &FontFace {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

fn load_face(families: &str, weight: Weight) -> FontFace {
    let t0 = std::time::Instant::now();
    for candidate in families.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let Some((path, face_index)) = find_font_file(candidate, weight.is_bold()) else {
            continue;
        };
        let Ok(data) = std::fs::read(&path) else {
            continue;
        };
        let program = FontProgram {
            family: candidate.to_string(),
            data,
            face_index,
        };
        if let Some(face) = FontFace::from_program(program) {
            log::debug!(
                "load_face: {candidate} {weight:?} from {} → {:.1}ms",
                path.display(),
                t0.elapsed().as_secs_f64() * 1000.0,
            );
            return face;
        }
    }
    log::warn!("Font not found: {families} {weight:?} — using Helvetica");
    FontFace::helvetica(weight)
}

/// (lowercase family name, bold) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool), (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("RESUME_PDF_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        dirs.extend(
            val.split(sep)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        );
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn scan_font_dirs() -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut files_scanned = 0u32;

    let mut stack = font_directories();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            // SAFETY: font files are opened read-only and never written while mapped.
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
            for face_idx in 0..face_count {
                let Ok(face) = Face::parse(&data, face_idx) else {
                    continue;
                };
                // Italic faces never appear on the page.
                if face.is_italic() {
                    continue;
                }
                if let Some(family) = font_family_name(&face) {
                    index
                        .entry((family.to_lowercase(), face.is_bold()))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
    }

    log::debug!(
        "Font scan: {:.1}ms, {} dirs, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        visited.len(),
        files_scanned,
        index.len(),
    );

    index
}

/// Look up a font file by family name and weight.
/// Falls back to the regular variant if bold is not available.
fn find_font_file(family: &str, bold: bool) -> Option<(PathBuf, u32)> {
    let index = FONT_INDEX.get_or_init(scan_font_dirs);
    let key = family.to_lowercase();
    index
        .get(&(key.clone(), bold))
        .or_else(|| if bold { index.get(&(key, false)) } else { None })
        .cloned()
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.extend_from_slice(&gid.to_be_bytes());
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            0x85 | 0x97 => 1000.0,                // ellipsis, em dash
            0x95 | 0xB7 => 350.0,                 // bullet, middle dot
            _ => 556.0,
        })
        .collect()
}

/// Write the font dictionary for `face` at `font_ref`.
///
/// TrueType faces are embedded as a CIDFont (Type0 composite) with
/// Identity-H encoding, subsetted to `used_chars`; the returned map turns
/// text into glyph IDs. Built-in faces get a Type1 WinAnsi dictionary and
/// return `None`.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    font_ref: Ref,
    face: &FontFace,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let t0 = std::time::Instant::now();
    let embedded = face
        .program
        .as_ref()
        .and_then(|program| embed_truetype(pdf, font_ref, &face.base_font, program, used_chars, alloc));

    if embedded.is_none() {
        let base_font = if face.is_builtin() {
            face.base_font.as_str()
        } else {
            log::warn!("Embedding failed for {} — using Helvetica", face.base_font);
            "Helvetica"
        };
        pdf.type1_font(font_ref)
            .base_font(Name(base_font.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_font: {} ({} chars) → {:.1}ms",
        face.base_font,
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    embedded
}

fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    ps_name: &str,
    program: &FontProgram,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(&program.data, program.face_index).ok()?;

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| to_1000(h as f32))
        .unwrap_or(700.0);
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let font_data = subsetter::subset(&program.data, program.face_index, &remapper)
        .unwrap_or_else(|e| {
            log::warn!("Font subsetting failed for {ps_name}: {e} — embedding full font");
            program.data.clone()
        });

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = i32::try_from(font_data.len()).ok()?;
    pdf.stream(data_ref, &font_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap =
        pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}
