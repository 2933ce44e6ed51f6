//! Two-column flow on a single fixed page.
//!
//! [`LayoutState`] owns the geometry and one cursor per column; [`Canvas`]
//! owns the display list. Every primitive takes the state explicitly, writes
//! at the active column's cursor and advances only that cursor.

mod wrap;

use crate::error::Error;
use crate::fit::normalize;
use crate::fonts::{FontSet, Weight};

use wrap::wrap_text;

/// One millimetre in PDF points.
pub const MM: f32 = 72.0 / 25.4;

/// Horizontal inset of text inside its cell, on both sides.
pub const CELL_PADDING: f32 = MM;

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub column_gap: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin_top: 15.0 * MM,
            margin_bottom: 15.0 * MM,
            margin_left: 15.0 * MM,
            margin_right: 15.0 * MM,
            column_gap: 8.0 * MM,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Lowest y any block may reach.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    pub fn column_width(&self) -> f32 {
        (self.usable_width() - self.column_gap) / 2.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// What to do when a block would end below [`PageGeometry::content_bottom`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    #[default]
    Fail,
    Warn,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Cursor bookkeeping for one render. y grows downward from the top edge.
#[derive(Clone, Debug)]
pub struct LayoutState {
    geometry: PageGeometry,
    overflow: OverflowPolicy,
    page_y: f32,
    columns: Option<[ColumnState; 2]>,
    active: usize,
}

impl LayoutState {
    pub fn new(geometry: PageGeometry, overflow: OverflowPolicy) -> Self {
        Self {
            geometry,
            overflow,
            page_y: geometry.margin_top,
            columns: None,
            active: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Full-width cursor used above the columns.
    pub fn page_y(&self) -> f32 {
        self.page_y
    }

    pub fn start_two_columns(&mut self, top_y: f32) {
        let width = self.geometry.column_width();
        let left = self.geometry.margin_left;
        self.columns = Some([
            ColumnState { x: left, y: top_y, width },
            ColumnState {
                x: left + width + self.geometry.column_gap,
                y: top_y,
                width,
            },
        ]);
        self.active = 0;
    }

    /// Make `index` the active column; writes resume at its stored cursor.
    pub fn set_column(&mut self, index: usize) -> Result<(), Error> {
        let columns = self.columns.as_ref().ok_or(Error::ColumnsNotInitialized)?;
        let column = columns.get(index).ok_or(Error::InvalidColumnIndex(index))?;
        log::debug!("column {} → {index} at y={:.1}", self.active, column.y);
        self.active = index;
        Ok(())
    }

    /// `None` until [`start_two_columns`](Self::start_two_columns).
    pub fn active_column(&self) -> Option<usize> {
        self.columns.map(|_| self.active)
    }

    pub fn column(&self, index: usize) -> Option<ColumnState> {
        self.columns.and_then(|c| c.get(index).copied())
    }

    /// y-cursor of the active column.
    pub fn cursor(&self) -> Result<f32, Error> {
        self.active().map(|c| c.y)
    }

    fn active(&self) -> Result<ColumnState, Error> {
        self.columns
            .map(|c| c[self.active])
            .ok_or(Error::ColumnsNotInitialized)
    }

    fn check_fits(&self, column: &ColumnState, height: f32) -> Result<(), Error> {
        let end = column.y + height;
        let limit = self.geometry.content_bottom();
        if end <= limit {
            return Ok(());
        }
        match self.overflow {
            OverflowPolicy::Fail => Err(Error::ColumnOverflow {
                column: self.active,
                y: end,
                limit,
            }),
            OverflowPolicy::Warn => {
                log::warn!(
                    "column {} overflows the page: block ends at {end:.1}pt, limit is {limit:.1}pt",
                    self.active
                );
                Ok(())
            }
        }
    }

    fn advance(&mut self, height: f32) -> Result<(), Error> {
        let columns = self.columns.as_mut().ok_or(Error::ColumnsNotInitialized)?;
        columns[self.active].y += height;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub weight: Weight,
    pub size: f32,
    pub line_height: f32,
    pub color: Rgb,
}

/// Font sizes (pt), band and line heights (pt) and colours of the column content.
#[derive(Clone, Debug)]
pub struct SectionStyle {
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub subtitle_font_size: f32,
    pub bullet_font_size: f32,
    pub title_height: f32,
    pub title_gap: f32,
    pub body_line_height: f32,
    pub bullet_line_height: f32,
    pub title_fill: Rgb,
    pub body_color: Rgb,
    pub heading_color: Rgb,
    pub muted_color: Rgb,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            title_font_size: 12.0,
            body_font_size: 9.0,
            subtitle_font_size: 10.0,
            bullet_font_size: 9.0,
            title_height: 6.5 * MM,
            title_gap: 3.0 * MM,
            body_line_height: 4.4 * MM,
            bullet_line_height: 4.2 * MM,
            title_fill: [36, 64, 102],
            body_color: [55, 55, 55],
            heading_color: [34, 34, 34],
            muted_color: [90, 90, 90],
        }
    }
}

impl SectionStyle {
    pub fn body(&self, size: Option<f32>) -> TextStyle {
        TextStyle {
            weight: Weight::Regular,
            size: size.unwrap_or(self.body_font_size),
            line_height: self.body_line_height,
            color: self.body_color,
        }
    }

    /// Bold entry heading such as "title — company".
    pub fn heading(&self, size: f32) -> TextStyle {
        TextStyle {
            weight: Weight::Bold,
            size,
            line_height: self.body_line_height,
            color: self.heading_color,
        }
    }

    /// Muted 10pt sub-line under a heading.
    pub fn meta(&self, line_height: f32) -> TextStyle {
        TextStyle {
            weight: Weight::Regular,
            size: 10.0,
            line_height,
            color: self.muted_color,
        }
    }

    fn bullet(&self) -> TextStyle {
        TextStyle {
            weight: Weight::Regular,
            size: self.bullet_font_size,
            line_height: self.bullet_line_height,
            color: self.body_color,
        }
    }
}

/// Lines of text laid out in a cell whose top-left corner is (`x`, `y`).
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub line_height: f32,
    pub weight: Weight,
    pub size: f32,
    pub color: Rgb,
    pub lines: Vec<String>,
}

impl TextBlock {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// The wrapped lines joined back into one string.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// One entry of the display list.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Text(TextBlock),
}

/// Display list under construction plus the fonts used to measure it.
pub struct Canvas<'f> {
    fonts: &'f FontSet,
    style: SectionStyle,
    ops: Vec<DrawOp>,
}

impl<'f> Canvas<'f> {
    pub fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            style: SectionStyle::default(),
            ops: Vec::new(),
        }
    }

    pub fn style(&self) -> &SectionStyle {
        &self.style
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Full-width filled band with one line of text at the page cursor.
    pub fn banner(&mut self, state: &mut LayoutState, text: &str, style: &TextStyle, fill: Rgb) {
        let geometry = *state.geometry();
        let (x, y, width) = (geometry.margin_left, state.page_y, geometry.usable_width());
        self.ops.push(DrawOp::Band {
            x,
            y,
            width,
            height: style.line_height,
            color: fill,
        });
        let block = self.single_line(x, y, width, text, style);
        self.ops.push(DrawOp::Text(block));
        state.page_y += style.line_height;
    }

    /// Filled, upper-cased header band across the active column.
    pub fn section_title(&mut self, state: &mut LayoutState, title: &str) -> Result<(), Error> {
        let column = state.active()?;
        let height = self.style.title_height;
        state.check_fits(&column, height)?;

        self.ops.push(DrawOp::Band {
            x: column.x,
            y: column.y,
            width: column.width,
            height,
            color: self.style.title_fill,
        });
        let text_style = TextStyle {
            weight: Weight::Bold,
            size: self.style.title_font_size,
            line_height: height,
            color: WHITE,
        };
        let block = self.single_line(column.x, column.y, column.width, &title.to_uppercase(), &text_style);
        self.ops.push(DrawOp::Text(block));
        state.advance(height + self.style.title_gap)
    }

    pub fn write_body(&mut self, state: &mut LayoutState, text: &str, size: Option<f32>) -> Result<(), Error> {
        let style = self.style.body(size);
        self.write_styled(state, text, &style)
    }

    /// Wrap `text` to the active column and advance its cursor by the block height.
    pub fn write_styled(&mut self, state: &mut LayoutState, text: &str, style: &TextStyle) -> Result<(), Error> {
        let column = state.active()?;
        let face = self.fonts.face(style.weight);
        let text = face.display_text(text);
        let lines = wrap_text(&text, face, style.size, column.width - 2.0 * CELL_PADDING);
        let block = TextBlock {
            x: column.x,
            y: column.y,
            width: column.width,
            line_height: style.line_height,
            weight: style.weight,
            size: style.size,
            color: style.color,
            lines,
        };
        let height = block.height();
        state.check_fits(&column, height)?;
        self.ops.push(DrawOp::Text(block));
        state.advance(height)
    }

    /// One wrapped block per non-blank item, each prefixed with `bullet`.
    pub fn write_bullets<S: AsRef<str>>(
        &mut self,
        state: &mut LayoutState,
        items: &[S],
        bullet: &str,
    ) -> Result<(), Error> {
        if items.is_empty() {
            return Ok(());
        }
        let style = self.style.bullet();
        for item in items {
            let clean = normalize(item.as_ref());
            if clean.is_empty() {
                continue;
            }
            self.write_styled(state, &format!("{bullet} {clean}"), &style)?;
        }
        Ok(())
    }

    /// Vertical gap in the active column. Draws nothing.
    pub fn line_break(&mut self, state: &mut LayoutState, height: f32) -> Result<(), Error> {
        state.advance(height)
    }

    fn single_line(&self, x: f32, y: f32, width: f32, text: &str, style: &TextStyle) -> TextBlock {
        let face = self.fonts.face(style.weight);
        TextBlock {
            x,
            y,
            width,
            line_height: style.line_height,
            weight: style.weight,
            size: style.size,
            color: style.color,
            lines: vec![face.display_text(text).into_owned()],
        }
    }
}
