//! Page assembly: header banner, then the fixed per-column section order.

use crate::error::Error;
use crate::fonts::{DEFAULT_FAMILIES, FontSet, Weight};
use crate::layout::{Canvas, DrawOp, LayoutState, MM, OverflowPolicy, PageGeometry, Rgb, TextStyle, WHITE};
use crate::model::{About, ContentRecord};
use crate::sections::{self, required};

const HEADER_FILL: Rgb = [32, 56, 100];
const HEADER_GAP: f32 = 6.0 * MM;

#[derive(Clone, Debug, PartialEq)]
pub enum FontChoice {
    /// `;`-separated family candidates looked up in the system font directories.
    System(String),
    /// The standard Helvetica faces; nothing is embedded.
    Builtin,
}

impl FontChoice {
    pub fn load(&self) -> FontSet {
        match self {
            FontChoice::System(families) => FontSet::discover(families),
            FontChoice::Builtin => FontSet::builtin(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub fonts: FontChoice,
    pub overflow: OverflowPolicy,
    /// Append the recommendations section to the left column.
    pub include_recommendations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fonts: FontChoice::System(DEFAULT_FAMILIES.to_string()),
            overflow: OverflowPolicy::Fail,
            include_recommendations: false,
        }
    }
}

/// A finished page: what to draw, and where.
#[derive(Clone, Debug)]
pub struct Page {
    pub geometry: PageGeometry,
    pub title: String,
    pub ops: Vec<DrawOp>,
}

fn section<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T, Error> {
    value
        .as_ref()
        .ok_or_else(|| Error::MissingRequiredField(name.to_string()))
}

fn render_header(about: &About, state: &mut LayoutState, canvas: &mut Canvas) -> Result<String, Error> {
    let full_name = required(&about.full_name, || "about.full_name".into())?;
    let headline = required(&about.headline, || "about.headline".into())?;
    let location = required(&about.location, || "about.location".into())?;

    let line = |weight, size, height_mm: f32| TextStyle {
        weight,
        size,
        line_height: height_mm * MM,
        color: WHITE,
    };
    canvas.banner(state, &full_name, &line(Weight::Bold, 24.0, 13.0), HEADER_FILL);
    canvas.banner(state, &headline, &line(Weight::Regular, 12.0, 8.0), HEADER_FILL);
    canvas.banner(state, &location, &line(Weight::Regular, 10.0, 6.0), HEADER_FILL);
    Ok(full_name)
}

/// Lay out the whole résumé on one A4 page.
///
/// Left column: contact, skills, certifications, interests (then
/// recommendations when enabled). Right column: summary, experience,
/// projects, education.
pub fn layout_resume(record: &ContentRecord, fonts: &FontSet, options: &RenderOptions) -> Result<Page, Error> {
    let about = section(&record.about, "about")?;
    let contact = section(&record.contact, "contact")?;
    let skills = section(&record.skills, "skills")?;
    let experience = section(&record.experience, "experience")?;
    let education = section(&record.education, "education")?;

    let geometry = PageGeometry::a4();
    let mut state = LayoutState::new(geometry, options.overflow);
    let mut canvas = Canvas::new(fonts);

    let full_name = render_header(about, &mut state, &mut canvas)?;
    state.start_two_columns(state.page_y() + HEADER_GAP);

    sections::render_contact(contact, &mut state, &mut canvas)?;
    sections::render_skills(skills, &mut state, &mut canvas)?;
    sections::render_certifications(&record.certifications, &mut state, &mut canvas)?;
    sections::render_interests(&record.interests, &mut state, &mut canvas)?;
    if options.include_recommendations {
        sections::render_recommendations(&record.recommendations, &mut state, &mut canvas)?;
    }

    state.set_column(1)?;
    sections::render_summary(about, &mut state, &mut canvas)?;
    sections::render_experience(experience, &mut state, &mut canvas)?;
    sections::render_projects(&record.projects, &mut state, &mut canvas)?;
    sections::render_education(education, &mut state, &mut canvas)?;

    for index in 0..2 {
        if let Some(column) = state.column(index) {
            log::debug!(
                "column {index} ends at y={:.1}pt of {:.1}pt",
                column.y,
                geometry.content_bottom()
            );
        }
    }

    Ok(Page {
        geometry,
        title: format!("CV — {full_name}"),
        ops: canvas.into_ops(),
    })
}
