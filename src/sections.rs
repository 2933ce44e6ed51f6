//! One renderer per résumé section.
//!
//! Each renderer reads its slice of the content record, applies that
//! section's caps and character budgets, and emits through the [`Canvas`] at
//! the active column of the [`LayoutState`]. Optional sections with nothing
//! to show emit nothing at all, not even their title.

use crate::error::Error;
use crate::fit::{budget, normalize, shorten};
use crate::layout::{Canvas, LayoutState, MM, TextStyle};
use crate::model::{
    About, Certification, Contact, ContactInfo, Education, Experience, Project, Recommendation, Skills,
};

const MAX_CITIES: usize = 2;
const DETAILED_EXPERIENCES: usize = 2;
const EXPERIENCE_MISSIONS: usize = 2;
const EXPERIENCE_IMPACTS: usize = 1;
const MAX_EDUCATION: usize = 2;
const MAX_INTERESTS: usize = 3;

/// Label, (category, take) sources, and total cap of each skills line.
const SKILL_LINES: &[(&str, &[(&str, usize)], usize)] = &[
    ("Tech", &[("IA & Data", 4), ("Langages & Frameworks", 3)], 6),
    ("Data/Ops", &[("Data Engineering & BI", 3), ("Ops & Outils", 2)], 5),
    ("Soft", &[("Soft skills", 4)], 4),
];

/// Normalized value of a field the renderer cannot do without.
pub(crate) fn required(value: &Option<String>, path: impl FnOnce() -> String) -> Result<String, Error> {
    value
        .as_deref()
        .map(normalize)
        .ok_or_else(|| Error::MissingRequiredField(path()))
}

/// Normalized value of an optional field, `None` when absent or blank.
fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().map(normalize).filter(|v| !v.is_empty())
}

/// City part of a postal address: the last comma-separated chunk without
/// its leading postal code.
fn city(address: &str) -> Option<String> {
    let last = normalize(address.rsplit(',').next().unwrap_or_default());
    let city = match last.split_once(' ') {
        Some((code, rest)) if code.chars().all(|c| c.is_ascii_digit()) => rest.to_string(),
        _ => last,
    };
    (!city.is_empty()).then_some(city)
}

pub fn render_contact(contact: &Contact, state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    let email = required(&contact.email, || "contact.email".into())?;
    let phone = required(&contact.phone, || "contact.phone".into())?;
    let linkedin = required(&contact.linkedin, || "contact.linkedin".into())?;
    let birthday = required(&contact.birthday, || "contact.birthday".into())?;

    canvas.section_title(state, "Contact")?;
    canvas.write_body(state, &format!("Email : {email}"), None)?;
    canvas.write_body(state, &format!("Téléphone : {phone}"), None)?;
    canvas.write_body(state, &format!("LinkedIn : {linkedin}"), None)?;

    let mut cities: Vec<String> = Vec::new();
    for found in contact.address.iter().take(MAX_CITIES).filter_map(|a| city(a)) {
        if !cities.contains(&found) {
            cities.push(found);
        }
    }
    if !cities.is_empty() {
        canvas.write_body(state, &format!("Basé : {}", cities.join(" · ")), None)?;
    }

    canvas.write_body(state, &format!("Naissance : {birthday}"), None)?;
    canvas.line_break(state, 1.0 * MM)
}

pub fn render_summary(about: &About, state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    let summary = required(&about.summary, || "about.summary".into())?;
    canvas.section_title(state, "Profil")?;
    canvas.write_body(state, &shorten(&summary, budget::SUMMARY), None)?;
    canvas.line_break(state, 2.0 * MM)
}

/// The first entries in full; every later one condensed into a single "Autres" line.
pub fn render_experience(entries: &[Experience], state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    let heading_style = canvas.style().heading(canvas.style().subtitle_font_size);
    let meta_style = canvas.style().meta(4.2 * MM);
    let (detailed, others) = entries.split_at(entries.len().min(DETAILED_EXPERIENCES));

    canvas.section_title(state, "Expériences professionnelles")?;

    for (i, entry) in detailed.iter().enumerate() {
        let title = required(&entry.title, || format!("experience[{i}].title"))?;
        let company = required(&entry.company, || format!("experience[{i}].company"))?;
        let location = required(&entry.location, || format!("experience[{i}].location"))?;
        let period = required(&entry.period, || format!("experience[{i}].period"))?;

        canvas.write_styled(state, &format!("{title} — {company}"), &heading_style)?;
        canvas.write_styled(state, &format!("{location} · {period}"), &meta_style)?;

        let parts: Vec<String> = entry
            .missions
            .iter()
            .take(EXPERIENCE_MISSIONS)
            .chain(entry.impact.iter().take(EXPERIENCE_IMPACTS))
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .collect();
        if !parts.is_empty() {
            canvas.write_body(state, &shorten(&parts.join(" | "), budget::EXPERIENCE_DETAIL), None)?;
        }
        canvas.line_break(state, 1.5 * MM)?;
    }

    if !others.is_empty() {
        let condensed = others
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                let i = DETAILED_EXPERIENCES + offset;
                let title = required(&entry.title, || format!("experience[{i}].title"))?;
                let company = required(&entry.company, || format!("experience[{i}].company"))?;
                let period = required(&entry.period, || format!("experience[{i}].period"))?;
                Ok(format!("{title} — {company} ({period})"))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let line = format!("Autres : {}", condensed.join(" ; "));
        canvas.write_body(state, &shorten(&line, budget::EXPERIENCE_OTHERS), None)?;
        canvas.line_break(state, 1.0 * MM)?;
    }
    Ok(())
}

/// Entries past the second are dropped: the page has room for two.
pub fn render_education(entries: &[Education], state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    let heading_style = canvas.style().heading(canvas.style().subtitle_font_size);
    let meta_style = canvas.style().meta(4.0 * MM);

    canvas.section_title(state, "Formation")?;
    for (i, school) in entries.iter().take(MAX_EDUCATION).enumerate() {
        let degree = required(&school.degree, || format!("education[{i}].degree"))?;
        let institution = required(&school.institution, || format!("education[{i}].institution"))?;
        let location = required(&school.location, || format!("education[{i}].location"))?;
        let period = required(&school.period, || format!("education[{i}].period"))?;

        canvas.write_styled(state, &format!("{degree} — {institution}"), &heading_style)?;
        canvas.write_styled(state, &format!("{location} | {period}"), &meta_style)?;
        canvas.line_break(state, 1.5 * MM)?;
    }
    canvas.line_break(state, 1.5 * MM)
}

pub fn render_projects(projects: &[Project], state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    let Some(project) = projects.first() else {
        return Ok(());
    };
    let name = required(&project.name, || "projects[0].name".into())?;
    let period = required(&project.period, || "projects[0].period".into())?;
    let heading_style = canvas.style().heading(11.0);
    let meta_style = canvas.style().meta(4.2 * MM);

    canvas.section_title(state, "Projets sélectionnés")?;
    canvas.write_styled(state, &format!("{name} ({period})"), &heading_style)?;

    let context = shorten(&project.context, budget::PROJECT_CONTEXT);
    if !context.is_empty() {
        canvas.write_styled(state, &context, &meta_style)?;
    }
    if !project.contributions.is_empty() {
        let contributions = project.contributions.join("; ");
        canvas.write_body(state, &shorten(&contributions, budget::PROJECT_CONTRIBUTIONS), None)?;
    }
    canvas.line_break(state, 2.0 * MM)?;
    canvas.line_break(state, 1.0 * MM)
}

/// Capped selection of `skills` for one labelled line.
fn skill_line(skills: &Skills, sources: &[(&str, usize)], cap: usize) -> Vec<String> {
    sources
        .iter()
        .flat_map(|&(category, take)| skills.category(category).iter().take(take))
        .take(cap)
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn render_skills(skills: &Skills, state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    canvas.section_title(state, "Compétences clés")?;
    for &(label, sources, cap) in SKILL_LINES {
        let picked = skill_line(skills, sources, cap);
        if !picked.is_empty() {
            canvas.write_body(state, &format!("{label} : {}", picked.join(", ")), None)?;
        }
    }
    canvas.line_break(state, 1.0 * MM)
}

pub fn render_certifications(
    certifications: &[Certification],
    state: &mut LayoutState,
    canvas: &mut Canvas,
) -> Result<(), Error> {
    let Some(cert) = certifications.first() else {
        return Ok(());
    };
    let title = required(&cert.title, || "certifications[0].title".into())?;
    let provider = required(&cert.provider, || "certifications[0].provider".into())?;

    let mut timing = normalize(&cert.issue_date);
    if let Some(expiry) = present(&cert.expiry_date) {
        timing.push_str(" → ");
        timing.push_str(&expiry);
    }

    canvas.section_title(state, "Certifications")?;
    let line = format!("{title} — {provider} ({timing})");
    canvas.write_body(state, &shorten(&line, budget::CERTIFICATION), None)?;
    canvas.line_break(state, 1.0 * MM)
}

fn contact_line(contact: Option<&ContactInfo>) -> String {
    match contact {
        Some(ContactInfo::Structured { telephone, phone, email }) => {
            [present(telephone).or_else(|| present(phone)), present(email)]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" · ")
        }
        Some(ContactInfo::Raw(raw)) => normalize(raw),
        None => String::new(),
    }
}

pub fn render_recommendations(
    recommendations: &[Recommendation],
    state: &mut LayoutState,
    canvas: &mut Canvas,
) -> Result<(), Error> {
    let Some(referee) = recommendations.first() else {
        return Ok(());
    };
    let name = required(&referee.name, || "recommendations[0].name".into())?;
    let role = required(&referee.role, || "recommendations[0].role".into())?;
    let date = required(&referee.date, || "recommendations[0].date".into())?;

    let mut line = format!("{name} ({role}, {date})");
    let contact = contact_line(referee.contact.as_ref());
    if !contact.is_empty() {
        line.push_str(" — ");
        line.push_str(&contact);
    }

    canvas.section_title(state, "Recommandations")?;
    canvas.write_body(state, &shorten(&line, budget::RECOMMENDATION), None)?;
    canvas.line_break(state, 1.5 * MM)
}

pub fn render_interests(interests: &[String], state: &mut LayoutState, canvas: &mut Canvas) -> Result<(), Error> {
    if interests.is_empty() {
        return Ok(());
    }
    let style = TextStyle {
        line_height: 4.2 * MM,
        ..canvas.style().body(Some(11.0))
    };
    let top: Vec<String> = interests
        .iter()
        .map(|s| normalize(s))
        .take(MAX_INTERESTS)
        .collect();

    canvas.section_title(state, "Centres d'intérêt")?;
    canvas.write_styled(state, &top.join(" · "), &style)
}
