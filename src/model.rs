//! The résumé content record, as read from JSON.
//!
//! Fields a renderer needs are `Option`s: their absence is reported by the
//! renderer as [`Error::MissingRequiredField`] rather than rejected by the
//! parser. Optional sections default to empty lists.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContentRecord {
    pub about: Option<About>,
    pub contact: Option<Contact>,
    pub skills: Option<Skills>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ContentRecord {
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(Error::Io)?;
        Self::from_json(&bytes)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct About {
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Contact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    #[serde(default)]
    pub address: Vec<String>,
    pub birthday: Option<String>,
}

/// Category name → ordered skill labels.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Skills(pub BTreeMap<String, Vec<String>>);

impl Skills {
    /// Labels of `category`, empty when the category is absent.
    pub fn category(&self, category: &str) -> &[String] {
        self.0.get(category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub period: Option<String>,
    #[serde(default)]
    pub missions: Vec<String>,
    #[serde(default, alias = "impacts")]
    pub impact: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Education {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub location: Option<String>,
    pub period: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Project {
    pub name: Option<String>,
    pub period: Option<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub contributions: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Certification {
    pub title: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub issue_date: String,
    pub expiry_date: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Recommendation {
    pub name: Option<String>,
    pub role: Option<String>,
    pub date: Option<String>,
    pub contact: Option<ContactInfo>,
}

/// A referee's contact: either a `{telephone, email}` object or a free string.
/// Some records spell the number `phone`; `telephone` wins when both are set.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContactInfo {
    Structured {
        #[serde(default)]
        telephone: Option<String>,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
    Raw(String),
}
