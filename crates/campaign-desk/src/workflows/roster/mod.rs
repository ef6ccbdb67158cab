//! Applicant roster import from CSV exports.
//!
//! Expected headers: `db_id,display_name,follower_count,city,categories`. Categories are
//! `;`-separated; blank cells mean the value is unknown.

mod parser;

use crate::workflows::campaigns::domain::ApplicantProfile;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateProfile(String),
    InvalidFollowerCount { db_id: String, value: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::DuplicateProfile(id) => {
                write!(f, "roster lists influencer '{}' more than once", id)
            }
            RosterImportError::InvalidFollowerCount { db_id, value } => write!(
                f,
                "influencer '{}' has follower count '{}', expected a whole number",
                db_id, value
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::DuplicateProfile(_)
            | RosterImportError::InvalidFollowerCount { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicantProfile>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a roster, keeping row order. Duplicate `db_id`s are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicantProfile>, RosterImportError> {
        let profiles = parser::parse_profiles(reader)?;
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.db_id.0.as_str()) {
                return Err(RosterImportError::DuplicateProfile(profile.db_id.0.clone()));
            }
        }
        Ok(profiles)
    }
}
