use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::RosterImportError;
use crate::workflows::campaigns::domain::{ApplicantProfile, InfluencerId};

pub(crate) fn parse_profiles<R: Read>(
    reader: R,
) -> Result<Vec<ApplicantProfile>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut profiles = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        profiles.push(record?.into_profile()?);
    }

    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    db_id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    follower_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    categories: Option<String>,
}

impl RosterRow {
    /// A blank follower count is unknown; a malformed one rejects the row.
    fn into_profile(self) -> Result<ApplicantProfile, RosterImportError> {
        let follower_count = match self.follower_count {
            Some(raw) => match parse_count(&raw) {
                Some(count) => Some(count),
                None => {
                    return Err(RosterImportError::InvalidFollowerCount {
                        db_id: self.db_id,
                        value: raw,
                    });
                }
            },
            None => None,
        };

        Ok(ApplicantProfile {
            db_id: InfluencerId(self.db_id),
            display_name: self.display_name,
            follower_count,
            city: self.city,
            categories: self
                .categories
                .as_deref()
                .map(split_categories)
                .unwrap_or_default(),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `12000`, `12,000`, and `12_000`. Suffixes, signs, and decimals are rejected.
fn parse_count(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ',' | '_'))
        .collect();
    digits.parse().ok()
}

fn split_categories(value: &str) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in value.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if !categories.iter().any(|existing| existing == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_accepts_separators() {
        assert_eq!(parse_count("12,000"), Some(12000));
        assert_eq!(parse_count(" 8_500 "), Some(8500));
        assert_eq!(parse_count("lots"), None);
        assert_eq!(parse_count("3k"), None);
        assert_eq!(parse_count("-40"), None);
        assert_eq!(parse_count("12.5"), None);
    }

    #[test]
    fn split_categories_trims_and_dedupes() {
        assert_eq!(
            split_categories("fashion; travel ;;fashion"),
            vec!["fashion".to_string(), "travel".to_string()]
        );
    }
}
