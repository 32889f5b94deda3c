use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// One raw row of the directory export, before mapping into a profile.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRow {
    #[serde(rename = "Slug", default, deserialize_with = "empty_string_as_none")]
    pub(crate) slug: Option<String>,
    #[serde(rename = "Name", default)]
    pub(crate) name: String,
    #[serde(rename = "Categories", default)]
    pub(crate) categories: String,
    #[serde(
        rename = "Verified On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) verified_on: Option<String>,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    pub(crate) phone: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    pub(crate) email: Option<String>,
    #[serde(rename = "WhatsApp", default, deserialize_with = "empty_string_as_none")]
    pub(crate) whatsapp: Option<String>,
    #[serde(
        rename = "Website Domain",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) website_domain: Option<String>,
    #[serde(
        rename = "Google Profile",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) google_profile: Option<String>,
    #[serde(rename = "Social Links", default)]
    pub(crate) social_links: String,
    #[serde(rename = "Logo Key", default, deserialize_with = "empty_string_as_none")]
    pub(crate) logo_key: Option<String>,
    #[serde(
        rename = "Cover Key",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) cover_key: Option<String>,
    #[serde(rename = "Gallery Keys", default)]
    pub(crate) gallery_keys: String,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) description: Option<String>,
    #[serde(rename = "Programs", default)]
    pub(crate) programs: String,
}

impl ProfileRow {
    pub(crate) fn verified_date(&self) -> Option<NaiveDate> {
        self.verified_on
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ProfileRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<ProfileRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Splits a pipe-delimited multi-value cell, dropping empty segments.
pub(crate) fn split_multi(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multi_drops_empty_segments() {
        assert_eq!(
            split_multi("a | b ||c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_multi("  ").is_empty());
    }

    #[test]
    fn rows_parse_with_missing_optional_cells() {
        let csv = "Slug,Name,Categories\nriverside,Riverside Academy,private-school\n";
        let rows = parse_rows(csv.as_bytes()).expect("rows parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slug.as_deref(), Some("riverside"));
        assert!(rows[0].phone.is_none());
        assert!(rows[0].verified_date().is_none());
    }
}
