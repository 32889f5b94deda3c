use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored profile snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Read-only snapshot of an organization's public profile.
///
/// Snapshots are assembled by an upstream loader before scoring; the engine
/// never fetches facts on its own, so every rule reads from this struct and
/// nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub slug: String,
    pub display_name: String,
    /// Directory categories this organization is listed under. Categories
    /// without a registered rule-set are skipped during scoring.
    pub categories: Vec<String>,
    pub verification: VerificationStatus,
    pub contact: ContactChannels,
    pub web: WebPresence,
    pub media: MediaAssets,
    pub description: Option<String>,
    pub programs: Vec<ProgramListing>,
    pub admissions: Option<AdmissionsContact>,
}

/// Outcome of the directory's identity verification workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub verified: bool,
    pub verified_on: Option<NaiveDate>,
}

/// Channels families use to reach the organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactChannels {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
}

/// External web properties linked from the profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebPresence {
    pub website_domain: Option<String>,
    pub google_business_profile: Option<String>,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: SocialNetwork,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialNetwork {
    Facebook,
    Instagram,
    LinkedIn,
    YouTube,
    Other,
}

/// Storage keys for uploaded imagery; empty keys are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaAssets {
    pub logo_key: Option<String>,
    pub cover_key: Option<String>,
    pub gallery: Vec<String>,
}

/// One published program, course, or grade-level offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramListing {
    pub name: String,
    pub summary: Option<String>,
    pub monthly_fee: Option<u32>,
    pub enrollment_open: bool,
}

/// Dedicated admissions point of contact, when one is staffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionsContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl OrganizationProfile {
    /// Programs with a published fee, used by the transparency rules.
    pub fn priced_programs(&self) -> impl Iterator<Item = &ProgramListing> {
        self.programs
            .iter()
            .filter(|program| program.monthly_fee.is_some())
    }

    pub fn distinct_social_networks(&self) -> usize {
        let mut networks: Vec<SocialNetwork> = Vec::new();
        for link in &self.web.social_links {
            if !networks.contains(&link.network) {
                networks.push(link.network);
            }
        }
        networks.len()
    }
}

/// Lifecycle of a stored snapshot with respect to scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileScoreStatus {
    Submitted,
    Scored,
}

impl ProfileScoreStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileScoreStatus::Submitted => "submitted",
            ProfileScoreStatus::Scored => "scored",
        }
    }
}
