//! Built-in evaluation rules.
//!
//! Each rule reads one family of facts from the profile snapshot and returns
//! a bounded score. Missing facts degrade to a zero score with a note; rules
//! never error for absent data.

use std::sync::Arc;

use async_trait::async_trait;

use super::domain::OrganizationProfile;
use super::registry::{Rule, RuleComputationError, RuleOutcome, RuleRegistry};

/// Registry holding every built-in rule, built once at startup.
pub fn standard_registry() -> RuleRegistry {
    RuleRegistry::from_rules(vec![
        Arc::new(VerifiedBadge),
        Arc::new(GoogleBusinessProfile),
        Arc::new(WebsiteDomain),
        Arc::new(SocialLinks),
        Arc::new(PhoneContact),
        Arc::new(EmailContact),
        Arc::new(WhatsappContact),
        Arc::new(Logo),
        Arc::new(CoverImage),
        Arc::new(Gallery),
        Arc::new(Description),
        Arc::new(ProgramCatalog),
        Arc::new(TuitionTransparency),
        Arc::new(AdmissionsContactRule),
        Arc::new(EnrollmentOpen),
    ])
}

struct VerifiedBadge;

#[async_trait]
impl Rule for VerifiedBadge {
    fn key(&self) -> &'static str {
        "verified"
    }

    fn label(&self) -> &'static str {
        "Verified identity"
    }

    fn max_score(&self) -> u32 {
        10
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Complete the directory verification process to earn the verified badge.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        if !profile.verification.verified {
            return Ok(RuleOutcome::with_note(0, "identity verification not completed"));
        }

        Ok(match profile.verification.verified_on {
            Some(date) => RuleOutcome::with_note(self.max_score(), format!("verified on {date}")),
            None => RuleOutcome::scored(self.max_score()),
        })
    }
}

struct GoogleBusinessProfile;

#[async_trait]
impl Rule for GoogleBusinessProfile {
    fn key(&self) -> &'static str {
        "google_business_profile"
    }

    fn label(&self) -> &'static str {
        "Google Business Profile"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Link the organization's Google Business Profile so map searches surface the listing.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.web.google_business_profile) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no Google Business Profile linked"),
        })
    }
}

struct WebsiteDomain;

#[async_trait]
impl Rule for WebsiteDomain {
    fn key(&self) -> &'static str {
        "website_domain"
    }

    fn label(&self) -> &'static str {
        "Website domain"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Connect a custom domain to replace the shared directory address.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.web.website_domain) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no custom website domain connected"),
        })
    }
}

struct SocialLinks;

#[async_trait]
impl Rule for SocialLinks {
    fn key(&self) -> &'static str {
        "social_links"
    }

    fn label(&self) -> &'static str {
        "Social media links"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Link at least two social networks families already follow.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        let networks = profile.distinct_social_networks();
        Ok(match networks {
            0 => RuleOutcome::with_note(0, "no social networks linked"),
            1 => RuleOutcome::with_note(3, "only one social network linked"),
            _ => RuleOutcome::scored(self.max_score()),
        })
    }
}

struct PhoneContact;

#[async_trait]
impl Rule for PhoneContact {
    fn key(&self) -> &'static str {
        "phone"
    }

    fn label(&self) -> &'static str {
        "Phone number"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Publish a phone number families can call during office hours.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.contact.phone) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no phone number published"),
        })
    }
}

struct EmailContact;

#[async_trait]
impl Rule for EmailContact {
    fn key(&self) -> &'static str {
        "email"
    }

    fn label(&self) -> &'static str {
        "Email address"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Publish a monitored email address for written inquiries.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.contact.email) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no email address published"),
        })
    }
}

struct WhatsappContact;

#[async_trait]
impl Rule for WhatsappContact {
    fn key(&self) -> &'static str {
        "whatsapp"
    }

    fn label(&self) -> &'static str {
        "WhatsApp line"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Add a WhatsApp line; most inbound conversations start there.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.contact.whatsapp) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no WhatsApp line published"),
        })
    }
}

struct Logo;

#[async_trait]
impl Rule for Logo {
    fn key(&self) -> &'static str {
        "logo"
    }

    fn label(&self) -> &'static str {
        "Logo uploaded"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Upload a logo so the listing stands out in category pages.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.media.logo_key) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no logo uploaded"),
        })
    }
}

struct CoverImage;

#[async_trait]
impl Rule for CoverImage {
    fn key(&self) -> &'static str {
        "cover_image"
    }

    fn label(&self) -> &'static str {
        "Cover image"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Upload a cover image for the profile header.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match present(&profile.media.cover_key) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no cover image uploaded"),
        })
    }
}

struct Gallery;

#[async_trait]
impl Rule for Gallery {
    fn key(&self) -> &'static str {
        "gallery"
    }

    fn label(&self) -> &'static str {
        "Photo gallery"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Upload at least four photos to fill the profile carousel.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        let photos = profile
            .media
            .gallery
            .iter()
            .filter(|key| !key.trim().is_empty())
            .count();
        Ok(match photos {
            0 => RuleOutcome::with_note(0, "no gallery photos uploaded"),
            1..=3 => RuleOutcome::with_note(2, format!("{photos} photo(s); four fill the carousel")),
            _ => RuleOutcome::scored(self.max_score()),
        })
    }
}

struct Description;

/// Descriptions shorter than this read as stubs in search results.
const FULL_DESCRIPTION_CHARS: usize = 160;

#[async_trait]
impl Rule for Description {
    fn key(&self) -> &'static str {
        "description"
    }

    fn label(&self) -> &'static str {
        "Profile description"
    }

    fn max_score(&self) -> u32 {
        10
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Write a description of at least 160 characters covering programs and values.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        let length = profile
            .description
            .as_deref()
            .map(|text| text.trim().chars().count())
            .unwrap_or(0);

        Ok(if length >= FULL_DESCRIPTION_CHARS {
            RuleOutcome::scored(self.max_score())
        } else if length > 0 {
            RuleOutcome::with_note(
                5,
                format!("description is {length} characters; {FULL_DESCRIPTION_CHARS} reads as complete"),
            )
        } else {
            RuleOutcome::with_note(0, "no description published")
        })
    }
}

struct ProgramCatalog;

#[async_trait]
impl Rule for ProgramCatalog {
    fn key(&self) -> &'static str {
        "program_catalog"
    }

    fn label(&self) -> &'static str {
        "Published programs"
    }

    fn max_score(&self) -> u32 {
        10
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Publish at least three programs so families can compare offerings.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        let programs = profile.programs.len();
        Ok(match programs {
            0 => RuleOutcome::with_note(0, "no programs published"),
            1..=2 => RuleOutcome::with_note(5, format!("{programs} program(s) published")),
            _ => RuleOutcome::scored(self.max_score()),
        })
    }
}

struct TuitionTransparency;

#[async_trait]
impl Rule for TuitionTransparency {
    fn key(&self) -> &'static str {
        "tuition_transparency"
    }

    fn label(&self) -> &'static str {
        "Published tuition"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Publish a monthly fee on at least one program; listings with pricing convert better.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        if profile.programs.is_empty() {
            return Ok(RuleOutcome::with_note(0, "no programs to price"));
        }

        Ok(match profile.priced_programs().count() {
            0 => RuleOutcome::with_note(
                0,
                format!("no tuition published across {} program(s)", profile.programs.len()),
            ),
            _ => RuleOutcome::scored(self.max_score()),
        })
    }
}

struct AdmissionsContactRule;

#[async_trait]
impl Rule for AdmissionsContactRule {
    fn key(&self) -> &'static str {
        "admissions_contact"
    }

    fn label(&self) -> &'static str {
        "Admissions contact"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Name an admissions contact with a direct email or phone number.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match &profile.admissions {
            Some(contact) if present(&contact.email) || present(&contact.phone) => {
                RuleOutcome::scored(self.max_score())
            }
            Some(contact) => RuleOutcome::with_note(
                2,
                format!("admissions contact '{}' has no direct channel", contact.name),
            ),
            None => RuleOutcome::with_note(0, "no admissions contact named"),
        })
    }
}

struct EnrollmentOpen;

#[async_trait]
impl Rule for EnrollmentOpen {
    fn key(&self) -> &'static str {
        "enrollment_open"
    }

    fn label(&self) -> &'static str {
        "Open enrollment"
    }

    fn max_score(&self) -> u32 {
        5
    }

    fn remediation(&self) -> Option<&'static str> {
        Some("Mark at least one program as accepting enrollments.")
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(match profile.programs.iter().any(|program| program.enrollment_open) {
            true => RuleOutcome::scored(self.max_score()),
            false => RuleOutcome::with_note(0, "no program is accepting enrollments"),
        })
    }
}

fn present(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        ContactChannels, MediaAssets, ProgramListing, VerificationStatus, WebPresence,
    };

    fn bare_profile() -> OrganizationProfile {
        OrganizationProfile {
            slug: "sample".to_string(),
            display_name: "Sample Org".to_string(),
            categories: vec!["private-school".to_string()],
            verification: VerificationStatus::default(),
            contact: ContactChannels::default(),
            web: WebPresence::default(),
            media: MediaAssets::default(),
            description: None,
            programs: Vec::new(),
            admissions: None,
        }
    }

    #[tokio::test]
    async fn description_awards_partial_credit_for_short_text() {
        let mut profile = bare_profile();
        profile.description = Some("A short blurb.".to_string());

        let outcome = Description
            .compute(&profile)
            .await
            .expect("description rule computes");

        assert_eq!(outcome.score, 5);
        assert!(outcome.note.expect("note present").contains("characters"));
    }

    #[tokio::test]
    async fn gallery_grades_by_photo_count() {
        let mut profile = bare_profile();
        assert_eq!(Gallery.compute(&profile).await.unwrap().score, 0);

        profile.media.gallery = vec!["img/1.jpg".to_string(), "img/2.jpg".to_string()];
        assert_eq!(Gallery.compute(&profile).await.unwrap().score, 2);

        profile.media.gallery = (1..=4).map(|n| format!("img/{n}.jpg")).collect();
        assert_eq!(Gallery.compute(&profile).await.unwrap().score, 5);
    }

    #[tokio::test]
    async fn tuition_rule_distinguishes_unpriced_from_empty_catalogs() {
        let mut profile = bare_profile();
        let empty = TuitionTransparency.compute(&profile).await.unwrap();
        assert_eq!(empty.score, 0);
        assert_eq!(empty.note.as_deref(), Some("no programs to price"));

        profile.programs = vec![ProgramListing {
            name: "Primary Years".to_string(),
            summary: None,
            monthly_fee: None,
            enrollment_open: true,
        }];
        let unpriced = TuitionTransparency.compute(&profile).await.unwrap();
        assert_eq!(unpriced.score, 0);
        assert!(unpriced.note.expect("note present").contains("no tuition"));

        profile.programs[0].monthly_fee = Some(450);
        assert_eq!(TuitionTransparency.compute(&profile).await.unwrap().score, 5);
    }

    #[test]
    fn standard_registry_resolves_every_built_in_key() {
        let registry = standard_registry();
        for key in [
            "verified",
            "google_business_profile",
            "website_domain",
            "social_links",
            "phone",
            "email",
            "whatsapp",
            "logo",
            "cover_image",
            "gallery",
            "description",
            "program_catalog",
            "tuition_transparency",
            "admissions_contact",
            "enrollment_open",
        ] {
            assert!(registry.resolve(key).is_some(), "missing rule '{key}'");
        }
        assert_eq!(registry.len(), 15);
    }
}
