use crate::scoring::domain::{
    ContactChannels, MediaAssets, OrganizationProfile, ProgramListing, SocialLink,
    VerificationStatus, WebPresence,
};

use super::normalizer::{infer_network, normalize_slug};
use super::parser::{split_multi, ProfileRow};

/// Maps one parsed export row into a profile snapshot.
///
/// Export invariants: multi-value cells are pipe-delimited; program entries
/// are `Name@fee` with the fee optional; exports only carry programs that
/// are open for enrollment.
pub(crate) fn profile_from_row(row: &ProfileRow, slug: &str) -> OrganizationProfile {
    let social_links = split_multi(&row.social_links)
        .into_iter()
        .map(|url| SocialLink {
            network: infer_network(&url),
            url,
        })
        .collect();

    let programs = split_multi(&row.programs)
        .into_iter()
        .map(|entry| program_from_entry(&entry))
        .collect();

    OrganizationProfile {
        slug: normalize_slug(slug),
        display_name: row.name.trim().to_string(),
        categories: split_multi(&row.categories),
        verification: VerificationStatus {
            verified: row.verified_date().is_some(),
            verified_on: row.verified_date(),
        },
        contact: ContactChannels {
            phone: row.phone.clone(),
            email: row.email.clone(),
            whatsapp: row.whatsapp.clone(),
        },
        web: WebPresence {
            website_domain: row.website_domain.clone(),
            google_business_profile: row.google_profile.clone(),
            social_links,
        },
        media: MediaAssets {
            logo_key: row.logo_key.clone(),
            cover_key: row.cover_key.clone(),
            gallery: split_multi(&row.gallery_keys),
        },
        description: row.description.clone(),
        programs,
        admissions: None,
    }
}

fn program_from_entry(entry: &str) -> ProgramListing {
    let (name, fee) = match entry.split_once('@') {
        Some((name, fee)) => (name.trim(), fee.trim().parse::<u32>().ok()),
        None => (entry.trim(), None),
    };

    ProgramListing {
        name: name.to_string(),
        summary: None,
        monthly_fee: fee,
        enrollment_open: true,
    }
}
