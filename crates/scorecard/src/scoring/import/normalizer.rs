use crate::scoring::domain::SocialNetwork;

/// Lowercases and dash-joins free-form slugs from directory exports.
pub(crate) fn normalize_slug(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_dash = true;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Infers the social network from a link's host.
pub(crate) fn infer_network(url: &str) -> SocialNetwork {
    let lowered = url.to_ascii_lowercase();
    if lowered.contains("facebook.") || lowered.contains("fb.com") {
        SocialNetwork::Facebook
    } else if lowered.contains("instagram.") {
        SocialNetwork::Instagram
    } else if lowered.contains("linkedin.") {
        SocialNetwork::LinkedIn
    } else if lowered.contains("youtube.") || lowered.contains("youtu.be") {
        SocialNetwork::YouTube
    } else {
        SocialNetwork::Other
    }
}
