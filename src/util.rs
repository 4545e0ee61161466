const MEDIA_EXTENSIONS: [&str; 14] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "avif", "mp4", "mkv", "avi", "mov", "wmv", "flv",
    "mpeg",
];

/// Cheap plausibility check for a recipient address.
///
/// This is not address parsing: it only rejects empty input, input without an `@`,
/// and input whose last dot-separated segment is a known image or video extension.
/// Without a `.` the whole string counts as the last segment.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || !email.contains('@') {
        return false;
    }

    let extension = email.rsplit('.').next().unwrap_or(email).to_lowercase();
    !MEDIA_EXTENSIONS.contains(&extension.as_str())
}

const SPECIAL_USE_DOMAINS: [&str; 6] = ["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Whether the domain of `email` is, or sits under, a special-use name that can
/// never receive mail on the public internet (`*.test`, `localhost`, ...).
pub fn has_special_use_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let domain = domain.trim_end_matches('.').to_lowercase();
    let top_level = domain.rsplit('.').next().unwrap_or(domain.as_str());
    SPECIAL_USE_DOMAINS.contains(&top_level)
}
