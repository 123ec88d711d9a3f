//! URL slugs for pages.

/// Fallback when a name slugifies to nothing
pub const DEFAULT_SLUG: &str = "page";

/// Lowercase, whitespace to hyphens, drop anything that isn't `[a-z0-9_-]`.
///
/// A leading `/` is ignored so `"/about"` and `"about"` produce the same slug.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for ch in input.trim().trim_start_matches('/').chars() {
        if ch.is_whitespace() {
            slug.push('-');
        } else if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            slug.push(ch.to_ascii_lowercase());
        }
    }

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

/// Return `base`, or the first free `base-1`, `base-2`, ... not in `taken`
pub fn unique_slug<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();

    if !taken.contains(&base) {
        return base.to_string();
    }

    let mut suffix = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}
