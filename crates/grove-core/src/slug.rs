//! Directory and file naming for lowered trees

use std::collections::BTreeSet;

use uuid::Uuid;

/// Reduce a display name to a lowercase filesystem-safe slug.
///
/// ASCII letters and digits are kept (lowercased); every other run of
/// characters collapses to a single `-`. May return an empty string when
/// nothing survives.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Pick a directory name for a block that does not collide with `existing`.
///
/// Collisions are broken by appending a hex prefix of the block id, starting
/// at eight characters and growing one at a time until the candidate is
/// free. Past the full id a numeric suffix takes over. Never touches the
/// filesystem; `existing` is the complete set of names already taken.
pub fn unique_directory(existing: &BTreeSet<String>, name: &str, id: Uuid) -> String {
    let base = non_empty(slug(name), "block");
    if !existing.contains(&base) {
        return base;
    }
    let hex = id.simple().to_string();
    for len in 8..=hex.len() {
        let candidate = format!("{base}-{}", &hex[..len]);
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
    let mut n: u64 = 2;
    loop {
        let candidate = format!("{base}-{hex}-{n}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Pick a file name for a shared file, keeping its extension readable.
///
/// `Data Helper.JSON` becomes `data-helper.json`; on collision the hex
/// prefix lands before the extension.
pub fn unique_file_name(existing: &BTreeSet<String>, name: &str, id: Uuid) -> String {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !slug(s).is_empty() && !slug(e).is_empty() => (slug(s), Some(slug(e))),
        _ => (non_empty(slug(name), "file"), None),
    };
    let join = |stem: &str| match &ext {
        Some(e) => format!("{stem}.{e}"),
        None => stem.to_string(),
    };

    let base = join(&stem);
    if !existing.contains(&base) {
        return base;
    }
    let hex = id.simple().to_string();
    for len in 8..=hex.len() {
        let candidate = join(&format!("{stem}-{}", &hex[..len]));
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
    let mut n: u64 = 2;
    loop {
        let candidate = join(&format!("{stem}-{hex}-{n}"));
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn non_empty(slug: String, fallback: &str) -> String {
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}
