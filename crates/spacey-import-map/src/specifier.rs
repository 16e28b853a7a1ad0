// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Specifier classification
//!
//! A specifier is either URL-like (absolute URL, or a path starting with
//! `/`, `./` or `../`) or bare. URL-like specifiers are compared by their
//! serialized URL; bare specifiers are compared verbatim.

use url::Url;

/// Schemes whose URLs take part in trailing-slash prefix matching.
///
/// `db` is the editor's asset database scheme.
pub const SPECIAL_SCHEMES: &[&str] = &["ftp", "file", "http", "https", "ws", "wss", "db"];

/// Whether a URL uses one of [`SPECIAL_SCHEMES`]
pub fn is_special(url: &Url) -> bool {
    SPECIAL_SCHEMES.contains(&url.scheme())
}

/// Whether a specifier is written as a path relative to its importer
pub fn is_relative_path(specifier: &str) -> bool {
    specifier.starts_with('/') || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Parse a specifier the way an import site would: paths are resolved
/// against `base`, anything else must be an absolute URL.
///
/// Returns `None` for bare specifiers.
pub fn parse_url_like_specifier(specifier: &str, base: &Url) -> Option<Url> {
    if is_relative_path(specifier) {
        return base.join(specifier).ok();
    }
    Url::parse(specifier).ok()
}

/// Whether a specifier is bare (neither a path nor an absolute URL)
pub fn is_bare(specifier: &str) -> bool {
    !is_relative_path(specifier) && Url::parse(specifier).is_err()
}

/// Build a `file:` URL for a filesystem path
pub fn file_url(path: &std::path::Path) -> Option<Url> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Url::from_file_path(absolute).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("file:///project/assets/main.js").unwrap()
    }

    #[test]
    fn test_relative_paths_join_base() {
        assert_eq!(
            parse_url_like_specifier("./util.js", &base()).unwrap().as_str(),
            "file:///project/assets/util.js"
        );
        assert_eq!(
            parse_url_like_specifier("../lib/a.js", &base()).unwrap().as_str(),
            "file:///project/lib/a.js"
        );
        assert_eq!(
            parse_url_like_specifier("/abs.js", &base()).unwrap().as_str(),
            "file:///abs.js"
        );
    }

    #[test]
    fn test_absolute_urls() {
        let url = parse_url_like_specifier("db://assets/scripts/a.ts", &base()).unwrap();
        assert_eq!(url.scheme(), "db");
        assert!(is_special(&url));

        let url = parse_url_like_specifier("foo:/bare-1", &base()).unwrap();
        assert_eq!(url.as_str(), "foo:/bare-1");
        assert!(!is_special(&url));
    }

    #[test]
    fn test_bare_specifiers() {
        assert!(parse_url_like_specifier("cc", &base()).is_none());
        assert!(parse_url_like_specifier("lodash/get", &base()).is_none());
        assert!(is_bare("cc/env"));
        assert!(!is_bare("./cc"));
        assert!(!is_bare("https://example.com/x.js"));
    }
}
