//! Language resolution and locale-prefixed paths.
//!
//! Storefront URLs carry a language prefix (`/en/...`, `/ka/...`); admin
//! routes never do. `path_for` is the only sanctioned way to build internal
//! links, so every navigable URL stays locale-consistent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ka,
}

pub const SUPPORTED: [Lang; 2] = [Lang::En, Lang::Ka];
pub const DEFAULT: Lang = Lang::En;

impl Lang {
    pub const fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ka => "ka",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Lang::En),
            "ka" => Some(Lang::Ka),
            _ => None,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::parse(s).ok_or(())
    }
}

/// Initial language, before any route is known: persisted preference, then
/// the browser-reported language, then the default.
pub fn resolve_initial(saved: Option<&str>, browser: Option<&str>) -> Lang {
    if let Some(lang) = saved.and_then(Lang::parse) {
        return lang;
    }
    if let Some(lang) = browser
        .map(|b| b.split(['-', '_']).next().unwrap_or(b))
        .and_then(Lang::parse)
    {
        return lang;
    }
    DEFAULT
}

/// Locale-prefixed path for a logical route. Admin paths pass through
/// unchanged; the root maps to just the prefix.
pub fn path_for(lang: Lang, path: &str) -> String {
    if path.starts_with("/admin") {
        return path.to_string();
    }
    let clean = path.trim_start_matches('/');
    if clean.is_empty() {
        format!("/{}", lang.code())
    } else {
        format!("/{}/{}", lang.code(), clean)
    }
}

/// First path segment interpreted as a language prefix, plus the remainder
/// (always starting with `/`). The prefix may be unrecognized.
pub fn split_prefix(path: &str) -> (Option<&str>, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return (None, "/");
    }
    match trimmed.split_once('/') {
        Some((first, _)) => (Some(first), &trimmed[first.len()..]),
        None => (Some(trimmed), "/"),
    }
}

/// Where an explicit language switch navigates to: the same page under the
/// new prefix. Admin paths never navigate.
pub fn switch_target(current_path: &str, new_lang: Lang) -> Option<String> {
    if current_path.starts_with("/admin") {
        return None;
    }
    let (first, rest) = split_prefix(current_path);
    if first.and_then(Lang::parse).is_some() {
        return Some(if rest == "/" {
            format!("/{}", new_lang.code())
        } else {
            format!("/{}{rest}", new_lang.code())
        });
    }
    Some(path_for(new_lang, current_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_for_prefixes_storefront_routes() {
        assert_eq!(path_for(Lang::Ka, "/"), "/ka");
        assert_eq!(path_for(Lang::En, "/product/7"), "/en/product/7");
        assert_eq!(path_for(Lang::Ka, "sale"), "/ka/sale");
    }

    #[test]
    fn path_for_leaves_admin_routes_alone() {
        assert_eq!(path_for(Lang::Ka, "/admin/orders"), "/admin/orders");
        assert_eq!(path_for(Lang::En, "/admin"), "/admin");
    }

    #[test]
    fn initial_resolution_priority() {
        assert_eq!(resolve_initial(Some("ka"), Some("en-US")), Lang::Ka);
        assert_eq!(resolve_initial(None, Some("ka-GE")), Lang::Ka);
        assert_eq!(resolve_initial(None, Some("fr-FR")), Lang::En);
        assert_eq!(resolve_initial(Some("xx"), None), Lang::En);
        assert_eq!(resolve_initial(None, None), Lang::En);
    }

    #[test]
    fn prefix_splitting() {
        assert_eq!(split_prefix("/en/sale"), (Some("en"), "/sale"));
        assert_eq!(split_prefix("/ka"), (Some("ka"), "/"));
        assert_eq!(split_prefix("/xx/product/7"), (Some("xx"), "/product/7"));
        assert_eq!(split_prefix("/"), (None, "/"));
    }

    #[test]
    fn switching_preserves_the_rest_of_a_prefixed_path() {
        assert_eq!(switch_target("/en/sale", Lang::Ka), Some("/ka/sale".into()));
        assert_eq!(switch_target("/ka", Lang::En), Some("/en".into()));
    }

    #[test]
    fn switching_prefixes_an_unprefixed_path() {
        assert_eq!(switch_target("/about", Lang::Ka), Some("/ka/about".into()));
        assert_eq!(switch_target("/", Lang::Ka), Some("/ka".into()));
    }

    #[test]
    fn switching_never_touches_admin() {
        assert_eq!(switch_target("/admin/orders", Lang::Ka), None);
    }
}
