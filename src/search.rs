//! Server-side biodata search: one filter pass, then a page slice.
//!
//! Filtering never ships the whole dataset to the client; the query runs
//! against the registry and only the requested page leaves the server.

use serde::{Deserialize, Serialize};

use crate::profile::{BiodataKind, BiodataProfile};
use crate::wizard::FieldValue;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

/// Filter criteria for a biodata search. Every field is optional; an empty
/// query matches all approved profiles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// "bride" or "groom".
    pub kind: Option<String>,
    pub marital_status: Option<String>,
    pub religion: Option<String>,
    pub district: Option<String>,
    /// Case-insensitive substring match on the profession field.
    pub profession: Option<String>,
    pub age_min: Option<u8>,
    pub age_max: Option<u8>,
    /// 1-indexed page number.
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl SearchQuery {
    fn wants_kind(&self) -> Option<BiodataKind> {
        self.kind.as_deref().and_then(BiodataKind::from_field)
    }

    /// Whether one profile satisfies every present criterion.
    pub fn matches(&self, profile: &BiodataProfile) -> bool {
        if let Some(kind) = self.wants_kind() {
            if profile.kind() != Some(kind) {
                return false;
            }
        }
        if let Some(ref wanted) = self.marital_status {
            if !text_field_eq(profile, "maritalStatus", wanted) {
                return false;
            }
        }
        if let Some(ref wanted) = self.religion {
            if !text_field_eq(profile, "religion", wanted) {
                return false;
            }
        }
        if let Some(ref wanted) = self.district {
            let matched = profile
                .district()
                .is_some_and(|d| d.eq_ignore_ascii_case(wanted.trim()));
            if !matched {
                return false;
            }
        }
        if let Some(ref needle) = self.profession {
            let matched = profile
                .text_field("profession")
                .is_some_and(|p| p.to_lowercase().contains(&needle.trim().to_lowercase()));
            if !matched {
                return false;
            }
        }
        match (profile.age(), self.age_min, self.age_max) {
            (None, None, None) => {}
            (None, _, _) => return false,
            (Some(age), min, max) => {
                if min.is_some_and(|m| age < m) || max.is_some_and(|m| age > m) {
                    return false;
                }
            }
        }
        true
    }
}

fn text_field_eq(profile: &BiodataProfile, field: &str, wanted: &str) -> bool {
    profile
        .fields
        .get(field)
        .and_then(FieldValue::as_text)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(wanted.trim()))
}

/// One page of search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Filter `profiles` by `query`, then cut the requested page.
///
/// `per_page` is clamped to `[1, MAX_PAGE_SIZE]`; a page index past the end
/// is clamped to the last page so a stale pager link still renders results.
pub fn run_search<'a, I>(profiles: I, query: &SearchQuery) -> SearchPage<&'a BiodataProfile>
where
    I: Iterator<Item = &'a BiodataProfile>,
{
    let mut matched: Vec<&BiodataProfile> = profiles.filter(|p| query.matches(p)).collect();
    matched.sort_by_key(|p| p.biodata_no);

    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total = matched.len();
    let total_pages = if total == 0 { 1 } else { total.div_ceil(per_page) };
    let page = query.page.unwrap_or(1).clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let items: Vec<&BiodataProfile> = matched
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect();

    SearchPage {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}
