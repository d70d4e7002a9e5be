use std::collections::BTreeSet;

use crate::model::{normalize_for_search, tokenize, Cafe, PriceRange};

const MIN_FUZZY_TOKEN_LEN: usize = 4;

/// Exact-match filters applied before any text matching. Every field that is
/// set must hold for a cafe to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub tag: Option<String>,
    pub price: Option<PriceRange>,
    pub student_only: bool,
    pub ids: Option<BTreeSet<String>>,
}

impl FilterCriteria {
    pub fn accepts(&self, cafe: &Cafe) -> bool {
        if let Some(tag) = &self.tag {
            if !cafe.has_tag(tag) {
                return false;
            }
        }
        if let Some(price) = self.price {
            if cafe.price_range != price {
                return false;
            }
        }
        if self.student_only && !cafe.student_friendly {
            return false;
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&cafe.id) {
                return false;
            }
        }
        true
    }
}

/// A normalized, tokenized query. Built once per query change and reused
/// across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatcher {
    tokens: Vec<String>,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        let normalized = normalize_for_search(query);
        let tokens = tokenize(&normalized)
            .into_iter()
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when every query token is satisfied somewhere in `text`.
    pub fn matches_text(&self, text: &str) -> bool {
        if self.tokens.is_empty() {
            return true;
        }

        let normalized = normalize_for_search(text);
        let words = tokenize(&normalized);
        self.tokens
            .iter()
            .all(|token| token_matches(token, &normalized, &words))
    }

    pub fn matches(&self, cafe: &Cafe) -> bool {
        self.matches_text(&cafe.searchable_text())
    }
}

/// Stable filter over the catalog: exact criteria first, then conjunctive
/// fuzzy token matching. Catalog order is preserved.
pub fn filter_records<'a>(
    catalog: &'a [Cafe],
    query: &str,
    criteria: &FilterCriteria,
) -> Vec<&'a Cafe> {
    let matcher = QueryMatcher::new(query);
    catalog
        .iter()
        .filter(|cafe| criteria.accepts(cafe))
        .filter(|cafe| matcher.matches(cafe))
        .collect()
}

/// `token` and `normalized_text` must already be normalized; `words` are the
/// tokens of `normalized_text`.
pub fn token_matches(token: &str, normalized_text: &str, words: &[&str]) -> bool {
    if token.is_empty() || normalized_text.contains(token) {
        return true;
    }

    let token_len = token.chars().count();
    words.iter().any(|word| {
        if word.starts_with(token) || token.starts_with(word) {
            return true;
        }

        token_len >= MIN_FUZZY_TOKEN_LEN
            && word.chars().count() >= MIN_FUZZY_TOKEN_LEN
            && is_one_edit_away(token, word)
    })
}

/// Greedy single-pass check for at most one insertion, deletion or
/// substitution. No edit-distance table is built: a mismatch is always
/// resolved by skipping in the longer string, or in both when the lengths
/// are equal.
pub fn is_one_edit_away(source: &str, target: &str) -> bool {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    if source.len().abs_diff(target.len()) > 1 {
        return false;
    }

    let mut i = 0;
    let mut j = 0;
    let mut edits = 0;

    while i < source.len() && j < target.len() {
        if source[i] == target[j] {
            i += 1;
            j += 1;
            continue;
        }

        edits += 1;
        if edits > 1 {
            return false;
        }

        if source.len() > target.len() {
            i += 1;
        } else if source.len() < target.len() {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }

    if i < source.len() || j < target.len() {
        edits += 1;
    }

    edits <= 1
}

/// Weighted keyword ranking used by the "best of" lists. Unrelated to
/// `filter_records`, which never ranks.
pub fn best_matches<'a>(catalog: &'a [Cafe], keyword: &str, limit: usize) -> Vec<&'a Cafe> {
    let keyword = normalize_for_search(keyword);
    if keyword.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(u32, usize, &Cafe)> = catalog
        .iter()
        .enumerate()
        .filter_map(|(index, cafe)| keyword_score(cafe, &keyword).map(|score| (score, index, cafe)))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, _, cafe)| cafe)
        .collect()
}

fn keyword_score(cafe: &Cafe, keyword: &str) -> Option<u32> {
    let contains = |text: &str| normalize_for_search(text).contains(keyword);

    let in_name = contains(cafe.name.as_str());
    let in_description = contains(cafe.description.as_str());
    let in_tags = cafe.tags.iter().any(|tag| contains(tag.as_str()));
    let menu_hits = cafe.menu.iter().filter(|item| contains(item.name.as_str())).count() as u32;

    if !in_name && !in_description && !in_tags && menu_hits == 0 {
        return None;
    }

    let mut score = menu_hits * 2;
    if in_name {
        score += 3;
    }
    if in_tags {
        score += 2;
    }
    if in_description {
        score += 1;
    }
    Some(score)
}

#[cfg(test)]
mod tests {
    use super::{is_one_edit_away, token_matches};

    #[test]
    fn trailing_character_counts_as_the_single_edit() {
        assert!(is_one_edit_away("brew", "brews"));
        assert!(is_one_edit_away("brews", "brew"));
        assert!(!is_one_edit_away("brxw", "brews"));
    }

    #[test]
    fn adjacent_transposition_needs_two_edits() {
        assert!(!is_one_edit_away("mocha", "mohca"));
    }

    #[test]
    fn word_prefix_of_token_is_accepted() {
        let text = "board games";
        assert!(token_matches("boardgames", text, &["board", "games"]));
    }
}
