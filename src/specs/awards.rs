// src/specs/awards.rs
//! Award extraction from detail-page text.
//!
//! Awards are only ever written as prose ("3° 50 Top Pizza Italia 2024",
//! "50 Top Pizza Europa 2023 - Pizzeria dell'anno"), so they are matched with an
//! ordered table of regex rules over the page text with site chrome removed.
//! Ranked rules come first; an award name (case/whitespace-insensitive) is
//! recorded once, so a ranked hit suppresses the same name found unranked later.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use scraper::Html;

use crate::config::consts::AWARD_BRAND;
use crate::core::html::content_text;
use crate::model::Award;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AwardKind {
    /// Group 1 is the rank, group 2 the award name.
    Ranked,
    /// Group 1 is the award name.
    Unranked,
}

pub struct AwardRule {
    pub name: &'static str,
    pub kind: AwardKind,
    regex: &'static LazyLock<Regex>,
}

// "3° 50 Top Pizza Italia 2024", "1st Best Pizza Chains 2023", "12. Top Pizza 2022 - Special"
static RE_RANKED_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)(?:^|\s)(\d{1,3})\s*(?:°|º|ª|\.|(?i:st|nd|rd|th)\b)\s*",
        r"(?:(?i:posto|place)\s+)?(?:[-–:]\s*)?",
        r"([^\n]*?\b(?i:top|pizza|pizzeria|pizzerie|award|awards|premio|best|migliori?)\b[^\n]*?\b(?:19|20)\d{2}\b",
        r"(?:[ \t]*[-–—][ \t]*[^\n\-–—]{1,80})?)",
    ))
    .unwrap()
});

// "#4 Top Pizza Chains 2024"
static RE_RANKED_HASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)(?:^|\s)#(\d{1,3})\s+",
        r"([^\n]*?\b(?i:top|pizza|pizzeria|pizzerie|award|awards|premio|best|migliori?)\b[^\n]*?\b(?:19|20)\d{2}\b",
        r"(?:[ \t]*[-–—][ \t]*[^\n\-–—]{1,80})?)",
    ))
    .unwrap()
});

// "50 Top Pizza Italia 2024", "50 Top Pizza 2023 - Pizzeria dell'anno"
static RE_BRAND_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    let brand = AWARD_BRAND.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+");
    Regex::new(&format!(
        r"(?i)\b({brand}\b[^\n]*?\b(?:19|20)\d{{2}}\b(?:[ \t]*[-–—][ \t]*[^\n\-–—]{{1,80}})?)"
    ))
    .unwrap()
});

/// Priority order: higher-precision (ranked) rules first.
pub static AWARD_RULES: [AwardRule; 3] = [
    AwardRule { name: "ranked_ordinal", kind: AwardKind::Ranked, regex: &RE_RANKED_ORDINAL },
    AwardRule { name: "ranked_hash", kind: AwardKind::Ranked, regex: &RE_RANKED_HASH },
    AwardRule { name: "brand_year", kind: AwardKind::Unranked, regex: &RE_BRAND_YEAR },
];

impl AwardRule {
    /// Every match of this rule alone, in text order. No dedup.
    pub fn find(&self, text: &str) -> Vec<Award> {
        self.regex
            .captures_iter(text)
            .filter_map(|cap| self.award_from(&cap))
            .filter(|a| !a.name.is_empty())
            .collect()
    }

    fn award_from(&self, cap: &Captures<'_>) -> Option<Award> {
        match self.kind {
            AwardKind::Ranked => {
                let rank = cap.get(1)?.as_str().parse().ok()?;
                Some(Award::ranked(rank, cap.get(2)?.as_str()))
            }
            AwardKind::Unranked => Some(Award::unranked(cap.get(1)?.as_str())),
        }
    }
}

/// Run all rules in priority order; first occurrence of a name wins.
pub fn extract(text: &str) -> Vec<Award> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for rule in AWARD_RULES.iter() {
        for award in rule.find(text) {
            if seen.insert(award.key()) {
                out.push(award);
            }
        }
    }
    out
}

/// Awards of a parsed detail page, ignoring navigation/header/footer text.
pub fn from_page(html: &Html) -> Vec<Award> {
    extract(&content_text(html))
}
