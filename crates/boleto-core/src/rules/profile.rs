//! Contact and profile attributes: phone, age, years of experience.

use chrono::{Datelike, Local, NaiveDate};

use super::cpf::validate_cpf;
use super::dates::parse_br_date_with_year;
use super::lexicon::BIRTH_DATE_LABELS;
use super::patterns::{AGE_YEARS, DATE_DMY, EXPERIENCE_YEARS, PHONE};
use crate::text::{normalize_for_match, only_digits};

const MAX_AGE: u32 = 120;
const MAX_EXPERIENCE: u32 = 60;
const COUNTRY_CODE: &str = "55";
/// Characters after "idade" searched for an inline age.
const AGE_CONTEXT_CHARS: usize = 40;

/// Age as of today.
pub fn extract_age(text: &str) -> Option<u32> {
    extract_age_at(text, Local::now().date_naive())
}

/// Age as of `today`: from a labeled date of birth when present, else from
/// an "N anos" mention following "idade".
pub fn extract_age_at(text: &str, today: NaiveDate) -> Option<u32> {
    age_from_birth_date(text, today)
        .or_else(|| age_from_context(text))
        .filter(|age| *age <= MAX_AGE)
}

fn age_from_birth_date(text: &str, today: NaiveDate) -> Option<u32> {
    text.lines()
        .filter(|line| {
            let folded = normalize_for_match(line);
            BIRTH_DATE_LABELS.iter().any(|label| folded.contains(label))
        })
        .find_map(|line| {
            DATE_DMY
                .find_iter(line)
                .find_map(|m| parse_br_date_with_year(m.as_str(), today.year()))
        })
        .and_then(|birth| years_between(birth, today))
}

fn years_between(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

fn age_from_context(text: &str) -> Option<u32> {
    let folded = normalize_for_match(text);
    folded
        .match_indices("idade")
        .filter(|(pos, _)| !folded[..*pos].ends_with(|c: char| c.is_alphabetic()))
        .find_map(|(pos, _)| {
            let window: String = folded[pos..].chars().take(AGE_CONTEXT_CHARS).collect();
            AGE_YEARS
                .captures(&window)
                .and_then(|caps| caps[1].parse::<u32>().ok())
        })
}

/// Years of experience from an "N anos de experiencia" mention.
pub fn extract_experience_years(text: &str) -> Option<u32> {
    let folded = normalize_for_match(text);
    EXPERIENCE_YEARS
        .captures_iter(&folded)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|years| *years <= MAX_EXPERIENCE)
}

/// Best phone candidate, normalized as `+55` followed by the local number.
///
/// Candidates score for a country code, a leading `+`, and an 11-digit
/// (mobile) local number.
pub fn extract_phone(text: &str) -> Option<String> {
    let mut best: Option<(u8, String)> = None;

    for m in PHONE.find_iter(text) {
        let raw = m.as_str();
        let digits = only_digits(raw);
        if validate_cpf(&digits) {
            continue;
        }

        let (has_country, local) = match digits.strip_prefix(COUNTRY_CODE) {
            Some(rest) if matches!(digits.len(), 12 | 13) => (true, rest.to_string()),
            _ => (false, digits.clone()),
        };
        if !matches!(local.len(), 10 | 11) {
            continue;
        }

        let score = u8::from(has_country) * 2
            + u8::from(raw.starts_with('+'))
            + u8::from(local.len() == 11);
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, local));
        }
    }

    best.map(|(_, local)| format!("+{COUNTRY_CODE}{local}"))
}
