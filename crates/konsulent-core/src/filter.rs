//! Availability/skill filter - the query pipeline's core.
//!
//! Pure functions of their inputs; no state is retained between calls.

use std::collections::HashSet;

use crate::models::{AvailableConsultant, Consultant};

/// Split a comma-separated skill string into lower-cased, trimmed tokens.
///
/// Tokens that are empty after trimming are kept and match literally against
/// the skill lookup set (they are never a wildcard).
pub fn parse_skill_tokens(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_lowercase()).collect()
}

/// Filter a roster by minimum availability and an optional conjunctive skill
/// requirement.
///
/// Availability is `100 - workload_percent` and the threshold is inclusive.
/// When `required_skills` is present, a record survives only if **every**
/// token is present in its lower-cased skill set; a record missing any one
/// required skill is excluded even if it has all the others. Output order is
/// roster order restricted to survivors, and skill casing is the stored
/// original, never the lower-cased matching copy.
///
/// `required_skills` that is absent or blank after trimming disables the
/// skill check entirely. An empty result is an empty vector, not an error.
pub fn filter_consultants(
    roster: &[Consultant],
    min_availability_percent: u8,
    required_skills: Option<&str>,
) -> Vec<AvailableConsultant> {
    let required = required_skills
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_skill_tokens);

    let mut filtered = Vec::new();

    for consultant in roster {
        let availability = consultant.availability_percent();

        let lookup: HashSet<String> = consultant
            .skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        if let Some(tokens) = &required {
            let has_all = tokens.iter().all(|t| lookup.contains(t));
            if !has_all {
                continue;
            }
        }

        if availability < min_availability_percent {
            continue;
        }

        filtered.push(AvailableConsultant {
            name: consultant.name.clone(),
            availability_percent: availability,
            skills: consultant.skills.clone(),
        });
    }

    filtered
}
