//! Lead scoring.
//!
//! A pure, point-additive priority heuristic over the qualification
//! attributes of an inquiry. The score is a coarse triage signal, not a
//! probability: factors are independent, there is no cap, and a missing or
//! unrecognized attribute contributes zero rather than erroring. The weight
//! table is plain data so the ranking survives weight revisions.

use database::models::Lead;

use crate::intake::LeadIntake;

/// The scoring-relevant view of a lead, borrowed from either an intake
/// payload or a stored record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadProfile<'a> {
    pub budget_min: Option<i64>,
    pub timeline: Option<&'a str>,
    pub project_type: Option<&'a str>,
    pub property_type: Option<&'a str>,
    pub source: Option<&'a str>,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_description: bool,
}

impl<'a> LeadProfile<'a> {
    /// Profile of a not-yet-persisted intake payload.
    pub fn from_intake(intake: &'a LeadIntake) -> Self {
        Self {
            budget_min: intake.budget_min,
            timeline: intake.timeline.as_deref(),
            project_type: intake.project_type.as_deref(),
            property_type: intake.property_type.as_deref(),
            source: intake.source.as_deref(),
            has_email: is_present(intake.email.as_deref()),
            has_phone: is_present(intake.phone.as_deref()),
            has_description: is_present(intake.description.as_deref()),
        }
    }

    /// Profile of a stored lead, used when qualification fields change.
    pub fn from_lead(lead: &'a Lead) -> Self {
        Self {
            budget_min: lead.budget_min,
            timeline: lead.timeline.as_deref(),
            project_type: lead.project_type.as_deref(),
            property_type: lead.property_type.as_deref(),
            source: lead.source.as_deref(),
            has_email: is_present(lead.email.as_deref()),
            has_phone: is_present(lead.phone.as_deref()),
            has_description: is_present(lead.description.as_deref()),
        }
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Canonical tag form: lowercase alphanumerics only, so "Full_Home",
/// "full home" and "full-home" all rank the same.
fn tag(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// The factor → tier → weight table.
///
/// Defaults carry the canonical constants; construct a custom table to
/// revise weights without touching the scoring logic.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Budget floor for the high tier.
    pub budget_high_floor: i64,
    /// Budget floor for the mid tier.
    pub budget_mid_floor: i64,
    pub budget_high: u32,
    pub budget_mid: u32,
    pub budget_low: u32,

    pub timeline_immediate: u32,
    pub timeline_quarter: u32,
    pub timeline_half_year: u32,
    pub timeline_year: u32,

    pub scope_full_home: u32,
    pub scope_multi_room: u32,
    pub scope_single_room: u32,

    pub property_villa: u32,
    pub property_office: u32,
    pub property_apartment: u32,

    pub source_referral: u32,
    pub source_website: u32,
    pub source_social: u32,

    pub contact_email: u32,
    pub contact_phone: u32,
    pub has_description: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            budget_high_floor: 500_000,
            budget_mid_floor: 200_000,
            budget_high: 25,
            budget_mid: 18,
            budget_low: 10,

            timeline_immediate: 25,
            timeline_quarter: 18,
            timeline_half_year: 12,
            timeline_year: 6,

            scope_full_home: 20,
            scope_multi_room: 14,
            scope_single_room: 8,

            property_villa: 12,
            property_office: 8,
            property_apartment: 5,

            source_referral: 15,
            source_website: 10,
            source_social: 5,

            contact_email: 3,
            contact_phone: 3,
            has_description: 4,
        }
    }
}

impl ScoreWeights {
    /// Score a profile. Deterministic and total: the same profile always
    /// yields the same score, and no input produces an error.
    pub fn score(&self, profile: &LeadProfile<'_>) -> u32 {
        let mut points = 0;
        points += self.budget_points(profile.budget_min);
        points += self.timeline_points(profile.timeline);
        points += self.scope_points(profile.project_type);
        points += self.property_points(profile.property_type);
        points += self.source_points(profile.source);
        if profile.has_email {
            points += self.contact_email;
        }
        if profile.has_phone {
            points += self.contact_phone;
        }
        if profile.has_description {
            points += self.has_description;
        }
        points
    }

    fn budget_points(&self, budget_min: Option<i64>) -> u32 {
        match budget_min {
            Some(v) if v >= self.budget_high_floor => self.budget_high,
            Some(v) if v >= self.budget_mid_floor => self.budget_mid,
            Some(v) if v > 0 => self.budget_low,
            _ => 0,
        }
    }

    fn timeline_points(&self, raw: Option<&str>) -> u32 {
        match raw.map(tag).as_deref() {
            Some("immediate") | Some("asap") => self.timeline_immediate,
            Some("13months") => self.timeline_quarter,
            Some("36months") => self.timeline_half_year,
            Some("612months") => self.timeline_year,
            _ => 0,
        }
    }

    fn scope_points(&self, raw: Option<&str>) -> u32 {
        match raw.map(tag).as_deref() {
            Some("fullhome") | Some("wholehome") => self.scope_full_home,
            Some("multiroom") => self.scope_multi_room,
            Some("singleroom") => self.scope_single_room,
            _ => 0,
        }
    }

    fn property_points(&self, raw: Option<&str>) -> u32 {
        match raw.map(tag).as_deref() {
            Some("villa") => self.property_villa,
            Some("office") => self.property_office,
            Some("apartment") | Some("flat") => self.property_apartment,
            _ => 0,
        }
    }

    fn source_points(&self, raw: Option<&str>) -> u32 {
        match raw.map(tag).as_deref() {
            Some("referral") => self.source_referral,
            Some("website") | Some("direct") => self.source_website,
            Some("social") | Some("socialmedia") => self.source_social,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(profile: &LeadProfile<'_>) -> u32 {
        ScoreWeights::default().score(profile)
    }

    #[test]
    fn top_tier_anchor() {
        // Top budget + top timeline + top scope + top source, nothing else.
        let profile = LeadProfile {
            budget_min: Some(600_000),
            timeline: Some("immediate"),
            project_type: Some("full_home"),
            source: Some("referral"),
            ..Default::default()
        };
        assert_eq!(score(&profile), 25 + 25 + 20 + 15);
    }

    #[test]
    fn empty_profile_scores_zero() {
        assert_eq!(score(&LeadProfile::default()), 0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let profile = LeadProfile {
            budget_min: Some(250_000),
            timeline: Some("3-6 months"),
            property_type: Some("villa"),
            has_phone: true,
            ..Default::default()
        };
        assert_eq!(score(&profile), score(&profile));
    }

    #[test]
    fn budget_is_monotonic() {
        let at = |budget_min| {
            score(&LeadProfile {
                budget_min,
                ..Default::default()
            })
        };
        assert!(at(None) <= at(Some(50_000)));
        assert!(at(Some(50_000)) <= at(Some(200_000)));
        assert!(at(Some(200_000)) <= at(Some(500_000)));
        assert!(at(Some(500_000)) <= at(Some(5_000_000)));
    }

    #[test]
    fn timeline_urgency_ordering() {
        let at = |timeline| {
            score(&LeadProfile {
                timeline,
                ..Default::default()
            })
        };
        assert!(at(Some("immediate")) > at(Some("1-3 months")));
        assert!(at(Some("1-3 months")) > at(Some("3-6 months")));
        assert!(at(Some("3-6 months")) > at(Some("6-12 months")));
        assert!(at(Some("6-12 months")) > at(None));
    }

    #[test]
    fn scope_and_property_ordering() {
        let scope = |project_type| {
            score(&LeadProfile {
                project_type,
                ..Default::default()
            })
        };
        assert!(scope(Some("full_home")) > scope(Some("multi_room")));
        assert!(scope(Some("multi_room")) > scope(Some("single_room")));

        let property = |property_type| {
            score(&LeadProfile {
                property_type,
                ..Default::default()
            })
        };
        assert!(property(Some("villa")) > property(Some("office")));
        assert!(property(Some("office")) > property(Some("apartment")));
    }

    #[test]
    fn source_quality_ordering() {
        let at = |source| {
            score(&LeadProfile {
                source,
                ..Default::default()
            })
        };
        assert!(at(Some("referral")) > at(Some("website")));
        assert!(at(Some("website")) > at(Some("social")));
        assert!(at(Some("social")) > at(None));
    }

    #[test]
    fn unknown_tags_contribute_zero() {
        let profile = LeadProfile {
            timeline: Some("whenever"),
            project_type: Some("spaceship"),
            property_type: Some("houseboat"),
            source: Some("carrier pigeon"),
            ..Default::default()
        };
        assert_eq!(score(&profile), 0);
    }

    #[test]
    fn tag_normalization_is_forgiving() {
        let canonical = score(&LeadProfile {
            project_type: Some("full_home"),
            ..Default::default()
        });
        for spelling in ["Full Home", "full-home", "FULL_HOME"] {
            let variant = score(&LeadProfile {
                project_type: Some(spelling),
                ..Default::default()
            });
            assert_eq!(variant, canonical, "spelling {:?}", spelling);
        }
    }

    #[test]
    fn contact_presence_bonuses() {
        let base = LeadProfile::default();
        let with_contacts = LeadProfile {
            has_email: true,
            has_phone: true,
            has_description: true,
            ..Default::default()
        };
        assert_eq!(score(&with_contacts), score(&base) + 3 + 3 + 4);
    }

    #[test]
    fn fully_loaded_profile_exceeds_hundred() {
        // The score is uncapped: every top tier plus all bonuses.
        let profile = LeadProfile {
            budget_min: Some(1_000_000),
            timeline: Some("immediate"),
            project_type: Some("full_home"),
            property_type: Some("villa"),
            source: Some("referral"),
            has_email: true,
            has_phone: true,
            has_description: true,
        };
        assert_eq!(score(&profile), 25 + 25 + 20 + 12 + 15 + 3 + 3 + 4);
        assert!(score(&profile) > 100);
    }
}
