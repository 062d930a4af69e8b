//! Engine input types: intake payloads and conversion requests.

use database::validation::{
    validate_budget_range, validate_email, validate_phone, validate_required_text,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// A raw inquiry as submitted through any acquisition channel.
///
/// Everything beyond the contact name is optional; qualification fields the
/// customer left blank simply contribute nothing to the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadIntake {
    /// Contact name.
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Acquisition channel tag (e.g. "referral", "website", "social").
    pub source: Option<String>,
    /// Target region; absent means assignment is skipped.
    pub region: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    /// Project scope tag (e.g. "full_home", "multi_room", "single_room").
    pub project_type: Option<String>,
    /// Property kind tag (e.g. "villa", "office", "apartment").
    pub property_type: Option<String>,
    /// Timeline bucket tag (e.g. "immediate", "1-3 months").
    pub timeline: Option<String>,
    pub description: Option<String>,
}

impl LeadIntake {
    /// Validate the payload before anything is persisted.
    ///
    /// Requires a name and at least one contact channel; checks formats
    /// only on fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("name", &self.name)?;

        if self.email.is_none() && self.phone.is_none() {
            return Err(ValidationError::MissingContact);
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let (Some(min), Some(max)) = (self.budget_min, self.budget_max) {
            validate_budget_range(min, max)?;
        }

        Ok(())
    }
}

/// New-project attributes for converting a qualified lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub title: String,
    pub budget: i64,
    pub duration_weeks: Option<i64>,
}

impl ConversionRequest {
    /// Validate the request before the conversion transaction starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("title", &self.title)?;

        if self.budget <= 0 {
            return Err(ValidationError::NonPositive("budget".to_string()));
        }
        if let Some(weeks) = self.duration_weeks {
            if weeks <= 0 {
                return Err(ValidationError::NonPositive("duration".to_string()));
            }
        }

        Ok(())
    }
}
