//! Enterprise buyer profiles and their startup preferences.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::fields::{
    FieldError, FieldProblem, normalise_list, optional_text, optional_url, required_text,
};
use crate::domain::startup::{DESCRIPTION_MAX, NAME_MAX, TAG_LIST_MAX, TAG_MAX};
use crate::domain::{EnterpriseId, FundingStage, UserId};

/// Budget an enterprise expects to spend on a pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetRange {
    UnderFiftyThousand,
    FiftyToTwoFiftyThousand,
    TwoFiftyThousandToOneMillion,
    OverOneMillion,
}

impl BudgetRange {
    pub const ALL: [Self; 4] = [
        Self::UnderFiftyThousand,
        Self::FiftyToTwoFiftyThousand,
        Self::TwoFiftyThousandToOneMillion,
        Self::OverOneMillion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnderFiftyThousand => "under_50k",
            Self::FiftyToTwoFiftyThousand => "50k_250k",
            Self::TwoFiftyThousandToOneMillion => "250k_1m",
            Self::OverOneMillion => "over_1m",
        }
    }
}

impl fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == value)
            .ok_or_else(|| value.to_owned())
    }
}

/// Raw enterprise form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterpriseDraft {
    pub company_name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub preferred_stages: Vec<String>,
    pub preferred_industries: Vec<String>,
    pub budget_range: Option<String>,
}

/// Validated enterprise attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseProfile {
    pub company_name: String,
    pub industry: String,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    pub website: Option<Url>,
    pub description: Option<String>,
    pub preferred_stages: Vec<FundingStage>,
    pub preferred_industries: Vec<String>,
    pub budget_range: Option<BudgetRange>,
}

impl TryFrom<&EnterpriseDraft> for EnterpriseProfile {
    type Error = FieldError;

    fn try_from(draft: &EnterpriseDraft) -> Result<Self, Self::Error> {
        let mut preferred_stages = Vec::new();
        for raw in &draft.preferred_stages {
            let stage = raw.trim().parse::<FundingStage>().map_err(|value| {
                FieldError::new("preferredStages", FieldProblem::UnknownValue(value))
            })?;
            if !preferred_stages.contains(&stage) {
                preferred_stages.push(stage);
            }
        }
        let budget_range = draft
            .budget_range
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| {
                value.parse::<BudgetRange>().map_err(|value| {
                    FieldError::new("budgetRange", FieldProblem::UnknownValue(value))
                })
            })
            .transpose()?;

        Ok(Self {
            company_name: required_text("companyName", &draft.company_name, 1, NAME_MAX)?,
            industry: required_text("industry", &draft.industry, 1, TAG_MAX)?,
            company_size: optional_text("companySize", draft.company_size.as_deref(), TAG_MAX)?,
            headquarters: optional_text("headquarters", draft.headquarters.as_deref(), NAME_MAX)?,
            website: optional_url("website", draft.website.as_deref())?,
            description: optional_text("description", draft.description.as_deref(), DESCRIPTION_MAX)?,
            preferred_stages,
            preferred_industries: normalise_list(
                "preferredIndustries",
                &draft.preferred_industries,
                TAG_LIST_MAX,
                TAG_MAX,
            )?,
            budget_range,
        })
    }
}

/// Persisted enterprise profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enterprise {
    pub id: EnterpriseId,
    pub owner_id: UserId,
    pub profile: EnterpriseProfile,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> EnterpriseDraft {
        EnterpriseDraft {
            company_name: "Globex".into(),
            industry: "logistics".into(),
            preferred_stages: vec!["seed".into(), "seed".into(), "series_b".into()],
            preferred_industries: vec!["AI".into(), " ai ".into()],
            budget_range: Some("50k_250k".into()),
            ..EnterpriseDraft::default()
        }
    }

    #[rstest]
    fn preferences_are_deduplicated() {
        let profile = EnterpriseProfile::try_from(&draft()).expect("valid");
        assert_eq!(
            profile.preferred_stages,
            vec![FundingStage::Seed, FundingStage::SeriesB]
        );
        assert_eq!(profile.preferred_industries, vec!["AI".to_owned()]);
        assert_eq!(profile.budget_range, Some(BudgetRange::FiftyToTwoFiftyThousand));
    }

    #[rstest]
    fn unknown_stage_is_rejected() {
        let mut draft = draft();
        draft.preferred_stages.push("unicorn".into());
        let err = EnterpriseProfile::try_from(&draft).expect_err("invalid stage");
        assert_eq!(err.field, "preferredStages");
        assert_eq!(err.problem, FieldProblem::UnknownValue("unicorn".into()));
    }

    #[rstest]
    fn blank_company_name_is_rejected() {
        let mut draft = draft();
        draft.company_name = " ".into();
        let err = EnterpriseProfile::try_from(&draft).expect_err("blank name");
        assert_eq!(err.field, "companyName");
    }
}
