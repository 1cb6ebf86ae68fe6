//! Fixed option sets used by the employer forms and the home page

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string does not name a known option
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Canonical role categories offered when posting a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCategory {
    Line,
    Prep,
    Dish,
    Server,
    Cashier,
    Host,
    Bartender,
    Manager,
    Other,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 9] = [
        RoleCategory::Line,
        RoleCategory::Prep,
        RoleCategory::Dish,
        RoleCategory::Server,
        RoleCategory::Cashier,
        RoleCategory::Host,
        RoleCategory::Bartender,
        RoleCategory::Manager,
        RoleCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Line => "Line",
            RoleCategory::Prep => "Prep",
            RoleCategory::Dish => "Dish",
            RoleCategory::Server => "Server",
            RoleCategory::Cashier => "Cashier",
            RoleCategory::Host => "Host",
            RoleCategory::Bartender => "Bartender",
            RoleCategory::Manager => "Manager",
            RoleCategory::Other => "Other",
        }
    }

    /// Exact, case-sensitive match against the stored tag
    pub fn parse(value: &str) -> Result<Self, UnknownVariant> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "role category",
                value: value.to_string(),
            })
    }
}

impl std::fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Home page shortcut that opens the jobs view locked to a set of roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopRole {
    pub title: &'static str,
    pub image_src: &'static str,
    pub roles: &'static [RoleCategory],
}

pub const TOP_ROLES: [TopRole; 3] = [
    TopRole {
        title: "Line / Prep Cooks",
        image_src: "/roles/line-cooks.jpg",
        roles: &[RoleCategory::Line, RoleCategory::Prep],
    },
    TopRole {
        title: "Cashier / Server",
        image_src: "/roles/servers.jpg",
        roles: &[RoleCategory::Cashier, RoleCategory::Server],
    },
    TopRole {
        title: "Managers",
        image_src: "/roles/managers.jpg",
        roles: &[RoleCategory::Manager],
    },
];

/// Employment type on a job posting (optional field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Seasonal,
    Temporary,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Seasonal,
        EmploymentType::Temporary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Seasonal => "Seasonal",
            EmploymentType::Temporary => "Temporary",
        }
    }

    pub fn parse(value: &str) -> Result<Self, UnknownVariant> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "employment type",
                value: value.to_string(),
            })
    }
}

/// How many positions an employer is hiring for (signup profile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenPositions {
    One,
    TwoToFive,
    SixToTen,
    ElevenToTwentyFive,
    TwentySixToFifty,
    FiftyPlus,
}

impl OpenPositions {
    pub const ALL: [OpenPositions; 6] = [
        OpenPositions::One,
        OpenPositions::TwoToFive,
        OpenPositions::SixToTen,
        OpenPositions::ElevenToTwentyFive,
        OpenPositions::TwentySixToFifty,
        OpenPositions::FiftyPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OpenPositions::One => "1",
            OpenPositions::TwoToFive => "2–5",
            OpenPositions::SixToTen => "6–10",
            OpenPositions::ElevenToTwentyFive => "11–25",
            OpenPositions::TwentySixToFifty => "26–50",
            OpenPositions::FiftyPlus => "50+",
        }
    }

    pub fn parse(value: &str) -> Result<Self, UnknownVariant> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.label() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "open positions bucket",
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_category_round_trips_through_labels() {
        for category in RoleCategory::ALL {
            assert_eq!(RoleCategory::parse(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn test_role_category_parse_is_case_sensitive() {
        let err = RoleCategory::parse("line").unwrap_err();
        assert_eq!(err.to_string(), "Unknown role category: line");
    }

    #[test]
    fn test_top_roles_use_canonical_categories() {
        let tags: Vec<Vec<&str>> = TOP_ROLES
            .iter()
            .map(|r| r.roles.iter().map(|c| c.as_str()).collect())
            .collect();
        assert_eq!(
            tags,
            vec![vec!["Line", "Prep"], vec!["Cashier", "Server"], vec!["Manager"]]
        );
    }

    #[test]
    fn test_open_positions_labels() {
        assert_eq!(OpenPositions::parse("2–5"), Ok(OpenPositions::TwoToFive));
        assert!(OpenPositions::parse("").is_err());
        assert!(OpenPositions::parse("2-5").is_err());
    }

    #[test]
    fn test_employment_type_parse() {
        assert_eq!(
            EmploymentType::parse("Part-time"),
            Ok(EmploymentType::PartTime)
        );
        assert!(EmploymentType::parse("Gig").is_err());
    }
}
