//! Authenticated user record and team roles.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::lookups::BadgeColor;

/// Role of a team member. Serialized as the upper-case code (`MANAGER`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Manager,
    Pilot,
    Mechanic,
    Engineer,
    Logistics,
    Finance,
    Media,
    Guest,
}

impl UserRole {
    pub const ALL: &'static [UserRole] = &[
        Self::Manager,
        Self::Pilot,
        Self::Mechanic,
        Self::Engineer,
        Self::Logistics,
        Self::Finance,
        Self::Media,
        Self::Guest,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Manager => "MANAGER",
            Self::Pilot => "PILOT",
            Self::Mechanic => "MECHANIC",
            Self::Engineer => "ENGINEER",
            Self::Logistics => "LOGISTICS",
            Self::Finance => "FINANCE",
            Self::Media => "MEDIA",
            Self::Guest => "GUEST",
        }
    }

    /// Full role title shown on profile pages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Manager => "Manager del Equipo",
            Self::Pilot => "Piloto",
            Self::Mechanic => "Mecánico",
            Self::Engineer => "Ingeniero",
            Self::Logistics => "Logística",
            Self::Finance => "Finanzas",
            Self::Media => "Medios",
            Self::Guest => "Invitado",
        }
    }

    /// Compact label used in member lists and role chips.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            other => other.display_name(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Manager => "Gestión completa del equipo",
            Self::Pilot => "Piloto del equipo",
            Self::Mechanic => "Mantenimiento y reparación de vehículos",
            Self::Engineer => "Análisis técnico y setup",
            Self::Logistics => "Gestión de viajes y transporte",
            Self::Finance => "Gestión financiera y sponsors",
            Self::Media => "Comunicación y redes sociales",
            Self::Guest => "Acceso limitado de solo lectura",
        }
    }

    pub fn badge_color(self) -> BadgeColor {
        match self {
            Self::Manager => BadgeColor::Primary,
            Self::Pilot => BadgeColor::Secondary,
            Self::Mechanic => BadgeColor::Success,
            Self::Engineer => BadgeColor::Info,
            Self::Logistics => BadgeColor::Warning,
            Self::Finance => BadgeColor::Error,
            Self::Media | Self::Guest => BadgeColor::Default,
        }
    }

    pub fn can_manage_team(self) -> bool {
        self == Self::Manager
    }

    pub fn can_manage_finances(self) -> bool {
        matches!(self, Self::Manager | Self::Finance)
    }

    pub fn can_view_finances(self) -> bool {
        self.can_manage_finances()
    }

    pub fn can_manage_vehicles(self) -> bool {
        matches!(self, Self::Manager | Self::Mechanic | Self::Engineer)
    }

    pub fn can_manage_inventory(self) -> bool {
        matches!(self, Self::Manager | Self::Mechanic | Self::Logistics)
    }

    pub fn can_manage_events(self) -> bool {
        matches!(self, Self::Manager | Self::Logistics)
    }

    pub fn is_read_only(self) -> bool {
        self == Self::Guest
    }
}

impl FromStr for UserRole {
    type Err = LookupError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.code() == code)
            .ok_or_else(|| LookupError::unknown("role", code))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The signed-in team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub team_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_expiry: Option<NaiveDate>,
    pub active: bool,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Avatar initials: first letter of the first and last name, as stored.
    #[must_use]
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }

    /// Whether the racing license has lapsed on `today`. Users without a
    /// recorded expiry never report an expired license.
    #[must_use]
    pub fn license_expired_on(&self, today: NaiveDate) -> bool {
        self.license_expiry.is_some_and(|expiry| expiry < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "lucia@racing.com".to_string(),
            first_name: "lucía".to_string(),
            last_name: "Ortega".to_string(),
            role: UserRole::Pilot,
            team_id: 1,
            team_name: None,
            phone_number: None,
            license_number: Some("RT007".to_string()),
            license_expiry: NaiveDate::from_ymd_opt(2025, 12, 31),
            active: true,
        }
    }

    #[test]
    fn test_role_codes_round_trip_through_from_str() {
        for role in UserRole::ALL {
            assert_eq!(role.code().parse::<UserRole>().unwrap(), *role);
        }
        assert!("manager".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Manager.can_manage_team());
        assert!(!UserRole::Finance.can_manage_team());
        assert!(UserRole::Finance.can_view_finances());
        assert!(UserRole::Engineer.can_manage_vehicles());
        assert!(!UserRole::Pilot.can_manage_vehicles());
        assert!(UserRole::Logistics.can_manage_inventory());
        assert!(UserRole::Logistics.can_manage_events());
        assert!(!UserRole::Media.can_manage_events());
        assert!(UserRole::Guest.is_read_only());
        assert!(!UserRole::Manager.is_read_only());
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(UserRole::Manager.display_name(), "Manager del Equipo");
        assert_eq!(UserRole::Manager.short_label(), "Manager");
        assert_eq!(UserRole::Mechanic.short_label(), "Mecánico");
        assert_eq!(UserRole::Finance.badge_color(), BadgeColor::Error);
    }

    #[test]
    fn test_user_names() {
        let user = sample_user();
        assert_eq!(user.full_name(), "lucía Ortega");
        assert_eq!(user.initials(), "lO");
    }

    #[test]
    fn test_license_expiry() {
        let user = sample_user();
        let before = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(!user.license_expired_on(before));
        assert!(user.license_expired_on(after));
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(json["firstName"], "lucía");
        assert_eq!(json["role"], "PILOT");
        assert_eq!(json["licenseExpiry"], "2025-12-31");
        assert!(json.get("teamName").is_none());
    }
}
