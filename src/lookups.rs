//! Display lookup tables for enumerated codes.
//!
//! Vehicle, maintenance and event records carry their status and type as
//! upper-case string codes (`IN_USE`, `SPONSOR_EVENT`, ...). Views render them as a localized
//! label inside a colored badge. Each table here is a typed enum with the code,
//! the label and the badge color; [`label_for`] and [`color_for`] work on raw
//! codes and fall back to the code itself and [`BadgeColor::Default`] when the
//! code is unknown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Badge palette used by the front-end chip components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Primary,
    Secondary,
    Success,
    Warning,
    Error,
    Info,
    Default,
}

impl BadgeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates an enum whose variants map one-to-one to string codes, labels
/// and badge colors, plus `FromStr`, `Display` and serde impls keyed by code.
macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $code:literal, $label:literal, $color:ident;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn color(self) -> BadgeColor {
                match self {
                    $($name::$variant => BadgeColor::$color,)+
                }
            }

            /// Every variant as a served table row.
            pub fn entries() -> Vec<LookupEntry> {
                Self::ALL
                    .iter()
                    .map(|v| LookupEntry {
                        code: v.code(),
                        label: v.label(),
                        color: v.color(),
                        category: None,
                    })
                    .collect()
            }
        }

        impl FromStr for $name {
            type Err = LookupError;

            fn from_str(code: &str) -> Result<Self, Self::Err> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(LookupError::unknown($kind, other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_table! {
    /// Operational state of a vehicle.
    VehicleStatus, "vehicle status" {
        Available => "AVAILABLE", "Disponible", Success;
        InUse => "IN_USE", "En Uso", Primary;
        Maintenance => "MAINTENANCE", "Mantenimiento", Warning;
        Repair => "REPAIR", "Reparación", Error;
        OutOfService => "OUT_OF_SERVICE", "Fuera de Servicio", Default;
        Transport => "TRANSPORT", "Transporte", Info;
    }
}

impl VehicleStatus {
    pub fn is_available(self) -> bool {
        self == Self::Available
    }

    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Maintenance | Self::Repair | Self::OutOfService)
    }
}

code_table! {
    /// Top-level vehicle family.
    VehicleCategory, "vehicle category" {
        Car => "CAR", "Coches", Primary;
        Motorcycle => "MOTORCYCLE", "Motos", Secondary;
    }
}

/// Badge for a team's primary category on the teams page. Anything other
/// than `CAR` is shown as motorcycles.
pub fn team_category_badge(code: &str) -> (&'static str, BadgeColor) {
    if code == VehicleCategory::Car.code() {
        ("Automóviles", BadgeColor::Primary)
    } else {
        ("Motocicletas", BadgeColor::Secondary)
    }
}

code_table! {
    /// Competition class of a vehicle. Badges take the category's color.
    VehicleType, "vehicle type" {
        Formula1 => "FORMULA_1", "Fórmula 1", Primary;
        Formula2 => "FORMULA_2", "Fórmula 2", Primary;
        Formula3 => "FORMULA_3", "Fórmula 3", Primary;
        Formula4 => "FORMULA_4", "Fórmula 4", Primary;
        FormulaFord => "FORMULA_FORD", "Formula Ford", Primary;
        Gt3 => "GT3", "GT3", Primary;
        Gt4 => "GT4", "GT4", Primary;
        Lmp => "LMP", "LMP", Primary;
        Prototype => "PROTOTYPE", "Prototype", Primary;
        Tcr => "TCR", "TCR", Primary;
        Wtcc => "WTCC", "WTCC", Primary;
        Supercars => "SUPERCARS", "Supercars", Primary;
        Wrc => "WRC", "WRC", Primary;
        R5 => "R5", "R5", Primary;
        HistoricRally => "HISTORIC_RALLY", "Historic Rally", Primary;
        Indycar => "INDYCAR", "IndyCar", Primary;
        FormulaE => "FORMULA_E", "Formula E", Primary;
        DriftPro => "DRIFT_PRO", "Drift Pro", Primary;
        TimeAttack => "TIME_ATTACK", "Time Attack", Primary;
        MotoGp => "MOTOGP", "MotoGP", Secondary;
        Moto2 => "MOTO2", "Moto2", Secondary;
        Moto3 => "MOTO3", "Moto3", Secondary;
        Superbike => "SUPERBIKE", "Superbike", Secondary;
        Supersport => "SUPERSPORT", "Supersport", Secondary;
        Ewc => "EWC", "EWC", Secondary;
        BolDor => "BOL_DOR", "Bol d'Or", Secondary;
        Endurance24h => "ENDURANCE_24H", "24h Endurance", Secondary;
        Mxgp => "MXGP", "MXGP", Secondary;
        Mx2 => "MX2", "MX2", Secondary;
        Emx => "EMX", "EMX", Secondary;
        EnduroGp => "ENDUROGP", "EnduroGP", Secondary;
        Isde => "ISDE", "ISDE", Secondary;
        TrialGp => "TRIALGP", "TrialGP", Secondary;
        Trial2 => "TRIAL2", "Trial2", Secondary;
        Naked => "NAKED", "Naked", Secondary;
        Sport => "SPORT", "Sport", Secondary;
        Classic => "CLASSIC", "Classic", Secondary;
    }
}

impl VehicleType {
    pub fn category(self) -> VehicleCategory {
        match self {
            Self::MotoGp
            | Self::Moto2
            | Self::Moto3
            | Self::Superbike
            | Self::Supersport
            | Self::Ewc
            | Self::BolDor
            | Self::Endurance24h
            | Self::Mxgp
            | Self::Mx2
            | Self::Emx
            | Self::EnduroGp
            | Self::Isde
            | Self::TrialGp
            | Self::Trial2
            | Self::Naked
            | Self::Sport
            | Self::Classic => VehicleCategory::Motorcycle,
            _ => VehicleCategory::Car,
        }
    }

    /// Types in `category`, in declaration order.
    pub fn by_category(category: VehicleCategory) -> impl Iterator<Item = VehicleType> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |t| t.category() == category)
    }
}

code_table! {
    /// Kind of maintenance job on a vehicle.
    MaintenanceType, "maintenance type" {
        Preventive => "PREVENTIVE", "Preventivo", Info;
        Corrective => "CORRECTIVE", "Correctivo", Error;
        Inspection => "INSPECTION", "Inspección", Info;
        Setup => "SETUP", "Setup", Primary;
        Upgrade => "UPGRADE", "Mejora", Success;
        Seasonal => "SEASONAL", "Estacional", Info;
        PostEvent => "POST_EVENT", "Post-evento", Warning;
        PreEvent => "PRE_EVENT", "Pre-evento", Warning;
    }
}

impl MaintenanceType {
    pub fn description(self) -> &'static str {
        match self {
            Self::Preventive => "Mantenimiento programado regular",
            Self::Corrective => "Reparación de fallo o avería",
            Self::Inspection => "Revisión técnica o inspección",
            Self::Setup => "Configuración y ajustes del vehículo",
            Self::Upgrade => "Actualización o mejora de componentes",
            Self::Seasonal => "Mantenimiento de temporada",
            Self::PostEvent => "Revisión después de carrera o test",
            Self::PreEvent => "Preparación antes de carrera o test",
        }
    }

    pub fn is_scheduled(self) -> bool {
        matches!(self, Self::Preventive | Self::Inspection | Self::Seasonal)
    }

    pub fn is_event_related(self) -> bool {
        matches!(self, Self::PostEvent | Self::PreEvent | Self::Setup)
    }
}

code_table! {
    /// Kind of calendar event.
    EventType, "event type" {
        Race => "RACE", "Carrera", Primary;
        Test => "TEST", "Test", Secondary;
        Practice => "PRACTICE", "Entrenamientos", Default;
        Qualifying => "QUALIFYING", "Clasificación", Default;
        Training => "TRAINING", "Entrenamiento", Success;
        Travel => "TRAVEL", "Viaje", Default;
        Meeting => "MEETING", "Reunión", Info;
        Maintenance => "MAINTENANCE", "Mantenimiento", Warning;
        Presentation => "PRESENTATION", "Presentación", Default;
        Media => "MEDIA", "Medios", Default;
        SponsorEvent => "SPONSOR_EVENT", "Evento Sponsor", Default;
        Shakedown => "SHAKEDOWN", "Shakedown", Default;
        Trackday => "TRACKDAY", "Trackday", Default;
        Other => "OTHER", "Otro", Default;
    }
}

impl EventType {
    pub fn is_competitive(self) -> bool {
        matches!(self, Self::Race | Self::Qualifying)
    }

    pub fn is_on_track(self) -> bool {
        matches!(
            self,
            Self::Race
                | Self::Test
                | Self::Practice
                | Self::Qualifying
                | Self::Shakedown
                | Self::Trackday
        )
    }

    pub fn requires_vehicle(self) -> bool {
        self.is_on_track() || self == Self::Maintenance
    }

    pub fn is_public(self) -> bool {
        matches!(
            self,
            Self::Race | Self::Presentation | Self::Media | Self::SponsorEvent
        )
    }
}

code_table! {
    /// Lifecycle state of a calendar event.
    EventStatus, "event status" {
        Planned => "PLANNED", "Planificado", Info;
        Confirmed => "CONFIRMED", "Confirmado", Success;
        InProgress => "IN_PROGRESS", "En Progreso", Primary;
        Completed => "COMPLETED", "Completado", Default;
        Cancelled => "CANCELLED", "Cancelado", Error;
        Postponed => "POSTPONED", "Pospuesto", Warning;
        WeatherDelay => "WEATHER_DELAY", "Retraso por clima", Default;
        TechnicalIssue => "TECHNICAL_ISSUE", "Problema técnico", Default;
    }
}

impl EventStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Confirmed | Self::InProgress)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_be_modified(self) -> bool {
        matches!(self, Self::Planned | Self::Confirmed | Self::Postponed)
    }

    pub fn requires_attention(self) -> bool {
        matches!(
            self,
            Self::WeatherDelay | Self::TechnicalIssue | Self::Postponed
        )
    }
}

/// Which lookup table a raw code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    VehicleStatus,
    VehicleCategory,
    VehicleType,
    MaintenanceType,
    EventType,
    EventStatus,
}

/// Label for a raw code, or the code itself when the table has no entry.
pub fn label_for(kind: LookupKind, code: &str) -> String {
    let label = match kind {
        LookupKind::VehicleStatus => code.parse::<VehicleStatus>().ok().map(VehicleStatus::label),
        LookupKind::VehicleCategory => code.parse::<VehicleCategory>().ok().map(VehicleCategory::label),
        LookupKind::VehicleType => code.parse::<VehicleType>().ok().map(VehicleType::label),
        LookupKind::MaintenanceType => code.parse::<MaintenanceType>().ok().map(MaintenanceType::label),
        LookupKind::EventType => code.parse::<EventType>().ok().map(EventType::label),
        LookupKind::EventStatus => code.parse::<EventStatus>().ok().map(EventStatus::label),
    };
    label.unwrap_or(code).to_string()
}

/// Badge color for a raw code, [`BadgeColor::Default`] when unknown.
pub fn color_for(kind: LookupKind, code: &str) -> BadgeColor {
    let color = match kind {
        LookupKind::VehicleStatus => code.parse::<VehicleStatus>().ok().map(VehicleStatus::color),
        LookupKind::VehicleCategory => code.parse::<VehicleCategory>().ok().map(VehicleCategory::color),
        LookupKind::VehicleType => code.parse::<VehicleType>().ok().map(VehicleType::color),
        LookupKind::MaintenanceType => code.parse::<MaintenanceType>().ok().map(MaintenanceType::color),
        LookupKind::EventType => code.parse::<EventType>().ok().map(EventType::color),
        LookupKind::EventStatus => code.parse::<EventStatus>().ok().map(EventStatus::color),
    };
    color.unwrap_or(BadgeColor::Default)
}

/// One row of a lookup table, as served to the front-end.
#[derive(Debug, Clone, Serialize)]
pub struct LookupEntry {
    pub code: &'static str,
    pub label: &'static str,
    pub color: BadgeColor,
    /// Parent category code, for vehicle types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
}

/// All tables at once, keyed by table name.
#[derive(Debug, Clone, Serialize)]
pub struct LookupTables {
    pub roles: Vec<LookupEntry>,
    pub vehicle_status: Vec<LookupEntry>,
    pub vehicle_category: Vec<LookupEntry>,
    pub vehicle_type: Vec<LookupEntry>,
    pub maintenance_type: Vec<LookupEntry>,
    pub event_type: Vec<LookupEntry>,
    pub event_status: Vec<LookupEntry>,
}

impl LookupTables {
    pub fn build() -> Self {
        use crate::session::UserRole;

        Self {
            roles: UserRole::ALL
                .iter()
                .map(|r| LookupEntry {
                    code: r.code(),
                    label: r.short_label(),
                    color: r.badge_color(),
                    category: None,
                })
                .collect(),
            vehicle_status: VehicleStatus::entries(),
            vehicle_category: VehicleCategory::entries(),
            vehicle_type: VehicleType::ALL
                .iter()
                .map(|t| LookupEntry {
                    code: t.code(),
                    label: t.label(),
                    color: t.color(),
                    category: Some(t.category().code()),
                })
                .collect(),
            maintenance_type: MaintenanceType::entries(),
            event_type: EventType::entries(),
            event_status: EventStatus::entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_labels_and_colors() {
        assert_eq!(label_for(LookupKind::VehicleStatus, "IN_USE"), "En Uso");
        assert_eq!(
            color_for(LookupKind::VehicleStatus, "REPAIR"),
            BadgeColor::Error
        );
        assert_eq!(label_for(LookupKind::EventType, "MEETING"), "Reunión");
        assert_eq!(color_for(LookupKind::EventType, "TRAINING"), BadgeColor::Success);
        assert_eq!(label_for(LookupKind::EventStatus, "POSTPONED"), "Pospuesto");
        assert_eq!(color_for(LookupKind::EventStatus, "PLANNED"), BadgeColor::Info);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(label_for(LookupKind::VehicleStatus, "SOLD"), "SOLD");
        assert_eq!(
            color_for(LookupKind::EventStatus, "ARCHIVED"),
            BadgeColor::Default
        );
        // Codes are case-sensitive.
        assert_eq!(label_for(LookupKind::EventType, "race"), "race");
    }

    #[test]
    fn test_parse_error_names_table() {
        let err = "FLYING".parse::<VehicleStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown vehicle status code: FLYING");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&EventType::SponsorEvent).unwrap();
        assert_eq!(json, "\"SPONSOR_EVENT\"");

        let status: VehicleStatus = serde_json::from_str("\"OUT_OF_SERVICE\"").unwrap();
        assert_eq!(status, VehicleStatus::OutOfService);
    }

    #[test]
    fn test_predicates() {
        assert!(VehicleStatus::Repair.needs_attention());
        assert!(!VehicleStatus::Transport.needs_attention());
        assert!(VehicleStatus::Available.is_available());

        assert!(EventType::Maintenance.requires_vehicle());
        assert!(!EventType::Meeting.requires_vehicle());
        assert!(EventType::Qualifying.is_competitive());
        assert!(EventType::SponsorEvent.is_public());

        assert!(EventStatus::InProgress.is_active());
        assert!(EventStatus::Cancelled.is_finished());
        assert!(EventStatus::Postponed.can_be_modified());
        assert!(EventStatus::WeatherDelay.requires_attention());
    }

    #[test]
    fn test_tables_cover_every_variant() {
        let tables = LookupTables::build();
        assert_eq!(tables.roles.len(), 8);
        assert_eq!(tables.vehicle_status.len(), VehicleStatus::ALL.len());
        assert_eq!(tables.vehicle_category.len(), 2);
        assert_eq!(tables.vehicle_type.len(), 37);
        assert_eq!(tables.maintenance_type.len(), 8);
        assert_eq!(tables.event_type.len(), 14);
        assert_eq!(tables.event_status.len(), 8);
    }

    #[test]
    fn test_vehicle_types_by_category() {
        assert_eq!(VehicleType::Gt3.category(), VehicleCategory::Car);
        assert_eq!(VehicleType::BolDor.category(), VehicleCategory::Motorcycle);
        assert_eq!(VehicleType::by_category(VehicleCategory::Car).count(), 19);
        assert_eq!(VehicleType::by_category(VehicleCategory::Motorcycle).count(), 18);
        assert_eq!(label_for(LookupKind::VehicleType, "ENDURANCE_24H"), "24h Endurance");

        let tables = LookupTables::build();
        let motogp = tables
            .vehicle_type
            .iter()
            .find(|e| e.code == "MOTOGP")
            .unwrap();
        assert_eq!(motogp.category, Some("MOTORCYCLE"));
        assert_eq!(motogp.color, BadgeColor::Secondary);
    }

    #[test]
    fn test_vehicle_category_labels() {
        assert_eq!(label_for(LookupKind::VehicleCategory, "CAR"), "Coches");
        assert_eq!(label_for(LookupKind::VehicleCategory, "MOTORCYCLE"), "Motos");
        assert_eq!(team_category_badge("CAR"), ("Automóviles", BadgeColor::Primary));
        assert_eq!(
            team_category_badge("MOTORCYCLE"),
            ("Motocicletas", BadgeColor::Secondary)
        );
        assert_eq!(
            team_category_badge("BOAT"),
            ("Motocicletas", BadgeColor::Secondary)
        );
    }

    #[test]
    fn test_maintenance_types() {
        assert!(MaintenanceType::Preventive.is_scheduled());
        assert!(MaintenanceType::Seasonal.is_scheduled());
        assert!(!MaintenanceType::Corrective.is_scheduled());
        assert!(MaintenanceType::Setup.is_event_related());
        assert!(!MaintenanceType::Inspection.is_event_related());
        assert_eq!(MaintenanceType::Upgrade.label(), "Mejora");
        assert_eq!(
            MaintenanceType::PostEvent.description(),
            "Revisión después de carrera o test"
        );
        assert_eq!(color_for(LookupKind::MaintenanceType, "WASH"), BadgeColor::Default);
    }
}
