//! Enumeration types for the Aurelia simulator.

use serde::{Deserialize, Serialize};

/// A segment of the repeating jellyfish life cycle.
///
/// Phases occur in a fixed order within one cycle; after the final phase
/// the cycle wraps and the subject returns to the polyp stage. Each phase
/// carries a configured duration and growth rate in the phase table owned
/// by the life clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Sessile stage anchored to the substrate. Not visible as a swimmer.
    Polyp,
    /// Juvenile free-swimming stage, not yet jellyfish-shaped.
    Ephyra,
    /// Adult free-swimming stage.
    Medusa,
    /// Late adult stage preparing to revert to a polyp.
    MedusaEnd,
}

impl Phase {
    /// Human-readable display label for the phase.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Polyp => "polyp",
            Self::Ephyra => "ephyra",
            Self::Medusa => "medusa",
            Self::MedusaEnd => "preparing to return to polyp",
        }
    }

    /// Canonical configuration name for the phase (`snake_case`).
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Polyp => "polyp",
            Self::Ephyra => "ephyra",
            Self::Medusa => "medusa",
            Self::MedusaEnd => "medusa_end",
        }
    }

    /// Whether the jellyfish swims freely during this phase.
    ///
    /// The polyp is anchored; every other phase drifts around the tank.
    pub const fn is_free_swimming(self) -> bool {
        !matches!(self, Self::Polyp)
    }

    /// Parse a configuration name into a phase.
    ///
    /// Accepts the canonical `snake_case` names plus the `medusaEnd`
    /// spelling found in older configuration files. Returns `None` for
    /// unknown names.
    pub fn from_config_name(name: &str) -> Option<Self> {
        match name.trim() {
            "polyp" => Some(Self::Polyp),
            "ephyra" => Some(Self::Ephyra),
            "medusa" => Some(Self::Medusa),
            "medusa_end" | "medusaEnd" => Some(Self::MedusaEnd),
            _ => None,
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.config_name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&Phase::MedusaEnd).unwrap();
        assert_eq!(json, "\"medusa_end\"");
        let back: Phase = serde_json::from_str("\"polyp\"").unwrap();
        assert_eq!(back, Phase::Polyp);
    }

    #[test]
    fn only_polyp_is_sessile() {
        assert!(!Phase::Polyp.is_free_swimming());
        assert!(Phase::Ephyra.is_free_swimming());
        assert!(Phase::Medusa.is_free_swimming());
        assert!(Phase::MedusaEnd.is_free_swimming());
    }

    #[test]
    fn display_matches_config_name() {
        assert_eq!(Phase::MedusaEnd.to_string(), "medusa_end");
        assert_eq!(Phase::Ephyra.to_string(), "ephyra");
    }

    #[test]
    fn config_name_parse_roundtrips() {
        for phase in [Phase::Polyp, Phase::Ephyra, Phase::Medusa, Phase::MedusaEnd] {
            assert_eq!(Phase::from_config_name(phase.config_name()), Some(phase));
        }
    }

    #[test]
    fn legacy_medusa_end_spelling_is_accepted() {
        assert_eq!(Phase::from_config_name("medusaEnd"), Some(Phase::MedusaEnd));
        assert_eq!(Phase::from_config_name("larva"), None);
    }
}
