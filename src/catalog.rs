use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Whether a tournament's results can still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Archived,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentDescriptor {
    pub name: String,
    pub path: String,
    pub region: String,
    pub year: u16,
    #[serde(default)]
    pub live: bool,
}

impl TournamentDescriptor {
    pub fn new(name: &str, path: &str, region: &str, year: u16, live: bool) -> Self {
        TournamentDescriptor {
            name: name.to_string(),
            path: path.to_string(),
            region: region.to_string(),
            year,
            live,
        }
    }

    pub fn mutability(&self) -> Mutability {
        if self.live {
            Mutability::Live
        } else {
            Mutability::Archived
        }
    }
}

/// The fixed set of tournaments a session can choose from. Built once at
/// startup and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    tournaments: Vec<TournamentDescriptor>,
}

impl Catalog {
    pub fn new(tournaments: Vec<TournamentDescriptor>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for t in &tournaments {
            if t.name.trim().is_empty() {
                return Err(AppError::ConfigError("Tournament name must not be empty".to_string()));
            }
            if t.path.trim().is_empty() {
                return Err(AppError::ConfigError(format!("Tournament {} has an empty path", t.name)));
            }
            if !seen.insert(t.name.as_str()) {
                return Err(AppError::ConfigError(format!("Duplicate tournament: {}", t.name)));
            }
        }
        Ok(Catalog { tournaments })
    }

    pub fn builtin() -> Self {
        Catalog {
            tournaments: vec![
                TournamentDescriptor::new("MPL ID Season 14", "MPL/Indonesia/Season_14", "Indonesia", 2024, false),
                TournamentDescriptor::new("MPL PH Season 13", "MPL/Philippines/Season_13", "Philippines", 2024, false),
                TournamentDescriptor::new("MSC 2024", "MSC/2024", "International", 2024, false),
                TournamentDescriptor::new("MPL ID Season 15", "MPL/Indonesia/Season_15", "Indonesia", 2025, false),
                TournamentDescriptor::new("MPL PH Season 15", "MPL/Philippines/Season_15", "Philippines", 2025, false),
                TournamentDescriptor::new("MPL ID Season 16", "MPL/Indonesia/Season_16", "Indonesia", 2025, true),
                TournamentDescriptor::new("MPL PH Season 16", "MPL/Philippines/Season_16", "Philippines", 2025, true),
                TournamentDescriptor::new("MPL MY Season 16", "MPL/Malaysia/Season_16", "Malaysia", 2025, true),
                TournamentDescriptor::new("VMC 2025 Winter", "Vietnam_MLBB_Championship/2025/Winter", "Vietnam", 2025, true),
                TournamentDescriptor::new("MPL MENA S8", "MPL/MENA/Season_8", "MENA", 2025, true),
                TournamentDescriptor::new("MCC S6", "MLBB_Continental_Championships/Season_6", "EECA", 2025, true),
                TournamentDescriptor::new("China Masters 2025", "MLBB_China_Masters/2025", "China", 2025, true),
                TournamentDescriptor::new("MTC S5", "MTC_Turkiye_Championship/Season_5", "Turkey", 2025, true),
            ],
        }
    }

    /// Reads a JSON array of tournament entries.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let tournaments: Vec<TournamentDescriptor> = serde_json::from_str(&content).map_err(|e| {
            AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Self::new(tournaments)
    }

    pub fn get(&self, name: &str) -> Option<&TournamentDescriptor> {
        self.tournaments.iter().find(|t| t.name == name)
    }

    pub fn tournaments(&self) -> &[TournamentDescriptor] {
        &self.tournaments
    }

    pub fn names(&self) -> Vec<String> {
        self.tournaments.iter().map(|t| t.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_classifies_tournaments() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tournaments().len(), 13);

        let msc = catalog.get("MSC 2024").unwrap();
        assert_eq!(msc.path, "MSC/2024");
        assert_eq!(msc.mutability(), Mutability::Archived);

        let vmc = catalog.get("VMC 2025 Winter").unwrap();
        assert_eq!(vmc.mutability(), Mutability::Live);

        assert!(catalog.get("MPL SG Season 1").is_none());
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = Catalog::builtin();
        assert!(Catalog::new(builtin.tournaments().to_vec()).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Catalog::new(vec![
            TournamentDescriptor::new("MSC 2024", "MSC/2024", "International", 2024, false),
            TournamentDescriptor::new("MSC 2024", "MSC/2024_Qualifier", "International", 2024, false),
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "MPL SG Season 9", "path": "MPL/Singapore/Season_9", "region": "Singapore", "year": 2025, "live": true}},
                {{"name": "MSC 2023", "path": "MSC/2023", "region": "International", "year": 2023}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.names(), vec!["MPL SG Season 9", "MSC 2023"]);
        assert_eq!(catalog.get("MSC 2023").unwrap().mutability(), Mutability::Archived);
    }
}
