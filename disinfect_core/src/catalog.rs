//! Program catalog: which disinfection programs exist and how long they run.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::DeviceError;
use crate::util::days_to_secs;

/// Program identifier as shown on the device (1-based).
pub type ProgramId = u8;

/// How a program's duration is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum DurationRule {
    /// Fixed number of days.
    FixedDays(u32),
    /// Duration taken from the device's custom-day setting.
    Custom,
}

impl DurationRule {
    /// Duration in seconds, resolving `Custom` against `custom_days`.
    pub fn duration_secs(self, custom_days: u32) -> u64 {
        match self {
            DurationRule::FixedDays(days) => days_to_secs(days),
            DurationRule::Custom => days_to_secs(custom_days),
        }
    }

    pub fn is_custom(self) -> bool {
        matches!(self, DurationRule::Custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub rule: DurationRule,
}

/// Reference to a program as it arrives over the wire: either the numeric id
/// or a display name such as "Program 4".
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum ProgramRef {
    Id(u64),
    Name(String),
}

impl From<ProgramId> for ProgramRef {
    fn from(id: ProgramId) -> Self {
        ProgramRef::Id(u64::from(id))
    }
}

impl std::fmt::Display for ProgramRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramRef::Id(id) => write!(f, "{id}"),
            ProgramRef::Name(name) => f.write_str(name),
        }
    }
}

/// Immutable set of programs plus the default selection.
#[derive(Debug, Clone)]
pub struct ProgramCatalog {
    programs: Vec<Program>,
    default_id: ProgramId,
}

impl Default for ProgramCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProgramCatalog {
    /// Factory catalog: 7, 14, 21 days and a custom slot; program 2 is the default.
    pub fn standard() -> Self {
        let fixed = |id: ProgramId, days: u32| Program {
            id,
            name: format!("Program {id}"),
            rule: DurationRule::FixedDays(days),
        };
        Self {
            programs: vec![
                fixed(1, 7),
                fixed(2, 14),
                fixed(3, 21),
                Program {
                    id: 4,
                    name: "Program 4".to_string(),
                    rule: DurationRule::Custom,
                },
            ],
            default_id: 2,
        }
    }

    /// Build a catalog, checking ids are unique, fixed durations are non-zero
    /// and the default exists.
    pub fn new(programs: Vec<Program>, default_id: ProgramId) -> Result<Self, DeviceError> {
        if programs.is_empty() {
            return Err(DeviceError::Config("program catalog is empty".into()));
        }
        let mut seen = HashSet::new();
        for p in &programs {
            if !seen.insert(p.id) {
                return Err(DeviceError::Config(format!("duplicate program id {}", p.id)));
            }
            if p.rule == DurationRule::FixedDays(0) {
                return Err(DeviceError::Config(format!(
                    "program {} has a zero-day duration",
                    p.id
                )));
            }
        }
        if !seen.contains(&default_id) {
            return Err(DeviceError::Config(format!(
                "default program {default_id} is not in the catalog"
            )));
        }
        Ok(Self {
            programs,
            default_id,
        })
    }

    /// Look up a program by id.
    pub fn get(&self, id: ProgramId) -> Result<&Program, DeviceError> {
        self.programs
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DeviceError::UnknownProgram(id.to_string()))
    }

    /// Resolve a wire reference: numeric id, numeric string, or display name
    /// (case-insensitive).
    pub fn resolve(&self, r: &ProgramRef) -> Result<&Program, DeviceError> {
        let unknown = || DeviceError::UnknownProgram(r.to_string());
        match r {
            ProgramRef::Id(id) => {
                let id = ProgramId::try_from(*id).map_err(|_| unknown())?;
                self.get(id).map_err(|_| unknown())
            }
            ProgramRef::Name(name) => {
                let name = name.trim();
                if let Ok(id) = name.parse::<ProgramId>() {
                    return self.get(id).map_err(|_| unknown());
                }
                self.programs
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
                    .ok_or_else(unknown)
            }
        }
    }

    pub fn default_id(&self) -> ProgramId {
        self.default_id
    }

    pub fn default_program(&self) -> &Program {
        // `new` guarantees the default exists.
        self.programs
            .iter()
            .find(|p| p.id == self.default_id)
            .unwrap_or(&self.programs[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
