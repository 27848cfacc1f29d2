//! Observables declared in the header section
use std::str::FromStr;

use gnss_rs::prelude::Constellation;
use itertools::Itertools;
use log::warn;

use crate::{constants::HeaderLayout, error::ParsingError, fixed_field};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Loss of lock indicator column suffix
pub const LLI_SUFFIX: &str = "_LLI";

/// Signal strength indicator column suffix
pub const SSI_SUFFIX: &str = "_SSI";

/// Returns the (value, LLI, SSI) column names of this observable
pub fn triple_names(code: &str) -> [String; 3] {
    [
        code.to_string(),
        format!("{}{}", code, LLI_SUFFIX),
        format!("{}{}", code, SSI_SUFFIX),
    ]
}

/// Ordered list of observables, as declared in the header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservableList {
    /// Number of observables the header announces
    pub declared: usize,
    /// Observable codes, in order of appearance
    pub codes: Vec<String>,
}

impl ObservableList {
    /// Returns true if announced and listed observables agree
    pub fn is_consistent(&self) -> bool {
        self.declared == self.codes.len()
    }
    /// Number of fields an observation record may hold
    pub fn width(&self) -> usize {
        self.declared.max(self.codes.len())
    }
    /// (value, LLI, SSI) column names, in order of declaration
    pub fn columns(&self) -> Vec<String> {
        self.codes
            .iter()
            .flat_map(|code| triple_names(code))
            .collect()
    }
    fn from_tokens<'a>(
        counter: &str,
        codes: impl Iterator<Item = &'a str>,
    ) -> Result<Self, ParsingError> {
        let declared = counter
            .parse::<usize>()
            .map_err(|_| ParsingError::ObservableCount(counter.to_string()))?;
        Ok(Self {
            declared,
            codes: codes.map(|code| code.to_string()).collect(),
        })
    }
}

/// Observables of one GNSS system (RINEX 3/4)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemObservables {
    /// System code, as found in the PRN first letter
    pub system: char,
    /// [ObservableList] of this system
    pub list: ObservableList,
}

impl SystemObservables {
    /// Returns the [Constellation] this system code stands for
    pub fn constellation(&self) -> Option<Constellation> {
        Constellation::from_str(&self.system.to_string()).ok()
    }
    /// Column names of a record of this system: `prn` then
    /// one (value, LLI, SSI) triple per observable.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["prn".to_string()];
        columns.extend(self.list.columns());
        columns
    }
}

/// [ObservableCatalog] describes the content of every observation record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObservableCatalog {
    /// RINEX 2: one list shared by all satellites
    V2(ObservableList),
    /// RINEX 3/4: one list per system, in order of declaration
    V3(Vec<SystemObservables>),
}

impl ObservableCatalog {
    /// Builds the RINEX 2 catalog from all `# / TYPES OF OBSERV` lines
    pub fn from_v2_lines(lines: &[&str]) -> Result<Self, ParsingError> {
        let content = lines
            .iter()
            .map(|line| fixed_field(line, 0, HeaderLayout::DATA_WIDTH))
            .join(" ");

        let mut tokens = content.split_ascii_whitespace();

        let counter = tokens.next().ok_or(ParsingError::NoObservables)?;
        let list = ObservableList::from_tokens(counter, tokens)?;

        if list.codes.is_empty() {
            return Err(ParsingError::NoObservables);
        }

        if !list.is_consistent() {
            warn!(
                "{} observables announced, {} listed: {:?}",
                list.declared,
                list.codes.len(),
                list.codes
            );
        }

        Ok(Self::V2(list))
    }

    /// Builds the RINEX 3/4 catalog from all `SYS / # / OBS TYPES` lines.
    /// Lines starting with a blank continue the previous system.
    pub fn from_v3_lines(lines: &[&str]) -> Result<Self, ParsingError> {
        let mut merged = Vec::<String>::with_capacity(lines.len());

        for line in lines {
            let content = fixed_field(line, 0, HeaderLayout::DATA_WIDTH);
            if content.starts_with(' ') {
                match merged.last_mut() {
                    Some(previous) => {
                        previous.push(' ');
                        previous.push_str(content);
                    },
                    None => return Err(ParsingError::MalformedHeader),
                }
            } else if !content.trim().is_empty() {
                merged.push(content.to_string());
            }
        }

        let mut systems = Vec::<SystemObservables>::with_capacity(merged.len());

        for content in merged.iter() {
            let mut tokens = content.split_ascii_whitespace();

            let system = tokens
                .next()
                .and_then(|code| code.chars().next())
                .ok_or(ParsingError::MalformedHeader)?;

            let counter = tokens
                .next()
                .ok_or_else(|| ParsingError::ObservableCount(content.to_string()))?;

            let list = ObservableList::from_tokens(counter, tokens)?;

            if !list.is_consistent() {
                warn!(
                    "{}: {} observables announced, {} listed: {:?}",
                    system,
                    list.declared,
                    list.codes.len(),
                    list.codes
                );
            }

            let observables = SystemObservables { system, list };

            match systems.iter_mut().find(|sys| sys.system == system) {
                Some(existing) => {
                    warn!("{}: observables declared twice", system);
                    *existing = observables;
                },
                None => systems.push(observables),
            }
        }

        if systems.is_empty() {
            return Err(ParsingError::NoObservables);
        }

        Ok(Self::V3(systems))
    }

    /// Largest number of fields an observation record may hold
    pub fn nobs_max(&self) -> usize {
        match self {
            Self::V2(list) => list.width(),
            Self::V3(systems) => systems
                .iter()
                .map(|sys| sys.list.width())
                .max()
                .unwrap_or(0),
        }
    }

    /// Returns [SystemObservables] for given system code (RINEX 3/4 only)
    pub fn system(&self, code: char) -> Option<&SystemObservables> {
        match self {
            Self::V2(_) => None,
            Self::V3(systems) => systems.iter().find(|sys| sys.system == code),
        }
    }

    /// Returns the shared [ObservableList] (RINEX 2 only)
    pub fn shared(&self) -> Option<&ObservableList> {
        match self {
            Self::V2(list) => Some(list),
            Self::V3(_) => None,
        }
    }
}
