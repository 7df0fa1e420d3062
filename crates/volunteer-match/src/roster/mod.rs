//! CSV roster import used to seed the in-memory store and the CLI.

mod parser;

use crate::matching::{Event, Volunteer};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { value: String },
    InvalidUrgency { value: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidDate { value } => {
                write!(f, "invalid date '{}', expected YYYY-MM-DD", value)
            }
            RosterImportError::InvalidUrgency { value } => write!(
                f,
                "invalid urgency '{}', expected low, medium, high or critical",
                value
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidDate { .. } | RosterImportError::InvalidUrgency { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn volunteers_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<Volunteer>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::volunteers_from_reader(file)
    }

    /// Columns: `id,first_name,last_name,email,skills,availability,location,preferences,completed,active`.
    /// List columns are `;` separated.
    pub fn volunteers_from_reader<R: Read>(reader: R) -> Result<Vec<Volunteer>, RosterImportError> {
        parser::parse_volunteers(reader)
    }

    pub fn events_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Event>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::events_from_reader(file)
    }

    /// Columns: `id,name,description,location,required_skills,urgency,event_date,max_volunteers,current_volunteers`.
    /// `required_skills` accepts both `,` and `;` between skills.
    pub fn events_from_reader<R: Read>(reader: R) -> Result<Vec<Event>, RosterImportError> {
        parser::parse_events(reader)
    }
}
