use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WardError};

/// A patient waiting in the queue or lying in a bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u32,
    pub name: String,
    /// Lower is more urgent; 1 is the most urgent.
    pub priority: i32,
    pub condition: String,
    #[serde(rename = "admissionTime")]
    pub admission_time: DateTime<Utc>,
}

impl Patient {
    /// Key the queue is ordered by.
    pub fn urgency(&self) -> (i32, DateTime<Utc>) {
        (self.priority, self.admission_time)
    }
}

/// Raw field values as typed by the user, before any validation.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub id: String,
    pub name: String,
    pub priority: String,
    pub condition: String,
}

/// A form that passed validation and only lacks its admission stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub id: u32,
    pub name: String,
    pub priority: i32,
    pub condition: String,
}

impl NewPatient {
    pub fn admit(self, at: DateTime<Utc>) -> Patient {
        Patient {
            id: self.id,
            name: self.name,
            priority: self.priority,
            condition: self.condition,
            admission_time: at,
        }
    }
}

impl PatientForm {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        priority: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority: priority.into(),
            condition: condition.into(),
        }
    }

    /// Trim and parse every field.
    ///
    /// Ids must be positive whole numbers and priorities whole numbers; `0`,
    /// negative ids and trailing text such as `12abc` are rejected rather than
    /// truncated to their leading digits.
    pub fn validate(&self) -> Result<NewPatient> {
        let id = self
            .id
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(WardError::Validation { field: "id" })?;
        let name = required(&self.name, "name")?;
        let priority = self
            .priority
            .trim()
            .parse::<i32>()
            .map_err(|_| WardError::Validation { field: "priority" })?;
        let condition = required(&self.condition, "condition")?;
        Ok(NewPatient {
            id,
            name,
            priority,
            condition,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WardError::Validation { field });
    }
    Ok(trimmed.to_string())
}
