use tracing::debug;

use crate::error::{Result, WardError};
use crate::patient::Patient;

/// Waiting list ordered by (priority asc, admission time asc).
///
/// Patients with an equal key keep their arrival order, so the result is
/// the same as appending and stable-sorting the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientQueue {
    patients: Vec<Patient>,
}

impl PatientQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from stored records, restoring the ordering.
    pub(crate) fn from_stored(mut patients: Vec<Patient>) -> Result<Self, u32> {
        patients.sort_by_key(Patient::urgency);
        let mut seen = std::collections::HashSet::new();
        for p in &patients {
            if !seen.insert(p.id) {
                return Err(p.id);
            }
        }
        Ok(Self { patients })
    }

    /// Insert behind every patient that is at least as urgent.
    pub fn add(&mut self, patient: Patient) -> Result<()> {
        if self.contains(patient.id) {
            return Err(WardError::DuplicateId { id: patient.id });
        }
        let key = patient.urgency();
        let at = self.patients.partition_point(|p| p.urgency() <= key);
        debug!(id = patient.id, position = at, "queued patient");
        self.patients.insert(at, patient);
        Ok(())
    }

    pub fn peek_next(&self) -> Option<&Patient> {
        self.patients.first()
    }

    pub fn remove_next(&mut self) -> Result<Patient> {
        if self.patients.is_empty() {
            return Err(WardError::EmptyQueue);
        }
        Ok(self.patients.remove(0))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.patients.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patient> {
        self.patients.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Patient] {
        &self.patients
    }
}

impl<'a> IntoIterator for &'a PatientQueue {
    type Item = &'a Patient;
    type IntoIter = std::slice::Iter<'a, Patient>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
