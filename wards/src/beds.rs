use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WardError};
use crate::patient::Patient;
use crate::queue::PatientQueue;

/// Who is lying in a bed and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub patient: Patient,
    pub allocation_time: DateTime<Utc>,
}

/// One slot of the roster. Occupancy and the patient travel together, so a
/// bed can never claim to be occupied without someone in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BedRecord", into = "BedRecord")]
pub struct Bed {
    bed_id: u32,
    occupant: Option<Occupant>,
}

/// Stored shape of a bed.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BedRecord {
    bed_id: u32,
    occupied: bool,
    patient: Option<Patient>,
    #[serde(
        rename = "allocationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    allocation_time: Option<DateTime<Utc>>,
}

impl TryFrom<BedRecord> for Bed {
    type Error = String;

    fn try_from(r: BedRecord) -> std::result::Result<Self, Self::Error> {
        let occupant = match (r.occupied, r.patient) {
            (false, None) => None,
            (true, Some(patient)) => {
                // Records written without a stamp fall back to the admission time.
                let allocation_time = r.allocation_time.unwrap_or(patient.admission_time);
                Some(Occupant {
                    patient,
                    allocation_time,
                })
            }
            (true, None) => return Err(format!("bed {} is occupied but has no patient", r.bed_id)),
            (false, Some(_)) => {
                return Err(format!("bed {} is available but holds a patient", r.bed_id))
            }
        };
        Ok(Bed {
            bed_id: r.bed_id,
            occupant,
        })
    }
}

impl From<Bed> for BedRecord {
    fn from(b: Bed) -> Self {
        let occupied = b.occupant.is_some();
        let (patient, allocation_time) = match b.occupant {
            Some(o) => (Some(o.patient), Some(o.allocation_time)),
            None => (None, None),
        };
        BedRecord {
            bed_id: b.bed_id,
            occupied,
            patient,
            allocation_time,
        }
    }
}

impl Bed {
    pub fn available(bed_id: u32) -> Self {
        Self {
            bed_id,
            occupant: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.bed_id
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        self.occupant.as_ref()
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.occupant.as_ref().map(|o| &o.patient)
    }
}

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocated {
    pub bed_id: u32,
    pub patient: Patient,
}

impl std::fmt::Display for Allocated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Patient {} allocated to Bed {}",
            self.patient.name, self.bed_id
        )
    }
}

/// Result of a successful discharge. The patient record is dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discharged {
    pub bed_id: u32,
    pub patient_name: String,
}

impl std::fmt::Display for Discharged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bed {} discharged. Patient {} has left.",
            self.bed_id, self.patient_name
        )
    }
}

/// Fixed set of beds, kept in ascending `bed_id` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRoster {
    beds: Vec<Bed>,
}

impl BedRoster {
    /// `count` available beds numbered `1..=count`.
    pub fn with_capacity(count: u32) -> Self {
        Self {
            beds: (1..=count).map(Bed::available).collect(),
        }
    }

    /// Rebuild a roster from stored records. Fails on a repeated bed id.
    pub(crate) fn from_stored(mut beds: Vec<Bed>) -> Result<Self, u32> {
        beds.sort_by_key(Bed::id);
        if let Some(w) = beds.windows(2).find(|w| w[0].bed_id == w[1].bed_id) {
            return Err(w[0].bed_id);
        }
        Ok(Self { beds })
    }

    /// Move the head of the queue into the lowest-numbered free bed.
    ///
    /// Nothing changes unless both a patient and a bed are available.
    pub fn allocate(&mut self, queue: &mut PatientQueue, at: DateTime<Utc>) -> Result<Allocated> {
        if queue.is_empty() {
            return Err(WardError::EmptyQueue);
        }
        let bed = self
            .beds
            .iter_mut()
            .filter(|b| !b.is_occupied())
            .min_by_key(|b| b.bed_id)
            .ok_or(WardError::NoBedAvailable)?;
        let patient = queue.remove_next()?;
        debug!(bed_id = bed.bed_id, patient_id = patient.id, "allocating bed");
        bed.occupant = Some(Occupant {
            patient: patient.clone(),
            allocation_time: at,
        });
        Ok(Allocated {
            bed_id: bed.bed_id,
            patient,
        })
    }

    pub fn discharge(&mut self, bed_id: u32) -> Result<Discharged> {
        let bed = self
            .beds
            .iter_mut()
            .find(|b| b.bed_id == bed_id)
            .ok_or_else(|| WardError::InvalidBed {
                bed: bed_id.to_string(),
            })?;
        let occupant = bed
            .occupant
            .take()
            .ok_or(WardError::AlreadyAvailable { bed_id })?;
        debug!(bed_id, patient_id = occupant.patient.id, "discharged bed");
        Ok(Discharged {
            bed_id,
            patient_name: occupant.patient.name,
        })
    }

    pub fn get(&self, bed_id: u32) -> Option<&Bed> {
        self.beds.iter().find(|b| b.bed_id == bed_id)
    }

    /// Occupied beds in ascending id order; this is what a discharge picker offers.
    pub fn occupied(&self) -> impl Iterator<Item = (&Bed, &Occupant)> {
        self.beds
            .iter()
            .filter_map(|b| b.occupant.as_ref().map(|o| (b, o)))
    }

    pub fn holds_patient(&self, id: u32) -> bool {
        self.occupied().any(|(_, o)| o.patient.id == id)
    }

    pub fn available_count(&self) -> usize {
        self.beds.iter().filter(|b| !b.is_occupied()).count()
    }

    pub fn len(&self) -> usize {
        self.beds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bed> {
        self.beds.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Bed] {
        &self.beds
    }
}

impl Default for BedRoster {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_BED_COUNT)
    }
}

impl<'a> IntoIterator for &'a BedRoster {
    type Item = &'a Bed;
    type IntoIter = std::slice::Iter<'a, Bed>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
