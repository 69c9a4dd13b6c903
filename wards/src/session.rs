//! The ward as one explicit piece of state.
//!
//! A [`WardSession`] owns the queue, the bed roster and the store they are
//! persisted to. Every change goes through it: validate, apply to a staged
//! copy, save, then commit.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::beds::{Allocated, Bed, BedRoster, Discharged};
use crate::clock::{Clock, SystemClock};
use crate::config::WardsConfig;
use crate::error::{Result, WardError};
use crate::patient::{Patient, PatientForm};
use crate::queue::PatientQueue;
use crate::store::{StateStore, StoreError};

pub const PATIENTS_KEY: &str = "patients";
pub const BEDS_KEY: &str = "beds";

/// Result of a successful `add_patient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub patient: Patient,
}

impl std::fmt::Display for Admitted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Patient {} added to queue. Priority: {}",
            self.patient.name, self.patient.priority
        )
    }
}

pub struct WardSession {
    queue: PatientQueue,
    beds: BedRoster,
    store: Box<dyn StateStore>,
    clock: Box<dyn Clock>,
}

impl WardSession {
    /// Load both collections from `store`, or start with an empty queue and
    /// `config.bed_count` free beds.
    #[instrument(skip_all, fields(bed_count = config.bed_count))]
    pub fn open<S: StateStore + 'static>(config: &WardsConfig, store: S) -> Result<Self> {
        let queue = match load_key::<Vec<Patient>>(&store, PATIENTS_KEY)? {
            Some(patients) => PatientQueue::from_stored(patients).map_err(|id| {
                StoreError::CorruptState {
                    key: PATIENTS_KEY.to_string(),
                    message: format!("patient id {id} appears more than once"),
                }
            })?,
            None => PatientQueue::new(),
        };

        let beds = match load_key::<Vec<Bed>>(&store, BEDS_KEY)? {
            Some(beds) => {
                let roster = BedRoster::from_stored(beds).map_err(|id| {
                    StoreError::CorruptState {
                        key: BEDS_KEY.to_string(),
                        message: format!("bed id {id} appears more than once"),
                    }
                })?;
                if roster.len() != config.bed_count as usize {
                    warn!(
                        "Stored roster has {} beds, configured {}; keeping the stored roster",
                        roster.len(),
                        config.bed_count
                    );
                }
                roster
            }
            None => {
                debug!("No stored roster, creating {} beds", config.bed_count);
                BedRoster::with_capacity(config.bed_count)
            }
        };

        let mut admitted = HashSet::new();
        if let Some((bed, o)) = beds.occupied().find(|(_, o)| !admitted.insert(o.patient.id)) {
            return Err(StoreError::CorruptState {
                key: BEDS_KEY.to_string(),
                message: format!(
                    "patient id {} is admitted to more than one bed (again in bed {})",
                    o.patient.id,
                    bed.id()
                ),
            }
            .into());
        }

        if let Some(p) = queue.iter().find(|p| beds.holds_patient(p.id)) {
            return Err(StoreError::CorruptState {
                key: PATIENTS_KEY.to_string(),
                message: format!("patient id {} is both queued and admitted", p.id),
            }
            .into());
        }

        info!(
            "Opened ward: {} waiting, {}/{} beds free",
            queue.len(),
            beds.available_count(),
            beds.len()
        );
        Ok(Self {
            queue,
            beds,
            store: Box::new(store),
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source used for new stamps.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn queue(&self) -> &PatientQueue {
        &self.queue
    }

    pub fn beds(&self) -> &BedRoster {
        &self.beds
    }

    pub fn peek_next(&self) -> Option<&Patient> {
        self.queue.peek_next()
    }

    /// Validate the raw form and queue the patient.
    ///
    /// Ids must be unique among waiting and admitted patients alike.
    #[instrument(skip_all, fields(id = %form.id.trim()))]
    pub fn add_patient(&mut self, form: &PatientForm) -> Result<Admitted> {
        let new = form.validate()?;
        if self.beds.holds_patient(new.id) {
            return Err(WardError::DuplicateId { id: new.id });
        }
        let patient = new.admit(self.clock.now());
        let admitted = self.commit(move |queue, _| {
            queue.add(patient.clone())?;
            Ok(Admitted { patient })
        })?;
        info!("{}", admitted);
        Ok(admitted)
    }

    /// Give the most urgent waiting patient the lowest-numbered free bed.
    #[instrument(skip_all)]
    pub fn allocate_bed(&mut self) -> Result<Allocated> {
        let now = self.clock.now();
        let allocated = self.commit(|queue, beds| beds.allocate(queue, now))?;
        info!("{}", allocated);
        Ok(allocated)
    }

    /// Free the bed named by the raw `bed` field and forget its patient.
    #[instrument(skip(self))]
    pub fn discharge_bed(&mut self, bed: &str) -> Result<Discharged> {
        let bed_id = bed
            .trim()
            .parse::<u32>()
            .map_err(|_| WardError::InvalidBed {
                bed: bed.trim().to_string(),
            })?;
        let discharged = self.commit(|_, beds| beds.discharge(bed_id))?;
        info!("{}", discharged);
        Ok(discharged)
    }

    /// Write both collections as they stand.
    pub fn save(&self) -> Result<()> {
        persist(self.store.as_ref(), &self.queue, &self.beds)
    }

    /// Run `op` on copies of both collections and keep the copies only once
    /// they have been saved.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut PatientQueue, &mut BedRoster) -> Result<T>,
    ) -> Result<T> {
        let mut queue = self.queue.clone();
        let mut beds = self.beds.clone();
        let out = op(&mut queue, &mut beds)?;
        persist(self.store.as_ref(), &queue, &beds)?;
        self.queue = queue;
        self.beds = beds;
        Ok(out)
    }
}

fn load_key<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .load(key)?
        .map(|value| {
            serde_json::from_value(value).map_err(|e| StoreError::CorruptState {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

fn persist(store: &dyn StateStore, queue: &PatientQueue, beds: &BedRoster) -> Result<()> {
    let encode = |key: &str, value: serde_json::Result<serde_json::Value>| {
        value.map_err(|e| StoreError::JsonError {
            key: key.to_string(),
            message: e.to_string(),
        })
    };
    let patients = encode(PATIENTS_KEY, serde_json::to_value(queue.as_slice()))?;
    let beds = encode(BEDS_KEY, serde_json::to_value(beds.as_slice()))?;
    store.save(PATIENTS_KEY, &patients)?;
    store.save(BEDS_KEY, &beds)?;
    Ok(())
}
