//! Ward admission queue and bed allocation.
//!
//! Patients wait in a [`PatientQueue`] ordered by urgency and are moved into
//! the lowest-numbered free bed of a fixed [`BedRoster`]. A [`WardSession`]
//! owns both and persists them through a [`StateStore`] after every change.

pub mod beds;
pub mod clock;
pub mod config;
pub mod error;
pub mod patient;
pub mod queue;
pub mod session;
pub mod store;

pub use beds::{Allocated, Bed, BedRoster, Discharged, Occupant};
pub use clock::{Clock, SystemClock};
pub use config::WardsConfig;
pub use error::{Result, WardError};
pub use patient::{NewPatient, Patient, PatientForm};
pub use queue::PatientQueue;
pub use session::{Admitted, WardSession};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError};
