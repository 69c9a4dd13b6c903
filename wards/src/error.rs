use thiserror::Error;

use crate::store::StoreError;

/// Everything a ward operation can be rejected with.
///
/// All variants are recoverable: the caller shows the message and the
/// session stays usable.
#[derive(Error, Debug)]
pub enum WardError {
    #[error("Please fill all patient details ({field} is missing or invalid)")]
    Validation { field: &'static str },

    #[error("Patient ID {id} already exists")]
    DuplicateId { id: u32 },

    #[error("No patients in the queue.")]
    EmptyQueue,

    #[error("No available beds.")]
    NoBedAvailable,

    #[error("Please select a valid bed (got '{bed}')")]
    InvalidBed { bed: String },

    #[error("Bed {bed_id} is already available")]
    AlreadyAvailable { bed_id: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = WardError> = std::result::Result<T, E>;
