//! Queue commands: add, queue, next

use anyhow::Result;
use clap::Args;
use wards::{PatientForm, WardSession};

use crate::render;

/// Fields are passed through untouched; the ward validates them.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Patient ID (positive integer, unique on the ward)
    #[arg(long, default_value = "")]
    pub id: String,

    /// Patient name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Priority; 1 is the most urgent
    #[arg(long, default_value = "")]
    pub priority: String,

    /// Presenting condition
    #[arg(long, default_value = "")]
    pub condition: String,
}

impl From<AddArgs> for PatientForm {
    fn from(args: AddArgs) -> Self {
        PatientForm::new(args.id, args.name, args.priority, args.condition)
    }
}

pub fn add(ward: &mut WardSession, args: AddArgs, json: bool) -> Result<()> {
    let form = PatientForm::from(args);
    let admitted = ward.add_patient(&form)?;
    super::report(&admitted.to_string(), json);
    if !json {
        println!();
        render::queue(ward.queue());
    }
    Ok(())
}

pub fn queue(ward: &WardSession, json: bool) -> Result<()> {
    if json {
        let patients: Vec<_> = ward.queue().iter().collect();
        println!("{}", serde_json::to_string_pretty(&patients)?);
    } else {
        render::queue(ward.queue());
    }
    Ok(())
}

pub fn next(ward: &WardSession, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ward.peek_next())?);
    } else {
        render::next(ward.peek_next());
    }
    Ok(())
}
