//! Bed commands: allocate, discharge, beds, occupied

use anyhow::Result;
use serde::Serialize;
use wards::WardSession;

use crate::render;

#[derive(Serialize)]
struct OccupiedEntry<'a> {
    bed_id: u32,
    label: String,
    patient: &'a wards::Patient,
}

pub fn allocate(ward: &mut WardSession, json: bool) -> Result<()> {
    let allocated = ward.allocate_bed()?;
    super::report(&allocated.to_string(), json);
    if !json {
        println!();
        render::beds(ward.beds());
    }
    Ok(())
}

pub fn discharge(ward: &mut WardSession, bed: &str, json: bool) -> Result<()> {
    let discharged = ward.discharge_bed(bed)?;
    super::report(&discharged.to_string(), json);
    if !json {
        println!();
        render::beds(ward.beds());
    }
    Ok(())
}

pub fn list(ward: &WardSession, json: bool) -> Result<()> {
    if json {
        let beds: Vec<_> = ward.beds().iter().collect();
        println!("{}", serde_json::to_string_pretty(&beds)?);
    } else {
        render::beds(ward.beds());
    }
    Ok(())
}

pub fn occupied(ward: &WardSession, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = ward
            .beds()
            .occupied()
            .map(|(bed, occupant)| OccupiedEntry {
                bed_id: bed.id(),
                label: format!("Bed {} - {}", bed.id(), occupant.patient.name),
                patient: &occupant.patient,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        render::occupied(ward.beds());
    }
    Ok(())
}
