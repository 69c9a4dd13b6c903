//! Terminal output: message banners and tables.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use std::env;
use tabled::{settings::style::Style, Table, Tabled};
use wards::{Bed, BedRoster, Patient, PatientQueue};

#[derive(Debug, Tabled)]
struct QueueRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PRIORITY")]
    priority: i32,
    #[tabled(rename = "CONDITION")]
    condition: String,
    #[tabled(rename = "WAITING SINCE")]
    waiting_since: String,
}

#[derive(Debug, Tabled)]
struct BedRow {
    #[tabled(rename = "BED")]
    bed_id: u32,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PATIENT")]
    patient: String,
    #[tabled(rename = "PRIORITY")]
    priority: String,
    #[tabled(rename = "CONDITION")]
    condition: String,
    #[tabled(rename = "ALLOCATED")]
    allocated: String,
}

fn should_use_color(stream: atty::Stream) -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(stream)
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn success(message: &str) {
    if should_use_color(atty::Stream::Stdout) {
        println!("{}", message.green());
    } else {
        println!("{}", message);
    }
}

/// Report a failed command on stderr (or as a JSON object on stdout).
pub fn error(err: &anyhow::Error, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "error": err.to_string() }));
        return;
    }
    let text = format!("Error: {}", err);
    if should_use_color(atty::Stream::Stderr) {
        eprintln!("{}", text.red());
    } else {
        eprintln!("{}", text);
    }
}

pub fn queue(queue: &PatientQueue) {
    if queue.is_empty() {
        println!("Patient queue is empty.");
        return;
    }
    let rows: Vec<QueueRow> = queue
        .iter()
        .enumerate()
        .map(|(i, p)| QueueRow {
            position: i + 1,
            id: p.id,
            name: p.name.clone(),
            priority: p.priority,
            condition: p.condition.clone(),
            waiting_since: local_time(p.admission_time),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn next(patient: Option<&Patient>) {
    match patient {
        Some(p) => println!(
            "Next patient: {} (ID {}, priority {}, {}), waiting since {}",
            p.name,
            p.id,
            p.priority,
            p.condition,
            local_time(p.admission_time)
        ),
        None => println!("Patient queue is empty."),
    }
}

fn bed_row(bed: &Bed, color: bool) -> BedRow {
    let status = match (bed.is_occupied(), color) {
        (true, true) => "Occupied".red().to_string(),
        (true, false) => "Occupied".to_string(),
        (false, true) => "Available".green().to_string(),
        (false, false) => "Available".to_string(),
    };
    match bed.occupant() {
        Some(o) => BedRow {
            bed_id: bed.id(),
            status,
            patient: o.patient.name.clone(),
            priority: o.patient.priority.to_string(),
            condition: o.patient.condition.clone(),
            allocated: local_time(o.allocation_time),
        },
        None => BedRow {
            bed_id: bed.id(),
            status,
            patient: String::new(),
            priority: String::new(),
            condition: String::new(),
            allocated: String::new(),
        },
    }
}

pub fn beds(roster: &BedRoster) {
    let color = should_use_color(atty::Stream::Stdout);
    let rows: Vec<BedRow> = roster.iter().map(|b| bed_row(b, color)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "\n{} of {} beds available",
        roster.available_count(),
        roster.len()
    );
}

/// One line per occupied bed, as offered when picking a bed to discharge.
pub fn occupied(roster: &BedRoster) {
    let mut any = false;
    for (bed, occupant) in roster.occupied() {
        any = true;
        println!("Bed {} - {}", bed.id(), occupant.patient.name);
    }
    if !any {
        println!("No occupied beds.");
    }
}
