use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use wards::{JsonFileStore, PatientForm, StoreError, WardError, WardSession, WardsConfig};

fn setup_test_environment() -> (TempDir, WardsConfig) {
    let temp_dir = TempDir::new().unwrap();
    let config = WardsConfig {
        bed_count: 4,
        state_dir: temp_dir.path().join("ward-state"),
    };
    (temp_dir, config)
}

fn open(config: &WardsConfig) -> Result<WardSession, WardError> {
    WardSession::open(config, JsonFileStore::new(&config.state_dir))
}

fn read_json(config: &WardsConfig, key: &str) -> Value {
    let content = fs::read_to_string(config.state_dir.join(format!("{key}.json"))).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn given_fresh_dir_when_opened_then_default_roster_and_nothing_written() {
    let (_temp_dir, config) = setup_test_environment();
    let ward = open(&config).unwrap();
    assert!(ward.queue().is_empty());
    assert_eq!(ward.beds().len(), 4);
    assert_eq!(ward.beds().available_count(), 4);
    assert!(!config.state_dir.exists());
}

#[test]
fn given_mutations_when_reopened_then_state_survives() {
    let (_temp_dir, config) = setup_test_environment();
    {
        let mut ward = open(&config).unwrap();
        ward.add_patient(&PatientForm::new("1", "Ada", "2", "flu"))
            .unwrap();
        ward.add_patient(&PatientForm::new("2", "Bo", "1", "fracture"))
            .unwrap();
        ward.add_patient(&PatientForm::new("3", "Cy", "3", "rash"))
            .unwrap();
        ward.allocate_bed().unwrap();
    }

    let ward = open(&config).unwrap();
    let ids: Vec<u32> = ward.queue().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
    let bed = ward.beds().get(1).unwrap();
    assert_eq!(bed.patient().map(|p| p.name.as_str()), Some("Bo"));
}

#[test]
fn given_saved_state_then_files_use_record_field_names() {
    let (_temp_dir, config) = setup_test_environment();
    let mut ward = open(&config).unwrap();
    ward.add_patient(&PatientForm::new("5", "Eve", "1", "asthma"))
        .unwrap();
    ward.add_patient(&PatientForm::new("6", "Finn", "2", "cut"))
        .unwrap();
    ward.allocate_bed().unwrap();

    let patients = read_json(&config, "patients");
    let waiting = &patients[0];
    for field in ["id", "name", "priority", "condition", "admissionTime"] {
        assert!(waiting.get(field).is_some(), "missing {field}");
    }

    let beds = read_json(&config, "beds");
    assert_eq!(beds.as_array().unwrap().len(), 4);
    assert_eq!(beds[0]["bed_id"], 1);
    assert_eq!(beds[0]["occupied"], true);
    assert_eq!(beds[0]["patient"]["name"], "Eve");
    assert!(beds[0].get("allocationTime").is_some());
    assert_eq!(beds[1]["occupied"], false);
    assert_eq!(beds[1]["patient"], Value::Null);
    assert!(beds[1].get("allocationTime").is_none());
}

#[test]
fn given_discharge_when_reopened_then_patient_record_is_gone() {
    let (_temp_dir, config) = setup_test_environment();
    let mut ward = open(&config).unwrap();
    ward.add_patient(&PatientForm::new("9", "Ivy", "1", "burn"))
        .unwrap();
    ward.allocate_bed().unwrap();
    ward.discharge_bed("1").unwrap();

    let content = fs::read_to_string(config.state_dir.join("beds.json")).unwrap();
    assert!(!content.contains("Ivy"));
    let reopened = open(&config).unwrap();
    assert_eq!(reopened.beds().available_count(), 4);
}

#[test]
fn given_hand_written_unsorted_queue_when_opened_then_order_is_restored() {
    let (_temp_dir, config) = setup_test_environment();
    fs::create_dir_all(&config.state_dir).unwrap();
    fs::write(
        config.state_dir.join("patients.json"),
        r#"[
          { "id": 1, "name": "A", "priority": 3, "condition": "x", "admissionTime": "2024-01-01T08:00:00Z" },
          { "id": 2, "name": "B", "priority": 1, "condition": "y", "admissionTime": "2024-01-01T09:00:00Z" },
          { "id": 3, "name": "C", "priority": 1, "condition": "z", "admissionTime": "2024-01-01T08:30:00Z" }
        ]"#,
    )
    .unwrap();

    let ward = open(&config).unwrap();
    let ids: Vec<u32> = ward.queue().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn given_occupied_bed_without_patient_when_opened_then_corrupt_state() {
    let (_temp_dir, config) = setup_test_environment();
    fs::create_dir_all(&config.state_dir).unwrap();
    fs::write(
        config.state_dir.join("beds.json"),
        r#"[{ "bed_id": 1, "occupied": true, "patient": null }]"#,
    )
    .unwrap();

    let err = open(&config).err().unwrap();
    assert!(matches!(
        err,
        WardError::Store(StoreError::CorruptState { ref key, .. }) if key == "beds"
    ));
}

#[test]
fn given_malformed_file_when_opened_then_json_error() {
    let (_temp_dir, config) = setup_test_environment();
    fs::create_dir_all(&config.state_dir).unwrap();
    fs::write(config.state_dir.join("patients.json"), "not json").unwrap();

    let err = open(&config).err().unwrap();
    assert!(matches!(err, WardError::Store(StoreError::JsonError { .. })));
}

#[test]
fn given_same_patient_in_two_beds_when_opened_then_corrupt_state() {
    let (_temp_dir, config) = setup_test_environment();
    fs::create_dir_all(&config.state_dir).unwrap();
    let patient = r#"{ "id": 7, "name": "G", "priority": 1, "condition": "flu", "admissionTime": "2024-01-01T08:00:00Z" }"#;
    fs::write(
        config.state_dir.join("beds.json"),
        format!(
            r#"[
              {{ "bed_id": 1, "occupied": true, "patient": {patient}, "allocationTime": "2024-01-01T08:05:00Z" }},
              {{ "bed_id": 2, "occupied": true, "patient": {patient}, "allocationTime": "2024-01-01T08:06:00Z" }},
              {{ "bed_id": 3, "occupied": false, "patient": null }}
            ]"#
        ),
    )
    .unwrap();

    let err = open(&config).err().unwrap();
    assert!(matches!(
        err,
        WardError::Store(StoreError::CorruptState { ref key, ref message })
            if key == "beds" && message.contains("patient id 7")
    ));
}
