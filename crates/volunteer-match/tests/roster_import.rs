use chrono::NaiveDate;
use serde_json::json;
use volunteer_match::matching::{RequiredSkills, Urgency};
use volunteer_match::roster::{RosterImportError, RosterImporter};

const EVENT_HEADER: &str =
    "id,name,description,location,required_skills,urgency,event_date,max_volunteers,current_volunteers\n";

#[test]
fn volunteers_import_list_columns_and_flags() {
    let csv = "\
id,first_name,last_name,email,skills,availability,location,preferences,completed,active
7, Morgan , Lee ,morgan@example.org, First Aid ; Cooking ;,2025-11-10; 2025-12-01,TX,shelter;food,no,0
8,,,solo@example.org,,,,,,
";

    let volunteers = RosterImporter::volunteers_from_reader(csv.as_bytes()).expect("import succeeds");
    assert_eq!(volunteers.len(), 2);

    let morgan = &volunteers[0];
    assert_eq!(morgan.display_name(), "Morgan Lee");
    assert_eq!(
        morgan.skills.iter().cloned().collect::<Vec<_>>(),
        vec!["Cooking".to_string(), "First Aid".to_string()]
    );
    assert!(morgan
        .availability
        .contains(&NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date")));
    assert_eq!(morgan.preferences, vec!["shelter", "food"]);
    assert!(!morgan.completed);
    assert!(!morgan.active);

    let solo = &volunteers[1];
    assert_eq!(solo.display_name(), "solo@example.org");
    assert!(solo.skills.is_empty());
    assert!(!solo.completed);
    assert!(solo.active, "blank active column defaults to active");
}

#[test]
fn events_import_normalizes_required_skills_and_urgency() {
    let csv = format!(
        "{EVENT_HEADER}\
20,Beach Cleanup,,\"Galveston, TX\",\" Teamwork , ,Lifting \",HIGH,2025-11-15,10,3\n\
21,Tutoring,,Online,,,2025-11-20,4,\n"
    );

    let events = RosterImporter::events_from_reader(csv.as_bytes()).expect("import succeeds");
    assert_eq!(events.len(), 2);

    assert_eq!(
        events[0].required_skills,
        RequiredSkills::new(["Lifting", "Teamwork"])
    );
    assert_eq!(events[0].urgency, Urgency::High);
    assert_eq!(events[0].current_volunteers, 3);
    assert!(!events[0].is_full());

    assert!(events[1].required_skills.is_empty());
    assert_eq!(events[1].urgency, Urgency::Medium);
    assert_eq!(events[1].current_volunteers, 0);
}

#[test]
fn events_import_accepts_semicolons_in_required_skills() {
    let csv = format!(
        "{EVENT_HEADER}\
22,Shelter Intake,,\"Austin, TX\",First Aid;Teamwork,medium,2025-11-18,6,0\n\
23,Warehouse Shift,,\"Austin, TX\",\"Lifting; Driving,Forklift\",,2025-11-19,6,0\n"
    );

    let events = RosterImporter::events_from_reader(csv.as_bytes()).expect("import succeeds");

    assert_eq!(
        events[0].required_skills,
        RequiredSkills::new(["First Aid", "Teamwork"])
    );
    assert_eq!(events[1].required_skills.len(), 3);
    assert!(events[1].required_skills.contains("Driving"));
}

#[test]
fn events_import_rejects_bad_dates_and_urgency() {
    let bad_date = format!("{EVENT_HEADER}30,Drive,,TX,,low,11/15/2025,3,0\n");
    match RosterImporter::events_from_reader(bad_date.as_bytes()) {
        Err(RosterImportError::InvalidDate { value }) => assert_eq!(value, "11/15/2025"),
        other => panic!("expected invalid date, got {other:?}"),
    }

    let bad_urgency = format!("{EVENT_HEADER}31,Drive,,TX,,urgent,2025-11-15,3,0\n");
    assert!(matches!(
        RosterImporter::events_from_reader(bad_urgency.as_bytes()),
        Err(RosterImportError::InvalidUrgency { .. })
    ));

    let bad_capacity = format!("{EVENT_HEADER}32,Drive,,TX,,low,2025-11-15,many,0\n");
    assert!(matches!(
        RosterImporter::events_from_reader(bad_capacity.as_bytes()),
        Err(RosterImportError::Csv(_))
    ));
}

#[test]
fn volunteers_import_rejects_unknown_flags() {
    let csv = "\
id,first_name,last_name,email,skills,availability,location,preferences,completed,active
9,Kai,Ng,kai@example.org,,,,,maybe,
";
    let err = RosterImporter::volunteers_from_reader(csv.as_bytes()).expect_err("flag rejected");
    assert!(matches!(err, RosterImportError::Csv(_)));
    assert!(err.to_string().contains("invalid roster CSV data"));
}

#[test]
fn missing_files_surface_io_errors() {
    assert!(matches!(
        RosterImporter::volunteers_from_path("does/not/exist.csv"),
        Err(RosterImportError::Io(_))
    ));
}

#[test]
fn stored_skill_values_collapse_to_one_shape() {
    assert_eq!(
        RequiredSkills::from_value(&json!(["First Aid", 3, null, "Teamwork"])),
        RequiredSkills::new(["First Aid", "Teamwork"])
    );
    assert_eq!(
        RequiredSkills::from_value(&json!("First Aid, Teamwork")),
        RequiredSkills::new(["Teamwork", "First Aid"])
    );
    assert!(RequiredSkills::from_value(&json!({ "skill": "First Aid" })).is_empty());
    assert!(RequiredSkills::from_value(&json!(42)).is_empty());
}
