use std::fs;

use maximarket_project::{ProjectError, ProjectStore};
use serde_json::Value;
use tempfile::TempDir;

use super::sample_project;

#[test]
fn test_save_writes_legacy_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("centre.json");
    ProjectStore::new().save(&sample_project(), &path).unwrap();

    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["nom_projet"], "Centre");
    assert_eq!(value["nom_magasin"], "MaxiMarket Centre");
    assert_eq!(value["chemin_plan"], "plan.png");
    assert_eq!(value["nb_rangs"], 24);
    assert_eq!(value["nb_rayons"], 47);
    assert_eq!(value["placements"]["15,1"], "Soda");
    assert_eq!(value["produits_magasin"].as_array().unwrap().len(), 4);
}

#[test]
fn test_invalid_project_leaves_previous_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("centre.json");
    let store = ProjectStore::new();
    store.save(&sample_project(), &path).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let mut broken = sample_project();
    broken.plan_path = Default::default();
    let err = store.save(&broken, &path).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_unwritable_destination_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent").join("centre.json");
    let err = ProjectStore::new().save(&sample_project(), &path).unwrap_err();
    assert!(matches!(err, ProjectError::SaveFailed { .. }));
    assert!(!path.exists());
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("centre.json");
    let store = ProjectStore::new();
    store.save(&sample_project(), &path).unwrap();
    store.save(&sample_project(), &path).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("centre.json")]);
}

#[test]
fn test_import_plan_copies_next_to_project() {
    let source_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    let source = super::write_plan(source_dir.path(), "magasin.png");

    let store = ProjectStore::new();
    let relative = store.import_plan(&source, project_dir.path()).unwrap();
    assert_eq!(relative, std::path::PathBuf::from("magasin.png"));
    assert!(project_dir.path().join("magasin.png").is_file());

    // Importing a plan already in place is a no-op.
    let again = store
        .import_plan(project_dir.path().join("magasin.png"), project_dir.path())
        .unwrap();
    assert_eq!(again, relative);
    assert!(project_dir.path().join("magasin.png").is_file());

    let err = store
        .import_plan(source_dir.path().join("absent.png"), project_dir.path())
        .unwrap_err();
    assert!(err.is_not_found());
}
