use std::fs;
use std::path::Path;

use maximarket_core::Cell;
use maximarket_project::{ProjectError, ProjectStore, ValidationError};
use tempfile::TempDir;

use super::{sample_project, write_plan};

#[test]
fn test_round_trip_keeps_every_field() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.png");
    let path = dir.path().join("centre.json");

    let mut project = sample_project();
    project.start_point = Some(Cell::new(29, 3));

    let store = ProjectStore::new();
    store.save(&project, &path).unwrap();
    let loaded = store.load(&path).unwrap();

    assert_eq!(loaded.project(), &project);
    assert_eq!(loaded.plan_path(), dir.path().join("plan.png"));
    assert!(!loaded.is_relocated());
}

#[test]
fn test_empty_placements_round_trip() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.png");
    let path = dir.path().join("vide.json");

    let mut project = sample_project();
    project.placements.clear();

    let store = ProjectStore::new();
    store.save(&project, &path).unwrap();
    let loaded = store.load(&path).unwrap();
    assert!(loaded.project().placements.is_empty());
    assert_eq!(loaded.project().active_products.len(), 4);
}

#[test]
fn test_missing_project_file() {
    let dir = TempDir::new().unwrap();
    let err = ProjectStore::new()
        .load(dir.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, ProjectError::ProjectNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_missing_plan_can_be_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("centre.json");
    fs::write(&path, sample_project().to_json_string().unwrap()).unwrap();

    let err = ProjectStore::new().load(&path).unwrap_err();
    assert!(err.is_recoverable());
    let ProjectError::PlanNotFound { path: plan, project } = err else {
        panic!("expected PlanNotFound");
    };
    assert_eq!(plan, dir.path().join("plan.png"));
    assert_eq!(project.project().placements.len(), 3);

    let other = write_plan(dir.path(), "nouveau_plan.png");
    let loaded = (*project).with_plan(&other).unwrap();
    assert!(loaded.is_relocated());
    assert_eq!(loaded.plan_path(), other);
    assert_eq!(loaded.project().plan_path, Path::new("nouveau_plan.png"));
}

#[test]
fn test_replacing_with_missing_plan_fails_again() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("centre.json");
    fs::write(&path, sample_project().to_json_string().unwrap()).unwrap();

    let ProjectError::PlanNotFound { project, .. } = ProjectStore::new().load(&path).unwrap_err()
    else {
        panic!("expected PlanNotFound");
    };
    let err = (*project).with_plan("still_missing.png").unwrap_err();
    assert!(matches!(err, ProjectError::PlanNotFound { .. }));
}

#[test]
fn test_plan_resolved_against_project_directory() {
    let dir = TempDir::new().unwrap();
    let projects = dir.path().join("projets");
    fs::create_dir(&projects).unwrap();
    write_plan(&projects, "plan.png");
    let path = projects.join("centre.json");
    fs::write(&path, sample_project().to_json_string().unwrap()).unwrap();

    let loaded = ProjectStore::new().load(&path).unwrap();
    assert_eq!(loaded.plan_path(), projects.join("plan.png"));
}

#[test]
fn test_invalid_files_are_validation_errors() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.png");
    let store = ProjectStore::new();

    let cases = [
        ("garbage.json", "{ not json"),
        ("sans_plan.json", r#"{"nom_projet": "P"}"#),
        (
            "cle.json",
            r#"{"nom_projet": "P", "chemin_plan": "plan.png",
                "produits_magasin": ["Lait"], "placements": {"3;4": "Lait"}}"#,
        ),
        (
            "double.json",
            r#"{"nom_projet": "P", "chemin_plan": "plan.png", "produits_magasin": ["Lait"],
                "placements": {"1,1": "Lait", "2,2": "Lait"}}"#,
        ),
    ];
    for (name, content) in cases {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        let err = store.load(&path).unwrap_err();
        assert!(
            matches!(err, ProjectError::Validation(_)),
            "{}: unexpected {:?}",
            name,
            err
        );
    }
}

#[test]
fn test_unsold_placements_are_dropped_on_load() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.png");
    let path = dir.path().join("centre.json");
    fs::write(
        &path,
        r#"{"nom_projet": "P", "chemin_plan": "plan.png", "produits_magasin": ["Lait"],
            "placements": {"1,1": "Lait", "2,2": "Caviar"}}"#,
    )
    .unwrap();

    let loaded = ProjectStore::new().load(&path).unwrap();
    assert_eq!(loaded.project().placements.len(), 1);

    let err = maximarket_project::Project::from_json_str(r#"{"chemin_plan": "p.png"}"#).unwrap_err();
    assert_eq!(err, ValidationError::MissingField("nom_projet".to_string()));
}
