use std::fs;

use maximarket_project::ProjectStore;
use maximarket_settings::Config;
use tempfile::TempDir;

use super::{sample_project, write_plan};

#[test]
fn test_lists_projects_and_skips_others() {
    let dir = TempDir::new().unwrap();
    let store = ProjectStore::new();

    let mut second = sample_project();
    second.name = "Nord".to_string();
    second.store_name = "MaxiMarket Nord".to_string();
    store.save(&sample_project(), dir.path().join("centre.json")).unwrap();
    store.save(&second, dir.path().join("nord.json")).unwrap();

    fs::write(dir.path().join("corrompu.json"), "{ nope").unwrap();
    fs::write(dir.path().join("liste.json"), r#"{"nom": "Liste", "produits": []}"#).unwrap();
    fs::write(
        dir.path().join("sans_plan.json"),
        r#"{"nom_projet": "Q", "nom_magasin": "M"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "nom_projet").unwrap();

    let found = store.list_available_projects(&[dir.path()]);
    let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Centre", "Nord"]);
    assert_eq!(found[0].store_name, "MaxiMarket Centre");
    assert_eq!(found[0].author, "Ana");
}

#[test]
fn test_store_name_is_optional_for_listing() {
    let dir = TempDir::new().unwrap();
    write_plan(dir.path(), "plan.png");
    let path = dir.path().join("sans_magasin.json");
    fs::write(&path, r#"{"nom_projet": "P", "chemin_plan": "plan.png"}"#).unwrap();

    let store = ProjectStore::new();
    assert!(store.load(&path).is_ok());

    let found = store.list_available_projects(&[dir.path()]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "P");
    assert_eq!(found[0].store_name, "");
}

#[cfg(unix)]
#[test]
fn test_same_directory_under_two_names_is_listed_once() {
    let dir = TempDir::new().unwrap();
    let projects = dir.path().join("projets");
    fs::create_dir(&projects).unwrap();
    std::os::unix::fs::symlink(&projects, dir.path().join("alias")).unwrap();
    ProjectStore::new()
        .save(&sample_project(), projects.join("centre.json"))
        .unwrap();

    let found = ProjectStore::new()
        .list_available_projects(&[dir.path().join("alias"), projects.clone()]);
    assert_eq!(found.len(), 1);
}

#[test]
fn test_missing_directories_are_skipped() {
    let dir = TempDir::new().unwrap();
    ProjectStore::new()
        .save(&sample_project(), dir.path().join("centre.json"))
        .unwrap();

    let found = ProjectStore::new()
        .list_available_projects(&[dir.path().join("absent"), dir.path().to_path_buf()]);
    assert_eq!(found.len(), 1);
}

#[test]
fn test_configured_exclusions_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let plain = ProjectStore::new();
    plain
        .save(&sample_project(), dir.path().join("centre.json"))
        .unwrap();
    plain
        .save(&sample_project(), dir.path().join("produits_selectionnes.json"))
        .unwrap();

    assert_eq!(plain.list_available_projects(&[dir.path()]).len(), 2);

    let store = ProjectStore::from_config(&Config::default());
    let found = store.list_available_projects(&[dir.path(), dir.path()]);
    assert_eq!(found.len(), 1);
    assert!(found[0].path.ends_with("centre.json"));
}
