//! Project file persistence.
//!
//! Loading is all-or-nothing: the caller receives either a fully validated
//! [`LoadedProject`] or an error, never a partially applied state. Saving goes
//! through a temporary file in the destination directory that is renamed over
//! the target, so an interrupted save leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use maximarket_settings::Config;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{ProjectError, ProjectResult};
use crate::project::Project;

/// Directory holding `path`, `"."` for bare file names.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Resolves a plan path stored in a project against the project directory.
pub(crate) fn resolve_plan(project_dir: &Path, plan: &Path) -> PathBuf {
    if plan.is_absolute() {
        plan.to_path_buf()
    } else {
        project_dir.join(plan)
    }
}

/// A validated project together with where it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    project: Project,
    project_path: PathBuf,
    plan_path: PathBuf,
    relocated: bool,
}

impl LoadedProject {
    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    /// The project file this was loaded from.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn project_dir(&self) -> &Path {
        parent_dir(&self.project_path)
    }

    /// The plan image, resolved against the project directory.
    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    /// True if [`with_plan`](Self::with_plan) replaced the stored plan path.
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Points the project at another plan image.
    ///
    /// Used to recover from [`ProjectError::PlanNotFound`]. Paths inside the
    /// project directory are stored relative to it.
    pub fn with_plan(mut self, plan: impl AsRef<Path>) -> ProjectResult<Self> {
        let plan = plan.as_ref();
        let project_dir = self.project_dir().to_path_buf();
        let resolved = resolve_plan(&project_dir, plan);
        if !resolved.is_file() {
            return Err(ProjectError::PlanNotFound {
                path: resolved,
                project: Box::new(self),
            });
        }

        self.project.plan_path = plan
            .strip_prefix(&project_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| plan.to_path_buf());
        self.plan_path = resolved;
        self.relocated = true;
        Ok(self)
    }
}

/// Listing entry for a project file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub path: PathBuf,
    pub name: String,
    pub store_name: String,
    pub author: String,
    pub created_at: String,
}

impl std::fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.store_name)
    }
}

/// Reads, writes and discovers project files.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    excluded_files: Vec<String>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store honoring the configured excluded file names.
    pub fn from_config(config: &Config) -> Self {
        Self {
            excluded_files: config.projects.excluded_files.clone(),
        }
    }

    /// Loads and validates a project file, then checks its plan image.
    pub fn load(&self, path: impl AsRef<Path>) -> ProjectResult<LoadedProject> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ProjectError::ProjectNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let project = Project::from_json_str(&content)?;

        let plan_path = resolve_plan(parent_dir(path), &project.plan_path);
        let loaded = LoadedProject {
            project,
            project_path: path.to_path_buf(),
            plan_path,
            relocated: false,
        };

        if !loaded.plan_path.is_file() {
            warn!(
                project = %path.display(),
                plan = %loaded.plan_path.display(),
                "plan image not found"
            );
            return Err(ProjectError::PlanNotFound {
                path: loaded.plan_path.clone(),
                project: Box::new(loaded),
            });
        }

        info!(
            path = %path.display(),
            name = %loaded.project.name,
            placements = loaded.project.placements.len(),
            "project loaded"
        );
        Ok(loaded)
    }

    /// Validates and writes `project` to `path` atomically.
    pub fn save(&self, project: &Project, path: impl AsRef<Path>) -> ProjectResult<()> {
        let path = path.as_ref();
        project.validate()?;
        let json = project.to_json_string()?;

        let save_failed = |e: io::Error| ProjectError::SaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut file = NamedTempFile::new_in(parent_dir(path)).map_err(save_failed)?;
        file.write_all(json.as_bytes()).map_err(save_failed)?;
        file.as_file().sync_all().map_err(save_failed)?;
        file.persist(path).map_err(|e| save_failed(e.error))?;

        info!(path = %path.display(), name = %project.name, "project saved");
        Ok(())
    }

    /// Scans each directory (not recursively) for project files.
    ///
    /// A file is listed when it is JSON with `nom_projet` and `chemin_plan`.
    /// Anything else, including unreadable directories, is skipped. A file
    /// reached through several search directories is listed once.
    pub fn list_available_projects<P: AsRef<Path>>(&self, search_dirs: &[P]) -> Vec<ProjectSummary> {
        let mut found = Vec::new();

        for dir in search_dirs {
            let dir = dir.as_ref();
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping search directory");
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let excluded = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| self.excluded_files.iter().any(|f| f == name));
                if excluded {
                    continue;
                }

                match read_summary(&path) {
                    Ok(summary) => {
                        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
                        found.push((key, summary));
                    }
                    Err(reason) => debug!(path = %path.display(), %reason, "not a project file"),
                }
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.path.cmp(&b.1.path)));
        found.dedup_by(|a, b| a.0 == b.0);
        found.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Copies a plan image into `project_dir` and returns the path to store
    /// in the project, relative to that directory.
    pub fn import_plan(
        &self,
        source: impl AsRef<Path>,
        project_dir: impl AsRef<Path>,
    ) -> ProjectResult<PathBuf> {
        let source = source.as_ref();
        let project_dir = project_dir.as_ref();
        if !source.is_file() {
            return Err(ProjectError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("plan image not found: {}", source.display()),
            )));
        }
        let file_name = source.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "plan path has no file name")
        })?;

        let target = project_dir.join(file_name);
        let same_file = match (source.canonicalize(), target.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            fs::create_dir_all(project_dir)?;
            fs::copy(source, &target)?;
            debug!(from = %source.display(), to = %target.display(), "plan imported");
        }

        Ok(PathBuf::from(file_name))
    }
}

fn read_summary(path: &Path) -> Result<ProjectSummary, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&content).map_err(|e| e.to_string())?;

    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    let name = text("nom_projet").ok_or("missing nom_projet")?;
    text("chemin_plan").ok_or("missing chemin_plan")?;

    Ok(ProjectSummary {
        path: path.to_path_buf(),
        name,
        store_name: text("nom_magasin").unwrap_or_default(),
        author: text("auteur").unwrap_or_default(),
        created_at: text("date_creation").unwrap_or_default(),
    })
}
