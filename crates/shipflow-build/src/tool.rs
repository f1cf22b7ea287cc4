use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Build tool the project is managed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl BuildTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTool::Maven => "maven",
            BuildTool::Gradle => "gradle",
        }
    }

    /// Wrapper script shipped with the project
    pub fn wrapper(&self, project_root: &Path) -> PathBuf {
        let name = match (self, cfg!(windows)) {
            (BuildTool::Maven, false) => "mvnw",
            (BuildTool::Maven, true) => "mvnw.cmd",
            (BuildTool::Gradle, false) => "gradlew",
            (BuildTool::Gradle, true) => "gradlew.bat",
        };
        project_root.join(name)
    }

    /// Arguments producing a production artifact for `profile`
    pub fn build_args(&self, profile: &str, war: bool) -> Vec<String> {
        match self {
            BuildTool::Maven => {
                let profiles = if war {
                    format!("-P{},war", profile)
                } else {
                    format!("-P{}", profile)
                };
                vec![
                    "-ntp".to_string(),
                    profiles,
                    "clean".to_string(),
                    "verify".to_string(),
                    "-DskipTests".to_string(),
                ]
            }
            BuildTool::Gradle => {
                let mut args = vec![format!("-P{}", profile)];
                if war {
                    args.push("-Pwar".to_string());
                }
                args.push("clean".to_string());
                args.push(if war { "bootWar" } else { "bootJar" }.to_string());
                args.push("-x".to_string());
                args.push("test".to_string());
                args
            }
        }
    }

    /// Directory the packaged artifact lands in
    pub fn artifact_dir(&self, project_root: &Path) -> PathBuf {
        match self {
            BuildTool::Maven => project_root.join("target"),
            BuildTool::Gradle => project_root.join("build").join("libs"),
        }
    }

    /// Locate the packaged `.war` produced by the last build.
    ///
    /// Plain archives (`*.war.original`, `*-plain.war`) are skipped.
    pub fn find_war(&self, project_root: &Path) -> crate::Result<PathBuf> {
        let dir = self.artifact_dir(project_root);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BuildError::ArtifactNotFound(dir));
            }
            Err(e) => return Err(e.into()),
        };

        let mut wars: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "war")
                    && !p
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .is_some_and(|s| s.ends_with("-plain"))
            })
            .collect();
        wars.sort();

        wars.into_iter()
            .next()
            .ok_or(BuildError::ArtifactNotFound(dir))
    }
}

impl std::fmt::Display for BuildTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTool {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maven" => Ok(BuildTool::Maven),
            "gradle" => Ok(BuildTool::Gradle),
            other => Err(BuildError::UnknownTool(other.to_string())),
        }
    }
}
