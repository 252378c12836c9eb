//! Showcased projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfolio_core::ProjectId;

/// A portfolio project.
///
/// Loaded from `portfolio.project`, or from `content/projects.yaml` when the
/// database has nothing to offer. Projects from the YAML file carry no `id`
/// or `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    /// The first few technologies, for cards.
    pub fn headline_technologies(&self) -> impl Iterator<Item = &String> {
        self.technologies.iter().take(4)
    }
}

/// Top-level shape of `projects.yaml`.
#[derive(Debug, Deserialize)]
pub struct ProjectFile {
    pub projects: Vec<Project>,
}

/// Where a project listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSource {
    Database,
    Fallback,
}

impl ProjectSource {
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_project_defaults() {
        let yaml = r"
projects:
  - slug: peopleview
    title: HR Analytics Dashboard
    category: Software Engineer
    summary: Turnover insights.
    description: Longer text.
    technologies: [React, Node.js, Azure, Machine Learning, UX/UI Design]
";
        let file: ProjectFile = serde_yaml::from_str(yaml).unwrap();
        let project = &file.projects[0];
        assert_eq!(project.id, None);
        assert_eq!(project.sort_order, 0);
        assert!(project.features.is_empty());
        assert_eq!(project.headline_technologies().count(), 4);
    }
}
