//! File-based content: markdown pages, the skills list and the fallback
//! project list.
//!
//! Everything is loaded once at startup from the content directory:
//!
//! ```text
//! content/
//!   pages/*.md      markdown with YAML frontmatter (title, description)
//!   skills.yaml     skill categories
//!   projects.yaml   projects shown when the database has none
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Project, ProjectFile};

/// Errors loading content from disk.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Metadata for markdown pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A rendered markdown page.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// One skill with a proficiency from 0 to 100.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: u8,
}

/// A named group of skills.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
struct SkillFile {
    categories: Vec<SkillCategory>,
}

/// All loaded content, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
    skills: Arc<Vec<SkillCategory>>,
    projects: Arc<Vec<Project>>,
}

impl ContentStore {
    /// Load all content from `content_dir`.
    ///
    /// Missing files yield empty sections; malformed YAML is an error.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if a directory cannot be read or a YAML file
    /// does not parse.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages = load_pages(&content_dir.join("pages"))?;
        let skills = load_yaml::<SkillFile>(&content_dir.join("skills.yaml"))?
            .map(|f| f.categories)
            .unwrap_or_default();
        let mut projects = load_yaml::<ProjectFile>(&content_dir.join("projects.yaml"))?
            .map(|f| f.projects)
            .unwrap_or_default();
        projects.sort_by_key(|p| p.sort_order);

        for category in &skills {
            if let Some(skill) = category.skills.iter().find(|s| s.level > 100) {
                return Err(ContentError::Parse(format!(
                    "skill '{}' has level {} (max 100)",
                    skill.name, skill.level
                )));
            }
        }

        tracing::info!(
            pages = pages.len(),
            skill_categories = skills.len(),
            fallback_projects = projects.len(),
            "Content loaded"
        );

        Ok(Self {
            pages: Arc::new(pages),
            skills: Arc::new(skills),
            projects: Arc::new(projects),
        })
    }

    /// Get a page by slug.
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Skill categories in file order.
    #[must_use]
    pub fn skills(&self) -> &[SkillCategory] {
        &self.skills
    }

    /// Projects from `projects.yaml`, sorted by `sort_order`.
    #[must_use]
    pub fn fallback_projects(&self) -> &[Project] {
        &self.projects
    }
}

fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
    let mut pages = HashMap::new();

    if !dir.exists() {
        tracing::warn!("Pages directory does not exist: {:?}", dir);
        return Ok(pages);
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            match load_page(&path) {
                Ok(page) => {
                    tracing::debug!("Loaded page: {}", page.slug);
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => {
                    tracing::error!("Failed to load page {:?}: {}", path, e);
                }
            }
        }
    }

    Ok(pages)
}

fn load_page(path: &Path) -> Result<Page, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();

    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<PageMeta> = matter
        .parse(&content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(Page {
        slug,
        meta,
        content_html: render_markdown(&parsed.content),
    })
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ContentError> {
    if !path.exists() {
        tracing::warn!("Content file does not exist: {:?}", path);
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;
    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| ContentError::Parse(format!("{}: {e}", path.display())))
}

/// Render markdown to HTML. Raw HTML in the source is dropped.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    markdown_to_html(markdown, &options)
}
