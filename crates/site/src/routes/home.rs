//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::content::Skill;
use crate::filters;
use crate::middleware::{PageContext, Visitor};
use crate::models::{ContactForm, Project};
use crate::routes::projects::load_projects;
use crate::state::AppState;

const FEATURED_SKILLS: usize = 6;
const FEATURED_PROJECTS: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub intro: Option<String>,
    pub featured_skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub form: ContactForm,
}

/// Display the home page.
///
/// GET /
#[instrument(skip(state, visitor))]
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> HomeTemplate {
    let (mut projects, _) = load_projects(&state).await;
    projects.truncate(FEATURED_PROJECTS);

    HomeTemplate {
        ctx: visitor.page(&state),
        intro: state
            .content()
            .get_page("about")
            .and_then(|p| p.meta.description.clone()),
        featured_skills: featured_skills(state.content().skills().iter().flat_map(|c| &c.skills)),
        projects,
        form: ContactForm::default(),
    }
}

/// Highest-rated skills, ties in file order.
fn featured_skills<'a>(skills: impl Iterator<Item = &'a Skill>) -> Vec<Skill> {
    let mut all: Vec<&Skill> = skills.collect();
    all.sort_by(|a, b| b.level.cmp(&a.level));
    all.into_iter().take(FEATURED_SKILLS).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, level: u8) -> Skill {
        Skill {
            name: name.to_string(),
            level,
        }
    }

    #[test]
    fn test_featured_skills_highest_first_stable() {
        let skills = vec![
            skill("Figma", 90),
            skill("React", 95),
            skill("PHP", 70),
            skill("HTML5", 95),
            skill("Git", 90),
            skill("SQL", 70),
            skill("Python", 72),
            skill("CSS3", 90),
        ];
        let names: Vec<String> = featured_skills(skills.iter())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["React", "HTML5", "Figma", "Git", "CSS3", "Python"]);
    }
}
