//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (hero, skills, projects, contact)
//! GET  /about                         - About page (markdown)
//! GET  /skills                        - Skill categories
//! GET  /projects                      - Project listing
//! GET  /projects/{slug}               - Project detail
//! GET  /contact                       - Contact form
//! POST /contact                       - Submit contact form (rate limited)
//!
//! # Theme
//! GET  /api/theme                     - Current mode as JSON
//! POST /theme/toggle                  - Flip and pin the mode
//! POST /theme/auto                    - Follow the clock again
//!
//! # Admin
//! GET  /admin/login                   - Login form
//! POST /admin/login                   - Login action (rate limited)
//! POST /admin/logout                  - Logout action
//! GET  /admin                         - Submissions dashboard (requires admin)
//! GET  /admin/submissions             - Submission list fragment
//! POST /admin/submissions/{id}/read   - Mark read
//! POST /admin/submissions/{id}/delete - Delete
//! GET  /admin/submissions/events      - Server-Sent Events feed
//! ```

pub mod admin;
pub mod contact;
pub mod home;
pub mod pages;
pub mod projects;
pub mod theme;

use axum::{
    Router,
    handler::Handler,
    routing::{get, post},
};

use crate::middleware::{ClientIpKeyExtractor, contact_rate_limiter, login_rate_limiter};
use crate::state::AppState;

pub use pages::not_found;

/// Theme routes.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/api/theme", get(theme::current))
        .route("/theme/toggle", post(theme::toggle))
        .route("/theme/auto", post(theme::auto))
}

/// Admin routes. Login attempts are limited per `client_ip`.
pub fn admin_routes(client_ip: ClientIpKeyExtractor) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::index))
        .route(
            "/admin/login",
            get(admin::login_page).post(admin::login.layer(login_rate_limiter(client_ip))),
        )
        .route("/admin/logout", post(admin::logout))
        .route("/admin/submissions", get(admin::submissions))
        .route("/admin/submissions/events", get(admin::events))
        .route("/admin/submissions/{id}/read", post(admin::mark_read))
        .route("/admin/submissions/{id}/delete", post(admin::delete))
}

/// Create all page routes for the site.
pub fn routes(client_ip: ClientIpKeyExtractor) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/skills", get(pages::skills))
        .route("/projects", get(projects::index))
        .route("/projects/{slug}", get(projects::show))
        .route(
            "/contact",
            get(contact::show).post(contact::submit.layer(contact_rate_limiter(client_ip))),
        )
        .merge(theme_routes())
        .merge(admin_routes(client_ip))
}
