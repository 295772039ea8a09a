//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Every failure is classified into
//! a [`RepoError`](crate::RepoError) and logged once before it is returned.

pub mod comment_repo;
pub mod dashboard_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use dashboard_repo::DashboardRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;

/// Turn a free-text search term into an `ILIKE` substring pattern.
///
/// `\`, `%` and `_` in the term match literally. An empty term yields `%%`,
/// which matches every non-null value.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
