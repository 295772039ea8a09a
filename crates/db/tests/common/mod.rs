//! Fixtures shared by the repository integration tests. Tasks are always
//! created by the owner of their project.

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::PgPool;
use taskmaster_core::password::hash_password;
use taskmaster_db::models::project::{CreateProject, Project};
use taskmaster_db::models::status::{ProjectStatus, TaskPriority, UserRole};
use taskmaster_db::models::task::{CreateTask, Task};
use taskmaster_db::models::user::{CreateUser, User};
use taskmaster_db::repositories::{ProjectRepo, TaskRepo, UserRepo};

pub const PASSWORD: &str = "Password123";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_user(username: &str, role: UserRole) -> CreateUser {
    CreateUser {
        first_name: "Test".to_string(),
        last_name: "Person".to_string(),
        email: format!("{username}@example.com"),
        username: username.to_string(),
        password_hash: hash_password(PASSWORD).unwrap(),
        role,
        is_active: true,
    }
}

pub async fn create_user(pool: &PgPool, username: &str, role: UserRole) -> User {
    UserRepo::create(pool, &new_user(username, role))
        .await
        .unwrap()
}

pub fn new_project(name: &str, created_by: i64) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: format!("{name} project description"),
        start_date: date(2026, 1, 1),
        end_date: date(2026, 12, 31),
        status: ProjectStatus::Todo,
        manager_id: None,
        created_by,
    }
}

pub async fn create_project(pool: &PgPool, name: &str, created_by: i64) -> Project {
    ProjectRepo::create(pool, &new_project(name, created_by))
        .await
        .unwrap()
}

pub async fn create_task(
    pool: &PgPool,
    title: &str,
    project: &Project,
    assigned_to: Option<i64>,
    due_date: Option<NaiveDate>,
) -> Task {
    let input = CreateTask {
        assigned_to,
        due_date,
        ..CreateTask::new(title, project.id, project.created_by)
    };
    TaskRepo::create(pool, &input).await.unwrap()
}

pub async fn create_task_with_priority(
    pool: &PgPool,
    title: &str,
    project: &Project,
    priority: TaskPriority,
) -> Task {
    let input = CreateTask {
        priority,
        ..CreateTask::new(title, project.id, project.created_by)
    };
    TaskRepo::create(pool, &input).await.unwrap()
}
