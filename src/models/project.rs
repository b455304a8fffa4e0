use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    AlreadyArchived,
    NotFound,
}

/// One row of the archived projects report.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedProjectReport {
    pub name: String,
    pub total_hours: f64,
    pub assigned_users: Vec<String>,
}

#[derive(FromRow)]
struct ArchivedTotalsRow {
    id: i64,
    name: String,
    total_hours: f64,
}

impl Project {
    pub async fn create(db: &SqlitePool, name: &str) -> Result<Project, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name) VALUES (?) RETURNING id, name, archived",
        )
        .bind(name)
        .fetch_one(db)
        .await
    }

    pub async fn find(db: &SqlitePool, id: i64) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT id, name, archived FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list(db: &SqlitePool) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT id, name, archived FROM projects ORDER BY name")
            .fetch_all(db)
            .await
    }

    /// Candidates for new assignments.
    pub async fn list_active(db: &SqlitePool) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            "SELECT id, name, archived FROM projects WHERE archived = 0 ORDER BY name",
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_active_for_user(db: &SqlitePool, user_id: i64) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"SELECT p.id, p.name, p.archived
            FROM projects p
            JOIN user_projects up ON up.project_id = p.id
            WHERE up.user_id = ? AND p.archived = 0
            ORDER BY p.name"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn is_active_assignment(db: &SqlitePool, user_id: i64, project_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM user_projects up
                JOIN projects p ON p.id = up.project_id
                WHERE up.user_id = ? AND up.project_id = ? AND p.archived = 0
            )"#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(db)
        .await
    }

    /// Flags the project archived. Assignment rows stay in place so the
    /// archived report can still name the users; every active listing
    /// filters on the flag instead.
    pub async fn archive(db: &SqlitePool, id: i64) -> Result<ArchiveOutcome, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET archived = 1 WHERE id = ? AND archived = 0")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 1 {
            return Ok(ArchiveOutcome::Archived);
        }

        Ok(match Project::find(db, id).await? {
            Some(_) => ArchiveOutcome::AlreadyArchived,
            None => ArchiveOutcome::NotFound,
        })
    }

    pub async fn archived_report(db: &SqlitePool) -> Result<Vec<ArchivedProjectReport>, sqlx::Error> {
        let totals = sqlx::query_as::<_, ArchivedTotalsRow>(
            r#"SELECT p.id, p.name, COALESCE(SUM(t.duration), 0.0) AS total_hours
            FROM projects p
            LEFT JOIN time_entries t ON t.project_id = p.id
            WHERE p.archived = 1
            GROUP BY p.id, p.name
            ORDER BY p.name"#,
        )
        .fetch_all(db)
        .await?;

        let members = sqlx::query_as::<_, (i64, String)>(
            r#"SELECT up.project_id, u.name
            FROM user_projects up
            JOIN users u ON u.id = up.user_id
            JOIN projects p ON p.id = up.project_id
            WHERE p.archived = 1
            ORDER BY u.name"#,
        )
        .fetch_all(db)
        .await?;

        let mut by_project: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        for (project_id, user_name) in members {
            by_project.entry(project_id).or_default().push(user_name);
        }

        Ok(totals
            .into_iter()
            .map(|row| ArchivedProjectReport {
                name: row.name,
                total_hours: row.total_hours,
                assigned_users: by_project.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}

/// User <-> project assignment rows.
pub struct Assignment;

impl Assignment {
    /// Replaces the user's active assignment set with `project_ids`.
    ///
    /// Unknown and archived ids are dropped. Rows pointing at archived
    /// projects are history and are left untouched. Returns how many
    /// assignments were written.
    pub async fn replace_active(db: &SqlitePool, user_id: i64, project_ids: &[i64]) -> Result<u64, sqlx::Error> {
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"DELETE FROM user_projects
            WHERE user_id = ?
              AND project_id IN (SELECT id FROM projects WHERE archived = 0)"#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let mut assigned = 0;
        for project_id in project_ids {
            let result = sqlx::query(
                r#"INSERT OR IGNORE INTO user_projects (user_id, project_id)
                SELECT ?, id FROM projects WHERE id = ? AND archived = 0"#,
            )
            .bind(user_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
            assigned += result.rows_affected();
        }

        tx.commit().await?;
        Ok(assigned)
    }

    /// `(user_id, project_id)` pairs restricted to active projects.
    pub async fn list_active(db: &SqlitePool) -> Result<Vec<(i64, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            r#"SELECT up.user_id, up.project_id
            FROM user_projects up
            JOIN projects p ON p.id = up.project_id
            WHERE p.archived = 0
            ORDER BY up.user_id, p.name"#,
        )
        .fetch_all(db)
        .await
    }
}
