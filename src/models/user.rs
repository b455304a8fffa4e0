use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub token: String,
}

impl User {
    pub async fn create(db: &SqlitePool, name: &str, token: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, token) VALUES (?, ?) RETURNING id, name, token",
        )
        .bind(name)
        .bind(token)
        .fetch_one(db)
        .await
    }

    pub async fn find(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, token FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Token lookup used for login. A blank token never matches anyone.
    pub async fn find_by_token(db: &SqlitePool, token: &str) -> Result<Option<User>, sqlx::Error> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        sqlx::query_as::<_, User>("SELECT id, name, token FROM users WHERE token = ?")
            .bind(token)
            .fetch_optional(db)
            .await
    }

    pub async fn list(db: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, token FROM users ORDER BY name")
            .fetch_all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_in_memory;
    use crate::error::is_unique_violation;

    #[tokio::test]
    async fn token_lookup_finds_only_exact_token() {
        let db = connect_in_memory().await.unwrap();
        let alice = User::create(&db, "Alice", "aaaa").await.unwrap();
        User::create(&db, "Bob", "bbbb").await.unwrap();

        let found = User::find_by_token(&db, "aaaa").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(User::find_by_token(&db, "aaa").await.unwrap().is_none());
        assert!(User::find_by_token(&db, "").await.unwrap().is_none());
        assert!(User::find_by_token(&db, "   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn names_and_tokens_are_unique() {
        let db = connect_in_memory().await.unwrap();
        User::create(&db, "Alice", "t1").await.unwrap();

        let dup_name = User::create(&db, "Alice", "t2").await.unwrap_err();
        assert!(is_unique_violation(&dup_name));
        let dup_token = User::create(&db, "Carol", "t1").await.unwrap_err();
        assert!(is_unique_violation(&dup_token));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let db = connect_in_memory().await.unwrap();
        User::create(&db, "Zoe", "z").await.unwrap();
        User::create(&db, "Adam", "a").await.unwrap();

        let names: Vec<String> = User::list(&db).await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Adam", "Zoe"]);
    }
}
