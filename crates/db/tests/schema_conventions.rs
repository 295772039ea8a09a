use sqlx::PgPool;

/// Lookup tables key on `smallint` to match the `#[repr(i16)]` enums; the
/// entity tables key on `bigint`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_id_type_follows_table_kind(pool: PgPool) {
    let mut rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::text, data_type::text
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    rows.sort();

    let expected: Vec<(String, String)> = [
        ("comments", "bigint"),
        ("project_statuses", "smallint"),
        ("projects", "bigint"),
        ("task_priorities", "smallint"),
        ("task_statuses", "smallint"),
        ("tasks", "bigint"),
        ("user_roles", "smallint"),
        ("users", "bigint"),
    ]
    .iter()
    .map(|(t, d)| (t.to_string(), d.to_string()))
    .collect();
    assert_eq!(rows, expected);
}

/// Every table (except _sqlx_migrations) must have created_at and updated_at as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Every table keeps `updated_at` current through a trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_updated_at_trigger(pool: PgPool) {
    let missing: Vec<(String,)> = sqlx::query_as(
        "SELECT t.table_name
         FROM information_schema.tables t
         WHERE t.table_schema = 'public'
           AND t.table_type = 'BASE TABLE'
           AND t.table_name != '_sqlx_migrations'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers tr
               WHERE tr.event_object_table = t.table_name
                 AND tr.trigger_name = 'trg_' || t.table_name || '_updated_at'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(missing.is_empty(), "Tables without updated_at trigger: {missing:?}");
}

/// Deleting a project or task takes its children with it, deleting a user
/// clears assignments and management, and lookup rows cannot be deleted while
/// referenced.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_key_delete_actions(pool: PgPool) {
    let mut rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT c.conrelid::regclass::text, a.attname::text, c.confdeltype::text
         FROM pg_constraint c
         JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = c.conkey[1]
         WHERE c.contype = 'f'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    rows.sort();

    // c = CASCADE, n = SET NULL, a = NO ACTION
    let expected: Vec<(String, String, String)> = [
        ("comments", "task_id", "c"),
        ("comments", "user_id", "c"),
        ("projects", "created_by", "c"),
        ("projects", "manager_id", "n"),
        ("projects", "status_id", "a"),
        ("tasks", "assigned_to", "n"),
        ("tasks", "created_by", "c"),
        ("tasks", "priority_id", "a"),
        ("tasks", "project_id", "c"),
        ("tasks", "status_id", "a"),
        ("users", "role_id", "a"),
    ]
    .iter()
    .map(|(t, col, action)| (t.to_string(), col.to_string(), action.to_string()))
    .collect();
    assert_eq!(rows, expected);
}

/// Email and username uniqueness is enforced on the lowercased value.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_identity_indexes_ignore_case(pool: PgPool) {
    for (index, column) in [("uq_users_email", "email"), ("uq_users_username", "username")] {
        let (definition,): (String,) =
            sqlx::query_as("SELECT indexdef FROM pg_indexes WHERE indexname = $1")
                .bind(index)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(
            definition.starts_with("CREATE UNIQUE INDEX"),
            "{index} should be unique: {definition}"
        );
        assert!(
            definition.contains(&format!("lower({column})")),
            "{index} should index lower({column}): {definition}"
        );
    }
}

/// Every single-column foreign key has an index leading with that column.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_foreign_keys_are_indexed(pool: PgPool) {
    let unindexed: Vec<(String, String)> = sqlx::query_as(
        "SELECT c.conrelid::regclass::text, a.attname::text
         FROM pg_constraint c
         JOIN pg_attribute a ON a.attrelid = c.conrelid AND a.attnum = c.conkey[1]
         WHERE c.contype = 'f'
           AND NOT EXISTS (
               SELECT 1 FROM pg_index i
               WHERE i.indrelid = c.conrelid AND i.indkey[0] = c.conkey[1]
           )
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(unindexed.is_empty(), "Unindexed foreign keys: {unindexed:?}");
}
