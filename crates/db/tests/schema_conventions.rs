use sqlx::PgPool;

/// Migrations apply cleanly and the database answers.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bootstrap(pool: PgPool) {
    inventory_db::health_check(&pool).await.unwrap();

    for table in ["users", "suppliers", "products", "purchases", "purchase_compositions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
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
            let result: Option<(String,)> = sqlx::query_as(&format!(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = '{table}'
                   AND column_name = '{col}'"
            ))
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

/// The composition table rejects self-links and duplicate pairs even for raw SQL.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_composition_constraints(pool: PgPool) {
    let product: (i64,) = sqlx::query_as(
        "INSERT INTO products (name, is_parent_type) VALUES ('Laptop', TRUE) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let mut ids = Vec::new();
    for _ in 0..2 {
        let purchase: (i64,) = sqlx::query_as(
            "INSERT INTO purchases (product_id, purchase_date) \
             VALUES ($1, CURRENT_DATE) RETURNING id",
        )
        .bind(product.0)
        .fetch_one(&pool)
        .await
        .unwrap();
        ids.push(purchase.0);
    }

    let self_link = sqlx::query(
        "INSERT INTO purchase_compositions (parent_purchase_id, child_purchase_id) VALUES ($1, $1)",
    )
    .bind(ids[0])
    .execute(&pool)
    .await
    .unwrap_err();
    let constraint = self_link.as_database_error().and_then(|e| e.constraint().map(str::to_owned));
    assert_eq!(constraint.as_deref(), Some("ck_purchase_compositions_no_self_link"));

    let insert = "INSERT INTO purchase_compositions (parent_purchase_id, child_purchase_id) \
                  VALUES ($1, $2)";
    sqlx::query(insert).bind(ids[0]).bind(ids[1]).execute(&pool).await.unwrap();
    let duplicate = sqlx::query(insert)
        .bind(ids[0])
        .bind(ids[1])
        .execute(&pool)
        .await
        .unwrap_err();
    let constraint = duplicate.as_database_error().and_then(|e| e.constraint().map(str::to_owned));
    assert_eq!(constraint.as_deref(), Some("uq_purchase_compositions_pair"));
}
