#[cfg(test)]
mod tests {
    use crate::{
        SqliteFixture, TEST_MYSQL_URL, TEST_PG_URL, reset_mysql, reset_postgres,
        utils::{
            MYSQL_USERS_DDL, PG_USERS_DDL, USER_7_QUERY, USERS_DDL, assert_dtype, cell,
            cell_as_string, fetch,
        },
    };
    use chrono::{NaiveDate, TimeZone};
    use connectors::error::AdapterError;
    use model::core::{data_type::DataType, value::Value};
    use tracing_test::traced_test;
    use wrangler::{
        DbWrangler, DtypeMap, FetchOptions, IndexCol, OptionCategory, WranglerError,
        coercion::CoercionError, options::ParseDates, timezone::TimezoneError,
    };

    fn users_db() -> SqliteFixture {
        SqliteFixture::new("users.db", USERS_DDL)
    }

    // Scenario: A single-row table read with an embedded int64 dtype.
    // Expected Outcome: One row whose user_id column is int64 and holds 7.
    #[traced_test]
    #[tokio::test]
    async fn tc00() {
        let db = SqliteFixture::new(
            "single.sqlite",
            "CREATE TABLE users (user_id INTEGER); INSERT INTO users VALUES (7);",
        );
        let sql = "/*pandas*\n[dtype]\nuser_id=\"int64\"\n*pandas*/\nSELECT user_id FROM users";

        let extracted = wrangler::extract(sql);
        assert_eq!(
            extracted
                .get(OptionCategory::Dtype)
                .and_then(|d| d.get("user_id"))
                .and_then(|v| v.as_str()),
            Some("int64")
        );

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;
        assert_eq!(frame.num_rows(), 1);
        assert_dtype(&frame, "user_id", DataType::Int64);
        assert_eq!(cell(&frame, 0, "user_id"), Value::Int(7));
    }

    // Scenario: Query for a single user with index_col and parse_dates embedded in the SQL.
    // Expected Outcome:
    // - One row, indexed by user_id = 7.
    // - created_at is a naive timestamp.
    #[traced_test]
    #[tokio::test]
    async fn tc01() {
        let db = users_db();
        let frame = fetch(&db.conn_str(), USER_7_QUERY, FetchOptions::new()).await;

        assert_eq!(frame.num_rows(), 1);
        assert_eq!(frame.index_names(), vec!["user_id"]);
        assert_eq!(frame.column_names(), vec!["name", "created_at"]);
        assert_eq!(cell(&frame, 0, "user_id"), Value::Int(7));
        assert_eq!(cell_as_string(&frame, 0, "name"), "ann");
        assert_dtype(&frame, "created_at", DataType::Timestamp);
        assert_eq!(
            cell(&frame, 0, "created_at"),
            Value::TimestampNaive(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            )
        );
    }

    // Scenario: The caller passes index_col while the SQL embeds a different one.
    // Expected Outcome: The caller's index is used; embedded parse_dates still apply.
    #[traced_test]
    #[tokio::test]
    async fn tc02() {
        let db = users_db();
        let mut wrangler = DbWrangler::new(&db.conn_str()).unwrap();

        let frame = wrangler
            .fetch(USER_7_QUERY, FetchOptions::new().index_col("name"))
            .await
            .unwrap();

        assert_eq!(frame.index_names(), vec!["name"]);
        assert_dtype(&frame, "created_at", DataType::Timestamp);

        let last = wrangler.last_options().unwrap();
        assert_eq!(last.sql, USER_7_QUERY);
        assert_eq!(last.query.index_col, Some(IndexCol::from("name")));
        assert_eq!(
            last.query.parse_dates,
            Some(ParseDates::columns(["created_at"]))
        );
    }

    // Scenario: A date column mixes naive text, text with an offset and garbage.
    // Expected Outcome:
    // - The column becomes zone-aware UTC.
    // - Naive text is read as UTC, the offset is applied, garbage becomes null.
    #[traced_test]
    #[tokio::test]
    async fn tc03() {
        let db = users_db();
        let sql = r#"/*pandas* parse_dates = ["created_at"] *pandas*/
            SELECT user_id, created_at FROM users ORDER BY user_id"#;

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;

        assert_dtype(&frame, "created_at", DataType::TimestampTz(chrono_tz::UTC));
        assert_eq!(
            cell_as_string(&frame, 0, "created_at"),
            "2024-01-15 12:00:00+00:00"
        );
        assert_eq!(
            cell_as_string(&frame, 1, "created_at"),
            "2024-01-16 06:30:00+00:00"
        );
        assert_eq!(cell(&frame, 2, "created_at"), Value::Null);
    }

    // Scenario: Embedded timezone with a UTC date column used as the index.
    // Expected Outcome: Index values are expressed in America/Chicago.
    #[traced_test]
    #[tokio::test]
    async fn tc04() {
        let db = users_db();
        let sql = r#"/*pandas*
index_col = "created_at"
timezone = "America/Chicago"

[parse_dates]
created_at = { utc = true }
*pandas*/
SELECT created_at, name FROM users WHERE user_id = 7"#;

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;

        assert_eq!(frame.index_names(), vec!["created_at"]);
        assert_dtype(
            &frame,
            "created_at",
            DataType::TimestampTz(chrono_tz::America::Chicago),
        );
        assert_eq!(
            cell_as_string(&frame, 0, "created_at"),
            "2024-01-15 06:00:00-06:00"
        );
    }

    // Scenario: Embedded timezone, but the dates are naive.
    // Expected Outcome: The fetch fails with a timezone error naming the column.
    #[traced_test]
    #[tokio::test]
    async fn tc05() {
        let db = users_db();
        let sql = r#"/*pandas*
parse_dates = ["created_at"]
timezone = "Europe/Paris"
*pandas*/
SELECT created_at FROM users WHERE user_id = 7"#;

        let mut wrangler = DbWrangler::new(&db.conn_str()).unwrap();
        let err = wrangler.fetch(sql, FetchOptions::new()).await.unwrap_err();

        assert!(matches!(
            err,
            WranglerError::Timezone(TimezoneError::NaiveTimestamps(ref column, _))
                if column == "created_at"
        ));
    }

    // Scenario: Embedded timezone on a result without any timestamps.
    // Expected Outcome: The fetch fails; there is nothing to convert.
    #[traced_test]
    #[tokio::test]
    async fn tc06() {
        let db = users_db();
        let sql = "/*pandas* timezone = \"UTC\" *pandas*/ SELECT user_id FROM users";

        let mut wrangler = DbWrangler::new(&db.conn_str()).unwrap();
        let err = wrangler.fetch(sql, FetchOptions::new()).await.unwrap_err();

        assert!(matches!(
            err,
            WranglerError::Timezone(TimezoneError::NoTemporalData(_))
        ));
    }

    // Scenario: dtype casts from embedded metadata, then from the caller naming a missing column.
    // Expected Outcome:
    // - score becomes float32 with the null preserved.
    // - A missing dtype column is an error.
    #[traced_test]
    #[tokio::test]
    async fn tc07() {
        let db = users_db();
        let sql = r#"/*pandas*
[dtype]
score = "float32"
user_id = "string"
*pandas*/
SELECT user_id, score FROM users ORDER BY user_id"#;

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;
        assert_dtype(&frame, "score", DataType::Float32);
        assert_dtype(&frame, "user_id", DataType::String);
        assert_eq!(cell(&frame, 0, "score"), Value::Float32(4.5));
        assert_eq!(cell(&frame, 1, "score"), Value::Null);
        assert_eq!(cell(&frame, 2, "user_id"), Value::String("9".into()));

        let mut wrangler = DbWrangler::new(&db.conn_str()).unwrap();
        let err = wrangler
            .fetch(
                sql,
                FetchOptions::new().dtype(DtypeMap::parse([("missing", "int64")]).unwrap()),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WranglerError::Coercion(CoercionError::MissingColumn(ref c)) if c == "missing"
        ));
    }

    // Scenario: Epoch seconds with an explicit unit.
    // Expected Outcome: seen_at becomes a naive timestamp; the null stays null.
    #[traced_test]
    #[tokio::test]
    async fn tc08() {
        let db = users_db();
        let sql = r#"/*pandas*
[parse_dates]
seen_at = "s"
*pandas*/
SELECT user_id, seen_at FROM users ORDER BY user_id"#;

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;

        assert_dtype(&frame, "seen_at", DataType::Timestamp);
        assert_eq!(cell_as_string(&frame, 0, "seen_at"), "2024-01-15 12:00:00");
        assert_eq!(cell(&frame, 2, "seen_at"), Value::Null);
    }

    // Scenario: The query lives in a .sql file.
    // Expected Outcome:
    // - read_sql_file returns the text unchanged and records its options.
    // - fetch_file gives the same frame as fetching the text.
    #[traced_test]
    #[tokio::test]
    async fn tc09() {
        let db = users_db();
        let sql_path = db.write_file("user_7.sql", USER_7_QUERY);
        let mut wrangler = DbWrangler::new(&db.conn_str()).unwrap();

        let text = wrangler.read_sql_file(&sql_path).await.unwrap();
        assert_eq!(text, USER_7_QUERY);
        assert!(wrangler.options().contains(OptionCategory::IndexCol));
        assert!(wrangler.options().contains(OptionCategory::ParseDates));

        let from_file = wrangler
            .fetch_file(&sql_path, FetchOptions::new())
            .await
            .unwrap();
        let from_text = fetch(&db.conn_str(), USER_7_QUERY, FetchOptions::new()).await;
        assert_eq!(from_file, from_text);
    }

    // Scenario: The connection string is a text file holding a sqlite URL.
    // Expected Outcome: The URL inside the file is used.
    #[traced_test]
    #[tokio::test]
    async fn tc10() {
        let db = users_db();
        let url = format!("sqlite:///{}\n", db.path.display());
        let creds = db.write_file("conn.txt", &url);

        let frame = fetch(
            creds.to_str().unwrap(),
            "SELECT COUNT(*) AS n FROM users",
            FetchOptions::new(),
        )
        .await;
        assert_eq!(cell(&frame, 0, "n"), Value::Int(3));
    }

    // Scenario: The connection string is an existing file that is neither text nor SQLite.
    // Expected Outcome: Creating the wrangler fails.
    #[traced_test]
    #[tokio::test]
    async fn tc11() {
        let db = users_db();
        let image = db.write_file("logo.png", "\u{89}PNG");

        let err = DbWrangler::new(image.to_str().unwrap()).err().unwrap();
        assert!(matches!(
            err,
            WranglerError::Adapter(AdapterError::UnresolvableSpec { .. })
        ));
    }

    // Scenario: The metadata block is malformed.
    // Expected Outcome: The query still runs without options and exactly one warning is logged.
    #[traced_test]
    #[tokio::test]
    async fn tc12() {
        let db = users_db();
        let sql = "/*pandas* index_col = [ *pandas*/ SELECT user_id FROM users";

        let frame = fetch(&db.conn_str(), sql, FetchOptions::new()).await;

        assert!(frame.index.is_empty());
        assert_eq!(frame.num_rows(), 3);
        logs_assert(|lines: &[&str]| {
            let warnings: Vec<_> = lines.iter().filter(|l| l.contains("WARN")).collect();
            match warnings.as_slice() {
                [only] if only.contains("No valid TOML metadata") => Ok(()),
                other => Err(format!("expected one metadata warning, got {other:?}")),
            }
        });
    }

    // Scenario: Empty connection string.
    // Expected Outcome: Options can be read from SQL files but fetching fails.
    #[traced_test]
    #[tokio::test]
    async fn tc13() {
        let db = users_db();
        let sql_path = db.write_file("user_7.sql", USER_7_QUERY);
        let mut wrangler = DbWrangler::new("").unwrap();

        wrangler.read_sql_file(&sql_path).await.unwrap();
        assert_eq!(wrangler.options().len(), 2);

        let err = wrangler
            .fetch_file(&sql_path, FetchOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, WranglerError::NotConnected));
    }

    // Test Settings: Requires the local Postgres test database.
    // Scenario: timestamptz and timestamp columns with an embedded timezone.
    // Expected Outcome:
    // - Converting a frame holding the naive column fails.
    // - Selecting only the aware column converts it.
    #[traced_test]
    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    async fn tc20() {
        reset_postgres(PG_USERS_DDL).await;

        let sql = r#"/*pandas*
index_col = "user_id"
timezone = "America/Chicago"
*pandas*/
SELECT user_id, name, score, created_at FROM users ORDER BY user_id"#;
        let frame = fetch(TEST_PG_URL, sql, FetchOptions::new()).await;

        assert_eq!(frame.index_names(), vec!["user_id"]);
        assert_dtype(&frame, "score", DataType::Float64);
        assert_eq!(cell(&frame, 1, "score"), Value::Null);
        assert_eq!(
            cell(&frame, 0, "created_at"),
            Value::Timestamp(
                chrono_tz::America::Chicago
                    .with_ymd_and_hms(2024, 1, 15, 6, 0, 0)
                    .unwrap()
            )
        );

        let naive_sql = r#"/*pandas* timezone = "UTC" *pandas*/ SELECT local_at FROM users"#;
        let mut wrangler = DbWrangler::new(TEST_PG_URL).unwrap();
        let err = wrangler
            .fetch(naive_sql, FetchOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WranglerError::Timezone(TimezoneError::NaiveTimestamps(..))
        ));
    }

    // Test Settings: Requires the local MySQL test database.
    // Scenario: DATETIME column localized through a zone-aware dtype.
    // Expected Outcome: created_at is UTC-localized and converted to Europe/Paris.
    #[traced_test]
    #[tokio::test]
    #[ignore = "requires a local MySQL"]
    async fn tc21() {
        reset_mysql(MYSQL_USERS_DDL).await;

        let sql = r#"/*pandas*
timezone = "Europe/Paris"

[dtype]
created_at = "string"

[parse_dates]
created_at = { utc = true }
*pandas*/
SELECT user_id, score, created_at FROM users ORDER BY user_id"#;
        let frame = fetch(TEST_MYSQL_URL, sql, FetchOptions::new()).await;

        assert_eq!(cell(&frame, 0, "score"), Value::Float(4.5));
        assert_eq!(
            cell_as_string(&frame, 0, "created_at"),
            "2024-01-15 13:00:00+01:00"
        );
    }
}
