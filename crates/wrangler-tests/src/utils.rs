#![allow(dead_code)]

use model::{
    core::{data_type::DataType, value::Value},
    records::frame::Frame,
};
use wrangler::{DbWrangler, FetchOptions};

/// Users with text timestamps, the way SQLite stores them.
pub const USERS_DDL: &str = r#"
    CREATE TABLE users (
        user_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        region TEXT NOT NULL,
        score REAL,
        created_at TEXT,
        seen_at INTEGER
    );
    INSERT INTO users VALUES (7, 'ann', 'eu', 4.5, '2024-01-15 12:00:00', 1705320000);
    INSERT INTO users VALUES (8, 'bob', 'us', NULL, '2024-01-16T08:30:00+02:00', 1705386600);
    INSERT INTO users VALUES (9, 'cyd', 'eu', 2, 'not a date', NULL);
"#;

/// Postgres counterpart of [`USERS_DDL`] with native temporal types.
pub const PG_USERS_DDL: &str = r#"
    CREATE TABLE users (
        user_id BIGINT PRIMARY KEY,
        name VARCHAR(45) NOT NULL,
        score NUMERIC(6, 2),
        created_at TIMESTAMPTZ NOT NULL,
        local_at TIMESTAMP NOT NULL
    );
    INSERT INTO users VALUES
        (7, 'ann', 4.50, '2024-01-15 12:00:00+00', '2024-01-15 12:00:00'),
        (8, 'bob', NULL, '2024-01-16 06:30:00+00', '2024-01-16 06:30:00');
"#;

pub const MYSQL_USERS_DDL: &str = r#"
    DROP TABLE IF EXISTS users;
    CREATE TABLE users (
        user_id BIGINT PRIMARY KEY,
        name VARCHAR(45) NOT NULL,
        score DECIMAL(6, 2),
        created_at DATETIME NOT NULL
    );
    INSERT INTO users VALUES
        (7, 'ann', 4.50, '2024-01-15 12:00:00'),
        (8, 'bob', NULL, '2024-01-16 06:30:00');
"#;

/// Query with embedded options selecting a single user.
pub const USER_7_QUERY: &str = r#"/*pandas*
index_col = "user_id"
parse_dates = ["created_at"]
*pandas*/
SELECT user_id, name, created_at FROM users WHERE user_id = 7"#;

pub async fn fetch(conn: &str, sql: &str, options: FetchOptions) -> Frame {
    let mut wrangler = DbWrangler::new(conn).expect("create wrangler");
    wrangler.fetch(sql, options).await.expect("fetch")
}

pub fn assert_dtype(frame: &Frame, column: &str, expected: DataType) {
    let actual = frame
        .column(column)
        .or_else(|| frame.index_column(column))
        .unwrap_or_else(|| panic!("column '{column}' missing"))
        .data_type
        .clone();
    assert_eq!(actual, expected, "dtype of '{column}'");
}

pub fn cell(frame: &Frame, row: usize, column: &str) -> Value {
    frame
        .get(row, column)
        .cloned()
        .unwrap_or_else(|| panic!("no cell ({row}, {column})"))
}

pub fn cell_as_string(frame: &Frame, row: usize, column: &str) -> String {
    cell(frame, row, column).to_string()
}
