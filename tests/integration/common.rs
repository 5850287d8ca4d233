//! Shared fixture: a seeded SQLite database in a temporary directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use startup_atlas::config::ConnectionConfig;
use startup_atlas::db::{schema, DatabaseBackend, DatabaseClient, SqliteClient};
use tempfile::TempDir;

pub const TIMEOUT: Duration = Duration::from_secs(10);

const SEED: &[&str] = &[
    "INSERT INTO cities (City_ID, Name) VALUES (1, 'Mumbai'), (2, 'Bangalore')",
    "INSERT INTO countries (Country_ID, Name) VALUES (1, 'India'), (2, 'USA')",
    "INSERT INTO industries (Industry_ID, Sector) VALUES \
     (1, 'Fintech'), (2, 'Quick Commerce'), (3, 'EdTech')",
    "INSERT INTO startups (Startup_ID, Name, Founded_Year, City_ID, Industry_ID) VALUES \
     (1, 'Razorpay', 2014, 2, 1), \
     (2, 'Zepto', 2021, 1, 2), \
     (3, 'Unacademy', 2015, 2, 3)",
    "INSERT INTO investors (Investor_ID, Name, Type, Country_ID) VALUES \
     (1, 'Sequoia Capital', 'VC Firm', 2), \
     (2, 'Kunal Shah', 'Angel', 1)",
    "INSERT INTO funding_rounds (Round_ID, Startup_ID, Date, Amount, Stage) VALUES \
     (1, 1, '2020-01-10', 5000000, 'Seed'), \
     (2, 2, '2022-05-01', 20000000, 'Series A'), \
     (3, 1, '2023-03-15', 75000000, 'Series B')",
    "INSERT INTO founders (Founder_ID, Name, Startup_ID, Role, LinkedIn_URL) VALUES \
     (1, 'Harshil Mathur', 1, 'CEO', 'https://www.linkedin.com/in/harshilmathur'), \
     (2, 'Aadit Palicha', 2, 'CEO', NULL)",
];

/// A seeded database that is deleted when dropped.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
    pub client: SqliteClient,
}

impl Fixture {
    pub fn db(&self) -> &dyn DatabaseClient {
        &self.client
    }

    /// Runs a statement on a connection with foreign keys switched off, to
    /// plant rows the application itself would refuse to write.
    pub async fn execute_unchecked(&self, sql: &str) {
        let mut conn = unchecked_connection(&self.path).await;
        sqlx::query(sql).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
    }
}

async fn unchecked_connection(path: &Path) -> SqliteConnection {
    SqliteConnectOptions::new()
        .filename(path)
        .foreign_keys(false)
        .connect()
        .await
        .unwrap()
}

/// An empty database with the schema installed.
pub async fn empty_fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas.db");
    let config = ConnectionConfig {
        backend: DatabaseBackend::Sqlite,
        database: Some(path.display().to_string()),
        ..Default::default()
    };
    let client = SqliteClient::new(&config).unwrap();
    schema::install(&client).await.unwrap();

    Fixture {
        _dir: dir,
        path,
        client,
    }
}

/// The schema plus three startups, two investors, three funding rounds
/// (5M, 20M, 75M), and two founders.
pub async fn seeded_fixture() -> Fixture {
    let fixture = empty_fixture().await;
    for statement in SEED {
        fixture.client.execute(statement, &[]).await.unwrap();
    }
    fixture
}
