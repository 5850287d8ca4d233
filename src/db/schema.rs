//! Ecosystem schema installation.
//!
//! The DDL below is accepted by both MySQL and SQLite. Tables are created in
//! dependency order so foreign keys always point at existing tables.

use super::DatabaseClient;
use crate::error::{AtlasError, Result};
use tracing::{debug, info};

/// Table names in creation order.
pub const TABLES: [&str; 8] = [
    "cities",
    "countries",
    "industries",
    "startups",
    "investors",
    "funding_rounds",
    "founders",
    "acquisitions",
];

const CREATE_STATEMENTS: [&str; 8] = [
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        City_ID INT PRIMARY KEY,
        Name VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS countries (
        Country_ID INT PRIMARY KEY,
        Name VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS industries (
        Industry_ID INT PRIMARY KEY,
        Sector VARCHAR(100) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS startups (
        Startup_ID INT PRIMARY KEY,
        Name VARCHAR(150) NOT NULL,
        Founded_Year INT,
        City_ID INT,
        Industry_ID INT,
        FOREIGN KEY (City_ID) REFERENCES cities (City_ID),
        FOREIGN KEY (Industry_ID) REFERENCES industries (Industry_ID)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS investors (
        Investor_ID INT PRIMARY KEY,
        Name VARCHAR(150) NOT NULL,
        Type VARCHAR(30),
        Country_ID INT,
        FOREIGN KEY (Country_ID) REFERENCES countries (Country_ID)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS funding_rounds (
        Round_ID INT PRIMARY KEY,
        Startup_ID INT NOT NULL,
        Date DATE,
        Amount DECIMAL(15,2),
        Stage VARCHAR(20),
        FOREIGN KEY (Startup_ID) REFERENCES startups (Startup_ID)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS founders (
        Founder_ID INT PRIMARY KEY,
        Name VARCHAR(150) NOT NULL,
        Startup_ID INT,
        Role VARCHAR(100),
        LinkedIn_URL VARCHAR(255),
        FOREIGN KEY (Startup_ID) REFERENCES startups (Startup_ID)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS acquisitions (
        Acquirer_Startup_ID INT NOT NULL,
        Target_Startup_ID INT NOT NULL,
        Date DATE NOT NULL,
        Amount DECIMAL(15,2),
        PRIMARY KEY (Acquirer_Startup_ID, Target_Startup_ID, Date),
        FOREIGN KEY (Acquirer_Startup_ID) REFERENCES startups (Startup_ID),
        FOREIGN KEY (Target_Startup_ID) REFERENCES startups (Startup_ID)
    )
    "#,
];

/// Creates every missing table. Existing tables are left untouched.
pub async fn install(db: &dyn DatabaseClient) -> Result<Vec<&'static str>> {
    for (table, ddl) in TABLES.iter().zip(CREATE_STATEMENTS.iter()) {
        debug!("Ensuring table {table}");
        db.execute(ddl, &[]).await.map_err(|e| {
            AtlasError::mutation(format!("Failed to create table {table}: {}", e.message()))
        })?;
    }

    info!(
        "Schema ready on {} ({} tables)",
        db.backend().as_str(),
        TABLES.len()
    );
    Ok(TABLES.to_vec())
}
