//! Storage initialization.
//!
//! Recreates the practice database from scratch: the old file is removed,
//! the schema is created and the fixed reference data is inserted in one
//! transaction. Running it twice leaves the same contents both times.

use crate::error::{GatewayError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use super::catalog::quote_identifier;

const SCHEMA: &str = r#"
CREATE TABLE departments (
    dept_id INTEGER PRIMARY KEY,
    dept_name TEXT NOT NULL UNIQUE
);

CREATE TABLE employees (
    emp_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    gender TEXT,
    salary INTEGER NOT NULL,
    dept_id INTEGER,
    join_date TEXT,
    email TEXT,
    city TEXT,
    FOREIGN KEY (dept_id) REFERENCES departments(dept_id)
);

CREATE TABLE projects (
    proj_id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    budget INTEGER,
    start_date TEXT,
    end_date TEXT
);

CREATE TABLE employee_projects (
    id INTEGER PRIMARY KEY,
    emp_id INTEGER,
    proj_id INTEGER,
    role TEXT,
    hours_per_week INTEGER,
    FOREIGN KEY (emp_id) REFERENCES employees(emp_id),
    FOREIGN KEY (proj_id) REFERENCES projects(proj_id)
);

CREATE TABLE students (
    student_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    semester INTEGER,
    marks INTEGER,
    department TEXT
);
"#;

/// Tables created by [`initialize`], in creation order.
pub const SEEDED_TABLES: [&str; 5] = [
    "departments",
    "employees",
    "projects",
    "employee_projects",
    "students",
];

const DEPARTMENTS: [(i64, &str); 5] = [
    (1, "Engineering"),
    (2, "Sales"),
    (3, "Marketing"),
    (4, "Support"),
    (5, "HR"),
];

type EmployeeSeed = (i64, &'static str, &'static str, i64, i64, &'static str, &'static str, &'static str);

const EMPLOYEES: [EmployeeSeed; 20] = [
    (101, "Ramesh Kumar", "M", 60000, 2, "2019-02-12", "ramesh.kumar@example.com", "Pune"),
    (102, "Suresh Patil", "M", 80000, 1, "2018-06-01", "suresh.patil@example.com", "Mumbai"),
    (103, "Priya Sharma", "F", 48000, 4, "2020-09-15", "priya.sharma@example.com", "Pune"),
    (104, "Anita Desai", "F", 52000, 3, "2021-03-20", "anita.desai@example.com", "Nagpur"),
    (105, "Rahul Singh", "M", 72000, 1, "2017-11-05", "rahul.singh@example.com", "Pune"),
    (106, "Kavita Joshi", "F", 55000, 3, "2022-01-10", "kavita.joshi@example.com", "Mumbai"),
    (107, "Vikram Rao", "M", 95000, 1, "2015-07-22", "vikram.rao@example.com", "Bengaluru"),
    (108, "Neha Kulkarni", "F", 47000, 2, "2023-02-01", "neha.k@example.com", "Pune"),
    (109, "Amit Mehra", "M", 61000, 2, "2019-12-12", "amit.mehra@example.com", "Delhi"),
    (110, "Sunita Nair", "F", 88000, 1, "2016-08-19", "sunita.nair@example.com", "Chennai"),
    (111, "Kiran Patil", "M", 43000, 4, "2020-07-07", "kiran.patil@example.com", "Pune"),
    (112, "Sana Khan", "F", 66000, 5, "2018-04-04", "sana.khan@example.com", "Mumbai"),
    (113, "Manish Gupta", "M", 71000, 1, "2017-10-13", "manish.gupta@example.com", "Noida"),
    (114, "Meera Rao", "F", 58000, 3, "2019-03-25", "meera.rao@example.com", "Hyderabad"),
    (115, "Aditya Verma", "M", 54000, 4, "2021-12-01", "aditya.verma@example.com", "Pune"),
    (116, "Divya Singh", "F", 67000, 1, "2016-01-15", "divya.singh@example.com", "Mumbai"),
    (117, "Kunal Shah", "M", 46000, 2, "2022-06-21", "kunal.shah@example.com", "Surat"),
    (118, "Pooja Kapoor", "F", 49000, 5, "2020-05-11", "pooja.kapoor@example.com", "Lucknow"),
    (119, "Rohit N", "M", 53000, 3, "2019-09-09", "rohit.n@example.com", "Bengaluru"),
    (120, "Siddharth T", "M", 87000, 1, "2014-02-02", "siddharth.t@example.com", "Pune"),
];

const PROJECTS: [(i64, &str, i64, &str, &str); 5] = [
    (1, "Website Revamp", 120000, "2023-01-01", "2023-06-30"),
    (2, "Mobile App", 250000, "2022-05-01", "2023-05-01"),
    (3, "Cloud Migration", 500000, "2021-09-01", "2022-12-31"),
    (4, "Sales Automation", 80000, "2023-03-15", "2023-12-31"),
    (5, "Marketing Campaign 2024", 150000, "2024-01-10", "2024-04-30"),
];

const ASSIGNMENTS: [(i64, i64, i64, &str, i64); 10] = [
    (1, 102, 1, "Lead", 20),
    (2, 105, 2, "Manager", 25),
    (3, 107, 3, "Architect", 15),
    (4, 101, 4, "Sales Lead", 10),
    (5, 110, 2, "QA", 15),
    (6, 116, 3, "Dev", 30),
    (7, 113, 1, "DevOps", 12),
    (8, 114, 5, "Marketing", 18),
    (9, 106, 5, "Designer", 12),
    (10, 120, 3, "Senior Dev", 20),
];

const STUDENTS: [(i64, &str, i64, i64, &str); 7] = [
    (1, "Ram", 4, 78, "Comp Engg"),
    (2, "Sunita", 6, 92, "IT"),
    (3, "Kiran", 2, 86, "Comp Engg"),
    (4, "Mansi", 8, 69, "Civil"),
    (5, "Deepak", 4, 55, "Mech"),
    (6, "Suhana", 6, 89, "IT"),
    (7, "Ishan", 2, 74, "Comp Engg"),
];

/// Row counts per table after initialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub row_counts: Vec<(String, i64)>,
}

impl SeedReport {
    /// Returns the row count recorded for a table.
    pub fn count(&self, table: &str) -> Option<i64> {
        self.row_counts
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, count)| *count)
    }
}

/// Deletes any existing database at `path` and builds a freshly seeded one.
pub async fn initialize(path: &Path) -> Result<SeedReport> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            GatewayError::unexpected(format!(
                "Failed to create directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    remove_existing(path)?;

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .map_err(|e| GatewayError::unexpected(format!("Failed to create database: {e}")))?;

    let seeded = seed(&mut conn).await;
    let report = match seeded {
        Ok(()) => row_counts(&mut conn).await,
        Err(e) => Err(e),
    };

    if let Err(e) = conn.close().await {
        warn!("Failed to close database after initialization: {e}");
    }

    let report = report?;
    info!(path = %path.display(), "Database initialized and seeded");
    Ok(report)
}

/// Removes the database file and its journal side files, if present.
fn remove_existing(path: &Path) -> Result<()> {
    let mut targets = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm", "-journal"] {
        let mut side = path.as_os_str().to_owned();
        side.push(suffix);
        targets.push(side.into());
    }

    for target in targets {
        match std::fs::remove_file(&target) {
            Ok(()) => debug!(path = %target.display(), "Removed existing file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(GatewayError::unexpected(format!(
                    "Failed to remove {}: {e}",
                    target.display()
                )))
            }
        }
    }
    Ok(())
}

async fn seed(conn: &mut SqliteConnection) -> Result<()> {
    let mut tx = conn.begin().await.map_err(seed_error)?;
    // Borrow the connection once; reborrowing through the transaction at each
    // call makes the future non-Send.
    let conn: &mut SqliteConnection = &mut tx;

    sqlx::Executor::execute(&mut *conn, sqlx::raw_sql(SCHEMA))
        .await
        .map_err(seed_error)?;

    for (id, name) in DEPARTMENTS {
        sqlx::query("INSERT INTO departments (dept_id, dept_name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&mut *conn)
            .await
            .map_err(seed_error)?;
    }

    for (id, name, gender, salary, dept, joined, email, city) in EMPLOYEES {
        sqlx::query(
            "INSERT INTO employees (emp_id, name, gender, salary, dept_id, join_date, email, city) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(gender)
        .bind(salary)
        .bind(dept)
        .bind(joined)
        .bind(email)
        .bind(city)
        .execute(&mut *conn)
        .await
        .map_err(seed_error)?;
    }

    for (id, title, budget, start, end) in PROJECTS {
        sqlx::query(
            "INSERT INTO projects (proj_id, title, budget, start_date, end_date) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(title)
        .bind(budget)
        .bind(start)
        .bind(end)
        .execute(&mut *conn)
        .await
        .map_err(seed_error)?;
    }

    for (id, emp, proj, role, hours) in ASSIGNMENTS {
        sqlx::query(
            "INSERT INTO employee_projects (id, emp_id, proj_id, role, hours_per_week) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(emp)
        .bind(proj)
        .bind(role)
        .bind(hours)
        .execute(&mut *conn)
        .await
        .map_err(seed_error)?;
    }

    for (id, name, semester, marks, department) in STUDENTS {
        sqlx::query(
            "INSERT INTO students (student_id, name, semester, marks, department) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(semester)
        .bind(marks)
        .bind(department)
        .execute(&mut *conn)
        .await
        .map_err(seed_error)?;
    }

    tx.commit().await.map_err(seed_error)
}

async fn row_counts(conn: &mut SqliteConnection) -> Result<SeedReport> {
    let mut row_counts = Vec::with_capacity(SEEDED_TABLES.len());
    for table in SEEDED_TABLES {
        let sql = format!("SELECT count(*) FROM {}", quote_identifier(table));
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&mut *conn)
            .await
            .map_err(seed_error)?;
        row_counts.push((table.to_string(), count));
    }
    Ok(SeedReport { row_counts })
}

fn seed_error(error: sqlx::Error) -> GatewayError {
    GatewayError::unexpected(format!("Database initialization failed: {error}"))
}
