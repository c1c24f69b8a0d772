use sqlx::MySqlPool;
use sqlx::mysql::MySqlDatabaseError;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Bring up the schema on a fresh database. The unique keys carry the
/// invariants the handlers rely on: one student per roll, one attendance
/// row per (student, date) pair.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS students (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
            name VARCHAR(255) NOT NULL,
            roll VARCHAR(64) NOT NULL,
            PRIMARY KEY (id),
            UNIQUE KEY uniq_students_roll (roll)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS attendance (
            id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
            student_id BIGINT UNSIGNED NOT NULL,
            date DATE NOT NULL,
            status ENUM('Present','Absent') NOT NULL,
            PRIMARY KEY (id),
            UNIQUE KEY uniq_attendance_student_date (student_id, date),
            CONSTRAINT fk_attendance_student FOREIGN KEY (student_id) REFERENCES students (id)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

// MySQL error numbers the handlers react to.
pub const ER_DUP_ENTRY: u32 = 1062;
pub const ER_NO_REFERENCED_ROW: u32 = 1452;

pub fn mysql_error_number(e: &sqlx::Error) -> Option<u32> {
    match e {
        sqlx::Error::Database(db_err) => db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| u32::from(e.number())),
        _ => None,
    }
}
