use crate::{
    error::ApiError,
    model::attendance::{Attendance, AttendanceStatus},
    model::employee::Employee,
};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateAttendance {
    /// Internal employee id, not the employee code.
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceQuery {
    pub employee_id: Option<i64>,
    #[schema(example = "2024-01-01", format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
}

/// Attendance record with the owning employee's display fields joined in.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
    #[schema(example = "2024-01-01T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
}

const JOINED_SQL: &str = r#"
    SELECT
        a.id,
        a.employee_id,
        a.date,
        a.status,
        a.created_at,
        e.full_name AS employee_name,
        e.employee_code
    FROM attendance a
    JOIN employees e ON e.id = a.employee_id
"#;

/// Mark attendance (create-or-update)
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = AttendanceResponse),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, ApiError> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(payload.employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    // Atomic upsert keyed on (employee_id, date). A re-mark overwrites the
    // status only; created_at keeps the value from the first insert.
    sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (employee_id, date) DO UPDATE SET status = excluded.status
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .bind(payload.status)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await?;

    // Re-read by key: the update branch produces no new rowid.
    let record = sqlx::query_as::<_, Attendance>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(payload.employee_id)
    .bind(payload.date)
    .fetch_one(pool.get_ref())
    .await?;

    debug!(
        employee_id = record.employee_id,
        date = %record.date,
        status = %record.status,
        "Attendance marked"
    );

    Ok(HttpResponse::Created().json(AttendanceResponse {
        id: record.id,
        employee_id: record.employee_id,
        date: record.date,
        status: record.status,
        created_at: record.created_at,
        employee_name: employee.full_name,
        employee_code: employee.employee_code,
    }))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("employee_id" = Option<i64>, Query, description = "Filter by employee internal ID"),
        ("date" = Option<String>, Query, description = "Filter by date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Matching records, newest date first", body = [AttendanceResponse])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut conditions = Vec::new();
    if query.employee_id.is_some() {
        conditions.push("a.employee_id = ?");
    }
    if query.date.is_some() {
        conditions.push("a.date = ?");
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let sql = format!("{JOINED_SQL} {where_clause} ORDER BY a.date DESC, a.id DESC");
    debug!(sql = %sql, filters = ?query, "Fetching attendance");

    let mut data_query = sqlx::query_as::<_, AttendanceResponse>(&sql);
    if let Some(employee_id) = query.employee_id {
        data_query = data_query.bind(employee_id);
    }
    if let Some(date) = query.date {
        data_query = data_query.bind(date);
    }

    let records = data_query.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Get attendance record by ID
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = AttendanceResponse),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "message": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let attendance_id = path.into_inner();

    let sql = format!("{JOINED_SQL} WHERE a.id = ?");
    let record = sqlx::query_as::<_, AttendanceResponse>(&sql)
        .bind(attendance_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Attendance record not found".to_string()))?;

    Ok(HttpResponse::Ok().json(record))
}

/// Delete attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = i64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "message": "Attendance record deleted successfully"
        })),
        (status = 404, description = "Record not found", body = Object, example = json!({
            "message": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let attendance_id = path.into_inner();

    let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Attendance record not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted successfully"
    })))
}
