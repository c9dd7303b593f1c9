use crate::{
    error::ApiError,
    model::employee::Employee,
    utils::validation::{require_email, require_non_empty},
};
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::debug;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_code: String,
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: String,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "Engineering", value_type = String)]
    pub department: String,
}

/// Employee plus attendance tallies derived at request time.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeWithStats {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2024-01-01T09:00:00Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(example = 12)]
    pub total_present: i64,
    #[schema(example = 3)]
    pub total_absent: i64,
    #[schema(example = 15)]
    pub total_records: i64,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 7)]
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 25)]
    pub total_employees: i64,
    #[schema(example = 310)]
    pub total_attendance_records: i64,
    #[schema(example = 21)]
    pub present_today: i64,
    #[schema(example = 4)]
    pub absent_today: i64,
    pub departments: Vec<DepartmentCount>,
}

const WITH_STATS_SQL: &str = r#"
    SELECT
        e.id,
        e.employee_code,
        e.full_name,
        e.email,
        e.department,
        e.created_at,
        COALESCE(SUM(CASE WHEN a.status = 'Present' THEN 1 ELSE 0 END), 0) AS total_present,
        COALESCE(SUM(CASE WHEN a.status = 'Absent' THEN 1 ELSE 0 END), 0) AS total_absent,
        COUNT(a.id) AS total_records
    FROM employees e
    LEFT JOIN attendance a ON a.employee_id = e.id
"#;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "Field 'full_name' cannot be empty or whitespace"
        })),
        (status = 409, description = "Duplicate employee code or email", body = Object, example = json!({
            "message": "Employee with code 'EMP-001' already exists"
        }))
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let employee_code = require_non_empty("employee_code", &payload.employee_code)?;
    let full_name = require_non_empty("full_name", &payload.full_name)?;
    let email = require_email("email", &payload.email)?;
    let department = require_non_empty("department", &payload.department)?;

    // Uniqueness checks, code first.
    let code_taken = sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE employee_code = ?")
        .bind(&employee_code)
        .fetch_optional(pool.get_ref())
        .await?;
    if code_taken.is_some() {
        return Err(ApiError::Conflict(format!(
            "Employee with code '{employee_code}' already exists"
        )));
    }

    let email_taken = sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE email = ?")
        .bind(&email)
        .fetch_optional(pool.get_ref())
        .await?;
    if email_taken.is_some() {
        return Err(ApiError::Conflict(format!(
            "Employee with email '{email}' already exists"
        )));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_code, full_name, email, department, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_code)
    .bind(&full_name)
    .bind(&email)
    .bind(&department)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(pool.get_ref())
        .await?;

    debug!(id = employee.id, code = %employee.employee_code, "Employee created");

    Ok(HttpResponse::Created().json(employee))
}

/// List Employees with attendance stats
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employees, most recently created first", body = [EmployeeWithStats])
    ),
    tag = "Employees"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let sql = format!("{WITH_STATS_SQL} GROUP BY e.id ORDER BY e.created_at DESC, e.id DESC");

    let employees = sqlx::query_as::<_, EmployeeWithStats>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee internal ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeWithStats),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let sql = format!("{WITH_STATS_SQL} WHERE e.id = ? GROUP BY e.id");

    let employee = sqlx::query_as::<_, EmployeeWithStats>(&sql)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee (cascades to attendance)
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee internal ID")
    ),
    responses(
        (status = 200, description = "Employee and attendance deleted", body = Object, example = json!({
            "message": "Employee 'John Doe' deleted successfully"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();

    let full_name =
        sqlx::query_scalar::<_, String>("SELECT full_name FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?;

    // Children first, parent second, one transaction.
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    debug!(employee_id, "Employee deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Employee '{full_name}' deleted successfully")
    })))
}

/// Dashboard aggregate counts
#[utoipa::path(
    get,
    path = "/api/employees/dashboard/stats",
    responses(
        (status = 200, description = "Aggregate counts", body = DashboardStats)
    ),
    tag = "Employees"
)]
pub async fn dashboard_stats(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool.get_ref())
        .await?;

    let total_attendance_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
        .fetch_one(pool.get_ref())
        .await?;

    let today = Local::now().date_naive();

    let present_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status = 'Present'",
    )
    .bind(today)
    .fetch_one(pool.get_ref())
    .await?;

    let absent_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status = 'Absent'",
    )
    .bind(today)
    .fetch_one(pool.get_ref())
    .await?;

    let departments = sqlx::query_as::<_, DepartmentCount>(
        "SELECT department, COUNT(id) AS count FROM employees GROUP BY department",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(DashboardStats {
        total_employees,
        total_attendance_records,
        present_today,
        absent_today,
        departments,
    }))
}
