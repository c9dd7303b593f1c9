use crate::api::attendance::{AttendanceQuery, AttendanceResponse, CreateAttendance};
use crate::api::employee::{
    CreateEmployee, DashboardStats, DepartmentCount, EmployeeWithStats,
};
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System — Lite Version

A minimal HRMS: employee records, daily attendance marks and aggregate
statistics.

### Key Features
- **Employee Management** — create, list, view and delete employee profiles
- **Attendance Management** — mark daily Present/Absent status per employee
  (re-marking the same day overwrites the status)
- **Dashboard** — aggregate counts and a per-department breakdown

### Response Format
JSON-based RESTful responses. Errors carry a `{"message": "..."}` body.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::routes::index,
        crate::routes::health,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::dashboard_stats,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::delete_attendance
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            EmployeeWithStats,
            DepartmentCount,
            DashboardStats,
            AttendanceStatus,
            CreateAttendance,
            AttendanceQuery,
            AttendanceResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
