mod common;

use actix_web::web::Data;
use actix_web::{App, test};
use hrms_lite::routes;
use serde_json::{Value, json};

async fn create_employee<S, B>(app: &S, code: &str, name: &str, email: &str) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({
            "employee_code": code,
            "full_name": name,
            "email": email,
            "department": "Eng"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    body["id"].as_i64().unwrap()
}

async fn mark<S, B>(app: &S, employee_id: i64, date: &str, status: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({
            "employee_id": employee_id,
            "date": date,
            "status": status
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let code = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (code, body)
}

#[actix_web::test]
async fn mark_requires_existing_employee() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let (status, body) = mark(&app, 42, "2024-01-01", "Present").await;
    assert_eq!(status, 404);
    assert!(body["message"].as_str().unwrap().contains("Employee"));
}

#[actix_web::test]
async fn mark_joins_employee_display_fields() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let id = create_employee(&app, "E1", "Ada Lovelace", "ada@x.com").await;

    let (status, body) = mark(&app, id, "2024-01-01", "Present").await;
    assert_eq!(status, 201);
    assert_eq!(body["employee_id"], id);
    assert_eq!(body["date"], "2024-01-01");
    assert_eq!(body["status"], "Present");
    assert_eq!(body["employee_name"], "Ada Lovelace");
    assert_eq!(body["employee_code"], "E1");
    assert!(body["created_at"].is_string());
}

#[actix_web::test]
async fn remark_overwrites_status_in_place() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let id = create_employee(&app, "E1", "Ada", "ada@x.com").await;

    let (status, first) = mark(&app, id, "2024-01-01", "Present").await;
    assert_eq!(status, 201);

    let (status, second) = mark(&app, id, "2024-01-01", "Absent").await;
    assert_eq!(status, 201);

    // Same row, new status, original timestamp.
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["status"], "Absent");
    assert_eq!(second["created_at"], first["created_at"]);

    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "Absent");
}

#[actix_web::test]
async fn rejects_unknown_status_and_bad_date() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let id = create_employee(&app, "E1", "Ada", "ada@x.com").await;

    // Only Present/Absent exist.
    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({
            "employee_id": id,
            "date": "2024-01-01",
            "status": "Late"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({
            "employee_id": id,
            "date": "2024-13-40",
            "status": "Present"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn list_filters_by_employee_and_date() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let ada = create_employee(&app, "E1", "Ada", "ada@x.com").await;
    let bob = create_employee(&app, "E2", "Bob", "bob@x.com").await;

    mark(&app, ada, "2024-01-01", "Present").await;
    mark(&app, ada, "2024-01-02", "Absent").await;
    mark(&app, bob, "2024-01-01", "Present").await;

    // Unfiltered, newest date first.
    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["date"], "2024-01-02");

    // By employee.
    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance?employee_id={ada}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|r| r["employee_id"] == ada));

    // By date.
    let req = test::TestRequest::get()
        .uri("/api/attendance?date=2024-01-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|r| r["date"] == "2024-01-01"));

    // Both filters, logical AND.
    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance?employee_id={ada}&date=2024-01-01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["employee_id"], ada);
    assert_eq!(list[0]["date"], "2024-01-01");
}

#[actix_web::test]
async fn get_and_delete_by_id() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let ada = create_employee(&app, "E1", "Ada", "ada@x.com").await;
    let (_, record) = mark(&app, ada, "2024-01-01", "Present").await;
    let id = record["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employee_name"], "Ada");
    assert_eq!(body["employee_code"], "E1");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

// The end-to-end flow: create, conflict, mark, re-mark, cascade delete.
#[actix_web::test]
async fn full_lifecycle_scenario() {
    let pool = common::test_pool().await;
    let app = test::init_service(
        App::new()
            .app_data(Data::new(pool.clone()))
            .configure(|cfg| routes::configure(cfg, common::test_config())),
    )
    .await;

    let ada = create_employee(&app, "E1", "Ada", "ada@x.com").await;

    let req = test::TestRequest::post()
        .uri("/api/employees")
        .set_json(json!({
            "employee_code": "E1",
            "full_name": "Someone Else",
            "email": "other@x.com",
            "department": "Eng"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 409);

    let (status, first) = mark(&app, ada, "2024-01-01", "Present").await;
    assert_eq!(status, 201);

    let (status, second) = mark(&app, ada, "2024-01-01", "Absent").await;
    assert_eq!(status, 201);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["status"], "Absent");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/employees/{ada}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let attendance_id = first["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/{attendance_id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}
