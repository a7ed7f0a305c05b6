// tests/test_project_api.rs


use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use taskhub::api::pagination::Paginated;
use taskhub::projects::types::{Project, ProjectDetail, ProjectStatistics};
use taskhub::tasks::types::TaskDetail;

#[tokio::test]
async fn test_project_api_endpoints() {
    let (app, state) = test_helpers::create_test_app().await;
    let (user, token) = test_helpers::register_user(&state, "alice").await;

    println!("🌐 Testing Project REST API...");

    // Create project
    println!("\n📮 POST /api/projects");
    let response = app
        .clone()
        .oneshot(test_helpers::post_json(
            "/api/projects",
            &token,
            &json!({ "name": "API Test Project", "description": "Created via API" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Project = test_helpers::json_body(response).await;
    assert_eq!(created.name, "API Test Project");
    assert_eq!(created.owner.id, user.id);
    assert!(created.is_active);
    assert_eq!(created.tasks_count, 0);
    println!("✅ Project created: {}", created.id);

    // Get project detail
    println!("\n📮 GET /api/projects/{}", created.id);
    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects/{}", created.id),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let detail: ProjectDetail = test_helpers::json_body(response).await;
    assert_eq!(detail.id, created.id);
    assert!(detail.tasks.is_empty());
    println!("✅ Project fetched");

    // List projects
    println!("\n📮 GET /api/projects");
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    assert_eq!(listed.count, 1);
    assert_eq!(listed.results.len(), 1);
    println!("✅ Project list retrieved");

    // Partial update
    println!("\n📮 PATCH /api/projects/{}", created.id);
    let response = app
        .clone()
        .oneshot(test_helpers::patch_json(
            &format!("/api/projects/{}", created.id),
            &token,
            &json!({ "name": "Updated Project", "is_active": false }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Project = test_helpers::json_body(response).await;
    assert_eq!(updated.name, "Updated Project");
    assert!(!updated.is_active);
    assert_eq!(updated.description, "Created via API");
    println!("✅ Project updated");

    // Delete
    println!("\n📮 DELETE /api/projects/{}", created.id);
    let response = app
        .clone()
        .oneshot(test_helpers::delete(
            &format!("/api/projects/{}", created.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects/{}", created.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    println!("✅ Project deleted");
}

#[tokio::test]
async fn test_get_unknown_project_is_404() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(test_helpers::get("/api/projects/non-existent-id", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(test_helpers::post_json(
            "/api/projects",
            &token,
            &json!({ "name": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

async fn create_project(app: &axum::Router, token: &str, name: &str) -> Project {
    let response = app
        .clone()
        .oneshot(test_helpers::post_json(
            "/api/projects",
            token,
            &json!({ "name": name }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    test_helpers::json_body(response).await
}

async fn create_task_with_status(
    app: &axum::Router,
    token: &str,
    project_id: &str,
    title: &str,
    status: &str,
) -> TaskDetail {
    let response = app
        .clone()
        .oneshot(test_helpers::post_json(
            "/api/tasks",
            token,
            &json!({ "title": title, "project": project_id, "status": status }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    test_helpers::json_body(response).await
}

#[tokio::test]
async fn test_project_statistics() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let project = create_project(&app, &token, "Stats Project").await;

    create_task_with_status(&app, &token, &project.id, "T1", "completed").await;
    create_task_with_status(&app, &token, &project.id, "T2", "in_progress").await;
    create_task_with_status(&app, &token, &project.id, "T3", "todo").await;

    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects/{}/statistics", project.id),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats: ProjectStatistics = test_helpers::json_body(response).await;
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.in_progress_tasks, 1);
    assert_eq!(stats.todo_tasks, 1);
    assert_eq!(stats.overdue_tasks, 0);

    // The derived counts on the project itself agree
    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects/{}", project.id),
            &token,
        ))
        .await
        .unwrap();
    let detail: ProjectDetail = test_helpers::json_body(response).await;
    assert_eq!(detail.tasks_count, 3);
    assert_eq!(detail.completed_tasks_count, 1);
    assert_eq!(detail.tasks.len(), 3);
}

#[tokio::test]
async fn test_statistics_for_unknown_project_is_404() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(test_helpers::get(
            "/api/projects/non-existent-id/statistics",
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_project_cascades_to_tasks() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let project = create_project(&app, &token, "Doomed").await;
    let task = create_task_with_status(&app, &token, &project.id, "Orphan", "todo").await;

    let response = app
        .clone()
        .oneshot(test_helpers::delete(
            &format!("/api/projects/{}", project.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(test_helpers::get(&format!("/api/tasks/{}", task.id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_detail_embeds_at_most_ten_tasks() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let project = create_project(&app, &token, "Busy Project").await;
    for i in 0..12 {
        create_task_with_status(&app, &token, &project.id, &format!("Task {i}"), "todo").await;
    }

    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects/{}", project.id),
            &token,
        ))
        .await
        .unwrap();

    let detail: ProjectDetail = test_helpers::json_body(response).await;
    assert_eq!(detail.tasks_count, 12);
    assert_eq!(detail.tasks.len(), 10);
}

#[tokio::test]
async fn test_project_filters_and_search() {
    let (app, state) = test_helpers::create_test_app().await;
    let (user, token) = test_helpers::register_user(&state, "alice").await;
    let (other, _other_token) = test_helpers::register_user(&state, "bob").await;

    create_project(&app, &token, "Website Redesign").await;
    create_project(&app, &token, "Backend Migration").await;

    // A project owned by someone else
    state
        .project_store
        .create_project("Bob Side Project".to_string(), String::new(), &other.id, true)
        .await
        .unwrap();

    // Name substring, case-insensitive
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects?name=redesign", &token))
        .await
        .unwrap();
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    assert_eq!(listed.count, 1);
    assert_eq!(listed.results[0].name, "Website Redesign");

    // Owner filter
    let response = app
        .clone()
        .oneshot(test_helpers::get(
            &format!("/api/projects?owner={}", user.id),
            &token,
        ))
        .await
        .unwrap();
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    assert_eq!(listed.count, 2);

    // Search across name and description
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects?search=migration", &token))
        .await
        .unwrap();
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    assert_eq!(listed.count, 1);
    assert_eq!(listed.results[0].name, "Backend Migration");

    // Ordering override from the allow-list
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects?ordering=name", &token))
        .await
        .unwrap();
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    let names: Vec<_> = listed.results.iter().map(|p| p.name.clone()).collect();
    assert_eq!(
        names,
        vec!["Backend Migration", "Bob Side Project", "Website Redesign"]
    );

    // is_active filter restricts on both values
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects?is_active=false", &token))
        .await
        .unwrap();
    let listed: Paginated<Project> = test_helpers::json_body(response).await;
    assert_eq!(listed.count, 0);
}
