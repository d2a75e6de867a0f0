//! Integration tests per dashboard, profili, mentor e disponibilità
//!
//! Test per:
//! - GET /dashboard
//! - GET/PATCH /profiles/me, GET /profiles/{id}
//! - GET /mentors, GET /mentors/{id}, GET /mentors/{id}/availability
//! - POST /availability, DELETE /availability/{id}

mod common;

#[cfg(test)]
mod profile_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    // ============================================================
    // Test per GET /dashboard
    // ============================================================

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("users", "sessions", "messages", "notifications")
    ))]
    async fn test_dashboard_for_mentee(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .get("/dashboard")
            .add_header("Authorization", bearer(BOB))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["profile"]["username"], "bob");
        let upcoming: Vec<i64> = body["upcoming_sessions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["session_id"].as_i64().unwrap())
            .collect();
        assert_eq!(upcoming, vec![1, 2]);
        assert_eq!(body["pending_session_requests"], 1);
        assert_eq!(body["unread_messages"], 1);
        assert_eq!(body["unread_notifications"], 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions", "messages")))]
    async fn test_dashboard_for_mentor(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let body: Value = server
            .get("/dashboard")
            .add_header("Authorization", bearer(ALICE))
            .await
            .json();
        assert_eq!(body["pending_session_requests"], 1);
        assert_eq!(body["unread_messages"], 2);
        assert_eq!(body["unread_notifications"], 0);
        Ok(())
    }

    // ============================================================
    // Test per /profiles
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile_normalises_skills(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = server
            .patch("/profiles/me")
            .add_header("Authorization", bearer(CAROL))
            .json(&json!({"skills": " Rust ,, Tokio,Axum ", "hourly_rate": 75.5}))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["skills"], json!(["Rust", "Tokio", "Axum"]));
        assert_eq!(body["hourly_rate"], 75.5);
        // bio non fornita: invariata
        assert_eq!(body["bio"], "Rustacean");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_mentee_cannot_set_hourly_rate(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        server
            .patch("/profiles/me")
            .add_header("Authorization", bearer(BOB))
            .json(&json!({"hourly_rate": 20.0}))
            .await
            .assert_status_bad_request();

        server
            .patch("/profiles/me")
            .add_header("Authorization", bearer(ALICE))
            .json(&json!({"hourly_rate": 10000.0}))
            .await
            .assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(
        path = "../fixtures",
        scripts("users", "sessions", "reviews", "social")
    ))]
    async fn test_public_profile(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let alice: Value = server
            .get("/profiles/1")
            .add_header("Authorization", bearer(DAVE))
            .await
            .json();
        assert_eq!(alice["username"], "alice");
        assert_eq!(alice["followers_count"], 1);
        assert_eq!(alice["following_count"], 0);
        assert_eq!(alice["avg_rating"], 4.0);
        assert_eq!(alice["review_count"], 1);

        // per i mentee le statistiche delle recensioni non compaiono
        let bob: Value = server
            .get("/profiles/2")
            .add_header("Authorization", bearer(DAVE))
            .await
            .json();
        assert!(bob.get("avg_rating").is_none());
        assert_eq!(bob["following_count"], 1);

        server
            .get("/profiles/999")
            .add_header("Authorization", bearer(DAVE))
            .await
            .assert_status_not_found();
        Ok(())
    }

    // ============================================================
    // Test per /mentors
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions", "reviews")))]
    async fn test_list_mentors_with_filters(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let all: Value = server
            .get("/mentors")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        let names: Vec<&str> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["alice", "carol"]);
        assert_eq!(all[1]["avg_rating"], 5.0);

        let rust: Value = server
            .get("/mentors")
            .add_query_param("skill", "rust")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        assert_eq!(rust.as_array().unwrap().len(), 1);
        assert_eq!(rust[0]["username"], "carol");

        let by_name: Value = server
            .get("/mentors")
            .add_query_param("search", "al")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        assert_eq!(by_name.as_array().unwrap().len(), 1);
        assert_eq!(by_name[0]["username"], "alice");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions", "reviews")))]
    async fn test_mentor_detail(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let detail: Value = server
            .get("/mentors/1")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        assert_eq!(detail["username"], "alice");
        assert_eq!(detail["availability"].as_array().unwrap().len(), 2);
        assert_eq!(detail["reviews"][0]["reviewer_username"], "bob");

        // bob è un mentee
        server
            .get("/mentors/2")
            .add_header("Authorization", bearer(BOB))
            .await
            .assert_status_not_found();
        Ok(())
    }

    // ============================================================
    // Test per /availability
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions")))]
    async fn test_create_availability_rules(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let created = server
            .post("/availability")
            .add_header("Authorization", bearer(ALICE))
            .json(&json!({"weekday": 0, "start_time": "12:00:00", "end_time": "13:30:00"}))
            .await;
        created.assert_status(StatusCode::CREATED);
        assert_eq!(created.json::<Value>()["mentor_id"], 1);

        // sovrapposta a 09:00-12:00 del lunedì
        server
            .post("/availability")
            .add_header("Authorization", bearer(ALICE))
            .json(&json!({"weekday": 0, "start_time": "11:00:00", "end_time": "12:30:00"}))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .post("/availability")
            .add_header("Authorization", bearer(ALICE))
            .json(&json!({"weekday": 3, "start_time": "15:00:00", "end_time": "14:00:00"}))
            .await
            .assert_status_bad_request();

        server
            .post("/availability")
            .add_header("Authorization", bearer(ALICE))
            .json(&json!({"weekday": 7, "start_time": "10:00:00", "end_time": "11:00:00"}))
            .await
            .assert_status_bad_request();

        server
            .post("/availability")
            .add_header("Authorization", bearer(BOB))
            .json(&json!({"weekday": 1, "start_time": "10:00:00", "end_time": "11:00:00"}))
            .await
            .assert_status_forbidden();

        let slots: Value = server
            .get("/mentors/1/availability")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        assert_eq!(slots.as_array().unwrap().len(), 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions")))]
    async fn test_concurrent_overlapping_slots(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        // carol ha solo il venerdì: gli altri giorni sono liberi
        for weekday in [0, 1, 2, 3, 5, 6] {
            let (first, second) = tokio::join!(
                server
                    .post("/availability")
                    .add_header("Authorization", bearer(CAROL))
                    .json(&json!({"weekday": weekday, "start_time": "10:00:00", "end_time": "12:00:00"})),
                server
                    .post("/availability")
                    .add_header("Authorization", bearer(CAROL))
                    .json(&json!({"weekday": weekday, "start_time": "11:00:00", "end_time": "13:00:00"})),
            );

            let statuses = [first.status_code(), second.status_code()];
            assert_eq!(
                statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
                1,
                "weekday {weekday}: {statuses:?}"
            );
            assert!(statuses.contains(&StatusCode::CONFLICT));
        }

        let slots: Value = server
            .get("/mentors/3/availability")
            .add_header("Authorization", bearer(BOB))
            .await
            .json();
        assert_eq!(slots.as_array().unwrap().len(), 7);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "sessions")))]
    async fn test_delete_availability_owner_only(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        server
            .delete("/availability/3")
            .add_header("Authorization", bearer(ALICE))
            .await
            .assert_status_forbidden();

        server
            .delete("/availability/3")
            .add_header("Authorization", bearer(CAROL))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .delete("/availability/3")
            .add_header("Authorization", bearer(CAROL))
            .await
            .assert_status_not_found();
        Ok(())
    }
}
