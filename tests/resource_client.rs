//! Resource client behavior against a mocked club API

use serde_json::json;
use tclub::api::{
    ApiError, ApiHttpClient, ClubApi, FilterValue, Filters, ResourceApi, ResourceClient,
};
use tclub::model::{Draft, Event, Team};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn teams_client(server: &MockServer) -> ResourceClient<Team> {
    let http = ApiHttpClient::new(&server.uri()).expect("mock server uri is valid");
    ResourceClient::for_entity(http)
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_array_and_envelope_decode_the_same() {
        let server = MockServer::start().await;
        let teams = json!([
            {"id": 1, "name": "U9 Blues", "students": [3, 4]},
            {"id": 2, "name": "U12 Reds", "students": []}
        ]);

        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("shape", "array"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&teams))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("shape", "envelope"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"items": teams, "total": 2})),
            )
            .mount(&server)
            .await;

        let client = teams_client(&server);
        let mut filters = Filters::new();
        filters.insert("shape".into(), FilterValue::from("array"));
        let from_array = client.list_all(&filters).await.unwrap();
        filters.insert("shape".into(), FilterValue::from("envelope"));
        let from_envelope = client.list_all(&filters).await.unwrap();

        assert_eq!(from_array.len(), 2);
        assert_eq!(from_array, from_envelope);
        assert_eq!(from_array[0].student_ids(), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_unrecognized_shape_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let teams = teams_client(&server).list_all(&Filters::new()).await.unwrap();
        assert!(teams.is_empty());
    }

    #[tokio::test]
    async fn test_filters_become_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("coachId", "6"))
            .and(query_param("active", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 4, "name": "U14", "coachId": 6}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut filters = Filters::new();
        filters.insert("coachId".into(), FilterValue::from(6i64));
        filters.insert("active".into(), FilterValue::from(true));

        let teams = teams_client(&server).list_all(&filters).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].coach_id, Some(6));
    }

    #[tokio::test]
    async fn test_paginated_sends_page_and_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("page", "2"))
            .and(query_param("pageSize", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": 6, "name": "U15"}],
                "total": 6
            })))
            .expect(1)
            .mount(&server)
            .await;

        let slice = teams_client(&server)
            .list_paginated(2, 5, &Filters::new())
            .await
            .unwrap();
        assert_eq!(slice.total, 6);
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].name, "U15");
    }

    #[tokio::test]
    async fn test_malformed_page_is_empty_slice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "U9"}])),
            )
            .mount(&server)
            .await;

        let slice = teams_client(&server)
            .list_paginated(1, 10, &Filters::new())
            .await
            .unwrap();
        assert!(slice.items.is_empty());
        assert_eq!(slice.total, 0);
    }

    #[tokio::test]
    async fn test_undecodable_records_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "name": "Training",
                    "type": "training",
                    "startDate": "2026-10-05T17:00:00.000Z",
                    "endDate": "2026-10-05T18:30:00.000Z"
                },
                {
                    "id": 2,
                    "name": "Cup",
                    "type": "friendly",
                    "startDate": "2026-10-06T17:00:00.000Z",
                    "endDate": "2026-10-06T18:30:00.000Z"
                }
            ])))
            .mount(&server)
            .await;

        let http = ApiHttpClient::new(&server.uri()).expect("mock server uri is valid");
        let events = ResourceClient::<Event>::for_entity(http)
            .list_all(&Filters::new())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 1);
    }

    #[tokio::test]
    async fn test_team_with_both_member_keys_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "A", "students": [{"id": 3, "name": "Lea"}], "studentIds": [3]}
            ])))
            .mount(&server)
            .await;

        let teams = teams_client(&server).list_all(&Filters::new()).await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].student_ids(), vec![3]);
    }

    #[tokio::test]
    async fn test_float_total_is_a_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": 1, "name": "A"}],
                "total": 1.0,
                "count": 1
            })))
            .mount(&server)
            .await;

        let slice = teams_client(&server)
            .list_paginated(1, 10, &Filters::new())
            .await
            .unwrap();
        assert_eq!(slice.total, 1);
        assert_eq!(slice.items.len(), 1);
    }
}

mod single_records {
    use super::*;

    #[tokio::test]
    async fn test_get_one_missing_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/teams/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = teams_client(&server).get_one(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/teams"))
            .and(body_json(json!({"name": "U12 Reds", "coachId": 6})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 101, "name": "U12 Reds", "coachId": 6, "students": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = Draft::new().with("name", "U12 Reds").with("coachId", 6);
        let created = teams_client(&server).create(&draft).await.unwrap();
        assert_eq!(created.id, 101);
        assert_eq!(created.coach_id, Some(6));
    }

    #[tokio::test]
    async fn test_update_patches_item_path() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/teams/9"))
            .and(body_json(json!({"name": "U13 Greens"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 9, "name": "U13 Greens"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let draft = Draft::new().with("name", "U13 Greens");
        let updated = teams_client(&server).update(9, &draft).await.unwrap();
        assert_eq!(updated.name, "U13 Greens");
    }

    #[tokio::test]
    async fn test_server_message_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/teams"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"message": "Team name already taken"})),
            )
            .mount(&server)
            .await;

        let draft = Draft::new().with("name", "U12 Reds");
        match teams_client(&server).create(&draft).await {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(message, "Team name already taken");
            },
            other => panic!("expected status error, got {:?}", other),
        }
    }
}

mod removal {
    use super::*;

    #[tokio::test]
    async fn test_empty_body_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/teams/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = teams_client(&server).remove(5).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_explicit_refusal() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/teams/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let result = teams_client(&server).remove(5).await.unwrap();
        assert!(!result.success);
    }
}

mod club_api {
    use super::*;

    #[tokio::test]
    async fn test_collections_share_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/coaches"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 6, "name": "Marta Silva"}])),
            )
            .mount(&server)
            .await;

        let api = ClubApi::new(&format!("{}/api", server.uri())).unwrap();
        assert!(api.base_url().ends_with("/api/"));

        let coaches = api.coaches.list_all(&Filters::new()).await.unwrap();
        assert_eq!(coaches.len(), 1);
        assert_eq!(coaches[0].name, "Marta Silva");
    }

    #[tokio::test]
    async fn test_events_in_range_send_bounds() {
        use chrono::{TimeZone, Utc};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(query_param("from", "2026-10-01T00:00:00.000Z"))
            .and(query_param("to", "2026-11-01T00:00:00.000Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": 3, "name": "Training", "type": "training",
                    "startDate": "2026-10-05T17:00:00Z", "endDate": "2026-10-05T18:30:00Z"
                }],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = ClubApi::new(&server.uri()).unwrap();
        let from = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();
        let events = api.events.list_in_range(from, to).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Training");
    }
}
