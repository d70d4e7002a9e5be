use kapetayo_core::catalog;
use kapetayo_core::config::Config;
use kapetayo_core::contract::{
    BestMatchRequest, CafeIdRequest, CoreRequest, CoreResponse, OnboardRequest, SearchRequest,
};
use kapetayo_core::core_service::CafeService;
use kapetayo_core::model::PriceRange;
use kapetayo_core::store::MemoryStore;

fn test_service() -> CafeService {
    CafeService::with_parts(
        Config::default(),
        catalog::builtin().unwrap(),
        Box::new(MemoryStore::new()),
    )
    .unwrap()
}

#[test]
fn serializes_and_deserializes_search_request() {
    let request = CoreRequest::Search(SearchRequest {
        query: "river afford".to_string(),
        price: Some(PriceRange::Budget),
        ..Default::default()
    });

    let encoded = serde_json::to_string(&request).unwrap();
    assert!(encoded.contains("\"kind\":\"Search\""));
    assert!(encoded.contains("\"price\":\"$\""));

    let decoded: CoreRequest = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn search_payload_fields_are_optional() {
    let decoded: CoreRequest =
        serde_json::from_str(r#"{"kind":"Search","payload":{"query":"latte"}}"#).unwrap();
    assert_eq!(
        decoded,
        CoreRequest::Search(SearchRequest {
            query: "latte".to_string(),
            ..Default::default()
        })
    );

    let unit: CoreRequest = serde_json::from_str(r#"{"kind":"Bookmarks"}"#).unwrap();
    assert_eq!(unit, CoreRequest::Bookmarks);
}

#[test]
fn handles_search_command_with_state_flags() {
    let service = test_service();
    service
        .handle_command(CoreRequest::ToggleBookmark(CafeIdRequest { id: "5".into() }))
        .unwrap();

    let response = service
        .handle_command(CoreRequest::Search(SearchRequest {
            query: "riverbank".into(),
            ..Default::default()
        }))
        .unwrap();

    match response {
        CoreResponse::Search(search) => {
            assert_eq!(search.results.len(), 1);
            assert_eq!(search.results[0].id, "5");
            assert!(search.results[0].bookmarked);
            assert!(!search.results[0].visited);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn handles_toggle_and_profile_commands() {
    let service = test_service();

    let first = service
        .handle_command(CoreRequest::ToggleVisited(CafeIdRequest { id: " 3 ".into() }))
        .unwrap();
    match first {
        CoreResponse::ToggleVisited(toggle) => {
            assert_eq!(toggle.id, "3");
            assert!(toggle.active);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let onboarded = service
        .handle_command(CoreRequest::Onboard(OnboardRequest {
            name: "Maria".into(),
            bio: String::new(),
        }))
        .unwrap();
    match onboarded {
        CoreResponse::Profile(profile) => assert_eq!(profile.name, "Maria"),
        other => panic!("unexpected response: {other:?}"),
    }

    let reset = service.handle_command(CoreRequest::ResetAccount).unwrap();
    assert_eq!(reset, CoreResponse::ResetAccount);
}

#[test]
fn handles_best_match_command() {
    let service = test_service();
    let response = service
        .handle_command(CoreRequest::BestMatch(BestMatchRequest {
            keyword: "matcha".into(),
            limit: None,
        }))
        .unwrap();

    match response {
        CoreResponse::BestMatch(search) => {
            let ids: Vec<&str> = search.results.iter().map(|cafe| cafe.id.as_str()).collect();
            assert_eq!(ids, vec!["1"]);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
