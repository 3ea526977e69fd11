//! Admission control through the full middleware stack

#[cfg(test)]
mod tests {
    use crate::assert_status;
    use crate::common::assertions::assert_error_message;
    use crate::common::{ConfigFactory, TestApp};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use actix_web::web;
    use eiga_api::server::create_app;
    use serde_json::Value;
    use std::net::SocketAddr;

    fn from(peer: &str, uri: &str) -> actix_test::TestRequest {
        let addr: SocketAddr = peer.parse().unwrap();
        actix_test::TestRequest::get()
            .uri(uri)
            .peer_addr(addr)
    }

    #[actix_web::test]
    async fn test_burst_then_429_with_envelope() {
        let app = TestApp::new(ConfigFactory::per_client(0.1, 3));
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        for _ in 0..3 {
            let req = from("192.0.2.10:5000", "/v1/healthcheck").to_request();
            let res = actix_test::call_service(&service, req).await;
            assert_status!(res, StatusCode::OK);
        }

        let req = from("192.0.2.10:5001", "/v1/healthcheck").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::TOO_MANY_REQUESTS);
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(&body, "rate limit exceeded");
    }

    #[actix_web::test]
    async fn test_clients_are_isolated() {
        let app = TestApp::new(ConfigFactory::per_client(0.1, 1));
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        let req = from("192.0.2.10:5000", "/v1/healthcheck").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::OK);
        let req = from("192.0.2.10:5000", "/v1/healthcheck").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::TOO_MANY_REQUESTS);

        let req = from("192.0.2.11:5000", "/v1/healthcheck").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::OK);

        assert_eq!(app.state.clients.len(), 2);
    }

    #[actix_web::test]
    async fn test_denial_precedes_routing_and_authentication() {
        let app = TestApp::new(ConfigFactory::per_client(0.1, 1));
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        let req = from("192.0.2.10:5000", "/v1/healthcheck").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::OK);

        let req = actix_test::TestRequest::get()
            .uri("/v1/does-not-exist")
            .peer_addr("192.0.2.10:5000".parse().unwrap())
            .insert_header(("Authorization", "Bearer nonsense"))
            .to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_unlimited_config_never_denies() {
        let app = TestApp::new(ConfigFactory::unlimited());
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        for _ in 0..50 {
            let req = from("192.0.2.10:5000", "/v1/healthcheck").to_request();
            let res = actix_test::call_service(&service, req).await;
            assert_status!(res, StatusCode::OK);
        }
        assert!(app.state.clients.is_empty());
    }
}
