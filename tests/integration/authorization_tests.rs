//! Registration, activation and permission gates end to end

#[cfg(test)]
mod tests {
    use crate::assert_status;
    use crate::common::assertions::{assert_error_message, assert_field_error};
    use crate::common::{ConfigFactory, TestApp};
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use actix_web::web;
    use eiga_api::server::create_app;
    use serde_json::{Value, json};

    const EMAIL: &str = "faith@example.com";
    const PASSWORD: &str = "pa55word1234";

    fn register() -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/v1/users")
            .set_json(json!({ "name": "Faith", "email": EMAIL, "password": PASSWORD }))
    }

    fn login(password: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/v1/tokens/authentication")
            .set_json(json!({ "email": EMAIL, "password": password }))
    }

    fn list_movies(bearer: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::get()
            .uri("/v1/movies")
            .insert_header((header::AUTHORIZATION, bearer.to_string()))
    }

    fn activate(token: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::put()
            .uri("/v1/users/activated")
            .set_json(json!({ "token": token }))
    }

    #[actix_web::test]
    async fn test_user_journey_through_every_gate() {
        let app = TestApp::new(ConfigFactory::unlimited());
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        // Register; the welcome mail goes out in the background
        let res = actix_test::call_service(&service, register().to_request()).await;
        assert_status!(res, StatusCode::ACCEPTED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["user"]["email"], EMAIL);
        assert_eq!(body["user"]["activated"], false);
        assert!(body["user"].get("password_hash").is_none());

        app.state.tracker.wait().await;
        let activation = app
            .mailer
            .activation_token_for(EMAIL)
            .expect("welcome mail carries the activation token");

        // Authenticated but not activated
        let res = actix_test::call_service(&service, login(PASSWORD).to_request()).await;
        assert_status!(res, StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        let bearer = format!(
            "Bearer {}",
            body["authentication_token"]["token"].as_str().unwrap()
        );
        assert!(body["authentication_token"]["expiry"].is_string());

        let res = actix_test::call_service(&service, list_movies(&bearer).to_request()).await;
        assert_status!(res, StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(
            &body,
            "your user account must be activated to access this resource",
        );

        // Activated; registration granted read only
        let res = actix_test::call_service(&service, activate(&activation).to_request()).await;
        assert_status!(res, StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["user"]["activated"], true);

        let res = actix_test::call_service(&service, list_movies(&bearer).to_request()).await;
        assert_status!(res, StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["movies"], json!([]));

        let req = actix_test::TestRequest::post()
            .uri("/v1/movies")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .set_json(json!({
                "title": "Moana",
                "year": 2016,
                "runtime": "107 mins",
                "genres": ["animation", "adventure"]
            }))
            .to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(
            &body,
            "your user account doesn't have the necessary permissions to access this resource",
        );

        // Activation tokens are single use
        let res = actix_test::call_service(&service, activate(&activation).to_request()).await;
        assert_status!(res, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(res).await;
        assert_field_error(&body, "token", "invalid or expired activation token");
    }

    #[actix_web::test]
    async fn test_duplicate_registration_and_wrong_password() {
        let app = TestApp::new(ConfigFactory::unlimited());
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        let res = actix_test::call_service(&service, register().to_request()).await;
        assert_status!(res, StatusCode::ACCEPTED);

        let res = actix_test::call_service(&service, register().to_request()).await;
        assert_status!(res, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(res).await;
        assert_field_error(&body, "email", "a user with this email address already exists");

        let res = actix_test::call_service(&service, login("not-the-password").to_request()).await;
        assert_status!(res, StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(&body, "invalid authentication credentials");

        app.state.tracker.wait().await;
        assert_eq!(app.mailer.sent().len(), 1);
    }

    #[actix_web::test]
    async fn test_anonymous_and_bad_credentials() {
        let app = TestApp::new(ConfigFactory::unlimited());
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        let req = actix_test::TestRequest::get().uri("/v1/movies").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(&body, "you must be authenticated to access this resource");

        let req = list_movies("Bearer XXXXXXXXXXXXXXXXXXXXXXXXXX").to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
        let body: Value = actix_test::read_body_json(res).await;
        assert_error_message(&body, "invalid or missing authentication token");

        // Public routes still reject a bad credential
        let req = actix_test::TestRequest::get()
            .uri("/v1/healthcheck")
            .insert_header((header::AUTHORIZATION, "Token abc"))
            .to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_registration_validation() {
        let app = TestApp::new(ConfigFactory::unlimited());
        let service = actix_test::init_service(create_app(web::Data::new(app.state.clone()))).await;

        let req = actix_test::TestRequest::post()
            .uri("/v1/users")
            .set_json(json!({ "name": "", "email": "nope", "password": "short" }))
            .to_request();
        let res = actix_test::call_service(&service, req).await;
        assert_status!(res, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(res).await;
        assert_field_error(&body, "name", "must be provided");
        assert_field_error(&body, "email", "must be a valid email address");
        assert_field_error(&body, "password", "must be at least 8 bytes long");

        assert_eq!(app.state.tracker.outstanding(), 0);
        assert!(app.mailer.sent().is_empty());
    }
}
