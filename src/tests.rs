#[cfg(test)]
mod integration_tests {
    use std::str::FromStr;

    use crate::handlers::auth::{LoginRequest, RegisterRequest, UpdateProfileRequest};
    use crate::handlers::favorites::AddFavoriteRequest;
    use crate::handlers::inquiries::CreateInquiryRequest;
    use crate::handlers::photos::AddPhotoRequest;
    use crate::handlers::properties::{CreatePropertyRequest, UpdatePropertyRequest};
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{seed_user, setup_test_app};
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use model::entities::user::UserRole;
    use model::entities::{favorite, inquiry, property_photo};
    use rust_decimal::Decimal;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    fn bearer(token: &str) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }

    /// Register over HTTP and return (user id, token).
    async fn register_user(
        server: &TestServer,
        name: &str,
        email: &str,
        role: &str,
    ) -> (i32, String) {
        let response = server
            .post("/api/v1/auth/register")
            .json(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: "pw123456".to_string(),
                role: role.to_string(),
                phone: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        let user_id = body.data["user"]["id"].as_i64().unwrap() as i32;
        let token = body.data["token"].as_str().unwrap().to_string();
        (user_id, token)
    }

    /// Create a listing over HTTP and return its id.
    async fn create_listing(
        server: &TestServer,
        token: &str,
        title: &str,
        property_type: &str,
        price: &str,
        photos: Vec<&str>,
    ) -> i32 {
        let (name, value) = bearer(token);
        let response = server
            .post("/api/v1/properties")
            .add_header(name, value)
            .json(&CreatePropertyRequest {
                title: title.to_string(),
                description: Some("A lovely place".to_string()),
                price: Decimal::from_str(price).unwrap(),
                property_type: property_type.to_string(),
                location: "Springfield".to_string(),
                bedrooms: Some(3),
                bathrooms: Some(2),
                area: Some(Decimal::from_str("120.50").unwrap()),
                photos: photos.into_iter().map(str::to_string).collect(),
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_scenario() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Register a buyer
        let (user_id, token) = register_user(&server, "Bob", "b@example.com", "buyer").await;
        assert!(user_id > 0);

        // The registration token is immediately usable
        let (name, value) = bearer(&token);
        let me = server.get("/api/v1/auth/me").add_header(name, value).await;
        me.assert_status(StatusCode::OK);
        let me_body: ApiResponse<serde_json::Value> = me.json();
        assert_eq!(me_body.data["email"], "b@example.com");
        assert_eq!(me_body.data["role"], "buyer");

        // Login with the same credentials succeeds and returns a token
        let login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "b@example.com".to_string(),
                password: "pw123456".to_string(),
            })
            .await;
        login.assert_status(StatusCode::OK);
        let login_body: ApiResponse<serde_json::Value> = login.json();
        assert!(login_body.data["token"].as_str().unwrap().len() > 0);

        // A second registration with the same email is a conflict
        let duplicate = server
            .post("/api/v1/auth/register")
            .json(&RegisterRequest {
                name: "Imposter".to_string(),
                email: "b@example.com".to_string(),
                password: "pw123456".to_string(),
                role: "buyer".to_string(),
                phone: None,
            })
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_roles() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        for bad_role in ["landlord", "admin", ""] {
            let response = server
                .post("/api/v1/auth/register")
                .json(&RegisterRequest {
                    name: "X".to_string(),
                    email: format!("{}@example.com", if bad_role.is_empty() { "empty" } else { bad_role }),
                    password: "pw123456".to_string(),
                    role: bad_role.to_string(),
                    phone: None,
                })
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_register_validates_email_and_password() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Not an email address
        let bad_email = server
            .post("/api/v1/auth/register")
            .json(&RegisterRequest {
                name: "X".to_string(),
                email: "not-an-email".to_string(),
                password: "pw123456".to_string(),
                role: "buyer".to_string(),
                phone: None,
            })
            .await;
        bad_email.assert_status(StatusCode::BAD_REQUEST);

        // Password too short
        let short_password = server
            .post("/api/v1/auth/register")
            .json(&RegisterRequest {
                name: "X".to_string(),
                email: "x@example.com".to_string(),
                password: "short".to_string(),
                role: "buyer".to_string(),
                phone: None,
            })
            .await;
        short_password.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_failures_are_unauthorized() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        register_user(&server, "Bob", "b@example.com", "buyer").await;

        // Wrong password
        let wrong_password = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "b@example.com".to_string(),
                password: "pw654321".to_string(),
            })
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);

        // Unknown email gets the identical failure
        let unknown = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "pw123456".to_string(),
            })
            .await;
        unknown.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_a_valid_token() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // No token at all
        let missing = server.get("/api/v1/auth/me").await;
        missing.assert_status(StatusCode::UNAUTHORIZED);

        // Garbage token
        let (name, value) = bearer("garbage.token.here");
        let garbage = server.get("/api/v1/auth/me").add_header(name, value).await;
        garbage.assert_status(StatusCode::UNAUTHORIZED);

        // A valid token for a user that no longer exists
        let (user_id, token) = register_user(&server, "Gone", "gone@example.com", "buyer").await;
        model::entities::user::Entity::delete_by_id(user_id)
            .exec(&state.db)
            .await
            .unwrap();
        let (name, value) = bearer(&token);
        let deleted = server.get("/api/v1/auth/me").add_header(name, value).await;
        deleted.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_profile_changes_password_but_never_role() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, token) = register_user(&server, "Bob", "b@example.com", "buyer").await;

        let (name, value) = bearer(&token);
        let response = server
            .put("/api/v1/auth/profile")
            .add_header(name, value)
            .json(&UpdateProfileRequest {
                name: Some("Robert".to_string()),
                phone: Some("555-0100".to_string()),
                password: Some("newpw12345".to_string()),
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data["name"], "Robert");
        assert_eq!(body.data["phone"], "555-0100");
        // Role untouched by profile updates
        assert_eq!(body.data["role"], "buyer");

        // The new password logs in, the old one does not
        let new_login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "b@example.com".to_string(),
                password: "newpw12345".to_string(),
            })
            .await;
        new_login.assert_status(StatusCode::OK);

        let old_login = server
            .post("/api/v1/auth/login")
            .json(&LoginRequest {
                email: "b@example.com".to_string(),
                password: "pw123456".to_string(),
            })
            .await;
        old_login.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_property_requires_agent_role() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, buyer_token) = register_user(&server, "Bob", "b@example.com", "buyer").await;
        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;

        // Buyer is refused
        let (name, value) = bearer(&buyer_token);
        let forbidden = server
            .post("/api/v1/properties")
            .add_header(name, value)
            .json(&CreatePropertyRequest {
                title: "Nope".to_string(),
                description: None,
                price: Decimal::from_str("100000.00").unwrap(),
                property_type: "house".to_string(),
                location: "Springfield".to_string(),
                bedrooms: None,
                bathrooms: None,
                area: None,
                photos: vec![],
            })
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        // Unauthenticated is a 401, not a 403
        let unauthenticated = server
            .post("/api/v1/properties")
            .json(&AddFavoriteRequest { property_id: 1 })
            .await;
        unauthenticated.assert_status(StatusCode::UNAUTHORIZED);

        // Agent succeeds, photos attached in the same request
        let (name, value) = bearer(&agent_token);
        let created = server
            .post("/api/v1/properties")
            .add_header(name, value)
            .json(&CreatePropertyRequest {
                title: "Family house".to_string(),
                description: Some("Sunny".to_string()),
                price: Decimal::from_str("250000.00").unwrap(),
                property_type: "house".to_string(),
                location: "Springfield".to_string(),
                bedrooms: Some(3),
                bathrooms: Some(2),
                area: Some(Decimal::from_str("120.50").unwrap()),
                photos: vec![
                    "https://img.example/1.jpg".to_string(),
                    "https://img.example/2.jpg".to_string(),
                ],
            })
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = created.json();
        assert_eq!(body.data["photos"].as_array().unwrap().len(), 2);
        assert_eq!(body.data["price"], "250000.00");
    }

    #[tokio::test]
    async fn test_create_property_with_unknown_type_creates_nothing() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;

        let (name, value) = bearer(&agent_token);
        let response = server
            .post("/api/v1/properties")
            .add_header(name, value)
            .json(&CreatePropertyRequest {
                title: "Castle on the hill".to_string(),
                description: None,
                price: Decimal::from_str("900000.00").unwrap(),
                property_type: "castle".to_string(),
                location: "Scotland".to_string(),
                bedrooms: None,
                bathrooms: None,
                area: None,
                photos: vec![],
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Nothing was created
        let listing = server.get("/api/v1/properties").await;
        let body: ApiResponse<Vec<serde_json::Value>> = listing.json();
        assert_eq!(body.data.len(), 0);
    }

    #[tokio::test]
    async fn test_create_property_rejects_non_positive_price() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;

        for price in ["0", "-5.00"] {
            let (name, value) = bearer(&agent_token);
            let response = server
                .post("/api/v1/properties")
                .add_header(name, value)
                .json(&CreatePropertyRequest {
                    title: "Free house".to_string(),
                    description: None,
                    price: Decimal::from_str(price).unwrap(),
                    property_type: "house".to_string(),
                    location: "Nowhere".to_string(),
                    bedrooms: None,
                    bathrooms: None,
                    area: None,
                    photos: vec![],
                })
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_property_mutation_ownership() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_one) = register_user(&server, "Alice", "a1@example.com", "agent").await;
        let (_, agent_two) = register_user(&server, "Anna", "a2@example.com", "agent").await;
        let (_admin, admin_token) =
            seed_user(&state, "Root", "root@example.com", UserRole::Admin).await;

        let property_id = create_listing(&server, &agent_one, "House", "house", "250000.00", vec![]).await;

        // A different agent may not update it
        let (name, value) = bearer(&agent_two);
        let forbidden = server
            .put(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .json(&UpdatePropertyRequest {
                title: Some("Hijacked".to_string()),
                description: None,
                price: None,
                property_type: None,
                location: None,
                bedrooms: None,
                bathrooms: None,
                area: None,
            })
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        // The owner may
        let (name, value) = bearer(&agent_one);
        let updated = server
            .put(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .json(&UpdatePropertyRequest {
                title: Some("Renovated house".to_string()),
                description: None,
                price: Some(Decimal::from_str("260000.00").unwrap()),
                property_type: None,
                location: None,
                bedrooms: None,
                bathrooms: None,
                area: None,
            })
            .await;
        updated.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = updated.json();
        assert_eq!(body.data["title"], "Renovated house");
        assert_eq!(body.data["price"], "260000.00");

        // A type outside the enumeration is refused on update too
        let (name, value) = bearer(&agent_one);
        let bad_type = server
            .put(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .json(&UpdatePropertyRequest {
                title: None,
                description: None,
                price: None,
                property_type: Some("castle".to_string()),
                location: None,
                bedrooms: None,
                bathrooms: None,
                area: None,
            })
            .await;
        bad_type.assert_status(StatusCode::BAD_REQUEST);

        // An admin may update anything
        let (name, value) = bearer(&admin_token);
        let admin_update = server
            .put(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .json(&UpdatePropertyRequest {
                title: None,
                description: None,
                price: None,
                property_type: Some("apartment".to_string()),
                location: None,
                bedrooms: None,
                bathrooms: None,
                area: None,
            })
            .await;
        admin_update.assert_status(StatusCode::OK);

        // A different agent may not delete it either
        let (name, value) = bearer(&agent_two);
        let forbidden_delete = server
            .delete(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .await;
        forbidden_delete.assert_status(StatusCode::FORBIDDEN);

        // An admin may delete any listing
        let (name, value) = bearer(&admin_token);
        let admin_delete = server
            .delete(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .await;
        admin_delete.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_property_delete_cascades_everything() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;
        let (_, buyer_token) = register_user(&server, "Bob", "b@example.com", "buyer").await;

        let property_id = create_listing(
            &server,
            &agent_token,
            "Doomed house",
            "house",
            "250000.00",
            vec!["https://img.example/1.jpg", "https://img.example/2.jpg"],
        )
        .await;

        // Buyer attaches an inquiry and a favorite
        let (name, value) = bearer(&buyer_token);
        server
            .post("/api/v1/inquiries")
            .add_header(name, value)
            .json(&CreateInquiryRequest {
                property_id,
                message: "Still available?".to_string(),
            })
            .await
            .assert_status(StatusCode::CREATED);
        let (name, value) = bearer(&buyer_token);
        server
            .post("/api/v1/favorites")
            .add_header(name, value)
            .json(&AddFavoriteRequest { property_id })
            .await
            .assert_status(StatusCode::CREATED);

        // Delete the listing
        let (name, value) = bearer(&agent_token);
        server
            .delete(&format!("/api/v1/properties/{}", property_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);

        // Zero orphans remain
        let photos = property_photo::Entity::find()
            .filter(property_photo::Column::PropertyId.eq(property_id))
            .all(&state.db)
            .await
            .unwrap();
        let inquiries = inquiry::Entity::find()
            .filter(inquiry::Column::PropertyId.eq(property_id))
            .all(&state.db)
            .await
            .unwrap();
        let favorites = favorite::Entity::find()
            .filter(favorite::Column::PropertyId.eq(property_id))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(photos.len(), 0);
        assert_eq!(inquiries.len(), 0);
        assert_eq!(favorites.len(), 0);

        // And the listing itself is gone
        let missing = server
            .get(&format!("/api/v1/properties/{}", property_id))
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_property_filters() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;
        create_listing(&server, &agent_token, "Cheap flat", "apartment", "90000.00", vec![]).await;
        create_listing(&server, &agent_token, "Big house", "house", "400000.00", vec![]).await;

        // Type filter
        let houses = server.get("/api/v1/properties?property_type=house").await;
        houses.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = houses.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["title"], "Big house");

        // Price bound
        let expensive = server.get("/api/v1/properties?min_price=100000").await;
        let body: ApiResponse<Vec<serde_json::Value>> = expensive.json();
        assert_eq!(body.data.len(), 1);

        // Unknown type in the filter is a validation failure
        let bad = server.get("/api/v1/properties?property_type=castle").await;
        bad.assert_status(StatusCode::BAD_REQUEST);

        // No filter returns everything
        let all = server.get("/api/v1/properties").await;
        let body: ApiResponse<Vec<serde_json::Value>> = all.json();
        assert_eq!(body.data.len(), 2);
    }

    #[tokio::test]
    async fn test_photo_ownership() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_one) = register_user(&server, "Alice", "a1@example.com", "agent").await;
        let (_, agent_two) = register_user(&server, "Anna", "a2@example.com", "agent").await;

        let property_id = create_listing(&server, &agent_one, "House", "house", "250000.00", vec![]).await;

        // Only the owner may attach photos
        let (name, value) = bearer(&agent_two);
        let forbidden = server
            .post(&format!("/api/v1/properties/{}/photos", property_id))
            .add_header(name, value)
            .json(&AddPhotoRequest {
                photo_url: "https://img.example/sneaky.jpg".to_string(),
            })
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        let (name, value) = bearer(&agent_one);
        let added = server
            .post(&format!("/api/v1/properties/{}/photos", property_id))
            .add_header(name, value)
            .json(&AddPhotoRequest {
                photo_url: "https://img.example/front.jpg".to_string(),
            })
            .await;
        added.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = added.json();
        let photo_id = body.data["id"].as_i64().unwrap();

        // Deleting the photo follows the parent listing's ownership
        let (name, value) = bearer(&agent_two);
        let forbidden_delete = server
            .delete(&format!("/api/v1/photos/{}", photo_id))
            .add_header(name, value)
            .await;
        forbidden_delete.assert_status(StatusCode::FORBIDDEN);

        let (name, value) = bearer(&agent_one);
        let deleted = server
            .delete(&format!("/api/v1/photos/{}", photo_id))
            .add_header(name, value)
            .await;
        deleted.assert_status(StatusCode::OK);

        // Photos on a missing listing are a 404
        let (name, value) = bearer(&agent_one);
        let missing = server
            .post("/api/v1/properties/99999/photos")
            .add_header(name, value)
            .json(&AddPhotoRequest {
                photo_url: "https://img.example/ghost.jpg".to_string(),
            })
            .await;
        missing.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_inquiry_visibility_scenario() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_one) = register_user(&server, "A1", "a1@example.com", "agent").await;
        let (_, agent_two) = register_user(&server, "A2", "a2@example.com", "agent").await;
        let (_, buyer_one) = register_user(&server, "B1", "b1@example.com", "buyer").await;
        let (_, buyer_two) = register_user(&server, "B2", "b2@example.com", "buyer").await;
        let (_admin, admin_token) =
            seed_user(&state, "Root", "root@example.com", UserRole::Admin).await;

        let property_id = create_listing(&server, &agent_one, "House", "house", "250000.00", vec![]).await;

        // B1 asks about A1's listing
        let (name, value) = bearer(&buyer_one);
        let created = server
            .post("/api/v1/inquiries")
            .add_header(name, value)
            .json(&CreateInquiryRequest {
                property_id,
                message: "Is the price negotiable?".to_string(),
            })
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = created.json();
        let inquiry_id = body.data["id"].as_i64().unwrap();

        // B2 can neither view nor delete it
        let (name, value) = bearer(&buyer_two);
        server
            .get(&format!("/api/v1/inquiries/{}", inquiry_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        let (name, value) = bearer(&buyer_two);
        server
            .delete(&format!("/api/v1/inquiries/{}", inquiry_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Neither can an unrelated agent
        let (name, value) = bearer(&agent_two);
        server
            .get(&format!("/api/v1/inquiries/{}", inquiry_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // B1, A1, and the admin can all view it
        for token in [&buyer_one, &agent_one, &admin_token] {
            let (name, value) = bearer(token);
            server
                .get(&format!("/api/v1/inquiries/{}", inquiry_id))
                .add_header(name, value)
                .await
                .assert_status(StatusCode::OK);
        }

        // Listing scope: B1 sees one, B2 none, A1 one, A2 none, admin one
        for (token, expected) in [
            (&buyer_one, 1),
            (&buyer_two, 0),
            (&agent_one, 1),
            (&agent_two, 0),
            (&admin_token, 1),
        ] {
            let (name, value) = bearer(token);
            let listed = server
                .get("/api/v1/inquiries")
                .add_header(name, value)
                .await;
            listed.assert_status(StatusCode::OK);
            let body: ApiResponse<Vec<serde_json::Value>> = listed.json();
            assert_eq!(body.data.len(), expected);
        }

        // Per-listing inquiry view is for the owner (or admin) only
        let (name, value) = bearer(&buyer_one);
        server
            .get(&format!("/api/v1/properties/{}/inquiries", property_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        let (name, value) = bearer(&agent_one);
        server
            .get(&format!("/api/v1/properties/{}/inquiries", property_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);

        // The admin may delete the inquiry
        let (name, value) = bearer(&admin_token);
        server
            .delete(&format!("/api/v1/inquiries/{}", inquiry_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_inquiry_for_missing_property_is_not_found() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, buyer_token) = register_user(&server, "Bob", "b@example.com", "buyer").await;

        let (name, value) = bearer(&buyer_token);
        let response = server
            .post("/api/v1/inquiries")
            .add_header(name, value)
            .json(&CreateInquiryRequest {
                property_id: 99999,
                message: "Hello?".to_string(),
            })
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_favorites_flow() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;
        let (_, buyer_token) = register_user(&server, "Bob", "b@example.com", "buyer").await;

        let property_id = create_listing(&server, &agent_token, "House", "house", "250000.00", vec![]).await;

        // Saving a missing property is a 404
        let (name, value) = bearer(&buyer_token);
        server
            .post("/api/v1/favorites")
            .add_header(name, value)
            .json(&AddFavoriteRequest { property_id: 99999 })
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Save, then check
        let (name, value) = bearer(&buyer_token);
        server
            .post("/api/v1/favorites")
            .add_header(name, value)
            .json(&AddFavoriteRequest { property_id })
            .await
            .assert_status(StatusCode::CREATED);

        let (name, value) = bearer(&buyer_token);
        let check = server
            .get(&format!("/api/v1/favorites/check/{}", property_id))
            .add_header(name, value)
            .await;
        let body: ApiResponse<serde_json::Value> = check.json();
        assert_eq!(body.data["is_favorite"], true);

        // Saving again is a conflict
        let (name, value) = bearer(&buyer_token);
        server
            .post("/api/v1/favorites")
            .add_header(name, value)
            .json(&AddFavoriteRequest { property_id })
            .await
            .assert_status(StatusCode::CONFLICT);

        // The listing details come back with the favorite
        let (name, value) = bearer(&buyer_token);
        let listed = server
            .get("/api/v1/favorites")
            .add_header(name, value)
            .await;
        listed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = listed.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["property"]["title"], "House");

        // Remove, then the favorite is gone
        let (name, value) = bearer(&buyer_token);
        server
            .delete(&format!("/api/v1/favorites/{}", property_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);

        let (name, value) = bearer(&buyer_token);
        server
            .delete(&format!("/api/v1/favorites/{}", property_id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let (name, value) = bearer(&buyer_token);
        let check = server
            .get(&format!("/api/v1/favorites/check/{}", property_id))
            .add_header(name, value)
            .await;
        let body: ApiResponse<serde_json::Value> = check.json();
        assert_eq!(body.data["is_favorite"], false);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_favorites_leave_one_row() {
        let (app, state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;
        let (buyer_id, buyer_token) = register_user(&server, "Bob", "b@example.com", "buyer").await;

        let property_id = create_listing(&server, &agent_token, "House", "house", "250000.00", vec![]).await;

        let (name_one, value_one) = bearer(&buyer_token);
        let (name_two, value_two) = bearer(&buyer_token);
        let (first, second) = tokio::join!(
            async {
                server
                    .post("/api/v1/favorites")
                    .add_header(name_one, value_one)
                    .json(&AddFavoriteRequest { property_id })
                    .await
            },
            async {
                server
                    .post("/api/v1/favorites")
                    .add_header(name_two, value_two)
                    .json(&AddFavoriteRequest { property_id })
                    .await
            },
        );

        // Exactly one wins the race; the loser gets a conflict
        let statuses = [first.status_code(), second.status_code()];
        assert!(statuses.contains(&StatusCode::CREATED));
        assert!(statuses.contains(&StatusCode::CONFLICT));

        // And exactly one row survives
        let rows = favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(buyer_id))
            .filter(favorite::Column::PropertyId.eq(property_id))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_viewing_properties_needs_no_token() {
        let (app, _state) = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let (_, agent_token) = register_user(&server, "Alice", "a@example.com", "agent").await;
        let property_id = create_listing(&server, &agent_token, "House", "house", "250000.00", vec![]).await;

        // Both list and detail are public
        server
            .get("/api/v1/properties")
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/properties/{}", property_id))
            .await
            .assert_status(StatusCode::OK);
    }
}
