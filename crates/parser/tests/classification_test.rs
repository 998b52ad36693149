//! Integration tests for path classification

use mockall::mock;
use openapi_operator_gen_common::{HttpMethod, ParsedSpec, PathFilter};
use openapi_operator_gen_parser::naming::extract_resource_name;
use openapi_operator_gen_parser::{Classification, ClassificationReport, FilterReason, OpenApiParser};

mock! {
    pub Filter {}

    impl PathFilter for Filter {
        fn should_include_path(&self, path: &str) -> bool;
        fn should_include_tags(&self, tags: &[String]) -> bool;
        fn should_include_operation(&self, operation_id: &str) -> bool;
        fn should_include(&self, path: &str, tags: &[String]) -> bool;
        fn should_include_with_operations(
            &self,
            path: &str,
            tags: &[String],
            operation_ids: &[String],
        ) -> bool;
        fn has_filters(&self) -> bool;
        fn has_operation_filters(&self) -> bool;
    }
}

/// Wrap a `paths` object into a minimal OpenAPI 3.0 document
fn document(paths: &str) -> String {
    format!(
        r##"{{
            "openapi": "3.0.3",
            "info": {{"title": "Petstore", "version": "1.0.27"}},
            "servers": [{{"url": "https://petstore3.swagger.io/api/v3"}}],
            "paths": {},
            "components": {{
                "schemas": {{
                    "Pet": {{
                        "type": "object",
                        "required": ["name"],
                        "properties": {{
                            "id": {{"type": "integer", "format": "int64"}},
                            "name": {{"type": "string"}},
                            "status": {{"type": "string", "enum": ["available", "pending", "sold"]}}
                        }}
                    }},
                    "ApiResponse": {{
                        "type": "object",
                        "properties": {{
                            "code": {{"type": "integer", "format": "int32"}},
                            "message": {{"type": "string"}}
                        }}
                    }}
                }}
            }}
        }}"##,
        paths
    )
}

fn parse(paths: &str) -> (ParsedSpec, ClassificationReport) {
    OpenApiParser::new()
        .parse_bytes_with_report(document(paths).as_bytes())
        .unwrap()
}

const PETSTORE_PATHS: &str = r##"{
    "/pet": {
        "put": {
            "operationId": "updatePet",
            "tags": ["pet"],
            "requestBody": {
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
            },
            "responses": {"200": {"description": "ok"}}
        },
        "post": {
            "operationId": "addPet",
            "tags": ["pet"],
            "description": "Add a new pet to the store",
            "requestBody": {
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
            },
            "responses": {
                "200": {
                    "description": "ok",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                }
            }
        }
    },
    "/pet/findByStatus": {
        "get": {
            "operationId": "findPetsByStatus",
            "tags": ["pet"],
            "parameters": [
                {"name": "status", "in": "query", "schema": {"type": "string"}}
            ],
            "responses": {
                "200": {
                    "description": "ok",
                    "content": {
                        "application/json": {
                            "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
                        }
                    }
                }
            }
        }
    },
    "/pet/findByTags": {
        "get": {
            "operationId": "findPetsByTags",
            "tags": ["pet"],
            "parameters": [
                {"name": "tags", "in": "query", "schema": {"type": "array", "items": {"type": "string"}}}
            ],
            "responses": {"200": {"description": "ok"}}
        }
    },
    "/pet/{petId}": {
        "parameters": [
            {"name": "petId", "in": "path", "required": true,
             "schema": {"type": "integer", "format": "int64"}, "x-k8s-id-field": "id"}
        ],
        "get": {"operationId": "getPetById", "tags": ["pet"], "responses": {"200": {"description": "ok"}}},
        "post": {"operationId": "updatePetWithForm", "tags": ["pet"], "responses": {"200": {"description": "ok"}}},
        "delete": {"operationId": "deletePet", "tags": ["pet"], "responses": {"400": {"description": "bad"}}}
    },
    "/pet/{petId}/uploadImage": {
        "post": {
            "operationId": "uploadFile",
            "tags": ["pet"],
            "parameters": [
                {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer", "format": "int64"}},
                {"name": "additionalMetadata", "in": "query", "schema": {"type": "string"}}
            ],
            "requestBody": {
                "content": {
                    "application/octet-stream": {"schema": {"type": "string", "format": "binary"}}
                }
            },
            "responses": {
                "200": {
                    "description": "ok",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiResponse"}}}
                }
            }
        }
    },
    "/store/inventory": {
        "get": {
            "operationId": "getInventory",
            "tags": ["store"],
            "responses": {
                "200": {
                    "description": "ok",
                    "content": {
                        "application/json": {
                            "schema": {"type": "object", "additionalProperties": {"type": "integer"}}
                        }
                    }
                }
            }
        }
    },
    "/user/login": {
        "get": {
            "operationId": "loginUser",
            "tags": ["user"],
            "parameters": [
                {"name": "username", "in": "query", "schema": {"type": "string"}},
                {"name": "password", "in": "query", "schema": {"type": "string"}}
            ],
            "responses": {"200": {"description": "ok"}}
        }
    }
}"##;

#[test]
fn test_petstore_classification() {
    let (parsed, report) = parse(PETSTORE_PATHS);

    assert_eq!(parsed.title, "Petstore");
    assert_eq!(parsed.version, "1.0.27");
    assert_eq!(
        parsed.base_url.as_deref(),
        Some("https://petstore3.swagger.io/api/v3")
    );

    let names: Vec<&str> = parsed.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Pet"]);

    let pet = parsed.resource("Pet").unwrap();
    assert_eq!(pet.plural_name, "Pets");
    assert_eq!(pet.path, "/pet");
    assert_eq!(
        pet.methods(),
        vec![
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete
        ]
    );
    assert_eq!(pet.description.as_deref(), Some("Add a new pet to the store"));

    // The item path's POST wins over the collection's
    let post = pet.operation(HttpMethod::Post).unwrap();
    assert_eq!(post.operation_id.as_deref(), Some("updatePetWithForm"));

    let get = pet.operation(HttpMethod::Get).unwrap();
    assert_eq!(get.path_params.len(), 1);
    assert_eq!(get.path_params[0].id_field_ref.as_deref(), Some("id"));
    assert_eq!(get.path_params[0].param_type.as_deref(), Some("integer"));

    let schema = pet.schema.as_ref().unwrap();
    assert_eq!(schema.name, "Pet");
    assert_eq!(schema.ref_name.as_deref(), Some("Pet"));
    assert!(schema.is_required("name"));
    assert_eq!(schema.properties["status"].enum_values.len(), 3);

    assert_eq!(
        report.classification("/pet"),
        Some(Classification::ResourceCollection)
    );
    assert_eq!(
        report.classification("/pet/{petId}"),
        Some(Classification::ResourceItem)
    );

    assert!(parsed.schemas.contains_key("Pet"));
    assert!(parsed.schemas.contains_key("ApiResponse"));
}

#[test]
fn test_query_endpoints() {
    let (parsed, _) = parse(PETSTORE_PATHS);

    let names: Vec<&str> = parsed
        .query_endpoints
        .iter()
        .map(|q| q.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "PetFindByStatusQuery",
            "PetFindByTagsQuery",
            "StoreInventoryQuery"
        ]
    );

    let by_status = parsed.query_endpoint("PetFindByStatusQuery").unwrap();
    assert_eq!(by_status.base_path, "/pet");
    assert_eq!(by_status.operation, "findByStatus");
    assert_eq!(by_status.operation_id.as_deref(), Some("findPetsByStatus"));
    assert!(by_status.response_is_array);
    assert_eq!(by_status.response_schema_ref.as_deref(), Some("Pet"));
    assert_eq!(
        by_status
            .response_schema
            .as_ref()
            .and_then(|s| s.schema_type.as_deref()),
        Some("array")
    );

    let by_tags = parsed.query_endpoint("PetFindByTagsQuery").unwrap();
    assert_eq!(
        by_tags.query_params[0].param_type.as_deref(),
        Some("array:string")
    );
    assert!(by_tags.response_schema.is_none());

    let inventory = parsed.query_endpoint("StoreInventoryQuery").unwrap();
    assert!(!inventory.response_is_array);
    assert!(inventory.response_schema_ref.is_none());
}

#[test]
fn test_action_endpoints() {
    let (parsed, report) = parse(PETSTORE_PATHS);

    let upload = parsed.action_endpoint("PetUploadImageAction").unwrap();
    assert_eq!(upload.parent_resource.as_deref(), Some("Pet"));
    assert_eq!(upload.parent_id_param.as_deref(), Some("petId"));
    assert_eq!(upload.parent_id_type.as_deref(), Some("integer"));
    assert_eq!(upload.action_name, "uploadImage");
    assert_eq!(upload.http_method, HttpMethod::Post);
    assert!(upload.path_params.is_empty());
    assert_eq!(upload.query_params[0].name, "additionalMetadata");
    assert!(upload.has_binary_body);
    assert_eq!(
        upload.binary_content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(
        upload
            .response_schema
            .as_ref()
            .and_then(|s| s.ref_name.as_deref()),
        Some("ApiResponse")
    );

    // Strong keyword turns a GET-only path into an action
    let login = parsed.action_endpoint("UserLoginAction").unwrap();
    assert_eq!(login.http_method, HttpMethod::Get);
    assert_eq!(login.parent_resource.as_deref(), Some("User"));
    assert!(login.parent_id_param.is_none());
    assert_eq!(login.query_params.len(), 2);

    assert_eq!(
        report.classification("/user/login"),
        Some(Classification::ActionEndpoint)
    );
    assert_eq!(
        report.classification("/pet/findByStatus"),
        Some(Classification::QueryEndpoint)
    );
}

#[test]
fn test_collection_with_get_only_item_path() {
    let (parsed, report) = parse(
        r#"{
            "/users": {
                "get": {"operationId": "listUsers"},
                "post": {"operationId": "createUser"}
            },
            "/users/{id}": {
                "get": {"operationId": "getUser"}
            }
        }"#,
    );

    assert_eq!(parsed.resources.len(), 1);
    let user = &parsed.resources[0];
    assert_eq!(user.name, "User");
    assert_eq!(user.methods(), vec![HttpMethod::Get, HttpMethod::Post]);
    assert_eq!(
        user.operation(HttpMethod::Get)
            .and_then(|op| op.operation_id.as_deref()),
        Some("listUsers")
    );

    assert_eq!(parsed.query_endpoints.len(), 1);
    assert_eq!(parsed.query_endpoints[0].name, "UsersQuery");
    assert_eq!(parsed.query_endpoints[0].path, "/users/{id}");
    assert_eq!(
        report.classification("/users/{id}"),
        Some(Classification::QueryEndpoint)
    );
}

#[test]
fn test_action_flips_to_resource_with_item_path() {
    let (parsed, _) = parse(r#"{"/store": {"post": {"operationId": "placeOrder"}}}"#);
    assert!(parsed.resources.is_empty());
    assert_eq!(parsed.action_endpoints.len(), 1);

    let store = &parsed.action_endpoints[0];
    assert_eq!(store.name, "StoreAction");
    assert!(store.parent_resource.is_none());
    assert_eq!(store.action_name, "store");

    let (parsed, report) = parse(
        r#"{
            "/store": {"post": {"operationId": "placeOrder"}},
            "/store/{storeId}": {"get": {"operationId": "getStore"}}
        }"#,
    );
    assert!(parsed.action_endpoints.is_empty());
    assert_eq!(parsed.resources.len(), 1);
    assert_eq!(parsed.resources[0].name, "Store");
    assert_eq!(parsed.resources[0].methods(), vec![HttpMethod::Post]);
    assert_eq!(
        report.classification("/store"),
        Some(Classification::ResourceCollection)
    );

    // A GET-only item path stays a query even when it pairs the collection
    assert_eq!(parsed.query_endpoints.len(), 1);
    assert_eq!(
        report.classification("/store/{storeId}"),
        Some(Classification::QueryEndpoint)
    );
}

#[test]
fn test_nested_collection_folds_into_item_resource() {
    let (parsed, report) = parse(
        r#"{
            "/users/{userId}/posts": {"post": {"operationId": "createPost"}},
            "/users/{userId}/posts/{postId}": {
                "get": {"operationId": "getPost"},
                "put": {"operationId": "updatePost"},
                "delete": {"operationId": "deletePost"}
            }
        }"#,
    );

    assert_eq!(parsed.resources.len(), 1);
    assert!(parsed.resource("User").is_none());

    let post = parsed.resource("Post").unwrap();
    assert_eq!(
        post.methods(),
        vec![
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete
        ]
    );
    assert_eq!(
        post.operation(HttpMethod::Post)
            .and_then(|op| op.operation_id.as_deref()),
        Some("createPost")
    );

    assert_eq!(
        report.classification("/users/{userId}/posts"),
        Some(Classification::ResourceCollection)
    );
    assert_eq!(
        report.classification("/users/{userId}/posts/{postId}"),
        Some(Classification::ResourceItem)
    );
    let row = report.row("/users/{userId}/posts").unwrap();
    assert_eq!(row.kind.as_deref(), Some("Post"));
}

#[test]
fn test_root_path_without_root_kind_is_dropped() {
    let paths = r#"{"/": {"get": {"operationId": "getRoot"}}}"#;

    let (parsed, report) = parse(paths);
    assert!(parsed.resources.is_empty());
    assert!(parsed.query_endpoints.is_empty());
    assert!(parsed.action_endpoints.is_empty());
    assert_eq!(report.classification("/"), Some(Classification::Dropped));

    let parsed = OpenApiParser::new()
        .with_root_kind("Petstore")
        .parse_bytes(document(paths).as_bytes())
        .unwrap();
    assert_eq!(parsed.query_endpoints[0].name, "PetstoreQuery");
}

#[test]
fn test_root_action_uses_root_kind() {
    let paths = r#"{"/": {"post": {"operationId": "echo"}}}"#;

    let (parsed, report) = parse(paths);
    assert!(parsed.action_endpoints.is_empty());
    assert_eq!(report.classification("/"), Some(Classification::Dropped));

    let parsed = OpenApiParser::new()
        .with_root_kind("Echo")
        .parse_bytes(document(paths).as_bytes())
        .unwrap();
    let action = &parsed.action_endpoints[0];
    assert_eq!(action.name, "EchoAction");
    assert_eq!(action.action_name, "echo");
}

#[test]
fn test_deeply_nested_resource_name() {
    assert_eq!(
        extract_resource_name(
            "/sharedmem/classes/{className}/instances/{instanceName}/variables/{variableName}",
            None
        ),
        "Variable"
    );
}

#[test]
fn test_every_path_classified_once() {
    let (parsed, report) = parse(PETSTORE_PATHS);

    let paths: serde_json::Value = serde_json::from_str(PETSTORE_PATHS).unwrap();
    let expected: Vec<&str> = paths
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let reported: Vec<&str> = report.rows.iter().map(|row| row.path.as_str()).collect();
    assert_eq!(reported, expected, "one row per path, in path order");

    let resource_paths = report
        .rows
        .iter()
        .filter(|row| row.classification.is_resource())
        .count();
    let queries = report.paths_with(Classification::QueryEndpoint).len();
    let actions = report.paths_with(Classification::ActionEndpoint).len();

    assert_eq!(queries, parsed.query_endpoints.len());
    assert_eq!(actions, parsed.action_endpoints.len());
    assert_eq!(resource_paths + queries + actions, report.rows.len());
}

#[test]
fn test_reparse_is_identical() {
    let (first, first_report) = parse(PETSTORE_PATHS);
    let (second, second_report) = parse(PETSTORE_PATHS);
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
}

#[test]
fn test_path_filter_is_consulted() {
    let mut filter = MockFilter::new();
    filter.expect_has_filters().return_const(true);
    filter
        .expect_should_include_path()
        .returning(|path| !path.starts_with("/store"));
    filter
        .expect_should_include_tags()
        .returning(|tags| !tags.iter().any(|t| t == "user"));
    filter.expect_has_operation_filters().return_const(true);
    filter
        .expect_should_include_operation()
        .returning(|operation_id| operation_id != "deletePet");

    let (parsed, report) = OpenApiParser::new()
        .with_filter(Box::new(filter))
        .parse_bytes_with_report(document(PETSTORE_PATHS).as_bytes())
        .unwrap();

    assert_eq!(
        report.classification("/store/inventory"),
        Some(Classification::Filtered(FilterReason::Path))
    );
    assert_eq!(
        report.classification("/user/login"),
        Some(Classification::Filtered(FilterReason::Tag))
    );
    assert_eq!(report.filtered_count(), 2);

    let pet = parsed.resource("Pet").unwrap();
    assert!(pet.operation(HttpMethod::Delete).is_none());
    assert_eq!(
        report.row("/pet/{petId}").map(|row| row.methods.as_str()),
        Some("GET,POST ~DELETE(deletePet)~")
    );

    assert!(parsed.action_endpoint("UserLoginAction").is_none());
    assert!(parsed.query_endpoint("StoreInventoryQuery").is_none());
}

#[test]
fn test_operation_filter_removing_every_method() {
    let mut filter = MockFilter::new();
    filter.expect_has_filters().return_const(true);
    filter.expect_should_include_path().return_const(true);
    filter.expect_should_include_tags().return_const(true);
    filter.expect_has_operation_filters().return_const(true);
    filter
        .expect_should_include_operation()
        .returning(|operation_id| operation_id != "getInventory");

    let (parsed, report) = OpenApiParser::new()
        .with_filter(Box::new(filter))
        .parse_bytes_with_report(document(PETSTORE_PATHS).as_bytes())
        .unwrap();

    assert_eq!(
        report.classification("/store/inventory"),
        Some(Classification::Filtered(FilterReason::Operation))
    );
    assert_eq!(parsed.query_endpoints.len(), 2);
}
