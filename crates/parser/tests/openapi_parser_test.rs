//! Integration test for OpenAPI parser

use openapi_operator_gen_common::{HttpMethod, ParseError};
use openapi_operator_gen_parser::OpenApiParser;
use std::fs;
use tempfile::TempDir;

const STORE_YAML: &str = r##"
openapi: 3.1.0
info:
  title: Order Service
  version: 1.0
  description: Orders and their fulfilment
servers:
  - url: https://orders.example.com/api
paths:
  /store/order:
    post:
      operationId: placeOrder
      description: Place an order
      requestBody:
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Order"
      responses:
        200:
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Order"
  /store/order/{orderId}:
    parameters:
      - $ref: "#/components/parameters/OrderId"
    get:
      operationId: getOrderById
      responses:
        200:
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Order"
    delete:
      operationId: deleteOrder
      responses:
        204:
          description: deleted
components:
  parameters:
    OrderId:
      name: orderId
      in: path
      required: true
      x-k8s-id-field: id
      schema:
        type: integer
  schemas:
    Order:
      type: object
      properties:
        id:
          type: integer
          format: int64
        quantity:
          type: integer
          minimum: 0
          maximum: 100
        shipDate:
          type: [string, "null"]
          format: date-time
        status:
          type: string
          enum: [placed, approved, delivered]
          default: placed
        complete:
          type: boolean
        customer:
          $ref: "#/components/schemas/Customer"
    Customer:
      type: object
      properties:
        name:
          type: string
          minLength: 1
"##;

fn write_spec(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_parse_yaml_file() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(&dir, "store.yaml", STORE_YAML);

    let parsed = OpenApiParser::new().parse(&spec).unwrap();
    assert_eq!(parsed.title, "Order Service");
    assert_eq!(parsed.version, "1.0");
    assert_eq!(
        parsed.description.as_deref(),
        Some("Orders and their fulfilment")
    );
    assert_eq!(
        parsed.base_url.as_deref(),
        Some("https://orders.example.com/api")
    );

    let order = parsed.resource("Order").unwrap();
    assert_eq!(order.path, "/store/order");
    assert_eq!(order.plural_name, "Orders");
    assert_eq!(
        order.methods(),
        vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete]
    );

    let get = order.operation(HttpMethod::Get).unwrap();
    assert_eq!(get.path, "/store/order/{orderId}");
    assert_eq!(get.path_params[0].name, "orderId");
    assert_eq!(get.path_params[0].id_field_ref.as_deref(), Some("id"));
    assert_eq!(
        get.response_body.as_ref().map(|s| s.name.as_str()),
        Some("ResponseBody")
    );

    let post = order.operation(HttpMethod::Post).unwrap();
    assert_eq!(
        post.request_body
            .as_ref()
            .and_then(|s| s.ref_name.as_deref()),
        Some("Order")
    );
}

#[test]
fn test_schema_conversion() {
    let parsed = OpenApiParser::new()
        .parse_bytes(STORE_YAML.as_bytes())
        .unwrap();

    let order = &parsed.schemas["Order"];
    assert_eq!(order.schema_type.as_deref(), Some("object"));

    let quantity = &order.properties["quantity"];
    assert_eq!(quantity.minimum, Some(0.0));
    assert_eq!(quantity.maximum, Some(100.0));
    assert_eq!(quantity.min_length, None);

    let ship_date = &order.properties["shipDate"];
    assert_eq!(ship_date.schema_type.as_deref(), Some("string"));
    assert!(ship_date.nullable);

    let status = &order.properties["status"];
    assert_eq!(status.enum_values.len(), 3);
    assert_eq!(
        status.default.as_ref().and_then(|d| d.as_str()),
        Some("placed")
    );

    // Property references carry the component name without expanding it
    let customer = &order.properties["customer"];
    assert_eq!(customer.ref_name.as_deref(), Some("Customer"));
    assert_eq!(customer.schema_type.as_deref(), Some("object"));
    assert!(customer.properties.is_empty());

    assert_eq!(parsed.schemas["Customer"].properties["name"].min_length, Some(1));
}

#[test]
fn test_parse_json_file() {
    let dir = TempDir::new().unwrap();
    let spec = write_spec(
        &dir,
        "echo.json",
        r#"{
            "openapi": "3.0.0",
            "info": {"title": "Echo", "version": "0.1.0"},
            "paths": {
                "/api/echo": {
                    "post": {
                        "operationId": "echo",
                        "requestBody": {
                            "content": {
                                "multipart/form-data": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "file": {"type": "string", "format": "binary"}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }"#,
    );

    let parsed = OpenApiParser::new().parse(&spec).unwrap();
    let echo = parsed.action_endpoint("ApiEchoAction").unwrap();
    assert_eq!(echo.parent_resource.as_deref(), Some("Api"));
    assert_eq!(echo.action_name, "echo");
    assert!(echo.has_binary_body);
    assert_eq!(
        echo.binary_content_type.as_deref(),
        Some("multipart/form-data")
    );
    assert_eq!(
        echo.request_schema.as_ref().map(|s| s.name.as_str()),
        Some("RequestBody")
    );
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");

    let result = OpenApiParser::new().parse(&missing.to_string_lossy());
    assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[test]
fn test_unresolvable_reference_is_rejected() {
    let result = OpenApiParser::new().parse_bytes(
        br##"{
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {"schema": {"$ref": "#/components/schemas/Missing"}}
                            }
                        }
                    }
                }
            }
        }"##,
    );

    match result {
        Err(ParseError::Validation(message)) => assert!(message.contains("/pets"), "{}", message),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_unsupported_openapi_version() {
    let result = OpenApiParser::new().parse_bytes(
        br#"{"openapi": "4.0.0", "info": {"title": "t", "version": "1"}, "paths": {}}"#,
    );
    assert!(matches!(result, Err(ParseError::Validation(_))));
}
