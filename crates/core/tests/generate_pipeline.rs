//! End-to-end pipeline tests over on-disk specification fixtures.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use tsgen_core::dialect::asyncapi_2::AsyncApi2Decoder;
use tsgen_core::dialect::openapi_3::OpenApi3Decoder;
use tsgen_core::{
    AsyncApi2Backend, GenerateOptions, NullReporter, OpenApi3Backend, generate,
};

const OPENAPI_SPEC: &str = r#"
openapi: 3.0.2
info:
  title: Store
  version: 1.0.0
paths: {}
components:
  schemas:
    Status:
      type: string
      enum: [placed, shipped, delivered]
    Order:
      type: object
      required: [id, status]
      properties:
        id:
          type: string
        status:
          $ref: '#/components/schemas/Status'
        note:
          type: string
          nullable: true
"#;

const ASYNCAPI_SPEC: &str = r#"
asyncapi: 2.0.0
info:
  title: Events
  version: 1.0.0
channels:
  user/signedup:
    subscribe:
      message:
        payload:
          $ref: '#/components/schemas/UserSignedUp'
components:
  schemas:
    UserSignedUp:
      type: object
      required: [userId]
      properties:
        userId:
          type: string
        displayName:
          type: string
"#;

#[tokio::test]
async fn openapi_3_generates_component_schema_modules() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("store.yml"), OPENAPI_SPEC).unwrap();

    generate(GenerateOptions {
        cwd: Some(dir.path().to_path_buf()),
        out: PathBuf::from("generated"),
        spec: "store.yml".to_string(),
        decoder: OpenApi3Decoder,
        backend: OpenApi3Backend,
        reporter: &NullReporter,
    })
    .await
    .unwrap();

    let order = dir
        .path()
        .join("generated/store/components/schemas/Order.ts");
    let content = std::fs::read_to_string(order).unwrap();
    assert!(content.contains("import * as t from 'io-ts';"));
    assert!(content.contains("import { Status, StatusIO } from './Status';"));
    assert!(content.contains("id: string"));
    assert!(content.contains("note?: string | null"));
    assert!(content.contains("status: Status"));
    assert!(content.contains("export const OrderIO = "));

    let status = dir
        .path()
        .join("generated/store/components/schemas/Status.ts");
    let content = std::fs::read_to_string(status).unwrap();
    assert!(content.contains("export type Status = 'placed' | 'shipped' | 'delivered';"));
    assert!(content.contains(
        "t.union([t.literal('placed'), t.literal('shipped'), t.literal('delivered')])"
    ));
}

#[tokio::test]
async fn asyncapi_2_generates_component_schema_modules() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("events.yml"), ASYNCAPI_SPEC).unwrap();

    generate(GenerateOptions {
        cwd: Some(dir.path().to_path_buf()),
        out: PathBuf::from("generated"),
        spec: "events.yml".to_string(),
        decoder: AsyncApi2Decoder,
        backend: AsyncApi2Backend,
        reporter: &NullReporter,
    })
    .await
    .unwrap();

    let payload = dir
        .path()
        .join("generated/events/components/schemas/UserSignedUp.ts");
    let content = std::fs::read_to_string(payload).unwrap();
    assert!(content.contains("export type UserSignedUp = "));
    assert!(content.contains("userId: string"));
    assert!(content.contains("displayName?: string"));
    assert!(content.contains("t.type({ displayName: t.string, userId: t.string })"));
}
