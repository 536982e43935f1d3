// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ReDoc page over the generated OpenAPI document.

use axum::response::Html;

/// Path of the OpenAPI document shared by Swagger UI and ReDoc.
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

const REDOC_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>StudentLink API - ReDoc</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>body { margin: 0; padding: 0; }</style>
  </head>
  <body>
    <redoc spec-url="/api-doc/openapi.json"></redoc>
    <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
  </body>
</html>
"#;

pub async fn redoc() -> Html<&'static str> {
    Html(REDOC_PAGE)
}
