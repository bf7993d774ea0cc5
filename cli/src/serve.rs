#![deny(missing_docs)]

//! # Serve Command
//!
//! Serves the generated documents, schemas, discovery listings and Swagger UI
//! pages over HTTP with Actix Web.
//!
//! `host` / `basePath` of every document reflect the connection the request
//! arrived on. Unknown entity types and bundles answer `404`.

use crate::args::RegistryArgs;
use crate::error::CliResult;
use actix_web::{get, web, App, HttpRequest, HttpResponse, HttpServer};
use contentdoc_core::discovery::{bundle_info, entity_type_info, list_entity_types};
use contentdoc_core::schema_generator::validate_scope;
use contentdoc_core::viewer::{non_entity_spec_url, render_index_page};
use contentdoc_core::{
    documentation_index, render_viewer_page, spec_url, AppError, AppResult, DocumentConfig,
    RegistrySnapshot, SpecGenerator, SwaggerUiConfig,
};
use serde::Serialize;
use std::net::TcpListener;
use tracing::{error, info};
use url::Url;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    #[clap(flatten)]
    registry: RegistryArgs,

    /// Address to listen on.
    #[clap(long, env = "CONTENTDOC_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// API title.
    #[clap(long)]
    pub title: Option<String>,
}

/// Shared, read-only server state.
pub struct AppState {
    snapshot: RegistrySnapshot,
    config: DocumentConfig,
    ui: SwaggerUiConfig,
}

impl AppState {
    /// Creates the state with default document and viewer settings.
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            snapshot,
            config: DocumentConfig::default(),
            ui: SwaggerUiConfig::default(),
        }
    }

    fn generator(&self, req: &HttpRequest) -> AppResult<SpecGenerator<'_>> {
        let config = self.config.clone().with_origin(&origin(req)?)?;
        Ok(SpecGenerator::new(&self.snapshot, &self.snapshot).with_config(config))
    }
}

/// Serving root of the request: scheme and authority only.
///
/// Anything a `Host` header smuggles past the authority is dropped, so the
/// derived `basePath` is always `/`.
fn origin(req: &HttpRequest) -> AppResult<Url> {
    let info = req.connection_info();
    let origin = format!("{}://{}/", info.scheme(), info.host());
    let mut url = Url::parse(&origin)
        .map_err(|e| AppError::General(format!("Invalid origin '{}': {}", origin, e)))?;
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    url.set_username("")
        .and_then(|_| url.set_password(None))
        .map_err(|_| AppError::General(format!("Invalid origin '{}'", origin)))?;
    Ok(url)
}

fn error_response(err: AppError) -> HttpResponse {
    if err.is_not_found() {
        HttpResponse::NotFound().body(err.to_string())
    } else {
        error!(error = %err, "request failed");
        HttpResponse::InternalServerError().body(err.to_string())
    }
}

fn json<T: Serialize>(result: AppResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(err),
    }
}

fn html(result: AppResult<String>) -> HttpResponse {
    match result {
        Ok(page) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(err) => error_response(err),
    }
}

#[get("/openapi")]
async fn openapi(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_document(None, None))
            .and_then(|d| d.to_json()),
    )
}

#[get("/openapi/other")]
async fn openapi_other(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_non_entity_document())
            .and_then(|d| d.to_json()),
    )
}

#[get("/openapi/{entity_type}")]
async fn openapi_entity(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let entity_type = path.into_inner();
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_document(Some(&entity_type), None))
            .and_then(|d| d.to_json()),
    )
}

#[get("/openapi/{entity_type}/{bundle}")]
async fn openapi_bundle(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (entity_type, bundle) = path.into_inner();
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_document(Some(&entity_type), Some(&bundle)))
            .and_then(|d| d.to_json()),
    )
}

#[get("/schemata/{entity_type}")]
async fn schema_entity(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let entity_type = path.into_inner();
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_schema(&entity_type, None))
            .and_then(|s| s.to_json()),
    )
}

#[get("/schemata/{entity_type}/{bundle}")]
async fn schema_bundle(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (entity_type, bundle) = path.into_inner();
    json(
        state
            .generator(&req)
            .and_then(|g| g.build_schema(&entity_type, Some(&bundle)))
            .and_then(|s| s.to_json()),
    )
}

#[get("/docs")]
async fn docs_index(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    html(origin(&req).and_then(|base| {
        let links = documentation_index(&state.snapshot, &state.snapshot, &base)?;
        Ok(render_index_page(&links, &state.ui.title))
    }))
}

#[get("/docs/other")]
async fn docs_other(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    html(origin(&req).and_then(|base| {
        let url = non_entity_spec_url(&base)?;
        Ok(render_viewer_page(&url, &state.ui))
    }))
}

#[get("/docs/{entity_type}/{bundle}")]
async fn docs_bundle(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (entity_type, bundle) = path.into_inner();
    html(origin(&req).and_then(|base| {
        validate_scope(&state.snapshot, &entity_type, Some(&bundle))?;
        let url = spec_url(&base, Some(&entity_type), Some(&bundle))?;
        Ok(render_viewer_page(&url, &state.ui))
    }))
}

#[get("/entity/types")]
async fn types_list(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(list_entity_types(&state.snapshot, &state.snapshot))
}

#[get("/entity/types/{entity_type}")]
async fn types_entity(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    json(entity_type_info(
        &state.snapshot,
        &state.snapshot,
        &path.into_inner(),
    ))
}

#[get("/entity/types/{entity_type}/{bundle}")]
async fn types_bundle(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (entity_type, bundle) = path.into_inner();
    json(bundle_info(&state.snapshot, &entity_type, &bundle))
}

/// Registers every documentation route.
///
/// Literal segments are registered before the placeholders they shadow.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi)
        .service(openapi_other)
        .service(openapi_entity)
        .service(openapi_bundle)
        .service(schema_entity)
        .service(schema_bundle)
        .service(docs_index)
        .service(docs_other)
        .service(docs_bundle)
        .service(types_list)
        .service(types_entity)
        .service(types_bundle);
}

fn build_server(
    listener: TcpListener,
    state: web::Data<AppState>,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .listen(listener)?
        .run())
}

/// Executes the serve command; blocks until the server stops.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    let mut state = AppState::new(args.registry.load()?);
    if let Some(title) = &args.title {
        state.config.title = title.clone();
        state.ui.title = title.clone();
    }

    let listener = TcpListener::bind(&args.bind)?;
    info!(bind = %args.bind, "serving documentation");
    let state = web::Data::new(state);
    actix_rt::System::new().block_on(async move { build_server(listener, state)?.await })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SITE_YAML;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            RegistrySnapshot::from_yaml_str(SITE_YAML).unwrap(),
        ))
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().app_data(state()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_openapi_reflects_request_host() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/openapi?_format=json")
            .insert_header(("host", "cms.test:8000"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["swagger"], "2.0");
        assert_eq!(body["host"], "cms.test:8000");
        assert_eq!(body["basePath"], "/");
        assert!(body["paths"]["/dblog/{id}"].is_object());
    }

    #[actix_web::test]
    async fn test_host_header_cannot_move_base_path() {
        let app = app!();
        for host in ["cms.test/evil", "cms.test/evil?x=1", "cms.test#frag"] {
            let req = test::TestRequest::get()
                .uri("/openapi")
                .insert_header(("host", host))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["host"], "cms.test", "{}", host);
            assert_eq!(body["basePath"], "/", "{}", host);
        }

        let req = test::TestRequest::get()
            .uri("/docs/other")
            .insert_header(("host", "cms.test/evil"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("url: 'http://cms.test/openapi/other?_format=json'"));
    }

    #[actix_web::test]
    async fn test_scoped_documents() {
        let app = app!();
        let req = test::TestRequest::get().uri("/openapi/node/page").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let keys: Vec<_> = body["definitions"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["node", "node.page"]);

        let req = test::TestRequest::get().uri("/openapi/other").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["paths"].as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["/dblog/{id}"]
        );
    }

    #[actix_web::test]
    async fn test_not_found_outcomes() {
        let app = app!();
        for uri in [
            "/openapi/comment",
            "/openapi/node/blog",
            "/openapi/user/user",
            "/schemata/user/user",
            "/docs/node/blog",
            "/entity/types/comment",
            "/entity/types/node/blog",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_schemata() {
        let app = app!();
        let req = test::TestRequest::get().uri("/schemata/user").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "User");
        assert!(body["properties"]["user_picture"].is_object());
    }

    #[actix_web::test]
    async fn test_docs_pages() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/docs/node/article")
            .insert_header(("host", "cms.test"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("url: 'http://cms.test/openapi/node/article?_format=json'"));

        let req = test::TestRequest::get()
            .uri("/docs")
            .insert_header(("host", "cms.test"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let index = String::from_utf8(body.to_vec()).unwrap();
        assert!(index.contains("http://cms.test/docs/node/page"));
        assert!(index.contains("Open API: Other resources"));
    }

    #[actix_web::test]
    async fn test_entity_types_listing() {
        let app = app!();
        let req = test::TestRequest::get().uri("/entity/types").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["node"]["bundles"], serde_json::json!(["page", "article"]));

        let req = test::TestRequest::get()
            .uri("/entity/types/node/article")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["fields"]["field_tags"]["is_reference"], true);
    }

    #[actix_web::test]
    async fn test_build_server_start_stop() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = build_server(listener, state()).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
    }
}
