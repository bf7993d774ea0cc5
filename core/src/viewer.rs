#![deny(missing_docs)]

//! # Documentation Viewer
//!
//! Static Swagger UI pages pointed at the generated documents, plus the
//! index of pages a site exposes. The pages carry no logic of their own:
//! their only input is the spec URL, always requested with `_format=json`.

use crate::error::{AppError, AppResult};
use crate::oas::document::SpecGenerator;
use crate::oas::paths::{ResourceFilter, FORMAT_PARAMETER};
use crate::registry::{bundles_of, ContentModel, RouteRegistry};
use serde::Serialize;
use url::Url;

/// Customisation knobs for the Swagger UI page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwaggerUiConfig {
    /// Page title.
    pub title: String,
    /// Base URL of the `swagger-ui-dist` distribution.
    pub swagger_ui_dist: String,
}

impl Default for SwaggerUiConfig {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            swagger_ui_dist: "https://cdn.jsdelivr.net/npm/swagger-ui-dist@5".to_string(),
        }
    }
}

fn join(base: &Url, segments: &[&str]) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::General(format!("Cannot append paths to '{}'", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// URL of the OpenAPI document, optionally scoped, with `_format=json`.
///
/// e.g. `http://cms.local/openapi/node/page?_format=json`.
pub fn spec_url(base: &Url, entity_type: Option<&str>, bundle: Option<&str>) -> AppResult<Url> {
    let mut segments = vec!["openapi"];
    match (entity_type, bundle) {
        (Some(e), b) => {
            segments.push(e);
            segments.extend(b);
        }
        (None, None) => {}
        (None, Some(b)) => {
            return Err(AppError::General(format!(
                "Bundle '{}' requires an entity type",
                b
            )))
        }
    }
    let mut url = join(base, &segments)?;
    url.query_pairs_mut()
        .clear()
        .append_pair(FORMAT_PARAMETER, "json");
    Ok(url)
}

/// URL of the non-entity ("other resources") document.
pub fn non_entity_spec_url(base: &Url) -> AppResult<Url> {
    let mut url = join(base, &["openapi", "other"])?;
    url.query_pairs_mut()
        .clear()
        .append_pair(FORMAT_PARAMETER, "json");
    Ok(url)
}

/// Renders the Swagger UI page for a spec URL.
pub fn render_viewer_page(spec_url: &Url, config: &SwaggerUiConfig) -> String {
    let spec = spec_url.as_str().replace('\'', "\\'");
    let dist = config.swagger_ui_dist.trim_end_matches('/');
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
  <link rel="stylesheet" href="{dist}/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{dist}/swagger-ui-bundle.js"></script>
  <script src="{dist}/swagger-ui-standalone-preset.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{
        url: '{spec}',
        dom_id: '#swagger-ui',
        presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
        layout: 'BaseLayout',
      }});
    }};
  </script>
</body>
</html>
"#,
        title = html_escape(&config.title),
        dist = dist,
        spec = spec,
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders the documentation index as a plain HTML list.
pub fn render_index_page(links: &[DocumentationLink], title: &str) -> String {
    let items: String = links
        .iter()
        .map(|link| {
            format!(
                "    <li><a href=\"{}\">{}</a></li>\n",
                html_escape(&link.url),
                html_escape(&link.title)
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
  <ul>
{items}  </ul>
</body>
</html>
"#,
        title = html_escape(title),
        items = items,
    )
}

/// One entry of the documentation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationLink {
    /// Link text.
    pub title: String,
    /// Target URL.
    pub url: String,
}

/// Lists the documentation pages of a site.
///
/// Viewer pages come first: one for non-entity resources, then one per
/// bundle of every REST-enabled bundled entity type. Direct links to the
/// entity and non-entity OpenAPI documents follow.
pub fn documentation_index(
    model: &dyn ContentModel,
    routes: &dyn RouteRegistry,
    base: &Url,
) -> AppResult<Vec<DocumentationLink>> {
    let mut links = Vec::new();
    let generator = SpecGenerator::new(model, routes);

    if routes.resource_configs().iter().any(|r| !r.is_entity()) {
        links.push(DocumentationLink {
            title: "Non-entity resources".to_string(),
            url: join(base, &["docs", "other"])?.to_string(),
        });
    }

    for id in generator.rest_enabled_entity_types(ResourceFilter::Entities) {
        let Some(entity_type) = model.entity_type_definition(&id) else {
            continue;
        };
        for (bundle_id, bundle) in bundles_of(model, &id) {
            links.push(DocumentationLink {
                title: format!("{}: {}", entity_type.label, bundle.label),
                url: join(base, &["docs", &id, &bundle_id])?.to_string(),
            });
        }
    }

    links.push(DocumentationLink {
        title: "Open API: Entities".to_string(),
        url: spec_url(base, None, None)?.to_string(),
    });
    links.push(DocumentationLink {
        title: "Open API: Other resources".to_string(),
        url: non_entity_spec_url(base)?.to_string(),
    });

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::site;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("http://cms.local/api/").unwrap()
    }

    #[test]
    fn test_spec_urls() {
        assert_eq!(
            spec_url(&base(), None, None).unwrap().as_str(),
            "http://cms.local/api/openapi?_format=json"
        );
        assert_eq!(
            spec_url(&base(), Some("node"), Some("page")).unwrap().as_str(),
            "http://cms.local/api/openapi/node/page?_format=json"
        );
        assert!(spec_url(&base(), None, Some("page")).is_err());
    }

    #[test]
    fn test_format_forced_over_existing_query() {
        let base = Url::parse("http://cms.local?_format=xml").unwrap();
        assert_eq!(
            spec_url(&base, Some("user"), None).unwrap().query(),
            Some("_format=json")
        );
    }

    #[test]
    fn test_viewer_page() {
        let url = spec_url(&base(), Some("node"), None).unwrap();
        let config = SwaggerUiConfig {
            title: "Docs <node>".into(),
            ..SwaggerUiConfig::default()
        };
        let html = render_viewer_page(&url, &config);
        assert!(html.contains("url: 'http://cms.local/api/openapi/node?_format=json'"));
        assert!(html.contains("swagger-ui-dist@5/swagger-ui-bundle.js"));
        assert!(html.contains("<title>Docs &lt;node&gt;</title>"));
    }

    #[test]
    fn test_documentation_index() {
        let snapshot = site();
        let links = documentation_index(&snapshot, &snapshot, &base()).unwrap();
        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Non-entity resources",
                "Content: Basic page",
                "Content: Article",
                "Open API: Entities",
                "Open API: Other resources",
            ]
        );
        assert_eq!(links[1].url, "http://cms.local/api/docs/node/page");
        assert_eq!(
            links[4].url,
            "http://cms.local/api/openapi/other?_format=json"
        );
    }

    #[test]
    fn test_index_page() {
        let links = vec![DocumentationLink {
            title: "Content: Basic page".into(),
            url: "http://cms.local/docs/node/page".into(),
        }];
        let html = render_index_page(&links, "API Documentation");
        assert!(html.contains(
            "<li><a href=\"http://cms.local/docs/node/page\">Content: Basic page</a></li>"
        ));
        assert!(html.contains("<h1>API Documentation</h1>"));
    }
}
