use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use content_hub_client::{ContentClient, ContentSource};
use content_hub_core::{ContentKind, HubConfig, HubIndex, load_hub_config};
use content_hub_generator::pages::{self, Page, Rendered, SiteContext};
use content_hub_generator::{SitemapOptions, SitemapSegment, build_sitemap, segment_entries, xml};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
const XML_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Clone)]
pub struct AppState {
    site: Arc<SiteContext>,
    sitemap: SitemapOptions,
    source: Arc<dyn ContentSource>,
}

impl AppState {
    pub fn new(config: &HubConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            site: Arc::new(SiteContext::from_config(config)),
            sitemap: SitemapOptions::from_config(config),
            source,
        }
    }
}

/// Start the hub server.
///
/// Every page and sitemap is rendered per request from the content
/// backend; the client's cache keeps repeated reads off the backend.
pub async fn run(config_path: Option<PathBuf>, host: String, port: u16) -> Result<()> {
    println!("🌐 Starting content hub...");

    let config = load_hub_config(config_path.as_deref()).context("Failed to load configuration")?;
    let client = ContentClient::from_config(&config).context("Failed to create content client")?;

    println!("   ✓ Backend: {}", config.endpoint.as_deref().unwrap_or_default());
    println!("   ✓ Site:    {}", config.site_url);
    if let Some(tenant) = &config.tenant {
        println!("   ✓ Tenant:  {}", tenant);
    }

    let app = router(AppState::new(&config, Arc::new(client)));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Serving at: http://{}", addr);
    println!("   Press Ctrl+C to stop\n");
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn header_layer(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/categories", get(categories_hub))
        .route("/categories/{slug}", get(category))
        .route("/locations", get(locations_index))
        .route("/locations/{slug}", get(location))
        .route("/prices/{slug}", get(price))
        .route("/services/{slug}", get(service))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/sitemap-index.xml", get(sitemap_index))
        .route("/sitemaps/{segment}", get(sitemap_segment))
        .route("/robots.txt", get(robots_txt))
        .fallback(fallback)
        .layer(header_layer("x-content-type-options", "nosniff"))
        .layer(header_layer("x-frame-options", "SAMEORIGIN"))
        .layer(header_layer("x-dns-prefetch-control", "on"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn xml_response(body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, XML_CONTENT_TYPE),
            (header::CACHE_CONTROL, XML_CACHE_CONTROL),
        ],
        body,
    )
        .into_response()
}

fn page_response(state: &AppState, status: StatusCode, page: &Page) -> Response {
    (status, Html(page.render(&state.site))).into_response()
}

fn not_found_response(state: &AppState, path: &str) -> Response {
    page_response(state, StatusCode::NOT_FOUND, &pages::not_found_page(&state.site, path))
}

/// Listing pages degrade to empty states when the backend is unreachable
async fn load_index(state: &AppState) -> HubIndex {
    match state.source.hub_index().await {
        Ok(index) => index,
        Err(err) => {
            warn!(error = %err, "hub index unavailable, rendering empty listings");
            HubIndex::default()
        }
    }
}

async fn home(State(state): State<AppState>) -> Response {
    let index = load_index(&state).await;
    page_response(&state, StatusCode::OK, &pages::home_page(&state.site, &index))
}

async fn categories_hub(State(state): State<AppState>) -> Response {
    let index = load_index(&state).await;
    page_response(&state, StatusCode::OK, &pages::categories_hub(&state.site, &index))
}

async fn locations_index(State(state): State<AppState>) -> Response {
    let index = load_index(&state).await;
    page_response(&state, StatusCode::OK, &pages::locations_index(&state.site, &index))
}

async fn detail(state: &AppState, kind: ContentKind, slug: &str) -> Response {
    let path = format!("{}/{}", kind.path_prefix().unwrap_or_default(), slug);

    let slug = slug.trim();
    if slug.is_empty() {
        return not_found_response(state, &path);
    }

    let item = match state.source.item(kind, slug).await {
        Ok(item) => item,
        Err(err) => {
            error!(%kind, slug, error = %err, "content lookup failed");
            let page = pages::unavailable_page(&state.site, &path);
            return page_response(state, StatusCode::SERVICE_UNAVAILABLE, &page);
        }
    };

    let tenant = state.site.tenant.as_deref();
    let index = match &item {
        Some(item) if item.is_listable(tenant) => load_index(state).await,
        _ => HubIndex::default(),
    };

    match pages::detail_page(&state.site, kind, item.as_ref(), &index) {
        Rendered::Page(page) => page_response(state, StatusCode::OK, &page),
        Rendered::NotFound => not_found_response(state, &path),
    }
}

async fn category(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail(&state, ContentKind::DeviceCategory, &slug).await
}

async fn location(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail(&state, ContentKind::LocationPage, &slug).await
}

async fn price(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail(&state, ContentKind::PriceModel, &slug).await
}

async fn service(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    detail(&state, ContentKind::Service, &slug).await
}

async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let entries = build_sitemap(state.source.as_ref(), &state.sitemap).await;
    xml_response(xml::render_urlset(&entries))
}

async fn sitemap_index(State(state): State<AppState>) -> Response {
    xml_response(xml::render_index(
        &state.sitemap.base_url,
        &SitemapSegment::ALL,
        Utc::now(),
    ))
}

async fn sitemap_segment(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let Some(segment) = SitemapSegment::from_name(&name) else {
        return (StatusCode::NOT_FOUND, "Unknown sitemap").into_response();
    };
    let entries = build_sitemap(state.source.as_ref(), &state.sitemap).await;
    let entries = segment_entries(&entries, &state.sitemap.base_url, segment);
    xml_response(xml::render_urlset(&entries))
}

async fn robots_txt(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        xml::render_robots(&state.sitemap.base_url),
    )
        .into_response()
}

async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    not_found_response(&state, uri.path())
}
