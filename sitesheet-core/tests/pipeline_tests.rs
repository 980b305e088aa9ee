// End-to-end pipeline tests against a mock site

use sitesheet_core::{Pipeline, PipelineOptions};
use sitesheet_harvester::HarvestError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_bytes(body.into_bytes())
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_bytes(body.into_bytes())
}

fn leaf_sitemap(page_urls: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for url in page_urls {
        xml.push_str(&format!("<url><loc>{}</loc></url>", url));
    }
    xml.push_str("</urlset>");
    xml
}

fn index_sitemap(child_urls: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
    );
    for url in child_urls {
        xml.push_str(&format!("<sitemap><loc>{}</loc></sitemap>", url));
    }
    xml.push_str("</sitemapindex>");
    xml
}

fn page_html(name: &str) -> String {
    format!("<html><head><title>{name}</title></head><body><h1>{name}</h1></body></html>")
}

#[tokio::test]
async fn test_partial_failures_emit_only_productive_leaves() {
    // Index references child A (3 pages, 2 fetchable) and child B (1 page,
    // unfetchable). Exactly one artifact, for A, with 2 records.
    let server = MockServer::start().await;
    let child_a = format!("{}/a.xml", server.uri());
    let child_b = format!("{}/b.xml", server.uri());

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(index_sitemap(&[child_a.clone(), child_b.clone()])))
        .mount(&server)
        .await;

    let a_pages: Vec<String> = ["/a1", "/a2", "/a3"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(xml_response(leaf_sitemap(&a_pages)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a1"))
        .respond_with(html_response(page_html("a1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a3"))
        .respond_with(html_response(page_html("a3")))
        .mount(&server)
        .await;

    let b_pages = vec![format!("{}/b1", server.uri())];
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(xml_response(leaf_sitemap(&b_pages)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let artifacts = Pipeline::new()
        .run(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].source_url, child_a);
    assert_eq!(artifacts[0].record_count, 2);
    assert_eq!(&artifacts[0].bytes[..4], b"PK\x03\x04");
    assert!(artifacts[0].filename.ends_with("/a.xlsx"));
}

#[tokio::test]
async fn test_leaf_root_exports_directly() {
    let server = MockServer::start().await;
    let page = format!("{}/only", server.uri());

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(leaf_sitemap(&[page])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/only"))
        .respond_with(html_response(page_html("only")))
        .mount(&server)
        .await;

    let root = format!("{}/sitemap.xml", server.uri());
    let artifacts = Pipeline::new().run(&root).await.unwrap();

    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].source_url, root);
    assert_eq!(artifacts[0].record_count, 1);
}

#[tokio::test]
async fn test_rejection_names_the_root_url() {
    let rejected = Pipeline::new()
        .run("https://example.com/not-a-sitemap")
        .await
        .unwrap_err();

    assert_eq!(rejected.url, "https://example.com/not-a-sitemap");
    assert!(matches!(rejected.reason, HarvestError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_unreachable_root_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let root = format!("{}/sitemap.xml", server.uri());
    let rejected = Pipeline::new().run(&root).await.unwrap_err();

    assert_eq!(rejected.url, root);
    assert!(matches!(
        rejected.reason,
        HarvestError::HttpStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn test_empty_leaves_suppress_output_without_error() {
    // Valid index, valid leaf, but every page fetch fails: the run succeeds
    // with zero artifacts rather than erroring or emitting empty sheets.
    let server = MockServer::start().await;
    let child = format!("{}/empty.xml", server.uri());

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(index_sitemap(&[child])))
        .mount(&server)
        .await;
    let pages = vec![format!("{}/gone", server.uri())];
    Mock::given(method("GET"))
        .and(path("/empty.xml"))
        .respond_with(xml_response(leaf_sitemap(&pages)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let artifacts = Pipeline::new()
        .run(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();
    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn test_progress_callback_reports_each_leaf() {
    let server = MockServer::start().await;
    let child = format!("{}/child.xml", server.uri());

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(index_sitemap(&[child.clone()])))
        .mount(&server)
        .await;
    let pages = vec![format!("{}/p", server.uri())];
    Mock::given(method("GET"))
        .and(path("/child.xml"))
        .respond_with(xml_response(leaf_sitemap(&pages)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(html_response(page_html("p")))
        .mount(&server)
        .await;

    let messages: std::sync::Arc<std::sync::Mutex<Vec<String>>> = Default::default();
    let messages_clone = messages.clone();
    let callback: sitesheet_core::pipeline::ProgressCallback =
        std::sync::Arc::new(move |message: String| {
            messages_clone.lock().unwrap().push(message);
        });

    let pipeline = Pipeline::with_options(PipelineOptions {
        timeout_secs: 5,
        page_concurrency: 4,
    });
    pipeline
        .run_with_progress(&format!("{}/sitemap.xml", server.uri()), Some(callback))
        .await
        .unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.starts_with("Resolving ")));
    assert!(messages.iter().any(|m| m.contains("Harvesting sitemap 1/1")));
}
