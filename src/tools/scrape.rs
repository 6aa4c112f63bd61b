use std::sync::LazyLock;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use crate::config::NetworkConfig;
use crate::utils::truncation::truncate_chars;
use super::adapter::{ToolAdapter, ToolId, ToolOutcome};

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Fetch a page and reduce it to visible text.
pub struct PageScrape {
    client: Client,
    max_chars: usize,
}

impl PageScrape {
    pub fn new(network: &NetworkConfig, max_chars: usize) -> Self {
        Self {
            client: network.http_client(network.tool_timeout()),
            max_chars,
        }
    }
}

#[async_trait]
impl ToolAdapter for PageScrape {
    fn id(&self) -> ToolId { ToolId::PageScrape }

    async fn invoke(&self, query: &str) -> ToolOutcome {
        let url = query.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return ToolOutcome::Unavailable(format!("Not a scrapeable URL: {}", url));
        }

        let resp = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return ToolOutcome::Unavailable(format!("Scrape of {} failed: {}", url, e)),
        };
        let status = resp.status();
        if !status.is_success() {
            return ToolOutcome::Unavailable(format!("Scrape of {} returned HTTP {}", url, status.as_u16()));
        }
        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => return ToolOutcome::Unavailable(format!("Unreadable page body: {}", e)),
        };

        let text = html_to_text(&body);
        if text.is_empty() {
            ToolOutcome::Empty
        } else {
            ToolOutcome::Found(truncate_chars(&text, self.max_chars))
        }
    }
}

pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_markup() {
        let html = r#"<html><head><style>body{color:red}</style><script>var x = "<b>";</script></head>
            <body><h1>Known Exploited</h1><p>Ransomware &amp; phishing   campaigns</p></body></html>"#;
        assert_eq!(html_to_text(html), "Known Exploited Ransomware & phishing campaigns");
    }

    #[test]
    fn test_html_to_text_blank_page() {
        assert_eq!(html_to_text("<html><body>  </body></html>"), "");
    }

    #[tokio::test]
    async fn test_non_url_query_is_unavailable() {
        let adapter = PageScrape::new(&NetworkConfig::default(), 600);
        assert!(matches!(adapter.invoke("cisa.gov").await, ToolOutcome::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_page_is_unavailable() {
        let network = NetworkConfig { tool_timeout_secs: 2, ..Default::default() };
        let adapter = PageScrape::new(&network, 600);
        assert!(matches!(adapter.invoke("http://127.0.0.1:9/").await, ToolOutcome::Unavailable(_)));
    }
}
