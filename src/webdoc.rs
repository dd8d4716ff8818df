//! Web documentation source
//!
//! An optionally-authenticated HTTP client holding one parsed HTML page at a
//! time. It hands back raw inner-HTML fragments selected by element id or by
//! exact class attribute, enumerates linked stylesheet contents, and can
//! localize the images the held page references. It knows nothing about the
//! documentation model; the pipeline decides which fragment goes where.
//!
//! Sites that gate their documentation behind a login form are handled the
//! blunt way: the form body is POSTed with every page request, and a failed
//! authenticated fetch is retried once without authentication before giving
//! up.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum WebDocError {
    #[error("Invalid documentation URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("Failed to read the response body of '{url}': {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid selector '{css}': {message}")]
    Selector { css: String, message: String },

    #[error("Failed to store image '{path}': {source}")]
    Image {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Login form credentials for protected documentation sites.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// One documentation site and the page currently held.
pub struct WebDocumentation {
    agent: ureq::Agent,
    home: Url,
    login_body: Option<String>,
    page_html: String,
    document: Html,
    stylesheet_count: Option<usize>,
}

impl WebDocumentation {
    /// Open the site and load its home page. Credentials are form-encoded
    /// once here and sent with every subsequent request.
    pub fn connect(home: &str, credentials: Option<Credentials>) -> Result<Self, WebDocError> {
        let home = Url::parse(home).map_err(|e| WebDocError::Url {
            url: home.to_string(),
            source: e,
        })?;
        let login_body = credentials.map(|c| {
            format!(
                "os_username={}&os_password={}",
                urlencoding::encode(&c.username),
                urlencoding::encode(&c.password)
            )
        });

        let mut site = Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .timeout_connect(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
                .build(),
            home,
            login_body,
            page_html: String::new(),
            document: Html::parse_document(""),
            stylesheet_count: None,
        };
        site.load("")?;
        Ok(site)
    }

    /// Fetch a page relative to the home URL and make it the held page.
    pub fn load(&mut self, page: &str) -> Result<(), WebDocError> {
        let url = self.join(page)?;
        let html = self.fetch_string(&url)?;
        self.set_page(html);
        Ok(())
    }

    /// Raw HTML of the held page.
    pub fn page_html(&self) -> &str {
        &self.page_html
    }

    /// Inner HTML of the element with the given id. Empty when no element
    /// carries it.
    pub fn content_by_id(&self, id: &str) -> String {
        for node in self.document.tree.root().descendants() {
            let Some(element) = node.value().as_element() else {
                continue;
            };
            if element.attr("id") != Some(id) {
                continue;
            }
            if let Some(element_ref) = ElementRef::wrap(node) {
                return element_ref.inner_html();
            }
        }
        String::new()
    }

    /// Inner HTML of the nth `tag` element whose class attribute equals
    /// `class` exactly. Empty when there are not that many.
    pub fn content_by_class(&self, class: &str, nth: usize, tag: &str) -> String {
        let mut seen = 0;
        for node in self.document.tree.root().descendants() {
            let Some(element) = node.value().as_element() else {
                continue;
            };
            if element.name() != tag || element.attr("class") != Some(class) {
                continue;
            }
            if seen == nth {
                if let Some(element_ref) = ElementRef::wrap(node) {
                    return element_ref.inner_html();
                }
            }
            seen += 1;
        }
        String::new()
    }

    /// Download every stylesheet the held page links, in document order.
    pub fn stylesheets(&mut self) -> Result<Vec<String>, WebDocError> {
        let link = selector("link")?;
        let hrefs: Vec<String> = self
            .document
            .select(&link)
            .filter(|el| el.value().attr("rel") == Some("stylesheet"))
            .filter_map(|el| el.value().attr("href").map(str::to_string))
            .collect();

        let mut sheets = Vec::with_capacity(hrefs.len());
        for href in &hrefs {
            let url = self.join(href)?;
            sheets.push(self.fetch_string(&url)?);
        }
        self.stylesheet_count = Some(sheets.len());
        Ok(sheets)
    }

    /// Stylesheet count recorded by the last `stylesheets` call.
    pub fn stylesheet_count(&self) -> Option<usize> {
        self.stylesheet_count
    }

    /// Download the images the held page references into
    /// `out_dir/html/{link_prefix}` (skipping files already present) and
    /// rewrite their `src` attributes to `{link_prefix}/{name}`. A failed
    /// download is logged; the attribute is rewritten either way.
    pub fn internalize_images(
        &mut self,
        out_dir: &Path,
        link_prefix: &str,
    ) -> Result<(), WebDocError> {
        let img = selector("img")?;
        let sources: Vec<String> = self
            .document
            .select(&img)
            .filter_map(|el| el.value().attr("src").map(str::to_string))
            .collect();
        if sources.is_empty() {
            return Ok(());
        }

        let image_dir = out_dir.join("html").join(link_prefix);
        fs::create_dir_all(&image_dir).map_err(|e| WebDocError::Image {
            path: image_dir.display().to_string(),
            source: e,
        })?;

        let mut rewritten = self.page_html.clone();
        for src in &sources {
            let Some(file_name) = Path::new(src).file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let local_name = format!("webDocImage_{file_name}");
            let local_path = image_dir.join(&local_name);
            if !local_path.exists() {
                match self.join(src).and_then(|url| self.fetch_bytes(&url)) {
                    Ok(bytes) => {
                        fs::write(&local_path, bytes).map_err(|e| WebDocError::Image {
                            path: local_path.display().to_string(),
                            source: e,
                        })?;
                    }
                    Err(err) => log::warn!("Failed to download image '{}': {}", src, err),
                }
            }
            let local_link = format!("{link_prefix}/{local_name}");
            rewritten = rewritten
                .replace(&format!("src=\"{src}\""), &format!("src=\"{local_link}\""))
                .replace(&format!("src='{src}'"), &format!("src='{local_link}'"));
        }
        self.set_page(rewritten);
        Ok(())
    }

    fn set_page(&mut self, html: String) {
        self.document = Html::parse_document(&html);
        self.page_html = html;
    }

    fn join(&self, page: &str) -> Result<Url, WebDocError> {
        self.home.join(page).map_err(|e| WebDocError::Url {
            url: page.to_string(),
            source: e,
        })
    }

    fn fetch_string(&self, url: &Url) -> Result<String, WebDocError> {
        self.fetch(url, true)?
            .into_string()
            .map_err(|e| WebDocError::Body {
                url: url.to_string(),
                source: e,
            })
    }

    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, WebDocError> {
        let response = self.fetch(url, true)?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| WebDocError::Body {
                url: url.to_string(),
                source: e,
            })?;
        Ok(bytes)
    }

    fn fetch(&self, url: &Url, with_auth: bool) -> Result<ureq::Response, WebDocError> {
        let result = match &self.login_body {
            Some(body) if with_auth => self
                .agent
                .post(url.as_str())
                .set("Content-Type", "application/x-www-form-urlencoded")
                .send_string(body),
            _ => self.agent.get(url.as_str()).call(),
        };
        match result {
            Ok(response) => Ok(response),
            Err(err) if with_auth && self.login_body.is_some() => {
                log::debug!(
                    "Authenticated fetch of '{}' failed ({}), retrying without authentication",
                    url,
                    err
                );
                self.fetch(url, false)
            }
            Err(err) => Err(WebDocError::Fetch {
                url: url.to_string(),
                source: Box::new(err),
            }),
        }
    }
}

fn selector(css: &str) -> Result<Selector, WebDocError> {
    Selector::parse(css).map_err(|e| WebDocError::Selector {
        css: css.to_string(),
        message: e.to_string(),
    })
}
