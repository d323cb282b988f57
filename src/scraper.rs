use crate::parser::{ParseError, extract_courses};
use crate::types::CourseResponse;
use crate::utils::{DecodeError, decode_hex_page};

use reqwest::{Client, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    HttpStatus(StatusCode),
    #[error("invalid response format: sanitize envelope not found")]
    MissingEnvelope,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl ScraperError {
    /// Embedded-failure form of this error, for clients that inspect the
    /// response body's status/error fields instead of the error channel.
    pub fn status_report(&self) -> CourseResponse {
        CourseResponse::failure(500, self.to_string())
    }
}

const PAGE_PATH: &str = "/srm_university/academia-academic-services/page/My_Time_Table_2023_24";

/// The portal embeds the hex-encoded page inside a `.sanitize('...')` call
/// in an otherwise JavaScript-shaped response body.
const SANITIZE_MARKER: &str = ".sanitize('";
const SANITIZE_CLOSE: &str = "')";

/// Fixed header set sent with every page request, split around the session
/// cookie's position in the sequence. The portal serves this page only to
/// what looks like its own frontend's XHR, so the full browser header
/// surface is reproduced verbatim and in the browser's emission order;
/// altering, dropping, or reordering entries risks a server-side rejection.
const HEADERS_BEFORE_COOKIE: &[(&str, &str)] = &[
    ("Accept", "*/*"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Connection", "keep-alive"),
    (
        "Content-Type",
        "application/x-www-form-urlencoded; charset=UTF-8",
    ),
];

const HEADERS_AFTER_COOKIE: &[(&str, &str)] = &[
    ("Referer", "https://academia.srmist.edu.in/"),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-origin"),
    (
        "User-Agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36",
    ),
    ("X-Requested-With", "XMLHttpRequest"),
    ("dnt", "1"),
    (
        "sec-ch-ua",
        r#""Not)A;Brand";v="8", "Chromium";v="138", "Google Chrome";v="138""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""macOS""#),
    ("sec-gpc", "1"),
];

/// Authenticated client for the course/timetable page. One instance per
/// session cookie; every fetch is an independent read-only GET.
#[derive(Debug, Clone)]
pub struct CoursePage {
    client: Client,
    cookie: String,
}

impl CoursePage {
    pub fn new(cookie: &str) -> Result<Self, ScraperError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            cookie: cookie.to_string(),
        })
    }

    /// Fetches the course page and returns its decoded HTML.
    pub async fn fetch_page(&self) -> Result<String, ScraperError> {
        let url = format!("{}{}", crate::BASE_URL, PAGE_PATH);
        log::info!("Fetching course page...");

        let mut request = self.client.get(&url);
        for (name, value) in HEADERS_BEFORE_COOKIE {
            request = request.header(*name, *value);
        }
        request = request.header("Cookie", &self.cookie);
        for (name, value) in HEADERS_AFTER_COOKIE {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScraperError::HttpStatus(status));
        }

        let body = response.text().await?;
        let payload = unwrap_sanitized(&body)?;
        Ok(decode_hex_page(payload)?)
    }

    /// Runs the full fetch/decode/extract pipeline for the enrolled-course
    /// table.
    pub async fn fetch_courses(&self) -> Result<CourseResponse, ScraperError> {
        let page = self.fetch_page().await?;
        Ok(extract_courses(&page)?)
    }

    /// Like [`fetch_courses`](Self::fetch_courses), but also surfaces any
    /// failure through the response body's status/error fields. Both caller
    /// conventions observe the same failure.
    pub async fn fetch_courses_report(&self) -> (CourseResponse, Option<ScraperError>) {
        match self.fetch_courses().await {
            Ok(response) => (response, None),
            Err(e) => (e.status_report(), Some(e)),
        }
    }
}

/// Extracts the hex payload from the sanitize envelope.
///
/// A missing marker means the portal changed its envelope or the session
/// expired and a different page came back entirely.
fn unwrap_sanitized(body: &str) -> Result<&str, ScraperError> {
    let after_marker = body
        .split_once(SANITIZE_MARKER)
        .ok_or(ScraperError::MissingEnvelope)?
        .1;

    Ok(match after_marker.split_once(SANITIZE_CLOSE) {
        Some((payload, _)) => payload,
        None => after_marker,
    })
}
