//! Live content source backed by the Reddit OAuth API (application-only auth).

use crate::config::ApiCredentials;
use crate::model::{RawComment, RawSubmission};
use crate::source::{ContentSource, RankingMode, SourceError, SubmissionStream};
use crate::zstd_jsonl::author_from_wire;
use reqwest::blocking::{Client, Response};
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const PAGE_MAX: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 { 3600 }

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    over_18: bool,
    author: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    permalink: String,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    #[serde(default)]
    id: String,
    body: Option<String>,
    #[serde(default)]
    score: i64,
    author: Option<String>,
}

impl From<PostData> for RawSubmission {
    fn from(p: PostData) -> Self {
        RawSubmission {
            id: p.id,
            title: p.title,
            selftext: p.selftext,
            score: p.score,
            num_comments: p.num_comments,
            created_utc: p.created_utc,
            over_18: p.over_18,
            author: author_from_wire(p.author),
            url: p.url,
            permalink: p.permalink,
        }
    }
}

struct Token {
    value: String,
    expires_at: Instant,
}

pub struct RedditApiSource {
    client: Client,
    creds: ApiCredentials,
    token: RefCell<Token>,
}

impl RedditApiSource {
    /// Build the HTTP client and obtain an access token. Failure here is fatal for the run.
    pub fn connect(creds: &ApiCredentials) -> Result<Self, SourceError> {
        // Unknown communities answer with a redirect to search; it must surface, not be followed.
        let client = Client::builder()
            .user_agent(creds.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .redirect(Policy::none())
            .build()?;
        let token = request_token(&client, creds)?;
        tracing::info!("Authenticated with Reddit API as application {}", creds.client_id);
        Ok(Self { client, creds: creds.clone(), token: RefCell::new(token) })
    }

    fn access_token(&self) -> Result<String, SourceError> {
        if Instant::now() >= self.token.borrow().expires_at {
            tracing::debug!("access token expired; re-authenticating");
            let fresh = request_token(&self.client, &self.creds)?;
            *self.token.borrow_mut() = fresh;
        }
        Ok(self.token.borrow().value.clone())
    }

    fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, SourceError> {
        let url = format!("{}{}", API_BASE, endpoint);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.access_token()?)
            .query(&[("raw_json", "1")])
            .query(params)
            .send()?;
        let resp = check_status(resp, endpoint)?;
        resp.json::<Value>().map_err(|e| SourceError::Decode(format!("{}: {}", endpoint, e)))
    }

    fn listing_page(&self, community: &str, mode: RankingMode, limit: usize, after: Option<String>) -> Result<Value, SourceError> {
        let endpoint = match mode {
            RankingMode::Hot => format!("/r/{}/hot", community),
            RankingMode::TopWeek | RankingMode::TopMonth => format!("/r/{}/top", community),
        };
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(t) = mode.time_param() {
            params.push(("t", t.to_string()));
        }
        if let Some(a) = after {
            params.push(("after", a));
        }
        self.get_json(&endpoint, &params).map_err(|e| listing_error(e, community))
    }
}

fn request_token(client: &Client, creds: &ApiCredentials) -> Result<Token, SourceError> {
    let resp = client
        .post(TOKEN_URL)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Auth(format!("token endpoint returned HTTP {}", status.as_u16())));
    }
    // Bad credentials can also come back as 200 with an "error" body.
    let body: Value = resp.json().map_err(|e| SourceError::Decode(format!("token response: {}", e)))?;
    if let Some(err) = body.get("error") {
        return Err(SourceError::Auth(err.to_string()));
    }
    let tok: TokenResponse = serde_json::from_value(body).map_err(|e| SourceError::Auth(format!("token response: {}", e)))?;
    // Refresh a minute early.
    let ttl = Duration::from_secs(tok.expires_in.saturating_sub(60));
    Ok(Token { value: tok.access_token, expires_at: Instant::now() + ttl })
}

fn check_status(resp: Response, endpoint: &str) -> Result<Response, SourceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status.as_u16() == 401 {
        return Err(SourceError::Auth(format!("{} rejected the access token", endpoint)));
    }
    Err(SourceError::Status { endpoint: endpoint.to_string(), status: status.as_u16() })
}

/// A redirect (to the search page) or 404 on a community listing means the community doesn't exist.
fn listing_error(err: SourceError, community: &str) -> SourceError {
    match err {
        SourceError::Status { status, .. } if (300..400).contains(&status) || status == 404 => {
            SourceError::CommunityNotFound(community.to_string())
        }
        other => other,
    }
}

/// Submissions (`t3`) of one listing page plus its `after` cursor.
fn decode_listing(page: Value) -> Result<(Vec<RawSubmission>, Option<String>), SourceError> {
    let listing: Listing = serde_json::from_value(page).map_err(|e| SourceError::Decode(format!("listing: {}", e)))?;
    let subs = listing
        .data
        .children
        .into_iter()
        .filter(|t| t.kind == "t3")
        .map(|t| {
            serde_json::from_value::<PostData>(t.data)
                .map(RawSubmission::from)
                .map_err(|e| SourceError::Decode(format!("submission: {}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let after = listing.data.after.filter(|a| !a.is_empty());
    Ok((subs, after))
}

/// `/comments/{id}` answers `[submission listing, comment listing]`. Keeps first-level
/// `t1` comments; "more" placeholders are dropped without expansion.
fn decode_comment_pair(pair: Value) -> Result<Vec<RawComment>, SourceError> {
    let pair: Vec<Listing> = serde_json::from_value(pair).map_err(|e| SourceError::Decode(format!("comment pair: {}", e)))?;
    let Some(thread) = pair.into_iter().nth(1) else {
        return Err(SourceError::Decode("missing comment listing".to_string()));
    };
    let comments = thread
        .data
        .children
        .into_iter()
        .filter(|t| t.kind == "t1")
        .filter_map(|t| serde_json::from_value::<CommentData>(t.data).ok())
        .map(|c| RawComment { id: c.id, body: c.body, score: c.score, author: author_from_wire(c.author) })
        .collect();
    Ok(comments)
}

/// Pages through a listing on demand, following `after` until `remaining` hits zero
/// or the listing runs out. `fetch_page(page_size, after)` returns the raw page.
struct ListingPages<F> {
    fetch_page: F,
    remaining: usize,
    after: Option<String>,
    buffer: VecDeque<RawSubmission>,
    done: bool,
}

impl<F> ListingPages<F>
where
    F: FnMut(usize, Option<String>) -> Result<Value, SourceError>,
{
    fn new(fetch_page: F, limit: usize) -> Self {
        Self { fetch_page, remaining: limit, after: None, buffer: VecDeque::new(), done: false }
    }
}

impl<F> Iterator for ListingPages<F>
where
    F: FnMut(usize, Option<String>) -> Result<Value, SourceError>,
{
    type Item = Result<RawSubmission, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sub) = self.buffer.pop_front() {
            return Some(Ok(sub));
        }
        if self.done || self.remaining == 0 {
            return None;
        }
        let page_size = self.remaining.min(PAGE_MAX);
        let (subs, after) = match (self.fetch_page)(page_size, self.after.clone()).and_then(decode_listing) {
            Ok(p) => p,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        let subs: Vec<RawSubmission> = subs.into_iter().take(self.remaining).collect();
        self.remaining -= subs.len();
        self.after = after;
        if self.after.is_none() || subs.is_empty() {
            self.done = true;
        }
        self.buffer.extend(subs);
        self.buffer.pop_front().map(Ok)
    }
}

impl ContentSource for RedditApiSource {
    fn fetch(&self, community: &str, mode: RankingMode, limit: usize) -> Result<SubmissionStream<'_>, SourceError> {
        let community = community.to_string();
        let pages = ListingPages::new(move |size, after| self.listing_page(&community, mode, size, after), limit);
        Ok(Box::new(pages))
    }

    fn comments(&self, submission: &RawSubmission) -> Result<Vec<RawComment>, SourceError> {
        let endpoint = format!("/comments/{}", submission.id);
        let pair = self.get_json(&endpoint, &[("depth", "1".to_string())])?;
        decode_comment_pair(pair).map_err(|e| match e {
            SourceError::Decode(msg) => SourceError::Decode(format!("{}: {}", endpoint, msg)),
            other => other,
        })
    }
}
