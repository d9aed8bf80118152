#[path = "common/mod.rs"]
mod common;

use common::*;
use frustration_scraper::{Rejection, Selector, SourceError, Verdict};
use std::cell::Cell;

fn no_comments() -> Result<Vec<frustration_scraper::RawComment>, SourceError> {
    panic!("comments must not be loaded")
}

/// A curated post copies fields verbatim, tags the community, and builds the full permalink.
#[test]
fn curates_matching_submission() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let sel = Selector::new(&kw, &filters);

    let sub = submission("test1", "This is frustrating");
    let post = sel.select(&sub, "test_subreddit", no_comments).unwrap().unwrap();

    assert_eq!(post.id, "test1");
    assert_eq!(post.title, "This is frustrating");
    assert_eq!(post.score, 10);
    assert_eq!(post.num_comments, 5);
    assert_eq!(post.created_utc, 1_234_567_890.0);
    assert_eq!(post.subreddit, "test_subreddit");
    assert_eq!(post.url, "https://reddit.com/test1");
    assert_eq!(post.permalink, "https://reddit.com/r/test/comments/test1");
    assert_eq!(post.author, "test_user");
    assert!(post.comments.is_none());
}

#[test]
fn body_match_is_enough() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let mut sub = submission("b1", "Question about borrowck");
    sub.selftext = "Really annoying situation".into();
    assert!(Selector::new(&kw, &filters).select(&sub, "rust", no_comments).unwrap().is_some());
}

#[test]
fn rejects_without_keyword() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let sel = Selector::new(&kw, &filters);
    let sub = submission("h1", "Happy post");
    assert!(sel.select(&sub, "rust", no_comments).unwrap().is_none());
    assert_eq!(sel.judge(&sub), Err(Verdict::NoKeyword));
}

/// Score 0 under min_score 1 is excluded even with a keyword hit.
#[test]
fn rejects_low_score_even_with_keyword() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let mut sub = submission("z", "So frustrating");
    sub.score = 0;
    let sel = Selector::new(&kw, &filters);
    assert!(sel.select(&sub, "rust", no_comments).unwrap().is_none());
    assert_eq!(sel.judge(&sub), Err(Verdict::Filtered(Rejection::LowScore)));
}

/// Adult content under exclude_nsfw is excluded even when score and keyword pass.
#[test]
fn rejects_nsfw_even_when_other_checks_pass() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let mut sub = submission("n", "Annoying");
    sub.over_18 = true;
    assert!(Selector::new(&kw, &filters).select(&sub, "rust", no_comments).unwrap().is_none());
}

#[test]
fn missing_author_resolves_to_deleted() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let mut sub = submission("a", "irritating");
    sub.author = None;
    let post = Selector::new(&kw, &filters).select(&sub, "rust", no_comments).unwrap().unwrap();
    assert_eq!(post.author, "[deleted]");
}

/// Comments are attached (capped) when enabled, and loaded only for accepted posts.
#[test]
fn attaches_comments_only_for_accepted() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let sel = Selector::new(&kw, &filters).with_comments(true, 2);
    let calls = Cell::new(0);
    let load = || {
        calls.set(calls.get() + 1);
        Ok(vec![
            comment("c1", Some("me too"), Some("alice")),
            comment("c2", Some("same"), None),
            comment("c3", Some("late"), Some("bob")),
        ])
    };

    let post = sel.select(&submission("a", "frustrating"), "rust", load).unwrap().unwrap();
    let comments = post.comments.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, "c1");
    assert_eq!(comments[1].author, "[deleted]");
    assert_eq!(calls.get(), 1);

    let rejected = sel
        .select(&submission("b", "Happy post"), "rust", || {
            calls.set(calls.get() + 1);
            Ok(Vec::new())
        })
        .unwrap();
    assert!(rejected.is_none());
    assert_eq!(calls.get(), 1, "rejected submissions never load comments");
}

/// Enabled comments with an empty thread give an empty list, not an absent one.
#[test]
fn enabled_comments_with_empty_thread() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let sel = Selector::new(&kw, &filters).with_comments(true, 5);
    let post = sel.select(&submission("a", "frustrating"), "rust", || Ok(Vec::new())).unwrap().unwrap();
    assert_eq!(post.comments, Some(Vec::new()));
}

#[test]
fn comment_source_error_propagates() {
    let kw = frustration_keywords();
    let filters = default_filters();
    let sel = Selector::new(&kw, &filters).with_comments(true, 5);
    let res = sel.select(&submission("a", "frustrating"), "rust", || {
        Err(SourceError::Status { endpoint: "/comments/a".into(), status: 500 })
    });
    assert!(res.is_err());
}
