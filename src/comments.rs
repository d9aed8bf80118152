use crate::model::{resolve_author, CuratedComment, RawComment};

/// Take the first `max_count` entries in source order and curate the ones with a body.
/// Placeholders inside the window are dropped, so the result may be shorter than `max_count`.
pub fn extract<I>(comments: I, max_count: usize) -> Vec<CuratedComment>
where
    I: IntoIterator<Item = RawComment>,
{
    comments
        .into_iter()
        .take(max_count)
        .filter_map(|c| {
            let body = c.body?;
            Some(CuratedComment {
                author: resolve_author(c.author.as_deref()),
                id: c.id,
                body,
                score: c.score,
            })
        })
        .collect()
}
