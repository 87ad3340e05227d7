use std::future::Future;

use futures::future::try_join_all;

use crate::error::FetchError;

/// One page of a paginated listing.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absent on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMode {
    /// Follow continuation tokens until the listing is exhausted.
    All,
    /// Stop after this many identifiers and report whether more exist.
    Capped(usize),
}

/// A merged collection plus whether the listing was cut short.
#[derive(Clone, Debug, PartialEq)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Fetched<T> {
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self::complete(Vec::new())
    }
}

/// List identifiers page by page, then hydrate them in concurrent batches.
///
/// `list_page` calls are strictly sequential since each consumes the previous
/// token. Describe calls run concurrently, one per chunk of `max_batch`
/// identifiers, and their results are concatenated in chunk order. Any failure
/// aborts the whole fetch.
pub async fn fetch_all<I, T, L, LF, D, DF>(
    mut list_page: L,
    describe_batch: D,
    max_batch: usize,
    mode: FetchMode,
) -> Result<Fetched<T>, FetchError>
where
    L: FnMut(Option<String>) -> LF,
    LF: Future<Output = Result<Page<I>, FetchError>>,
    D: Fn(Vec<I>) -> DF,
    DF: Future<Output = Result<Vec<T>, FetchError>>,
{
    let mut ids: Vec<I> = Vec::new();
    let mut token: Option<String> = None;
    let mut has_more = false;
    let mut pages = 0usize;

    loop {
        let page = list_page(token.take()).await?;
        pages += 1;
        ids.extend(page.items);
        token = page.next_token;

        if let FetchMode::Capped(cap) = mode
            && ids.len() >= cap
        {
            has_more = ids.len() > cap || token.is_some();
            ids.truncate(cap);
            break;
        }
        if token.is_none() {
            break;
        }
    }

    if ids.is_empty() {
        tracing::debug!(pages, "listing returned no identifiers");
        return Ok(Fetched {
            items: Vec::new(),
            has_more,
        });
    }

    let chunk_size = max_batch.max(1);
    let mut chunks: Vec<Vec<I>> = Vec::with_capacity(ids.len().div_ceil(chunk_size));
    let mut rest = ids.into_iter().peekable();
    while rest.peek().is_some() {
        chunks.push(rest.by_ref().take(chunk_size).collect());
    }
    tracing::debug!(pages, batches = chunks.len(), "describing listed identifiers");

    let batches = try_join_all(chunks.into_iter().map(&describe_batch)).await?;
    Ok(Fetched {
        items: batches.into_iter().flatten().collect(),
        has_more,
    })
}

/// Collect a listing whose pages already carry full records.
pub async fn collect_pages<T, L, LF>(list_page: L, mode: FetchMode) -> Result<Fetched<T>, FetchError>
where
    L: FnMut(Option<String>) -> LF,
    LF: Future<Output = Result<Page<T>, FetchError>>,
{
    fetch_all(
        list_page,
        |chunk: Vec<T>| async move { Ok::<_, FetchError>(chunk) },
        usize::MAX,
        mode,
    )
    .await
}

#[cfg(test)]
#[path = "../tests/browser/fetcher_tests.rs"]
mod tests;
