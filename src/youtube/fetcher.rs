use super::{
    ChannelLookup, ChannelSummary, ListingItem, SearchKind, SearchRequest, VideoPlatformApi,
    VideoStats,
};
use crate::error::{NicheError, Result};
use crate::resolver::ChannelRef;
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, warn};

/// Largest page or batch the API accepts
pub const API_MAX_RESULTS: u32 = 50;

/// One page of listing results plus its continuation token
struct Page {
    items: Vec<ListingItem>,
    next_page_token: Option<String>,
}

/// Catalog fetcher: pagination, batching and the degrade-on-error policy
/// over a [`VideoPlatformApi`].
///
/// Calls are issued strictly one after another. Error payloads from listing,
/// search or statistics calls end the fetch early with whatever was collected;
/// transport, quota and credential failures are returned to the caller.
pub struct CatalogFetcher {
    api: Box<dyn VideoPlatformApi>,
    page_size: u32,
}

impl CatalogFetcher {
    pub fn new(api: Box<dyn VideoPlatformApi>) -> Self {
        Self {
            api,
            page_size: API_MAX_RESULTS,
        }
    }

    /// Use a smaller page and batch size (clamped to `1..=50`)
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, API_MAX_RESULTS);
        self
    }

    /// Fetch one channel's snippet, statistics and upload playlist
    pub async fn fetch_channel_summary(&self, channel_id: &str) -> Result<ChannelSummary> {
        debug!("Fetching channel summary for {}", channel_id);
        let lookup = ChannelLookup::Ids(vec![channel_id.to_string()]);
        let response = match self.api.list_channels(&lookup).await {
            Ok(response) => response,
            Err(NicheError::Api { message, .. }) => {
                return Err(NicheError::NotFound(format!("channel {}: {}", channel_id, message)))
            }
            Err(e) => return Err(e),
        };

        response
            .items
            .into_iter()
            .next()
            .map(ChannelSummary::from)
            .ok_or_else(|| NicheError::NotFound(format!("channel {}", channel_id)))
    }

    /// Resolve a user-supplied channel reference to a stable channel id
    pub async fn resolve_channel_id(&self, channel: &ChannelRef) -> Result<String> {
        let lookup = match channel {
            ChannelRef::Id(id) => return Ok(id.clone()),
            ChannelRef::Handle(handle) => ChannelLookup::Handle(handle.clone()),
            ChannelRef::Username(name) => ChannelLookup::Username(name.clone()),
            ChannelRef::CustomName(name) => return self.resolve_custom_name(name).await,
            ChannelRef::NeedsResolution(url) => {
                warn!("URL does not contain a channel reference: {}", url);
                return Err(NicheError::InvalidInput(format!(
                    "{} is a platform URL but not a channel URL; use a /channel/, /@handle, /user/ or /c/ link",
                    url
                )));
            }
        };

        let response = match self.api.list_channels(&lookup).await {
            Ok(response) => response,
            Err(NicheError::Api { message, .. }) => {
                return Err(NicheError::NotFound(format!("{:?}: {}", channel, message)))
            }
            Err(e) => return Err(e),
        };

        let id = response
            .items
            .into_iter()
            .next()
            .map(|item| item.id)
            .ok_or_else(|| NicheError::NotFound(format!("no channel for {:?}", channel)))?;

        info!("Resolved {:?} to channel {}", channel, id);
        Ok(id)
    }

    // Custom URLs have no lookup parameter; the best channel search hit stands in.
    async fn resolve_custom_name(&self, name: &str) -> Result<String> {
        let request = SearchRequest {
            query: name.to_string(),
            kind: SearchKind::Channel,
            max_results: 1,
            page_token: None,
        };

        let response = match self.api.search(&request).await {
            Ok(response) => response,
            Err(NicheError::Api { message, .. }) => {
                return Err(NicheError::NotFound(format!("custom URL {}: {}", name, message)))
            }
            Err(e) => return Err(e),
        };

        let id = response
            .items
            .iter()
            .find_map(|result| result.id.channel_id.clone())
            .ok_or_else(|| NicheError::NotFound(format!("no channel for custom URL {}", name)))?;

        warn!("Custom URL '{}' resolved by search to channel {} (best match)", name, id);
        Ok(id)
    }

    /// Upload playlist of a channel, looked up through the `channels` resource
    pub async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String> {
        let summary = self.fetch_channel_summary(channel_id).await?;
        summary
            .uploads_playlist_id
            .ok_or_else(|| NicheError::NotFound(format!("upload listing of channel {}", channel_id)))
    }

    /// Ordered ids of a channel's uploads, at most `limit`
    pub async fn fetch_uploaded_item_ids(&self, channel_id: &str, limit: usize) -> Result<Vec<String>> {
        let listing = self.fetch_upload_listing(channel_id, limit).await?;
        Ok(listing.into_iter().map(|item| item.id).collect())
    }

    /// Ordered upload listing of a channel, at most `limit` entries
    pub async fn fetch_upload_listing(&self, channel_id: &str, limit: usize) -> Result<Vec<ListingItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let playlist_id = self.uploads_playlist_id(channel_id).await?;
        self.fetch_playlist_listing(&playlist_id, limit).await
    }

    /// Page through a playlist until `limit` items are collected or pages run out
    pub async fn fetch_playlist_listing(&self, playlist_id: &str, limit: usize) -> Result<Vec<ListingItem>> {
        let api = &self.api;
        let items = collect_pages(limit, self.page_size, move |token, max_results| async move {
            let page = api
                .list_playlist_items(playlist_id, token.as_deref(), max_results)
                .await?;
            Ok(Page {
                items: page.items.into_iter().filter_map(|item| item.into_listing()).collect(),
                next_page_token: page.next_page_token,
            })
        })
        .await?;

        info!("Collected {} uploads from playlist {}", items.len(), playlist_id);
        Ok(items)
    }

    /// Ids of videos matching a search phrase, at most `limit`
    pub async fn search_video_ids(&self, phrase: &str, limit: usize) -> Result<Vec<ListingItem>> {
        let items = self.search_listing(phrase, SearchKind::Video, limit).await?;
        info!("Search '{}' returned {} videos", phrase, items.len());
        Ok(items)
    }

    /// Channels matching a search phrase with their lifetime statistics, in search order
    pub async fn search_channels(&self, phrase: &str, limit: usize) -> Result<Vec<ChannelSummary>> {
        let hits = self.search_listing(phrase, SearchKind::Channel, limit).await?;
        let ids: Vec<String> = hits.into_iter().map(|hit| hit.id).collect();

        let mut channels = Vec::with_capacity(ids.len());
        for batch in ids.chunks(self.page_size as usize) {
            let lookup = ChannelLookup::Ids(batch.to_vec());
            match self.api.list_channels(&lookup).await {
                Ok(response) => channels.extend(response.items.into_iter().map(ChannelSummary::from)),
                Err(NicheError::Api { status, reason, .. }) => {
                    warn!("Channel statistics batch failed ({} {}), keeping partial results", status, reason);
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        channels.sort_by_key(|channel| ids.iter().position(|id| *id == channel.id).unwrap_or(usize::MAX));
        info!("Search '{}' returned {} channels", phrase, channels.len());
        Ok(channels)
    }

    async fn search_listing(&self, phrase: &str, kind: SearchKind, limit: usize) -> Result<Vec<ListingItem>> {
        let api = &self.api;
        collect_pages(limit, self.page_size, move |token, max_results| async move {
            let request = SearchRequest {
                query: phrase.to_string(),
                kind,
                max_results,
                page_token: token,
            };
            let page = api.search(&request).await?;
            Ok(Page {
                items: page.items.into_iter().filter_map(|result| result.into_listing()).collect(),
                next_page_token: page.next_page_token,
            })
        })
        .await
    }

    /// Statistics for `ids`, one `videos` call per batch of up to 50 ids.
    ///
    /// The result is keyed by id and unordered with respect to `ids`; ids the
    /// API does not return are simply absent.
    pub async fn fetch_item_statistics(&self, ids: &[String]) -> Result<Vec<VideoStats>> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect();

        let mut stats = Vec::with_capacity(unique.len());
        for (index, batch) in unique.chunks(self.page_size as usize).enumerate() {
            debug!("Fetching statistics batch {} ({} ids)", index + 1, batch.len());
            match self.api.list_videos(batch).await {
                Ok(response) => {
                    if response.items.is_empty() {
                        warn!("Statistics batch {} returned no items", index + 1);
                    }
                    stats.extend(response.items.into_iter().map(VideoStats::from));
                }
                Err(NicheError::Api { status, reason, message }) => {
                    warn!("Statistics batch {} failed ({} {}): {}", index + 1, status, reason, message);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(stats)
    }
}

/// Drive a paginated listing until `limit` unique items are collected or no
/// fresh continuation token remains. Empty pages do not end the listing.
async fn collect_pages<F, Fut>(limit: usize, page_size: u32, mut fetch_page: F) -> Result<Vec<ListingItem>>
where
    F: FnMut(Option<String>, u32) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let mut items = Vec::new();
    if limit == 0 {
        return Ok(items);
    }

    let mut seen_ids = HashSet::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut page_number = 0;

    loop {
        let remaining = limit - items.len();
        let max_results = remaining.min(page_size as usize) as u32;
        page_number += 1;

        let page = match fetch_page(page_token.clone(), max_results).await {
            Ok(page) => page,
            Err(NicheError::Api { status, reason, message }) => {
                warn!(
                    "Page {} failed ({} {}): {}; keeping {} items",
                    page_number,
                    status,
                    reason,
                    message,
                    items.len()
                );
                break;
            }
            Err(e) => return Err(e),
        };

        debug!("Page {} returned {} items", page_number, page.items.len());

        for item in page.items {
            if items.len() >= limit {
                break;
            }
            if seen_ids.insert(item.id.clone()) {
                items.push(item);
            }
        }

        if items.len() >= limit {
            break;
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() && seen_tokens.insert(token.clone()) => {
                page_token = Some(token);
            }
            _ => break,
        }
    }

    Ok(items)
}
