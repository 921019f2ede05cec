//! Full outer join of listing entries and statistics, keyed on video id.

use super::VideoRecord;
use crate::youtube::{ListingItem, VideoStats};
use std::collections::{HashMap, HashSet};

/// Join listing entries with statistics.
///
/// Output order is listing order, followed by statistics-only records in
/// statistics order. Each id appears once; the side a record is missing from
/// contributes zero values.
pub fn join_records(listing: Vec<ListingItem>, stats: Vec<VideoStats>) -> Vec<VideoRecord> {
    let mut stats_order = Vec::with_capacity(stats.len());
    let mut stats_by_id: HashMap<String, VideoStats> = HashMap::with_capacity(stats.len());
    for stat in stats {
        if !stats_by_id.contains_key(&stat.id) {
            stats_order.push(stat.id.clone());
            stats_by_id.insert(stat.id.clone(), stat);
        }
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(listing.len().max(stats_order.len()));

    for item in listing {
        if !seen.insert(item.id.clone()) {
            continue;
        }

        let record = match stats_by_id.remove(&item.id) {
            Some(stat) => merge(item, stat),
            None => VideoRecord::from_listing(item),
        };
        records.push(record);
    }

    for id in stats_order {
        if let Some(stat) = stats_by_id.remove(&id) {
            if seen.insert(id) {
                records.push(VideoRecord::from(stat));
            }
        }
    }

    records
}

fn merge(item: ListingItem, stat: VideoStats) -> VideoRecord {
    let title = if item.title.trim().is_empty() {
        stat.title
    } else {
        item.title
    };

    VideoRecord {
        id: item.id,
        title,
        published_at: item.published_at.or(stat.published_at),
        channel_id: stat.channel_id,
        channel_title: item.channel_title.or(stat.channel_title),
        view_count: stat.view_count,
        like_count: stat.like_count,
        comment_count: stat.comment_count,
        duration_seconds: stat.duration_seconds,
        tags: stat.tags,
        category_id: stat.category_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, title: &str) -> ListingItem {
        ListingItem {
            id: id.to_string(),
            title: title.to_string(),
            published_at: None,
            channel_title: None,
        }
    }

    fn stats(id: &str, views: u64) -> VideoStats {
        VideoStats {
            id: id.to_string(),
            title: format!("stats title {}", id),
            published_at: None,
            channel_id: Some("UCstats".to_string()),
            channel_title: None,
            view_count: views,
            like_count: views / 10,
            comment_count: views / 100,
            duration_seconds: 60,
            tags: vec!["tag".to_string()],
            category_id: Some("22".to_string()),
        }
    }

    #[test]
    fn test_join_keeps_listing_order() {
        let records = join_records(
            vec![listing("a", "A"), listing("b", "B"), listing("c", "C")],
            vec![stats("c", 300), stats("a", 100), stats("b", 200)],
        );

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(records[0].view_count, 100);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[0].channel_id.as_deref(), Some("UCstats"));
        assert_eq!(records[2].view_count, 300);
    }

    #[test]
    fn test_unmatched_records_are_zero_valued() {
        let records = join_records(
            vec![listing("private", "Private video"), listing("a", "A")],
            vec![stats("a", 100), stats("search-only", 50)],
        );

        assert_eq!(records.len(), 3);

        let private = &records[0];
        assert_eq!(private.id, "private");
        assert_eq!(private.view_count, 0);
        assert!(private.channel_id.is_none());
        assert_eq!(private.like_count, 0);
        assert_eq!(private.duration_seconds, 0);
        assert!(private.tags.is_empty());

        let stats_only = &records[2];
        assert_eq!(stats_only.id, "search-only");
        assert_eq!(stats_only.view_count, 50);
        assert_eq!(stats_only.title, "stats title search-only");
        assert_eq!(stats_only.channel_id.as_deref(), Some("UCstats"));
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let records = join_records(
            vec![listing("a", "A"), listing("a", "A again")],
            vec![stats("a", 100), stats("a", 999)],
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].view_count, 100);
        assert_eq!(records[0].title, "A");
    }

    #[test]
    fn test_blank_listing_title_falls_back_to_stats() {
        let records = join_records(vec![listing("a", " ")], vec![stats("a", 1)]);
        assert_eq!(records[0].title, "stats title a");
    }
}
