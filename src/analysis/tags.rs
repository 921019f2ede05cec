use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A tag and the number of records carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Rank tags by how many tag lists contain them.
///
/// Tags are trimmed and compared case-insensitively; the first spelling seen
/// is kept. A tag repeated within one list counts once. Ties keep first-seen
/// order, and the result is truncated to `limit`.
pub fn rank_tags<'a, I>(tag_lists: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut counts: Vec<TagCount> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for tags in tag_lists {
        let mut seen_in_list = HashSet::new();
        for tag in tags {
            let display = tag.trim();
            if display.is_empty() {
                continue;
            }

            let key = display.to_lowercase();
            if !seen_in_list.insert(key.clone()) {
                continue;
            }

            match index_by_key.get(&key) {
                Some(&index) => counts[index].count += 1,
                None => {
                    index_by_key.insert(key, counts.len());
                    counts.push(TagCount {
                        tag: display.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|tags| tags.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        // a: 3, b: 3, c: 1 with "a" seen before "b"
        let tag_lists = lists(&[&["a", "b", "c"], &["b", "a"], &["a", "b"]]);
        let ranked = rank_tags(tag_lists.iter().map(Vec::as_slice), 2);

        let tags: Vec<_> = ranked.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[1].count, 3);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let tag_lists = lists(&[&["x", "y"], &["y", "z"], &["z", "x"], &["w"]]);
        let first = rank_tags(tag_lists.iter().map(Vec::as_slice), 10);
        let second = rank_tags(tag_lists.iter().map(Vec::as_slice), 10);
        assert_eq!(first, second);

        let tags: Vec<_> = first.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn test_case_insensitive_and_once_per_list() {
        let tag_lists = lists(&[&["Fitness", "fitness ", "FITNESS"], &["fitness"], &["", "  "]]);
        let ranked = rank_tags(tag_lists.iter().map(Vec::as_slice), 5);

        assert_eq!(
            ranked,
            vec![TagCount {
                tag: "Fitness".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_empty_input() {
        let tag_lists: Vec<Vec<String>> = Vec::new();
        assert!(rank_tags(tag_lists.iter().map(Vec::as_slice), 5).is_empty());
    }
}
