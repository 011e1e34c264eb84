use crate::config::AllowList;
use crate::parser::PlaylistEntry;

#[inline]
pub fn is_allowed(entry: &PlaylistEntry, allow_list: &AllowList) -> bool {
    allow_list.contains(&entry.group_title)
}

/// Keeps the entries whose `group-title` is on the allow-list, preserving order.
pub fn filter_entries<I>(entries: I, allow_list: &AllowList) -> impl Iterator<Item = PlaylistEntry>
where
    I: IntoIterator<Item = PlaylistEntry>,
{
    entries
        .into_iter()
        .filter(move |entry| is_allowed(entry, allow_list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Playlist;
    use proptest::prelude::*;

    fn entry(group: &str, url: &str) -> PlaylistEntry {
        PlaylistEntry::from_lines(&format!("#EXTINF:-1 group-title=\"{group}\",{url}"), url)
    }

    #[test]
    fn keeps_only_exact_matches() {
        let allow = AllowList::new(["News"]);
        let entries = vec![
            entry("News", "http://1"),
            entry("news", "http://2"),
            entry("News HD", "http://3"),
            entry("", "http://4"),
            entry("News", "http://5"),
        ];

        let kept: Vec<_> = filter_entries(entries, &allow).map(|e| e.stream_url).collect();
        assert_eq!(kept, vec!["http://1", "http://5"]);
    }

    #[test]
    fn empty_allow_list_keeps_nothing() {
        let entries = vec![entry("News", "http://1"), entry("", "http://2")];
        assert_eq!(filter_entries(entries, &AllowList::default()).count(), 0);
    }

    fn group_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("News".to_string()),
            Just("Sports".to_string()),
            Just("[三网]央卫视直播".to_string()),
            Just(String::new()),
            "[A-Za-z ]{1,8}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Output contains exactly the allow-listed source entries, in source order.
        #[test]
        fn prop_no_false_positives_or_negatives(
            groups in prop::collection::vec(group_strategy(), 0..40),
            allowed in prop::collection::vec(group_strategy(), 0..3),
        ) {
            let allow = AllowList::new(allowed.iter().cloned());
            let mut text = String::from("#EXTM3U\n");
            for (i, group) in groups.iter().enumerate() {
                text.push_str(&format!("#EXTINF:-1 group-title=\"{group}\",Ch{i}\nhttp://s/{i}\n"));
            }

            let kept: Vec<_> = filter_entries(Playlist::parse(&text).entries(), &allow).collect();
            prop_assert!(kept.iter().all(|e| allow.contains(&e.group_title)));

            let expected: Vec<String> = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| allow.contains(g))
                .map(|(i, _)| format!("http://s/{i}"))
                .collect();
            let actual: Vec<String> = kept.into_iter().map(|e| e.stream_url).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
