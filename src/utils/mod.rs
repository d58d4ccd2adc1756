/// Longest tag kept, in characters.
pub const MAX_TAG_CHARS: usize = 100;

/// Trim each tag, drop blank ones and cut the rest to [`MAX_TAG_CHARS`].
/// Order is preserved and duplicates are kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| {
            let trimmed = tag.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(MAX_TAG_CHARS).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_tags() {
        assert_eq!(
            normalize_tags(["  Hiking ", "", "music"]),
            vec!["Hiking".to_string(), "music".to_string()]
        );
    }

    #[test]
    fn long_tags_are_cut_on_char_boundaries() {
        let long = "é".repeat(150);
        let tags = normalize_tags([long.as_str()]);
        assert_eq!(tags[0].chars().count(), MAX_TAG_CHARS);
    }

    #[test]
    fn whitespace_only_list_becomes_empty() {
        assert!(normalize_tags(["   ", "\t"]).is_empty());
    }
}
