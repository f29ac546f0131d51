const META_TITLE: &str = "META_TITLE:";
const META_DESCRIPTION: &str = "META_DESCRIPTION:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogMeta {
    pub meta_title: String,
    pub meta_description: String,
}

/// Pulls the `META_TITLE:` / `META_DESCRIPTION:` lines the prompt asks for.
pub fn extract_meta(content: &str) -> BlogMeta {
    let mut meta = BlogMeta::default();
    for line in content.lines() {
        if let Some(rest) = line.strip_prefix(META_TITLE) {
            meta.meta_title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(META_DESCRIPTION) {
            meta.meta_description = rest.trim().to_string();
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_both_fields() {
        let meta = extract_meta("META_TITLE:  Edge AI \nMETA_DESCRIPTION: Fast models\n\n# Body");
        assert_eq!(meta.meta_title, "Edge AI");
        assert_eq!(meta.meta_description, "Fast models");
    }

    #[test]
    fn missing_fields_are_empty() {
        assert_eq!(extract_meta("# Just a heading"), BlogMeta::default());
    }

    #[test]
    fn indented_lines_do_not_count() {
        let meta = extract_meta("  META_TITLE: nope");
        assert_eq!(meta.meta_title, "");
    }
}
