use blog_models::{KeywordTable, Topic, WebsiteLink, PROMPT_KEYWORD_LIMIT};
use rand::seq::SliceRandom;
use rand::Rng;

pub const SYSTEM_PROMPT: &str = "You are an expert SEO blog writer specializing in AI and technology content. You create engaging, well-structured, and highly optimized blog posts.";

/// Internal links suggested per post.
pub const LINK_SAMPLE_SIZE: usize = 3;

/// Random links for internal linking, without replacement.
pub fn select_links<R: Rng + ?Sized>(
    links: &[WebsiteLink],
    count: usize,
    rng: &mut R,
) -> Vec<WebsiteLink> {
    links
        .choose_multiple(rng, count.min(links.len()))
        .cloned()
        .collect()
}

pub fn build_prompt(
    topic: &Topic,
    seo_keywords: &KeywordTable,
    llm_keywords: &KeywordTable,
    links: &[WebsiteLink],
) -> String {
    let seo = seo_keywords.first_column(PROMPT_KEYWORD_LIMIT).join(", ");
    let llm = llm_keywords.first_column(PROMPT_KEYWORD_LIMIT).join(", ");
    let links_text: String = links
        .iter()
        .map(|link| format!("- {}: {}\n", link.name, link.url))
        .collect();

    format!(
        r#"
Write a comprehensive, SEO-optimized blog post about "{topic}".

TOPIC DETAILS:
- Main Topic: {topic}
- Context: {description}
- Reference: {source}

SEO REQUIREMENTS:
- Target these SEO keywords naturally: {seo}
- Include these LLM-optimized phrases: {llm}
- Target 90+ SEMrush SEO score
- 1500-2000 words
- Keyword density: 1-2%

CONTENT STRUCTURE:
1. Compelling meta title (max 60 characters)
2. Meta description (max 160 characters)
3. H1 title
4. Introduction with hook
5. 4-5 H2 sections with H3 subsections
6. Include these internal links naturally:
{links_text}
7. Add [IMAGE PLACEHOLDER: descriptive alt text] in 3 relevant places
8. FAQ section with 5 questions
9. Strong conclusion with CTA

WRITING STYLE:
- Professional but engaging
- Clear, actionable insights
- Include statistics and examples
- Optimize for both human readers and AI search
- Use transition words for flow
- Include bullet points and numbered lists where appropriate

OUTPUT FORMAT:
```
META_TITLE: [60 char title]
META_DESCRIPTION: [160 char description]

# [H1 Title]

[Introduction paragraph with hook]

## [H2 Section 1]
[Content with H3 subsections if needed]
[IMAGE PLACEHOLDER: descriptive alt text]

## [H2 Section 2]
[Content]

## [H2 Section 3]
[Content]
[IMAGE PLACEHOLDER: descriptive alt text]

## [H2 Section 4]
[Content]

## [H2 Section 5]
[Content]
[IMAGE PLACEHOLDER: descriptive alt text]

## Frequently Asked Questions

**Q1: [Question]**
A: [Answer]

**Q2: [Question]**
A: [Answer]

**Q3: [Question]**
A: [Answer]

**Q4: [Question]**
A: [Answer]

**Q5: [Question]**
A: [Answer]

## Conclusion

[Strong conclusion with clear CTA]
```

Generate the complete blog post following this structure exactly.
"#,
        topic = topic.topic,
        description = topic.description,
        source = topic.source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_models::KeywordColumn;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn links(n: usize) -> Vec<WebsiteLink> {
        (0..n)
            .map(|i| WebsiteLink {
                name: format!("Page {i}"),
                url: format!("https://example.com/{i}"),
            })
            .collect()
    }

    #[test]
    fn select_links_caps_at_available() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_links(&links(2), LINK_SAMPLE_SIZE, &mut rng).len(), 2);
        assert_eq!(select_links(&links(10), LINK_SAMPLE_SIZE, &mut rng).len(), 3);
        assert!(select_links(&[], LINK_SAMPLE_SIZE, &mut rng).is_empty());
    }

    #[test]
    fn select_links_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        let picked = select_links(&links(5), LINK_SAMPLE_SIZE, &mut rng);
        let mut names: Vec<_> = picked.iter().map(|l| l.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn prompt_includes_topic_keywords_and_links() {
        let topic = Topic {
            topic: "Edge AI".to_string(),
            description: "Running models on devices".to_string(),
            source: "https://example.com/edge".to_string(),
        };
        let seo = KeywordTable::new(vec![KeywordColumn {
            name: "Primary".to_string(),
            values: (1..=6).map(|i| format!("seo{i}")).collect(),
        }]);
        let llm = KeywordTable::new(vec![KeywordColumn {
            name: "Phrases".to_string(),
            values: vec!["what is edge ai".to_string()],
        }]);

        let prompt = build_prompt(&topic, &seo, &llm, &links(2));

        assert!(prompt.contains(r#"blog post about "Edge AI""#));
        assert!(prompt.contains("- Context: Running models on devices"));
        assert!(prompt.contains("- Reference: https://example.com/edge"));
        assert!(prompt.contains("naturally: seo1, seo2, seo3, seo4, seo5\n"));
        assert!(!prompt.contains("seo6"));
        assert!(prompt.contains("phrases: what is edge ai"));
        assert!(prompt.contains("- Page 1: https://example.com/1\n"));
        assert!(prompt.contains("META_TITLE: [60 char title]"));
    }
}
