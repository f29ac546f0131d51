use blog_archive::{check_costs, BlogArchive, ManagerReport};
use blog_models::{BlogOutcome, Config};
use blog_testsupport::sample_blog;

#[test]
fn written_blogs_scan_back() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let archive = BlogArchive::new(dir.path().join("generated_blogs"));

    let first = archive.write_blog(1, &sample_blog("Edge AI", 0.0475))?;
    archive.write_blog(2, &sample_blog("AI Search/Answers", 0.05))?;
    assert!(first.ends_with("blog_01_Edge_AI.txt"));
    assert!(archive.dir().join("blog_02_AI_Search_Answers.txt").exists());

    let text = std::fs::read_to_string(&first)?;
    assert!(text.starts_with("BLOG GENERATION REPORT\n"));
    assert!(text.contains("Input Tokens: 1,250\n"));
    assert!(text.contains("Total Tokens: 4,000\n"));
    assert!(text.contains("Cost: $0.0475\n"));
    assert!(text.ends_with("Start small and measure."));

    let blogs = archive.scan()?;
    assert_eq!(blogs.len(), 2);
    assert_eq!(blogs[0].topic, "Edge AI");
    assert_eq!(blogs[0].input_tokens, 1250);
    assert_eq!(blogs[0].output_tokens, 2750);
    assert_eq!(blogs[0].model, "gpt-4o-2024-08-06");
    assert_eq!(blogs[1].topic, "AI Search/Answers");

    let report = ManagerReport::from_blogs(blogs, &Config::default().pricing);
    assert_eq!(report.total_tokens(), 8000);
    assert!((report.total_cost - 0.0975).abs() < 1e-9);
    Ok(())
}

#[test]
fn scan_skips_other_and_legacy_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let archive = BlogArchive::new(dir.path());
    archive.write_blog(1, &sample_blog("Edge AI", 0.01))?;
    std::fs::write(dir.path().join("blog_02_old.txt"), "Topic: Old\nWord Count: 10\n")?;
    std::fs::write(dir.path().join("notes.txt"), "Topic: Not a blog\n")?;

    let blogs = archive.scan()?;
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].file_name, "blog_01_Edge_AI.txt");
    Ok(())
}

#[test]
fn summary_lists_every_outcome() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let archive = BlogArchive::new(dir.path());
    let outcomes = vec![
        BlogOutcome::Success(sample_blog("Edge AI", 0.01)),
        BlogOutcome::Failed {
            topic: "AI Search".to_string(),
            error: "API error 429".to_string(),
        },
    ];

    let path = archive.write_summary(3, &outcomes)?;
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("SUMMARY_") && name.ends_with(".txt"));

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("Total Blogs Attempted: 3\n"));
    assert!(text.contains("Successfully Generated: 1\n"));
    assert!(text.contains("Failed: 2\n"));
    assert!(text.contains("Blog 1: Edge AI\nStatus: success\nWord Count: "));
    assert!(text.contains("Blog 2: AI Search\nStatus: failed\nError: API error 429\n"));

    // summaries are not blog files
    assert!(archive.scan()?.is_empty());
    Ok(())
}

#[test]
fn cost_check_inspects_first_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let empty = check_costs(dir.path())?;
    assert_eq!(empty.files, 0);
    assert!(empty.first_file.is_none());

    let archive = BlogArchive::new(dir.path());
    archive.write_blog(1, &sample_blog("Edge AI", 0.01))?;
    std::fs::write(dir.path().join("blog_02_old.txt"), "Topic: Old\n")?;

    let check = check_costs(dir.path())?;
    assert_eq!(check.files, 2);
    assert_eq!(check.first_file.as_deref(), Some("blog_01_Edge_AI.txt"));
    assert_eq!(check.preview.len(), 20);
    assert_eq!(check.preview[0], "BLOG GENERATION REPORT");
    assert!(check.is_tracked());
    Ok(())
}
