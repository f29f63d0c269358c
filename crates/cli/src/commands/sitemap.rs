use anyhow::{Context, Result};
use chrono::Utc;
use content_hub_client::ContentClient;
use content_hub_core::load_hub_config;
use content_hub_generator::{
    GeneratedDocuments, SitemapOptions, SitemapSegment, build_sitemap_at, generate_documents, xml,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Build the sitemap once and write it out.
///
/// Progress goes to stderr so the document itself can be piped from stdout.
pub async fn run(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    index: bool,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_hub_config(config_path.as_deref()).context("Failed to load configuration")?;
    let options = SitemapOptions::from_config(&config);
    let now = Utc::now();

    let document = if index {
        eprintln!("🗺  Rendering sitemap index for {}", options.base_url);
        xml::render_index(&options.base_url, &SitemapSegment::ALL, now)
    } else {
        let client =
            ContentClient::from_config(&config).context("Failed to create content client")?;
        eprintln!("🗺  Building sitemap for {}", options.base_url);
        let entries = build_sitemap_at(&client, &options, now).await;
        eprintln!("   ✓ {} URLs", entries.len());

        if let Some(dir) = out_dir {
            let docs = generate_documents(&entries, &options.base_url, now);
            write_documents(&dir, &docs)?;
            eprintln!("   ✓ Wrote {} files to {}", docs.files.len(), dir.display());
            return Ok(());
        }
        xml::render_urlset(&entries)
    };

    match output {
        Some(path) => {
            fs::write(&path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("   ✓ Wrote {}", path.display());
        }
        None => print!("{}", document),
    }

    Ok(())
}

fn write_documents(dir: &Path, docs: &GeneratedDocuments) -> Result<()> {
    for (relative, content) in &docs.files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
