//! Starter files for a new site.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::publisher::PublisherConfig;

/// Create the article template, listing page and content directories.
///
/// Existing files are left alone unless `force` is set. Returns the files that
/// were written.
pub fn init_site(config: &PublisherConfig, force: bool) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    fs::create_dir_all(&config.root)?;
    fs::create_dir_all(config.articles_path())?;
    fs::create_dir_all(config.images_path())?;

    for (path, contents) in [
        (config.template_path(), DEFAULT_ARTICLE_TEMPLATE),
        (config.listing_path(), DEFAULT_LISTING_PAGE),
    ] {
        if path.exists() && !force {
            tracing::warn!("{} already exists. Use --force to overwrite.", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        tracing::info!("Created {}", path.display());
        written.push(path);
    }

    Ok(written)
}

/// Article template with every anchor the composer fills.
pub const DEFAULT_ARTICLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>記事タイトル - AIライター協会</title>
    <meta name="description" content="記事の概要がここに入ります。">
    <meta property="og:type" content="article">
    <meta property="og:title" content="記事タイトル">
    <meta property="og:description" content="記事の概要がここに入ります。">
    <meta property="og:url" content="">
    <meta property="og:image" content="">
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="../assets/css/style.css">
</head>
<body class="bg-gray-50 text-gray-800">
    <main class="container mx-auto px-6 py-12">
        <article class="max-w-3xl mx-auto">
            <header class="mb-8">
                <p class="text-gray-500 mb-2">2024.01.01</p>
                <h1 class="text-3xl md:text-4xl font-bold text-gray-900 leading-tight">記事タイトル</h1>
                <p class="text-sm mt-2 text-gray-500"><a href="../index.html" class="hover:underline">ホーム</a> &gt; <a href="../column.html" class="hover:underline">コラム</a> &gt; 記事タイトル</p>
            </header>
            <img src="../assets/images/placeholder.jpeg" alt="記事のメイン画像" class="w-full h-auto rounded-lg shadow-lg mb-12">
            <div class="article-content text-gray-800">
                <p>ここに本文が入ります。</p>
            </div>
        </article>
    </main>
    <footer class="bg-gray-800 text-white py-8">
        <div class="container mx-auto px-6 text-center">
            <p class="text-sm mt-2 text-gray-500">&copy; AIライター協会</p>
        </div>
    </footer>
    <script src="../assets/js/main.js"></script>
</body>
</html>
"#;

/// Listing page with an empty card grid.
pub const DEFAULT_LISTING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>コラム - AIライター協会</title>
    <meta name="description" content="AIライター協会のコラム一覧です。">
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="assets/css/style.css">
</head>
<body class="bg-gray-50 text-gray-800">
    <main class="container mx-auto px-6 py-12">
        <section>
            <h2 class="text-3xl font-bold text-center mb-12">コラム</h2>
            <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
            </div>
        </section>
    </main>
    <script src="assets/js/main.js"></script>
</body>
</html>
"#;
