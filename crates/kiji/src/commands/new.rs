//! Publish a new article from the command line.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kiji_markdown::parse_article;
use kiji_publish::slug::sanitize;
use kiji_publish::{is_valid_date, ArticleInput, ImageSource, Publisher, SlugPolicy};

use crate::config::ConfigFile;

#[derive(Args, Debug, Default)]
pub struct NewArgs {
    /// Article title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Publication date, YYYY.MM.DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Summary shown in meta tags and on the listing card
    #[arg(long)]
    pub description: Option<String>,

    /// Main image, relative to the article file (e.g. ../assets/images/cover.png)
    #[arg(short, long)]
    pub image: Option<String>,

    /// File name for the article, instead of deriving it from the title
    #[arg(short, long)]
    pub slug: Option<String>,

    /// Read the Markdown body from a file
    #[arg(short, long, conflicts_with = "from")]
    pub body_file: Option<PathBuf>,

    /// Read a Markdown file with frontmatter for metadata and body
    #[arg(short, long)]
    pub from: Option<PathBuf>,

    /// Keep non-ASCII letters when deriving the slug from the title
    #[arg(long)]
    pub unicode_slug: bool,
}

/// Fields gathered from flags and files before prompting.
#[derive(Debug, Default)]
struct Draft {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    image: Option<String>,
    slug: Option<String>,
    body: Option<String>,
}

/// Run the new command.
pub async fn run(config: &ConfigFile, root: Option<PathBuf>, args: NewArgs) -> Result<()> {
    let policy = title_policy(config, args.unicode_slug);
    let mut publisher_config = config.publisher(root, policy);
    publisher_config.title_policy = policy;
    let publisher = Publisher::new(publisher_config);

    let draft = load_draft(args)?;
    let today = chrono::Local::now().format("%Y.%m.%d").to_string();

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stderr());
    let input = prompter.complete(draft, &today, policy)?;

    let published = publisher.publish(&input)?;

    tracing::info!("Created article: {}", published.article_path.display());
    tracing::info!(
        "Updated listing: {}",
        publisher.config().listing_path().display()
    );
    if let Some(image) = &published.image_path {
        tracing::info!("Stored image: {}", image.display());
    }

    Ok(())
}

/// `--unicode-slug`, then `[slug] title_policy`, then ASCII.
fn title_policy(config: &ConfigFile, unicode_slug: bool) -> SlugPolicy {
    if unicode_slug {
        SlugPolicy::Unicode
    } else {
        config.slug.title_policy.unwrap_or(SlugPolicy::Ascii)
    }
}

/// Merge flags with `--from` frontmatter or a `--body-file`. Flags win.
fn load_draft(args: NewArgs) -> Result<Draft> {
    let mut draft = Draft::default();

    if let Some(path) = &args.from {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = parse_article(&source)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let frontmatter = parsed.frontmatter.unwrap_or_default();

        draft.title = frontmatter.title;
        draft.date = frontmatter.date;
        draft.description = frontmatter.description;
        draft.image = frontmatter.image;
        draft.slug = frontmatter.slug;
        draft.body = Some(parsed.body);
    }

    if let Some(path) = &args.body_file {
        let body = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        draft.body = Some(body);
    }

    draft.title = args.title.or(draft.title);
    draft.date = args.date.or(draft.date);
    draft.description = args.description.or(draft.description);
    draft.image = args.image.or(draft.image);
    draft.slug = args.slug.or(draft.slug);

    Ok(draft)
}

/// Asks for missing fields on a line-based terminal.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Fill every missing or blank field of `draft`.
    fn complete(&mut self, draft: Draft, today: &str, policy: SlugPolicy) -> Result<ArticleInput> {
        let title = match present(draft.title) {
            Some(title) => title,
            None => self.ask("記事のタイトルを入力してください", None, |s| {
                (!s.is_empty()).then_some(()).ok_or("タイトルは必須です。")
            })?,
        };

        let date = match present(draft.date) {
            Some(date) => date,
            None => self.ask("公開日 (YYYY.MM.DD) を入力してください", Some(today), |s| {
                is_valid_date(s)
                    .then_some(())
                    .ok_or("日付は YYYY.MM.DD 形式で入力してください。")
            })?,
        };

        let description = match present(draft.description) {
            Some(description) => description,
            None => self.ask("記事の概要を入力してください", None, |s| {
                (!s.is_empty()).then_some(()).ok_or("概要は必須です。")
            })?,
        };

        let image = match present(draft.image) {
            Some(image) => image,
            None => self.ask(
                "記事のメイン画像のパスを入力してください (例: ../assets/images/new-image.jpeg)",
                None,
                |s| (!s.is_empty()).then_some(()).ok_or("画像パスは必須です。"),
            )?,
        };

        let mut slug = present(draft.slug);
        if slug.is_none() && sanitize(&title, policy).is_empty() {
            slug = Some(self.ask(
                "タイトルからファイル名を作れません。スラッグを入力してください (例: my-article)",
                None,
                |s| {
                    (!sanitize(s, SlugPolicy::Ascii).is_empty())
                        .then_some(())
                        .ok_or("スラッグには英数字を含めてください。")
                },
            )?);
        }

        let body = match present(draft.body) {
            Some(body) => body,
            None => self.ask_body()?,
        };

        Ok(ArticleInput {
            title,
            slug_override: slug,
            date,
            description,
            image: Some(ImageSource::Path(image)),
            body_markdown: body,
        })
    }

    /// Ask for one line until `validate` accepts it.
    fn ask(
        &mut self,
        message: &str,
        default: Option<&str>,
        validate: impl Fn(&str) -> Result<(), &'static str>,
    ) -> Result<String> {
        loop {
            match default {
                Some(default) => write!(self.output, "{} ({}): ", message, default)?,
                None => write!(self.output, "{}: ", message)?,
            }
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                anyhow::bail!("Input ended before all fields were given");
            }

            let mut answer = line.trim().to_string();
            if answer.is_empty() {
                if let Some(default) = default {
                    answer = default.to_string();
                }
            }

            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => writeln!(self.output, "{}", reason)?,
            }
        }
    }

    /// Read a multi-line Markdown body, ended by a lone `.` or end of input.
    fn ask_body(&mut self) -> Result<String> {
        writeln!(
            self.output,
            "記事の本文をMarkdownで入力してください (\".\" だけの行で終了):"
        )?;
        self.output.flush()?;

        let mut body = String::new();
        let mut line = String::new();
        while self.input.read_line(&mut line)? > 0 {
            if line.trim_end_matches(['\r', '\n']) == "." {
                break;
            }
            body.push_str(&line);
            line.clear();
        }

        if body.trim().is_empty() {
            anyhow::bail!("本文は必須です。");
        }
        Ok(body)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
