use std::process;

use foglio::{
    application::{
        error::AppError,
        index::{ContentIndex, IndexOptions, TagCount},
        search::{self, SearchQuery, TagSelector},
    },
    config::{self, Command, ListArgs, SearchArgs, TagsArgs},
    domain::articles::{Article, format_iso_date},
    infra::{content, content::LoaderOptions, telemetry},
};
use metrics::counter;
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(Command::List(ListArgs::default()));

    telemetry::init(&settings.logging)?;

    let loader_options = LoaderOptions {
        summary_max_chars: settings.content.summary_max_chars,
    };
    let articles = content::load_articles(&settings.content.directory, &loader_options)?;
    let index = ContentIndex::build(
        articles,
        IndexOptions {
            tag_casing: settings.index.tag_casing,
        },
    )?;

    match command {
        Command::List(args) => run_list(&index, &args),
        Command::Search(args) => run_search(&index, &args),
        Command::Tags(args) => run_tags(&index, &args),
    }
}

fn run_list(index: &ContentIndex, args: &ListArgs) -> Result<(), AppError> {
    let articles: Vec<&Article> = index.articles().iter().collect();
    print_articles(&articles, args.json)
}

fn run_search(index: &ContentIndex, args: &SearchArgs) -> Result<(), AppError> {
    let query = SearchQuery::new(args.text.clone(), TagSelector::from_input(args.tag.as_deref()));
    let results = search::search(index, &query);

    counter!("foglio_searches_total").increment(1);
    info!(
        text = %query.text,
        tag = args.tag.as_deref().unwrap_or("all"),
        results = results.len(),
        "search executed"
    );

    print_articles(&results, args.json)
}

fn run_tags(index: &ContentIndex, args: &TagsArgs) -> Result<(), AppError> {
    let counts = index.tag_counts();

    if args.json {
        print_json(&counts)
    } else {
        for TagCount { label, count, .. } in &counts {
            println!("{label} ({count})");
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ArticleRow<'a> {
    slug: &'a str,
    title: &'a str,
    date: String,
    tags: &'a [String],
    summary: &'a str,
}

impl<'a> From<&'a Article> for ArticleRow<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            slug: &article.slug,
            title: &article.title,
            date: format_iso_date(article.date),
            tags: &article.tags,
            summary: &article.summary,
        }
    }
}

fn print_articles(articles: &[&Article], json: bool) -> Result<(), AppError> {
    if json {
        let rows: Vec<ArticleRow<'_>> = articles.iter().map(|article| (*article).into()).collect();
        return print_json(&rows);
    }

    for article in articles {
        let tags = article
            .tags
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}  {}  {}  {}",
            format_iso_date(article.date),
            article.slug,
            article.title,
            tags
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode JSON output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
