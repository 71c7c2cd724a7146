use anyhow::{Context, Result};
use clap::Parser;
use standards_helper::error::StandardsError;
use standards_helper::{cli, config, display, filter, report, review, workbook};
use standards_helper_common::{compare, parse_keywords, rank, Standard};
use cli::{Cli, Commands};
use config::Config;
use std::collections::HashSet;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use workbook::{ExcelStore, StandardsStore};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("設定ファイルを読み込めません")?;
    debug!(?config, "config loaded");

    match cli.command {
        Commands::List { filter: query, pending } => {
            let original = config.original_path(cli.original.as_deref())?;
            let sheet = config.resolve_sheet(cli.sheet.as_deref())?;

            let standards = workbook::load_original_standards(&original, &sheet, &config.original_layout)
                .with_context(|| format!("既存基準を読み込めません: {}", original.display()))?;

            let mut shown = filter::filter_standards(&standards, query.as_deref().unwrap_or(""));
            if pending {
                shown = filter::pending_only(shown);
            }

            println!("📋 {} / {}\n", original.display(), sheet);
            for standard in &shown {
                display::print_standard_line(standard);
            }

            let completed = standards.iter().filter(|s| s.completed).count();
            println!(
                "\n✔ {}件表示（全{}件、照合済み{}件）",
                shown.len(),
                standards.len(),
                completed
            );
        }

        Commands::Match { id, keywords, filter: query, top, all, json } => {
            let store = open_store(&config, &cli.original, &cli.unified)?;
            let sheet = config.resolve_sheet(cli.sheet.as_deref())?;

            let originals = store.load_original(&sheet).context("既存基準を読み込めません")?;
            let reference = find_standard(&originals, &id)?;
            let pool = store.load_unified().context("統合基準を読み込めません")?;
            let keywords = parse_keywords(keywords.as_deref().unwrap_or(""));

            let table = compare(Some(reference), &pool, &keywords)?;
            let mut ranking = rank(&table);
            let total = ranking.len();
            if let Some(query) = query.as_deref() {
                let matched: HashSet<&str> = filter::filter_standards(&pool, query)
                    .into_iter()
                    .map(|s| s.id.as_str())
                    .collect();
                ranking = ranking.retain(|id| matched.contains(id));
            }
            let ids = if all { ranking.all() } else { ranking.top_n(top) };
            let rows = display::ranked_rows(ids, 0, &table, &pool);

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            display::print_reference(reference);
            if !keywords.is_empty() {
                println!("🔑 キーワード: {}\n", keywords.join(", "));
            }
            if rows.is_empty() {
                println!("⚠ 一致する候補がありません");
            } else {
                display::print_rows(&rows);
                println!("\n✔ {}/{}件表示（候補{}件）", rows.len(), ranking.len(), total);
            }
        }

        Commands::Review { filter: query, include_completed, keywords, start } => {
            println!("🔍 standards-helper - 対話式照合\n");

            let store = open_store(&config, &cli.original, &cli.unified)?;
            let sheet = config.resolve_sheet(cli.sheet.as_deref())?;

            let standards = store.load_original(&sheet).context("既存基準を読み込めません")?;
            let mut targets = filter::filter_standards(&standards, query.as_deref().unwrap_or(""));
            if !include_completed {
                targets = filter::pending_only(targets);
            }
            if let Some(start) = start {
                let position = targets
                    .iter()
                    .position(|s| s.id == start)
                    .ok_or_else(|| StandardsError::StandardNotFound(start.clone()))?;
                targets.drain(..position);
            }
            let originals: Vec<Standard> = targets.into_iter().cloned().collect();

            let pool = store.load_unified().context("統合基準を読み込めません")?;
            println!("✔ 統合基準: {}件\n", pool.len());

            let options = review::ReviewOptions {
                sheet,
                keywords: parse_keywords(keywords.as_deref().unwrap_or("")),
                page_size: config.page_size,
            };
            let summary = review::run_review(&store, originals, &pool, options)?;

            println!("\n✅ 書き込み {}件 / スキップ {}件", summary.written, summary.skipped);
        }

        Commands::Suggest { keywords, output, include_completed } => {
            println!("💡 standards-helper - 候補提示\n");

            let store = open_store(&config, &cli.original, &cli.unified)?;
            let sheet = config.resolve_sheet(cli.sheet.as_deref())?;

            let standards = store.load_original(&sheet).context("既存基準を読み込めません")?;
            let targets: Vec<Standard> = if include_completed {
                standards
            } else {
                filter::pending_only(&standards).into_iter().cloned().collect()
            };
            let pool = store.load_unified().context("統合基準を読み込めません")?;
            let keywords = parse_keywords(keywords.as_deref().unwrap_or(""));

            println!("[1/2] {}件を照合中...", targets.len());
            let suggestions = report::suggest_matches(&targets, &pool, &keywords, true)?;
            println!("✔ 照合完了\n");

            for suggestion in &suggestions {
                match (&suggestion.best, suggestion.score()) {
                    (Some((candidate, _)), Some(score)) => println!(
                        "{:<10} → {:<10} {:>6.2}%",
                        suggestion.reference.id, candidate.id, score
                    ),
                    _ => println!("{:<10} → （候補なし）", suggestion.reference.id),
                }
            }

            if let Some(output) = output {
                println!("\n[2/2] レポートを保存中...");
                report::write_report(&output, &sheet, &suggestions)
                    .with_context(|| format!("レポートを保存できません: {}", output.display()))?;
                println!("✔ レポートを保存: {}", output.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_original, set_unified, show } => {
            let mut config = config;
            let changed = set_original.is_some() || set_unified.is_some();

            if let Some(path) = set_original {
                println!("✔ 既存基準ファイルを設定しました: {}", path.display());
                config.original_workbook = Some(path);
            }
            if let Some(path) = set_unified {
                println!("✔ 統合基準ファイルを設定しました: {}", path.display());
                config.unified_workbook = Some(path);
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                let unset = "未設定".to_string();
                println!("設定: {}", Config::config_path()?.display());
                println!(
                    "  既存基準: {}",
                    config.original_workbook.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| unset.clone())
                );
                println!(
                    "  統合基準: {}",
                    config.unified_workbook.as_ref().map(|p| p.display().to_string()).unwrap_or(unset)
                );
                println!("  ワークシート: {}", config.original_sheets.join(", "));
                if let Some(path) = config.original_workbook.as_ref().filter(|p| p.exists()) {
                    match workbook::sheet_names(path) {
                        Ok(names) => {
                            let missing = config.missing_sheets(&names);
                            if !missing.is_empty() {
                                println!("  ⚠ ブックにないシート: {}", missing.join(", "));
                            }
                        }
                        Err(e) => println!("  ⚠ シート一覧を取得できません: {}", e),
                    }
                }
                println!("  統合基準シート: {}", config.unified_sheet);
                println!("  表示件数: {}", config.page_size);
            }
        }
    }

    Ok(())
}

fn open_store(
    config: &Config,
    original: &Option<std::path::PathBuf>,
    unified: &Option<std::path::PathBuf>,
) -> Result<ExcelStore> {
    let original = config.original_path(original.as_deref())?;
    let unified = config.unified_path(unified.as_deref())?;
    Ok(ExcelStore::new(original, unified, config))
}

fn find_standard<'a>(standards: &'a [Standard], id: &str) -> Result<&'a Standard> {
    let id = id.trim();
    standards
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| StandardsError::StandardNotFound(id.to_string()).into())
}
