use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "standards-helper")]
#[command(about = "既存基準リストと統合基準リストの照合支援ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 既存基準（照合表）のExcelファイル
    #[arg(long, global = true)]
    pub original: Option<PathBuf>,

    /// 統合基準のExcelファイル
    #[arg(long, global = true)]
    pub unified: Option<PathBuf>,

    /// 既存基準のワークシート（省略時は設定の先頭）
    #[arg(long, global = true)]
    pub sheet: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 既存基準の一覧を表示
    List {
        /// ID・本文で絞り込み
        #[arg(short, long)]
        filter: Option<String>,

        /// 未照合のみ表示
        #[arg(short, long)]
        pending: bool,
    },

    /// 既存基準1件に近い統合基準を表示
    Match {
        /// 既存基準のID
        #[arg(required = true)]
        id: String,

        /// キーワード（カンマ区切り）
        #[arg(short, long)]
        keywords: Option<String>,

        /// 候補をID・本文で絞り込み（順位・スコアは絞り込み前のまま）
        #[arg(short, long)]
        filter: Option<String>,

        /// 表示件数
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// 全件表示
        #[arg(short, long)]
        all: bool,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話的に照合して書き戻す
    Review {
        /// ID・本文で絞り込み
        #[arg(short, long)]
        filter: Option<String>,

        /// 照合済みも対象にする
        #[arg(long)]
        include_completed: bool,

        /// キーワード（カンマ区切り）
        #[arg(short, long)]
        keywords: Option<String>,

        /// このIDから始める
        #[arg(long)]
        start: Option<String>,
    },

    /// 未照合の基準ごとに最有力候補を提示
    Suggest {
        /// キーワード（カンマ区切り）
        #[arg(short, long)]
        keywords: Option<String>,

        /// レポート出力先（.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 照合済みも対象にする
        #[arg(long)]
        include_completed: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 既存基準ファイルを設定
        #[arg(long)]
        set_original: Option<PathBuf>,

        /// 統合基準ファイルを設定
        #[arg(long)]
        set_unified: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
