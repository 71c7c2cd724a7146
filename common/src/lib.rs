//! Standards Helper Common Library
//!
//! 基準の類似度計算・照合・順位付け（ファイルI/Oなし）

pub mod types;
pub mod error;
pub mod similarity;
pub mod keywords;
pub mod ranker;
pub mod ranking;

pub use types::{MatchResult, MatchTable, ScoredCandidate, Standard};
pub use error::{Error, Result};
pub use similarity::{edit_similarity, lexical_similarity};
pub use keywords::{keyword_proportion, parse_keywords};
pub use ranker::{compare, score_all, score_candidate};
pub use ranking::{all, next_window, rank, top_n, Disclosure, Ranking, DEFAULT_PAGE_SIZE};
