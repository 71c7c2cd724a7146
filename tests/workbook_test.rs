//! Excel入出力の統合テスト
//!
//! rust_xlsxwriterで照合表と統合基準のブックを作り、読み込み・照合・書き戻しを通す。

use rust_xlsxwriter::{Format, Workbook};
use standards_helper::config::Config;
use standards_helper::error::{StandardsError, WriteBackError};
use standards_helper::workbook::{
    self, ExcelStore, MatchSelection, OriginalLayout, StandardsStore, UnifiedLayout,
};
use standards_helper_common::{compare, parse_keywords, rank};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const REFERENCE: &str = "Fire alarm systems shall comply with NFPA 72.";

/// 照合表（RCS, GRS）を作る。行・列は0始まり
fn create_original_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let rcs = workbook.add_worksheet();
    rcs.set_name("RCS").unwrap();
    rcs.write_string_with_format(0, 1, "Regional Code Standards", &Format::new().set_bold())
        .unwrap();
    for (col, header) in ["No.", "Criteria", "Level", "", "New ID", "New Text", "New Level"]
        .iter()
        .enumerate()
    {
        if !header.is_empty() {
            rcs.write_string(2, col as u16 + 1, *header).unwrap();
        }
    }
    rcs.write_string(3, 1, "RC1.1").unwrap();
    rcs.write_string(3, 2, REFERENCE).unwrap();
    rcs.write_string(3, 3, "Core").unwrap();
    rcs.write_string(4, 1, "RC1.2").unwrap();
    rcs.write_string(4, 2, "Guard rails on elevated platforms.").unwrap();
    rcs.write_string(4, 5, "U9").unwrap();
    rcs.write_string(4, 6, "Already matched").unwrap();
    rcs.write_string(4, 7, "Level 1").unwrap();
    rcs.write_string(5, 1, "Section note").unwrap();
    rcs.write_string(5, 2, "Not a standard row").unwrap();
    rcs.write_formula(10, 1, "=COUNTA(F4:F9)").unwrap();

    let grs = workbook.add_worksheet();
    grs.set_name("GRS").unwrap();
    grs.write_string(3, 1, "GR1").unwrap();
    grs.write_string(3, 2, "Plumbing fixtures shall be accessible.").unwrap();
    grs.write_number(3, 3, 3.0).unwrap();

    workbook.save(path).unwrap();
}

fn create_unified_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Unified Standard").unwrap();
    sheet.write_string(2, 0, "Criterion #").unwrap();
    sheet.write_string(2, 1, "Criterion").unwrap();
    sheet.write_string(3, 0, "U1").unwrap();
    sheet.write_string(3, 1, "Fire alarm systems must comply with NFPA 72.").unwrap();
    sheet.write_string(3, 2, "Level 2").unwrap();
    sheet.write_string(4, 0, "U2").unwrap();
    sheet.write_string(4, 1, "Unrelated plumbing code.").unwrap();
    sheet.write_string(5, 0, "U3").unwrap();
    sheet
        .write_string(5, 1, "Irrelevant line.\nFire alarm systems shall comply with NFPA 72 exactly.")
        .unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "draft").unwrap();

    workbook.save(path).unwrap();
}

struct Fixture {
    _dir: TempDir,
    original: PathBuf,
    unified: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("Failed to create temp dir");
    let original = dir.path().join("Comparison.xlsx");
    let unified = dir.path().join("Unified.xlsx");
    create_original_workbook(&original);
    create_unified_workbook(&unified);
    Fixture {
        _dir: dir,
        original,
        unified,
    }
}

fn is_set(flag: impl std::borrow::Borrow<bool>) -> bool {
    *flag.borrow()
}

fn selection(original_id: &str) -> MatchSelection {
    MatchSelection {
        original_id: original_id.to_string(),
        new_id: "U1".to_string(),
        new_text: "Fire alarm systems must comply with NFPA 72.".to_string(),
        new_level: Some("Level 2".to_string()),
    }
}

#[test]
fn test_load_original_standards() {
    let fx = fixture();
    let standards =
        workbook::load_original_standards(&fx.original, "RCS", &OriginalLayout::default()).unwrap();

    assert_eq!(standards.len(), 2);
    assert_eq!(standards[0].id, "RC1.1");
    assert_eq!(standards[0].text, REFERENCE);
    assert_eq!(standards[0].level.as_deref(), Some("Core"));
    assert!(!standards[0].completed);
    assert_eq!(standards[1].id, "RC1.2");
    assert!(standards[1].completed);

    let grs = workbook::load_original_standards(&fx.original, "GRS", &OriginalLayout::default()).unwrap();
    assert_eq!(grs.len(), 1);
    assert_eq!(grs[0].level.as_deref(), Some("3"));
}

#[test]
fn test_load_new_standards() {
    let fx = fixture();
    let standards =
        workbook::load_new_standards(&fx.unified, "Unified Standard", &UnifiedLayout::default()).unwrap();

    let ids: Vec<&str> = standards.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["U1", "U2", "U3"]);
    assert!(standards[2].text.contains('\n'));
}

#[test]
fn test_sheet_names() {
    let fx = fixture();
    assert_eq!(workbook::sheet_names(&fx.unified).unwrap(), vec!["Unified Standard", "Notes"]);

    // 設定済みのシートとブックの突き合わせ
    let names = workbook::sheet_names(&fx.original).unwrap();
    assert_eq!(Config::default().missing_sheets(&names), vec!["RWS", "RMS", "RAS", "RDS"]);
}

#[test]
fn test_missing_file_and_sheet() {
    let fx = fixture();
    let result = workbook::load_original_standards(
        Path::new("/nonexistent/Comparison.xlsx"),
        "RCS",
        &OriginalLayout::default(),
    );
    assert!(matches!(result, Err(StandardsError::FileNotFound(_))));

    let result = workbook::load_original_standards(&fx.original, "RWS", &OriginalLayout::default());
    match result {
        Err(StandardsError::SheetNotFound { name, available }) => {
            assert_eq!(name, "RWS");
            assert_eq!(available, "RCS, GRS");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_rank_loaded_standards() {
    let fx = fixture();
    let store = ExcelStore::new(fx.original.clone(), fx.unified.clone(), &Config::default());

    let originals = store.load_original("RCS").unwrap();
    let pool = store.load_unified().unwrap();
    let table = compare(Some(&originals[0]), &pool, &[]).unwrap();
    let ranking = rank(&table);

    // 複数行の候補は最も近い行で評価される
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking.ids()[2], "U2");
    assert!(table.get("U1").unwrap().weighted_similarity > 60.0);
    assert!(table.get("U3").unwrap().weighted_similarity > 60.0);
    assert!(table.get("U2").unwrap().weighted_similarity < 30.0);

    // キーワードを含む候補は押し上げられる
    let keywords = parse_keywords("plumbing");
    let boosted = compare(Some(&originals[0]), &pool, &keywords).unwrap();
    assert!(
        boosted.get("U2").unwrap().weighted_similarity > table.get("U2").unwrap().weighted_similarity
    );
}

#[test]
fn test_write_match_and_reload() {
    let fx = fixture();
    let store = ExcelStore::new(fx.original.clone(), fx.unified.clone(), &Config::default());

    store.write_match("RCS", &selection("RC1.1")).unwrap();

    let standards = store.load_original("RCS").unwrap();
    assert_eq!(standards.len(), 2);
    assert!(standards.iter().all(|s| s.completed));
    // 既存の値は残る
    assert_eq!(standards[0].text, REFERENCE);
    assert_eq!(standards[0].level.as_deref(), Some("Core"));

    let grs = store.load_original("GRS").unwrap();
    assert_eq!(grs[0].id, "GR1");
    assert_eq!(grs[0].level.as_deref(), Some("3"));
    assert_eq!(
        workbook::sheet_names(&fx.original).unwrap(),
        vec!["RCS".to_string(), "GRS".to_string()]
    );
}

#[test]
fn test_write_match_overwrites_previous_match() {
    let fx = fixture();
    let layout = OriginalLayout::default();
    let mut sel = selection("RC1.2");
    sel.new_level = None;

    workbook::write_match(&fx.original, "RCS", &layout, &sel).unwrap();

    let mut book: calamine::Xlsx<_> = calamine::open_workbook(&fx.original).unwrap();
    let range = calamine::Reader::worksheet_range(&mut book, "RCS").unwrap();
    assert_eq!(range.get_value((4, 5)), Some(&calamine::Data::String("U1".into())));
    // レベル未指定なら以前の値は消える
    assert!(matches!(
        range.get_value((4, 7)),
        None | Some(calamine::Data::Empty)
    ) || range.get_value((4, 7)) == Some(&calamine::Data::String(String::new())));

    let standards = workbook::load_original_standards(&fx.original, "RCS", &layout).unwrap();
    assert!(!standards[1].completed);
}

/// 書き戻しは照合結果列以外を変えない（数式・書式が残る）
#[test]
fn test_write_match_keeps_formulas_and_formatting() {
    let fx = fixture();
    workbook::write_match(&fx.original, "RCS", &OriginalLayout::default(), &selection("RC1.1")).unwrap();

    let mut book: calamine::Xlsx<_> = calamine::open_workbook(&fx.original).unwrap();
    let formulas = calamine::Reader::worksheet_formula(&mut book, "RCS").unwrap();
    assert!(
        formulas.used_cells().any(|(_, _, f)| f.contains("COUNTA(F4:F9)")),
        "数式が失われた"
    );

    let spreadsheet = umya_spreadsheet::reader::xlsx::read(&fx.original).unwrap();
    let rcs = spreadsheet.get_sheet_by_name("RCS").unwrap();
    let title = rcs.get_cell("B1").unwrap();
    assert_eq!(title.get_value(), "Regional Code Standards");
    assert!(title.get_style().get_font().map(|f| is_set(f.get_bold())).unwrap_or(false));
    assert_eq!(rcs.get_value("F4"), "U1");
    assert_eq!(rcs.get_value("H4"), "Level 2");
}

#[test]
fn test_write_match_errors() {
    let fx = fixture();
    let layout = OriginalLayout::default();

    let result = workbook::write_match(&fx.original, "RCS", &layout, &selection("RC9.9"));
    assert!(matches!(result, Err(WriteBackError::StandardNotFound(id)) if id == "RC9.9"));

    let result = workbook::write_match(&fx.original, "RWS", &layout, &selection("RC1.1"));
    assert!(matches!(result, Err(WriteBackError::SheetNotFound(name)) if name == "RWS"));

    // 失敗しても元のファイルは変わらない
    let standards = workbook::load_original_standards(&fx.original, "RCS", &layout).unwrap();
    assert!(!standards[0].completed);
}

#[cfg(unix)]
#[test]
fn test_write_match_read_only_file_is_locked() {
    use std::os::unix::fs::PermissionsExt;

    let fx = fixture();
    std::fs::set_permissions(&fx.original, std::fs::Permissions::from_mode(0o444)).unwrap();

    // rootでは読み取り専用でも書き込めるので検証できない
    if std::fs::OpenOptions::new().write(true).open(&fx.original).is_ok() {
        return;
    }

    let result = workbook::write_match(&fx.original, "RCS", &OriginalLayout::default(), &selection("RC1.1"));
    let err = result.unwrap_err();
    assert!(err.is_locked());
    assert!(err.to_string().contains("閉じて"));
}
