mod common;

use common::{text_blocks, texts, two_columns, two_columns_with};
use resume_pdf::Error;
use resume_pdf::fonts::{FontSet, Weight};
use resume_pdf::layout::{CELL_PADDING, Canvas, DrawOp, LayoutState, MM, OverflowPolicy, PageGeometry};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn set_column_before_start_fails() {
    let mut state = LayoutState::new(PageGeometry::a4(), OverflowPolicy::Fail);
    assert!(matches!(state.set_column(0), Err(Error::ColumnsNotInitialized)));
    assert!(matches!(state.set_column(7), Err(Error::ColumnsNotInitialized)));
    assert_eq!(state.active_column(), None);
}

#[test]
fn set_column_out_of_range_fails() {
    let mut state = two_columns();
    assert!(matches!(state.set_column(2), Err(Error::InvalidColumnIndex(2))));
    assert_eq!(state.active_column(), Some(0));
}

#[test]
fn writing_before_start_fails() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = LayoutState::new(PageGeometry::a4(), OverflowPolicy::Fail);
    assert!(matches!(
        canvas.write_body(&mut state, "texte", None),
        Err(Error::ColumnsNotInitialized)
    ));
    assert!(matches!(
        canvas.section_title(&mut state, "Profil"),
        Err(Error::ColumnsNotInitialized)
    ));
    assert!(canvas.ops().is_empty());
}

#[test]
fn start_two_columns_splits_usable_width() {
    let geometry = PageGeometry::a4();
    let mut state = LayoutState::new(geometry, OverflowPolicy::Fail);
    state.start_two_columns(50.0);

    let left = state.column(0).unwrap();
    let right = state.column(1).unwrap();
    let width = (geometry.usable_width() - geometry.column_gap) / 2.0;

    assert!(approx(left.x, geometry.margin_left));
    assert!(approx(right.x, geometry.margin_left + width + geometry.column_gap));
    assert!(approx(left.width, width));
    assert!(approx(right.width, width));
    assert!(approx(right.x + right.width, geometry.page_width - geometry.margin_right));
    assert!(approx(left.y, 50.0) && approx(right.y, 50.0));
    assert_eq!(state.active_column(), Some(0));
    assert!(state.column(2).is_none());
}

#[test]
fn restart_resets_cursors_and_active_column() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    state.set_column(1).unwrap();
    canvas.line_break(&mut state, 30.0).unwrap();

    state.start_two_columns(60.0);
    assert_eq!(state.active_column(), Some(0));
    assert!(approx(state.column(1).unwrap().y, 60.0));
}

#[test]
fn cursors_survive_column_switches() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let top = state.cursor().unwrap();

    canvas.write_body(&mut state, "Colonne gauche", None).unwrap();
    let left_after = state.cursor().unwrap();
    assert!(left_after > top);

    state.set_column(1).unwrap();
    assert!(approx(state.cursor().unwrap(), top));
    canvas.write_body(&mut state, "Première ligne à droite", None).unwrap();
    canvas.write_body(&mut state, "Deuxième ligne à droite", None).unwrap();
    let right_after = state.cursor().unwrap();

    state.set_column(0).unwrap();
    assert!(approx(state.cursor().unwrap(), left_after));
    canvas.write_body(&mut state, "Suite à gauche", None).unwrap();

    let blocks = text_blocks(canvas.ops());
    assert!(approx(blocks[3].y, left_after));
    assert!(approx(blocks[3].x, state.column(0).unwrap().x));
    assert!(approx(state.column(1).unwrap().y, right_after));
}

#[test]
fn section_title_draws_band_and_advances() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let top = state.cursor().unwrap();
    let column = state.column(0).unwrap();

    canvas.section_title(&mut state, "Compétences clés").unwrap();

    let style = canvas.style().clone();
    assert!(approx(state.cursor().unwrap(), top + style.title_height + style.title_gap));
    match &canvas.ops()[0] {
        DrawOp::Band { x, y, width, height, color } => {
            assert!(approx(*x, column.x) && approx(*y, top));
            assert!(approx(*width, column.width) && approx(*height, style.title_height));
            assert_eq!(*color, style.title_fill);
        }
        other => panic!("expected a band, got {other:?}"),
    }
    let blocks = text_blocks(canvas.ops());
    assert_eq!(blocks[0].lines, vec!["COMPÉTENCES CLÉS".to_string()]);
    assert_eq!(blocks[0].weight, Weight::Bold);
}

#[test]
fn write_body_advances_by_line_count() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let top = state.cursor().unwrap();

    let long = "Conception de modèles de prévision et de pipelines de données pour des équipes métier. "
        .repeat(3);
    canvas.write_body(&mut state, &long, None).unwrap();

    let block = text_blocks(canvas.ops())[0].clone();
    assert!(block.lines.len() > 1);
    assert!(approx(block.height(), block.lines.len() as f32 * canvas.style().body_line_height));
    assert!(approx(state.cursor().unwrap(), top + block.height()));
    assert_eq!(block.text(), long.trim_end());
}

#[test]
fn wrapped_lines_fit_the_column() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    state.set_column(1).unwrap();

    let text = "Industrialisation des modèles sur Kubernetes avec supervision, alertes et \
                documentation pour les équipes d'exploitation ainsi qu'un identifiant \
                anticonstitutionnellementtrèslongquinetientsuraucuneligne";
    canvas.write_body(&mut state, text, None).unwrap();

    let column = state.column(1).unwrap();
    let block = text_blocks(canvas.ops())[0];
    let face = fonts.face(block.weight);
    for line in &block.lines {
        let width = face.word_width(line, block.size);
        assert!(width <= column.width - 2.0 * CELL_PADDING + 1e-3, "{line:?} is {width}pt wide");
    }
    assert!(approx(block.x, column.x));
}

#[test]
fn write_bullets_skips_blank_items() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let top = state.cursor().unwrap();

    canvas.write_bullets::<&str>(&mut state, &[], "•").unwrap();
    assert!(canvas.ops().is_empty());
    assert!(approx(state.cursor().unwrap(), top));

    canvas
        .write_bullets(&mut state, &["Airflow", "   ", "", "dbt  et  Spark"], "•")
        .unwrap();
    assert_eq!(texts(canvas.ops()), vec!["• Airflow", "• dbt et Spark"]);
    assert!(approx(
        state.cursor().unwrap(),
        top + 2.0 * canvas.style().bullet_line_height
    ));
}

#[test]
fn line_break_moves_only_the_active_cursor() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let top = state.cursor().unwrap();

    canvas.line_break(&mut state, 2.0 * MM).unwrap();
    assert!(approx(state.cursor().unwrap(), top + 2.0 * MM));
    assert!(approx(state.column(1).unwrap().y, top));
    assert!(canvas.ops().is_empty());
}

#[test]
fn line_break_never_checks_overflow() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    canvas.line_break(&mut state, 500.0 * MM).unwrap();
    assert!(state.cursor().unwrap() > state.geometry().content_bottom());
}

#[test]
fn overflow_fails_by_default() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let bottom = state.geometry().content_bottom();
    let gap = bottom - state.cursor().unwrap() - 1.0;
    canvas.line_break(&mut state, gap).unwrap();

    let err = canvas.write_body(&mut state, "Une ligne de trop", None).unwrap_err();
    match err {
        Error::ColumnOverflow { column, y, limit } => {
            assert_eq!(column, 0);
            assert!(approx(limit, bottom));
            assert!(y > limit);
        }
        other => panic!("expected overflow, got {other:?}"),
    }
    assert!(canvas.ops().is_empty());
    assert!(approx(state.cursor().unwrap(), bottom - 1.0));

    assert!(matches!(
        canvas.section_title(&mut state, "Formation"),
        Err(Error::ColumnOverflow { column: 0, .. })
    ));
}

#[test]
fn overflow_warns_when_allowed() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns_with(OverflowPolicy::Warn);
    let bottom = state.geometry().content_bottom();
    let gap = bottom - state.cursor().unwrap() - 1.0;
    canvas.line_break(&mut state, gap).unwrap();

    canvas.write_body(&mut state, "Une ligne de trop", None).unwrap();
    assert_eq!(texts(canvas.ops()), vec!["Une ligne de trop"]);
    assert!(state.cursor().unwrap() > bottom);
}

#[test]
fn block_ending_at_bottom_fits() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = two_columns();
    let line = canvas.style().body_line_height;
    let gap = state.geometry().content_bottom() - state.cursor().unwrap() - line - 0.01;
    canvas.line_break(&mut state, gap).unwrap();

    canvas.write_body(&mut state, "Dernière ligne", None).unwrap();
    assert!((state.geometry().content_bottom() - state.cursor().unwrap()).abs() < 0.02);
}

#[test]
fn banner_uses_the_page_cursor() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut state = LayoutState::new(PageGeometry::a4(), OverflowPolicy::Fail);
    let top = state.page_y();
    let style = canvas.style().heading(24.0);

    canvas.banner(&mut state, "Camille Laurent", &style, [0, 0, 0]);

    assert!(approx(state.page_y(), top + style.line_height));
    assert_eq!(state.active_column(), None);
    match &canvas.ops()[0] {
        DrawOp::Band { width, .. } => assert!(approx(*width, state.geometry().usable_width())),
        other => panic!("expected a band, got {other:?}"),
    }
}
