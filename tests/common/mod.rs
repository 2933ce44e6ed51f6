#![allow(dead_code)]

use std::path::{Path, PathBuf};

use resume_pdf::ContentRecord;
use resume_pdf::layout::{DrawOp, LayoutState, MM, OverflowPolicy, PageGeometry, TextBlock};
use resume_pdf::model::Experience;

/// Route `log` output through the test harness; `RUST_LOG=debug` to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

pub fn load_fixture(name: &str) -> ContentRecord {
    ContentRecord::from_path(&fixture_path(name)).expect("fixture parses")
}

/// Columns started 40mm below the top edge, column 0 active.
pub fn two_columns() -> LayoutState {
    two_columns_with(OverflowPolicy::Fail)
}

pub fn two_columns_with(overflow: OverflowPolicy) -> LayoutState {
    let mut state = LayoutState::new(PageGeometry::a4(), overflow);
    state.start_two_columns(40.0 * MM);
    state
}

pub fn text_blocks(ops: &[DrawOp]) -> Vec<&TextBlock> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text(block) => Some(block),
            DrawOp::Band { .. } => None,
        })
        .collect()
}

/// Every text block, wrapped lines joined back together.
pub fn texts(ops: &[DrawOp]) -> Vec<String> {
    text_blocks(ops).iter().map(|b| b.text()).collect()
}

/// Text drawn on a filled band (header banners, then section titles), in order.
pub fn titles(ops: &[DrawOp]) -> Vec<String> {
    let mut out = Vec::new();
    let mut after_band = false;
    for op in ops {
        match op {
            DrawOp::Band { .. } => after_band = true,
            DrawOp::Text(block) if after_band => {
                out.push(block.text());
                after_band = false;
            }
            DrawOp::Text(_) => {}
        }
    }
    out
}

pub fn experience(title: &str, company: &str, location: &str, period: &str) -> Experience {
    Experience {
        title: Some(title.into()),
        company: Some(company.into()),
        location: Some(location.into()),
        period: Some(period.into()),
        missions: Vec::new(),
        impact: Vec::new(),
    }
}
