mod collections;
mod degenerate;
mod naming;
mod simple;

use collections::collections;
use degenerate::degenerate;
use log::LevelFilter;
use naming::naming;
use simple::simple;
use std::env;
use tagsql::{Dialect, Templator, TemplatorConfig};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Templator of `dialect` reading the tags the fixtures of this crate carry.
pub fn fixture_templator<D: Dialect>(dialect: &D) -> Templator {
    dialect.templator().with_config(
        &TemplatorConfig::default()
            .with_table_name_tags(["table"])
            .with_field_name_tags(["db"])
            .with_primary_key_tag("primarykey")
            .with_last_insert_tags(["last"]),
    )
}

/// Checks that hold for the artifacts of every dialect.
pub fn execute_tests<D: Dialect>(dialect: &D) {
    log::debug!("Running the conformance suite of `{}`", D::NAME);
    let templator = fixture_templator(dialect);
    simple(&templator);
    collections(&templator);
    degenerate(&templator);
    naming(&templator);
}
