use crate::commands::{load_config, load_snapshot, CommandResult};

pub fn run(query: &str, page: usize) -> CommandResult {
    let config = match load_config("search") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let snapshot = match load_snapshot("search", &config) {
        Ok(snapshot) => snapshot,
        Err(result) => return result,
    };

    let engine = config.search.engine();
    let results = engine.search(query, snapshot.products(), page);
    let message = format!(
        "{} result(s) for `{}` (page {} of {})",
        results.total,
        results.query,
        results.page + 1,
        results.total_pages.max(1)
    );

    CommandResult::success_with_data("search", message, &results)
}
