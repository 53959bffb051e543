mod app;
mod domain;
mod form;
mod store;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use app::App;
use domain::task::{Status, Task};
use store::json::JsonSnapshots;
use store::memory::MemorySnapshots;
use store::{ClockIds, SnapshotStore, TaskStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "tasuku — task list manager TUI", long_about = None)]
struct Args {
    /// Tick interval of render loop in milliseconds
    #[arg(long, default_value_t = 120)]
    tick_ms: u64,

    /// Start with demo tasks (in-memory, nothing persisted)
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Keep tasks in memory instead of the JSON store
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Path to the JSON store file (default: OS data dir)
    #[arg(long)]
    store_path: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let snapshots: Box<dyn SnapshotStore> = if args.demo {
        Box::new(MemorySnapshots::with_seed(seed_tasks()))
    } else if args.memory {
        Box::new(MemorySnapshots::default())
    } else if let Some(path) = args.store_path.as_ref() {
        Box::new(JsonSnapshots::open(path)?)
    } else {
        Box::new(JsonSnapshots::open_default()?)
    };

    let store = TaskStore::open(snapshots, Box::new(ClockIds::default()))?;
    let app = App::new(store);
    ui::run(app, Duration::from_millis(args.tick_ms))
}

fn seed_tasks() -> Vec<Task> {
    let today = app::today_local();
    let mut review = Task::new(2, "Review open pull requests", today + time::Duration::days(1));
    review.description = Some("Anything older than a week first".to_string());
    review.status = Status::InProgress;
    let mut expenses = Task::new(3, "File expense report", today);
    expenses.status = Status::Completed;
    vec![
        Task::new(1, "Write the release notes", today + time::Duration::days(3)),
        review,
        expenses,
    ]
}
