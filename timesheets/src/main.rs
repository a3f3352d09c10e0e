// Timesheets - weekly view of tracked time
// Entry point: prints the week containing a date as a tree

use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use timesheets::config::ISO_DATE_FORMAT;
use timesheets::dataview::{day_name, Column, ColumnValue, NodeId, WeeklyTreeModel};
use timesheets::duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: timesheets [--data-dir <dir>] [YYYY-MM-DD]";

struct Args {
    data_dir: PathBuf,
    date: NaiveDate,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut data_dir = None;
    let mut date = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let dir = args.next().context(USAGE)?;
                data_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => anyhow::bail!(USAGE),
            value => {
                let parsed = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
                    .with_context(|| format!("invalid date {:?}; {}", value, USAGE))?;
                date = Some(parsed);
            }
        }
    }

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("could not determine the user data directory")?
            .join("timesheets"),
    };

    Ok(Args {
        data_dir,
        date: date.unwrap_or_else(|| Local::now().date_naive()),
    })
}

fn text(model: &WeeklyTreeModel<impl Sized>, node: NodeId, column: Column) -> String {
    match model.value(node, column as usize) {
        Some(ColumnValue::Text(value)) => value,
        Some(ColumnValue::Integer(value)) => value.to_string(),
        None => String::new(),
    }
}

fn print_node(model: &WeeklyTreeModel<impl Sized>, node: NodeId, depth: usize) {
    let indent = "  ".repeat(depth);

    if model.is_container(Some(node)) {
        println!("{}{}", indent, text(model, node, Column::Project));
    } else {
        println!(
            "{}[{}] {} | {} | {} | {}",
            indent,
            text(model, node, Column::Id),
            text(model, node, Column::Project),
            text(model, node, Column::Duration),
            text(model, node, Column::Category),
            text(model, node, Column::Description),
        );
    }

    for child in model.children(Some(node)) {
        print_node(model, child, depth + 1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timesheets=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting timesheets");

    let args = parse_args()?;
    let state = timesheets::app::setup(args.data_dir).await?;

    let model = state.weekly_service.build_week(args.date).await?;
    for root in model.children(None) {
        print_node(&model, root, 0);
    }

    println!();
    for (day, total) in state.weekly_service.day_totals(args.date).await? {
        println!("{:<10} {}", day_name(day), duration::format(total));
    }

    Ok(())
}
