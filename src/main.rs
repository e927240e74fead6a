use std::path::PathBuf;

use anyhow::{bail, Context};
use maximarket::{init_logging, Config, ProjectStore, ShoppingList, StoreSession};

const USAGE: &str = "usage: maximarket list | maximarket route <project.json> <list.json>";

fn load_config() -> anyhow::Result<Config> {
    match Config::default_path() {
        Ok(path) => Config::load_or_default(&path)
            .with_context(|| format!("reading configuration {}", path.display())),
        Err(_) => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = load_config()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] => {
            let store = ProjectStore::from_config(&config);
            for summary in store.list_available_projects(&config.projects.search_dirs) {
                println!("{}\t{}", summary, summary.path.display());
            }
        }
        ["route", project_path, list_path] => {
            let mut session = StoreSession::open(PathBuf::from(*project_path), &config)
                .with_context(|| format!("opening project {}", project_path))?;
            let list = ShoppingList::load_json(*list_path)
                .with_context(|| format!("reading shopping list {}", list_path))?;
            for product in session.set_shopping_list(list) {
                eprintln!("not sold here: {}", product);
            }

            let route = session.compute_route();
            for (i, stop) in route.stops().iter().enumerate() {
                println!("{:>3}. {} {}", i + 1, stop.product, stop.cell);
            }
            for product in route.skipped() {
                println!("  -  {} (not placed)", product);
            }
            println!("Total: {:.2} cells", route.total_distance());
        }
        _ => bail!(USAGE),
    }

    Ok(())
}
