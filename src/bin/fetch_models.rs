use chrono::Local;
use colored::*;

use llm_usage::registry::{self, HttpSource, ModelSource};

// Refresh the local pricing snapshot from the model registry
fn main() -> llm_usage::Result<()> {
    let Some(path) = registry::snapshot_path() else {
        eprintln!("{} No home directory found for the snapshot path", "❌".red());
        std::process::exit(1);
    };

    let models = HttpSource::new().fetch()?;
    registry::write_snapshot(&path, &models)?;

    println!(
        "{} Wrote {} models to {} ({})",
        "✅".green(),
        models.len(),
        path.display().to_string().cyan(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
