use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use grocery_list::cli::{parse_args, Cli};
use grocery_list::export::write_export;
use grocery_list::{export_file_name, render, GenerationResult, GroceryError, GroceryList};
use log::{debug, error};
use serde_json::json;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = parse_args();
    match run(&cli).await {
        Ok(result) if result.is_empty() => {
            print_failures(&result);
            eprintln!("No ingredients could be generated for the given dishes.");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<GenerationResult, GroceryError> {
    let input = read_dish_input(cli).await?;
    let lines = cli.dish_lines(input.as_deref());
    debug!("Dish input: {:?}", lines);

    let mut builder = GroceryList::builder()
        .text(&lines)
        .servings(cli.servings)
        .use_video(!cli.no_video);
    for restriction in &cli.diet {
        builder = builder.dietary_restriction(restriction.as_str());
    }
    if let Some(provider) = cli.provider() {
        builder = builder.provider(provider);
    }
    if let Some(model) = &cli.model {
        builder = builder.model(model.as_str());
    }

    let result = builder.build().await?;
    if result.is_empty() {
        return Ok(result);
    }

    if cli.json {
        let output = json!({
            "shopping_list": render(&result.list),
            "failures": result.failures,
            "tutorials": result.tutorials,
            "instructions": result.instructions,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_result(&result);
    }

    let export_path = match (&cli.output, cli.export) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(export_file_name(&Local::now()))),
        (None, false) => None,
    };
    if let Some(path) = export_path {
        write_export(&result.list, &path).await?;
        eprintln!("Saved shopping list to {}", path.display());
    }

    Ok(result)
}

/// Dishes from --file, or from stdin when no dishes were given and stdin is piped
async fn read_dish_input(cli: &Cli) -> Result<Option<String>, GroceryError> {
    if let Some(path) = &cli.file {
        return Ok(Some(tokio::fs::read_to_string(path).await?));
    }

    if cli.dishes.is_empty() && !std::io::stdin().is_terminal() {
        let mut input = String::new();
        tokio::io::stdin().read_to_string(&mut input).await?;
        return Ok(Some(input));
    }

    Ok(None)
}

fn print_result(result: &GenerationResult) {
    let model = render(&result.list);

    println!("Shopping list for: {}", model.dishes.join(", "));
    for section in &model.sections {
        println!();
        println!("{}", section.title);
        for line in &section.lines {
            println!("  • {}", line);
        }
    }

    println!();
    println!(
        "Total items: {}   Categories: {}",
        model.total_items, model.category_count
    );

    if !result.tutorials.is_empty() {
        println!();
        println!("Video tutorials");
        for video in &result.tutorials {
            println!("  {} ({})", video.title, video.channel);
            println!("    {}", video.url);
        }
    }

    if !result.instructions.is_empty() {
        println!();
        println!("Cooking tips from videos");
        for (i, step) in result.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    print_failures(result);
}

fn print_failures(result: &GenerationResult) {
    for failure in &result.failures {
        eprintln!(
            "Could not generate ingredients for '{}': {}",
            failure.dish, failure.message
        );
    }
}
