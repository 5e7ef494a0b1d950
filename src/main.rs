mod authentication;
mod cli;
mod crud_ops;
mod db;
mod entities;
mod error;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use crud_ops::CategoryOutcome;
use db::DatabaseConfig;
use sqlx::SqlitePool;

fn labels(categories: &[entities::Category]) -> Vec<&str> {
    categories.iter().map(|c| c.text.as_str()).collect()
}

async fn dispatch(pool: &SqlitePool, command: Commands) -> error::Result<()> {
    match command {
        Commands::Initialize => {
            crud_ops::initialize(pool).await?;
            println!("Database Initialized");
        }
        Commands::CreateUser {
            username,
            email,
            password,
        } => {
            let user = crud_ops::create_user(pool, &username, &email, &password).await?;
            println!("User {} created with id {}", user.username, user.id);
        }
        Commands::AddTask { username, task } => {
            crud_ops::add_task(pool, &username, &task).await?;
            println!("Task added for user");
        }
        Commands::ToggleTodo { todo_id, username } => {
            let todo = crud_ops::toggle_todo(pool, todo_id, &username).await?;
            println!("Todo item's done state set to {}", todo.done);
        }
        Commands::ListTodoCategories { todo_id, username } => {
            let categories = crud_ops::list_todo_categories(pool, todo_id, &username).await?;
            println!("Categories: {:?}", labels(&categories));
        }
        Commands::CreateCategory { username, cat_text } => {
            match crud_ops::create_category(pool, &username, &cat_text).await? {
                CategoryOutcome::Created(category) => {
                    println!("Category '{}' added for user", category.text)
                }
                CategoryOutcome::Exists(category) => {
                    println!("Category '{}' exists! Skipping creation", category.text)
                }
            }
        }
        Commands::ListUserCategories { username } => {
            let categories = crud_ops::list_user_categories(pool, &username).await?;
            println!("{:?}", labels(&categories));
        }
        Commands::AssignCategoryToTodo {
            username,
            todo_id,
            category_text,
        } => {
            let assignment =
                crud_ops::assign_category_to_todo(pool, &username, todo_id, &category_text).await?;
            if assignment.category_created {
                println!("Category didn't exist for user, created it");
            }
            if assignment.already_linked {
                println!("Category already assigned to todo");
            } else {
                println!("Added category to todo");
            }
        }
        Commands::ListTodoData => {
            let todos = crud_ops::list_todo_data(pool).await?;
            if todos.is_empty() {
                println!("No data");
            }
            for row in todos {
                println!(
                    "ID: {}, Text: {}, Username: {}, Done: {}",
                    row.todo.id, row.todo.text, row.username, row.todo.done
                );
            }
        }
        Commands::DeleteTodo { id, username } => {
            match crud_ops::delete_todo(pool, id, username.as_deref()).await {
                Ok(_) => println!("{id} deleted"),
                Err(error::Error::TodoNotFound(_)) => {
                    println!("{id} not found! Unable to delete todo id.")
                }
                Err(e) => return Err(e),
            }
        }
        Commands::ToggleTodoDone { user_id } => {
            let updated = crud_ops::toggle_todo_done(pool, user_id).await?;
            if updated == 0 {
                println!("No todos found for the user of id: {user_id}");
            } else {
                println!("Todo items for the user {user_id} are set to completed");
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DatabaseConfig::from_url(&cli.database_url);
    let pool = db::connect(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.url))?;

    let result = dispatch(&pool, cli.command).await;
    pool.close().await;

    match result {
        // not found / not owned: report and finish normally
        Err(e) if e.is_report() => {
            println!("{e}");
            Ok(())
        }
        other => other.map_err(anyhow::Error::from),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
