use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Manage users, todos and categories")]
pub struct Cli {
    /// SQLite database to operate on
    #[arg(
        long,
        global = true,
        env = "DATABASE_URL",
        default_value = "sqlite://todo.db"
    )]
    pub database_url: String,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recreate all tables and seed user bob
    Initialize,

    /// Create a user with a hashed password
    CreateUser {
        username: String,
        email: String,
        password: String,
    },

    /// Add a todo for a user
    AddTask { username: String, task: String },

    /// Flip the done-state of a todo owned by the user
    ToggleTodo { todo_id: i64, username: String },

    /// Show the categories attached to a todo
    ListTodoCategories { todo_id: i64, username: String },

    /// Create a category for a user
    CreateCategory { username: String, cat_text: String },

    /// Show every category a user owns
    ListUserCategories { username: String },

    /// Attach a category to a todo, creating the category if needed
    AssignCategoryToTodo {
        username: String,
        todo_id: i64,
        category_text: String,
    },

    /// Show every todo with its owner
    ListTodoData,

    /// Delete a todo by id
    DeleteTodo {
        id: i64,

        /// Only delete if the todo belongs to this user
        #[arg(long)]
        username: Option<String>,
    },

    /// Mark all of a user's todos as done
    ToggleTodoDone { user_id: i64 },
}
