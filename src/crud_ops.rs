use crate::{
    authentication, db,
    entities::{Category, Todo, TodoWithOwner, User},
    error::{Error, Result},
};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

/// Outcome of `create_category`.
#[derive(Debug, Clone)]
pub enum CategoryOutcome {
    Created(Category),
    Exists(Category),
}

/// Outcome of `assign_category_to_todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub category_created: bool,
    pub already_linked: bool,
}

async fn find_user(conn: &mut SqliteConnection, username: &str) -> Result<User> {
    debug!(username, "looking up user");
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::UserNotFound(username.to_string()))
}

async fn find_todo_with_owner(conn: &mut SqliteConnection, todo_id: i64) -> Result<TodoWithOwner> {
    debug!(todo_id, "looking up todo");
    sqlx::query_as::<_, TodoWithOwner>(
        "SELECT todos.*, users.username FROM todos
         JOIN users ON users.id = todos.user_id
         WHERE todos.id = ?",
    )
    .bind(todo_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(Error::TodoNotFound(todo_id))
}

async fn find_owned_todo(
    conn: &mut SqliteConnection,
    todo_id: i64,
    username: &str,
) -> Result<TodoWithOwner> {
    let todo = find_todo_with_owner(conn, todo_id).await?;
    if !todo.is_owned_by(username) {
        return Err(Error::NotOwner {
            todo_id,
            username: username.to_string(),
        });
    }
    Ok(todo)
}

async fn find_category(
    conn: &mut SqliteConnection,
    user_id: i64,
    text: &str,
) -> Result<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE text = ? AND user_id = ?")
            .bind(text)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(category)
}

async fn insert_user(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(&mut *conn)
    .await?;
    Ok(user)
}

async fn insert_todo(conn: &mut SqliteConnection, user_id: i64, text: &str) -> Result<Todo> {
    let todo =
        sqlx::query_as::<_, Todo>("INSERT INTO todos (user_id, text) VALUES (?, ?) RETURNING *")
            .bind(user_id)
            .bind(text)
            .fetch_one(&mut *conn)
            .await?;
    Ok(todo)
}

async fn insert_category(conn: &mut SqliteConnection, user_id: i64, text: &str) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (user_id, text) VALUES (?, ?) RETURNING *",
    )
    .bind(user_id)
    .bind(text)
    .fetch_one(&mut *conn)
    .await?;
    Ok(category)
}

// wipe the db and seed user bob with a single todo
pub async fn initialize(pool: &SqlitePool) -> Result<User> {
    db::reset(pool).await?;

    let password_hash = authentication::hash_password("bobpass").await?;

    let mut tx = pool.begin().await?;
    let bob = insert_user(&mut tx, "bob", "bob@mail.com", &password_hash).await?;
    insert_todo(&mut tx, bob.id, "Wash dishes").await?;
    tx.commit().await?;

    info!(user_id = bob.id, "database initialized");
    Ok(bob)
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let password_hash = authentication::hash_password(password).await?;

    let mut tx = pool.begin().await?;
    let taken: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;
    if taken.is_some() {
        return Err(Error::UserExists);
    }

    let user = insert_user(&mut tx, username, email, &password_hash).await?;
    tx.commit().await?;

    info!(user_id = user.id, username, "user created");
    Ok(user)
}

pub async fn add_task(pool: &SqlitePool, username: &str, text: &str) -> Result<Todo> {
    let mut tx = pool.begin().await?;
    let user = find_user(&mut tx, username).await?;
    let todo = insert_todo(&mut tx, user.id, text).await?;
    tx.commit().await?;

    info!(todo_id = todo.id, username, "task added");
    Ok(todo)
}

/// Flips the done-state of a todo, provided `username` owns it.
pub async fn toggle_todo(pool: &SqlitePool, todo_id: i64, username: &str) -> Result<Todo> {
    let mut tx = pool.begin().await?;
    let TodoWithOwner { todo, .. } = find_owned_todo(&mut tx, todo_id, username).await?;

    let done = !todo.done;
    sqlx::query("UPDATE todos SET done = ? WHERE id = ?")
        .bind(done)
        .bind(todo_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(todo_id, done, "todo toggled");
    Ok(Todo { done, ..todo })
}

pub async fn list_todo_categories(
    pool: &SqlitePool,
    todo_id: i64,
    username: &str,
) -> Result<Vec<Category>> {
    let mut conn = pool.acquire().await?;
    find_owned_todo(&mut conn, todo_id, username).await?;

    let categories = sqlx::query_as::<_, Category>(
        "SELECT categories.* FROM categories
         JOIN todo_categories ON todo_categories.category_id = categories.id
         WHERE todo_categories.todo_id = ?
         ORDER BY categories.id",
    )
    .bind(todo_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(categories)
}

pub async fn create_category(
    pool: &SqlitePool,
    username: &str,
    text: &str,
) -> Result<CategoryOutcome> {
    let mut tx = pool.begin().await?;
    let user = find_user(&mut tx, username).await?;

    if let Some(existing) = find_category(&mut tx, user.id, text).await? {
        return Ok(CategoryOutcome::Exists(existing));
    }

    let category = insert_category(&mut tx, user.id, text).await?;
    tx.commit().await?;

    info!(category_id = category.id, username, "category created");
    Ok(CategoryOutcome::Created(category))
}

pub async fn list_user_categories(pool: &SqlitePool, username: &str) -> Result<Vec<Category>> {
    let mut conn = pool.acquire().await?;
    let user = find_user(&mut conn, username).await?;

    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE user_id = ? ORDER BY id")
            .bind(user.id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(categories)
}

/// Links a category to one of the user's todos, creating the category first if
/// the user has none by that name. Nothing is persisted unless the todo exists.
pub async fn assign_category_to_todo(
    pool: &SqlitePool,
    username: &str,
    todo_id: i64,
    category_text: &str,
) -> Result<Assignment> {
    let mut tx = pool.begin().await?;
    let user = find_user(&mut tx, username).await?;

    let (category, category_created) = match find_category(&mut tx, user.id, category_text).await? {
        Some(category) => (category, false),
        None => (insert_category(&mut tx, user.id, category_text).await?, true),
    };

    let todo: Option<i64> = sqlx::query_scalar("SELECT id FROM todos WHERE id = ? AND user_id = ?")
        .bind(todo_id)
        .bind(user.id)
        .fetch_optional(&mut *tx)
        .await?;
    if todo.is_none() {
        return Err(Error::TodoNotFoundForUser {
            todo_id,
            username: username.to_string(),
        });
    }

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO todo_categories (todo_id, category_id) VALUES (?, ?)",
    )
    .bind(todo_id)
    .bind(category.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    tx.commit().await?;

    info!(todo_id, category_id = category.id, category_created, "category assigned");
    Ok(Assignment {
        category_created,
        already_linked: inserted == 0,
    })
}

pub async fn list_todo_data(pool: &SqlitePool) -> Result<Vec<TodoWithOwner>> {
    let todos = sqlx::query_as::<_, TodoWithOwner>(
        "SELECT todos.*, users.username FROM todos
         JOIN users ON users.id = todos.user_id
         ORDER BY todos.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(todos)
}

/// Deletes a todo by id. The ownership check only applies when `username` is given.
pub async fn delete_todo(pool: &SqlitePool, todo_id: i64, username: Option<&str>) -> Result<Todo> {
    let mut tx = pool.begin().await?;
    let TodoWithOwner { todo, .. } = match username {
        Some(username) => find_owned_todo(&mut tx, todo_id, username).await?,
        None => find_todo_with_owner(&mut tx, todo_id).await?,
    };

    sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(todo_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(todo_id, "todo deleted");
    Ok(todo)
}

/// Marks every todo belonging to `user_id` as done and returns how many there were.
pub async fn toggle_todo_done(pool: &SqlitePool, user_id: i64) -> Result<u64> {
    let mut tx = pool.begin().await?;
    let user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user.is_none() {
        return Err(Error::UserIdNotFound(user_id));
    }

    let updated = sqlx::query("UPDATE todos SET done = TRUE WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;

    info!(user_id, updated, "todos marked done");
    Ok(updated)
}
