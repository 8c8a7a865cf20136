//! Database seeder for Recibo development and testing.
//!
//! Seeds the default admin and standard users for local development.
//!
//! Usage: cargo run --bin seeder

use recibo_core::auth::hash_password;
use recibo_db::UserRepository;
use recibo_shared::Role;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = recibo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let repo = UserRepository::new(db);

    println!("Seeding default users...");
    seed_user(&repo, "admin", "admin123", Role::Admin).await;
    seed_user(&repo, "usuario", "user123", Role::StandardUser).await;

    println!("Seeding complete!");
    println!("Default users:");
    println!("  Admin: admin / admin123");
    println!("  User:  usuario / user123");
}

/// Seeds one user, skipping it if the username is already taken.
async fn seed_user(repo: &UserRepository, username: &str, password: &str, role: Role) {
    match repo.username_exists(username).await {
        Ok(true) => {
            println!("  User '{username}' already exists, skipping...");
            return;
        }
        Ok(false) => {}
        Err(e) => {
            eprintln!("Failed to check user '{username}': {e}");
            return;
        }
    }

    let password_hash = hash_password(password).expect("Failed to hash password");

    match repo.create(username, &password_hash, role).await {
        Ok(user) => println!("  Created user: {username} ({})", user.id),
        Err(e) => eprintln!("Failed to insert user '{username}': {e}"),
    }
}
