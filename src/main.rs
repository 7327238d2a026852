use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use client_registry::config;
use client_registry::db::Database;
use client_registry::models::{ClientPatch, PhoneNumbers, SearchFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is reserved for search output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = config::init()?;

    // Initialize database connection
    let mut db = Database::connect(&config).await?;
    info!("database connection established");

    run_demo(&mut db).await?;

    db.close().await?;

    Ok(())
}

/// The fixed demonstration sequence. Any database error aborts the rest of
/// the run.
async fn run_demo(db: &mut Database) -> Result<()> {
    db.create_schema().await?;

    // Client without a phone number
    db.add_client("Ivan", "Ivanov", "ivan@test.ru", None).await?;
    db.add_client(
        "Ivan",
        "Sidorov",
        "Sidorov@test.ru",
        Some(PhoneNumbers::from("+7(999)888-77-66")),
    )
    .await?;
    db.add_client(
        "Sergey",
        "Sergeev",
        "Sergey@mail.ru",
        Some(PhoneNumbers::from("+7(999)800-00-00")),
    )
    .await?;

    // One more number for client 1, three in bulk for client 2
    db.add_phones(1, PhoneNumbers::from("+7(888)999-33-11")).await?;
    db.add_phones(
        2,
        PhoneNumbers::many(["+7(000)000-11-11", "+7(000)000-11-22", "+7(000)000-22-22"]),
    )
    .await?;

    // Single-field patches; everything not named stays as it was
    db.update_client(2, &ClientPatch::new().first_name("Ivan"), None)
        .await?;
    db.update_client(1, &ClientPatch::new().last_name("Ivanov"), None)
        .await?;
    db.update_client(1, &ClientPatch::new().email("ivanov@test.ru"), None)
        .await?;

    db.delete_phone(2, "+7(000)000-22-22").await?;
    db.delete_client(2).await?;

    report_search(db, &SearchFilter::by_first_name("Sergey")).await?;
    report_search(db, &SearchFilter::by_last_name("Sergeev")).await?;
    report_search(db, &SearchFilter::by_email("ivanov@test.ru")).await?;
    report_search(db, &SearchFilter::by_phone("+7(888)999-33-11")).await?;
    // Deleted client: expected to come back empty
    report_search(db, &SearchFilter::by_last_name("Sidorov")).await?;
    // No criteria at all: notice only, no query
    report_search(db, &SearchFilter::default()).await?;

    Ok(())
}

/// Print the first matching contact's four fields space-separated, or one of
/// the fixed notice lines.
async fn report_search(db: &mut Database, filter: &SearchFilter) -> Result<()> {
    match db.find_clients(filter).await? {
        None => println!("no search criteria provided"),
        Some(rows) => match rows.first() {
            Some(row) => println!(
                "{} {} {} {}",
                row.first_name, row.last_name, row.email, row.phone_number
            ),
            None => println!("nothing found for the given criteria"),
        },
    }

    Ok(())
}
