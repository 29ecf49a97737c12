//! Example: Blog Application Changelog
//!
//! This example declares the changelog of a small blog, applies it to an
//! in-memory SQLite database twice (the second run only repeats the
//! run-always change), and prints the SQL its declared actions produce on
//! PostgreSQL.
//!
//! Run with: cargo run --example blog_changelog -p oxide-changelog

use oxide_action::action::AddColumnsAction;
use oxide_action::prelude::*;
use oxide_changelog::prelude::*;

/// Blog schema.
struct Blog;

impl DeclaredChangeLog for Blog {
    const NAME: &'static str = "blog";

    fn build() -> std::result::Result<ChangeLog, BoxError> {
        Ok(ChangeLog::new(Self::NAME)
            .change_set(
                ChangeSet::new("0001_create_users", "alice")
                    .order(1)
                    .comment("Users table")
                    .actions(vec![Action::execute_sql(
                        "CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT NOT NULL)",
                    )]),
            )
            .change_set(
                ChangeSet::new("0002_create_posts", "alice")
                    .order(2)
                    .actions(vec![Action::execute_sql(
                        "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT NOT NULL)",
                    )]),
            )
            .change_set(
                ChangeSet::new("0003_profile_columns", "bob")
                    .order(3)
                    .actions(vec![Action::add_columns(
                        "users",
                        vec![
                            ColumnDefinition::new("email", "varchar(255)").nullable(),
                            ColumnDefinition::new("is_active", "boolean")
                                .default_value(DefaultValue::Boolean(true)),
                        ],
                    )]),
            )
            .change_set(
                ChangeSet::new("0004_post_author", "bob")
                    .order(4)
                    .unit_name("link_posts_to_users")
                    .run_with_scope(|scope| {
                        let mut action = AddColumnsAction {
                            table_name: "posts".into(),
                            column_definitions: vec![
                                ColumnDefinition::new("author_id", "bigint").nullable(),
                            ],
                            unique_constraint_definitions: Vec::new(),
                            foreign_key_definitions: Vec::new(),
                        };
                        // SQLite cannot add constraints to an existing table.
                        if scope.dialect().kind() != DialectKind::Sqlite {
                            action.foreign_key_definitions.push(
                                ForeignKeyDefinition::references(["author_id"], "users(id)")
                                    .named("fk_posts_author"),
                            );
                        }
                        scope.add_action(action);
                        Ok(())
                    }),
            )
            .change_set(
                ChangeSet::new("9999_analyze", "ops")
                    .order(99)
                    .run_always()
                    .run_with_scope(|scope| {
                        scope.add_sql("ANALYZE");
                        Ok(())
                    }),
            ))
    }
}

fn registry() -> ChangeLogRegistry {
    let mut registry = ChangeLogRegistry::new();
    registry.register::<Blog>();
    registry
}

fn print_report(report: &RunReport) {
    for outcome in &report.outcomes {
        println!(
            "  [{}] {}/{}",
            outcome.status, outcome.change_log, outcome.change_id
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = "sqlite::memory:";
    let executor = SqliteExecutor::connect(url).await?;
    let pool = executor.pool().clone();
    let config = RunnerConfig::new(url).with_dialect(DialectKind::Sqlite);

    // Ledger and schema share the single in-memory connection.
    let mut runner = ChangeRunner::new(
        config.clone(),
        registry(),
        SqliteLedgerStore::with_pool(pool.clone()),
        executor.clone(),
    );
    println!("First run:");
    print_report(&runner.run().await?);

    let mut runner = ChangeRunner::new(
        config,
        registry(),
        SqliteLedgerStore::with_pool(pool),
        executor,
    );
    println!("Second run:");
    print_report(&runner.run().await?);

    println!("\nPostgreSQL:");
    let config = RunnerConfig::new("memory")
        .with_dialect(DialectKind::Postgres)
        .with_dry_run(true);
    let mut runner = ChangeRunner::new(
        config,
        registry(),
        MemoryLedgerStore::new(),
        DryRunExecutor::printing(),
    );
    runner.run().await?;

    Ok(())
}
