mod inspect;

use anyhow::Context;
use clap::{Parser, Subcommand};
use goodslink_core::{load_goods_config_or_default, Actor, AppConfig, ContentType};
use goodslink_db::{PgAuthorizer, PgGoodsStore};
use goodslink_resolver::{AssetUrls, ContentFetcher, FetchConfig, GoodsResolver};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "goodslink-cli")]
#[command(about = "Resolve pasted storefront links into goods drafts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Grant an actor permission to create goods drafts
    Grant {
        #[arg(long)]
        actor_id: i64,
    },
    /// Revoke an actor's permission to create goods drafts
    Revoke {
        #[arg(long)]
        actor_id: i64,
    },
    /// Resolve text into a stored draft and print it as JSON
    Resolve {
        #[arg(long)]
        actor_id: i64,
        /// Text containing one storefront link
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show how text would be located, sanitized and classified, offline
    Inspect {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // stdout carries JSON output; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Inspect { text }) => {
            let report = inspect::inspect(&text.join(" "))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Db { command }) => {
            let config = goodslink_core::load_app_config()?;
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    goodslink_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = goodslink_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Some(Commands::Grant { actor_id }) => {
            let config = goodslink_core::load_app_config()?;
            let pool = connect(&config).await?;
            let permission = ContentType::Goods.create_permission();
            goodslink_db::grant_permission(&pool, actor_id, permission).await?;
            println!("granted {permission} to actor {actor_id}");
        }
        Some(Commands::Revoke { actor_id }) => {
            let config = goodslink_core::load_app_config()?;
            let pool = connect(&config).await?;
            let permission = ContentType::Goods.create_permission();
            if goodslink_db::revoke_permission(&pool, actor_id, permission).await? {
                println!("revoked {permission} from actor {actor_id}");
            } else {
                println!("actor {actor_id} did not hold {permission}");
            }
        }
        Some(Commands::Resolve { actor_id, text }) => {
            let config = goodslink_core::load_app_config()?;
            let pool = connect(&config).await?;
            run_resolve(&config, pool, Actor { id: actor_id }, &text.join(" ")).await?;
        }
        None => println!("goodslink-cli: run with --help for commands"),
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = goodslink_db::PoolConfig::from_app_config(config);
    goodslink_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")
}

async fn run_resolve(
    config: &AppConfig,
    pool: PgPool,
    actor: Actor,
    text: &str,
) -> anyhow::Result<()> {
    let goods_config = load_goods_config_or_default(&config.goods_config_path)?;

    let resolver = GoodsResolver::new(
        PgGoodsStore::new(pool.clone()),
        PgAuthorizer::new(pool),
        ContentFetcher::new(FetchConfig::from_app_config(config))?,
        AssetUrls::new(config.asset_base_url.clone()),
        goods_config,
    )
    .with_max_input_chars(config.max_input_chars);

    let record = resolver
        .resolve(&actor, text)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", e.code()))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
