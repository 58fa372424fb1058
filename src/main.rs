//! Homefeed - home activity feed backend

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use homefeed::config::{ServerConfig, ServerOverrides};
use homefeed::runner::{self, AppConfig};

/// Homefeed - serve the home activity feed as JSON
#[derive(Parser, Debug)]
#[command(name = "homefeed")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/homefeed/config.json)
    #[arg(short = 'c', long, env = "HOMEFEED_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Create the database schema
    SchemaLoad(DatabaseArgs),
    /// Load demo users and activities
    Seed(DatabaseArgs),
    /// Write a default config file (to --config when given)
    InitConfig,
}

#[derive(ClapArgs, Debug)]
pub struct DatabaseArgs {
    /// SQLite database file
    #[arg(long, env = "HOMEFEED_DATABASE")]
    pub database: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "HOMEFEED_BIND")]
    pub bind: Option<SocketAddr>,

    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Directory of <namespace>/<name>.sql templates
    #[arg(long, env = "HOMEFEED_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Browser origin allowed by CORS
    #[arg(long, env = "HOMEFEED_FRONTEND_ORIGIN")]
    pub frontend_origin: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    runner::init_tracing(&AppConfig {
        debug: args.debug,
        verbose: args.verbose,
    });

    // init-config creates the file --config names, so only the other
    // commands load it
    let load_config = || ServerConfig::load(args.config.as_deref());

    match args.command {
        Command::Serve(serve) => runner::run_server(load_config()?.with_overrides(ServerOverrides {
            bind: serve.bind,
            database: serve.db.database,
            templates: serve.templates,
            frontend_origin: serve.frontend_origin,
        })),
        Command::SchemaLoad(db) => {
            let path = database_path(load_config()?, db);
            runner::run_schema_load(&path)?;
            println!("Schema loaded into {}", path.display());
            Ok(())
        }
        Command::Seed(db) => {
            let path = database_path(load_config()?, db);
            let count = runner::run_seed(&path)?;
            println!("Seeded {} activities into {}", count, path.display());
            Ok(())
        }
        Command::InitConfig => {
            let path = ServerConfig::init_at(args.config.as_deref())?;
            println!("Wrote {}", path.display());
            Ok(())
        }
    }
}

fn database_path(config: ServerConfig, args: DatabaseArgs) -> PathBuf {
    config
        .with_overrides(ServerOverrides {
            database: args.database,
            ..Default::default()
        })
        .database_path()
}
