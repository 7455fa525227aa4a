use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use gestell_tools::gestell::{
    PromptMessage, PromptParams, RetrievalMethod, RetrievalTuning, SearchParams, SearchType,
};
use gestell_tools::{GestellPromptTool, GestellSearchTool};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Query a Gestell collection once from the command line.
#[derive(Debug, Parser)]
#[command(name = "gestell-tools", version)]
struct Cli {
    /// Gestell API key
    #[arg(long, global = true, env = "GESTELL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Default collection id
    #[arg(long, global = true, env = "GESTELL_COLLECTION_ID")]
    collection_id: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the matching records as JSON
    Search {
        query: String,
        #[command(flatten)]
        tuning: TuningArgs,
        #[arg(long)]
        include_content: bool,
        #[arg(long)]
        include_edges: bool,
    },
    /// Print the synthesized answer
    Prompt {
        prompt: String,
        #[command(flatten)]
        tuning: TuningArgs,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        cot: bool,
        /// Prior message as role:content, repeatable
        #[arg(long = "message", value_parser = parse_message)]
        messages: Vec<PromptMessage>,
    },
}

#[derive(Debug, Args)]
struct TuningArgs {
    /// Per-call collection UUID; ignored unless it is a valid UUID
    #[arg(long = "collection")]
    collection_override: Option<String>,
    #[arg(long)]
    category_id: Option<String>,
    #[arg(long, value_parser = parse_method)]
    method: Option<RetrievalMethod>,
    #[arg(long = "type", value_parser = parse_search_type)]
    search_type: Option<SearchType>,
    #[arg(long)]
    vector_depth: Option<u32>,
    #[arg(long)]
    node_depth: Option<u32>,
    #[arg(long)]
    max_queries: Option<u32>,
    #[arg(long)]
    max_results: Option<u32>,
}

impl TuningArgs {
    fn into_parts(self) -> (Option<String>, RetrievalTuning) {
        let tuning = RetrievalTuning {
            category_id: self.category_id,
            method: self.method,
            search_type: self.search_type,
            vector_depth: self.vector_depth,
            node_depth: self.node_depth,
            max_queries: self.max_queries,
            max_results: self.max_results,
        };
        (self.collection_override, tuning)
    }
}

fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase())).map_err(|e| e.to_string())
}

fn parse_method(s: &str) -> Result<RetrievalMethod, String> {
    parse_enum(s)
}

fn parse_search_type(s: &str) -> Result<SearchType, String> {
    parse_enum(s)
}

fn parse_message(s: &str) -> Result<PromptMessage, String> {
    let (role, content) = s.split_once(':').ok_or_else(|| format!("expected role:content, got {s:?}"))?;
    Ok(PromptMessage::new(role.trim(), content.trim()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env (optional) so GESTELL_API_KEY / GESTELL_COLLECTION_ID can live there.
    let _ = dotenvy::dotenv();

    // stdout carries the result, so logs go to stderr and a daily file
    let file_appender = rolling::daily("logs", "gestell.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false).with_target(true))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search { query, tuning, include_content, include_edges } => {
            let tool = GestellSearchTool::new(cli.api_key, cli.collection_id)?;
            let (collection_id_override, tuning) = tuning.into_parts();
            let params = SearchParams {
                query_text: query,
                collection_id_override,
                tuning,
                include_content: include_content.then_some(true),
                include_edges: include_edges.then_some(true),
            };
            let records = tool.search_blocking(&params)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Prompt { prompt, tuning, template, cot, messages } => {
            let tool = GestellPromptTool::new(cli.api_key, cli.collection_id)?;
            let (collection_id_override, tuning) = tuning.into_parts();
            let params = PromptParams {
                query_text: prompt,
                collection_id_override,
                tuning,
                template,
                cot: cot.then_some(true),
                messages: (!messages.is_empty()).then_some(messages),
            };
            println!("{}", tool.prompt_blocking(&params)?);
        }
    }
    Ok(())
}
