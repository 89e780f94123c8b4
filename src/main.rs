use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use matterpost::application::services::PreviewLayout;
use matterpost::application::use_cases::{FetchPostsUseCase, LinkPreviewUseCase};
use matterpost::domain::entities::ChannelId;
use matterpost::infrastructure::{
    AppConfig, ChatStore, CliArgs, Command, HttpImageProbe, ImageProbeConfig, MattermostClient,
    StorageManager, SystemUiHost,
};
use matterpost::presentation::PreviewScreen;
use matterpost::presentation::theme::Theme;
use matterpost::presentation::ui::utils::{post_line, post_link};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn print_posts(
    config: &AppConfig,
    api: Arc<MattermostClient>,
    channel: String,
    page: u32,
    per_page: Option<u32>,
    since: Option<i64>,
) -> Result<()> {
    let store = ChatStore::signed_in(api.as_ref()).await?;
    let use_case = FetchPostsUseCase::new(api, Arc::new(store.clone()))
        .with_custom_emoji(config.enable_custom_emoji);

    let channel_id = ChannelId::new(channel);
    let list = match since {
        Some(since) => use_case.get_posts_since(channel_id.clone(), since).await?,
        None => {
            let per_page = per_page.unwrap_or(config.per_page);
            use_case
                .get_posts(channel_id.clone(), page, per_page)
                .await?
        }
    };
    info!(channel_id = %channel_id, count = list.len(), "Posts fetched");

    // Oldest first, like a chat transcript.
    for post in store.posts_in_channel(&channel_id).iter().rev() {
        let author = store.profile(post.user_id());
        let status = store.status(post.user_id());
        println!("{}", post_line(post, author.as_ref(), status.as_ref()));
        if let Some(link) = post_link(post) {
            println!("    -> {link}");
        }
    }

    if store.reached_oldest(&channel_id) {
        println!("-- beginning of channel --");
    }

    Ok(())
}

async fn show_preview(
    config: &AppConfig,
    api: Arc<MattermostClient>,
    url: String,
    reply: bool,
) -> Result<()> {
    let probe = HttpImageProbe::new(&ImageProbeConfig {
        timeout_secs: config.request_timeout_secs,
    })?;
    let use_case = LinkPreviewUseCase::new(api, Arc::new(ChatStore::default()), Arc::new(probe));
    let screen = PreviewScreen::new(
        url,
        PreviewLayout::new(config.layout.viewport(), reply),
        Theme::from_config(&config.theme),
        use_case,
        Arc::new(SystemUiHost::new()),
    );

    let mut terminal = ratatui::init();
    let result = screen.run(&mut terminal).await;
    ratatui::restore();

    result
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = matterpost::VERSION, "Starting {}", matterpost::NAME);

    let api = Arc::new(MattermostClient::new(
        &config.server_url,
        config.token.clone(),
        config.request_timeout(),
    )?);

    match args.command {
        Command::Posts {
            channel,
            page,
            per_page,
            since,
        } => print_posts(&config, api, channel, page, per_page, since).await,
        Command::Preview { url, reply } => show_preview(&config, api, url, reply).await,
    }
}
