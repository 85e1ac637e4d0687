use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use curator_client::{
    config::ConfigManager,
    logging::init_logging,
    router::NavigationDecision,
    AnalysisId, AnalysisQuery, AnalysisRecord, AnalysisType, AppContext, ClientConfig,
    Registration,
};
use std::path::PathBuf;

/// AI Content Curator コマンドラインクライアント
#[derive(Parser, Debug)]
#[command(name = "curator", version, about = "AI Content Curator API client")]
struct Cli {
    /// 設定ファイルのパス（省略時はXDG設定ディレクトリ）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// APIのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// ログレベル (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ログインしてセッションを保存
    Login {
        username: String,
        #[arg(long, env = "CURATOR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// 新規ユーザー登録（ログインはしない）
    Register {
        username: String,
        email: String,
        #[arg(long, env = "CURATOR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// セッションを破棄
    Logout,
    /// 現在のユーザーを表示
    Whoami,
    /// テキストを分析
    Analyze {
        /// sentiment / summary / keywords
        #[arg(short = 't', long = "type")]
        analysis_type: AnalysisType,
        text: String,
    },
    /// 分析履歴を一覧表示
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(short = 't', long = "type")]
        analysis_type: Option<AnalysisType>,
    },
    /// 分析を1件表示
    Show { id: i64 },
    /// 分析を削除
    Delete { id: i64 },
    /// パスに対するナビゲーション判定を表示
    Route { path: String },
}

impl Command {
    /// コマンドに対応する画面のパス
    fn page(&self) -> Option<&'static str> {
        match self {
            Command::Login { .. } => Some("/login"),
            Command::Register { .. } => Some("/register"),
            Command::Whoami => Some("/profile"),
            Command::Analyze { .. } => Some("/analysis"),
            Command::List { .. } | Command::Show { .. } | Command::Delete { .. } => {
                Some("/history")
            }
            Command::Logout | Command::Route { .. } => None,
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config()?;
    config.apply_env_overrides();

    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log.log_level = level.clone();
    }
    Ok(config)
}

fn print_record(record: &AnalysisRecord) {
    println!(
        "#{} [{}] {}",
        record.id,
        record.analysis_type,
        record.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("  text:   {}", record.text);
    println!("  result: {}", record.result);
    if let Some(confidence) = &record.confidence_score {
        println!("  confidence: {}", confidence);
    }
    if let Some(elapsed) = &record.processing_time {
        println!("  processing time: {}", elapsed);
    }
}

async fn run(cli: Cli, mut app: AppContext) -> Result<()> {
    app.initialize().await;

    if let Some(page) = cli.command.page() {
        if let NavigationDecision::Redirect(target) = app.navigate(page) {
            match target {
                "/login" => bail!("Not logged in. Run `curator login <username>` first."),
                _ => bail!(
                    "Already logged in (redirected to {}). Run `curator logout` first.",
                    target
                ),
            }
        }
    }

    match cli.command {
        Command::Login { username, password } => {
            app.session.login(&username, &password).await?;
            match app.session.current_user() {
                Some(user) => println!("Logged in as {} <{}>", user.username, user.email),
                None => println!("Logged in as {}", username),
            }
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let registration = Registration {
                username,
                email,
                password,
            };
            app.session.register(&registration).await?;
            println!("Registered {}. You can now log in.", registration.username);
        }
        Command::Logout => {
            app.session.logout();
            println!("Logged out");
        }
        Command::Whoami => match app.session.current_user() {
            Some(user) => {
                println!("{} <{}>", user.username, user.email);
                println!("  id: {}", user.id);
                if let Some(telegram_id) = &user.telegram_id {
                    println!("  telegram: {}", telegram_id);
                }
                println!("  active: {}", user.is_active);
                println!("  since: {}", user.created_at.format("%Y-%m-%d"));
            }
            None => println!("Authenticated, profile unavailable"),
        },
        Command::Analyze {
            analysis_type,
            text,
        } => {
            let record = app.analyses.create_analysis(&text, analysis_type).await?;
            print_record(&record);
        }
        Command::List {
            skip,
            limit,
            analysis_type,
        } => {
            let query = AnalysisQuery {
                skip,
                limit,
                analysis_type,
            };
            app.analyses.fetch_analyses(query).await?;
            let analyses = app.analyses.analyses();
            if analyses.is_empty() {
                println!("No analyses");
            }
            for record in analyses {
                println!(
                    "#{:<6} {:<10} {}  {}",
                    record.id,
                    record.analysis_type,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.text.chars().take(60).collect::<String>()
                );
            }
            println!(
                "Showing {} of {} total",
                analyses.len(),
                app.analyses.stats().total
            );
        }
        Command::Show { id } => {
            let record = app.analyses.fetch_analysis(AnalysisId(id)).await?;
            print_record(&record);
        }
        Command::Delete { id } => {
            app.analyses.delete_analysis(AnalysisId(id)).await?;
            println!("Deleted analysis #{}", id);
        }
        Command::Route { path } => {
            let route = app.router.resolve(&path);
            match app.navigate(&path) {
                NavigationDecision::Proceed => println!("{} ({}): proceed", path, route.name),
                NavigationDecision::Redirect(target) => {
                    println!("{} ({}): redirect to {}", path, route.name, target)
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // ファイル出力時はガードをmainの終わりまで保持する
    let _log_guard = init_logging(&config.log)?;
    tracing::debug!(api_url = %config.api_url, "🎬 Starting curator CLI");

    let app = AppContext::from_config(&config).context("Failed to initialize client")?;
    run(cli, app).await
}
