//! wechat-kf - command line access to the customer service API
//!
//! Credentials come from the environment (or `.env`):
//!
//! ```bash
//! export WECHAT_APP_ID=wx1234567890abcdef
//! export WECHAT_APP_SECRET=your_secret
//! # or a token managed elsewhere
//! export WECHAT_ACCESS_TOKEN=...
//!
//! wechat-kf list
//! wechat-kf messages --start 1400563710 --end 1400567310
//! ```

use anyhow::{Context as _, Result};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wechat_kf::prelude::*;

#[derive(Parser)]
#[command(name = "wechat-kf", version, about = "WeChat Official Account customer service client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all customer service accounts
    List,

    /// List accounts that are currently online
    Online,

    /// Add a customer service account
    Add {
        /// Full account, e.g. test1@gh_123
        account: String,
        nickname: String,
    },

    /// Change an account's nickname
    Update { account: String, nickname: String },

    /// Invite a personal WeChat id to bind an account
    Invite {
        account: String,
        /// WeChat id of the invitee
        invite_wx: String,
    },

    /// Upload an account's avatar from an image file
    UploadHeadimg { account: String, image: PathBuf },

    /// Delete an account
    Delete { account: String },

    /// Fetch one page of chat records
    Messages {
        /// Window start (unix seconds)
        #[arg(long)]
        start: i64,
        /// Window end (unix seconds)
        #[arg(long)]
        end: i64,
        /// Message id to start from
        #[arg(long, default_value_t = 1)]
        msgid: i64,
        /// Page size
        #[arg(long, default_value_t = 10000)]
        number: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,wechat_kf=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let ctx = KfConfig::from_env()?.build_context()?;
    let kf = Kf::new(ctx.clone());

    match cli.command {
        Commands::List => print_json(&kf.get_kf_list().await?)?,
        Commands::Online => print_json(&kf.get_online_kf_list().await?)?,
        Commands::Add { account, nickname } => {
            kf.add_kf(&AgentCreateOrUpdateRequest::new(account, nickname))
                .await?
        }
        Commands::Update { account, nickname } => {
            kf.update_kf(&AgentCreateOrUpdateRequest::new(account, nickname))
                .await?
        }
        Commands::Invite { account, invite_wx } => {
            kf.invite_kf(&AgentInviteRequest::new(account, invite_wx))
                .await?
        }
        Commands::UploadHeadimg { account, image } => {
            let data = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read image: {:?}", image))?;
            info!("Read {} bytes from {:?}", data.len(), image);
            kf.upload_headimg(&AgentAvatarUploadRequest::new(account, BASE64.encode(data)))
                .await?
        }
        Commands::Delete { account } => kf.delete_kf(&AgentDeleteRequest::new(account)).await?,
        Commands::Messages {
            start,
            end,
            msgid,
            number,
        } => {
            let query = TranscriptQuery {
                starttime: start,
                endtime: end,
                msgid,
                number,
            };
            print_json(&MsgRecord::new(ctx).get_msg_list(&query).await?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
